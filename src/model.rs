//! Data model for classified signatures and generated wrappers — format-agnostic.

use std::path::PathBuf;

/// One raw argument token cut out of a signature's parameter list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentToken {
    pub text: String,
    /// Zero-based position within the signature's token list.
    pub position: usize,
}

/// Semantic role of one argument token. Closed vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentRole {
    /// First token of a non-empty signature: the command discriminator.
    StartTag,
    /// A quoted flag literal, e.g. `'-mat'`.
    Tag,
    /// The value directly following a `Tag` (or a bare name after `StartTag`).
    TagArg,
    /// Plain required positional argument, including spreads like `*nodes`.
    Basic,
    /// Keyword argument with a documented default, e.g. `x=0.0`.
    Optional,
    /// A single bracketed optional value, e.g. `<y>`.
    OptionalWrapped,
    /// Opens a bracketed optional group, e.g. `<'-mass'`.
    OptionalGroupStart,
    /// Interior member of an open optional group.
    OptionalGroupMiddle,
    /// Closes an optional group, e.g. `m>`.
    OptionalGroupEnd,
    /// A fully bracketed quoted flag, e.g. `<'-cMass'>`.
    OptionalGroupTag,
}

/// A token together with its assigned role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedArgument {
    pub token: ArgumentToken,
    pub role: ArgumentRole,
}

/// One command extracted from a leaf page, with its generation fragments.
#[derive(Debug, Clone)]
pub struct CommandFunction {
    pub name: String,
    pub args: Vec<ClassifiedArgument>,
    /// Prose block paired with the definition (may be empty).
    pub docstring: String,
    /// `def name(...):`
    pub definition_line: String,
    /// Optional-group staging assignments, in group order.
    pub intermediate_lines: Vec<String>,
    /// `return run_command('name', ...)`
    pub call_line: String,
}

/// One generated output module, mirroring a leaf page.
#[derive(Debug)]
pub struct GeneratedModule {
    pub output_path: PathBuf,
    pub source_page: PathBuf,
    pub functions: Vec<CommandFunction>,
}

/// A function or TOC entry that was skipped, and why.
#[derive(Debug)]
pub struct Skip {
    pub page: PathBuf,
    /// Set when the skip is scoped to a single function on the page.
    pub function: Option<String>,
    pub reason: String,
}

/// Outcome of one `generate` run. Skips are recoverable by design; the run
/// itself always completes.
#[derive(Debug, Default)]
pub struct GenerationReport {
    pub functions_generated: usize,
    pub modules_written: usize,
    pub skipped: Vec<Skip>,
}
