//! Wrapper synthesizer — deterministic concatenation of generated fragments.
//!
//! No classification logic lives here: the fragments arrive fully formed and
//! are only stitched together. Identical inputs always produce byte-identical
//! module text.

use crate::model::CommandFunction;

/// Import preamble emitted at the top of every generated module unless the
/// caller supplies its own.
pub const DEFAULT_PREAMBLE: &str = "\
# Generated by wrapgen. Do not edit by hand.
from .engine import run_command
";

const INDENT: &str = "    ";

/// Render one generated module: preamble, then one block per function in
/// discovery order, blocks separated by a single blank line.
pub fn render_module(preamble: &str, functions: &[CommandFunction]) -> String {
    let mut out = String::new();
    out.push_str(preamble.trim_end());
    out.push('\n');

    for func in functions {
        out.push('\n');
        out.push_str(&render_function(func));
    }
    out
}

/// Render one function block: definition, docstring, staging, call.
fn render_function(func: &CommandFunction) -> String {
    let mut lines: Vec<String> = Vec::new();
    lines.push(func.definition_line.clone());

    if !func.docstring.is_empty() {
        lines.push(render_docstring(&func.docstring));
    }
    for line in &func.intermediate_lines {
        lines.push(format!("{INDENT}{line}"));
    }
    lines.push(format!("{INDENT}{}", func.call_line));

    let mut block = lines.join("\n");
    block.push('\n');
    block
}

fn render_docstring(prose: &str) -> String {
    let mut lines = prose.lines();
    let first = lines.next().unwrap_or_default();
    let rest: Vec<&str> = lines.collect();

    if rest.is_empty() {
        return format!("{INDENT}\"\"\"{first}\"\"\"");
    }

    let mut out = format!("{INDENT}\"\"\"{first}");
    for line in rest {
        out.push('\n');
        if line.is_empty() {
            continue;
        }
        out.push_str(INDENT);
        out.push_str(line);
    }
    out.push('\n');
    out.push_str(INDENT);
    out.push_str("\"\"\"");
    out
}
