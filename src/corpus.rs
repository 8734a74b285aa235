//! Corpus walker — resolves a tree of documentation pages into per-function
//! extracts.
//!
//! Pages are plain-text reStructuredText. A page holding a `.. toctree::`
//! directive is a TOC page; its indented entries name sibling pages, which
//! may themselves be TOC pages. A leaf page holds one or more
//! `.. function:: name(...)` directives, each followed by its prose block.
//!
//! Every failure below the walk boundary is contained at function or entry
//! granularity: the walker records a skip and keeps going.

use crate::codegen;
use crate::error::GenError;
use crate::model::{CommandFunction, Skip};
use crate::parser;
use log::{debug, warn};
use regex::Regex;
use std::collections::HashSet;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static RE_TOCTREE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\.\.[ \t]+toctree::\s*$").unwrap());

static RE_FUNCTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\.\.[ \t]+function::[ \t]+(\S.*)$").unwrap());

static RE_TOC_OPTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s+:[A-Za-z][\w-]*:").unwrap());

/// What a page turned out to be once read.
#[derive(Debug, PartialEq, Eq)]
pub enum PageKind {
    /// Entry names, in order of appearance.
    Toc(Vec<String>),
    /// `(signature, prose)` pairs, in order of appearance.
    Leaf(Vec<(String, String)>),
    /// Neither marker found.
    Empty,
}

/// One page plus everything extracted from it.
#[derive(Debug)]
pub struct DocumentationPage {
    pub path: PathBuf,
    pub kind: PageKind,
}

/// A leaf page resolved down to generated functions.
#[derive(Debug)]
pub struct PageExtract {
    /// Path of the leaf page, relative to the input root.
    pub rel: PathBuf,
    pub functions: Vec<CommandFunction>,
}

pub struct Walker {
    input_root: PathBuf,
    /// Every page ever processed — duplicate references are resolved once.
    visited: HashSet<PathBuf>,
    /// TOC pages on the active resolution path — membership means a cycle.
    stack: Vec<PathBuf>,
    pub extracts: Vec<PageExtract>,
    pub skipped: Vec<Skip>,
}

impl Walker {
    pub fn new(input_root: &Path) -> Self {
        Walker {
            input_root: input_root.to_path_buf(),
            visited: HashSet::new(),
            stack: Vec::new(),
            extracts: Vec::new(),
            skipped: Vec::new(),
        }
    }

    /// Walk the corpus starting from `page`. Never fails: unreadable or
    /// malformed units become skip records.
    pub fn walk(&mut self, page: &Path) {
        let canonical = match page.canonicalize() {
            Ok(p) => p,
            Err(e) => {
                self.skip_entry(page, format!("page does not exist: {e}"));
                return;
            }
        };
        if self.stack.contains(&canonical) {
            self.skip_entry(page, "resolution cycle detected");
            return;
        }
        if !self.visited.insert(canonical.clone()) {
            debug!("{} already resolved, skipping duplicate", page.display());
            return;
        }

        let content = match fs::read_to_string(&canonical) {
            Ok(c) => c,
            Err(e) => {
                self.skip_entry(page, format!("unreadable page: {e}"));
                return;
            }
        };

        debug!("walking {}", canonical.display());
        match classify_page(&canonical, &content).kind {
            PageKind::Toc(entries) => {
                let dir = canonical.parent().map(Path::to_path_buf).unwrap_or_default();
                self.stack.push(canonical);
                for entry in entries {
                    self.walk(&resolve_entry(&dir, &entry));
                }
                self.stack.pop();
            }
            PageKind::Leaf(definitions) => self.extract_leaf(&canonical, definitions),
            PageKind::Empty => {
                warn!("{}: no toctree or function markers", page.display());
                self.skipped.push(Skip {
                    page: page.to_path_buf(),
                    function: None,
                    reason: "no toctree or function markers".to_string(),
                });
            }
        }
    }

    fn extract_leaf(&mut self, page: &Path, definitions: Vec<(String, String)>) {
        let mut functions = Vec::new();
        for (signature, prose) in definitions {
            match build_function(&signature, prose) {
                Ok(func) => functions.push(func),
                Err(e) => {
                    warn!("{}: {e}", page.display());
                    self.skipped.push(Skip {
                        page: page.to_path_buf(),
                        function: Some(signature_name(&signature)),
                        reason: e.to_string(),
                    });
                }
            }
        }
        let rel = self.relative(page);
        self.extracts.push(PageExtract { rel, functions });
    }

    fn skip_entry(&mut self, entry: &Path, reason: impl Into<String>) {
        let err = GenError::corpus(entry, reason);
        warn!("{err}");
        self.skipped.push(Skip {
            page: entry.to_path_buf(),
            function: None,
            reason: err.to_string(),
        });
    }

    fn relative(&self, page: &Path) -> PathBuf {
        let root = self
            .input_root
            .canonicalize()
            .unwrap_or_else(|_| self.input_root.clone());
        page.strip_prefix(&root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| page.file_name().map(PathBuf::from).unwrap_or_default())
    }
}

/// Turn one definition into a generated function, or a contained error.
fn build_function(signature: &str, docstring: String) -> Result<CommandFunction, GenError> {
    let (name, args) = parser::parse_signature(signature)?;
    let fragments = codegen::build_fragments(&name, &args);
    Ok(CommandFunction {
        name,
        args,
        docstring,
        definition_line: fragments.definition_line,
        intermediate_lines: fragments.intermediate_lines,
        call_line: fragments.call_line,
    })
}

/// Best-effort name for skip reporting on signatures that failed to parse.
fn signature_name(signature: &str) -> String {
    signature
        .split('(')
        .next()
        .unwrap_or(signature)
        .trim()
        .to_string()
}

/// Classify a page's content. TOC wins when both markers are present.
pub fn classify_page(path: &Path, content: &str) -> DocumentationPage {
    let lines: Vec<&str> = content.lines().collect();

    if lines.iter().any(|l| RE_TOCTREE.is_match(l)) {
        if lines.iter().any(|l| RE_FUNCTION.is_match(l)) {
            warn!(
                "{}: function definitions on a TOC page are ignored",
                path.display()
            );
        }
        return DocumentationPage {
            path: path.to_path_buf(),
            kind: PageKind::Toc(toc_entries(&lines)),
        };
    }

    let definitions = leaf_definitions(path, &lines);
    let kind = if definitions.is_empty() {
        PageKind::Empty
    } else {
        PageKind::Leaf(definitions)
    };
    DocumentationPage {
        path: path.to_path_buf(),
        kind,
    }
}

/// Collect entry names from every toctree block on the page.
fn toc_entries(lines: &[&str]) -> Vec<String> {
    let mut entries = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        if !RE_TOCTREE.is_match(lines[i]) {
            i += 1;
            continue;
        }
        i += 1;
        // Option lines and blanks may precede the entry list.
        while i < lines.len()
            && (lines[i].trim().is_empty() || RE_TOC_OPTION.is_match(lines[i]))
        {
            i += 1;
        }
        // Indented lines are entries; the block ends at the first
        // non-indented non-blank line.
        while i < lines.len() {
            let line = lines[i];
            if line.trim().is_empty() {
                i += 1;
                continue;
            }
            if !line.starts_with(' ') && !line.starts_with('\t') {
                break;
            }
            entries.push(line.trim().to_string());
            i += 1;
        }
    }
    entries
}

/// Collect `(signature, prose)` pairs from a leaf page.
///
/// Prose blocks are paired with definitions by ordinal position. With this
/// page format the block between two markers belongs to the earlier marker,
/// so the counts normally agree; when they do not (all prose blocks empty
/// except a trailing fragment, say), the mismatch is logged and the
/// unmatched tail keeps an empty docstring rather than a wrong one.
fn leaf_definitions(path: &Path, lines: &[&str]) -> Vec<(String, String)> {
    let mut signatures: Vec<String> = Vec::new();
    let mut blocks: Vec<String> = Vec::new();
    let mut current: Option<Vec<String>> = None;

    for line in lines {
        if let Some(caps) = RE_FUNCTION.captures(line) {
            if let Some(block) = current.take() {
                blocks.push(dedent(&block));
            }
            signatures.push(caps[1].trim().to_string());
            current = Some(Vec::new());
        } else if let Some(ref mut block) = current {
            block.push(line.to_string());
        }
    }
    if let Some(block) = current.take() {
        blocks.push(dedent(&block));
    }

    let prose: Vec<String> = blocks.into_iter().filter(|b| !b.is_empty()).collect();
    if prose.len() != signatures.len() {
        if prose.is_empty() {
            debug!(
                "{}: {} definitions with no docstring blocks",
                path.display(),
                signatures.len()
            );
        } else {
            warn!(
                "{}: {} definitions but {} docstring blocks; pairing by position",
                path.display(),
                signatures.len(),
                prose.len()
            );
        }
    }

    signatures
        .into_iter()
        .enumerate()
        .map(|(i, sig)| (sig, prose.get(i).cloned().unwrap_or_default()))
        .collect()
}

/// Resolve a TOC entry name against the TOC page's directory. Only an
/// explicit `.rst` suffix passes through as-is; a dotted entry name like
/// `v1.2` still gets the page extension appended.
fn resolve_entry(dir: &Path, entry: &str) -> PathBuf {
    if Path::new(entry).extension() == Some(OsStr::new("rst")) {
        dir.join(entry)
    } else {
        dir.join(format!("{entry}.rst"))
    }
}

/// Strip the common leading indentation and surrounding blank lines.
///
/// The indent is measured and stripped in whitespace characters, not bytes:
/// prose may be indented with multibyte whitespace, and byte slicing would
/// land mid-character.
fn dedent(lines: &[String]) -> String {
    let indent = lines
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.chars().take_while(|c| c.is_whitespace()).count())
        .min()
        .unwrap_or(0);

    let body: Vec<String> = lines
        .iter()
        .map(|l| {
            if l.trim().is_empty() {
                String::new()
            } else {
                l.chars().skip(indent).collect()
            }
        })
        .collect();

    body.join("\n").trim_matches('\n').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_toc_page() {
        let page = classify_page(
            Path::new("index.rst"),
            ".. toctree::\n   :maxdepth: 2\n\n   nodes\n   elements\n",
        );
        assert_eq!(
            page.kind,
            PageKind::Toc(vec!["nodes".to_string(), "elements".to_string()])
        );
    }

    #[test]
    fn toc_wins_over_definitions() {
        let page = classify_page(
            Path::new("index.rst"),
            ".. toctree::\n\n   nodes\n\n.. function:: stray(a)\n",
        );
        assert!(matches!(page.kind, PageKind::Toc(_)));
    }

    #[test]
    fn classifies_leaf_page() {
        let page = classify_page(
            Path::new("nodes.rst"),
            ".. function:: node(tag, *crds)\n\n   Create a node.\n",
        );
        match page.kind {
            PageKind::Leaf(defs) => {
                assert_eq!(defs.len(), 1);
                assert_eq!(defs[0].0, "node(tag, *crds)");
                assert_eq!(defs[0].1, "Create a node.");
            }
            other => panic!("expected leaf, got {other:?}"),
        }
    }

    #[test]
    fn pairs_docstrings_positionally() {
        let page = classify_page(
            Path::new("x.rst"),
            ".. function:: a(x)\n\n   First prose.\n\n.. function:: b(y)\n\n   Second prose.\n",
        );
        match page.kind {
            PageKind::Leaf(defs) => {
                assert_eq!(defs[0].1, "First prose.");
                assert_eq!(defs[1].1, "Second prose.");
            }
            other => panic!("expected leaf, got {other:?}"),
        }
    }

    #[test]
    fn definition_without_prose_keeps_empty_docstring() {
        let page = classify_page(
            Path::new("x.rst"),
            ".. function:: a(x)\n.. function:: b(y)\n\n   Only prose.\n",
        );
        match page.kind {
            PageKind::Leaf(defs) => {
                assert_eq!(defs[0].1, "Only prose.");
                assert_eq!(defs[1].1, "");
            }
            other => panic!("expected leaf, got {other:?}"),
        }
    }

    #[test]
    fn definitions_with_no_prose_keep_empty_docstrings() {
        let page = classify_page(
            Path::new("x.rst"),
            ".. function:: a(x)\n.. function:: b(y)\n",
        );
        match page.kind {
            PageKind::Leaf(defs) => {
                assert_eq!(defs.len(), 2);
                assert_eq!(defs[0].1, "");
                assert_eq!(defs[1].1, "");
            }
            other => panic!("expected leaf, got {other:?}"),
        }
    }

    #[test]
    fn page_without_markers_is_empty() {
        let page = classify_page(Path::new("x.rst"), "Just prose, nothing else.\n");
        assert_eq!(page.kind, PageKind::Empty);
    }

    #[test]
    fn dedent_strips_common_indent() {
        let lines: Vec<String> = vec![
            "".to_string(),
            "   First line.".to_string(),
            "   Second line.".to_string(),
            "".to_string(),
        ];
        assert_eq!(dedent(&lines), "First line.\nSecond line.");
    }

    #[test]
    fn dedent_preserves_nested_indent() {
        let lines: Vec<String> = vec!["   a".to_string(), "      b".to_string()];
        assert_eq!(dedent(&lines), "a\n   b");
    }

    #[test]
    fn dedent_with_multibyte_whitespace_does_not_split_chars() {
        // U+3000 is one whitespace char but three bytes; byte-based
        // dedenting would slice mid-character.
        let lines: Vec<String> = vec!["  First.".to_string(), "\u{3000}Second.".to_string()];
        assert_eq!(dedent(&lines), " First.\nSecond.");
    }

    #[test]
    fn multibyte_indented_prose_is_extracted() {
        let page = classify_page(
            Path::new("x.rst"),
            ".. function:: a(x)\n\n  First.\n\u{3000}Second.\n",
        );
        match page.kind {
            PageKind::Leaf(defs) => assert_eq!(defs[0].1, " First.\nSecond."),
            other => panic!("expected leaf, got {other:?}"),
        }
    }

    #[test]
    fn entry_resolution_appends_extension() {
        assert_eq!(
            resolve_entry(Path::new("/docs"), "nodes"),
            PathBuf::from("/docs/nodes.rst")
        );
        assert_eq!(
            resolve_entry(Path::new("/docs"), "nodes.rst"),
            PathBuf::from("/docs/nodes.rst")
        );
    }

    #[test]
    fn dotted_entry_name_still_gets_extension() {
        assert_eq!(
            resolve_entry(Path::new("/docs"), "v1.2"),
            PathBuf::from("/docs/v1.2.rst")
        );
    }
}
