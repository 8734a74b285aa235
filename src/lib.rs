//! wrapgen — generate thin command-wrapper modules from signature
//! documentation.
//!
//! The pipeline: a corpus walker resolves a tree of documentation pages down
//! to leaf command definitions; each signature is tokenized and every
//! argument token classified into a semantic role; a deterministic
//! synthesizer turns the classified sequence plus prose into generated
//! wrapper source, one output module per leaf page.

pub mod codegen;
pub mod corpus;
pub mod error;
pub mod model;
pub mod parser;
pub mod render;

use anyhow::{Context, Result};
use log::info;
use model::GenerationReport;
use std::fs;
use std::path::Path;

/// Root TOC page expected inside the input directory.
pub const DEFAULT_ROOT_PAGE: &str = "index.rst";

/// Run one generation pass with the default root page and preamble.
pub fn generate(input_root: &Path, output_root: &Path) -> Result<GenerationReport> {
    generate_with(
        input_root,
        output_root,
        DEFAULT_ROOT_PAGE,
        render::DEFAULT_PREAMBLE,
    )
}

/// Run one generation pass.
///
/// Corpus-level problems (unresolvable entries, malformed signatures) are
/// contained and reported via the returned [`GenerationReport`]; only
/// boundary failures — a missing root page, an unwritable output directory —
/// surface as errors.
pub fn generate_with(
    input_root: &Path,
    output_root: &Path,
    root_page: &str,
    preamble: &str,
) -> Result<GenerationReport> {
    let root = input_root.join(root_page);
    anyhow::ensure!(
        root.is_file(),
        "root page not found: {}",
        root.display()
    );

    fs::create_dir_all(output_root).with_context(|| {
        format!(
            "failed to create output directory: {}",
            output_root.display()
        )
    })?;

    let mut walker = corpus::Walker::new(input_root);
    walker.walk(&root);

    let mut report = GenerationReport {
        skipped: walker.skipped,
        ..Default::default()
    };

    for extract in walker.extracts {
        // Pages whose every definition was skipped produce no module.
        if extract.functions.is_empty() {
            continue;
        }

        let module = model::GeneratedModule {
            output_path: output_root.join(extract.rel.with_extension("py")),
            source_page: input_root.join(&extract.rel),
            functions: extract.functions,
        };

        if let Some(parent) = module.output_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create output directory: {}", parent.display())
            })?;
        }

        let text = render::render_module(preamble, &module.functions);
        fs::write(&module.output_path, text).with_context(|| {
            format!(
                "failed to write {} (from {})",
                module.output_path.display(),
                module.source_page.display()
            )
        })?;

        report.functions_generated += module.functions.len();
        report.modules_written += 1;
    }

    info!(
        "generated {} functions across {} modules ({} skipped)",
        report.functions_generated,
        report.modules_written,
        report.skipped.len()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn missing_root_page_is_a_boundary_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let out = dir.path().join("out");
        assert!(generate(dir.path(), &out).is_err());
    }

    #[test]
    fn toc_with_two_leaves_yields_three_functions() {
        let dir = tempfile::TempDir::new().unwrap();
        fs::write(
            dir.path().join("index.rst"),
            ".. toctree::\n\n   nodes\n   elements\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("nodes.rst"),
            ".. function:: node(tag, *crds)\n\n   Create a node.\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("elements.rst"),
            ".. function:: truss(tag, *nodes, A)\n\n   Truss element.\n\n\
             .. function:: zl(tag, *nodes, '-mat', *mats)\n\n   Zero-length element.\n",
        )
        .unwrap();

        let out = dir.path().join("out");
        let report = generate(dir.path(), &out).unwrap();
        assert_eq!(report.functions_generated, 3);
        assert_eq!(report.modules_written, 2);
        assert!(report.skipped.is_empty());
        assert!(out.join("nodes.py").is_file());
        assert!(out.join("elements.py").is_file());
    }

    #[test]
    fn missing_entry_is_skipped_and_siblings_still_generate() {
        let dir = tempfile::TempDir::new().unwrap();
        fs::write(
            dir.path().join("index.rst"),
            ".. toctree::\n\n   ghost\n   nodes\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("nodes.rst"),
            ".. function:: node(tag, *crds)\n\n   Create a node.\n",
        )
        .unwrap();

        let out = dir.path().join("out");
        let report = generate(dir.path(), &out).unwrap();
        assert_eq!(report.skipped.len(), 1);
        assert!(report.skipped[0].reason.contains("does not exist"));
        assert_eq!(report.functions_generated, 1);
        assert!(out.join("nodes.py").is_file());
    }

    #[test]
    fn cyclic_toc_terminates() {
        let dir = tempfile::TempDir::new().unwrap();
        fs::write(dir.path().join("index.rst"), ".. toctree::\n\n   loop\n").unwrap();
        fs::write(dir.path().join("loop.rst"), ".. toctree::\n\n   index\n").unwrap();

        let out = dir.path().join("out");
        let report = generate(dir.path(), &out).unwrap();
        assert_eq!(report.functions_generated, 0);
        assert!(report
            .skipped
            .iter()
            .any(|s| s.reason.contains("cycle")));
    }

    #[test]
    fn page_referenced_twice_resolves_once_without_skips() {
        let dir = tempfile::TempDir::new().unwrap();
        fs::write(
            dir.path().join("index.rst"),
            ".. toctree::\n\n   nodes\n   nodes\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("nodes.rst"),
            ".. function:: node(tag, *crds)\n\n   Create a node.\n",
        )
        .unwrap();

        let out = dir.path().join("out");
        let report = generate(dir.path(), &out).unwrap();
        assert_eq!(report.modules_written, 1);
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn bad_signature_skips_only_that_function() {
        let dir = tempfile::TempDir::new().unwrap();
        fs::write(dir.path().join("index.rst"), ".. toctree::\n\n   cmds\n").unwrap();
        fs::write(
            dir.path().join("cmds.rst"),
            ".. function:: broken(tag, <'-mass', m)\n\n   Unclosed group.\n\n\
             .. function:: good(tag, x)\n\n   Fine.\n",
        )
        .unwrap();

        let out = dir.path().join("out");
        let report = generate(dir.path(), &out).unwrap();
        assert_eq!(report.functions_generated, 1);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].function.as_deref(), Some("broken"));

        let text = fs::read_to_string(out.join("cmds.py")).unwrap();
        assert!(text.contains("def good(tag, x):"));
        assert!(!text.contains("broken"));
    }

    #[test]
    fn nested_toc_mirrors_directory_layout() {
        let dir = tempfile::TempDir::new().unwrap();
        fs::create_dir(dir.path().join("mat")).unwrap();
        fs::write(dir.path().join("index.rst"), ".. toctree::\n\n   mat/index.rst\n").unwrap();
        fs::write(
            dir.path().join("mat").join("index.rst"),
            ".. toctree::\n\n   steel\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("mat").join("steel.rst"),
            ".. function:: steel(tag, fy, E0)\n\n   Steel material.\n",
        )
        .unwrap();

        let out = dir.path().join("out");
        let report = generate(dir.path(), &out).unwrap();
        assert_eq!(report.modules_written, 1);
        assert!(out.join("mat").join("steel.py").is_file());
    }

    #[test]
    fn generation_is_idempotent() {
        let dir = tempfile::TempDir::new().unwrap();
        fs::write(dir.path().join("index.rst"), ".. toctree::\n\n   nodes\n").unwrap();
        fs::write(
            dir.path().join("nodes.rst"),
            ".. function:: node(tag, *crds, <'-mass', *m>)\n\n   Create a node.\n",
        )
        .unwrap();

        let out = dir.path().join("out");
        generate(dir.path(), &out).unwrap();
        let first = fs::read_to_string(out.join("nodes.py")).unwrap();
        generate(dir.path(), &out).unwrap();
        let second = fs::read_to_string(out.join("nodes.py")).unwrap();
        assert_eq!(first, second);
    }
}
