//! wrapgen CLI — run one generation pass over an input/output directory pair.

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use wrapgen::model::GenerationReport;

#[derive(Parser)]
#[command(
    name = "wrapgen",
    about = "Generate command-wrapper modules from signature documentation"
)]
struct Cli {
    /// Input directory holding the documentation corpus.
    input: PathBuf,

    /// Output directory for generated modules.
    #[arg(short = 'o', long)]
    output: PathBuf,

    /// Root TOC page inside the input directory.
    #[arg(long, default_value = wrapgen::DEFAULT_ROOT_PAGE)]
    root: String,

    /// File whose contents replace the built-in import preamble.
    #[arg(short = 'p', long)]
    preamble: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let preamble = match &cli.preamble {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read preamble file: {}", path.display()))?,
        None => wrapgen::render::DEFAULT_PREAMBLE.to_string(),
    };

    let report = wrapgen::generate_with(&cli.input, &cli.output, &cli.root, &preamble)?;
    print!("{}", summarize(&report));
    Ok(())
}

/// Human-readable run summary printed to stdout.
fn summarize(report: &GenerationReport) -> String {
    let mut out = format!(
        "generated {} functions across {} modules\n",
        report.functions_generated, report.modules_written
    );
    if !report.skipped.is_empty() {
        out.push_str(&format!("skipped {}:\n", report.skipped.len()));
        for skip in &report.skipped {
            match &skip.function {
                Some(func) => out.push_str(&format!(
                    "  {} ({}): {}\n",
                    skip.page.display(),
                    func,
                    skip.reason
                )),
                None => out.push_str(&format!("  {}: {}\n", skip.page.display(), skip.reason)),
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use wrapgen::model::Skip;

    #[test]
    fn summary_without_skips() {
        let report = GenerationReport {
            functions_generated: 3,
            modules_written: 2,
            skipped: Vec::new(),
        };
        assert_eq!(summarize(&report), "generated 3 functions across 2 modules\n");
    }

    #[test]
    fn summary_lists_skips() {
        let report = GenerationReport {
            functions_generated: 1,
            modules_written: 1,
            skipped: vec![Skip {
                page: PathBuf::from("cmds.rst"),
                function: Some("broken".to_string()),
                reason: "unbalanced".to_string(),
            }],
        };
        let text = summarize(&report);
        assert!(text.contains("skipped 1:"));
        assert!(text.contains("cmds.rst (broken): unbalanced"));
    }
}
