//! Typed errors for signature parsing and corpus resolution.
//!
//! All three kinds are contained at function or TOC-entry granularity by the
//! corpus walker; none of them aborts a run. Boundary failures (unreadable
//! input root, unwritable output directory) go through `anyhow` instead.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenError {
    /// Unbalanced brackets, an unterminated quote, or a stray fragment in a
    /// signature's parameter list.
    #[error("cannot tokenize `{signature}`: {detail}")]
    Tokenize { signature: String, detail: String },

    /// A role sequence that violates the group-balance rules.
    #[error("cannot classify `{signature}`: {detail}")]
    Classification { signature: String, detail: String },

    /// A TOC entry that resolves to no page, or resolves into a cycle.
    #[error("cannot resolve `{entry}`: {detail}")]
    CorpusStructure { entry: PathBuf, detail: String },
}

impl GenError {
    pub fn tokenize(signature: &str, detail: impl Into<String>) -> Self {
        GenError::Tokenize {
            signature: signature.to_string(),
            detail: detail.into(),
        }
    }

    pub fn classification(signature: &str, detail: impl Into<String>) -> Self {
        GenError::Classification {
            signature: signature.to_string(),
            detail: detail.into(),
        }
    }

    pub fn corpus(entry: impl Into<PathBuf>, detail: impl Into<String>) -> Self {
        GenError::CorpusStructure {
            entry: entry.into(),
            detail: detail.into(),
        }
    }
}
