//! Signature parsing — tokenize, then classify.

pub mod roles;
pub mod tokens;

use crate::error::GenError;
use crate::model::ClassifiedArgument;

/// Parse one signature string into its command name and classified arguments.
///
/// Stateless: every call starts from a fresh accumulator, so classification
/// of one signature can never leak into another.
pub fn parse_signature(signature: &str) -> Result<(String, Vec<ClassifiedArgument>), GenError> {
    let name = signature
        .split('(')
        .next()
        .map(str::trim)
        .unwrap_or_default();
    if name.is_empty() {
        return Err(GenError::tokenize(signature, "missing command name"));
    }

    let toks = tokens::tokenize(signature)?;
    let args = roles::classify(signature, toks)?;
    Ok((name.to_string(), args))
}
