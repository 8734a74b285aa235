//! Signature tokenizer — single-pass scanner with explicit bracket depth.
//!
//! Splitting on every comma would break on multi-value defaults like
//! `vals=[1,2]`; this scanner only splits at paren depth 1 with no open
//! square bracket. Angle brackets do not suppress splitting: `<'-mass', m>`
//! deliberately yields two tokens, which the classifier turns into a group
//! start/end pair — group balance is therefore the classifier's concern,
//! not the tokenizer's.

use crate::error::GenError;
use crate::model::ArgumentToken;

/// Split the parameter list of `signature` into ordered, trimmed tokens.
///
/// The scan starts at the first `(` and ends at its matching `)`; anything
/// after the matching paren is ignored.
pub fn tokenize(signature: &str) -> Result<Vec<ArgumentToken>, GenError> {
    let open = signature
        .find('(')
        .ok_or_else(|| GenError::tokenize(signature, "no parameter list"))?;

    let mut paren = 1usize;
    let mut square = 0i32;
    let mut quote: Option<char> = None;

    let mut pieces: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut closed = false;

    for c in signature[open + 1..].chars() {
        if let Some(q) = quote {
            current.push(c);
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' => {
                quote = Some(c);
                current.push(c);
            }
            '(' => {
                paren += 1;
                current.push(c);
            }
            ')' => {
                paren -= 1;
                if paren == 0 {
                    closed = true;
                    break;
                }
                current.push(c);
            }
            '[' => {
                square += 1;
                current.push(c);
            }
            ']' => {
                square -= 1;
                if square < 0 {
                    return Err(GenError::tokenize(signature, "unmatched `]`"));
                }
                current.push(c);
            }
            ',' if paren == 1 && square == 0 => {
                pieces.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }

    if quote.is_some() {
        return Err(GenError::tokenize(signature, "unterminated quote"));
    }
    if !closed {
        return Err(GenError::tokenize(signature, "unbalanced parentheses"));
    }
    if square != 0 {
        return Err(GenError::tokenize(signature, "unbalanced square brackets"));
    }
    pieces.push(current);

    let trimmed: Vec<&str> = pieces.iter().map(|p| p.trim()).collect();

    // `name()` — an empty parameter list.
    if trimmed.len() == 1 && trimmed[0].is_empty() {
        return Ok(Vec::new());
    }
    if trimmed.iter().any(|p| p.is_empty()) {
        return Err(GenError::tokenize(signature, "empty argument"));
    }

    Ok(trimmed
        .into_iter()
        .enumerate()
        .map(|(position, text)| ArgumentToken {
            text: text.to_string(),
            position,
        })
        .collect())
}
