//! Role classifier — one left-to-right pass over the token list.
//!
//! The previously assigned role is threaded as an explicit accumulator; there
//! is no other state. Rule order matters and mirrors the lexical conventions
//! of the signature corpus:
//!
//! 0. first token → `StartTag`
//! 1. quoted literal → `Tag`
//! 2. `<...>` → `OptionalGroupTag` (quoted inner) or `OptionalWrapped`
//! 3. `<...` → `OptionalGroupStart`
//! 4. `...>` → `OptionalGroupEnd`
//! 5. inside an open group → `OptionalGroupMiddle`
//! 6. contains `=` → `Optional`
//! 7. directly after `Tag` (any shape) or after `StartTag` (bare identifier
//!    only) → `TagArg`
//! 8. otherwise → `Basic`
//!
//! A `TagArg` never re-enables rule 7 for the following token: `'-mat', a, b`
//! classifies `a` as the tag's argument and `b` as `Basic`. A spread after
//! `StartTag` is `Basic` (`elem(tag, *nodes, ...)`), while a spread after a
//! `Tag` is that tag's argument (`'-mat', *mats`).

use crate::error::GenError;
use crate::model::{ArgumentRole, ArgumentToken, ClassifiedArgument};

/// Classify tokens, enforcing group balance at end of sequence.
pub fn classify(
    signature: &str,
    tokens: Vec<ArgumentToken>,
) -> Result<Vec<ClassifiedArgument>, GenError> {
    let mut last: Option<ArgumentRole> = None;
    let mut group_open = false;
    let mut out = Vec::with_capacity(tokens.len());

    for token in tokens {
        let role = role_for(&token.text, last);

        match role {
            ArgumentRole::OptionalGroupStart => {
                if group_open {
                    return Err(GenError::classification(
                        signature,
                        format!("nested optional group at `{}`", token.text),
                    ));
                }
                group_open = true;
            }
            ArgumentRole::OptionalGroupEnd => {
                if !group_open {
                    return Err(GenError::classification(
                        signature,
                        format!("`{}` closes a group that was never opened", token.text),
                    ));
                }
                group_open = false;
            }
            _ => {}
        }

        last = Some(role);
        out.push(ClassifiedArgument { token, role });
    }

    if group_open {
        return Err(GenError::classification(
            signature,
            "optional group is never closed",
        ));
    }

    Ok(out)
}

fn role_for(text: &str, last: Option<ArgumentRole>) -> ArgumentRole {
    use ArgumentRole::*;

    let last = match last {
        None => return StartTag,
        Some(role) => role,
    };

    if is_quoted(text) {
        return Tag;
    }

    let wrapped = text.starts_with('<') && text.ends_with('>') && text.len() >= 2;
    if wrapped {
        let inner = &text[1..text.len() - 1];
        return if is_quoted(inner) {
            OptionalGroupTag
        } else {
            OptionalWrapped
        };
    }
    if text.starts_with('<') {
        return OptionalGroupStart;
    }
    if text.ends_with('>') {
        return OptionalGroupEnd;
    }

    if matches!(last, OptionalGroupStart | OptionalGroupMiddle) {
        return OptionalGroupMiddle;
    }

    if text.contains('=') {
        return Optional;
    }

    // Rule 7 fires only directly after Tag/StartTag — never after TagArg.
    if last == Tag || (last == StartTag && is_bare_identifier(text)) {
        return TagArg;
    }

    Basic
}

/// Same quote character at both ends, e.g. `'-mass'` or `"-mass"`.
fn is_quoted(text: &str) -> bool {
    let mut chars = text.chars();
    match (chars.next(), text.chars().last()) {
        (Some(first), Some(end)) => {
            text.len() >= 2 && first == end && (first == '\'' || first == '"')
        }
        _ => false,
    }
}

fn is_bare_identifier(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}
