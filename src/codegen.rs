//! Wrapper fragment derivation — definition line, group staging, call line.
//!
//! Works purely on a classified argument sequence; classification has already
//! validated group balance, so this stage cannot fail. The generated text is
//! Python: the wrappers forward to a `run_command` dispatch owned by the
//! external engine module.

use crate::model::{ArgumentRole, ClassifiedArgument};

/// The three generation fragments for one command function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragments {
    pub definition_line: String,
    pub intermediate_lines: Vec<String>,
    pub call_line: String,
}

/// One member of an `OptionalGroupStart..End` run.
enum GroupPiece {
    /// A quoted literal, emitted into the staged list as-is.
    Literal(String),
    /// A value parameter; spreads are splatted inside the staged list.
    Value { name: String, spread: bool },
}

pub fn build_fragments(name: &str, args: &[ClassifiedArgument]) -> Fragments {
    let mut params: Vec<String> = Vec::new();
    let mut call: Vec<String> = Vec::new();
    let mut intermediates: Vec<String> = Vec::new();
    let mut starred = false;
    let mut group_index = 0usize;

    let mut i = 0;
    while i < args.len() {
        let arg = &args[i];
        let text = arg.token.text.as_str();
        match arg.role {
            ArgumentRole::StartTag => {
                // A quoted start tag is a fixed discriminator baked into the
                // call; a plain one is an ordinary leading parameter.
                if let Some(lit) = quoted_inner(text) {
                    call.push(format!("'{lit}'"));
                } else {
                    let n = param_name(text, arg.token.position);
                    params.push(n.clone());
                    call.push(n);
                }
            }
            ArgumentRole::Basic | ArgumentRole::TagArg => {
                let n = param_name(text, arg.token.position);
                if is_spread(text) {
                    // Only the first spread can be a true *args parameter;
                    // later spreads are list-valued and splatted at the call.
                    if starred {
                        params.push(n.clone());
                    } else {
                        params.push(format!("*{n}"));
                        starred = true;
                    }
                    call.push(format!("*{n}"));
                } else {
                    params.push(n.clone());
                    call.push(n);
                }
            }
            ArgumentRole::Tag => {
                let lit = quoted_inner(text).unwrap_or_else(|| text.to_string());
                call.push(format!("'{lit}'"));
            }
            ArgumentRole::Optional | ArgumentRole::OptionalWrapped => {
                let n = param_name(text, arg.token.position);
                params.push(format!("{n}=None"));
                call.push(format!("*([{n}] if {n} is not None else [])"));
            }
            ArgumentRole::OptionalGroupTag => {
                let inner = text.trim_start_matches('<').trim_end_matches('>').trim();
                let flag = quoted_inner(inner).unwrap_or_else(|| inner.to_string());
                let n = param_name(text, arg.token.position);
                params.push(format!("{n}=False"));
                call.push(format!("*(['{flag}'] if {n} else [])"));
            }
            ArgumentRole::OptionalGroupStart => {
                let mut pieces: Vec<GroupPiece> = vec![group_piece(text, arg.token.position)];
                while i + 1 < args.len() {
                    i += 1;
                    let member = &args[i];
                    pieces.push(group_piece(member.token.text.as_str(), member.token.position));
                    if member.role == ArgumentRole::OptionalGroupEnd {
                        break;
                    }
                }
                stage_group(&pieces, group_index, &mut params, &mut call, &mut intermediates);
                group_index += 1;
            }
            // Consumed by the OptionalGroupStart arm above.
            ArgumentRole::OptionalGroupMiddle | ArgumentRole::OptionalGroupEnd => {}
        }
        i += 1;
    }

    let definition_line = format!("def {}({}):", name, params.join(", "));
    let call_line = if call.is_empty() {
        format!("return run_command('{name}')")
    } else {
        format!("return run_command('{}', {})", name, call.join(", "))
    };

    Fragments {
        definition_line,
        intermediate_lines: intermediates,
        call_line,
    }
}

/// Emit the staged-list assignment for one group and wire its parameters.
fn stage_group(
    pieces: &[GroupPiece],
    group_index: usize,
    params: &mut Vec<String>,
    call: &mut Vec<String>,
    intermediates: &mut Vec<String>,
) {
    let flag = pieces.iter().find_map(|p| match p {
        GroupPiece::Literal(lit) => Some(lit.clone()),
        GroupPiece::Value { .. } => None,
    });

    let var = match &flag {
        Some(f) => format!("_{}", identify(f)),
        None => format!("_group{group_index}"),
    };

    let mut elements: Vec<String> = Vec::new();
    let mut guard: Option<String> = None;
    for piece in pieces {
        match piece {
            GroupPiece::Literal(lit) => elements.push(format!("'{lit}'")),
            GroupPiece::Value { name, spread } => {
                if *spread {
                    elements.push(format!("*{name}"));
                } else {
                    elements.push(name.clone());
                }
                if guard.is_none() {
                    guard = Some(name.clone());
                }
                params.push(format!("{name}=None"));
            }
        }
    }

    match guard {
        Some(g) => intermediates.push(format!(
            "{var} = [{}] if {g} is not None else []",
            elements.join(", ")
        )),
        None => {
            // Flag-only group: a boolean switch, like OptionalGroupTag.
            let switch = flag
                .as_deref()
                .map(identify)
                .unwrap_or_else(|| format!("group{group_index}"));
            params.push(format!("{switch}=False"));
            intermediates.push(format!(
                "{var} = [{}] if {switch} else []",
                elements.join(", ")
            ));
        }
    }

    call.push(format!("*{var}"));
}

fn group_piece(text: &str, position: usize) -> GroupPiece {
    let inner = text
        .trim_start_matches('<')
        .trim_end_matches('>')
        .trim();
    match quoted_inner(inner) {
        Some(lit) => GroupPiece::Literal(lit),
        None => GroupPiece::Value {
            name: param_name(text, position),
            spread: is_spread(text),
        },
    }
}

/// Derive a Python parameter name from a token's text.
fn param_name(text: &str, position: usize) -> String {
    let inner = text
        .trim_start_matches('<')
        .trim_end_matches('>')
        .trim();
    let inner = inner.split('=').next().unwrap_or(inner).trim();
    let inner = quoted_inner(inner).unwrap_or_else(|| inner.to_string());
    let inner = inner.trim_start_matches('*').trim_start_matches('-');

    let name = identify(inner);
    if name.is_empty() || name.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        return format!("arg{position}");
    }
    name
}

/// Replace everything that cannot appear in an identifier.
fn identify(text: &str) -> String {
    text.trim_start_matches('-')
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Inner text of a quoted literal, or `None` when the text is not quoted.
fn quoted_inner(text: &str) -> Option<String> {
    let first = text.chars().next()?;
    let last = text.chars().last()?;
    if text.len() >= 2 && first == last && (first == '\'' || first == '"') {
        Some(text[1..text.len() - 1].to_string())
    } else {
        None
    }
}

fn is_spread(text: &str) -> bool {
    text.trim_start_matches('<')
        .trim()
        .starts_with('*')
}
