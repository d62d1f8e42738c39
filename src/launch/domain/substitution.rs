//! Environment substitution into launch arguments.
//!
//! For each variable (in name order) an argument is rewritten by the first
//! rule that changes it: `${NAME}`, bare `$NAME`, `--flag=<placeholder>`,
//! then a whole-token placeholder such as `YOUR-API-KEY`.

use std::collections::BTreeMap;

const PLACEHOLDER_PREFIX: &str = "YOUR_";

/// Part of an argument under substitution.
enum Piece {
    /// Original argument text, still open to substitution.
    Source(String),
    /// An inserted value; never scanned again.
    Value(String),
}

/// Substitutes resolved environment values into `args`.
///
/// Inserted values are never rescanned, so a value that itself looks like
/// `$OTHER` stays literal. Applying the function to its own output with the
/// same `env` is a no-op unless some value contains a reference to, or a
/// placeholder for, a variable in `env`.
#[must_use]
pub fn substitute_env(args: &[String], env: &BTreeMap<String, String>) -> Vec<String> {
    args.iter().map(|arg| substitute_arg(arg, env)).collect()
}

fn substitute_arg(arg: &str, env: &BTreeMap<String, String>) -> String {
    let mut pieces = vec![Piece::Source(arg.to_owned())];
    for (name, value) in env.iter().filter(|(name, _)| !name.is_empty()) {
        let untouched = matches!(pieces.as_slice(), [Piece::Source(_)]);
        pieces = pieces
            .into_iter()
            .flat_map(|piece| match piece {
                Piece::Value(_) => vec![piece],
                Piece::Source(text) => substitute_source(text, name, value, untouched),
            })
            .collect();
    }
    pieces
        .into_iter()
        .map(|piece| match piece {
            Piece::Source(text) | Piece::Value(text) => text,
        })
        .collect()
}

/// Applies the first rule that changes `text`. Placeholder rules only apply
/// while `text` is the whole, still unchanged argument.
fn substitute_source(text: String, name: &str, value: &str, whole: bool) -> Vec<Piece> {
    if let Some(pieces) = split_braced(&text, name, value) {
        return pieces;
    }
    if let Some(pieces) = split_bare(&text, name, value) {
        return pieces;
    }
    if whole {
        if let Some((flag, candidate)) = text.split_once('=')
            && flag.starts_with("--")
            && is_placeholder_for(candidate, name)
        {
            return vec![
                Piece::Source(format!("{flag}=")),
                Piece::Value(value.to_owned()),
            ];
        }
        if is_placeholder_for(&text, name) {
            return vec![Piece::Value(value.to_owned())];
        }
    }
    vec![Piece::Source(text)]
}

fn split_braced(text: &str, name: &str, value: &str) -> Option<Vec<Piece>> {
    let braced = format!("${{{name}}}");
    if !text.contains(&braced) {
        return None;
    }
    let mut pieces = Vec::new();
    for (index, part) in text.split(braced.as_str()).enumerate() {
        if index > 0 {
            pieces.push(Piece::Value(value.to_owned()));
        }
        pieces.push(Piece::Source(part.to_owned()));
    }
    Some(pieces)
}

/// Replaces `$NAME` occurrences not followed by another identifier
/// character. Returns `None` when nothing matched.
fn split_bare(text: &str, name: &str, value: &str) -> Option<Vec<Piece>> {
    let needle = format!("${name}");
    let mut parts = text.split(needle.as_str());
    let mut pieces = vec![Piece::Source(parts.next()?.to_owned())];
    let mut changed = false;

    for part in parts {
        if part.chars().next().is_some_and(is_identifier_char) {
            push_source(&mut pieces, &needle);
        } else {
            pieces.push(Piece::Value(value.to_owned()));
            changed = true;
        }
        push_source(&mut pieces, part);
    }

    changed.then_some(pieces)
}

fn push_source(pieces: &mut Vec<Piece>, text: &str) {
    if let Some(Piece::Source(last)) = pieces.last_mut() {
        last.push_str(text);
    } else {
        pieces.push(Piece::Source(text.to_owned()));
    }
}

const fn is_identifier_char(character: char) -> bool {
    character.is_ascii_alphanumeric() || character == '_'
}

/// Returns whether `token` is a conventional placeholder standing in for
/// the variable `name`.
///
/// `YOUR-API-KEY`, `<YOUR_API_KEY>`, `YOUR_KEY` (for `API_KEY`) and
/// `<API_KEY>` qualify; a bare `API_KEY` does not, so pass-through forms
/// like `-e API_KEY` survive.
fn is_placeholder_for(token: &str, name: &str) -> bool {
    let bracketed = (token.starts_with('<') && token.ends_with('>'))
        || (token.starts_with('{') && token.ends_with('}'));
    let canonical = canonicalize(token);
    let wanted = canonicalize(name);
    if canonical.is_empty() || wanted.is_empty() {
        return false;
    }
    if bracketed && canonical == wanted {
        return true;
    }
    canonical
        .strip_prefix(PLACEHOLDER_PREFIX)
        .is_some_and(|suffix| {
            !suffix.is_empty() && (wanted == suffix || wanted.ends_with(&format!("_{suffix}")))
        })
}

fn canonicalize(token: &str) -> String {
    token
        .chars()
        .filter(|character| !matches!(character, '<' | '>' | '{' | '}'))
        .map(|character| match character {
            '-' => '_',
            other => other.to_ascii_uppercase(),
        })
        .collect()
}
