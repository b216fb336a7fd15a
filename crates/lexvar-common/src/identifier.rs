//! Identifier legalization and fresh-name generation.
//!
//! Legality is defined by exclusion rather than inclusion so that names in
//! any script (e.g. `修改数值`) are accepted. The excluded characters are the
//! ones used as infix operators, as selectors, or that break HTML rendering
//! of menus.

use serde::{Deserialize, Serialize};

/// Characters a name may not start with.
const ILLEGAL_START_CHARS: &str = "-0123456789!&%^/>=<`'\"#:;,\\*+.()|{}[] ";

/// Characters a name may not contain after its first character.
const ILLEGAL_REST_CHARS: &str = "-!&%^/>=<'\"#:;,\\*+.()|{}[] ";

/// Substitute for names that cannot be repaired.
pub const FALLBACK_NAME: &str = "name";

/// Substitute for names that are empty after trimming.
pub const EMPTY_NAME: &str = "_";

/// Result of [`check_identifier`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentifierCheck {
    pub is_legal: bool,
    pub transformed: String,
}

/// Normalize whitespace in `raw` and report whether the result is legal.
///
/// Leading and trailing whitespace is trimmed and each internal run of
/// whitespace (including no-break spaces) becomes a single `_`.
pub fn check_identifier(raw: &str) -> IdentifierCheck {
    let mut transformed = String::with_capacity(raw.len());
    let mut in_whitespace = false;
    for ch in raw.trim().chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                transformed.push('_');
            }
            in_whitespace = true;
        } else {
            transformed.push(ch);
            in_whitespace = false;
        }
    }

    let mut chars = transformed.chars();
    let is_legal = match chars.next() {
        Some(first) => {
            !ILLEGAL_START_CHARS.contains(first) && chars.all(|c| !ILLEGAL_REST_CHARS.contains(c))
        }
        None => false,
    };

    IdentifierCheck {
        is_legal,
        transformed,
    }
}

/// Always produce a usable name: the transformed name if legal, `_` if it is
/// empty, and [`FALLBACK_NAME`] otherwise.
pub fn make_legal_identifier(raw: &str) -> String {
    let check = check_identifier(raw);
    if check.is_legal {
        check.transformed
    } else if check.transformed.is_empty() {
        EMPTY_NAME.to_string()
    } else {
        FALLBACK_NAME.to_string()
    }
}

/// Split `name` into a text prefix and its trailing ASCII digits.
///
/// `"name1"` splits into `("name", "1")`, `"name1a"` into `("name1a", "")`.
pub fn prefix_suffix(name: &str) -> (&str, &str) {
    let digits = name
        .bytes()
        .rev()
        .take_while(|b| b.is_ascii_digit())
        .count();
    name.split_at(name.len() - digits)
}

/// A variant of `name` that does not conflict with any entry of `names`.
///
/// Entries only conflict when they share `name`'s text prefix. The unchanged
/// name is preferred, then the bare prefix, then the prefix followed by the
/// smallest integer >= 2 not already used as a suffix.
pub fn name_not_in<S: AsRef<str>>(name: &str, names: &[S]) -> String {
    let (name_prefix, name_suffix) = prefix_suffix(name);
    let mut empty_suffix_used = false;
    let mut is_conflict = false;
    let mut suffixes: Vec<u64> = Vec::new();

    for other in names {
        let (prefix, suffix) = prefix_suffix(other.as_ref());
        if prefix != name_prefix {
            continue;
        }
        if suffix == name_suffix {
            is_conflict = true;
        }
        if suffix.is_empty() {
            empty_suffix_used = true;
        } else if let Ok(n) = suffix.parse::<u64>() {
            suffixes.push(n);
        }
    }

    if !is_conflict {
        return name.to_string();
    }
    if !empty_suffix_used {
        return name_prefix.to_string();
    }

    suffixes.sort_unstable();
    let mut smallest: u64 = 2;
    for n in suffixes {
        if smallest < n {
            break;
        }
        if smallest == n {
            smallest += 1;
        }
    }
    format!("{name_prefix}{smallest}")
}

/// Sort `names` and drop adjacent duplicates.
pub fn sort_and_remove_duplicates<S: AsRef<str>>(names: &[S]) -> Vec<String> {
    let mut result: Vec<String> = names.iter().map(|s| s.as_ref().to_string()).collect();
    result.sort();
    result.dedup();
    result
}

/// Same names in the same order.
pub fn string_lists_equal<A: AsRef<str>, B: AsRef<str>>(a: &[A], b: &[B]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.as_ref() == y.as_ref())
}

#[cfg(test)]
#[path = "../tests/identifier_tests.rs"]
mod tests;
