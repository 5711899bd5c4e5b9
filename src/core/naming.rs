//! Conversion of underscore-separated identifiers to Go mixedCaps.

const SEPARATOR: char = '_';

/// Returns `name` in mixedCaps form, or `name` itself when it needs no change.
///
/// The case of the first character is preserved so that an exported name
/// stays exported and an unexported one stays unexported. Every later term
/// is capitalised and the rest of each term is lowercased, so both
/// `ONE_TWO_THREE` and `one_two_three` collapse to the same spelling apart
/// from the leading letter. A word without separators is only touched when
/// it is written entirely in capitals (`ALLCAPS` becomes `Allcaps`).
pub fn rename(name: &str) -> String {
    if name.is_empty() {
        return String::new();
    }

    if !name.contains(SEPARATOR) {
        if is_shouting(name) {
            return capitalize(name);
        }
        return name.to_string();
    }

    let start_cap = name.chars().next().map(char::is_uppercase).unwrap_or(false);

    let mut renamed = String::with_capacity(name.len());
    for term in name.split(SEPARATOR).filter(|term| !term.is_empty()) {
        if renamed.is_empty() && !start_cap {
            renamed.extend(term.chars().flat_map(char::to_lowercase));
        } else {
            renamed.push_str(&capitalize(term));
        }
    }

    // Nothing but separators: leave the identifier alone.
    if renamed.is_empty() {
        return name.to_string();
    }
    renamed
}

/// Reports whether `name` would change under [`rename`].
pub fn needs_rename(name: &str) -> bool {
    rename(name) != name
}

fn capitalize(term: &str) -> String {
    let mut chars = term.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// At least two cased letters, none of them lowercase.
fn is_shouting(word: &str) -> bool {
    let mut cased = 0usize;
    for c in word.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            cased += 1;
        }
    }
    cased >= 2
}
