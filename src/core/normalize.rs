// src/core/normalize.rs
/// Collapse every whitespace run to one ASCII space and trim the ends.
pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// Canonical form for teacher names, room tokens and free text matching.
pub fn normalize(s: &str) -> String {
    // Uppercasing can expand a char (ß -> SS) but never yields whitespace,
    // so collapsing first keeps the result stable under re-application.
    normalize_ws(s).to_uppercase()
}

/// Canonical form for class labels: `5 а` and `5А` name the same class.
pub fn class_key(s: &str) -> String {
    normalize(s).chars().filter(|c| !c.is_whitespace()).collect()
}

/// Split a compound field on `/` or `\` runs, trimming and dropping empties.
pub fn split_compound(field: &str) -> Vec<&str> {
    field
        .split(['/', '\\'])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect()
}

pub fn is_compound(field: &str) -> bool {
    split_compound(field).len() > 1
}
