//! Environment-variable expansion for model-config credential fields (spec
//! §3, §6: `$NAME` or `${NAME}`; unresolved references become the empty
//! string; a bare `$` not followed by an identifier is left untouched).

/// Pure function: substitutes every `$NAME`/`${NAME}` reference in `input`
/// by calling `lookup`. Kept independent of `std::env` so it is trivially
/// testable and so callers can layer a different source (e.g. a `.env`
/// map) without going through process environment at all.
pub fn expand(input: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(input.len());
    let chars: Vec<char> = input.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        if chars[i] != '$' {
            out.push(chars[i]);
            i += 1;
            continue;
        }
        if i + 1 < chars.len() && chars[i + 1] == '{' {
            let start = i + 2;
            let mut j = start;
            while j < chars.len() && chars[j] != '}' {
                j += 1;
            }
            if j < chars.len() {
                let name: String = chars[start..j].iter().collect();
                out.push_str(&lookup(&name).unwrap_or_default());
                i = j + 1;
                continue;
            }
            // Unterminated `${...}`: pass through literally.
            out.push('$');
            i += 1;
            continue;
        }
        if i + 1 < chars.len() && is_ident_start(chars[i + 1]) {
            let start = i + 1;
            let mut j = start;
            while j < chars.len() && is_ident_continue(chars[j]) {
                j += 1;
            }
            let name: String = chars[start..j].iter().collect();
            out.push_str(&lookup(&name).unwrap_or_default());
            i = j;
            continue;
        }
        // Bare `$` not followed by an identifier: literal.
        out.push('$');
        i += 1;
    }
    out
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Expands against the real process environment.
pub fn expand_from_process_env(input: &str) -> String {
    expand(input, |name| std::env::var(name).ok())
}
