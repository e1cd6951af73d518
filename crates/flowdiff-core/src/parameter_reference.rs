//! Parameter reference tokens embedded in property values
//!
//! `#{name}` references a parameter. Names are letters, digits, spaces,
//! `.`, `_` and `-`; `#{'quoted name'}` allows anything except `'`.
//! A run of `#` before `{` escapes in pairs: `##{x}` is the literal
//! text `#{x}`, `###{x}` is a literal `#` followed by a reference.

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, ' ' | '.' | '_' | '-')
}

/// Names of all parameters referenced by `text`, in order of appearance
pub fn parameter_references(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut refs = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'#' {
            i += 1;
            continue;
        }

        let run_start = i;
        while i < bytes.len() && bytes[i] == b'#' {
            i += 1;
        }
        let run = i - run_start;

        if i >= bytes.len() || bytes[i] != b'{' || run % 2 == 0 {
            continue;
        }

        // i points at '{'
        let body = &text[i + 1..];
        match parse_reference_body(body) {
            Some((name, consumed)) => {
                refs.push(name);
                i += 1 + consumed;
            }
            None => i += 1,
        }
    }

    refs
}

/// Parse `name}` or `'quoted'}` at the start of `body`.
/// Returns the name and the number of bytes consumed including `}`.
fn parse_reference_body(body: &str) -> Option<(&str, usize)> {
    if let Some(rest) = body.strip_prefix('\'') {
        let close = rest.find('\'')?;
        if !rest[close + 1..].starts_with('}') || close == 0 {
            return None;
        }
        return Some((&rest[..close], close + 3));
    }

    let close = body.find('}')?;
    let name = &body[..close];
    if name.is_empty() || !name.chars().all(is_name_char) {
        return None;
    }
    Some((name, close + 1))
}
