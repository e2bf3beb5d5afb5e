use serde_json::{Map, Value};

/// Split optional YAML front-matter from a document body.
///
/// Front-matter is recognized only when the document's very first line is
/// exactly `---`; a `---` line further down is a horizontal rule. The block
/// is used only when it parses to a non-empty mapping. Every other case
/// (unterminated block, parse error, scalar/sequence/empty result) falls back
/// to returning the raw text untouched, so callers always get readable body
/// content no matter how mangled the document is.
pub fn split_frontmatter(raw: &str) -> (Option<Map<String, Value>>, String) {
    let Some(rest) = strip_open_delimiter(raw) else {
        return (None, raw.to_string());
    };

    let Some((yaml_end, body_start)) = find_close_delimiter(rest) else {
        // Unterminated block: never emit a partial parse.
        return (None, raw.to_string());
    };

    match serde_yaml::from_str::<Value>(&rest[..yaml_end]) {
        Ok(Value::Object(map)) if !map.is_empty() => {
            let body = rest[body_start..].trim_start_matches(['\r', '\n']).to_string();
            (Some(map), body)
        }
        _ => (None, raw.to_string()),
    }
}

fn strip_open_delimiter(raw: &str) -> Option<&str> {
    raw.strip_prefix("---\n")
        .or_else(|| raw.strip_prefix("---\r\n"))
}

/// Locate the closing `---` line, returning (end of the YAML text, start of
/// the body). Also accepts a bare `---` at end of input.
fn find_close_delimiter(rest: &str) -> Option<(usize, usize)> {
    rest.find("\n---\n")
        .map(|idx| (idx, idx + 5))
        .or_else(|| rest.find("\n---\r\n").map(|idx| (idx, idx + 6)))
        .or_else(|| {
            rest.ends_with("\n---")
                .then(|| (rest.len() - 4, rest.len()))
        })
}
