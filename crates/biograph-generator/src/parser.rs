//! Pull a Cypher statement out of a model response

/// Keywords a read-only statement may start with
const STATEMENT_STARTS: &[&str] = &[
    "MATCH", "OPTIONAL", "WITH", "UNWIND", "CALL", "RETURN", "EXPLAIN", "PROFILE", "USE",
];

/// Extract the Cypher statement from a model response
///
/// Looks, in order, inside fenced code blocks, after a `Cypher:` marker, and
/// anywhere in the response for the first line starting with a read clause.
/// The statement runs from that line to the next blank line, fence or end of
/// text. A trailing semicolon is dropped. Returns `None` when nothing looks
/// like a statement.
pub fn extract_cypher(response: &str) -> Option<String> {
    fenced_blocks(response)
        .into_iter()
        .chain(after_marker(response))
        .chain(std::iter::once(response))
        .find_map(statement_in)
}

/// Contents of every ``` fenced block, language tag removed
fn fenced_blocks(text: &str) -> Vec<&str> {
    let mut blocks = Vec::new();
    let mut rest = text;
    while let Some(open) = rest.find("```") {
        let after_open = &rest[open + 3..];
        let body = match after_open.split_once('\n') {
            Some((tag, body)) if is_language_tag(tag) => body,
            _ => after_open,
        };
        match body.find("```") {
            Some(close) => {
                blocks.push(&body[..close]);
                rest = &body[close + 3..];
            }
            None => {
                blocks.push(body);
                break;
            }
        }
    }
    blocks
}

/// Whether the text after an opening fence is a language tag such as `cypher`
///
/// Anything else, including a bare clause keyword, is part of the statement.
fn is_language_tag(line: &str) -> bool {
    let tag = line.trim();
    tag.is_empty()
        || (tag
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '+'))
            && !starts_statement(tag))
}

/// Text following the last `Cypher:` marker
fn after_marker(text: &str) -> Option<&str> {
    let lowered = text.to_ascii_lowercase();
    lowered.rfind("cypher:").map(|i| &text[i + "cypher:".len()..])
}

fn statement_in(region: &str) -> Option<String> {
    let mut lines = region.lines().skip_while(|line| !starts_statement(line));

    let first = lines.next()?;
    let mut statement = vec![first.trim_end()];
    for line in lines {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with("```") {
            break;
        }
        statement.push(line.trim_end());
    }

    let text = statement.join("\n");
    let text = text.trim().trim_end_matches(';').trim_end();
    (!text.is_empty()).then(|| text.to_string())
}

fn starts_statement(line: &str) -> bool {
    let trimmed = line.trim_start();
    STATEMENT_STARTS.iter().any(|keyword| {
        trimmed.len() >= keyword.len()
            && trimmed.is_char_boundary(keyword.len())
            && trimmed[..keyword.len()].eq_ignore_ascii_case(keyword)
            && trimmed[keyword.len()..]
                .chars()
                .next()
                .is_none_or(|c| !(c.is_alphanumeric() || c == '_'))
    })
}
