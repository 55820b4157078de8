// Doc comment parsing
//
// Splits a raw `/** ... */` comment into description paragraphs and an
// optional `<code>` sample. Code samples may contain doc comments of their
// own, written escaped as `/\**` and `*\/`.

use crate::error::{Error, Result};
use regex::Regex;
use std::sync::LazyLock;

static RE_RETURN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"@return(.+)").unwrap());

const CODE_OPEN: &str = "<code>";
const CODE_CLOSE: &str = "</code>";
const ESCAPED_OPEN: &str = "/\\**";
const ESCAPED_CLOSE: &str = "*\\/";

/// A parsed doc comment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocBlock {
    /// Description paragraphs in document order
    pub description: Vec<String>,
    /// Code sample lines, indentation preserved
    pub code: Option<Vec<String>>,
}

impl DocBlock {
    /// Parse a raw doc comment.
    ///
    /// `target` names the class or `Class:method` the comment belongs to and is
    /// reported when a `<code>` segment is never closed. With
    /// `strip_annotations`, `@tag` lines are removed from the description.
    pub fn parse(raw: &str, strip_annotations: bool, target: &str) -> Result<Self> {
        let all_lines = strip_decoration(raw, false);
        let code = match code_region(&all_lines, target)? {
            Some((start, end)) => extract_code(&all_lines[start..=end]),
            None => None,
        };

        let mut prose_lines = strip_decoration(raw, strip_annotations);
        if let Some((start, end)) = code_region(&prose_lines, target)? {
            let trailing = after_close(prose_lines[end]);
            prose_lines.splice(start..=end, ["", trailing]);
        }

        Ok(Self {
            description: extract_description(&prose_lines),
            code,
        })
    }

    /// Serialize back into doc comment form
    pub fn to_comment(&self) -> String {
        let mut out = String::from("/**\n");
        for (i, paragraph) in self.description.iter().enumerate() {
            if i > 0 {
                out.push_str(" *\n");
            }
            out.push_str(&format!(" * {}\n", paragraph));
        }

        if let Some(code) = &self.code {
            if !self.description.is_empty() {
                out.push_str(" *\n");
            }
            out.push_str(&format!(" * {}\n", CODE_OPEN));
            for line in code {
                let line = match line.trim() {
                    "/**" => line.replacen("/**", ESCAPED_OPEN, 1),
                    "*/" => line.replacen("*/", ESCAPED_CLOSE, 1),
                    _ => line.clone(),
                };
                out.push_str(&format!(" *{}\n", line));
            }
            out.push_str(&format!(" * {}\n", CODE_CLOSE));
        }

        out.push_str(" */");
        out
    }
}

/// Type written on the `@return` tag
pub fn return_type(raw: &str) -> Option<String> {
    RE_RETURN
        .captures(raw)
        .map(|caps| caps[1].trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Type written on the `@param` tag for `$name`
pub fn param_type(raw: &str, name: &str) -> Option<String> {
    let re = Regex::new(&format!(r"@param(.*)\${}\b", regex::escape(name))).ok()?;
    re.captures(raw)
        .map(|caps| caps[1].trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Trim every line and drop the opening and closing comment markers
fn strip_decoration(raw: &str, strip_annotations: bool) -> Vec<&str> {
    let mut lines: Vec<&str> = raw
        .lines()
        .filter(|line| !line.is_empty())
        .map(str::trim)
        .filter(|line| !(strip_annotations && is_annotation(line)))
        .collect();

    if !lines.is_empty() {
        lines.remove(0);
    }
    lines.pop();
    lines
}

fn is_annotation(line: &str) -> bool {
    body(line).trim_start().starts_with('@')
}

/// Line content after the leading `*` continuation markers
fn body(line: &str) -> &str {
    line.trim_start_matches('*')
}

/// Locate the `<code>` .. `</code>` lines, inclusive
fn code_region(lines: &[&str], target: &str) -> Result<Option<(usize, usize)>> {
    let Some(start) = lines
        .iter()
        .position(|line| body(line).trim_start().starts_with(CODE_OPEN))
    else {
        return Ok(None);
    };

    match lines.iter().rposition(|line| line.contains(CODE_CLOSE)) {
        Some(end) if end >= start => Ok(Some((start, end))),
        _ => Err(Error::docblock(target)),
    }
}

/// Text following the last `</code>` on its line
fn after_close(line: &str) -> &str {
    line.rsplit_once(CODE_CLOSE)
        .map_or("", |(_, rest)| rest.trim())
}

fn extract_code(region: &[&str]) -> Option<Vec<String>> {
    if region.len() <= 2 {
        return None;
    }

    let code = region[1..region.len() - 1]
        .iter()
        .map(|line| {
            let line = body(line);
            match line.trim() {
                ESCAPED_OPEN => line.replacen(ESCAPED_OPEN, "/**", 1),
                ESCAPED_CLOSE => line.replacen(ESCAPED_CLOSE, "*/", 1),
                _ => line.to_string(),
            }
        })
        .collect();

    Some(code)
}

fn extract_description(lines: &[&str]) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current = String::new();

    for line in lines {
        let line = body(line);
        if line.is_empty() {
            if !current.is_empty() {
                paragraphs.push(std::mem::take(&mut current));
            }
        } else if current.is_empty() {
            current = line.trim_start().to_string();
        } else {
            // soft wrap: the continuation keeps its own leading space
            current.push_str(line);
        }
    }

    if !current.is_empty() {
        paragraphs.push(current);
    }

    // leftovers of a stripped `@return TYPE` line
    let skip = paragraphs
        .iter()
        .take_while(|p| p.is_empty() || is_bare_type_name(p))
        .count();
    paragraphs.split_off(skip)
}

fn is_bare_type_name(text: &str) -> bool {
    !text.is_empty()
        && text
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '\\')
}
