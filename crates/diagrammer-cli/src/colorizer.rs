//! Terminal colorization for diagram dumps
//!
//! Applies ANSI escape codes to the text dump using crossterm.

use crossterm::style::{Color, Stylize};

/// Colorize a text dump using ANSI escape codes
///
/// - Element ids (`n3`, `e7`): Cyan
/// - Edge arrows: Yellow
/// - Quoted names and labels: Green
/// - The summary line and trailing notes: Bold
pub fn colorize_output(input: &str) -> String {
    let mut result = String::with_capacity(input.len() * 2);

    for (index, line) in input.lines().enumerate() {
        if index == 0 || line.starts_with("selected:") || line.starts_with("rejected steps:") {
            result.push_str(&format!("{}", line.bold()));
        } else {
            colorize_line(line, &mut result);
        }
        result.push('\n');
    }

    if !input.ends_with('\n') && result.ends_with('\n') {
        result.pop();
    }
    result
}

fn colorize_line(line: &str, out: &mut String) {
    let mut rest = line;
    while !rest.is_empty() {
        if let Some(stripped) = rest.strip_prefix('"') {
            let end = stripped.find('"').map_or(stripped.len(), |i| i + 1);
            let quoted = &rest[..end + 1];
            out.push_str(&format!("{}", quoted.with(Color::Green)));
            rest = &rest[quoted.len()..];
            continue;
        }
        let token_len = rest
            .find(|c: char| c == ' ' || c == '"')
            .map_or(rest.len(), |i| i.max(1));
        let token = &rest[..token_len];
        if token == "->" {
            out.push_str(&format!("{}", token.with(Color::Yellow)));
        } else if is_element_id(token) {
            out.push_str(&format!("{}", token.with(Color::Cyan)));
        } else {
            out.push_str(token);
        }
        rest = &rest[token_len..];
    }
}

fn is_element_id(token: &str) -> bool {
    let mut chars = token.chars();
    matches!(chars.next(), Some('n' | 'e'))
        && token.len() > 1
        && chars.all(|c| c.is_ascii_digit())
}
