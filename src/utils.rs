use std::fmt::Display;

/// Leading whitespace for a line nested `depth` levels deep.
pub fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Quote a string for output. `"` is the only character the lexer knows how
/// to unescape, so it is the only one escaped here.
pub fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\\\""))
}

/// Fixed-point float text. With a precision the value is rounded to that
/// many decimals, otherwise the shortest text that reads back to the same
/// value is used.
pub fn format_float<T: Display>(value: T, precision: Option<usize>) -> String {
    match precision {
        Some(p) => format!("{:.*}", p, value),
        None => format!("{}", value),
    }
}
