/// Text of line `lno` (1-based) without its terminator; empty past the end.
pub fn source_line(input: &str, lno: usize) -> &str {
    input.lines()
         .nth(lno.saturating_sub(1))
         .unwrap_or("")
}

/// Short description of a lexeme for diagnostics.
pub fn describe(lexeme: &str) -> String {
    if lexeme.is_empty() {
        String::from("end of input")
    }
    else if lexeme.starts_with('\'') {
        format!("string {}", lexeme)
    }
    else {
        format!("'{}'", lexeme)
    }
}
