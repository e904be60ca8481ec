//! Pretty error reporting using ariadne
//!
//! Document errors are labelled at their byte span; generation faults are
//! labelled at the offending block's id inside the JSON document.

use std::ops::Range;

use ariadne::{Color, Config, IndexType, Label, Report, ReportKind, Source};
use crate::errors::BlockgenError;

/// Print an error with source context
pub fn print_error(source: &str, filename: &str, error: &BlockgenError) {
    eprint!("{}", format_error(source, filename, error));
}

/// Format an error as a string
pub fn format_error(source: &str, filename: &str, error: &BlockgenError) -> String {
    let (kind, message) = match error {
        BlockgenError::Document { message, .. } => ("Document error", message.clone()),
        BlockgenError::Config { message } => return format!("{}: config error: {}\n", filename, message),
        BlockgenError::CodeGen { message, .. } => ("Code generation error", message.clone()),
        BlockgenError::UnknownBlock { .. } => ("Code generation error", error.to_string()),
        BlockgenError::DuplicateHandler { .. } => return format!("{}: {}\n", filename, error),
        BlockgenError::Io(e) => return format!("{}: IO error: {}\n", filename, e),
    };

    let span = error
        .span()
        .map(Range::from)
        .or_else(|| error.block_id().and_then(|id| locate_block_id(source, id)));

    // Spans are byte offsets into the JSON text.
    let mut report = Report::build(ReportKind::Error, span.clone().unwrap_or(0..0))
        .with_config(Config::default().with_index_type(IndexType::Byte))
        .with_message(format!("{}: {}", kind, message));

    if let Some(range) = span {
        report = report.with_label(
            Label::new(range)
                .with_message(&message)
                .with_color(Color::Red),
        );
    }

    let mut output = Vec::new();
    if report.finish().write(Source::from(source), &mut output).is_err() {
        return format!("{}: {}: {}\n", filename, kind, message);
    }
    String::from_utf8_lossy(&output).into_owned()
}

/// Find the byte range of a block id string literal in the document
fn locate_block_id(source: &str, id: &str) -> Option<Range<usize>> {
    let needle = format!("\"{}\"", id);
    let mut from = 0;
    while let Some(found) = source[from..].find(&needle) {
        let start = from + found;
        // Only accept occurrences that are the value of an "id" key.
        let before = source[..start].trim_end();
        if let Some(before) = before.strip_suffix(':') {
            if before.trim_end().ends_with("\"id\"") {
                return Some(start..start + needle.len());
            }
        }
        from = start + needle.len();
    }
    None
}

/// Get the byte offset of a 1-based line and column
pub fn line_col_to_offset(source: &str, line: usize, col: usize) -> usize {
    let mut offset = 0;
    for (index, text) in source.split_inclusive('\n').enumerate() {
        if index + 1 == line {
            let within = text
                .char_indices()
                .nth(col.saturating_sub(1))
                .map(|(i, _)| i)
                .unwrap_or(text.len());
            return offset + within;
        }
        offset += text.len();
    }
    source.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_col_to_offset() {
        let source = "line1\nline2\nline3";

        assert_eq!(line_col_to_offset(source, 1, 1), 0);
        assert_eq!(line_col_to_offset(source, 2, 1), 6);
        assert_eq!(line_col_to_offset(source, 3, 3), 14);
        assert_eq!(line_col_to_offset(source, 9, 1), source.len());
    }

    #[test]
    fn test_locate_block_id() {
        let source = r#"{"type": "x", "id": "abc", "fields": {"NAME": "abc"}}"#;
        let range = locate_block_id(source, "abc").unwrap();
        assert_eq!(&source[range], "\"abc\"");
        assert_eq!(locate_block_id(source, "zzz"), None);

        // A field value with the same text is not mistaken for the id.
        let source = r#"{"fields": {"NAME": "abc"}, "id" : "abc"}"#;
        let range = locate_block_id(source, "abc").unwrap();
        assert_eq!(range.start, source.rfind("\"abc\"").unwrap());
    }

    #[test]
    fn test_format_codegen_error_mentions_message() {
        let source = r#"{"type": "controls_flow_statements", "id": "f1"}"#;
        let err = BlockgenError::codegen("Unknown flow statement 'RETURN'", "f1");
        let text = format_error(source, "prog.json", &err);
        assert!(text.contains("Unknown flow statement 'RETURN'"));
    }

    #[test]
    fn test_label_lands_on_block_id_after_multibyte_text() {
        // Line 1 holds 9 three-byte characters before the id on line 2.
        let source = "{\"blocks\": [{\"type\": \"text\", \"id\": \"t\", \"fields\": {\"TEXT\": \"こんにちは世界です\"}},\n\
                      {\"type\": \"controls_flow_statements\", \"id\": \"bad\",\n\
                      \"fields\": {\"FLOW\": \"RETURN\"}}]}";
        let err = BlockgenError::codegen("Unknown flow statement 'RETURN'", "bad");
        let start = source.find("\"bad\"").unwrap();
        let column = source[..start].rsplit('\n').next().unwrap().chars().count() + 1;

        let text = format_error(source, "prog.json", &err);
        assert!(text.contains(&format!(":2:{}", column)), "wrong location in:\n{}", text);
        assert!(!text.contains(":3:"));
    }
}
