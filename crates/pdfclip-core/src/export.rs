//! Tabular export of a [`BatchResult`].
//!
//! The CSV layout is fixed for compatibility with files produced by earlier
//! versions of the tool: UTF-8 without BOM, `\n` line endings, a Japanese
//! header row, and failures written into the text column.

use std::io::Write;

use crate::batch::{BatchResult, ExtractionOutcome};
use crate::error::FailureKind;

pub const CSV_HEADER: [&str; 2] = ["ファイル名", "抽出テキスト"];

const EMPTY_DOCUMENT_TEXT: &str = "PDFにページがありません";
const ERROR_PREFIX: &str = "エラー: ";

/// Text shown for an outcome in a table cell.
pub fn render_outcome(outcome: &ExtractionOutcome) -> String {
    match outcome {
        ExtractionOutcome::Text { text } => text.clone(),
        ExtractionOutcome::Failed {
            kind: FailureKind::EmptyDocument,
            ..
        } => EMPTY_DOCUMENT_TEXT.to_string(),
        ExtractionOutcome::Failed { message, .. } => format!("{ERROR_PREFIX}{message}"),
    }
}

pub fn write_csv<W: Write>(result: &BatchResult, mut out: W) -> std::io::Result<()> {
    write_row(&mut out, &CSV_HEADER)?;
    for record in result.iter() {
        let text = render_outcome(&record.outcome);
        write_row(&mut out, &[record.filename.as_str(), text.as_str()])?;
    }
    out.flush()
}

pub fn to_csv_string(result: &BatchResult) -> String {
    let mut buf = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = write_csv(result, &mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}

fn write_row<W: Write>(out: &mut W, fields: &[&str]) -> std::io::Result<()> {
    let line: Vec<String> = fields.iter().map(|f| quote_field(f)).collect();
    writeln!(out, "{}", line.join(","))
}

/// Quote a field only when it contains a delimiter, quote or line break.
fn quote_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::ExtractionRecord;
    use pretty_assertions::assert_eq;

    fn record(filename: &str, outcome: ExtractionOutcome) -> ExtractionRecord {
        ExtractionRecord {
            filename: filename.to_string(),
            outcome,
        }
    }

    #[test]
    fn test_csv_layout_and_quoting() {
        let result = BatchResult {
            records: vec![
                record(
                    "a.pdf",
                    ExtractionOutcome::Text {
                        text: "INV-0042".into(),
                    },
                ),
                record(
                    "b, final.pdf",
                    ExtractionOutcome::Text {
                        text: "say \"hi\"\nsecond line".into(),
                    },
                ),
                record("c.pdf", ExtractionOutcome::Text { text: String::new() }),
            ],
        };

        let csv = to_csv_string(&result);
        assert_eq!(
            csv,
            "ファイル名,抽出テキスト\n\
             a.pdf,INV-0042\n\
             \"b, final.pdf\",\"say \"\"hi\"\"\nsecond line\"\n\
             c.pdf,\n"
        );
    }

    #[test]
    fn test_failures_render_legacy_text() {
        let empty = ExtractionOutcome::Failed {
            kind: FailureKind::EmptyDocument,
            message: "document has no pages".into(),
        };
        assert_eq!(render_outcome(&empty), "PDFにページがありません");

        let malformed = ExtractionOutcome::Failed {
            kind: FailureKind::MalformedDocument,
            message: "malformed PDF: Couldn't read xref table".into(),
        };
        assert_eq!(
            render_outcome(&malformed),
            "エラー: malformed PDF: Couldn't read xref table"
        );
    }
}
