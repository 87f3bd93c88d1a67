use pdfclip_core::batch::BatchResult;
use pdfclip_core::export::{render_outcome, CSV_HEADER};

pub fn print(result: &BatchResult) {
    print!("{}", format_result(result));
}

/// Two-column table. Multi-line text continues on indented lines under the
/// text column; failed documents are marked with `!`.
pub fn format_result(result: &BatchResult) -> String {
    let name_width = result
        .iter()
        .map(|r| display_width(&r.filename))
        .chain(std::iter::once(display_width(CSV_HEADER[0])))
        .max()
        .unwrap_or(10);

    let mut out = String::new();
    out.push_str(&format!(
        "  {}  {}\n",
        pad(CSV_HEADER[0], name_width),
        CSV_HEADER[1]
    ));
    out.push_str(&format!("  {}\n", "-".repeat(name_width + 14)));

    for record in result.iter() {
        let marker = if record.outcome.is_failure() { "!" } else { " " };
        let text = render_outcome(&record.outcome);
        let mut lines = text.lines();
        let first = lines.next().unwrap_or("");
        out.push_str(&format!(
            "{marker} {}  {}\n",
            pad(&record.filename, name_width),
            first
        ));
        for line in lines {
            out.push_str(&format!("  {}  {}\n", " ".repeat(name_width), line));
        }
    }

    out
}

/// Terminal columns: East Asian wide and fullwidth characters take two.
fn display_width(s: &str) -> usize {
    s.chars().map(|c| if is_wide(c) { 2 } else { 1 }).sum()
}

fn is_wide(c: char) -> bool {
    matches!(
        c as u32,
        0x1100..=0x115F         // Hangul Jamo initials
            | 0x2E80..=0x303E   // CJK radicals, punctuation
            | 0x3041..=0x33FF   // kana, CJK compatibility
            | 0x3400..=0x4DBF
            | 0x4E00..=0x9FFF
            | 0xA000..=0xA4CF   // Yi
            | 0xAC00..=0xD7A3   // Hangul syllables
            | 0xF900..=0xFAFF
            | 0xFE30..=0xFE4F
            | 0xFF00..=0xFF60   // fullwidth forms
            | 0xFFE0..=0xFFE6
            | 0x1F300..=0x1F64F
            | 0x1F900..=0x1F9FF
            | 0x20000..=0x2FFFD
            | 0x30000..=0x3FFFD
    )
}

fn pad(s: &str, width: usize) -> String {
    let w = display_width(s);
    format!("{s}{}", " ".repeat(width.saturating_sub(w)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdfclip_core::batch::{ExtractionOutcome, ExtractionRecord};
    use pdfclip_core::error::FailureKind;

    #[test]
    fn test_multi_line_and_failed_rows() {
        let result = BatchResult {
            records: vec![
                ExtractionRecord {
                    filename: "a.pdf".into(),
                    outcome: ExtractionOutcome::Text {
                        text: "Invoice 42\nDue 2024-05-01".into(),
                    },
                },
                ExtractionRecord {
                    filename: "b.pdf".into(),
                    outcome: ExtractionOutcome::Failed {
                        kind: FailureKind::EmptyDocument,
                        message: "document has no pages".into(),
                    },
                },
            ],
        };

        let table = format_result(&result);
        let lines: Vec<&str> = table.lines().collect();
        // header width: ファイル名 is 5 wide chars = 10 columns
        assert_eq!(lines[0], "  ファイル名  抽出テキスト");
        assert_eq!(lines[2], "  a.pdf       Invoice 42");
        assert_eq!(lines[3], "              Due 2024-05-01");
        assert_eq!(lines[4], "! b.pdf       PDFにページがありません");
    }

    #[test]
    fn test_display_width() {
        assert_eq!(display_width("請求書.pdf"), 10);
        assert_eq!(display_width("ｱｲｳ"), 3); // halfwidth katakana
        assert_eq!(display_width("€ 5 — net"), 9);
        assert_eq!(display_width("ＡＢ"), 4);
    }

    #[test]
    fn test_narrow_symbols_do_not_shift_columns() {
        let result = BatchResult {
            records: vec![
                ExtractionRecord {
                    filename: "€—report.pdf".into(),
                    outcome: ExtractionOutcome::Text { text: "A".into() },
                },
                ExtractionRecord {
                    filename: "x.pdf".into(),
                    outcome: ExtractionOutcome::Text { text: "B".into() },
                },
            ],
        };

        let table = format_result(&result);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[2], "  €—report.pdf  A");
        assert_eq!(lines[3], "  x.pdf         B");
    }
}
