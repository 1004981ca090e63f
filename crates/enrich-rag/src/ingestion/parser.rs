//! Text extraction for uploaded files

use calamine::Reader;
use std::io::Cursor;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crate::error::{Error, Result};

const PDF: &str = "application/pdf";
const TEXT: &str = "text/plain";
const CSV: &str = "text/csv";
const DOCX: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
const XLSX: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
const XLS: &str = "application/vnd.ms-excel";

/// How long pdf-extract may run before the upload is failed
const PDF_TIMEOUT: Duration = Duration::from_secs(60);

/// Run an extractor on its own thread with a deadline
///
/// Panics inside the extractor become parse errors for this file only.
fn run_guarded<F>(filename: &str, timeout: Duration, extract: F) -> Result<String>
where
    F: FnOnce() -> std::result::Result<String, String> + Send + 'static,
{
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let outcome = panic::catch_unwind(AssertUnwindSafe(extract))
            .unwrap_or_else(|_| Err("extractor panicked on malformed input".to_string()));
        let _ = tx.send(outcome);
    });

    match rx.recv_timeout(timeout) {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(message)) => Err(Error::file_parse(filename, message)),
        Err(mpsc::RecvTimeoutError::Timeout) => {
            tracing::error!("Extraction of {} timed out after {:?}", filename, timeout);
            Err(Error::file_parse(filename, "extraction timed out"))
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => {
            Err(Error::file_parse(filename, "extraction thread crashed"))
        }
    }
}

/// Content-type driven text extractor
pub struct FileParser;

impl FileParser {
    /// Resolve the effective content type, guessing from the filename when
    /// the client sent nothing useful
    pub fn resolve_content_type(filename: &str, declared: &str) -> String {
        let declared = declared.split(';').next().unwrap_or("").trim();
        if declared.is_empty() || declared == "application/octet-stream" {
            mime_guess::from_path(filename)
                .first_raw()
                .unwrap_or("application/octet-stream")
                .to_string()
        } else {
            declared.to_string()
        }
    }

    /// Extract plain text from file bytes
    pub fn extract(filename: &str, content_type: &str, data: &[u8]) -> Result<String> {
        match content_type {
            PDF => Self::parse_pdf(filename, data),
            TEXT => Ok(String::from_utf8_lossy(data).into_owned()),
            DOCX => Self::parse_docx(filename, data),
            XLSX | XLS => Self::parse_xlsx(filename, data),
            CSV => Self::parse_csv(filename, data),
            other => Err(Error::UnsupportedFileType(other.to_string())),
        }
    }

    /// Run pdf-extract on a worker thread so a pathological font cannot hang the upload
    fn parse_pdf(filename: &str, data: &[u8]) -> Result<String> {
        let data_vec = data.to_vec();
        let text = run_guarded(filename, PDF_TIMEOUT, move || {
            pdf_extract::extract_text_from_mem(&data_vec).map_err(|e| e.to_string())
        })?;
        Ok(cleanup_pdf_text(&text))
    }

    fn parse_docx(filename: &str, data: &[u8]) -> Result<String> {
        let doc = docx_rs::read_docx(data).map_err(|e| Error::file_parse(filename, e.to_string()))?;

        let mut content = String::new();
        for child in doc.document.children {
            if let docx_rs::DocumentChild::Paragraph(p) = child {
                for child in p.children {
                    if let docx_rs::ParagraphChild::Run(run) = child {
                        for child in run.children {
                            if let docx_rs::RunChild::Text(t) = child {
                                content.push_str(&t.text);
                            }
                        }
                    }
                }
                content.push('\n');
            }
        }

        Ok(content)
    }

    fn parse_xlsx(filename: &str, data: &[u8]) -> Result<String> {
        let mut workbook = calamine::open_workbook_auto_from_rs(Cursor::new(data))
            .map_err(|e| Error::file_parse(filename, e.to_string()))?;

        let mut content = String::new();
        for sheet_name in workbook.sheet_names().to_vec() {
            content.push_str(&format!("Sheet: {}\n", sheet_name));

            if let Ok(range) = workbook.worksheet_range(&sheet_name) {
                for row in range.rows() {
                    let cells: Vec<String> = row
                        .iter()
                        .map(|cell| match cell {
                            calamine::Data::Empty => String::new(),
                            calamine::Data::String(s) => s.clone(),
                            calamine::Data::Float(f) => f.to_string(),
                            calamine::Data::Int(i) => i.to_string(),
                            calamine::Data::Bool(b) => b.to_string(),
                            calamine::Data::DateTime(dt) => dt.to_string(),
                            _ => String::new(),
                        })
                        .collect();
                    content.push_str(&cells.join(" "));
                    content.push('\n');
                }
            }
        }

        Ok(content)
    }

    fn parse_csv(filename: &str, data: &[u8]) -> Result<String> {
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(data);
        let mut content = String::new();

        let headers = reader
            .headers()
            .map_err(|e| Error::file_parse(filename, e.to_string()))?;
        content.push_str(&headers.iter().collect::<Vec<_>>().join(" | "));
        content.push('\n');

        for record in reader.records() {
            let record = record.map_err(|e| Error::file_parse(filename, e.to_string()))?;
            content.push_str(&record.iter().collect::<Vec<_>>().join(" | "));
            content.push('\n');
        }

        Ok(content)
    }
}

/// Normalize typographic characters pdf-extract tends to emit and drop blank lines
fn cleanup_pdf_text(text: &str) -> String {
    text.replace('\0', "")
        .replace(['\u{2010}', '\u{2011}', '\u{2013}'], "-")
        .replace(['\u{2018}', '\u{2019}'], "'")
        .replace(['\u{201C}', '\u{201D}'], "\"")
        .replace('\u{00A0}', " ")
        .replace('\u{FB01}', "fi")
        .replace('\u{FB02}', "fl")
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_content_type_guesses_from_filename() {
        assert_eq!(FileParser::resolve_content_type("a.csv", ""), "text/csv");
        assert_eq!(
            FileParser::resolve_content_type("notes.txt", "application/octet-stream"),
            "text/plain"
        );
        assert_eq!(
            FileParser::resolve_content_type("a.txt", "text/plain; charset=utf-8"),
            "text/plain"
        );
        assert_eq!(FileParser::resolve_content_type("a.pdf", PDF), PDF);
    }

    #[test]
    fn test_extract_text_and_csv() {
        let text = FileParser::extract("a.txt", TEXT, b"hello world").unwrap();
        assert_eq!(text, "hello world");

        let csv = FileParser::extract("a.csv", CSV, b"name,qty\nbolts,10\nnuts,4\n").unwrap();
        assert_eq!(csv, "name | qty\nbolts | 10\nnuts | 4\n");
    }

    #[test]
    fn test_unsupported_type() {
        let err = FileParser::extract("a.png", "image/png", b"").unwrap_err();
        assert!(matches!(err, Error::UnsupportedFileType(t) if t == "image/png"));
    }

    #[test]
    fn test_garbage_docx_is_parse_error() {
        let err = FileParser::extract("a.docx", DOCX, b"not a zip").unwrap_err();
        assert!(matches!(err, Error::FileParse { .. }));
    }

    #[test]
    fn test_panicking_extractor_is_parse_error() {
        let err = run_guarded("bad.pdf", Duration::from_secs(5), || -> std::result::Result<String, String> {
            panic!("malformed xref table")
        })
        .unwrap_err();
        assert!(matches!(err, Error::FileParse { filename, .. } if filename == "bad.pdf"));
    }

    #[test]
    fn test_slow_extractor_times_out() {
        let err = run_guarded("slow.pdf", Duration::from_millis(20), || {
            thread::sleep(Duration::from_millis(500));
            Ok(String::new())
        })
        .unwrap_err();
        assert!(err.to_string().contains("timed out"));
    }

    #[test]
    fn test_garbage_pdf_is_parse_error() {
        let err = FileParser::extract("a.pdf", PDF, b"%PDF-1.4 truncated").unwrap_err();
        assert!(matches!(err, Error::FileParse { .. }));
    }

    #[test]
    fn test_cleanup_pdf_text() {
        let cleaned = cleanup_pdf_text("  \u{201C}Hi\u{201D}  \n\n\u{FB01}ne\0 ");
        assert_eq!(cleaned, "\"Hi\"\nfine");
    }
}
