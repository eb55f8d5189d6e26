//! `scan-file`: run the exam date extractor on a local document.

use std::path::Path;

use chrono::NaiveDateTime;
use deadlinesync_core::{Candidate, dedup_events, extract_dates, html_to_text};
use deadlinesync_providers::{PdfExtract, PdfTextExtractor};
use tracing::debug;

use crate::error::{ClientError, ClientResult};

/// Kind of local document, chosen from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Html,
    Text,
}

impl DocumentKind {
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("pdf") => Self::Pdf,
            Some("html" | "htm") => Self::Html,
            _ => Self::Text,
        }
    }
}

/// Reads a document and returns its plain text.
pub fn read_document(path: &Path, pdf: &dyn PdfTextExtractor) -> ClientResult<String> {
    let kind = DocumentKind::from_path(path);
    debug!(path = %path.display(), ?kind, "reading document");
    match kind {
        DocumentKind::Pdf => {
            let bytes = std::fs::read(path)?;
            Ok(pdf.extract(&bytes)?)
        }
        DocumentKind::Html => Ok(html_to_text(&std::fs::read_to_string(path)?)),
        DocumentKind::Text => Ok(std::fs::read_to_string(path)?),
    }
}

/// Scans a document and returns its candidates.
///
/// A document that cannot be read becomes a single error candidate, the
/// same way the syllabus walker reports a bad PDF.
pub fn scan_document(
    path: &Path,
    course: &str,
    raw: bool,
    pdf: &dyn PdfTextExtractor,
    now: NaiveDateTime,
) -> Vec<Candidate> {
    let text = match read_document(path, pdf) {
        Ok(text) => text,
        Err(e) => {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            return vec![Candidate::error(format!("PDF parse failed: {}", name), e.to_string())];
        }
    };

    let candidates = extract_dates(&text, course, now);
    if raw { candidates } else { dedup_events(candidates) }
}

/// Renders candidates as one line each.
pub fn render_candidates(candidates: &[Candidate]) -> String {
    if candidates.is_empty() {
        return "No exam dates found.".to_string();
    }
    candidates
        .iter()
        .map(|candidate| match candidate {
            Candidate::Event(event) => format!(
                "{:<14} {} - {}  ({})",
                event.title,
                event.start.format("%Y-%m-%d %H:%M"),
                event.end.format("%H:%M"),
                event.course_name
            ),
            Candidate::Error(failure) => format!("error: {}: {}", failure.title, failure.description),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Runs the `scan-file` command.
pub fn run(path: &Path, course: &str, raw: bool, json: bool, now: NaiveDateTime) -> ClientResult<()> {
    if !path.exists() {
        return Err(ClientError::Input(format!("{} does not exist", path.display())));
    }

    let candidates = scan_document(path, course, raw, &PdfExtract, now);
    if json {
        println!("{}", serde_json::to_string_pretty(&candidates)?);
    } else {
        println!("{}", render_candidates(&candidates));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 9, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn kind_from_extension() {
        assert_eq!(DocumentKind::from_path(Path::new("a/Syllabus.PDF")), DocumentKind::Pdf);
        assert_eq!(DocumentKind::from_path(Path::new("page.htm")), DocumentKind::Html);
        assert_eq!(DocumentKind::from_path(Path::new("notes")), DocumentKind::Text);
    }

    #[test]
    fn scans_a_text_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schedule.txt");
        std::fs::write(&path, "Final Exam Dec 11, 2024 2pm-3:30pm\n").unwrap();

        let candidates = scan_document(&path, "CS 101", false, &PdfExtract, now());
        assert_eq!(candidates.len(), 1);
        let event = candidates[0].as_event().unwrap();
        assert_eq!(event.title, "Final Exam");
        assert_eq!(event.course_name, "CS 101");
        assert_eq!(
            render_candidates(&candidates),
            "Final Exam     2024-12-11 14:00 - 15:30  (CS 101)"
        );
    }

    #[test]
    fn scans_an_html_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("syllabus.html");
        std::fs::write(&path, "<table><tr><td>Quiz</td><td>Sep 20, 2024</td></tr></table>").unwrap();

        let candidates = scan_document(&path, "Bio", false, &PdfExtract, now());
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].title(), "Quiz");
    }

    #[test]
    fn raw_keeps_overlapping_matches() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.txt");
        std::fs::write(&path, "intro\nMidterm Oct 10, 2024\nend").unwrap();

        assert_eq!(scan_document(&path, "C", true, &PdfExtract, now()).len(), 2);
        assert_eq!(scan_document(&path, "C", false, &PdfExtract, now()).len(), 1);
    }

    #[test]
    fn broken_pdf_becomes_an_error_candidate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, "not really a pdf").unwrap();

        let candidates = scan_document(&path, "C", false, &PdfExtract, now());
        assert_eq!(candidates.len(), 1);
        assert!(candidates[0].is_error());
        assert_eq!(candidates[0].title(), "PDF parse failed: broken.pdf");
        assert!(render_candidates(&candidates).starts_with("error: PDF parse failed"));
    }

    #[test]
    fn empty_result_message() {
        assert_eq!(render_candidates(&[]), "No exam dates found.");
    }

    #[test]
    fn missing_file_is_an_input_error() {
        let err = run(Path::new("/definitely/not/here.txt"), "C", false, false, now()).unwrap_err();
        assert!(matches!(err, ClientError::Input(_)));
    }
}
