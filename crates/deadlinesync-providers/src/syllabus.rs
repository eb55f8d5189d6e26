//! Syllabus scanning across a course's documents.
//!
//! The walker reads the syllabus HTML first, then up to
//! [`MAX_SYLLABUS_PDFS`] schedule-like PDF files in listing order. Each PDF
//! is handled on its own: a download or conversion failure becomes a single
//! error candidate and the walk carries on.

use chrono::NaiveDateTime;
use deadlinesync_core::{Candidate, extract_dates, html_to_text};
use tracing::{debug, info, warn};

use crate::error::ProviderResult;
use crate::pdf::PdfTextExtractor;
use crate::source::{CourseFile, CourseSource};

/// File name keywords that mark a PDF as worth scanning.
pub const SYLLABUS_FILE_KEYWORDS: [&str; 7] = [
    "syllabus", "schedule", "exam", "midterm", "final", "outline", "calendar",
];

/// Maximum number of PDFs scanned per course.
pub const MAX_SYLLABUS_PDFS: usize = 5;

/// Scans a course's syllabus body and schedule PDFs for exam dates.
///
/// # Errors
///
/// Fails only if the course itself cannot be fetched. File listing failures
/// are treated as an empty listing and per-PDF failures become
/// [`Candidate::Error`] entries.
pub async fn scan_syllabus_for_dates(
    source: &dyn CourseSource,
    pdf: &dyn PdfTextExtractor,
    course_id: u64,
    now: NaiveDateTime,
) -> ProviderResult<Vec<Candidate>> {
    let course = source.fetch_course(course_id).await?;
    let mut results = Vec::new();

    if let Some(html) = course.syllabus_body.as_deref().filter(|body| !body.is_empty()) {
        let text = html_to_text(html);
        let found = extract_dates(&text, &course.name, now);
        debug!(course_id, candidates = found.len(), "Scanned syllabus body");
        results.extend(found);
    }

    let files = match source.list_files(course_id).await {
        Ok(files) => files,
        Err(e) => {
            warn!(course_id, error = %e, "Could not list course files");
            Vec::new()
        }
    };

    for file in select_syllabus_pdfs(files) {
        let name = file.name();
        match read_pdf(source, pdf, &file).await {
            Ok(text) => {
                let found = extract_dates(&text, &course.name, now);
                debug!(course_id, file = %name, candidates = found.len(), "Scanned PDF");
                results.extend(found);
            }
            Err(e) => {
                warn!(course_id, file = %name, error = %e, "PDF parse failed");
                results.push(Candidate::error(
                    format!("PDF parse failed: {}", name),
                    e.to_string(),
                ));
            }
        }
    }

    info!(
        course_id,
        course = %course.name,
        candidates = results.len(),
        "Syllabus scan complete"
    );
    Ok(results)
}

/// Keeps schedule-like PDFs, capped at [`MAX_SYLLABUS_PDFS`], in listing order.
pub fn select_syllabus_pdfs(files: Vec<CourseFile>) -> Vec<CourseFile> {
    files
        .into_iter()
        .filter(|file| file.is_pdf() && file.name_matches(&SYLLABUS_FILE_KEYWORDS))
        .take(MAX_SYLLABUS_PDFS)
        .collect()
}

async fn read_pdf(
    source: &dyn CourseSource,
    pdf: &dyn PdfTextExtractor,
    file: &CourseFile,
) -> ProviderResult<String> {
    let bytes = source.download_file(file).await?;
    pdf.extract(&bytes)
}
