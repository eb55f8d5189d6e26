//! Course sources, document conversion and calendar targets.
//!
//! This crate connects the syllabus scanner in `deadlinesync-core` to the
//! outside world:
//!
//! - [`CourseSource`] - The learning platform (Canvas) the deadlines come from
//! - [`PdfTextExtractor`] - PDF to text conversion
//! - [`scan_syllabus_for_dates`] - Walks a course's syllabus body and schedule PDFs
//! - [`collect_deadlines`] - Aggregates assignments, events and syllabus dates
//! - [`CalendarTarget`] / [`upsert_items`] - Writes items to a calendar without duplicates
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐
//! │   Canvas API    │    │   PDF bytes     │
//! └────────┬────────┘    └────────┬────────┘
//!          │ CourseSource         │ PdfTextExtractor
//!          └──────────┬───────────┘
//!                     ▼
//!          ┌─────────────────────┐
//!          │  collect_deadlines  │──▶ extract_dates (core)
//!          └──────────┬──────────┘
//!                     ▼ Vec<DeadlineItem>
//!          ┌─────────────────────┐
//!          │    upsert_items     │
//!          └──────────┬──────────┘
//!                     ▼ CalendarTarget
//!          MemoryTarget / IcsFileTarget
//! ```

pub mod aggregate;
pub mod calendar;
#[cfg(feature = "canvas")]
pub mod canvas;
pub mod error;
pub mod pdf;
pub mod source;
pub mod syllabus;

// Re-export main types at crate root
pub use aggregate::{CollectOptions, DeadlineReport, collect_deadlines};
pub use calendar::{
    CalendarTarget, EventPayload, IcsFileTarget, MemoryTarget, SyncReport, UpsertOptions,
    stable_uid, upsert_items,
};
pub use error::{ProviderError, ProviderErrorCode, ProviderResult};
#[cfg(feature = "pdf")]
pub use pdf::PdfExtract;
pub use pdf::PdfTextExtractor;
pub use source::{
    Assignment, BoxFuture, Course, CourseDetails, CourseEvent, CourseFile, CourseSource,
};
pub use syllabus::{MAX_SYLLABUS_PDFS, SYLLABUS_FILE_KEYWORDS, scan_syllabus_for_dates};
