//! Document ingestion for PBLForge: format dispatch, text extraction,
//! and the file-staging queue.
//!
//! Accepted upload formats: plain text, Markdown, CSV (all treated as
//! text), PDF, and Word `.docx`. Unrecognized formats take the
//! plain-text path by policy.

pub mod format;
pub mod parsers;
pub mod staging;

pub use format::DocumentFormat;
pub use parsers::{DefaultParsers, DocumentParser, UploadedFile};
pub use staging::{StagedFile, StagedStatus, StagingQueue};
