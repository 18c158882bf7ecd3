//! Document loading and structure

pub mod markdown;
pub mod model;

pub use markdown::{load_document, parse_document};
pub use model::{
    Block, ChapterEntry, ContentKind, ContentNode, Document, Fragment, LinkMarks, SectionEntry,
    Topic, TopicLink,
};

use thiserror::Error;

/// Errors raised while loading a document
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The document file could not be read
    #[error("Failed to read document {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The document has nothing to navigate
    #[error("Document has no chapters (start one with a '# ' heading)")]
    NoChapters,
}
