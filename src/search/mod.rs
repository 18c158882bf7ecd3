//! In-page search with highlighting
//!
//! Highlighting is a pure transform over a content node's markup: matches
//! are split out into [`Fragment::Highlight`] pieces, and clearing merges
//! every fragment back into plain text. Each search clears the previous
//! highlights before applying new ones, so repeated searches never nest.

mod highlight;

pub use highlight::{clear_highlights, highlight, plain_text};

use regex::{Regex, RegexBuilder};

use crate::document::Document;
use crate::nav::ScrollRequest;

/// A highlighted occurrence: the block holding it and its position there
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchLocation {
    /// Index of the content block in the document
    pub block: usize,
    /// Index of the occurrence among that block's highlights
    pub occurrence: usize,
}

/// Result of a search invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Blank term; nothing was touched
    Skipped,
    /// At least one occurrence was highlighted
    Found {
        first: MatchLocation,
        total: usize,
        /// Bring the first occurrence into centered view
        scroll: ScrollRequest,
    },
    /// No content node contains the term; prior highlights were cleared
    NotFound { term: String },
}

/// Search state: the last term and the occurrences it produced
#[derive(Debug, Clone, Default)]
pub struct SearchEngine {
    term: Option<String>,
    matches: Vec<MatchLocation>,
    current: Option<usize>,
}

impl SearchEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Term of the last search that ran
    pub fn term(&self) -> Option<&str> {
        self.term.as_deref()
    }

    pub fn matches(&self) -> &[MatchLocation] {
        &self.matches
    }

    /// Index into [`matches`](Self::matches) of the occurrence in focus
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    /// Highlight every case-insensitive occurrence of `term` in the document
    pub fn search(&mut self, doc: &mut Document, term: &str) -> SearchOutcome {
        self.search_with_limit(doc, term, PATTERN_SIZE_LIMIT)
    }

    fn search_with_limit(&mut self, doc: &mut Document, term: &str, limit: usize) -> SearchOutcome {
        let term = term.trim();
        if term.is_empty() {
            return SearchOutcome::Skipped;
        }

        let pattern = match literal_pattern(term, limit) {
            Ok(pattern) => pattern,
            Err(e) => {
                // A term too large to compile cannot occur in the page
                tracing::warn!("Cannot search for {:?}: {}", term, e);
                self.clear(doc);
                return SearchOutcome::NotFound { term: term.to_string() };
            }
        };

        self.term = Some(term.to_string());
        self.matches.clear();
        self.current = None;

        for (block, node) in doc.content_nodes_mut() {
            clear_highlights(node);

            let text = plain_text(&node.markup);
            if !pattern.is_match(&text) {
                continue;
            }

            node.markup = highlight(&text, &pattern);
            let occurrences = node.highlight_count();
            self.matches.extend((0..occurrences).map(|occurrence| MatchLocation { block, occurrence }));
        }

        tracing::debug!("Search for {:?} found {} occurrences", term, self.matches.len());

        match self.matches.first() {
            Some(&first) => {
                self.current = Some(0);
                SearchOutcome::Found {
                    first,
                    total: self.matches.len(),
                    scroll: ScrollRequest::centered_block(first.block),
                }
            }
            None => SearchOutcome::NotFound { term: term.to_string() },
        }
    }

    /// Move focus to the next occurrence, wrapping to the first
    pub fn next_match(&mut self) -> Option<ScrollRequest> {
        self.step(1)
    }

    /// Move focus to the previous occurrence, wrapping to the last
    pub fn prev_match(&mut self) -> Option<ScrollRequest> {
        self.step(self.matches.len().saturating_sub(1))
    }

    /// Remove all highlights and forget the last search
    pub fn clear(&mut self, doc: &mut Document) {
        for (_, node) in doc.content_nodes_mut() {
            clear_highlights(node);
        }
        self.term = None;
        self.matches.clear();
        self.current = None;
    }

    fn step(&mut self, offset: usize) -> Option<ScrollRequest> {
        if self.matches.is_empty() {
            return None;
        }
        let next = match self.current {
            Some(i) => (i + offset) % self.matches.len(),
            None => 0,
        };
        self.current = Some(next);
        Some(ScrollRequest::centered_block(self.matches[next].block))
    }
}

/// Build a case-insensitive pattern matching `term` literally
/// Compiled-size cap for search patterns; pasted terms can be long
const PATTERN_SIZE_LIMIT: usize = 64 * (1 << 20);

fn literal_pattern(term: &str, size_limit: usize) -> Result<Regex, regex::Error> {
    RegexBuilder::new(&regex::escape(term)).case_insensitive(true).size_limit(size_limit).build()
}
