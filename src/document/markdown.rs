//! Markdown loader for documents
//!
//! Heading levels map onto the navigation tree: `#` starts a chapter, `##` a
//! section and `###` a topic. Ids come from `{#id}` heading attributes and
//! fall back to a slug of the heading text. A chapter heading carrying the
//! `.active` class is the initially active chapter.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use regex::Regex;

use super::DocumentError;
use super::model::{
    Block, ChapterEntry, ContentKind, ContentNode, Document, SectionEntry, Topic, TopicLink,
};

/// Runs of characters that are not allowed in a slug (compiled once)
static SLUG_SEPARATOR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// Block quote prefixes that select a content category
const DEFINITION_PREFIX: &str = "definition:";
const EXAMPLE_PREFIX: &str = "example:";

/// Heading currently being collected
struct PendingHeading {
    level: u8,
    id: Option<String>,
    active: bool,
}

/// Assembles the outline and blocks as headings and content arrive
#[derive(Default)]
struct Builder {
    doc_chapters: Vec<ChapterEntry>,
    topics: Vec<Topic>,
    blocks: Vec<Block>,
    used_ids: HashSet<String>,
}

impl Builder {
    /// Reserve a unique anchor id, preferring the explicit one
    fn claim_id(&mut self, explicit: Option<String>, text: &str) -> String {
        let base = explicit.filter(|id| !id.is_empty()).unwrap_or_else(|| slugify(text));
        let base = if base.is_empty() { "section".to_string() } else { base };

        let mut id = base.clone();
        let mut n = 2;
        while self.used_ids.contains(&id) {
            id = format!("{}-{}", base, n);
            n += 1;
        }
        self.used_ids.insert(id.clone());
        id
    }

    fn push_heading(&mut self, heading: PendingHeading, text: String) {
        match heading.level {
            1 => {
                let id = self.claim_id(heading.id, &text);
                let mut chapter = ChapterEntry::new(id.clone(), text.clone());
                chapter.marked_active = heading.active;
                self.doc_chapters.push(chapter);
                self.blocks.push(Block::Heading { level: 1, text, anchor: Some(id) });
                self.blocks.push(Block::TopicList(self.doc_chapters.len() - 1));
            }
            2 if !self.doc_chapters.is_empty() => {
                let id = self.claim_id(heading.id, &text);
                if let Some(chapter) = self.doc_chapters.last_mut() {
                    chapter.sections.push(SectionEntry::new(id.clone(), text.clone()));
                }
                self.blocks.push(Block::Heading { level: 2, text, anchor: Some(id) });
            }
            3 => {
                let id = self.claim_id(heading.id, &text);
                let chapter = self.doc_chapters.len().checked_sub(1);
                if let Some(entry) = self.doc_chapters.last_mut() {
                    entry.topic_links.push(TopicLink {
                        target: id.clone(),
                        label: text.clone(),
                        marks: Default::default(),
                    });
                }
                self.topics.push(Topic { id: id.clone(), title: text.clone(), chapter });
                self.blocks.push(Block::Heading { level: 3, text, anchor: Some(id) });
            }
            level => {
                // Deeper headings (and sections before any chapter) are not navigable
                self.blocks.push(Block::Heading { level, text, anchor: heading.id });
            }
        }
    }

    fn push_content(&mut self, kind: ContentKind, text: &str) {
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            self.blocks.push(Block::Content(ContentNode::new(kind, trimmed)));
        }
    }
}

/// Parse a markdown string into a document
// skipcq: RS-R1000 - Parser functions inherently have high cyclomatic complexity
#[allow(clippy::cognitive_complexity)]
pub fn parse_document(title: &str, markdown: &str) -> Result<Document, DocumentError> {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_HEADING_ATTRIBUTES;

    let parser = Parser::new_ext(markdown, options);
    let mut builder = Builder::default();

    let mut current_text = String::default();
    let mut heading: Option<PendingHeading> = None;

    let mut in_code_block = false;
    let mut code_content = String::default();

    let mut list_depth = 0usize;
    let mut current_list_item = String::default();

    let mut in_blockquote = false;
    let mut quote_kind: Option<ContentKind> = None;

    for event in parser {
        match event {
            Event::Start(Tag::Heading { level, id, classes, .. }) => {
                builder.push_content(ContentKind::Paragraph, &std::mem::take(&mut current_text));
                heading = Some(PendingHeading {
                    level: heading_level_to_u8(level),
                    id: id.map(|s| s.to_string()),
                    active: classes.iter().any(|c| c.as_ref() == "active"),
                });
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some(pending) = heading.take() {
                    let text = std::mem::take(&mut current_text).trim().to_string();
                    if !text.is_empty() {
                        builder.push_heading(pending, text);
                    }
                }
            }

            Event::Start(Tag::Paragraph) => {}
            Event::End(TagEnd::Paragraph) => {
                if list_depth > 0 {
                    current_list_item.push_str(&std::mem::take(&mut current_text));
                } else if in_blockquote {
                    let text = std::mem::take(&mut current_text);
                    let kind = *quote_kind.get_or_insert_with(|| quote_category(&text));
                    builder.push_content(kind, &text);
                } else {
                    builder.push_content(ContentKind::Paragraph, &std::mem::take(&mut current_text));
                }
            }

            Event::Start(Tag::CodeBlock(_)) => {
                builder.push_content(ContentKind::Paragraph, &std::mem::take(&mut current_text));
                in_code_block = true;
            }
            Event::End(TagEnd::CodeBlock) => {
                in_code_block = false;
                let code = std::mem::take(&mut code_content);
                builder.blocks.push(Block::Code(code.trim_end().to_string()));
            }

            Event::Start(Tag::List(_)) => {
                if list_depth == 0 {
                    builder
                        .push_content(ContentKind::Paragraph, &std::mem::take(&mut current_text));
                }
                list_depth += 1;
            }
            Event::End(TagEnd::List(_)) => {
                list_depth = list_depth.saturating_sub(1);
            }

            Event::Start(Tag::Item) => {
                // A nested list closes off the text of its parent item
                current_list_item.push_str(&std::mem::take(&mut current_text));
                builder.push_content(ContentKind::ListItem, &std::mem::take(&mut current_list_item));
            }
            Event::End(TagEnd::Item) => {
                current_list_item.push_str(&std::mem::take(&mut current_text));
                builder.push_content(ContentKind::ListItem, &std::mem::take(&mut current_list_item));
            }

            Event::Start(Tag::BlockQuote(_)) => {
                builder.push_content(ContentKind::Paragraph, &std::mem::take(&mut current_text));
                in_blockquote = true;
                quote_kind = None;
            }
            Event::End(TagEnd::BlockQuote(_)) => {
                in_blockquote = false;
                quote_kind = None;
            }

            Event::Rule => {
                builder.push_content(ContentKind::Paragraph, &std::mem::take(&mut current_text));
                builder.blocks.push(Block::Rule);
            }

            Event::Text(text) => {
                if in_code_block {
                    code_content.push_str(&text);
                } else {
                    current_text.push_str(&text);
                }
            }

            Event::Code(code) => {
                current_text.push('`');
                current_text.push_str(&code);
                current_text.push('`');
            }

            Event::SoftBreak | Event::HardBreak => {
                if in_code_block {
                    code_content.push('\n');
                } else {
                    current_text.push(' ');
                }
            }

            // Table cells are flattened into one paragraph per row
            Event::End(TagEnd::TableHead) | Event::End(TagEnd::TableRow) => {
                let row = std::mem::take(&mut current_text);
                builder.push_content(ContentKind::Paragraph, row.trim_end_matches(" | "));
            }
            Event::End(TagEnd::TableCell) => {
                current_text.push_str(" | ");
            }

            _ => {}
        }
    }

    builder.push_content(ContentKind::Paragraph, &current_text);

    if builder.doc_chapters.is_empty() {
        return Err(DocumentError::NoChapters);
    }

    let mut doc = Document::new(title);
    doc.chapters = builder.doc_chapters;
    doc.topics = builder.topics;
    doc.blocks = builder.blocks;

    tracing::debug!(
        "Parsed document '{}': {} chapters, {} sections, {} topics",
        doc.title,
        doc.chapters.len(),
        doc.section_count(),
        doc.topics.len()
    );

    Ok(doc)
}

/// Load a document from a markdown file, titled after its file stem
pub fn load_document(path: &Path) -> Result<Document, DocumentError> {
    let contents = fs::read_to_string(path)
        .map_err(|source| DocumentError::Read { path: path.display().to_string(), source })?;

    let title = path
        .file_stem()
        .map_or_else(|| "Document".to_string(), |s| s.to_string_lossy().to_string());

    parse_document(&title, &contents)
}

/// Pick the content category for a block quote from its first paragraph
fn quote_category(first_paragraph: &str) -> ContentKind {
    let lower = first_paragraph.trim_start().to_lowercase();
    if lower.starts_with(DEFINITION_PREFIX) {
        ContentKind::Definition
    } else if lower.starts_with(EXAMPLE_PREFIX) {
        ContentKind::Example
    } else {
        ContentKind::Paragraph
    }
}

/// Turn heading text into an anchor id
pub fn slugify(text: &str) -> String {
    let lower = text.to_lowercase();
    SLUG_SEPARATOR_RE.replace_all(&lower, "-").trim_matches('-').to_string()
}

fn heading_level_to_u8(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = "\
# Getting Started {#start}

Welcome to the guide.

## Installation

- Download the archive
- Run the installer

### First Steps {#t1}

> Definition: A *widget* is a reusable component.

> Example: `widget new` creates one.

# Reference {.active}

```
code is not searched
```

### Commands
";

    #[test]
    fn parses_outline() {
        let doc = parse_document("guide", SAMPLE).unwrap();

        assert_eq!(doc.chapters.len(), 2);
        assert_eq!(doc.chapters[0].id, "start");
        assert_eq!(doc.chapters[0].label, "Getting Started");
        assert_eq!(doc.chapters[0].sections.len(), 1);
        assert_eq!(doc.chapters[0].sections[0].id, "installation");
        assert_eq!(doc.chapters[1].id, "reference");
        assert!(doc.chapters[1].marked_active);
        assert!(!doc.chapters[0].marked_active);
    }

    #[test]
    fn parses_topics_and_topic_links() {
        let doc = parse_document("guide", SAMPLE).unwrap();

        let ids: Vec<&str> = doc.topics.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["t1", "commands"]);
        assert_eq!(doc.topics[0].chapter, Some(0));
        assert_eq!(doc.chapters[0].topic_links[0].target, "t1");
        assert_eq!(doc.chapters[1].topic_links[0].label, "Commands");
    }

    #[test]
    fn classifies_content_nodes() {
        let doc = parse_document("guide", SAMPLE).unwrap();
        let kinds: Vec<(ContentKind, String)> =
            doc.content_nodes().map(|(_, n)| (n.kind, n.text())).collect();

        assert_eq!(
            kinds,
            vec![
                (ContentKind::Paragraph, "Welcome to the guide.".to_string()),
                (ContentKind::ListItem, "Download the archive".to_string()),
                (ContentKind::ListItem, "Run the installer".to_string()),
                (ContentKind::Definition, "Definition: A widget is a reusable component.".to_string()),
                (ContentKind::Example, "Example: `widget new` creates one.".to_string()),
            ]
        );
    }

    #[test]
    fn code_blocks_are_not_content() {
        let doc = parse_document("guide", SAMPLE).unwrap();
        assert!(doc.blocks.iter().any(|b| matches!(b, Block::Code(c) if c.contains("not searched"))));
        assert!(doc.content_nodes().all(|(_, n)| !n.text().contains("not searched")));
    }

    #[test]
    fn duplicate_ids_are_disambiguated() {
        let doc = parse_document("dup", "# Intro\n\n# Intro\n").unwrap();
        assert_eq!(doc.chapters[0].id, "intro");
        assert_eq!(doc.chapters[1].id, "intro-2");
    }

    #[test]
    fn document_without_chapters_is_rejected() {
        let result = parse_document("empty", "just some text\n");
        assert!(matches!(result, Err(DocumentError::NoChapters)));
    }

    #[test]
    fn nested_list_items_are_separate_nodes() {
        let doc = parse_document("n", "# C\n\n- outer\n  - inner\n").unwrap();
        let texts: Vec<String> = doc.content_nodes().map(|(_, n)| n.text()).collect();
        assert_eq!(texts, vec!["outer".to_string(), "inner".to_string()]);
    }

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("  C++ & Rust  "), "c-rust");
    }

    #[test]
    fn load_document_uses_file_stem() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("handbook.md");
        std::fs::write(&path, "# One\n\nText\n").unwrap();

        let doc = load_document(&path).unwrap();
        assert_eq!(doc.title, "handbook");
    }

    #[test]
    fn load_document_reports_missing_file() {
        let result = load_document(Path::new("/nonexistent/folio/doc.md"));
        assert!(matches!(result, Err(DocumentError::Read { .. })));
    }
}
