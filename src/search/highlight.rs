//! Highlight transforms over content markup

use regex::Regex;

use crate::document::{ContentNode, Fragment};

/// Split `text` into plain and highlighted fragments around every match.
///
/// Concatenating the fragments always yields `text` unchanged.
pub fn highlight(text: &str, pattern: &Regex) -> Vec<Fragment> {
    let mut fragments = Vec::new();
    let mut last = 0;

    for m in pattern.find_iter(text) {
        if m.start() == m.end() {
            continue;
        }
        if m.start() > last {
            fragments.push(Fragment::Text(text[last..m.start()].to_string()));
        }
        fragments.push(Fragment::Highlight(m.as_str().to_string()));
        last = m.end();
    }

    if last < text.len() || fragments.is_empty() {
        fragments.push(Fragment::Text(text[last..].to_string()));
    }

    fragments
}

/// The text of a fragment list with all highlight markup removed
pub fn plain_text(markup: &[Fragment]) -> String {
    markup.iter().map(Fragment::as_str).collect()
}

/// Restore a node to a single plain-text fragment
pub fn clear_highlights(node: &mut ContentNode) {
    if node.markup.len() == 1 && !node.markup[0].is_highlight() {
        return;
    }
    node.markup = vec![Fragment::Text(plain_text(&node.markup))];
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::ContentKind;

    fn pattern(term: &str) -> Regex {
        regex::RegexBuilder::new(&regex::escape(term)).case_insensitive(true).build().unwrap()
    }

    #[test]
    fn highlight_wraps_each_occurrence() {
        let fragments = highlight("Foo and foo", &pattern("foo"));
        assert_eq!(
            fragments,
            vec![
                Fragment::Highlight("Foo".into()),
                Fragment::Text(" and ".into()),
                Fragment::Highlight("foo".into()),
            ]
        );
    }

    #[test]
    fn highlight_without_match_keeps_text() {
        let fragments = highlight("nothing here", &pattern("zzz"));
        assert_eq!(fragments, vec![Fragment::Text("nothing here".into())]);
    }

    #[test]
    fn highlight_of_empty_text_is_single_fragment() {
        assert_eq!(highlight("", &pattern("a")), vec![Fragment::Text(String::new())]);
    }

    #[test]
    fn highlight_preserves_text() {
        let text = "ünïcode FOObar foo";
        assert_eq!(plain_text(&highlight(text, &pattern("foo"))), text);
    }

    #[test]
    fn clear_merges_fragments() {
        let mut node = ContentNode::new(ContentKind::Paragraph, "a foo b");
        node.markup = highlight("a foo b", &pattern("foo"));
        assert_eq!(node.highlight_count(), 1);

        clear_highlights(&mut node);
        assert_eq!(node.markup, vec![Fragment::Text("a foo b".into())]);

        clear_highlights(&mut node);
        assert_eq!(node.markup, vec![Fragment::Text("a foo b".into())]);
    }
}
