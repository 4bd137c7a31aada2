//! Tree rewriting
//!
//! Replaces one text node with an alternating sequence of plain text and
//! highlight nodes that reconstructs the original content exactly.

use crate::annotate::keywords::KeywordSet;
use crate::annotate::matcher::Occurrence;
use crate::annotate::AnnotateError;
use crate::document::node::{DocumentTree, Node, NodePath};

/// Build the replacement node sequence for `text`
///
/// `occurrences` must be sorted by start offset and non-overlapping.
pub fn split_run(text: &str, occurrences: &[Occurrence], keywords: &KeywordSet) -> Vec<Node> {
    let mut nodes = Vec::with_capacity(occurrences.len() * 2 + 1);
    let mut cursor = 0;

    for occurrence in occurrences {
        if occurrence.start > cursor {
            nodes.push(Node::text(&text[cursor..occurrence.start]));
        }
        let keyword = keywords
            .get(occurrence.keyword)
            .map(|k| k.as_str())
            .unwrap_or_default();
        nodes.push(Node::highlight(
            keyword,
            &text[occurrence.start..occurrence.end],
        ));
        cursor = occurrence.end;
    }

    if cursor < text.len() {
        nodes.push(Node::text(&text[cursor..]));
    }

    nodes
}

/// Splice the highlighted replacement for the run at `path` into its parent
///
/// Returns the number of highlight nodes inserted. A run without occurrences
/// is left untouched.
pub fn rewrite_run(
    tree: &mut DocumentTree,
    path: &NodePath,
    occurrences: &[Occurrence],
    keywords: &KeywordSet,
) -> Result<usize, AnnotateError> {
    if occurrences.is_empty() {
        return Ok(0);
    }

    let detached = || AnnotateError::DetachedRun { path: path.clone() };

    let index = path.index().ok_or_else(detached)?;
    let siblings = tree.children_at_mut(path.parent()).ok_or_else(detached)?;

    let replacement = match siblings.get(index) {
        Some(Node::Text(text)) => split_run(&text.content, occurrences, keywords),
        _ => return Err(detached()),
    };

    siblings.splice(index..=index, replacement);
    Ok(occurrences.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::extract::text_runs;
    use crate::annotate::matcher::match_run;
    use crate::document::node::ElementNode;
    use crate::document::parse::parse_markup;

    #[test]
    fn test_split_run_reconstructs_text() {
        let set = KeywordSet::new(&["cat"]).unwrap();
        let text = "A cat, a CAT.";
        let matches = match_run(text, &set);
        let nodes = split_run(text, &matches.occurrences, &set);
        let tree = DocumentTree::new(nodes.clone());
        assert_eq!(tree.text_content(), text);
        assert_eq!(
            nodes,
            vec![
                Node::text("A "),
                Node::highlight("cat", "cat"),
                Node::text(", a "),
                Node::highlight("cat", "CAT"),
                Node::text("."),
            ]
        );
    }

    #[test]
    fn test_split_run_whole_text_match() {
        let set = KeywordSet::new(&["cat"]).unwrap();
        let matches = match_run("Cat", &set);
        let nodes = split_run("Cat", &matches.occurrences, &set);
        assert_eq!(nodes, vec![Node::highlight("cat", "Cat")]);
    }

    #[test]
    fn test_rewrite_run_keeps_siblings_and_attributes() {
        let mut tree = parse_markup(r#"<p class="x">a cat<b>b</b>tail</p>"#);
        let set = KeywordSet::new(&["cat"]).unwrap();
        let run = text_runs(&tree).next().unwrap();
        let path = run.path.clone();
        let matches = match_run(run.text, &set);

        let inserted = rewrite_run(&mut tree, &path, &matches.occurrences, &set).unwrap();
        assert_eq!(inserted, 1);

        match &tree.children[0] {
            Node::Element(p) => {
                assert_eq!(p.attribute("class"), Some("x"));
                assert_eq!(p.children.len(), 4);
                assert_eq!(p.children[0], Node::text("a "));
                assert_eq!(p.children[1], Node::highlight("cat", "cat"));
                assert!(matches!(&p.children[2], Node::Element(b) if b.tag == "b"));
                assert_eq!(p.children[3], Node::text("tail"));
            }
            other => panic!("unexpected node {:?}", other),
        }
    }

    #[test]
    fn test_rewrite_run_without_occurrences_is_noop() {
        let mut tree = DocumentTree::new(vec![Node::text("plain")]);
        let before = tree.clone();
        let set = KeywordSet::new(&["cat"]).unwrap();
        let inserted = rewrite_run(&mut tree, &NodePath(vec![0]), &[], &set).unwrap();
        assert_eq!(inserted, 0);
        assert_eq!(tree, before);
    }

    #[test]
    fn test_rewrite_run_rejects_non_text_path() {
        let mut tree = DocumentTree::new(vec![Node::element(ElementNode::new("p"))]);
        let set = KeywordSet::new(&["cat"]).unwrap();
        let occurrence = Occurrence { keyword: 0, start: 0, end: 3 };
        let err = rewrite_run(&mut tree, &NodePath(vec![0]), &[occurrence], &set).unwrap_err();
        assert!(matches!(err, AnnotateError::DetachedRun { .. }));

        let err = rewrite_run(&mut tree, &NodePath(vec![3, 1]), &[occurrence], &set).unwrap_err();
        assert!(err.to_string().contains("/3/1"));
    }
}
