//! Shared tree-sitter helpers for the front ends.

use std::path::Path;

use streaming_iterator::StreamingIterator;
use tree_sitter::{Language, Node, Parser, Query, QueryCursor};

use crate::analysis::ParsedFile;

/// Parse `source` with `language`, failing only when no tree is produced.
pub(crate) fn parse_source(
    language: &Language,
    language_name: &str,
    path: &Path,
    source: &[u8],
) -> anyhow::Result<ParsedFile> {
    let mut parser = Parser::new();
    parser.set_language(language)?;
    let tree = parser.parse(source, None).ok_or_else(|| {
        anyhow::anyhow!("failed to parse {} source: {}", language_name, path.display())
    })?;

    Ok(ParsedFile {
        tree,
        source: source.to_vec(),
        path: path.to_string_lossy().to_string(),
    })
}

pub(crate) fn node_text<'s>(node: Node, source: &'s [u8]) -> &'s str {
    node.utf8_text(source).unwrap_or("")
}

/// Text of a named field, if present.
pub(crate) fn field_text(node: Node, field: &str, source: &[u8]) -> Option<String> {
    node.child_by_field_name(field)
        .map(|child| node_text(child, source).to_string())
        .filter(|text| !text.is_empty())
}

/// First named child whose kind is one of `kinds`.
pub(crate) fn child_of_kind<'t>(node: Node<'t>, kinds: &[&str]) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    let found = node
        .named_children(&mut cursor)
        .find(|child| kinds.contains(&child.kind()));
    found
}

/// Named children of `node` whose kind is one of `kinds`.
pub(crate) fn children_of_kind<'t>(node: Node<'t>, kinds: &[&str]) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| kinds.contains(&child.kind()))
        .collect()
}

/// Count the named children of a type parameter list.
pub(crate) fn count_of_kind(list: Option<Node>, kind: &str) -> usize {
    list.map(|list| children_of_kind(list, &[kind]).len())
        .unwrap_or(0)
}

/// Run `query` over the file and collect the text of every `capture` hit.
pub(crate) fn capture_texts(
    language: &Language,
    query: &str,
    capture: &str,
    parsed: &ParsedFile,
) -> anyhow::Result<Vec<String>> {
    let query = Query::new(language, query)?;
    let Some(index) = query.capture_index_for_name(capture) else {
        return Ok(Vec::new());
    };

    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(&query, parsed.tree.root_node(), &parsed.source[..]);
    let mut texts = Vec::new();
    while let Some(m) = matches.next() {
        for cap in m.captures.iter().filter(|c| c.index == index) {
            texts.push(parsed.node_text(cap.node).to_string());
        }
    }
    Ok(texts)
}

/// Split a dotted name into namespace components.
pub(crate) fn split_qualified(name: &str, delimiter: &str) -> Vec<String> {
    name.split(delimiter)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}
