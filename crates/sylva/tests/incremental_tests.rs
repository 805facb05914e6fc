//! Incremental reparsing: recorded edits let the next parse lift tokens
//! out of the previous tree, and every fallback path still produces the
//! same tree a from-scratch parse would.

use sylva::grammars::clickhouse;
use sylva::incremental::InputEdit;
use sylva::parser::Parser;
use sylva::syntax::{SyntaxNode, TextRange, TextSize};

fn parser() -> Parser {
    let language = clickhouse::language().expect("grammar loads");
    Parser::bind(&language).expect("parser binds")
}

fn offset_of(text: &str, needle: &str) -> TextSize {
    let at = text.find(needle).expect("needle present");
    TextSize::from(u32::try_from(at).expect("fits in u32"))
}

fn node_shape(node: &SyntaxNode) -> Vec<(String, String)> {
    let mut shape = vec![(node.kind_name().to_string(), node.text())];
    for element in node.descendants() {
        if let Some(n) = element.into_node() {
            shape.push((n.kind_name().to_string(), n.text()));
        }
    }
    shape
}

#[test]
fn test_replace_identifier_reuses_tokens() {
    let mut parser = parser();
    let old = "SELECT alpha FROM users WHERE id = 1";
    let new = "SELECT alpha FROM events WHERE id = 1";

    let mut tree = parser.parse(old).tree;
    let start = offset_of(old, "users");
    tree.edit(InputEdit::replace(
        TextRange::at(start, TextSize::of("users")),
        TextSize::of("events"),
    ));

    let result = parser.parse_with(new, Some(&tree));
    assert!(result.is_ok(), "errors: {:?}", result.errors);
    assert_eq!(result.tree.text(), new);
    assert!(result.metrics.tokens_reused > 0, "expected token reuse");
}

#[test]
fn test_insert_at_end_reuses_prefix() {
    let mut parser = parser();
    let old = "SELECT a FROM t";
    let new = "SELECT a FROM t LIMIT 10";

    let mut tree = parser.parse(old).tree;
    tree.edit(InputEdit::insert(TextSize::of(old), TextSize::of(" LIMIT 10")));

    let result = parser.parse_with(new, Some(&tree));
    assert!(result.is_ok(), "errors: {:?}", result.errors);
    assert_eq!(result.tree.text(), new);
    assert!(result.metrics.tokens_reused > 0);
}

#[test]
fn test_delete_reuses_suffix() {
    let mut parser = parser();
    let old = "SELECT a, b FROM t";
    let new = "SELECT a FROM t";

    let mut tree = parser.parse(old).tree;
    let start = offset_of(old, ", b");
    tree.edit(InputEdit::delete(TextRange::at(start, TextSize::of(", b"))));

    let result = parser.parse_with(new, Some(&tree));
    assert!(result.is_ok(), "errors: {:?}", result.errors);
    assert_eq!(result.tree.text(), new);
    assert!(result.metrics.tokens_reused > 0);
}

#[test]
fn test_incremental_tree_matches_fresh_parse() {
    let mut parser = parser();
    let old = "SELECT id, name FROM users WHERE id = 1 ORDER BY name";
    let new = "SELECT id, email FROM users WHERE id = 1 ORDER BY name";

    let mut tree = parser.parse(old).tree;
    let start = offset_of(old, "name");
    tree.edit(InputEdit::replace(
        TextRange::at(start, TextSize::of("name")),
        TextSize::of("email"),
    ));
    let incremental = parser.parse_with(new, Some(&tree));

    let mut fresh_parser = self::parser();
    let fresh = fresh_parser.parse(new);

    assert!(incremental.is_ok() && fresh.is_ok());
    assert_eq!(
        node_shape(&incremental.tree.root()),
        node_shape(&fresh.tree.root())
    );
}

#[test]
fn test_multiple_edits_fall_back_to_full_scan() {
    let mut parser = parser();
    let old = "SELECT aaa, bbb FROM t";
    let new = "SELECT xxx, yyy FROM t";

    let mut tree = parser.parse(old).tree;
    tree.edit(InputEdit::replace(
        TextRange::at(offset_of(old, "aaa"), TextSize::of("aaa")),
        TextSize::of("xxx"),
    ));
    tree.edit(InputEdit::replace(
        TextRange::at(offset_of(old, "bbb"), TextSize::of("bbb")),
        TextSize::of("yyy"),
    ));

    let result = parser.parse_with(new, Some(&tree));
    assert!(result.is_ok(), "errors: {:?}", result.errors);
    assert_eq!(result.tree.text(), new);
    assert_eq!(result.metrics.tokens_reused, 0);
}

#[test]
fn test_inconsistent_edit_falls_back() {
    let mut parser = parser();
    let old = "SELECT a FROM t";
    let new = "SELECT ab FROM t";

    let mut tree = parser.parse(old).tree;
    // old_end/new_end do not reconcile with the actual text lengths
    tree.edit(InputEdit::new(
        TextSize::from(7),
        TextSize::from(8),
        TextSize::from(20),
    ));

    let result = parser.parse_with(new, Some(&tree));
    assert!(result.is_ok(), "errors: {:?}", result.errors);
    assert_eq!(result.tree.text(), new);
    assert_eq!(result.metrics.tokens_reused, 0);
}

#[test]
fn test_edit_joining_word_characters_stays_correct() {
    let mut parser = parser();
    let old = "SELECT a FROM t";
    // deleting the space glues `a` and `FROM` into one identifier
    let new = "SELECT aFROM t";

    let mut tree = parser.parse(old).tree;
    let space = offset_of(old, " FROM");
    tree.edit(InputEdit::delete(TextRange::at(space, TextSize::from(1))));

    let incremental = parser.parse_with(new, Some(&tree));
    assert_eq!(incremental.tree.text(), new);

    let mut fresh_parser = self::parser();
    let fresh = fresh_parser.parse(new);
    assert_eq!(incremental.errors.len(), fresh.errors.len());
    assert_eq!(
        node_shape(&incremental.tree.root()),
        node_shape(&fresh.tree.root())
    );
}

#[test]
fn test_edit_opening_string_literal_stays_correct() {
    let mut parser = parser();
    let old = "SELECT a FROM t WHERE b = c";
    // inserting a lone quote leaves an unterminated literal to the right
    let new = "SELECT a FROM t WHERE b = 'c";

    let mut tree = parser.parse(old).tree;
    tree.edit(InputEdit::insert(offset_of(old, "c"), TextSize::from(1)));

    let incremental = parser.parse_with(new, Some(&tree));
    assert_eq!(incremental.tree.text(), new);

    let mut fresh_parser = self::parser();
    let fresh = fresh_parser.parse(new);
    assert_eq!(incremental.errors.len(), fresh.errors.len());
}

#[test]
fn test_unedited_old_tree_is_ignored() {
    let mut parser = parser();
    let old_tree = parser.parse("SELECT a FROM t").tree;

    // no edits recorded, different text: full scan, still correct
    let result = parser.parse_with("SELECT b FROM u", Some(&old_tree));
    assert!(result.is_ok(), "errors: {:?}", result.errors);
    assert_eq!(result.tree.text(), "SELECT b FROM u");
    assert_eq!(result.metrics.tokens_reused, 0);
}

#[test]
fn test_edit_into_error_and_back() {
    let mut parser = parser();
    let old = "SELECT a FROM t";
    let broken = "SELECT a FROM ";

    let mut tree = parser.parse(old).tree;
    tree.edit(InputEdit::delete(TextRange::at(
        offset_of(old, "t"),
        TextSize::from(1),
    )));
    let result = parser.parse_with(broken, Some(&tree));
    assert!(!result.is_ok());
    assert_eq!(result.tree.text(), broken);

    // repair the text again from the broken tree
    let mut broken_tree = result.tree;
    broken_tree.edit(InputEdit::insert(TextSize::of(broken), TextSize::from(1)));
    let repaired = parser.parse_with(old, Some(&broken_tree));
    assert!(repaired.is_ok(), "errors: {:?}", repaired.errors);
    assert_eq!(repaired.tree.text(), old);
}
