//! Property-based tests over the bundled ClickHouse grammar.
//!
//! These tests use proptest to generate random inputs and verify the
//! structural guarantees of every parse: the tree reproduces the input
//! byte for byte, and child spans tile their parents exactly.

use proptest::prelude::*;
use sylva::grammars::clickhouse;
use sylva::parser::Parser;
use sylva::{Language, SyntaxElement, SyntaxNode};

fn language() -> Language {
    clickhouse::language().expect("grammar loads")
}

/// Children must tile the parent range: contiguous and covering.
fn spans_partition(node: &SyntaxNode) -> bool {
    let mut cursor = node.text_range().start();
    for child in node.children() {
        if child.text_range().start() != cursor {
            return false;
        }
        cursor = child.text_range().end();
        if let SyntaxElement::Node(n) = child {
            if !spans_partition(&n) {
                return false;
            }
        }
    }
    node.child_count() == 0 || cursor == node.text_range().end()
}

/// Characters the lexer knows, plus a few it does not.
fn query_soup() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_+\\-*/%(),.;=<>! '\"\n\t@#]{0,80}"
}

/// A random but syntactically valid SELECT statement. Names carry a
/// digit suffix so they can never collide with a keyword.
fn valid_select() -> impl Strategy<Value = String> {
    let column = "[a-z][a-z]{0,6}[0-9]";
    let columns = proptest::collection::vec(column, 1..4);
    let table = "[a-z][a-z]{0,6}[0-9]";
    let limit = proptest::option::of(1u32..1000);
    (columns, table, limit).prop_map(|(columns, table, limit)| {
        let mut query = format!("SELECT {} FROM {table}", columns.join(", "));
        if let Some(n) = limit {
            query.push_str(&format!(" LIMIT {n}"));
        }
        query
    })
}

/// Words drawn from the grammar's own vocabulary, glued with spaces.
/// Most sequences are nonsense; recovery has to keep every byte anyway.
fn keyword_soup() -> impl Strategy<Value = String> {
    let word = prop_oneof![
        Just("SELECT"),
        Just("FROM"),
        Just("WHERE"),
        Just("GROUP"),
        Just("BY"),
        Just("ORDER"),
        Just("LIMIT"),
        Just("("),
        Just(")"),
        Just(","),
        Just(";"),
        Just("="),
        Just("*"),
        Just("x"),
        Just("42"),
        Just("'s'"),
    ];
    proptest::collection::vec(word, 0..24).prop_map(|words| words.join(" "))
}

proptest! {
    #[test]
    fn parse_reproduces_arbitrary_input(input in query_soup()) {
        let mut parser = Parser::bind(&language()).expect("parser binds");
        let result = parser.parse(&input);
        prop_assert_eq!(result.tree.text(), input);
    }

    #[test]
    fn spans_partition_on_arbitrary_input(input in query_soup()) {
        let mut parser = Parser::bind(&language()).expect("parser binds");
        let result = parser.parse(&input);
        prop_assert!(spans_partition(&result.tree.root()));
    }

    #[test]
    fn valid_selects_parse_cleanly(query in valid_select()) {
        let mut parser = Parser::bind(&language()).expect("parser binds");
        let result = parser.parse(&query);
        prop_assert!(result.is_ok(), "errors on {:?}: {:?}", query, result.errors);
        let root = result.tree.root();
        prop_assert_eq!(root.kind_name(), "source_file");
        prop_assert!(!root.has_error());
    }

    #[test]
    fn keyword_soup_round_trips(input in keyword_soup()) {
        let mut parser = Parser::bind(&language()).expect("parser binds");
        let result = parser.parse(&input);
        prop_assert_eq!(result.tree.text(), input);
        prop_assert!(spans_partition(&result.tree.root()));
        // error count is bounded by the configured cap
        prop_assert!(result.errors.len() <= parser.config().max_errors);
    }

    #[test]
    fn appending_is_equivalent_to_reparsing(
        query in valid_select(),
        tail in " LIMIT [1-9][0-9]{0,3}",
    ) {
        use sylva::incremental::InputEdit;
        use sylva::TextSize;

        // appending via a recorded edit must match a from-scratch parse
        let mut parser = Parser::bind(&language()).expect("parser binds");
        let base = query.replace(" LIMIT", " WHERE x0 =");
        let mut tree = parser.parse(&base).tree;
        tree.edit(InputEdit::insert(TextSize::of(&base), TextSize::of(&tail)));
        let edited = format!("{base}{tail}");
        let incremental = parser.parse_with(&edited, Some(&tree));

        let mut fresh_parser = Parser::bind(&language()).expect("parser binds");
        let fresh = fresh_parser.parse(&edited);

        prop_assert_eq!(incremental.tree.text(), fresh.tree.text());
        prop_assert_eq!(incremental.errors.len(), fresh.errors.len());
    }
}
