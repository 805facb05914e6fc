//! Binding the bundled ClickHouse grammar to parsers.
//!
//! Loading a grammar and binding it must never fail on a matching runtime;
//! these tests guard that end to end, including sharing one language
//! across threads and parsers.

use sylva::grammars::clickhouse;
use sylva::language::{Language, GRAMMAR_FORMAT_VERSION, MIN_COMPATIBLE_GRAMMAR_VERSION};
use sylva::parser::{Parser, ParserConfig};

#[test]
fn test_clickhouse_language_loads_without_error() {
    let result = clickhouse::language();
    assert!(result.is_ok(), "load failed: {:?}", result.err());
}

#[test]
fn test_parser_binds_without_error() {
    let language = clickhouse::language().expect("grammar loads");
    let result = Parser::bind(&language);
    assert!(result.is_ok(), "bind failed: {:?}", result.err());
}

#[test]
fn test_bind_is_repeatable() {
    let language = clickhouse::language().expect("grammar loads");
    for _ in 0..3 {
        assert!(Parser::bind(&language).is_ok());
    }
    // and a fresh load binds just as well
    let reloaded = clickhouse::language().expect("grammar loads again");
    assert!(Parser::bind(&reloaded).is_ok());
}

#[test]
fn test_bind_with_custom_config() {
    let language = clickhouse::language().expect("grammar loads");
    let config = ParserConfig {
        error_recovery: false,
        token_insertion: false,
        max_errors: 1,
        cache_capacity: 1,
    };
    assert!(Parser::with_config(&language, config).is_ok());
}

#[test]
fn test_language_version_is_current() {
    let language = clickhouse::language().expect("grammar loads");
    assert_eq!(language.version(), GRAMMAR_FORMAT_VERSION);
    assert!(language.version() >= MIN_COMPATIBLE_GRAMMAR_VERSION);
}

#[test]
fn test_language_shared_across_threads() {
    let language = clickhouse::language().expect("grammar loads");
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let language = language.clone();
            std::thread::spawn(move || {
                let mut parser = Parser::bind(&language).expect("bind in thread");
                let text = format!("SELECT col{i} FROM t{i}");
                let result = parser.parse(&text);
                assert!(result.is_ok(), "thread {i}: {:?}", result.errors);
                result.tree.text()
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("thread completes");
    }
}

#[test]
fn test_out_of_window_version_rejected() {
    // grammar data is fine, only the recorded format version is off
    let mut artifact = clickhouse::grammar();
    artifact.version = GRAMMAR_FORMAT_VERSION + 1;
    assert!(matches!(
        Language::load(&artifact),
        Err(sylva::LanguageError::IncompatibleVersion { .. })
    ));

    artifact.version = MIN_COMPATIBLE_GRAMMAR_VERSION - 1;
    assert!(matches!(
        Language::load(&artifact),
        Err(sylva::LanguageError::IncompatibleVersion { .. })
    ));
}

#[test]
fn test_min_compatible_version_still_binds() {
    let mut artifact = clickhouse::grammar();
    artifact.version = MIN_COMPATIBLE_GRAMMAR_VERSION;
    let language = Language::load(&artifact).expect("older format still loads");
    assert!(Parser::bind(&language).is_ok());
}

#[test]
fn test_symbol_inventory_exposed() {
    let language = clickhouse::language().expect("grammar loads");
    assert_eq!(language.name(), "clickhouse");
    assert!(language.symbol_count() > 50);

    let select = language
        .kind_for_name("select_statement")
        .expect("select_statement exists");
    assert!(!language.is_terminal(select));
    assert_eq!(language.kind_name(select), Some("select_statement"));

    let kw = language.kind_for_name("SELECT").expect("SELECT exists");
    assert!(language.is_terminal(kw));
    assert!(language.is_keyword(kw));

    let ws = language.kind_for_name("whitespace").expect("whitespace");
    assert!(language.is_trivia(ws));

    assert_eq!(language.kind_name(language.entry_kind()), Some("source_file"));
}
