//! ClickHouse SQL grammar.
//!
//! Covers the day-to-day query and DDL surface: `SELECT` with CTEs and
//! scalar `WITH` aliases, `WHERE`/`GROUP BY`/`ORDER BY`/`LIMIT`,
//! `IS [NOT] NULL` tests, `CREATE TABLE` with column definitions
//! (modifiers, per-column and per-table `COMMENT`s), engines and table
//! clauses, and `INSERT` from `VALUES`, a subquery, or a `FORMAT`.
//! Keywords are case-insensitive and
//! unreserved: any keyword still parses as a plain identifier in positions
//! where the grammar does not claim it.
//!
//! Type and engine names (`UInt64`, `MergeTree`, ...) are ordinary
//! identifiers here; the grammar records where a type or engine is
//! expected, not the catalog of valid names.

use crate::error::LanguageError;
use crate::grammars::ArtifactAssembler;
use crate::language::{GrammarArtifact, Language, LexClass};

/// Load the ClickHouse grammar as a ready-to-bind [`Language`].
///
/// # Errors
///
/// Propagates [`LanguageError`] from [`Language::load`]; the bundled
/// artifact is expected to always load on a matching runtime.
pub fn language() -> Result<Language, LanguageError> {
    Language::load(&grammar())
}

/// The ClickHouse grammar artifact.
#[must_use]
#[allow(clippy::too_many_lines, clippy::similar_names)]
pub fn grammar() -> GrammarArtifact {
    let mut g = ArtifactAssembler::new("clickhouse");

    // trivia
    let _whitespace = g.trivia("whitespace", LexClass::Whitespace);
    let comment = g.trivia("comment", LexClass::LineComment("--".to_string()));
    g.extra_class(
        comment,
        LexClass::BlockComment("/*".to_string(), "*/".to_string()),
    );

    // literal classes
    let identifier = g.terminal("identifier", LexClass::Identifier);
    let number = g.terminal("number", LexClass::Number);
    let string_literal = g.terminal("string_literal", LexClass::String);

    // keywords
    let kw_select = g.keyword("SELECT");
    let kw_from = g.keyword("FROM");
    let kw_where = g.keyword("WHERE");
    let kw_group = g.keyword("GROUP");
    let kw_by = g.keyword("BY");
    let kw_order = g.keyword("ORDER");
    let kw_limit = g.keyword("LIMIT");
    let kw_create = g.keyword("CREATE");
    let kw_table = g.keyword("TABLE");
    let kw_if = g.keyword("IF");
    let kw_not = g.keyword("NOT");
    let kw_exists = g.keyword("EXISTS");
    let kw_on = g.keyword("ON");
    let kw_cluster = g.keyword("CLUSTER");
    let kw_engine = g.keyword("ENGINE");
    let kw_insert = g.keyword("INSERT");
    let kw_into = g.keyword("INTO");
    let kw_values = g.keyword("VALUES");
    let kw_format = g.keyword("FORMAT");
    let kw_and = g.keyword("AND");
    let kw_or = g.keyword("OR");
    let kw_like = g.keyword("LIKE");
    let kw_in = g.keyword("IN");
    let kw_as = g.keyword("AS");
    let kw_with = g.keyword("WITH");
    let kw_partition = g.keyword("PARTITION");
    let kw_primary = g.keyword("PRIMARY");
    let kw_key = g.keyword("KEY");
    let kw_sample = g.keyword("SAMPLE");
    let kw_ttl = g.keyword("TTL");
    let kw_settings = g.keyword("SETTINGS");
    let kw_asc = g.keyword("ASC");
    let kw_desc = g.keyword("DESC");
    let kw_null = g.keyword("NULL");
    let kw_default = g.keyword("DEFAULT");
    let kw_materialized = g.keyword("MATERIALIZED");
    let kw_alias = g.keyword("ALIAS");
    let kw_ephemeral = g.keyword("EPHEMERAL");
    let kw_comment = g.keyword("COMMENT");
    let kw_is = g.keyword("IS");

    // punctuation; multi-byte operators before their prefixes is not
    // required here, the lexer sorts for longest match itself
    let l_paren = g.punct("(");
    let r_paren = g.punct(")");
    let comma = g.punct(",");
    let semi = g.punct(";");
    let dot = g.punct(".");
    let eq = g.punct("=");
    let neq = g.punct("!=");
    let lt_eq = g.punct("<=");
    let gt_eq = g.punct(">=");
    let lt = g.punct("<");
    let gt = g.punct(">");
    let plus = g.punct("+");
    let minus = g.punct("-");
    let star = g.punct("*");
    let slash = g.punct("/");
    let percent = g.punct("%");

    // statements
    let source_file = g.non_terminal("source_file");
    let statement_list = g.non_terminal("_statement_list");
    let statement = g.non_terminal("_statement");
    let stmt_body = g.non_terminal("_statement_body");
    let semi_opt = g.non_terminal("_semicolon_opt");
    let select_statement = g.non_terminal("select_statement");
    let create_table_statement = g.non_terminal("create_table_statement");
    let insert_statement = g.non_terminal("insert_statement");

    // select
    let with_opt = g.non_terminal("_with_opt");
    let with_clause = g.non_terminal("with_clause");
    let cte_list = g.non_terminal("_cte_list");
    let cte = g.non_terminal("cte");
    let cse = g.non_terminal("cse");
    let select_clause = g.non_terminal("select_clause");
    let select_list = g.non_terminal("_select_list");
    let select_item = g.non_terminal("_select_item");
    let wildcard = g.non_terminal("wildcard");
    let aliased_expression = g.non_terminal("aliased_expression");
    let from_clause = g.non_terminal("from_clause");
    let where_opt = g.non_terminal("_where_opt");
    let where_clause = g.non_terminal("where_clause");
    let group_by_opt = g.non_terminal("_group_by_opt");
    let group_by_clause = g.non_terminal("group_by_clause");
    let order_by_opt = g.non_terminal("_order_by_opt");
    let order_by_clause = g.non_terminal("order_by_clause");
    let order_item_list = g.non_terminal("_order_item_list");
    let order_by_item = g.non_terminal("order_by_item");
    let direction_opt = g.non_terminal("_direction_opt");
    let limit_opt = g.non_terminal("_limit_opt");
    let limit_clause = g.non_terminal("limit_clause");
    let qualified_table_name = g.non_terminal("qualified_table_name");

    // create table
    let if_not_exists_opt = g.non_terminal("_if_not_exists_opt");
    let on_cluster_opt = g.non_terminal("_on_cluster_opt");
    let on_cluster_clause = g.non_terminal("on_cluster_clause");
    let column_defs = g.non_terminal("_column_definitions");
    let column_definition = g.non_terminal("column_definition");
    let data_type = g.non_terminal("_data_type");
    let primitive_type = g.non_terminal("primitive_type");
    let complex_type = g.non_terminal("complex_type");
    let null_opt = g.non_terminal("_null_constraint_opt");
    let null_constraint = g.non_terminal("null_constraint");
    let modifiers = g.non_terminal("_column_modifiers");
    let column_modifier = g.non_terminal("column_modifier");
    let engine_name = g.non_terminal("engine_name");
    let engine_params_opt = g.non_terminal("_engine_parameters_opt");
    let engine_parameters = g.non_terminal("engine_parameters");
    let table_clauses = g.non_terminal("_table_clauses");
    let table_clause = g.non_terminal("table_clause");
    let settings_list = g.non_terminal("settings_list");
    let setting_pairs = g.non_terminal("_setting_pairs");
    let setting_pair = g.non_terminal("setting_pair");

    // insert
    let column_list_opt = g.non_terminal("_column_list_opt");
    let column_list = g.non_terminal("column_list");
    let ident_list = g.non_terminal("_identifier_list");
    let insert_source = g.non_terminal("_insert_source");
    let values_clause = g.non_terminal("values_clause");
    let value_lists = g.non_terminal("_value_lists");
    let value_list = g.non_terminal("value_list");
    let format_clause = g.non_terminal("format_clause");

    // expressions, stratified by precedence; every level is hidden and the
    // operator rules alias to the two visible expression kinds
    let expression = g.non_terminal("_expression");
    let or_expr = g.non_terminal("_or_expression");
    let and_expr = g.non_terminal("_and_expression");
    let not_expr = g.non_terminal("_not_expression");
    let cmp_expr = g.non_terminal("_comparison_expression");
    let add_expr = g.non_terminal("_additive_expression");
    let mul_expr = g.non_terminal("_multiplicative_expression");
    let unary_expr = g.non_terminal("_unary");
    let primary = g.non_terminal("_primary_expression");
    let binary_expression = g.non_terminal("binary_expression");
    let unary_expression = g.non_terminal("unary_expression");
    let function_call = g.non_terminal("function_call");
    let arg_list_opt = g.non_terminal("_argument_list_opt");
    let arg_list = g.non_terminal("_argument_list");
    let arg = g.non_terminal("_argument");
    let parenthesized_expression = g.non_terminal("parenthesized_expression");
    let paren_body = g.non_terminal("_parenthesized_body");
    let expr_list = g.non_terminal("_expression_list");
    let expr_list_opt = g.non_terminal("_expression_list_opt");

    // source_file is a possibly empty statement sequence
    g.rule(source_file, &[statement_list]);
    g.rule(statement_list, &[statement_list, statement]);
    g.empty_rule(statement_list);
    g.rule(statement, &[stmt_body, semi_opt]);
    g.rule(stmt_body, &[select_statement]);
    g.rule(stmt_body, &[create_table_statement]);
    g.rule(stmt_body, &[insert_statement]);
    g.rule(semi_opt, &[semi]);
    g.empty_rule(semi_opt);

    // SELECT
    g.rule(
        select_statement,
        &[
            with_opt,
            select_clause,
            from_clause,
            where_opt,
            group_by_opt,
            order_by_opt,
            limit_opt,
        ],
    );
    g.rule(with_opt, &[with_clause]);
    g.empty_rule(with_opt);
    g.rule(with_clause, &[kw_with, cte_list]);
    g.rule(cte_list, &[cte_list, comma, cte]);
    g.rule(cte_list, &[cte_list, comma, cse]);
    g.rule(cte_list, &[cte]);
    g.rule(cte_list, &[cse]);
    g.rule(cte, &[expression, kw_as, l_paren, select_statement, r_paren]);
    g.rule(cse, &[expression, kw_as, identifier]);

    g.rule(select_clause, &[kw_select, select_list]);
    g.rule(select_list, &[select_list, comma, select_item]);
    g.rule(select_list, &[select_item]);
    g.rule(select_item, &[wildcard]);
    g.rule(select_item, &[aliased_expression]);
    g.rule(select_item, &[expression]);
    g.rule(wildcard, &[star]);
    g.rule(aliased_expression, &[expression, kw_as, identifier]);

    g.rule(from_clause, &[kw_from, qualified_table_name]);
    g.rule(
        from_clause,
        &[kw_from, l_paren, select_statement, r_paren],
    );
    g.rule(qualified_table_name, &[identifier, dot, identifier]);
    g.rule(qualified_table_name, &[identifier]);

    g.rule(where_opt, &[where_clause]);
    g.empty_rule(where_opt);
    g.rule(where_clause, &[kw_where, expression]);

    g.rule(group_by_opt, &[group_by_clause]);
    g.empty_rule(group_by_opt);
    g.rule(group_by_clause, &[kw_group, kw_by, expr_list]);

    g.rule(order_by_opt, &[order_by_clause]);
    g.empty_rule(order_by_opt);
    g.rule(order_by_clause, &[kw_order, kw_by, order_item_list]);
    g.rule(order_item_list, &[order_item_list, comma, order_by_item]);
    g.rule(order_item_list, &[order_by_item]);
    g.rule(order_by_item, &[expression, direction_opt]);
    g.rule(direction_opt, &[kw_asc]);
    g.rule(direction_opt, &[kw_desc]);
    g.empty_rule(direction_opt);

    g.rule(limit_opt, &[limit_clause]);
    g.empty_rule(limit_opt);
    g.rule(limit_clause, &[kw_limit, number]);

    // CREATE TABLE
    g.rule(
        create_table_statement,
        &[
            kw_create,
            kw_table,
            if_not_exists_opt,
            qualified_table_name,
            on_cluster_opt,
            l_paren,
            column_defs,
            r_paren,
            kw_engine,
            eq,
            engine_name,
            engine_params_opt,
            table_clauses,
        ],
    );
    g.rule(if_not_exists_opt, &[kw_if, kw_not, kw_exists]);
    g.empty_rule(if_not_exists_opt);
    g.rule(on_cluster_opt, &[on_cluster_clause]);
    g.empty_rule(on_cluster_opt);
    g.rule(on_cluster_clause, &[kw_on, kw_cluster, identifier]);

    g.rule(column_defs, &[column_defs, comma, column_definition]);
    g.rule(column_defs, &[column_definition]);
    g.rule(
        column_definition,
        &[identifier, data_type, null_opt, modifiers],
    );
    g.rule(data_type, &[primitive_type]);
    g.rule(data_type, &[complex_type]);
    g.rule(primitive_type, &[identifier]);
    g.rule(complex_type, &[identifier, l_paren, expr_list, r_paren]);
    g.rule(null_opt, &[null_constraint]);
    g.empty_rule(null_opt);
    g.rule(null_constraint, &[kw_null]);
    g.rule(null_constraint, &[kw_not, kw_null]);
    g.rule(modifiers, &[modifiers, column_modifier]);
    g.empty_rule(modifiers);
    g.rule(column_modifier, &[kw_default, expression]);
    g.rule(column_modifier, &[kw_materialized, expression]);
    g.rule(column_modifier, &[kw_alias, expression]);
    g.rule(column_modifier, &[kw_ephemeral, expression]);
    g.rule(column_modifier, &[kw_ttl, expression]);
    g.rule(column_modifier, &[kw_comment, string_literal]);

    g.rule(engine_name, &[identifier]);
    g.rule(engine_params_opt, &[engine_parameters]);
    g.empty_rule(engine_params_opt);
    g.rule(engine_parameters, &[l_paren, expr_list_opt, r_paren]);

    g.rule(table_clauses, &[table_clauses, table_clause]);
    g.empty_rule(table_clauses);
    g.rule(table_clause, &[kw_partition, kw_by, expression]);
    g.rule(table_clause, &[kw_order, kw_by, expression]);
    g.rule(table_clause, &[kw_primary, kw_key, expression]);
    g.rule(table_clause, &[kw_sample, kw_by, expression]);
    g.rule(table_clause, &[kw_ttl, expression]);
    g.rule(table_clause, &[kw_settings, settings_list]);
    g.rule(table_clause, &[kw_comment, string_literal]);
    g.rule(settings_list, &[setting_pairs]);
    g.rule(setting_pairs, &[setting_pairs, comma, setting_pair]);
    g.rule(setting_pairs, &[setting_pair]);
    g.rule(setting_pair, &[identifier, eq, expression]);

    // INSERT
    g.rule(
        insert_statement,
        &[kw_insert, kw_into, identifier, column_list_opt, insert_source],
    );
    g.rule(column_list_opt, &[column_list]);
    g.empty_rule(column_list_opt);
    g.rule(column_list, &[l_paren, ident_list, r_paren]);
    g.rule(ident_list, &[ident_list, comma, identifier]);
    g.rule(ident_list, &[identifier]);
    g.rule(insert_source, &[values_clause]);
    g.rule(insert_source, &[select_statement]);
    g.rule(insert_source, &[format_clause]);
    g.rule(values_clause, &[kw_values, value_lists]);
    g.rule(value_lists, &[value_lists, comma, value_list]);
    g.rule(value_lists, &[value_list]);
    g.rule(value_list, &[l_paren, expr_list, r_paren]);
    g.rule(format_clause, &[kw_format, identifier]);

    // expressions
    g.rule(expression, &[or_expr]);
    g.aliased_rule(or_expr, &[or_expr, kw_or, and_expr], binary_expression);
    g.rule(or_expr, &[and_expr]);
    g.aliased_rule(and_expr, &[and_expr, kw_and, not_expr], binary_expression);
    g.rule(and_expr, &[not_expr]);
    g.aliased_rule(not_expr, &[kw_not, not_expr], unary_expression);
    g.rule(not_expr, &[cmp_expr]);
    for op in [eq, neq, lt, gt, lt_eq, gt_eq, kw_like, kw_in] {
        g.aliased_rule(cmp_expr, &[add_expr, op, add_expr], binary_expression);
    }
    g.aliased_rule(cmp_expr, &[add_expr, kw_is, kw_null], binary_expression);
    g.aliased_rule(
        cmp_expr,
        &[add_expr, kw_is, kw_not, kw_null],
        binary_expression,
    );
    g.rule(cmp_expr, &[add_expr]);
    for op in [plus, minus] {
        g.aliased_rule(add_expr, &[add_expr, op, mul_expr], binary_expression);
    }
    g.rule(add_expr, &[mul_expr]);
    for op in [star, slash, percent] {
        g.aliased_rule(mul_expr, &[mul_expr, op, unary_expr], binary_expression);
    }
    g.rule(mul_expr, &[unary_expr]);
    for op in [minus, plus] {
        g.aliased_rule(unary_expr, &[op, unary_expr], unary_expression);
    }
    g.rule(unary_expr, &[primary]);
    g.rule(primary, &[identifier]);
    g.rule(primary, &[number]);
    g.rule(primary, &[string_literal]);
    g.rule(primary, &[function_call]);
    g.rule(primary, &[parenthesized_expression]);

    g.rule(function_call, &[identifier, l_paren, arg_list_opt, r_paren]);
    g.rule(arg_list_opt, &[arg_list]);
    g.empty_rule(arg_list_opt);
    g.rule(arg_list, &[arg_list, comma, arg]);
    g.rule(arg_list, &[arg]);
    g.rule(arg, &[wildcard]);
    g.rule(arg, &[expression]);

    g.rule(
        parenthesized_expression,
        &[l_paren, paren_body, r_paren],
    );
    g.rule(paren_body, &[select_statement]);
    g.rule(paren_body, &[expr_list]);
    g.rule(expr_list, &[expr_list, comma, expression]);
    g.rule(expr_list, &[expression]);
    g.rule(expr_list_opt, &[expr_list]);
    g.empty_rule(expr_list_opt);

    g.finish(source_file)
}
