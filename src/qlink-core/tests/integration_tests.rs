//! Integration tests for qlink-core
//!
//! These cover schema resolution end to end: the success path, each error
//! kind, ordering contracts, and the all-or-nothing guarantee.

use std::collections::HashMap;
use std::sync::Arc;

use common_error::QlinkError;
use proptest::prelude::*;
use qlink_core::testing::{
    accounts_table, get_account_query, get_balance_query, get_token_query, name, registry,
    sample_schema, tokens_table,
};
use qlink_core::*;

fn type_names(types: &[TypeDescriptor]) -> Vec<&str> {
    types.iter().map(|t| t.name.as_str()).collect()
}

fn assert_unresolved(schema: &Schema) {
    assert!(!schema.is_prepared());
    for table in schema.tables() {
        assert!(table.resolved_types().is_empty());
        assert!(table.field("id").is_none());
        assert!(table.fields.iter().all(|f| f.resolved_type().is_none()));
        assert!(table
            .keys
            .iter()
            .chain(&table.history_keys)
            .all(|k| k.resolved_field().is_none()));
    }
    for query in schema.queries() {
        assert!(query.resolved_table().is_none());
        assert!(query.resolved_join_table().is_none());
        assert!(query.resolved_join_query().is_none());
        assert!(query.resolved_arg_types().is_empty());
        assert!(query.resolved_range_types().is_empty());
        assert!(query.resolved_result_types().is_empty());
        assert!(query
            .args
            .iter()
            .chain(&query.sort_keys)
            .chain(&query.join_key_values)
            .chain(&query.fields_from_join)
            .all(|k| k.resolved_field().is_none()));
    }
}

#[test]
fn test_prepare_populates_everything() {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut schema = sample_schema();
    assert_unresolved(&schema);
    schema.prepare(&registry()).unwrap();
    assert!(schema.is_prepared());

    for table in schema.tables() {
        assert_eq!(table.resolved_types().len(), table.fields.len());
        for field in &table.fields {
            assert!(field.resolved_type().is_some());
            assert_eq!(table.field(&field.name), Some(field));
        }
        for key in table.keys.iter().chain(&table.history_keys) {
            let field = schema.field(key.resolved_field().unwrap()).unwrap();
            assert_eq!(field.name, key.name);
        }
    }

    for query in schema.queries() {
        let table = schema.query_table(query).unwrap();
        assert_eq!(table.name, query.table_name);
        assert_eq!(query.resolved_arg_types().len(), query.args.len());
        assert_eq!(query.resolved_range_types().len(), query.sort_keys.len());
        for key in query.args.iter().chain(&query.sort_keys) {
            assert!(key.resolved_field().is_some());
        }
        assert_eq!(schema.query(query.identifier), Some(query));
    }
}

#[test]
fn test_example_a_range_and_result_types() {
    let mut schema = Schema::new()
        .with_table(accounts_table())
        .with_query(get_account_query());
    schema.prepare(&registry()).unwrap();

    let query = schema.query(name("getaccount")).unwrap();
    assert_eq!(type_names(query.resolved_range_types()), vec!["uint64"]);
    assert_eq!(
        type_names(query.resolved_result_types()),
        vec!["uint64", "asset"]
    );
    assert_eq!(type_names(query.resolved_arg_types()), vec!["uint64"]);
    assert!(query.resolved_join_table().is_none());
    assert!(query.resolved_join_query().is_none());
}

#[test]
fn test_example_b_join_result_order() {
    let mut schema = sample_schema();
    schema.prepare(&registry()).unwrap();

    let query = schema.query(name("getbalance")).unwrap();
    assert_eq!(
        type_names(query.resolved_result_types()),
        vec!["uint64", "asset", "symbol"]
    );

    let join_table = schema.query_join_table(query).unwrap();
    assert_eq!(join_table.name, "tokens");
    let join_query = schema.query_join_query(query).unwrap();
    assert_eq!(join_query.identifier, name("gettoken"));

    let from_join = query.fields_from_join[0].resolved_field().unwrap();
    assert_eq!(from_join.table(), schema.table_id("tokens").unwrap());
    assert_eq!(schema.field(from_join).unwrap().name, "symbol");

    let join_key = query.join_key_values[0].resolved_field().unwrap();
    assert_eq!(join_key.table(), schema.table_id("accounts").unwrap());
}

#[test]
fn test_join_fields_follow_declared_order() {
    let query = Query::new(name("twofields"), "accounts")
        .with_join("tokens", name("twofields"))
        .with_field_from_join(Key::new("issuer"))
        .with_field_from_join(Key::new("symbol"));
    let mut schema = Schema::new()
        .with_table(accounts_table())
        .with_table(tokens_table())
        .with_query(query);
    schema.prepare(&registry()).unwrap();

    let query = &schema.queries()[0];
    assert_eq!(
        type_names(query.resolved_result_types()),
        vec!["uint64", "asset", "name", "symbol"]
    );
}

#[test]
fn test_non_join_result_equals_table_types() {
    let mut schema = sample_schema();
    schema.prepare(&registry()).unwrap();

    for query in schema.queries().iter().filter(|q| !q.is_join()) {
        let table = schema.query_table(query).unwrap();
        assert_eq!(query.resolved_result_types(), table.resolved_types());
    }
}

#[test]
fn test_sort_key_type_override() {
    let table = Table::new("ledger")
        .with_field(Field::new("id", "uint64"))
        .with_field(Field::new("owner", "name"));
    let query = Query::new(name("byowner"), "ledger")
        .with_sort_key(Key::new("owner").with_type("string"))
        .with_sort_key(Key::new("id"));
    let mut schema = Schema::new().with_table(table).with_query(query);
    schema.prepare(&registry()).unwrap();

    let query = &schema.queries()[0];
    assert_eq!(
        type_names(query.resolved_range_types()),
        vec!["string", "uint64"]
    );
}

#[test]
fn test_unknown_field_type() {
    let table = Table::new("accounts")
        .with_field(Field::new("id", "uint64"))
        .with_field(Field::new("balance", "money"));
    let mut schema = Schema::new().with_table(table);

    let err = schema.prepare(&registry()).unwrap_err();
    match &err {
        QlinkError::UnknownType { owner, type_name } => {
            assert_eq!(owner, "table accounts field balance");
            assert_eq!(type_name, "money");
        }
        other => panic!("expected UnknownType, got {other:?}"),
    }
    assert_eq!(
        err.to_string(),
        "table accounts field balance: unknown type: money"
    );
    assert_unresolved(&schema);
}

#[test]
fn test_table_key_unknown_field() {
    let table = accounts_table().with_key(Key::new("owner"));
    let mut schema = Schema::new().with_table(table);

    let err = schema.prepare(&registry()).unwrap_err();
    assert_eq!(err.to_string(), "table accounts: unknown field: owner");
}

#[test]
fn test_query_key_unknown_field() {
    let query = get_account_query().with_sort_key(Key::new("owner"));
    let mut schema = Schema::new()
        .with_table(accounts_table())
        .with_query(query);

    let err = schema.prepare(&registry()).unwrap_err();
    match err {
        QlinkError::UnknownField { owner, field } => {
            assert_eq!(owner, "query getaccount table accounts");
            assert_eq!(field, "owner");
        }
        other => panic!("expected UnknownField, got {other:?}"),
    }
    assert_unresolved(&schema);
}

#[test]
fn test_join_field_unknown_field() {
    // resolvable against the queried table, not the joined one
    let query = get_balance_query().with_field_from_join(Key::new("balance"));
    let mut schema = Schema::new()
        .with_table(accounts_table())
        .with_table(tokens_table())
        .with_query(get_token_query())
        .with_query(query);

    let err = schema.prepare(&registry()).unwrap_err();
    assert_eq!(err.to_string(), "query getbalance: unknown field: balance");
}

#[test]
fn test_join_field_with_type_override_still_needs_field() {
    let query = get_balance_query().with_field_from_join(Key::new("supply").with_type("asset"));
    let mut schema = Schema::new()
        .with_table(accounts_table())
        .with_table(tokens_table())
        .with_query(get_token_query())
        .with_query(query);

    let err = schema.prepare(&registry()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "query getbalance table tokens: unknown field: supply"
    );
}

#[test]
fn test_unknown_arg_type() {
    let query = get_account_query().with_arg(Key::new("balance"));
    let mut schema = Schema::new()
        .with_table(accounts_table())
        .with_query(query);

    // args have no derived type: an empty type name is looked up as-is
    let err = schema.prepare(&registry()).unwrap_err();
    assert_eq!(err.to_string(), "query getaccount arg balance: unknown type: ");
}

#[test]
fn test_unknown_sort_key_type() {
    let query = get_account_query().with_sort_key(Key::new("balance").with_type("money"));
    let mut schema = Schema::new()
        .with_table(accounts_table())
        .with_query(query);

    let err = schema.prepare(&registry()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "query getaccount key balance: unknown type: money"
    );
}

#[test]
fn test_unknown_table() {
    let mut schema = Schema::new()
        .with_table(accounts_table())
        .with_query(get_token_query());

    let err = schema.prepare(&registry()).unwrap_err();
    assert_eq!(err.to_string(), "query gettoken: unknown table: tokens");
    assert_unresolved(&schema);
}

#[test]
fn test_unknown_join_table() {
    let query = get_account_query().with_join("balances", name("getaccount"));
    let mut schema = Schema::new()
        .with_table(accounts_table())
        .with_query(query);

    let err = schema.prepare(&registry()).unwrap_err();
    assert!(matches!(
        err,
        QlinkError::UnknownTable { ref table, .. } if table == "balances"
    ));
}

#[test]
fn test_example_c_unknown_join_query() {
    let query = get_balance_query().with_join("tokens", name("nosuchquery"));
    let mut schema = Schema::new()
        .with_table(accounts_table())
        .with_table(tokens_table())
        .with_query(query);

    let err = schema.prepare(&registry()).unwrap_err();
    match &err {
        QlinkError::UnknownQuery {
            query,
            declared_later,
            ..
        } => {
            assert_eq!(query, "nosuchquery");
            assert!(!declared_later);
        }
        other => panic!("expected UnknownQuery, got {other:?}"),
    }
    assert_unresolved(&schema);
}

#[test]
fn test_join_query_declared_later_is_rejected() {
    let mut schema = Schema::new()
        .with_table(accounts_table())
        .with_table(tokens_table())
        .with_query(get_balance_query())
        .with_query(get_token_query());

    let err = schema.prepare(&registry()).unwrap_err();
    assert!(matches!(
        err,
        QlinkError::UnknownQuery {
            declared_later: true,
            ..
        }
    ));
    assert_eq!(
        err.to_string(),
        "query getbalance: unknown join query: gettoken (declared after the referencing query)"
    );
}

#[test]
fn test_query_may_join_itself() {
    let query = Query::new(name("selfjoin"), "accounts")
        .with_join("tokens", name("selfjoin"))
        .with_field_from_join(Key::new("symbol"));
    let mut schema = Schema::new()
        .with_table(accounts_table())
        .with_table(tokens_table())
        .with_query(query);
    schema.prepare(&registry()).unwrap();

    let query = &schema.queries()[0];
    assert_eq!(query.resolved_join_query(), schema.query_id(name("selfjoin")));
}

#[test]
fn test_join_without_join_query() {
    let mut query = get_balance_query();
    query.join_query_identifier = None;
    let mut schema = Schema::new()
        .with_table(accounts_table())
        .with_table(tokens_table())
        .with_query(query);

    let err = schema.prepare(&registry()).unwrap_err();
    assert!(matches!(err, QlinkError::UnknownQuery { ref query, .. } if query.is_empty()));
}

#[test]
fn test_empty_join_name_means_no_join() {
    let mut query = get_account_query().with_field_from_join(Key::new("whatever"));
    query.join_table_name = Some(String::new());
    let mut schema = Schema::new()
        .with_table(accounts_table())
        .with_query(query);
    schema.prepare(&registry()).unwrap();

    let query = &schema.queries()[0];
    assert!(query.resolved_join_table().is_none());
    assert_eq!(query.resolved_result_types().len(), 2);
}

#[test]
fn test_duplicate_table_name() {
    let mut schema = Schema::new()
        .with_table(accounts_table())
        .with_table(accounts_table());

    let err = schema.prepare(&registry()).unwrap_err();
    assert_eq!(err.to_string(), "duplicate table name: accounts");
    assert_unresolved(&schema);
}

#[test]
fn test_duplicate_query_identifier() {
    let mut schema = Schema::new()
        .with_table(accounts_table())
        .with_query(get_account_query())
        .with_query(get_account_query().with_max_results(5));

    let err = schema.prepare(&registry()).unwrap_err();
    assert_eq!(err.to_string(), "duplicate query name: getaccount");
}

#[test]
fn test_duplicate_field_name() {
    let table = accounts_table().with_field(Field::new("id", "name"));
    let mut schema = Schema::new().with_table(table);

    let err = schema.prepare(&registry()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "duplicate field in table accounts name: id"
    );
}

#[test]
fn test_prepare_twice_is_rejected() {
    let mut schema = sample_schema();
    schema.prepare(&registry()).unwrap();
    let before = schema.clone();

    let err = schema.prepare(&registry()).unwrap_err();
    assert!(matches!(err, QlinkError::AlreadyPrepared));
    assert_eq!(schema, before);
    assert!(schema.is_prepared());
}

#[test]
fn test_failed_prepare_can_be_retried_with_fixed_registry() {
    let mut schema = sample_schema();
    let mut partial = registry();
    partial.remove("symbol");

    assert!(schema.prepare(&partial).is_err());
    assert_unresolved(&schema);

    schema.prepare(&registry()).unwrap();
    assert!(schema.is_prepared());
}

#[test]
fn test_appending_discards_resolution() {
    let mut schema = Schema::new().with_table(accounts_table());
    schema.prepare(&registry()).unwrap();

    let mut schema = schema.with_table(tokens_table());
    assert_unresolved(&schema);
    schema.prepare(&registry()).unwrap();
    assert_eq!(schema.tables().len(), 2);
}

#[test]
fn test_cloned_entities_arrive_unresolved() {
    let mut prepared = sample_schema();
    prepared.prepare(&registry()).unwrap();

    let mut balance = prepared.query(name("getbalance")).unwrap().clone();
    balance.join_table_name = None;
    balance.join_query_identifier = None;
    let mut schema = Schema::from_parts(
        prepared.tables().to_vec(),
        vec![prepared.query(name("gettoken")).unwrap().clone(), balance],
    );
    assert_unresolved(&schema);

    schema.prepare(&registry()).unwrap();
    let query = schema.query(name("getbalance")).unwrap();
    assert!(query.resolved_join_table().is_none());
    assert!(query.resolved_join_query().is_none());
    assert!(query
        .fields_from_join
        .iter()
        .all(|k| k.resolved_field().is_none()));
    assert_eq!(
        type_names(query.resolved_result_types()),
        vec!["uint64", "asset"]
    );
}

#[test]
fn test_appended_clone_of_resolved_table_is_unresolved() {
    let mut prepared = Schema::new().with_table(accounts_table());
    prepared.prepare(&registry()).unwrap();

    // tokens is missing, so prepare fails after the table stage
    let mut schema = Schema::new()
        .with_table(prepared.tables()[0].clone())
        .with_query(prepared_query_clone());
    assert_unresolved(&schema);

    assert!(schema.prepare(&registry()).is_err());
    assert_unresolved(&schema);
    assert!(schema.tables()[0].field("id").is_none());
}

fn prepared_query_clone() -> Query {
    let mut schema = Schema::new()
        .with_table(tokens_table())
        .with_query(get_token_query());
    schema.prepare(&registry()).unwrap();
    schema.queries()[0].clone()
}

#[test]
fn test_tables_resolve_before_queries() {
    // the query's table is declared after the table list is complete, so
    // declaration order of tables relative to queries never matters
    let mut schema = Schema::from_parts(
        vec![tokens_table(), accounts_table()],
        vec![get_account_query()],
    );
    schema.prepare(&registry()).unwrap();
    assert_eq!(
        schema.queries()[0].resolved_table(),
        schema.table_id("accounts")
    );
}

#[test]
fn test_custom_descriptor_type() {
    let registry: HashMap<String, usize> = [("uint64", 8), ("asset", 16)]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

    let table = Table::<usize>::new("accounts")
        .with_field(Field::new("id", "uint64"))
        .with_field(Field::new("balance", "asset"));
    let query = Query::<usize>::new(name("getaccount"), "accounts").with_sort_key(Key::new("id"));
    let mut schema = Schema::new().with_table(table).with_query(query);
    schema.prepare(&registry).unwrap();

    assert_eq!(schema.queries()[0].resolved_result_types(), &[8, 16]);
    assert_eq!(schema.queries()[0].resolved_range_types(), &[8]);
}

#[test]
fn test_named_registry() {
    let mut schema = sample_schema();
    schema.prepare(&NamedTypeRegistry::builtin()).unwrap();
    assert!(schema.is_prepared());
}

#[test]
fn test_resolved_schema_is_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Schema>();

    let mut schema = sample_schema();
    schema.prepare(&registry()).unwrap();
    let shared = Arc::new(schema);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let schema = Arc::clone(&shared);
            std::thread::spawn(move || {
                let query = schema.query(name("getbalance")).unwrap();
                query.resolved_result_types().len()
            })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), 3);
    }
}

proptest! {
    #[test]
    fn test_result_types_follow_field_order(
        types in prop::collection::vec(
            prop::sample::select(vec!["uint64", "asset", "symbol", "name", "string"]),
            1..12
        )
    ) {
        let mut table = Table::new("wide");
        for (i, ty) in types.iter().enumerate() {
            table = table.with_field(Field::new(format!("f{i}"), *ty));
        }
        let query = Query::new(name("scan"), "wide");
        let mut schema = Schema::new().with_table(table).with_query(query);
        schema.prepare(&registry()).unwrap();

        let query = &schema.queries()[0];
        prop_assert_eq!(type_names(query.resolved_result_types()), types.clone());
        prop_assert_eq!(type_names(schema.tables()[0].resolved_types()), types);
    }

    #[test]
    fn test_missing_type_always_fails(
        missing in prop::sample::select(vec!["uint64", "asset", "symbol", "name"])
    ) {
        let mut partial = registry();
        partial.remove(missing);
        let mut schema = sample_schema();

        let err = schema.prepare(&partial).unwrap_err();
        let is_unknown_type = matches!(err, QlinkError::UnknownType { ref type_name, .. } if type_name == missing);
        prop_assert!(is_unknown_type);
        prop_assert!(!schema.is_prepared());
    }

    #[test]
    fn test_name_text_roundtrip(text in "[1-5a-z]([.1-5a-z]{0,10}[1-5a-z])?") {
        let parsed: Name = text.parse().unwrap();
        prop_assert_eq!(parsed.to_string(), text);
    }
}
