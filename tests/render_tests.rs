use chrono::NaiveDate;
use polyquery::{
    Dialect, Error, Map, Rendered, Value, expression_from_filter, render,
};
use serde_json::json;

fn obj(pairs: Vec<(&str, Value)>) -> Value {
    let mut map = Map::new();
    for (k, v) in pairs {
        map.insert(k.to_string(), v);
    }
    Value::Object(map)
}

fn cond(field: &str, op: &str, operand: Value) -> Value {
    obj(vec![(field, obj(vec![(op, operand)]))])
}

fn ts(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> Value {
    Value::DateTime(
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap(),
    )
}

fn query(filter: &Value, dialect: Dialect) -> String {
    expression_from_filter(filter)
        .unwrap()
        .to_query(dialect)
        .unwrap()
}

fn query_err(filter: &Value, dialect: Dialect) -> Error {
    expression_from_filter(filter)
        .unwrap()
        .to_query(dialect)
        .unwrap_err()
}

fn metric_filter() -> Value {
    obj(vec![
        ("rule_id", Value::from(vec![
            Value::from(6666),
            Value::from("7777"),
            Value::from(8888),
        ])),
        ("act_type", Value::from("logging")),
        ("expected_fire_volume", Value::from(10000)),
        ("expected_fire_rate", Value::from(99.9)),
        ("or", Value::Array(vec![
            obj(vec![
                ("create_ts", obj(vec![
                    ("lte", ts(2015, 12, 31, 12, 5)),
                    ("gt", ts(2014, 1, 1, 0, 0)),
                ])),
                ("version", obj(vec![
                    ("lt", Value::from(3)),
                    ("gte", Value::from(1)),
                ])),
            ]),
            obj(vec![("version", obj(vec![("eq", Value::from(4))]))]),
        ])),
        ("and", Value::Array(vec![
            obj(vec![("rule_name", Value::from("/logging_.*/"))]),
            obj(vec![("rule_name", obj(vec![("neq", Value::from("logging_rddms"))]))]),
            obj(vec![("rule_name", obj(vec![("iregex", Value::from("logging_r..s"))]))]),
        ])),
    ])
}

#[test]
fn test_influxql_metric_filter() {
    let expected = r#"("act_type" = 'logging') AND ("expected_fire_rate" = 99.9) AND ("expected_fire_volume" = 10000) AND ("rule_name" != 'logging_rddms') AND ("rule_name" !~ /logging_r..s/) AND ("rule_name" =~ /logging_.*/) AND (("rule_id" = '7777') OR ("rule_id" = 6666) OR ("rule_id" = 8888)) AND (("version" = 4) OR (("create_ts" <= '2015-12-31T12:05:00Z') AND ("create_ts" > '2014-01-01T00:00:00Z') AND ("version" < 3) AND ("version" >= 1)))"#;
    assert_eq!(query(&metric_filter(), Dialect::InfluxQl), expected);
}

#[test]
fn test_conjunction_branches_sort_before_joining() {
    let filter = obj(vec![
        ("b", Value::from(2)),
        ("a", Value::from(1)),
    ]);
    assert_eq!(
        query(&filter, Dialect::InfluxQl),
        r#"("a" = 1) AND ("b" = 2)"#
    );
}

#[test]
fn test_empty_conjunction_renders_empty() {
    let filter = obj(vec![]);
    assert_eq!(query(&filter, Dialect::InfluxQl), "");
    assert_eq!(query(&filter, Dialect::Sql), "");
    assert_eq!(
        expression_from_filter(&filter)
            .unwrap()
            .to_document()
            .unwrap(),
        json!({ "$and": [] })
    );
}

#[test]
fn test_sql_tokens() {
    assert_eq!(query(&cond("a", "eq", Value::from("x")), Dialect::Sql), "a = 'x'");
    assert_eq!(query(&cond("a", "neq", Value::from(1)), Dialect::Sql), "a <> 1");
    assert_eq!(query(&cond("a", "gt", Value::from(1)), Dialect::Sql), "a > 1");
    assert_eq!(query(&cond("a", "gte", Value::from(1)), Dialect::Sql), "a >= 1");
    assert_eq!(query(&cond("a", "lt", Value::from(1)), Dialect::Sql), "a < 1");
    assert_eq!(query(&cond("a", "lte", Value::from(1)), Dialect::Sql), "a <= 1");
    assert_eq!(
        query(&cond("a", "regex", Value::from("x.*")), Dialect::Sql),
        "a REGEXP 'x.*'"
    );
    assert_eq!(
        query(&cond("a", "iregex", Value::from("x.*")), Dialect::Sql),
        "a NOT REGEXP 'x.*'"
    );
    assert_eq!(
        query(&cond("a", "in", Value::from(vec![1, 2])), Dialect::Sql),
        "a IN (1, 2)"
    );
    assert_eq!(
        query(&cond("a", "nin", Value::from(vec![1, 2])), Dialect::Sql),
        "a NOT IN (1, 2)"
    );
    assert_eq!(query(&cond("a", "null", Value::from(true)), Dialect::Sql), "a IS NULL");
    assert_eq!(
        query(&cond("a", "null", Value::from(false)), Dialect::Sql),
        "a IS NOT NULL"
    );
    assert_eq!(query(&cond("a", "eq", Value::from(true)), Dialect::Sql), "a = TRUE");
    assert_eq!(
        query(&cond("a", "gte", ts(2015, 12, 31, 12, 5)), Dialect::Sql),
        "a >= '2015-12-31 12:05:00'"
    );
}

#[test]
fn test_sql_negation_wraps_in_not() {
    let filter = obj(vec![("not", obj(vec![("a", Value::from(1))]))]);
    assert_eq!(query(&filter, Dialect::Sql), "NOT (a = 1)");
}

#[test]
fn test_sql_field_comparison_renders_bare_names() {
    assert_eq!(query(&cond("a", "gtf", Value::from("b")), Dialect::Sql), "a > b");
    assert_eq!(
        query(&cond("a", "gtf", Value::from("b")), Dialect::InfluxQl),
        r#""a" > "b""#
    );
}

#[test]
fn test_dataframe_tokens() {
    assert_eq!(
        query(&cond("a", "eq", Value::from("x")), Dialect::Dataframe),
        "a == 'x'"
    );
    assert_eq!(
        query(&cond("a", "neq", Value::from(1)), Dialect::Dataframe),
        "a != 1"
    );
    assert_eq!(
        query(&cond("a", "in", Value::from(vec![1, 2])), Dialect::Dataframe),
        "a in [1, 2]"
    );
    assert_eq!(
        query(&cond("a", "nin", Value::from(vec![1, 2])), Dialect::Dataframe),
        "a not in [1, 2]"
    );
    assert_eq!(
        query(&cond("a", "null", Value::from(true)), Dialect::Dataframe),
        "a.isnull()"
    );
    assert_eq!(
        query(&cond("a", "null", Value::from(false)), Dialect::Dataframe),
        "a.notnull()"
    );
    assert_eq!(
        query(&cond("a", "eq", Value::from(true)), Dialect::Dataframe),
        "a == True"
    );

    let filter = obj(vec![("a", Value::from(1)), ("b", Value::from(2))]);
    assert_eq!(query(&filter, Dialect::Dataframe), "(a == 1) & (b == 2)");

    let filter = obj(vec![(
        "or",
        Value::Array(vec![
            obj(vec![("a", Value::from(1))]),
            obj(vec![("b", Value::from(2))]),
        ]),
    )]);
    assert_eq!(query(&filter, Dialect::Dataframe), "(a == 1) | (b == 2)");

    let filter = obj(vec![("not", obj(vec![("a", Value::from(1))]))]);
    assert_eq!(query(&filter, Dialect::Dataframe), "~(a == 1)");
}

#[test]
fn test_narrative_wording() {
    assert_eq!(
        query(&cond("a", "eq", Value::from("x")), Dialect::Narrative),
        "a equals 'x'"
    );
    assert_eq!(
        query(&cond("a", "neq", Value::from(1)), Dialect::Narrative),
        "a does not equal 1"
    );
    assert_eq!(
        query(&cond("a", "gt", Value::from(1)), Dialect::Narrative),
        "a is more than 1"
    );
    assert_eq!(
        query(&cond("a", "gte", Value::from(1)), Dialect::Narrative),
        "a is at least 1"
    );
    assert_eq!(
        query(&cond("a", "lt", Value::from(1)), Dialect::Narrative),
        "a is less than 1"
    );
    assert_eq!(
        query(&cond("a", "lte", Value::from(1)), Dialect::Narrative),
        "a is at most 1"
    );
    assert_eq!(
        query(&cond("a", "null", Value::from(true)), Dialect::Narrative),
        "a is null"
    );
    assert_eq!(
        query(&cond("a", "missing", Value::from(true)), Dialect::Narrative),
        "a is missing"
    );
    assert_eq!(
        query(&cond("a", "missing", Value::from(false)), Dialect::Narrative),
        "a is present"
    );

    let filter = obj(vec![("a", Value::from(1)), ("b", Value::from(2))]);
    assert_eq!(
        query(&filter, Dialect::Narrative),
        "(a equals 1) and (b equals 2)"
    );

    let filter = obj(vec![("not", obj(vec![("a", Value::from(1))]))]);
    assert_eq!(
        query(&filter, Dialect::Narrative),
        "it is not true that (a equals 1)"
    );
}

#[test]
fn test_narrative_any_renders_bullet_list() {
    let filter = obj(vec![(
        "any",
        Value::Array(vec![
            obj(vec![("b", Value::from(2))]),
            obj(vec![("a", Value::from(1))]),
        ]),
    )]);
    assert_eq!(
        query(&filter, Dialect::Narrative),
        "any of the following:\n  - a equals 1\n  - b equals 2"
    );
}

#[test]
fn test_any_matches_plain_disjunction_outside_narrative() {
    let filter = obj(vec![(
        "any",
        Value::Array(vec![
            obj(vec![("b", Value::from(2))]),
            obj(vec![("a", Value::from(1))]),
        ]),
    )]);
    assert_eq!(
        query(&filter, Dialect::InfluxQl),
        r#"("a" = 1) OR ("b" = 2)"#
    );
    assert_eq!(query(&filter, Dialect::Sql), "(a = 1) OR (b = 2)");
    assert_eq!(query(&filter, Dialect::Dataframe), "(a == 1) | (b == 2)");
}

#[test]
fn test_membership_expands_without_native_support() {
    // Same meaning, spelled as a per-value disjunction.
    let filter = cond("x", "in", Value::from(vec![1, 2, 3]));
    assert_eq!(
        query(&filter, Dialect::InfluxQl),
        r#"("x" = 1) OR ("x" = 2) OR ("x" = 3)"#
    );
    assert_eq!(
        query(&filter, Dialect::Narrative),
        "(x equals 1) or (x equals 2) or (x equals 3)"
    );

    let filter = cond("x", "nin", Value::from(vec![1, 2]));
    assert_eq!(
        query(&filter, Dialect::InfluxQl),
        r#"("x" != 1) AND ("x" != 2)"#
    );
    assert_eq!(
        query(&filter, Dialect::Narrative),
        "(x does not equal 1) and (x does not equal 2)"
    );
}

#[test]
fn test_mongo_documents() {
    let doc = |filter: &Value| {
        expression_from_filter(filter)
            .unwrap()
            .to_document()
            .unwrap()
    };
    assert_eq!(
        doc(&cond("a", "eq", Value::from(1))),
        json!({ "a": { "$eq": 1 } })
    );
    assert_eq!(
        doc(&cond("a", "neq", Value::from("x"))),
        json!({ "a": { "$ne": "x" } })
    );
    assert_eq!(
        doc(&cond("a", "gt", Value::from(1))),
        json!({ "a": { "$gt": 1 } })
    );
    assert_eq!(
        doc(&cond("a", "regex", Value::from("x.*"))),
        json!({ "a": { "$regex": "x.*" } })
    );
    assert_eq!(
        doc(&cond("a", "iregex", Value::from("x.*"))),
        json!({ "a": { "$not": { "$regex": "x.*" } } })
    );
    assert_eq!(
        doc(&cond("a", "in", Value::from(vec![1, 2]))),
        json!({ "a": { "$in": [1, 2] } })
    );
    assert_eq!(
        doc(&cond("a", "nin", Value::from(vec![1, 2]))),
        json!({ "a": { "$nin": [1, 2] } })
    );
    assert_eq!(doc(&cond("a", "null", Value::from(true))), json!({ "a": null }));
    assert_eq!(
        doc(&cond("a", "null", Value::from(false))),
        json!({ "a": { "$ne": null } })
    );
    assert_eq!(
        doc(&cond("a", "missing", Value::from(true))),
        json!({ "a": { "$exists": false } })
    );
    assert_eq!(
        doc(&cond("a", "missing", Value::from(false))),
        json!({ "a": { "$exists": true } })
    );
    assert_eq!(
        doc(&obj(vec![("not", obj(vec![("a", Value::from(1))]))])),
        json!({ "$not": { "a": { "$eq": 1 } } })
    );
    assert_eq!(
        doc(&cond("a", "gte", ts(2015, 12, 31, 12, 5))),
        json!({ "a": { "$gte": "2015-12-31T12:05:00Z" } })
    );
}

#[test]
fn test_mongo_combinators_preserve_branch_order() {
    let filter = obj(vec![
        ("b", Value::from(2)),
        ("a", Value::from(1)),
    ]);
    // Canonical branches come field-sorted; the document keeps that order.
    assert_eq!(
        expression_from_filter(&filter)
            .unwrap()
            .to_document()
            .unwrap(),
        json!({ "$and": [ { "a": { "$eq": 1 } }, { "b": { "$eq": 2 } } ] })
    );

    let filter = obj(vec![(
        "any",
        Value::Array(vec![
            obj(vec![("b", Value::from(2))]),
            obj(vec![("a", Value::from(1))]),
        ]),
    )]);
    assert_eq!(
        expression_from_filter(&filter)
            .unwrap()
            .to_document()
            .unwrap(),
        json!({ "$or": [ { "b": { "$eq": 2 } }, { "a": { "$eq": 1 } } ] })
    );
}

#[test]
fn test_to_query_serializes_document_dialect() {
    let filter = cond("a", "eq", Value::from(1));
    assert_eq!(
        query(&filter, Dialect::Mongo),
        r#"{"a":{"$eq":1}}"#
    );
}

#[test]
fn test_render_wraps_output_per_dialect() {
    let expr = expression_from_filter(&cond("a", "eq", Value::from(1))).unwrap();
    assert_eq!(
        render(&expr, Dialect::Sql).unwrap(),
        Rendered::Text("a = 1".to_string())
    );
    assert_eq!(
        render(&expr, Dialect::Mongo).unwrap(),
        Rendered::Document(json!({ "a": { "$eq": 1 } }))
    );
}

#[test]
fn test_unsupported_operations_fail_loudly() {
    let negation = obj(vec![("not", obj(vec![("a", Value::from(1))]))]);
    assert!(matches!(
        query_err(&negation, Dialect::InfluxQl),
        Error::UnsupportedOperation { dialect: "influxql", .. }
    ));

    let regex = cond("a", "regex", Value::from("x.*"));
    assert!(matches!(
        query_err(&regex, Dialect::Dataframe),
        Error::UnsupportedOperation { dialect: "dataframe", .. }
    ));
    assert!(matches!(
        query_err(&regex, Dialect::Narrative),
        Error::UnsupportedOperation { dialect: "narrative", .. }
    ));

    let null_check = cond("a", "null", Value::from(true));
    assert!(matches!(
        query_err(&null_check, Dialect::InfluxQl),
        Error::UnsupportedOperation { .. }
    ));

    let missing = cond("a", "missing", Value::from(true));
    for dialect in [Dialect::InfluxQl, Dialect::Sql, Dialect::Dataframe] {
        assert!(matches!(
            query_err(&missing, dialect),
            Error::UnsupportedOperation { .. }
        ));
    }

    let field_cmp = cond("a", "eqf", Value::from("b"));
    assert!(matches!(
        query_err(&field_cmp, Dialect::Mongo),
        Error::UnsupportedOperation { dialect: "mongo", .. }
    ));
}

#[test]
fn test_numeric_literals_round_trip() {
    for dialect in [Dialect::InfluxQl, Dialect::Sql, Dialect::Dataframe] {
        let rendered = query(&cond("a", "eq", Value::from(-42)), dialect);
        let number = rendered.rsplit(' ').next().unwrap();
        assert_eq!(number.parse::<i64>().unwrap(), -42);

        let rendered = query(&cond("a", "eq", Value::from(99.9)), dialect);
        let number = rendered.rsplit(' ').next().unwrap();
        assert_eq!(number.parse::<f64>().unwrap(), 99.9);
    }
}

#[test]
fn test_dialect_lookup_by_name() {
    assert_eq!(Dialect::from_name("influxql"), Some(Dialect::InfluxQl));
    assert_eq!(Dialect::from_name("sql"), Some(Dialect::Sql));
    assert_eq!(Dialect::from_name("mongo"), Some(Dialect::Mongo));
    assert_eq!(Dialect::from_name("dataframe"), Some(Dialect::Dataframe));
    assert_eq!(Dialect::from_name("narrative"), Some(Dialect::Narrative));
    assert_eq!(Dialect::from_name("cypher"), None);
    assert!(matches!(
        "cypher".parse::<Dialect>().unwrap_err(),
        Error::InvalidQuery(_)
    ));
}

#[test]
fn test_same_tree_renders_in_every_dialect() {
    let filter = obj(vec![
        ("status", Value::from("ok")),
        ("version", Value::from(vec![1, 2])),
    ]);
    let expr = expression_from_filter(&filter).unwrap();
    assert_eq!(
        expr.to_query(Dialect::InfluxQl).unwrap(),
        r#"("status" = 'ok') AND (("version" = 1) OR ("version" = 2))"#
    );
    assert_eq!(
        expr.to_query(Dialect::Sql).unwrap(),
        "(status = 'ok') AND (version IN (1, 2))"
    );
    assert_eq!(
        expr.to_query(Dialect::Dataframe).unwrap(),
        "(status == 'ok') & (version in [1, 2])"
    );
    assert_eq!(
        expr.to_query(Dialect::Narrative).unwrap(),
        "((version equals 1) or (version equals 2)) and (status equals 'ok')"
    );
    assert_eq!(
        expr.to_document().unwrap(),
        json!({ "$and": [
            { "status": { "$eq": "ok" } },
            { "version": { "$in": [1, 2] } }
        ] })
    );
}
