use chrono::NaiveDate;
use polyquery::{Error, Map, Value, normalize};

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

#[test]
fn test_scalar_becomes_implicit_equality() {
    let filter = obj(vec![("status", Value::from("ok"))]);
    assert_eq!(
        normalize(&filter).unwrap(),
        cond("status", "eq", Value::from("ok"))
    );

    let filter = obj(vec![("volume", Value::from(10000))]);
    assert_eq!(
        normalize(&filter).unwrap(),
        cond("volume", "eq", Value::from(10000))
    );

    let filter = obj(vec![("rate", Value::from(99.9))]);
    assert_eq!(
        normalize(&filter).unwrap(),
        cond("rate", "eq", Value::from(99.9))
    );
}

#[test]
fn test_slash_string_becomes_regex() {
    let filter = obj(vec![("name", Value::from("/logging_.*/"))]);
    assert_eq!(
        normalize(&filter).unwrap(),
        cond("name", "regex", Value::from("logging_.*"))
    );
}

#[test]
fn test_plain_string_with_single_slash_is_equality() {
    let filter = obj(vec![("path", Value::from("/root"))]);
    assert_eq!(
        normalize(&filter).unwrap(),
        cond("path", "eq", Value::from("/root"))
    );
}

#[test]
fn test_list_becomes_membership() {
    // Scenario: {"rule_id": [1,2], "status": "ok"} normalizes to a
    // conjunction ordered by field name.
    let filter = obj(vec![
        ("rule_id", Value::from(vec![1, 2])),
        ("status", Value::from("ok")),
    ]);
    assert_eq!(
        normalize(&filter).unwrap(),
        obj(vec![(
            "and",
            Value::Array(vec![
                cond("rule_id", "in", Value::from(vec![1, 2])),
                cond("status", "eq", Value::from("ok")),
            ])
        )])
    );
}

#[test]
fn test_empty_filter_is_empty_conjunction() {
    let filter = obj(vec![]);
    assert_eq!(
        normalize(&filter).unwrap(),
        obj(vec![("and", Value::Array(vec![]))])
    );
}

#[test]
fn test_single_condition_stays_unwrapped() {
    let filter = obj(vec![("a", obj(vec![("gt", Value::from(1))]))]);
    assert_eq!(normalize(&filter).unwrap(), cond("a", "gt", Value::from(1)));
}

#[test]
fn test_not_wraps_normalized_sub_filter() {
    let filter = obj(vec![("not", obj(vec![("status", Value::from("ok"))]))]);
    assert_eq!(
        normalize(&filter).unwrap(),
        obj(vec![("not", cond("status", "eq", Value::from("ok")))])
    );
}

#[test]
fn test_any_wraps_branches() {
    let filter = obj(vec![(
        "any",
        Value::Array(vec![
            obj(vec![("a", Value::from(1))]),
            obj(vec![("b", Value::from(2))]),
        ]),
    )]);
    assert_eq!(
        normalize(&filter).unwrap(),
        obj(vec![(
            "any",
            Value::Array(vec![
                cond("a", "eq", Value::from(1)),
                cond("b", "eq", Value::from(2)),
            ])
        )])
    );
}

#[test]
fn test_composite_metric_filter() {
    let filter = obj(vec![
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
    ]);

    // Fields are visited in sorted order; the reserved "and" list splices
    // its conjuncts in place.
    let expected = obj(vec![(
        "and",
        Value::Array(vec![
            cond("act_type", "eq", Value::from("logging")),
            cond("rule_name", "regex", Value::from("logging_.*")),
            cond("rule_name", "neq", Value::from("logging_rddms")),
            cond("rule_name", "iregex", Value::from("logging_r..s")),
            cond("expected_fire_rate", "eq", Value::from(99.9)),
            cond("expected_fire_volume", "eq", Value::from(10000)),
            obj(vec![(
                "or",
                Value::Array(vec![
                    obj(vec![(
                        "and",
                        Value::Array(vec![
                            cond("create_ts", "gt", ts(2014, 1, 1, 0, 0)),
                            cond("create_ts", "lte", ts(2015, 12, 31, 12, 5)),
                            cond("version", "gte", Value::from(1)),
                            cond("version", "lt", Value::from(3)),
                        ]),
                    )]),
                    cond("version", "eq", Value::from(4)),
                ]),
            )]),
            cond(
                "rule_id",
                "in",
                Value::from(vec![
                    Value::from(6666),
                    Value::from("7777"),
                    Value::from(8888),
                ]),
            ),
        ]),
    )]);

    assert_eq!(normalize(&filter).unwrap(), expected);
}

#[test]
fn test_list_under_non_membership_operator_is_rejected() {
    let filter = obj(vec![("a", obj(vec![("gt", Value::from(vec![1, 2]))]))]);
    assert!(matches!(
        normalize(&filter).unwrap_err(),
        Error::InvalidQuery(_)
    ));
}

#[test]
fn test_list_under_membership_operators_is_kept() {
    let filter = obj(vec![("a", obj(vec![("nin", Value::from(vec![1, 2]))]))]);
    assert_eq!(
        normalize(&filter).unwrap(),
        cond("a", "nin", Value::from(vec![1, 2]))
    );
}

#[test]
fn test_null_filter_value_is_rejected() {
    let filter = obj(vec![("a", Value::Null)]);
    assert!(matches!(
        normalize(&filter).unwrap_err(),
        Error::InvalidQuery(_)
    ));
}

#[test]
fn test_non_object_branch_is_rejected() {
    let filter = obj(vec![("or", Value::from(vec![1, 2]))]);
    assert!(matches!(
        normalize(&filter).unwrap_err(),
        Error::InvalidQuery(_)
    ));
}

#[test]
fn test_not_with_list_is_rejected() {
    let filter = obj(vec![("not", Value::from(vec![1]))]);
    assert!(matches!(
        normalize(&filter).unwrap_err(),
        Error::InvalidQuery(_)
    ));
}

#[test]
fn test_nested_operand_object_is_rejected() {
    let filter = obj(vec![(
        "a",
        obj(vec![("gt", obj(vec![("b", Value::from(1))]))]),
    )]);
    assert!(matches!(
        normalize(&filter).unwrap_err(),
        Error::InvalidQuery(_)
    ));
}

#[test]
fn test_non_object_filter_is_rejected() {
    assert!(matches!(
        normalize(&Value::from(1)).unwrap_err(),
        Error::InvalidQuery(_)
    ));
}
