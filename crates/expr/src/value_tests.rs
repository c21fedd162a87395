// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;

#[yare::parameterized(
    integer       = { 3.0,   "3" },
    negative      = { -12.0, "-12" },
    fraction      = { 1.5,   "1.5" },
    zero          = { 0.0,   "0" },
)]
fn numbers_print_without_spurious_fraction(n: f64, expected: &str) {
    let Value::Number(num) = Value::from_f64(n) else { panic!("not a number") };
    assert_eq!(format_number(&num), expected);
}

#[test]
fn non_finite_becomes_null() {
    assert!(Value::from_f64(f64::NAN).is_null());
    assert!(Value::from_f64(f64::INFINITY).is_null());
}

#[test]
fn json_round_trip_keeps_key_order() {
    let json = json!({"z": 1, "a": [true, null, "s"], "m": {"k": 2.5}});
    let value = Value::from_json(json.clone());
    assert_eq!(value.to_json(), json);
    let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys, vec!["z", "a", "m"]);
}

#[test]
fn integers_equal_floats_of_same_magnitude() {
    assert_eq!(Value::from(1i64), Value::from_json(json!(1.0)));
    assert_ne!(Value::from(1i64), Value::from("1"));
}

#[test]
fn wholly_known_looks_inside_collections() {
    let v = object([("a", Value::List(vec![Value::from(1i64), Value::Unknown]))]);
    assert!(!v.is_wholly_known());
    assert_eq!(v.equals(&Value::Null), None);
    assert!(object([("a", Value::Null)]).is_wholly_known());
}

#[test]
fn get_path_walks_objects() {
    let v = Value::from_json(json!({"alert": {"monitor_name": "M"}}));
    assert_eq!(v.get_path("alert.monitor_name"), Some(&Value::from("M")));
    assert_eq!(v.get_path("alert.missing"), None);
}
