//! Path-query behaviour over whole documents, including the boundary cases the
//! query engine must report rather than swallow.

use verbatim_json::{Details, Document};

#[test]
fn should_fetch_nested_values_through_mixed_steps() {
    // document `{"a":["x","y",{"b":{"c":"z"}}]}`, query `$.a[2].b.c` -> "z"
    let document = Document::from_str(r#"{"a":["x","y",{"b":{"c":"z"}}]}"#).unwrap();
    assert_eq!(document.get("$.a[2].b.c").unwrap(), "z");
}

#[test]
fn should_render_numbers_with_six_fractional_digits() {
    let document = Document::from_str(r#"{"codes":[200,201,404.5]}"#).unwrap();
    assert_eq!(document.get("$.codes[2]").unwrap(), "404.500000");
    assert_eq!(document.get("$.codes[0]").unwrap(), "200.000000");
}

#[test]
fn should_reject_an_index_root_selector_on_an_object_document() {
    let document = Document::from_str(r#"{"a": 1}"#).unwrap();
    let result = document.get("$[0]");
    assert_eq!(
        result.unwrap_err().details,
        Details::WrongObjectRootSelector
    );
}

#[test]
fn should_reject_a_key_root_selector_on_an_array_document() {
    let document = Document::from_str("[1, 2]").unwrap();
    let result = document.get("$.a");
    assert_eq!(result.unwrap_err().details, Details::WrongArrayRootSelector);
}

#[test]
fn should_error_on_absent_keys_rather_than_returning_empty() {
    let document = Document::from_str(r#"{"present": 1}"#).unwrap();
    let result = document.get("$.absent");
    assert_eq!(
        result.unwrap_err().details,
        Details::KeyNotFound("absent".to_string())
    );
}

#[test]
fn should_error_when_indexing_one_past_the_end() {
    let document = Document::from_str(r#"{"arr": [1, 2, 3]}"#).unwrap();
    let result = document.get("$.arr[3]");
    assert_eq!(
        result.unwrap_err().details,
        Details::IndexOutOfRange { index: 3, len: 3 }
    );
}

#[test]
fn should_return_raw_sub_documents_for_container_results() {
    let source = r#"{ "outer": { "inner": [1,  2] } }"#;
    let document = Document::from_str(source).unwrap();
    assert_eq!(document.get("$.outer").unwrap(), r#"{ "inner": [1,  2] }"#);
    assert_eq!(document.get("$.outer.inner").unwrap(), "[1,  2]");
}

#[test]
fn should_answer_queries_against_commented_documents() {
    let source = "{\n  // which door\n  \"door\": 3,\n  \"open\": false\n}";
    let document = Document::from_str(source).unwrap();
    assert_eq!(document.get("$.door").unwrap(), "3.000000");
    assert!(!document.get_bool("$.open").unwrap());
}

#[test]
fn should_be_deterministic_across_repeated_queries() {
    let document = Document::from_str(r#"{"a": {"b": [true, "two", 3]}}"#).unwrap();
    for _ in 0..3 {
        assert_eq!(document.get("$.a.b[1]").unwrap(), "two");
    }
}

#[test]
fn should_forward_query_errors_through_typed_getters() {
    let document = Document::from_str(r#"{"a": 1}"#).unwrap();
    assert_eq!(
        document.get_bool("$.missing").unwrap_err().details,
        Details::KeyNotFound("missing".to_string())
    );
    assert_eq!(
        document.get_float("$.missing").unwrap_err().details,
        Details::KeyNotFound("missing".to_string())
    );
}
