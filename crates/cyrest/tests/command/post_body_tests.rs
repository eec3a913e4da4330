use super::test_utilities::*;
use cyrest::{CommandError, SENTINEL_PARAMETER, command_to_post_body, command_to_post_query};
use serde_json::{Map, Value};
use test_log::test;

fn decode_body(body: &[u8]) -> Map<String, Value> {
    match serde_json::from_slice::<Value>(body).unwrap() {
        Value::Object(map) => map,
        other => panic!("body is not a JSON object: {other}"),
    }
}

#[test]
fn test_body_reproduces_parameters() {
    for case in command_cases().into_iter().filter(|c| !c.params.is_empty()) {
        let query = command_to_post_query(BASE_URL, case.command).unwrap();
        assert_eq!(query.url, expected_url(case.segments));

        let body = decode_body(&query.body);
        assert_eq!(body.len(), case.params.len(), "params for '{}'", case.command);
        for (name, value) in case.params {
            assert_eq!(body[*name], Value::String(value.to_string()));
        }
    }
}

#[test]
fn test_parameterless_commands_send_only_the_sentinel() {
    for command in ["command quit", "command open dialog", "view", ""] {
        let body = decode_body(&command_to_post_body(command).unwrap());
        assert_eq!(body.len(), 1);
        let (name, value) = SENTINEL_PARAMETER;
        assert_eq!(body[name], Value::String(value.to_string()));
    }
}

#[test]
fn test_stray_equals_is_a_missing_name() {
    let err = command_to_post_query(BASE_URL, r#"network get attribute ="test""#).unwrap_err();
    assert!(matches!(err, CommandError::MissingParameterName { .. }));
    assert!(err.is_malformed_command());
}

#[test]
fn test_missing_name_after_valid_parameters() {
    let err = command_to_post_body(r#"command echo message="hi" =oops"#).unwrap_err();
    assert_eq!(
        err,
        CommandError::MissingParameterName {
            fragment: "=oops".to_string()
        }
    );
}
