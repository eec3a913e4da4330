use super::test_utilities::*;
use cyrest::command_to_get_query;
use test_log::test;

#[test]
fn test_network_get_attribute_example() {
    let query = command_to_get_query(
        BASE_URL,
        r#"network get attribute network="test" namespace="default" columnList="SUID""#,
    )
    .unwrap();

    assert!(query.url.ends_with("/commands/network/get/attribute"));
    let params = query.params.expect("parameters should be present");
    let pairs: Vec<(&str, &str)> = params.iter().collect();
    assert_eq!(
        pairs,
        vec![
            ("network", "test"),
            ("namespace", "default"),
            ("columnList", "SUID")
        ]
    );
}

#[test]
fn test_commands_without_parameters_have_no_query() {
    for command in ["apps list available", "view", "layout force-directed", ""] {
        let query = command_to_get_query(BASE_URL, command).unwrap();
        assert!(query.params.is_none(), "unexpected params for '{command}'");
        assert_eq!(query.to_url(), query.url);
        assert!(!query.url.contains('?'));
    }
}

#[test]
fn test_all_cases_compile_to_expected_url_and_params() {
    for case in command_cases() {
        let query = command_to_get_query(BASE_URL, case.command).unwrap();
        assert_eq!(query.url, expected_url(case.segments), "url for '{}'", case.command);

        match query.params {
            Some(params) => {
                let pairs: Vec<(&str, &str)> = params.iter().collect();
                assert_eq!(pairs, case.params.to_vec(), "params for '{}'", case.command);
            }
            None => assert!(case.params.is_empty(), "params for '{}'", case.command),
        }
    }
}

#[test]
fn test_multi_word_path_keeps_order_and_slashes() {
    let query = command_to_get_query(BASE_URL, "a b c d e").unwrap();
    let path = query.url.strip_prefix(&format!("{BASE_URL}/commands/")).unwrap();
    assert_eq!(path.split('/').collect::<Vec<_>>(), vec!["a", "b", "c", "d", "e"]);
}

#[test]
fn test_parameter_values_never_reach_the_path() {
    let query = command_to_get_query(BASE_URL, r#"session open file="a b/c""#).unwrap();
    assert_eq!(query.url, format!("{BASE_URL}/commands/session/open"));
    assert_eq!(query.params.unwrap().get("file"), Some("a b/c"));
}

#[test]
fn test_stray_quote_keeps_following_parameters() {
    let query = command_to_get_query(
        BASE_URL,
        r#"node set properties propertyList="Label" valueList=5" height=30"#,
    )
    .unwrap();

    let params = query.params.unwrap();
    assert_eq!(params.len(), 3);
    assert_eq!(params.get("propertyList"), Some("Label"));
    assert_eq!(params.get("valueList"), Some("5"));
    assert_eq!(params.get("height"), Some("30"));
}
