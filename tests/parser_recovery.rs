//! 结构化输出恢复：对外行为

use aula::core::ParseError;
use aula::parse;
use serde_json::{json, Value};

#[test]
fn test_valid_json_matches_serde() {
    let samples = [
        r#"{"a": 1, "b": [true, null, "x"]}"#,
        r#"[1, 2, {"c": "d"}]"#,
        r#"{"nested": {"deep": {"deeper": []}}}"#,
    ];
    for s in samples {
        let expected: Value = serde_json::from_str(s).unwrap();
        assert_eq!(parse(s).unwrap(), expected, "input: {s}");
    }
}

#[test]
fn test_fenced_json() {
    assert_eq!(parse("```json\n{\"a\":1}\n```").unwrap(), json!({"a": 1}));
}

#[test]
fn test_noisy_wrapper() {
    assert_eq!(
        parse("Here is your data: {\"a\":1} Hope this helps!").unwrap(),
        json!({"a": 1})
    );
}

#[test]
fn test_fence_plus_prose_plus_bare_newline() {
    let raw = "Claro, aquí tienes:\n```json\n{\"grade\": \"2º\", \"trimesters\": [{\"title\": \"Trimestre 1\nAgosto\", \"weeks\": []}]}\n```\n¡Éxito!";
    let value = parse(raw).unwrap();
    assert_eq!(value["grade"], "2º");
    assert_eq!(value["trimesters"][0]["title"], "Trimestre 1\nAgosto");
}

#[test]
fn test_naive_slice_fails_but_repair_succeeds() {
    let candidate = "{\"class1\": \"Leer\ny escribir\"}";
    assert!(serde_json::from_str::<Value>(candidate).is_err());
    assert_eq!(
        parse(&format!("Resultado: {candidate} fin")).unwrap(),
        json!({"class1": "Leer\ny escribir"})
    );
}

#[test]
fn test_terminal_failure() {
    assert!(matches!(
        parse("no json here at all"),
        Err(ParseError::NoValidJson { .. })
    ));
    assert!(matches!(parse(""), Err(ParseError::NoValidJson { .. })));
    assert!(matches!(
        parse("{\"a\": 1,, }"),
        Err(ParseError::NoValidJson { .. })
    ));
}
