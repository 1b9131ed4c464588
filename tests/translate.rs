//! End-to-end tests for the text -> JSON pipeline.

use defconf::{load, translate, translate_with, Error, LexReason, Options, Redefinition, Value};
use serde_json::json;

const README: &str = "\
REM Server configuration
(def port 8080);
(def host 'localhost');
--[[
  (def host 'ignored');
]]
(def server struct {
    name = 'main',
    address = struct { host = .(host)., port = .(port). },
    enabled = 1
});
";

fn parsed(json: &str) -> serde_json::Value {
    serde_json::from_str(json).expect("output is not valid JSON")
}

/// Top-level keys in the order they appear in the output text.
fn key_order(json: &str, keys: &[&str]) -> Vec<usize> {
    keys.iter()
        .map(|key| json.find(&format!("\n  \"{}\":", key)).expect("key missing"))
        .collect()
}

#[test]
fn readme_example() {
    let out = translate(README).expect("translate failed");
    let doc = parsed(&out);
    assert_eq!(doc, json!({
        "port": 8080,
        "host": "localhost",
        "server": {
            "name": "main",
            "address": { "host": "localhost", "port": 8080 },
            "enabled": 1
        }
    }));

    let positions = key_order(&out, &["port", "host", "server"]);
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "keys out of order: {}", out);
    assert!(out.contains("\"port\": 8080"));
}

#[test]
fn readme_example_exact_text() {
    let out = translate(README).unwrap();
    let expected = r#"{
  "port": 8080,
  "host": "localhost",
  "server": {
    "name": "main",
    "address": {
      "host": "localhost",
      "port": 8080
    },
    "enabled": 1
  }
}"#;
    assert_eq!(out, expected);
}

#[test]
fn nested_field_order_is_preserved() {
    let table = load("(def s struct { c = 1, b = struct { z = 1, y = 2, x = 3 }, a = 3 });",
                     &Options::default()).unwrap();
    let s = table.get("s").and_then(Value::as_struct).unwrap();
    let outer: Vec<&str> = s.keys().map(String::as_str).collect();
    assert_eq!(outer, ["c", "b", "a"]);
    let inner: Vec<&str> = s["b"].as_struct().unwrap().keys().map(String::as_str).collect();
    assert_eq!(inner, ["z", "y", "x"]);
}

#[test]
fn comments_have_no_effect() {
    let plain = translate("(def a 1);\n(def b struct { x = 'y' });").unwrap();
    let commented = translate(
        "REM (def a 2);\n\
         (def a 1); REM trailing\n\
         --[[ (def b 3); 'unterminated\n #$%^ ]]\n\
         (def b struct { --[[ inline ]] x = 'y' REM the only field\n });",
    ).unwrap();
    assert_eq!(plain, commented);
}

#[test]
fn integers_round_trip() {
    let out = translate("(def big 9223372036854775807);\n(def small -9223372036854775808);\n(def plus +5);").unwrap();
    let doc = parsed(&out);
    assert_eq!(doc["big"].as_i64(), Some(i64::MAX));
    assert_eq!(doc["small"].as_i64(), Some(i64::MIN));
    assert_eq!(doc["plus"], json!(5));
    assert!(out.contains("9223372036854775807"));
    assert!(!out.contains("e18"));
}

#[test]
fn reference_substitutes_structs() {
    let out = translate("(def base struct { a = 1 });\n(def derived struct { base = .(base)., b = 2 });").unwrap();
    assert_eq!(parsed(&out)["derived"], json!({ "base": { "a": 1 }, "b": 2 }));
}

#[test]
fn undefined_reference_names_identifier_and_position() {
    let err = translate("(def a 1);\n(def b struct { x = .(missing). });").unwrap_err();
    match &err {
        Error::UndefinedVariable { name, span } => {
            assert_eq!(name, "missing");
            assert_eq!((span.lno, span.col), (2, 23));
        },
        other => panic!("expected undefined variable, got {:?}", other),
    }
    let msg = err.to_string();
    assert!(msg.contains("UndefinedVariableError"));
    assert!(msg.contains("missing"));
    assert!(msg.contains("2:23"));
}

#[test]
fn reference_to_later_definition_fails() {
    let err = translate("(def a .(b).);\n(def b 1);").unwrap_err();
    assert!(matches!(err, Error::UndefinedVariable { ref name, .. } if name == "b"));
}

#[test]
fn missing_semicolon_is_parse_error() {
    let err = translate("(def a 1)\n(def b 2);").unwrap_err();
    assert!(matches!(err, Error::Parse { .. }));
    assert_eq!(err.code(), 150);
}

#[test]
fn trailing_comma_is_parse_error() {
    let err = translate("(def s struct { a = 1, });").unwrap_err();
    assert!(matches!(err, Error::Parse { ref expected, .. } if expected == "field name"));
}

#[test]
fn lexical_errors() {
    let err = translate("(def s 'open);").unwrap_err();
    assert!(matches!(err, Error::Lex { reason: LexReason::UnterminatedString, .. }));

    let err = translate("(def a 1);\n--[[ open").unwrap_err();
    assert!(matches!(err, Error::Lex { reason: LexReason::UnterminatedComment, .. }));

    let err = translate("(def a 1 @);").unwrap_err();
    assert!(matches!(err, Error::Lex { reason: LexReason::UnexpectedChar('@'), .. }));
}

#[test]
fn duplicate_definition_policy() {
    let source = "(def a 1);\n(def b 2);\n(def a 3);";

    let err = translate(source).unwrap_err();
    assert!(matches!(err, Error::DuplicateDefinition { ref name, .. } if name == "a"));

    let options = Options { redefinition: Redefinition::Overwrite };
    let out = translate_with(source, &options).unwrap();
    assert_eq!(out, "{\n  \"a\": 3,\n  \"b\": 2\n}");
}

#[test]
fn empty_struct_and_empty_program() {
    assert_eq!(translate("").unwrap(), "{}");
    assert_eq!(translate("(def e struct {});").unwrap(), "{\n  \"e\": {}\n}");
}

#[test]
fn rendered_diagnostic_shows_source_line() {
    let source = "(def a 1);\n(def b 010);";
    let err = translate(source).unwrap_err();
    let rendered = err.render(source);
    assert!(rendered.starts_with("[E105] LexError at 2:8"), "{}", rendered);
    assert!(rendered.contains("2  | (def b 010);"));
    assert!(rendered.contains("Hint: "));
}

#[test]
fn rem_after_a_literal_is_not_a_comment() {
    let err = translate("(def a 1REM x\n);").unwrap_err();
    match err {
        Error::Parse { expected, found, .. } => {
            assert_eq!(expected, "')'");
            assert_eq!(found, "'REM'");
        },
        other => panic!("expected parse error, got {:?}", other),
    }
}

#[test]
fn deep_nesting_is_an_error_not_a_crash() {
    let levels = 2000;
    let source = format!("(def a {}1{});", "struct { x = ".repeat(levels), " }".repeat(levels));
    let err = translate(&source).unwrap_err();
    assert!(matches!(err, Error::Parse { ref expected, .. } if expected.contains("nested structs")));
    assert!(err.render(&source).starts_with("[E150] ParseError at 1:"));
}
