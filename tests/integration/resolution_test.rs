//! End-to-end resolution of request documents against a secrets map.

use super::{init_test_env, secrets_from};
use request_resolver::variables::{LookupError, NoLookup};
use request_resolver::{load_config, resolve_document, ResolveError, Resolver, SecretsMap};
use serde_json::{json, Value};

#[test]
fn test_age_and_bio_scenario() {
    init_test_env();
    let secrets = secrets_from(json!({"age": 30}));

    let before = json!({"age": "{{.age}}", "bio": "I am {{.age}} years old"});
    let after = resolve_document(&before, &secrets, &NoLookup).unwrap();

    assert_eq!(after, json!({"age": 30, "bio": "I am 30 years old"}));
}

#[test]
fn test_nested_string_secret_stays_string() {
    init_test_env();
    let secrets = secrets_from(json!({"id": "abc-1"}));

    let before = json!({"user": {"id": "{{.id}}"}});
    let after = resolve_document(&before, &secrets, &NoLookup).unwrap();

    assert_eq!(after, json!({"user": {"id": "abc-1"}}));
}

#[test]
fn test_array_of_objects_scenario() {
    init_test_env();
    let secrets = secrets_from(json!({"x": 1, "y": 2}));

    let before = json!({"items": [{"v": "{{.x}}"}, {"v": "{{.y}}"}]});
    let after = resolve_document(&before, &secrets, &NoLookup).unwrap();

    assert_eq!(after, json!({"items": [{"v": 1}, {"v": 2}]}));
}

#[test]
fn test_all_scalar_types_round_trip() {
    init_test_env();
    let secrets = secrets_from(json!({
        "int": -12,
        "float": 0.125,
        "whole": 4.0,
        "yes": true,
        "no": false
    }));

    let before = json!({
        "int": "{{.int}}",
        "float": "{{.float}}",
        "whole": "{{.whole}}",
        "flags": ["{{.yes}}", "{{ .no }}"]
    });
    let after = resolve_document(&before, &secrets, &NoLookup).unwrap();

    assert_eq!(
        after,
        json!({"int": -12, "float": 0.125, "whole": 4.0, "flags": [true, false]})
    );
}

#[test]
fn test_partial_strings_are_never_retyped() {
    init_test_env();
    let secrets = secrets_from(json!({"port": 8080, "host": "localhost"}));

    let before = json!({
        "url": "http://{{.host}}:{{.port}}",
        "padded": " {{.port}}x",
        "auth": "Bearer {{.port}}"
    });
    let after = resolve_document(&before, &secrets, &NoLookup).unwrap();

    assert_eq!(
        after,
        json!({
            "url": "http://localhost:8080",
            "padded": " 8080x",
            "auth": "Bearer 8080"
        })
    );
}

#[test]
fn test_ambiguous_text_only_retypes_matching_path() {
    init_test_env();
    // Both leaves substitute to "42", but only `n` has a numeric source.
    let secrets = secrets_from(json!({"n": 42, "s": "42"}));

    let before = json!({"numeric": "{{.n}}", "textual": "{{.s}}", "literal": "42"});
    let after = resolve_document(&before, &secrets, &NoLookup).unwrap();

    assert_eq!(
        after,
        json!({"numeric": 42, "textual": "42", "literal": "42"})
    );
}

#[test]
fn test_unresolved_variable_fails_closed() {
    init_test_env();
    let secrets = SecretsMap::new();

    let before = json!({"ok": "static", "bad": "{{.missing}}"});
    let result = resolve_document(&before, &secrets, &NoLookup);

    assert_eq!(
        result,
        Err(ResolveError::UnresolvedVariable {
            name: "missing".to_string()
        })
    );
}

#[test]
fn test_document_without_placeholders_is_unchanged() {
    init_test_env();
    let secrets = secrets_from(json!({"unused": 1}));

    let before = json!({
        "method": "POST",
        "body": {"n": 1, "f": 1.5, "b": true, "z": null, "list": [1, "two", [3]]},
        "braces": "{not a placeholder}"
    });
    let after = resolve_document(&before, &secrets, &NoLookup).unwrap();

    assert_eq!(after, before);
}

#[test]
fn test_malformed_placeholders_left_as_text() {
    init_test_env();
    let secrets = secrets_from(json!({"x": 1}));

    let before = json!({
        "mustache": "{{ name }}",
        "triple": "{{{.x}}}",
        "empty": "{{ }}",
        "real": "{{.x}}"
    });
    let after = resolve_document(&before, &secrets, &NoLookup).unwrap();

    assert_eq!(
        after,
        json!({"mustache": "{{ name }}", "triple": "{{{.x}}}", "empty": "{{ }}", "real": 1})
    );
}

#[test]
fn test_cyclic_definition_terminates() {
    init_test_env();
    let secrets = secrets_from(json!({"a": "{{.b}}", "b": "{{.a}}"}));

    let result = resolve_document(&json!({"v": "{{.a}}"}), &secrets, &NoLookup);
    assert!(matches!(
        result,
        Err(ResolveError::CyclicSubstitution { .. })
    ));
}

#[test]
fn test_nested_secret_definition_stays_string() {
    init_test_env();
    // `alias` expands to another placeholder whose value is numeric; the
    // substituted text no longer equals the alias's own text form.
    let secrets = secrets_from(json!({"alias": "{{.limit}}", "limit": 5}));

    let before = json!({"via_alias": "{{.alias}}", "direct": "{{.limit}}"});
    let after = resolve_document(&before, &secrets, &NoLookup).unwrap();

    assert_eq!(after, json!({"via_alias": "5", "direct": 5}));
}

#[test]
fn test_resolver_with_loaded_config() {
    init_test_env();
    let config = load_config(Some(json!({
        "resolver": {"pathSeparator": "/", "restoreTypes": true}
    })))
    .unwrap();
    let secrets = secrets_from(json!({"v": 1}));

    let resolver = Resolver::with_config(config, &secrets, &NoLookup);
    let resolution = resolver
        .resolve(&json!({"a": {"b": ["{{.v}}"]}}))
        .unwrap();

    assert_eq!(resolution.document, json!({"a": {"b": [1]}}));
    assert_eq!(
        resolution.describe_paths(&resolver.config().path_separator),
        vec!["a/b[0]"]
    );
}

#[test]
fn test_adjacent_placeholders_substitute_as_text() {
    init_test_env();
    let secrets = secrets_from(json!({"suffix": "x"}));
    let lookup = |key: &str, source: &str| -> Result<Value, LookupError> {
        match (key, source) {
            ("id", "r.json") => Ok(json!(7)),
            _ => Err(LookupError::MissingSource {
                source: source.to_string(),
            }),
        }
    };

    let before = json!({"v": "{{getValueOf id r.json}}{{.suffix}}"});
    let resolution = Resolver::new(&secrets, &lookup).resolve(&before).unwrap();

    assert_eq!(resolution.document, json!({"v": "7x"}));
    assert!(resolution.paths.is_empty());
}

#[test]
fn test_unknown_dotted_or_unicode_name_fails_closed() {
    init_test_env();

    for name in ["api.key", "café"] {
        let before = json!({"k": format!("{{{{.{}}}}}", name)});
        let result = resolve_document(&before, &SecretsMap::new(), &NoLookup);
        assert_eq!(
            result,
            Err(ResolveError::UnresolvedVariable {
                name: name.to_string()
            })
        );
    }
}

#[test]
fn test_dotted_name_resolves_and_retypes() {
    init_test_env();
    let secrets = secrets_from(json!({"api.key": "k-1", "limits.max": 25}));

    let before = json!({"key": "{{.api.key}}", "max": "{{ .limits.max }}"});
    let after = resolve_document(&before, &secrets, &NoLookup).unwrap();

    assert_eq!(after, json!({"key": "k-1", "max": 25}));
}
