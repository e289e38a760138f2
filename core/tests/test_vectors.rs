//! Verify response interpretation against JSON test vectors in `test-vectors/`.
//!
//! Each case describes a simulated response (or none) and either the
//! expected payload or the expected error kind, message and details.
//! Comparing parsed JSON avoids false negatives from field ordering.

use admin_api_core::{interpret, HttpResponse};
use serde_json::Value;

fn to_response(raw: &Value) -> Option<HttpResponse> {
    if raw.is_null() {
        return None;
    }
    Some(HttpResponse {
        status: raw["status"].as_u64().unwrap() as u16,
        status_text: raw["status_text"].as_str().unwrap().to_string(),
        headers: Vec::new(),
        body: raw["body"].as_str().unwrap().to_string(),
    })
}

#[test]
fn status_mapping_vectors() {
    let raw = include_str!("../../test-vectors/status_mapping.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let response = to_response(&case["response"]);
        let expected = &case["expected"];

        match interpret(response.as_ref()) {
            Ok(payload) => {
                assert_eq!(&payload, &expected["payload"], "{name}: payload");
            }
            Err(err) => {
                assert!(expected.get("payload").is_none(), "{name}: unexpected error {err}");
                assert_eq!(err.kind().as_str(), expected["kind"], "{name}: kind");
                assert_eq!(err.to_string(), expected["message"], "{name}: message");
                assert_eq!(
                    err.errors().cloned().unwrap_or(Value::Null),
                    expected["errors"],
                    "{name}: errors"
                );
            }
        }
    }
}
