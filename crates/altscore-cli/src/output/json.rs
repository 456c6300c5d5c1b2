use std::io;

use altscore_client::{ClientError, SuccessEnvelope};
use serde::Serialize;
use serde_json::{Value, json};

const JSON_VERSION: &str = "v1";

pub fn render_success_json(success: &SuccessEnvelope) -> io::Result<String> {
    let value = match success.command.as_str() {
        "score" => render_enveloped_json(&success.data),
        "factors" => render_enveloped_json(&success.data),
        "import create" => render_enveloped_json(&success.data),
        "import list" => render_rows_as_array(&success.data),
        "report list" => render_rows_as_array(&success.data),
        _ => {
            return Err(io::Error::other(format!(
                "JSON output is not supported for command `{}`",
                success.command
            )));
        }
    };

    serialize_json_pretty(&value)
}

pub fn render_error_json(error: &ClientError) -> io::Result<String> {
    let mut contract = json!({
        "code": error.code,
        "message": error.message,
        "recovery_steps": error.recovery_steps,
    });
    if let (Some(object), Some(data)) = (contract.as_object_mut(), &error.data) {
        object.insert("data".to_string(), data.clone());
    }

    let payload = json!({ "error": contract });
    serialize_json_pretty(&payload)
}

fn render_enveloped_json(data: &Value) -> Value {
    json!({
        "ok": true,
        "version": JSON_VERSION,
        "data": data.clone()
    })
}

/// List commands emit a raw array so output pipes straight into jq.
fn render_rows_as_array(data: &Value) -> Value {
    let rows = data
        .get("rows")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    Value::Array(rows)
}

fn serialize_json_pretty<T>(value: &T) -> io::Result<String>
where
    T: Serialize,
{
    serde_json::to_string_pretty(value).map_err(io::Error::other)
}

#[cfg(test)]
mod tests {
    use altscore_client::SuccessEnvelope;
    use serde_json::{Value, json};

    use super::{render_error_json, render_success_json};

    fn success(command: &str, data: Value) -> SuccessEnvelope {
        SuccessEnvelope {
            ok: true,
            command: command.to_string(),
            version: "0.1.0".to_string(),
            data,
        }
    }

    #[test]
    fn report_list_json_returns_raw_array() {
        let payload = success(
            "report list",
            json!({
                "rows": [
                    {"report_id": "rpt_1", "score": 698, "grade": "B"}
                ]
            }),
        );

        let rendered = render_success_json(&payload);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            let parsed: Result<Value, _> = serde_json::from_str(&text);
            assert!(parsed.is_ok());
            if let Ok(value) = parsed {
                assert!(value.is_array());
                assert_eq!(value[0]["report_id"], Value::String("rpt_1".to_string()));
            }
        }
    }

    #[test]
    fn score_json_uses_structured_envelope() {
        let payload = success(
            "score",
            json!({
                "score": 698,
                "grade": "B",
                "transaction_count": 42
            }),
        );

        let rendered = render_success_json(&payload);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            let parsed: Result<Value, _> = serde_json::from_str(&text);
            assert!(parsed.is_ok());
            if let Ok(value) = parsed {
                assert_eq!(value["ok"], Value::Bool(true));
                assert_eq!(value["version"], Value::String("v1".to_string()));
                assert_eq!(value["data"]["score"], Value::from(698));
            }
        }
    }

    #[test]
    fn runtime_error_json_uses_universal_shape() {
        let error =
            altscore_client::ClientError::new("not_found", "missing", vec!["run list".to_string()]);
        let rendered = render_error_json(&error);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            let parsed: Result<Value, _> = serde_json::from_str(&text);
            assert!(parsed.is_ok());
            if let Ok(value) = parsed {
                assert_eq!(
                    value["error"]["code"],
                    Value::String("not_found".to_string())
                );
                assert!(value.get("ok").is_none());
            }
        }
    }

    #[test]
    fn error_json_carries_structured_data_when_present() {
        let error = altscore_client::ClientError::invalid_argument_for_command(
            "unknown flag",
            Some("import create"),
        );
        let rendered = render_error_json(&error);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            let parsed: Result<Value, _> = serde_json::from_str(&text);
            assert!(parsed.is_ok());
            if let Ok(value) = parsed {
                assert_eq!(
                    value["error"]["data"]["command_hint"],
                    Value::String("import create".to_string())
                );
            }
        }
    }

    #[test]
    fn schema_json_is_unsupported() {
        let payload = success("db schema", json!({}));
        assert!(render_success_json(&payload).is_err());
    }
}
