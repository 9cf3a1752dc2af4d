use std::io;

use finreport_client::{ClientError, SuccessEnvelope};
use serde::Serialize;
use serde_json::{Value, json};

/// The report payload exactly as it would be saved: the home mapping, the
/// spending rows, or the cashback mapping (`null` when nothing was earned).
pub fn render_success_json(success: &SuccessEnvelope) -> io::Result<String> {
    match success.command.as_str() {
        "home" | "spending" | "cashback" => serialize_json_pretty(success.report()),
        _ => Err(io::Error::other(format!(
            "JSON output is not supported for command `{}`",
            success.command
        ))),
    }
}

pub fn render_error_json(error: &ClientError) -> io::Result<String> {
    let mut payload = json!({
        "error": {
            "code": error.code,
            "message": error.message,
            "recovery_steps": error.recovery_steps,
        }
    });
    if let Some(data) = &error.data
        && let Some(object) = payload.get_mut("error").and_then(Value::as_object_mut)
    {
        object.insert("data".to_string(), data.clone());
    }
    serialize_json_pretty(&payload)
}

fn serialize_json_pretty<T>(value: &T) -> io::Result<String>
where
    T: Serialize,
{
    serde_json::to_string_pretty(value).map_err(io::Error::other)
}

#[cfg(test)]
mod tests {
    use finreport_client::{ClientError, SuccessEnvelope};
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

    fn parse(text: &str) -> Value {
        serde_json::from_str(text).unwrap_or(Value::Null)
    }

    #[test]
    fn cashback_json_is_the_bare_ranking() {
        let payload = success(
            "cashback",
            json!({"year": 2021, "month": 12, "report": {"Ж/д билеты": 70}, "notice": null}),
        );

        let rendered = render_success_json(&payload);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert_eq!(parse(&text), json!({"Ж/д билеты": 70}));
            assert!(text.contains("Ж/д билеты"));
        }
    }

    #[test]
    fn empty_cashback_renders_null() {
        let payload = success("cashback", json!({"year": 2019, "month": 12, "report": null}));
        let rendered = render_success_json(&payload);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert_eq!(text, "null");
        }
    }

    #[test]
    fn spending_json_is_a_row_array() {
        let payload = success(
            "spending",
            json!({
                "category": "Супермаркеты",
                "report": [{"date": "01.01.2022", "amount": -100.0}]
            }),
        );
        let rendered = render_success_json(&payload);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            let value = parse(&text);
            assert!(value.is_array());
            assert_eq!(value[0]["amount"], json!(-100.0));
        }
    }

    #[test]
    fn runtime_error_json_uses_universal_shape() {
        let error = ClientError::cashback_type_mismatch(2, "70");
        let rendered = render_error_json(&error);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            let value = parse(&text);
            assert_eq!(value["error"]["code"], "cashback_type_mismatch");
            assert_eq!(value["error"]["data"], json!({"row": 2, "received": "70"}));
            assert!(value.get("ok").is_none());
        }
    }

    #[test]
    fn unknown_command_is_rejected() {
        let payload = success("import", json!({}));
        assert!(render_success_json(&payload).is_err());
    }
}
