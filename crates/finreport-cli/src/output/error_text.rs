use finreport_client::ClientError;
use serde_json::Value;

pub fn render_error(error: &ClientError) -> String {
    let mut lines = vec![
        "The report could not be built.".to_string(),
        String::new(),
        format!("  Error:    {}", error.code),
        format!("  Details:  {}", error.message),
    ];

    let path = error
        .data
        .as_ref()
        .and_then(|data| data.get("path"))
        .and_then(Value::as_str);
    if let Some(path) = path {
        lines.push(format!("  File:     {path}"));
    }

    lines.push(String::new());
    lines.push("What to do next:".to_string());
    if error.recovery_steps.is_empty() {
        lines.push("  1. Retry the command.".to_string());
    } else {
        for (index, step) in error.recovery_steps.iter().enumerate() {
            lines.push(format!("  {}. {step}", index + 1));
        }
    }

    lines.join("\n")
}
