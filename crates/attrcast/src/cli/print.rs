use anyhow::Result;
use attrcastapp::config::{AttrcastConfig, OutputFormat};
use attrcastapp::context::ValidationErrors;
use attrcastapp::value::Value;
use colored::Colorize;
use serde_json::json;
use std::collections::BTreeMap;
use std::fmt::Write;

pub(super) fn render_values(values: &BTreeMap<String, Value>, output: OutputFormat) -> Result<String> {
    match output {
        OutputFormat::Json => Ok(json_line(&json!({ "valid": true, "values": values }))?),
        OutputFormat::Text => {
            let mut out = String::new();
            for (name, value) in values {
                writeln!(out, "{} {}", format!("{name}:").bold(), value)?;
            }
            writeln!(out, "{}", "valid".green())?;
            Ok(out)
        }
    }
}

pub(super) fn render_errors(errors: &ValidationErrors, output: OutputFormat) -> Result<String> {
    match output {
        OutputFormat::Json => {
            let entries: Vec<_> = errors
                .iter()
                .map(|e| {
                    json!({
                        "attribute": e.attribute,
                        "code": e.error.code(),
                        "message": e.error.to_string(),
                    })
                })
                .collect();
            json_line(&json!({ "valid": false, "errors": entries }))
        }
        OutputFormat::Text => {
            let mut out = String::new();
            for e in errors.iter() {
                writeln!(
                    out,
                    "{} {} {}",
                    e.attribute.bold(),
                    format!("[{}]", e.error.code()).dimmed(),
                    e.error.to_string().red()
                )?;
            }
            Ok(out)
        }
    }
}

pub(super) fn render_kinds(kinds: &[String]) -> String {
    kinds.iter().map(|k| format!("{k}\n")).collect()
}

pub(super) fn render_config(config: &AttrcastConfig) -> String {
    config
        .entries()
        .into_iter()
        .map(|(k, v)| format!("{} = {}\n", k, v))
        .collect()
}

fn json_line(value: &serde_json::Value) -> Result<String> {
    Ok(format!("{}\n", serde_json::to_string_pretty(value)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use attrcastapp::context::AttributeError;
    use attrcastapp::error::FilterError;

    fn plain() {
        colored::control::set_override(false);
    }

    fn errors() -> ValidationErrors {
        ValidationErrors(vec![AttributeError {
            attribute: "count".into(),
            error: FilterError::MissingValue {
                attribute: "count".into(),
            },
        }])
    }

    #[test]
    fn test_text_values() {
        plain();
        let values = BTreeMap::from([
            ("count".to_string(), Value::Integer(3)),
            ("name".to_string(), Value::string("Ada")),
        ]);
        assert_eq!(
            render_values(&values, OutputFormat::Text).unwrap(),
            "count: 3\nname: \"Ada\"\nvalid\n"
        );
    }

    #[test]
    fn test_json_values() {
        let values = BTreeMap::from([("count".to_string(), Value::Integer(3))]);
        let out = render_values(&values, OutputFormat::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["valid"], true);
        assert_eq!(parsed["values"]["count"], 3);
    }

    #[test]
    fn test_text_errors() {
        plain();
        assert_eq!(
            render_errors(&errors(), OutputFormat::Text).unwrap(),
            "count [missing] count is required\n"
        );
    }

    #[test]
    fn test_json_errors() {
        let out = render_errors(&errors(), OutputFormat::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["valid"], false);
        assert_eq!(parsed["errors"][0]["code"], "missing");
        assert_eq!(parsed["errors"][0]["message"], "count is required");
    }

    #[test]
    fn test_kinds_and_config() {
        assert_eq!(render_kinds(&["array".into(), "hash".into()]), "array\nhash\n");
        assert_eq!(
            render_config(&AttrcastConfig::default()),
            "fail_fast = false\noutput = \"text\"\n"
        );
    }
}
