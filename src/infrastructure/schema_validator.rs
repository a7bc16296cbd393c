use anyhow::{anyhow, Result};
use jsonschema::{Draft, JSONSchema};
use once_cell::sync::Lazy;
use serde_json::Value;

static REPORT_SCHEMA: Lazy<JSONSchema> = Lazy::new(|| {
    let schema_content = include_str!("../schemas/report_schema.json");
    let schema: Value = serde_json::from_str(schema_content).expect("Invalid report schema");
    JSONSchema::options()
        .with_draft(Draft::Draft7)
        .compile(&schema)
        .expect("Failed to compile report schema")
});

/// Validate a cleaning report against the report schema
pub fn validate_report_schema(report: &Value) -> Result<()> {
    match REPORT_SCHEMA.validate(report) {
        Ok(()) => Ok(()),
        Err(errors) => {
            let error_list: Vec<String> = errors.map(|e| e.to_string()).collect();
            Err(anyhow!(
                "Report validation failed:\n{}",
                error_list.join("\n")
            ))
        }
    }
}
