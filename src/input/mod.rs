use crate::core::{clamp_column, Scenario};
use anyhow::{Context, Result};
use std::path::Path;

/// Load a scenario from a JSON file.
///
/// Producer-side validation happens here: message columns are clamped into
/// the valid range and missing message ids are filled in, so the playback
/// controller can trust every message it is handed.
pub fn load_scenario(path: &Path) -> Result<Scenario> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read scenario file {}", path.display()))?;

    let mut scenario: Scenario = serde_json::from_str(&data)
        .with_context(|| format!("failed to parse scenario file {}", path.display()))?;

    for message in &mut scenario.messages {
        message.column = clamp_column(message.column);
        if message.id.is_empty() {
            message.id = uuid::Uuid::new_v4().to_string();
        }
    }

    Ok(scenario)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_scenario(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_clamps_columns_and_fills_ids() {
        let file = write_scenario(
            r#"{
                "id": "s1",
                "name": "demo",
                "messages": [
                    {"id": "", "column": 99, "payload": {
                        "className": "OrderCreated",
                        "topic": "orders",
                        "message": {"orderId": 1}
                    }},
                    {"id": "m2", "column": 2, "payload": {
                        "className": "OrderShipped",
                        "topic": "orders",
                        "message": {}
                    }}
                ]
            }"#,
        );

        let scenario = load_scenario(file.path()).unwrap();
        assert_eq!(scenario.name, "demo");
        assert_eq!(scenario.messages[0].column, 20);
        assert!(!scenario.messages[0].id.is_empty());
        assert_eq!(scenario.messages[1].id, "m2");
        // description is optional on disk
        assert_eq!(scenario.description, "");
    }

    #[test]
    fn test_load_rejects_invalid_json() {
        let file = write_scenario("not json");
        assert!(load_scenario(file.path()).is_err());
    }

    #[test]
    fn test_load_missing_file_reports_path() {
        let err = load_scenario(Path::new("/no/such/scenario.json")).unwrap_err();
        assert!(err.to_string().contains("scenario.json"));
    }
}
