//! JSON-formatted output for CLI.

use serde::Serialize;
use serde_json::json;

use lanscout_core::ServiceMap;

use super::OutputFormatter;

pub struct JsonOutput;

impl JsonOutput {
    pub fn new() -> Self {
        Self
    }

    fn to_json<T: Serialize>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for JsonOutput {
    fn format_services(&self, services: &ServiceMap, _verbose: bool) -> String {
        let output = json!({
            "services": services,
            "count": services.len()
        });
        Self::to_json(&output)
    }
}
