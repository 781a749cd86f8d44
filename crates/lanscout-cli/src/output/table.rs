//! Table-formatted output for CLI.

use colored::*;
use comfy_table::{Cell, ContentArrangement, Table};

use lanscout_core::ServiceMap;

use super::OutputFormatter;

pub struct TableOutput;

impl TableOutput {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TableOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for TableOutput {
    fn format_services(&self, services: &ServiceMap, verbose: bool) -> String {
        if services.is_empty() {
            return "No services found.".to_string();
        }

        // Stable ordering for terminal output
        let mut identifiers: Vec<&str> = services.keys().map(String::as_str).collect();
        identifiers.sort_unstable();

        if verbose {
            let mut blocks = Vec::new();
            for id in &identifiers {
                let info = &services[*id];
                let mut lines = vec![format!("{}", id.bold())];
                let mut names: Vec<&str> = info.keys().map(String::as_str).collect();
                names.sort_unstable();
                for name in names {
                    lines.push(format!("  {}: {}", name, info[name]));
                }
                blocks.push(lines.join("\n"));
            }
            return format!(
                "{}\n\nFound {} service(s)",
                blocks.join("\n\n"),
                services.len()
            );
        }

        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["Identifier", "Address", "Headers"]);

        for id in identifiers {
            let info = &services[id];
            let address = info
                .get("Address")
                .or_else(|| info.get("LOCATION"))
                .or_else(|| info.get("Location"))
                .map(String::as_str)
                .unwrap_or("-");
            table.add_row(vec![
                Cell::new(id),
                Cell::new(address),
                Cell::new(info.len().to_string()),
            ]);
        }

        format!("{}\n\nFound {} service(s)", table, services.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn sample_services() -> ServiceMap {
        let mut services = ServiceMap::new();
        services.insert(
            "A".to_string(),
            HashMap::from([
                ("Name".to_string(), "Alpha".to_string()),
                ("Address".to_string(), "192.168.1.10".to_string()),
            ]),
        );
        services.insert(
            "uuid:42".to_string(),
            HashMap::from([(
                "LOCATION".to_string(),
                "http://192.168.1.20:80/desc.xml".to_string(),
            )]),
        );
        services
    }

    #[test]
    fn test_empty_map_message() {
        let output = TableOutput::new().format_services(&ServiceMap::new(), false);
        assert_eq!(output, "No services found.");
    }

    #[test]
    fn test_table_lists_all_identifiers() {
        let output = TableOutput::new().format_services(&sample_services(), false);
        assert!(output.contains("A"));
        assert!(output.contains("uuid:42"));
        assert!(output.contains("192.168.1.10"));
        assert!(output.contains("http://192.168.1.20:80/desc.xml"));
        assert!(output.contains("Found 2 service(s)"));
    }

    #[test]
    fn test_verbose_dumps_headers() {
        let output = TableOutput::new().format_services(&sample_services(), true);
        assert!(output.contains("Name: Alpha"));
        assert!(output.contains("Address: 192.168.1.10"));
        assert!(output.contains("Found 2 service(s)"));
    }
}
