//! Output formatting for CLI results.

pub mod json;
pub mod table;

pub use json::JsonOutput;
pub use table::TableOutput;

use lanscout_core::ServiceMap;

/// Output formatter trait
pub trait OutputFormatter {
    /// Format the discovered service set
    fn format_services(&self, services: &ServiceMap, verbose: bool) -> String;
}

/// Get the appropriate formatter based on JSON flag
pub fn get_formatter(json: bool) -> Box<dyn OutputFormatter> {
    if json {
        Box::new(JsonOutput::new())
    } else {
        Box::new(TableOutput::new())
    }
}
