//! Generic text-protocol header parsing.

use std::collections::HashMap;

/// Parse a block of `Name: value` lines into a map.
///
/// Lines are separated by CRLF (bare LF tolerated); names and values are
/// trimmed, case preserved as received. Lines without a colon are skipped.
/// A repeated name keeps the last value seen.
pub fn parse_header_block(block: &str) -> HashMap<String, String> {
    let mut headers = HashMap::new();
    for line in block.lines() {
        if let Some((name, value)) = line.split_once(':') {
            headers.insert(name.trim().to_string(), value.trim().to_string());
        }
    }
    headers
}
