//! Line rendering of observed messages.

use serde_json::{json, Map, Value};
use tempest_udp::{table, Kind, Store};

/// How each observation is written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// `obs_st serial_number="ST-1" time_epoch=1588948614 ...`
    Text,
    /// One JSON object per line.
    Json,
}

/// Renders the current message of `kind` as a single line.
///
/// Only keys present in the message are written, in wire order. Values are
/// printed as they appear on the wire.
pub fn render(format: Format, kind: Kind, store: &Store) -> String {
    let fields = table::keys_for(kind)
        .filter_map(|(key, _)| store.get_value(kind, key).map(|value| (key, value)));

    match format {
        Format::Text => {
            let mut line = kind.to_string();
            for (key, value) in fields {
                line.push(' ');
                line.push_str(key.name());
                line.push('=');
                line.push_str(&value.to_string());
            }
            line
        }
        Format::Json => {
            let fields: Map<String, Value> = fields
                .map(|(key, value)| (key.name().to_string(), value.clone()))
                .collect();
            json!({ "kind": kind, "fields": fields }).to_string()
        }
    }
}
