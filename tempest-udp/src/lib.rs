//! # tempest-udp
//!
//! A decoder for the UDP broadcasts of a WeatherFlow Tempest hub.
//!
//! The hub sends one JSON message per datagram. Each message carries a `type`
//! discriminator and a kind-specific shape, where most readings sit at fixed
//! positions inside unlabeled arrays. This crate:
//! - Classifies a raw payload into one of eight [`Kind`]s
//! - Keeps the latest message of each kind
//! - Resolves logical [`Key`]s to the right position for each kind
//! - Notifies a single registered callback when a message arrives
//!
//! ## Quick Start
//!
//! ```rust
//! use tempest_udp::{Key, Kind, WeatherFlow};
//! use serde_json::json;
//!
//! let mut decoder = WeatherFlow::new();
//!
//! let payload = br#"{
//!     "serial_number": "ST-00000512",
//!     "type": "obs_st",
//!     "hub_sn": "HB-00013030",
//!     "obs": [[1588948614,0.18,0.22,0.27,144,6,1017.57,22.37,50.26,328,0.03,3,0.000000,0,0,0,2.410,1]],
//!     "firmware_revision": 129
//! }"#;
//!
//! assert_eq!(decoder.process_message(payload).unwrap(), Kind::Tempest);
//! assert_eq!(decoder.get_value(Kind::Tempest, Key::AirTemperature), Some(&json!(22.37)));
//! assert_eq!(decoder.get_value(Kind::Tempest, Key::Firmware), Some(&json!(129)));
//!
//! // Keys that a kind does not carry are absent, not zero.
//! assert_eq!(decoder.get_value(Kind::Tempest, Key::RadioStatsVersion), None);
//! ```
//!
//! ## Listening
//!
//! With the default `udp` feature, [`listener::UdpListener`] binds port 50222
//! and feeds every datagram to a decoder.

pub mod decoder;
pub mod document;
pub mod error;
pub mod key;
pub mod kind;
pub mod store;
pub mod table;

#[cfg(feature = "udp")]
pub mod listener;

pub use decoder::{Notify, WeatherFlow};
pub use document::Document;
pub use error::{DecodeError, Result};
pub use key::{Key, PrecipitationType};
pub use kind::Kind;
pub use store::Store;
pub use table::FieldLocation;

/// Classifies a single payload with a throwaway decoder.
///
/// Useful for one-off inspection; returns the kind and the parsed document.
///
/// # Examples
///
/// ```
/// use tempest_udp::{decode, Kind};
///
/// let (kind, document) = decode(br#"{"type":"evt_precip","evt":[1493322445]}"#).unwrap();
/// assert_eq!(kind, Kind::Rain);
/// assert!(!document.is_empty());
/// ```
///
/// # Errors
///
/// Same as [`WeatherFlow::process_message`].
pub fn decode(payload: &[u8]) -> Result<(Kind, Document)> {
    let mut decoder = WeatherFlow::new();
    let kind = decoder.process_message(payload)?;
    Ok((kind, decoder.last_document(kind)))
}
