//! Field location table.
//!
//! The UDP protocol numbers array elements by position with no inline labels,
//! so every `(Kind, Key)` pair maps to a fixed path inside that kind's message.
//! The rows below follow the v171 wire format; array order is significant.

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;

use crate::{Key, Kind};

const SERIAL_NUMBER: &str = "serial_number";
const HUB_SERIAL_NUMBER: &str = "hub_sn";
const EVT: &str = "evt";
const OB: &str = "ob";
const OBS: &str = "obs";
const FIRMWARE_REVISION: &str = "firmware_revision";
const TIMESTAMP: &str = "timestamp";
const UPTIME: &str = "uptime";
const RSSI: &str = "rssi";
const RADIO_STATS: &str = "radio_stats";

/// Where a logical field lives inside a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldLocation {
    /// A top-level field.
    Field(&'static str),
    /// An element of a top-level array.
    Indexed(&'static str, usize),
    /// An element of an array nested inside a top-level array.
    Nested(&'static str, usize, usize),
}

impl fmt::Display for FieldLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(name) => write!(f, "{}", name),
            Self::Indexed(name, i) => write!(f, "{}[{}]", name, i),
            Self::Nested(name, i, j) => write!(f, "{}[{}][{}]", name, i, j),
        }
    }
}

use FieldLocation::{Field, Indexed, Nested};

/// Every `(Kind, Key)` row, grouped by kind in protocol order.
static FIELD_TABLE: &[(Kind, Key, FieldLocation)] = &[
    // evt_precip
    (Kind::Rain, Key::SerialNumber, Field(SERIAL_NUMBER)),
    (Kind::Rain, Key::HubSerialNumber, Field(HUB_SERIAL_NUMBER)),
    (Kind::Rain, Key::TimeEpoch, Indexed(EVT, 0)),
    // evt_strike
    (Kind::Lightning, Key::SerialNumber, Field(SERIAL_NUMBER)),
    (Kind::Lightning, Key::HubSerialNumber, Field(HUB_SERIAL_NUMBER)),
    (Kind::Lightning, Key::TimeEpoch, Indexed(EVT, 0)),
    (Kind::Lightning, Key::StrikeDistance, Indexed(EVT, 1)),
    (Kind::Lightning, Key::Energy, Indexed(EVT, 2)),
    // rapid_wind
    (Kind::Wind, Key::SerialNumber, Field(SERIAL_NUMBER)),
    (Kind::Wind, Key::HubSerialNumber, Field(HUB_SERIAL_NUMBER)),
    (Kind::Wind, Key::TimeEpoch, Indexed(OB, 0)),
    (Kind::Wind, Key::WindSpeed, Indexed(OB, 1)),
    (Kind::Wind, Key::WindDirection, Indexed(OB, 2)),
    // obs_air
    (Kind::Air, Key::SerialNumber, Field(SERIAL_NUMBER)),
    (Kind::Air, Key::HubSerialNumber, Field(HUB_SERIAL_NUMBER)),
    (Kind::Air, Key::Firmware, Field(FIRMWARE_REVISION)),
    (Kind::Air, Key::TimeEpoch, Nested(OBS, 0, 0)),
    (Kind::Air, Key::StationPressure, Nested(OBS, 0, 1)),
    (Kind::Air, Key::AirTemperature, Nested(OBS, 0, 2)),
    (Kind::Air, Key::RelativeHumidity, Nested(OBS, 0, 3)),
    (Kind::Air, Key::StrikeCount, Nested(OBS, 0, 4)),
    (Kind::Air, Key::StrikeAvgDistance, Nested(OBS, 0, 5)),
    (Kind::Air, Key::Battery, Nested(OBS, 0, 6)),
    (Kind::Air, Key::ReportInterval, Nested(OBS, 0, 7)),
    // obs_sky; position 11 is unused on the wire
    (Kind::Sky, Key::SerialNumber, Field(SERIAL_NUMBER)),
    (Kind::Sky, Key::HubSerialNumber, Field(HUB_SERIAL_NUMBER)),
    (Kind::Sky, Key::Firmware, Field(FIRMWARE_REVISION)),
    (Kind::Sky, Key::TimeEpoch, Nested(OBS, 0, 0)),
    (Kind::Sky, Key::Illuminance, Nested(OBS, 0, 1)),
    (Kind::Sky, Key::Uv, Nested(OBS, 0, 2)),
    (Kind::Sky, Key::RainLastMinute, Nested(OBS, 0, 3)),
    (Kind::Sky, Key::WindLull, Nested(OBS, 0, 4)),
    (Kind::Sky, Key::WindAvg, Nested(OBS, 0, 5)),
    (Kind::Sky, Key::WindGust, Nested(OBS, 0, 6)),
    (Kind::Sky, Key::WindDirection, Nested(OBS, 0, 7)),
    (Kind::Sky, Key::Battery, Nested(OBS, 0, 8)),
    (Kind::Sky, Key::ReportInterval, Nested(OBS, 0, 9)),
    (Kind::Sky, Key::SolarRadiation, Nested(OBS, 0, 10)),
    (Kind::Sky, Key::PrecipitationType, Nested(OBS, 0, 12)),
    (Kind::Sky, Key::WindSampleInterval, Nested(OBS, 0, 13)),
    // obs_st
    (Kind::Tempest, Key::SerialNumber, Field(SERIAL_NUMBER)),
    (Kind::Tempest, Key::HubSerialNumber, Field(HUB_SERIAL_NUMBER)),
    (Kind::Tempest, Key::Firmware, Field(FIRMWARE_REVISION)),
    (Kind::Tempest, Key::TimeEpoch, Nested(OBS, 0, 0)),
    (Kind::Tempest, Key::WindLull, Nested(OBS, 0, 1)),
    (Kind::Tempest, Key::WindAvg, Nested(OBS, 0, 2)),
    (Kind::Tempest, Key::WindGust, Nested(OBS, 0, 3)),
    (Kind::Tempest, Key::WindDirection, Nested(OBS, 0, 4)),
    (Kind::Tempest, Key::WindSampleInterval, Nested(OBS, 0, 5)),
    (Kind::Tempest, Key::StationPressure, Nested(OBS, 0, 6)),
    (Kind::Tempest, Key::AirTemperature, Nested(OBS, 0, 7)),
    (Kind::Tempest, Key::RelativeHumidity, Nested(OBS, 0, 8)),
    (Kind::Tempest, Key::Illuminance, Nested(OBS, 0, 9)),
    (Kind::Tempest, Key::Uv, Nested(OBS, 0, 10)),
    (Kind::Tempest, Key::SolarRadiation, Nested(OBS, 0, 11)),
    (Kind::Tempest, Key::RainLastMinute, Nested(OBS, 0, 12)),
    (Kind::Tempest, Key::PrecipitationType, Nested(OBS, 0, 13)),
    (Kind::Tempest, Key::StrikeAvgDistance, Nested(OBS, 0, 14)),
    (Kind::Tempest, Key::StrikeCount, Nested(OBS, 0, 15)),
    (Kind::Tempest, Key::Battery, Nested(OBS, 0, 16)),
    (Kind::Tempest, Key::ReportInterval, Nested(OBS, 0, 17)),
    // device_status
    (Kind::Status, Key::SerialNumber, Field(SERIAL_NUMBER)),
    (Kind::Status, Key::HubSerialNumber, Field(HUB_SERIAL_NUMBER)),
    (Kind::Status, Key::Firmware, Field(FIRMWARE_REVISION)),
    (Kind::Status, Key::TimeEpoch, Field(TIMESTAMP)),
    (Kind::Status, Key::Uptime, Field(UPTIME)),
    (Kind::Status, Key::Battery, Field("voltage")),
    (Kind::Status, Key::Rssi, Field(RSSI)),
    (Kind::Status, Key::HubRssi, Field("hub_rssi")),
    (Kind::Status, Key::SensorStatus, Field("sensor_status")),
    (Kind::Status, Key::Debug, Field("debug")),
    // hub_status; a hub reports its own serial under both keys
    (Kind::Hub, Key::SerialNumber, Field(SERIAL_NUMBER)),
    (Kind::Hub, Key::HubSerialNumber, Field(SERIAL_NUMBER)),
    (Kind::Hub, Key::Firmware, Field(FIRMWARE_REVISION)),
    (Kind::Hub, Key::TimeEpoch, Field(TIMESTAMP)),
    (Kind::Hub, Key::Uptime, Field(UPTIME)),
    (Kind::Hub, Key::Rssi, Field(RSSI)),
    (Kind::Hub, Key::ResetFlags, Field("reset_flags")),
    (Kind::Hub, Key::SequenceCount, Field("seq")),
    (Kind::Hub, Key::RadioStatsVersion, Indexed(RADIO_STATS, 0)),
    (Kind::Hub, Key::RadioStatsRebootCount, Indexed(RADIO_STATS, 1)),
    (Kind::Hub, Key::RadioStatsBusErrorCount, Indexed(RADIO_STATS, 2)),
    (Kind::Hub, Key::RadioStatsStatus, Indexed(RADIO_STATS, 3)),
    (Kind::Hub, Key::RadioStatsNetworkId, Indexed(RADIO_STATS, 4)),
];

static INDEX: Lazy<HashMap<(Kind, Key), FieldLocation>> = Lazy::new(|| {
    FIELD_TABLE
        .iter()
        .map(|&(kind, key, location)| ((kind, key), location))
        .collect()
});

/// Returns where `key` lives in a message of `kind`, or `None` if the key is
/// not part of that kind.
///
/// # Examples
///
/// ```
/// use tempest_udp::{table, FieldLocation, Key, Kind};
///
/// assert_eq!(
///     table::location(Kind::Tempest, Key::WindAvg),
///     Some(FieldLocation::Nested("obs", 0, 2))
/// );
/// assert_eq!(table::location(Kind::Hub, Key::StrikeDistance), None);
/// ```
#[inline]
pub fn location(kind: Kind, key: Key) -> Option<FieldLocation> {
    INDEX.get(&(kind, key)).copied()
}

/// Returns the keys defined for `kind` with their locations, in wire order.
pub fn keys_for(kind: Kind) -> impl Iterator<Item = (Key, FieldLocation)> {
    FIELD_TABLE
        .iter()
        .filter(move |(k, _, _)| *k == kind)
        .map(|&(_, key, location)| (key, location))
}

/// Returns every row of the table.
#[inline]
pub fn entries() -> &'static [(Kind, Key, FieldLocation)] {
    FIELD_TABLE
}
