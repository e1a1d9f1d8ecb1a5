//! Logical field keys shared across message kinds.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A logical field that exists in one or more message kinds.
///
/// Not every key is meaningful for every kind. See [`crate::table`] for the
/// mapping from `(Kind, Key)` to a position inside the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    SerialNumber,
    HubSerialNumber,
    TimeEpoch,
    StrikeDistance,
    Energy,

    WindSpeed,
    WindDirection,

    WindLull,
    WindAvg,
    WindGust,
    WindSampleInterval,
    StationPressure,
    AirTemperature,
    RelativeHumidity,
    Illuminance,
    Uv,
    SolarRadiation,
    RainLastMinute,
    PrecipitationType,
    StrikeAvgDistance,
    StrikeCount,
    Battery,
    ReportInterval,
    Firmware,

    Uptime,
    Rssi,
    HubRssi,
    SensorStatus,
    Debug,

    ResetFlags,
    SequenceCount,
    RadioStatsVersion,
    RadioStatsRebootCount,
    RadioStatsBusErrorCount,
    RadioStatsStatus,
    RadioStatsNetworkId,
}

impl Key {
    /// All keys, in declaration order.
    pub const ALL: [Key; 36] = [
        Key::SerialNumber,
        Key::HubSerialNumber,
        Key::TimeEpoch,
        Key::StrikeDistance,
        Key::Energy,
        Key::WindSpeed,
        Key::WindDirection,
        Key::WindLull,
        Key::WindAvg,
        Key::WindGust,
        Key::WindSampleInterval,
        Key::StationPressure,
        Key::AirTemperature,
        Key::RelativeHumidity,
        Key::Illuminance,
        Key::Uv,
        Key::SolarRadiation,
        Key::RainLastMinute,
        Key::PrecipitationType,
        Key::StrikeAvgDistance,
        Key::StrikeCount,
        Key::Battery,
        Key::ReportInterval,
        Key::Firmware,
        Key::Uptime,
        Key::Rssi,
        Key::HubRssi,
        Key::SensorStatus,
        Key::Debug,
        Key::ResetFlags,
        Key::SequenceCount,
        Key::RadioStatsVersion,
        Key::RadioStatsRebootCount,
        Key::RadioStatsBusErrorCount,
        Key::RadioStatsStatus,
        Key::RadioStatsNetworkId,
    ];

    /// Returns the stable snake_case identifier of this key.
    ///
    /// This matches the serde representation.
    pub const fn name(self) -> &'static str {
        match self {
            Key::SerialNumber => "serial_number",
            Key::HubSerialNumber => "hub_serial_number",
            Key::TimeEpoch => "time_epoch",
            Key::StrikeDistance => "strike_distance",
            Key::Energy => "energy",
            Key::WindSpeed => "wind_speed",
            Key::WindDirection => "wind_direction",
            Key::WindLull => "wind_lull",
            Key::WindAvg => "wind_avg",
            Key::WindGust => "wind_gust",
            Key::WindSampleInterval => "wind_sample_interval",
            Key::StationPressure => "station_pressure",
            Key::AirTemperature => "air_temperature",
            Key::RelativeHumidity => "relative_humidity",
            Key::Illuminance => "illuminance",
            Key::Uv => "uv",
            Key::SolarRadiation => "solar_radiation",
            Key::RainLastMinute => "rain_last_minute",
            Key::PrecipitationType => "precipitation_type",
            Key::StrikeAvgDistance => "strike_avg_distance",
            Key::StrikeCount => "strike_count",
            Key::Battery => "battery",
            Key::ReportInterval => "report_interval",
            Key::Firmware => "firmware",
            Key::Uptime => "uptime",
            Key::Rssi => "rssi",
            Key::HubRssi => "hub_rssi",
            Key::SensorStatus => "sensor_status",
            Key::Debug => "debug",
            Key::ResetFlags => "reset_flags",
            Key::SequenceCount => "sequence_count",
            Key::RadioStatsVersion => "radio_stats_version",
            Key::RadioStatsRebootCount => "radio_stats_reboot_count",
            Key::RadioStatsBusErrorCount => "radio_stats_bus_error_count",
            Key::RadioStatsStatus => "radio_stats_status",
            Key::RadioStatsNetworkId => "radio_stats_network_id",
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Precipitation type codes carried by SKY and Tempest observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrecipitationType {
    None = 0,
    Rain = 1,
    Hail = 2,
    RainAndHail = 3,
}

impl PrecipitationType {
    /// Decodes a wire code. Unknown codes yield `None`.
    pub const fn from_code(code: u64) -> Option<Self> {
        match code {
            0 => Some(Self::None),
            1 => Some(Self::Rain),
            2 => Some(Self::Hail),
            3 => Some(Self::RainAndHail),
            _ => None,
        }
    }

    /// Decodes the value stored at [`Key::PrecipitationType`].
    ///
    /// Only unsigned integers are accepted; floats and strings are not coerced.
    ///
    /// # Examples
    ///
    /// ```
    /// use tempest_udp::PrecipitationType;
    /// use serde_json::json;
    ///
    /// assert_eq!(PrecipitationType::from_value(&json!(2)), Some(PrecipitationType::Hail));
    /// assert_eq!(PrecipitationType::from_value(&json!("2")), None);
    /// ```
    pub fn from_value(value: &Value) -> Option<Self> {
        value.as_u64().and_then(Self::from_code)
    }

    /// Returns the wire code.
    #[inline]
    pub const fn code(self) -> u64 {
        self as u64
    }
}
