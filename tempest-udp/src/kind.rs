//! Message kinds and their wire discriminators.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::DecodeError;

/// Known kinds of hub messages.
///
/// The set is fixed by the UDP protocol. Each kind is identified on the wire
/// by the string in the message's `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    /// Rain start event (`evt_precip`).
    Rain,
    /// Lightning strike event (`evt_strike`).
    Lightning,
    /// Rapid wind observation (`rapid_wind`).
    Wind,
    /// AIR device observation (`obs_air`).
    Air,
    /// SKY device observation (`obs_sky`).
    Sky,
    /// Tempest device observation (`obs_st`).
    Tempest,
    /// Device status (`device_status`).
    Status,
    /// Hub status (`hub_status`).
    Hub,
}

impl Kind {
    /// All kinds, in protocol order.
    pub const ALL: [Kind; 8] = [
        Kind::Rain,
        Kind::Lightning,
        Kind::Wind,
        Kind::Air,
        Kind::Sky,
        Kind::Tempest,
        Kind::Status,
        Kind::Hub,
    ];

    /// Returns the `type` string that identifies this kind on the wire.
    pub const fn discriminator(self) -> &'static str {
        match self {
            Kind::Rain => "evt_precip",
            Kind::Lightning => "evt_strike",
            Kind::Wind => "rapid_wind",
            Kind::Air => "obs_air",
            Kind::Sky => "obs_sky",
            Kind::Tempest => "obs_st",
            Kind::Status => "device_status",
            Kind::Hub => "hub_status",
        }
    }

    /// Returns the snake_case name of this kind, matching its serde form.
    pub const fn name(self) -> &'static str {
        match self {
            Kind::Rain => "rain",
            Kind::Lightning => "lightning",
            Kind::Wind => "wind",
            Kind::Air => "air",
            Kind::Sky => "sky",
            Kind::Tempest => "tempest",
            Kind::Status => "status",
            Kind::Hub => "hub",
        }
    }

    /// Looks up a kind by its wire discriminator.
    ///
    /// Matching is exact and case-sensitive.
    ///
    /// # Examples
    ///
    /// ```
    /// use tempest_udp::Kind;
    ///
    /// assert_eq!(Kind::from_discriminator("obs_st"), Some(Kind::Tempest));
    /// assert_eq!(Kind::from_discriminator("OBS_ST"), None);
    /// ```
    pub fn from_discriminator(discriminator: &str) -> Option<Kind> {
        Kind::ALL
            .into_iter()
            .find(|kind| kind.discriminator() == discriminator)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.discriminator())
    }
}

/// Accepts either the wire discriminator (`obs_st`) or the name (`tempest`).
impl FromStr for Kind {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Kind::from_discriminator(s)
            .or_else(|| Kind::ALL.into_iter().find(|kind| kind.name() == s))
            .ok_or_else(|| DecodeError::unknown_kind(Some(s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discriminator_round_trip() {
        for kind in Kind::ALL {
            assert_eq!(Kind::from_discriminator(kind.discriminator()), Some(kind));
        }
    }

    #[test]
    fn test_discriminators_are_disjoint() {
        let mut seen: Vec<&str> = Kind::ALL.iter().map(|k| k.discriminator()).collect();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), Kind::ALL.len());
    }

    #[test]
    fn test_unknown_discriminators() {
        assert_eq!(Kind::from_discriminator(""), None);
        assert_eq!(Kind::from_discriminator("Obs_Sky"), None);
        assert_eq!(Kind::from_discriminator("obs_sky "), None);
        assert_eq!(Kind::from_discriminator("light_debug"), None);
    }

    #[test]
    fn test_from_str_accepts_both_forms() {
        assert_eq!("obs_st".parse::<Kind>().unwrap(), Kind::Tempest);
        assert_eq!("tempest".parse::<Kind>().unwrap(), Kind::Tempest);
        assert_eq!("hub_status".parse::<Kind>().unwrap(), Kind::Hub);
        assert!("Tempest".parse::<Kind>().is_err());
    }

    #[test]
    fn test_name_matches_serde() {
        for kind in Kind::ALL {
            assert_eq!(
                serde_json::to_value(kind).unwrap(),
                serde_json::Value::from(kind.name())
            );
        }
    }

    #[test]
    fn test_display_uses_discriminator() {
        assert_eq!(Kind::Hub.to_string(), "hub_status");
        assert_eq!(Kind::Wind.to_string(), "rapid_wind");
    }
}
