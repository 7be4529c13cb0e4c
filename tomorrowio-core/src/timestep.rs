use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Resolution of a timelines query.
///
/// `Current` is the zero-duration timestep used by the realtime endpoint.
/// Ordering follows the underlying duration, so a field's availability can be
/// checked by comparing against its maximum supported timestep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Timestep {
    #[serde(rename = "current")]
    Current,
    #[serde(rename = "1m")]
    OneMinute,
    #[serde(rename = "5m")]
    FiveMinutes,
    #[serde(rename = "15m")]
    FifteenMinutes,
    #[serde(rename = "30m")]
    ThirtyMinutes,
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "1d")]
    OneDay,
}

impl Timestep {
    pub fn as_str(&self) -> &'static str {
        match self {
            Timestep::Current => "current",
            Timestep::OneMinute => "1m",
            Timestep::FiveMinutes => "5m",
            Timestep::FifteenMinutes => "15m",
            Timestep::ThirtyMinutes => "30m",
            Timestep::OneHour => "1h",
            Timestep::OneDay => "1d",
        }
    }

    pub const fn all() -> &'static [Timestep] {
        &[
            Timestep::Current,
            Timestep::OneMinute,
            Timestep::FiveMinutes,
            Timestep::FifteenMinutes,
            Timestep::ThirtyMinutes,
            Timestep::OneHour,
            Timestep::OneDay,
        ]
    }

    /// True for the sub-hourly timesteps served by the nowcast endpoint.
    pub fn is_nowcast(&self) -> bool {
        matches!(
            self,
            Timestep::OneMinute
                | Timestep::FiveMinutes
                | Timestep::FifteenMinutes
                | Timestep::ThirtyMinutes
        )
    }

    /// Map a minute count onto a nowcast timestep.
    ///
    /// The API only serves nowcast data at 1, 5, 15 and 30 minute resolution.
    pub fn from_nowcast_minutes(minutes: u32) -> Result<Self, Error> {
        match minutes {
            1 => Ok(Timestep::OneMinute),
            5 => Ok(Timestep::FiveMinutes),
            15 => Ok(Timestep::FifteenMinutes),
            30 => Ok(Timestep::ThirtyMinutes),
            _ => Err(Error::InvalidTimestep(format!(
                "{minutes}m is not a nowcast timestep (valid: 1m, 5m, 15m, 30m)"
            ))),
        }
    }
}

impl fmt::Display for Timestep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timestep {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "current" => Ok(Timestep::Current),
            "1m" => Ok(Timestep::OneMinute),
            "5m" => Ok(Timestep::FiveMinutes),
            "15m" => Ok(Timestep::FifteenMinutes),
            "30m" => Ok(Timestep::ThirtyMinutes),
            "1h" | "hourly" => Ok(Timestep::OneHour),
            "1d" | "daily" => Ok(Timestep::OneDay),
            other => Err(Error::InvalidTimestep(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestep_as_str_roundtrip() {
        for ts in Timestep::all() {
            let parsed: Timestep = ts.as_str().parse().expect("roundtrip should succeed");
            assert_eq!(*ts, parsed);
        }
    }

    #[test]
    fn ordering_follows_duration() {
        assert!(Timestep::Current < Timestep::OneMinute);
        assert!(Timestep::FiveMinutes < Timestep::ThirtyMinutes);
        assert!(Timestep::OneHour < Timestep::OneDay);
    }

    #[test]
    fn nowcast_minutes() {
        assert_eq!(
            Timestep::from_nowcast_minutes(5).unwrap(),
            Timestep::FiveMinutes
        );
        assert_eq!(
            Timestep::from_nowcast_minutes(30).unwrap(),
            Timestep::ThirtyMinutes
        );

        let err = Timestep::from_nowcast_minutes(10).unwrap_err();
        assert!(err.to_string().contains("not a nowcast timestep"));
    }

    #[test]
    fn serializes_to_wire_strings() {
        assert_eq!(
            serde_json::to_string(&Timestep::OneHour).unwrap(),
            "\"1h\""
        );
        assert_eq!(
            serde_json::from_str::<Timestep>("\"current\"").unwrap(),
            Timestep::Current
        );
    }
}
