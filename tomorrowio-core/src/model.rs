use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Error;
use crate::timestep::Timestep;

/// Unit system the API reports values in.
///
/// `si` and `us` are accepted as aliases when parsing, matching the strings
/// the upstream service historically allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    Metric,
    #[default]
    Imperial,
}

impl UnitSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "metric",
            UnitSystem::Imperial => "imperial",
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnitSystem {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "metric" | "si" => Ok(UnitSystem::Metric),
            "imperial" | "us" => Ok(UnitSystem::Imperial),
            other => Err(Error::InvalidUnitSystem(other.to_string())),
        }
    }
}

/// Request body for the timelines endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineRequest {
    /// `[latitude, longitude]`.
    pub location: [f64; 2],
    pub units: UnitSystem,
    pub fields: Vec<String>,
    pub timesteps: Vec<Timestep>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
}

/// Top-level response from the timelines endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineResponse {
    pub data: TimelineData,
}

impl TimelineResponse {
    /// The timeline for a given timestep, if the response contains one.
    pub fn timeline(&self, timestep: Timestep) -> Option<&Timeline> {
        self.data.timelines.iter().find(|t| t.timestep == timestep)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineData {
    pub timelines: Vec<Timeline>,
}

/// One timestep's worth of intervals.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    pub timestep: Timestep,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    pub intervals: Vec<Interval>,
}

/// A single observation or forecast point.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interval {
    pub start_time: DateTime<Utc>,
    pub values: HashMap<String, Value>,
}

impl Interval {
    pub fn value(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    /// Decode the `weatherCode` value, if present.
    pub fn weather_code(&self) -> Option<WeatherCode> {
        self.values
            .get("weatherCode")
            .and_then(Value::as_i64)
            .map(WeatherCode::from_code)
    }
}

/// Combined result of a realtime query plus every forecast timeline.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RealtimeAndForecasts {
    /// Field values of the current conditions interval.
    pub current: HashMap<String, Value>,
    pub forecasts: Forecasts,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Forecasts {
    pub nowcast: Vec<Interval>,
    pub hourly: Vec<Interval>,
    pub daily: Vec<Interval>,
}

/// Condition codes returned in the `weatherCode` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherCode {
    Unknown,
    Clear,
    Cloudy,
    MostlyClear,
    PartlyCloudy,
    MostlyCloudy,
    Fog,
    LightFog,
    LightWind,
    Wind,
    StrongWind,
    Drizzle,
    Rain,
    LightRain,
    HeavyRain,
    Snow,
    Flurries,
    LightSnow,
    HeavySnow,
    FreezingDrizzle,
    FreezingRain,
    LightFreezingRain,
    HeavyFreezingRain,
    IcePellets,
    HeavyIcePellets,
    LightIcePellets,
    Thunderstorm,
}

impl WeatherCode {
    /// Decode a numeric v4 weather code. Unrecognized codes map to `Unknown`.
    pub fn from_code(code: i64) -> Self {
        match code {
            1000 => Self::Clear,
            1001 => Self::Cloudy,
            1100 => Self::MostlyClear,
            1101 => Self::PartlyCloudy,
            1102 => Self::MostlyCloudy,
            2000 => Self::Fog,
            2100 => Self::LightFog,
            3000 => Self::LightWind,
            3001 => Self::Wind,
            3002 => Self::StrongWind,
            4000 => Self::Drizzle,
            4001 => Self::Rain,
            4200 => Self::LightRain,
            4201 => Self::HeavyRain,
            5000 => Self::Snow,
            5001 => Self::Flurries,
            5100 => Self::LightSnow,
            5101 => Self::HeavySnow,
            6000 => Self::FreezingDrizzle,
            6001 => Self::FreezingRain,
            6200 => Self::LightFreezingRain,
            6201 => Self::HeavyFreezingRain,
            7000 => Self::IcePellets,
            7101 => Self::HeavyIcePellets,
            7102 => Self::LightIcePellets,
            8000 => Self::Thunderstorm,
            _ => Self::Unknown,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::Clear => "Clear",
            Self::Cloudy => "Cloudy",
            Self::MostlyClear => "Mostly Clear",
            Self::PartlyCloudy => "Partly Cloudy",
            Self::MostlyCloudy => "Mostly Cloudy",
            Self::Fog => "Fog",
            Self::LightFog => "Light Fog",
            Self::LightWind => "Light Wind",
            Self::Wind => "Wind",
            Self::StrongWind => "Strong Wind",
            Self::Drizzle => "Drizzle",
            Self::Rain => "Rain",
            Self::LightRain => "Light Rain",
            Self::HeavyRain => "Heavy Rain",
            Self::Snow => "Snow",
            Self::Flurries => "Flurries",
            Self::LightSnow => "Light Snow",
            Self::HeavySnow => "Heavy Snow",
            Self::FreezingDrizzle => "Freezing Drizzle",
            Self::FreezingRain => "Freezing Rain",
            Self::LightFreezingRain => "Light Freezing Rain",
            Self::HeavyFreezingRain => "Heavy Freezing Rain",
            Self::IcePellets => "Ice Pellets",
            Self::HeavyIcePellets => "Heavy Ice Pellets",
            Self::LightIcePellets => "Light Ice Pellets",
            Self::Thunderstorm => "Thunderstorm",
        }
    }
}

/// Values of the `precipitationType` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrecipitationType {
    None,
    Rain,
    Snow,
    FreezingRain,
    IcePellets,
}

impl PrecipitationType {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::None),
            1 => Some(Self::Rain),
            2 => Some(Self::Snow),
            3 => Some(Self::FreezingRain),
            4 => Some(Self::IcePellets),
            _ => None,
        }
    }
}

/// Values of the pollen index fields (`treeIndex`, `grassIndex`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollenIndex {
    None,
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl PollenIndex {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::None),
            1 => Some(Self::VeryLow),
            2 => Some(Self::Low),
            3 => Some(Self::Medium),
            4 => Some(Self::High),
            5 => Some(Self::VeryHigh),
            _ => None,
        }
    }
}

/// Values of the `mepPrimaryPollutant` / `epaPrimaryPollutant` fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryPollutant {
    Pm25,
    Pm10,
    O3,
    No2,
    Co,
    So2,
}

impl PrimaryPollutant {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Pm25),
            1 => Some(Self::Pm10),
            2 => Some(Self::O3),
            3 => Some(Self::No2),
            4 => Some(Self::Co),
            5 => Some(Self::So2),
            _ => None,
        }
    }
}

/// Values of the `mepHealthConcern` / `epaHealthConcern` fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthConcern {
    Good,
    Moderate,
    UnhealthyForSensitiveGroups,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

impl HealthConcern {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Good),
            1 => Some(Self::Moderate),
            2 => Some(Self::UnhealthyForSensitiveGroups),
            3 => Some(Self::Unhealthy),
            4 => Some(Self::VeryUnhealthy),
            5 => Some(Self::Hazardous),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unit_system_aliases() {
        assert_eq!("si".parse::<UnitSystem>().unwrap(), UnitSystem::Metric);
        assert_eq!("US".parse::<UnitSystem>().unwrap(), UnitSystem::Imperial);
        assert_eq!("Metric".parse::<UnitSystem>().unwrap(), UnitSystem::Metric);

        let err = "kelvin".parse::<UnitSystem>().unwrap_err();
        assert!(err.to_string().contains("unit system"));
    }

    #[test]
    fn request_body_shape() {
        let request = TimelineRequest {
            location: [28.4195, -81.5812],
            units: UnitSystem::Imperial,
            fields: vec!["temperature".to_string()],
            timesteps: vec![Timestep::Current],
            start_time: None,
            end_time: None,
        };

        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(
            body,
            json!({
                "location": [28.4195, -81.5812],
                "units": "imperial",
                "fields": ["temperature"],
                "timesteps": ["current"],
            })
        );
    }

    #[test]
    fn timeline_response_deserializes() {
        let body = json!({
            "data": {
                "timelines": [{
                    "timestep": "1h",
                    "startTime": "2022-03-15T18:00:00Z",
                    "endTime": "2022-03-15T20:00:00Z",
                    "intervals": [
                        {
                            "startTime": "2022-03-15T18:00:00Z",
                            "values": { "temperature": 70.3, "weatherCode": 1101 }
                        },
                        {
                            "startTime": "2022-03-15T19:00:00Z",
                            "values": { "temperature": 68.9, "weatherCode": 1001 }
                        }
                    ]
                }]
            }
        });

        let response: TimelineResponse = serde_json::from_value(body).unwrap();
        let timeline = response.timeline(Timestep::OneHour).unwrap();
        assert_eq!(timeline.intervals.len(), 2);
        assert_eq!(
            timeline.intervals[0].weather_code(),
            Some(WeatherCode::PartlyCloudy)
        );
        assert!(response.timeline(Timestep::OneDay).is_none());
    }

    #[test]
    fn code_enums_decode() {
        assert_eq!(WeatherCode::from_code(8000), WeatherCode::Thunderstorm);
        assert_eq!(WeatherCode::from_code(9999), WeatherCode::Unknown);
        assert_eq!(
            PrecipitationType::from_code(3),
            Some(PrecipitationType::FreezingRain)
        );
        assert_eq!(PollenIndex::from_code(5), Some(PollenIndex::VeryHigh));
        assert_eq!(PollenIndex::from_code(6), None);
        assert_eq!(
            HealthConcern::from_code(2),
            Some(HealthConcern::UnhealthyForSensitiveGroups)
        );
        assert_eq!(PrimaryPollutant::from_code(0), Some(PrimaryPollutant::Pm25));
    }
}
