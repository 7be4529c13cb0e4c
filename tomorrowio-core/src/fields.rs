//! Registry of the v4 timeline fields and their availability rules.
//!
//! Every field has a maximum timestep it can be queried at: air quality and
//! pollen data stop at hourly resolution, hail and fire data are realtime
//! only. Aggregated timesteps replace some fields with `Min`/`Max`/`Avg`
//! variants, which is what [`convert_to_measurements`] expands to.

use tracing::warn;

use crate::timestep::Timestep;

/// Measurement suffix a field gains at aggregated timesteps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measurement {
    Min,
    Max,
    Avg,
}

impl Measurement {
    pub fn suffix(&self) -> &'static str {
        match self {
            Measurement::Min => "Min",
            Measurement::Max => "Max",
            Measurement::Avg => "Avg",
        }
    }
}

const ALL_MEASUREMENTS: &[Measurement] = &[Measurement::Min, Measurement::Max, Measurement::Avg];
const NO_AVG: &[Measurement] = &[Measurement::Min, Measurement::Max];
const AVG_ONLY: &[Measurement] = &[Measurement::Avg];
const NONE: &[Measurement] = &[];

/// Category a field belongs to, for filtering the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Weather,
    Precipitation,
    AirQuality,
    Pollen,
    Fire,
    Solar,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Weather => "weather",
            FieldKind::Precipitation => "precipitation",
            FieldKind::AirQuality => "air_quality",
            FieldKind::Pollen => "pollen",
            FieldKind::Fire => "fire",
            FieldKind::Solar => "solar",
        }
    }
}

/// Definition of one queryable field.
#[derive(Debug, Clone, Copy)]
pub struct FieldDefinition {
    pub name: &'static str,
    pub max_timestep: Timestep,
    pub measurements: &'static [Measurement],
    pub kind: FieldKind,
}

impl FieldDefinition {
    /// Whether the field can be queried at the given timestep.
    pub fn supports(&self, timestep: Timestep) -> bool {
        self.max_timestep >= timestep
    }
}

macro_rules! field {
    ($name:literal, $max:ident, $measurements:ident, $kind:ident) => {
        FieldDefinition {
            name: $name,
            max_timestep: Timestep::$max,
            measurements: $measurements,
            kind: FieldKind::$kind,
        }
    };
}

/// All fields served by the v4 timelines API.
pub const FIELDS_V4: &[FieldDefinition] = &[
    field!("temperature", OneDay, ALL_MEASUREMENTS, Weather),
    field!("temperatureApparent", OneDay, ALL_MEASUREMENTS, Weather),
    field!("dewPoint", OneDay, ALL_MEASUREMENTS, Weather),
    field!("humidity", OneDay, ALL_MEASUREMENTS, Weather),
    field!("windSpeed", OneDay, ALL_MEASUREMENTS, Weather),
    field!("windDirection", OneDay, AVG_ONLY, Weather),
    field!("windGust", OneDay, ALL_MEASUREMENTS, Weather),
    field!("pressureSurfaceLevel", OneDay, ALL_MEASUREMENTS, Weather),
    field!("pressureSeaLevel", OneDay, ALL_MEASUREMENTS, Weather),
    field!("precipitationIntensity", OneDay, ALL_MEASUREMENTS, Precipitation),
    field!("precipitationProbability", OneDay, ALL_MEASUREMENTS, Precipitation),
    field!("precipitationType", OneHour, NONE, Precipitation),
    field!("hailBinary", Current, NONE, Precipitation),
    field!("solarGHI", OneDay, ALL_MEASUREMENTS, Solar),
    field!("solarDNI", OneDay, ALL_MEASUREMENTS, Solar),
    field!("solarDHI", OneDay, ALL_MEASUREMENTS, Solar),
    field!("visibility", OneDay, ALL_MEASUREMENTS, Weather),
    field!("cloudCover", OneDay, ALL_MEASUREMENTS, Weather),
    field!("cloudBase", OneDay, ALL_MEASUREMENTS, Weather),
    field!("cloudCeiling", OneDay, ALL_MEASUREMENTS, Weather),
    field!("weatherCode", OneDay, NO_AVG, Weather),
    field!("particulateMatter25", OneHour, ALL_MEASUREMENTS, AirQuality),
    field!("particulateMatter10", OneHour, ALL_MEASUREMENTS, AirQuality),
    field!("pollutantO3", OneHour, ALL_MEASUREMENTS, AirQuality),
    field!("pollutantNO2", OneHour, ALL_MEASUREMENTS, AirQuality),
    field!("pollutantCO", OneHour, ALL_MEASUREMENTS, AirQuality),
    field!("pollutantSO2", OneHour, ALL_MEASUREMENTS, AirQuality),
    field!("mepIndex", OneHour, ALL_MEASUREMENTS, AirQuality),
    field!("mepPrimaryPollutant", OneHour, NONE, AirQuality),
    field!("mepHealthConcern", OneHour, ALL_MEASUREMENTS, AirQuality),
    field!("epaIndex", OneHour, ALL_MEASUREMENTS, AirQuality),
    field!("epaPrimaryPollutant", OneHour, NONE, AirQuality),
    field!("epaHealthConcern", OneHour, ALL_MEASUREMENTS, AirQuality),
    field!("treeIndex", OneHour, ALL_MEASUREMENTS, Pollen),
    field!("grassIndex", OneHour, ALL_MEASUREMENTS, Pollen),
    field!("grassGrassIndex", OneHour, ALL_MEASUREMENTS, Pollen),
    field!("weedIndex", OneHour, ALL_MEASUREMENTS, Pollen),
    field!("weedRagweedIndex", OneHour, ALL_MEASUREMENTS, Pollen),
    field!("fireIndex", Current, ALL_MEASUREMENTS, Fire),
];

/// Look up a field definition by its wire name.
pub fn definition(name: &str) -> Option<&'static FieldDefinition> {
    FIELDS_V4.iter().find(|f| f.name == name)
}

/// Fields that can be queried at `timestep`, optionally restricted to kinds.
pub fn available_fields(timestep: Timestep, kinds: Option<&[FieldKind]>) -> Vec<&'static str> {
    FIELDS_V4
        .iter()
        .filter(|f| f.supports(timestep))
        .filter(|f| kinds.is_none_or(|kinds| kinds.contains(&f.kind)))
        .map(|f| f.name)
        .collect()
}

/// Filter a caller-supplied field list to what is valid for `timestep`.
///
/// Unknown fields and fields not served at the timestep are dropped with a
/// warning naming them, matching what the API would silently reject.
pub fn process_fields(fields: &[&str], timestep: Timestep) -> Vec<String> {
    let (known, unknown): (Vec<&str>, Vec<&str>) = fields
        .iter()
        .copied()
        .partition(|name| definition(name).is_some());
    if !unknown.is_empty() {
        warn!(?unknown, "removed invalid fields");
    }

    let (kept, dropped): (Vec<&str>, Vec<&str>) = known
        .into_iter()
        .partition(|name| definition(name).is_some_and(|def| def.supports(timestep)));
    if !dropped.is_empty() {
        warn!(timestep = %timestep, ?dropped, "removed fields not available for timestep");
    }

    kept.into_iter().map(str::to_string).collect()
}

/// Expand aggregated fields into their `Min`/`Max`/`Avg` wire names.
///
/// Fields with fewer than two measurement variants are requested bare.
pub fn convert_to_measurements(fields: &[String]) -> Vec<String> {
    let mut out = Vec::with_capacity(fields.len());
    for name in fields {
        match definition(name) {
            Some(def) if def.measurements.len() >= 2 => {
                out.extend(
                    def.measurements
                        .iter()
                        .map(|m| format!("{name}{}", m.suffix())),
                );
            }
            _ => out.push(name.clone()),
        }
    }
    out
}
