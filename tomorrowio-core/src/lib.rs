//! Core library for the Tomorrow.io client.
//!
//! This crate defines:
//! - An async client for the v4 timelines API ([`TomorrowioV4`])
//! - A blocking facade over it ([`TomorrowioV4Sync`])
//! - The field registry with per-timestep availability rules
//! - Typed request/response models and the client error taxonomy
//! - Configuration handling for the `tomorrowio` CLI
//!
//! It is used by `tomorrowio-cli`, but can also be reused by other binaries or
//! services.

pub mod blocking;
pub mod client;
pub mod config;
pub mod error;
pub mod fields;
pub mod model;
pub mod timestep;

pub use blocking::TomorrowioV4Sync;
pub use client::{BASE_URL_V4, TomorrowioV4};
pub use config::{Config, Location};
pub use error::{Error, Result};
pub use fields::{FieldDefinition, FieldKind, available_fields};
pub use model::{
    HealthConcern, Interval, PollenIndex, PrecipitationType, PrimaryPollutant,
    RealtimeAndForecasts, Timeline, TimelineResponse, UnitSystem, WeatherCode,
};
pub use timestep::Timestep;
