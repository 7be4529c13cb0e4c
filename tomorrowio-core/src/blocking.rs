//! Blocking facade over [`TomorrowioV4`].
//!
//! Owns a single-threaded tokio runtime and drives the async client to
//! completion on the calling thread. Do not use it from inside an async
//! context; the runtime would panic.

use chrono::{DateTime, Duration, Utc};
use tokio::runtime::{Builder, Runtime};

use crate::client::TomorrowioV4;
use crate::error::{Error, Result};
use crate::model::{RealtimeAndForecasts, TimelineResponse, UnitSystem};

/// Blocking client for the Tomorrow.io v4 timelines API.
#[derive(Debug)]
pub struct TomorrowioV4Sync {
    inner: TomorrowioV4,
    runtime: Runtime,
}

impl TomorrowioV4Sync {
    /// Create a blocking client for the given location using imperial units.
    pub fn new(api_key: impl Into<String>, latitude: f64, longitude: f64) -> Result<Self> {
        Self::from_client(TomorrowioV4::new(api_key, latitude, longitude))
    }

    /// Wrap an already-configured async client.
    pub fn from_client(inner: TomorrowioV4) -> Result<Self> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(Error::Runtime)?;
        Ok(Self { inner, runtime })
    }

    pub fn unit_system(&self) -> UnitSystem {
        self.inner.unit_system()
    }

    /// Hourly request quota reported by the last successful response, if any.
    pub fn rate_limit(&self) -> Option<u32> {
        self.inner.rate_limit()
    }

    /// Current conditions at the client's location.
    pub fn realtime(&self, fields: &[&str]) -> Result<TimelineResponse> {
        self.runtime.block_on(self.inner.realtime(fields))
    }

    /// Minute-scale forecast. `minutes` must be 1, 5, 15 or 30.
    pub fn forecast_nowcast(
        &self,
        fields: &[&str],
        start_time: Option<DateTime<Utc>>,
        duration: Option<Duration>,
        minutes: u32,
    ) -> Result<TimelineResponse> {
        self.runtime
            .block_on(self.inner.forecast_nowcast(fields, start_time, duration, minutes))
    }

    /// Hourly forecast for the given period.
    pub fn forecast_hourly(
        &self,
        fields: &[&str],
        start_time: Option<DateTime<Utc>>,
        duration: Option<Duration>,
    ) -> Result<TimelineResponse> {
        self.runtime
            .block_on(self.inner.forecast_hourly(fields, start_time, duration))
    }

    /// Daily forecast for the given period.
    pub fn forecast_daily(
        &self,
        fields: &[&str],
        start_time: Option<DateTime<Utc>>,
        duration: Option<Duration>,
    ) -> Result<TimelineResponse> {
        self.runtime
            .block_on(self.inner.forecast_daily(fields, start_time, duration))
    }

    /// Current conditions plus nowcast, hourly and daily forecasts.
    pub fn realtime_and_all_forecasts(
        &self,
        realtime_fields: &[&str],
        forecast_fields: &[&str],
        hourly_fields: Option<&[&str]>,
        daily_fields: Option<&[&str]>,
        nowcast_minutes: u32,
    ) -> Result<RealtimeAndForecasts> {
        self.runtime.block_on(self.inner.realtime_and_all_forecasts(
            realtime_fields,
            forecast_fields,
            hourly_fields,
            daily_fields,
            nowcast_minutes,
        ))
    }
}
