use std::sync::Mutex;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::fields;
use crate::model::{RealtimeAndForecasts, TimelineRequest, TimelineResponse, UnitSystem};
use crate::timestep::Timestep;

/// Production endpoint of the v4 timelines API.
pub const BASE_URL_V4: &str = "https://api.tomorrow.io/v4/timelines";

/// Response header carrying the remaining hourly request quota.
const RATE_LIMIT_HEADER: &str = "X-RateLimit-Limit-hour";

/// Pause between consecutive calls in a combined query, to stay under the
/// per-second request quota of the free tier.
const QUOTA_PAUSE: StdDuration = StdDuration::from_secs(1);

/// Async client for the Tomorrow.io v4 timelines API.
///
/// A client is bound to one location and unit system; every query method
/// issues a single POST against the timelines endpoint.
///
/// ```no_run
/// # async fn example() -> tomorrowio_core::Result<()> {
/// use tomorrowio_core::{TomorrowioV4, Timestep, fields};
///
/// let api = TomorrowioV4::new("apikey", 28.4195, -81.5812);
/// let available = fields::available_fields(Timestep::Current, None);
/// let realtime = api.realtime(&available).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct TomorrowioV4 {
    api_key: String,
    location: [f64; 2],
    units: UnitSystem,
    base_url: String,
    http: Client,
    rate_limit: Mutex<Option<u32>>,
}

impl TomorrowioV4 {
    /// Create a client for the given location using imperial units.
    pub fn new(api_key: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            api_key: api_key.into(),
            location: [latitude, longitude],
            units: UnitSystem::default(),
            base_url: BASE_URL_V4.to_string(),
            http: Client::new(),
            rate_limit: Mutex::new(None),
        }
    }

    pub fn with_unit_system(mut self, units: UnitSystem) -> Self {
        self.units = units;
        self
    }

    /// Replace the default `reqwest` client, e.g. to set timeouts or proxies.
    pub fn with_http_client(mut self, http: Client) -> Self {
        self.http = http;
        self
    }

    /// Point the client at a different endpoint. Used by tests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn unit_system(&self) -> UnitSystem {
        self.units
    }

    /// Hourly request quota reported by the last successful response, if any.
    pub fn rate_limit(&self) -> Option<u32> {
        self.rate_limit.lock().ok().and_then(|limit| *limit)
    }

    fn set_rate_limit(&self, value: u32) {
        if let Ok(mut limit) = self.rate_limit.lock() {
            *limit = Some(value);
        }
    }

    fn request_body(
        &self,
        fields: Vec<String>,
        timesteps: Vec<Timestep>,
        start_time: Option<DateTime<Utc>>,
        end_time: Option<DateTime<Utc>>,
    ) -> TimelineRequest {
        TimelineRequest {
            location: self.location,
            units: self.units,
            fields,
            timesteps,
            start_time: start_time.map(format_time),
            end_time: end_time.map(format_time),
        }
    }

    async fn call_api(&self, request: &TimelineRequest) -> Result<TimelineResponse> {
        debug!(url = %self.base_url, timesteps = ?request.timesteps, "querying timelines");

        let response = self
            .http
            .post(&self.base_url)
            .header("apikey", &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(Error::CantConnect)?;

        let status = response.status();
        if status == StatusCode::OK {
            if let Some(limit) = response
                .headers()
                .get(RATE_LIMIT_HEADER)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.parse().ok())
            {
                self.set_rate_limit(limit);
            }
            return response.json().await.map_err(Error::Decode);
        }

        let body: Value = response.json().await.unwrap_or(Value::Null);
        Err(match status {
            StatusCode::BAD_REQUEST => Error::MalformedRequest { body },
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Error::InvalidApiKey { body },
            StatusCode::TOO_MANY_REQUESTS => Error::RateLimited { body },
            _ => Error::UnexpectedStatus { status, body },
        })
    }

    /// Current conditions at the client's location.
    ///
    /// Fields not served by the realtime endpoint are dropped with a warning.
    pub async fn realtime(&self, fields: &[&str]) -> Result<TimelineResponse> {
        let fields = fields::process_fields(fields, Timestep::Current);
        let request = self.request_body(fields, vec![Timestep::Current], None, None);
        self.call_api(&request).await
    }

    async fn forecast(
        &self,
        timestep: Timestep,
        fields: &[&str],
        start_time: Option<DateTime<Utc>>,
        duration: Option<Duration>,
    ) -> Result<TimelineResponse> {
        if timestep == Timestep::Current {
            return Err(Error::InvalidTimestep(
                "`current` is not a forecast timestep".to_string(),
            ));
        }

        let fields = fields::convert_to_measurements(&fields::process_fields(fields, timestep));

        // endTime is relative to the requested start, or to now when the
        // caller left the start open.
        let end_time = duration.map(|d| start_time.unwrap_or_else(Utc::now) + d);
        let request = self.request_body(fields, vec![timestep], start_time, end_time);
        self.call_api(&request).await
    }

    /// Minute-scale forecast. `minutes` must be 1, 5, 15 or 30.
    pub async fn forecast_nowcast(
        &self,
        fields: &[&str],
        start_time: Option<DateTime<Utc>>,
        duration: Option<Duration>,
        minutes: u32,
    ) -> Result<TimelineResponse> {
        let timestep = Timestep::from_nowcast_minutes(minutes)?;
        self.forecast(timestep, fields, start_time, duration).await
    }

    /// Hourly forecast for the given period.
    pub async fn forecast_hourly(
        &self,
        fields: &[&str],
        start_time: Option<DateTime<Utc>>,
        duration: Option<Duration>,
    ) -> Result<TimelineResponse> {
        self.forecast(Timestep::OneHour, fields, start_time, duration)
            .await
    }

    /// Daily forecast for the given period.
    pub async fn forecast_daily(
        &self,
        fields: &[&str],
        start_time: Option<DateTime<Utc>>,
        duration: Option<Duration>,
    ) -> Result<TimelineResponse> {
        self.forecast(Timestep::OneDay, fields, start_time, duration)
            .await
    }

    /// Current conditions plus nowcast, hourly and daily forecasts.
    ///
    /// When `hourly_fields` and `daily_fields` are both `None`, a single
    /// three-timestep query with `forecast_fields` covers all forecasts.
    /// Otherwise each extra field list gets its own query, with a short pause
    /// in between to respect the per-second quota.
    pub async fn realtime_and_all_forecasts(
        &self,
        realtime_fields: &[&str],
        forecast_fields: &[&str],
        hourly_fields: Option<&[&str]>,
        daily_fields: Option<&[&str]>,
        nowcast_minutes: u32,
    ) -> Result<RealtimeAndForecasts> {
        let nowcast_timestep = Timestep::from_nowcast_minutes(nowcast_minutes)?;

        let mut result = RealtimeAndForecasts::default();

        let request = self.request_body(
            to_owned_fields(realtime_fields),
            vec![Timestep::Current],
            None,
            None,
        );
        let current = self.call_api(&request).await?;
        if let Some(interval) = current
            .data
            .timelines
            .first()
            .and_then(|timeline| timeline.intervals.first())
        {
            result.current = interval.values.clone();
        }

        if hourly_fields.is_none() && daily_fields.is_none() {
            let request = self.request_body(
                to_owned_fields(forecast_fields),
                vec![nowcast_timestep, Timestep::OneHour, Timestep::OneDay],
                Some(Utc::now()),
                None,
            );
            let response = self.call_api(&request).await?;
            for timeline in response.data.timelines {
                match timeline.timestep {
                    Timestep::OneDay => result.forecasts.daily = timeline.intervals,
                    Timestep::OneHour => result.forecasts.hourly = timeline.intervals,
                    _ => result.forecasts.nowcast = timeline.intervals,
                }
            }
            return Ok(result);
        }

        let request = self.request_body(
            to_owned_fields(forecast_fields),
            vec![nowcast_timestep],
            Some(Utc::now()),
            None,
        );
        let response = self.call_api(&request).await?;
        if let Some(timeline) = response.data.timelines.into_iter().next() {
            result.forecasts.nowcast = timeline.intervals;
        }

        for (field_list, timestep) in [
            (hourly_fields, Timestep::OneHour),
            (daily_fields, Timestep::OneDay),
        ] {
            let Some(field_list) = field_list else {
                continue;
            };

            tokio::time::sleep(QUOTA_PAUSE).await;
            let request = self.request_body(
                to_owned_fields(field_list),
                vec![timestep],
                Some(Utc::now()),
                None,
            );
            let response = self.call_api(&request).await?;
            if let Some(timeline) = response.data.timelines.into_iter().next() {
                match timestep {
                    Timestep::OneDay => result.forecasts.daily = timeline.intervals,
                    _ => result.forecasts.hourly = timeline.intervals,
                }
            }
        }

        Ok(result)
    }
}

fn format_time(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn to_owned_fields(fields: &[&str]) -> Vec<String> {
    fields.iter().map(|field| field.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn request_body_formats_times_to_second_precision() {
        let api = TomorrowioV4::new("key", 28.4195, -81.5812);
        let start = Utc
            .with_ymd_and_hms(2022, 3, 15, 18, 30, 45)
            .single()
            .unwrap();

        let request = api.request_body(
            vec!["temperature".to_string()],
            vec![Timestep::OneHour],
            Some(start),
            Some(start + Duration::hours(6)),
        );

        assert_eq!(request.start_time.as_deref(), Some("2022-03-15T18:30:45Z"));
        assert_eq!(request.end_time.as_deref(), Some("2022-03-16T00:30:45Z"));
    }

    #[tokio::test]
    async fn forecast_rejects_current_timestep() {
        let api = TomorrowioV4::new("key", 28.4195, -81.5812);
        let err = api
            .forecast(Timestep::Current, &["temperature"], None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidTimestep(_)));
    }

    #[tokio::test]
    async fn nowcast_rejects_invalid_minutes() {
        let api = TomorrowioV4::new("key", 28.4195, -81.5812);
        let err = api
            .forecast_nowcast(&["temperature"], None, None, 7)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidTimestep(_)));
    }

    #[test]
    fn rate_limit_starts_unset() {
        let api = TomorrowioV4::new("key", 28.4195, -81.5812);
        assert_eq!(api.rate_limit(), None);
        api.set_rate_limit(25);
        assert_eq!(api.rate_limit(), Some(25));
    }
}
