use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use inquire::{CustomType, Select, Text};
use tomorrowio_core::{
    Config, Location, Timeline, TimelineResponse, Timestep, TomorrowioV4, UnitSystem, fields,
};

/// Fields queried when the user doesn't ask for specific ones.
const DEFAULT_FIELDS: &[&str] = &[
    "temperature",
    "temperatureApparent",
    "humidity",
    "windSpeed",
    "precipitationProbability",
    "weatherCode",
];

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "tomorrowio", version, about = "Tomorrow.io weather CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure the API key and default location.
    Configure,

    /// Show current conditions at the configured location.
    Realtime {
        /// Comma-separated field names; defaults to a common set.
        #[arg(long, value_delimiter = ',')]
        fields: Vec<String>,

        /// Print the raw JSON response.
        #[arg(long)]
        json: bool,
    },

    /// Show a forecast at the configured location.
    Forecast {
        /// Timestep: "1d", "1h" or a nowcast step ("1m", "5m", "15m", "30m").
        #[arg(default_value = "1d")]
        timestep: String,

        /// Comma-separated field names; defaults to a common set.
        #[arg(long, value_delimiter = ',')]
        fields: Vec<String>,

        /// Limit the forecast to this many hours from now.
        #[arg(long)]
        hours: Option<i64>,

        /// Print the raw JSON response.
        #[arg(long)]
        json: bool,
    },

    /// List the fields available at a timestep.
    Fields {
        /// Timestep: "current", "1d", "1h" or a nowcast step.
        #[arg(default_value = "current")]
        timestep: String,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Realtime { fields, json } => realtime(fields, json).await,
            Command::Forecast {
                timestep,
                fields,
                hours,
                json,
            } => forecast(&timestep, fields, hours, json).await,
            Command::Fields { timestep } => list_fields(&timestep),
        }
    }
}

fn configure() -> Result<()> {
    let mut config = Config::load()?;

    let api_key = Text::new("Tomorrow.io API key:")
        .prompt()
        .context("Failed to read API key")?;
    let latitude = CustomType::<f64>::new("Latitude:")
        .with_error_message("Please enter a number, e.g. 28.4195")
        .prompt()
        .context("Failed to read latitude")?;
    let longitude = CustomType::<f64>::new("Longitude:")
        .with_error_message("Please enter a number, e.g. -81.5812")
        .prompt()
        .context("Failed to read longitude")?;
    let units = Select::new("Unit system:", vec!["imperial", "metric"])
        .prompt()
        .context("Failed to read unit system")?;

    config.api_key = Some(api_key);
    config.location = Some(Location {
        latitude,
        longitude,
    });
    config.unit_system = Some(units.parse::<UnitSystem>()?);
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

fn client_from_config(config: &Config) -> Result<TomorrowioV4> {
    let api_key = config.api_key()?;
    let location = config.location()?;

    Ok(
        TomorrowioV4::new(api_key, location.latitude, location.longitude)
            .with_unit_system(config.unit_system()),
    )
}

async fn realtime(fields: Vec<String>, json: bool) -> Result<()> {
    let config = Config::load()?;
    let api = client_from_config(&config)?;

    let response = api.realtime(&field_refs(&fields)).await?;
    if json {
        return print_json(&response);
    }

    let Some(timeline) = response.timeline(Timestep::Current) else {
        println!("No current conditions in response.");
        return Ok(());
    };

    print_timeline(timeline);
    print_quota(&api);
    Ok(())
}

async fn forecast(
    timestep: &str,
    fields: Vec<String>,
    hours: Option<i64>,
    json: bool,
) -> Result<()> {
    let timestep: Timestep = timestep.parse::<Timestep>()?;
    let duration = hours.map(chrono::Duration::hours);

    let config = Config::load()?;
    let api = client_from_config(&config)?;
    let fields = field_refs(&fields);

    let response: TimelineResponse = match timestep {
        Timestep::OneDay => api.forecast_daily(&fields, None, duration).await?,
        Timestep::OneHour => api.forecast_hourly(&fields, None, duration).await?,
        Timestep::OneMinute => api.forecast_nowcast(&fields, None, duration, 1).await?,
        Timestep::FiveMinutes => api.forecast_nowcast(&fields, None, duration, 5).await?,
        Timestep::FifteenMinutes => api.forecast_nowcast(&fields, None, duration, 15).await?,
        Timestep::ThirtyMinutes => api.forecast_nowcast(&fields, None, duration, 30).await?,
        Timestep::Current => {
            anyhow::bail!("`current` is not a forecast timestep; use `tomorrowio realtime`")
        }
    };

    if json {
        return print_json(&response);
    }

    let Some(timeline) = response.timeline(timestep) else {
        println!("No {timestep} timeline in response.");
        return Ok(());
    };

    print_timeline(timeline);
    print_quota(&api);
    Ok(())
}

fn list_fields(timestep: &str) -> Result<()> {
    let timestep: Timestep = timestep.parse::<Timestep>()?;

    println!("Fields available at `{timestep}`:");
    for name in fields::available_fields(timestep, None) {
        // Registry lookups for listed fields always succeed.
        if let Some(def) = fields::definition(name) {
            println!("  {name:28} [{}]", def.kind.as_str());
        }
    }
    Ok(())
}

/// User-supplied fields, or the default set when none were given.
fn field_refs(fields: &[String]) -> Vec<&str> {
    if fields.is_empty() {
        DEFAULT_FIELDS.to_vec()
    } else {
        fields.iter().map(String::as_str).collect()
    }
}

fn print_json(response: &TimelineResponse) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(response)?);
    Ok(())
}

fn print_timeline(timeline: &Timeline) {
    for interval in &timeline.intervals {
        print!("{}", interval.start_time.format("%Y-%m-%d %H:%M UTC"));
        if let Some(code) = interval.weather_code() {
            print!("  {}", code.description());
        }
        println!();

        let mut names: Vec<&String> = interval.values.keys().collect();
        names.sort();
        for name in names {
            if name.starts_with("weatherCode") {
                continue;
            }
            println!("  {name}: {}", interval.values[name]);
        }
    }
}

fn print_quota(api: &TomorrowioV4) {
    if let Some(limit) = api.rate_limit() {
        println!("(hourly request quota: {limit})");
    }
}
