//! CLI: stdin JSON -> stdout JSON. One request per invocation.
//!
//! Usage:
//!   echo '{"dataset":"temperature_data.csv"}' | tempwatch cities
//!   echo '{"dataset":"temperature_data.csv","city":"Berlin"}' | tempwatch report
//!   echo '{"dataset":"temperature_data.csv","city":"Berlin","api_key":"..."}' | tempwatch live
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::{env, fs, io};
use tempwatch_core::{
    current_month, AnalysisParams, LiveReport, OpenWeatherClient, Session, WeatherConfig,
    WeatherError,
};

// --- Cities ---

#[derive(Debug, Deserialize)]
struct CitiesInput {
    dataset: PathBuf,
}

#[derive(Debug, Serialize)]
struct CitiesOutput {
    cities: Vec<String>,
}

// --- Report ---

#[derive(Debug, Deserialize)]
struct ReportInput {
    dataset: PathBuf,
    city: String,
    #[serde(default)]
    params: AnalysisParams,
}

// --- Live ---

#[derive(Debug, Deserialize)]
struct LiveInput {
    dataset: PathBuf,
    city: String,
    api_key: String,
    #[serde(default)]
    weather: WeatherConfig,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    kind: &'static str,
    message: String,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum LiveOutput {
    Report(LiveReport),
    Failed { error: ErrorBody },
}

impl From<WeatherError> for LiveOutput {
    fn from(e: WeatherError) -> Self {
        LiveOutput::Failed {
            error: ErrorBody {
                kind: e.kind(),
                message: e.to_string(),
            },
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tempwatch=info,tempwatch_core=info".into()),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    let cmd = args.get(1).map(|s| s.as_str()).unwrap_or("report");
    let mut session = Session::new();

    match cmd {
        "cities" => {
            let input: CitiesInput = serde_json::from_reader(io::stdin())?;
            let dataset = session.load(&fs::read(&input.dataset)?)?;
            serde_json::to_writer(io::stdout(), &CitiesOutput { cities: dataset.cities() })?;
        }
        "report" => {
            let input: ReportInput = serde_json::from_reader(io::stdin())?;
            session.load(&fs::read(&input.dataset)?)?;
            let report = session.city_report(&input.city, &input.params)?;
            serde_json::to_writer(io::stdout(), &report)?;
        }
        "live" => {
            let input: LiveInput = serde_json::from_reader(io::stdin())?;
            session.load(&fs::read(&input.dataset)?)?;
            let output = match OpenWeatherClient::new(&input.weather) {
                Ok(client) => {
                    let month = current_month();
                    match session.check_live(&input.city, &client, &input.api_key, month)? {
                        Ok(report) => LiveOutput::Report(report),
                        Err(e) => e.into(),
                    }
                }
                Err(e) => e.into(),
            };
            serde_json::to_writer(io::stdout(), &output)?;
        }
        other => {
            return Err(
                format!("unknown command '{}' (expected cities, report or live)", other).into(),
            );
        }
    }
    Ok(())
}
