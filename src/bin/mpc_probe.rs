//! MPC Probe - raw diagnostic queries against the MPC API
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin mpc_probe -- identifier "C/2025 R2" 3I
//! cargo run --bin mpc_probe -- observations "C/2025 A6"
//! cargo run --bin mpc_probe -- obs80 "C/2025 A6"
//! cargo run --bin mpc_probe -- designations 2025-09-20
//! ```

use chrono::{NaiveDate, Utc};
use cometwatch::brightness::compute_averages;
use cometwatch::designation::{designation_range, month_letter, previous_half_month};
use cometwatch::mpc::{MpcIdentifierClient, MpcObservationsClient, ObservationSource};
use cometwatch::TrackerConfig;
use std::env;

fn usage() -> String {
    "usage: mpc_probe <identifier DESIG...|observations DESIG|obs80 DESIG|designations [YYYY-MM-DD]>"
        .to_string()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    let config = TrackerConfig::from_env()?;
    let args: Vec<String> = env::args().skip(1).collect();
    let (command, rest) = args.split_first().ok_or_else(usage)?;

    match command.as_str() {
        "identifier" => {
            if rest.is_empty() {
                return Err(usage().into());
            }
            let client = MpcIdentifierClient::new(config.identifier_url.clone(), config.http_timeout())?;
            let raw = if rest.len() == 1 {
                serde_json::to_value(client.lookup_one(&rest[0]).await?)?
            } else {
                client.lookup_raw(rest).await?
            };
            println!("{}", serde_json::to_string_pretty(&raw)?);
        }
        "observations" => {
            let designation = rest.first().ok_or_else(usage)?;
            let client = MpcObservationsClient::new(config.observations_url.clone(), config.http_timeout())?;
            let samples = client.observations(designation).await?;
            println!("{} observations", samples.len());
            for sample in &samples {
                let magnitude = sample
                    .magnitude
                    .map(|m| format!("{:.2}", m))
                    .unwrap_or_else(|| "-".to_string());
                println!("{}  {}", sample.observed_at.format("%Y-%m-%d %H:%M:%S"), magnitude);
            }
            if let Some(averages) = compute_averages(&samples, None) {
                println!(
                    "latest {}  1d avg {:?}  2d avg {:?}",
                    averages.last_observation.format("%Y-%m-%d %H:%M:%S"),
                    averages.one_day,
                    averages.two_day
                );
            }
        }
        "obs80" => {
            let designation = rest.first().ok_or_else(usage)?;
            let client = MpcObservationsClient::new(config.observations_url.clone(), config.http_timeout())?;
            let raw = client.fetch_raw(designation, "OBS80").await?;
            match raw.get(0).and_then(|entry| entry.get("OBS80")).and_then(|v| v.as_str()) {
                Some(text) => println!("{}", text),
                None => println!("{}", serde_json::to_string_pretty(&raw)?),
            }
        }
        "designations" => {
            let date = match rest.first() {
                Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d")?,
                None => Utc::now().date_naive(),
            };
            let previous = previous_half_month(date);
            println!("{} → half-month {}", date, month_letter(date));
            for designation in designation_range(previous, config.probe_start, config.probe_end)
                .into_iter()
                .chain(designation_range(date, config.probe_start, config.probe_end))
            {
                println!("{}", designation);
            }
        }
        _ => return Err(usage().into()),
    }

    Ok(())
}
