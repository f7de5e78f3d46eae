//! MPC observation history API
//!
//! ## API Reference
//!
//! Endpoint: https://data.minorplanetcenter.net/api/get-obs
//! Request: `GET` with JSON body `{"desigs": ["C/2025 R2"], "output_format": ["ADES_DF"]}`
//! Returns: `[{"ADES_DF": [{"obsTime": "...", "mag": ..., ...}, ...]}]`

use super::{http_client, MpcError, ObservationSource};
use crate::brightness::ObservationSample;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_OBSERVATIONS_URL: &str = "https://data.minorplanetcenter.net/api/get-obs";

/// Subset of an ADES observation record we care about
#[derive(Debug, Clone, Deserialize)]
pub struct AdesObservation {
    #[serde(rename = "obsTime")]
    pub obs_time: Option<String>,
    #[serde(default)]
    pub mag: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct ObservationsEntry {
    #[serde(rename = "ADES_DF", default)]
    ades_df: Vec<AdesObservation>,
}

/// Strip the parentheses used around numbered designations, e.g. `(3I)`
pub fn clean_designation(designation: &str) -> &str {
    let trimmed = designation.trim();
    let trimmed = trimmed.strip_prefix('(').unwrap_or(trimmed);
    trimmed.strip_suffix(')').unwrap_or(trimmed)
}

/// Parse an ADES `obsTime`, with or without an offset (naive values are UTC)
pub fn parse_obs_time(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(t) = DateTime::parse_from_rfc3339(value) {
        return Some(t.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc())
}

/// Magnitude as a number or numeric string; anything else is absent
pub fn parse_magnitude(value: &serde_json::Value) -> Option<f64> {
    let magnitude = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    magnitude.filter(|m| m.is_finite())
}

impl AdesObservation {
    fn to_sample(&self) -> Option<ObservationSample> {
        let observed_at = parse_obs_time(self.obs_time.as_deref()?)?;
        Some(ObservationSample::new(observed_at, parse_magnitude(&self.mag)))
    }
}

/// Decode a get-obs response body into samples
///
/// Records without a parseable `obsTime` are dropped.
pub fn decode_observations(body: serde_json::Value) -> Result<Vec<ObservationSample>, MpcError> {
    let entries: Vec<ObservationsEntry> =
        serde_json::from_value(body).map_err(|e| MpcError::Decode(e.to_string()))?;

    let entry = entries
        .into_iter()
        .next()
        .ok_or_else(|| MpcError::Decode("empty observation response".to_string()))?;

    let total = entry.ades_df.len();
    let samples: Vec<ObservationSample> = entry.ades_df.iter().filter_map(|o| o.to_sample()).collect();

    if samples.len() < total {
        log::debug!("Dropped {} observations without a usable obsTime", total - samples.len());
    }

    Ok(samples)
}

pub struct MpcObservationsClient {
    client: reqwest::Client,
    url: String,
}

impl MpcObservationsClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, MpcError> {
        Ok(Self {
            client: http_client(timeout)?,
            url: url.into(),
        })
    }

    /// Raw response in the requested output format (`ADES_DF`, `OBS80`, ...)
    pub async fn fetch_raw(&self, designation: &str, output_format: &str) -> Result<serde_json::Value, MpcError> {
        let body = serde_json::json!({
            "desigs": [clean_designation(designation)],
            "output_format": [output_format],
        });

        let response = self.client.get(&self.url).json(&body).send().await?;

        if !response.status().is_success() {
            return Err(MpcError::Status(response.status()));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl ObservationSource for MpcObservationsClient {
    async fn observations(&self, designation: &str) -> Result<Vec<ObservationSample>, MpcError> {
        let raw = self.fetch_raw(designation, "ADES_DF").await?;
        decode_observations(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_clean_designation() {
        assert_eq!(clean_designation("(3I)"), "3I");
        assert_eq!(clean_designation("C/2025 A6"), "C/2025 A6");
    }

    #[test]
    fn test_parse_obs_time() {
        let expected = Utc.with_ymd_and_hms(2025, 9, 10, 3, 21, 14).unwrap();
        assert_eq!(parse_obs_time("2025-09-10T03:21:14Z"), Some(expected));
        assert_eq!(parse_obs_time("2025-09-10T03:21:14.000"), Some(expected));
        assert_eq!(parse_obs_time("2025-09-10 03:21:14"), Some(expected));
        assert_eq!(parse_obs_time("yesterday"), None);
    }

    #[test]
    fn test_parse_magnitude() {
        assert_eq!(parse_magnitude(&serde_json::json!(12.3)), Some(12.3));
        assert_eq!(parse_magnitude(&serde_json::json!(" 9.8 ")), Some(9.8));
        assert_eq!(parse_magnitude(&serde_json::json!("")), None);
        assert_eq!(parse_magnitude(&serde_json::json!(null)), None);
        assert_eq!(parse_magnitude(&serde_json::json!("NaN")), None);
    }

    #[test]
    fn test_decode_observations() {
        let body = serde_json::json!([{
            "ADES_DF": [
                { "obsTime": "2025-09-10T03:21:14Z", "mag": "12.1", "band": "G" },
                { "obsTime": "2025-09-10T04:00:00Z", "mag": null },
                { "obsTime": null, "mag": 11.0 },
                { "mag": 10.0 }
            ]
        }]);

        let samples = decode_observations(body).unwrap();

        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].magnitude, Some(12.1));
        assert_eq!(samples[1].magnitude, None);
    }

    #[test]
    fn test_decode_empty_response_is_error() {
        assert!(decode_observations(serde_json::json!([])).is_err());
        assert!(decode_observations(serde_json::json!({"error": "x"})).is_err());
    }

    #[tokio::test]
    #[ignore] // Run only when testing with live API
    async fn test_live_observations() {
        let client = MpcObservationsClient::new(DEFAULT_OBSERVATIONS_URL, Duration::from_secs(30)).unwrap();

        let samples = client.observations("C/2025 A6").await.unwrap();

        assert!(!samples.is_empty());
    }
}
