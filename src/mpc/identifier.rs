//! MPC designation identifier API
//!
//! ## API Reference
//!
//! Endpoint: https://data.minorplanetcenter.net/api/query-identifier
//! Request: `GET` with JSON body `{"ids": ["C/2025 R2", ...]}`
//! Returns: object keyed by queried id, each value describing the match

use super::{http_client, IdentifierLookup, MpcError};
use crate::catalog::LookupResult;
use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::time::Duration;

pub const DEFAULT_IDENTIFIER_URL: &str = "https://data.minorplanetcenter.net/api/query-identifier";

/// One entry of the identifier response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DesignationInfo {
    #[serde(deserialize_with = "flag_or_bool")]
    pub found: bool,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub permid: Option<String>,
    #[serde(default)]
    pub iau_designation: Option<String>,
    #[serde(default)]
    pub orbfit_name: Option<String>,
    #[serde(default)]
    pub unpacked_primary_provisional_designation: Option<String>,
}

/// The API reports `found` as either `true`/`false` or `1`/`0`
fn flag_or_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Bool(b) => b,
        serde_json::Value::Number(n) => n.as_i64().map(|n| n != 0).unwrap_or(false),
        _ => false,
    })
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

impl DesignationInfo {
    /// Convert to a lookup result keyed by the designation that was queried
    pub fn into_lookup_result(self, queried: &str) -> LookupResult {
        LookupResult {
            found: self.found,
            designation: queried.to_string(),
            name: non_empty(&self.name),
            permanent_id: non_empty(&self.permid),
        }
    }
}

/// Map a decoded response back onto the request order
pub fn results_in_request_order(
    designations: &[String],
    mut response: HashMap<String, DesignationInfo>,
) -> Vec<LookupResult> {
    designations
        .iter()
        .map(|designation| match response.remove(designation) {
            Some(info) => info.into_lookup_result(designation),
            None => LookupResult::not_found(designation.clone()),
        })
        .collect()
}

pub struct MpcIdentifierClient {
    client: reqwest::Client,
    url: String,
}

impl MpcIdentifierClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, MpcError> {
        Ok(Self {
            client: http_client(timeout)?,
            url: url.into(),
        })
    }

    /// Query a single designation (plain-text body)
    pub async fn lookup_one(&self, designation: &str) -> Result<DesignationInfo, MpcError> {
        let response = self
            .client
            .get(&self.url)
            .body(designation.to_string())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(MpcError::Status(response.status()));
        }

        Ok(response.json().await?)
    }

    /// Raw JSON for diagnostics
    pub async fn lookup_raw(&self, designations: &[String]) -> Result<serde_json::Value, MpcError> {
        let response = self
            .client
            .get(&self.url)
            .json(&serde_json::json!({ "ids": designations }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(MpcError::Status(response.status()));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl IdentifierLookup for MpcIdentifierClient {
    async fn lookup(&self, designations: &[String]) -> Result<Vec<LookupResult>, MpcError> {
        if designations.is_empty() {
            return Ok(Vec::new());
        }

        let raw = self.lookup_raw(designations).await?;
        let response: HashMap<String, DesignationInfo> =
            serde_json::from_value(raw).map_err(|e| MpcError::Decode(e.to_string()))?;

        log::debug!(
            "Identifier lookup: {} requested, {} returned",
            designations.len(),
            response.len()
        );

        Ok(results_in_request_order(designations, response))
    }
}
