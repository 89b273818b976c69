use std::time::Duration;

use async_trait::async_trait;
use deck::models::store_id;
use reqwest::Client;
use serde::{Deserialize, Deserializer};
use tracing::info;

use crate::{
    error::MatchComputationFailed,
    http::{build_client, post_json},
    vote::VoteLedger,
};

pub const DEFAULT_MATCH_TIMEOUT: Duration = Duration::from_millis(15_000);

/// One ranked politician, as returned by the match service.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct MatchEntry {
    #[serde(rename = "id", deserialize_with = "store_id")]
    pub politician_id: String,

    #[serde(rename = "nome")]
    pub name: String,

    #[serde(rename = "partido")]
    pub party: String,

    #[serde(rename = "uf")]
    pub region: String,

    #[serde(rename = "foto", default, deserialize_with = "text")]
    pub photo_url: String,

    #[serde(rename = "porcentagem_match", default, deserialize_with = "percentage")]
    pub match_percentage: f64,
}

fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Missing and `null` both read as 0.
fn percentage<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Option::<f64>::deserialize(deserializer).map(|value| value.unwrap_or(0.0))
}

#[async_trait]
pub trait MatchClient: Send + Sync {
    async fn submit(&self, ledger: &VoteLedger) -> Result<Vec<MatchEntry>, MatchComputationFailed>;
}

#[derive(Debug, Clone)]
pub struct HttpMatchClient {
    client: Client,
    url: String,
}

impl HttpMatchClient {
    pub fn new(url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_client(timeout)?,
            url: url.to_string(),
        })
    }
}

#[async_trait]
impl MatchClient for HttpMatchClient {
    async fn submit(&self, ledger: &VoteLedger) -> Result<Vec<MatchEntry>, MatchComputationFailed> {
        let ranking: Vec<MatchEntry> = post_json(&self.client, &self.url, ledger.votes()).await?;

        info!(votes = ledger.len(), ranked = ranking.len(), "Match computed");
        Ok(ranking)
    }
}
