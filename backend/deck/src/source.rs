use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    Client,
    header::{AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT},
};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{
    error::SourceError,
    models::{
        EVENT_COLUMNS, EVENT_PROPOSAL_KEY, EVENT_TABLE, EventRow, PROPOSAL_COLUMNS,
        PROPOSAL_TABLE, ProposalRow,
    },
};

const USER_AGENT_VALUE: &str = concat!("deck/", env!("CARGO_PKG_VERSION"));

/// Where proposal rows and their vote event bridge come from.
#[async_trait]
pub trait DeckSource: Send + Sync {
    /// All proposal rows, in store order.
    async fn fetch_proposals(&self) -> Result<Vec<ProposalRow>, SourceError>;

    /// First vote event linked to `proposal_id`, if any.
    async fn linked_vote_event(&self, proposal_id: &str) -> Result<Option<String>, SourceError>;
}

/// Supabase REST (PostgREST) backed source.
#[derive(Debug, Clone)]
pub struct PostgrestSource {
    client: Client,
    base_url: String,
}

impl PostgrestSource {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self, SourceError> {
        let key = HeaderValue::from_str(api_key).map_err(|_| SourceError::InvalidKey)?;
        let bearer = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|_| SourceError::InvalidKey)?;

        let mut headers = HeaderMap::new();
        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>, SourceError> {
        let url = format!("{}/rest/v1/{table}", self.base_url);
        debug!(url = %url, ?query, "querying store");

        let response = self.client.get(&url).query(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl DeckSource for PostgrestSource {
    async fn fetch_proposals(&self) -> Result<Vec<ProposalRow>, SourceError> {
        self.select(PROPOSAL_TABLE, &[("select", PROPOSAL_COLUMNS)])
            .await
    }

    async fn linked_vote_event(&self, proposal_id: &str) -> Result<Option<String>, SourceError> {
        let filter = format!("eq.{proposal_id}");

        let rows: Vec<EventRow> = self
            .select(
                EVENT_TABLE,
                &[
                    ("select", EVENT_COLUMNS),
                    (EVENT_PROPOSAL_KEY, filter.as_str()),
                    ("limit", "1"),
                ],
            )
            .await?;

        Ok(rows.into_iter().next().and_then(|row| row.vote_event_id))
    }
}
