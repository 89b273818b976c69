//! # Enrichment
//!
//! On-demand simplified explanations of a proposal summary.
//!
//! - Keyed by vote event id, one entry per key for the whole session
//! - A failed request stores a fallback message instead of text, and that counts as an entry
//! - Only one request in flight at a time, requests made meanwhile are dropped
//! - An empty simplification is still an entry, the view decides how to show it
use std::{collections::HashMap, time::Duration};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    error::RemoteError,
    http::{build_client, post_json},
};

pub const DEFAULT_SIMPLIFY_TIMEOUT: Duration = Duration::from_millis(15_000);

pub const TIMEOUT_FALLBACK: &str =
    "The simplification service took too long to answer. Try again later.";
pub const UNAVAILABLE_FALLBACK: &str =
    "Could not reach the simplification service. Try again later.";

#[async_trait]
pub trait Simplifier: Send + Sync {
    async fn simplify(&self, text: &str) -> Result<String, RemoteError>;
}

#[derive(Serialize)]
struct SimplifyRequest<'a> {
    #[serde(rename = "texto")]
    text: &'a str,
}

#[derive(Deserialize)]
struct SimplifyResponse {
    #[serde(rename = "resumo")]
    simplified_text: String,
}

#[derive(Debug, Clone)]
pub struct HttpSimplifier {
    client: Client,
    url: String,
}

impl HttpSimplifier {
    pub fn new(url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_client(timeout)?,
            url: url.to_string(),
        })
    }
}

#[async_trait]
impl Simplifier for HttpSimplifier {
    async fn simplify(&self, text: &str) -> Result<String, RemoteError> {
        let response: SimplifyResponse =
            post_json(&self.client, &self.url, &SimplifyRequest { text }).await?;

        Ok(response.simplified_text)
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum EnrichmentEntry {
    Simplified(String),
    Failed(String),
}

impl EnrichmentEntry {
    pub fn text(&self) -> &str {
        match self {
            EnrichmentEntry::Simplified(text) | EnrichmentEntry::Failed(text) => text,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, EnrichmentEntry::Failed(_))
    }
}

pub fn fallback_message(error: &RemoteError) -> &'static str {
    match error {
        RemoteError::Timeout => TIMEOUT_FALLBACK,
        _ => UNAVAILABLE_FALLBACK,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Slot {
    #[default]
    Idle,
    Loading(String),
}

/// Proof that the single slot was taken for one vote event.
#[derive(Debug, PartialEq, Eq)]
pub struct EnrichmentTicket {
    vote_event_id: String,
    raw_summary: String,
}

impl EnrichmentTicket {
    pub fn vote_event_id(&self) -> &str {
        &self.vote_event_id
    }

    pub fn raw_summary(&self) -> &str {
        &self.raw_summary
    }
}

#[derive(Debug, Clone, Default)]
pub struct EnrichmentCache {
    entries: HashMap<String, EnrichmentEntry>,
    slot: Slot,
}

impl EnrichmentCache {
    /// Takes the slot for `vote_event_id`, or `None` when it is cached or another request is out.
    pub fn begin(&mut self, vote_event_id: &str, raw_summary: &str) -> Option<EnrichmentTicket> {
        if self.entries.contains_key(vote_event_id) {
            debug!(vote_event_id, "Already enriched");
            return None;
        }

        if let Slot::Loading(pending) = &self.slot {
            debug!(vote_event_id, pending = %pending, "Enrichment busy, ignoring request");
            return None;
        }

        self.slot = Slot::Loading(vote_event_id.to_string());

        Some(EnrichmentTicket {
            vote_event_id: vote_event_id.to_string(),
            raw_summary: raw_summary.to_string(),
        })
    }

    pub fn settle(
        &mut self,
        ticket: EnrichmentTicket,
        outcome: Result<String, RemoteError>,
    ) -> &EnrichmentEntry {
        self.slot = Slot::Idle;

        let entry = match outcome {
            Ok(text) => {
                info!(vote_event_id = %ticket.vote_event_id, empty = text.is_empty(), "Enriched");
                EnrichmentEntry::Simplified(text)
            }
            Err(e) => {
                warn!(vote_event_id = %ticket.vote_event_id, error = %e, "Enrichment failed");
                EnrichmentEntry::Failed(fallback_message(&e).to_string())
            }
        };

        self.entries.entry(ticket.vote_event_id).or_insert(entry)
    }

    pub fn read(&self, vote_event_id: &str) -> Option<&EnrichmentEntry> {
        self.entries.get(vote_event_id)
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.slot, Slot::Loading(_))
    }

    pub fn slot(&self) -> &Slot {
        &self.slot
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
