use std::{collections::HashSet, sync::Arc};

use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::{
    error::DeckError,
    models::{Deck, Proposal},
    source::DeckSource,
};

pub const DEFAULT_DECK_SIZE: usize = 10;

#[derive(Clone)]
pub struct DeckLoader {
    source: Arc<dyn DeckSource>,
    capacity: usize,
}

impl DeckLoader {
    pub fn new(source: Arc<dyn DeckSource>) -> Self {
        Self::with_capacity(source, DEFAULT_DECK_SIZE)
    }

    pub fn with_capacity(source: Arc<dyn DeckSource>, capacity: usize) -> Self {
        Self { source, capacity }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub async fn load(&self) -> Result<Deck, DeckError> {
        let rows = self.source.fetch_proposals().await.map_err(|e| {
            warn!(error = %e, "Failed to fetch proposals");
            DeckError::DataUnavailable(e)
        })?;

        let fetched = rows.len();
        let source = &self.source;

        // join_all keeps input order no matter which lookup settles first
        let lookups = rows.into_iter().map(|row| async move {
            match source.linked_vote_event(&row.id).await {
                Ok(Some(vote_event_id)) if !vote_event_id.is_empty() => {
                    Some(Proposal::from_row(row, vote_event_id))
                }
                Ok(_) => {
                    debug!(proposal = %row.id, "No linked vote event, skipping");
                    None
                }
                Err(e) => {
                    warn!(proposal = %row.id, error = %e, "Vote event lookup failed, skipping");
                    None
                }
            }
        });

        let linked: Vec<Proposal> = join_all(lookups).await.into_iter().flatten().collect();
        let linked = latest_per_vote_event(linked);
        let linked_count = linked.len();

        let skip = linked_count.saturating_sub(self.capacity);
        let deck = Deck::new(linked.into_iter().skip(skip).collect());

        info!(
            fetched,
            linked = linked_count,
            size = deck.len(),
            "Deck loaded"
        );

        Ok(deck)
    }
}

/// Proposals voted together share a vote event; only the latest one is kept.
fn latest_per_vote_event(proposals: Vec<Proposal>) -> Vec<Proposal> {
    let mut seen = HashSet::new();

    let mut kept: Vec<Proposal> = proposals
        .into_iter()
        .rev()
        .filter(|proposal| {
            let fresh = seen.insert(proposal.vote_event_id.clone());
            if !fresh {
                debug!(
                    proposal = %proposal.item_id,
                    vote_event = %proposal.vote_event_id,
                    "Vote event already in deck, skipping"
                );
            }
            fresh
        })
        .collect();

    kept.reverse();
    kept
}
