//! # Session Driver
//!
//! Runs the remote calls around a [`VotingSession`].
//!
//! - Every transition happens under one lock, the lock is never held across a remote call
//! - Each reset bumps a generation counter; anything that settles for an older generation is dropped
//! - Remote calls run in their own tasks and always settle, even if the caller is dropped
//! - Nothing is cancelled, stale requests are just allowed to finish
use std::sync::Arc;

use deck::{DeckLoader, PostgrestSource};
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::{
    config::Config,
    enrichment::{EnrichmentTicket, HttpSimplifier, Simplifier},
    error::SessionError,
    machine::{IgnoreReason, SessionPhase, SwipeOutcome, VotingSession},
    matching::{HttpMatchClient, MatchClient},
    view::SessionView,
    vote::{Direction, VoteLedger},
};

/// Remote collaborators of a session.
#[derive(Clone)]
pub struct Services {
    pub loader: DeckLoader,
    pub matcher: Arc<dyn MatchClient>,
    pub simplifier: Arc<dyn Simplifier>,
}

impl Services {
    pub fn from_config(config: &Config) -> Result<Self, SessionError> {
        let source = PostgrestSource::new(&config.store_url, &config.store_key, config.store_timeout)?;

        Ok(Self {
            loader: DeckLoader::with_capacity(Arc::new(source), config.deck_size),
            matcher: Arc::new(HttpMatchClient::new(&config.match_url, config.match_timeout)?),
            simplifier: Arc::new(HttpSimplifier::new(
                &config.simplify_url,
                config.simplify_timeout,
            )?),
        })
    }
}

#[derive(Debug, Clone)]
pub(crate) enum Stage {
    Loading,
    Unavailable(String),
    Ready(VotingSession),
}

struct Inner {
    generation: u64,
    stage: Stage,
}

#[derive(Clone)]
pub struct Session {
    inner: Arc<Mutex<Inner>>,
    services: Arc<Services>,
}

impl Session {
    /// A session waiting for its first [`Session::reset`].
    pub fn new(services: Services) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                generation: 0,
                stage: Stage::Loading,
            })),
            services: Arc::new(services),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, SessionError> {
        Ok(Self::new(Services::from_config(config)?))
    }

    /// Drops everything the session owns and loads a fresh deck.
    pub async fn reset(&self) -> SessionView {
        let generation = {
            let mut inner = self.inner.lock().await;
            inner.generation += 1;
            inner.stage = Stage::Loading;
            inner.generation
        };

        info!(generation, "Loading deck");
        let loaded = self.services.loader.load().await;

        let mut inner = self.inner.lock().await;
        if inner.generation != generation {
            debug!(generation, "Deck load superseded by a newer reset");
            return SessionView::of_stage(&inner.stage);
        }

        inner.stage = match loaded {
            Ok(deck) => Stage::Ready(VotingSession::new(deck)),
            Err(e) => {
                error!(error = %e, "Deck unavailable");
                Stage::Unavailable(e.to_string())
            }
        };

        SessionView::of_stage(&inner.stage)
    }

    pub async fn record_swipe(&self, direction: Direction, vote_event_id: &str) -> SwipeOutcome {
        self.swipe(|session| session.record_swipe(direction, vote_event_id))
            .await
    }

    pub async fn trigger_swipe(&self, direction: Direction) -> SwipeOutcome {
        self.swipe(|session| session.trigger_swipe(direction)).await
    }

    /// Returns false when the request was ignored or its result discarded.
    pub async fn request_enrichment(&self, vote_event_id: &str) -> bool {
        let (ticket, generation) = {
            let mut inner = self.inner.lock().await;
            let generation = inner.generation;

            let Stage::Ready(session) = &mut inner.stage else {
                return false;
            };

            match session.begin_enrichment(vote_event_id) {
                Some(ticket) => (ticket, generation),
                None => return false,
            }
        };

        // Detached from the caller so the slot always settles.
        let session = self.clone();
        let settled = tokio::spawn(async move { session.enrich(generation, ticket).await });

        settled.await.unwrap_or_else(|e| {
            error!(vote_event_id, error = %e, "Enrichment task failed");
            false
        })
    }

    pub async fn view(&self) -> SessionView {
        SessionView::of_stage(&self.inner.lock().await.stage)
    }

    pub async fn phase(&self) -> Option<SessionPhase> {
        match &self.inner.lock().await.stage {
            Stage::Ready(session) => Some(session.phase()),
            _ => None,
        }
    }

    /// Copy of the current session state, `None` while loading or unavailable.
    pub async fn snapshot(&self) -> Option<VotingSession> {
        match &self.inner.lock().await.stage {
            Stage::Ready(session) => Some(session.clone()),
            _ => None,
        }
    }

    async fn swipe<F>(&self, transition: F) -> SwipeOutcome
    where
        F: FnOnce(&mut VotingSession) -> SwipeOutcome,
    {
        let (outcome, generation) = {
            let mut inner = self.inner.lock().await;
            let generation = inner.generation;

            let Stage::Ready(session) = &mut inner.stage else {
                return SwipeOutcome::Ignored(IgnoreReason::NotVoting);
            };

            (transition(session), generation)
        };

        if let SwipeOutcome::Completed(ledger) = &outcome {
            let session = self.clone();
            let ledger = ledger.clone();
            let submitted = tokio::spawn(async move { session.submit(generation, &ledger).await });

            if let Err(e) = submitted.await {
                error!(error = %e, "Match submission task failed");
            }
        }

        outcome
    }

    async fn enrich(&self, generation: u64, ticket: EnrichmentTicket) -> bool {
        let outcome = self
            .services
            .simplifier
            .simplify(ticket.raw_summary())
            .await;

        let mut inner = self.inner.lock().await;
        if inner.generation != generation {
            debug!(
                vote_event_id = ticket.vote_event_id(),
                "Enrichment settled after reset, discarding"
            );
            return false;
        }

        match &mut inner.stage {
            Stage::Ready(session) => {
                session.settle_enrichment(ticket, outcome);
                true
            }
            _ => false,
        }
    }

    async fn submit(&self, generation: u64, ledger: &VoteLedger) {
        info!(votes = ledger.len(), "Submitting ledger");
        let outcome = self.services.matcher.submit(ledger).await;

        let mut inner = self.inner.lock().await;
        if inner.generation != generation {
            debug!(generation, "Match settled after reset, discarding");
            return;
        }

        if let Stage::Ready(session) = &mut inner.stage {
            session.complete_submission(outcome);
        }
    }
}
