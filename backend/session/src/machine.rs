//! # Voting Session
//!
//! Pure state for one pass through a deck. No IO happens here: the caller performs the
//! remote calls and feeds their outcomes back in.
//!
//! ```text
//! Voting ──(last card swiped)──> Submitting ──ok──> Matched
//!                                           └─err─> MatchFailed
//! (empty deck) ─────────────────> NoContent
//! ```
//!
//! `Matched`, `MatchFailed` and `NoContent` are terminal. Starting over means building a new
//! session from a freshly loaded deck.
use deck::{Deck, Proposal};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    enrichment::{EnrichmentCache, EnrichmentEntry, EnrichmentTicket},
    error::{MatchComputationFailed, RemoteError},
    matching::MatchEntry,
    vote::{Direction, Vote, VoteLedger},
};

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Voting,
    Submitting,
    Matched,
    MatchFailed,
    NoContent,
}

impl SessionPhase {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            SessionPhase::Matched | SessionPhase::MatchFailed | SessionPhase::NoContent
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    NotVoting,
    AlreadyVoted,
    UnknownItem,
    DeckExhausted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwipeOutcome {
    Recorded { position: Option<usize> },
    /// Last card swiped. The session is now `Submitting` and this ledger must be submitted.
    Completed(VoteLedger),
    Ignored(IgnoreReason),
}

#[derive(Debug, Clone)]
pub struct VotingSession {
    deck: Deck,
    position: Option<usize>,
    ledger: VoteLedger,
    phase: SessionPhase,
    result: Option<Vec<MatchEntry>>,
    enrichment: EnrichmentCache,
    last_direction: Option<Direction>,
}

impl VotingSession {
    pub fn new(deck: Deck) -> Self {
        let phase = if deck.is_empty() {
            info!("Deck is empty, nothing to vote on");
            SessionPhase::NoContent
        } else {
            SessionPhase::Voting
        };

        Self {
            position: deck.top(),
            deck,
            ledger: VoteLedger::default(),
            phase,
            result: None,
            enrichment: EnrichmentCache::default(),
            last_direction: None,
        }
    }

    pub fn record_swipe(&mut self, direction: Direction, vote_event_id: &str) -> SwipeOutcome {
        if self.phase != SessionPhase::Voting {
            debug!(vote_event_id, phase = ?self.phase, "Swipe outside voting, ignoring");
            return SwipeOutcome::Ignored(IgnoreReason::NotVoting);
        }

        if !self.deck.contains(vote_event_id) {
            warn!(vote_event_id, "Swipe for a card not in the deck, ignoring");
            return SwipeOutcome::Ignored(IgnoreReason::UnknownItem);
        }

        let vote = Vote {
            vote_event_id: vote_event_id.to_string(),
            choice: direction.choice(),
        };

        if !self.ledger.record(vote) {
            debug!(vote_event_id, "Already voted, ignoring");
            return SwipeOutcome::Ignored(IgnoreReason::AlreadyVoted);
        }

        self.last_direction = Some(direction);
        self.position = self.next_position();

        debug!(
            vote_event_id,
            %direction,
            votes = self.ledger.len(),
            total = self.deck.len(),
            "Swipe recorded"
        );

        if self.is_complete() {
            info!(votes = self.ledger.len(), "Deck finished, submitting");
            self.phase = SessionPhase::Submitting;
            return SwipeOutcome::Completed(self.ledger.clone());
        }

        SwipeOutcome::Recorded {
            position: self.position,
        }
    }

    /// Vote on whichever card is on top, same as swiping it.
    pub fn trigger_swipe(&mut self, direction: Direction) -> SwipeOutcome {
        if self.phase != SessionPhase::Voting {
            return SwipeOutcome::Ignored(IgnoreReason::NotVoting);
        }

        match self.current_proposal() {
            Some(proposal) => {
                let vote_event_id = proposal.vote_event_id.clone();
                self.record_swipe(direction, &vote_event_id)
            }
            None => SwipeOutcome::Ignored(IgnoreReason::DeckExhausted),
        }
    }

    pub fn complete_submission(
        &mut self,
        outcome: Result<Vec<MatchEntry>, MatchComputationFailed>,
    ) -> SessionPhase {
        if self.phase != SessionPhase::Submitting {
            warn!(phase = ?self.phase, "Match outcome outside submission, discarding");
            return self.phase;
        }

        match outcome {
            Ok(ranking) => {
                info!(ranked = ranking.len(), "Matched");
                self.result = Some(ranking);
                self.phase = SessionPhase::Matched;
            }
            Err(e) => {
                warn!(error = %e, "Match computation failed");
                self.phase = SessionPhase::MatchFailed;
            }
        }

        self.phase
    }

    /// `None` when the id is not in the deck, already enriched, or another enrichment is out.
    pub fn begin_enrichment(&mut self, vote_event_id: &str) -> Option<EnrichmentTicket> {
        let Some((_, proposal)) = self.deck.find(vote_event_id) else {
            warn!(vote_event_id, "Enrichment for a card not in the deck, ignoring");
            return None;
        };

        self.enrichment.begin(vote_event_id, &proposal.summary)
    }

    pub fn settle_enrichment(
        &mut self,
        ticket: EnrichmentTicket,
        outcome: Result<String, RemoteError>,
    ) -> &EnrichmentEntry {
        self.enrichment.settle(ticket, outcome)
    }

    /// Every card in the deck has a vote.
    pub fn is_complete(&self) -> bool {
        self.deck
            .iter()
            .all(|proposal| self.ledger.contains(&proposal.vote_event_id))
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn ledger(&self) -> &VoteLedger {
        &self.ledger
    }

    pub fn current_position(&self) -> Option<usize> {
        self.position
    }

    pub fn current_proposal(&self) -> Option<&Proposal> {
        self.position.and_then(|index| self.deck.get(index))
    }

    pub fn result(&self) -> Option<&[MatchEntry]> {
        self.result.as_deref()
    }

    pub fn enrichment(&self) -> &EnrichmentCache {
        &self.enrichment
    }

    pub fn last_direction(&self) -> Option<Direction> {
        self.last_direction
    }

    pub fn is_voted(&self, vote_event_id: &str) -> bool {
        self.ledger.contains(vote_event_id)
    }

    // Top card is the highest index still unvoted, so swiping in order steps down by one.
    fn next_position(&self) -> Option<usize> {
        self.deck
            .iter()
            .enumerate()
            .rev()
            .find(|(_, proposal)| !self.ledger.contains(&proposal.vote_event_id))
            .map(|(index, _)| index)
    }
}
