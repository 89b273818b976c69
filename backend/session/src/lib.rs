//! # Voting Session
//!
//! One pass through a deck of proposals: swipe each card, then get matched with politicians.
//!
//! ## Flow
//!
//! - [`Session::reset`] loads a deck and starts voting on the top (last) card
//! - Swiping right supports a proposal, left opposes it
//! - The vote button path ([`Session::trigger_swipe`]) swipes whatever card is on top
//! - Once every card is swiped, the ledger goes to the match service
//! - The ranking (or the failure) stays on screen until the next reset
//!
//! ## Enrichment
//!
//! Any card can ask for a simplified explanation of its summary. Results are cached per
//! vote event for the rest of the session, failures included. See [`enrichment`].
//!
//! ## Remote Services
//!
//! Match computation, `POST` in swipe order:
//! ```json
//! [{"id_votacao": "2386419-72", "voto": "Sim"}, {"id_votacao": "2386420-15", "voto": "Não"}]
//! ```
//!
//! Simplification, `POST`:
//! ```json
//! {"texto": "Altera a Lei nº 9.250, de 26 de dezembro de 1995..."}
//! ```
//!
//! Both are bounded by a client timeout (15s by default) and any failure becomes session state
//! rather than an error for the caller.
pub mod config;
pub mod driver;
pub mod enrichment;
pub mod error;
mod http;
pub mod machine;
pub mod matching;
pub mod view;
pub mod vote;

pub use config::Config;
pub use driver::{Services, Session};
pub use enrichment::{EnrichmentCache, EnrichmentEntry, HttpSimplifier, Simplifier};
pub use error::{ConfigError, MatchComputationFailed, RemoteError, SessionError};
pub use machine::{IgnoreReason, SessionPhase, SwipeOutcome, VotingSession};
pub use matching::{HttpMatchClient, MatchClient, MatchEntry};
pub use view::SessionView;
pub use vote::{Choice, Direction, Vote, VoteLedger};
