//! # Deck
//!
//! Proposals the user swipes through.
//!
//! ## Store
//!
//! Two tables behind the Supabase REST API:
//! - `leis`: one row per proposal (id, type abbreviation, number, year, summary, type description, theme)
//! - `eventos`: the bridge from a proposal id to the vote event the chamber recorded for it
//!
//! Votes are always recorded against the vote event id, never the proposal id.
//!
//! ## Loading
//!
//! - Fetch every proposal row, in store order
//! - Resolve each row's vote event concurrently, one lookup per row
//! - Drop rows without a vote event (or whose lookup failed)
//! - Keep the last [`DEFAULT_DECK_SIZE`] survivors, order untouched
//!
//! A failed proposal fetch fails the whole load with [`DeckError::DataUnavailable`].
pub mod error;
pub mod loader;
pub mod models;
pub mod source;

pub use error::{DeckError, SourceError};
pub use loader::{DEFAULT_DECK_SIZE, DeckLoader};
pub use models::{Deck, EventRow, Proposal, ProposalRow};
pub use source::{DeckSource, PostgrestSource};
