use serde::Serialize;

use crate::{
    driver::Stage,
    enrichment::EnrichmentEntry,
    machine::{SessionPhase, VotingSession},
    matching::MatchEntry,
    vote::Direction,
};

pub const EMPTY_SIMPLIFICATION_PLACEHOLDER: &str =
    "The simplification came back empty. Try again.";
pub const PHOTO_PLACEHOLDER: &str = "https://via.placeholder.com/50";
pub const DEFAULT_YEAR_LABEL: &str = "2024";

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TextSource {
    Original,
    Simplified,
    EmptySimplification,
    EnrichmentFailed,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CardView {
    pub position: usize,
    pub item_id: String,
    pub vote_event_id: String,
    pub title: String,
    pub type_label: String,
    pub year: String,
    pub theme: Option<String>,
    pub text: String,
    pub text_source: TextSource,
    pub can_enrich: bool,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RankView {
    pub rank: usize,
    pub politician_id: String,
    pub name: String,
    pub party: String,
    pub region: String,
    pub photo_url: String,
    pub match_percentage: f64,
    pub rounded_percentage: u8,
}

/// Everything a frontend needs to draw the session.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionView {
    Loading,
    Unavailable {
        message: String,
    },
    NoContent,
    Voting {
        /// Unvoted cards in deck order; the last one is on top.
        cards: Vec<CardView>,
        current: Option<usize>,
        votes_cast: usize,
        total: usize,
        enrichment_busy: bool,
        last_direction: Option<Direction>,
    },
    Submitting {
        votes_cast: usize,
    },
    Matched {
        votes_cast: usize,
        ranking: Vec<RankView>,
    },
    MatchFailed {
        votes_cast: usize,
    },
}

impl SessionView {
    pub fn of(session: &VotingSession) -> Self {
        let votes_cast = session.ledger().len();

        match session.phase() {
            SessionPhase::NoContent => SessionView::NoContent,
            SessionPhase::Voting => SessionView::Voting {
                cards: cards(session),
                current: session.current_position(),
                votes_cast,
                total: session.deck().len(),
                enrichment_busy: session.enrichment().is_busy(),
                last_direction: session.last_direction(),
            },
            SessionPhase::Submitting => SessionView::Submitting { votes_cast },
            SessionPhase::Matched => SessionView::Matched {
                votes_cast,
                ranking: ranking(session.result().unwrap_or_default()),
            },
            SessionPhase::MatchFailed => SessionView::MatchFailed { votes_cast },
        }
    }

    pub(crate) fn of_stage(stage: &Stage) -> Self {
        match stage {
            Stage::Loading => SessionView::Loading,
            Stage::Unavailable(message) => SessionView::Unavailable {
                message: message.clone(),
            },
            Stage::Ready(session) => SessionView::of(session),
        }
    }

    pub fn top_card(&self) -> Option<&CardView> {
        match self {
            SessionView::Voting { cards, .. } => cards.last(),
            _ => None,
        }
    }
}

fn cards(session: &VotingSession) -> Vec<CardView> {
    session
        .deck()
        .iter()
        .enumerate()
        .filter(|(_, proposal)| !session.is_voted(&proposal.vote_event_id))
        .map(|(position, proposal)| {
            let entry = session.enrichment().read(&proposal.vote_event_id);

            let (text, text_source) = match entry {
                None => (proposal.summary.clone(), TextSource::Original),
                Some(EnrichmentEntry::Simplified(text)) if text.is_empty() => (
                    EMPTY_SIMPLIFICATION_PLACEHOLDER.to_string(),
                    TextSource::EmptySimplification,
                ),
                Some(EnrichmentEntry::Simplified(text)) => (text.clone(), TextSource::Simplified),
                Some(EnrichmentEntry::Failed(message)) => {
                    (message.clone(), TextSource::EnrichmentFailed)
                }
            };

            CardView {
                position,
                item_id: proposal.item_id.clone(),
                vote_event_id: proposal.vote_event_id.clone(),
                title: proposal.title.clone(),
                type_label: proposal.type_label.clone(),
                year: proposal
                    .year
                    .map(|year| year.to_string())
                    .unwrap_or_else(|| DEFAULT_YEAR_LABEL.to_string()),
                theme: proposal.theme.clone(),
                text,
                text_source,
                can_enrich: entry.is_none(),
            }
        })
        .collect()
}

fn ranking(entries: &[MatchEntry]) -> Vec<RankView> {
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| RankView {
            rank: index + 1,
            politician_id: entry.politician_id.clone(),
            name: entry.name.clone(),
            party: entry.party.clone(),
            region: entry.region.clone(),
            photo_url: if entry.photo_url.trim().is_empty() {
                PHOTO_PLACEHOLDER.to_string()
            } else {
                entry.photo_url.clone()
            },
            match_percentage: entry.match_percentage,
            rounded_percentage: entry.match_percentage.round().clamp(0.0, 100.0) as u8,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use deck::{Deck, Proposal};
    use serde_json::json;

    use super::*;
    use crate::error::RemoteError;

    fn proposal(id: &str, year: Option<i32>) -> Proposal {
        Proposal {
            item_id: format!("item-{id}"),
            vote_event_id: id.to_string(),
            title: format!("PL {id}/2024"),
            summary: format!("raw {id}"),
            type_label: "Projeto de Lei".to_string(),
            year,
            theme: None,
        }
    }

    fn session() -> VotingSession {
        VotingSession::new(Deck::new(vec![
            proposal("A", Some(2023)),
            proposal("B", None),
            proposal("C", Some(2025)),
        ]))
    }

    fn entry(name: &str, photo: &str, pct: f64) -> MatchEntry {
        MatchEntry {
            politician_id: name.to_lowercase(),
            name: name.to_string(),
            party: "XYZ".to_string(),
            region: "RJ".to_string(),
            photo_url: photo.to_string(),
            match_percentage: pct,
        }
    }

    #[test]
    fn test_voting_view_hides_voted_cards() {
        let mut session = session();
        session.record_swipe(Direction::Left, "C");

        let view = SessionView::of(&session);

        let SessionView::Voting {
            cards,
            current,
            votes_cast,
            total,
            last_direction,
            ..
        } = &view
        else {
            panic!("expected voting view");
        };
        assert_eq!(cards.len(), 2);
        assert_eq!(*current, Some(1));
        assert_eq!((*votes_cast, *total), (1, 3));
        assert_eq!(*last_direction, Some(Direction::Left));
        assert_eq!(view.top_card().unwrap().vote_event_id, "B");
        assert_eq!(view.top_card().unwrap().year, DEFAULT_YEAR_LABEL);
    }

    #[test]
    fn test_card_text_sources() {
        let mut session = session();

        let ticket = session.begin_enrichment("A").unwrap();
        session.settle_enrichment(ticket, Ok(String::new()));
        let ticket = session.begin_enrichment("B").unwrap();
        session.settle_enrichment(ticket, Err(RemoteError::Timeout));

        let SessionView::Voting { cards, .. } = SessionView::of(&session) else {
            panic!("expected voting view");
        };

        assert_eq!(cards[0].text, EMPTY_SIMPLIFICATION_PLACEHOLDER);
        assert_eq!(cards[0].text_source, TextSource::EmptySimplification);
        assert!(!cards[0].can_enrich);

        assert_eq!(cards[1].text_source, TextSource::EnrichmentFailed);
        assert!(!cards[1].can_enrich);

        assert_eq!(cards[2].text, "raw C");
        assert_eq!(cards[2].text_source, TextSource::Original);
        assert!(cards[2].can_enrich);
    }

    #[test]
    fn test_ranking_view() {
        let mut session = VotingSession::new(Deck::new(vec![proposal("A", None)]));
        session.trigger_swipe(Direction::Right);
        session.complete_submission(Ok(vec![
            entry("Ana", "https://example.org/ana.jpg", 87.5),
            entry("Bia", "", 33.3),
        ]));

        let SessionView::Matched {
            votes_cast,
            ranking,
        } = SessionView::of(&session)
        else {
            panic!("expected matched view");
        };

        assert_eq!(votes_cast, 1);
        assert_eq!(ranking[0].rank, 1);
        assert_eq!(ranking[0].rounded_percentage, 88);
        assert_eq!(ranking[1].photo_url, PHOTO_PLACEHOLDER);
        assert_eq!(ranking[1].rounded_percentage, 33);
    }

    #[test]
    fn test_serialized_shape() {
        let view = SessionView::Submitting { votes_cast: 4 };

        assert_eq!(
            serde_json::to_value(&view).unwrap(),
            json!({"state": "submitting", "votes_cast": 4})
        );
        assert_eq!(
            serde_json::to_value(SessionView::of_stage(&Stage::Loading)).unwrap(),
            json!({"state": "loading"})
        );
    }
}
