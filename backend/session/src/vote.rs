use std::{collections::HashSet, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::UnknownDirection;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    pub fn choice(self) -> Choice {
        match self {
            Direction::Left => Choice::Oppose,
            Direction::Right => Choice::Support,
        }
    }
}

impl FromStr for Direction {
    type Err = UnknownDirection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            _ => Err(UnknownDirection(s.to_string())),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Left => f.write_str("left"),
            Direction::Right => f.write_str("right"),
        }
    }
}

/// Serialized the way the match service spells its ballots.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Choice {
    #[serde(rename = "Sim")]
    Support,

    #[serde(rename = "Não")]
    Oppose,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Vote {
    #[serde(rename = "id_votacao")]
    pub vote_event_id: String,

    #[serde(rename = "voto")]
    pub choice: Choice,
}

/// Votes in swipe order. Holds at most one vote per vote event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoteLedger {
    votes: Vec<Vote>,
    voted: HashSet<String>,
}

impl VoteLedger {
    /// Returns false, leaving the ledger untouched, when the vote event was already voted.
    pub fn record(&mut self, vote: Vote) -> bool {
        if !self.voted.insert(vote.vote_event_id.clone()) {
            return false;
        }

        self.votes.push(vote);
        true
    }

    pub fn contains(&self, vote_event_id: &str) -> bool {
        self.voted.contains(vote_event_id)
    }

    pub fn votes(&self) -> &[Vote] {
        &self.votes
    }

    pub fn len(&self) -> usize {
        self.votes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.votes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_right_is_support() {
        assert_eq!(Direction::Right.choice(), Choice::Support);
        assert_eq!(Direction::Left.choice(), Choice::Oppose);
    }

    #[test]
    fn test_parse_direction() {
        assert_eq!("right".parse::<Direction>().unwrap(), Direction::Right);
        assert_eq!(" LEFT ".parse::<Direction>().unwrap(), Direction::Left);
        assert!("up".parse::<Direction>().is_err());
    }

    #[test]
    fn test_wire_format() {
        let vote = Vote {
            vote_event_id: "2386419-72".to_string(),
            choice: Choice::Oppose,
        };

        assert_eq!(
            serde_json::to_value(&vote).unwrap(),
            json!({"id_votacao": "2386419-72", "voto": "Não"})
        );
    }

    #[test]
    fn test_ledger_rejects_duplicates() {
        let mut ledger = VoteLedger::default();

        assert!(ledger.record(Vote {
            vote_event_id: "a".to_string(),
            choice: Choice::Support,
        }));
        assert!(!ledger.record(Vote {
            vote_event_id: "a".to_string(),
            choice: Choice::Oppose,
        }));

        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.votes()[0].choice, Choice::Support);
        assert!(ledger.contains("a"));
    }
}
