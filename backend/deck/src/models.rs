use serde::{Deserialize, Deserializer, Serialize};

pub const PROPOSAL_TABLE: &str = "leis";
pub const PROPOSAL_COLUMNS: &str = "id,siglatipo,numero,ano,ementa,descricaotipo,tema";

pub const EVENT_TABLE: &str = "eventos";
pub const EVENT_COLUMNS: &str = "id_evento";
pub const EVENT_PROPOSAL_KEY: &str = "id_lei";

pub const DEFAULT_TYPE_LABEL: &str = "LEI";

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ProposalRow {
    #[serde(deserialize_with = "store_id")]
    pub id: String,

    #[serde(rename = "siglatipo", default)]
    pub type_abbrev: Option<String>,

    #[serde(rename = "numero", default, deserialize_with = "optional_store_id")]
    pub number: Option<String>,

    #[serde(rename = "ano", default)]
    pub year: Option<i32>,

    #[serde(rename = "ementa", default)]
    pub summary: Option<String>,

    #[serde(rename = "descricaotipo", default)]
    pub type_description: Option<String>,

    #[serde(rename = "tema", default)]
    pub theme: Option<String>,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct EventRow {
    #[serde(rename = "id_evento", default, deserialize_with = "optional_store_id")]
    pub vote_event_id: Option<String>,
}

/// Store ids arrive as integers or strings depending on the column type.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Integer(i64),
}

impl From<RawId> for String {
    fn from(id: RawId) -> Self {
        match id {
            RawId::Text(text) => text,
            RawId::Integer(n) => n.to_string(),
        }
    }
}

pub fn store_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    RawId::deserialize(deserializer).map(String::from)
}

pub fn optional_store_id<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Option::<RawId>::deserialize(deserializer).map(|id| id.map(String::from))
}

/// A swipeable card. Immutable once loaded.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Proposal {
    pub item_id: String,
    pub vote_event_id: String,
    pub title: String,
    pub summary: String,
    pub type_label: String,
    pub year: Option<i32>,
    pub theme: Option<String>,
}

impl Proposal {
    pub fn from_row(row: ProposalRow, vote_event_id: String) -> Self {
        let title = format!(
            "{} {}/{}",
            row.type_abbrev.as_deref().unwrap_or_default(),
            row.number.as_deref().unwrap_or_default(),
            row.year.map(|year| year.to_string()).unwrap_or_default(),
        );

        let type_label = non_empty(row.type_description.as_deref())
            .or_else(|| non_empty(row.type_abbrev.as_deref()))
            .unwrap_or(DEFAULT_TYPE_LABEL)
            .to_string();

        Self {
            item_id: row.id,
            vote_event_id,
            title,
            summary: row.summary.unwrap_or_default(),
            type_label,
            year: row.year,
            theme: row.theme.filter(|theme| !theme.trim().is_empty()),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Ordered proposals for one session, consumed from the last index toward 0.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Deck {
    proposals: Vec<Proposal>,
}

impl Deck {
    pub fn new(proposals: Vec<Proposal>) -> Self {
        Self { proposals }
    }

    pub fn len(&self) -> usize {
        self.proposals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proposals.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Proposal> {
        self.proposals.get(index)
    }

    pub fn proposals(&self) -> &[Proposal] {
        &self.proposals
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Proposal> {
        self.proposals.iter()
    }

    pub fn find(&self, vote_event_id: &str) -> Option<(usize, &Proposal)> {
        self.proposals
            .iter()
            .enumerate()
            .find(|(_, proposal)| proposal.vote_event_id == vote_event_id)
    }

    pub fn contains(&self, vote_event_id: &str) -> bool {
        self.find(vote_event_id).is_some()
    }

    /// Index of the topmost card of a fresh deck.
    pub fn top(&self) -> Option<usize> {
        self.len().checked_sub(1)
    }
}
