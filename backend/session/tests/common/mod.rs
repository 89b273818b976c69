#![allow(dead_code)]

use std::{
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use deck::{DeckLoader, DeckSource, ProposalRow, SourceError};
use session::{
    EnrichmentEntry, MatchClient, MatchComputationFailed, MatchEntry, RemoteError, Services,
    Session, SessionPhase, Simplifier, Vote, VoteLedger,
};
use tokio::sync::Notify;

/// Proposal `n` is linked to vote event `ids[n]`.
pub struct MemorySource {
    pub ids: Vec<String>,
    pub down: AtomicBool,
}

impl MemorySource {
    pub fn new(ids: &[&str]) -> Self {
        Self {
            ids: ids.iter().map(|id| id.to_string()).collect(),
            down: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl DeckSource for MemorySource {
    async fn fetch_proposals(&self) -> Result<Vec<ProposalRow>, SourceError> {
        if self.down.load(Ordering::SeqCst) {
            return Err(SourceError::Status { status: 503 });
        }

        Ok((0..self.ids.len())
            .map(|n| ProposalRow {
                id: n.to_string(),
                type_abbrev: Some("PL".to_string()),
                number: Some((100 + n).to_string()),
                year: Some(2024),
                summary: Some(format!("Raw summary {n}")),
                type_description: Some("Projeto de Lei".to_string()),
                theme: None,
            })
            .collect())
    }

    async fn linked_vote_event(&self, proposal_id: &str) -> Result<Option<String>, SourceError> {
        let index: usize = proposal_id.parse().unwrap_or(usize::MAX);
        Ok(self.ids.get(index).cloned())
    }
}

/// Optional hold on a fake's reply, released with `notify_one`.
#[derive(Default)]
pub struct Gate {
    enabled: AtomicBool,
    notify: Notify,
}

impl Gate {
    pub fn close(&self) {
        self.enabled.store(true, Ordering::SeqCst);
    }

    pub fn release(&self) {
        self.notify.notify_one();
    }

    async fn pass(&self) {
        if self.enabled.load(Ordering::SeqCst) {
            self.notify.notified().await;
        }
    }
}

pub struct FakeMatcher {
    pub submissions: Mutex<Vec<Vec<Vote>>>,
    pub ranking: Option<Vec<MatchEntry>>,
    pub gate: Gate,
}

impl FakeMatcher {
    pub fn answering(ranking: Vec<MatchEntry>) -> Self {
        Self {
            submissions: Mutex::new(Vec::new()),
            ranking: Some(ranking),
            gate: Gate::default(),
        }
    }

    pub fn failing() -> Self {
        Self {
            submissions: Mutex::new(Vec::new()),
            ranking: None,
            gate: Gate::default(),
        }
    }

    pub fn submissions(&self) -> Vec<Vec<Vote>> {
        self.submissions.lock().unwrap().clone()
    }
}

#[async_trait]
impl MatchClient for FakeMatcher {
    async fn submit(&self, ledger: &VoteLedger) -> Result<Vec<MatchEntry>, MatchComputationFailed> {
        self.submissions.lock().unwrap().push(ledger.votes().to_vec());
        self.gate.pass().await;

        match &self.ranking {
            Some(ranking) => Ok(ranking.clone()),
            None => Err(RemoteError::Timeout.into()),
        }
    }
}

pub struct FakeSimplifier {
    pub calls: AtomicUsize,
    pub reply: Option<String>,
    pub gate: Gate,
}

impl FakeSimplifier {
    pub fn answering(reply: &str) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            reply: Some(reply.to_string()),
            gate: Gate::default(),
        }
    }

    pub fn failing() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            reply: None,
            gate: Gate::default(),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Simplifier for FakeSimplifier {
    async fn simplify(&self, _text: &str) -> Result<String, RemoteError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.gate.pass().await;

        self.reply.clone().ok_or(RemoteError::Status(500))
    }
}

pub struct Harness {
    pub session: Session,
    pub source: Arc<MemorySource>,
    pub matcher: Arc<FakeMatcher>,
    pub simplifier: Arc<FakeSimplifier>,
}

impl Harness {
    pub fn new(ids: &[&str], matcher: FakeMatcher, simplifier: FakeSimplifier) -> Self {
        let source = Arc::new(MemorySource::new(ids));
        let matcher = Arc::new(matcher);
        let simplifier = Arc::new(simplifier);

        let session = Session::new(Services {
            loader: DeckLoader::new(source.clone()),
            matcher: matcher.clone(),
            simplifier: simplifier.clone(),
        });

        Self {
            session,
            source,
            matcher,
            simplifier,
        }
    }

    pub async fn started(ids: &[&str], matcher: FakeMatcher, simplifier: FakeSimplifier) -> Self {
        let harness = Self::new(ids, matcher, simplifier);
        harness.session.reset().await;
        harness
    }
}

pub fn politician(id: &str, name: &str, pct: f64) -> MatchEntry {
    MatchEntry {
        politician_id: id.to_string(),
        name: name.to_string(),
        party: "PXX".to_string(),
        region: "MG".to_string(),
        photo_url: format!("https://example.org/{id}.jpg"),
        match_percentage: pct,
    }
}

pub async fn wait_for_phase(session: &Session, phase: SessionPhase) {
    for _ in 0..200 {
        if session.phase().await == Some(phase) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("session never reached {phase:?}");
}

pub async fn wait_for_enrichment(session: &Session, vote_event_id: &str) -> EnrichmentEntry {
    for _ in 0..200 {
        if let Some(snapshot) = session.snapshot().await {
            if let Some(entry) = snapshot.enrichment().read(vote_event_id) {
                return entry.clone();
            }
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("enrichment for {vote_event_id} never settled");
}
