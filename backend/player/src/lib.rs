//! # Terminal player
//!
//! Plays one voting session on stdin/stdout.
//!
//! | Key | Action |
//! |---|---|
//! | `s` / `y` | Support the top card (swipe right) |
//! | `n` | Oppose the top card (swipe left) |
//! | `e` | Explain the top card in simpler words |
//! | `r` | Start over with a fresh deck |
//! | `q` | Quit |
//!
//! A spinner runs while the deck loads, while a card is explained and while the match is
//! computed.
use std::{future::Future, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};
use session::{Direction, Session, SessionView};
use tokio::io::{AsyncBufReadExt, BufReader, stdin};
use tracing::debug;

pub mod render;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Vote(Direction),
    Explain,
    Restart,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "s" | "y" => Some(Command::Vote(Direction::Right)),
            "n" => Some(Command::Vote(Direction::Left)),
            "e" => Some(Command::Explain),
            "r" => Some(Command::Restart),
            "q" => Some(Command::Quit),
            _ => None,
        }
    }
}

pub async fn play(session: &Session) -> anyhow::Result<()> {
    let mut view = with_spinner("Loading proposals", session.reset()).await;
    let mut lines = BufReader::new(stdin()).lines();

    loop {
        println!("{}", render::describe(&view));
        println!("{}", render::prompt(&view));

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let Some(command) = Command::parse(&line) else {
            println!("Unknown command: {}", line.trim());
            continue;
        };
        debug!(?command, "Command read");

        view = match command {
            Command::Quit => break,
            Command::Restart => with_spinner("Loading proposals", session.reset()).await,
            Command::Vote(direction) => {
                if is_last_card(&view) {
                    with_spinner("Computing your match", session.trigger_swipe(direction)).await;
                } else {
                    session.trigger_swipe(direction).await;
                }
                session.view().await
            }
            Command::Explain => {
                if let Some(card) = view.top_card() {
                    let vote_event_id = card.vote_event_id.clone();
                    with_spinner("Simplifying", session.request_enrichment(&vote_event_id)).await;
                }
                session.view().await
            }
        };
    }

    println!("Bye.");
    Ok(())
}

fn is_last_card(view: &SessionView) -> bool {
    matches!(view, SessionView::Voting { cards, .. } if cards.len() == 1)
}

async fn with_spinner<F: Future>(message: &'static str, future: F) -> F::Output {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));

    let output = future.await;

    spinner.finish_and_clear();
    output
}
