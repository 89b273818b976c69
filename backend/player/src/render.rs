use std::fmt::Write;

use session::{
    SessionView,
    view::{CardView, RankView, TextSource},
};

pub fn describe(view: &SessionView) -> String {
    match view {
        SessionView::Loading => "Loading proposals...".to_string(),
        SessionView::Unavailable { message } => {
            format!("Proposals are unavailable right now ({message}).")
        }
        SessionView::NoContent => "There are no proposals to vote on.".to_string(),
        SessionView::Voting {
            cards,
            votes_cast,
            total,
            last_direction,
            ..
        } => {
            let mut out = format!("Vote {} of {total}", votes_cast + 1);
            if let Some(direction) = last_direction {
                let _ = write!(out, " (last swipe: {direction})");
            }

            match cards.last() {
                Some(card) => {
                    out.push('\n');
                    out.push_str(&card_text(card));
                }
                None => out.push_str("\nNo cards left."),
            }
            out
        }
        SessionView::Submitting { votes_cast } => {
            format!("Computing your match from {votes_cast} votes...")
        }
        SessionView::Matched {
            votes_cast,
            ranking,
        } => {
            if ranking.is_empty() {
                return format!("No politician matched your {votes_cast} votes.");
            }

            let mut out = format!("Your matches after {votes_cast} votes:");
            for entry in ranking {
                out.push('\n');
                out.push_str(&rank_line(entry));
            }
            out
        }
        SessionView::MatchFailed { .. } => {
            "Could not compute your match. Press r to try again.".to_string()
        }
    }
}

pub fn prompt(view: &SessionView) -> &'static str {
    match view {
        SessionView::Voting { cards, .. } if cards.last().is_some_and(|card| card.can_enrich) => {
            "[s]upport  [n]o  [e]xplain  [r]estart  [q]uit"
        }
        SessionView::Voting { .. } => "[s]upport  [n]o  [r]estart  [q]uit",
        _ => "[r]estart  [q]uit",
    }
}

fn card_text(card: &CardView) -> String {
    let mut out = format!("{} | {} | {}", card.title, card.type_label, card.year);
    if let Some(theme) = &card.theme {
        let _ = write!(out, " | {theme}");
    }

    let label = match card.text_source {
        TextSource::Original => "",
        TextSource::Simplified => "Simplified: ",
        TextSource::EmptySimplification | TextSource::EnrichmentFailed => "Note: ",
    };
    let _ = write!(out, "\n\n{label}{}\n", card.text);

    out
}

fn rank_line(entry: &RankView) -> String {
    format!(
        "{:>2}. {} ({}-{}) {}%",
        entry.rank, entry.name, entry.party, entry.region, entry.rounded_percentage
    )
}
