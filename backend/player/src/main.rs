use clap::Parser;
use session::{Config, Session};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Number of proposals to vote on, overrides DECK_SIZE.
    #[arg(long)]
    deck_size: Option<usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = Config::load()?;
    if let Some(deck_size) = args.deck_size {
        config.deck_size = deck_size;
    }

    let session = Session::from_config(&config)?;
    player::play(&session).await
}
