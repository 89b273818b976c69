use std::sync::Arc;

use session::{Session, SessionError};

use super::config::Config;

pub struct State {
    pub session: Session,
}

impl State {
    /// Builds the session from config and loads its first deck.
    pub async fn new(config: &Config) -> Result<Arc<Self>, SessionError> {
        let session = Session::from_config(&config.session)?;
        session.reset().await;

        Ok(Self::with_session(session))
    }

    pub fn with_session(session: Session) -> Arc<Self> {
        Arc::new(Self { session })
    }
}
