use std::time::Duration;

use reqwest::{
    Client,
    header::{HeaderMap, HeaderValue, USER_AGENT},
};
use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;

use crate::error::RemoteError;

const USER_AGENT_VALUE: &str = concat!("session/", env!("CARGO_PKG_VERSION"));

pub(crate) fn build_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

    Client::builder()
        .timeout(timeout)
        .default_headers(headers)
        .build()
}

/// One JSON request, one JSON response. The client timeout covers the body read too.
pub(crate) async fn post_json<B, T>(client: &Client, url: &str, body: &B) -> Result<T, RemoteError>
where
    B: Serialize + ?Sized,
    T: DeserializeOwned,
{
    debug!(url = %url, "posting");

    let response = client.post(url).json(body).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(RemoteError::Status(status.as_u16()));
    }

    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}
