use crate::feeds::Endpoint;
use anyhow::{Context, Result};
use reqwest::blocking::Client;
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// Blocking JSON client for the dashboard backend.
#[derive(Clone, Debug)]
pub struct FeedClient {
    client: Client,
    base: Url,
}

impl FeedClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let mut base =
            Url::parse(base_url).with_context(|| format!("invalid api base url '{base_url}'"))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("trading-dashboard feed poller")
            .build()?;
        Ok(Self { client, base })
    }

    pub fn url_for(&self, endpoint: Endpoint) -> Result<Url> {
        let relative = endpoint.path().trim_start_matches('/');
        self.base
            .join(relative)
            .with_context(|| format!("join {relative} onto {}", self.base))
    }

    /// Fetch and decode one endpoint. Non-success statuses are errors.
    pub fn fetch(&self, endpoint: Endpoint) -> Result<Value> {
        let url = self.url_for(endpoint)?;
        let resp = self
            .client
            .get(url.clone())
            .send()
            .with_context(|| format!("request {url}"))?;
        let status = resp.status();
        if !status.is_success() {
            anyhow::bail!("http status {status} from {url}");
        }
        resp.json::<Value>()
            .with_context(|| format!("decode json from {url}"))
    }
}
