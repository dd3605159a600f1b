use anyhow::{Context, Result, bail};
use reqwest::Client;
use reqwest::header::AUTHORIZATION;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::AppConfig;
use crate::mark::WatchedStateSink;
use crate::types::{Channel, Video};

/// Wire shape of one paginated response. `paginate` is kept loose on purpose:
/// an absent, empty or otherwise malformed pagination block means "no more
/// pages", never an error.
#[derive(Debug, Deserialize)]
pub struct PageEnvelope<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub paginate: Option<serde_json::Value>,
}

impl<T> PageEnvelope<T> {
    /// Index of the last available page, when the envelope carries one.
    pub fn last_page(&self) -> Option<u64> {
        self.paginate.as_ref()?.get("last_page")?.as_u64()
    }
}

/// Fetch pages 0..=last_page and concatenate their `data` arrays in request
/// order. A failed page request ends pagination early and returns whatever
/// was accumulated so far; callers must treat the result as best effort.
pub async fn fetch_all_pages<T, F>(label: &str, fetch_page: F) -> Vec<T>
where
    F: AsyncFn(u64) -> Result<PageEnvelope<T>>,
{
    let mut all_data = Vec::new();
    let mut page = 0;
    loop {
        let envelope = match fetch_page(page).await {
            Ok(envelope) => envelope,
            Err(err) => {
                println!("Error fetching {label}?page={page}: {err:#}");
                break;
            }
        };
        let last_page = envelope.last_page();
        all_data.extend(envelope.data);
        match last_page {
            Some(last) if page < last => page += 1,
            _ => break,
        }
    }
    all_data
}

/// HTTP client for the TubeArchivist REST API. Holds the resolved endpoint
/// URLs and the token so nothing downstream touches configuration.
pub struct ApiClient {
    client: Client,
    channel_endpoint: Url,
    video_endpoint: Url,
    watched_endpoint: Url,
    token: String,
}

impl ApiClient {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let mut base_url = config.base_url.clone();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        let base = Url::parse(&base_url)
            .with_context(|| format!("invalid base_url {:?}", config.base_url))?;
        let client = Client::builder()
            .user_agent(concat!("tawatch/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            client,
            channel_endpoint: base.join("channel/")?,
            video_endpoint: base.join("video/")?,
            watched_endpoint: base.join("watched/")?,
            token: config.token.clone(),
        })
    }

    async fn get_page<T: DeserializeOwned>(
        &self,
        endpoint: &Url,
        page: u64,
    ) -> Result<PageEnvelope<T>> {
        let mut url = endpoint.clone();
        url.query_pairs_mut().append_pair("page", &page.to_string());
        let response = self
            .client
            .get(url.clone())
            .header(AUTHORIZATION, format!("Token {}", self.token))
            .send()
            .await
            .with_context(|| format!("request to {url} failed"))?;
        if !response.status().is_success() {
            bail!("{url} returned HTTP {}", response.status());
        }
        response
            .json()
            .await
            .with_context(|| format!("failed to parse response from {url}"))
    }

    /// Every channel record the server will hand out, raw and undeduplicated.
    pub async fn fetch_channels(&self) -> Vec<Channel> {
        fetch_all_pages(self.channel_endpoint.as_str(), async |page| {
            self.get_page::<Channel>(&self.channel_endpoint, page).await
        })
        .await
    }

    /// Every video record the server will hand out.
    pub async fn fetch_videos(&self) -> Vec<Video> {
        fetch_all_pages(self.video_endpoint.as_str(), async |page| {
            self.get_page::<Video>(&self.video_endpoint, page).await
        })
        .await
    }
}

impl WatchedStateSink for ApiClient {
    async fn set_watched(&self, video_id: &str, watched: bool) -> Result<()> {
        let payload = serde_json::json!({
            "id": video_id,
            "is_watched": watched,
        });
        let response = self
            .client
            .post(self.watched_endpoint.clone())
            .header(AUTHORIZATION, format!("Token {}", self.token))
            .json(&payload)
            .send()
            .await
            .with_context(|| format!("request to {} failed", self.watched_endpoint))?;
        if !response.status().is_success() {
            bail!(
                "{} returned HTTP {}",
                self.watched_endpoint,
                response.status()
            );
        }
        Ok(())
    }
}
