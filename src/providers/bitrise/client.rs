use std::time::Duration;

use log::{debug, info, warn};
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use url::Url;

use super::types::BuildListPage;
use crate::auth::Token;
use crate::error::{BuildLensError, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.bitrise.io/v0.1/";

/// Largest page the build list endpoint serves.
const PAGE_SIZE: u32 = 50;

pub struct BitriseClient {
    client: Client,
    api_url: Url,
    token: Token,
    max_retries: u32,
    retry_delay: Duration,
}

impl BitriseClient {
    pub fn new(base_url: &str, token: Token) -> Result<Self> {
        if token.as_str().trim().is_empty() {
            return Err(BuildLensError::InvalidToken);
        }

        let client = Client::builder()
            .user_agent(concat!("BuildLens/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| BuildLensError::Config(format!("Failed to create HTTP client: {e}")))?;

        let mut api_url = Url::parse(base_url)
            .map_err(|e| BuildLensError::Config(format!("Invalid base URL: {e}")))?;
        if !api_url.path().ends_with('/') {
            let path = format!("{}/", api_url.path());
            api_url.set_path(&path);
        }

        Ok(Self {
            client,
            api_url,
            token,
            max_retries: 3,
            retry_delay: Duration::from_secs(1),
        })
    }

    /// `max_retries` is the total number of attempts per page, at least one.
    #[must_use]
    pub fn with_retries(mut self, max_retries: u32, retry_delay: Duration) -> Self {
        self.max_retries = max_retries.max(1);
        self.retry_delay = retry_delay;
        self
    }

    fn auth_request(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request.header(AUTHORIZATION, self.token.as_str())
    }

    fn builds_url(&self) -> Result<Url> {
        self.api_url
            .join("builds")
            .map_err(|e| BuildLensError::Config(format!("Invalid builds URL: {e}")))
    }

    /// Fetches every build visible to the token, following `paging.next`
    /// until the last page.
    pub async fn fetch_all_builds(&self) -> Result<Vec<Value>> {
        let mut builds = Vec::new();
        let mut cursor: Option<String> = None;
        let mut page_count = 0;

        loop {
            page_count += 1;
            let page = self.fetch_builds_page(cursor.as_deref()).await?;
            cursor = page.next_cursor().map(str::to_string);

            let fetched = page.data.len();
            builds.extend(page.data);
            info!("Page {page_count}: {fetched} builds ({} total)", builds.len());

            if cursor.is_none() {
                break;
            }
        }

        Ok(builds)
    }

    /// Fetches one page, retrying transport failures and server errors.
    /// Auth, rate limit and other client errors fail immediately.
    pub async fn fetch_builds_page(&self, next: Option<&str>) -> Result<BuildListPage> {
        let url = self.builds_url()?;
        let mut last_error = None;

        for attempt in 1..=self.max_retries {
            let mut request = self.client.get(url.clone()).query(&[("limit", PAGE_SIZE)]);
            if let Some(next) = next {
                request = request.query(&[("next", next)]);
            }
            request = self.auth_request(request);

            match request.send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return Ok(response.json::<BuildListPage>().await?);
                    }
                    if status == StatusCode::UNAUTHORIZED {
                        return Err(BuildLensError::InvalidToken);
                    }
                    if status == StatusCode::TOO_MANY_REQUESTS {
                        return Err(BuildLensError::RateLimited);
                    }
                    if !status.is_server_error() {
                        return Err(BuildLensError::Api(format!("HTTP {status}")));
                    }
                    warn!("Attempt {attempt}/{}: HTTP {status}", self.max_retries);
                    last_error = Some(BuildLensError::Api(format!("HTTP {status}")));
                }
                Err(e) => {
                    warn!("Attempt {attempt}/{}: {e}", self.max_retries);
                    last_error = Some(BuildLensError::Network(e));
                }
            }

            if attempt < self.max_retries {
                let delay = self.retry_delay * attempt;
                debug!("Retrying in {delay:?}");
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error
            .unwrap_or_else(|| BuildLensError::Api("No attempt was made".to_string())))
    }
}
