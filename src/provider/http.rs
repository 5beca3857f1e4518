//! Provider talking to a running trace backend over HTTP
//!
//! Routes served by the backend:
//! - `GET files/recent`
//! - `GET file/<path>` (opens the file, lists its top-level calls)
//! - `GET file/current/line?lineNumber=N` (root record of line N)
//! - `GET file/current/path`
//! - `GET server/shutdown`
//!
//! The backend only addresses root lines, so descendant ids are resolved by
//! fetching the root record and walking the child path locally.

use super::{subcalls_at, CallTreeProvider, ProviderError, Result};
use crate::node::NodeId;
use crate::record::{ActiveFile, CallRecord, RecentFile, SubcallsResponse, TopLevelCall};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use url::Url;

impl From<url::ParseError> for ProviderError {
    fn from(err: url::ParseError) -> ProviderError {
        ProviderError::InvalidUrl(err.to_string())
    }
}

/// Remote trace backend
#[derive(Debug, Clone)]
pub struct HttpProvider {
    base_url: Url,
    client: reqwest::Client,
}

impl HttpProvider {
    /// Create a provider for a backend such as `http://localhost:5000/`
    pub fn new(base_url: &str) -> Result<Self> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            base_url,
            client: reqwest::Client::new(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, route: &str) -> Result<Url> {
        Ok(self.base_url.join(route)?)
    }

    async fn get(&self, url: Url) -> Result<reqwest::Response> {
        tracing::debug!("GET {}", url);
        let res = self
            .client
            .get(url.clone())
            .header("Accept", "application/json")
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(ProviderError::Status {
                status: res.status().as_u16(),
                url: url.to_string(),
            });
        }
        Ok(res)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let body = self.get(url).await?.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait(?Send)]
impl CallTreeProvider for HttpProvider {
    async fn recent_files(&self) -> Result<Vec<RecentFile>> {
        self.get_json(self.url("files/recent")?).await
    }

    async fn top_level_calls(&self, path: &str) -> Result<Vec<TopLevelCall>> {
        let route = format!("file/{}", path);
        self.get_json(self.url(&route)?).await
    }

    async fn subcalls(&self, id: &NodeId) -> Result<SubcallsResponse> {
        let mut url = self.url("file/current/line")?;
        url.query_pairs_mut()
            .append_pair("lineNumber", &id.line().to_string());
        let record: CallRecord = self.get_json(url).await?;
        subcalls_at(&record, id)
    }

    async fn active_file(&self) -> Result<ActiveFile> {
        self.get_json(self.url("file/current/path")?).await
    }

    async fn shutdown(&self) -> Result<()> {
        // The backend exits without answering; a dropped connection is the ack
        match self.get(self.url("server/shutdown")?).await {
            Ok(_) => Ok(()),
            Err(ProviderError::Http(e)) if !e.is_connect() => Ok(()),
            Err(e) => Err(e),
        }
    }
}
