use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::models::{
    ActionReply, Credentials, DaemonStatusReply, DownloadRequest, JobsReply, ListingReply,
    StatusReply, SubmitReply,
};

#[derive(Clone)]
pub struct PanelClient {
    client: Client,
    base: Url,
}

impl PanelClient {
    pub fn new(server: &str, proxy: Option<&str>, timeout: Option<Duration>) -> Result<Self> {
        let base = Url::parse(server).with_context(|| format!("Invalid server URL: {}", server))?;
        if base.cannot_be_a_base() {
            return Err(anyhow!("Server URL cannot be used as a base: {}", server));
        }

        let mut client_builder = Client::builder();

        if let Some(timeout) = timeout {
            client_builder = client_builder.timeout(timeout);
        }

        if let Some(proxy_url) = proxy {
            client_builder = client_builder.proxy(reqwest::Proxy::all(proxy_url)?);
        }

        let client = client_builder
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client, base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| anyhow!("Server URL cannot be used as a base"))?;
            path.pop_if_empty();
            path.extend(segments);
        }
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder> {
        let url = self.endpoint(segments)?;
        debug!(%method, %url, "request");
        Ok(self.client.request(method, url))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder, what: &str) -> Result<T> {
        let response = request
            .send()
            .await
            .with_context(|| format!("{} request failed", what))?;
        Self::decode(response, what).await
    }

    async fn decode<T: DeserializeOwned>(response: Response, what: &str) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(match serde_json::from_str::<ErrorDetail>(&body) {
                Ok(ErrorDetail { detail }) => anyhow!("HTTP {}: {}", status, detail),
                Err(_) => anyhow!("HTTP request failed: {}", status),
            });
        }
        response
            .json::<T>()
            .await
            .with_context(|| format!("Failed to parse {} response", what))
    }

    pub async fn connect(&self, credentials: &Credentials) -> Result<ActionReply> {
        match credentials {
            Credentials::WebDav {
                url,
                username,
                password,
            } => {
                let form = [
                    ("webdav_url", url.as_str()),
                    ("username", username.as_str()),
                    ("password", password.as_str()),
                ];
                let request = self.request(Method::POST, &["api", "connect", "webdav"])?;
                self.send(request.form(&form), "WebDAV connect").await
            }
            Credentials::Aria2 { url, secret } => {
                let form = [("aria2_url", url.as_str()), ("aria2_secret", secret.as_str())];
                let request = self.request(Method::POST, &["api", "connect", "aria2"])?;
                self.send(request.form(&form), "aria2 connect").await
            }
        }
    }

    pub async fn status(&self) -> Result<StatusReply> {
        let request = self.request(Method::GET, &["api", "status"])?;
        self.send(request, "Status").await
    }

    pub async fn list_files(&self, path: &str) -> Result<ListingReply> {
        let request = self
            .request(Method::GET, &["api", "files"])?
            .query(&[("path", path)]);
        self.send(request, "Listing").await
    }

    pub async fn submit_downloads(&self, payload: &DownloadRequest) -> Result<SubmitReply> {
        let request = self
            .request(Method::POST, &["api", "download"])?
            .json(payload);
        self.send(request, "Download").await
    }

    pub async fn list_jobs(&self) -> Result<JobsReply> {
        let request = self.request(Method::GET, &["api", "aria2", "downloads"])?;
        self.send(request, "Job list").await
    }

    pub async fn pause_job(&self, gid: &str) -> Result<ActionReply> {
        let request = self.request(Method::POST, &["api", "aria2", "pause", gid])?;
        self.send(request, "Pause").await
    }

    pub async fn resume_job(&self, gid: &str) -> Result<ActionReply> {
        let request = self.request(Method::POST, &["api", "aria2", "resume", gid])?;
        self.send(request, "Resume").await
    }

    pub async fn remove_job(&self, gid: &str) -> Result<ActionReply> {
        let request = self.request(Method::DELETE, &["api", "aria2", "remove", gid])?;
        self.send(request, "Remove").await
    }

    pub async fn daemon_status(&self) -> Result<DaemonStatusReply> {
        let request = self.request(Method::GET, &["api", "aria2", "status"])?;
        self.send(request, "Daemon status").await
    }
}

#[derive(Deserialize)]
struct ErrorDetail {
    detail: String,
}
