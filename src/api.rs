//! Remote gateway: the HTTP client for the book store's CRUD interface.
//!
//! The core consumes the store only through the [`BookApi`] trait; every
//! failure is surfaced as an opaque `anyhow` error. Transport bounding
//! (timeouts) lives here, not in the core.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Url};
use std::fmt;
use std::time::Duration;
use tracing::{info, warn};

use crate::model::{Book, BookPatch, BookQuery, NewBook};

const DEFAULT_API_BASE: &str = "http://127.0.0.1:8000/";

/// The request/response contract the sync engine consumes. Implemented by
/// [`HttpBookApi`] in production and by recording mocks in tests.
#[async_trait]
pub trait BookApi: Send + Sync {
    async fn fetch_all(&self, query: Option<&BookQuery>) -> Result<Vec<Book>>;

    async fn fetch_one(&self, id: i64) -> Result<Book>;

    async fn create(&self, draft: &NewBook) -> Result<Book>;

    async fn update(&self, id: i64, patch: &BookPatch) -> Result<Book>;

    async fn delete(&self, id: i64) -> Result<()>;
}

#[derive(Clone)]
pub struct HttpBookApi {
    http: Client,
    base_url: Url,
}

impl fmt::Debug for HttpBookApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpBookApi")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl HttpBookApi {
    pub fn new(timeout: Duration) -> Self {
        let base_url = Url::parse(DEFAULT_API_BASE).expect("valid default API URL");
        Self::with_base_url(base_url, timeout)
    }

    pub fn with_base_url(base_url: Url, timeout: Duration) -> Self {
        let http = Client::builder()
            .user_agent("shelfsync/0.1")
            .timeout(timeout)
            .no_proxy()
            .build()
            .expect("reqwest client");
        Self { http, base_url }
    }

    fn books_url(&self) -> Result<Url> {
        self.base_url.join("books").context("invalid API base URL")
    }

    fn book_url(&self, id: i64) -> Result<Url> {
        self.base_url
            .join(&format!("books/{id}"))
            .context("invalid API base URL")
    }

    pub fn fetch_request(&self, query: Option<&BookQuery>) -> Result<reqwest::Request> {
        let mut builder = self.http.get(self.books_url()?);
        if let Some(query) = query {
            builder = builder.query(query);
        }
        builder.build().context("failed to build fetch request")
    }

    pub fn create_request(&self, draft: &NewBook) -> Result<reqwest::Request> {
        self.http
            .post(self.books_url()?)
            .json(draft)
            .build()
            .context("failed to build create request")
    }

    pub fn update_request(&self, id: i64, patch: &BookPatch) -> Result<reqwest::Request> {
        self.http
            .put(self.book_url(id)?)
            .json(patch)
            .build()
            .context("failed to build update request")
    }

    pub fn delete_request(&self, id: i64) -> Result<reqwest::Request> {
        self.http
            .delete(self.book_url(id)?)
            .build()
            .context("failed to build delete request")
    }

    async fn execute(&self, request: reqwest::Request) -> Result<reqwest::Response> {
        let method = request.method().clone();
        let url = request.url().clone();
        info!(%method, %url, "book store request");

        let res = self
            .http
            .execute(request)
            .await
            .context("failed to reach the book store")?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            warn!(%method, %url, %status, "book store error response");
            return Err(anyhow!("book store error {}: {}", status, body));
        }
        Ok(res)
    }
}

#[async_trait]
impl BookApi for HttpBookApi {
    async fn fetch_all(&self, query: Option<&BookQuery>) -> Result<Vec<Book>> {
        let res = self.execute(self.fetch_request(query)?).await?;
        res.json().await.context("invalid book list JSON")
    }

    async fn fetch_one(&self, id: i64) -> Result<Book> {
        let request = self
            .http
            .get(self.book_url(id)?)
            .build()
            .context("failed to build fetch request")?;
        let res = self.execute(request).await?;
        res.json().await.context("invalid book JSON")
    }

    async fn create(&self, draft: &NewBook) -> Result<Book> {
        let res = self.execute(self.create_request(draft)?).await?;
        res.json().await.context("invalid created book JSON")
    }

    async fn update(&self, id: i64, patch: &BookPatch) -> Result<Book> {
        let res = self.execute(self.update_request(id, patch)?).await?;
        res.json().await.context("invalid updated book JSON")
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.execute(self.delete_request(id)?).await?;
        Ok(())
    }
}
