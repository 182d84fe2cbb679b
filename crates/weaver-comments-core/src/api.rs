//! Comment endpoints.
//!
//! [`CommentApi`] is the seam the controllers talk to. [`HttpCommentApi`]
//! implements it with `reqwest`, which goes through `fetch` on wasm and a
//! rustls-backed client natively.

use std::future::Future;

use reqwest::multipart;
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::{CommentsConfig, CsrfConfig, Endpoints};
use crate::dom::CommentForm;
use crate::error::ApiError;
use crate::types::{CommentId, CreateOutcome, DeleteResponse, LikeResponse};

/// Header marking a request as a background (non-navigating) request.
pub const BACKGROUND_HEADER: (&str, &str) = ("X-Requested-With", "XMLHttpRequest");

/// The three state-changing endpoints of the comment service.
///
/// Futures aren't required to be `Send`: in the browser everything runs on
/// the single event-loop thread.
pub trait CommentApi {
    /// Post a serialized comment form to its action URL.
    ///
    /// A server-side validation failure is `Ok(CreateOutcome::Rejected)`,
    /// not an error.
    fn create(&self, form: &CommentForm) -> impl Future<Output = Result<CreateOutcome, ApiError>>;

    /// Like a comment. `token` is the cookie-derived anti-forgery token.
    fn like(
        &self,
        id: &CommentId,
        token: Option<&str>,
    ) -> impl Future<Output = Result<LikeResponse, ApiError>>;

    /// Delete a comment. `token` is the cookie-derived anti-forgery token.
    fn delete(
        &self,
        id: &CommentId,
        token: Option<&str>,
    ) -> impl Future<Output = Result<DeleteResponse, ApiError>>;
}

/// HTTP implementation of [`CommentApi`].
#[derive(Clone, Debug)]
pub struct HttpCommentApi {
    client: reqwest::Client,
    endpoints: Endpoints,
    csrf: CsrfConfig,
}

impl HttpCommentApi {
    pub fn new(config: &CommentsConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(client: reqwest::Client, config: &CommentsConfig) -> Self {
        Self {
            client,
            endpoints: config.endpoints.clone(),
            csrf: config.csrf.clone(),
        }
    }

    /// Resolve an endpoint path or form action against the base URL.
    pub fn resolve(&self, path: &str) -> Result<Url, ApiError> {
        match &self.endpoints.base_url {
            Some(base) => Ok(Url::parse(base)?.join(path)?),
            None => Ok(Url::parse(path)?),
        }
    }

    fn post(&self, url: Url, token: Option<&str>) -> reqwest::RequestBuilder {
        let request = self
            .client
            .post(url)
            .header(BACKGROUND_HEADER.0, BACKGROUND_HEADER.1);
        match token {
            Some(token) => request.header(self.csrf.header_name.as_str(), token),
            None => request,
        }
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
    ) -> Result<T, ApiError> {
        let url = self.resolve(path)?;
        tracing::debug!(%url, "posting comment action");
        let response = self.post(url, token).send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        match serde_json::from_slice(&body) {
            Ok(value) => Ok(value),
            Err(_) if !status.is_success() => Err(ApiError::Status {
                status: status.as_u16(),
            }),
            Err(err) => Err(err.into()),
        }
    }
}

impl CommentApi for HttpCommentApi {
    async fn create(&self, form: &CommentForm) -> Result<CreateOutcome, ApiError> {
        let url = self.resolve(&form.action)?;
        let token = form.field(&self.csrf.form_field);

        let mut body = multipart::Form::new();
        for (name, value) in &form.fields {
            body = body.text(name.clone(), value.clone());
        }
        if let Some(image) = &form.image {
            let mut part =
                multipart::Part::bytes(image.bytes.clone()).file_name(image.file_name.clone());
            if let Some(mime) = &image.mime {
                part = part.mime_str(mime)?;
            }
            body = body.part("image", part);
        }

        tracing::debug!(%url, fields = form.fields.len(), has_image = form.image.is_some(), "submitting comment");
        let response = self.post(url, token).multipart(body).send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        // Validation failures come back as 400 with an `error` body, so
        // decode first and only fall back to the status when that fails.
        match CreateOutcome::from_slice(&bytes) {
            Ok(outcome) => Ok(outcome),
            Err(_) if !status.is_success() => Err(ApiError::Status {
                status: status.as_u16(),
            }),
            Err(err) => Err(err.into()),
        }
    }

    async fn like(&self, id: &CommentId, token: Option<&str>) -> Result<LikeResponse, ApiError> {
        self.post_json(&self.endpoints.like_path(id), token).await
    }

    async fn delete(&self, id: &CommentId, token: Option<&str>) -> Result<DeleteResponse, ApiError> {
        self.post_json(&self.endpoints.delete_path(id), token).await
    }
}
