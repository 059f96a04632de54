use std::time::Duration;

use async_trait::async_trait;
use quiz_core::model::{AnswerOutcome, Card, CardDraft, CardId};
use reqwest::{Client, Method};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::api::{CardStore, QuizService, Remote, RemoteError, StartedQuiz};
use crate::wire::{
    CardListResponse, CreateCardRequest, CreateCardResponse, ErrorBody, MessageResponse,
    StartQuizResponse, SubmitAnswerRequest, SubmitAnswerResponse,
};

mod mapping;

use mapping::{Endpoint, classify};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HttpInitError {
    #[error("invalid server url {raw}: {source}")]
    InvalidUrl {
        raw: String,
        #[source]
        source: url::ParseError,
    },
    #[error("unsupported url scheme: {0}")]
    UnsupportedScheme(String),
    #[error(transparent)]
    Client(#[from] reqwest::Error),
}

/// Where the quiz service lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpConfig {
    pub base_url: Url,
    pub timeout: Duration,
}

impl HttpConfig {
    /// # Errors
    ///
    /// Returns `HttpInitError` if `raw` is not an absolute http(s) URL.
    pub fn new(raw: &str) -> Result<Self, HttpInitError> {
        let mut base_url = Url::parse(raw.trim()).map_err(|source| HttpInitError::InvalidUrl {
            raw: raw.to_string(),
            source,
        })?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(HttpInitError::UnsupportedScheme(base_url.scheme().to_string()));
        }
        // Joining relative paths replaces the last segment unless the base ends in '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            base_url,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// JSON-over-HTTP client for both the card store and the quiz service.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: Url,
}

impl HttpBackend {
    /// # Errors
    ///
    /// Returns `HttpInitError::Client` if the HTTP client cannot be built.
    pub fn new(config: HttpConfig) -> Result<Self, HttpInitError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            base_url: config.base_url,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> Result<Url, RemoteError> {
        self.base_url
            .join(path)
            .map_err(|err| RemoteError::Transport(format!("bad request path {path}: {err}")))
    }

    async fn call<B, T>(
        &self,
        endpoint: Endpoint,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, RemoteError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path)?;
        debug!(endpoint = endpoint.name(), %method, %url, "quiz service request");

        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request
            .send()
            .await
            .map_err(|err| RemoteError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.detail_text().map(str::to_owned));
            warn!(
                endpoint = endpoint.name(),
                status = status.as_u16(),
                detail = detail.as_deref().unwrap_or(""),
                "quiz service returned an error"
            );
            return Err(classify(endpoint, status, detail));
        }

        debug!(endpoint = endpoint.name(), status = status.as_u16(), "quiz service response");
        response
            .json::<T>()
            .await
            .map_err(|err| RemoteError::Decode(err.to_string()))
    }
}

#[async_trait]
impl CardStore for HttpBackend {
    async fn list_cards(&self) -> Result<Vec<Card>, RemoteError> {
        let body: CardListResponse = self
            .call::<(), _>(Endpoint::ListCards, Method::GET, "api/cards", None)
            .await?;
        Ok(body.cards.into_iter().map(|card| card.into_card()).collect())
    }

    async fn create_card(&self, draft: CardDraft) -> Result<Card, RemoteError> {
        let request = CreateCardRequest {
            question: draft.question,
            answer: draft.answer,
        };
        let body: CreateCardResponse = self
            .call(Endpoint::CreateCard, Method::POST, "api/cards", Some(&request))
            .await?;
        Ok(body.card.into_card())
    }

    async fn delete_card(&self, id: CardId) -> Result<(), RemoteError> {
        let path = format!("api/cards/{id}");
        let _: MessageResponse = self
            .call::<(), _>(Endpoint::DeleteCard, Method::DELETE, &path, None)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl QuizService for HttpBackend {
    async fn start_session(&self) -> Result<StartedQuiz, RemoteError> {
        let body: StartQuizResponse = self
            .call::<(), _>(Endpoint::StartQuiz, Method::POST, "api/quiz/start", None)
            .await?;
        body.into_started()
    }

    async fn submit_answer(&self, selected_answer: &str) -> Result<AnswerOutcome, RemoteError> {
        let request = SubmitAnswerRequest {
            selected_answer: selected_answer.to_string(),
        };
        let body: SubmitAnswerResponse = self
            .call(Endpoint::SubmitAnswer, Method::POST, "api/quiz/answer", Some(&request))
            .await?;
        body.into_outcome()
    }

    async fn end_session(&self) -> Result<(), RemoteError> {
        let _: MessageResponse = self
            .call::<(), _>(Endpoint::EndQuiz, Method::DELETE, "api/quiz", None)
            .await?;
        Ok(())
    }
}

impl Remote {
    /// Build a `Remote` that talks to the service over HTTP.
    ///
    /// # Errors
    ///
    /// Returns `HttpInitError` if the client cannot be built.
    pub fn http(config: HttpConfig) -> Result<Self, HttpInitError> {
        Ok(Self::from_backend(HttpBackend::new(config)?))
    }
}
