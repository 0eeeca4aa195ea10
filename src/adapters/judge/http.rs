//! HTTP adapters for the judgment oracle and quest suggester.
//!
//! Both collaborators sit behind plain JSON-over-HTTP endpoints. Responses
//! are returned loosely typed; validation happens in the judge contract, not
//! here. Every failure maps onto `JudgeError` so callers can fall back.

use std::time::Duration;

use reqwest::Client as ReqwestClient;
use tracing::debug;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{JudgeConfig, JudgeRequest, RawJudgeResponse, SuggesterConfig};
use crate::domain::ports::{JudgeClient, JudgeError, QuestSuggester, SuggestionRequest, QuestSuggestion};

pub struct HttpJudgeClient {
    http_client: ReqwestClient,
    base_url: String,
    enabled: bool,
}

impl HttpJudgeClient {
    pub fn new(config: &JudgeConfig) -> DomainResult<Self> {
        let http_client = ReqwestClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DomainError::ExternalService(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            enabled: config.enabled,
        })
    }
}

#[async_trait::async_trait]
impl JudgeClient for HttpJudgeClient {
    async fn judge(&self, request: &JudgeRequest) -> Result<RawJudgeResponse, JudgeError> {
        if !self.enabled {
            return Err(JudgeError::Disabled);
        }

        let url = format!("{}/judge", self.base_url);
        debug!(%url, "sending judge request");

        let response = self
            .http_client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(classify_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(JudgeError::Status(status.as_u16()));
        }

        response
            .json::<RawJudgeResponse>()
            .await
            .map_err(|e| JudgeError::MalformedResponse(e.to_string()))
    }
}

pub struct HttpQuestSuggester {
    http_client: ReqwestClient,
    base_url: String,
    enabled: bool,
}

impl HttpQuestSuggester {
    pub fn new(config: &SuggesterConfig) -> DomainResult<Self> {
        let http_client = ReqwestClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DomainError::ExternalService(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            enabled: config.enabled,
        })
    }
}

#[async_trait::async_trait]
impl QuestSuggester for HttpQuestSuggester {
    async fn suggest(&self, request: &SuggestionRequest) -> Result<QuestSuggestion, JudgeError> {
        if !self.enabled {
            return Err(JudgeError::Disabled);
        }

        let url = format!("{}/suggest", self.base_url);
        debug!(%url, "sending suggestion request");

        let response = self
            .http_client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(classify_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(JudgeError::Status(status.as_u16()));
        }

        response
            .json::<QuestSuggestion>()
            .await
            .map_err(|e| JudgeError::MalformedResponse(e.to_string()))
    }
}

fn classify_reqwest_error(e: reqwest::Error) -> JudgeError {
    if e.is_timeout() {
        JudgeError::Timeout
    } else {
        JudgeError::Transport(e.to_string())
    }
}
