use crate::config::ClientConfig;
use crate::error::BackendError;
use crate::state::Strategy;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::future::Future;
use tracing::debug;

/// Body of `POST {base}/basic_lesk` and `POST {base}/extended_lesk`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenseRequest {
    pub context_sentence: String,
    pub ambiguous_word: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenseResponse {
    pub sense: String,
    pub definition: String,
    #[serde(rename = "cleanedSentence")]
    pub cleaned_sentence: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_signature: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_signature: Option<Vec<String>>,
}

/// A hypernym or hyponym reference inside a [`SenseRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedSense {
    pub sense: String,
    pub definition: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenseRecord {
    pub sense: String,
    pub definition: String,
    #[serde(default)]
    pub hypernyms: Vec<RelatedSense>,
    #[serde(default)]
    pub hyponyms: Vec<RelatedSense>,
}

/// Word metadata from `GET {base}/word_info/{word}`.
///
/// The body is kept verbatim for raw display next to the parsed sense list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordInfo {
    pub raw: Value,
    pub senses: Vec<SenseRecord>,
}

impl WordInfo {
    pub fn from_raw(raw: Value) -> Result<Self, BackendError> {
        let senses = Vec::<SenseRecord>::deserialize(&raw)?;
        Ok(Self { raw, senses })
    }

    pub fn from_senses(senses: Vec<SenseRecord>) -> Self {
        let raw = serde_json::to_value(&senses).unwrap_or(Value::Null);
        Self { raw, senses }
    }
}

/// The disambiguation service as seen by the controller.
pub trait WsdBackend {
    fn disambiguate(
        &self,
        strategy: Strategy,
        request: &SenseRequest,
    ) -> impl Future<Output = Result<SenseResponse, BackendError>> + Send;

    fn word_info(&self, word: &str) -> impl Future<Output = Result<WordInfo, BackendError>> + Send;
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// [`WsdBackend`] over HTTP.
#[derive(Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(config: &ClientConfig) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    pub fn sense_url(&self, strategy: Strategy) -> String {
        format!("{}/{}", self.base_url, strategy.endpoint())
    }

    pub fn word_info_url(&self, word: &str) -> String {
        format!(
            "{}/word_info/{}",
            self.base_url,
            utf8_percent_encode(word, NON_ALPHANUMERIC)
        )
    }

    async fn read_body(response: reqwest::Response) -> Result<Vec<u8>, BackendError> {
        let status = response.status();
        let bytes = response.bytes().await?;
        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&bytes)
                .map(|body| body.error)
                .unwrap_or_else(|_| String::from_utf8_lossy(&bytes).trim().to_string());
            return Err(BackendError::Status {
                status: status.as_u16(),
                message,
            });
        }
        Ok(bytes.to_vec())
    }
}

impl WsdBackend for HttpBackend {
    async fn disambiguate(
        &self,
        strategy: Strategy,
        request: &SenseRequest,
    ) -> Result<SenseResponse, BackendError> {
        let url = self.sense_url(strategy);
        debug!(%url, word = %request.ambiguous_word, "POST sense lookup");
        let response = self.client.post(&url).json(request).send().await?;
        let body = Self::read_body(response).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn word_info(&self, word: &str) -> Result<WordInfo, BackendError> {
        let url = self.word_info_url(word);
        debug!(%url, "GET word info");
        let response = self.client.get(&url).send().await?;
        let body = Self::read_body(response).await?;
        let raw: Value = serde_json::from_slice(&body)?;
        WordInfo::from_raw(raw)
    }
}
