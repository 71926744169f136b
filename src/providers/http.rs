//! HTTP provider for the statistics service

use reqwest::{Client, Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::ClientConfig;
use crate::provider::StatsProvider;
use crate::types::{
    ApiEnvelope, CheckCombinationRequest, CombinationQueryResult, ErrorEnvelope, FrequencyCategory,
    FrequencyPayload, Game, GeneratedCombination, GenerationMode, LatestResultsPage,
    NumberFrequency, PositionFrequency, PositionFrequencyPayload,
};
use crate::{LottoError, Result};

const NUMBER_FREQUENCIES: &str = "number-frequencies";
const POSITION_FREQUENCIES: &str = "position-frequencies";
const LATEST_COMBINATIONS: &str = "latest-combinations";
const CHECK_COMBINATION: &str = "check-combination";

/// A single request against one game's endpoints.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub game: Game,
    /// Path below the game slug, e.g. `number-frequencies`
    pub endpoint: String,
    pub method: Method,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    /// GET request without parameters.
    pub fn get(game: Game, endpoint: impl Into<String>) -> Self {
        Self { game, endpoint: endpoint.into(), method: Method::GET, query: Vec::new(), body: None }
    }

    /// POST request carrying `body` as JSON.
    pub fn post<B: Serialize>(game: Game, endpoint: impl Into<String>, body: &B) -> Result<Self> {
        let endpoint = endpoint.into();
        let body = serde_json::to_value(body).map_err(|e| {
            LottoError::invalid_endpoint(endpoint.clone(), format!("cannot encode request body: {}", e))
        })?;
        Ok(Self { game, endpoint, method: Method::POST, query: Vec::new(), body: Some(body) })
    }

    /// Append a query parameter.
    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }
}

/// Provider backed by the remote statistics service
pub struct HttpProvider {
    client: Client,
    config: ClientConfig,
}

impl HttpProvider {
    /// Create a provider for the configured service.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build().map_err(|e| {
            LottoError::transport_failure_with_source("failed to create HTTP client", Box::new(e))
        })?;

        info!("HTTP provider targeting {} (timeout {:?})", config.base_url, config.timeout);
        Ok(Self { client, config })
    }

    /// The configuration this provider was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Absolute URL for `request`: base, game slug, endpoint, then query.
    pub fn endpoint_url(&self, request: &ApiRequest) -> Result<Url> {
        let endpoint = request.endpoint.trim_matches('/');
        if endpoint.is_empty() || endpoint.contains(['?', '#']) {
            return Err(LottoError::invalid_endpoint(
                request.endpoint.clone(),
                "endpoint must be a non-empty path without query or fragment",
            ));
        }

        let mut url = self.config.base_url.clone();
        let base = url.to_string();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| LottoError::invalid_endpoint(base, "base URL cannot carry a path"))?;
            segments.pop_if_empty().push(request.game.endpoint_slug());
            for segment in endpoint.split('/').filter(|s| !s.is_empty()) {
                segments.push(segment);
            }
        }

        if !request.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &request.query {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }

    /// Perform `request` once and decode the body as `T`.
    pub async fn call<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        let url = self.endpoint_url(&request)?;
        debug!("{} {}", request.method, url);

        let mut builder = self.client.request(request.method.clone(), url.clone());
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            warn!("{} {} failed: {}", request.method, url, e);
            LottoError::from(e)
        })?;
        let status = response.status();
        let body = response.bytes().await?;
        debug!("{} {} -> {} ({} bytes)", request.method, url, status, body.len());

        decode_response(&request.endpoint, status, &body)
    }

    async fn call_enveloped<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        let endpoint = request.endpoint.clone();
        let envelope: ApiEnvelope<T> = self.call(request).await?;
        envelope.into_data(&endpoint)
    }
}

/// Turn a status and body into a typed result.
///
/// Non-success statuses become [`LottoError::ServerError`] carrying the
/// body's message when one decodes, else `status <code>`. Success bodies that
/// do not match `T` become [`LottoError::MalformedResponse`] naming the
/// offending field path, e.g. `data.has_more`.
pub fn decode_response<T: DeserializeOwned>(endpoint: &str, status: StatusCode, body: &[u8]) -> Result<T> {
    if !status.is_success() {
        let message = serde_json::from_slice::<ErrorEnvelope>(body)
            .ok()
            .and_then(ErrorEnvelope::into_message)
            .unwrap_or_else(|| format!("status {}", status.as_u16()));
        warn!("{} returned {}: {}", endpoint, status, message);
        return Err(LottoError::server_error(message));
    }

    let mut deserializer = serde_json::Deserializer::from_slice(body);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
        LottoError::malformed_response(format!("{}: {}: {}", endpoint, e.path(), e.inner()))
    })
}

#[async_trait::async_trait]
impl StatsProvider for HttpProvider {
    async fn fetch_frequencies(
        &self,
        game: Game,
        category: FrequencyCategory,
    ) -> Result<Vec<NumberFrequency>> {
        let request = ApiRequest::get(game, NUMBER_FREQUENCIES).query("category", category.as_query());
        let payload: FrequencyPayload = self.call_enveloped(request).await?;
        Ok(payload.frequencies)
    }

    async fn fetch_position_frequencies(
        &self,
        game: Game,
        position: Option<u8>,
    ) -> Result<Vec<PositionFrequency>> {
        let mut request = ApiRequest::get(game, POSITION_FREQUENCIES);
        if let Some(position) = position {
            request = request.query("position", position);
        }
        let payload: PositionFrequencyPayload = self.call_enveloped(request).await?;
        Ok(payload.position_frequencies)
    }

    async fn fetch_latest_results(
        &self,
        game: Game,
        page: u32,
        page_size: u32,
    ) -> Result<LatestResultsPage> {
        let request = ApiRequest::get(game, LATEST_COMBINATIONS)
            .query("page", page)
            .query("page_size", page_size);
        self.call_enveloped(request).await
    }

    async fn check_combination(
        &self,
        game: Game,
        numbers: Vec<u8>,
        special_ball: Option<u8>,
    ) -> Result<CombinationQueryResult> {
        let body = CheckCombinationRequest::new(numbers, special_ball);
        let request = ApiRequest::post(game, CHECK_COMBINATION, &body)?;
        self.call_enveloped(request).await
    }

    async fn generate_combination(
        &self,
        game: Game,
        mode: GenerationMode,
    ) -> Result<GeneratedCombination> {
        self.call(ApiRequest::get(game, mode.endpoint())).await
    }
}
