//! HTTP client for the rendering server.

use anyhow::{Context, Result as AnyResult};
use async_trait::async_trait;
use navigator_core::{FilterOptions, QueryDescriptor};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use url::Url;

use super::{DiagramDocument, DiagramRequest, NavigatorBackend, Result, UnitProblem, UnitRef};
use crate::config::{DiagramSize, NavigatorConfig};
use crate::error::FetchError;

const GENERATE_SVG: &str = "generate_svg";
const FILTER_OPTIONS: &str = "get_filter_options";
const UNIT_PROBLEMS: &str = "get_unit_problems";
const CLEAR_CACHE: &str = "clear_cache_and_filters";

/// Body of a 404 from the diagram endpoint.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

pub struct HttpBackend {
    client: Client,
    base_url: Url,
    diagram_size: DiagramSize,
}

impl HttpBackend {
    pub fn new(config: &NavigatorConfig) -> AnyResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .context("Failed to create HTTP client")?;

        // Trailing slash so `join` appends rather than replaces the last segment.
        let base_url = Url::parse(&format!("{}/", config.base_url.trim_end_matches('/')))
            .with_context(|| format!("Invalid rendering server URL {:?}", config.base_url))?;

        Ok(Self {
            client,
            base_url,
            diagram_size: config.diagram_size,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| FetchError::Transport(format!("Bad endpoint {path}: {e}")))
    }

    /// Full diagram URL for a request, filters appended as extra parameters.
    pub fn diagram_url(&self, request: &DiagramRequest) -> Result<Url> {
        let mut url = self.endpoint(GENERATE_SVG)?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("level", request.level.as_str())
                .append_pair("parent_code", request.parent_key.as_str())
                .append_pair("visualization_type", request.mode.as_str())
                .append_pair("width", &self.diagram_size.width.to_string())
                .append_pair("height", &self.diagram_size.height.to_string());
            append_filters(&mut query, &request.filters);
        }
        Ok(url)
    }

    pub fn problems_url(&self, unit: &UnitRef, filters: &QueryDescriptor) -> Result<Url> {
        let mut url = self.endpoint(UNIT_PROBLEMS)?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("unit_code", &unit.composite_id);
            append_filters(&mut query, filters);
        }
        Ok(url)
    }
}

fn append_filters(
    query: &mut url::form_urlencoded::Serializer<'_, url::UrlQuery<'_>>,
    filters: &QueryDescriptor,
) {
    for (dimension, values) in filters.iter() {
        query.append_pair(dimension, values);
    }
}

/// Map non-success statuses to `FetchError`, passing 2xx through.
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    if status == StatusCode::NOT_FOUND {
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|b| b.error)
            .unwrap_or(body);
        return Err(FetchError::NotFound { message });
    }

    Err(FetchError::Status {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl NavigatorBackend for HttpBackend {
    async fn fetch_diagram(&self, request: &DiagramRequest) -> Result<DiagramDocument> {
        let url = self.diagram_url(request)?;
        tracing::debug!(%url, "Requesting diagram");

        let response = check_status(self.client.get(url).send().await?).await?;
        let markup = response.text().await?;
        Ok(DiagramDocument::new(markup))
    }

    async fn fetch_filter_options(&self) -> Result<FilterOptions> {
        let url = self.endpoint(FILTER_OPTIONS)?;
        let response = check_status(self.client.get(url).send().await?).await?;
        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| FetchError::Decode(e.to_string()))
    }

    async fn fetch_unit_problems(
        &self,
        unit: &UnitRef,
        filters: &QueryDescriptor,
    ) -> Result<Vec<UnitProblem>> {
        let url = self.problems_url(unit, filters)?;
        tracing::debug!(%url, unit = %unit.identity, "Requesting unit problems");

        let response = check_status(self.client.get(url).send().await?).await?;
        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| FetchError::Decode(e.to_string()))
    }

    async fn clear_server_cache(&self) -> Result<()> {
        let url = self.endpoint(CLEAR_CACHE)?;
        check_status(self.client.post(url).send().await?).await?;
        Ok(())
    }
}
