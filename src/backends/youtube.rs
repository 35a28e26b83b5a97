//! YouTube Data API v3 adapter implementation.

use std::time::Duration;

use log::debug;
use serde_json::Value;

use crate::backends::{CandidateItem, ItemMetadata, SearchClient, SearchPage, SearchRequest};
use crate::config::YoutubeConfig;
use crate::error::{FindError, Result};

pub const DEFAULT_API_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// YouTube Data API adapter backed by `ureq`.
pub struct YouTubeDataAdapter {
    http_client: ureq::Agent,
    api_base_url: String,
    api_key: String,
}

impl YouTubeDataAdapter {
    /// Creates a new adapter bound to one API key.
    pub fn new(api_key: String, config: &YoutubeConfig) -> Self {
        let http_client = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(config.connect_timeout_secs))
            .timeout_read(Duration::from_secs(config.read_timeout_secs))
            .timeout_write(Duration::from_secs(config.read_timeout_secs))
            .build();
        Self {
            http_client,
            api_base_url: Self::endpoint_base(&config.api_base_url),
            api_key,
        }
    }

    fn endpoint_base(endpoint: &str) -> String {
        let trimmed = endpoint.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            DEFAULT_API_BASE_URL.to_string()
        } else {
            trimmed.to_string()
        }
    }

    fn api_url(&self, resource: &str, params: &[(&str, String)]) -> String {
        let mut query_parts: Vec<String> = params
            .iter()
            .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
            .collect();
        query_parts.push(format!("key={}", urlencoding::encode(&self.api_key)));
        format!("{}/{}?{}", self.api_base_url, resource, query_parts.join("&"))
    }

    fn request_json(&self, operation: &str, url: &str) -> Result<Value> {
        let response = self.http_client.get(url).call().map_err(|err| match err {
            ureq::Error::Status(status, response) => {
                let body = response.into_string().unwrap_or_default();
                FindError::source_unavailable(operation, Self::status_detail(status, &body))
            }
            ureq::Error::Transport(transport) => {
                FindError::source_unavailable(operation, transport.to_string())
            }
        })?;
        response.into_json::<Value>().map_err(|err| {
            FindError::source_unavailable(operation, format!("response parse failed: {err}"))
        })
    }

    fn status_detail(status: u16, body: &str) -> String {
        let message = serde_json::from_str::<Value>(body).ok().and_then(|parsed| {
            parsed
                .get("error")
                .and_then(|value| value.get("message"))
                .and_then(Value::as_str)
                .map(ToOwned::to_owned)
        });
        match message {
            Some(message) => format!("HTTP {status}: {message}"),
            None => format!("HTTP {status}"),
        }
    }

    fn array_items(payload: &Value) -> &[Value] {
        payload
            .get("items")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    fn parse_search_page(payload: &Value) -> SearchPage {
        let items = Self::array_items(payload)
            .iter()
            .filter_map(|item| {
                item.get("id")
                    .and_then(|value| value.get("videoId"))
                    .and_then(Value::as_str)
                    .map(|video_id| CandidateItem {
                        video_id: video_id.to_string(),
                    })
            })
            .collect();
        let next_page_token = payload
            .get("nextPageToken")
            .and_then(Value::as_str)
            .map(ToOwned::to_owned);
        SearchPage {
            items,
            next_page_token,
        }
    }

    fn parse_item_metadata(item: &Value) -> Option<ItemMetadata> {
        let video_id = item.get("id")?.as_str()?.to_string();
        let default_audio_language = item
            .get("snippet")
            .and_then(|value| value.get("defaultAudioLanguage"))
            .and_then(Value::as_str)
            .map(ToOwned::to_owned);
        Some(ItemMetadata {
            video_id,
            default_audio_language,
        })
    }

    fn search_params(
        request: &SearchRequest,
        page_token: Option<&str>,
    ) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("part", request.part.clone()),
            ("q", request.keyword.clone()),
            ("type", request.result_type.clone()),
            ("order", request.order.clone()),
            ("maxResults", request.page_size.to_string()),
        ];
        if let Some(token) = page_token.filter(|token| !token.is_empty()) {
            params.push(("pageToken", token.to_string()));
        }
        if let Some(region_code) = &request.region_code {
            params.push(("regionCode", region_code.clone()));
        }
        if let Some(published_after) = &request.published_after {
            params.push(("publishedAfter", published_after.clone()));
        }
        params
    }
}

impl SearchClient for YouTubeDataAdapter {
    fn search_page(
        &self,
        request: &SearchRequest,
        page_token: Option<&str>,
    ) -> Result<SearchPage> {
        let url = self.api_url("search", &Self::search_params(request, page_token));
        debug!(
            "search.list q='{}' order={} page_token={:?}",
            request.keyword, request.order, page_token
        );
        let payload = self.request_json("search.list", &url)?;
        Ok(Self::parse_search_page(&payload))
    }

    fn lookup_items(&self, joined_ids: &str, part: &str) -> Result<Vec<ItemMetadata>> {
        let url = self.api_url(
            "videos",
            &[("part", part.to_string()), ("id", joined_ids.to_string())],
        );
        debug!("videos.list part={} ids={}", part, joined_ids);
        let payload = self.request_json("videos.list", &url)?;
        Ok(Self::array_items(&payload)
            .iter()
            .filter_map(Self::parse_item_metadata)
            .collect())
    }
}
