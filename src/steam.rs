use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde_json::Value;
use tracing::debug;

use crate::credential::ApiKey;
use crate::domain::{AppId, AppMetadata, LanguageScope, ReviewSummary};
use crate::error::ReportError;

pub const DEFAULT_STORE_BASE_URL: &str = "https://store.steampowered.com";

/// The two storefront operations the report needs.
pub trait StoreClient {
    fn fetch_metadata(&self, id: AppId) -> Result<AppMetadata, ReportError>;
    fn fetch_review_summary(
        &self,
        id: AppId,
        scope: &LanguageScope,
    ) -> Result<ReviewSummary, ReportError>;
}

#[derive(Clone)]
pub struct StoreHttpClient {
    client: Client,
    base_url: String,
    api_key: ApiKey,
}

impl StoreHttpClient {
    pub fn new(api_key: ApiKey, base_url: &str) -> Result<Self, ReportError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("steam-review-report/{}", env!("CARGO_PKG_VERSION")))
                .map_err(|err| ReportError::StoreHttp(err.to_string()))?,
        );
        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|err| ReportError::StoreHttp(err.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn metadata_url(&self, id: AppId) -> String {
        format!("{}/api/appdetails?appids={id}", self.base_url)
    }

    pub fn reviews_url(&self, id: AppId, scope: &LanguageScope) -> String {
        format!(
            "{}/appreviews/{id}?json=1&language={}&purchase_type=all&num_per_page=0",
            self.base_url,
            scope.token()
        )
    }

    // The API key travels in the query string, so errors drop the URL.
    fn get_json(&self, url: &str) -> Result<Value, ReportError> {
        debug!(url, "store request");
        let response = self
            .client
            .get(url)
            .query(&[("key", self.api_key.expose())])
            .send()
            .map_err(|err| ReportError::StoreHttp(err.without_url().to_string()))?;
        let response = Self::handle_status(response)?;
        response
            .json()
            .map_err(|err| ReportError::StoreHttp(err.without_url().to_string()))
    }

    fn handle_status(
        response: reqwest::blocking::Response,
    ) -> Result<reqwest::blocking::Response, ReportError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let message = response
            .text()
            .unwrap_or_else(|_| "store request failed".to_string());
        Err(ReportError::StoreStatus { status, message })
    }
}

impl StoreClient for StoreHttpClient {
    fn fetch_metadata(&self, id: AppId) -> Result<AppMetadata, ReportError> {
        let raw = self.get_json(&self.metadata_url(id))?;
        extract_metadata(id, &raw)
    }

    fn fetch_review_summary(
        &self,
        id: AppId,
        scope: &LanguageScope,
    ) -> Result<ReviewSummary, ReportError> {
        let raw = self.get_json(&self.reviews_url(id, scope))?;
        extract_review_summary(id, &raw)
    }
}

/// Reads an `appdetails` response keyed by the app id.
pub fn extract_metadata(id: AppId, raw: &Value) -> Result<AppMetadata, ReportError> {
    let payload_error = |message: &str| ReportError::StorePayload {
        app_id: id.get(),
        message: message.to_string(),
    };

    let entry = raw
        .get(id.to_string())
        .ok_or_else(|| payload_error("app id missing from response"))?;
    if !entry
        .get("success")
        .and_then(|v| v.as_bool())
        .unwrap_or(false)
    {
        return Err(payload_error("store reported success=false"));
    }
    let data = entry
        .get("data")
        .ok_or_else(|| payload_error("missing data object"))?;

    let title = data
        .get("name")
        .and_then(|v| v.as_str())
        .ok_or_else(|| payload_error("missing name"))?
        .to_string();
    let genres = data
        .get("genres")
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.get("description").and_then(|v| v.as_str()))
                .map(|v| v.to_string())
                .collect()
        })
        .unwrap_or_default();
    let publishers = data
        .get("publishers")
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str())
                .map(|v| v.to_string())
                .collect()
        })
        .unwrap_or_default();
    let supported_languages = data
        .get("supported_languages")
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string();

    Ok(AppMetadata {
        title,
        genres,
        publishers,
        supported_languages,
    })
}

/// Reads the `query_summary` block of an `appreviews` response.
pub fn extract_review_summary(id: AppId, raw: &Value) -> Result<ReviewSummary, ReportError> {
    let payload_error = |message: &str| ReportError::StorePayload {
        app_id: id.get(),
        message: message.to_string(),
    };

    if raw.get("success").and_then(|v| v.as_i64()) != Some(1) {
        return Err(payload_error("store reported success!=1"));
    }
    let summary = raw
        .get("query_summary")
        .ok_or_else(|| payload_error("missing query_summary"))?;
    let count = |field: &str| summary.get(field).and_then(|v| v.as_i64()).unwrap_or(0);

    Ok(ReviewSummary {
        total_reviews: count("total_reviews"),
        total_positive: count("total_positive"),
        total_negative: count("total_negative"),
        number_reviews: count("num_reviews"),
        review_score: count("review_score"),
        score_description: summary
            .get("review_score_desc")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string(),
    })
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    #[test]
    fn extract_metadata_fields() {
        let raw = json!({
            "620": {
                "success": true,
                "data": {
                    "name": "Portal 2",
                    "genres": [
                        {"id": "1", "description": "Action"},
                        {"id": "25", "description": "Adventure"}
                    ],
                    "publishers": ["Valve"],
                    "supported_languages": "English<strong>*</strong>, Japanese"
                }
            }
        });
        let metadata = extract_metadata(AppId::new(620), &raw).unwrap();
        assert_eq!(metadata.title, "Portal 2");
        assert_eq!(metadata.genres, vec!["Action", "Adventure"]);
        assert_eq!(metadata.publishers, vec!["Valve"]);
        assert_eq!(
            metadata.supported_languages,
            "English<strong>*</strong>, Japanese"
        );
    }

    #[test]
    fn extract_metadata_defaults_missing_lists() {
        let raw = json!({"10": {"success": true, "data": {"name": "Counter-Strike"}}});
        let metadata = extract_metadata(AppId::new(10), &raw).unwrap();
        assert!(metadata.genres.is_empty());
        assert!(metadata.publishers.is_empty());
        assert_eq!(metadata.supported_languages, "");
    }

    #[test]
    fn extract_metadata_rejects_unsuccessful_entry() {
        let raw = json!({"99": {"success": false}});
        let err = extract_metadata(AppId::new(99), &raw).unwrap_err();
        assert_matches!(err, ReportError::StorePayload { app_id: 99, .. });
    }

    #[test]
    fn extract_metadata_rejects_other_app() {
        let raw = json!({"1": {"success": true, "data": {"name": "x"}}});
        let err = extract_metadata(AppId::new(2), &raw).unwrap_err();
        assert_matches!(err, ReportError::StorePayload { app_id: 2, .. });
    }

    #[test]
    fn extract_review_summary_fields() {
        let raw = json!({
            "success": 1,
            "query_summary": {
                "num_reviews": 0,
                "review_score": 9,
                "review_score_desc": "Overwhelmingly Positive",
                "total_positive": 190,
                "total_negative": 10,
                "total_reviews": 200
            },
            "reviews": []
        });
        let summary = extract_review_summary(AppId::new(620), &raw).unwrap();
        assert_eq!(summary.total_reviews, 200);
        assert_eq!(summary.total_positive, 190);
        assert_eq!(summary.total_negative, 10);
        assert_eq!(summary.number_reviews, 0);
        assert_eq!(summary.review_score, 9);
        assert_eq!(summary.score_description, "Overwhelmingly Positive");
    }

    #[test]
    fn extract_review_summary_requires_success() {
        let raw = json!({"success": 2});
        let err = extract_review_summary(AppId::new(620), &raw).unwrap_err();
        assert_matches!(err, ReportError::StorePayload { .. });
    }

    #[test]
    fn urls_include_scope_token() {
        let client =
            StoreHttpClient::new(ApiKey::new("secret".to_string()), "http://localhost/").unwrap();
        assert_eq!(
            client.metadata_url(AppId::new(620)),
            "http://localhost/api/appdetails?appids=620"
        );
        assert_eq!(
            client.reviews_url(AppId::new(620), &LanguageScope::All),
            "http://localhost/appreviews/620?json=1&language=all&purchase_type=all&num_per_page=0"
        );
    }
}
