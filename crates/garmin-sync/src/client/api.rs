//! Garmin Connect API client for authenticated requests
//!
//! Requests block the calling thread; one sync run fetches its five data
//! sources sequentially and never holds a connection across the persist
//! phase.

use chrono::NaiveDate;
use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, USER_AGENT};
use reqwest::StatusCode;
use serde_json::Value;

use crate::client::tokens::OAuth2Token;
use crate::error::{Result, SyncError};

/// User agent for Connect API requests
const API_USER_AGENT: &str = "GCM-iOS-5.7.2.1";

/// The fetch boundary consumed by the sync orchestrator, one method per
/// data source. Each returns the raw JSON payload for the given date.
pub trait GarminApi {
    fn stats_and_body(&self, date: NaiveDate) -> Result<Value>;
    fn hydration(&self, date: NaiveDate) -> Result<Value>;
    fn sleep(&self, date: NaiveDate) -> Result<Value>;
    fn hrv(&self, date: NaiveDate) -> Result<Value>;
    fn activities_for_date(&self, date: NaiveDate) -> Result<Value>;
}

/// Garmin Connect API client
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: OAuth2Token,
    display_name: Option<String>,
}

impl ApiClient {
    /// Create a new API client for the given domain
    pub fn new(domain: &str, token: OAuth2Token) -> Result<Self> {
        Self::new_with_base_url(&format!("https://connectapi.{}", domain), token)
    }

    /// Create a new API client with a custom base URL (for testing)
    #[doc(hidden)]
    pub fn new_with_base_url(base_url: &str, token: OAuth2Token) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(SyncError::Http)?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
            token,
            display_name: None,
        })
    }

    /// Resolve the account display name used in per-user endpoint paths.
    ///
    /// This is the pre-flight authentication check: it is the first call
    /// of a run, and a failure here aborts before any data fetch.
    pub fn resolve_profile(&mut self) -> Result<&str> {
        let profile: Value = self.get_json("/userprofile-service/socialProfile")?;

        let name = profile
            .get("displayName")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| SyncError::auth("Could not resolve account display name"))?;

        self.display_name = Some(name);
        Ok(self.display_name.as_deref().unwrap_or_default())
    }

    fn display_name(&self) -> Result<&str> {
        self.display_name
            .as_deref()
            .ok_or_else(|| SyncError::auth("Account profile not resolved"))
    }

    /// Build the full URL for a given path
    fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Build headers with authorization
    fn build_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(API_USER_AGENT));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&self.token.authorization_header())
                .map_err(|_| SyncError::auth("Token is not a valid header value"))?,
        );
        Ok(headers)
    }

    /// Make an authenticated GET request and deserialize the JSON response
    fn get_json(&self, path: &str) -> Result<Value> {
        let url = self.build_url(path);
        let headers = self.build_headers()?;

        let response = self
            .client
            .get(&url)
            .headers(headers)
            .send()
            .map_err(SyncError::Http)?;

        let response = self.handle_response_status(response)?;
        response.json().map_err(|e| {
            SyncError::invalid_response(format!("Failed to parse JSON response: {}", e))
        })
    }

    /// Handle response status codes and convert to errors
    fn handle_response_status(&self, response: Response) -> Result<Response> {
        let status = response.status();

        match status {
            StatusCode::OK
            | StatusCode::CREATED
            | StatusCode::ACCEPTED
            | StatusCode::NO_CONTENT => Ok(response),
            StatusCode::UNAUTHORIZED => Err(SyncError::NotAuthenticated),
            StatusCode::TOO_MANY_REQUESTS => Err(SyncError::RateLimited),
            StatusCode::NOT_FOUND => Err(SyncError::NotFound(response.url().path().to_string())),
            _ => {
                let body = response.text().unwrap_or_default();
                Err(SyncError::Api {
                    status: status.as_u16(),
                    message: body,
                })
            }
        }
    }
}

impl GarminApi for ApiClient {
    fn stats_and_body(&self, date: NaiveDate) -> Result<Value> {
        let path = format!(
            "/usersummary-service/usersummary/daily/{}?calendarDate={}",
            self.display_name()?,
            date
        );
        self.get_json(&path)
    }

    fn hydration(&self, date: NaiveDate) -> Result<Value> {
        self.get_json(&format!(
            "/usersummary-service/usersummary/hydration/daily/{}",
            date
        ))
    }

    fn sleep(&self, date: NaiveDate) -> Result<Value> {
        let path = format!(
            "/wellness-service/wellness/dailySleepData/{}?date={}&nonSleepBufferMinutes=60",
            self.display_name()?,
            date
        );
        self.get_json(&path)
    }

    fn hrv(&self, date: NaiveDate) -> Result<Value> {
        self.get_json(&format!("/hrv-service/hrv/{}", date))
    }

    fn activities_for_date(&self, date: NaiveDate) -> Result<Value> {
        let path = format!(
            "/activitylist-service/activities/search/activities?limit=100&start=0&startDate={}&endDate={}",
            date, date
        );
        self.get_json(&path)
    }
}
