//! Upstream data API.
//!
//! The rules site is a Next.js app: every page has a JSON twin at
//! `{base}/_next/data/{build_id}/{route}/{slug}.json`. The build id changes on
//! every deploy and is read from the home page.

use std::time::Duration;

use regex::Regex;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::config::SiteConfig;
use crate::model::ContentKind;
use crate::{debug, log};

/// Embedded Next.js bootstrap payload.
const NEXT_DATA: &str = r#"(?s)<script[^>]*id=["']__NEXT_DATA__["'][^>]*>(.*?)</script>"#;

/// Any data URL that leaks the build id.
const DATA_PATH: &str = r#"/_next/data/([^/"]+)/"#;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request to {url} failed")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid JSON from {url}")]
    Json {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not detect the build id from {0}; use --build <id> to supply it manually")]
    BuildId(String),

    #[error("no 'fields' in JSON response; the build id may be stale")]
    MissingFields,
}

// ============================================================================
// Build id
// ============================================================================

/// Build id and where it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildId {
    /// `buildId` of the `__NEXT_DATA__` payload.
    NextData(String),
    /// First `/_next/data/<id>/` path in the page.
    Fallback(String),
}

impl BuildId {
    pub fn into_id(self) -> String {
        match self {
            Self::NextData(id) | Self::Fallback(id) => id,
        }
    }
}

/// Find the build id in the site's home page markup.
pub fn detect_build_id(html: &str) -> Option<BuildId> {
    let from_payload = Regex::new(NEXT_DATA)
        .ok()
        .and_then(|re| re.captures(html))
        .and_then(|caps| serde_json::from_str::<Value>(&caps[1]).ok())
        .and_then(|payload| {
            payload
                .get("buildId")
                .and_then(Value::as_str)
                .filter(|id| !id.is_empty())
                .map(str::to_owned)
        });
    if let Some(id) = from_payload {
        return Some(BuildId::NextData(id));
    }

    let caps = Regex::new(DATA_PATH).ok()?.captures(html)?;
    Some(BuildId::Fallback(caps[1].to_owned()))
}

/// JSON twin of an entry page.
pub fn data_url(base: &str, build_id: &str, kind: ContentKind, slug: &str) -> String {
    format!(
        "{}/_next/data/{}/{}/{}.json",
        base.trim_end_matches('/'),
        build_id,
        kind.route(),
        slug
    )
}

/// `pageProps.entry.fields` of a data payload. Absent or empty is an error.
pub fn extract_fields(payload: &Value) -> Result<&Map<String, Value>, SourceError> {
    payload
        .pointer("/pageProps/entry/fields")
        .and_then(Value::as_object)
        .filter(|fields| !fields.is_empty())
        .ok_or(SourceError::MissingFields)
}

// ============================================================================
// Client
// ============================================================================

/// Blocking HTTP client bound to one site.
pub struct Client {
    http: reqwest::blocking::Client,
    base_url: String,
}

impl Client {
    pub fn new(site: &SiteConfig) -> Result<Self, SourceError> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(site.user_agent.as_str())
            .timeout(Duration::from_secs(site.timeout_secs))
            .build()
            .map_err(|source| SourceError::Http {
                url: site.base().to_owned(),
                source,
            })?;
        Ok(Self {
            http,
            base_url: site.base().to_owned(),
        })
    }

    /// GET `url`, failing on non-2xx statuses.
    pub fn get_text(&self, url: &str) -> Result<String, SourceError> {
        let http_err = |source: reqwest::Error| SourceError::Http {
            url: url.to_owned(),
            source,
        };
        self.http
            .get(url)
            .send()
            .and_then(reqwest::blocking::Response::error_for_status)
            .and_then(reqwest::blocking::Response::text)
            .map_err(http_err)
    }

    pub fn get_json(&self, url: &str) -> Result<Value, SourceError> {
        let body = self.get_text(url)?;
        serde_json::from_str(&body).map_err(|source| SourceError::Json {
            url: url.to_owned(),
            source,
        })
    }

    /// Read the current build id from the home page.
    pub fn detect_build_id(&self) -> Result<String, SourceError> {
        log!("build"; "auto-detecting build id from {}", self.base_url);
        let html = self.get_text(&self.base_url)?;
        let detected = detect_build_id(&html)
            .ok_or_else(|| SourceError::BuildId(self.base_url.clone()))?;
        match &detected {
            BuildId::NextData(id) => log!("build"; "detected build id: {}", id),
            BuildId::Fallback(id) => log!("build"; "fallback build id: {}", id),
        }
        Ok(detected.into_id())
    }

    /// Fetch the data payload of one entry.
    pub fn fetch_entry(
        &self,
        build_id: &str,
        kind: ContentKind,
        slug: &str,
    ) -> Result<Value, SourceError> {
        let url = data_url(&self.base_url, build_id, kind, slug);
        debug!("json"; "{}", url);
        self.get_json(&url)
    }
}
