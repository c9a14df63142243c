//! Catalog provider
//!
//! Fetches one source file per declared animal id, in parallel, and falls
//! back to the embedded table for any id whose file is unavailable. Loading
//! never fails: the result is whatever subset could be assembled.

use std::path::PathBuf;
use std::time::Duration;

use futures::future::join_all;
use reqwest::StatusCode;
use thiserror::Error;

use super::fallback::{fallback_record, ANIMAL_IDS};
use crate::error::AppError;
use crate::models::{Catalog, Entity, EntityRecord};

/// Why a single source file could not be used
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP {0}")]
    Status(StatusCode),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Read failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("No source configured")]
    NoSource,
}

/// Where entity source files live
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntitySource {
    /// `<base_url>/<id>.json`
    Http { base_url: String },
    /// `<dir>/<id>.json`
    Dir(PathBuf),
    /// Skip fetching, use the embedded table only
    EmbeddedOnly,
}

impl EntitySource {
    /// Interpret a config value: URL, the word `embedded`, or a directory
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.starts_with("http://") || value.starts_with("https://") {
            EntitySource::Http {
                base_url: value.trim_end_matches('/').to_string(),
            }
        } else if value.eq_ignore_ascii_case("embedded") || value.is_empty() {
            EntitySource::EmbeddedOnly
        } else {
            EntitySource::Dir(PathBuf::from(value))
        }
    }
}

/// Where each catalog entry came from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub from_source: Vec<String>,
    pub from_fallback: Vec<String>,
    pub missing: Vec<String>,
}

impl LoadReport {
    pub fn loaded(&self) -> usize {
        self.from_source.len() + self.from_fallback.len()
    }

    pub fn requested(&self) -> usize {
        self.loaded() + self.missing.len()
    }

    /// One `DataUnavailable` per id that no source could provide
    pub fn errors(&self) -> Vec<AppError> {
        self.missing
            .iter()
            .map(|id| AppError::DataUnavailable { id: id.clone() })
            .collect()
    }
}

enum Origin {
    Source,
    Fallback,
}

/// Catalog loader
pub struct ContentProvider {
    source: EntitySource,
    ids: Vec<String>,
    client: reqwest::Client,
}

impl ContentProvider {
    /// Provider for the declared animal list
    pub fn new(source: EntitySource) -> Self {
        Self::with_ids(source, ANIMAL_IDS.iter().copied())
    }

    /// Provider for a custom id list (duplicates are loaded once)
    pub fn with_ids<I, S>(source: EntitySource, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for id in ids.into_iter().map(Into::into) {
            if !unique.contains(&id) {
                unique.push(id);
            }
        }

        Self {
            source,
            ids: unique,
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .unwrap_or_default(),
        }
    }

    pub fn source(&self) -> &EntitySource {
        &self.source
    }

    /// Load the catalog. Never fails; may return an empty catalog.
    pub async fn load_catalog(&self) -> Catalog {
        self.load_catalog_with_report().await.0
    }

    /// Load the catalog and report which ids fell back or went missing
    pub async fn load_catalog_with_report(&self) -> (Catalog, LoadReport) {
        tracing::info!(source = ?self.source, "loading {} animals", self.ids.len());

        // join_all yields results in input order regardless of completion order
        let results = join_all(self.ids.iter().map(|id| self.load_entity(id))).await;

        let mut report = LoadReport::default();
        let mut entities = Vec::with_capacity(results.len());
        for (id, result) in self.ids.iter().zip(results) {
            match result {
                Some((entity, Origin::Source)) => {
                    report.from_source.push(id.clone());
                    entities.push(entity);
                }
                Some((entity, Origin::Fallback)) => {
                    report.from_fallback.push(id.clone());
                    entities.push(entity);
                }
                None => report.missing.push(id.clone()),
            }
        }

        tracing::info!(
            "loaded {} of {} animals ({} from fallback)",
            report.loaded(),
            report.requested(),
            report.from_fallback.len()
        );
        if !report.from_fallback.is_empty() && !matches!(self.source, EntitySource::EmbeddedOnly) {
            tracing::warn!("some animals loaded from embedded data: {:?}", report.from_fallback);
        }

        (Catalog::new(entities), report)
    }

    async fn load_entity(&self, id: &str) -> Option<(Entity, Origin)> {
        match self.fetch_record(id).await {
            Ok(record) => {
                tracing::debug!("loaded {} from source", id);
                Some((Entity::from_record(id, record), Origin::Source))
            }
            Err(e) => {
                if !matches!(e, FetchError::NoSource) {
                    tracing::warn!("failed to load {} from source, using fallback: {}", id, e);
                }
                match fallback_record(id) {
                    Some(record) => Some((Entity::from_record(id, record), Origin::Fallback)),
                    None => {
                        tracing::error!("no fallback data available for {}", id);
                        None
                    }
                }
            }
        }
    }

    /// Fetch and parse a single source file
    pub async fn fetch_record(&self, id: &str) -> Result<EntityRecord, FetchError> {
        match &self.source {
            EntitySource::Http { base_url } => {
                let url = format!("{}/{}.json", base_url, urlencoding::encode(id));
                let response = self.client.get(&url).send().await?;

                let status = response.status();
                if !status.is_success() {
                    return Err(FetchError::Status(status));
                }

                let body = response.text().await?;
                Ok(serde_json::from_str(&body)?)
            }
            EntitySource::Dir(dir) => {
                let path = dir.join(format!("{}.json", id));
                let body = tokio::fs::read_to_string(&path).await?;
                Ok(serde_json::from_str(&body)?)
            }
            EntitySource::EmbeddedOnly => Err(FetchError::NoSource),
        }
    }
}
