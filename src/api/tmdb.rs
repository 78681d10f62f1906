//! TMDB (The Movie Database) API client
//!
//! Provides title search, detail + external-id resolution, and
//! season/episode listings. API docs: https://developer.themoviedb.org/docs

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

use crate::error::SessionError;
use crate::models::{EpisodeSummary, MediaKind, ResolvedTitle, TitleCandidate};

/// TMDB API client
pub struct TmdbClient {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl TmdbClient {
    /// Create a new TMDB client with the given API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, "https://api.themoviedb.org/3")
    }

    /// Create a client with a custom base URL (for testing)
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
        }
    }

    /// Make an authenticated GET request. Provider failures propagate
    /// as `UpstreamUnavailable`; nothing retries.
    async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, SessionError> {
        let url = format!("{}{}", self.base_url, endpoint);
        let upstream = |source| SessionError::UpstreamUnavailable {
            step: "metadata",
            source,
        };

        self.client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(upstream)?
            .error_for_status()
            .map_err(upstream)?
            .json::<T>()
            .await
            .map_err(upstream)
    }

    /// Search for movies and TV shows. Person results (and anything
    /// else that is not a title) are excluded.
    pub async fn search(&self, query: &str) -> Result<Vec<TitleCandidate>, SessionError> {
        let endpoint = format!("/search/multi?query={}&page=1", urlencoding::encode(query));
        let response: SearchResponse = self.get(&endpoint).await?;
        Ok(response
            .results
            .into_iter()
            .filter_map(|r| r.into_candidate())
            .collect())
    }

    /// Resolve a candidate into a playable title. The detail and
    /// external-id endpoints are independent, so both requests are
    /// issued concurrently and joined.
    pub async fn resolve(&self, candidate: &TitleCandidate) -> Result<ResolvedTitle, SessionError> {
        let path = kind_path(candidate.kind);
        let details_endpoint = format!("/{}/{}", path, candidate.search_id);
        let external_endpoint = format!("/{}/{}/external_ids", path, candidate.search_id);
        let details = self.get::<DetailResponse>(&details_endpoint);
        let external = self.get::<ExternalIdsResponse>(&external_endpoint);
        let (details, external) = tokio::try_join!(details, external)?;

        let external_id = external
            .imdb_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| SessionError::MissingExternalId(candidate.name.clone()))?;

        let title = details
            .title
            .or(details.name)
            .unwrap_or_else(|| candidate.name.clone());
        let year = details
            .release_date
            .or(details.first_air_date)
            .as_deref()
            .and_then(extract_year);

        Ok(ResolvedTitle {
            search_id: candidate.search_id,
            external_id,
            title,
            year,
            kind: candidate.kind,
        })
    }

    /// List season numbers for a series. The "season 0" specials bucket
    /// is excluded by convention.
    pub async fn seasons(&self, title: &ResolvedTitle) -> Result<Vec<u32>, SessionError> {
        let response: TvResponse = self.get(&format!("/tv/{}", title.search_id)).await?;
        let seasons: Vec<u32> = response
            .seasons
            .into_iter()
            .filter(|s| s.season_number != 0)
            .map(|s| s.season_number)
            .collect();

        if seasons.is_empty() {
            return Err(SessionError::NoSeasonsFound);
        }
        Ok(seasons)
    }

    /// List episodes for a season of a series.
    pub async fn episodes(
        &self,
        title: &ResolvedTitle,
        season: u32,
    ) -> Result<Vec<EpisodeSummary>, SessionError> {
        let response: SeasonResponse = self
            .get(&format!("/tv/{}/season/{}", title.search_id, season))
            .await?;
        let episodes: Vec<EpisodeSummary> = response
            .episodes
            .into_iter()
            .map(|e| EpisodeSummary {
                number: e.episode_number,
                name: e.name.unwrap_or_default(),
            })
            .collect();

        if episodes.is_empty() {
            return Err(SessionError::NoEpisodesFound(season));
        }
        Ok(episodes)
    }
}

fn kind_path(kind: MediaKind) -> &'static str {
    match kind {
        MediaKind::Movie => "movie",
        MediaKind::Series => "tv",
    }
}

// =============================================================================
// Response Structures (internal deserialization)
// =============================================================================

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Vec<SearchEntryRaw>,
}

#[derive(Debug, Deserialize)]
struct SearchEntryRaw {
    id: u64,
    media_type: Option<String>,
    // Movies use "title", TV uses "name"
    title: Option<String>,
    name: Option<String>,
    // Movies use "release_date", TV uses "first_air_date"
    release_date: Option<String>,
    first_air_date: Option<String>,
}

impl SearchEntryRaw {
    fn into_candidate(self) -> Option<TitleCandidate> {
        let kind = match self.media_type.as_deref() {
            Some("movie") => MediaKind::Movie,
            Some("tv") => MediaKind::Series,
            _ => return None, // persons and other non-title entities
        };

        let name = self.title.or(self.name).unwrap_or_default();
        let year = self
            .release_date
            .or(self.first_air_date)
            .as_deref()
            .and_then(extract_year);

        Some(TitleCandidate {
            search_id: self.id,
            name,
            kind,
            year,
        })
    }
}

#[derive(Debug, Deserialize)]
struct DetailResponse {
    title: Option<String>,
    name: Option<String>,
    release_date: Option<String>,
    first_air_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ExternalIdsResponse {
    imdb_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TvResponse {
    seasons: Vec<SeasonSummaryRaw>,
}

#[derive(Debug, Deserialize)]
struct SeasonSummaryRaw {
    season_number: u32,
}

#[derive(Debug, Deserialize)]
struct SeasonResponse {
    episodes: Vec<EpisodeRaw>,
}

#[derive(Debug, Deserialize)]
struct EpisodeRaw {
    episode_number: u32,
    name: Option<String>,
}

/// Extract year from a date string like "2021-09-15"
fn extract_year(date: &str) -> Option<u16> {
    if date.len() >= 4 {
        date[..4].parse().ok()
    } else {
        None
    }
}
