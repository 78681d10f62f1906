//! Stream-lookup service client
//!
//! Resolves an external id (plus season/episode for series) into named
//! stream variants and caption tracks. The endpoint is positional: the
//! movie form is `/{id}`, the series form appends `/{season}/{episode}`.

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::time::Duration;
use tracing::debug;

use crate::error::SessionError;
use crate::models::{CaptionTrack, MediaSummary, SeasonEpisode, StreamLookup, StreamVariant};

/// Client for the local stream-lookup service
pub struct LookupClient {
    base_url: String,
    client: reqwest::Client,
}

impl LookupClient {
    /// Create a client against the default local endpoint
    pub fn new() -> Self {
        Self::with_base_url("http://localhost:8657")
    }

    /// Create a client with a custom base URL (config override or tests)
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
        }
    }

    /// Look up stream variants and caption tracks for a title.
    ///
    /// A response without a stream payload (or one that does not parse)
    /// is not an error: it yields an empty lookup, which the caller
    /// treats as "nothing playable". Only transport failures propagate.
    pub async fn lookup(
        &self,
        external_id: &str,
        episode: Option<&SeasonEpisode>,
    ) -> Result<StreamLookup, SessionError> {
        let url = match episode {
            Some(ep) => format!("{}/{}/{}/{}", self.base_url, external_id, ep.season, ep.episode),
            None => format!("{}/{}", self.base_url, external_id),
        };
        let upstream = |source| SessionError::UpstreamUnavailable {
            step: "stream lookup",
            source,
        };

        let body = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(upstream)?
            .text()
            .await
            .map_err(upstream)?;

        let response: LookupResponse = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(err) => {
                debug!(%err, "lookup response did not parse, treating as empty");
                return Ok(StreamLookup::default());
            }
        };

        let Some(stream) = response.stream else {
            return Ok(StreamLookup::default());
        };

        let captions = stream
            .captions
            .into_iter()
            .filter_map(|c| c.into_track())
            .collect();

        Ok(StreamLookup {
            variants: stream.qualities,
            captions,
            media: response.media,
        })
    }
}

impl Default for LookupClient {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Response Structures (internal deserialization)
// =============================================================================

#[derive(Debug, Default, Deserialize)]
struct LookupResponse {
    stream: Option<StreamPayload>,
    #[serde(default)]
    media: MediaSummary,
}

#[derive(Debug, Default, Deserialize)]
struct StreamPayload {
    #[serde(default, deserialize_with = "ordered_variants")]
    qualities: Vec<StreamVariant>,
    #[serde(default)]
    captions: Vec<CaptionRaw>,
}

#[derive(Debug, Deserialize)]
struct VariantRaw {
    #[serde(rename = "type")]
    source_type: Option<String>,
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CaptionRaw {
    language: Option<String>,
    #[serde(rename = "type")]
    source_type: Option<String>,
    url: Option<String>,
    #[serde(default)]
    opensubtitles: bool,
}

impl CaptionRaw {
    /// A track without a language or URL is unusable; drop it here so
    /// the rest of the pipeline never re-checks.
    fn into_track(self) -> Option<CaptionTrack> {
        Some(CaptionTrack {
            language: self.language?,
            source_type: self.source_type.unwrap_or_default(),
            url: self.url?,
            opensubtitles: self.opensubtitles,
        })
    }
}

/// Deserialize the qualities object into a Vec that keeps the document
/// order of its keys. The "preferred quality first" display rule relies
/// on the remaining variants staying in insertion order.
fn ordered_variants<'de, D>(deserializer: D) -> Result<Vec<StreamVariant>, D::Error>
where
    D: Deserializer<'de>,
{
    struct QualityMapVisitor;

    impl<'de> Visitor<'de> for QualityMapVisitor {
        type Value = Vec<StreamVariant>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of quality label to stream entry")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut variants = Vec::new();
            while let Some((quality, entry)) = map.next_entry::<String, VariantRaw>()? {
                // Entries without a URL cannot be played; skip them.
                if let Some(url) = entry.url {
                    variants.push(StreamVariant {
                        quality,
                        source_type: entry.source_type.unwrap_or_default(),
                        url,
                    });
                }
            }
            Ok(variants)
        }
    }

    deserializer.deserialize_map(QualityMapVisitor)
}
