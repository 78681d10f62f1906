//! Data structures and types for reelstream
//!
//! Contains all shared models used across the application organized by domain:
//! - **Search**: title candidates and resolved titles from the metadata provider
//! - **Streams**: stream variants and caption tracks from the lookup service
//! - **Playback**: the per-run session record
//! - **Progress**: durable resume history entries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Search Models
// =============================================================================

/// Media type discriminator for search results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Movie,
    Series,
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::Movie => write!(f, "Movie"),
            MediaKind::Series => write!(f, "Series"),
        }
    }
}

/// One row of the title search result list, as offered to the user.
/// Discarded after selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TitleCandidate {
    pub search_id: u64,
    pub name: String,
    pub kind: MediaKind,
    pub year: Option<u16>,
}

impl fmt::Display for TitleCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.year {
            Some(year) => write!(f, "{} ({})", self.name, year),
            None => write!(f, "{} (N/A)", self.name),
        }
    }
}

/// A candidate joined with its cross-provider id and display metadata.
/// `external_id` is guaranteed non-empty; the resolver fails with
/// `MissingExternalId` rather than produce one without it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedTitle {
    pub search_id: u64,
    pub external_id: String,
    pub title: String,
    pub year: Option<u16>,
    pub kind: MediaKind,
}

impl ResolvedTitle {
    pub fn year_label(&self) -> String {
        self.year
            .map(|y| y.to_string())
            .unwrap_or_else(|| "N/A".to_string())
    }
}

impl fmt::Display for ResolvedTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.title, self.year_label())
    }
}

/// Season/episode pair for series playback. Both numbers live in one
/// struct so a session can never carry one without the other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonEpisode {
    pub season: u32,
    pub episode: u32,
    pub name: Option<String>,
}

impl fmt::Display for SeasonEpisode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Season {} Episode {}", self.season, self.episode)?;
        if let Some(name) = &self.name {
            write!(f, " - {}", name)?;
        }
        Ok(())
    }
}

/// One row of the episode picker for a season.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeSummary {
    pub number: u32,
    pub name: String,
}

impl fmt::Display for EpisodeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "Episode {}", self.number)
        } else {
            write!(f, "Episode {} - {}", self.number, self.name)
        }
    }
}

// =============================================================================
// Stream Models
// =============================================================================

/// One playable rendition of a title at a given quality tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamVariant {
    pub quality: String,
    pub source_type: String,
    pub url: String,
}

impl fmt::Display for StreamVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.quality, self.source_type)
    }
}

/// A subtitle resource, downloadable independently of the video stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptionTrack {
    pub language: String,
    pub source_type: String,
    pub url: String,
    #[serde(default)]
    pub opensubtitles: bool,
}

impl fmt::Display for CaptionTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.language, self.source_type)?;
        if self.opensubtitles {
            write!(f, " opensubtitles")?;
        }
        Ok(())
    }
}

/// Loosely-typed `media` block of a lookup response, validated at the
/// boundary so nothing downstream re-checks for missing fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaSummary {
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub year: Option<u16>,
}

/// Everything one lookup call yields. Empty variants mean "nothing
/// playable", which the orchestrator reports without launching.
#[derive(Debug, Clone, Default)]
pub struct StreamLookup {
    pub variants: Vec<StreamVariant>,
    pub captions: Vec<CaptionTrack>,
    pub media: MediaSummary,
}

// =============================================================================
// Playback Models
// =============================================================================

/// The complete record of one run's choices. Constructed once after
/// selection, never mutated, handed to the launcher and the store.
#[derive(Debug, Clone)]
pub struct PlaybackSession {
    pub title: ResolvedTitle,
    pub episode: Option<SeasonEpisode>,
    pub stream: StreamVariant,
    pub caption: Option<CaptionTrack>,
}

// =============================================================================
// Progress Models
// =============================================================================

/// Durable resume-history entry, keyed by the search id so replaying a
/// title updates rather than duplicates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressEntry {
    pub id: u64,
    pub title: String,
    pub year: Option<u16>,
    pub kind: MediaKind,
    pub episode: Option<SeasonEpisode>,
    pub played_at: DateTime<Utc>,
}

impl ProgressEntry {
    /// Entry for a freshly selected session; the store stamps the
    /// actual time at write.
    pub fn from_session(title: &ResolvedTitle, episode: Option<&SeasonEpisode>) -> Self {
        Self {
            id: title.search_id,
            title: title.title.clone(),
            year: title.year,
            kind: title.kind,
            episode: episode.cloned(),
            played_at: Utc::now(),
        }
    }
}

impl fmt::Display for ProgressEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let year = self
            .year
            .map(|y| y.to_string())
            .unwrap_or_else(|| "N/A".to_string());
        write!(f, "{} ({})", self.title, year)?;
        if let Some(episode) = &self.episode {
            write!(f, " - {}", episode)?;
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // MediaKind Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_media_kind_display() {
        assert_eq!(MediaKind::Movie.to_string(), "Movie");
        assert_eq!(MediaKind::Series.to_string(), "Series");
    }

    #[test]
    fn test_media_kind_serde() {
        let json = serde_json::to_string(&MediaKind::Movie).unwrap();
        assert_eq!(json, "\"movie\"");

        let parsed: MediaKind = serde_json::from_str("\"series\"").unwrap();
        assert_eq!(parsed, MediaKind::Series);
    }

    // -------------------------------------------------------------------------
    // TitleCandidate Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_candidate_display_with_year() {
        let candidate = TitleCandidate {
            search_id: 438631,
            name: "Dune".to_string(),
            kind: MediaKind::Movie,
            year: Some(2021),
        };
        assert_eq!(candidate.to_string(), "Dune (2021)");
    }

    #[test]
    fn test_candidate_display_without_year() {
        let candidate = TitleCandidate {
            search_id: 1,
            name: "Unknown Show".to_string(),
            kind: MediaKind::Series,
            year: None,
        };
        assert_eq!(candidate.to_string(), "Unknown Show (N/A)");
    }

    // -------------------------------------------------------------------------
    // Stream / Caption Display Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_stream_variant_display() {
        let variant = StreamVariant {
            quality: "720".to_string(),
            source_type: "hls".to_string(),
            url: "http://example.com/v.m3u8".to_string(),
        };
        assert_eq!(variant.to_string(), "720 (hls)");
    }

    #[test]
    fn test_caption_track_display() {
        let plain = CaptionTrack {
            language: "ar".to_string(),
            source_type: "srt".to_string(),
            url: "http://example.com/s.srt".to_string(),
            opensubtitles: false,
        };
        assert_eq!(plain.to_string(), "ar (srt)");

        let flagged = CaptionTrack {
            opensubtitles: true,
            ..plain
        };
        assert_eq!(flagged.to_string(), "ar (srt) opensubtitles");
    }

    #[test]
    fn test_caption_origin_flag_defaults_off() {
        let track: CaptionTrack = serde_json::from_str(
            r#"{"language": "en", "source_type": "srt", "url": "http://x/s.srt"}"#,
        )
        .unwrap();
        assert!(!track.opensubtitles);
    }

    // -------------------------------------------------------------------------
    // SeasonEpisode Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_season_episode_display() {
        let bare = SeasonEpisode {
            season: 1,
            episode: 5,
            name: None,
        };
        assert_eq!(bare.to_string(), "Season 1 Episode 5");

        let named = SeasonEpisode {
            name: Some("Pilot".to_string()),
            ..bare
        };
        assert_eq!(named.to_string(), "Season 1 Episode 5 - Pilot");
    }

    #[test]
    fn test_episode_summary_display() {
        let episode = EpisodeSummary {
            number: 3,
            name: "Gray Matter".to_string(),
        };
        assert_eq!(episode.to_string(), "Episode 3 - Gray Matter");

        let unnamed = EpisodeSummary {
            number: 4,
            name: String::new(),
        };
        assert_eq!(unnamed.to_string(), "Episode 4");
    }

    // -------------------------------------------------------------------------
    // ProgressEntry Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_progress_entry_display_movie() {
        let title = ResolvedTitle {
            search_id: 438631,
            external_id: "tt1160419".to_string(),
            title: "Dune".to_string(),
            year: Some(2021),
            kind: MediaKind::Movie,
        };
        let entry = ProgressEntry::from_session(&title, None);
        assert_eq!(entry.to_string(), "Dune (2021)");
        assert_eq!(entry.id, 438631);
    }

    #[test]
    fn test_progress_entry_display_series() {
        let title = ResolvedTitle {
            search_id: 1396,
            external_id: "tt0903747".to_string(),
            title: "Breaking Bad".to_string(),
            year: Some(2008),
            kind: MediaKind::Series,
        };
        let episode = SeasonEpisode {
            season: 2,
            episode: 3,
            name: Some("Bit by a Dead Bee".to_string()),
        };
        let entry = ProgressEntry::from_session(&title, Some(&episode));
        assert_eq!(
            entry.to_string(),
            "Breaking Bad (2008) - Season 2 Episode 3 - Bit by a Dead Bee"
        );
    }

    #[test]
    fn test_progress_entry_serde_round_trip() {
        let title = ResolvedTitle {
            search_id: 42,
            external_id: "tt0000042".to_string(),
            title: "Answer".to_string(),
            year: None,
            kind: MediaKind::Movie,
        };
        let entry = ProgressEntry::from_session(&title, None);
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"movie\""));

        let parsed: ProgressEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id, 42);
        assert_eq!(parsed.played_at, entry.played_at);
    }
}
