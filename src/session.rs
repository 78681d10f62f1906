//! Playback session orchestrator
//!
//! One pass from search to (optionally) a recorded progress entry:
//! search -> pick title -> resolve ids -> (series: pick season/episode)
//! -> stream lookup -> pick variant -> caption policy -> fetch caption
//! -> launch player -> record progress. Every collaborator failure is
//! logged with its step and re-signaled; nothing retries. The only
//! absorbed failures are caption-related, which degrade playback to
//! "no subtitles" instead of aborting.

use std::path::PathBuf;
use tracing::{debug, error, warn};

use crate::api::{LookupClient, TmdbClient};
use crate::captions::CaptionFetcher;
use crate::error::SessionError;
use crate::models::{
    CaptionTrack, MediaKind, PlaybackSession, ProgressEntry, ResolvedTitle, SeasonEpisode,
    StreamVariant,
};
use crate::player::Launcher;
use crate::progress::ProgressStore;
use crate::prompt::{Choice, Prompter};

/// Selection policy knobs, resolved from config and CLI flags.
pub struct SessionOptions {
    /// Quality label listed first when present among the variants.
    pub preferred_quality: String,
    /// Accepted caption language codes; tracks outside this set are
    /// never offered.
    pub languages: Vec<String>,
}

/// Composes the collaborators into the end-to-end flow. All
/// dependencies are passed in, so tests can swap the prompter and
/// launcher and point the clients at mock servers.
pub struct Session<'a, P: Prompter, L: Launcher> {
    pub metadata: &'a TmdbClient,
    pub lookup: &'a LookupClient,
    pub captions: &'a CaptionFetcher,
    pub progress: &'a ProgressStore,
    pub prompter: &'a P,
    pub launcher: &'a L,
    pub options: SessionOptions,
}

impl<P: Prompter, L: Launcher> Session<'_, P, L> {
    /// Run one full session. Returns the completed playback record, or
    /// the error that ended the run early. Progress is recorded only
    /// after the launch step, never for a partial session.
    pub async fn run(&self) -> Result<PlaybackSession, SessionError> {
        let history = self.progress.load_all();
        let suggestions: Vec<String> = history.iter().map(|e| e.title.clone()).collect();

        let query = self.prompter.text("Enter the title to search:", &suggestions)?;

        let candidates = step("search", self.metadata.search(&query).await)?;
        if candidates.is_empty() {
            return Err(SessionError::NoResults(query));
        }

        let candidate = self.prompter.select(
            "Select a title:",
            candidates
                .into_iter()
                .map(|c| Choice::new(c.to_string(), c))
                .collect(),
        )?;

        let title = step("resolve", self.metadata.resolve(&candidate).await)?;

        let episode = match title.kind {
            MediaKind::Movie => None,
            MediaKind::Series => Some(self.pick_episode(&title).await?),
        };

        print_media_info(&title, episode.as_ref());

        let lookup = step(
            "stream lookup",
            self.lookup.lookup(&title.external_id, episode.as_ref()).await,
        )?;
        if let Some(summary) = &lookup.media.title {
            debug!(media = %summary, "lookup media summary");
        }
        if lookup.variants.is_empty() {
            return Err(SessionError::NoStreamsAvailable);
        }

        let ordered = order_variants(lookup.variants, &self.options.preferred_quality);
        let stream = self.prompter.select(
            "Select a stream:",
            ordered
                .into_iter()
                .map(|v| Choice::new(v.to_string(), v))
                .collect(),
        )?;

        let caption = self.pick_caption(lookup.captions)?;
        let caption_path = self.fetch_caption(caption.as_ref()).await;

        self.launcher.launch(&stream.url, caption_path.as_deref())?;

        let entry = ProgressEntry::from_session(&title, episode.as_ref());
        step("record progress", self.progress.record(entry))?;

        Ok(PlaybackSession {
            title,
            episode,
            stream,
            caption,
        })
    }

    /// Season then episode selection for a series. Both numbers come
    /// out together; stream lookup never sees one without the other.
    async fn pick_episode(&self, title: &ResolvedTitle) -> Result<SeasonEpisode, SessionError> {
        let seasons = step("seasons", self.metadata.seasons(title).await)?;
        let season = self.prompter.select(
            "Select a season:",
            seasons
                .into_iter()
                .map(|n| Choice::new(format!("Season {}", n), n))
                .collect(),
        )?;

        let episodes = step("episodes", self.metadata.episodes(title, season).await)?;
        let picked = self.prompter.select(
            "Select an episode:",
            episodes
                .into_iter()
                .map(|e| Choice::new(e.to_string(), e))
                .collect(),
        )?;

        Ok(SeasonEpisode {
            season,
            episode: picked.number,
            name: (!picked.name.is_empty()).then_some(picked.name),
        })
    }

    /// Apply the caption policy: filter to accepted languages, then
    /// skip / auto-select / prompt depending on how many remain.
    fn pick_caption(
        &self,
        tracks: Vec<CaptionTrack>,
    ) -> Result<Option<CaptionTrack>, SessionError> {
        let mut matching = filter_captions(tracks, &self.options.languages);
        match matching.len() {
            0 => {
                println!("No matching captions; playing without subtitles.");
                Ok(None)
            }
            1 => Ok(matching.pop()),
            _ => {
                let track = self.prompter.select(
                    "Select a caption:",
                    matching
                        .into_iter()
                        .map(|t| Choice::new(t.to_string(), t))
                        .collect(),
                )?;
                Ok(Some(track))
            }
        }
    }

    /// Download the chosen caption. Failure degrades to subtitle-less
    /// playback and is reported, not escalated.
    async fn fetch_caption(&self, caption: Option<&CaptionTrack>) -> Option<PathBuf> {
        let track = caption?;
        match self.captions.fetch(&track.url).await {
            Ok(path) => Some(path),
            Err(err) => {
                warn!(step = "caption download", %err, "continuing without subtitles");
                println!("Caption download failed; playing without subtitles.");
                None
            }
        }
    }
}

/// Log a failed collaborator call with its step, then re-signal it.
fn step<T>(name: &'static str, result: Result<T, SessionError>) -> Result<T, SessionError> {
    if let Err(err) = &result {
        if err.is_benign() {
            debug!(step = name, %err, "session ended early");
        } else {
            error!(step = name, %err, "session step failed");
        }
    }
    result
}

/// Preferred-quality variant first, the rest in their original order.
fn order_variants(variants: Vec<StreamVariant>, preferred: &str) -> Vec<StreamVariant> {
    let (mut ordered, rest): (Vec<_>, Vec<_>) = variants
        .into_iter()
        .partition(|v| v.quality == preferred);
    ordered.extend(rest);
    ordered
}

/// Keep only tracks whose language is in the accepted set.
fn filter_captions(tracks: Vec<CaptionTrack>, accepted: &[String]) -> Vec<CaptionTrack> {
    tracks
        .into_iter()
        .filter(|t| accepted.iter().any(|lang| t.language.eq_ignore_ascii_case(lang)))
        .collect()
}

fn print_media_info(title: &ResolvedTitle, episode: Option<&SeasonEpisode>) {
    println!();
    println!("Media info:");
    println!("  Type: {}", title.kind);
    println!("  Title: {}", title.title);
    println!("  Release year: {}", title.year_label());
    if let Some(ep) = episode {
        println!("  Season: {}", ep.season);
        println!("  Episode: {}", ep.episode);
        if let Some(name) = &ep.name {
            println!("  Episode name: {}", name);
        }
    }
    println!();
}
