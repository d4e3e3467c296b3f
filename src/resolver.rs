use std::fmt;
use std::time::Duration;

use log::{debug, info, warn};
use url::Url;

use crate::entities;
use crate::error::{ExtractError, FetchError, RequestError, ResolveError};
use crate::fetcher::PageFetcher;
use crate::markers::{self, MarkerPair};
use crate::site;
use crate::sources::{self, ArrayCarver, TerminatorCarver, VideoSourceList};

/// Which episode to look up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeRequest {
    slug: String,
    episode: String,
}

impl EpisodeRequest {
    pub fn new(slug: impl Into<String>, episode: impl Into<String>) -> Result<Self, RequestError> {
        let slug = slug.into();
        let episode = episode.into();

        if slug.trim().is_empty() {
            return Err(RequestError::EmptySlug);
        }
        // Digits only, so the number goes into the URL path unchanged
        let digits = !episode.is_empty() && episode.bytes().all(|b| b.is_ascii_digit());
        if !digits || episode.bytes().all(|b| b == b'0') {
            return Err(RequestError::InvalidEpisode(episode));
        }

        Ok(Self { slug, episode })
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn episode(&self) -> &str {
        &self.episode
    }
}

/// Pipeline stage, only used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveState {
    Idle,
    FetchingEpisodePage,
    ExtractingPlayerUrl,
    FetchingPlayerPage,
    ExtractingSourceArray,
    Assembled,
    Failed(&'static str),
}

impl fmt::Display for ResolveState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveState::Idle => f.write_str("idle"),
            ResolveState::FetchingEpisodePage => f.write_str("fetching episode page"),
            ResolveState::ExtractingPlayerUrl => f.write_str("extracting player url"),
            ResolveState::FetchingPlayerPage => f.write_str("fetching player page"),
            ResolveState::ExtractingSourceArray => f.write_str("extracting source array"),
            ResolveState::Assembled => f.write_str("assembled"),
            ResolveState::Failed(kind) => write!(f, "failed ({kind})"),
        }
    }
}

/// Turns an episode request into the list of playable streams.
///
/// Holds no per-request state, one resolver can serve any number of
/// concurrent requests. Each upstream page is fetched at most once per call
/// and nothing is retried.
pub struct EpisodeResolver<F> {
    fetcher: F,
    carver: Box<dyn ArrayCarver>,
    base_url: String,
    player_markers: &'static [MarkerPair],
    sources_prefix: &'static str,
}

impl<F: PageFetcher> EpisodeResolver<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            carver: Box::new(TerminatorCarver),
            base_url: site::BASE_URL.to_string(),
            player_markers: site::PLAYER_URL_MARKERS,
            sources_prefix: site::SOURCES_PREFIX,
        }
    }

    /// Points the resolver at another host serving the same templates.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_carver(mut self, carver: impl ArrayCarver + 'static) -> Self {
        self.carver = Box::new(carver);
        self
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Runs the whole pipeline for one episode.
    ///
    /// Never returns an empty list: a player page without usable entries is
    /// reported as [`ResolveError::NoPlayableSources`]. Dropping the returned
    /// future cancels any fetch in flight.
    pub async fn resolve(&self, request: &EpisodeRequest) -> Result<VideoSourceList, ResolveError> {
        let mut state = ResolveState::Idle;
        let result = self.run(request, &mut state).await;

        match &result {
            Ok(list) => info!(
                "{}/{}: {} source(s) found",
                request.slug,
                request.episode,
                list.len()
            ),
            Err(e) => {
                let failed_in = state;
                transition(request, &mut state, ResolveState::Failed(e.kind()));
                warn!(
                    "{}/{}: {} while {}: {}",
                    request.slug,
                    request.episode,
                    e,
                    failed_in,
                    cause_chain(e)
                );
            }
        }

        result
    }

    /// Like [`resolve`](Self::resolve) but gives up after `deadline`.
    pub async fn resolve_with_deadline(
        &self,
        request: &EpisodeRequest,
        deadline: Duration,
    ) -> Result<VideoSourceList, ResolveError> {
        match tokio::time::timeout(deadline, self.resolve(request)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    "{}/{}: gave up after {:?}",
                    request.slug, request.episode, deadline
                );
                Err(ResolveError::UpstreamUnavailable(FetchError::Timeout {
                    url: site::episode_url(&self.base_url, &request.slug, &request.episode),
                }))
            }
        }
    }

    async fn run(
        &self,
        request: &EpisodeRequest,
        state: &mut ResolveState,
    ) -> Result<VideoSourceList, ResolveError> {
        // 1. Episode page
        transition(request, state, ResolveState::FetchingEpisodePage);
        let episode_url = site::episode_url(&self.base_url, &request.slug, &request.episode);
        let episode_page = self
            .fetcher
            .fetch(&episode_url)
            .await
            .map_err(ResolveError::UpstreamUnavailable)?;

        // 2. Player link, still escaped
        transition(request, state, ResolveState::ExtractingPlayerUrl);
        let encoded = markers::extract_between(&episode_page.body, self.player_markers)
            .map_err(|e| ResolveError::PlayerUrlNotFound(Some(e)))?;
        let player_url = entities::decode(encoded);
        if let Err(e) = Url::parse(&player_url) {
            warn!("player url {player_url:?} is not a valid url: {e}");
            return Err(ResolveError::PlayerUrlNotFound(None));
        }
        drop(episode_page);

        // 3. Player page
        transition(request, state, ResolveState::FetchingPlayerPage);
        let player_page = self
            .fetcher
            .fetch(&player_url)
            .await
            .map_err(ResolveError::UpstreamUnavailable)?;

        // 4. Source array
        transition(request, state, ResolveState::ExtractingSourceArray);
        let sources = self
            .extract_sources(&player_page.body)
            .map_err(|e| ResolveError::NoPlayableSources(Some(e)))?;

        // 5. Empty means nothing playable even though the page parsed
        if sources.is_empty() {
            debug!("source array parsed but held no usable entries");
            return Err(ResolveError::NoPlayableSources(None));
        }

        transition(request, state, ResolveState::Assembled);
        Ok(sources)
    }

    fn extract_sources(&self, body: &str) -> Result<VideoSourceList, ExtractError> {
        let carved = self.carver.carve(body, self.sources_prefix)?;
        sources::parse_source_list(&entities::decode(&carved))
    }
}

fn transition(request: &EpisodeRequest, state: &mut ResolveState, next: ResolveState) {
    debug!(
        "{}/{}: {} -> {}",
        request.slug, request.episode, state, next
    );
    *state = next;
}

fn cause_chain(err: &ResolveError) -> String {
    let mut causes = Vec::new();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        causes.push(cause.to_string());
        source = cause.source();
    }
    if causes.is_empty() {
        "no further detail".to_string()
    } else {
        causes.join(": ")
    }
}
