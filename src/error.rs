use thiserror::Error;

/// Failures of the text extraction stages.
///
/// These never reach the end user directly: the resolver folds them into a
/// [`ResolveError`] and keeps them as its source so the logs still say which
/// stage broke when the site changes its templates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("none of the {tried} start markers were found")]
    MarkerNotFound { tried: usize },

    #[error("start marker {start:?} found but end marker {end:?} never follows it")]
    UnterminatedMarker { start: String, end: String },

    #[error("nothing between markers {start:?} and {end:?}")]
    EmptyExtraction { start: String, end: String },

    #[error("array prefix {prefix:?} not found in document")]
    BlockNotFound { prefix: String },

    #[error("source array is not a well-formed list: {reason}")]
    MalformedArray { reason: String },
}

/// Failures of a single page fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("could not build HTTP client")]
    Client(#[source] reqwest::Error),

    #[error("request to {url} failed")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },
}

/// Outcome reported to callers of the resolver.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Network or HTTP failure. Worth trying again later.
    #[error("upstream site unavailable")]
    UpstreamUnavailable(#[source] FetchError),

    /// The episode page has no player link, usually because the episode
    /// does not exist or is not released yet.
    #[error("player url not found on episode page")]
    PlayerUrlNotFound(#[source] Option<ExtractError>),

    /// The player page was reached but nothing playable came out of it.
    #[error("no playable sources found on player page")]
    NoPlayableSources(#[source] Option<ExtractError>),
}

impl ResolveError {
    /// Short stable name used in logs and JSON output.
    pub fn kind(&self) -> &'static str {
        match self {
            ResolveError::UpstreamUnavailable(_) => "upstream_unavailable",
            ResolveError::PlayerUrlNotFound(_) => "player_url_not_found",
            ResolveError::NoPlayableSources(_) => "no_playable_sources",
        }
    }
}

/// Invalid caller input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("empty query")]
    EmptyQuery,

    #[error("slug must not be empty")]
    EmptySlug,

    #[error("episode number must be a positive whole number in digits, got {0:?}")]
    InvalidEpisode(String),
}

/// Failures of the title metadata scrape.
#[derive(Debug, Error)]
pub enum InfoError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("no title page for {slug}")]
    NotFound { slug: String },
}
