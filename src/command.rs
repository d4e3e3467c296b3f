use std::sync::LazyLock;

use regex::Regex;

use crate::error::RequestError;
use crate::resolver::EpisodeRequest;

// "<name> <number>" asks for an episode
static EPISODE_QUERY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*)\s+(\d+)$").expect("episode query regex is valid"));

/// What a free-text query asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Usage help
    List,
    /// Streams of one episode
    Episode(EpisodeRequest),
    /// Title page details for a slug
    Info(String),
}

/// Routes free text like `One Piece 3` or `one piece`.
///
/// Text is trimmed and lower-cased first. A trailing number separated by
/// whitespace is the episode, everything before it is the title.
pub fn parse_command(text: &str) -> Result<Command, RequestError> {
    let text = text.trim().to_lowercase();
    if text.is_empty() {
        return Err(RequestError::EmptyQuery);
    }

    if text == "list" {
        return Ok(Command::List);
    }

    if let Some(caps) = EPISODE_QUERY.captures(&text) {
        let slug = normalize_slug(&caps[1]);
        return EpisodeRequest::new(slug, &caps[2]).map(Command::Episode);
    }

    Ok(Command::Info(normalize_slug(&text)))
}

/// Builds the site slug from a title: lower-case, words joined by hyphens.
pub fn normalize_slug(title: &str) -> String {
    title
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}
