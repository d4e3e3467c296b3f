//! Everything specific to anime3rb's page templates.
//!
//! When the site changes how it embeds the player link or the source array,
//! this is the only file that should need an update.

use crate::markers::MarkerPair;

pub const BASE_URL: &str = "https://anime3rb.com";

/// Player link variants on the episode page, tried in order.
pub const PLAYER_URL_MARKERS: &[MarkerPair] = &[
    // Current template: JSON inside an HTML attribute, quotes as entities
    MarkerPair::new("video_url&quot;:&quot;", "&quot;"),
    // Older template: inline script with plain quotes
    MarkerPair::new("\"video_url\":\"", "\""),
];

/// Assignment that holds the stream list on the player page.
pub const SOURCES_PREFIX: &str = "var video_sources = ";

/// `https://anime3rb.com/episode/{slug}/{episode}`
pub fn episode_url(base: &str, slug: &str, episode: &str) -> String {
    format!(
        "{}/episode/{}/{}",
        base.trim_end_matches('/'),
        urlencoding::encode(slug),
        urlencoding::encode(episode)
    )
}

/// `https://anime3rb.com/titles/{slug}`
pub fn title_url(base: &str, slug: &str) -> String {
    format!("{}/titles/{}", base.trim_end_matches('/'), urlencoding::encode(slug))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_episode_url() {
        assert_eq!(
            episode_url(BASE_URL, "one-piece", "3"),
            "https://anime3rb.com/episode/one-piece/3"
        );
        assert_eq!(
            episode_url("http://127.0.0.1:8080/", "a-b", "12"),
            "http://127.0.0.1:8080/episode/a-b/12"
        );
    }

    #[test]
    fn encodes_slug_in_path() {
        assert_eq!(
            title_url(BASE_URL, "re:zero"),
            "https://anime3rb.com/titles/re%3Azero"
        );
    }
}
