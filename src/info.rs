use log::debug;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};

use crate::error::InfoError;
use crate::fetcher::PageFetcher;
use crate::site;

// Labels on the title page, in the site's language
const STATUS_LABEL: &str = "الحالة";
const STUDIO_LABEL: &str = "الاستوديو";
const AUTHOR_LABEL: &str = "المؤلف";
const AGE_LABEL: &str = "التصنيف العمري";

const NOT_FOUND_TITLE: &str = "Page Not Found";

// Title page details
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimeInfo {
    pub slug: String,
    pub url: String,
    pub title: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub rating: Option<String>,
    pub status: Option<String>,
    pub studio: Option<String>,
    pub author: Option<String>,
    pub age_rating: Option<String>,
}

/// Fetches and scrapes the title page for `slug`.
pub async fn fetch_info<F: PageFetcher + ?Sized>(
    fetcher: &F,
    base_url: &str,
    slug: &str,
) -> Result<AnimeInfo, InfoError> {
    let url = site::title_url(base_url, slug);
    let page = fetcher.fetch(&url).await?;
    parse_info(&page.body, slug, &url)
}

/// Reads the metadata out of a title page.
pub fn parse_info(html: &str, slug: &str, url: &str) -> Result<AnimeInfo, InfoError> {
    let document = Html::parse_document(html);

    let title = meta_content(&document, "og:title")
        .filter(|t| !t.contains(NOT_FOUND_TITLE))
        .ok_or_else(|| InfoError::NotFound {
            slug: slug.to_string(),
        })?;

    debug!("title page for {slug}: {title}");

    Ok(AnimeInfo {
        slug: slug.to_string(),
        url: url.to_string(),
        title,
        description: meta_content(&document, "og:description"),
        image: meta_content(&document, "og:image"),
        rating: first_text(&document, ".text-yellow-500"),
        status: labelled_value(&document, STATUS_LABEL),
        studio: labelled_value(&document, STUDIO_LABEL),
        author: labelled_value(&document, AUTHOR_LABEL),
        age_rating: labelled_value(&document, AGE_LABEL),
    })
}

fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}

fn non_empty(text: String) -> Option<String> {
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

fn meta_content(document: &Html, property: &str) -> Option<String> {
    let selector = selector(&format!("meta[property='{property}']"))?;
    document
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .and_then(|content| non_empty(content.to_string()))
}

fn first_text(document: &Html, css: &str) -> Option<String> {
    let selector = selector(css)?;
    document
        .select(&selector)
        .next()
        .and_then(|el| non_empty(el.text().collect()))
}

// Text of the element right after the <span> holding `label`
fn labelled_value(document: &Html, label: &str) -> Option<String> {
    let spans = selector("span")?;
    let span = document
        .select(&spans)
        .find(|el| el.text().collect::<String>().contains(label))?;

    span.next_siblings()
        .find_map(ElementRef::wrap)
        .and_then(|el| non_empty(el.text().collect()))
}
