use crate::error::ExtractError;

/// A literal start/end delimiter pair bracketing a value in page text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerPair {
    pub start: &'static str,
    pub end: &'static str,
}

impl MarkerPair {
    pub const fn new(start: &'static str, end: &'static str) -> Self {
        Self { start, end }
    }
}

/// Returns the text between the first marker pair (in list order) whose start
/// marker occurs in `text` and the next occurrence of its end marker.
///
/// Later pairs are only tried when every earlier start marker is absent. Once
/// a start marker is found that pair is final: a missing end marker or an
/// empty value is an error, not a reason to try the next variant.
pub fn extract_between<'a>(text: &'a str, pairs: &[MarkerPair]) -> Result<&'a str, ExtractError> {
    for pair in pairs {
        let Some(pos) = text.find(pair.start) else {
            continue;
        };

        // Only look for the end marker after the start marker
        let start = pos + pair.start.len();
        let end = text[start..]
            .find(pair.end)
            .ok_or_else(|| ExtractError::UnterminatedMarker {
                start: pair.start.to_string(),
                end: pair.end.to_string(),
            })?;

        if end == 0 {
            return Err(ExtractError::EmptyExtraction {
                start: pair.start.to_string(),
                end: pair.end.to_string(),
            });
        }

        return Ok(&text[start..start + end]);
    }

    Err(ExtractError::MarkerNotFound { tried: pairs.len() })
}
