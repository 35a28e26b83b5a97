//! Batch metadata lookup and per-item filtering.

use log::debug;

use crate::backends::ItemMetadata;
use crate::error::Result;

/// Predicate over looked-up item metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterCriterion {
    /// Keeps videos whose default audio language tag equals the value exactly.
    DefaultAudioLanguage(String),
}

impl FilterCriterion {
    pub fn matches(&self, metadata: &ItemMetadata) -> bool {
        match self {
            FilterCriterion::DefaultAudioLanguage(language) => {
                metadata.default_audio_language.as_deref() == Some(language.as_str())
            }
        }
    }
}

/// Looks up `ids` in a single batch call and keeps those satisfying `criterion`.
///
/// The result follows the order of the lookup response, not of `ids`. An empty
/// `ids` slice returns immediately without calling `lookup_batch`.
pub fn filter<L>(
    ids: &[String],
    lookup_batch: L,
    criterion: &FilterCriterion,
) -> Result<Vec<String>>
where
    L: FnOnce(&str) -> Result<Vec<ItemMetadata>>,
{
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let joined_ids = ids.join(",");
    let metadata = lookup_batch(&joined_ids)?;
    let accepted: Vec<String> = metadata
        .into_iter()
        .filter(|item| criterion.matches(item))
        .map(|item| item.video_id)
        .collect();
    debug!(
        "Filter {:?} kept {}/{} candidates",
        criterion,
        accepted.len(),
        ids.len()
    );
    Ok(accepted)
}

#[cfg(test)]
mod tests {
    use super::{filter, FilterCriterion};
    use crate::backends::ItemMetadata;
    use crate::error::FindError;

    fn metadata(video_id: &str, language: Option<&str>) -> ItemMetadata {
        ItemMetadata {
            video_id: video_id.to_string(),
            default_audio_language: language.map(ToOwned::to_owned),
        }
    }

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    fn japanese() -> FilterCriterion {
        FilterCriterion::DefaultAudioLanguage("ja".to_string())
    }

    #[test]
    fn test_empty_input_skips_lookup() {
        let mut lookups = 0;
        let result = filter(
            &[],
            |_joined| {
                lookups += 1;
                Ok(Vec::new())
            },
            &japanese(),
        )
        .expect("empty input should succeed");
        assert!(result.is_empty());
        assert_eq!(lookups, 0);
    }

    #[test]
    fn test_keeps_only_matching_items() {
        let result = filter(
            &ids(&["v1", "v2", "v3", "v4", "v5"]),
            |joined| {
                assert_eq!(joined, "v1,v2,v3,v4,v5");
                Ok(vec![
                    metadata("v1", Some("en")),
                    metadata("v2", Some("ja")),
                    metadata("v3", None),
                    metadata("v4", Some("ja")),
                    metadata("v5", Some("ja-JP")),
                ])
            },
            &japanese(),
        )
        .expect("filter should succeed");
        assert_eq!(result, vec!["v2", "v4"]);
    }

    #[test]
    fn test_result_follows_lookup_order() {
        let result = filter(
            &ids(&["v1", "v2", "v3"]),
            |_joined| {
                Ok(vec![
                    metadata("v3", Some("ja")),
                    metadata("v1", Some("ja")),
                    metadata("v2", Some("fr")),
                ])
            },
            &japanese(),
        )
        .expect("filter should succeed");
        assert_eq!(result, vec!["v3", "v1"]);
    }

    #[test]
    fn test_lookup_failure_propagates() {
        let result = filter(
            &ids(&["v1"]),
            |_joined| Err(FindError::source_unavailable("videos.list", "HTTP 500")),
            &japanese(),
        );
        assert!(matches!(result, Err(FindError::SourceUnavailable { .. })));
    }

    #[test]
    fn test_missing_language_never_matches() {
        assert!(!japanese().matches(&metadata("v1", None)));
        assert!(japanese().matches(&metadata("v1", Some("ja"))));
    }
}
