//! Named search intents and their registry.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use log::debug;

use crate::backends::SearchRequest;
use crate::config::ProfileConfig;
use crate::error::{FindError, Result};
use crate::item_filter::FilterCriterion;

pub const SHOWROOM_RECENT: &str = "showroom-recent";
pub const APEX_TRENDING_JA: &str = "apex-trending-ja";
/// Upper bound on a recency window, roughly one century.
pub const MAX_PUBLISHED_WITHIN_DAYS: u32 = 36_500;

/// Result ordering accepted by the search endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Date,
    Rating,
    Relevance,
    Title,
    VideoCount,
    ViewCount,
}

impl SortOrder {
    pub fn as_api_str(self) -> &'static str {
        match self {
            SortOrder::Date => "date",
            SortOrder::Rating => "rating",
            SortOrder::Relevance => "relevance",
            SortOrder::Title => "title",
            SortOrder::VideoCount => "videoCount",
            SortOrder::ViewCount => "viewCount",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_api_str())
    }
}

impl FromStr for SortOrder {
    type Err = FindError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim() {
            "date" => Ok(SortOrder::Date),
            "rating" => Ok(SortOrder::Rating),
            "relevance" => Ok(SortOrder::Relevance),
            "title" => Ok(SortOrder::Title),
            "videoCount" => Ok(SortOrder::VideoCount),
            "viewCount" => Ok(SortOrder::ViewCount),
            other => Err(FindError::InvalidProfile(format!(
                "unsupported sort order '{other}'"
            ))),
        }
    }
}

/// Immutable description of one search intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryProfile {
    pub name: String,
    pub keyword: String,
    pub result_type: String,
    pub order: SortOrder,
    pub region_code: Option<String>,
    /// Only videos published within this many days before the run are searched.
    pub published_within_days: Option<u32>,
    pub search_part: String,
    pub lookup_part: String,
    pub required_count: usize,
    pub audio_language: Option<String>,
}

impl QueryProfile {
    /// Post-filter applied to each page, if the profile needs one.
    pub fn criterion(&self) -> Option<FilterCriterion> {
        self.audio_language
            .clone()
            .map(FilterCriterion::DefaultAudioLanguage)
    }

    /// Resolves the relative recency window against `now`.
    pub fn search_request(&self, now: DateTime<Utc>, page_size: u32) -> Result<SearchRequest> {
        let published_after = match self.published_within_days {
            Some(days) => {
                let cutoff = Duration::try_days(i64::from(days))
                    .and_then(|window| now.checked_sub_signed(window))
                    .ok_or_else(|| {
                        FindError::InvalidProfile(format!(
                            "profile '{}' has an out-of-range recency window of {} days",
                            self.name, days
                        ))
                    })?;
                Some(cutoff.to_rfc3339_opts(SecondsFormat::Secs, true))
            }
            None => None,
        };
        Ok(SearchRequest {
            part: self.search_part.clone(),
            keyword: self.keyword.clone(),
            result_type: self.result_type.clone(),
            order: self.order.as_api_str().to_string(),
            region_code: self.region_code.clone(),
            published_after,
            page_size,
        })
    }

    fn showroom_recent() -> Self {
        Self {
            name: SHOWROOM_RECENT.to_string(),
            keyword: "SHOWROOM".to_string(),
            result_type: "video".to_string(),
            order: SortOrder::Date,
            region_code: None,
            published_within_days: None,
            search_part: "snippet".to_string(),
            lookup_part: "snippet".to_string(),
            required_count: 100,
            audio_language: None,
        }
    }

    fn apex_trending_ja() -> Self {
        Self {
            name: APEX_TRENDING_JA.to_string(),
            keyword: "Apex Legends".to_string(),
            result_type: "video".to_string(),
            order: SortOrder::ViewCount,
            region_code: Some("JP".to_string()),
            published_within_days: Some(3),
            search_part: "id".to_string(),
            lookup_part: "snippet".to_string(),
            required_count: 10,
            audio_language: Some("ja".to_string()),
        }
    }
}

impl TryFrom<&ProfileConfig> for QueryProfile {
    type Error = FindError;

    fn try_from(config: &ProfileConfig) -> Result<Self> {
        if config.name.is_empty() {
            return Err(FindError::InvalidProfile(
                "profile name cannot be empty".to_string(),
            ));
        }
        if config.keyword.trim().is_empty() {
            return Err(FindError::InvalidProfile(format!(
                "profile '{}' has an empty keyword",
                config.name
            )));
        }
        if config
            .published_within_days
            .is_some_and(|days| days > MAX_PUBLISHED_WITHIN_DAYS)
        {
            return Err(FindError::InvalidProfile(format!(
                "profile '{}' recency window exceeds {} days",
                config.name, MAX_PUBLISHED_WITHIN_DAYS
            )));
        }
        if config.required_count == 0 {
            return Err(FindError::InvalidProfile(format!(
                "profile '{}' must require at least one video",
                config.name
            )));
        }
        Ok(Self {
            name: config.name.clone(),
            keyword: config.keyword.clone(),
            result_type: config.result_type.clone(),
            order: config.order.parse()?,
            region_code: config.region_code.clone(),
            published_within_days: config.published_within_days,
            search_part: config.search_part.clone(),
            lookup_part: config.lookup_part.clone(),
            required_count: config.required_count,
            audio_language: config.audio_language.clone(),
        })
    }
}

/// Query profiles keyed by find-type tag.
#[derive(Debug, Clone, Default)]
pub struct ProfileRegistry {
    profiles: BTreeMap<String, QueryProfile>,
}

impl ProfileRegistry {
    pub fn with_builtins() -> Self {
        let mut registry = Self::default();
        registry.insert(QueryProfile::showroom_recent());
        registry.insert(QueryProfile::apex_trending_ja());
        registry
    }

    /// Built-ins overlaid with config-declared profiles.
    pub fn from_config(profiles: &[ProfileConfig]) -> Result<Self> {
        let mut registry = Self::with_builtins();
        for profile_config in profiles {
            let profile = QueryProfile::try_from(profile_config)?;
            if registry.profiles.contains_key(&profile.name) {
                debug!("Config profile '{}' replaces built-in", profile.name);
            }
            registry.insert(profile);
        }
        Ok(registry)
    }

    pub fn insert(&mut self, profile: QueryProfile) {
        self.profiles.insert(profile.name.clone(), profile);
    }

    pub fn get(&self, name: &str) -> Option<&QueryProfile> {
        self.profiles.get(name.trim())
    }

    pub fn names(&self) -> Vec<&str> {
        self.profiles.keys().map(String::as_str).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &QueryProfile> {
        self.profiles.values()
    }
}

#[cfg(test)]
mod tests {
    use super::{ProfileRegistry, QueryProfile, SortOrder, APEX_TRENDING_JA, SHOWROOM_RECENT};
    use crate::config::ProfileConfig;
    use crate::error::FindError;
    use crate::item_filter::FilterCriterion;
    use chrono::{TimeZone, Utc};

    fn profile_config(name: &str, order: &str, required_count: usize) -> ProfileConfig {
        ProfileConfig {
            name: name.to_string(),
            keyword: "rust lang".to_string(),
            result_type: "video".to_string(),
            order: order.to_string(),
            region_code: None,
            published_within_days: None,
            search_part: "snippet".to_string(),
            lookup_part: "snippet".to_string(),
            required_count,
            audio_language: None,
        }
    }

    #[test]
    fn test_builtins_are_registered_in_sorted_order() {
        let registry = ProfileRegistry::with_builtins();
        assert_eq!(registry.names(), vec![APEX_TRENDING_JA, SHOWROOM_RECENT]);
    }

    #[test]
    fn test_apex_profile_resolves_three_day_window() {
        let registry = ProfileRegistry::with_builtins();
        let profile = registry.get(APEX_TRENDING_JA).expect("builtin should exist");
        let now = Utc
            .with_ymd_and_hms(2026, 10, 16, 12, 30, 0)
            .single()
            .expect("valid timestamp");
        let request = profile
            .search_request(now, 50)
            .expect("request should resolve");
        assert_eq!(request.published_after.as_deref(), Some("2026-10-13T12:30:00Z"));
        assert_eq!(request.order, "viewCount");
        assert_eq!(request.region_code.as_deref(), Some("JP"));
        assert_eq!(request.part, "id");
        assert_eq!(
            profile.criterion(),
            Some(FilterCriterion::DefaultAudioLanguage("ja".to_string()))
        );
    }

    #[test]
    fn test_showroom_profile_has_no_filter_or_window() {
        let registry = ProfileRegistry::with_builtins();
        let profile = registry.get(SHOWROOM_RECENT).expect("builtin should exist");
        let request = profile
            .search_request(Utc::now(), 50)
            .expect("request should resolve");
        assert_eq!(request.published_after, None);
        assert_eq!(request.order, "date");
        assert_eq!(profile.required_count, 100);
        assert_eq!(profile.criterion(), None);
    }

    #[test]
    fn test_config_profile_replaces_builtin() {
        let mut override_config = profile_config(SHOWROOM_RECENT, "viewCount", 5);
        override_config.keyword = "SHOWROOM live".to_string();
        let registry = ProfileRegistry::from_config(&[
            override_config,
            profile_config("rust-weekly", "date", 25),
        ])
        .expect("config profiles should be valid");

        let replaced = registry.get(SHOWROOM_RECENT).expect("profile should exist");
        assert_eq!(replaced.keyword, "SHOWROOM live");
        assert_eq!(replaced.order, SortOrder::ViewCount);
        assert_eq!(registry.names().len(), 3);
    }

    #[test]
    fn test_invalid_config_profiles_are_rejected() {
        let result = ProfileRegistry::from_config(&[profile_config("bad", "newest", 5)]);
        assert!(matches!(result, Err(FindError::InvalidProfile(_))));

        let result = QueryProfile::try_from(&profile_config("zero", "date", 0));
        assert!(matches!(result, Err(FindError::InvalidProfile(_))));
    }

    #[test]
    fn test_oversized_recency_window_is_rejected() {
        let mut config = profile_config("ancient", "date", 5);
        config.published_within_days = Some(200_000_000);
        let result = ProfileRegistry::from_config(&[config]);
        assert!(matches!(result, Err(FindError::InvalidProfile(_))));

        let mut profile = QueryProfile::try_from(&profile_config("direct", "date", 5))
            .expect("profile should be valid");
        profile.published_within_days = Some(u32::MAX);
        let result = profile.search_request(Utc::now(), 50);
        assert!(matches!(result, Err(FindError::InvalidProfile(_))));
    }

    #[test]
    fn test_sort_order_round_trips_api_names() {
        for name in ["date", "rating", "relevance", "title", "videoCount", "viewCount"] {
            let order: SortOrder = name.parse().expect("known order should parse");
            assert_eq!(order.to_string(), name);
        }
    }
}
