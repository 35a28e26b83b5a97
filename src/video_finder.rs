//! Profile selection and wiring of the collector to a search client.

use std::sync::{atomic::AtomicBool, Arc};
use std::time::Instant;

use chrono::{DateTime, Utc};
use log::{info, warn};

use crate::backends::{SearchClient, SearchPage};
use crate::error::{FindError, Result};
use crate::item_filter;
use crate::query_profile::{ProfileRegistry, QueryProfile};
use crate::quota_collector::QuotaCollector;
use crate::video_url::watch_urls;

/// Per-run overrides. The default runs a profile as declared, without a deadline.
#[derive(Debug, Clone, Default)]
pub struct FindOptions {
    pub required_count: Option<usize>,
    pub deadline: Option<Instant>,
    pub cancel_flag: Option<Arc<AtomicBool>>,
    /// Reference time for recency windows; `Utc::now()` when unset.
    pub now: Option<DateTime<Utc>>,
}

pub struct VideoFinder<C: SearchClient> {
    client: C,
    registry: ProfileRegistry,
    page_size: u32,
}

impl<C: SearchClient> VideoFinder<C> {
    pub fn new(client: C, registry: ProfileRegistry, page_size: u32) -> Self {
        Self {
            client,
            registry,
            page_size,
        }
    }

    pub fn profile(&self, find_type: &str) -> Result<&QueryProfile> {
        self.registry
            .get(find_type)
            .ok_or_else(|| FindError::UnknownProfile(find_type.to_string()))
    }

    fn collector_for(&self, profile: &QueryProfile, options: &FindOptions) -> QuotaCollector {
        let mut collector =
            QuotaCollector::new(options.required_count.unwrap_or(profile.required_count));
        if let Some(deadline) = options.deadline {
            collector = collector.with_deadline(deadline);
        }
        if let Some(flag) = &options.cancel_flag {
            collector = collector.with_cancel_flag(Arc::clone(flag));
        }
        collector
    }

    /// Collects video IDs for `find_type`. An unregistered find type yields an empty list.
    pub fn find_video_ids(&self, find_type: &str, options: &FindOptions) -> Result<Vec<String>> {
        let profile = match self.profile(find_type) {
            Ok(profile) => profile,
            Err(err) => {
                warn!("{} (available: {})", err, self.registry.names().join(", "));
                return Ok(Vec::new());
            }
        };

        let collector = self.collector_for(profile, options);
        let request =
            profile.search_request(options.now.unwrap_or_else(Utc::now), self.page_size)?;
        let criterion = profile.criterion();
        info!(
            "Collecting {} videos for profile '{}' (keyword='{}', filter={:?})",
            collector.required_count(),
            profile.name,
            profile.keyword,
            criterion
        );

        let ids = collector.collect(
            |page_token| self.client.search_page(&request, page_token),
            |page: &SearchPage| match &criterion {
                Some(criterion) => item_filter::filter(
                    &page.video_ids(),
                    |joined_ids| self.client.lookup_items(joined_ids, &profile.lookup_part),
                    criterion,
                ),
                None => Ok(page.video_ids()),
            },
        )?;
        info!("Collected {} videos for profile '{}'", ids.len(), profile.name);
        Ok(ids)
    }

    pub fn find_video_urls(&self, find_type: &str, options: &FindOptions) -> Result<Vec<String>> {
        let ids = self.find_video_ids(find_type, options)?;
        Ok(watch_urls(&ids))
    }
}
