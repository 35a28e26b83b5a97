//! Quota-bounded pagination over a search source.
//!
//! Pages are fetched strictly in sequence because each continuation token is
//! only known once the previous page has arrived. Accepted identifiers are
//! appended in source order, page by page, until the quota is met or the
//! source stops handing out tokens. Identifiers are not de-duplicated.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Instant;

use log::debug;

use crate::backends::SearchPage;
use crate::config::MAX_PAGE_SIZE;
use crate::error::{FindError, Result};

/// Drives page fetching until `required_count` identifiers are accepted.
#[derive(Debug, Clone)]
pub struct QuotaCollector {
    required_count: usize,
    deadline: Option<Instant>,
    cancel_flag: Option<Arc<AtomicBool>>,
}

impl QuotaCollector {
    pub fn new(required_count: usize) -> Self {
        Self {
            required_count,
            deadline: None,
            cancel_flag: None,
        }
    }

    /// Stops requesting further pages once `deadline` has passed.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Stops requesting further pages once `flag` is raised.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel_flag = Some(flag);
        self
    }

    pub fn required_count(&self) -> usize {
        self.required_count
    }

    fn interrupted(&self) -> bool {
        let cancelled = self
            .cancel_flag
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed));
        let expired = self
            .deadline
            .is_some_and(|deadline| Instant::now() >= deadline);
        cancelled || expired
    }

    /// Fetches pages through `fetch_page` and keeps what `accept` returns for each.
    ///
    /// `fetch_page` receives `None` for the first page and the previous page's
    /// continuation token afterwards. An empty page is reported as
    /// [`FindError::NoResults`]; running out of tokens before the quota is met
    /// is not an error and yields a short result.
    pub fn collect<F, A>(&self, mut fetch_page: F, mut accept: A) -> Result<Vec<String>>
    where
        F: FnMut(Option<&str>) -> Result<SearchPage>,
        A: FnMut(&SearchPage) -> Result<Vec<String>>,
    {
        if self.required_count == 0 {
            return Err(FindError::InvalidProfile(
                "required count must be greater than zero".to_string(),
            ));
        }

        let mut buffer: Vec<String> =
            Vec::with_capacity(self.required_count.min(MAX_PAGE_SIZE as usize));
        let mut page_token: Option<String> = None;
        let mut page_number = 0usize;
        loop {
            if page_number > 0 && self.interrupted() {
                debug!(
                    "Collection interrupted after {} pages with {}/{} ids",
                    page_number,
                    buffer.len(),
                    self.required_count
                );
                return Err(FindError::Cancelled);
            }
            page_number += 1;

            let page = fetch_page(page_token.as_deref())?;
            if page.items.is_empty() {
                return Err(FindError::NoResults);
            }

            let accepted = accept(&page)?;
            let remaining = self.required_count - buffer.len();
            let accepted_count = accepted.len();
            buffer.extend(accepted.into_iter().take(remaining));
            debug!(
                "page={} candidates={} accepted={} collected={}/{} has_next={}",
                page_number,
                page.items.len(),
                accepted_count,
                buffer.len(),
                self.required_count,
                page.continuation().is_some()
            );

            if buffer.len() >= self.required_count {
                break;
            }
            match page.continuation() {
                Some(token) => page_token = Some(token.to_string()),
                None => break,
            }
        }
        Ok(buffer)
    }
}
