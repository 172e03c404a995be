//! Sequential page walker shared by both Whop list endpoints.

use std::future::Future;

use crate::whop::{Page, PageRequest, WhopApiError};

/// Endpoint-specific ceilings for page size and page count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointCaps {
    pub max_per: u32,
    pub max_pages: u32,
}

/// Coerced paging parameters for one fetch pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    pub per: u32,
    pub max_pages: u32,
    /// Stop once this many records have been collected.
    pub record_limit: Option<usize>,
}

impl PageLimits {
    /// Clamp caller-supplied hints into `[1, caps]`.
    ///
    /// Hints come straight from query strings, so anything out of range is
    /// coerced rather than rejected.
    #[must_use]
    pub fn coerce(per: i64, max_pages: i64, caps: EndpointCaps) -> Self {
        Self {
            per: clamp_hint(per, caps.max_per),
            max_pages: clamp_hint(max_pages, caps.max_pages),
            record_limit: None,
        }
    }

    /// Limits that stop after `limit` records, using the largest page size
    /// the endpoint allows.
    #[must_use]
    pub fn for_record_limit(limit: usize, caps: EndpointCaps) -> Self {
        let per = caps.max_per.max(1);
        let pages_needed = limit.div_ceil(per as usize).max(1);
        let max_pages = u32::try_from(pages_needed)
            .unwrap_or(u32::MAX)
            .min(caps.max_pages.max(1));

        Self {
            per,
            max_pages,
            record_limit: Some(limit),
        }
    }
}

fn clamp_hint(value: i64, cap: u32) -> u32 {
    let cap = cap.max(1);
    u32::try_from(value.clamp(1, i64::from(cap))).unwrap_or(cap)
}

/// Fetch pages `1..=max_pages` one after another and concatenate the records.
///
/// Stops early on an empty page, on a page that reports no successor, or
/// once `record_limit` is reached. Any page error aborts the whole pass; no
/// partial result is returned.
///
/// # Errors
///
/// Propagates the first [`WhopApiError`] returned by `fetch_page`.
pub async fn fetch_pages<T, F, Fut>(
    limits: PageLimits,
    mut fetch_page: F,
) -> Result<Vec<T>, WhopApiError>
where
    F: FnMut(PageRequest) -> Fut,
    Fut: Future<Output = Result<Page<T>, WhopApiError>>,
{
    let mut records = Vec::new();

    for page in 1..=limits.max_pages {
        let batch = fetch_page(PageRequest {
            page,
            per: limits.per,
        })
        .await?;

        let batch_len = batch.records.len();
        tracing::debug!(page, batch_len, has_next = batch.has_next, "fetched page");

        if batch_len == 0 {
            break;
        }
        records.extend(batch.records);

        if let Some(limit) = limits.record_limit {
            if records.len() >= limit {
                records.truncate(limit);
                break;
            }
        }

        if !batch.has_next {
            break;
        }
    }

    Ok(records)
}
