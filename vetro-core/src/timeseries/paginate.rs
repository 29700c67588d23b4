use std::collections::BTreeMap;

use serde_json::{Map, Value};

use vetro_types::{BulkEntry, BulkResponse, Resolution, VetroError};

use crate::decode::bulk_from_payload;
use crate::source::{PageSource, QueryParams};
use crate::timeseries::merge::merge_entries;

/// Pages walk the range toward the future or toward the past.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

/// Fetch all data covering `[since, until]` from a bulk endpoint, one bounded
/// window per request, and stitch the pages into a single combined response.
///
/// - Direction is forward when `since` is given, backward (anchored at
///   `until`, walking toward the past) otherwise.
/// - Each window spans at most `resolution.max_window_secs()` seconds.
/// - Two consecutive empty pages mean the data is exhausted; that terminates
///   the walk and is not an error.
/// - Non-`data` keys of the first non-empty page are kept as the combined
///   response's metadata; later pages' metadata is ignored.
/// - A page failure (transport or decode) aborts the walk immediately and
///   whatever has been accumulated so far is returned. Nothing is retried.
///
/// Timestamps in the combined response are unique and ascending regardless of
/// fetch direction.
pub async fn fetch_range<S>(
    source: &S,
    path: &str,
    base_params: &QueryParams,
    since: Option<i64>,
    until: i64,
    resolution: Resolution,
) -> BulkResponse
where
    S: PageSource + ?Sized,
{
    let window = resolution.max_window_secs();

    let mut acc: BTreeMap<i64, BulkEntry> = BTreeMap::new();
    let mut extra: Option<Map<String, Value>> = None;
    let mut empty_pages = 0u32;

    let (direction, mut cur_since, mut cur_until) = match since {
        Some(s) => (Direction::Forward, s, (s + window).min(until)),
        None => (Direction::Backward, (until - window).max(0), until),
    };

    loop {
        match fetch_window(source, path, base_params, cur_since, cur_until).await {
            Ok(page) => {
                if page.data.is_empty() {
                    empty_pages += 1;
                    if empty_pages >= 2 {
                        break;
                    }
                } else {
                    empty_pages = 0;
                    if extra.is_none() {
                        extra = Some(page.extra);
                    }
                    merge_entries(&mut acc, page.data);
                }
            }
            Err(_err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    path,
                    since = cur_since,
                    until = cur_until,
                    error = %_err,
                    "aborting pagination after page failure"
                );
                break;
            }
        }

        match direction {
            Direction::Forward => {
                if cur_until >= until {
                    break;
                }
                cur_since = cur_until + 1;
                cur_until = (cur_since + window).min(until);
            }
            Direction::Backward => {
                if cur_since <= 0 {
                    break;
                }
                cur_until = cur_since - 1;
                cur_since = (cur_until - window).max(0);
            }
        }
    }

    BulkResponse {
        extra: extra.unwrap_or_default(),
        data: acc.into_values().collect(),
    }
}

/// Issue one page request for `[since, until]` and decode it.
async fn fetch_window<S>(
    source: &S,
    path: &str,
    base_params: &QueryParams,
    since: i64,
    until: i64,
) -> Result<BulkResponse, VetroError>
where
    S: PageSource + ?Sized,
{
    let mut params = base_params.clone();
    params.push(("s".to_string(), since.to_string()));
    params.push(("u".to_string(), until.to_string()));

    let payload = source.get_page(path, &params).await?;
    bulk_from_payload(&payload)
}
