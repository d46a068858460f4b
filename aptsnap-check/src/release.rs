//! Upstream Release document fetching and `Date:` parsing.
//!
//! One GET per repo at `{base}debian/dists/{dist}/Release`. The document is
//! scanned line by line for a `Date:` field of the form
//! `Fri, 8 Nov 2019 15:04:51 UTC`; the text after the first comma is parsed
//! as `%d %b %Y %H:%M:%S` with the trailing zone token taken as UTC. When a
//! document carries several `Date:` lines the last one wins.

use chrono::{DateTime, NaiveDateTime, Utc};

use aptsnap_core::types::Repo;

use crate::error::CheckError;

/// Source of upstream publication instants.
///
/// The production implementation is [`HttpProbe`]; tests substitute stubs so
/// decision logic runs without a network.
pub trait ReleaseProbe {
    /// The publication instant declared by the repo's upstream Release document.
    fn release_stamp(&self, repo: &Repo) -> Result<DateTime<Utc>, CheckError>;
}

/// HTTP-backed [`ReleaseProbe`] over a fixed base URL.
#[derive(Debug, Clone)]
pub struct HttpProbe {
    base_url: String,
}

impl HttpProbe {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl ReleaseProbe for HttpProbe {
    fn release_stamp(&self, repo: &Repo) -> Result<DateTime<Utc>, CheckError> {
        if repo.dist.is_empty() {
            return Err(CheckError::EmptyDist {
                mirror_id: repo.mirror_id(),
            });
        }

        let url = repo.release_url(&self.base_url);
        tracing::debug!("fetching release document from {url}");
        let body = match ureq::get(&url).call() {
            Ok(response) => response.into_string().map_err(|e| CheckError::Body {
                url: url.clone(),
                source: e,
            })?,
            Err(ureq::Error::Status(code, response)) => {
                let body = response.into_string().unwrap_or_default();
                return Err(CheckError::Status { code, url, body });
            }
            Err(ureq::Error::Transport(transport)) => {
                return Err(CheckError::Transport {
                    url,
                    source: Box::new(transport),
                });
            }
        };
        parse_release_date(&body, &url)
    }
}

/// Extract the publication instant from a Release document body.
///
/// Any `Date:` line that fails to parse is fatal; a document with no `Date:`
/// line at all is [`CheckError::MissingDate`].
pub fn parse_release_date(body: &str, url: &str) -> Result<DateTime<Utc>, CheckError> {
    let mut stamp = None;
    for line in body.lines() {
        let Some((_, value)) = line.split_once("Date:") else {
            continue;
        };
        stamp = Some(parse_date_value(value).ok_or_else(|| CheckError::DateFormat {
            url: url.to_string(),
            value: value.trim().to_string(),
        })?);
    }
    stamp.ok_or_else(|| CheckError::MissingDate {
        url: url.to_string(),
    })
}

/// Parse `Fri, 8 Nov 2019 15:04:51 UTC` (weekday prefix optional).
fn parse_date_value(value: &str) -> Option<DateTime<Utc>> {
    let after_weekday = value
        .split_once(',')
        .map(|(_, rest)| rest)
        .unwrap_or(value)
        .trim();

    // The zone token carries no offset information here; upstream Release
    // dates are UTC.
    let naive_part = match after_weekday.rsplit_once(' ') {
        Some((rest, zone)) if zone.chars().all(|c| c.is_ascii_alphabetic()) => rest,
        _ => after_weekday,
    };

    NaiveDateTime::parse_from_str(naive_part.trim(), "%d %b %Y %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
