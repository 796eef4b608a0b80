//! Fetches the wiki cycles page and extracts today's featured area name.
//!
//! The page format is not under this codebase's control, so extraction is
//! deliberately loose: any failure — route unreachable, timeout, table
//! missing, date absent — ends in `Unresolved`. Diagnostics go to the log
//! only; the tool works fine without a resolved name.

use std::{collections::HashMap, time::Duration};

use once_cell::sync::Lazy;
use regex::Regex;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::schedule;

/// Terminal outcome of one resolver run, emitted exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeaturedEvent {
    /// Today's featured area name, not yet checked against the dataset.
    Resolved(String),
    /// No name could be determined; the default selection stands.
    Unresolved,
}

/// One-shot resolver for today's featured vanquish area.
pub struct FeaturedResolver {
    routes: Vec<String>,
    timeout: Duration,
}

impl FeaturedResolver {
    /// Resolver trying the given retrieval routes in order, each bounded by
    /// `timeout`. At most two routes are attempted.
    pub fn new(routes: Vec<String>, timeout: Duration) -> Self {
        let mut routes = routes;
        routes.truncate(2);
        Self { routes, timeout }
    }

    /// Run to completion and send the outcome to `sender`. A dropped
    /// receiver is fine; the result is simply discarded.
    pub async fn run(self, sender: mpsc::Sender<FeaturedEvent>) {
        let event = match self.resolve().await {
            Some(name) => FeaturedEvent::Resolved(name),
            None => FeaturedEvent::Unresolved,
        };
        let _ = sender.send(event).await;
    }

    /// Resolve today's featured area name, or `None` on any failure.
    pub async fn resolve(&self) -> Option<String> {
        let date = schedule::todays_quest_date();
        debug!(%date, "resolving featured vanquish");

        let html = self.fetch_cycles().await?;
        let cycles = parse_cycles(&html);
        if cycles.is_empty() {
            warn!("no rotation rows extracted from cycles page");
            return None;
        }

        match cycles.get(&date) {
            Some(name) => {
                info!(%date, area = %name, "featured vanquish resolved");
                Some(name.clone())
            }
            None => {
                debug!(%date, rows = cycles.len(), "no rotation entry for date");
                None
            }
        }
    }

    async fn fetch_cycles(&self) -> Option<String> {
        let client = match reqwest::Client::builder().timeout(self.timeout).build() {
            Ok(client) => client,
            Err(err) => {
                warn!(%err, "failed to build http client");
                return None;
            }
        };

        for route in &self.routes {
            debug!(%route, "trying cycles route");
            let response = client
                .get(route)
                .send()
                .await
                .and_then(|response| response.error_for_status());
            match response {
                Ok(response) => match response.text().await {
                    Ok(body) => {
                        debug!(%route, "cycles route succeeded");
                        return Some(body);
                    }
                    Err(err) => debug!(%route, %err, "failed to read cycles body"),
                },
                Err(err) => debug!(%route, %err, "cycles route failed"),
            }
        }

        debug!("all cycles routes exhausted");
        None
    }
}

static TABLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<table[^>]*class="[^"]*wikitable[^"]*"[^>]*>(.*?)</table>"#)
        .expect("invalid cycles table regex")
});
static ROW_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<tr[^>]*>(.*?)</tr>").expect("invalid row regex"));
static CELL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<t[dh][^>]*>(.*?)</t[dh]>").expect("invalid cell regex"));
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("invalid tag regex"));
static DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{2}-\d{2}-\d{2}$").expect("invalid date regex"));

/// Extract the date → area map from the first rotation table in the page.
/// Rows whose first cell is not a `YY-MM-DD` date (headers, separators) are
/// skipped; format drift yields an empty map rather than an error.
pub fn parse_cycles(html: &str) -> HashMap<String, String> {
    let mut cycles = HashMap::new();

    let Some(table) = TABLE_RE.captures(html).and_then(|caps| caps.get(1)) else {
        return cycles;
    };

    for row in ROW_RE.captures_iter(table.as_str()) {
        let cells: Vec<String> = CELL_RE
            .captures_iter(&row[1])
            .filter_map(|caps| caps.get(1))
            .map(|cell| cell_text(cell.as_str()))
            .collect();
        if cells.len() < 2 {
            continue;
        }

        let date = cells[0].as_str();
        let area = cells[1].as_str();
        if DATE_RE.is_match(date) && !area.is_empty() && area != "Area" {
            cycles.insert(date.to_string(), area.to_string());
        }
    }

    cycles
}

fn cell_text(raw: &str) -> String {
    let stripped = TAG_RE.replace_all(raw, "");
    decode_entities(stripped.trim())
}

fn decode_entities(text: &str) -> String {
    text.replace("&amp;", "&")
        .replace("&#39;", "'")
        .replace("&quot;", "\"")
        .replace("&nbsp;", " ")
        .trim()
        .to_string()
}
