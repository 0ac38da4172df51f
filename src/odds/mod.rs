//! Typed access to The Odds API (v4).
//!
//! [`OddsRequest`] describes one upstream call and knows both its cache key
//! and its upstream path/query. [`OddsClient`] performs the call and
//! [`OddsService`] puts the adaptive cache in front of it.
//!
//! Author: kelexine (<https://github.com/kelexine>)

mod client;
mod service;

pub use client::{OddsClient, UpstreamResponse};
pub use service::{Fetched, OddsService};

use crate::error::{OddsError, Result};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Sports that have no head-to-head market upstream.
const OUTRIGHT_ONLY_SPORTS: [&str; 5] = ["golf", "tennis", "mma", "boxing", "outrights"];

pub const DEFAULT_REGIONS: &str = "us,eu,uk";
pub const DEFAULT_MARKETS: &str = "h2h";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OddsFormat {
    American,
    #[default]
    Decimal,
    Hongkong,
    Indonesian,
    Malay,
}

impl OddsFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OddsFormat::American => "american",
            OddsFormat::Decimal => "decimal",
            OddsFormat::Hongkong => "hongkong",
            OddsFormat::Indonesian => "indonesian",
            OddsFormat::Malay => "malay",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateFormat {
    #[default]
    Iso,
    Unix,
}

impl DateFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            DateFormat::Iso => "iso",
            DateFormat::Unix => "unix",
        }
    }
}

/// Market/format selection for odds queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OddsOptions {
    pub regions: String,
    pub markets: String,
    pub odds_format: OddsFormat,
    pub date_format: DateFormat,
}

impl Default for OddsOptions {
    fn default() -> Self {
        Self {
            regions: DEFAULT_REGIONS.to_string(),
            markets: DEFAULT_MARKETS.to_string(),
            odds_format: OddsFormat::default(),
            date_format: DateFormat::default(),
        }
    }
}

impl OddsOptions {
    /// Options as actually sent for `sport`, markets adjusted.
    pub fn for_sport(&self, sport: &str) -> Self {
        Self {
            markets: appropriate_markets(sport, &self.markets),
            ..self.clone()
        }
    }
}

/// Swap a requested `h2h` market for `outrights` on sports that only offer outrights.
pub fn appropriate_markets(sport_key: &str, requested: &str) -> String {
    let sport = sport_key.to_lowercase();
    if OUTRIGHT_ONLY_SPORTS.iter().any(|s| sport.contains(s)) && requested.contains("h2h") {
        return "outrights".to_string();
    }
    requested.to_string()
}

/// One call against the upstream API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OddsRequest {
    Sports,
    Odds {
        sport: String,
        options: OddsOptions,
    },
    Scores {
        sport: String,
        date_format: DateFormat,
    },
    Events {
        sport: String,
        date_format: DateFormat,
    },
    HistoricalOdds {
        sport: String,
        date: String,
        options: OddsOptions,
    },
    HistoricalEvents {
        sport: String,
        date: String,
        date_format: DateFormat,
    },
    HistoricalEventOdds {
        sport: String,
        event_id: String,
        date: String,
        options: OddsOptions,
    },
}

impl OddsRequest {
    /// Resource tag, also used as the `type` query parameter and metric label.
    pub fn resource(&self) -> &'static str {
        match self {
            OddsRequest::Sports => "sports",
            OddsRequest::Odds { .. } => "odds",
            OddsRequest::Scores { .. } => "scores",
            OddsRequest::Events { .. } => "events",
            OddsRequest::HistoricalOdds { .. } => "historical_odds",
            OddsRequest::HistoricalEvents { .. } => "historical_events",
            OddsRequest::HistoricalEventOdds { .. } => "historical_event_odds",
        }
    }

    /// Cache key: resource tag followed by the call's parameters.
    pub fn cache_key(&self) -> String {
        match self {
            OddsRequest::Sports => "sports_list".to_string(),
            OddsRequest::Odds { sport, options } => {
                format!("odds_{}_{}", sport, options_json(&options.for_sport(sport)))
            }
            OddsRequest::Scores { sport, date_format } => {
                format!("scores_{}_{}", sport, date_format_json(*date_format))
            }
            OddsRequest::Events { sport, date_format } => {
                format!("events_{}_{}", sport, date_format_json(*date_format))
            }
            OddsRequest::HistoricalOdds {
                sport,
                date,
                options,
            } => format!("historical_odds_{}_{}_{}", sport, date, options_json(options)),
            OddsRequest::HistoricalEvents {
                sport,
                date,
                date_format,
            } => format!(
                "historical_events_{}_{}_{}",
                sport,
                date,
                date_format_json(*date_format)
            ),
            OddsRequest::HistoricalEventOdds {
                sport,
                event_id,
                date,
                options,
            } => format!(
                "historical_event_odds_{}_{}_{}_{}",
                sport,
                event_id,
                date,
                options_json(options)
            ),
        }
    }

    /// Check identifiers before anything is sent upstream.
    pub fn validate(&self) -> Result<()> {
        fn require(resource: &str, name: &str, value: &str) -> Result<()> {
            if value.trim().is_empty() {
                return Err(OddsError::InvalidRequest(format!(
                    "{} is required for {} requests",
                    name, resource
                )));
            }
            Ok(())
        }

        let resource = self.resource();
        match self {
            OddsRequest::Sports => Ok(()),
            OddsRequest::Odds { sport, .. }
            | OddsRequest::Scores { sport, .. }
            | OddsRequest::Events { sport, .. } => require(resource, "sportKey", sport),
            OddsRequest::HistoricalOdds { sport, date, .. }
            | OddsRequest::HistoricalEvents { sport, date, .. } => {
                require(resource, "sportKey", sport)?;
                require(resource, "date", date)
            }
            OddsRequest::HistoricalEventOdds {
                sport,
                event_id,
                date,
                ..
            } => {
                require(resource, "sportKey", sport)?;
                require(resource, "eventId", event_id)?;
                require(resource, "date", date)
            }
        }
    }

    /// Upstream path relative to the API base URL.
    pub fn path(&self) -> String {
        fn enc(s: &str) -> String {
            urlencoding::encode(s).into_owned()
        }

        match self {
            OddsRequest::Sports => "/sports".to_string(),
            OddsRequest::Odds { sport, .. } => format!("/sports/{}/odds", enc(sport)),
            OddsRequest::Scores { sport, .. } => format!("/sports/{}/scores", enc(sport)),
            OddsRequest::Events { sport, .. } => format!("/sports/{}/events", enc(sport)),
            OddsRequest::HistoricalOdds { sport, .. } => {
                format!("/historical/sports/{}/odds", enc(sport))
            }
            OddsRequest::HistoricalEvents { sport, .. } => {
                format!("/historical/sports/{}/events", enc(sport))
            }
            OddsRequest::HistoricalEventOdds {
                sport, event_id, ..
            } => format!(
                "/historical/sports/{}/events/{}/odds",
                enc(sport),
                enc(event_id)
            ),
        }
    }

    /// Upstream query parameters, excluding the API key.
    pub fn query(&self) -> Vec<(&'static str, String)> {
        match self {
            OddsRequest::Sports => Vec::new(),
            OddsRequest::Odds { sport, options } => odds_query(&options.for_sport(sport)),
            OddsRequest::Scores { date_format, .. } | OddsRequest::Events { date_format, .. } => {
                vec![("dateFormat", date_format.as_str().to_string())]
            }
            OddsRequest::HistoricalOdds { date, options, .. }
            | OddsRequest::HistoricalEventOdds { date, options, .. } => {
                let mut query = vec![("date", date.clone())];
                query.extend(odds_query(options));
                query
            }
            OddsRequest::HistoricalEvents {
                date, date_format, ..
            } => vec![
                ("date", date.clone()),
                ("dateFormat", date_format.as_str().to_string()),
            ],
        }
    }
}

fn options_json(options: &OddsOptions) -> String {
    serde_json::to_string(options).unwrap_or_default()
}

fn date_format_json(date_format: DateFormat) -> serde_json::Value {
    json!({ "dateFormat": date_format })
}

fn odds_query(options: &OddsOptions) -> Vec<(&'static str, String)> {
    vec![
        ("regions", options.regions.clone()),
        ("markets", options.markets.clone()),
        ("oddsFormat", options.odds_format.as_str().to_string()),
        ("dateFormat", options.date_format.as_str().to_string()),
    ]
}

/// Loosely-typed request parameters as received over HTTP.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestParams {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub sport_key: Option<String>,
    #[serde(alias = "region")]
    pub regions: Option<String>,
    pub markets: Option<String>,
    pub odds_format: Option<OddsFormat>,
    pub date_format: Option<DateFormat>,
    pub date: Option<String>,
    pub event_id: Option<String>,
}

impl RequestParams {
    /// Map parameters to a request. A missing `type` means the sports list.
    pub fn into_request(self) -> Result<OddsRequest> {
        let options = OddsOptions {
            regions: self.regions.unwrap_or_else(|| DEFAULT_REGIONS.to_string()),
            markets: self.markets.unwrap_or_else(|| DEFAULT_MARKETS.to_string()),
            odds_format: self.odds_format.unwrap_or_default(),
            date_format: self.date_format.unwrap_or_default(),
        };
        let date_format = options.date_format;
        let sport = self.sport_key.unwrap_or_default();
        let date = self.date.unwrap_or_default();

        let request = match self.kind.as_deref() {
            None | Some("sports") => OddsRequest::Sports,
            Some("odds") => OddsRequest::Odds { sport, options },
            Some("scores") => OddsRequest::Scores { sport, date_format },
            Some("events") => OddsRequest::Events { sport, date_format },
            Some("historical_odds") => OddsRequest::HistoricalOdds {
                sport,
                date,
                options,
            },
            Some("historical_events") => OddsRequest::HistoricalEvents {
                sport,
                date,
                date_format,
            },
            Some("historical_event_odds") => OddsRequest::HistoricalEventOdds {
                sport,
                event_id: self.event_id.unwrap_or_default(),
                date,
                options,
            },
            Some(other) => {
                return Err(OddsError::InvalidRequest(format!(
                    "unknown request type: {}",
                    other
                )))
            }
        };

        request.validate()?;
        Ok(request)
    }
}
