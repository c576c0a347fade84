//! Standings fetching.
//!
//! Pulls the current league table from the upstream standings API and
//! maps it into our `Team` rows. The upstream payload nests each team
//! under `standings[0].rows[]`; only the fields we score on are
//! deserialized, the rest of the payload is ignored.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};
use url::Url;

use crate::config::SourceConfig;
use crate::models::Team;

/// Errors that can occur while fetching standings.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("Upstream payload had no standings table")]
    EmptyStandings,
}

#[derive(Debug, Deserialize)]
struct StandingsPayload {
    standings: Vec<StandingsTable>,
}

#[derive(Debug, Deserialize)]
struct StandingsTable {
    rows: Vec<StandingsRow>,
}

#[derive(Debug, Deserialize)]
struct StandingsRow {
    team: UpstreamTeam,
    position: u32,
    points: i64,
    matches: u32,
    wins: u32,
    draws: u32,
    losses: u32,
    #[serde(rename = "scoresFor")]
    scores_for: u32,
    #[serde(rename = "scoresAgainst")]
    scores_against: u32,
}

#[derive(Debug, Deserialize)]
struct UpstreamTeam {
    id: u32,
    name: String,
    slug: String,
    #[serde(rename = "nameCode", default)]
    name_code: Option<String>,
}

/// HTTP client for the standings source.
pub struct StandingsFetcher {
    client: Client,
    config: SourceConfig,
}

impl StandingsFetcher {
    /// Create a new fetcher from source configuration.
    pub fn new(config: SourceConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .unwrap_or_else(|_| HeaderValue::from_static("pool-tracker/0.1.0")),
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .default_headers(headers)
            .build()?;

        Ok(Self { client, config })
    }

    /// URL of the total-standings endpoint for the configured season.
    fn standings_url(&self) -> Result<Url, FetchError> {
        let raw = format!(
            "{}/unique-tournament/{}/season/{}/standings/total",
            self.config.base_url.trim_end_matches('/'),
            self.config.tournament_id,
            self.config.season_id,
        );
        Url::parse(&raw).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", raw, e)))
    }

    /// Fetch the current table, retrying transient failures.
    pub async fn fetch_standings(&self) -> Result<Vec<Team>, FetchError> {
        let url = self.standings_url()?;
        let mut last_err: Option<FetchError> = None;

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                warn!(
                    "Standings fetch attempt {} failed, retrying in {}s",
                    attempt, self.config.retry_delay_seconds
                );
                tokio::time::sleep(Duration::from_secs(self.config.retry_delay_seconds)).await;
            }

            match self.fetch_once(&url).await {
                Ok(teams) => {
                    info!("Fetched standings: {} teams from {}", teams.len(), url);
                    return Ok(teams);
                }
                Err(e) => last_err = Some(e),
            }
        }

        Err(last_err.unwrap_or(FetchError::EmptyStandings))
    }

    async fn fetch_once(&self, url: &Url) -> Result<Vec<Team>, FetchError> {
        let response = self.client.get(url.as_str()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let payload: StandingsPayload = response.json().await?;
        let table = payload
            .standings
            .into_iter()
            .next()
            .ok_or(FetchError::EmptyStandings)?;

        Ok(table.rows.into_iter().map(map_row).collect())
    }
}

/// Map one upstream row into a `Team`.
fn map_row(row: StandingsRow) -> Team {
    let short_code = row
        .team
        .name_code
        .unwrap_or_else(|| abbreviate(&row.team.name));

    let mut team = Team::new(row.team.id, row.team.name, row.team.slug, short_code);
    team.position = row.position;
    team.points = row.points;
    team.played = row.matches;
    team.wins = row.wins;
    team.draws = row.draws;
    team.losses = row.losses;
    team.goals_for = row.scores_for;
    team.goals_against = row.scores_against;
    team
}

/// Fallback three-letter code when the source omits one.
fn abbreviate(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphabetic())
        .take(3)
        .collect::<String>()
        .to_uppercase()
}
