use std::time::Duration;

use serde_json::{json, Value};

use super::{now_iso8601, Leaderboard, ScoreEntry, DEFAULT_PLAYER_NAME, MAX_HIGH_SCORES};
use crate::config::RemoteConfig;
use crate::error::{LeaderboardError, Result};

pub const LEADERBOARD_TABLE: &str = "catch_targets_scores";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Hosted ranked table behind a PostgREST (Supabase) endpoint
#[derive(Debug, Clone)]
pub struct RemoteBoard {
    table_url: String,
    anon_key: String,
    agent: ureq::Agent,
}

impl RemoteBoard {
    pub fn new(config: &RemoteConfig) -> Self {
        let table_url = format!(
            "{}/rest/v1/{}",
            config.base_url.trim_end_matches('/'),
            LEADERBOARD_TABLE
        );
        Self {
            table_url,
            anon_key: config.anon_key.clone(),
            agent: ureq::AgentBuilder::new().timeout(REQUEST_TIMEOUT).build(),
        }
    }

    pub fn table_url(&self) -> &str {
        &self.table_url
    }

    fn request(&self, method: &str, url: &str) -> ureq::Request {
        self.agent
            .request(method, url)
            .set("Content-Type", "application/json")
            .set("apikey", &self.anon_key)
            .set("Authorization", &format!("Bearer {}", self.anon_key))
            .set("Prefer", "return=minimal")
    }
}

impl Leaderboard for RemoteBoard {
    fn fetch_top(&self) -> Result<Vec<ScoreEntry>> {
        let url = format!(
            "{}?select=name,score,created_at&order=score.desc&limit={}",
            self.table_url, MAX_HIGH_SCORES
        );
        let body: Value = self.request("GET", &url).call()?.into_json()?;
        let rows = body
            .as_array()
            .ok_or_else(|| LeaderboardError::Malformed(format!("expected array, got {body}")))?;
        Ok(rows
            .iter()
            .take(MAX_HIGH_SCORES)
            .map(entry_from_row)
            .collect())
    }

    fn submit(&self, entry: &ScoreEntry) -> Result<()> {
        self.request("POST", &self.table_url)
            .send_json(json!({ "name": entry.name, "score": entry.score }))?;
        Ok(())
    }
}

/// Maps one table row, filling gaps the way a lenient reader would.
fn entry_from_row(row: &Value) -> ScoreEntry {
    let name = row
        .get("name")
        .and_then(Value::as_str)
        .filter(|n| !n.is_empty())
        .unwrap_or(DEFAULT_PLAYER_NAME)
        .to_string();
    let date = row
        .get("created_at")
        .and_then(Value::as_str)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
        .unwrap_or_else(now_iso8601);
    ScoreEntry {
        name,
        score: row.get("score").map_or(0, score_from_value),
        date,
    }
}

fn score_from_value(value: &Value) -> u32 {
    let n = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    if n.is_finite() && n > 0.0 {
        n.min(u32::MAX as f64) as u32
    } else {
        0
    }
}
