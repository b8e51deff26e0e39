use std::collections::HashMap;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;

/// A raw bag of stats as the match archive stores them: named numeric
/// columns, with strings and nulls showing up in the wild. Anything
/// non-numeric reads as 0.0 downstream.
pub type StatBag = HashMap<String, Value>;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchTeams {
    #[serde(default)]
    pub t1: String,
    #[serde(default)]
    pub t2: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchMetadata {
    #[serde(rename = "MatchDate", default)]
    pub match_date: String,
}

/// One match as exported by the archive: two team names, per-player
/// bags, and (optionally) per-quarter bags.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchRecord {
    #[serde(rename = "MatchID", default)]
    pub match_id: String,
    #[serde(rename = "Category", default)]
    pub category: String,
    #[serde(rename = "Metadata", default)]
    pub metadata: MatchMetadata,
    #[serde(rename = "Teams", default)]
    pub teams: MatchTeams,
    /// Player name -> stat bag for the full game. Side totals are
    /// rebuilt from these rows rather than trusted from the export.
    #[serde(rename = "PlayerStats", default)]
    pub player_stats: HashMap<String, StatBag>,
    /// "Q1".."Q4" -> player name -> stat bag for that quarter.
    #[serde(rename = "PeriodStats", default)]
    pub period_stats: HashMap<String, HashMap<String, StatBag>>,
}

impl MatchRecord {
    /// Team on the other side of this match, if `team` is one of the two.
    pub fn opponent_of(&self, team: &str) -> Option<&str> {
        if team == self.teams.t1 {
            Some(self.teams.t2.as_str())
        } else if team == self.teams.t2 {
            Some(self.teams.t1.as_str())
        } else {
            None
        }
    }
}

/// An in-memory match archive plus a version stamp. Any mutation bumps
/// the version, which is what the engine cache keys on.
#[derive(Debug, Clone, Default)]
pub struct Archive {
    matches: Vec<MatchRecord>,
    version: u64,
}

impl Archive {
    pub fn new(matches: Vec<MatchRecord>) -> Self {
        Self {
            matches,
            version: 1,
        }
    }

    pub fn matches(&self) -> &[MatchRecord] {
        &self.matches
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn replace_matches(&mut self, matches: Vec<MatchRecord>) {
        self.matches = matches;
        self.version += 1;
    }
}

/// Parse an archive JSON document. Accepts the three shapes seen in
/// production exports: a plain list of matches, an object wrapped as
/// `{"Matches": [...]}`, or an object keyed by match id.
pub fn parse_archive_json(raw: &str) -> Result<Vec<MatchRecord>> {
    let value: Value = serde_json::from_str(raw).context("parse archive json")?;

    match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| serde_json::from_value(item).context("parse match record"))
            .collect(),
        Value::Object(map) => {
            if let Some(wrapped) = map.get("Matches").or_else(|| map.get("matches")) {
                let items = wrapped
                    .as_array()
                    .context("archive 'Matches' should be a list")?;
                return items
                    .iter()
                    .map(|item| serde_json::from_value(item.clone()).context("parse match record"))
                    .collect();
            }
            let mut out = Vec::with_capacity(map.len());
            for (key, item) in map {
                let mut m: MatchRecord =
                    serde_json::from_value(item).with_context(|| format!("parse match {key}"))?;
                if m.match_id.is_empty() {
                    m.match_id = key;
                }
                out.push(m);
            }
            Ok(out)
        }
        _ => anyhow::bail!("archive json should be a list or object of matches"),
    }
}

/// Read a numeric field out of a raw stat bag. Missing keys, nulls and
/// unparseable strings all count as 0.0; the archive is never trusted to
/// be complete.
pub fn bag_num(bag: &StatBag, key: &str) -> f64 {
    match bag.get(key) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        Some(Value::Bool(b)) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        _ => 0.0,
    }
}

/// Read a string field out of a raw stat bag, numbers included (jersey
/// numbers come through both ways).
pub fn bag_str(bag: &StatBag, key: &str) -> String {
    match bag.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}
