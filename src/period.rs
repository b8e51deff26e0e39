use std::collections::HashMap;

use serde_json::Value;

use crate::archive::{StatBag, bag_num};
use crate::display::is_rate_key;

/// Which slice of a game a request covers. Quarters are 1-4; anything
/// else in the archive is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PeriodSelector {
    Quarter(u8),
    FirstHalf,
    SecondHalf,
    FullGame,
}

impl PeriodSelector {
    /// Archive keys for the quarters this selector spans. Empty for a
    /// full game, which reads the game-level stats directly.
    pub fn quarter_keys(&self) -> &'static [&'static str] {
        match self {
            Self::Quarter(1) => &["Q1"],
            Self::Quarter(2) => &["Q2"],
            Self::Quarter(3) => &["Q3"],
            Self::Quarter(4) => &["Q4"],
            Self::Quarter(_) => &[],
            Self::FirstHalf => &["Q1", "Q2"],
            Self::SecondHalf => &["Q3", "Q4"],
            Self::FullGame => &[],
        }
    }

    /// Total team minutes available per game in this slice, the
    /// usage-rate denominator heuristic: 5 players on the floor for
    /// 40 / 20 / 10 minutes.
    pub fn team_minutes_per_game(&self) -> f64 {
        match self {
            Self::FullGame => 200.0,
            Self::FirstHalf | Self::SecondHalf => 100.0,
            Self::Quarter(_) => 50.0,
        }
    }

    /// Clock minutes one team plays in this slice.
    pub fn side_minutes_per_game(&self) -> f64 {
        self.team_minutes_per_game() / 5.0
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Quarter(1) => "Q1",
            Self::Quarter(2) => "Q2",
            Self::Quarter(3) => "Q3",
            Self::Quarter(4) => "Q4",
            Self::Quarter(_) => "Q?",
            Self::FirstHalf => "1st Half",
            Self::SecondHalf => "2nd Half",
            Self::FullGame => "Full Game",
        }
    }
}

/// Identity and label keys. Always merged first-occurrence, even when
/// the stored value happens to parse as a number (jersey numbers do).
const CATEGORICAL_KEYS: &[&str] = &["No", "Team", "Player", "Category", "Date", "MatchDate"];

/// Merge period-tagged raw bags for one player into a single bag:
/// counting fields summed, categorical fields taken from the first
/// occurrence, and any key recognized as a rate or composite metric
/// dropped entirely. A per-quarter percentage carried into a combined
/// record is exactly the corruption this function exists to prevent;
/// the derived calculator recomputes rates from the summed counts.
pub fn combine_period_bags(bags: &[&StatBag]) -> StatBag {
    let mut sums: HashMap<String, f64> = HashMap::new();
    let mut merged = StatBag::new();

    for bag in bags {
        for (key, value) in bag.iter() {
            if is_rate_key(key) {
                continue;
            }
            if CATEGORICAL_KEYS.contains(&key.as_str()) {
                merged.entry(key.clone()).or_insert_with(|| value.clone());
                continue;
            }
            match value {
                Value::Number(_) => {
                    *sums.entry(key.clone()).or_insert(0.0) += bag_num(bag, key);
                }
                Value::String(s) if s.trim().parse::<f64>().is_ok() => {
                    *sums.entry(key.clone()).or_insert(0.0) += bag_num(bag, key);
                }
                _ => {
                    merged.entry(key.clone()).or_insert_with(|| value.clone());
                }
            }
        }
    }

    for (key, total) in sums {
        merged.insert(key, Value::from(total));
    }
    merged
}

/// Best-effort classification of what time slice a dataset covers,
/// judged from the median per-player minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodKind {
    Quarter,
    Half,
    FullGame,
}

/// Heuristic period-length classifier over noisy data: median minutes
/// below 4 reads as quarter records, 4-12 as half records, above 12 as
/// full games. Callers with an explicit period tag should prefer it
/// over this guess.
pub fn infer_period_kind(minutes: &[f64]) -> PeriodKind {
    let mut sorted: Vec<f64> = minutes.iter().copied().filter(|m| m.is_finite()).collect();
    if sorted.is_empty() {
        return PeriodKind::FullGame;
    }
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    let median = if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    };

    if median < 4.0 {
        PeriodKind::Quarter
    } else if median <= 12.0 {
        PeriodKind::Half
    } else {
        PeriodKind::FullGame
    }
}
