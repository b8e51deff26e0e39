//! Column vocabularies and formatting policy for external renderers.
//!
//! The engine computes under internal metric names; displays use one of
//! two parallel vocabularies (totals vs per-game). The alias tables
//! below are the contract renderers rely on so they never recompute a
//! formula just to relabel it.

use crate::aggregate::EntityType;

/// Internal name -> totals-view display label.
pub const TOTALS_MAP: &[(&str, &str)] = &[
    ("GP", "G"),
    ("MIN_CALC", "Mins"),
    ("PTS", "Pts"),
    ("FGM", "FGM"),
    ("FGA", "FGA"),
    ("FG%", "FG%"),
    ("2PM", "2PM"),
    ("2PA", "2PA"),
    ("2P%", "2P%"),
    ("3PM", "3PM"),
    ("3PA", "3PA"),
    ("3P%", "3P%"),
    ("FTM", "FTM"),
    ("FTA", "FTA"),
    ("FT%", "FT%"),
    ("OREB", "OR"),
    ("DREB", "DR"),
    ("REB", "REB"),
    ("AST", "AST"),
    ("STL", "STL"),
    ("TOV", "TO"),
    ("BLK", "BLK"),
    ("PF", "PF"),
    ("FD", "FD"),
    ("Eff", "EFF"),
    ("eFG%", "eFG%"),
    ("TS%", "TS%"),
    ("TSA", "TSA"),
    ("AST/TO", "A/TO"),
    ("OFFRTG", "Off Rat"),
];

/// Internal name -> per-game-view display label.
pub const PER_GAME_MAP: &[(&str, &str)] = &[
    ("GP", "G"),
    ("MIN_CALC", "MPG"),
    ("PTS", "PPG"),
    ("FGM", "FGMPG"),
    ("FGA", "FGAPG"),
    ("FG%", "FG%"),
    ("2PM", "2PMPG"),
    ("2PA", "2PAPG"),
    ("2P%", "2P%"),
    ("3PM", "3PMPG"),
    ("3PA", "3PAPG"),
    ("3P%", "3P%"),
    ("FTM", "FTMPG"),
    ("FTA", "FTAPG"),
    ("FT%", "FT%"),
    ("OREB", "ORPG"),
    ("DREB", "DRPG"),
    ("REB", "RPG"),
    ("AST", "APG"),
    ("STL", "STPG"),
    ("TOV", "TOPG"),
    ("BLK", "BLKPG"),
    ("PF", "PFPG"),
    ("FD", "FOPG"),
    ("Eff", "EFF"),
    ("eFG%", "eFG%"),
    ("TS%", "TS%"),
    ("TSA", "TSAPG"),
    ("AST/TO", "A/TO"),
    ("OFFRTG", "Off Rat"),
];

/// Raw tallies that are valid to sum and to scale linearly.
pub const COUNTING_STATS: &[&str] = &[
    "PTS", "FGM", "FGA", "3PM", "3PA", "FTM", "FTA", "2PM", "2PA", "OREB", "DREB", "REB", "AST",
    "STL", "BLK", "TOV", "PF", "FD", "Eff", "+/-",
];

/// Percentages, ratios and composites: recomputed from summed counting
/// fields, never summed, averaged or scaled directly.
pub const RATE_STATS: &[&str] = &[
    "FG%", "2P%", "3P%", "FT%", "eFG%", "TS%", "USG%", "AST%", "OFFRTG", "DEFRTG", "NETRTG", "PIE",
    "GmScr", "AST/TO", "FIC", "OREB%", "DREB%", "REB%", "TO RATIO", "AST RATIO",
];

/// Whether an archive/display key names a rate or composite metric. The
/// period combiner drops these outright so a stale per-period value can
/// never survive into a merged record.
pub fn is_rate_key(key: &str) -> bool {
    key.contains('%') || RATE_STATS.contains(&key)
}

pub fn is_counting_key(key: &str) -> bool {
    COUNTING_STATS.contains(&key)
}

fn lookup(
    table: &'static [(&'static str, &'static str)],
    internal: &str,
) -> Option<&'static str> {
    table.iter().find(|(k, _)| *k == internal).map(|(_, v)| *v)
}

pub fn totals_label(internal: &str) -> Option<&'static str> {
    lookup(TOTALS_MAP, internal)
}

pub fn per_game_label(internal: &str) -> Option<&'static str> {
    lookup(PER_GAME_MAP, internal)
}

/// Reverse lookup: resolve a column name that may be either an internal
/// name or a label from either display vocabulary.
pub fn internal_name(column: &str) -> Option<&'static str> {
    for table in [TOTALS_MAP, PER_GAME_MAP] {
        for (internal, label) in table {
            if column == *internal || column == *label {
                return Some(internal);
            }
        }
    }
    None
}

/// Standard box-score column set for a view.
pub fn standard_columns(entity: EntityType) -> Vec<&'static str> {
    let mut cols = vec![
        "GP", "No", "Player", "Team", "MIN_CALC", "PTS", "FGM", "FGA", "FG%", "2PM", "2PA", "2P%",
        "3PM", "3PA", "3P%", "TSA", "TS%", "FTA", "FTM", "OREB", "DREB", "REB", "AST", "STL",
        "TOV", "AST/TO", "BLK", "PF", "FD", "Eff",
    ];
    if entity == EntityType::Teams {
        cols.retain(|c| *c != "No" && *c != "Player");
    }
    cols
}

/// Advanced metrics column set for a view.
pub fn advanced_columns(entity: EntityType) -> Vec<&'static str> {
    let mut cols = vec![
        "Player", "Team", "MIN_CALC", "OFFRTG", "DEFRTG", "NETRTG", "AST%", "USG%", "TS%", "eFG%",
        "PIE", "GmScr",
    ];
    if entity == EntityType::Teams {
        cols.retain(|c| *c != "Player");
        cols.extend(["OREB%", "DREB%", "REB%"]);
    }
    cols
}

/// Rounding/casting policy: counting stats render as integers in totals
/// view; everything else (per-game counting stats, rates, unknown
/// columns) gets one decimal. Column names may come in under either
/// vocabulary.
pub fn format_value(column: &str, value: f64, per_game: bool) -> String {
    let target = internal_name(column).unwrap_or(column);
    if is_counting_key(target) && !per_game {
        format!("{:.0}", value.round())
    } else {
        format!("{value:.1}")
    }
}

/// Decimal minutes rendered as MM:SS.
pub fn format_mins(value: f64) -> String {
    if !value.is_finite() || value < 0.0 {
        return "00:00".to_string();
    }
    let mins = value.trunc() as u64;
    let secs = ((value - value.trunc()) * 60.0) as u64;
    format!("{mins:02}:{secs:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vocabularies_map_same_metric_to_both_labels() {
        assert_eq!(totals_label("PTS"), Some("Pts"));
        assert_eq!(per_game_label("PTS"), Some("PPG"));
        assert_eq!(internal_name("PPG"), Some("PTS"));
        assert_eq!(internal_name("Pts"), Some("PTS"));
        assert_eq!(internal_name("PTS"), Some("PTS"));
    }

    #[test]
    fn rate_keys_are_recognized() {
        assert!(is_rate_key("eFG%"));
        assert!(is_rate_key("OFFRTG"));
        assert!(is_rate_key("AST/TO"));
        assert!(!is_rate_key("PTS"));
        assert!(!is_rate_key("AST"));
    }

    #[test]
    fn formatting_policy_per_mode() {
        assert_eq!(format_value("PTS", 123.0, false), "123");
        assert_eq!(format_value("PPG", 12.34, true), "12.3");
        assert_eq!(format_value("eFG%", 56.25, false), "56.2");
    }

    #[test]
    fn team_columns_drop_player_identity() {
        let cols = standard_columns(EntityType::Teams);
        assert!(!cols.contains(&"Player"));
        assert!(!cols.contains(&"No"));
        assert!(cols.contains(&"Team"));
    }

    #[test]
    fn minutes_render_as_clock() {
        assert_eq!(format_mins(17.5), "17:30");
        assert_eq!(format_mins(0.0), "00:00");
        assert_eq!(format_mins(f64::NAN), "00:00");
    }
}
