use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;

use crate::archive::{MatchRecord, StatBag};
use crate::period::{PeriodSelector, combine_period_bags};
use crate::record::{AggregateRecord, CountingLine, StatRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityType {
    Players,
    Teams,
}

/// One normalized record per player per game for the requested period
/// slice. Full game reads the game-level stats; any other selector
/// combines the matching quarter bags per player. A match without the
/// requested sub-records contributes nothing (empty result, not an
/// error).
pub fn daily_player_records(matches: &[MatchRecord], period: PeriodSelector) -> Vec<StatRecord> {
    let mut out = Vec::new();

    for m in matches {
        let bags: Vec<(String, StatBag)> = if period == PeriodSelector::FullGame {
            m.player_stats
                .iter()
                .map(|(name, bag)| (name.clone(), bag.clone()))
                .collect()
        } else {
            let mut per_player: HashMap<&String, Vec<&StatBag>> = HashMap::new();
            for key in period.quarter_keys() {
                if let Some(quarter) = m.period_stats.get(*key) {
                    for (name, bag) in quarter {
                        per_player.entry(name).or_default().push(bag);
                    }
                }
            }
            per_player
                .into_iter()
                .map(|(name, bags)| (name.clone(), combine_period_bags(&bags)))
                .collect()
        };

        for (name, bag) in bags {
            let mut rec = StatRecord::from_bag(&bag).normalized();
            rec.player = name;
            rec.match_id = m.match_id.clone();
            rec.category = m.category.clone();
            rec.date = m.metadata.match_date.clone();
            rec.opponent = m.opponent_of(&rec.team).unwrap_or_default().to_string();
            rec.infer_two_point_split();
            out.push(rec);
        }
    }

    out
}

/// Per-game side totals summed from the daily player rows, keyed by
/// (match id, team name).
fn side_totals(records: &[StatRecord]) -> HashMap<(String, String), (CountingLine, f64)> {
    let mut totals: HashMap<(String, String), (CountingLine, f64)> = HashMap::new();
    for rec in records {
        if rec.team.is_empty() {
            continue;
        }
        let entry = totals
            .entry((rec.match_id.clone(), rec.team.clone()))
            .or_default();
        entry.0.add(&rec.line);
        entry.1 += rec.minutes;
    }
    totals
}

/// Inject per-game team and opponent context into each daily record,
/// before any cross-game summation. Summing "my team's attempts in each
/// game" is valid on the aggregate; summing a per-game rate is not,
/// which is why context rides along as counting fields.
///
/// Records whose team matches neither side of their match keep zeroed
/// context: defensive-side metrics degrade to zero rather than failing
/// the computation.
pub fn inject_team_context(records: &mut [StatRecord]) {
    let totals = side_totals(records);

    // Map each match to the sides actually seen, for opponent fallback
    // when the record has no opponent label.
    let mut sides_by_match: HashMap<String, Vec<String>> = HashMap::new();
    for (mid, team) in totals.keys() {
        let sides = sides_by_match.entry(mid.clone()).or_default();
        if !sides.contains(team) {
            sides.push(team.clone());
        }
    }

    for rec in records.iter_mut() {
        if let Some((line, minutes)) = totals.get(&(rec.match_id.clone(), rec.team.clone())) {
            rec.team_ctx = *line;
            rec.team_minutes = *minutes;
            rec.off_pts = line.pts;
        }

        let opponent = if rec.opponent.is_empty() {
            sides_by_match
                .get(&rec.match_id)
                .and_then(|sides| sides.iter().find(|s| **s != rec.team))
                .cloned()
                .unwrap_or_default()
        } else {
            rec.opponent.clone()
        };
        if let Some((line, _)) = totals.get(&(rec.match_id.clone(), opponent.clone())) {
            rec.opp_ctx = *line;
            rec.opp_pts = line.pts;
            rec.def_pts = line.pts;
        }
    }
}

fn aggregate_by_key<F>(records: &[StatRecord], key_of: F) -> Vec<AggregateRecord>
where
    F: Fn(&StatRecord) -> String,
{
    let mut groups: HashMap<String, (AggregateRecord, HashSet<String>)> = HashMap::new();
    let mut order: Vec<String> = Vec::new();

    for rec in records {
        if !rec.is_active() {
            continue;
        }
        let key = key_of(rec);
        let entry = groups.entry(key.clone()).or_insert_with(|| {
            order.push(key);
            // Identity fields come from the first occurrence; counting
            // content starts from zero and accumulates below.
            let first = StatRecord {
                player: rec.player.clone(),
                team: rec.team.clone(),
                no: rec.no.clone(),
                category: rec.category.clone(),
                date: rec.date.clone(),
                ..StatRecord::default()
            };
            (
                AggregateRecord {
                    rec: first,
                    games_played: 0,
                },
                HashSet::new(),
            )
        });
        entry.0.rec.accumulate(rec);
        entry.1.insert(rec.match_id.clone());
    }

    order
        .into_iter()
        .filter_map(|key| {
            groups.remove(&key).map(|(mut agg, games)| {
                agg.games_played = u32::try_from(games.len()).unwrap_or(u32::MAX);
                agg
            })
        })
        .collect()
}

/// Temporal Aggregator, player mode: one AggregateRecord per
/// (player, team) identity. `games_played` counts distinct game ids,
/// never period records; rows failing the activity check are treated as
/// did-not-appear and excluded from both the sums and the game count.
pub fn aggregate_players(records: &[StatRecord]) -> Vec<AggregateRecord> {
    aggregate_by_key(records, |rec| format!("{}|{}", rec.player, rec.team))
}

/// One record per team per game, summed from the daily player rows and
/// paired with the opposing side's totals.
pub fn team_game_records(matches: &[MatchRecord], period: PeriodSelector) -> Vec<StatRecord> {
    let daily = daily_player_records(matches, period);
    let totals = side_totals(&daily);

    let mut category_by_match: HashMap<&str, &str> = HashMap::new();
    let mut date_by_match: HashMap<&str, &str> = HashMap::new();
    for m in matches {
        category_by_match.insert(m.match_id.as_str(), m.category.as_str());
        date_by_match.insert(m.match_id.as_str(), m.metadata.match_date.as_str());
    }

    let mut sides_by_match: HashMap<&str, Vec<&str>> = HashMap::new();
    for (mid, team) in totals.keys() {
        sides_by_match
            .entry(mid.as_str())
            .or_default()
            .push(team.as_str());
    }

    let mut out = Vec::with_capacity(totals.len());
    for ((mid, team), (line, minutes)) in &totals {
        let opponent = sides_by_match
            .get(mid.as_str())
            .and_then(|sides| sides.iter().find(|s| **s != team.as_str()))
            .copied()
            .unwrap_or_default();
        let (opp_line, _) = totals
            .get(&(mid.clone(), opponent.to_string()))
            .copied()
            .unwrap_or_default();

        out.push(StatRecord {
            team: team.clone(),
            category: category_by_match
                .get(mid.as_str())
                .copied()
                .unwrap_or_default()
                .to_string(),
            match_id: mid.clone(),
            date: date_by_match
                .get(mid.as_str())
                .copied()
                .unwrap_or_default()
                .to_string(),
            opponent: opponent.to_string(),
            minutes: *minutes,
            line: *line,
            off_pts: line.pts,
            def_pts: opp_line.pts,
            team_ctx: *line,
            team_minutes: *minutes,
            opp_ctx: opp_line,
            opp_pts: opp_line.pts,
            ..StatRecord::default()
        });
    }

    out
}

/// Temporal Aggregator, team mode: one AggregateRecord per
/// (category, team) identity — the category tag disambiguates
/// identically-named teams across divisions. Aggregate minutes are the
/// nominal clock for the slice (games x period length), not summed
/// player minutes.
pub fn aggregate_teams(records: &[StatRecord], period: PeriodSelector) -> Vec<AggregateRecord> {
    let mut aggs = aggregate_by_key(records, |rec| format!("{}|{}", rec.category, rec.team));
    for agg in &mut aggs {
        agg.rec.minutes = f64::from(agg.games_played) * period.side_minutes_per_game();
    }
    aggs
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    for fmt in ["%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(date);
        }
    }
    None
}

/// Keep the records dated inside `[from, to]` (either bound optional).
/// Records without a parseable date are kept only when no bound is set.
pub fn filter_by_date(
    records: &[StatRecord],
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Vec<StatRecord> {
    if from.is_none() && to.is_none() {
        return records.to_vec();
    }
    records
        .iter()
        .filter(|rec| {
            let Some(date) = parse_date(&rec.date) else {
                return false;
            };
            from.is_none_or(|lo| date >= lo) && to.is_none_or(|hi| date <= hi)
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player_rec(player: &str, team: &str, match_id: &str, pts: f64, minutes: f64) -> StatRecord {
        StatRecord {
            player: player.into(),
            team: team.into(),
            match_id: match_id.into(),
            minutes,
            line: CountingLine {
                pts,
                fgm: pts / 2.0,
                fga: pts,
                ..CountingLine::default()
            },
            ..StatRecord::default()
        }
    }

    #[test]
    fn games_played_counts_distinct_games() {
        let records = vec![
            player_rec("Asha", "Eagles", "m1", 10.0, 20.0),
            player_rec("Asha", "Eagles", "m1", 4.0, 5.0),
            player_rec("Asha", "Eagles", "m2", 12.0, 22.0),
        ];
        let aggs = aggregate_players(&records);
        assert_eq!(aggs.len(), 1);
        assert_eq!(aggs[0].games_played, 2);
        assert_eq!(aggs[0].rec.line.pts, 26.0);
    }

    #[test]
    fn inactive_records_do_not_count_as_appearances() {
        let mut dnp = player_rec("Ben", "Eagles", "m1", 0.0, 0.0);
        dnp.line = CountingLine::default();
        let records = vec![dnp, player_rec("Ben", "Eagles", "m2", 8.0, 15.0)];
        let aggs = aggregate_players(&records);
        assert_eq!(aggs[0].games_played, 1);
        assert_eq!(aggs[0].rec.line.pts, 8.0);
    }

    #[test]
    fn aggregate_sum_invariant_over_disjoint_sets() {
        let set_a = vec![
            player_rec("Asha", "Eagles", "m1", 10.0, 20.0),
            player_rec("Asha", "Eagles", "m2", 14.0, 25.0),
        ];
        let set_b = vec![player_rec("Asha", "Eagles", "m3", 20.0, 30.0)];
        let mut both = set_a.clone();
        both.extend(set_b.clone());

        let agg_a = &aggregate_players(&set_a)[0];
        let agg_b = &aggregate_players(&set_b)[0];
        let agg_union = &aggregate_players(&both)[0];

        assert_eq!(
            agg_union.rec.line.pts,
            agg_a.rec.line.pts + agg_b.rec.line.pts
        );
        assert_eq!(
            agg_union.rec.line.fga,
            agg_a.rec.line.fga + agg_b.rec.line.fga
        );
        assert_eq!(agg_union.rec.minutes, agg_a.rec.minutes + agg_b.rec.minutes);
        assert_eq!(
            agg_union.games_played,
            agg_a.games_played + agg_b.games_played
        );
    }

    #[test]
    fn context_injection_pairs_opponents() {
        let mut records = vec![
            player_rec("Asha", "Eagles", "m1", 10.0, 20.0),
            player_rec("Bina", "Eagles", "m1", 6.0, 18.0),
            player_rec("Cara", "Hawks", "m1", 12.0, 21.0),
        ];
        records[0].opponent = "Hawks".into();
        records[1].opponent = "Hawks".into();
        records[2].opponent = "Eagles".into();
        inject_team_context(&mut records);

        assert_eq!(records[0].team_ctx.pts, 16.0);
        assert_eq!(records[0].opp_ctx.pts, 12.0);
        assert_eq!(records[0].off_pts, 16.0);
        assert_eq!(records[0].def_pts, 12.0);
        assert_eq!(records[2].opp_ctx.pts, 16.0);
    }

    #[test]
    fn unmatched_team_degrades_to_zero_context() {
        let mut records = vec![player_rec("Asha", "Eagles", "m1", 10.0, 20.0)];
        records[0].opponent = "Ghosts".into();
        inject_team_context(&mut records);
        assert_eq!(records[0].opp_ctx, CountingLine::default());
        assert_eq!(records[0].def_pts, 0.0);
    }

    #[test]
    fn team_aggregate_minutes_follow_period_length() {
        let mut eagles = player_rec("", "Eagles", "m1", 34.0, 100.0);
        let mut hawks = player_rec("", "Hawks", "m1", 30.0, 100.0);
        eagles.opponent = "Hawks".into();
        hawks.opponent = "Eagles".into();
        let aggs = aggregate_teams(&[eagles, hawks], PeriodSelector::FirstHalf);
        assert_eq!(aggs.len(), 2);
        assert!(aggs.iter().all(|a| a.rec.minutes == 20.0));
    }

    #[test]
    fn date_filter_bounds() {
        let mut r1 = player_rec("Asha", "Eagles", "m1", 10.0, 20.0);
        r1.date = "2025-01-10".into();
        let mut r2 = player_rec("Asha", "Eagles", "m2", 12.0, 20.0);
        r2.date = "2025-01-20".into();
        let from = NaiveDate::from_ymd_opt(2025, 1, 15);
        let kept = filter_by_date(&[r1.clone(), r2.clone()], from, None);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].match_id, "m2");
        assert_eq!(filter_by_date(&[r1, r2], None, None).len(), 2);
    }
}
