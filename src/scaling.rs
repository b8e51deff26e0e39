use crate::metrics::{MetricParams, PlayerDerived, player_derived};
use crate::record::{AggregateRecord, StatRecord};

/// How an aggregate is presented: raw totals, divided by games played,
/// or normalized to a 36-minute floor share.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatMode {
    Totals,
    PerGame,
    Per36,
}

fn divide_record(rec: &mut StatRecord, divisor: f64) {
    if divisor <= 0.0 {
        return;
    }
    rec.minutes /= divisor;
    rec.minutes_raw /= divisor;
    rec.line.divide_by(divisor);
    rec.off_pts /= divisor;
    rec.def_pts /= divisor;
    rec.team_ctx.divide_by(divisor);
    rec.team_minutes /= divisor;
    rec.opp_ctx.divide_by(divisor);
    rec.opp_pts /= divisor;
}

/// Scaling Engine: transform an aggregate's counting fields for the
/// requested mode. Only counting fields scale — rate metrics are not on
/// the record and get recomputed afterwards. Per-36 drops zero-minute
/// records (`None`) and pins minutes at exactly 36 for display
/// consistency.
pub fn scale_aggregate(agg: &AggregateRecord, mode: StatMode) -> Option<AggregateRecord> {
    let mut scaled = agg.clone();
    match mode {
        StatMode::Totals => {}
        StatMode::PerGame => {
            divide_record(&mut scaled.rec, f64::from(agg.games_played));
        }
        StatMode::Per36 => {
            if agg.rec.minutes <= 0.0 {
                return None;
            }
            let factor = agg.rec.minutes / 36.0;
            divide_record(&mut scaled.rec, factor);
            scaled.rec.minutes = 36.0;
        }
    }
    Some(scaled)
}

/// Scale, then re-derive every rate metric from the scaled counting
/// fields. Usage percent is the one exception: its formula depends on
/// the *total* team-minutes context that scaling destroys, so it is
/// snapshotted from the unscaled aggregate and restored afterwards
/// instead of being recomputed post-scale.
pub fn scaled_player_view(
    agg: &AggregateRecord,
    mode: StatMode,
    params: &MetricParams,
) -> Option<(AggregateRecord, PlayerDerived)> {
    let usage_snapshot = player_derived(&agg.rec, agg.games_played, params).usg_pct;
    let scaled = scale_aggregate(agg, mode)?;
    let mut derived = player_derived(&scaled.rec, scaled.games_played, params);
    derived.usg_pct = usage_snapshot;
    Some((scaled, derived))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::CountingLine;

    fn four_game_aggregate() -> AggregateRecord {
        AggregateRecord {
            rec: StatRecord {
                player: "Asha".into(),
                team: "Eagles".into(),
                minutes: 120.0,
                line: CountingLine {
                    pts: 90.0,
                    fgm: 40.0,
                    fga: 80.0,
                    p3m: 10.0,
                    p3a: 24.0,
                    ftm: 10.0,
                    fta: 14.0,
                    oreb: 8.0,
                    dreb: 20.0,
                    reb: 28.0,
                    ast: 16.0,
                    stl: 6.0,
                    blk: 2.0,
                    tov: 10.0,
                    pf: 9.0,
                    ..CountingLine::default()
                },
                team_ctx: CountingLine {
                    pts: 280.0,
                    fgm: 110.0,
                    fga: 240.0,
                    fta: 80.0,
                    oreb: 40.0,
                    tov: 50.0,
                    ..CountingLine::default()
                },
                off_pts: 280.0,
                def_pts: 260.0,
                ..StatRecord::default()
            },
            games_played: 4,
        }
    }

    #[test]
    fn per_game_divides_counting_fields_only() {
        let agg = four_game_aggregate();
        let scaled = scale_aggregate(&agg, StatMode::PerGame).expect("per-game should scale");
        assert_eq!(scaled.rec.line.pts, 22.5);
        assert_eq!(scaled.rec.minutes, 30.0);
        assert_eq!(scaled.rec.team_ctx.fga, 60.0);
        assert_eq!(scaled.games_played, 4);
    }

    #[test]
    fn per36_pins_minutes_and_drops_zero_minute_records() {
        let agg = four_game_aggregate();
        let scaled = scale_aggregate(&agg, StatMode::Per36).expect("per-36 should scale");
        assert_eq!(scaled.rec.minutes, 36.0);
        // 90 points over 120 minutes -> 27 per 36.
        assert_eq!(scaled.rec.line.pts, 27.0);

        let mut benchwarmer = four_game_aggregate();
        benchwarmer.rec.minutes = 0.0;
        assert!(scale_aggregate(&benchwarmer, StatMode::Per36).is_none());
    }

    #[test]
    fn scale_then_rederive_leaves_percentages_invariant() {
        let agg = four_game_aggregate();
        let params = MetricParams::full_game();
        let (_, totals) = scaled_player_view(&agg, StatMode::Totals, &params).unwrap();
        let (_, per_game) = scaled_player_view(&agg, StatMode::PerGame, &params).unwrap();
        let (_, per36) = scaled_player_view(&agg, StatMode::Per36, &params).unwrap();

        // eFG% = (40 + 0.5 * 10) / 80 * 100 = 56.25 in every view.
        assert_eq!(totals.efg_pct, per_game.efg_pct);
        assert_eq!(totals.efg_pct, per36.efg_pct);
        assert!((totals.efg_pct - 56.25).abs() <= 0.05);
        assert_eq!(totals.fg_pct, per_game.fg_pct);
        assert_eq!(totals.ts_pct, per_game.ts_pct);
    }

    #[test]
    fn usage_is_snapshotted_across_scaling() {
        let agg = four_game_aggregate();
        let params = MetricParams::full_game();
        let unscaled = player_derived(&agg.rec, agg.games_played, &params);
        let (_, per_game) = scaled_player_view(&agg, StatMode::PerGame, &params).unwrap();
        assert_eq!(per_game.usg_pct, unscaled.usg_pct);
        let (_, per36) = scaled_player_view(&agg, StatMode::Per36, &params).unwrap();
        assert_eq!(per36.usg_pct, unscaled.usg_pct);
    }
}
