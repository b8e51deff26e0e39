use crate::metrics::{MetricParams, impact_numerator, round1, safe_ratio};
use crate::record::StatRecord;

/// Team-level derived metrics. Shares the guard discipline of the
/// player calculator but substitutes team-specific formulas: assist
/// percent is the share of own makes that were assisted, the rating
/// denominators come straight from each side's possession estimate, and
/// rebounding percentages are contested against the opponent's boards.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TeamDerived {
    pub fg_pct: f64,
    pub p2_pct: f64,
    pub p3_pct: f64,
    pub ft_pct: f64,
    pub efg_pct: f64,
    pub ts_pct: f64,
    pub poss: f64,
    pub opp_poss: f64,
    pub off_rtg: f64,
    pub def_rtg: f64,
    pub net_rtg: f64,
    pub ast_pct: f64,
    pub oreb_pct: f64,
    pub dreb_pct: f64,
    pub reb_pct: f64,
    pub usg_pct: f64,
    pub ast_to: f64,
    pub pie: f64,
    pub game_score: f64,
}

/// Derived Metric Calculator, team mode. The record's own line holds
/// the team totals; the opponent context holds the other side's.
pub fn team_derived(record: &StatRecord, params: &MetricParams) -> TeamDerived {
    let mut rec = record.normalized();
    rec.infer_two_point_split();
    let l = &rec.line;
    let opp = &rec.opp_ctx;

    let fg_pct = safe_ratio(l.fgm, l.fga) * 100.0;
    let p2_pct = safe_ratio(l.p2m, l.p2a) * 100.0;
    let p3_pct = safe_ratio(l.p3m, l.p3a) * 100.0;
    let ft_pct = safe_ratio(l.ftm, l.fta) * 100.0;
    let efg_pct = safe_ratio(l.fgm + 0.5 * l.p3m, l.fga) * 100.0;
    let ts_pct = safe_ratio(l.pts, 2.0 * (l.fga + 0.44 * l.fta)) * 100.0;

    let poss = l.fga + 0.44 * l.fta - l.oreb + l.tov;
    let opp_poss = opp.fga + 0.44 * opp.fta - opp.oreb + opp.tov;

    // Some archives omit an explicit opponent point total; rebuild it
    // from the opponent's makes when they are present.
    let opp_pts = if rec.opp_pts > 0.0 {
        rec.opp_pts
    } else {
        (opp.fgm - opp.p3m) * 2.0 + opp.p3m * 3.0 + opp.ftm
    };

    let off_rtg = (safe_ratio(l.pts, poss.max(1.0)) * 100.0).min(300.0);
    let def_rtg = (safe_ratio(opp_pts, opp_poss.max(1.0)) * 100.0).min(300.0);
    let net_rtg = off_rtg - def_rtg;

    // Share of own field goals that were assisted, not an individual
    // playmaking rate.
    let ast_pct = (safe_ratio(l.ast, l.fgm) * 100.0).clamp(0.0, 100.0);

    let oreb_pct = safe_ratio(l.oreb, l.oreb + opp.dreb) * 100.0;
    let dreb_pct = safe_ratio(l.dreb, l.dreb + opp.oreb) * 100.0;
    let reb_pct = safe_ratio(l.reb, l.reb + opp.dreb + opp.oreb) * 100.0;

    // A team uses every one of its own possessions by definition.
    let usg_pct = 100.0;

    let ast_to = safe_ratio(l.ast, l.tov);

    let pie_num = impact_numerator(
        l.pts, l.fgm, l.ftm, l.fga, l.fta, l.dreb, l.oreb, l.ast, l.stl, l.blk, l.pf, l.tov,
    );
    let opp_num = impact_numerator(
        opp_pts, opp.fgm, opp.ftm, opp.fga, opp.fta, opp.dreb, opp.oreb, opp.ast, opp.stl,
        opp.blk, opp.pf, opp.tov,
    );
    let pie_den = match params.pie_floor {
        Some(floor) => (pie_num + opp_num).max(floor),
        None => pie_num + opp_num,
    };
    let pie = (safe_ratio(pie_num, pie_den) * 100.0).clamp(-100.0, 100.0);

    let game_score = l.pts + 0.4 * l.fgm - 0.7 * l.fga - 0.4 * (l.fta - l.ftm)
        + 0.7 * l.oreb
        + 0.3 * l.dreb
        + l.stl
        + 0.7 * l.ast
        + 0.7 * l.blk
        - 0.4 * l.pf
        - l.tov;

    TeamDerived {
        fg_pct: round1(fg_pct),
        p2_pct: round1(p2_pct),
        p3_pct: round1(p3_pct),
        ft_pct: round1(ft_pct),
        efg_pct: round1(efg_pct),
        ts_pct: round1(ts_pct),
        poss,
        opp_poss,
        off_rtg: round1(off_rtg),
        def_rtg: round1(def_rtg),
        net_rtg: round1(net_rtg),
        ast_pct: round1(ast_pct),
        oreb_pct: round1(oreb_pct),
        dreb_pct: round1(dreb_pct),
        reb_pct: round1(reb_pct),
        usg_pct,
        ast_to: round1(ast_to),
        pie: round1(pie),
        game_score: round1(game_score),
    }
}
