use crate::period::PeriodSelector;
use crate::record::StatRecord;

/// Total minutes on the floor per game for five players in a full game.
const FULL_GAME_TEAM_MINUTES: f64 = 200.0;

/// Tunables for the derived calculators. The assist-percent floor and
/// the PIE denominator floor differ between full-game and fine-grained
/// aggregates, and between player and team mode; both are deliberately
/// configuration rather than hardcoded so the inconsistencies inherited
/// from the product stay visible.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricParams {
    /// Lower bound on the assist-percent denominator.
    pub ast_floor: f64,
    /// When set, an assist-percent denominator below the floor zeroes
    /// the metric outright instead of being clamped up; the formula is
    /// numerically unstable over small samples.
    pub ast_zero_below_floor: bool,
    /// Total team minutes available per game (5 players x period
    /// length), the usage denominator context.
    pub team_minutes_per_game: f64,
    /// Lower bound on the PIE game-total denominator. Player mode
    /// floors at 20.0; team mode historically runs unfloored.
    pub pie_floor: Option<f64>,
}

impl MetricParams {
    /// Defaults for full-game player aggregates.
    pub fn full_game() -> Self {
        Self {
            ast_floor: 1.0,
            ast_zero_below_floor: false,
            team_minutes_per_game: FULL_GAME_TEAM_MINUTES,
            pie_floor: Some(20.0),
        }
    }

    /// Defaults for a given period slice. Quarter/half aggregates raise
    /// the assist-percent floor to 2.0 and zero the metric below it.
    pub fn for_period(period: PeriodSelector) -> Self {
        let mut params = Self::full_game();
        params.team_minutes_per_game = period.team_minutes_per_game();
        if period != PeriodSelector::FullGame {
            params.ast_floor = 2.0;
            params.ast_zero_below_floor = true;
        }
        params
    }

    /// Team-mode defaults: the PIE denominator runs unfloored (the
    /// game-total denominator equals the numerator pairing exactly).
    pub fn team_mode(period: PeriodSelector) -> Self {
        let mut params = Self::for_period(period);
        params.pie_floor = None;
        params
    }
}

/// Every player-level rate, efficiency and composite metric. A pure
/// function of the record's counting fields plus team/opponent context;
/// recomputed whenever the underlying counts change, never summed.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerDerived {
    pub fg_pct: f64,
    pub p2_pct: f64,
    pub p3_pct: f64,
    pub ft_pct: f64,
    pub efg_pct: f64,
    pub ts_pct: f64,
    pub eff: f64,
    pub tm_poss: f64,
    pub opp_poss: f64,
    pub p_poss: f64,
    pub tsa: f64,
    pub usg_pct: f64,
    pub ast_pct: f64,
    pub off_rtg: f64,
    pub def_rtg: f64,
    pub net_rtg: f64,
    pub plus_minus: f64,
    pub ast_to: f64,
    pub fic: f64,
    pub pie: f64,
    pub game_score: f64,
}

/// Raw ratio with the infinity/NaN guard every formula here uses: a
/// degenerate denominator reads as 0.0, never as an escaping non-finite.
pub(crate) fn safe_ratio(num: f64, den: f64) -> f64 {
    let v = num / den;
    if v.is_finite() { v } else { 0.0 }
}

/// Display rounding to one decimal, applied only after every formula
/// has been evaluated on unrounded inputs.
pub(crate) fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Points + makes + free throws - attempts + boards + playmaking -
/// fouls - turnovers: the shared PIE impact numerator, evaluated for a
/// player line or a side-of-game total alike.
pub(crate) fn impact_numerator(
    pts: f64,
    fgm: f64,
    ftm: f64,
    fga: f64,
    fta: f64,
    dreb: f64,
    oreb: f64,
    ast: f64,
    stl: f64,
    blk: f64,
    pf: f64,
    tov: f64,
) -> f64 {
    pts + fgm + ftm - fga - fta + dreb + 0.5 * oreb + ast + stl + 0.5 * blk - pf - tov
}

/// Derived Metric Calculator, player mode. Works identically for a
/// single-game record (`games_played` = 1) and a tournament aggregate.
pub fn player_derived(record: &StatRecord, games_played: u32, params: &MetricParams) -> PlayerDerived {
    let mut rec = record.normalized();
    rec.infer_two_point_split();
    let l = &rec.line;
    let tm = &rec.team_ctx;
    let opp = &rec.opp_ctx;

    let fg_pct = safe_ratio(l.fgm, l.fga) * 100.0;
    let p2_pct = safe_ratio(l.p2m, l.p2a) * 100.0;
    let p3_pct = safe_ratio(l.p3m, l.p3a) * 100.0;
    let ft_pct = safe_ratio(l.ftm, l.fta) * 100.0;
    let efg_pct = safe_ratio(l.fgm + 0.5 * l.p3m, l.fga) * 100.0;
    let ts_pct = safe_ratio(l.pts, 2.0 * (l.fga + 0.44 * l.fta)) * 100.0;

    let missed_fg = l.fga - l.fgm;
    let missed_ft = l.fta - l.ftm;
    let eff = (l.pts + l.reb + l.ast + l.stl + l.blk) - (missed_fg + missed_ft + l.tov);

    let tm_poss = tm.fga + 0.44 * tm.fta - tm.oreb + tm.tov;
    let opp_poss = opp.fga + 0.44 * opp.fta - opp.oreb + opp.tov;
    let p_poss = l.fga + 0.44 * l.fta + l.tov;
    let tsa = l.fga + 0.44 * l.fta;

    let gp = f64::from(games_played.max(1));
    let team_minutes_total = gp * params.team_minutes_per_game;
    let safe_min = rec.minutes.max(0.1);
    let safe_tm_poss = tm_poss.max(1.0);
    let safe_opp_poss = opp_poss.max(1.0);

    let usg_num = p_poss * (team_minutes_total / 5.0);
    let usg_den = safe_min * safe_tm_poss;
    let usg_pct = (100.0 * safe_ratio(usg_num, usg_den)).clamp(0.0, 100.0);

    let ast_den = (safe_min / (team_minutes_total / 5.0)) * tm.fgm - l.fgm;
    let ast_pct = if params.ast_zero_below_floor && ast_den < params.ast_floor {
        0.0
    } else {
        (100.0 * safe_ratio(l.ast, ast_den.max(params.ast_floor))).clamp(0.0, 100.0)
    };

    let off_rtg = (safe_ratio(rec.off_pts, safe_tm_poss) * 100.0).min(300.0);
    let def_rtg = (safe_ratio(rec.def_pts, safe_opp_poss) * 100.0).min(300.0);
    let net_rtg = off_rtg - def_rtg;
    let plus_minus = rec.off_pts - rec.def_pts;

    // Turnovers below one read as one; 3 assists on 0 turnovers should
    // not print as a 30.0 ratio.
    let ast_to = safe_ratio(l.ast, l.tov.max(1.0));

    let fic = l.pts + l.oreb + 0.75 * l.dreb + l.ast + l.stl + l.blk
        - 0.75 * l.fga
        - 0.375 * l.fta
        - l.tov
        - 0.5 * l.pf;

    let pie_num = impact_numerator(
        l.pts, l.fgm, l.ftm, l.fga, l.fta, l.dreb, l.oreb, l.ast, l.stl, l.blk, l.pf, l.tov,
    );
    // Total game action: both sides' own and opponent totals.
    let pie_den = impact_numerator(
        rec.off_pts + rec.def_pts,
        tm.fgm + opp.fgm,
        tm.ftm + opp.ftm,
        tm.fga + opp.fga,
        tm.fta + opp.fta,
        tm.dreb + opp.dreb,
        tm.oreb + opp.oreb,
        tm.ast + opp.ast,
        tm.stl + opp.stl,
        tm.blk + opp.blk,
        tm.pf + opp.pf,
        tm.tov + opp.tov,
    );
    let pie_den = match params.pie_floor {
        Some(floor) => pie_den.max(floor),
        None => pie_den,
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

    PlayerDerived {
        fg_pct: round1(fg_pct),
        p2_pct: round1(p2_pct),
        p3_pct: round1(p3_pct),
        ft_pct: round1(ft_pct),
        efg_pct: round1(efg_pct),
        ts_pct: round1(ts_pct),
        eff,
        tm_poss,
        opp_poss,
        p_poss,
        tsa,
        usg_pct: round1(usg_pct),
        ast_pct: round1(ast_pct),
        off_rtg: round1(off_rtg),
        def_rtg: round1(def_rtg),
        net_rtg: round1(net_rtg),
        plus_minus,
        ast_to: round1(ast_to),
        fic,
        pie: round1(pie),
        game_score: round1(game_score),
    }
}
