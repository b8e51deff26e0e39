use crate::archive::{StatBag, bag_num, bag_str};

/// The fixed superset of counting fields every computation relies on.
/// Used three ways on a record: the owner's own line, the team-of-record
/// context and the opponent context.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CountingLine {
    pub pts: f64,
    pub fgm: f64,
    pub fga: f64,
    pub p2m: f64,
    pub p2a: f64,
    pub p3m: f64,
    pub p3a: f64,
    pub ftm: f64,
    pub fta: f64,
    pub oreb: f64,
    pub dreb: f64,
    pub reb: f64,
    pub ast: f64,
    pub stl: f64,
    pub blk: f64,
    pub tov: f64,
    pub pf: f64,
    pub fd: f64,
}

impl CountingLine {
    pub fn add(&mut self, other: &CountingLine) {
        self.pts += other.pts;
        self.fgm += other.fgm;
        self.fga += other.fga;
        self.p2m += other.p2m;
        self.p2a += other.p2a;
        self.p3m += other.p3m;
        self.p3a += other.p3a;
        self.ftm += other.ftm;
        self.fta += other.fta;
        self.oreb += other.oreb;
        self.dreb += other.dreb;
        self.reb += other.reb;
        self.ast += other.ast;
        self.stl += other.stl;
        self.blk += other.blk;
        self.tov += other.tov;
        self.pf += other.pf;
        self.fd += other.fd;
    }

    pub fn divide_by(&mut self, divisor: f64) {
        if divisor == 0.0 {
            return;
        }
        self.pts /= divisor;
        self.fgm /= divisor;
        self.fga /= divisor;
        self.p2m /= divisor;
        self.p2a /= divisor;
        self.p3m /= divisor;
        self.p3a /= divisor;
        self.ftm /= divisor;
        self.fta /= divisor;
        self.oreb /= divisor;
        self.dreb /= divisor;
        self.reb /= divisor;
        self.ast /= divisor;
        self.stl /= divisor;
        self.blk /= divisor;
        self.tov /= divisor;
        self.pf /= divisor;
        self.fd /= divisor;
    }

    pub fn from_bag(bag: &StatBag) -> Self {
        Self {
            pts: bag_num(bag, "PTS"),
            fgm: bag_num(bag, "FGM"),
            fga: bag_num(bag, "FGA"),
            p2m: bag_num(bag, "2PM"),
            p2a: bag_num(bag, "2PA"),
            p3m: bag_num(bag, "3PM"),
            p3a: bag_num(bag, "3PA"),
            ftm: bag_num(bag, "FTM"),
            fta: bag_num(bag, "FTA"),
            oreb: bag_num(bag, "OREB"),
            dreb: bag_num(bag, "DREB"),
            reb: bag_num(bag, "REB"),
            ast: bag_num(bag, "AST"),
            stl: bag_num(bag, "STL"),
            blk: bag_num(bag, "BLK"),
            tov: bag_num(bag, "TOV"),
            pf: bag_num(bag, "PF"),
            fd: bag_num(bag, "FD"),
        }
    }
}

/// One player's (or team's) counting stats for one game or one sub-game
/// period, plus the team/opponent context the rate formulas need.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatRecord {
    pub player: String,
    pub team: String,
    pub no: String,
    pub category: String,
    pub match_id: String,
    pub date: String,
    pub opponent: String,
    /// Canonical minutes (MIN_CALC in the archive).
    pub minutes: f64,
    /// Alternate decimal-minutes key (MIN_DEC); some archives report
    /// minutes only under this name.
    pub minutes_raw: f64,
    pub line: CountingLine,
    /// Points scored by the record owner's side / against it, same
    /// possession pairing as the rating formulas.
    pub off_pts: f64,
    pub def_pts: f64,
    pub team_ctx: CountingLine,
    pub team_minutes: f64,
    pub opp_ctx: CountingLine,
    pub opp_pts: f64,
}

impl StatRecord {
    /// Build a record from a raw archive bag. Missing columns zero-fill;
    /// nothing here is fatal.
    pub fn from_bag(bag: &StatBag) -> Self {
        Self {
            team: bag_str(bag, "Team"),
            no: bag_str(bag, "No"),
            minutes: bag_num(bag, "MIN_CALC"),
            minutes_raw: bag_num(bag, "MIN_DEC"),
            line: CountingLine::from_bag(bag),
            off_pts: bag_num(bag, "OffPTS"),
            def_pts: bag_num(bag, "DefPTS"),
            ..Self::default()
        }
    }

    /// Record Normalizer: return a defensive copy with the canonical
    /// minutes field synced from the alternate key when only the
    /// alternate is populated, and total rebounds reconciled from the
    /// offensive/defensive split when the total is absent.
    pub fn normalized(&self) -> Self {
        let mut rec = self.clone();
        if rec.minutes <= 0.0 && rec.minutes_raw > 0.0 {
            rec.minutes = rec.minutes_raw;
        }
        if rec.line.reb == 0.0 {
            rec.line.reb = rec.line.oreb + rec.line.dreb;
        }
        rec
    }

    /// Field Inference: fill the two-point split from the field-goal and
    /// three-point totals, but only when BOTH two-point fields are zero.
    /// A record with authoritative per-shot data is never overwritten,
    /// even when it disagrees with the FG-3P arithmetic. Idempotent.
    pub fn infer_two_point_split(&mut self) {
        if self.line.p2m == 0.0 && self.line.p2a == 0.0 {
            self.line.p2m = self.line.fgm - self.line.p3m;
            self.line.p2a = self.line.fga - self.line.p3a;
        }
    }

    /// Field-wise sum of another record's counting content into this
    /// one. Identity fields are untouched; rate fields do not exist on
    /// the record by construction, so none can leak through.
    pub fn accumulate(&mut self, other: &StatRecord) {
        self.minutes += other.minutes;
        self.minutes_raw += other.minutes_raw;
        self.line.add(&other.line);
        self.off_pts += other.off_pts;
        self.def_pts += other.def_pts;
        self.team_ctx.add(&other.team_ctx);
        self.team_minutes += other.team_minutes;
        self.opp_ctx.add(&other.opp_ctx);
        self.opp_pts += other.opp_pts;
    }

    /// Activity check for the did-not-play filter: a record counts as an
    /// appearance if it has real minutes or any major counting stat.
    /// Some box scores log 00:00 minutes with a real stat line (late
    /// substitutions), so minutes alone is not trusted.
    pub fn is_active(&self) -> bool {
        if self.minutes > 0.0 || self.minutes_raw > 0.0 {
            return true;
        }
        let l = &self.line;
        let activity = l.pts.abs()
            + l.reb.abs()
            + l.ast.abs()
            + l.stl.abs()
            + l.blk.abs()
            + l.tov.abs()
            + l.fga.abs()
            + l.fta.abs()
            + l.pf.abs();
        activity > 0.0
    }
}

/// The sum of N StatRecords sharing one identity, plus the number of
/// distinct games that contributed (not the number of period records).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregateRecord {
    pub rec: StatRecord,
    pub games_played: u32,
}
