use std::sync::Arc;

use rayon::prelude::*;

use crate::aggregate::{
    EntityType, aggregate_players, aggregate_teams, daily_player_records, inject_team_context,
    team_game_records,
};
use crate::archive::Archive;
use crate::cache::StatCache;
use crate::metrics::{MetricParams, PlayerDerived, player_derived};
use crate::period::PeriodSelector;
use crate::record::{AggregateRecord, StatRecord};
use crate::scaling::{StatMode, scaled_player_view};
use crate::team_metrics::{TeamDerived, team_derived};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct StatsKey {
    version: u64,
    period: PeriodSelector,
    entity: EntityType,
    mode: StatMode,
}

/// One aggregated player with every derived metric attached, already
/// scaled for the requested mode.
#[derive(Debug, Clone)]
pub struct PlayerRow {
    pub agg: AggregateRecord,
    pub derived: PlayerDerived,
}

#[derive(Debug, Clone)]
pub struct TeamRow {
    pub agg: AggregateRecord,
    pub derived: TeamDerived,
}

/// The engine's output for one (period, entity, mode) request: player
/// rows or team rows, sorted by points descending.
#[derive(Debug, Clone, Default)]
pub struct TournamentStats {
    pub players: Vec<PlayerRow>,
    pub teams: Vec<TeamRow>,
}

/// One player-game row with its single-game derived metrics, for the
/// per-date views.
#[derive(Debug, Clone)]
pub struct DailyRow {
    pub rec: StatRecord,
    pub derived: PlayerDerived,
}

/// Stateless between calls apart from the memoizing cache: every
/// request is a deterministic function of the archive contents and the
/// request parameters.
#[derive(Debug, Default)]
pub struct Engine {
    cache: StatCache<StatsKey, TournamentStats>,
}

impl Engine {
    pub fn new() -> Self {
        Self {
            cache: StatCache::new(),
        }
    }

    /// Aggregated tournament stats for one entity type, period slice
    /// and presentation mode. Memoized per archive version; the Arc is
    /// shared between repeated identical requests.
    pub fn tournament_stats(
        &self,
        archive: &Archive,
        period: PeriodSelector,
        entity: EntityType,
        mode: StatMode,
    ) -> Arc<TournamentStats> {
        let key = StatsKey {
            version: archive.version(),
            period,
            entity,
            mode,
        };
        self.cache
            .get_or_compute(key, || compute_stats(archive, period, entity, mode))
    }

    /// Per-game player rows for the requested slice, with single-game
    /// derived metrics. Cheap enough to stay uncached.
    pub fn daily_stats(&self, archive: &Archive, period: PeriodSelector) -> Vec<DailyRow> {
        let mut records = daily_player_records(archive.matches(), period);
        inject_team_context(&mut records);
        let params = MetricParams::for_period(period);
        records
            .into_par_iter()
            .filter(|rec| rec.is_active())
            .map(|rec| {
                let derived = player_derived(&rec, 1, &params);
                DailyRow { rec, derived }
            })
            .collect()
    }

    pub fn invalidate(&self) {
        self.cache.invalidate_all();
    }
}

/// Process-wide engine for callers that want to share one memoization
/// cache across the whole app.
pub fn global_engine() -> &'static Engine {
    static ENGINE: once_cell::sync::Lazy<Engine> = once_cell::sync::Lazy::new(Engine::new);
    &ENGINE
}

fn compute_stats(
    archive: &Archive,
    period: PeriodSelector,
    entity: EntityType,
    mode: StatMode,
) -> TournamentStats {
    match entity {
        EntityType::Players => TournamentStats {
            players: compute_player_rows(archive, period, mode),
            teams: Vec::new(),
        },
        EntityType::Teams => TournamentStats {
            players: Vec::new(),
            teams: compute_team_rows(archive, period, mode),
        },
    }
}

fn compute_player_rows(archive: &Archive, period: PeriodSelector, mode: StatMode) -> Vec<PlayerRow> {
    let mut records = daily_player_records(archive.matches(), period);
    inject_team_context(&mut records);
    let aggregates = aggregate_players(&records);
    let params = MetricParams::for_period(period);

    let mut rows: Vec<PlayerRow> = aggregates
        .into_par_iter()
        .filter_map(|agg| {
            let (scaled, derived) = scaled_player_view(&agg, mode, &params)?;
            Some(PlayerRow {
                agg: scaled,
                derived,
            })
        })
        .collect();

    rows.sort_by(|a, b| {
        b.agg
            .rec
            .line
            .pts
            .total_cmp(&a.agg.rec.line.pts)
            .then_with(|| a.agg.rec.player.cmp(&b.agg.rec.player))
    });
    rows
}

fn compute_team_rows(archive: &Archive, period: PeriodSelector, mode: StatMode) -> Vec<TeamRow> {
    let game_records = team_game_records(archive.matches(), period);
    let aggregates = aggregate_teams(&game_records, period);
    let params = MetricParams::team_mode(period);

    let mut rows: Vec<TeamRow> = aggregates
        .into_par_iter()
        .filter_map(|agg| {
            let scaled = crate::scaling::scale_aggregate(&agg, mode)?;
            let derived = team_derived(&scaled.rec, &params);
            Some(TeamRow {
                agg: scaled,
                derived,
            })
        })
        .collect();

    rows.sort_by(|a, b| {
        b.agg
            .rec
            .line
            .pts
            .total_cmp(&a.agg.rec.line.pts)
            .then_with(|| a.agg.rec.team.cmp(&b.agg.rec.team))
    });
    rows
}
