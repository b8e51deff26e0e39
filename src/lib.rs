//! Box-score analytics for tournament basketball: normalizes raw stat
//! records out of a match archive, aggregates counting stats across
//! games and sub-game periods, and derives the advanced metrics
//! (TS%, eFG%, USG%, ratings, PIE, Game Score, FIC) with the numeric
//! guards the raw data demands. Counting stats are summed first; rates
//! are always recomputed last, never averaged.

pub mod aggregate;
pub mod archive;
pub mod cache;
pub mod display;
pub mod engine;
pub mod metrics;
pub mod period;
pub mod record;
pub mod scaling;
pub mod team_metrics;

pub use aggregate::EntityType;
pub use archive::{Archive, parse_archive_json};
pub use engine::{Engine, TournamentStats};
pub use metrics::{MetricParams, PlayerDerived};
pub use period::PeriodSelector;
pub use record::{AggregateRecord, CountingLine, StatRecord};
pub use scaling::StatMode;
pub use team_metrics::TeamDerived;
