use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use serde_json::json;

use hooptally::{Archive, Engine, EntityType, PeriodSelector, StatMode, parse_archive_json};

/// A season-sized synthetic archive: `games` matches between rotating
/// pairs of 8 teams, 10 players a side, with quarter breakdowns.
fn synthetic_archive(games: usize) -> Archive {
    let teams = [
        "Eagles", "Hawks", "Lions", "Wolves", "Bears", "Sharks", "Owls", "Foxes",
    ];
    let mut matches = Vec::with_capacity(games);
    for g in 0..games {
        let home = teams[g % teams.len()];
        let away = teams[(g + 1) % teams.len()];
        let mut players = serde_json::Map::new();
        let mut quarters = serde_json::Map::new();
        let mut q1 = serde_json::Map::new();
        for (side, team) in [(0usize, home), (1usize, away)] {
            for p in 0..10usize {
                let name = format!("{team} P{p}");
                let pts = ((g + side + p) % 25) as f64;
                players.insert(
                    name.clone(),
                    json!({
                        "Team": team, "No": p.to_string(), "MIN_DEC": 4.0 + (p % 8) as f64 * 4.0,
                        "PTS": pts, "FGM": pts / 2.5, "FGA": pts / 1.2,
                        "3PM": (p % 3) as f64, "3PA": (p % 5) as f64,
                        "FTM": (p % 4) as f64, "FTA": (p % 4) as f64,
                        "OREB": (p % 3) as f64, "DREB": (p % 6) as f64,
                        "AST": (p % 7) as f64, "STL": (p % 2) as f64,
                        "BLK": (p % 2) as f64, "TOV": (p % 4) as f64, "PF": (p % 5) as f64
                    }),
                );
                q1.insert(
                    name,
                    json!({
                        "Team": team, "MIN_DEC": 2.0 + (p % 4) as f64,
                        "PTS": pts / 4.0, "FGM": pts / 10.0, "FGA": pts / 5.0
                    }),
                );
            }
        }
        quarters.insert("Q1".to_string(), serde_json::Value::Object(q1));
        matches.push(json!({
            "MatchID": format!("g{g}"),
            "Category": "Senior Men",
            "Metadata": {"MatchDate": format!("2025-01-{:02}", 1 + g % 28)},
            "Teams": {"t1": home, "t2": away},
            "PlayerStats": serde_json::Value::Object(players),
            "PeriodStats": serde_json::Value::Object(quarters),
        }));
    }
    let raw = serde_json::Value::Array(matches).to_string();
    Archive::new(parse_archive_json(&raw).expect("synthetic archive should parse"))
}

fn bench_archive_parse(c: &mut Criterion) {
    c.bench_function("archive_parse", |b| {
        b.iter(|| {
            let matches = parse_archive_json(black_box(ARCHIVE_JSON)).unwrap();
            black_box(matches.len());
        })
    });
}

fn bench_player_totals(c: &mut Criterion) {
    let archive = synthetic_archive(60);
    c.bench_function("player_totals_uncached", |b| {
        b.iter(|| {
            // Fresh engine per iteration so the cache never hits.
            let engine = Engine::new();
            let stats = engine.tournament_stats(
                black_box(&archive),
                PeriodSelector::FullGame,
                EntityType::Players,
                StatMode::Totals,
            );
            black_box(stats.players.len());
        })
    });
}

fn bench_team_per_game(c: &mut Criterion) {
    let archive = synthetic_archive(60);
    c.bench_function("team_per_game_uncached", |b| {
        b.iter(|| {
            let engine = Engine::new();
            let stats = engine.tournament_stats(
                black_box(&archive),
                PeriodSelector::FullGame,
                EntityType::Teams,
                StatMode::PerGame,
            );
            black_box(stats.teams.len());
        })
    });
}

fn bench_quarter_slice(c: &mut Criterion) {
    let archive = synthetic_archive(60);
    c.bench_function("quarter_slice_uncached", |b| {
        b.iter(|| {
            let engine = Engine::new();
            let stats = engine.tournament_stats(
                black_box(&archive),
                PeriodSelector::Quarter(1),
                EntityType::Players,
                StatMode::Per36,
            );
            black_box(stats.players.len());
        })
    });
}

fn bench_cached_lookup(c: &mut Criterion) {
    let archive = synthetic_archive(60);
    let engine = Engine::new();
    engine.tournament_stats(
        &archive,
        PeriodSelector::FullGame,
        EntityType::Players,
        StatMode::Totals,
    );
    c.bench_function("cached_lookup", |b| {
        b.iter(|| {
            let stats = engine.tournament_stats(
                black_box(&archive),
                PeriodSelector::FullGame,
                EntityType::Players,
                StatMode::Totals,
            );
            black_box(stats.players.len());
        })
    });
}

fn bench_daily_rows(c: &mut Criterion) {
    let archive = synthetic_archive(60);
    let engine = Engine::new();
    c.bench_function("daily_rows", |b| {
        b.iter(|| {
            let rows = engine.daily_stats(black_box(&archive), PeriodSelector::FullGame);
            black_box(rows.len());
        })
    });
}

criterion_group!(
    perf,
    bench_archive_parse,
    bench_player_totals,
    bench_team_per_game,
    bench_quarter_slice,
    bench_cached_lookup,
    bench_daily_rows
);
criterion_main!(perf);

static ARCHIVE_JSON: &str = include_str!("../tests/fixtures/tournament_archive.json");
