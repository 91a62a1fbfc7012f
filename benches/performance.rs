use criterion::{criterion_group, criterion_main, Criterion};
use chessref_core::record;
use chessref_core::table::Table;
use chessref_operators::{join, TableExt};
use chessref_trie::{tokenize, MoveTree};

const FEDERATIONS: [&str; 8] = ["RUS", "USA", "IND", "CHN", "NOR", "FRA", "GER", "ESP"];

fn make_players(rows: usize) -> Table {
    Table::from_records(
        (0..rows)
            .map(|i| {
                record! {
                    "name" => format!("player-{}", i),
                    "federation" => FEDERATIONS[i % FEDERATIONS.len()],
                }
            })
            .collect(),
    )
    .unwrap()
}

fn make_countries() -> Table {
    Table::from_records(
        FEDERATIONS
            .iter()
            .enumerate()
            .map(|(i, f)| record! { "alpha-3" => *f, "latitude" => i as f64, "longitude" => -(i as f64) })
            .collect(),
    )
    .unwrap()
}

fn bench_join_and_count(c: &mut Criterion) {
    let players = make_players(2048);
    let countries = make_countries();
    c.bench_function("nested_loop_join", |b| {
        b.iter(|| {
            let _ = join(&players, &countries, "federation", "alpha-3").unwrap();
        })
    });
    c.bench_function("group_count", |b| {
        b.iter(|| {
            let _ = players
                .group_count("federation", "country", "count", true)
                .unwrap();
        })
    });
}

fn bench_move_tree(c: &mut Criterion) {
    let openings = [
        "d4 d5 c4 e6 Nc3 Nf6",
        "d4 Nf6 c4 g6 Nc3 Bg7",
        "e4 c5 Nf3 d6 d4 cxd4",
        "e4 e5 Nf3 Nc6 Bb5 a6",
        "Nf3 d5 c4 e6 g3 Nf6",
    ];
    let games: Vec<&str> = (0..1024).map(|i| openings[i % openings.len()]).collect();
    c.bench_function("move_tree_insert", |b| {
        b.iter(|| {
            let mut tree = MoveTree::new();
            for g in &games {
                tree.insert(tokenize(g), 5);
            }
            tree
        })
    });
}

criterion_group!(benches, bench_join_and_count, bench_move_tree);
criterion_main!(benches);
