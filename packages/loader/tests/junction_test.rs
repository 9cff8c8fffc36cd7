mod common;

use std::sync::Arc;

use futures_util::future::join_all;
use graphloom_core::{FetchedRow, Row};
use graphloom_loader::Loader;
use graphloom_pagination::PaginationArgs;
use graphloom_test_utils::MemoryBackend;

use common::*;

fn power(id: i64, name: &str) -> Row {
    Row::new().with("id", id).with("name", name)
}

/// Backend where heroes share powers through a junction table: the same
/// power row appears once per (hero, power) pairing
fn powers_backend() -> Arc<MemoryBackend> {
    let backend = MemoryBackend::new();
    backend.insert_rows(
        "Hero.powers",
        vec![
            FetchedRow::with_parent(key(1), power(100, "flight")),
            FetchedRow::with_parent(key(1), power(101, "strength")),
            FetchedRow::with_parent(key(2), power(101, "strength")),
            FetchedRow::with_parent(key(2), power(102, "speed")),
            FetchedRow::with_parent(key(3), power(100, "flight")),
        ],
    );
    Arc::new(backend)
}

#[test_log::test(tokio::test)]
async fn test_junction_rows_group_by_parent_key() {
    let backend = powers_backend();
    let loader = Loader::new(backend.clone());
    let descriptor = hero_powers();
    let args = PaginationArgs::none();

    let results = join_all(
        [1, 2, 3].map(|hero| loader.load(&descriptor, &args, key(hero))),
    )
    .await;

    assert_eq!(backend.fetch_calls(), 1);
    let pages: Vec<Vec<i64>> = results
        .into_iter()
        .map(|r| r.unwrap().into_rows().iter().map(row_id).collect())
        .collect();
    assert_eq!(pages[0], vec![100, 101]);
    assert_eq!(pages[1], vec![101, 102]);
    assert_eq!(pages[2], vec![100]);
}

#[test_log::test(tokio::test)]
async fn test_junction_load_for_unknown_parent_is_empty() {
    let backend = powers_backend();
    let loader = Loader::new(backend.clone());

    let loaded = loader
        .load(&hero_powers(), &PaginationArgs::none(), key(42))
        .await
        .unwrap();
    assert!(loaded.into_rows().is_empty());
}

#[test_log::test(tokio::test)]
async fn test_junction_count() {
    let backend = powers_backend();
    let loader = Loader::new(backend.clone());

    let total = loader.count_for(&hero_powers(), &key(2)).await.unwrap();
    assert_eq!(total, 2);
}

#[test_log::test(tokio::test)]
async fn test_junction_pagination() {
    let backend = Arc::new(MemoryBackend::new());
    backend.insert_rows(
        "Hero.powers",
        (0..6)
            .map(|i| FetchedRow::with_parent(key(1), power(i, &format!("p{}", i))))
            .collect(),
    );
    let loader = Loader::new(backend.clone());
    let descriptor = hero_powers();

    let first = loader
        .load(&descriptor, &PaginationArgs::forward(4, None), key(1))
        .await
        .unwrap();
    let ids: Vec<i64> = first.into_rows().iter().map(row_id).collect();
    assert_eq!(ids, vec![0, 1, 2, 3]);

    let last = loader
        .load(&descriptor, &PaginationArgs::backward(2, None), key(1))
        .await
        .unwrap();
    let ids: Vec<i64> = last.into_rows().iter().map(row_id).collect();
    assert_eq!(ids, vec![4, 5]);
    assert_eq!(backend.count_calls(), 1);
}
