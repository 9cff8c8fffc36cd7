//! Shared fixtures for loader integration tests

#![allow(dead_code)]

use std::sync::Arc;

use graphloom_core::{
    Cardinality, FetchedRow, Key, KeyColumnPair, RelationshipDescriptor, Row, SecondaryTable,
    SortColumn,
};
use graphloom_test_utils::MemoryBackend;

/// To-many relationship in offset mode (no declared ordering)
pub fn team_heroes() -> Arc<RelationshipDescriptor> {
    Arc::new(
        RelationshipDescriptor::new(
            "Team.heroes",
            vec![KeyColumnPair::new("id", "team_id")],
            Cardinality::ToMany,
        )
        .unwrap(),
    )
}

/// To-one relationship
pub fn hero_team() -> Arc<RelationshipDescriptor> {
    Arc::new(
        RelationshipDescriptor::new(
            "Hero.team",
            vec![KeyColumnPair::new("team_id", "id")],
            Cardinality::ToOne,
        )
        .unwrap(),
    )
}

/// To-many relationship in keyset mode (ordered by title)
pub fn album_tracks() -> Arc<RelationshipDescriptor> {
    Arc::new(
        RelationshipDescriptor::new(
            "Album.tracks",
            vec![KeyColumnPair::new("id", "album_id")],
            Cardinality::ToMany,
        )
        .unwrap()
        .order_by(vec![SortColumn::asc("title")]),
    )
}

/// Many-to-many relationship through a junction table
pub fn hero_powers() -> Arc<RelationshipDescriptor> {
    Arc::new(
        RelationshipDescriptor::new(
            "Hero.powers",
            vec![KeyColumnPair::new("id", "hero_id")],
            Cardinality::ToMany,
        )
        .unwrap()
        .secondary(SecondaryTable::new(
            "hero_powers",
            vec!["hero_id".into()],
            vec!["power_id".into()],
        ))
        .unwrap(),
    )
}

/// A hero row belonging to one team
pub fn hero_row(team_id: i64, id: i64, name: &str) -> FetchedRow {
    FetchedRow::node(
        Row::new()
            .with("id", id)
            .with("team_id", team_id)
            .with("name", name),
    )
}

/// A track row belonging to one album
pub fn track_row(album_id: i64, id: i64, title: &str) -> FetchedRow {
    FetchedRow::node(
        Row::new()
            .with("id", id)
            .with("album_id", album_id)
            .with("title", title),
    )
}

/// A team row
pub fn team_row(id: i64, name: &str) -> FetchedRow {
    FetchedRow::node(Row::new().with("id", id).with("name", name))
}

/// Backend with 10 heroes (ids 0..10) on team 1, in id order
pub fn ten_heroes_backend() -> Arc<MemoryBackend> {
    let backend = MemoryBackend::new();
    backend.insert_rows(
        "Team.heroes",
        (0..10)
            .map(|i| hero_row(1, i, &format!("hero-{}", i)))
            .collect(),
    );
    Arc::new(backend)
}

/// Backend with 10 tracks (titles t0..t9) on album 1
pub fn ten_tracks_backend() -> Arc<MemoryBackend> {
    let backend = MemoryBackend::new();
    backend.insert_rows(
        "Album.tracks",
        (0..10)
            .map(|i| track_row(1, i, &format!("t{}", i)))
            .collect(),
    );
    Arc::new(backend)
}

/// The id column of a loaded row, as i64
pub fn row_id(row: &Row) -> i64 {
    match row.get("id") {
        Some(graphloom_core::ScalarValue::Int(id)) => *id,
        other => panic!("row has no integer id: {:?}", other),
    }
}

/// Key for a single integer id
pub fn key(id: i64) -> Key {
    Key::single(id)
}
