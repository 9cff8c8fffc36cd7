//! Grouping fetched rows back by parent key
//!
//! One batched fetch returns a flat row set covering many parents; this
//! module splits it back out. Plain relationships derive each row's
//! parent key from the remote-side key columns on the row itself.
//! Junction-table relationships use the parent key the backend attached
//! to the row, because the target row does not carry the parent's
//! columns. The distinction is selected on the descriptor's junction
//! mapping, never guessed from row shape.

use std::collections::HashMap;

use graphloom_core::{FetchedRow, Key, RelationshipDescriptor, Row};

use crate::error::{LoadError, LoadResult};

/// Group a fetched row set by the parent key each row belongs to
///
/// Row order within each group matches the backend's row order exactly.
/// Requested keys with no matching rows simply have no entry; the
/// caller supplies the empty/absent result per requested key.
pub fn group_by_parent(
    rows: Vec<FetchedRow>,
    descriptor: &RelationshipDescriptor,
) -> LoadResult<HashMap<Key, Vec<Row>>> {
    let mut grouped: HashMap<Key, Vec<Row>> = HashMap::new();
    let junction = descriptor.secondary_table().is_some();

    for row in rows {
        let key = if junction {
            match row.parent_key {
                Some(key) => key,
                None => {
                    return Err(LoadError::MissingJunctionKey {
                        relationship: descriptor.id().clone(),
                    })
                }
            }
        } else {
            remote_key(&row.node, descriptor)?
        };
        grouped.entry(key).or_default().push(row.node);
    }

    Ok(grouped)
}

/// Derive a row's parent key from the remote-side key columns
fn remote_key(row: &Row, descriptor: &RelationshipDescriptor) -> LoadResult<Key> {
    let mut values = Vec::with_capacity(descriptor.key_pairs().len());
    for pair in descriptor.key_pairs() {
        let value = row
            .get(&pair.remote)
            .ok_or_else(|| LoadError::MissingKeyColumn {
                relationship: descriptor.id().clone(),
                column: pair.remote.clone(),
            })?;
        values.push(value.clone());
    }
    Ok(Key::new(values))
}
