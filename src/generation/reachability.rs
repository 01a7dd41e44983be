//! Reachability audit for built forts.
//!
//! Door placement is best effort, so a finished fort can hold rooms that
//! cannot be walked into from outside. The audit reports them without
//! touching the zone.

use crate::{FortLayout, Position, Zone};
use pathfinding::prelude::bfs_reach;
use std::collections::HashSet;

/// Cells reachable on foot from any of the given entrances.
pub fn reachable_from(zone: &Zone, entrances: &[Position]) -> HashSet<Position> {
    let mut visited = HashSet::new();

    for &entrance in entrances {
        if visited.contains(&entrance) || !zone.is_open(entrance) {
            continue;
        }
        let flood = bfs_reach(entrance, |pos: &Position| {
            pos.cardinal_adjacent_positions()
                .into_iter()
                .filter(|next| zone.is_open(*next))
                .collect::<Vec<_>>()
        });
        visited.extend(flood);
    }

    visited
}

/// Ids of rooms that cannot be entered from any fort entrance.
///
/// A room counts as reachable when any of its interior cells is. With no
/// entrances every room is unreachable.
pub fn unreachable_rooms(zone: &Zone, layout: &FortLayout) -> Vec<u32> {
    let visited = reachable_from(zone, &layout.fort_doors);

    layout
        .rooms
        .iter()
        .filter(|room| !room.interior().positions().any(|pos| visited.contains(&pos)))
        .map(|room| room.id)
        .collect()
}
