//! Island detection
//!
//! Finds the maximal 8-connected groups of non-water tiles by region merging:
//! every non-water tile starts as its own island, then islands expand their
//! frontier one coordinate at a time and absorb every neighbouring island they
//! touch. When no island has frontier left, each survivor is a complete
//! component and gets a label in arena order.
//!
//! Islands live in an arena owned by the map. Tiles hold an [`IslandId`]
//! into it; absorbing an island relinks its member tiles and frees the slot.
//! Slots are never reused within one run, so a stale id can only miss.

use std::collections::VecDeque;

use tracing::{debug, trace};

use crate::map::{Coordinates, Tile};
use crate::tilemap::{Tilemap, NEIGHBORS_8};

/// Handle of an island slot in the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IslandId(pub u32);

/// A connected group of non-water tiles.
#[derive(Clone, Debug)]
pub struct Island {
    id: IslandId,
    label: char,
    frontier: Vec<Coordinates>,
    members: Vec<Coordinates>,
}

impl Island {
    fn seed(id: IslandId, at: Coordinates) -> Self {
        Self {
            id,
            label: '?',
            frontier: vec![at],
            members: vec![at],
        }
    }

    pub fn id(&self) -> IslandId {
        self.id
    }

    /// Single-character label, assigned once merging is complete.
    pub fn label(&self) -> char {
        self.label
    }

    pub fn tile_count(&self) -> usize {
        self.members.len()
    }

    pub fn members(&self) -> &[Coordinates] {
        &self.members
    }

    /// Bounding box (min_x, min_y, max_x, max_y).
    pub fn bounds(&self) -> (i32, i32, i32, i32) {
        self.members.iter().fold(
            (i32::MAX, i32::MAX, i32::MIN, i32::MIN),
            |(min_x, min_y, max_x, max_y), c| {
                (min_x.min(c.x), min_y.min(c.y), max_x.max(c.x), max_y.max(c.y))
            },
        )
    }

    /// Pop the most recently added frontier coordinate.
    fn fetch_frontier(&mut self) -> Option<Coordinates> {
        self.frontier.pop()
    }

    /// Take over another island's members and remaining frontier.
    fn absorb(&mut self, other: Island) {
        self.members.extend(other.members);
        self.frontier.extend(other.frontier);
    }
}

/// Arena of islands produced by one detection run.
#[derive(Clone, Debug, Default)]
pub struct Islands {
    slots: Vec<Option<Island>>,
    live: usize,
}

impl Islands {
    fn create(&mut self, at: Coordinates) -> IslandId {
        let id = IslandId(self.slots.len() as u32);
        self.slots.push(Some(Island::seed(id, at)));
        self.live += 1;
        id
    }

    fn take(&mut self, id: IslandId) -> Option<Island> {
        let island = self.slots.get_mut(id.0 as usize)?.take();
        if island.is_some() {
            self.live -= 1;
        }
        island
    }

    fn get_mut(&mut self, id: IslandId) -> Option<&mut Island> {
        self.slots.get_mut(id.0 as usize)?.as_mut()
    }

    /// Drop a tile that was overwritten after detection. An island left
    /// without members is removed; labels of the others stay as they were.
    pub(crate) fn release(&mut self, id: IslandId, at: Coordinates) {
        let Some(island) = self.get_mut(id) else {
            return;
        };
        island.members.retain(|&member| member != at);
        if island.members.is_empty() {
            self.take(id);
        }
    }

    pub fn get(&self, id: IslandId) -> Option<&Island> {
        self.slots.get(id.0 as usize)?.as_ref()
    }

    /// Number of live islands.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Live islands in arena order (the order labels were assigned in).
    pub fn iter(&self) -> impl Iterator<Item = &Island> {
        self.slots.iter().filter_map(Option::as_ref)
    }

    pub fn by_label(&self, label: char) -> Option<&Island> {
        self.iter().find(|island| island.label == label)
    }

    fn assign_labels(&mut self) {
        for (index, island) in self.slots.iter_mut().filter_map(Option::as_mut).enumerate() {
            island.label = label_for(index);
        }
    }
}

/// Label of the n-th island: 'A', 'B', ... continuing through successive
/// Unicode scalar values so labels stay unique.
pub fn label_for(index: usize) -> char {
    let code = u32::try_from(index)
        .ok()
        .and_then(|i| i.checked_add('A' as u32))
        .map(|code| if code >= 0xD800 { code + 0x800 } else { code });

    code.and_then(char::from_u32).unwrap_or(char::REPLACEMENT_CHARACTER)
}

/// Link every non-water tile to exactly one island and return the arena.
///
/// Tiles must arrive with no island links.
pub fn detect_islands(tiles: &mut Tilemap<Tile>) -> Islands {
    let mut islands = Islands::default();
    let mut pending = VecDeque::new();

    // Seed: one island per non-water tile
    for (x, y, tile) in tiles.iter_mut() {
        if !tile.is_water() && tile.island.is_none() {
            let id = islands.create(Coordinates::new(x as i32, y as i32));
            tile.island = Some(id);
            pending.push_back(id);
        }
    }
    let seeded = islands.len();

    // Expand: absorbed islands drop out of the arena and are skipped here
    while let Some(id) = pending.pop_front() {
        expand(tiles, &mut islands, id);
    }

    islands.assign_labels();
    debug!(seeded, islands = islands.len(), "island detection complete");
    islands
}

/// Drain an island's frontier, absorbing every island it touches.
fn expand(tiles: &mut Tilemap<Tile>, islands: &mut Islands, id: IslandId) {
    while let Some(at) = islands.get_mut(id).and_then(Island::fetch_frontier) {
        for &(dx, dy) in NEIGHBORS_8.iter() {
            let Some(neighbor) = tiles.try_get(at.x + dx, at.y + dy) else {
                continue;
            };
            if neighbor.is_water() || neighbor.island == Some(id) {
                continue;
            }
            // every non-water tile was seeded, so the link is always present
            let Some(other) = neighbor.island else {
                continue;
            };
            let Some(absorbed) = islands.take(other) else {
                continue;
            };

            for member in &absorbed.members {
                tiles.get_mut(member.x as usize, member.y as usize).island = Some(id);
            }
            trace!(into = id.0, from = other.0, tiles = absorbed.members.len(), "merge");

            if let Some(island) = islands.get_mut(id) {
                island.absorb(absorbed);
            }
        }
    }
}

/// Summary over all islands of a detection run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IslandStats {
    pub count: usize,
    pub total_tiles: usize,
    pub largest: usize,
    pub smallest: usize,
    pub average_size: f32,
}

pub fn island_stats(islands: &Islands) -> IslandStats {
    let mut stats = IslandStats {
        smallest: usize::MAX,
        ..Default::default()
    };

    for island in islands.iter() {
        let size = island.tile_count();
        stats.count += 1;
        stats.total_tiles += size;
        stats.largest = stats.largest.max(size);
        stats.smallest = stats.smallest.min(size);
    }

    if stats.count > 0 {
        stats.average_size = stats.total_tiles as f32 / stats.count as f32;
    } else {
        stats.smallest = 0;
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{Map, TileType};

    fn detect(text: &str) -> Map {
        let mut map = Map::parse(text).unwrap();
        map.find_islands();
        map
    }

    #[test]
    fn test_all_land_is_one_island() {
        let map = detect("+++\n+++\n+++\n");
        assert_eq!(map.islands().len(), 1);
        let island = map.islands().iter().next().unwrap();
        assert_eq!(island.label(), 'A');
        assert_eq!(island.tile_count(), 9);
        assert_eq!(island.bounds(), (0, 0, 2, 2));
    }

    #[test]
    fn test_diagonal_neighbors_join() {
        let map = detect("+.\n.+\n");
        assert_eq!(map.islands().len(), 1);
        assert_eq!(map.island_at(0, 0).unwrap().id(), map.island_at(1, 1).unwrap().id());

        let map = detect(".+\n+.\n");
        assert_eq!(map.islands().len(), 1);
    }

    #[test]
    fn test_separated_cells_are_two_islands() {
        let map = detect("+.+\n");
        assert_eq!(map.islands().len(), 2);

        let map = detect("+..\n...\n..+\n");
        assert_eq!(map.islands().len(), 2);
    }

    #[test]
    fn test_all_non_water_types_join() {
        let map = detect("+*\n^@\n");
        assert_eq!(map.islands().len(), 1);
        assert_eq!(map.islands().iter().next().unwrap().tile_count(), 4);
    }

    #[test]
    fn test_water_only() {
        let map = detect("...\n...\n");
        assert!(map.islands().is_empty());
        assert!(map.iter().all(|t| t.island().is_none()));
    }

    #[test]
    fn test_labels_in_row_major_discovery_order() {
        let map = detect("+.+.+\n.....\n+.+.+\n");
        let labels: Vec<char> = map.islands().iter().map(Island::label).collect();
        assert_eq!(labels, vec!['A', 'B', 'C', 'D', 'E', 'F']);
        assert_eq!(map.island_at(0, 0).unwrap().label(), 'A');
        assert_eq!(map.island_at(4, 2).unwrap().label(), 'F');
        assert_eq!(map.islands().by_label('C').unwrap().members(), &[Coordinates::new(4, 0)]);
    }

    #[test]
    fn test_u_shape_merges_from_both_arms() {
        // the two arms only meet through the bottom row
        let map = detect("+...+\n+...+\n+++++\n");
        assert_eq!(map.islands().len(), 1);
        assert_eq!(map.islands().iter().next().unwrap().tile_count(), 9);
    }

    #[test]
    fn test_members_match_tile_links() {
        let map = detect("++..+\n+...+\n..*..\n@...^\n");
        let mut linked = 0;
        for island in map.islands().iter() {
            for c in island.members() {
                assert_eq!(map.get(c.x, c.y).island(), Some(island.id()));
                linked += 1;
            }
        }
        let non_water = map.iter().filter(|t| !t.is_water()).count();
        assert_eq!(linked, non_water);
    }

    #[test]
    fn test_rerun_replaces_islands() {
        let mut map = detect("+.+\n");
        assert_eq!(map.islands().len(), 2);
        map.set(1, 0, TileType::Land).unwrap();
        assert_eq!(map.find_islands(), 1);
        assert_eq!(map.islands().iter().next().unwrap().label(), 'A');
    }

    #[test]
    fn test_set_releases_old_membership() {
        let mut map = detect("++.+\n");
        assert_eq!(map.islands().len(), 2);

        map.set(1, 0, TileType::Water).unwrap();
        let first = map.islands().by_label('A').unwrap();
        assert_eq!(first.members(), &[Coordinates::new(0, 0)]);
        assert!(map.get(1, 0).island().is_none());

        // overwriting the last tile of an island removes it
        map.set(3, 0, TileType::Tree).unwrap();
        assert_eq!(map.islands().len(), 1);
        assert!(map.islands().by_label('B').is_none());
        assert!(map.island_at(3, 0).is_none());
        assert_eq!(map.island_at(0, 0).unwrap().label(), 'A');
    }

    #[test]
    fn test_large_checkerboard_is_one_island() {
        // diagonal-only connectivity over a big grid
        let mut map = Map::new(120, 120);
        for y in 0..120 {
            for x in 0..120 {
                if (x + y) % 2 == 0 {
                    map.set(x, y, TileType::Land).unwrap();
                }
            }
        }
        assert_eq!(map.find_islands(), 1);
        assert_eq!(map.islands().iter().next().unwrap().tile_count(), 120 * 60);
    }

    #[test]
    fn test_label_sequence() {
        assert_eq!(label_for(0), 'A');
        assert_eq!(label_for(25), 'Z');
        assert_eq!(label_for(26), '[');
        assert_eq!(label_for(32), 'a');
        // surrogate range is skipped
        let before = label_for(0xD7FF - 'A' as usize);
        let after = label_for(0xD800 - 'A' as usize);
        assert_eq!(before as u32, 0xD7FF);
        assert_eq!(after as u32, 0xE000);
    }

    #[test]
    fn test_stats() {
        let map = detect("++.+\n++..\n....\n+...\n");
        let stats = island_stats(map.islands());
        assert_eq!(stats.count, 3);
        assert_eq!(stats.total_tiles, 6);
        assert_eq!(stats.largest, 4);
        assert_eq!(stats.smallest, 1);
        assert!((stats.average_size - 2.0).abs() < 1e-6);

        let empty = island_stats(&Islands::default());
        assert_eq!(empty, IslandStats::default());
    }
}
