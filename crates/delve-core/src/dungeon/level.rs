//! Floor structure: terrain grid, monster registry, objects and traps

use serde::{Deserialize, Serialize};

use super::{Cell, CellType, Position, Room, Trap, TrapType};
use crate::GameRng;
use crate::monster::{Monster, MonsterId, SpawnContext};
use crate::object::{Object, ObjectId};
use crate::{COLNO, ROWNO};

fn default_cells() -> Vec<Vec<Cell>> {
    vec![vec![Cell::stone(); ROWNO]; COLNO]
}

fn default_object_grid() -> Vec<Vec<Vec<ObjectId>>> {
    vec![vec![Vec::new(); ROWNO]; COLNO]
}

fn default_monster_grid() -> Vec<Vec<Option<MonsterId>>> {
    vec![vec![None; ROWNO]; COLNO]
}

/// One dungeon floor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Level {
    pub depth: i32,

    /// Terrain, indexed `[x][y]`
    pub cells: Vec<Vec<Cell>>,

    /// Monster occupying each cell
    pub monster_grid: Vec<Vec<Option<MonsterId>>>,

    /// Object ids on each cell, bottom of the pile first
    pub object_grid: Vec<Vec<Vec<ObjectId>>>,

    pub objects: Vec<Object>,

    /// The monster registry
    pub monsters: Vec<Monster>,

    pub traps: Vec<Trap>,
    pub rooms: Vec<Room>,

    pub upstairs: Option<Position>,
    pub downstairs: Option<Position>,

    next_object_id: u32,
    next_monster_id: u32,
}

impl Default for Level {
    fn default() -> Self {
        Self::new(1)
    }
}

impl Level {
    /// Create an all-stone level
    pub fn new(depth: i32) -> Self {
        Self {
            depth,
            cells: default_cells(),
            monster_grid: default_monster_grid(),
            object_grid: default_object_grid(),
            objects: Vec::new(),
            monsters: Vec::new(),
            traps: Vec::new(),
            rooms: Vec::new(),
            upstairs: None,
            downstairs: None,
            next_object_id: 1,
            next_monster_id: 1,
        }
    }

    /// Create a generated level with rooms, corridors and an initial population
    pub fn generate(depth: i32, rng: &mut GameRng) -> Self {
        super::generate_floor(depth, &SpawnContext::default(), rng)
    }

    pub fn cell(&self, pos: Position) -> &Cell {
        &self.cells[pos.x as usize][pos.y as usize]
    }

    pub fn cell_mut(&mut self, pos: Position) -> &mut Cell {
        &mut self.cells[pos.x as usize][pos.y as usize]
    }

    /// Column 0 is never part of the map
    pub fn is_valid_pos(&self, pos: Position) -> bool {
        pos.x >= 1 && pos.y >= 0 && (pos.x as usize) < COLNO && (pos.y as usize) < ROWNO
    }

    /// Valid, passable terrain with no closed door
    pub fn is_walkable(&self, pos: Position) -> bool {
        self.is_valid_pos(pos) && self.cell(pos).is_walkable()
    }

    pub fn blocks_sight(&self, pos: Position) -> bool {
        !self.is_valid_pos(pos) || self.cell(pos).blocks_sight()
    }

    // Monster registry

    pub fn monster(&self, id: MonsterId) -> Option<&Monster> {
        self.monsters.iter().find(|m| m.id == id)
    }

    pub fn monster_mut(&mut self, id: MonsterId) -> Option<&mut Monster> {
        self.monsters.iter_mut().find(|m| m.id == id)
    }

    pub fn monster_id_at(&self, pos: Position) -> Option<MonsterId> {
        if !self.is_valid_pos(pos) {
            return None;
        }
        self.monster_grid[pos.x as usize][pos.y as usize]
    }

    pub fn monster_at(&self, pos: Position) -> Option<&Monster> {
        let id = self.monster_id_at(pos)?;
        self.monster(id)
    }

    /// Ids of every monster on the floor, in registry order
    pub fn monster_ids(&self) -> Vec<MonsterId> {
        self.monsters.iter().map(|m| m.id).collect()
    }

    /// Add a monster at its own position, assigning a fresh id.
    /// The caller must ensure the cell is free.
    pub fn add_monster(&mut self, mut monster: Monster) -> MonsterId {
        let id = MonsterId(self.next_monster_id);
        self.next_monster_id += 1;
        monster.id = id;
        self.monster_grid[monster.pos.x as usize][monster.pos.y as usize] = Some(id);
        self.monsters.push(monster);
        id
    }

    pub fn remove_monster(&mut self, id: MonsterId) -> Option<Monster> {
        let idx = self.monsters.iter().position(|m| m.id == id)?;
        let monster = self.monsters.remove(idx);
        let slot = &mut self.monster_grid[monster.pos.x as usize][monster.pos.y as usize];
        if *slot == Some(id) {
            *slot = None;
        }
        Some(monster)
    }

    /// Move a monster and keep the grid in step. Fails when the target
    /// is invalid or held by another monster.
    pub fn move_monster(&mut self, id: MonsterId, to: Position) -> bool {
        if !self.is_valid_pos(to) {
            return false;
        }
        if let Some(other) = self.monster_grid[to.x as usize][to.y as usize]
            && other != id
        {
            return false;
        }
        let Some(monster) = self.monsters.iter_mut().find(|m| m.id == id) else {
            return false;
        };
        let from = monster.pos;
        monster.pos = to;
        if self.monster_grid[from.x as usize][from.y as usize] == Some(id) {
            self.monster_grid[from.x as usize][from.y as usize] = None;
        }
        self.monster_grid[to.x as usize][to.y as usize] = Some(id);
        true
    }

    /// Swap the cells of two monsters
    pub fn swap_monsters(&mut self, a: MonsterId, b: MonsterId) -> bool {
        let (Some(pa), Some(pb)) = (self.monster(a).map(|m| m.pos), self.monster(b).map(|m| m.pos))
        else {
            return false;
        };
        if let Some((ma, mb)) = self.monster_pair_mut(a, b) {
            ma.pos = pb;
            mb.pos = pa;
        }
        self.monster_grid[pa.x as usize][pa.y as usize] = Some(b);
        self.monster_grid[pb.x as usize][pb.y as usize] = Some(a);
        true
    }

    /// Borrow two distinct monsters mutably
    pub fn monster_pair_mut(
        &mut self,
        a: MonsterId,
        b: MonsterId,
    ) -> Option<(&mut Monster, &mut Monster)> {
        if a == b {
            return None;
        }
        let ia = self.monsters.iter().position(|m| m.id == a)?;
        let ib = self.monsters.iter().position(|m| m.id == b)?;
        if ia < ib {
            let (left, right) = self.monsters.split_at_mut(ib);
            Some((&mut left[ia], &mut right[0]))
        } else {
            let (left, right) = self.monsters.split_at_mut(ia);
            Some((&mut right[0], &mut left[ib]))
        }
    }

    // Objects

    pub fn add_object(&mut self, mut object: Object, pos: Position) -> ObjectId {
        let id = ObjectId(self.next_object_id);
        self.next_object_id += 1;
        object.id = id;
        object.pos = pos;
        object.worn = crate::object::WornMask::empty();
        object.inv_letter = ' ';
        self.object_grid[pos.x as usize][pos.y as usize].push(id);
        self.objects.push(object);
        id
    }

    pub fn remove_object(&mut self, id: ObjectId) -> Option<Object> {
        let idx = self.objects.iter().position(|o| o.id == id)?;
        let object = self.objects.remove(idx);
        self.object_grid[object.pos.x as usize][object.pos.y as usize].retain(|&oid| oid != id);
        Some(object)
    }

    pub fn objects_at(&self, pos: Position) -> Vec<&Object> {
        if !self.is_valid_pos(pos) {
            return Vec::new();
        }
        self.object_grid[pos.x as usize][pos.y as usize]
            .iter()
            .filter_map(|id| self.objects.iter().find(|o| o.id == *id))
            .collect()
    }

    /// Remove and return every object on the cell accepted by `filter`
    pub fn take_objects_at(
        &mut self,
        pos: Position,
        filter: impl Fn(&Object) -> bool,
    ) -> Vec<Object> {
        if !self.is_valid_pos(pos) {
            return Vec::new();
        }
        let ids: Vec<ObjectId> = self
            .objects_at(pos)
            .into_iter()
            .filter(|o| filter(o))
            .map(|o| o.id)
            .collect();
        ids.into_iter()
            .filter_map(|id| self.remove_object(id))
            .collect()
    }

    // Traps

    pub fn trap_at(&self, pos: Position) -> Option<&Trap> {
        self.traps.iter().find(|t| t.pos == pos)
    }

    pub fn trap_at_mut(&mut self, pos: Position) -> Option<&mut Trap> {
        self.traps.iter_mut().find(|t| t.pos == pos)
    }

    pub fn add_trap(&mut self, pos: Position, kind: TrapType) {
        if self.trap_at(pos).is_none() {
            self.traps.push(Trap::new(pos, kind));
        }
    }

    pub fn find_upstairs(&self) -> Option<Position> {
        self.upstairs
    }

    pub fn find_downstairs(&self) -> Option<Position> {
        self.downstairs
    }

    /// Bresenham line between two cells; only the cells strictly between
    /// them may block.
    pub fn has_line_of_sight(&self, from: Position, to: Position) -> bool {
        let (mut x, mut y) = (from.x as i32, from.y as i32);
        let (x1, y1) = (to.x as i32, to.y as i32);
        let dx = (x1 - x).abs();
        let dy = -(y1 - y).abs();
        let sx = if x < x1 { 1 } else { -1 };
        let sy = if y < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            if x == x1 && y == y1 {
                return true;
            }
            if (x, y) != (from.x as i32, from.y as i32)
                && self.blocks_sight(Position::new(x as i8, y as i8))
            {
                return false;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// A walkable cell with no monster on it, avoiding `avoid`
    pub fn is_free(&self, pos: Position, avoid: Option<Position>) -> bool {
        self.is_walkable(pos) && self.monster_id_at(pos).is_none() && Some(pos) != avoid
    }

    pub fn random_walkable(&self, rng: &mut GameRng) -> Option<Position> {
        for _ in 0..500 {
            let pos = Position::new(
                rng.rn1(COLNO as u32 - 1, 1) as i8,
                rng.rn2(ROWNO as u32) as i8,
            );
            if self.is_walkable(pos) && self.cell(pos).typ != CellType::Door {
                return Some(pos);
            }
        }
        None
    }

    /// Nearest free cell to `center`, searching outward ring by ring and
    /// choosing randomly within the first ring that has room
    pub fn enexto(
        &self,
        center: Position,
        avoid: Option<Position>,
        rng: &mut GameRng,
    ) -> Option<Position> {
        if self.is_free(center, avoid) {
            return Some(center);
        }
        for radius in 1..(COLNO as i8) {
            let mut ring = Vec::new();
            for dx in -radius..=radius {
                for dy in -radius..=radius {
                    if dx.abs() != radius && dy.abs() != radius {
                        continue;
                    }
                    let pos = Position::new(
                        center.x.saturating_add(dx),
                        center.y.saturating_add(dy),
                    );
                    if self.is_free(pos, avoid) {
                        ring.push(pos);
                    }
                }
            }
            if let Some(&pos) = rng.choose(&ring) {
                return Some(pos);
            }
        }
        None
    }

    /// Grid/registry consistency violations, empty when consistent
    pub fn check_invariants(
        &self,
        player_pos: Position,
        swallowed_by: Option<MonsterId>,
    ) -> Vec<String> {
        let mut errors = Vec::new();
        let mut seen_ids = hashbrown::HashSet::new();

        for m in &self.monsters {
            if !seen_ids.insert(m.id) {
                errors.push(format!("duplicate monster id {}", m.id));
            }
            if !self.is_valid_pos(m.pos) {
                errors.push(format!("monster {} at invalid {}", m.id, m.pos));
                continue;
            }
            if self.monster_grid[m.pos.x as usize][m.pos.y as usize] != Some(m.id) {
                errors.push(format!("monster {} not on grid at {}", m.id, m.pos));
            }
            if m.pos == player_pos && swallowed_by != Some(m.id) {
                errors.push(format!("monster {} on the player's cell", m.id));
            }
            if m.id.0 >= self.next_monster_id {
                errors.push(format!("monster {} beyond id counter", m.id));
            }
        }

        for (x, col) in self.monster_grid.iter().enumerate() {
            for (y, slot) in col.iter().enumerate() {
                if let Some(id) = slot {
                    match self.monster(*id) {
                        Some(m) if m.pos == Position::new(x as i8, y as i8) => {}
                        Some(m) => errors.push(format!(
                            "grid ({}, {}) names {} which is at {}",
                            x, y, id, m.pos
                        )),
                        None => errors.push(format!("grid ({}, {}) names missing {}", x, y, id)),
                    }
                }
            }
        }

        for obj in &self.objects {
            let count = self
                .object_grid
                .iter()
                .flatten()
                .flatten()
                .filter(|&&oid| oid == obj.id)
                .count();
            let here = self.object_grid[obj.pos.x as usize][obj.pos.y as usize].contains(&obj.id);
            if count != 1 || !here {
                errors.push(format!("object {:?} appears {} times on grid", obj.id, count));
            }
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monster::race_by_name;
    use crate::object::kinds;

    fn open_level() -> Level {
        let mut level = Level::new(1);
        for x in 1..20 {
            for y in 1..10 {
                level.cells[x][y] = Cell::floor();
            }
        }
        level
    }

    fn jackal_at(pos: Position) -> Monster {
        Monster::new(MonsterId::NONE, race_by_name("jackal").unwrap(), pos)
    }

    #[test]
    fn test_add_move_remove_keeps_grid() {
        let mut level = open_level();
        let id = level.add_monster(jackal_at(Position::new(3, 3)));
        assert_eq!(level.monster_id_at(Position::new(3, 3)), Some(id));

        assert!(level.move_monster(id, Position::new(4, 3)));
        assert_eq!(level.monster_id_at(Position::new(3, 3)), None);
        assert_eq!(level.monster_at(Position::new(4, 3)).map(|m| m.id), Some(id));

        assert!(level.remove_monster(id).is_some());
        assert_eq!(level.monster_id_at(Position::new(4, 3)), None);
        assert!(level.check_invariants(Position::new(10, 5), None).is_empty());
    }

    #[test]
    fn test_move_onto_occupied_cell_fails() {
        let mut level = open_level();
        let a = level.add_monster(jackal_at(Position::new(3, 3)));
        let b = level.add_monster(jackal_at(Position::new(4, 3)));
        assert!(!level.move_monster(a, Position::new(4, 3)));
        assert!(level.swap_monsters(a, b));
        assert_eq!(level.monster_id_at(Position::new(4, 3)), Some(a));
        assert_eq!(level.monster_id_at(Position::new(3, 3)), Some(b));
        assert!(level.check_invariants(Position::new(10, 5), None).is_empty());
    }

    #[test]
    fn test_ids_never_reused() {
        let mut level = open_level();
        let a = level.add_monster(jackal_at(Position::new(3, 3)));
        level.remove_monster(a);
        let b = level.add_monster(jackal_at(Position::new(3, 3)));
        assert_ne!(a, b);
    }

    #[test]
    fn test_monster_pair_mut() {
        let mut level = open_level();
        let a = level.add_monster(jackal_at(Position::new(3, 3)));
        let b = level.add_monster(jackal_at(Position::new(5, 3)));
        let (ma, mb) = level.monster_pair_mut(b, a).unwrap();
        assert_eq!(ma.id, b);
        assert_eq!(mb.id, a);
        assert!(level.monster_pair_mut(a, a).is_none());
    }

    #[test]
    fn test_objects_on_grid() {
        let mut level = open_level();
        let pos = Position::new(5, 5);
        let dagger = level.add_object(Object::new(kinds::DAGGER, 1), pos);
        level.add_object(Object::gold(20), pos);
        assert_eq!(level.objects_at(pos).len(), 2);

        let gold = level.take_objects_at(pos, |o| o.is_gold());
        assert_eq!(gold.len(), 1);
        assert_eq!(level.objects_at(pos)[0].id, dagger);
        assert!(level.check_invariants(Position::new(1, 1), None).is_empty());
    }

    #[test]
    fn test_line_of_sight() {
        let mut level = open_level();
        let a = Position::new(2, 5);
        let b = Position::new(10, 5);
        assert!(level.has_line_of_sight(a, b));
        level.cells[6][5].typ = CellType::VWall;
        assert!(!level.has_line_of_sight(a, b));
        // the end cell itself never blocks
        assert!(level.has_line_of_sight(a, Position::new(6, 5)));
    }

    #[test]
    fn test_enexto_skips_occupied() {
        let mut level = open_level();
        let center = Position::new(5, 5);
        level.add_monster(jackal_at(center));
        let mut rng = GameRng::new(9);
        let pos = level.enexto(center, Some(Position::new(6, 5)), &mut rng).unwrap();
        assert!(pos.is_adjacent(center));
        assert_ne!(pos, Position::new(6, 5));
    }

    #[test]
    fn test_invariants_flag_player_overlap() {
        let mut level = open_level();
        let id = level.add_monster(jackal_at(Position::new(3, 3)));
        let errors = level.check_invariants(Position::new(3, 3), None);
        assert_eq!(errors.len(), 1);
        assert!(level.check_invariants(Position::new(3, 3), Some(id)).is_empty());
    }
}
