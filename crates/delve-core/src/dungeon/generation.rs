//! Floor generation (mklev)
//!
//! Places rooms, joins them with corridors using the four-phase join
//! order, then adds doors, stairs, traps, items and an initial population.

use strum::IntoEnumIterator;
use tracing::debug;

use super::{Cell, CellType, DoorState, Level, Position, Room, TrapType};
use crate::monster::{MakeMonFlags, SpawnContext, makemon, rndmonst};
use crate::object::Object;
use crate::{COLNO, GameRng, ROWNO};

/// Layouts retried before accepting a partly connected one
const MAX_LAYOUT_ATTEMPTS: usize = 20;

/// Union-find over room indices (smeq)
#[derive(Debug, Clone)]
struct ConnectivityTracker {
    parent: Vec<usize>,
}

impl ConnectivityTracker {
    fn new(rooms: usize) -> Self {
        Self {
            parent: (0..rooms).collect(),
        }
    }

    fn find(&mut self, a: usize) -> usize {
        let mut root = a;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut cur = a;
        while self.parent[cur] != root {
            let next = self.parent[cur];
            self.parent[cur] = root;
            cur = next;
        }
        root
    }

    fn connected(&mut self, a: usize, b: usize) -> bool {
        self.find(a) == self.find(b)
    }

    fn merge(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        self.parent[ra.max(rb)] = ra.min(rb);
    }
}

/// Generate a complete floor
pub fn generate_floor(depth: i32, ctx: &SpawnContext, rng: &mut GameRng) -> Level {
    let mut level = generate_layout(depth, rng);
    place_stairs(&mut level, rng);
    place_fountains(&mut level, rng);
    place_traps(&mut level, rng);
    place_objects(&mut level, rng);
    populate(&mut level, ctx, rng);
    debug!(
        depth,
        rooms = level.rooms.len(),
        monsters = level.monsters.len(),
        objects = level.objects.len(),
        "generated floor"
    );
    level
}

fn generate_layout(depth: i32, rng: &mut GameRng) -> Level {
    let mut level = Level::new(depth);
    for attempt in 0..MAX_LAYOUT_ATTEMPTS {
        level = Level::new(depth);
        let rooms = make_rooms(depth, rng);
        if rooms.len() < 2 {
            continue;
        }
        for (i, room) in rooms.iter().enumerate() {
            carve_room(&mut level, room, i);
        }
        level.rooms = rooms;
        make_corridors(&mut level, rng);
        if all_rooms_reachable(&level) {
            break;
        }
        debug!(depth, attempt, "discarding disconnected layout");
    }
    level
}

fn make_rooms(depth: i32, rng: &mut GameRng) -> Vec<Room> {
    let wanted = rng.rn1(4, 6) as usize;
    let mut rooms: Vec<Room> = Vec::new();
    for _ in 0..wanted * 20 {
        if rooms.len() >= wanted {
            break;
        }
        let w = rng.rn1(7, 3) as i8;
        let h = rng.rn1(4, 2) as i8;
        let lx = 3 + rng.rn2((COLNO as i8 - 5 - w) as u32) as i8;
        let ly = 3 + rng.rn2((ROWNO as i8 - 5 - h) as u32) as i8;
        let mut room = Room::new(lx, ly, lx + w - 1, ly + h - 1);
        // a wall, a gap for corridors and the other wall
        if rooms.iter().any(|r| r.overlaps(&room, 3)) {
            continue;
        }
        room.lit = rng.rnd(1 + depth.unsigned_abs()) < 11 && rng.rn2(77) != 0;
        rooms.push(room);
    }
    rooms.sort_by_key(|r| r.lx);
    rooms
}

fn carve_room(level: &mut Level, room: &Room, index: usize) {
    for x in (room.lx - 1)..=(room.hx + 1) {
        for y in (room.ly - 1)..=(room.hy + 1) {
            let left = x == room.lx - 1;
            let right = x == room.hx + 1;
            let top = y == room.ly - 1;
            let bottom = y == room.hy + 1;
            let typ = match (left, right, top, bottom) {
                (true, _, true, _) => CellType::TLCorner,
                (_, true, true, _) => CellType::TRCorner,
                (true, _, _, true) => CellType::BLCorner,
                (_, true, _, true) => CellType::BRCorner,
                (true, _, _, _) | (_, true, _, _) => CellType::VWall,
                (_, _, true, _) | (_, _, _, true) => CellType::HWall,
                _ => CellType::Room,
            };
            let cell = &mut level.cells[x as usize][y as usize];
            *cell = Cell::floor();
            cell.typ = typ;
            cell.lit = room.lit;
            cell.room = index as u8 + 1;
        }
    }
}

/// Join rooms in four phases: neighbours, rooms two apart, anything still
/// disconnected, then a few extra corridors that may dead-end
fn make_corridors(level: &mut Level, rng: &mut GameRng) {
    let n = level.rooms.len();
    let mut tracker = ConnectivityTracker::new(n);

    for a in 0..n - 1 {
        join(level, a, a + 1, false, &mut tracker, rng);
        if rng.one_in(50) {
            break;
        }
    }
    for a in 0..n.saturating_sub(2) {
        if !tracker.connected(a, a + 2) {
            join(level, a, a + 2, false, &mut tracker, rng);
        }
    }
    for a in 0..n {
        for b in 0..n {
            if !tracker.connected(a, b) {
                join(level, a, b, false, &mut tracker, rng);
            }
        }
    }
    if n > 2 {
        for _ in 0..rng.rn2(n as u32) + 4 {
            let a = rng.rn2(n as u32) as usize;
            let mut b = rng.rn2(n as u32 - 2) as usize;
            if b >= a {
                b += 2;
            }
            join(level, a, b, true, &mut tracker, rng);
        }
    }
}

/// Dig a corridor between two rooms and door both ends
fn join(
    level: &mut Level,
    a: usize,
    b: usize,
    extra: bool,
    tracker: &mut ConnectivityTracker,
    rng: &mut GameRng,
) {
    let (ra, rb) = (level.rooms[a], level.rooms[b]);

    // door cell on each wall, and the step from the door into the corridor
    let (door_a, out_a, door_b, out_b) = if rb.lx > ra.hx {
        let da = find_door_pos(level, ra.hx + 1, ra.ly, ra.hx + 1, ra.hy, rng);
        let db = find_door_pos(level, rb.lx - 1, rb.ly, rb.lx - 1, rb.hy, rng);
        (da, (1, 0), db, (-1, 0))
    } else if rb.hy < ra.ly {
        let da = find_door_pos(level, ra.lx, ra.ly - 1, ra.hx, ra.ly - 1, rng);
        let db = find_door_pos(level, rb.lx, rb.hy + 1, rb.hx, rb.hy + 1, rng);
        (da, (0, -1), db, (0, 1))
    } else if rb.hx < ra.lx {
        let da = find_door_pos(level, ra.lx - 1, ra.ly, ra.lx - 1, ra.hy, rng);
        let db = find_door_pos(level, rb.hx + 1, rb.ly, rb.hx + 1, rb.hy, rng);
        (da, (-1, 0), db, (1, 0))
    } else {
        let da = find_door_pos(level, ra.lx, ra.hy + 1, ra.hx, ra.hy + 1, rng);
        let db = find_door_pos(level, rb.lx, rb.ly - 1, rb.hx, rb.ly - 1, rng);
        (da, (0, 1), db, (0, -1))
    };

    let org = door_a.offset(out_a.0, out_a.1);
    let dest = door_b.offset(out_b.0, out_b.1);
    if !dig_corridor(level, org, dest, extra, rng) {
        return;
    }

    if ok_door(level, door_a) || !extra {
        place_door(level, door_a, rng);
    }
    if ok_door(level, door_b) || !extra {
        place_door(level, door_b, rng);
    }
    tracker.merge(a, b);
}

/// Random door spot on a wall segment, preferring spots that can hold a door
fn find_door_pos(level: &Level, x1: i8, y1: i8, x2: i8, y2: i8, rng: &mut GameRng) -> Position {
    let mut spots = Vec::new();
    for x in x1..=x2 {
        for y in y1..=y2 {
            let pos = Position::new(x, y);
            if ok_door(level, pos) || level.cell(pos).typ == CellType::Door {
                spots.push(pos);
            }
        }
    }
    if let Some(&pos) = rng.choose(&spots) {
        return pos;
    }
    let x = x1 + rng.rn2((x2 - x1 + 1) as u32) as i8;
    let y = y1 + rng.rn2((y2 - y1 + 1) as u32) as i8;
    Position::new(x, y)
}

/// A wall cell with no door orthogonally next to it
fn ok_door(level: &Level, pos: Position) -> bool {
    let typ = level.cell(pos).typ;
    (typ == CellType::HWall || typ == CellType::VWall) && !by_door(level, pos)
}

fn by_door(level: &Level, pos: Position) -> bool {
    [(0, -1), (1, 0), (0, 1), (-1, 0)].iter().any(|&(dx, dy)| {
        let p = pos.offset(dx, dy);
        level.is_valid_pos(p)
            && matches!(level.cell(p).typ, CellType::Door | CellType::SecretDoor)
    })
}

/// Turn a wall cell into a door (dodoor)
fn place_door(level: &mut Level, pos: Position, rng: &mut GameRng) {
    let cell = level.cell_mut(pos);
    if matches!(cell.typ, CellType::Door | CellType::SecretDoor) {
        return;
    }
    if !cell.typ.is_wall() || !rng.one_in(8) {
        cell.typ = CellType::Door;
        cell.door = if rng.one_in(3) {
            if rng.one_in(5) {
                DoorState::OPEN
            } else if rng.one_in(6) {
                DoorState::LOCKED
            } else {
                DoorState::CLOSED
            }
        } else {
            DoorState::empty()
        };
    } else {
        cell.typ = CellType::SecretDoor;
        cell.door = if rng.one_in(5) {
            DoorState::LOCKED
        } else {
            DoorState::CLOSED
        };
    }
}

fn diggable(level: &Level, pos: Position) -> bool {
    pos.x > 0
        && (pos.x as usize) < COLNO - 1
        && pos.y > 0
        && (pos.y as usize) < ROWNO - 1
        && matches!(
            level.cell(pos).typ,
            CellType::Stone | CellType::Corridor | CellType::SecretCorridor
        )
}

/// Dig through stone from `org` to `dest`. Extra corridors may stop
/// early and leave a dead end.
fn dig_corridor(
    level: &mut Level,
    org: Position,
    dest: Position,
    extra: bool,
    rng: &mut GameRng,
) -> bool {
    let (tx, ty) = (dest.x, dest.y);
    let (mut dx, mut dy) = if tx > org.x {
        (1, 0)
    } else if ty > org.y {
        (0, 1)
    } else if tx < org.x {
        (-1, 0)
    } else {
        (0, -1)
    };

    let mut pos = org;
    let mut steps = 0;
    loop {
        if !diggable(level, pos) {
            return false;
        }
        let cell = level.cell_mut(pos);
        if cell.typ == CellType::Stone {
            cell.typ = if extra && rng.one_in(50) {
                CellType::SecretCorridor
            } else {
                CellType::Corridor
            };
        }
        if pos == dest {
            return true;
        }
        steps += 1;
        if steps > 500 || (extra && rng.one_in(35)) {
            return false;
        }

        let mut dix = (pos.x - tx).abs();
        let mut diy = (pos.y - ty).abs();
        if dix > diy && diy != 0 && rng.one_in((dix - diy + 1) as u32) {
            dix = 0;
        } else if diy > dix && dix != 0 && rng.one_in((diy - dix + 1) as u32) {
            diy = 0;
        }

        // turn toward the target when the other axis dominates
        if dy != 0 && dix > diy {
            let ddx = if pos.x > tx { -1 } else { 1 };
            if diggable(level, pos.offset(ddx, 0)) {
                (dx, dy) = (ddx, 0);
                pos = pos.offset(dx, dy);
                continue;
            }
        } else if dx != 0 && diy > dix {
            let ddy = if pos.y > ty { -1 } else { 1 };
            if diggable(level, pos.offset(0, ddy)) {
                (dx, dy) = (0, ddy);
                pos = pos.offset(dx, dy);
                continue;
            }
        }

        if diggable(level, pos.offset(dx, dy)) {
            pos = pos.offset(dx, dy);
            continue;
        }

        if dx != 0 {
            (dx, dy) = (0, if ty < pos.y { -1 } else { 1 });
        } else {
            (dx, dy) = (if tx < pos.x { -1 } else { 1 }, 0);
        }
        if !diggable(level, pos.offset(dx, dy)) {
            (dx, dy) = (-dx, -dy);
        }
        pos = pos.offset(dx, dy);
    }
}

/// Flood fill from the first room, treating every door and secret
/// passage as open
fn all_rooms_reachable(level: &Level) -> bool {
    let Some(start) = level.rooms.first().map(|r| r.center()) else {
        return false;
    };
    let mut seen = vec![vec![false; ROWNO]; COLNO];
    let mut stack = vec![start];
    seen[start.x as usize][start.y as usize] = true;
    while let Some(pos) = stack.pop() {
        for next in pos.neighbours() {
            if !level.is_valid_pos(next) || seen[next.x as usize][next.y as usize] {
                continue;
            }
            let typ = level.cell(next).typ;
            if typ.is_passable() || matches!(typ, CellType::SecretDoor | CellType::SecretCorridor)
            {
                seen[next.x as usize][next.y as usize] = true;
                stack.push(next);
            }
        }
    }
    level
        .rooms
        .iter()
        .all(|r| seen[r.center().x as usize][r.center().y as usize])
}

fn place_stairs(level: &mut Level, rng: &mut GameRng) {
    let n = level.rooms.len();
    if n == 0 {
        return;
    }
    let down_room = rng.rn2(n as u32) as usize;
    let mut up_room = rng.rn2(n as u32) as usize;
    if n > 1 && up_room == down_room {
        up_room = (down_room + 1 + rng.rn2(n as u32 - 1) as usize) % n;
    }

    let down = level.rooms[down_room].random_pos(rng);
    level.cell_mut(down).typ = CellType::DownStairs;
    level.downstairs = Some(down);

    let up = level.rooms[up_room].random_pos(rng);
    if up != down {
        level.cell_mut(up).typ = CellType::UpStairs;
        level.upstairs = Some(up);
    }
}

fn place_fountains(level: &mut Level, rng: &mut GameRng) {
    for i in 0..level.rooms.len() {
        if rng.one_in(10) {
            let pos = level.rooms[i].random_pos(rng);
            if level.cell(pos).typ == CellType::Room {
                level.cell_mut(pos).typ = CellType::Fountain;
            }
        }
    }
}

/// A plain floor cell inside a room with nothing special on it
fn random_room_floor(level: &Level, rng: &mut GameRng) -> Option<Position> {
    let room = *rng.choose(&level.rooms)?;
    for _ in 0..20 {
        let pos = room.random_pos(rng);
        if level.cell(pos).typ == CellType::Room && level.trap_at(pos).is_none() {
            return Some(pos);
        }
    }
    None
}

fn place_traps(level: &mut Level, rng: &mut GameRng) {
    let kinds: Vec<TrapType> = TrapType::iter()
        .filter(|t| t.min_depth() <= level.depth)
        .collect();
    let count = rng.rn2(4) + (level.depth / 8) as u32;
    for _ in 0..count {
        if let (Some(pos), Some(&kind)) = (random_room_floor(level, rng), rng.choose(&kinds)) {
            level.add_trap(pos, kind);
        }
    }
}

fn place_objects(level: &mut Level, rng: &mut GameRng) {
    for i in 0..level.rooms.len() {
        let room = level.rooms[i];
        if rng.one_in(3) {
            let pos = room.random_pos(rng);
            level.add_object(Object::random(rng), pos);
            while rng.one_in(5) {
                let pos = room.random_pos(rng);
                level.add_object(Object::random(rng), pos);
            }
        }
        if rng.one_in(3) {
            let amount = 1 + rng.rnd(level.depth.unsigned_abs() + 2) * rng.rnd(30);
            let pos = room.random_pos(rng);
            level.add_object(Object::gold(amount), pos);
        }
    }
}

/// One monster in roughly a third of the rooms, never on the stairs
fn populate(level: &mut Level, ctx: &SpawnContext, rng: &mut GameRng) {
    for i in 0..level.rooms.len() {
        if !rng.one_in(3) {
            continue;
        }
        let pos = level.rooms[i].random_pos(rng);
        if Some(pos) == level.upstairs || Some(pos) == level.downstairs {
            continue;
        }
        let Some(race) = rndmonst(level.depth, ctx.player_level, rng) else {
            continue;
        };
        let mut flags = MakeMonFlags::empty();
        if rng.one_in(3) {
            flags |= MakeMonFlags::ASLEEP;
        }
        makemon(level, race, pos, ctx, flags, rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracker_merges_transitively() {
        let mut t = ConnectivityTracker::new(4);
        assert!(!t.connected(0, 3));
        t.merge(0, 1);
        t.merge(2, 3);
        t.merge(1, 3);
        assert!(t.connected(0, 2));
    }

    #[test]
    fn test_generated_floor_is_connected() {
        for seed in 0..30 {
            let mut rng = GameRng::new(seed);
            let level = generate_floor(1, &SpawnContext::default(), &mut rng);
            assert!(level.rooms.len() >= 2, "seed {seed}");
            assert!(all_rooms_reachable(&level), "seed {seed}");
        }
    }

    #[test]
    fn test_rooms_do_not_touch() {
        let mut rng = GameRng::new(11);
        let level = generate_floor(3, &SpawnContext::default(), &mut rng);
        for (i, a) in level.rooms.iter().enumerate() {
            for b in level.rooms.iter().skip(i + 1) {
                assert!(!a.overlaps(b, 3));
            }
        }
    }

    #[test]
    fn test_stairs_placed_in_rooms() {
        for seed in 0..20 {
            let mut rng = GameRng::new(seed);
            let level = generate_floor(2, &SpawnContext::default(), &mut rng);
            let up = level.find_upstairs().unwrap();
            let down = level.find_downstairs().unwrap();
            assert_ne!(up, down);
            assert_eq!(level.cell(up).typ, CellType::UpStairs);
            assert_eq!(level.cell(down).typ, CellType::DownStairs);
            assert!(level.monster_at(up).is_none());
        }
    }

    #[test]
    fn test_generation_is_consistent() {
        for seed in 0..20 {
            let mut rng = GameRng::new(seed);
            let level = generate_floor(6, &SpawnContext::default(), &mut rng);
            let errors = level.check_invariants(Position::new(0, 0), None);
            assert!(errors.is_empty(), "seed {seed}: {errors:?}");
        }
    }

    #[test]
    fn test_traps_respect_depth() {
        for seed in 0..20 {
            let mut rng = GameRng::new(seed);
            let level = generate_floor(1, &SpawnContext::default(), &mut rng);
            assert!(level.traps.len() <= 3);
            assert!(level.traps.iter().all(|t| t.kind.min_depth() <= 1));
        }
    }

    #[test]
    fn test_floors_generate_across_seeds_and_depths() {
        for depth in [1, 5, 12, 25, crate::MAX_DEPTH] {
            for seed in 0..60 {
                let mut rng = GameRng::new(seed);
                let level = generate_floor(depth, &SpawnContext::default(), &mut rng);
                for room in &level.rooms {
                    assert!(level.is_valid_pos(room.center()), "seed {seed} depth {depth}");
                    assert!(room.contains(room.center()));
                }
                assert!(level.find_upstairs().is_some(), "seed {seed} depth {depth}");
                let errors = level.check_invariants(Position::new(0, 0), None);
                assert!(errors.is_empty(), "seed {seed} depth {depth}: {errors:?}");
            }
        }
    }
}
