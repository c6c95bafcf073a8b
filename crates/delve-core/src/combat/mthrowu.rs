//! Things that fly: thrown missiles, spit venom and rays (mthrowu, zap)

use tracing::debug;

use super::{
    Attack, DamageType, an, capitalize, mondead, monster_killed_by_monster, player_kills_monster,
    player_sees, roll,
};
use crate::GameState;
use crate::consts::{BOLT_LIM, RAY_RANGE};
use crate::dungeon::{CellType, Level, Position};
use crate::monster::MonsterId;
use crate::object::{Object, kinds};
use crate::player::Property;

/// Who launched a missile or ray; decides kill credit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrowSource {
    Monster(MonsterId),
    Player,
}

/// What is flying
#[derive(Debug, Clone, PartialEq)]
pub enum Projectile {
    Object(Object),
    /// Blinding or acid venom; never lands
    Venom(DamageType),
}

/// A ray in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ray {
    pub element: DamageType,
    /// Number of d6 rolled per hit
    pub dice: u32,
    /// Breath weapon rather than a spell bolt
    pub breath: bool,
}

impl Ray {
    fn name(&self) -> String {
        match self.element {
            DamageType::MagicMissile => String::from("magic missile"),
            element if self.breath => format!("blast of {}", element.element_name()),
            element => format!("bolt of {}", element.element_name()),
        }
    }
}

/// One cell where a ray connected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RayHit {
    pub pos: Position,
    /// None when the player was hit
    pub target: Option<MonsterId>,
    pub damage: i32,
}

/// Terrain that stops missiles and bounces rays
fn blocks_flight(level: &Level, pos: Position) -> bool {
    if !level.is_valid_pos(pos) {
        return true;
    }
    let cell = level.cell(pos);
    cell.typ.is_wall()
        || matches!(cell.typ, CellType::Stone | CellType::SecretDoor | CellType::SecretCorridor)
        || cell.is_door_closed()
}

/// Direction from `from` to `to` when they share a row, column or diagonal
/// within BOLT_LIM and nothing blocks the line (linedup)
pub fn lined_up(level: &Level, from: Position, to: Position) -> Option<(i8, i8)> {
    let dx = to.x as i32 - from.x as i32;
    let dy = to.y as i32 - from.y as i32;
    if (dx == 0 && dy == 0) || !(dx == 0 || dy == 0 || dx.abs() == dy.abs()) {
        return None;
    }
    if from.distmin(to) > BOLT_LIM || !level.has_line_of_sight(from, to) {
        return None;
    }
    Some((dx.signum() as i8, dy.signum() as i8))
}

/// Index of the item a monster would throw: darts, daggers and spears, or
/// arrows when a bow is in hand. The wielded weapon only goes if it is a stack.
pub fn select_missile(inventory: &[Object]) -> Option<usize> {
    let has_bow = inventory
        .iter()
        .any(|o| o.kind == kinds::BOW && o.is_wielded());
    inventory.iter().position(|o| {
        let data = o.data();
        let usable = (data.missile && !data.ammo) || (data.ammo && has_bow);
        usable && (!o.is_wielded() || o.quantity > 1)
    })
}

/// Armor-class roll for a ray (zap_hit)
fn zap_hit(state: &mut GameState, ac: i8) -> bool {
    let chance = state.rng.rn2(20) as i32;
    if chance == 0 {
        return (state.rng.rnd(10) as i32) < ac as i32;
    }
    let ac = if ac >= 0 {
        ac as i32
    } else {
        -(state.rng.rnd((-(ac as i32)) as u32) as i32)
    };
    3 - chance < ac
}

/// Hand out a kill to whoever launched the missile or ray
fn credit_kill(state: &mut GameState, source: ThrowSource, victim: MonsterId) {
    match source {
        ThrowSource::Player => player_kills_monster(state, victim),
        ThrowSource::Monster(killer) if state.current_level.monster(killer).is_some() => {
            monster_killed_by_monster(state, killer, victim)
        }
        ThrowSource::Monster(_) => {
            mondead(state, victim);
        }
    }
}

/// Fly a projectile from `from` along `dir` for up to `range` cells.
/// Returns true if it hit something.
pub fn m_throw(
    state: &mut GameState,
    source: ThrowSource,
    projectile: Projectile,
    from: Position,
    dir: (i8, i8),
    range: i32,
) -> bool {
    let mut pos = from;
    let mut hit = false;
    let mut broken = false;
    let what = match &projectile {
        Projectile::Object(obj) => obj.xname(),
        Projectile::Venom(DamageType::Blind) => String::from("blinding venom"),
        Projectile::Venom(_) => String::from("acid venom"),
    };

    for travelled in 1..=range.max(1) {
        let next = pos.offset(dir.0, dir.1);
        if blocks_flight(&state.current_level, next) {
            break;
        }
        pos = next;

        if pos == state.player.pos && !state.player.is_engulfed() && source != ThrowSource::Player {
            if thitu(state, &projectile, &what, travelled) {
                hit = true;
                broken = breaks(state, &projectile);
                break;
            }
            continue;
        }

        let Some(target) = state.current_level.monster_id_at(pos) else {
            continue;
        };
        if source == ThrowSource::Monster(target) {
            continue;
        }
        if ohitmon(state, source, &projectile, &what, target) {
            hit = true;
            broken = breaks(state, &projectile);
            break;
        }
    }

    if let Projectile::Object(mut obj) = projectile
        && !broken
    {
        obj.quantity = obj.quantity.max(1);
        state.current_level.add_object(obj, pos);
    }
    hit
}

/// Ammo and darts usually snap on impact
fn breaks(state: &mut GameState, projectile: &Projectile) -> bool {
    match projectile {
        Projectile::Object(obj) => {
            (obj.data().ammo || obj.kind == kinds::DART) && state.rng.rn2(3) != 0
        }
        Projectile::Venom(_) => true,
    }
}

/// A missile reaching the player's cell (thitu)
fn thitu(state: &mut GameState, projectile: &Projectile, what: &str, travelled: i32) -> bool {
    let ench = match projectile {
        Projectile::Object(obj) => obj.enchantment as i32,
        Projectile::Venom(_) => 0,
    };
    let tlev = 8 + ench + (3 - travelled).max(-4);
    if state.player.armor_class as i32 + tlev <= state.rng.rnd(20) as i32 {
        state.message(format!("You are almost hit by {}.", an(what)));
        return false;
    }
    state.message(format!("You are hit by {}!", an(what)));

    match projectile {
        Projectile::Object(obj) => {
            let dmg = (state.rng.rnd(obj.data().damage.max(1) as u32) as i32 + ench).max(1);
            if state.player.take_damage(dmg) {
                state.die(format!("killed by {}", an(&obj.data().name)));
            }
        }
        Projectile::Venom(DamageType::Blind) => {
            if !state.player.is_blind() {
                state.message("The venom blinds you.");
            }
            let turns = state.rng.rnd(25);
            state.player.properties.incr_timeout(Property::Blinded, turns);
        }
        Projectile::Venom(_) => {
            if state.player.has(Property::AcidRes) {
                state.message("It doesn't seem to hurt you.");
            } else {
                let dmg = roll(state, 2, 6);
                if state.player.take_damage(dmg) {
                    state.die("killed by a splash of venom");
                }
            }
        }
    }
    true
}

/// A missile reaching a monster's cell (ohitmon); true if it hit
fn ohitmon(
    state: &mut GameState,
    source: ThrowSource,
    projectile: &Projectile,
    what: &str,
    target: MonsterId,
) -> bool {
    let Some(mon) = state.current_level.monster(target) else {
        return false;
    };
    let seen = player_sees(state, mon.pos);
    let name = mon.the_name();
    let mac = mon.ac as i32;
    let (bonus, ench, sides) = match projectile {
        Projectile::Object(obj) => (
            obj.data().hit_bonus as i32,
            obj.enchantment as i32,
            obj.data().damage.max(1) as u32,
        ),
        Projectile::Venom(_) => (0, 0, 6),
    };
    let mut tmp = 5 + mac + bonus + ench;
    if source == ThrowSource::Player {
        tmp += state.player.exp_level as i32 + state.player.hit_bonus as i32;
    }
    if tmp < state.rng.rnd(20) as i32 {
        if seen {
            state.message(format!("The {} misses {}.", what, name));
        }
        return false;
    }
    if seen {
        state.message(format!("{} is hit by {}!", capitalize(&name), an(what)));
    }

    let dmg = match projectile {
        Projectile::Object(_) => (state.rng.rnd(sides) as i32 + ench).max(1),
        Projectile::Venom(DamageType::Blind) => {
            let turns = state.rng.rnd(25) as u16;
            if let Some(mon) = state.current_level.monster_mut(target) {
                mon.set_blinded(turns);
            }
            0
        }
        Projectile::Venom(_) => {
            let resists = state
                .current_level
                .monster(target)
                .is_some_and(|m| m.resists(DamageType::Acid));
            if resists { 0 } else { roll(state, 2, 6) }
        }
    };

    let Some(mon) = state.current_level.monster_mut(target) else {
        return true;
    };
    mon.state.sleeping = false;
    if source == ThrowSource::Player && mon.state.peaceful {
        mon.state.peaceful = false;
    }
    if mon.take_damage(dmg) {
        credit_kill(state, source, target);
    }
    true
}

/// Throw a missile at the player's believed position (thrwmu)
pub fn thrwmu(state: &mut GameState, id: MonsterId) -> bool {
    let Some(mon) = state.current_level.monster(id) else {
        return false;
    };
    let (from, goal) = (mon.pos, mon.believed_player);
    let Some(idx) = select_missile(&mon.inventory) else {
        return false;
    };
    let Some(dir) = lined_up(&state.current_level, from, goal) else {
        return false;
    };
    let seen = player_sees(state, from);
    let cap_name = mon.cap_name();

    let Some(mon) = state.current_level.monster_mut(id) else {
        return false;
    };
    let missile = if mon.inventory[idx].quantity > 1 {
        mon.inventory[idx].split(1)
    } else {
        mon.inventory.remove(idx)
    };
    if seen {
        state.message(format!("{} throws {}!", cap_name, an(&missile.xname())));
    }
    debug!(%id, missile = %missile.xname(), "monster throws");
    m_throw(
        state,
        ThrowSource::Monster(id),
        Projectile::Object(missile),
        from,
        dir,
        BOLT_LIM,
    );
    true
}

/// Spit venom at the player (spitmu)
pub fn spitmu(state: &mut GameState, id: MonsterId, attack: Attack) -> bool {
    let Some(mon) = state.current_level.monster(id) else {
        return false;
    };
    let (from, goal) = (mon.pos, mon.believed_player);
    let name = mon.name.clone();
    if mon.state.cancelled {
        if player_sees(state, from) {
            state.message(format!("A dry rattle comes from the {}'s throat.", name));
        }
        return false;
    }
    let Some(dir) = lined_up(&state.current_level, from, goal) else {
        return false;
    };
    let dist = from.distmin(goal);
    if state.rng.rn2((BOLT_LIM - dist).max(1) as u32) != 0 {
        return false;
    }
    let venom = match attack.damage_type {
        DamageType::Blind => DamageType::Blind,
        _ => DamageType::Acid,
    };
    if player_sees(state, from) {
        state.message(format!("The {} spits venom!", name));
    }
    m_throw(
        state,
        ThrowSource::Monster(id),
        Projectile::Venom(venom),
        from,
        dir,
        BOLT_LIM,
    );
    true
}

/// Use a breath weapon on the player (breamu)
pub fn breamu(state: &mut GameState, id: MonsterId, attack: Attack) -> bool {
    let Some(mon) = state.current_level.monster(id) else {
        return false;
    };
    let (from, goal) = (mon.pos, mon.believed_player);
    let name = mon.name.clone();
    let (cancelled, ready) = (mon.state.cancelled, mon.spec_used == 0);
    let Some(dir) = lined_up(&state.current_level, from, goal) else {
        return false;
    };
    if cancelled {
        if player_sees(state, from) {
            state.message(format!("The {} coughs.", name));
        }
        return false;
    }
    if !ready || state.rng.rn2(3) == 0 {
        return false;
    }

    let ray = Ray {
        element: attack.damage_type,
        dice: attack.dice_num.max(1) as u32,
        breath: true,
    };
    if player_sees(state, from) {
        state.message(format!("The {} breathes {}!", name, attack.damage_type.element_name()));
    }
    let mut cooldown = 10 + state.rng.rn2(20) as u16;
    if attack.damage_type == DamageType::Sleep {
        cooldown += state.rng.rnd(20) as u16;
    }
    if let Some(mon) = state.current_level.monster_mut(id) {
        mon.spec_used = cooldown;
    }
    buzz(state, ThrowSource::Monster(id), ray, from, dir);
    true
}

/// Send a ray along `dir` from `start`, bouncing off walls (buzz)
pub fn buzz(
    state: &mut GameState,
    source: ThrowSource,
    ray: Ray,
    start: Position,
    dir: (i8, i8),
) -> Vec<RayHit> {
    let mut hits = Vec::new();
    if dir == (0, 0) {
        return hits;
    }
    let (mut dx, mut dy) = dir;
    let mut pos = start;
    let mut range = RAY_RANGE;
    let name = ray.name();

    while range > 0 {
        range -= 1;
        let next = pos.offset(dx, dy);
        if blocks_flight(&state.current_level, next) {
            if player_sees(state, pos) {
                state.message(format!("The {} bounces!", name));
            }
            dx = -dx;
            dy = -dy;
            continue;
        }
        pos = next;

        if let Some(target) = state.current_level.monster_id_at(pos) {
            let ac = state.current_level.monster(target).map_or(10, |m| m.ac);
            if zap_hit(state, ac) {
                range -= 2;
                let damage = zhitm(state, source, ray, &name, target);
                hits.push(RayHit {
                    pos,
                    target: Some(target),
                    damage,
                });
            }
        } else if pos == state.player.pos && !state.player.is_engulfed() {
            if zap_hit(state, state.player.armor_class) {
                range -= 2;
                if state.player.has(Property::Reflection) {
                    state.message(format!("But it reflects from you! The {} bounces!", name));
                    dx = -dx;
                    dy = -dy;
                    continue;
                }
                let damage = zhitu(state, ray, &name);
                hits.push(RayHit {
                    pos,
                    target: None,
                    damage,
                });
                if state.player.is_dead() {
                    break;
                }
            } else {
                state.message(format!("The {} whizzes by you!", name));
            }
        }
    }
    hits
}

/// A ray hitting a monster (zhitm); returns the damage done
fn zhitm(
    state: &mut GameState,
    source: ThrowSource,
    ray: Ray,
    name: &str,
    target: MonsterId,
) -> i32 {
    let Some(mon) = state.current_level.monster(target) else {
        return 0;
    };
    let resists = mon.resists(ray.element);
    let seen = player_sees(state, mon.pos);
    let mon_name = capitalize(&mon.the_name());
    let hp = mon.hp;
    if seen {
        state.message(format!("The {} hits {}!", name, mon.the_name()));
    }

    let mut dmg = roll(state, ray.dice, 6);
    match ray.element {
        _ if resists => {
            if seen {
                state.message(format!("{} seems unharmed.", mon_name));
            }
            dmg = 0;
        }
        DamageType::Sleep => {
            let turns = roll(state, ray.dice, 25).clamp(1, u16::MAX as i32) as u16;
            if let Some(mon) = state.current_level.monster_mut(target) {
                mon.set_frozen(turns);
            }
            dmg = 0;
        }
        DamageType::Disintegrate => dmg = hp.max(1),
        _ => {}
    }

    let Some(mon) = state.current_level.monster_mut(target) else {
        return dmg;
    };
    if source == ThrowSource::Player && mon.state.peaceful {
        mon.state.peaceful = false;
    }
    if mon.take_damage(dmg) {
        credit_kill(state, source, target);
    }
    dmg
}

/// A ray hitting the player (zhitu); returns the damage done
fn zhitu(state: &mut GameState, ray: Ray, name: &str) -> i32 {
    state.message(format!("The {} hits you!", name));
    let resisted = ray
        .element
        .player_resistance()
        .is_some_and(|prop| state.player.has(prop));

    let mut dmg = roll(state, ray.dice, 6);
    match ray.element {
        DamageType::Sleep => {
            if resisted {
                state.message("You don't feel sleepy.");
            } else {
                let turns = roll(state, ray.dice, 25).max(1) as u32;
                state.player.make_helpless(Property::Asleep, turns);
            }
            return 0;
        }
        DamageType::Disintegrate => {
            if resisted {
                state.message("You are not disintegrated.");
                return 0;
            }
            state.message("You are disintegrated!");
            dmg = state.player.hp.max(1);
        }
        DamageType::MagicMissile if resisted => {
            state.message("The missiles bounce off!");
            return 0;
        }
        _ if resisted => {
            state.message(match ray.element {
                DamageType::Fire => "You don't feel hot!",
                DamageType::Cold => "You don't feel cold.",
                DamageType::Electric => "You aren't affected.",
                _ => "It doesn't seem to hurt you.",
            });
            return 0;
        }
        _ => {}
    }

    if state.player.take_damage(dmg) {
        state.die(format!("killed by a {}", name));
    }
    dmg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GameRng;
    use crate::dungeon::Cell;
    use crate::monster::{Monster, race_by_name};
    use crate::world::GameOptions;

    fn arena() -> GameState {
        let options = GameOptions {
            pet: false,
            ..Default::default()
        };
        let mut state = GameState::new(GameRng::new(3), options).unwrap();
        let mut level = Level::new(1);
        for x in 1..20 {
            for y in 1..10 {
                level.cells[x][y] = Cell::floor();
            }
        }
        state.current_level = level;
        state.player.pos = Position::new(5, 5);
        state
    }

    fn spawn(state: &mut GameState, name: &str, pos: Position) -> MonsterId {
        let mut mon = Monster::new(MonsterId::NONE, race_by_name(name).unwrap(), pos);
        mon.hp = 30;
        mon.hp_max = 30;
        mon.believed_player = state.player.pos;
        state.current_level.add_monster(mon)
    }

    #[test]
    fn test_lined_up() {
        let state = arena();
        let level = &state.current_level;
        let p = Position::new(5, 5);
        assert_eq!(lined_up(level, p, Position::new(9, 5)), Some((1, 0)));
        assert_eq!(lined_up(level, p, Position::new(2, 2)), Some((-1, -1)));
        assert_eq!(lined_up(level, p, Position::new(7, 6)), None);
        assert_eq!(lined_up(level, p, p), None);
        assert_eq!(lined_up(level, Position::new(1, 1), Position::new(10, 1)), None);
    }

    #[test]
    fn test_lined_up_blocked_by_wall() {
        let mut state = arena();
        state.current_level.cells[7][5] = Cell::stone();
        assert_eq!(
            lined_up(&state.current_level, Position::new(5, 5), Position::new(9, 5)),
            None
        );
    }

    #[test]
    fn test_select_missile() {
        let mut dagger = Object::new(kinds::DAGGER, 1);
        dagger.worn = crate::object::WornMask::WEAPON;
        let arrows = Object::new(kinds::ARROW, 5);
        assert_eq!(select_missile(&[dagger.clone(), arrows.clone()]), None);

        let darts = Object::new(kinds::DART, 3);
        assert_eq!(select_missile(&[dagger, darts]), Some(1));

        let mut bow = Object::new(kinds::BOW, 1);
        bow.worn = crate::object::WornMask::WEAPON;
        assert_eq!(select_missile(&[bow, arrows]), Some(1));
    }

    #[test]
    fn test_missile_lands_at_wall() {
        let mut state = arena();
        state.player.pos = Position::new(2, 2);
        let dagger = Object::new(kinds::DAGGER, 1);
        m_throw(
            &mut state,
            ThrowSource::Player,
            Projectile::Object(dagger),
            Position::new(15, 5),
            (1, 0),
            BOLT_LIM,
        );
        let landed = state.current_level.objects_at(Position::new(19, 5));
        assert_eq!(landed.len(), 1);
        assert_eq!(landed[0].kind, kinds::DAGGER);
    }

    #[test]
    fn test_thrown_dagger_can_hit_player() {
        let mut state = arena();
        state.player.armor_class = 10;
        state.player.hp = 1000;
        state.player.hp_max = 1000;
        let id = spawn(&mut state, "hill orc", Position::new(8, 5));
        let hits = (0..30)
            .filter(|_| {
                state
                    .current_level
                    .monster_mut(id)
                    .unwrap()
                    .inventory
                    .push(Object::new(kinds::DAGGER, 2));
                thrwmu(&mut state, id);
                state.player.hp < 1000
            })
            .count();
        assert!(hits > 0);
    }

    #[test]
    fn test_breath_cooldown_and_resistance() {
        let mut state = arena();
        state.player.properties.grant_intrinsic(Property::ColdRes);
        let id = spawn(&mut state, "winter wolf cub", Position::new(9, 5));
        let attack = race_by_name("winter wolf cub")
            .map(|r| crate::monster::MONSTERS[r].attack_of(crate::combat::AttackType::Breath))
            .unwrap()
            .unwrap();
        let mut breathed = false;
        for _ in 0..20 {
            if breamu(&mut state, id, attack) {
                breathed = true;
                break;
            }
        }
        assert!(breathed);
        let cub = state.current_level.monster(id).unwrap();
        assert!(cub.spec_used >= 10);
        assert_eq!(state.player.hp, state.player.hp_max);
        // on cooldown
        assert!(!breamu(&mut state, id, attack));
    }

    #[test]
    fn test_ray_reflects_and_bounces() {
        let mut state = arena();
        state.player.properties.grant_intrinsic(Property::Reflection);
        let hp = state.player.hp;
        let ray = Ray {
            element: DamageType::Fire,
            dice: 6,
            breath: true,
        };
        buzz(&mut state, ThrowSource::Player, ray, Position::new(9, 5), (-1, 0));
        assert_eq!(state.player.hp, hp);
    }

    #[test]
    fn test_disintegration_kills_monster() {
        let mut state = arena();
        state.player.pos = Position::new(2, 9);
        let id = spawn(&mut state, "jackal", Position::new(8, 5));
        let ray = Ray {
            element: DamageType::Disintegrate,
            dice: 1,
            breath: true,
        };
        for _ in 0..20 {
            buzz(&mut state, ThrowSource::Player, ray, Position::new(5, 5), (1, 0));
            if state.current_level.monster(id).is_none() {
                break;
            }
        }
        assert!(state.current_level.monster(id).is_none());
        assert_eq!(state.player.kills, 1);
    }
}
