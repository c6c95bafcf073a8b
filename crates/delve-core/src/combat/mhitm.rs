//! Monster attacks monster (mhitm)

use bitflags::bitflags;
use tracing::debug;

use super::{Attack, AttackType, DamageType, capitalize, mondead, player_sees, roll};
use crate::GameState;
use crate::monster::{MonsterId, SpeedState, rloc};

use super::experience_for;

bitflags! {
    /// Outcome of one monster attacking another
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct MonsterFightResult: u8 {
        const HIT = 0x01;
        const DEF_DIED = 0x02;
        const AGR_DIED = 0x04;
    }
}

impl MonsterFightResult {
    pub fn hit(self) -> bool {
        self.contains(Self::HIT)
    }

    pub fn defender_died(self) -> bool {
        self.contains(Self::DEF_DIED)
    }

    pub fn attacker_died(self) -> bool {
        self.contains(Self::AGR_DIED)
    }
}

/// Run every attack of `att` against `def`
pub fn mattackm(state: &mut GameState, att: MonsterId, def: MonsterId) -> MonsterFightResult {
    let mut result = MonsterFightResult::empty();
    let (Some(a), Some(d)) = (state.current_level.monster(att), state.current_level.monster(def))
    else {
        return result;
    };
    if att == def || !a.pos.is_adjacent(d.pos) {
        return result;
    }
    let attacks = a.data().attacks;
    let def_race = d.race;
    debug!(%att, %def, "monster fight");

    for (i, attack) in attacks.iter().copied().enumerate() {
        if !attack.is_active() || attack.attack_type.is_passive() || attack.attack_type.is_ranged()
        {
            continue;
        }
        if attack.attack_type == AttackType::Engulf || attack.attack_type == AttackType::Explode {
            // only used on the player
            continue;
        }
        let (Some(a), Some(d)) = (state.current_level.monster(att), state.current_level.monster(def))
        else {
            break;
        };
        // a theft or teleport hit can separate the two
        if !a.pos.is_adjacent(d.pos) {
            break;
        }
        let mut tmp = d.ac as i32 + 10 + a.level as i32;
        let def_helpless = d.is_helpless();
        let seen = player_sees(state, a.pos) || player_sees(state, d.pos);
        let (a_name, d_name) = (capitalize(&a.the_name()), d.the_name());
        if def_helpless {
            tmp += 2;
            if let Some(d) = state.current_level.monster_mut(def) {
                d.state.sleeping = false;
            }
        }

        if tmp > state.rng.rnd(20 + i as u32) as i32 {
            result |= MonsterFightResult::HIT;
            if seen {
                state.message(format!("{} {} {}.", a_name, verb(attack.attack_type), d_name));
            }
            if hitmm(state, att, def, attack) {
                result |= MonsterFightResult::DEF_DIED;
            }
            if still_adjacent(state, att, def)
                && passivemm(state, att, def_race, true, result.defender_died())
            {
                result |= MonsterFightResult::AGR_DIED;
            }
        } else {
            if seen {
                state.message(format!("{} misses {}.", a_name, d_name));
            }
            if passivemm(state, att, def_race, false, false) {
                result |= MonsterFightResult::AGR_DIED;
            }
        }

        if result.intersects(MonsterFightResult::DEF_DIED | MonsterFightResult::AGR_DIED) {
            break;
        }
    }
    result
}

fn still_adjacent(state: &GameState, att: MonsterId, def: MonsterId) -> bool {
    let level = &state.current_level;
    match (level.monster(att), level.monster(def)) {
        (Some(a), Some(d)) => a.pos.is_adjacent(d.pos),
        // a dead defender still answers with its passive
        (Some(_), None) => true,
        _ => false,
    }
}

fn verb(attack_type: AttackType) -> &'static str {
    match attack_type {
        AttackType::Bite => "bites",
        AttackType::Kick => "kicks",
        AttackType::Butt => "butts",
        AttackType::Touch => "touches",
        AttackType::Sting => "stings",
        AttackType::Hug => "squeezes",
        AttackType::Tentacle => "grabs",
        _ => "hits",
    }
}

/// Damage and side effects of one connecting attack; true if the defender died
fn hitmm(state: &mut GameState, att: MonsterId, def: MonsterId, attack: Attack) -> bool {
    let Some(a) = state.current_level.monster(att) else {
        return false;
    };
    let cancelled = a.state.cancelled;
    let weapon = a
        .wielded()
        .filter(|_| attack.attack_type == AttackType::Weapon)
        .map(|w| (w.data().damage as u32, w.enchantment as i32));

    let mut dmg = match weapon {
        Some((sides, ench)) => (state.rng.rnd(sides.max(1)) as i32 + ench).max(1),
        None => roll(state, attack.dice_num as u32, attack.dice_sides as u32),
    };

    let resists = state
        .current_level
        .monster(def)
        .is_some_and(|d| d.resists(attack.damage_type));
    let frozen_turns = state.rng.rnd(10) as u16;
    let chance3 = state.rng.one_in(3);
    let chance8 = state.rng.one_in(8);
    let drained = roll(state, 2, 6);
    let poison = state.rng.rn1(10, 6) as i32;

    let mut stolen = 0;
    let mut teleport = false;
    {
        let Some(d) = state.current_level.monster_mut(def) else {
            return false;
        };
        if !cancelled {
            match attack.damage_type {
                DamageType::Fire
                | DamageType::Cold
                | DamageType::Electric
                | DamageType::Acid
                | DamageType::Disintegrate
                | DamageType::MagicMissile => {
                    if resists {
                        dmg = 0;
                    }
                }
                DamageType::Sleep | DamageType::Paralyze => {
                    if !resists {
                        d.set_frozen(frozen_turns);
                    }
                }
                DamageType::Confuse => d.set_confused(frozen_turns),
                DamageType::Stun => {
                    d.set_stunned(dmg.max(1) as u16);
                    dmg /= 2;
                }
                DamageType::Blind => {
                    d.set_blinded(dmg.max(1) as u16);
                    dmg = 0;
                }
                DamageType::Slow => {
                    if d.speed != SpeedState::Slow {
                        d.speed = SpeedState::Slow;
                        d.permanent_speed = SpeedState::Slow;
                    }
                }
                DamageType::DrainLife => {
                    if chance3 && !resists && d.level > 0 {
                        d.level -= 1;
                        let loss = drained.min(d.hp_max - 1).max(0);
                        d.hp_max -= loss;
                    }
                }
                DamageType::DrainStrength => {
                    if chance8 && !resists {
                        dmg += poison;
                    }
                }
                DamageType::StealGold => {
                    stolen = d.gold;
                    d.gold = 0;
                    teleport = stolen > 0;
                }
                DamageType::Teleport => teleport = true,
                _ => {}
            }
        }
    }

    if stolen > 0
        && let Some(a) = state.current_level.monster_mut(att)
    {
        a.gold += stolen;
    }
    if teleport {
        let target = if stolen > 0 { att } else { def };
        rloc(state, target);
    }

    let died = state
        .current_level
        .monster_mut(def)
        .is_some_and(|d| d.take_damage(dmg));
    if died {
        monster_killed_by_monster(state, att, def);
    }
    died
}

/// The defender's passive defence against its attacker; true if the attacker died
fn passivemm(
    state: &mut GameState,
    att: MonsterId,
    def_race: usize,
    hit: bool,
    def_died: bool,
) -> bool {
    let Some(a) = state.current_level.monster(att) else {
        return false;
    };
    let Some(passive) = crate::monster::MONSTERS[def_race].passive() else {
        return false;
    };
    let attacker_sees = a.can_see();
    let a_name = capitalize(&a.the_name());
    let seen = player_sees(state, a.pos);
    let def_level = crate::monster::MONSTERS[def_race].level as u32;

    let dmg = match passive.damage_type {
        DamageType::Acid => {
            if !hit || !state.rng.one_in(2) {
                return false;
            }
            let dmg = roll(state, passive.dice_num.max(1) as u32, passive.dice_sides as u32);
            if state.current_level.monster(att).is_some_and(|a| a.resists(DamageType::Acid)) {
                return false;
            }
            if seen {
                state.message(format!("{} is splashed by acid!", a_name));
            }
            dmg
        }
        DamageType::Paralyze => {
            if !hit || def_died || !attacker_sees {
                return false;
            }
            let turns = roll(state, def_level + 1, 70).min(127) as u16;
            if let Some(a) = state.current_level.monster_mut(att) {
                a.set_frozen(turns);
            }
            if seen {
                state.message(format!("{} is frozen by the gaze!", a_name));
            }
            0
        }
        DamageType::Cold | DamageType::Fire => {
            if def_died {
                return false;
            }
            if state.current_level.monster(att).is_some_and(|a| a.resists(passive.damage_type)) {
                return false;
            }
            let dice = if passive.dice_num == 0 {
                def_level / 2 + 1
            } else {
                passive.dice_num as u32
            };
            let dmg = roll(state, dice, passive.dice_sides.max(4) as u32);
            if seen {
                let what = if passive.damage_type == DamageType::Fire {
                    "is suddenly very hot"
                } else {
                    "is suddenly very cold"
                };
                state.message(format!("{} {}!", a_name, what));
            }
            dmg
        }
        _ => 0,
    };

    let died = state
        .current_level
        .monster_mut(att)
        .is_some_and(|a| a.take_damage(dmg));
    if died {
        if seen {
            state.message(format!("{} dies!", a_name));
        }
        mondead(state, att);
    }
    died
}

/// One monster killed another: remove the victim and let a pet grow from it
pub fn monster_killed_by_monster(state: &mut GameState, killer: MonsterId, victim: MonsterId) {
    let Some(dead) = state.current_level.monster(victim) else {
        return;
    };
    let seen = player_sees(state, dead.pos);
    let name = capitalize(&dead.the_name());
    let exp = experience_for(dead);
    if seen {
        state.message(format!("{} is killed!", name));
    }
    mondead(state, victim);

    let bonus_hp = state.rng.rnd(8) as i32;
    let Some(k) = state.current_level.monster_mut(killer) else {
        return;
    };
    if !k.state.tame {
        return;
    }
    k.exp += exp;
    if k.exp >= 20 * (k.level as u32).max(1) && k.level < 49 {
        k.level += 1;
        k.hp_max += bonus_hp;
        k.hp += bonus_hp;
        let msg = format!("{} seems more experienced.", capitalize(&k.the_name()));
        debug!(%killer, level = k.level, "pet levelled up");
        state.message(msg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GameRng;
    use crate::dungeon::{Cell, Level, Position};
    use crate::monster::{Monster, race_by_name};
    use crate::world::GameOptions;

    fn arena() -> GameState {
        let options = GameOptions {
            pet: false,
            ..Default::default()
        };
        let mut state = GameState::new(GameRng::new(11), options).unwrap();
        let mut level = Level::new(1);
        for x in 1..20 {
            for y in 1..10 {
                level.cells[x][y] = Cell::floor();
            }
        }
        state.current_level = level;
        state.player.pos = Position::new(2, 2);
        state
    }

    fn spawn(state: &mut GameState, name: &str, pos: Position, hp: i32) -> MonsterId {
        let mut mon = Monster::new(MonsterId::NONE, race_by_name(name).unwrap(), pos);
        mon.hp = hp;
        mon.hp_max = hp;
        state.current_level.add_monster(mon)
    }

    #[test]
    fn test_not_adjacent_means_no_fight() {
        let mut state = arena();
        let a = spawn(&mut state, "jackal", Position::new(5, 5), 10);
        let b = spawn(&mut state, "newt", Position::new(8, 5), 10);
        assert!(mattackm(&mut state, a, b).is_empty());
    }

    #[test]
    fn test_fight_to_the_death() {
        let mut state = arena();
        let a = spawn(&mut state, "wolf", Position::new(5, 5), 50);
        let b = spawn(&mut state, "newt", Position::new(6, 5), 3);
        let mut result = MonsterFightResult::empty();
        for _ in 0..100 {
            result = mattackm(&mut state, a, b);
            if result.defender_died() {
                break;
            }
        }
        assert!(result.defender_died());
        assert!(state.current_level.monster(b).is_none());
        assert!(state.current_level.monster_id_at(Position::new(6, 5)).is_none());
        assert!(
            state
                .current_level
                .check_invariants(state.player.pos, None)
                .is_empty()
        );
    }

    #[test]
    fn test_pet_gains_experience() {
        let mut state = arena();
        let a = spawn(&mut state, "little dog", Position::new(5, 5), 50);
        state.current_level.monster_mut(a).unwrap().state.tame = true;
        let b = spawn(&mut state, "newt", Position::new(6, 5), 1);
        monster_killed_by_monster(&mut state, a, b);
        assert!(state.current_level.monster(b).is_none());
        assert!(state.current_level.monster(a).unwrap().exp > 0);
    }

    #[test]
    fn test_floating_eye_freezes_attacker() {
        let mut state = arena();
        let a = spawn(&mut state, "jackal", Position::new(5, 5), 50);
        let b = spawn(&mut state, "floating eye", Position::new(6, 5), 500);
        for _ in 0..20 {
            mattackm(&mut state, a, b);
            if state.current_level.monster(a).is_some_and(|m| m.state.frozen) {
                break;
            }
        }
        assert!(state.current_level.monster(a).unwrap().state.frozen);
    }

    #[test]
    fn test_no_passive_after_thief_teleports_away() {
        let mut teleported = 0;
        for seed in 0..60 {
            let mut state = arena();
            state.rng = GameRng::new(seed);
            let thief = spawn(&mut state, "leprechaun", Position::new(5, 5), 50);
            let blob = spawn(&mut state, "acid blob", Position::new(6, 5), 30);
            if let Some(b) = state.current_level.monster_mut(blob) {
                b.gold = 40;
            }
            let result = mattackm(&mut state, thief, blob);
            let t = state.current_level.monster(thief).unwrap();
            if result.contains(MonsterFightResult::HIT) && !t.pos.is_adjacent(Position::new(6, 5)) {
                teleported += 1;
                assert!(t.gold >= 40);
                assert_eq!(t.hp, 50, "seed {seed}");
            }
        }
        assert!(teleported > 0);
    }
}
