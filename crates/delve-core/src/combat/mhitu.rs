//! Monster attacks player (mhitu)
//!
//! `mattacku` runs a monster's whole attack set against the player. While
//! the player is engulfed only the engulf attack applies.

use tracing::{debug, warn};

use super::{Attack, AttackType, DamageType, an, mondead, player_sees, roll};
use crate::GameState;
use crate::action::tele;
use crate::consts::NATTK;
use crate::monster::{MonsterId, castmu, rloc};
use crate::player::{Attribute, Property, losexp};

/// Result of a full monster attack sequence
#[derive(Debug, Clone, Default)]
pub struct MonsterAttackResult {
    /// Whether any attack connected
    pub any_hit: bool,
    pub player_died: bool,
    /// The monster died during its own attack (explosion)
    pub monster_died: bool,
    pub total_damage: i32,
    pub messages: Vec<String>,
}

impl MonsterAttackResult {
    fn say(&mut self, state: &mut GameState, msg: impl Into<String>) {
        let msg = msg.into();
        state.message(msg.clone());
        self.messages.push(msg);
    }
}

/// Hit message by attack type (hitmsg)
pub fn hit_message(attacker_name: &str, attack_type: AttackType) -> String {
    match attack_type {
        AttackType::Bite => format!("The {} bites!", attacker_name),
        AttackType::Kick => format!("The {} kicks!", attacker_name),
        AttackType::Sting => format!("The {} stings!", attacker_name),
        AttackType::Butt => format!("The {} butts!", attacker_name),
        AttackType::Touch => format!("The {} touches you!", attacker_name),
        AttackType::Tentacle => format!("The {}'s tentacles suck you!", attacker_name),
        AttackType::Hug => format!("The {} squeezes you!", attacker_name),
        _ => format!("The {} hits!", attacker_name),
    }
}

/// Miss message (missmu)
pub fn miss_message(attacker_name: &str, near_miss: bool) -> String {
    if near_miss {
        format!("The {} just misses!", attacker_name)
    } else {
        format!("The {} misses.", attacker_name)
    }
}

/// Armor class as it counts against a to-hit roll (AC_VALUE)
fn ac_value(ac: i8, state: &mut GameState) -> i32 {
    if ac >= 0 {
        ac as i32
    } else {
        -(state.rng.rnd((-(ac as i32)) as u32) as i32)
    }
}

/// Run every attack of monster `id` against the player
pub fn mattacku(state: &mut GameState, id: MonsterId) -> MonsterAttackResult {
    let mut result = MonsterAttackResult::default();
    let Some(mon) = state.current_level.monster(id) else {
        return result;
    };
    let data = mon.data();

    if state.player.swallowed_by == Some(id) {
        if let Some(attack) = data.attack_of(AttackType::Engulf) {
            gulpmu(state, id, attack, &mut result);
        }
        return result;
    }
    if state.player.is_engulfed() || !mon.pos.is_adjacent(state.player.pos) {
        return result;
    }
    debug!(%id, name = %mon.name, "attacks player");

    let mut hits = [false; NATTK];
    for (i, attack) in data.attacks.iter().copied().enumerate() {
        if !attack.is_active() || attack.attack_type.is_passive() {
            continue;
        }
        let Some(mon) = state.current_level.monster(id) else {
            break;
        };
        let name = mon.name.clone();
        let stuck_here = state.player.stuck_to == Some(id);

        match attack.attack_type {
            AttackType::Claw
            | AttackType::Bite
            | AttackType::Kick
            | AttackType::Butt
            | AttackType::Touch
            | AttackType::Sting
            | AttackType::Tentacle
            | AttackType::Weapon => {
                if attack_hits(state, id, i) {
                    hits[i] = true;
                    hitmu(state, id, attack, &mut result);
                } else {
                    let near = state.rng.one_in(2);
                    result.say(state, miss_message(&name, near));
                }
            }
            AttackType::Hug => {
                let crushing = i >= 2 && hits[i - 1] && hits[i - 2];
                if crushing || stuck_here {
                    hits[i] = true;
                    hitmu(state, id, attack, &mut result);
                }
            }
            AttackType::Engulf => {
                if attack_hits(state, id, i) {
                    engulf_player(state, id, &mut result);
                    gulpmu(state, id, attack, &mut result);
                    break;
                }
                let near = state.rng.one_in(2);
                result.say(state, miss_message(&name, near));
            }
            AttackType::Explode => {
                explmu(state, id, attack, &mut result);
                break;
            }
            AttackType::Gaze => {
                if gazemu(state, id, attack, &mut result) {
                    hits[i] = true;
                }
            }
            AttackType::Magic => {
                if castmu(state, id, &attack, true, true).succeeded() {
                    hits[i] = true;
                    result.any_hit = true;
                }
            }
            // Only used at range
            AttackType::Breath | AttackType::Spit => {}
            AttackType::None | AttackType::Passive | AttackType::Boom => {}
        }

        if state.player.is_dead() {
            result.player_died = true;
            break;
        }
        if state.current_level.monster(id).is_none() {
            result.monster_died = true;
            break;
        }
    }
    result.player_died = state.player.is_dead();
    result
}

/// To-hit roll for the `i`th attack of a monster
fn attack_hits(state: &mut GameState, id: MonsterId, i: usize) -> bool {
    let Some(mon) = state.current_level.monster(id) else {
        return false;
    };
    let level = mon.level as i32;
    let impaired = mon.state.blinded || mon.state.confused;
    let misjudged = state.player.has(Property::Invisible) && !mon.data().sees_invisible();
    let trapped = mon.state.trapped;

    let mut tmp = ac_value(state.player.armor_class, state) + 10 + level;
    if state.player.is_helpless() {
        tmp += 2;
    }
    if impaired {
        tmp -= 3;
    }
    if misjudged {
        tmp -= 2;
    }
    if trapped {
        tmp -= 2;
    }
    tmp.max(1) > state.rng.rnd(20 + i as u32) as i32
}

/// Damage roll for a connecting attack; weapons use the wielded object
fn attack_damage(state: &mut GameState, id: MonsterId, attack: Attack) -> i32 {
    let weapon = state
        .current_level
        .monster(id)
        .and_then(|m| m.wielded())
        .map(|w| (w.data().damage as u32, w.enchantment as i32));
    match (attack.attack_type, weapon) {
        (AttackType::Weapon, Some((sides, ench))) => {
            (state.rng.rnd(sides.max(1)) as i32 + ench).max(1)
        }
        _ => roll(state, attack.dice_num as u32, attack.dice_sides as u32),
    }
}

/// Apply one connecting attack and its damage type (hitmu)
fn hitmu(state: &mut GameState, id: MonsterId, attack: Attack, result: &mut MonsterAttackResult) {
    let Some(mon) = state.current_level.monster(id) else {
        return;
    };
    let name = mon.name.clone();
    let uncancelled = !mon.state.cancelled;
    result.any_hit = true;

    let mut dmg = attack_damage(state, id, attack);
    if attack.attack_type == AttackType::Weapon
        && let Some(weapon) = state.current_level.monster(id).and_then(|m| m.wielded())
    {
        let msg = format!("The {} swings its {}.", name, weapon.xname());
        result.say(state, msg);
    }
    result.say(state, hit_message(&name, attack.attack_type));

    match attack.damage_type {
        DamageType::Physical | DamageType::MageSpell | DamageType::ClericSpell => {}
        DamageType::Fire => {
            if uncancelled {
                result.say(state, "You're on fire!");
                if state.player.has(Property::FireRes) {
                    result.say(state, "The fire doesn't feel hot!");
                    dmg = 0;
                }
            } else {
                dmg = 0;
            }
        }
        DamageType::Cold => {
            if uncancelled {
                result.say(state, "You're covered in frost!");
                if state.player.has(Property::ColdRes) {
                    result.say(state, "The frost doesn't seem cold!");
                    dmg = 0;
                }
            } else {
                dmg = 0;
            }
        }
        DamageType::Electric => {
            if uncancelled {
                result.say(state, "You get zapped!");
                if state.player.has(Property::ShockRes) {
                    result.say(state, "The zap doesn't shock you!");
                    dmg = 0;
                }
            } else {
                dmg = 0;
            }
        }
        DamageType::Acid => {
            if state.player.has(Property::AcidRes) {
                result.say(state, "You're covered in acid, but it seems harmless.");
                dmg = 0;
            } else {
                result.say(state, "You're covered in acid! It burns!");
            }
        }
        DamageType::MagicMissile | DamageType::Disintegrate => {
            if let Some(prop) = attack.damage_type.player_resistance()
                && state.player.has(prop)
            {
                dmg = 0;
            }
        }
        DamageType::DrainStrength => {
            if uncancelled && state.rng.one_in(8) {
                if state.player.has(Property::PoisonRes) {
                    result.say(state, "The poison doesn't seem to affect you.");
                } else if state.rng.one_in(2) {
                    result.say(state, format!("The {}'s sting was poisoned!", name));
                    state.adjust_attribute(Attribute::Strength, -1);
                } else {
                    result.say(state, "You feel very sick!");
                    dmg += state.rng.rnd(6) as i32;
                }
            }
        }
        DamageType::Sleep => {
            if uncancelled && !state.player.is_helpless() && state.rng.one_in(5) {
                if state.player.has(Property::SleepRes) {
                    result.say(state, "You yawn.");
                } else {
                    let turns = state.rng.rnd(10);
                    state.player.make_helpless(Property::Asleep, turns);
                    result.say(state, format!("You are put to sleep by the {}!", name));
                }
            }
        }
        DamageType::Paralyze => {
            if uncancelled && !state.player.is_helpless() && state.rng.one_in(3) {
                let turns = state.rng.rnd(10);
                if state.player.make_helpless(Property::Paralyzed, turns) {
                    result.say(state, format!("You are frozen by the {}!", name));
                } else {
                    result.say(state, "You momentarily stiffen.");
                }
            }
        }
        DamageType::Confuse => {
            if uncancelled && state.rng.one_in(4) {
                let msg = if state.player.is_confused() {
                    "You are getting even more confused."
                } else {
                    "You are getting confused."
                };
                result.say(state, msg);
                state
                    .player
                    .properties
                    .incr_timeout(Property::Confusion, dmg.max(1) as u32);
            }
        }
        DamageType::Stun => {
            if uncancelled {
                result.say(state, "You stagger...");
                state
                    .player
                    .properties
                    .incr_timeout(Property::Stunned, dmg.max(1) as u32);
                dmg /= 2;
            }
        }
        DamageType::Blind => {
            if uncancelled && !state.player.is_blind() {
                result.say(state, format!("The {} blinds you!", name));
                state
                    .player
                    .properties
                    .incr_timeout(Property::Blinded, dmg.max(1) as u32);
            }
            dmg = 0;
        }
        DamageType::Slow => {
            if uncancelled && state.player.properties.has_intrinsic(Property::Fast) && state.rng.one_in(4)
            {
                state.player.properties.remove_intrinsic(Property::Fast);
                result.say(state, "You feel yourself slowing down.");
            }
        }
        DamageType::DrainLife => {
            if uncancelled && state.rng.one_in(3) && !state.player.has(Property::DrainRes) {
                result.say(state, "Goodbye level.");
                if losexp(&mut state.player, &mut state.rng) {
                    state.die("killed by life drainage");
                }
            }
        }
        DamageType::Stick => {
            if uncancelled && state.player.stuck_to.is_none() {
                state.player.stuck_to = Some(id);
            }
        }
        DamageType::StealGold => {
            if uncancelled && state.player.gold > 0 {
                steal_gold(state, id, result);
            }
        }
        DamageType::Teleport => {
            if uncancelled {
                result.say(state, "Your position suddenly seems very uncertain!");
                tele(state);
            }
        }
        DamageType::Digest => {}
    }

    apply_damage(state, id, dmg, result);
}

/// Deal damage to the player from monster `id`, recording a death
fn apply_damage(state: &mut GameState, id: MonsterId, dmg: i32, result: &mut MonsterAttackResult) {
    if dmg <= 0 {
        return;
    }
    result.total_damage += dmg;
    if state.player.take_damage(dmg) {
        let killer = state
            .current_level
            .monster(id)
            .map(|m| format!("killed by {}", an(&m.name)))
            .unwrap_or_else(|| String::from("killed by a monster"));
        result.say(state, "You die...");
        state.die(killer);
        result.player_died = true;
    }
}

/// How much of the purse a thief takes (somegold)
fn somegold(gold: u32, state: &mut GameState) -> u32 {
    if gold < 50 {
        gold
    } else if gold < 100 {
        state.rng.rn1(gold - 24, 25)
    } else if gold < 500 {
        state.rng.rn1(gold - 49, 50)
    } else if gold < 1000 {
        state.rng.rn1(gold - 99, 100)
    } else {
        state.rng.rn1(gold - 499, 500)
    }
}

/// The leprechaun's trick: grab some gold and vanish (stealgold)
fn steal_gold(state: &mut GameState, id: MonsterId, result: &mut MonsterAttackResult) {
    let amount = somegold(state.player.gold, state).min(state.player.gold);
    state.player.gold -= amount;
    let Some(mon) = state.current_level.monster_mut(id) else {
        return;
    };
    mon.gold += amount;
    result.say(state, "Your purse feels lighter.");
    if state.player.stuck_to == Some(id) {
        state.player.stuck_to = None;
    }
    if !rloc(state, id)
        && let Some(mon) = state.current_level.monster_mut(id)
    {
        mon.monflee(0, false);
    }
}

/// Swallow the player whole (gulpmu, first contact)
fn engulf_player(state: &mut GameState, id: MonsterId, result: &mut MonsterAttackResult) {
    let player_pos = state.player.pos;
    let Some(mon) = state.current_level.monster(id) else {
        return;
    };
    let name = mon.name.clone();
    let level = mon.level as i32;

    state.player.stuck_to = None;
    state.player.utrap = 0;
    if !state.current_level.move_monster(id, player_pos) {
        warn!(%id, "engulfer could not reach the player's cell");
        return;
    }

    let mut tim = 25 - level;
    if tim > 0 {
        tim = state.rng.rnd(tim as u32) as i32 / 2;
    } else if tim < 0 {
        tim = -(state.rng.rnd((-tim) as u32) as i32 / 2);
    }
    tim += 10 - state.player.armor_class as i32;
    if let Some(mon) = state.current_level.monster_mut(id) {
        mon.engulf_timer = tim.clamp(2, u16::MAX as i32) as u16;
    }
    state.player.swallowed_by = Some(id);
    result.any_hit = true;
    result.say(state, format!("The {} engulfs you!", name));
}

/// One turn inside an engulfer: interior damage and the countdown
fn gulpmu(state: &mut GameState, id: MonsterId, attack: Attack, result: &mut MonsterAttackResult) {
    let Some(mon) = state.current_level.monster_mut(id) else {
        return;
    };
    let name = mon.name.clone();
    mon.engulf_timer = mon.engulf_timer.saturating_sub(1);
    let expired = mon.engulf_timer == 0;

    let mut dmg = roll(state, attack.dice_num as u32, attack.dice_sides as u32);
    match attack.damage_type {
        DamageType::Blind => {
            if !state.player.is_blind() {
                result.say(state, "You can't see in here!");
                state
                    .player
                    .properties
                    .incr_timeout(Property::Blinded, dmg.max(1) as u32);
            }
            dmg = 0;
        }
        DamageType::Physical => {
            result.say(state, format!("You are pummeled inside the {}!", name));
        }
        other => {
            if let Some(prop) = other.player_resistance()
                && state.player.has(prop)
            {
                result.say(state, "You seem unhurt.");
                dmg = 0;
            } else {
                result.say(state, format!("You are engulfed in {}!", other.element_name()));
            }
        }
    }
    if dmg > 0 {
        result.any_hit = true;
    }
    apply_damage(state, id, dmg, result);

    if expired && !state.player.is_dead() {
        expel_player(state, id);
        result.messages.push(String::from("You get expelled!"));
    }
}

/// Release an engulfed player; the engulfer steps off to a free cell
pub fn expel_player(state: &mut GameState, id: MonsterId) {
    if state.player.swallowed_by != Some(id) {
        return;
    }
    state.player.swallowed_by = None;
    let here = state.player.pos;
    match state.current_level.enexto(here, Some(here), &mut state.rng) {
        Some(to) => {
            state.current_level.move_monster(id, to);
            let name = state
                .current_level
                .monster(id)
                .map(|m| m.the_name())
                .unwrap_or_default();
            state.message(format!("You get expelled from {}!", name));
        }
        None => {
            warn!(%id, "no room to expel the player; removing engulfer");
            mondead(state, id);
        }
    }
}

/// A monster blowing itself up next to the player (explmu)
fn explmu(state: &mut GameState, id: MonsterId, attack: Attack, result: &mut MonsterAttackResult) {
    let Some(mon) = state.current_level.monster(id) else {
        return;
    };
    if mon.state.cancelled {
        return;
    }
    let name = mon.name.clone();
    result.say(state, format!("The {} explodes!", name));

    let dmg = roll(state, attack.dice_num as u32, attack.dice_sides as u32);
    match attack.damage_type {
        DamageType::Blind => {
            if !state.player.is_blind() {
                result.say(state, "You are blinded by a blast of light!");
                state
                    .player
                    .properties
                    .incr_timeout(Property::Blinded, dmg.max(1) as u32);
            }
            result.any_hit = true;
        }
        other => {
            let resisted = other
                .player_resistance()
                .is_some_and(|prop| state.player.has(prop));
            if resisted {
                result.say(state, "You seem unaffected by it.");
            } else {
                result.any_hit = true;
                apply_damage(state, id, dmg, result);
            }
        }
    }

    // used up; nobody gets experience for it
    mondead(state, id);
    result.monster_died = true;
}

/// A gaze attack; needs the player to see the gazer (gazemu)
fn gazemu(
    state: &mut GameState,
    id: MonsterId,
    attack: Attack,
    result: &mut MonsterAttackResult,
) -> bool {
    let Some(mon) = state.current_level.monster(id) else {
        return false;
    };
    let name = mon.name.clone();
    let visible = !mon.state.invisible || state.player.has(Property::SeeInvisible);
    if mon.state.cancelled || !mon.can_see() || !visible || state.player.is_blind() {
        return false;
    }
    if mon.spec_used > 0 || state.rng.one_in(5) {
        return false;
    }

    if state.player.has(Property::Reflection) {
        result.say(state, format!("The {}'s gaze is reflected away!", name));
        if let Some(mon) = state.current_level.monster_mut(id) {
            match attack.damage_type {
                DamageType::Paralyze => mon.set_frozen(10),
                DamageType::Confuse => mon.set_confused(10),
                DamageType::Stun => mon.set_stunned(10),
                _ => {}
            }
        }
        return false;
    }

    let dmg = roll(state, attack.dice_num.max(1) as u32, attack.dice_sides.max(4) as u32);
    match attack.damage_type {
        DamageType::Paralyze => {
            if state.player.make_helpless(Property::Paralyzed, dmg.max(1) as u32) {
                result.say(state, format!("You are frozen by the {}'s gaze!", name));
            } else {
                result.say(state, format!("You stiffen momentarily under the {}'s gaze.", name));
            }
        }
        DamageType::Confuse => {
            result.say(state, format!("The {} gazes at you. You are getting confused.", name));
            state.player.properties.incr_timeout(Property::Confusion, dmg.max(1) as u32);
        }
        DamageType::Stun => {
            result.say(state, format!("The {} stares piercingly at you! You stagger.", name));
            state.player.properties.incr_timeout(Property::Stunned, dmg.max(1) as u32);
        }
        DamageType::Blind => {
            result.say(state, format!("You are blinded by the {}'s radiance!", name));
            state.player.properties.incr_timeout(Property::Blinded, dmg.max(1) as u32);
        }
        DamageType::Fire => {
            result.say(state, format!("The {} attacks you with a fiery gaze!", name));
            if state.player.has(Property::FireRes) {
                result.say(state, "The fire doesn't feel hot!");
            } else {
                apply_damage(state, id, dmg, result);
            }
        }
        _ => return false,
    }
    if let Some(mon) = state.current_level.monster_mut(id) {
        mon.spec_used = mon.spec_used.saturating_add(state.rng.rn1(6, 2) as u16);
    }
    result.any_hit = true;
    true
}
