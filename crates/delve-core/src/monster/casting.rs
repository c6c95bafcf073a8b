//! Monster spellcasting (mcastu)
//!
//! Mage and cleric casters pick a spell from their level, screen out picks
//! that would do nothing, then apply the effect to the player. Ray-type magic
//! attacks go through [`buzzmu`] instead.

use tracing::debug;

use super::{
    MONSTERS, MakeMonFlags, MonsterId, SpawnContext, SpeedState, makemon, rndmonst,
};
use crate::combat::{Attack, DamageType, Ray, ThrowSource, an, buzz, lined_up, player_sees};
use crate::object::{BucStatus, ObjectClass, WornMask};
use crate::player::{Attribute, Property};
use crate::{GameRng, GameState};

/// Spells of mage casters (AD_SPEL)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MageSpell {
    PsiBolt,
    CureSelf,
    HasteSelf,
    StunYou,
    Disappear,
    WeakenYou,
    DestroyArmor,
    CurseItems,
    Aggravation,
    SummonMons,
    DeathTouch,
}

/// Spells of cleric casters (AD_CLRC)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClericSpell {
    OpenWounds,
    CureSelf,
    ConfuseYou,
    Paralyze,
    BlindYou,
    Insects,
    CurseItems,
    Lightning,
    FirePillar,
    Geyser,
}

/// A picked spell of either school
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Spell {
    Mage(MageSpell),
    Cleric(ClericSpell),
}

impl Spell {
    /// Spells that need no idea where the player is
    pub fn is_undirected(self) -> bool {
        match self {
            Spell::Mage(s) => matches!(
                s,
                MageSpell::SummonMons
                    | MageSpell::Aggravation
                    | MageSpell::Disappear
                    | MageSpell::HasteSelf
                    | MageSpell::CureSelf
            ),
            Spell::Cleric(s) => matches!(s, ClericSpell::Insects | ClericSpell::CureSelf),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastResult {
    Success,
    /// Cancelled, cooling down, fumbled or aimed at nothing
    Failed,
}

impl CastResult {
    pub fn succeeded(self) -> bool {
        self == CastResult::Success
    }
}

/// Mage spell for a level roll (choose_magic_spell)
pub fn choose_magic_spell(mut spellval: u32, rng: &mut GameRng) -> MageSpell {
    while spellval > 24 && rng.rn2(25) != 0 {
        spellval = rng.rn2(spellval);
    }
    match spellval {
        20.. => MageSpell::DeathTouch,
        15..=19 => MageSpell::SummonMons,
        13..=14 => MageSpell::Aggravation,
        10..=12 => MageSpell::CurseItems,
        8..=9 => MageSpell::DestroyArmor,
        6..=7 => MageSpell::WeakenYou,
        4..=5 => MageSpell::Disappear,
        3 => MageSpell::StunYou,
        2 => MageSpell::HasteSelf,
        1 => MageSpell::CureSelf,
        0 => MageSpell::PsiBolt,
    }
}

/// Cleric spell for a level roll (choose_clerical_spell)
pub fn choose_clerical_spell(mut spellnum: u32, rng: &mut GameRng) -> ClericSpell {
    while spellnum > 15 && rng.rn2(16) != 0 {
        spellnum = rng.rn2(spellnum);
    }
    match spellnum {
        14.. if rng.rn2(3) != 0 => ClericSpell::OpenWounds,
        13.. => ClericSpell::Geyser,
        12 => ClericSpell::FirePillar,
        11 => ClericSpell::Lightning,
        9..=10 => ClericSpell::CurseItems,
        8 => ClericSpell::Insects,
        6..=7 => ClericSpell::BlindYou,
        4..=5 => ClericSpell::Paralyze,
        2..=3 => ClericSpell::ConfuseYou,
        1 => ClericSpell::CureSelf,
        0 => ClericSpell::OpenWounds,
    }
}

/// What the useless-spell screen needs to know about a caster
#[derive(Debug, Clone, Copy)]
struct Caster {
    level: u8,
    peaceful: bool,
    invisible: bool,
    confused: bool,
    cancelled: bool,
    spec_used: u16,
    wounded: bool,
    fast: bool,
}

/// Picks that would accomplish nothing (spell_would_be_useless)
fn would_be_useless(
    caster: &Caster,
    spell: Spell,
    player_blind: bool,
    rng: &mut GameRng,
) -> bool {
    match spell {
        Spell::Mage(MageSpell::Aggravation | MageSpell::SummonMons) if caster.peaceful => true,
        Spell::Mage(MageSpell::Disappear) => caster.peaceful || caster.invisible,
        Spell::Mage(MageSpell::HasteSelf) => caster.fast,
        Spell::Mage(MageSpell::CureSelf) | Spell::Cleric(ClericSpell::CureSelf) => !caster.wounded,
        // only worth it now and then when nothing is asleep
        Spell::Mage(MageSpell::Aggravation) => rng.rn2(100) != 0,
        Spell::Cleric(ClericSpell::Insects) => caster.peaceful,
        Spell::Cleric(ClericSpell::BlindYou) => player_blind,
        _ => false,
    }
}

/// Roll spells until one is worth casting, giving up after 40 tries
fn select_spell(
    caster: &Caster,
    mage: bool,
    thinks_it_foundyou: bool,
    player_blind: bool,
    rng: &mut GameRng,
) -> Option<Spell> {
    for _ in 0..40 {
        let roll = rng.rn2(caster.level as u32);
        let spell = if mage {
            Spell::Mage(choose_magic_spell(roll, rng))
        } else {
            Spell::Cleric(choose_clerical_spell(roll, rng))
        };
        if !thinks_it_foundyou {
            // blind casting is only good for undirected spells; one pick only
            if spell.is_undirected() && !would_be_useless(caster, spell, player_blind, rng) {
                return Some(spell);
            }
            return None;
        }
        if !would_be_useless(caster, spell, player_blind, rng) {
            return Some(spell);
        }
    }
    None
}

fn cursetxt(state: &mut GameState, name: &str, undirected: bool) {
    if undirected {
        state.message(format!("The {} points all around, then curses.", name));
    } else {
        state.message(format!("The {} points at you, then curses.", name));
    }
}

/// Damage the player from a spell, recording the caster as killer
fn spell_damage(state: &mut GameState, name: &str, dmg: i32) {
    if dmg > 0 && state.player.take_damage(dmg) {
        state.die(format!("killed by {}", an(name)));
    }
}

/// A monster casts at the player (castmu). `thinks_it_foundyou` is whether
/// the caster is aiming at the player; `foundyou` whether it is right.
pub fn castmu(
    state: &mut GameState,
    id: MonsterId,
    attack: &Attack,
    thinks_it_foundyou: bool,
    foundyou: bool,
) -> CastResult {
    let Some(mon) = state.current_level.monster(id) else {
        return CastResult::Failed;
    };
    let caster = Caster {
        level: mon.level,
        peaceful: mon.state.peaceful,
        invisible: mon.state.invisible,
        confused: mon.state.confused,
        cancelled: mon.state.cancelled,
        spec_used: mon.spec_used,
        wounded: mon.hp < mon.hp_max,
        fast: mon.permanent_speed == SpeedState::Fast,
    };
    let name = mon.name.clone();
    let ml = caster.level as u32;

    let spell = match attack.damage_type {
        DamageType::MageSpell | DamageType::ClericSpell if ml > 0 => {
            let mage = attack.damage_type == DamageType::MageSpell;
            let blind = state.player.is_blind();
            match select_spell(&caster, mage, thinks_it_foundyou, blind, &mut state.rng) {
                Some(spell) => Some(spell),
                None => return CastResult::Failed,
            }
        }
        _ => None,
    };
    let undirected = spell.is_some_and(Spell::is_undirected);

    if caster.cancelled || caster.spec_used > 0 || ml == 0 {
        cursetxt(state, &name, undirected);
        return CastResult::Failed;
    }
    if let Some(mon) = state.current_level.monster_mut(id) {
        mon.spec_used = 10u16.saturating_sub(ml as u16).max(2);
    }

    if !foundyou && thinks_it_foundyou && !undirected {
        state.message(format!("The {} casts a spell at thin air!", name));
        return CastResult::Failed;
    }

    let fumble = if caster.confused { 100 } else { 20 };
    if state.rng.rn2(ml * 10) < fumble {
        state.message(format!("The air crackles around the {}.", name));
        return CastResult::Failed;
    }

    if undirected {
        state.message(format!("The {} casts a spell!", name));
    } else {
        state.message(format!("The {} casts a spell at you!", name));
    }
    debug!(%id, ?spell, "monster casts");

    let dmg = if !foundyou {
        0
    } else if attack.dice_sides > 0 {
        state
            .rng
            .dice(ml / 2 + attack.dice_num as u32, attack.dice_sides as u32) as i32
    } else {
        state.rng.dice(ml / 2 + 1, 6) as i32
    };

    match spell {
        Some(Spell::Mage(s)) => cast_mage_spell(state, id, &name, dmg, s),
        Some(Spell::Cleric(s)) => cast_cleric_spell(state, id, &name, dmg, s),
        None => match attack.damage_type {
            DamageType::Fire => {
                state.message("You're enveloped in flames.");
                if state.player.has(Property::FireRes) {
                    state.message("But you resist the effects.");
                } else {
                    spell_damage(state, &name, dmg);
                }
            }
            DamageType::Cold => {
                state.message("You're covered in frost.");
                if state.player.has(Property::ColdRes) {
                    state.message("But you resist the effects.");
                } else {
                    spell_damage(state, &name, dmg);
                }
            }
            _ => {
                state.message("You are hit by a shower of missiles!");
                if state.player.has(Property::MagicResistance) {
                    state.message("The missiles bounce off!");
                } else {
                    spell_damage(state, &name, dmg);
                }
            }
        },
    }
    CastResult::Success
}

/// Heal a caster by 3d6 (m_cure_self)
fn cure_self(state: &mut GameState, id: MonsterId, name: &str) {
    let heal = state.rng.dice(3, 6) as i32;
    if let Some(mon) = state.current_level.monster_mut(id)
        && mon.hp < mon.hp_max
    {
        mon.heal(heal);
        let visible = !mon.state.invisible;
        if visible {
            state.message(format!("The {} looks better.", name));
        }
    }
}

/// Curse a handful of carried items (rndcurse)
fn curse_items(state: &mut GameState) {
    state.message("You feel as if you need some help.");
    if state.inventory.is_empty() {
        return;
    }
    let tries = if state.player.has(Property::MagicResistance) {
        state.rng.rnd(3)
    } else {
        state.rng.rnd(6)
    };
    for _ in 0..tries {
        let i = state.rng.rn2(state.inventory.len() as u32) as usize;
        let obj = &mut state.inventory[i];
        if obj.class() == ObjectClass::Coin {
            continue;
        }
        obj.buc = match obj.buc {
            BucStatus::Blessed => BucStatus::Uncursed,
            _ => BucStatus::Cursed,
        };
    }
}

/// Destroy one worn piece, outermost first (destroy_arm)
fn destroy_armor(state: &mut GameState) {
    let order = [
        WornMask::CLOAK,
        WornMask::ARMOR,
        WornMask::HELM,
        WornMask::GLOVES,
        WornMask::BOOTS,
        WornMask::SHIELD,
    ];
    let Some(i) = order
        .iter()
        .find_map(|slot| state.inventory.iter().position(|o| o.worn.intersects(*slot)))
    else {
        state.message("Your skin itches.");
        return;
    };
    let obj = state.inventory.remove(i);
    state.message(format!("Your {} crumbles and turns to dust!", obj.xname()));
    state.recalc();
}

/// Create hostile monsters around the player; returns how many arrived
fn summon_near_player(state: &mut GameState, races: &[usize], count: u32) -> u32 {
    let ctx = SpawnContext::from_player(&state.player);
    let mut made = 0;
    for _ in 0..count {
        let Some(&race) = state.rng.choose(races) else {
            break;
        };
        let Some(pos) =
            state
                .current_level
                .enexto(state.player.pos, Some(state.player.pos), &mut state.rng)
        else {
            break;
        };
        if makemon(
            &mut state.current_level,
            race,
            pos,
            &ctx,
            MakeMonFlags::HOSTILE,
            &mut state.rng,
        )
        .is_some()
        {
            made += 1;
        }
    }
    made
}

fn cast_mage_spell(state: &mut GameState, id: MonsterId, name: &str, dmg: i32, spell: MageSpell) {
    let ml = state.current_level.monster(id).map_or(1, |m| m.level as u32);
    let has_mr = state.player.has(Property::MagicResistance);

    match spell {
        MageSpell::DeathTouch => {
            state.message(format!("Oh no, the {}'s using the touch of death!", name));
            if !has_mr && state.rng.rn2(ml) > 12 {
                state.die("killed by the touch of death");
            } else {
                state.message("Lucky for you, it didn't work!");
            }
        }
        MageSpell::SummonMons => {
            let depth = state.current_level.depth;
            let ulevel = state.player.exp_level;
            let count = (ulevel as u32 / 3).max(1);
            let races: Vec<usize> = (0..count)
                .filter_map(|_| rndmonst(depth, ulevel, &mut state.rng))
                .collect();
            let made = summon_near_player(state, &races, races.len() as u32);
            match made {
                0 => {}
                1 => state.message("A monster appears from nowhere!"),
                _ => state.message("Monsters appear from nowhere!"),
            }
        }
        MageSpell::Aggravation => {
            state.message("You feel that monsters are aware of your presence.");
            for mon in &mut state.current_level.monsters {
                mon.state.sleeping = false;
                if mon.state.frozen && mon.frozen_timeout == 0 {
                    mon.state.frozen = false;
                }
            }
        }
        MageSpell::CurseItems => curse_items(state),
        MageSpell::DestroyArmor => {
            if has_mr {
                state.message("A field of force surrounds you!");
            } else {
                destroy_armor(state);
            }
        }
        MageSpell::WeakenYou => {
            if has_mr {
                state.message("You feel momentarily weakened.");
            } else {
                state.message("You suddenly feel weaker!");
                let loss = state.rng.rnd(ml.saturating_sub(6).max(1)) as i8;
                state.adjust_attribute(Attribute::Strength, -loss);
            }
        }
        MageSpell::Disappear => {
            if let Some(mon) = state.current_level.monster_mut(id)
                && !mon.state.invisible
            {
                mon.state.invisible = true;
                if !state.player.has(Property::SeeInvisible) {
                    state.message(format!("The {} suddenly disappears!", name));
                }
            }
        }
        MageSpell::StunYou => {
            if has_mr || state.player.has(Property::FreeAction) {
                if !state.player.is_stunned() {
                    state.message("You feel momentarily disoriented.");
                }
                state.player.properties.incr_timeout(Property::Stunned, 1);
            } else {
                state.message(if state.player.is_stunned() {
                    "You struggle to keep your balance."
                } else {
                    "You reel..."
                });
                let dice = if state.player.attr(Attribute::Dexterity) < 12 { 6 } else { 4 };
                let turns = state.rng.dice(dice, 4);
                state.player.properties.incr_timeout(Property::Stunned, turns);
            }
        }
        MageSpell::HasteSelf => {
            if let Some(mon) = state.current_level.monster_mut(id) {
                mon.permanent_speed = SpeedState::Fast;
                mon.speed = SpeedState::Fast;
            }
            if player_sees_caster(state, id) {
                state.message(format!("The {} is suddenly moving faster.", name));
            }
        }
        MageSpell::CureSelf => cure_self(state, id, name),
        MageSpell::PsiBolt => {
            let dmg = if has_mr { (dmg + 1) / 2 } else { dmg };
            state.message(match dmg {
                ..=5 => "You get a slight headache.",
                6..=10 => "Your brain is on fire!",
                11..=20 => "Your head suddenly aches painfully!",
                _ => "Your head suddenly aches very painfully!",
            });
            spell_damage(state, name, dmg);
        }
    }
}

fn cast_cleric_spell(
    state: &mut GameState,
    id: MonsterId,
    name: &str,
    dmg: i32,
    spell: ClericSpell,
) {
    let ml = state.current_level.monster(id).map_or(1, |m| m.level as u32);
    let has_mr = state.player.has(Property::MagicResistance);

    match spell {
        ClericSpell::Geyser => {
            state.message("A sudden geyser slams into you from nowhere!");
            let dmg = state.rng.dice(8, 6) as i32;
            spell_damage(state, name, dmg);
        }
        ClericSpell::FirePillar => {
            state.message("A pillar of fire strikes all around you!");
            if state.player.has(Property::FireRes) {
                state.message("But the fire doesn't feel hot!");
            } else {
                let dmg = state.rng.dice(8, 6) as i32;
                spell_damage(state, name, dmg);
            }
        }
        ClericSpell::Lightning => {
            state.message("A bolt of lightning strikes down at you from above!");
            if state.player.has(Property::Reflection) {
                state.message("It bounces off you!");
                return;
            }
            if state.player.has(Property::ShockRes) {
                state.message("You aren't affected.");
            } else {
                let dmg = state.rng.dice(8, 6) as i32;
                spell_damage(state, name, dmg);
            }
            let turns = state.rng.rnd(100);
            state.player.properties.incr_timeout(Property::Blinded, turns);
        }
        ClericSpell::CurseItems => curse_items(state),
        ClericSpell::Insects => {
            let count = (if ml < 2 { 1 } else { state.rng.rnd(ml / 2) }).max(3);
            let insects: Vec<usize> = MONSTERS
                .iter()
                .enumerate()
                .filter(|(_, m)| m.symbol == 'a')
                .map(|(i, _)| i)
                .collect();
            let made = summon_near_player(state, &insects, count);
            if made > 0 {
                state.message(format!("The {} summons insects!", name));
            }
        }
        ClericSpell::BlindYou => {
            if !state.player.is_blind() {
                state.message("Scales cover your eyes!");
                state.player.properties.incr_timeout(Property::Blinded, 200);
            }
        }
        ClericSpell::Paralyze => {
            if has_mr || state.player.has(Property::FreeAction) {
                state.message("You stiffen briefly.");
                state.player.make_helpless(Property::Paralyzed, 1);
            } else {
                state.message("You are frozen in place!");
                state.player.make_helpless(Property::Paralyzed, 4 + ml);
            }
        }
        ClericSpell::ConfuseYou => {
            if has_mr {
                state.message("You feel momentarily dizzy.");
            } else {
                state.message(if state.player.is_confused() {
                    "You feel even more confused!"
                } else {
                    "You feel confused!"
                });
                let turns = dmg.max(1) as u32;
                state.player.properties.incr_timeout(Property::Confusion, turns);
            }
        }
        ClericSpell::CureSelf => cure_self(state, id, name),
        ClericSpell::OpenWounds => {
            let dmg = if has_mr { (dmg + 1) / 2 } else { dmg };
            state.message(match dmg {
                ..=5 => "Your skin itches badly for a moment.",
                6..=10 => "Wounds appear on your body!",
                11..=20 => "Severe wounds appear on your body!",
                _ => "Your body is covered with painful wounds!",
            });
            spell_damage(state, name, dmg);
        }
    }
}

fn player_sees_caster(state: &GameState, id: MonsterId) -> bool {
    state.current_level.monster(id).is_some_and(|m| {
        (!m.state.invisible || state.player.has(Property::SeeInvisible))
            && player_sees(state, m.pos)
    })
}

/// Fire a ray spell at the player when lined up (buzzmu)
pub fn buzzmu(state: &mut GameState, id: MonsterId, attack: &Attack) -> bool {
    if !matches!(
        attack.damage_type,
        DamageType::MagicMissile | DamageType::Fire | DamageType::Cold | DamageType::Electric
            | DamageType::Sleep | DamageType::Disintegrate
    ) {
        return false;
    }
    let Some(mon) = state.current_level.monster(id) else {
        return false;
    };
    let (from, goal, name) = (mon.pos, mon.believed_player, mon.name.clone());
    if mon.state.cancelled {
        cursetxt(state, &name, false);
        return false;
    }
    let Some(dir) = lined_up(&state.current_level, from, goal) else {
        return false;
    };
    if state.rng.rn2(3) == 0 {
        return false;
    }
    let ray = Ray {
        element: attack.damage_type,
        dice: attack.dice_num.max(1) as u32,
        breath: false,
    };
    state.message(format!(
        "The {} zaps you with {}!",
        name,
        match attack.damage_type {
            DamageType::MagicMissile => String::from("a magic missile"),
            element => format!("a bolt of {}", element.element_name()),
        }
    ));
    buzz(state, ThrowSource::Monster(id), ray, from, dir);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GameRng;
    use crate::combat::AttackType;
    use crate::dungeon::{Cell, Level, Position};
    use crate::monster::{Monster, race_by_name};
    use crate::world::GameOptions;

    fn arena() -> GameState {
        let options = GameOptions {
            pet: false,
            ..Default::default()
        };
        let mut state = GameState::new(GameRng::new(9), options).unwrap();
        let mut level = Level::new(3);
        for x in 1..20 {
            for y in 1..10 {
                level.cells[x][y] = Cell::floor();
            }
        }
        state.current_level = level;
        state.player.pos = Position::new(5, 5);
        state
    }

    fn caster(state: &mut GameState, name: &str, level: u8) -> MonsterId {
        let mut mon = Monster::new(MonsterId::NONE, race_by_name(name).unwrap(), Position::new(6, 5));
        mon.level = level;
        mon.hp = 20;
        mon.hp_max = 20;
        mon.believed_player = state.player.pos;
        state.current_level.add_monster(mon)
    }

    fn mage_attack() -> Attack {
        Attack::new(AttackType::Magic, DamageType::MageSpell, 0, 0)
    }

    #[test]
    fn test_spell_tables_cover_levels() {
        let mut rng = GameRng::new(1);
        assert_eq!(choose_magic_spell(0, &mut rng), MageSpell::PsiBolt);
        assert_eq!(choose_magic_spell(3, &mut rng), MageSpell::StunYou);
        assert_eq!(choose_magic_spell(21, &mut rng), MageSpell::DeathTouch);
        assert_eq!(choose_clerical_spell(0, &mut rng), ClericSpell::OpenWounds);
        assert_eq!(choose_clerical_spell(12, &mut rng), ClericSpell::FirePillar);
        for v in 0..60 {
            choose_magic_spell(v, &mut rng);
            choose_clerical_spell(v, &mut rng);
        }
    }

    #[test]
    fn test_undirected_spells() {
        assert!(Spell::Mage(MageSpell::SummonMons).is_undirected());
        assert!(!Spell::Mage(MageSpell::PsiBolt).is_undirected());
        assert!(Spell::Cleric(ClericSpell::Insects).is_undirected());
        assert!(!Spell::Cleric(ClericSpell::Geyser).is_undirected());
    }

    #[test]
    fn test_cooldown_blocks_casting() {
        let mut state = arena();
        let id = caster(&mut state, "kobold shaman", 5);
        state.current_level.monster_mut(id).unwrap().spec_used = 3;
        let hp = state.player.hp;
        assert_eq!(castmu(&mut state, id, &mage_attack(), true, true), CastResult::Failed);
        assert_eq!(state.player.hp, hp);
        assert!(state.take_messages().iter().any(|m| m.contains("curses")));
    }

    #[test]
    fn test_cast_sets_cooldown() {
        let mut state = arena();
        state.player.hp = 10_000;
        state.player.hp_max = 10_000;
        let id = caster(&mut state, "kobold shaman", 5);
        for _ in 0..50 {
            state.current_level.monster_mut(id).unwrap().spec_used = 0;
            castmu(&mut state, id, &mage_attack(), true, true);
        }
        let spec = state.current_level.monster(id).map(|m| m.spec_used);
        assert_eq!(spec, Some(5));
    }

    #[test]
    fn test_wrong_spot_directed_spell_fails() {
        let mut state = arena();
        let id = caster(&mut state, "acolyte", 8);
        let attack = Attack::new(AttackType::Magic, DamageType::ClericSpell, 0, 0);
        let hp = state.player.hp;
        for _ in 0..20 {
            state.current_level.monster_mut(id).unwrap().spec_used = 0;
            castmu(&mut state, id, &attack, true, false);
        }
        assert_eq!(state.player.hp, hp);
    }

    #[test]
    fn test_buzzmu_needs_line() {
        let mut state = arena();
        let id = caster(&mut state, "Angel", 10);
        state.current_level.move_monster(id, Position::new(8, 7));
        let attack = Attack::new(AttackType::Magic, DamageType::MagicMissile, 2, 6);
        assert!(!buzzmu(&mut state, id, &attack));
    }
}
