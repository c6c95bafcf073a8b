//! The monster race table

use super::permonst::{GenFlags, MonsterFlags as F, MonsterResistances as R, MonsterSize, PerMonst};
use crate::combat::{Attack, AttackType as AT, DamageType as AD, attacks};

const fn a(at: AT, ad: AD, n: u8, d: u8) -> Attack {
    Attack::new(at, ad, n, d)
}

const BEAST: F = F::ANIMAL.union(F::NOHANDS).union(F::CARNIVORE).union(F::HOSTILE);
const HUMANOID: F = F::HUMANOID.union(F::COLLECT).union(F::WEAPONS);
const UNDEAD: F = F::UNDEAD
    .union(F::MINDLESS)
    .union(F::HUMANOID)
    .union(F::HOSTILE)
    .union(F::NOPOISON);
const BLOB: F = F::AMORPHOUS
    .union(F::NOEYES)
    .union(F::NOHANDS)
    .union(F::MINDLESS);
const UNDEAD_RES: R = R::COLD.union(R::SLEEP).union(R::POISON);

/// Baseline entry; every race overrides the fields it needs
const BASE: PerMonst = PerMonst {
    name: "",
    symbol: ' ',
    level: 0,
    speed: 12,
    ac: 10,
    mr: 0,
    alignment: 0,
    gen_flags: GenFlags::empty(),
    frequency: 1,
    attacks: attacks(&[]),
    weight: 100,
    nutrition: 100,
    size: MonsterSize::Small,
    resists: R::empty(),
    flags: F::empty(),
    difficulty: 1,
};

pub static MONSTERS: &[PerMonst] = &[
    PerMonst {
        name: "giant ant",
        symbol: 'a',
        level: 2,
        speed: 18,
        ac: 3,
        frequency: 3,
        attacks: attacks(&[a(AT::Bite, AD::Physical, 1, 4)]),
        weight: 10,
        nutrition: 10,
        size: MonsterSize::Tiny,
        flags: BEAST,
        difficulty: 4,
        ..BASE
    },
    PerMonst {
        name: "killer bee",
        symbol: 'a',
        level: 1,
        speed: 18,
        ac: -1,
        gen_flags: GenFlags::LGROUP,
        frequency: 2,
        attacks: attacks(&[a(AT::Sting, AD::DrainStrength, 1, 3)]),
        weight: 1,
        nutrition: 5,
        size: MonsterSize::Tiny,
        resists: R::POISON,
        flags: BEAST.union(F::FLY).union(F::NOPOISON),
        difficulty: 5,
        ..BASE
    },
    PerMonst {
        name: "soldier ant",
        symbol: 'a',
        level: 3,
        speed: 18,
        ac: 3,
        gen_flags: GenFlags::SGROUP,
        frequency: 2,
        attacks: attacks(&[
            a(AT::Bite, AD::Physical, 2, 4),
            a(AT::Sting, AD::DrainStrength, 3, 4),
        ]),
        weight: 20,
        nutrition: 5,
        size: MonsterSize::Tiny,
        resists: R::POISON,
        flags: BEAST,
        difficulty: 6,
        ..BASE
    },
    PerMonst {
        name: "acid blob",
        symbol: 'b',
        level: 1,
        speed: 3,
        ac: 8,
        frequency: 2,
        attacks: attacks(&[a(AT::Passive, AD::Acid, 1, 8)]),
        weight: 30,
        nutrition: 30,
        size: MonsterSize::Tiny,
        resists: R::SLEEP.union(R::POISON).union(R::ACID).union(R::STONE),
        flags: BLOB.union(F::WANDER),
        difficulty: 2,
        ..BASE
    },
    PerMonst {
        name: "jackal",
        symbol: 'd',
        level: 0,
        speed: 12,
        ac: 7,
        alignment: -7,
        gen_flags: GenFlags::SGROUP,
        frequency: 3,
        attacks: attacks(&[a(AT::Bite, AD::Physical, 1, 2)]),
        weight: 300,
        nutrition: 250,
        flags: BEAST,
        difficulty: 1,
        ..BASE
    },
    PerMonst {
        name: "coyote",
        symbol: 'd',
        level: 1,
        speed: 12,
        ac: 7,
        alignment: -7,
        gen_flags: GenFlags::SGROUP,
        frequency: 1,
        attacks: attacks(&[a(AT::Bite, AD::Physical, 1, 3)]),
        weight: 300,
        nutrition: 250,
        flags: BEAST,
        difficulty: 2,
        ..BASE
    },
    PerMonst {
        name: "little dog",
        symbol: 'd',
        level: 2,
        speed: 18,
        ac: 6,
        frequency: 1,
        attacks: attacks(&[a(AT::Bite, AD::Physical, 1, 6)]),
        weight: 150,
        nutrition: 150,
        flags: F::ANIMAL
            .union(F::NOHANDS)
            .union(F::CARNIVORE)
            .union(F::DOMESTIC),
        difficulty: 3,
        ..BASE
    },
    PerMonst {
        name: "wolf",
        symbol: 'd',
        level: 5,
        speed: 12,
        ac: 4,
        gen_flags: GenFlags::SGROUP,
        frequency: 2,
        attacks: attacks(&[a(AT::Bite, AD::Physical, 2, 4)]),
        weight: 500,
        nutrition: 250,
        size: MonsterSize::Medium,
        flags: BEAST,
        difficulty: 6,
        ..BASE
    },
    PerMonst {
        name: "winter wolf cub",
        symbol: 'd',
        level: 5,
        speed: 12,
        ac: 4,
        alignment: -5,
        gen_flags: GenFlags::SGROUP,
        frequency: 2,
        attacks: attacks(&[
            a(AT::Bite, AD::Physical, 1, 8),
            a(AT::Breath, AD::Cold, 1, 8),
        ]),
        weight: 250,
        nutrition: 200,
        resists: R::COLD,
        flags: BEAST,
        difficulty: 7,
        ..BASE
    },
    PerMonst {
        name: "hell hound pup",
        symbol: 'd',
        level: 7,
        speed: 12,
        ac: 4,
        mr: 20,
        alignment: -5,
        gen_flags: GenFlags::SGROUP,
        frequency: 1,
        attacks: attacks(&[
            a(AT::Bite, AD::Physical, 2, 6),
            a(AT::Breath, AD::Fire, 2, 6),
        ]),
        weight: 200,
        nutrition: 200,
        resists: R::FIRE,
        flags: BEAST,
        difficulty: 9,
        ..BASE
    },
    PerMonst {
        name: "floating eye",
        symbol: 'e',
        level: 2,
        speed: 1,
        ac: 9,
        mr: 10,
        frequency: 5,
        attacks: attacks(&[a(AT::Passive, AD::Paralyze, 0, 70)]),
        weight: 10,
        nutrition: 10,
        flags: F::FLY.union(F::NOHANDS).union(F::HOSTILE),
        difficulty: 3,
        ..BASE
    },
    PerMonst {
        name: "gas spore",
        symbol: 'e',
        level: 1,
        speed: 3,
        ac: 10,
        frequency: 1,
        attacks: attacks(&[a(AT::Boom, AD::Physical, 4, 6)]),
        weight: 10,
        nutrition: 10,
        flags: BLOB.union(F::FLY).union(F::HOSTILE),
        difficulty: 2,
        ..BASE
    },
    PerMonst {
        name: "kitten",
        symbol: 'f',
        level: 3,
        speed: 18,
        ac: 6,
        frequency: 1,
        attacks: attacks(&[a(AT::Bite, AD::Physical, 1, 6)]),
        weight: 150,
        nutrition: 150,
        flags: F::ANIMAL
            .union(F::NOHANDS)
            .union(F::CARNIVORE)
            .union(F::DOMESTIC)
            .union(F::WANDER),
        difficulty: 4,
        ..BASE
    },
    PerMonst {
        name: "gnome",
        symbol: 'G',
        level: 1,
        speed: 6,
        ac: 10,
        mr: 4,
        gen_flags: GenFlags::SGROUP,
        frequency: 1,
        attacks: attacks(&[a(AT::Weapon, AD::Physical, 1, 6)]),
        weight: 650,
        nutrition: 100,
        flags: HUMANOID,
        difficulty: 3,
        ..BASE
    },
    PerMonst {
        name: "gnome lord",
        symbol: 'G',
        level: 3,
        speed: 8,
        ac: 10,
        mr: 4,
        frequency: 2,
        attacks: attacks(&[a(AT::Weapon, AD::Physical, 1, 8)]),
        weight: 700,
        nutrition: 120,
        flags: HUMANOID,
        difficulty: 4,
        ..BASE
    },
    PerMonst {
        name: "gnomish wizard",
        symbol: 'G',
        level: 3,
        speed: 10,
        ac: 4,
        mr: 10,
        frequency: 1,
        attacks: attacks(&[a(AT::Magic, AD::MageSpell, 0, 0)]),
        weight: 700,
        nutrition: 120,
        flags: F::HUMANOID,
        difficulty: 5,
        ..BASE
    },
    PerMonst {
        name: "dwarf",
        symbol: 'h',
        level: 2,
        speed: 6,
        ac: 10,
        mr: 10,
        alignment: 4,
        frequency: 3,
        attacks: attacks(&[a(AT::Weapon, AD::Physical, 1, 8)]),
        weight: 900,
        nutrition: 300,
        size: MonsterSize::Medium,
        flags: HUMANOID.union(F::GREEDY).union(F::JEWELS),
        difficulty: 4,
        ..BASE
    },
    PerMonst {
        name: "hobbit",
        symbol: 'h',
        level: 1,
        speed: 9,
        ac: 10,
        alignment: 6,
        frequency: 2,
        attacks: attacks(&[a(AT::Weapon, AD::Physical, 1, 6)]),
        weight: 500,
        nutrition: 200,
        flags: HUMANOID,
        difficulty: 2,
        ..BASE
    },
    PerMonst {
        name: "homunculus",
        symbol: 'i',
        level: 2,
        speed: 12,
        ac: 6,
        mr: 10,
        alignment: -7,
        frequency: 2,
        attacks: attacks(&[a(AT::Bite, AD::Sleep, 1, 3)]),
        weight: 60,
        nutrition: 100,
        size: MonsterSize::Tiny,
        resists: R::SLEEP.union(R::POISON),
        flags: F::FLY.union(F::HOSTILE).union(F::NOPOISON),
        difficulty: 3,
        ..BASE
    },
    PerMonst {
        name: "imp",
        symbol: 'i',
        level: 3,
        speed: 12,
        ac: 2,
        mr: 20,
        alignment: -7,
        frequency: 1,
        attacks: attacks(&[a(AT::Claw, AD::Physical, 1, 4)]),
        weight: 20,
        nutrition: 10,
        size: MonsterSize::Tiny,
        flags: F::REGEN.union(F::WANDER).union(F::HOSTILE),
        difficulty: 4,
        ..BASE
    },
    PerMonst {
        name: "blue jelly",
        symbol: 'j',
        level: 4,
        speed: 0,
        ac: 8,
        mr: 10,
        frequency: 2,
        attacks: attacks(&[a(AT::Passive, AD::Cold, 0, 6)]),
        weight: 50,
        nutrition: 20,
        size: MonsterSize::Medium,
        resists: R::COLD.union(R::POISON),
        flags: BLOB.union(F::HOSTILE),
        difficulty: 5,
        ..BASE
    },
    PerMonst {
        name: "kobold",
        symbol: 'k',
        level: 0,
        speed: 6,
        ac: 10,
        alignment: -2,
        frequency: 1,
        attacks: attacks(&[a(AT::Weapon, AD::Physical, 1, 4)]),
        weight: 400,
        nutrition: 100,
        resists: R::POISON,
        flags: HUMANOID.union(F::HOSTILE),
        difficulty: 1,
        ..BASE
    },
    PerMonst {
        name: "large kobold",
        symbol: 'k',
        level: 1,
        speed: 6,
        ac: 10,
        alignment: -3,
        frequency: 1,
        attacks: attacks(&[a(AT::Weapon, AD::Physical, 2, 4)]),
        weight: 450,
        nutrition: 150,
        resists: R::POISON,
        flags: HUMANOID.union(F::HOSTILE),
        difficulty: 2,
        ..BASE
    },
    PerMonst {
        name: "kobold shaman",
        symbol: 'k',
        level: 2,
        speed: 6,
        ac: 6,
        mr: 10,
        alignment: -4,
        frequency: 1,
        attacks: attacks(&[a(AT::Magic, AD::MageSpell, 0, 0)]),
        weight: 450,
        nutrition: 150,
        resists: R::POISON,
        flags: F::HUMANOID.union(F::HOSTILE),
        difficulty: 4,
        ..BASE
    },
    PerMonst {
        name: "leprechaun",
        symbol: 'l',
        level: 5,
        speed: 15,
        ac: 8,
        mr: 20,
        frequency: 4,
        attacks: attacks(&[a(AT::Claw, AD::StealGold, 1, 2)]),
        weight: 60,
        nutrition: 30,
        size: MonsterSize::Tiny,
        flags: F::HUMANOID.union(F::HOSTILE).union(F::GREEDY),
        difficulty: 4,
        ..BASE
    },
    PerMonst {
        name: "gnome mummy",
        symbol: 'M',
        level: 4,
        speed: 10,
        ac: 6,
        mr: 20,
        alignment: -3,
        frequency: 1,
        attacks: attacks(&[a(AT::Claw, AD::Physical, 1, 6)]),
        weight: 650,
        nutrition: 50,
        resists: UNDEAD_RES,
        flags: UNDEAD,
        difficulty: 5,
        ..BASE
    },
    PerMonst {
        name: "goblin",
        symbol: 'o',
        level: 0,
        speed: 6,
        ac: 10,
        alignment: -3,
        frequency: 2,
        attacks: attacks(&[a(AT::Weapon, AD::Physical, 1, 6)]),
        weight: 400,
        nutrition: 100,
        flags: HUMANOID.union(F::HOSTILE).union(F::GREEDY),
        difficulty: 1,
        ..BASE
    },
    PerMonst {
        name: "hill orc",
        symbol: 'o',
        level: 1,
        speed: 9,
        ac: 10,
        alignment: -4,
        gen_flags: GenFlags::LGROUP,
        frequency: 2,
        attacks: attacks(&[a(AT::Weapon, AD::Physical, 1, 6)]),
        weight: 1000,
        nutrition: 200,
        size: MonsterSize::Medium,
        flags: HUMANOID.union(F::HOSTILE).union(F::GREEDY),
        difficulty: 4,
        ..BASE
    },
    PerMonst {
        name: "Uruk-hai",
        symbol: 'o',
        level: 3,
        speed: 7,
        ac: 10,
        alignment: -4,
        gen_flags: GenFlags::LGROUP,
        frequency: 1,
        attacks: attacks(&[a(AT::Weapon, AD::Physical, 1, 8)]),
        weight: 1300,
        nutrition: 300,
        size: MonsterSize::Medium,
        resists: R::POISON,
        flags: HUMANOID.union(F::HOSTILE).union(F::GREEDY),
        difficulty: 5,
        ..BASE
    },
    PerMonst {
        name: "orc shaman",
        symbol: 'o',
        level: 3,
        speed: 9,
        ac: 5,
        mr: 10,
        alignment: -5,
        frequency: 1,
        attacks: attacks(&[a(AT::Magic, AD::MageSpell, 0, 0)]),
        weight: 1000,
        nutrition: 300,
        size: MonsterSize::Medium,
        flags: F::HUMANOID.union(F::HOSTILE).union(F::GREEDY),
        difficulty: 5,
        ..BASE
    },
    PerMonst {
        name: "rothe",
        symbol: 'q',
        level: 2,
        speed: 9,
        ac: 7,
        gen_flags: GenFlags::SGROUP,
        frequency: 4,
        attacks: attacks(&[
            a(AT::Claw, AD::Physical, 1, 3),
            a(AT::Bite, AD::Physical, 1, 3),
            a(AT::Bite, AD::Physical, 1, 8),
        ]),
        weight: 400,
        nutrition: 100,
        size: MonsterSize::Large,
        flags: BEAST,
        difficulty: 4,
        ..BASE
    },
    PerMonst {
        name: "sewer rat",
        symbol: 'r',
        level: 0,
        speed: 12,
        ac: 7,
        gen_flags: GenFlags::SGROUP,
        frequency: 1,
        attacks: attacks(&[a(AT::Bite, AD::Physical, 1, 3)]),
        weight: 20,
        nutrition: 12,
        size: MonsterSize::Tiny,
        flags: BEAST,
        difficulty: 1,
        ..BASE
    },
    PerMonst {
        name: "giant rat",
        symbol: 'r',
        level: 1,
        speed: 10,
        ac: 7,
        gen_flags: GenFlags::SGROUP,
        frequency: 2,
        attacks: attacks(&[a(AT::Bite, AD::Physical, 1, 3)]),
        weight: 30,
        nutrition: 30,
        size: MonsterSize::Tiny,
        flags: BEAST,
        difficulty: 2,
        ..BASE
    },
    PerMonst {
        name: "cobra",
        symbol: 'S',
        level: 6,
        speed: 18,
        ac: 2,
        frequency: 1,
        attacks: attacks(&[
            a(AT::Bite, AD::DrainStrength, 2, 4),
            a(AT::Spit, AD::Blind, 0, 0),
        ]),
        weight: 250,
        nutrition: 100,
        size: MonsterSize::Medium,
        resists: R::POISON,
        flags: BEAST.union(F::SWIM).union(F::NOPOISON),
        difficulty: 9,
        ..BASE
    },
    PerMonst {
        name: "troll",
        symbol: 'T',
        level: 7,
        speed: 12,
        ac: 4,
        alignment: -3,
        frequency: 2,
        attacks: attacks(&[
            a(AT::Weapon, AD::Physical, 4, 2),
            a(AT::Claw, AD::Physical, 4, 2),
            a(AT::Bite, AD::Physical, 2, 6),
        ]),
        weight: 800,
        nutrition: 350,
        size: MonsterSize::Large,
        flags: HUMANOID
            .union(F::REGEN)
            .union(F::STALK)
            .union(F::HOSTILE)
            .union(F::CARNIVORE),
        difficulty: 9,
        ..BASE
    },
    PerMonst {
        name: "fog cloud",
        symbol: 'v',
        level: 3,
        speed: 1,
        ac: 0,
        frequency: 2,
        attacks: attacks(&[a(AT::Engulf, AD::Physical, 1, 6)]),
        weight: 0,
        nutrition: 0,
        size: MonsterSize::Huge,
        resists: R::SLEEP.union(R::POISON).union(R::STONE),
        flags: BLOB.union(F::FLY).union(F::HOSTILE),
        difficulty: 4,
        ..BASE
    },
    PerMonst {
        name: "dust vortex",
        symbol: 'v',
        level: 4,
        speed: 20,
        ac: 2,
        mr: 30,
        frequency: 2,
        attacks: attacks(&[a(AT::Engulf, AD::Blind, 1, 4)]),
        weight: 0,
        nutrition: 0,
        size: MonsterSize::Huge,
        resists: R::SLEEP.union(R::POISON).union(R::STONE),
        flags: BLOB.union(F::FLY).union(F::HOSTILE),
        difficulty: 6,
        ..BASE
    },
    PerMonst {
        name: "wraith",
        symbol: 'W',
        level: 6,
        speed: 12,
        ac: 4,
        mr: 15,
        alignment: -6,
        frequency: 2,
        attacks: attacks(&[a(AT::Touch, AD::DrainLife, 1, 6)]),
        weight: 0,
        nutrition: 0,
        size: MonsterSize::Medium,
        resists: UNDEAD_RES.union(R::STONE),
        flags: F::UNDEAD
            .union(F::FLY)
            .union(F::HUMANOID)
            .union(F::HOSTILE)
            .union(F::STALK),
        difficulty: 8,
        ..BASE
    },
    PerMonst {
        name: "grid bug",
        symbol: 'x',
        level: 0,
        speed: 12,
        ac: 9,
        gen_flags: GenFlags::SGROUP,
        frequency: 3,
        attacks: attacks(&[a(AT::Bite, AD::Electric, 1, 1)]),
        weight: 15,
        nutrition: 10,
        size: MonsterSize::Tiny,
        resists: R::ELEC.union(R::POISON),
        flags: F::ANIMAL
            .union(F::NOHANDS)
            .union(F::NODIAG)
            .union(F::HOSTILE),
        difficulty: 1,
        ..BASE
    },
    PerMonst {
        name: "yellow light",
        symbol: 'y',
        level: 3,
        speed: 13,
        ac: 0,
        frequency: 4,
        attacks: attacks(&[a(AT::Explode, AD::Blind, 10, 20)]),
        weight: 0,
        nutrition: 0,
        resists: R::FIRE
            .union(R::COLD)
            .union(R::ELEC)
            .union(R::DISINT)
            .union(R::SLEEP)
            .union(R::POISON)
            .union(R::ACID)
            .union(R::STONE),
        flags: BLOB.union(F::FLY).union(F::HOSTILE),
        difficulty: 5,
        ..BASE
    },
    PerMonst {
        name: "owlbear",
        symbol: 'Y',
        level: 5,
        speed: 12,
        ac: 5,
        frequency: 3,
        attacks: attacks(&[
            a(AT::Claw, AD::Physical, 1, 6),
            a(AT::Claw, AD::Physical, 1, 6),
            a(AT::Hug, AD::Stick, 2, 8),
        ]),
        weight: 1700,
        nutrition: 700,
        size: MonsterSize::Large,
        flags: F::ANIMAL.union(F::CARNIVORE).union(F::HOSTILE),
        difficulty: 7,
        ..BASE
    },
    PerMonst {
        name: "kobold zombie",
        symbol: 'Z',
        level: 0,
        speed: 6,
        ac: 10,
        alignment: -2,
        frequency: 1,
        attacks: attacks(&[a(AT::Claw, AD::Physical, 1, 4)]),
        weight: 400,
        nutrition: 50,
        resists: UNDEAD_RES,
        flags: UNDEAD,
        difficulty: 1,
        ..BASE
    },
    PerMonst {
        name: "orc zombie",
        symbol: 'Z',
        level: 2,
        speed: 6,
        ac: 9,
        alignment: -3,
        gen_flags: GenFlags::SGROUP,
        frequency: 1,
        attacks: attacks(&[a(AT::Claw, AD::Physical, 1, 6)]),
        weight: 850,
        nutrition: 75,
        size: MonsterSize::Medium,
        resists: UNDEAD_RES,
        flags: UNDEAD,
        difficulty: 3,
        ..BASE
    },
    PerMonst {
        name: "ghoul",
        symbol: 'Z',
        level: 3,
        speed: 6,
        ac: 4,
        alignment: -2,
        frequency: 1,
        attacks: attacks(&[
            a(AT::Claw, AD::Paralyze, 1, 2),
            a(AT::Claw, AD::Physical, 1, 3),
        ]),
        weight: 400,
        nutrition: 50,
        resists: UNDEAD_RES,
        flags: UNDEAD,
        difficulty: 5,
        ..BASE
    },
    PerMonst {
        name: "lichen",
        symbol: 'F',
        level: 0,
        speed: 1,
        ac: 9,
        frequency: 4,
        attacks: attacks(&[a(AT::Touch, AD::Stick, 0, 0)]),
        weight: 20,
        nutrition: 200,
        resists: R::empty(),
        flags: BLOB.union(F::HOSTILE),
        difficulty: 1,
        ..BASE
    },
    PerMonst {
        name: "red mold",
        symbol: 'F',
        level: 3,
        speed: 0,
        ac: 9,
        frequency: 1,
        attacks: attacks(&[a(AT::Passive, AD::Fire, 0, 4)]),
        weight: 50,
        nutrition: 30,
        resists: R::FIRE.union(R::POISON),
        flags: BLOB.union(F::HOSTILE),
        difficulty: 4,
        ..BASE
    },
    PerMonst {
        name: "ogre",
        symbol: 'O',
        level: 5,
        speed: 10,
        ac: 5,
        alignment: -3,
        frequency: 1,
        attacks: attacks(&[a(AT::Weapon, AD::Physical, 2, 5)]),
        weight: 1600,
        nutrition: 500,
        size: MonsterSize::Large,
        flags: HUMANOID.union(F::HOSTILE).union(F::GREEDY).union(F::JEWELS),
        difficulty: 7,
        ..BASE
    },
    PerMonst {
        name: "Woodland-elf",
        symbol: '@',
        level: 4,
        speed: 12,
        ac: 10,
        mr: 10,
        alignment: -5,
        gen_flags: GenFlags::SGROUP,
        frequency: 2,
        attacks: attacks(&[a(AT::Weapon, AD::Physical, 2, 4)]),
        weight: 800,
        nutrition: 350,
        size: MonsterSize::Medium,
        resists: R::SLEEP,
        flags: HUMANOID.union(F::SEE_INVIS),
        difficulty: 6,
        ..BASE
    },
    PerMonst {
        name: "acolyte",
        symbol: '@',
        level: 4,
        speed: 12,
        ac: 10,
        mr: 20,
        frequency: 1,
        attacks: attacks(&[
            a(AT::Weapon, AD::Physical, 1, 6),
            a(AT::Magic, AD::ClericSpell, 0, 0),
        ]),
        weight: 1450,
        nutrition: 400,
        size: MonsterSize::Medium,
        flags: HUMANOID,
        difficulty: 5,
        ..BASE
    },
    PerMonst {
        name: "soldier",
        symbol: '@',
        level: 6,
        speed: 10,
        ac: 10,
        alignment: -2,
        gen_flags: GenFlags::SGROUP,
        frequency: 1,
        attacks: attacks(&[a(AT::Weapon, AD::Physical, 1, 8)]),
        weight: 1450,
        nutrition: 400,
        size: MonsterSize::Medium,
        flags: HUMANOID.union(F::HOSTILE).union(F::STALK).union(F::GREEDY),
        difficulty: 8,
        ..BASE
    },
    PerMonst {
        name: "Angel",
        symbol: 'A',
        level: 14,
        speed: 10,
        ac: -4,
        mr: 55,
        alignment: 12,
        frequency: 1,
        attacks: attacks(&[
            a(AT::Weapon, AD::Physical, 1, 6),
            a(AT::Weapon, AD::Physical, 1, 6),
            a(AT::Claw, AD::Stun, 1, 4),
            a(AT::Magic, AD::MagicMissile, 2, 6),
        ]),
        weight: 1450,
        nutrition: 400,
        size: MonsterSize::Medium,
        resists: R::COLD.union(R::ELEC).union(R::SLEEP).union(R::POISON),
        flags: HUMANOID.union(F::FLY).union(F::SEE_INVIS).union(F::STALK),
        difficulty: 19,
        ..BASE
    },
    PerMonst {
        name: "newt",
        symbol: ':',
        level: 0,
        speed: 6,
        ac: 8,
        frequency: 5,
        attacks: attacks(&[a(AT::Bite, AD::Physical, 1, 3)]),
        weight: 10,
        nutrition: 20,
        size: MonsterSize::Tiny,
        flags: BEAST.union(F::SWIM),
        difficulty: 1,
        ..BASE
    },
    PerMonst {
        name: "gecko",
        symbol: ':',
        level: 1,
        speed: 6,
        ac: 8,
        frequency: 5,
        attacks: attacks(&[a(AT::Bite, AD::Physical, 1, 3)]),
        weight: 10,
        nutrition: 20,
        size: MonsterSize::Tiny,
        flags: BEAST,
        difficulty: 2,
        ..BASE
    },
    PerMonst {
        name: "giant bat",
        symbol: 'B',
        level: 2,
        speed: 22,
        ac: 7,
        frequency: 2,
        attacks: attacks(&[a(AT::Bite, AD::Physical, 1, 6)]),
        weight: 30,
        nutrition: 30,
        flags: BEAST.union(F::FLY).union(F::WANDER),
        difficulty: 3,
        ..BASE
    },
    PerMonst {
        name: "pony",
        symbol: 'u',
        level: 2,
        speed: 16,
        ac: 6,
        frequency: 2,
        attacks: attacks(&[a(AT::Kick, AD::Physical, 1, 6), a(AT::Bite, AD::Physical, 1, 2)]),
        weight: 1300,
        nutrition: 250,
        size: MonsterSize::Medium,
        flags: F::ANIMAL.union(F::NOHANDS).union(F::HERBIVORE).union(F::DOMESTIC),
        difficulty: 3,
        ..BASE
    },
    PerMonst {
        name: "gray unicorn",
        symbol: 'u',
        level: 4,
        speed: 24,
        ac: 2,
        mr: 70,
        frequency: 1,
        attacks: attacks(&[a(AT::Butt, AD::Physical, 1, 12), a(AT::Kick, AD::Physical, 1, 6)]),
        weight: 1300,
        nutrition: 300,
        size: MonsterSize::Large,
        flags: F::ANIMAL.union(F::NOHANDS).union(F::HERBIVORE).union(F::WANDER),
        difficulty: 6,
        ..BASE
    },
    PerMonst {
        name: "quantum mechanic",
        symbol: 'Q',
        level: 7,
        speed: 12,
        ac: 3,
        mr: 10,
        frequency: 3,
        attacks: attacks(&[a(AT::Claw, AD::Teleport, 1, 4)]),
        weight: 20,
        nutrition: 20,
        flags: F::HUMANOID.union(F::HOSTILE),
        difficulty: 9,
        ..BASE
    },
    PerMonst {
        name: "umber hulk",
        symbol: 'U',
        level: 9,
        speed: 6,
        ac: 2,
        mr: 25,
        frequency: 2,
        attacks: attacks(&[
            a(AT::Claw, AD::Physical, 3, 4),
            a(AT::Claw, AD::Physical, 3, 4),
            a(AT::Bite, AD::Physical, 2, 5),
            a(AT::Gaze, AD::Confuse, 0, 0),
        ]),
        weight: 1200,
        nutrition: 500,
        size: MonsterSize::Large,
        flags: F::CARNIVORE.union(F::HOSTILE),
        difficulty: 12,
        ..BASE
    },
    PerMonst {
        name: "skeleton",
        symbol: 'Z',
        level: 12,
        speed: 8,
        ac: 4,
        alignment: 0,
        gen_flags: GenFlags::NOGEN,
        frequency: 0,
        attacks: attacks(&[a(AT::Weapon, AD::Physical, 2, 6), a(AT::Touch, AD::Slow, 1, 6)]),
        weight: 300,
        nutrition: 5,
        size: MonsterSize::Medium,
        resists: UNDEAD_RES.union(R::STONE),
        flags: UNDEAD.union(F::WEAPONS).union(F::THICK_HIDE),
        difficulty: 14,
        ..BASE
    },
];

/// Look up a race index by name
pub fn race_by_name(name: &str) -> Option<usize> {
    MONSTERS.iter().position(|m| m.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::AttackType;

    #[test]
    fn test_names_are_unique() {
        for (i, m) in MONSTERS.iter().enumerate() {
            assert_eq!(race_by_name(m.name), Some(i), "duplicate race {}", m.name);
        }
    }

    #[test]
    fn test_every_race_has_an_attack_or_is_passive() {
        for m in MONSTERS {
            assert!(m.attacks.iter().any(|a| a.is_active()), "{} is harmless", m.name);
        }
    }

    #[test]
    fn test_flags_drive_predicates() {
        let bug = &MONSTERS[race_by_name("grid bug").unwrap()];
        assert!(bug.nodiag());
        let eye = &MONSTERS[race_by_name("floating eye").unwrap()];
        assert_eq!(eye.passive().map(|a| a.damage_type), Some(AD::Paralyze));
        let shaman = &MONSTERS[race_by_name("kobold shaman").unwrap()];
        assert!(shaman.is_spellcaster());
        assert!(!shaman.has_ranged_attack());
        let cub = &MONSTERS[race_by_name("winter wolf cub").unwrap()];
        assert!(cub.has_ranged_attack());
        assert!(cub.resists(AD::Cold));
        assert_eq!(cub.attack_of(AttackType::Breath).map(|a| a.damage_type), Some(AD::Cold));
    }

    #[test]
    fn test_pets_are_domestic() {
        for name in ["little dog", "kitten"] {
            let race = &MONSTERS[race_by_name(name).unwrap()];
            assert!(race.has_flag(F::DOMESTIC));
            assert!(!race.has_flag(F::HOSTILE));
        }
    }
}
