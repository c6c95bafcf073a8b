//! Game state and the energy scheduler (moveloop)

use std::collections::VecDeque;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

use crate::action::{ActionResult, Command, execute};
use crate::consts::{MAX_DEPTH, MSG_HISTORY, NORMAL_SPEED};
use crate::dungeon::{Level, generate_floor};
use crate::monster::{
    MonsterAction, SpawnContext, dochug, make_pet, spawn_random_monster,
};
use crate::object::{Object, ObjectClass, WornMask};
use crate::player::{
    Attribute, HungerEvent, HungerState, Race, Role, You, digest, player_move_amount,
    recalc_status, regenerate,
};
use crate::world::{GameError, GameOptions};
use crate::GameRng;

/// Scheduler iterations allowed per tick before giving control back
const MAX_LOOP_ITERATIONS: usize = 10_000;

/// Result of a game loop tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameLoopResult {
    Continue,
    /// Player died, with the cause of death
    PlayerDied(String),
    PlayerQuit,
}

/// Everything about a game in progress
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub player: You,
    pub inventory: Vec<Object>,
    pub current_level: Level,
    /// Floors visited earlier, by depth
    pub levels: HashMap<i32, Level>,
    pub rng: GameRng,
    pub turns: u64,
    pub options: GameOptions,

    /// Messages produced since the caller last took them
    #[serde(skip)]
    pub messages: Vec<String>,
    pub message_history: VecDeque<String>,

    /// Cause of death, once the player has died
    pub killer: Option<String>,
}

impl GameState {
    /// Roll a character from the options and generate the first floor
    pub fn new(mut rng: GameRng, options: GameOptions) -> Result<Self, GameError> {
        let role = match &options.role {
            Some(name) => Role::from_name(name).ok_or_else(|| GameError::UnknownName {
                kind: "role",
                name: name.clone(),
            })?,
            None => Role::default(),
        };
        let race = match &options.race {
            Some(name) => Race::from_name(name).ok_or_else(|| GameError::UnknownName {
                kind: "race",
                name: name.clone(),
            })?,
            None => Race::Human,
        };
        if !race.allows(role) {
            return Err(GameError::UnknownName {
                kind: "race for this role",
                name: race.to_string(),
            });
        }

        let mut player = You::new(options.name.clone(), role, race, &mut rng);
        let level = generate_floor(1, &SpawnContext::from_player(&player), &mut rng);
        player.pos = level
            .find_upstairs()
            .or_else(|| level.random_walkable(&mut rng))
            .unwrap_or_default();

        let mut state = Self {
            player,
            inventory: Vec::new(),
            current_level: level,
            levels: HashMap::new(),
            rng,
            turns: 1,
            options,
            messages: Vec::new(),
            message_history: VecDeque::new(),
            killer: None,
        };

        for obj in role.starting_inventory() {
            state.add_to_inventory(obj)?;
        }
        state.equip_starting_kit();
        state.recalc();

        if state.options.pet {
            make_pet(&mut state);
        }
        let greeting = format!(
            "Hello {}, welcome to delve! You are a {} {}.",
            state.player.name,
            race.to_string().to_lowercase(),
            role
        );
        state.message(greeting);
        Ok(state)
    }

    /// Wield the first melee weapon and put on every piece of armor
    fn equip_starting_kit(&mut self) {
        let mut used = WornMask::empty();
        for obj in &mut self.inventory {
            match obj.class() {
                ObjectClass::Weapon if !used.contains(WornMask::WEAPON) && !obj.data().ammo => {
                    obj.worn = WornMask::WEAPON;
                    used |= WornMask::WEAPON;
                }
                ObjectClass::Armor => {
                    if let Some(slot) = obj.data().slot
                        && !used.contains(slot.worn_mask())
                    {
                        obj.worn = slot.worn_mask();
                        used |= slot.worn_mask();
                    }
                }
                _ => {}
            }
        }
    }

    pub fn message(&mut self, msg: impl Into<String>) {
        let msg = msg.into();
        self.messages.push(msg.clone());
        self.message_history.push_back(msg);
        while self.message_history.len() > MSG_HISTORY {
            self.message_history.pop_front();
        }
    }

    /// Drain the pending messages
    pub fn take_messages(&mut self) -> Vec<String> {
        std::mem::take(&mut self.messages)
    }

    /// Record the cause of death. The first cause recorded wins.
    pub fn die(&mut self, killer: impl Into<String>) {
        if self.killer.is_none() {
            let killer = killer.into();
            info!(killer = %killer, turn = self.turns, depth = self.current_level.depth, "player died");
            self.killer = Some(killer);
        }
        self.player.hp = self.player.hp.min(0);
    }

    pub fn is_over(&self) -> bool {
        self.player.is_dead()
    }

    /// Add an object to the pack, merging stacks. Gold goes to the purse.
    pub fn add_to_inventory(&mut self, mut obj: Object) -> Result<char, GameError> {
        if obj.is_gold() {
            self.player.gold += obj.quantity;
            return Ok('$');
        }
        if let Some(existing) = self.inventory.iter_mut().find(|o| o.can_merge(&obj)) {
            existing.quantity += obj.quantity;
            return Ok(existing.inv_letter);
        }
        let letter = ('a'..='z')
            .chain('A'..='Z')
            .find(|c| !self.inventory.iter().any(|o| o.inv_letter == *c))
            .ok_or(GameError::InventoryFull)?;
        obj.inv_letter = letter;
        self.inventory.push(obj);
        Ok(letter)
    }

    pub fn inventory_index(&self, letter: char) -> Option<usize> {
        self.inventory.iter().position(|o| o.inv_letter == letter)
    }

    pub fn inventory_item(&self, letter: char) -> Result<&Object, GameError> {
        self.inventory
            .iter()
            .find(|o| o.inv_letter == letter)
            .ok_or(GameError::NoSuchItem(letter))
    }

    pub fn remove_from_inventory(&mut self, letter: char) -> Option<Object> {
        let idx = self.inventory_index(letter)?;
        Some(self.inventory.remove(idx))
    }

    /// Recompute the player's derived status from equipment
    pub fn recalc(&mut self) {
        recalc_status(&mut self.player, &self.inventory);
    }

    /// Change a current attribute score and refresh derived stats.
    /// Returns false when the score was already at its limit.
    pub fn adjust_attribute(&mut self, attr: Attribute, delta: i8) -> bool {
        let changed = self.player.attr_current.modify(attr, delta);
        if changed {
            self.recalc();
        }
        changed
    }

    /// Move the player `delta` floors down (negative is up). Adjacent pets
    /// come along. Returns false when the move is refused.
    pub fn change_level(&mut self, delta: i32) -> bool {
        let target = self.current_level.depth + delta;
        if delta == 0 || !(1..=MAX_DEPTH).contains(&target) {
            return false;
        }

        let player_pos = self.player.pos;
        let followers: Vec<_> = self
            .current_level
            .monsters
            .iter()
            .filter(|m| m.state.tame && m.can_act() && m.pos.is_adjacent(player_pos))
            .map(|m| m.id)
            .collect();
        let followers: Vec<_> = followers
            .into_iter()
            .filter_map(|id| self.current_level.remove_monster(id))
            .collect();

        let new_level = match self.levels.remove(&target) {
            Some(level) => level,
            None => generate_floor(target, &SpawnContext::from_player(&self.player), &mut self.rng),
        };
        let old = std::mem::replace(&mut self.current_level, new_level);
        self.levels.insert(old.depth, old);

        let stairs = if delta > 0 {
            self.current_level.find_upstairs()
        } else {
            self.current_level.find_downstairs()
        };
        let arrival = stairs
            .or_else(|| self.current_level.random_walkable(&mut self.rng))
            .unwrap_or(player_pos);

        // shove aside whoever is standing on the arrival cell
        if let Some(id) = self.current_level.monster_id_at(arrival) {
            match self.current_level.enexto(arrival, Some(arrival), &mut self.rng) {
                Some(to) => {
                    self.current_level.move_monster(id, to);
                }
                None => {
                    warn!(%id, "no room beside the stairs; removing monster");
                    self.current_level.remove_monster(id);
                }
            }
        }

        self.player.pos = arrival;
        self.player.utrap = 0;
        self.player.stuck_to = None;
        self.player.max_depth = self.player.max_depth.max(target);

        for mut pet in followers {
            if let Some(pos) = self.current_level.enexto(arrival, Some(arrival), &mut self.rng) {
                pet.pos = pos;
                pet.believed_player = arrival;
                self.current_level.add_monster(pet);
            }
        }

        if delta > 0 {
            info!(depth = target, turn = self.turns, "descended");
        } else {
            debug!(depth = target, turn = self.turns, "ascended");
        }
        true
    }

    /// Repair player links to monsters that are gone or out of reach
    fn check_player_links(&mut self) {
        if let Some(id) = self.player.swallowed_by
            && self.current_level.monster(id).is_none()
        {
            warn!(%id, "engulfer vanished; releasing player");
            self.player.swallowed_by = None;
        }
        if let Some(id) = self.player.stuck_to {
            let holding = self
                .current_level
                .monster(id)
                .is_some_and(|m| m.pos.is_adjacent(self.player.pos));
            if !holding {
                self.player.stuck_to = None;
            }
        }
    }
}

/// Drives a [`GameState`] one player command at a time
pub struct GameLoop {
    state: GameState,
}

impl GameLoop {
    pub fn new(state: GameState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn into_state(self) -> GameState {
        self.state
    }

    /// Run the player's command, then let monsters and turns advance
    /// until the player may act again
    pub fn tick(&mut self, command: Command) -> GameLoopResult {
        if self.state.is_over() {
            return self.died();
        }

        if !self.state.player.is_helpless() {
            match execute(&mut self.state, command) {
                ActionResult::Success => {
                    self.state.player.movement -= NORMAL_SPEED;
                    trace!(movement = self.state.player.movement, "player acted");
                }
                ActionResult::NoTime => return GameLoopResult::Continue,
                ActionResult::Failed(msg) => {
                    self.state.message(msg);
                    return GameLoopResult::Continue;
                }
                ActionResult::Died(reason) => {
                    self.state.die(reason);
                    return self.died();
                }
                ActionResult::Quit => return GameLoopResult::PlayerQuit,
            }
        }
        if self.state.is_over() {
            return self.died();
        }

        // every player action is followed by one monster pass
        let mut iterations = 0;
        loop {
            let monsters_can_move = self.move_monsters();
            if self.state.is_over() {
                return self.died();
            }
            if self.state.player.movement >= NORMAL_SPEED {
                if !self.state.player.is_helpless() {
                    return GameLoopResult::Continue;
                }
                self.state.player.movement -= NORMAL_SPEED;
            } else if !monsters_can_move {
                self.new_turn();
                if self.state.is_over() {
                    return self.died();
                }
            }
            iterations += 1;
            if iterations > MAX_LOOP_ITERATIONS {
                warn!(turn = self.state.turns, "scheduler iteration cap reached");
                return GameLoopResult::Continue;
            }
        }
    }

    fn died(&self) -> GameLoopResult {
        GameLoopResult::PlayerDied(
            self.state
                .killer
                .clone()
                .unwrap_or_else(|| String::from("died")),
        )
    }

    /// One pass over the monsters (movemon). Returns whether any monster
    /// still has energy for another action.
    fn move_monsters(&mut self) -> bool {
        let mut somebody_can_move = false;
        for id in self.state.current_level.monster_ids() {
            let Some(mon) = self.state.current_level.monster_mut(id) else {
                continue;
            };
            if mon.movement < NORMAL_SPEED {
                continue;
            }
            mon.movement -= NORMAL_SPEED;
            if mon.movement >= NORMAL_SPEED {
                somebody_can_move = true;
            }

            let action = dochug(&mut self.state, id);
            trace!(%id, ?action, "monster turn");
            if action == MonsterAction::Died {
                continue;
            }
            if self.state.is_over() {
                break;
            }
        }
        somebody_can_move
    }

    /// Start a new game turn: hand out energy and tick every timer
    fn new_turn(&mut self) {
        let state = &mut self.state;
        state.turns += 1;
        let turn = state.turns;

        for mon in &mut state.current_level.monsters {
            mon.movement += mon.mcalcmove(&mut state.rng);
            mon.tick_timeouts();
            mon.regenerate(turn);
        }

        state.player.movement += player_move_amount(&state.player, &mut state.rng);
        trace!(turn, movement = state.player.movement, "new turn");

        for prop in state.player.properties.tick_timeouts() {
            if let Some(msg) = prop.expiry_message() {
                state.message(msg);
            }
        }

        regenerate(&mut state.player, turn, &mut state.rng);
        match digest(&mut state.player, turn, &mut state.rng) {
            HungerEvent::None => {}
            HungerEvent::Changed(hunger) => match hunger {
                HungerState::Hungry => state.message("You are beginning to feel hungry."),
                HungerState::Weak => state.message("You are beginning to feel weak."),
                HungerState::NotHungry | HungerState::Satiated => {}
                HungerState::Fainting => state.message("You feel faint."),
            },
            HungerEvent::Fainted(_) => state.message("You faint from lack of food."),
            HungerEvent::Starved => {
                state.message("You die from starvation.");
                state.die("starved to death");
                return;
            }
        }

        state.check_player_links();

        if state.rng.one_in(state.options.spawn_rate.max(1)) {
            spawn_random_monster(state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monster::{Monster, MonsterId, race_by_name};
    use crate::object::kinds;
    use crate::player::Encumbrance;

    fn state() -> GameState {
        GameState::new(GameRng::new(42), GameOptions::default()).unwrap()
    }

    /// A loop whose floor holds one jackal next to the player and nothing else
    fn jackal_loop(player_movement: i16, jackal_movement: i16) -> (GameLoop, MonsterId) {
        let options = GameOptions {
            pet: false,
            max_monsters: 0,
            ..Default::default()
        };
        let mut s = GameState::new(GameRng::new(42), options).unwrap();
        for id in s.current_level.monster_ids() {
            s.current_level.remove_monster(id);
        }
        let pos = s
            .current_level
            .enexto(s.player.pos, Some(s.player.pos), &mut s.rng)
            .unwrap();
        let mut jackal = Monster::new(MonsterId::NONE, race_by_name("jackal").unwrap(), pos);
        jackal.movement = jackal_movement;
        let id = s.current_level.add_monster(jackal);
        s.player.movement = player_movement;
        (GameLoop::new(s), id)
    }

    fn movement_of(game: &GameLoop, id: MonsterId) -> i16 {
        game.state().current_level.monster(id).unwrap().movement
    }

    #[test]
    fn test_new_game_places_player_on_upstairs() {
        let s = state();
        assert_eq!(Some(s.player.pos), s.current_level.find_upstairs());
        assert!(s.current_level.monster_at(s.player.pos).is_none());
        assert!(s.inventory.iter().any(|o| o.is_wielded()));
        assert!(!s.messages.is_empty());
    }

    #[test]
    fn test_unknown_role_is_an_error() {
        let options = GameOptions {
            role: Some(String::from("plumber")),
            ..Default::default()
        };
        assert!(matches!(
            GameState::new(GameRng::new(1), options),
            Err(GameError::UnknownName { kind: "role", .. })
        ));
    }

    #[test]
    fn test_pet_starts_next_to_player() {
        let s = state();
        let pet = s.current_level.monsters.iter().find(|m| m.state.tame).unwrap();
        assert!(pet.pos.is_adjacent(s.player.pos));
    }

    #[test]
    fn test_inventory_merges_and_letters() {
        let mut s = state();
        s.inventory.clear();
        let a = s.add_to_inventory(Object::new(kinds::DART, 5)).unwrap();
        let b = s.add_to_inventory(Object::new(kinds::DART, 3)).unwrap();
        assert_eq!(a, b);
        assert_eq!(s.inventory[0].quantity, 8);
        let c = s.add_to_inventory(Object::new(kinds::APPLE, 1)).unwrap();
        assert_eq!(c, 'b');
        let gold = s.player.gold;
        assert_eq!(s.add_to_inventory(Object::gold(7)).unwrap(), '$');
        assert_eq!(s.player.gold, gold + 7);
    }

    #[test]
    fn test_message_history_is_capped() {
        let mut s = state();
        for i in 0..(MSG_HISTORY + 20) {
            s.message(format!("m{i}"));
        }
        assert_eq!(s.message_history.len(), MSG_HISTORY);
        assert!(!s.take_messages().is_empty());
        assert!(s.messages.is_empty());
    }

    #[test]
    fn test_change_level_stashes_and_restores() {
        let mut s = state();
        assert!(!s.change_level(-1));
        let first_rooms = s.current_level.rooms.clone();
        assert!(s.change_level(1));
        assert_eq!(s.current_level.depth, 2);
        assert_eq!(Some(s.player.pos), s.current_level.find_upstairs());
        assert_eq!(s.player.max_depth, 2);
        assert!(s.change_level(-1));
        assert_eq!(s.current_level.depth, 1);
        assert_eq!(s.current_level.rooms, first_rooms);
        assert_eq!(Some(s.player.pos), s.current_level.find_downstairs());
    }

    #[test]
    fn test_adjacent_pet_follows() {
        let mut s = state();
        assert!(s.change_level(1));
        assert!(s.current_level.monsters.iter().any(|m| m.state.tame));
        assert!(
            s.current_level
                .check_invariants(s.player.pos, None)
                .is_empty()
        );
    }

    #[test]
    fn test_rest_advances_turns() {
        let mut game = GameLoop::new(state());
        let start = game.state().turns;
        for _ in 0..5 {
            if game.tick(Command::Rest) != GameLoopResult::Continue {
                break;
            }
        }
        assert!(game.state().turns > start);
    }

    #[test]
    fn test_quit() {
        let mut game = GameLoop::new(state());
        assert_eq!(game.tick(Command::Quit), GameLoopResult::PlayerQuit);
    }

    #[test]
    fn test_dead_player_stays_dead() {
        let mut game = GameLoop::new(state());
        game.state_mut().die("killed by a test");
        assert_eq!(
            game.tick(Command::Rest),
            GameLoopResult::PlayerDied(String::from("killed by a test"))
        );
    }

    #[test]
    fn test_helpless_player_loses_turns() {
        let mut game = GameLoop::new(state());
        game.state_mut()
            .player
            .properties
            .set_timeout(crate::player::Property::Asleep, 5);
        let start = game.state().turns;
        game.tick(Command::Rest);
        assert!(game.state().turns >= start + 5);
        assert!(!game.state().player.is_helpless() || game.state().is_over());
    }

    #[test]
    fn test_monsters_move_between_fast_player_actions() {
        let (mut game, jackal) = jackal_loop(2 * NORMAL_SPEED, NORMAL_SPEED);
        let start = game.state().turns;
        assert_eq!(game.tick(Command::Rest), GameLoopResult::Continue);
        assert_eq!(game.state().player.movement, NORMAL_SPEED);
        assert_eq!(movement_of(&game, jackal), 0);
        assert_eq!(game.state().turns, start);
    }

    #[test]
    fn test_fast_monster_spends_all_its_energy_before_new_turn() {
        let (mut game, jackal) = jackal_loop(NORMAL_SPEED, 2 * NORMAL_SPEED);
        let start = game.state().turns;
        assert_eq!(game.tick(Command::Rest), GameLoopResult::Continue);
        assert_eq!(game.state().turns, start + 1);
        // two banked actions before the new turn, then one more after it
        assert_eq!(movement_of(&game, jackal), 0);
        assert_eq!(game.state().player.movement, NORMAL_SPEED);
    }

    #[test]
    fn test_burdened_player_waits_extra_turns() {
        let (mut game, jackal) = jackal_loop(NORMAL_SPEED, 0);
        game.state_mut().player.encumbrance = Encumbrance::Burdened;
        let start = game.state().turns;
        assert_eq!(game.tick(Command::Rest), GameLoopResult::Continue);
        // 9 energy a turn: two turns pass and the jackal acts in each
        assert_eq!(game.state().turns, start + 2);
        assert_eq!(game.state().player.movement, 18);
        assert_eq!(movement_of(&game, jackal), 0);
    }
}
