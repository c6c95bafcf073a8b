//! Whole-game tests driven through GameLoop::tick

use delve_core::action::{Command, Direction};
use delve_core::dungeon::CellType;
use delve_core::world::GameOptions;
use delve_core::{GameLoop, GameLoopResult, GameRng, GameState, MAX_DEPTH};
use proptest::prelude::*;

/// A game with no pet and no random spawns, its first floor emptied
fn quiet_game(seed: u64) -> GameLoop {
    let options = GameOptions {
        pet: false,
        max_monsters: 0,
        ..Default::default()
    };
    let mut state = GameState::new(GameRng::new(seed), options).unwrap();
    for id in state.current_level.monster_ids() {
        state.current_level.remove_monster(id);
    }
    GameLoop::new(state)
}

fn assert_consistent(state: &GameState) {
    let errors = state
        .current_level
        .check_invariants(state.player.pos, state.player.swallowed_by);
    assert!(errors.is_empty(), "invariants broken: {:?}", errors);
    assert!(state.current_level.is_valid_pos(state.player.pos));
    assert!(state.player.hp <= state.player.hp_max);
    assert!((1..=MAX_DEPTH).contains(&state.current_level.depth));
}

#[test]
fn test_new_game_starts_on_upstairs() {
    let game = GameLoop::new(GameState::new(GameRng::new(1), GameOptions::default()).unwrap());
    let state = game.state();
    assert_eq!(state.current_level.depth, 1);
    assert_eq!(
        state.current_level.cell(state.player.pos).typ,
        CellType::UpStairs
    );
    assert!(!state.inventory.is_empty());
    assert_consistent(state);
}

#[test]
fn test_new_game_for_many_seeds() {
    for seed in 0..100 {
        let state = GameState::new(GameRng::new(seed), GameOptions::default()).unwrap();
        assert_eq!(
            state.current_level.find_upstairs(),
            Some(state.player.pos),
            "seed {seed}"
        );
        assert_consistent(&state);
    }
}

#[test]
fn test_pet_option() {
    let with_pet = GameState::new(GameRng::new(4), GameOptions::default()).unwrap();
    assert!(with_pet.current_level.monsters.iter().any(|m| m.state.tame));

    let game = quiet_game(4);
    assert!(game.state().current_level.monsters.is_empty());
}

#[test]
fn test_resting_advances_turns() {
    let mut game = quiet_game(7);
    let start = game.state().turns;
    for _ in 0..20 {
        assert_eq!(game.tick(Command::Rest), GameLoopResult::Continue);
    }
    assert!(game.state().turns >= start + 10);
    assert_consistent(game.state());
}

#[test]
fn test_free_actions_cost_no_time() {
    let mut game = quiet_game(9);
    let start = game.state().turns;
    game.tick(Command::Wear('z'));
    game.tick(Command::GoDown);
    assert_eq!(game.state().turns, start);
    let messages = game.state_mut().take_messages();
    assert!(messages.iter().any(|m| m == "You can't go down here."));
}

#[test]
fn test_stairs_round_trip_keeps_levels() {
    let mut game = quiet_game(12);
    let down = game.state().current_level.find_downstairs().unwrap();
    game.state_mut().player.pos = down;
    assert_eq!(game.tick(Command::GoDown), GameLoopResult::Continue);
    assert_eq!(game.state().current_level.depth, 2);
    assert_eq!(game.state().player.max_depth, 2);
    assert_consistent(game.state());

    let up = game.state().current_level.find_upstairs().unwrap();
    assert_eq!(game.state().player.pos, up);
    assert_eq!(game.tick(Command::GoUp), GameLoopResult::Continue);
    assert_eq!(game.state().current_level.depth, 1);
    assert_eq!(game.state().player.pos, down);
}

#[test]
fn test_quit() {
    let mut game = quiet_game(3);
    assert_eq!(game.tick(Command::Quit), GameLoopResult::PlayerQuit);
}

#[test]
fn test_same_seed_same_game() {
    let run = |seed| {
        let mut game = GameLoop::new(
            GameState::new(GameRng::new(seed), GameOptions::default()).unwrap(),
        );
        for dir in Direction::ALL.iter().cycle().take(40) {
            if game.tick(Command::Move(*dir)) != GameLoopResult::Continue {
                break;
            }
        }
        let state = game.into_state();
        (state.turns, state.player.pos, state.player.hp, state.message_history)
    };
    assert_eq!(run(77), run(77));
}

fn any_command() -> impl Strategy<Value = Command> {
    let dir = proptest::sample::select(Direction::ALL.to_vec());
    let letter = proptest::sample::select(vec!['a', 'b', 'c', 'd', 'e', '$']);
    prop_oneof![
        4 => dir.clone().prop_map(Command::Move),
        2 => dir.clone().prop_map(Command::Fight),
        1 => Just(Command::Rest),
        1 => Just(Command::Search),
        1 => Just(Command::Pickup),
        1 => Just(Command::GoDown),
        1 => Just(Command::GoUp),
        1 => letter.clone().prop_map(Command::Drop),
        1 => letter.clone().prop_map(Command::Wear),
        1 => letter.clone().prop_map(Command::TakeOff),
        1 => letter.clone().prop_map(|c| Command::Wield(Some(c))),
        1 => letter.clone().prop_map(Command::Quaff),
        1 => letter.clone().prop_map(Command::Eat),
        1 => (letter, dir).prop_map(|(c, d)| Command::Throw(c, d)),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn random_play_keeps_state_consistent(
        seed in any::<u64>(),
        commands in proptest::collection::vec(any_command(), 1..120),
    ) {
        let mut game = GameLoop::new(
            GameState::new(GameRng::new(seed), GameOptions::default()).unwrap(),
        );
        let mut last_turn = game.state().turns;
        for command in commands {
            let result = game.tick(command);
            let state = game.state();
            prop_assert!(state.turns >= last_turn);
            last_turn = state.turns;
            match result {
                GameLoopResult::Continue => {
                    let errors = state
                        .current_level
                        .check_invariants(state.player.pos, state.player.swallowed_by);
                    prop_assert!(errors.is_empty(), "{:?}", errors);
                    prop_assert!(state.player.hp > 0);
                    prop_assert!(state.player.hp <= state.player.hp_max);
                    prop_assert!(state.message_history.len() <= delve_core::MSG_HISTORY);
                }
                GameLoopResult::PlayerDied(_) => {
                    prop_assert!(state.is_over());
                    break;
                }
                GameLoopResult::PlayerQuit => break,
            }
        }
    }
}
