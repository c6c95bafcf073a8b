//! Plain-text rendering of the map, status lines and inventory

use delve_core::dungeon::Position;
use delve_core::player::{Attribute, Encumbrance, HungerState};
use delve_core::{COLNO, GameState, ROWNO, S_PLAYER, S_TRAP};

/// Glyph shown at a map position, topmost first: player, monster, object,
/// known trap, terrain
fn glyph_at(state: &GameState, pos: Position) -> char {
    let level = &state.current_level;
    if pos == state.player.pos {
        return S_PLAYER;
    }
    if let Some(mon) = level.monster_at(pos)
        && !mon.state.invisible
    {
        return mon.data().symbol;
    }
    if let Some(obj) = level.objects_at(pos).last() {
        return obj.class().symbol();
    }
    if level.trap_at(pos).is_some_and(|t| t.seen) {
        return S_TRAP;
    }
    level.cell(pos).symbol()
}

/// The whole level as ROWNO lines of text
pub fn map(state: &GameState) -> String {
    let mut out = String::with_capacity((COLNO + 1) * ROWNO);
    for y in 0..ROWNO {
        let row: String = (1..COLNO)
            .map(|x| glyph_at(state, Position::new(x as i8, y as i8)))
            .collect();
        out.push_str(&row);
        if y + 1 < ROWNO {
            out.push('\n');
        }
    }
    out
}

/// The two bottom status lines
pub fn status(state: &GameState) -> String {
    let you = &state.player;
    let attrs: Vec<String> = Attribute::ALL
        .iter()
        .map(|a| format!("{}:{}", a.short_name(), you.attr(*a)))
        .collect();
    let mut second = format!(
        "Dlvl:{} $:{} HP:{}({}) Pw:{}({}) AC:{} Xp:{}/{} T:{}",
        state.current_level.depth,
        you.gold,
        you.hp,
        you.hp_max,
        you.energy,
        you.energy_max,
        you.armor_class,
        you.exp_level,
        you.exp,
        state.turns,
    );
    if you.hunger_state != HungerState::NotHungry {
        second.push(' ');
        second.push_str(&you.hunger_state.to_string());
    }
    if you.encumbrance != Encumbrance::Unencumbered {
        second.push(' ');
        second.push_str(&you.encumbrance.to_string());
    }
    for (flag, label) in [
        (you.is_confused(), "Conf"),
        (you.is_stunned(), "Stun"),
        (you.is_blind(), "Blind"),
    ] {
        if flag {
            second.push(' ');
            second.push_str(label);
        }
    }
    format!(
        "{} the {} {}\n{}",
        you.name,
        you.role,
        attrs.join(" "),
        second
    )
}

/// Inventory listing, one item per line
pub fn inventory(state: &GameState) -> String {
    if state.inventory.is_empty() && state.player.gold == 0 {
        return String::from("Not carrying anything.");
    }
    let mut lines = Vec::new();
    if state.player.gold > 0 {
        lines.push(format!("$ - {} gold pieces", state.player.gold));
    }
    for obj in &state.inventory {
        lines.push(format!("{} - {}", obj.inv_letter, obj.doname()));
    }
    lines.join("\n")
}
