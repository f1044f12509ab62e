//! Fixed-rate simulation tick
//!
//! One call per rendered frame. The current phase decides what runs: only
//! `Playing` advances entities; the other phases consume input and animate.

use glam::Vec2;
use rand::Rng;

use super::challenge::{answers_match, normalize_answer};
use super::collision::Rect;
use super::state::{
    Finale, GameEvent, GamePhase, GameState, GateState, Hazard, HazardKind, Pickup, TrailPoint,
};
use crate::IntroStyle;
use crate::consts::*;
use crate::ui::{self, Button};

/// Movement keys held during this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeldKeys {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl HeldKeys {
    /// Per-axis direction, each component -1, 0 or 1
    pub fn direction(&self) -> Vec2 {
        let axis = |neg: bool, pos: bool| (pos as i8 - neg as i8) as f32;
        Vec2::new(axis(self.left, self.right), axis(self.up, self.down))
    }
}

/// Discrete key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPress {
    /// Printable character (answer typing, `r` to restart)
    Char(char),
    Backspace,
    /// Submit the typed answer
    Enter,
}

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub held: HeldKeys,
    /// Key presses in arrival order
    pub keys: Vec<KeyPress>,
    /// Pointer click position this tick
    pub click: Option<Vec2>,
    /// Pointer hover position, if it moved
    pub pointer: Option<Vec2>,
    /// Idle/demo mode - the autopilot plays the game
    pub idle_mode: bool,
}

/// Advance the session by one tick
pub fn tick(state: &mut GameState, input: &TickInput) {
    if let Some(pointer) = input.pointer {
        state.pointer = Some(pointer);
    }

    let input = if input.idle_mode {
        autopilot(state)
    } else {
        input.clone()
    };

    state.time_ticks += 1;

    match state.phase {
        GamePhase::LevelIntro => tick_intro(state),
        GamePhase::Playing => tick_playing(state, &input),
        GamePhase::ChallengeGate => tick_gate(state, &input),
        GamePhase::GameOver => tick_game_over(state, &input),
        GamePhase::Complete => tick_complete(state, &input),
    }
}

/// Reset per-level state for `state.level_index` and enter `LevelIntro`
pub fn start_level(state: &mut GameState) {
    generate_level(state);
    begin_intro(state);
    let level = state.level_index;
    if let Some(def) = state.current_level() {
        log::info!(
            "Level {} ({}): {} rocks, {} vortices, {} pickups on field, threshold {}",
            level + 1,
            def.name,
            def.rocks,
            def.vortices,
            def.field_pickups,
            def.threshold(state.config.points_per_pickup)
        );
    }
    state.events.push(GameEvent::LevelStarted { level });
}

/// Regenerate hazards and pickups for the current level
///
/// Both keep clear of the spot where play begins, wherever the intro puts
/// the craft meanwhile.
pub fn generate_level(state: &mut GameState) {
    let Some(def) = state.current_level() else {
        return;
    };
    let (rocks, vortices, field_pickups) = (def.rocks, def.vortices, def.field_pickups);

    state.score = 0;
    state.gate = None;
    state.player.pos = intro_start(state);

    let start = play_start(state);
    let clear_zone = Rect::centered(start, state.player.radius * 3.0);

    state.hazards.clear();
    for _ in 0..rocks {
        spawn_hazard(state, HazardKind::Rock, Some(clear_zone));
    }
    for _ in 0..vortices {
        spawn_hazard(state, HazardKind::Vortex, None);
    }

    state.pickups.clear();
    for _ in 0..field_pickups {
        let id = state.next_entity_id();
        let pickup = Pickup::spawn(id, &mut state.rng, start, &state.config);
        state.pickups.push(pickup);
    }
}

fn spawn_hazard(state: &mut GameState, kind: HazardKind, keep_clear: Option<Rect>) {
    let id = state.next_entity_id();
    let (w, h) = (state.config.arena_width, state.config.arena_height);
    let hazard = Hazard::spawn(id, kind, &mut state.rng, w, h, keep_clear);
    state.hazards.push(hazard);
}

/// Craft position when `Playing` begins
fn play_start(state: &GameState) -> Vec2 {
    Vec2::new(
        state.config.arena_width / 2.0,
        state.config.arena_height / 2.0,
    )
}

/// Craft position at the start of an intro
fn intro_start(state: &GameState) -> Vec2 {
    let (w, h) = (state.config.arena_width, state.config.arena_height);
    match state.config.intro {
        IntroStyle::FlyIn { .. } => Vec2::new(0.0, h / 2.0),
        IntroStyle::Timed { .. } => Vec2::new(w / 2.0, h / 2.0),
    }
}

fn begin_intro(state: &mut GameState) {
    state.phase = GamePhase::LevelIntro;
    state.intro_ticks = 0;
    state.player.pos = intro_start(state);
}

fn tick_intro(state: &mut GameState) {
    let mid_x = state.config.arena_width / 2.0;
    let done = match state.config.intro {
        IntroStyle::FlyIn { speed } => {
            state.player.pos.x = (state.player.pos.x + speed).min(mid_x);
            state.player.pos.x >= mid_x
        }
        IntroStyle::Timed { ticks } => {
            state.intro_ticks += 1;
            state.intro_ticks >= ticks
        }
    };
    if done {
        log::debug!("Intro finished after {} ticks", state.time_ticks);
        state.phase = GamePhase::Playing;
    }
}

fn tick_playing(state: &mut GameState, input: &TickInput) {
    let (w, h) = (state.config.arena_width, state.config.arena_height);

    state.player.step(input.held.direction(), w, h);

    // Stochastic extra hazard
    let chance = state.config.spawn_chance;
    if chance > 0 && state.rng.random_range(0..chance) == 0 {
        let kind = if state.rng.random_bool(0.5) {
            HazardKind::Rock
        } else {
            HazardKind::Vortex
        };
        let zone = Rect::centered(state.player.pos, state.player.radius * 3.0);
        spawn_hazard(state, kind, Some(zone));
        log::debug!("Spawned extra {:?} ({} hazards)", kind, state.hazards.len());
    }

    // Hazards: each may count as a crash once in its lifetime
    let footprint = state.player.footprint();
    let mut crashed = 0;
    for hazard in &mut state.hazards {
        hazard.update(&mut state.rng, w, h);
        if !hazard.already_hit && hazard.footprint().intersects(&footprint) {
            hazard.already_hit = true;
            crashed += 1;
        }
    }
    for _ in 0..crashed {
        if register_crash(state) {
            return;
        }
    }

    // Pickups: capture against a snapshot, replace each in place
    let captured: Vec<usize> = state
        .pickups
        .iter()
        .enumerate()
        .filter(|(_, p)| p.footprint().intersects(&footprint))
        .map(|(i, _)| i)
        .collect();
    for index in captured {
        let id = state.next_entity_id();
        let replacement = Pickup::spawn(id, &mut state.rng, state.player.pos, &state.config);
        state.pickups[index] = replacement;
        state.score += state.config.points_per_pickup;
        state.events.push(GameEvent::PickupCollected { score: state.score });
        log::debug!("Pickup captured, score {}", state.score);
    }

    if state.score >= state.threshold() {
        open_gate(state);
    }
}

/// Count one crash; returns true if the session ended
fn register_crash(state: &mut GameState) -> bool {
    state.player.crashes += 1;
    let crashes = state.player.crashes;
    state.events.push(GameEvent::Crashed { crashes });
    log::debug!("Crash {}/{}", crashes, state.config.crash_limit);
    if crashes >= state.config.crash_limit {
        enter_game_over(state);
        true
    } else {
        false
    }
}

fn open_gate(state: &mut GameState) {
    match state.bank.draw(&mut state.rng) {
        Some(challenge) => {
            log::info!(
                "Level {} threshold reached ({}), riddle gate open",
                state.level_index + 1,
                state.score
            );
            state.gate = Some(GateState::new(challenge, state.config.hint_button));
            state.phase = GamePhase::ChallengeGate;
            state.events.push(GameEvent::ChallengeOpened);
        }
        None => {
            // Unreachable with a validated config; advance without a riddle.
            log::warn!("Riddle pool empty, skipping gate");
            advance_level(state);
        }
    }
}

fn tick_gate(state: &mut GameState, input: &TickInput) {
    for key in &input.keys {
        let Some(gate) = state.gate.as_mut() else {
            return;
        };
        match *key {
            KeyPress::Char(c) if !c.is_control() => gate.answer.push(c),
            KeyPress::Char(_) => {}
            KeyPress::Backspace => {
                gate.answer.pop();
            }
            KeyPress::Enter => {
                submit_answer(state);
                if state.phase != GamePhase::ChallengeGate {
                    return;
                }
            }
        }
    }

    if let Some(click) = input.click {
        match ui::button_at(state, click) {
            Some(Button::Hint) => {
                if let Some(gate) = state.gate.as_mut() {
                    gate.reveal_hint();
                    state.events.push(GameEvent::HintRevealed);
                }
            }
            Some(Button::GateRestart) => state.reset(),
            Some(Button::PreviousLevel) => retry_previous_level(state),
            _ => {}
        }
    }
}

/// Check the typed answer against the current riddle
pub fn submit_answer(state: &mut GameState) {
    let Some(gate) = state.gate.as_mut() else {
        return;
    };

    if answers_match(&gate.challenge.answer, &gate.answer) {
        log::info!("Riddle solved: {}", normalize_answer(&gate.answer));
        advance_level(state);
        return;
    }

    gate.wrong_attempts += 1;
    gate.answer.clear();
    let attempts = gate.wrong_attempts;
    if attempts >= state.config.hint_threshold && !gate.hint_revealed {
        gate.reveal_hint();
        state.events.push(GameEvent::HintRevealed);
    }
    state.events.push(GameEvent::WrongAnswer { attempts });
    log::debug!("Wrong answer ({attempts} so far)");

    if state.config.wrong_answer_costs_crash {
        register_crash(state);
    }
}

/// Commit the level score and move to the next level or the finale
fn advance_level(state: &mut GameState) {
    let level = state.level_index;
    let score = state.score;
    state.ledger.push(score);
    state.events.push(GameEvent::LevelCleared { level, score });
    state.score = 0;
    state.gate = None;
    state.level_index += 1;

    if state.level_index >= state.config.levels.len() {
        let total = state.ledger_total();
        log::info!("Run complete: ledger {:?}, total {}", state.ledger, total);
        state.phase = GamePhase::Complete;
        state.finale = Finale::new(state.config.finale_flyby);
        state.events.push(GameEvent::RunComplete { total });
    } else {
        start_level(state);
    }
}

fn enter_game_over(state: &mut GameState) {
    log::info!(
        "Game over on level {} (score {}, ledger total {})",
        state.level_index + 1,
        state.score,
        state.ledger_total()
    );
    state.phase = GamePhase::GameOver;
    state.gate = None;
    state.events.push(GameEvent::GameOver);
}

fn tick_game_over(state: &mut GameState, input: &TickInput) {
    if restart_requested(input) {
        state.reset();
        return;
    }
    if let Some(click) = input.click {
        match ui::button_at(state, click) {
            Some(Button::TryAgain) => retry(state),
            Some(Button::Restart) => state.reset(),
            _ => {}
        }
    }
}

/// Replay the current level: fresh entities, score and crashes zeroed,
/// ledger and level index untouched
pub fn retry(state: &mut GameState) {
    log::info!("Retrying level {}", state.level_index + 1);
    state.player.crashes = 0;
    generate_level(state);
    if state.config.retry_replays_intro {
        begin_intro(state);
    } else {
        state.player.pos = play_start(state);
        state.phase = GamePhase::Playing;
    }
    state.events.push(GameEvent::LevelStarted {
        level: state.level_index,
    });
}

/// Step back one level, dropping its ledger entry; no-op on the first level
pub fn retry_previous_level(state: &mut GameState) {
    if state.level_index == 0 {
        return;
    }
    state.level_index -= 1;
    state.ledger.pop();
    state.player.crashes = 0;
    log::info!("Back to level {}", state.level_index + 1);
    start_level(state);
}

fn tick_complete(state: &mut GameState, input: &TickInput) {
    if restart_requested(input) {
        state.reset();
        return;
    }
    if let Some(click) = input.click
        && ui::button_at(state, click) == Some(Button::WinRestart)
    {
        state.reset();
        return;
    }

    let finale = &mut state.finale;
    if finale.showing_win {
        return;
    }
    finale.craft_x += FINALE_SPEED;
    for point in &mut finale.trail {
        point.alpha = point.alpha.saturating_sub(FINALE_TRAIL_FADE);
    }
    finale.trail.retain(|p| p.alpha > 0);
    finale.trail.push(TrailPoint {
        x: finale.craft_x,
        alpha: u8::MAX - FINALE_TRAIL_FADE,
    });
    if finale.craft_x > state.config.arena_width + FINALE_EXIT_MARGIN {
        finale.hold_ticks += 1;
        if finale.hold_ticks > FINALE_HOLD_TICKS {
            finale.showing_win = true;
        }
    }
}

fn restart_requested(input: &TickInput) -> bool {
    input
        .keys
        .iter()
        .any(|k| matches!(k, KeyPress::Char('r' | 'R')))
}

/// Distance at which the autopilot starts steering away from a hazard
const AVOID_RADIUS: f32 = 90.0;

/// Demo input: chase the nearest pickup, dodge nearby hazards, answer riddles
fn autopilot(state: &GameState) -> TickInput {
    let mut input = TickInput::default();
    match state.phase {
        GamePhase::Playing => {
            let pos = state.player.pos;
            let mut steer = state
                .pickups
                .iter()
                .min_by(|a, b| {
                    a.pos
                        .distance_squared(pos)
                        .partial_cmp(&b.pos.distance_squared(pos))
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
                .map(|p| (p.pos - pos).normalize_or_zero())
                .unwrap_or(Vec2::ZERO);

            for hazard in state.hazards.iter().filter(|h| !h.already_hit) {
                let away = pos - hazard.center();
                let reach = AVOID_RADIUS + hazard.size / 2.0;
                let dist = away.length();
                if dist < reach {
                    steer += away.normalize_or_zero() * (reach - dist) / reach * 2.0;
                }
            }

            let dead_zone = 0.2;
            input.held = HeldKeys {
                up: steer.y < -dead_zone,
                down: steer.y > dead_zone,
                left: steer.x < -dead_zone,
                right: steer.x > dead_zone,
            };
        }
        GamePhase::ChallengeGate => {
            if let Some(gate) = &state.gate {
                input.keys = gate.challenge.answer.chars().map(KeyPress::Char).collect();
                input.keys.push(KeyPress::Enter);
            }
        }
        GamePhase::GameOver => {
            input.click = Some(ui::button_rect(Button::TryAgain, &state.config).center());
        }
        GamePhase::LevelIntro | GamePhase::Complete => {}
    }
    input
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GameConfig;
    use crate::tuning::{Challenge, LevelDef};
    use proptest::prelude::*;

    /// Quiet config: no stochastic spawns, one known riddle, timed zero-length intro
    fn test_config() -> GameConfig {
        GameConfig {
            spawn_chance: 0,
            intro: IntroStyle::Timed { ticks: 1 },
            challenges: vec![Challenge::new("What has a neck but no head?", "echo")],
            ..GameConfig::default()
        }
    }

    fn playing_state(config: GameConfig) -> GameState {
        let mut state = GameState::new(config, 1234);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::Playing);
        state
    }

    /// Clear the field and drop a pickup on the player
    fn place_pickup_on_player(state: &mut GameState) {
        let pos = state.player.pos;
        state.pickups[0].pos = pos;
    }

    fn empty_field(state: &mut GameState) {
        state.hazards.clear();
        let far = Vec2::new(-1000.0, -1000.0);
        for p in &mut state.pickups {
            p.pos = far;
        }
    }

    fn type_answer(state: &mut GameState, answer: &str) {
        let mut keys: Vec<KeyPress> = answer.chars().map(KeyPress::Char).collect();
        keys.push(KeyPress::Enter);
        tick(
            state,
            &TickInput {
                keys,
                ..Default::default()
            },
        );
    }

    fn reach_gate(state: &mut GameState) {
        empty_field(state);
        state.score = state.threshold() - state.config.points_per_pickup;
        place_pickup_on_player(state);
        tick(state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::ChallengeGate);
    }

    fn rock_on_player(state: &GameState, id: u32) -> Hazard {
        let size = 40.0;
        Hazard {
            id,
            kind: HazardKind::Rock,
            size,
            pos: state.player.pos - Vec2::splat(size / 2.0),
            vel: Vec2::ZERO,
            spin: 0.0,
            already_hit: false,
        }
    }

    #[test]
    fn test_fly_in_intro_reaches_mid_screen() {
        let config = GameConfig {
            spawn_chance: 0,
            ..GameConfig::default()
        };
        let mut state = GameState::new(config, 9);
        assert_eq!(state.player.pos.x, 0.0);
        let hazards_before: Vec<Vec2> = state.hazards.iter().map(|h| h.pos).collect();

        let mut ticks = 0;
        while state.phase == GamePhase::LevelIntro {
            let input = TickInput {
                held: HeldKeys {
                    up: true,
                    ..Default::default()
                },
                ..Default::default()
            };
            tick(&mut state, &input);
            ticks += 1;
            assert!(ticks <= 100);
        }
        assert_eq!(ticks, 40); // 400px at 10px per tick
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.player.pos, Vec2::new(400.0, 300.0));
        // Frozen during the intro
        let hazards_after: Vec<Vec2> = state.hazards.iter().map(|h| h.pos).collect();
        assert_eq!(hazards_before, hazards_after);
    }

    #[test]
    fn test_timed_intro() {
        let config = GameConfig {
            intro: IntroStyle::Timed { ticks: 3 },
            ..test_config()
        };
        let mut state = GameState::new(config, 9);
        tick(&mut state, &TickInput::default());
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::LevelIntro);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_movement_follows_held_keys() {
        let mut state = playing_state(test_config());
        empty_field(&mut state);
        let start = state.player.pos;
        let input = TickInput {
            held: HeldKeys {
                right: true,
                down: true,
                ..Default::default()
            },
            ..Default::default()
        };
        tick(&mut state, &input);
        assert_eq!(state.player.pos, start + Vec2::new(5.0, 5.0));
    }

    #[test]
    fn test_pickup_capture_scores_and_replaces() {
        let mut state = playing_state(test_config());
        empty_field(&mut state);
        let count = state.pickups.len();
        let old_id = state.pickups[0].id;
        place_pickup_on_player(&mut state);

        tick(&mut state, &TickInput::default());
        assert_eq!(state.score, 10);
        assert_eq!(state.pickups.len(), count);
        assert_ne!(state.pickups[0].id, old_id);
        assert!(state.pickups[0].pos.distance(state.player.pos) > 50.0);
        assert!(state.events.contains(&GameEvent::PickupCollected { score: 10 }));
    }

    #[test]
    fn test_simultaneous_captures_all_count() {
        let mut state = playing_state(test_config());
        empty_field(&mut state);
        let pos = state.player.pos;
        state.pickups[0].pos = pos;
        state.pickups[1].pos = pos + Vec2::new(10.0, 0.0);
        state.pickups[2].pos = pos - Vec2::new(0.0, 10.0);

        tick(&mut state, &TickInput::default());
        assert_eq!(state.score, 30);
        assert_eq!(state.pickups.len(), 5);
    }

    #[test]
    fn test_hazard_crashes_only_once() {
        let mut state = playing_state(test_config());
        empty_field(&mut state);
        let id = state.next_entity_id();
        let rock = rock_on_player(&state, id);
        state.hazards.push(rock);

        for _ in 0..30 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.player.crashes, 1);
        assert!(state.hazards[0].already_hit);
    }

    #[test]
    fn test_crash_limit_ends_on_same_tick() {
        let mut state = playing_state(test_config());
        empty_field(&mut state);
        state.player.crashes = 3;
        for _ in 0..2 {
            let id = state.next_entity_id();
            let rock = rock_on_player(&state, id);
            state.hazards.push(rock);
        }
        tick(&mut state, &TickInput::default());
        assert_eq!(state.player.crashes, 5);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.events.contains(&GameEvent::GameOver));
    }

    #[test]
    fn test_threshold_opens_gate_on_earliest_tick() {
        let mut state = playing_state(test_config());
        empty_field(&mut state);
        state.score = 80;
        place_pickup_on_player(&mut state);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.score, 90);
        assert_eq!(state.phase, GamePhase::Playing);

        // Move the replacement onto the player again
        place_pickup_on_player(&mut state);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.score, 100);
        assert_eq!(state.phase, GamePhase::ChallengeGate);
        let gate = state.gate.as_ref().unwrap();
        assert_eq!(gate.challenge.answer, "echo");
        assert!(gate.hint_offered);
    }

    #[test]
    fn test_gate_freezes_simulation() {
        let mut state = playing_state(test_config());
        reach_gate(&mut state);
        let id = state.next_entity_id();
        let mut rock = rock_on_player(&state, id);
        rock.vel = Vec2::new(1.0, 1.0);
        state.hazards.push(rock);
        let before = state.hazards[0].pos;
        let player = state.player.pos;

        let input = TickInput {
            held: HeldKeys {
                left: true,
                ..Default::default()
            },
            ..Default::default()
        };
        tick(&mut state, &input);
        assert_eq!(state.hazards[0].pos, before);
        assert_eq!(state.player.pos, player);
        assert_eq!(state.player.crashes, 0);
    }

    #[test]
    fn test_typing_and_backspace() {
        let mut state = playing_state(test_config());
        reach_gate(&mut state);
        let input = TickInput {
            keys: vec![
                KeyPress::Char('e'),
                KeyPress::Char('x'),
                KeyPress::Backspace,
                KeyPress::Char('c'),
                KeyPress::Char('\u{8}'),
            ],
            ..Default::default()
        };
        tick(&mut state, &input);
        assert_eq!(state.gate.as_ref().unwrap().answer, "ec");
    }

    #[test]
    fn test_correct_answer_advances_level() {
        let mut state = playing_state(test_config());
        reach_gate(&mut state);
        type_answer(&mut state, " Echo ");
        assert_eq!(state.ledger, vec![100]);
        assert_eq!(state.score, 0);
        assert_eq!(state.level_index, 1);
        assert_eq!(state.phase, GamePhase::LevelIntro);
        assert_eq!(state.pickups.len(), 7);
        assert_eq!(state.hazards.len(), 21);
        assert!(state.gate.is_none());
    }

    #[test]
    fn test_wrong_answer_counts_and_costs_crash() {
        let mut state = playing_state(test_config());
        reach_gate(&mut state);
        type_answer(&mut state, "Echoo");
        let gate = state.gate.as_ref().unwrap();
        assert_eq!(gate.wrong_attempts, 1);
        assert!(gate.answer.is_empty());
        assert_eq!(state.player.crashes, 1);
        assert_eq!(state.phase, GamePhase::ChallengeGate);
    }

    #[test]
    fn test_wrong_answer_free_when_policy_off() {
        let config = GameConfig {
            wrong_answer_costs_crash: false,
            ..test_config()
        };
        let mut state = playing_state(config);
        reach_gate(&mut state);
        for _ in 0..6 {
            type_answer(&mut state, "nope");
        }
        assert_eq!(state.player.crashes, 0);
        assert_eq!(state.phase, GamePhase::ChallengeGate);
    }

    #[test]
    fn test_hint_after_three_wrong_answers() {
        let config = GameConfig {
            hint_button: false,
            ..test_config()
        };
        let mut state = playing_state(config);
        reach_gate(&mut state);
        type_answer(&mut state, "a");
        type_answer(&mut state, "b");
        assert!(!state.gate.as_ref().unwrap().hint_revealed);
        type_answer(&mut state, "c");
        assert!(state.gate.as_ref().unwrap().hint_revealed);
    }

    #[test]
    fn test_hint_button_reveals_hint() {
        let mut state = playing_state(test_config());
        reach_gate(&mut state);
        let click = ui::button_rect(Button::Hint, &state.config).center();
        tick(
            &mut state,
            &TickInput {
                click: Some(click),
                ..Default::default()
            },
        );
        let gate = state.gate.as_ref().unwrap();
        assert!(gate.hint_revealed);
        assert!(!gate.hint_offered);
    }

    #[test]
    fn test_wrong_answers_in_gate_reach_game_over() {
        let mut state = playing_state(test_config());
        reach_gate(&mut state);
        state.player.crashes = 4;
        type_answer(&mut state, "wrong");
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.gate.is_none());
    }

    #[test]
    fn test_enter_after_submit_is_not_typed_into_next_level() {
        let mut state = playing_state(test_config());
        reach_gate(&mut state);
        let input = TickInput {
            keys: vec![
                KeyPress::Char('e'),
                KeyPress::Char('c'),
                KeyPress::Char('h'),
                KeyPress::Char('o'),
                KeyPress::Enter,
                KeyPress::Char('z'),
            ],
            ..Default::default()
        };
        tick(&mut state, &input);
        assert_eq!(state.level_index, 1);
        assert!(state.gate.is_none());
    }

    #[test]
    fn test_ledger_accumulates_to_complete() {
        let mut state = playing_state(test_config());
        for (level, score) in [100, 120, 150].into_iter().enumerate() {
            if level > 0 {
                tick(&mut state, &TickInput::default());
                assert_eq!(state.phase, GamePhase::Playing);
            }
            empty_field(&mut state);
            state.score = score - 10;
            place_pickup_on_player(&mut state);
            tick(&mut state, &TickInput::default());
            assert_eq!(state.phase, GamePhase::ChallengeGate);
            type_answer(&mut state, "echo");
        }
        assert_eq!(state.phase, GamePhase::Complete);
        assert_eq!(state.ledger, vec![100, 120, 150]);
        assert_eq!(state.ledger_total(), 370);
        assert!(state.events.contains(&GameEvent::RunComplete { total: 370 }));
        assert!(state.current_level().is_none());
    }

    #[test]
    fn test_finale_flyby_then_win_screen() {
        let mut state = playing_state(test_config());
        state.phase = GamePhase::Complete;
        state.finale = Finale::new(true);
        let mut ticks = 0;
        while !state.finale.showing_win {
            tick(&mut state, &TickInput::default());
            ticks += 1;
            assert!(ticks < 1000);
        }
        assert!(state.finale.craft_x > 1000.0);
        assert!(state.finale.trail.len() <= 26);
        assert!(state.finale.trail.iter().all(|p| p.alpha > 0));
        assert_eq!(state.phase, GamePhase::Complete);
    }

    #[test]
    fn test_retry_keeps_ledger_and_level() {
        let mut state = playing_state(test_config());
        reach_gate(&mut state);
        type_answer(&mut state, "echo");
        tick(&mut state, &TickInput::default());
        empty_field(&mut state);
        state.score = 40;
        state.player.crashes = 4;
        let id = state.next_entity_id();
        let rock = rock_on_player(&state, id);
        state.hazards.push(rock);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::GameOver);

        let click = ui::button_rect(Button::TryAgain, &state.config).center();
        tick(
            &mut state,
            &TickInput {
                click: Some(click),
                ..Default::default()
            },
        );
        assert_eq!(state.phase, GamePhase::LevelIntro);
        assert_eq!(state.level_index, 1);
        assert_eq!(state.ledger, vec![100]);
        assert_eq!(state.score, 0);
        assert_eq!(state.player.crashes, 0);
        assert_eq!(state.pickups.len(), 7);
    }

    #[test]
    fn test_retry_resumes_play_when_intro_skipped() {
        let config = GameConfig {
            retry_replays_intro: false,
            ..test_config()
        };
        let mut state = playing_state(config);
        state.phase = GamePhase::GameOver;
        retry(&mut state);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.player.pos, Vec2::new(400.0, 300.0));
    }

    #[test]
    fn test_retry_without_intro_keeps_pickups_clear_of_craft() {
        // Fly-in intros start the craft at the left edge, play resumes mid-screen
        let config = GameConfig {
            retry_replays_intro: false,
            spawn_chance: 0,
            ..GameConfig::default()
        };
        let min_distance = config.pickup_min_player_distance;
        for seed in 0..200 {
            let mut state = GameState::new(config.clone(), seed);
            state.phase = GamePhase::GameOver;
            retry(&mut state);
            assert_eq!(state.phase, GamePhase::Playing);
            for pickup in &state.pickups {
                assert!(pickup.pos.distance(state.player.pos) > min_distance);
            }
        }
    }

    #[test]
    fn test_fly_in_pickups_clear_of_arrival_point() {
        let config = GameConfig {
            spawn_chance: 0,
            ..GameConfig::default()
        };
        for seed in 0..50 {
            let mut state = GameState::new(config.clone(), seed);
            while state.phase == GamePhase::LevelIntro {
                tick(&mut state, &TickInput::default());
            }
            for pickup in &state.pickups {
                assert!(pickup.pos.distance(state.player.pos) > 50.0);
            }
        }
    }

    #[test]
    fn test_restart_resets_fully() {
        let mut state = playing_state(test_config());
        reach_gate(&mut state);
        type_answer(&mut state, "echo");
        state.player.crashes = 5;
        state.phase = GamePhase::GameOver;
        let old_positions: Vec<Vec2> = state.hazards.iter().map(|h| h.pos).collect();

        tick(
            &mut state,
            &TickInput {
                keys: vec![KeyPress::Char('r')],
                ..Default::default()
            },
        );
        assert_eq!(state.phase, GamePhase::LevelIntro);
        assert_eq!(state.level_index, 0);
        assert!(state.ledger.is_empty());
        assert_eq!(state.score, 0);
        assert_eq!(state.player.crashes, 0);
        assert_eq!(state.hazards.len(), 17);
        assert_eq!(state.pickups.len(), 5);
        let new_positions: Vec<Vec2> = state.hazards.iter().map(|h| h.pos).collect();
        assert_ne!(old_positions, new_positions);
        assert_eq!(state.hazards[0].id, 1);
        assert_eq!(state.riddles_remaining(), 1);
    }

    #[test]
    fn test_restart_button_from_complete() {
        let config = GameConfig {
            finale_flyby: false,
            ..test_config()
        };
        let mut state = playing_state(config);
        state.ledger = vec![100, 120, 150];
        state.level_index = 3;
        state.phase = GamePhase::Complete;
        state.finale = Finale::new(false);
        let click = ui::button_rect(Button::WinRestart, &state.config).center();
        tick(
            &mut state,
            &TickInput {
                click: Some(click),
                ..Default::default()
            },
        );
        assert_eq!(state.phase, GamePhase::LevelIntro);
        assert_eq!(state.level_index, 0);
        assert!(state.ledger.is_empty());
    }

    #[test]
    fn test_previous_level_button_after_wrong_answer() {
        let mut state = playing_state(test_config());
        reach_gate(&mut state);
        type_answer(&mut state, "echo");
        tick(&mut state, &TickInput::default());
        reach_gate(&mut state);

        // Not offered before a wrong answer
        let click = ui::button_rect(Button::PreviousLevel, &state.config).center();
        let input = TickInput {
            click: Some(click),
            ..Default::default()
        };
        tick(&mut state, &input);
        assert_eq!(state.level_index, 1);

        type_answer(&mut state, "wrong");
        tick(&mut state, &input);
        assert_eq!(state.level_index, 0);
        assert!(state.ledger.is_empty());
        assert_eq!(state.phase, GamePhase::LevelIntro);
        assert_eq!(state.player.crashes, 0);
    }

    #[test]
    fn test_previous_level_noop_on_first_level() {
        let mut state = playing_state(test_config());
        retry_previous_level(&mut state);
        assert_eq!(state.level_index, 0);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_riddles_not_repeated_within_pass() {
        let config = GameConfig {
            challenges: vec![
                Challenge::new("a?", "alpha"),
                Challenge::new("b?", "bravo"),
                Challenge::new("c?", "charlie"),
            ],
            levels: vec![LevelDef::new("Only", [0, 0, 0], 1, 3, 0, 0); 3],
            ..test_config()
        };
        let mut state = playing_state(config);
        let mut seen = Vec::new();
        for _ in 0..3 {
            if state.phase == GamePhase::LevelIntro {
                tick(&mut state, &TickInput::default());
            }
            reach_gate(&mut state);
            let answer = state.gate.as_ref().unwrap().challenge.answer.clone();
            assert!(!seen.contains(&answer));
            seen.push(answer.clone());
            type_answer(&mut state, &answer);
        }
        assert_eq!(state.phase, GamePhase::Complete);
    }

    #[test]
    fn test_stochastic_spawns_add_hazards() {
        let config = GameConfig {
            spawn_chance: 1,
            ..test_config()
        };
        let mut state = playing_state(config);
        state.hazards.clear();
        state.player.crashes = 0;
        for _ in 0..10 {
            tick(&mut state, &TickInput::default());
            if state.phase != GamePhase::Playing {
                break;
            }
        }
        assert!(!state.hazards.is_empty());
    }

    #[test]
    fn test_determinism() {
        let run = |seed| {
            let mut state = GameState::new(GameConfig::default(), seed);
            let input = TickInput {
                idle_mode: true,
                ..Default::default()
            };
            for _ in 0..600 {
                tick(&mut state, &input);
            }
            state
        };
        let a = run(99999);
        let b = run(99999);
        assert_eq!(a.time_ticks, b.time_ticks);
        assert_eq!(a.score, b.score);
        assert_eq!(a.phase, b.phase);
        assert_eq!(a.player.pos, b.player.pos);
        assert_eq!(a.hazards.len(), b.hazards.len());
    }

    #[test]
    fn test_autopilot_makes_progress() {
        let mut state = GameState::new(GameConfig::default(), 7);
        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        let mut collected = 0;
        for _ in 0..3000 {
            tick(&mut state, &input);
            collected += state
                .drain_events()
                .iter()
                .filter(|e| matches!(e, GameEvent::PickupCollected { .. }))
                .count();
        }
        assert!(collected > 0);
    }

    proptest! {
        #[test]
        fn prop_pickup_count_invariant(seed in any::<u64>(), moves in prop::collection::vec(0u8..16, 1..200)) {
            let mut state = playing_state_seeded(seed);
            let count = state.pickups.len();
            for bits in moves {
                let input = TickInput {
                    held: HeldKeys {
                        up: bits & 1 != 0,
                        down: bits & 2 != 0,
                        left: bits & 4 != 0,
                        right: bits & 8 != 0,
                    },
                    ..Default::default()
                };
                tick(&mut state, &input);
                if state.phase != GamePhase::Playing {
                    break;
                }
                prop_assert_eq!(state.pickups.len(), count);
            }
        }

        #[test]
        fn prop_hazard_counts_crash_once(seed in any::<u64>(), ticks in 1usize..120) {
            let mut state = playing_state_seeded(seed);
            empty_field(&mut state);
            let id = state.next_entity_id();
            let rock = rock_on_player(&state, id);
            state.hazards.push(rock);
            for _ in 0..ticks {
                tick(&mut state, &TickInput::default());
            }
            prop_assert_eq!(state.player.crashes, 1);
        }

        #[test]
        fn prop_rocks_stay_inside(seed in any::<u64>(), ticks in 1usize..400) {
            let mut state = playing_state_seeded(seed);
            state.player.pos = Vec2::new(-10_000.0, -10_000.0);
            let (w, h) = (state.config.arena_width, state.config.arena_height);
            for _ in 0..ticks {
                for hazard in &mut state.hazards {
                    hazard.update(&mut state.rng, w, h);
                    if hazard.kind == HazardKind::Rock {
                        let r = hazard.footprint();
                        prop_assert!(r.x >= 0.0 && r.right() <= w);
                        prop_assert!(r.y >= 0.0 && r.bottom() <= h);
                    }
                }
            }
        }
    }

    fn playing_state_seeded(seed: u64) -> GameState {
        let mut state = GameState::new(test_config(), seed);
        tick(&mut state, &TickInput::default());
        state
    }

    #[test]
    fn test_rock_reflects_at_edge() {
        let state = playing_state(test_config());
        let mut rock = rock_on_player(&state, 1);
        rock.pos = Vec2::new(800.0 - rock.size - 0.5, 100.0);
        rock.vel = Vec2::new(1.5, 0.0);
        let mut rng = state.rng.clone();
        rock.update(&mut rng, 800.0, 600.0);
        assert_eq!(rock.vel.x, -1.5);
        assert!(rock.footprint().right() <= 800.0);
        rock.update(&mut rng, 800.0, 600.0);
        assert!(rock.footprint().right() <= 800.0);
        assert!(rock.pos.x < 800.0 - rock.size);
    }
}
