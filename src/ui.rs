//! On-screen buttons for the gated phases
//!
//! Layout is relative to the arena center. Which buttons exist depends on the
//! session phase; hit-testing only considers the visible ones.

use glam::Vec2;

use crate::GameConfig;
use crate::sim::challenge::hint_letter;
use crate::sim::collision::Rect;
use crate::sim::{GamePhase, GameState};

/// Clickable controls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Reveal the riddle hint
    Hint,
    /// Full restart, offered in the gate after a wrong answer
    GateRestart,
    /// Go back one level, offered in the gate after a wrong answer
    PreviousLevel,
    /// Retry the current level from GameOver
    TryAgain,
    /// Full restart from GameOver
    Restart,
    /// Full restart from the win screen
    WinRestart,
}

impl Button {
    pub fn label(&self) -> &'static str {
        match self {
            Button::Hint => "Hint",
            Button::GateRestart | Button::Restart | Button::WinRestart => "Restart",
            Button::PreviousLevel => "Previous Level",
            Button::TryAgain => "Try Again",
        }
    }
}

/// Screen rectangle of a button
pub fn button_rect(button: Button, config: &GameConfig) -> Rect {
    let cx = config.arena_width / 2.0;
    let cy = config.arena_height / 2.0;
    match button {
        Button::Hint => Rect::new(cx - 60.0, cy + 40.0, 120.0, 40.0),
        Button::GateRestart => Rect::new(cx - 190.0, cy + 150.0, 180.0, 40.0),
        Button::PreviousLevel => Rect::new(cx + 10.0, cy + 150.0, 180.0, 40.0),
        Button::TryAgain => Rect::new(cx - 120.0, cy + 50.0, 100.0, 50.0),
        Button::Restart => Rect::new(cx + 20.0, cy + 50.0, 100.0, 50.0),
        Button::WinRestart => Rect::new(cx - 60.0, cy + 40.0, 120.0, 50.0),
    }
}

/// Buttons shown for the current state, in draw order
pub fn visible_buttons(state: &GameState) -> Vec<Button> {
    let mut buttons = Vec::new();
    match state.phase {
        GamePhase::ChallengeGate => {
            if let Some(gate) = &state.gate {
                if gate.hint_offered {
                    buttons.push(Button::Hint);
                }
                if gate.wrong_attempts > 0 {
                    buttons.push(Button::GateRestart);
                    if state.level_index > 0 {
                        buttons.push(Button::PreviousLevel);
                    }
                }
            }
        }
        GamePhase::GameOver => {
            buttons.push(Button::TryAgain);
            buttons.push(Button::Restart);
        }
        GamePhase::Complete if state.finale.showing_win => buttons.push(Button::WinRestart),
        _ => {}
    }
    buttons
}

/// Visible button under a point, if any
pub fn button_at(state: &GameState, point: Vec2) -> Option<Button> {
    visible_buttons(state)
        .into_iter()
        .find(|&b| button_rect(b, &state.config).contains(point))
}

/// Whether the pointer hovers over a button
pub fn is_hovered(state: &GameState, button: Button) -> bool {
    state
        .pointer
        .is_some_and(|p| button_rect(button, &state.config).contains(p))
}

/// Hint line for an answer ("Hint: E...")
pub fn hint_text(answer: &str) -> Option<String> {
    hint_letter(answer).map(|c| format!("Hint: {c}..."))
}
