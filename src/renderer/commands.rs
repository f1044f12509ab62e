//! Per-tick draw command list
//!
//! The simulation never draws; this module reads a `GameState` and describes
//! the frame as ordered primitives, back to front.

use glam::Vec2;

use super::vertex::{Color, colors, rgb};
use crate::heading;
use crate::sim::collision::Rect;
use crate::sim::{GamePhase, GameState, HazardKind, Pickup, Player};
use crate::star_vertex;
use crate::ui::{self, Button};

/// Font size class for text commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSize {
    Small,
    Medium,
    Large,
}

/// A single drawing primitive
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Fill the whole arena
    Fill { color: Color },
    Rect { rect: Rect, color: Color },
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    /// Ellipse inscribed in `rect`
    Ellipse { rect: Rect, color: Color },
    Polygon { points: Vec<Vec2>, color: Color },
    Line {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: Color,
    },
    /// Text with its top-left corner at `pos`
    Text {
        text: String,
        pos: Vec2,
        size: TextSize,
        color: Color,
    },
}

/// Characters per line for wrapped riddle prompts
const PROMPT_WRAP: usize = 48;
/// Line height for wrapped small text
const LINE_HEIGHT: f32 = 30.0;

/// Describe the current frame
pub fn build_frame(state: &GameState) -> Vec<DrawCommand> {
    let mut out = Vec::new();
    match state.phase {
        GamePhase::Complete => complete_screen(state, &mut out),
        GamePhase::GameOver => game_over_screen(state, &mut out),
        GamePhase::LevelIntro => {
            backdrop(state, &mut out);
            intro_screen(state, &mut out);
        }
        GamePhase::Playing | GamePhase::ChallengeGate => {
            backdrop(state, &mut out);
            arena(state, &mut out);
            hud(state, &mut out);
            if state.phase == GamePhase::ChallengeGate {
                gate_overlay(state, &mut out);
            }
        }
    }
    out
}

fn text(
    out: &mut Vec<DrawCommand>,
    text: impl Into<String>,
    x: f32,
    y: f32,
    size: TextSize,
    color: Color,
) {
    out.push(DrawCommand::Text {
        text: text.into(),
        pos: Vec2::new(x, y),
        size,
        color,
    });
}

fn backdrop(state: &GameState, out: &mut Vec<DrawCommand>) {
    let color = state
        .current_level()
        .map(|l| rgb(l.backdrop[0], l.backdrop[1], l.backdrop[2]))
        .unwrap_or(colors::BLACK);
    out.push(DrawCommand::Fill { color });
    for &center in &state.starfield {
        out.push(DrawCommand::Circle {
            center,
            radius: 2.0,
            color: colors::WHITE,
        });
    }
}

/// The saucer: hull ellipse plus dome ellipse
pub fn craft(player: &Player, out: &mut Vec<DrawCommand>) {
    let Vec2 { x, y } = player.pos;
    out.push(DrawCommand::Ellipse {
        rect: Rect::new(x - 30.0, y - 15.0, 60.0, 30.0),
        color: colors::CRAFT_HULL,
    });
    out.push(DrawCommand::Ellipse {
        rect: Rect::new(x - 15.0, y - 25.0, 30.0, 20.0),
        color: colors::CRAFT_DOME,
    });
}

/// Five-pointed star outline
pub fn star(pickup: &Pickup) -> DrawCommand {
    DrawCommand::Polygon {
        points: (0..10)
            .map(|i| star_vertex(pickup.pos, pickup.size, i))
            .collect(),
        color: colors::YELLOW,
    }
}

fn arena(state: &GameState, out: &mut Vec<DrawCommand>) {
    for hazard in &state.hazards {
        let center = hazard.center();
        let radius = hazard.size / 2.0;
        match hazard.kind {
            HazardKind::Rock => out.push(DrawCommand::Circle {
                center,
                radius,
                color: colors::GRAY,
            }),
            HazardKind::Vortex => {
                out.push(DrawCommand::Circle {
                    center,
                    radius,
                    color: colors::BLACK,
                });
                out.push(DrawCommand::Line {
                    from: center,
                    to: center + heading(hazard.spin) * radius,
                    width: 3.0,
                    color: colors::RED,
                });
            }
        }
    }
    out.extend(state.pickups.iter().map(star));
    craft(&state.player, out);
}

fn hud(state: &GameState, out: &mut Vec<DrawCommand>) {
    text(
        out,
        format!("Energy: {}", state.score),
        10.0,
        10.0,
        TextSize::Small,
        colors::WHITE,
    );
    text(
        out,
        format!("Crashes: {}", state.player.crashes),
        10.0,
        50.0,
        TextSize::Small,
        colors::RED,
    );
    let name = state
        .current_level()
        .map(|l| l.name.as_str())
        .unwrap_or("");
    text(
        out,
        format!("Level {}: {}", state.level_index + 1, name),
        10.0,
        90.0,
        TextSize::Small,
        colors::GREEN,
    );
}

fn intro_screen(state: &GameState, out: &mut Vec<DrawCommand>) {
    let (cx, cy) = center(state);
    let name = state
        .current_level()
        .map(|l| l.name.as_str())
        .unwrap_or("");
    match state.config.intro {
        crate::IntroStyle::FlyIn { .. } => {
            text(
                out,
                format!("LEVEL {}: {}", state.level_index + 1, name),
                cx - 200.0,
                cy - 50.0,
                TextSize::Large,
                colors::YELLOW,
            );
            text(
                out,
                "UFO entering...",
                cx - 150.0,
                cy + 20.0,
                TextSize::Medium,
                colors::GREEN,
            );
            craft(&state.player, out);
        }
        crate::IntroStyle::Timed { .. } => {
            out.push(DrawCommand::Rect {
                rect: full_screen(state),
                color: colors::INTRO_DIM,
            });
            text(
                out,
                name,
                cx - 150.0,
                cy - 50.0,
                TextSize::Large,
                colors::YELLOW,
            );
        }
    }
}

fn gate_overlay(state: &GameState, out: &mut Vec<DrawCommand>) {
    let Some(gate) = &state.gate else {
        return;
    };
    let (cx, cy) = center(state);
    out.push(DrawCommand::Rect {
        rect: full_screen(state),
        color: colors::OVERLAY,
    });
    text(
        out,
        "RIDDLE:",
        cx - 300.0,
        cy - 120.0,
        TextSize::Medium,
        colors::YELLOW,
    );
    for (i, line) in wrap_words(&gate.challenge.prompt, PROMPT_WRAP)
        .into_iter()
        .enumerate()
    {
        text(
            out,
            line,
            cx - 300.0,
            cy - 70.0 + i as f32 * LINE_HEIGHT,
            TextSize::Small,
            colors::WHITE,
        );
    }
    let shown = if gate.answer.is_empty() {
        "_"
    } else {
        gate.answer.as_str()
    };
    text(
        out,
        format!("Your Answer: {shown}"),
        cx - 300.0,
        cy,
        TextSize::Small,
        colors::GREEN,
    );
    if gate.hint_revealed
        && let Some(hint) = ui::hint_text(&gate.challenge.answer)
    {
        text(
            out,
            hint,
            cx - 300.0,
            cy + 100.0,
            TextSize::Small,
            colors::YELLOW,
        );
    }
    buttons(state, out);
}

fn game_over_screen(state: &GameState, out: &mut Vec<DrawCommand>) {
    let (cx, cy) = center(state);
    out.push(DrawCommand::Fill {
        color: colors::BLACK,
    });
    text(
        out,
        "GAME OVER",
        cx - 150.0,
        cy - 100.0,
        TextSize::Large,
        colors::RED,
    );
    text(
        out,
        format!("Final Energy: {}", state.ledger_total() + state.score),
        cx - 150.0,
        cy - 40.0,
        TextSize::Small,
        colors::YELLOW,
    );
    if state.on_final_level() {
        ledger_lines(state, 40.0, out);
    }
    buttons(state, out);
}

fn complete_screen(state: &GameState, out: &mut Vec<DrawCommand>) {
    let (cx, cy) = center(state);
    out.push(DrawCommand::Fill {
        color: colors::BLACK,
    });

    if state.finale.showing_win {
        text(
            out,
            "YOU WIN",
            cx - 150.0,
            cy - 120.0,
            TextSize::Large,
            colors::GREEN,
        );
        text(
            out,
            format!("Total Energy: {}", state.ledger_total()),
            cx - 150.0,
            cy - 40.0,
            TextSize::Medium,
            colors::YELLOW,
        );
        buttons(state, out);
        return;
    }

    text(
        out,
        "FINAL SCOREBOARD",
        cx - 300.0,
        40.0,
        TextSize::Large,
        colors::YELLOW,
    );
    ledger_lines(state, 140.0, out);
    for point in &state.finale.trail {
        let color = [0.0, 1.0, 200.0 / 255.0, point.alpha as f32 / 255.0 / 2.0];
        out.push(DrawCommand::Rect {
            rect: Rect::new(point.x, cy + 10.0, 30.0, 8.0),
            color,
        });
    }
    out.push(DrawCommand::Ellipse {
        rect: Rect::new(state.finale.craft_x, cy, 60.0, 30.0),
        color: colors::CRAFT_HULL,
    });
}

/// "1. Pink City - 100 Energy" per cleared level, then the total
fn ledger_lines(state: &GameState, top: f32, out: &mut Vec<DrawCommand>) {
    let (cx, _) = center(state);
    let mut y = top;
    for (i, score) in state.ledger.iter().enumerate() {
        let name = state
            .config
            .level(i)
            .map(|l| l.name.clone())
            .unwrap_or_else(|| format!("Level {}", i + 1));
        text(
            out,
            format!("{}. {} - {} Energy", i + 1, name, score),
            cx - 200.0,
            y,
            TextSize::Small,
            colors::WHITE,
        );
        y += 36.0;
    }
    text(
        out,
        format!("Total Energy: {}", state.ledger_total()),
        cx - 200.0,
        y + 10.0,
        TextSize::Small,
        colors::GREEN,
    );
}

fn buttons(state: &GameState, out: &mut Vec<DrawCommand>) {
    for button in ui::visible_buttons(state) {
        let rect = ui::button_rect(button, &state.config);
        let color = if ui::is_hovered(state, button) {
            colors::BUTTON_HOVER
        } else {
            colors::BUTTON
        };
        out.push(DrawCommand::Rect { rect, color });
        let inset = if button == Button::PreviousLevel {
            10.0
        } else {
            15.0
        };
        text(
            out,
            button.label(),
            rect.x + inset,
            rect.y + 12.0,
            TextSize::Small,
            colors::WHITE,
        );
    }
}

fn center(state: &GameState) -> (f32, f32) {
    (state.config.arena_width / 2.0, state.config.arena_height / 2.0)
}

fn full_screen(state: &GameState) -> Rect {
    Rect::new(
        0.0,
        0.0,
        state.config.arena_width,
        state.config.arena_height,
    )
}

/// Greedy word wrap by character count
pub fn wrap_words(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        if !line.is_empty() && line.chars().count() + 1 + word.chars().count() > max_chars {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}
