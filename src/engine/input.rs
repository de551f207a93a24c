//! Live keyboard and pointer state.
//!
//! Raw crossterm events are folded into a map of normalized key names and a
//! pointer record in surface coordinates. Games only ever query this state;
//! they never see the events themselves.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use super::surface::Bounds;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pointer {
    pub x: f32,
    pub y: f32,
    pub clicked: bool,
}

#[derive(Clone, Copy, Debug, Default)]
struct KeyState {
    down: bool,
    just_pressed: bool,
    age_ms: f32,
}

#[derive(Debug)]
pub struct InputState {
    keys: HashMap<String, KeyState>,
    pointer: Pointer,
    viewport: Rect,
    bounds: Bounds,
    // Without release events a key is considered held this long after its
    // last press or repeat.
    hold_ms: Option<f32>,
    press_seen: bool,
    release_pending: bool,
}

impl InputState {
    pub fn new(bounds: Bounds, hold_ms: Option<f32>) -> Self {
        Self {
            keys: HashMap::new(),
            pointer: Pointer::default(),
            viewport: Rect::default(),
            bounds,
            hold_ms,
            press_seen: true,
            release_pending: false,
        }
    }

    pub fn is_key_pressed(&self, name: &str) -> bool {
        self.keys
            .get(&name.to_lowercase())
            .is_some_and(|k| k.down)
    }

    /// True when a press or autorepeat for `name` arrived since the last frame.
    pub fn is_key_just_pressed(&self, name: &str) -> bool {
        self.keys
            .get(&name.to_lowercase())
            .is_some_and(|k| k.just_pressed)
    }

    pub fn pointer(&self) -> Pointer {
        self.pointer
    }

    /// Screen rectangle the surface was last rendered into.
    pub fn set_viewport(&mut self, viewport: Rect) {
        self.viewport = viewport;
    }

    pub fn key_event(&mut self, key: &KeyEvent) {
        let Some((printable, physical)) = key_names(key.code) else {
            return;
        };
        match key.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => {
                for name in [printable, physical] {
                    let state = self.keys.entry(name).or_default();
                    state.down = true;
                    state.just_pressed = true;
                    state.age_ms = 0.0;
                }
            }
            KeyEventKind::Release => {
                for name in [printable, physical] {
                    if let Some(state) = self.keys.get_mut(&name) {
                        state.down = false;
                    }
                }
            }
        }
    }

    pub fn mouse_event(&mut self, mouse: &MouseEvent) {
        let inside = self.viewport_contains(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                self.move_pointer(mouse.column, mouse.row);
            }
            MouseEventKind::Down(MouseButton::Left) if inside => {
                self.move_pointer(mouse.column, mouse.row);
                self.pointer.clicked = true;
                self.press_seen = false;
                self.release_pending = false;
            }
            MouseEventKind::Up(MouseButton::Left) => {
                // A click that lands between two frames must still be seen
                // by one update.
                if self.press_seen {
                    self.pointer.clicked = false;
                } else {
                    self.release_pending = true;
                }
            }
            _ => {}
        }
    }

    /// Called once per frame after the active game has been updated.
    pub fn end_frame(&mut self, delta_ms: f32) {
        let hold = self.hold_ms;
        for state in self.keys.values_mut() {
            state.just_pressed = false;
            state.age_ms += delta_ms;
            if let Some(hold) = hold {
                if state.down && state.age_ms >= hold {
                    state.down = false;
                }
            }
        }
        self.press_seen = true;
        if self.release_pending {
            self.pointer.clicked = false;
            self.release_pending = false;
        }
    }

    /// Forget all held keys, e.g. when the terminal loses focus.
    pub fn release_all(&mut self) {
        for state in self.keys.values_mut() {
            state.down = false;
            state.just_pressed = false;
        }
        self.pointer.clicked = false;
        self.release_pending = false;
    }

    fn viewport_contains(&self, column: u16, row: u16) -> bool {
        let v = self.viewport;
        column >= v.x && column < v.x + v.width && row >= v.y && row < v.y + v.height
    }

    fn move_pointer(&mut self, column: u16, row: u16) {
        if let Some((x, y)) = self.to_logical(column, row) {
            self.pointer.x = x;
            self.pointer.y = y;
        }
    }

    /// Rescale a terminal cell to surface coordinates, using the cell centre.
    fn to_logical(&self, column: u16, row: u16) -> Option<(f32, f32)> {
        let v = self.viewport;
        if v.width == 0 || v.height == 0 {
            return None;
        }
        let scale_x = self.bounds.width / v.width as f32;
        let scale_y = self.bounds.height / v.height as f32;
        let x = (column as f32 - v.x as f32 + 0.5) * scale_x;
        let y = (row as f32 - v.y as f32 + 0.5) * scale_y;
        Some((x, y))
    }
}

/// Printable identity and physical-code identity of a key, DOM style.
pub fn key_names(code: KeyCode) -> Option<(String, String)> {
    let named = |s: &str| Some((s.to_string(), s.to_string()));
    match code {
        KeyCode::Char(c) => {
            let printable: String = c.to_lowercase().collect();
            let physical = if c == ' ' {
                "space".to_string()
            } else if c.is_ascii_alphabetic() {
                format!("key{}", c.to_ascii_lowercase())
            } else if c.is_ascii_digit() {
                format!("digit{c}")
            } else {
                printable.clone()
            };
            Some((printable, physical))
        }
        KeyCode::Left => named("arrowleft"),
        KeyCode::Right => named("arrowright"),
        KeyCode::Up => named("arrowup"),
        KeyCode::Down => named("arrowdown"),
        KeyCode::Enter => named("enter"),
        KeyCode::Esc => named("escape"),
        KeyCode::Backspace => named("backspace"),
        KeyCode::Tab | KeyCode::BackTab => named("tab"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventState, KeyModifiers};

    fn key(code: KeyCode, kind: KeyEventKind) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        }
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn key_resolves_by_character_and_code() {
        let mut input = InputState::new(Bounds::default(), None);
        input.key_event(&key(KeyCode::Char('A'), KeyEventKind::Press));

        assert!(input.is_key_pressed("a"));
        assert!(input.is_key_pressed("KeyA"));
        assert!(!input.is_key_pressed("arrowleft"));

        input.key_event(&key(KeyCode::Char('a'), KeyEventKind::Release));
        assert!(!input.is_key_pressed("a"));
        assert!(!input.is_key_pressed("keya"));
    }

    #[test]
    fn space_has_both_identities() {
        let mut input = InputState::new(Bounds::default(), None);
        input.key_event(&key(KeyCode::Char(' '), KeyEventKind::Press));
        assert!(input.is_key_pressed(" "));
        assert!(input.is_key_pressed("Space"));
    }

    #[test]
    fn arrow_and_letter_are_independent() {
        let mut input = InputState::new(Bounds::default(), None);
        input.key_event(&key(KeyCode::Left, KeyEventKind::Press));
        assert!(input.is_key_pressed("ArrowLeft"));
        assert!(!input.is_key_pressed("a"));
    }

    #[test]
    fn held_key_expires_without_release_events() {
        let mut input = InputState::new(Bounds::default(), Some(100.0));
        input.key_event(&key(KeyCode::Right, KeyEventKind::Press));
        input.end_frame(60.0);
        assert!(input.is_key_pressed("arrowright"));

        // autorepeat refreshes the hold
        input.key_event(&key(KeyCode::Right, KeyEventKind::Repeat));
        input.end_frame(60.0);
        assert!(input.is_key_pressed("arrowright"));

        input.end_frame(60.0);
        assert!(!input.is_key_pressed("arrowright"));
    }

    #[test]
    fn just_pressed_lasts_one_frame() {
        let mut input = InputState::new(Bounds::default(), None);
        input.key_event(&key(KeyCode::Up, KeyEventKind::Press));
        assert!(input.is_key_just_pressed("arrowup"));
        input.end_frame(16.0);
        assert!(!input.is_key_just_pressed("arrowup"));
        assert!(input.is_key_pressed("arrowup"));
    }

    #[test]
    fn pointer_is_rescaled_to_surface_coordinates() {
        let mut input = InputState::new(Bounds::default(), None);
        input.set_viewport(Rect::new(10, 5, 80, 30));

        input.mouse_event(&mouse(MouseEventKind::Moved, 10, 5));
        let p = input.pointer();
        assert_eq!((p.x, p.y), (5.0, 10.0));

        input.mouse_event(&mouse(MouseEventKind::Moved, 49, 19));
        let p = input.pointer();
        assert_eq!((p.x, p.y), (395.0, 290.0));
    }

    #[test]
    fn quick_click_survives_until_a_frame_sees_it() {
        let mut input = InputState::new(Bounds::default(), None);
        input.set_viewport(Rect::new(0, 0, 80, 30));

        input.mouse_event(&mouse(MouseEventKind::Down(MouseButton::Left), 40, 15));
        input.mouse_event(&mouse(MouseEventKind::Up(MouseButton::Left), 40, 15));
        assert!(input.pointer().clicked);

        input.end_frame(16.0);
        assert!(!input.pointer().clicked);
    }

    #[test]
    fn click_outside_viewport_is_ignored() {
        let mut input = InputState::new(Bounds::default(), None);
        input.set_viewport(Rect::new(10, 10, 20, 10));
        input.mouse_event(&mouse(MouseEventKind::Down(MouseButton::Left), 2, 2));
        assert!(!input.pointer().clicked);
    }
}
