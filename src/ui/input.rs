/// Keyboard input collection.
///
/// The board only has one-shot actions (page turns, mode switches,
/// toggles), so this collects edge-triggered presses per frame: drain
/// every pending terminal event without blocking, keep the Press/Repeat
/// key codes, and let the key map in `main` test against them.

use std::time::Duration;

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

pub struct InputState {
    /// Key codes that arrived during the most recent drain_events() call.
    presses: Vec<KeyCode>,

    /// Raw key events collected during drain, for modifier handling.
    raw_events: Vec<KeyEvent>,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            presses: Vec::with_capacity(8),
            raw_events: Vec::with_capacity(8),
        }
    }

    /// Drain all pending terminal events. Call once per frame, before the
    /// board tick.
    pub fn drain_events(&mut self) {
        self.presses.clear();
        self.raw_events.clear();

        // poll(ZERO) reports false once the queue is empty
        while poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                if key.kind == KeyEventKind::Release {
                    continue;
                }
                self.raw_events.push(key);
                self.presses.push(key.code);
            }
        }
    }

    /// Was this key pressed this frame?
    pub fn was_pressed(&self, code: KeyCode) -> bool {
        self.presses.contains(&code)
    }

    /// Convenience: was any of these keys pressed?
    pub fn any_pressed(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.was_pressed(*c))
    }

    /// Digits pressed this frame, as their numeric values.
    pub fn digits_pressed(&self) -> impl Iterator<Item = u32> + '_ {
        self.presses.iter().filter_map(|code| match code {
            KeyCode::Char(c) => c.to_digit(10),
            _ => None,
        })
    }

    /// Ctrl+C arrived this frame.
    pub fn ctrl_c_pressed(&self) -> bool {
        self.raw_events.iter().any(|k| {
            k.modifiers.contains(KeyModifiers::CONTROL)
                && (k.code == KeyCode::Char('c') || k.code == KeyCode::Char('C'))
        })
    }
}
