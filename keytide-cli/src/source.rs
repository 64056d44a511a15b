use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use keytide::{clock::Clock, source::KeySource, Millis};

/// Key source of the focused terminal window.
///
/// Only keys which are part of typing count. Shortcuts with control or alt don't.
#[derive(Debug)]
pub struct TerminalSource {
    clock: Clock,
    pending: Vec<Millis>,
}

impl TerminalSource {
    pub fn new(clock: Clock) -> Self {
        Self {
            clock,
            pending: Vec::new(),
        }
    }

    /// Returns `true` if `event` got recorded as a key press.
    pub fn record(&mut self, event: &KeyEvent) -> bool {
        self.record_at(event, self.clock.now())
    }

    fn record_at(&mut self, event: &KeyEvent, timestamp: Millis) -> bool {
        if !is_typing(event) {
            return false;
        }

        self.pending.push(timestamp);
        true
    }
}

impl KeySource for TerminalSource {
    fn fetch_keys(&mut self, buf: &mut Vec<Millis>) {
        buf.clear();
        buf.append(&mut self.pending);
    }
}

fn is_typing(event: &KeyEvent) -> bool {
    if event.kind != KeyEventKind::Press
        || event
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    {
        return false;
    }

    matches!(
        event.code,
        KeyCode::Char(_) | KeyCode::Enter | KeyCode::Backspace | KeyCode::Tab | KeyCode::Delete
    )
}
