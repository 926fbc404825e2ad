pub const DEFAULT_TYPING_SPEED_MS: u32 = 50;

/// Typewriter reveal, one character per tick. The tick after the last
/// character marks the text complete.
#[derive(Clone, Debug)]
pub struct TypingState {
    chars: Vec<char>,
    shown: usize,
    complete: bool,
}

impl TypingState {
    pub fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            shown: 0,
            complete: false,
        }
    }

    pub fn display_text(&self) -> String {
        self.chars[..self.shown].iter().collect()
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Returns `true` while there is more to do after this tick.
    pub fn tick(&mut self) -> bool {
        if self.shown < self.chars.len() {
            self.shown += 1;
            return true;
        }

        self.complete = true;
        false
    }
}
