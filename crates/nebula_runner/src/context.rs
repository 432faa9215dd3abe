//! Player identity

/// Longest display name kept after sanitizing
pub const MAX_DISPLAY_NAME: usize = 15;

/// Name used when sanitizing leaves nothing
pub const ANONYMOUS: &str = "Pilot";

/// Who is playing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerContext {
    display_name: String,
    game_mode: String,
}

impl PlayerContext {
    /// Context for `raw_name`, sanitized to ASCII alphanumerics
    pub fn new(raw_name: &str) -> Self {
        let display_name = sanitize_name(raw_name);
        let display_name = if display_name.is_empty() { ANONYMOUS.to_string() } else { display_name };
        Self { display_name, game_mode: "normal".to_string() }
    }

    /// Report submissions under `mode`
    pub fn with_game_mode(mut self, mode: impl Into<String>) -> Self {
        self.game_mode = mode.into();
        self
    }

    /// Sanitized display name
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Game mode reported with submissions
    pub fn game_mode(&self) -> &str {
        &self.game_mode
    }
}

impl Default for PlayerContext {
    fn default() -> Self {
        Self::new(ANONYMOUS)
    }
}

/// Keep ASCII letters and digits, at most [`MAX_DISPLAY_NAME`] of them
pub fn sanitize_name(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_alphanumeric).take(MAX_DISPLAY_NAME).collect()
}
