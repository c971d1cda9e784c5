//! Editor theme cycling

/// Themes offered when none are configured
pub const DEFAULT_THEMES: [&str; 3] = ["vs-dark", "vs-light", "hc-black"];

/// Current position in a fixed, ordered theme list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeState {
    themes: Vec<String>,
    index: usize,
}

impl ThemeState {
    /// Start at the first theme. An empty list falls back to [`DEFAULT_THEMES`].
    #[must_use]
    pub fn new(themes: Vec<String>) -> Self {
        let themes = if themes.is_empty() {
            DEFAULT_THEMES.iter().map(ToString::to_string).collect()
        } else {
            themes
        };
        Self { themes, index: 0 }
    }

    /// Theme in effect
    #[must_use]
    pub fn current(&self) -> &str {
        &self.themes[self.index]
    }

    /// Advance to the next theme, wrapping at the end
    pub fn advance(&mut self) -> &str {
        self.index = (self.index + 1) % self.themes.len();
        self.current()
    }

    /// All themes in cycle order
    #[must_use]
    pub fn themes(&self) -> &[String] {
        &self.themes
    }
}

impl Default for ThemeState {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn cycles_and_wraps() {
        let mut theme = ThemeState::default();
        assert_eq!(theme.current(), "vs-dark");
        assert_eq!(theme.advance(), "vs-light");
        assert_eq!(theme.advance(), "hc-black");
        assert_eq!(theme.advance(), "vs-dark");
    }

    #[test]
    fn single_theme_stays_put() {
        let mut theme = ThemeState::new(vec!["solarized".to_string()]);
        assert_eq!(theme.advance(), "solarized");
    }

    proptest! {
        #[test]
        fn full_cycle_returns_to_start(len in 1..8usize, rounds in 1..4usize) {
            let themes: Vec<String> = (0..len).map(|i| format!("theme-{i}")).collect();
            let mut theme = ThemeState::new(themes);
            for _ in 0..len * rounds {
                theme.advance();
            }
            prop_assert_eq!(theme.current(), "theme-0");
        }
    }
}
