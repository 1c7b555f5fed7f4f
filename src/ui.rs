//! HUD model
//!
//! Text overlays and button states are plain DOM elements. This module
//! computes what they should show from the driver; the web entry point
//! applies it to the page.

use crate::driver::{Driver, Phase};
use crate::persistence::KeyValueStore;

/// Text shown on the game-over overlay
pub const GAME_OVER_TEXT: &str = "Game Over";

/// Everything the DOM overlays display for one frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HudView {
    /// "Score: N" overlay, absent before the first session
    pub score_text: Option<String>,
    /// "Best Score: N", always shown
    pub best_text: String,
    /// Countdown number; empty once the countdown is done
    pub countdown_text: String,
    /// Countdown overlay opacity is 1 (else faded to 0)
    pub countdown_visible: bool,
    /// Centred terminal message
    pub game_over_visible: bool,
    /// Canvas shown once the first session has started
    pub canvas_visible: bool,
    pub start_visible: bool,
    pub restart_visible: bool,
    /// Start/restart clickable (false during the countdown)
    pub buttons_enabled: bool,
}

impl HudView {
    pub fn from_driver<S: KeyValueStore>(driver: &Driver<S>) -> Self {
        let session = driver.session();
        let countdown = driver.countdown();

        let (countdown_text, countdown_visible) = match countdown {
            Some(c) => match c.display() {
                Some(n) => (n.to_string(), true),
                // Keep the last number while it fades out
                None => ("0".to_string(), false),
            },
            None => (String::new(), false),
        };

        // Start button stays up until a session first starts; restart is
        // shown once a session has ended and kept (disabled) during the
        // countdown it triggered.
        let start_visible = matches!(driver.phase(), Phase::Idle)
            || (countdown.is_some() && !driver.has_played());
        let restart_visible =
            driver.is_over() || (countdown.is_some() && driver.has_played());

        Self {
            score_text: session.map(|s| format!("Score: {}", s.score)),
            best_text: format!("Best Score: {}", driver.best_score()),
            countdown_text,
            countdown_visible,
            game_over_visible: driver.is_over(),
            canvas_visible: driver.has_played(),
            start_visible,
            restart_visible,
            buttons_enabled: driver.controls_enabled(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use crate::settings::Settings;
    use crate::sim::Viewport;

    fn driver() -> Driver<MemoryStore> {
        let mut store = MemoryStore::new();
        store.set("bestScore", "9").unwrap();
        Driver::new(Settings::default(), store, Viewport::new(400.0, 600.0), 3)
    }

    #[test]
    fn test_idle_hud() {
        let hud = HudView::from_driver(&driver());
        assert_eq!(hud.best_text, "Best Score: 9");
        assert_eq!(hud.score_text, None);
        assert!(hud.start_visible);
        assert!(!hud.restart_visible);
        assert!(hud.buttons_enabled);
        assert!(!hud.canvas_visible);
    }

    #[test]
    fn test_hud_through_a_game() {
        let mut d = driver();
        d.start();
        let hud = HudView::from_driver(&d);
        assert_eq!(hud.countdown_text, "3");
        assert!(hud.countdown_visible);
        assert!(hud.start_visible);
        assert!(!hud.buttons_enabled);

        d.frame(4000.0);
        let hud = HudView::from_driver(&d);
        assert!(!hud.countdown_visible);
        d.frame(500.0);

        let hud = HudView::from_driver(&d);
        assert_eq!(hud.score_text.as_deref(), Some("Score: 0"));
        assert_eq!(hud.countdown_text, "");
        assert!(!hud.start_visible);
        assert!(!hud.restart_visible);
        assert!(hud.canvas_visible);

        while d.is_running() {
            d.frame(16.0);
        }
        let hud = HudView::from_driver(&d);
        assert!(hud.game_over_visible);
        assert!(hud.restart_visible);
        assert!(hud.buttons_enabled);

        d.restart();
        let hud = HudView::from_driver(&d);
        assert!(hud.restart_visible);
        assert!(!hud.start_visible);
        assert!(!hud.buttons_enabled);
        assert!(!hud.game_over_visible);
    }
}
