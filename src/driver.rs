//! Session driver: the Idle → Countdown → Running → Over state machine
//!
//! The driver owns the only mutable game state. The platform layer feeds it
//! commands (start, restart, jump, resize) and elapsed time once per display
//! refresh, then drains the events it produced to update the presentation.
//!
//! Countdown and fade timers are elapsed-time counters inside
//! `Phase::Countdown`, so leaving that phase discards them.

use crate::persistence::KeyValueStore;
use crate::score::BestScore;
use crate::settings::Settings;
use crate::sim::{Collision, Session, TickInput, Viewport, tick};

/// Something the presentation layer may want to react to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Countdown entered, showing this number
    CountdownStarted(u32),
    /// Countdown decremented to this number
    CountdownTick(u32),
    /// Countdown finished, overlay fading out
    CountdownFade,
    /// A fresh session is running
    SessionStarted,
    /// An obstacle left the screen; new session score
    ObstacleCleared { score: u32 },
    /// Best score raised to this value
    BestScore(u32),
    /// Session ended
    GameOver { score: u32, collision: Collision },
}

/// Pre-game countdown progress
#[derive(Debug, Clone, PartialEq)]
pub struct Countdown {
    value: u32,
    elapsed_ms: f64,
    fading: bool,
}

impl Countdown {
    pub fn new(from: u32) -> Self {
        Self {
            value: from,
            elapsed_ms: 0.0,
            fading: false,
        }
    }

    /// Number on display, `None` once the overlay is fading out
    pub fn display(&self) -> Option<u32> {
        (!self.fading).then_some(self.value)
    }

    pub fn is_fading(&self) -> bool {
        self.fading
    }

    /// Advance by `dt_ms`; returns true once the fade delay has elapsed
    fn advance(&mut self, dt_ms: f64, settings: &Settings, events: &mut Vec<GameEvent>) -> bool {
        self.elapsed_ms += dt_ms.max(0.0);

        while !self.fading && self.elapsed_ms >= settings.countdown_step_ms {
            self.elapsed_ms -= settings.countdown_step_ms;
            if self.value > 0 {
                self.value -= 1;
                events.push(GameEvent::CountdownTick(self.value));
            } else {
                self.fading = true;
                events.push(GameEvent::CountdownFade);
            }
        }

        self.fading && self.elapsed_ms >= settings.fade_delay_ms
    }
}

/// Driver phase; the session exists only while Running or Over
#[derive(Debug, Clone)]
pub enum Phase {
    /// Waiting for the first start command
    Idle,
    Countdown(Countdown),
    Running(Session),
    /// Terminal; the finished session is kept for the last frame
    Over(Session),
}

/// Runs sessions and keeps the best score
pub struct Driver<S: KeyValueStore> {
    settings: Settings,
    store: S,
    best: BestScore,
    viewport: Viewport,
    phase: Phase,
    /// One-shot inputs collected between ticks
    input: TickInput,
    next_seed: u64,
    sessions_started: u32,
    events: Vec<GameEvent>,
}

impl<S: KeyValueStore> Driver<S> {
    /// Create an idle driver, reading the best score from `store`
    ///
    /// `seed` is used when the settings carry no fixed seed.
    pub fn new(settings: Settings, store: S, viewport: Viewport, seed: u64) -> Self {
        let best = BestScore::load(&store);
        let next_seed = settings.seed.unwrap_or(seed);
        Self {
            settings,
            store,
            best,
            viewport,
            phase: Phase::Idle,
            input: TickInput::default(),
            next_seed,
            sessions_started: 0,
            events: Vec::new(),
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn best_score(&self) -> u32 {
        self.best.value()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Current or last finished session
    pub fn session(&self) -> Option<&Session> {
        match &self.phase {
            Phase::Running(session) | Phase::Over(session) => Some(session),
            _ => None,
        }
    }

    pub fn countdown(&self) -> Option<&Countdown> {
        match &self.phase {
            Phase::Countdown(countdown) => Some(countdown),
            _ => None,
        }
    }

    /// At least one session has started since launch
    pub fn has_played(&self) -> bool {
        self.sessions_started > 0
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Running(_))
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, Phase::Over(_))
    }

    /// Start/restart controls accept input
    pub fn controls_enabled(&self) -> bool {
        !matches!(self.phase, Phase::Countdown(_))
    }

    /// True while the frame loop has work (countdown or live session)
    pub fn wants_frames(&self) -> bool {
        matches!(self.phase, Phase::Countdown(_) | Phase::Running(_))
    }

    /// `start` command; returns false if rejected
    pub fn start(&mut self) -> bool {
        self.begin_countdown("start")
    }

    /// `restart` command; returns false if rejected
    pub fn restart(&mut self) -> bool {
        self.begin_countdown("restart")
    }

    fn begin_countdown(&mut self, command: &str) -> bool {
        match self.phase {
            Phase::Idle | Phase::Over(_) => {
                let from = self.settings.countdown_from;
                log::info!("{}: countdown from {}", command, from);
                self.phase = Phase::Countdown(Countdown::new(from));
                self.input = TickInput::default();
                self.events.push(GameEvent::CountdownStarted(from));
                true
            }
            Phase::Countdown(_) | Phase::Running(_) => {
                log::debug!("Ignoring {} command while {}", command, self.phase_name());
                false
            }
        }
    }

    /// Player jump; only honoured while a session is running
    pub fn jump(&mut self) {
        match &self.phase {
            Phase::Running(session) if !session.over => self.input.jump = true,
            _ => {}
        }
    }

    /// Host viewport changed
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        if let Phase::Running(session) = &mut self.phase {
            session.resize(viewport);
        }
    }

    /// Advance by one display refresh that took `dt_ms`
    ///
    /// Running sessions tick exactly once per call regardless of `dt_ms`.
    pub fn frame(&mut self, dt_ms: f64) {
        match &mut self.phase {
            Phase::Idle | Phase::Over(_) => {}
            Phase::Countdown(countdown) => {
                if countdown.advance(dt_ms, &self.settings, &mut self.events) {
                    let seed = self.next_seed;
                    self.next_seed = self.next_seed.wrapping_add(1);
                    self.sessions_started += 1;
                    self.phase = Phase::Running(Session::new(&self.settings, self.viewport, seed));
                    self.events.push(GameEvent::SessionStarted);
                    log::info!("Session started (seed {})", seed);
                }
            }
            Phase::Running(session) => {
                let input = std::mem::take(&mut self.input);
                let outcome = tick(session, &input, &self.settings);
                let score = session.score;

                if outcome.cleared > 0 {
                    self.events.push(GameEvent::ObstacleCleared { score });
                }
                if self.best.record(score, &mut self.store) {
                    self.events.push(GameEvent::BestScore(score));
                }

                if let Some(collision) = outcome.collision {
                    log::info!("Game over: score {} ({:?})", score, collision);
                    self.events.push(GameEvent::GameOver { score, collision });
                    if let Phase::Running(session) = std::mem::replace(&mut self.phase, Phase::Idle)
                    {
                        self.phase = Phase::Over(session);
                    }
                }
            }
        }
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn phase_name(&self) -> &'static str {
        match self.phase {
            Phase::Idle => "idle",
            Phase::Countdown(_) => "counting down",
            Phase::Running(_) => "running",
            Phase::Over(_) => "over",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use crate::sim::Obstacle;

    const VIEW: Viewport = Viewport::new(400.0, 600.0);

    fn driver() -> Driver<MemoryStore> {
        Driver::new(Settings::default(), MemoryStore::new(), VIEW, 42)
    }

    /// Run the countdown to completion with 100 ms frames
    fn count_down(driver: &mut Driver<MemoryStore>) {
        for _ in 0..100 {
            if driver.is_running() {
                return;
            }
            driver.frame(100.0);
        }
        panic!("countdown never finished");
    }

    /// Keep the entity in the middle of the gap ahead (or the screen)
    fn autopilot(driver: &mut Driver<MemoryStore>) {
        let Some(session) = driver.session() else {
            return;
        };
        let entity = session.entity;
        let target = session
            .obstacles
            .iter()
            .find(|o| o.x + 30.0 >= entity.x)
            .map(|o| o.gap_top + o.gap_height / 2.0)
            .unwrap_or(VIEW.height / 2.0);
        if entity.y > target && entity.vel_y > 0.0 {
            driver.jump();
        }
    }

    #[test]
    fn test_countdown_timeline() {
        let mut d = driver();
        assert!(d.start());
        assert_eq!(d.drain_events(), vec![GameEvent::CountdownStarted(3)]);
        assert_eq!(d.countdown().unwrap().display(), Some(3));

        d.frame(999.0);
        assert_eq!(d.countdown().unwrap().display(), Some(3));
        d.frame(1.0);
        assert_eq!(d.countdown().unwrap().display(), Some(2));
        d.frame(2000.0);
        assert_eq!(d.countdown().unwrap().display(), Some(0));
        d.frame(1000.0);
        assert!(d.countdown().unwrap().is_fading());
        d.frame(499.0);
        assert!(!d.is_running());
        d.frame(1.0);
        assert!(d.is_running());

        assert_eq!(
            d.drain_events(),
            vec![
                GameEvent::CountdownTick(2),
                GameEvent::CountdownTick(1),
                GameEvent::CountdownTick(0),
                GameEvent::CountdownFade,
                GameEvent::SessionStarted,
            ]
        );
    }

    #[test]
    fn test_commands_rejected_during_countdown_and_play() {
        let mut d = driver();
        assert!(d.start());
        assert!(!d.controls_enabled());
        assert!(!d.start());
        assert!(!d.restart());

        count_down(&mut d);
        assert!(d.controls_enabled());
        assert!(!d.restart());
        assert!(d.is_running());
    }

    #[test]
    fn test_jump_ignored_outside_running() {
        let mut d = driver();
        d.jump();
        d.start();
        d.jump();
        count_down(&mut d);
        d.frame(16.0);
        // No pending jump carried over from the countdown
        assert_eq!(d.session().unwrap().entity.vel_y, 0.1);

        d.jump();
        d.frame(16.0);
        assert_eq!(d.session().unwrap().entity.vel_y, -4.0);
    }

    #[test]
    fn test_over_stops_ticks_until_restart() {
        let mut d = driver();
        d.start();
        count_down(&mut d);
        while d.is_running() {
            d.frame(16.0);
        }
        assert!(d.is_over());
        assert!(!d.wants_frames());
        assert!(matches!(
            d.drain_events().last(),
            Some(GameEvent::GameOver {
                collision: Collision::Floor,
                ..
            })
        ));

        let ticks = d.session().unwrap().time_ticks;
        d.jump();
        d.frame(16.0);
        assert_eq!(d.session().unwrap().time_ticks, ticks);

        assert!(d.restart());
        assert!(d.session().is_none());
        assert!(d.wants_frames());
    }

    #[test]
    fn test_score_resets_and_best_survives_restart() {
        let mut d = driver();
        d.start();
        count_down(&mut d);

        // Plant an obstacle about to leave the screen
        let Phase::Running(session) = &mut d.phase else {
            unreachable!()
        };
        session.obstacles.push(Obstacle {
            x: -29.5,
            gap_top: 100.0,
            gap_height: 250.0,
        });
        d.frame(16.0);
        assert_eq!(d.session().unwrap().score, 1);
        assert_eq!(d.best_score(), 1);
        assert_eq!(BestScore::load(d.store()).value(), 1);
        let events = d.drain_events();
        assert!(events.contains(&GameEvent::ObstacleCleared { score: 1 }));
        assert!(events.contains(&GameEvent::BestScore(1)));

        while d.is_running() {
            d.frame(16.0);
        }
        d.restart();
        count_down(&mut d);
        assert_eq!(d.session().unwrap().score, 0);
        assert_eq!(d.best_score(), 1);
    }

    #[test]
    fn test_best_score_loaded_at_startup() {
        let mut store = MemoryStore::new();
        store.set(BestScore::STORAGE_KEY, "17").unwrap();
        let d = Driver::new(Settings::default(), store, VIEW, 1);
        assert_eq!(d.best_score(), 17);
    }

    #[test]
    fn test_plays_with_unreadable_store() {
        let mut d = Driver::new(Settings::default(), MemoryStore::unavailable(), VIEW, 9);
        assert_eq!(d.best_score(), 0);

        assert!(d.start());
        count_down(&mut d);
        for _ in 0..3000 {
            if !d.is_running() {
                break;
            }
            autopilot(&mut d);
            d.frame(16.0);
        }

        let session = d.session().unwrap();
        assert!(session.time_ticks > 0);
        assert_eq!(d.best_score(), session.score);
    }

    #[test]
    fn test_resize_recentres_running_entity() {
        let mut d = driver();
        d.resize(Viewport::new(800.0, 1000.0));
        d.start();
        count_down(&mut d);
        assert_eq!(d.session().unwrap().viewport, Viewport::new(800.0, 1000.0));
        assert_eq!(d.session().unwrap().entity.y, 500.0);

        d.frame(16.0);
        let obstacles = d.session().unwrap().obstacles.len();
        d.resize(Viewport::new(400.0, 600.0));
        let session = d.session().unwrap();
        assert_eq!(session.entity.y, 300.0);
        assert_eq!(session.obstacles.len(), obstacles);
    }

    #[test]
    fn test_autopilot_scores_and_best_is_monotone() {
        let mut d = driver();
        let mut best = 0;
        for _ in 0..3 {
            if d.is_over() {
                d.restart();
            } else {
                d.start();
            }
            count_down(&mut d);
            let mut score = 0;
            for _ in 0..3000 {
                if !d.is_running() {
                    break;
                }
                autopilot(&mut d);
                d.frame(16.0);
                let now = d.session().unwrap().score;
                assert!(now >= score);
                score = now;
            }
            assert!(d.best_score() >= best);
            best = d.best_score();
            if d.is_running() {
                break;
            }
        }
        assert!(best > 0);
    }
}
