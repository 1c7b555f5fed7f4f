//! Gate Flap - a single-screen gap-threading arcade game
//!
//! Core modules:
//! - `sim`: Simulation (entity physics, obstacles, collisions, scoring)
//! - `driver`: Idle/Countdown/Running/Over session state machine
//! - `score`: Best score record
//! - `persistence`: Key-value storage backends
//! - `settings`: Data-driven game tuning
//! - `renderer`: WebGPU rendering pipeline
//! - `ui`: HUD overlay model

pub mod driver;
pub mod persistence;
pub mod renderer;
pub mod score;
pub mod settings;
pub mod sim;
pub mod ui;

pub use driver::{Driver, GameEvent, Phase};
pub use score::BestScore;
pub use settings::Settings;

/// Platform constants
pub mod consts {
    /// Largest frame delta fed to the countdown (ms); longer gaps are a
    /// suspended tab, not real time
    pub const MAX_FRAME_DT_MS: f64 = 250.0;

    /// Nominal display refresh used by the headless demo (ms)
    pub const NOMINAL_FRAME_MS: f64 = 1000.0 / 60.0;

    /// Store file used by the native build
    pub const NATIVE_STORE_PATH: &str = "gate_flap_store.json";
}
