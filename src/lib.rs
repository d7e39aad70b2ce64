// Library surface for headless/integration tests and reuse.
// main.rs only wires the terminal, the CLI and the event loop.
pub mod app;
pub mod app_dirs;
pub mod bank;
pub mod builder;
pub mod config;
pub mod error;
pub mod generator;
pub mod i18n;
pub mod keys;
pub mod quiz;
pub mod quota;
pub mod runtime;
pub mod sampler;
pub mod session;
pub mod timer;
pub mod ui;

pub use app::{App, AppState, Flow};
