pub mod calculator;
pub mod config;
pub mod error;
pub mod fish;
pub mod food;
pub mod log;
pub mod store;
pub mod tone;
pub mod util;

// Decoupled game loop architecture
pub mod actors;
pub mod app;
pub mod render;
pub mod tea;
pub mod ui;

pub use error::{Error, Result};
