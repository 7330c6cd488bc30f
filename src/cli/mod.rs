//! CLI Interface: User input and terminal rendering
//!
//! # Components
//! - `input.rs`: Keystroke capture using crossterm
//! - `display.rs`: Terminal rendering and the display observer
//! - `report.rs`: Headless event log and end-of-session summary

pub mod display;
pub mod input;
pub mod report;

pub use display::{Display, DisplayObserver};
pub use input::{Command, InputHandler};
pub use report::{summary_lines, EventLog};
