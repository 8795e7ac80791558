//! Crawler module for simulated crawl sessions
//!
//! This module contains the core crawl logic, including:
//! - The tick simulator that advances progress from random draws
//! - The state machine applying start/pause/resume/stop commands
//! - The controller that drives ticks on a timer

pub mod controller;
pub mod machine;
pub mod simulator;

pub use controller::CrawlController;
pub use machine::{CrawlMachine, Transition};
pub use simulator::{advance, DrawSource, ScriptedDraws, SeededDraws, TickDraws};
