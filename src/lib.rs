//! `argform` - terminal forms generated from command declarations.
//!
//! Each declared option becomes an input widget; the run control assembles
//! an argument vector from the widgets and hands it to an invoker.

pub mod cli;
pub mod core;
pub mod form;
pub mod fs;
pub mod logging;
pub mod tui;
