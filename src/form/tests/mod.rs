//! Tests for the form module.
//!
//! Organized by concern:
//! - `helpers` - shared builders, key events and rendering utilities
//! - `mapping` - argument vector assembly from widget state
//! - `navigation` - focus, tabs, widget keys and paste
//! - `trigger` - running the command and reporting its outcome
//! - `render` - screen content

#[allow(clippy::unwrap_used, clippy::expect_used)]
pub mod helpers;
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod mapping;
