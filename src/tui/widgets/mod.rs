//! Custom TUI widgets.

pub mod choice_popup;
pub mod output;

pub use choice_popup::{ChoicePopup, MAX_CHOICE_POPUP_ROWS};
pub use output::{MAX_OUTPUT_LINES, OutputKind, OutputLine, OutputPanel, wrapped_row_count};
