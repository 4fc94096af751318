//! Form widget archetypes.
//!
//! Every option row holds exactly one [`FormWidget`]. The set is closed:
//! single-line text, masked text, checkbox, dropdown, stepper and editable
//! list. Each variant handles its own keys and exposes the raw values the
//! option extraction turns into command-line tokens.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tui_textarea::{CursorMove, TextArea};

/// Character drawn in place of typed characters in masked fields.
pub const MASK_CHAR: char = '•';

/// Upper bound of a stepper.
pub const MAX_STEPPER_VALUE: u32 = 99;

/// Whether a widget used a key or left it to form navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The widget handled the key.
    Consumed,
    /// The key is free for the form to use.
    Ignored,
}

/// Archetype tag of a widget, for layout decisions and assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetKind {
    /// Single-line text field.
    Text,
    /// Single-line text field with masked characters.
    Masked,
    /// On/off toggle.
    Checkbox,
    /// Single selection from a fixed set.
    Dropdown,
    /// Bounded non-negative counter.
    Stepper,
    /// Ordered list of text entries.
    EditableList,
}

/// Entry restriction of a text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericKind {
    /// Optional sign followed by digits.
    Integer,
    /// Decimal number with optional exponent.
    Float,
}

impl NumericKind {
    /// Returns true when `text` is a valid number or a prefix of one.
    ///
    /// Intermediate states such as `-`, `1.` or `2e` are accepted so the
    /// user can type a number one character at a time.
    #[must_use]
    pub fn accepts(self, text: &str) -> bool {
        let unsigned = text.strip_prefix(['-', '+']).unwrap_or(text);
        match self {
            Self::Integer => unsigned.chars().all(|c| c.is_ascii_digit()),
            Self::Float => {
                let (mantissa, exponent) = match unsigned.split_once(['e', 'E']) {
                    Some((m, e)) => (m, Some(e)),
                    None => (unsigned, None),
                };
                let mantissa_ok = match mantissa.split_once('.') {
                    Some((int, frac)) => {
                        int.chars().all(|c| c.is_ascii_digit())
                            && frac.chars().all(|c| c.is_ascii_digit())
                    }
                    None => mantissa.chars().all(|c| c.is_ascii_digit()),
                };
                let exponent_ok = exponent.is_none_or(|e| {
                    let digits = e.strip_prefix(['-', '+']).unwrap_or(e);
                    !mantissa.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
                });
                mantissa_ok && exponent_ok
            }
        }
    }
}

/// Single-line text entry backed by a one-line [`TextArea`].
#[derive(Debug, Clone)]
pub struct TextField {
    textarea: TextArea<'static>,
    numeric: Option<NumericKind>,
}

impl TextField {
    /// Creates a field seeded with `initial`.
    ///
    /// The seed is not checked against `numeric`; only typed input is.
    #[must_use]
    pub fn new(initial: &str, numeric: Option<NumericKind>, masked: bool) -> Self {
        let mut textarea = TextArea::new(vec![initial.to_string()]);
        textarea.move_cursor(CursorMove::End);
        if masked {
            textarea.set_mask_char(MASK_CHAR);
        }
        Self { textarea, numeric }
    }

    /// Returns the current text.
    #[must_use]
    pub fn text(&self) -> &str {
        self.textarea.lines().first().map_or("", String::as_str)
    }

    /// Returns the entry restriction, if any.
    #[must_use]
    pub const fn numeric(&self) -> Option<NumericKind> {
        self.numeric
    }

    /// Returns the underlying text area for rendering.
    #[must_use]
    pub fn textarea(&self) -> &TextArea<'static> {
        &self.textarea
    }

    /// Handles a key, rejecting edits that would break the single line or
    /// the numeric restriction.
    pub fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
        if matches!(
            key.code,
            KeyCode::Enter | KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down | KeyCode::Esc
        ) {
            return KeyOutcome::Ignored;
        }
        let mut candidate = self.textarea.clone();
        candidate.input(key);
        self.accept(candidate);
        KeyOutcome::Consumed
    }

    /// Inserts pasted text at the cursor, dropping control characters.
    pub fn insert_text(&mut self, text: &str) {
        let filtered: String = text.chars().filter(|c| !c.is_control()).collect();
        let mut candidate = self.textarea.clone();
        candidate.insert_str(&filtered);
        self.accept(candidate);
    }

    fn accept(&mut self, candidate: TextArea<'static>) {
        let lines = candidate.lines();
        if lines.len() != 1 {
            return;
        }
        if let Some(kind) = self.numeric
            && !kind.accepts(&lines[0])
        {
            return;
        }
        self.textarea = candidate;
    }
}

/// On/off toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Checkbox {
    /// Current state.
    pub checked: bool,
}

impl Checkbox {
    /// Toggles on Space or Enter.
    pub fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
        match key.code {
            KeyCode::Char(' ') | KeyCode::Enter => {
                self.checked = !self.checked;
                KeyOutcome::Consumed
            }
            _ => KeyOutcome::Ignored,
        }
    }
}

/// Single selection from a fixed, non-empty set of choices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dropdown {
    choices: Vec<String>,
    selected: usize,
    /// Highlighted choice while the popup is open; `None` when closed.
    open: Option<usize>,
}

impl Dropdown {
    /// Creates a dropdown selecting `initial` when it is one of `choices`,
    /// else the first choice.
    #[must_use]
    pub fn new(choices: Vec<String>, initial: Option<&str>) -> Self {
        let selected = initial
            .and_then(|value| choices.iter().position(|c| c == value))
            .unwrap_or(0);
        Self {
            choices,
            selected,
            open: None,
        }
    }

    /// Returns the choices in display order.
    #[must_use]
    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    /// Returns the selected index.
    #[must_use]
    pub const fn selected_index(&self) -> usize {
        self.selected
    }

    /// Returns the selected choice text.
    #[must_use]
    pub fn selected(&self) -> &str {
        self.choices.get(self.selected).map_or("", String::as_str)
    }

    /// Returns the highlighted index when the popup is open.
    #[must_use]
    pub const fn highlighted(&self) -> Option<usize> {
        self.open
    }

    /// Returns true while the choice popup is open.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// Handles a key. While open, the popup takes every key.
    pub fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
        let len = self.choices.len();
        if len == 0 {
            return KeyOutcome::Ignored;
        }

        if let Some(highlighted) = self.open {
            match key.code {
                KeyCode::Up | KeyCode::Char('k') => {
                    self.open = Some(highlighted.saturating_sub(1));
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    self.open = Some((highlighted + 1).min(len - 1));
                }
                KeyCode::Enter | KeyCode::Char(' ') => {
                    self.selected = highlighted;
                    self.open = None;
                }
                KeyCode::Esc => {
                    self.open = None;
                }
                _ => {}
            }
            return KeyOutcome::Consumed;
        }

        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.open = Some(self.selected);
                KeyOutcome::Consumed
            }
            KeyCode::Left | KeyCode::Char('-') => {
                self.selected = (self.selected + len - 1) % len;
                KeyOutcome::Consumed
            }
            KeyCode::Right | KeyCode::Char('+') => {
                self.selected = (self.selected + 1) % len;
                KeyOutcome::Consumed
            }
            _ => KeyOutcome::Ignored,
        }
    }
}

/// Non-negative counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stepper {
    value: u32,
}

impl Stepper {
    /// Creates a stepper at `value`, clamped to [`MAX_STEPPER_VALUE`].
    #[must_use]
    pub fn new(value: u32) -> Self {
        Self {
            value: value.min(MAX_STEPPER_VALUE),
        }
    }

    /// Returns the current value.
    #[must_use]
    pub const fn value(&self) -> u32 {
        self.value
    }

    /// Sets the value, clamped to [`MAX_STEPPER_VALUE`].
    pub fn set_value(&mut self, value: u32) {
        self.value = value.min(MAX_STEPPER_VALUE);
    }

    /// Steps with Left/Right or `-`/`+`; digits and Backspace edit the
    /// number directly.
    pub fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
        match key.code {
            KeyCode::Left | KeyCode::Char('-') => {
                self.value = self.value.saturating_sub(1);
            }
            KeyCode::Right | KeyCode::Char('+') => {
                self.set_value(self.value.saturating_add(1));
            }
            KeyCode::Char(c) if c.is_ascii_digit() => {
                let digit = c.to_digit(10).unwrap_or(0);
                let next = self.value.saturating_mul(10).saturating_add(digit);
                self.set_value(if next > MAX_STEPPER_VALUE { digit } else { next });
            }
            KeyCode::Backspace => {
                self.value /= 10;
            }
            _ => return KeyOutcome::Ignored,
        }
        KeyOutcome::Consumed
    }
}

/// Ordered list of text entries.
///
/// A fixed list has a set number of entries; a growable list also accepts
/// insertion below the selection and deletion of the selected entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditableList {
    entries: Vec<String>,
    selected: usize,
    growable: bool,
}

impl EditableList {
    /// Creates a fixed list of `n` empty entries.
    #[must_use]
    pub fn fixed(n: usize) -> Self {
        Self {
            entries: vec![String::new(); n],
            selected: 0,
            growable: false,
        }
    }

    /// Creates a growable list holding one empty entry.
    #[must_use]
    pub fn growable() -> Self {
        Self {
            entries: vec![String::new()],
            selected: 0,
            growable: true,
        }
    }

    /// Returns the entries in order.
    #[must_use]
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Returns the selected index (meaningless when the list is empty).
    #[must_use]
    pub const fn selected(&self) -> usize {
        self.selected
    }

    /// Returns true when entries may be inserted and deleted.
    #[must_use]
    pub const fn is_growable(&self) -> bool {
        self.growable
    }

    /// Selects entry `index`, clamped to the list.
    pub fn select(&mut self, index: usize) {
        self.selected = index.min(self.entries.len().saturating_sub(1));
    }

    /// Replaces the text of entry `index`.
    pub fn set_entry(&mut self, index: usize, text: &str) {
        if let Some(entry) = self.entries.get_mut(index) {
            *entry = text.to_string();
        }
    }

    /// Inserts an empty entry below the selection and selects it.
    ///
    /// Returns false for fixed lists.
    pub fn insert_below(&mut self) -> bool {
        if !self.growable {
            return false;
        }
        let index = if self.entries.is_empty() {
            0
        } else {
            self.selected + 1
        };
        self.entries.insert(index, String::new());
        self.selected = index;
        true
    }

    /// Deletes the selected entry.
    ///
    /// Returns false for fixed lists and empty lists.
    pub fn delete_selected(&mut self) -> bool {
        if !self.growable || self.entries.is_empty() {
            return false;
        }
        self.entries.remove(self.selected);
        self.selected = self.selected.min(self.entries.len().saturating_sub(1));
        true
    }

    /// Appends pasted text to the selected entry, dropping control characters.
    pub fn insert_text(&mut self, text: &str) {
        if let Some(entry) = self.entries.get_mut(self.selected) {
            entry.extend(text.chars().filter(|c| !c.is_control()));
        }
    }

    /// Handles entry selection, editing and structural keys.
    ///
    /// Up/Down at either end of the list are left to the form so focus can
    /// move past the list.
    pub fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Up if self.selected > 0 => {
                self.selected -= 1;
                KeyOutcome::Consumed
            }
            KeyCode::Down if self.selected + 1 < self.entries.len() => {
                self.selected += 1;
                KeyOutcome::Consumed
            }
            KeyCode::Insert if self.insert_below() => KeyOutcome::Consumed,
            KeyCode::Char('t') if ctrl && self.insert_below() => KeyOutcome::Consumed,
            KeyCode::Delete if self.delete_selected() => KeyOutcome::Consumed,
            KeyCode::Char('d') if ctrl && self.delete_selected() => KeyOutcome::Consumed,
            KeyCode::Backspace => {
                if let Some(entry) = self.entries.get_mut(self.selected) {
                    entry.pop();
                }
                KeyOutcome::Consumed
            }
            KeyCode::Char(c) if !ctrl && !key.modifiers.contains(KeyModifiers::ALT) => {
                if let Some(entry) = self.entries.get_mut(self.selected) {
                    entry.push(c);
                }
                KeyOutcome::Consumed
            }
            _ => KeyOutcome::Ignored,
        }
    }
}

/// One widget of the closed archetype set.
#[derive(Debug, Clone)]
pub enum FormWidget {
    /// Single-line text field.
    Text(TextField),
    /// Text field with masked characters.
    Masked(TextField),
    /// On/off toggle.
    Checkbox(Checkbox),
    /// Choice selector.
    Dropdown(Dropdown),
    /// Counter.
    Stepper(Stepper),
    /// List of entries.
    List(EditableList),
}

impl FormWidget {
    /// Returns the archetype tag.
    #[must_use]
    pub const fn kind(&self) -> WidgetKind {
        match self {
            Self::Text(_) => WidgetKind::Text,
            Self::Masked(_) => WidgetKind::Masked,
            Self::Checkbox(_) => WidgetKind::Checkbox,
            Self::Dropdown(_) => WidgetKind::Dropdown,
            Self::Stepper(_) => WidgetKind::Stepper,
            Self::List(_) => WidgetKind::EditableList,
        }
    }

    /// Number of terminal rows the widget occupies.
    #[must_use]
    pub fn height(&self) -> u16 {
        match self {
            Self::List(list) => u16::try_from(list.entries().len().max(1)).unwrap_or(u16::MAX),
            _ => 1,
        }
    }

    /// Routes a key to the widget.
    pub fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
        match self {
            Self::Text(field) | Self::Masked(field) => field.handle_key(key),
            Self::Checkbox(checkbox) => checkbox.handle_key(key),
            Self::Dropdown(dropdown) => dropdown.handle_key(key),
            Self::Stepper(stepper) => stepper.handle_key(key),
            Self::List(list) => list.handle_key(key),
        }
    }

    /// Inserts pasted text into widgets that hold text.
    ///
    /// Returns false when the widget has no text to paste into.
    pub fn insert_text(&mut self, text: &str) -> bool {
        match self {
            Self::Text(field) | Self::Masked(field) => {
                field.insert_text(text);
                true
            }
            Self::List(list) => {
                list.insert_text(text);
                true
            }
            _ => false,
        }
    }

    /// Returns true while the widget holds a modal popup open.
    #[must_use]
    pub const fn is_modal(&self) -> bool {
        matches!(self, Self::Dropdown(dropdown) if dropdown.is_open())
    }
}
