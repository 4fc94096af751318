//! Option to widget mapping.
//!
//! [`map_option`] chooses the widget archetype for an option and seeds it
//! from the declared default. The resulting [`WidgetBinding`] turns the
//! widget's current state back into command-line tokens on demand.
//!
//! Rules are checked in order:
//!
//! 1. multi-valued arity: editable list (fixed rows, or growable when
//!    unbounded)
//! 2. boolean flag: checkbox
//! 3. counted flag: stepper
//! 4. choice set: dropdown
//! 5. anything else: text field, numeric-restricted for single integer or
//!    float values, masked when input is hidden

use crate::core::{Arity, OptionSpec, ValueType};

use super::widget::{
    Checkbox, Dropdown, EditableList, FormWidget, NumericKind, Stepper, TextField,
};

/// An option paired with the widget that edits it.
#[derive(Debug, Clone)]
pub struct WidgetBinding {
    option: OptionSpec,
    widget: FormWidget,
}

impl WidgetBinding {
    /// Returns the option this binding edits.
    #[must_use]
    pub const fn option(&self) -> &OptionSpec {
        &self.option
    }

    /// Row label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.option.name
    }

    /// Help text, if declared.
    #[must_use]
    pub fn help(&self) -> Option<&str> {
        self.option.help.as_deref()
    }

    /// Returns the widget.
    #[must_use]
    pub const fn widget(&self) -> &FormWidget {
        &self.widget
    }

    /// Returns the widget for editing.
    pub fn widget_mut(&mut self) -> &mut FormWidget {
        &mut self.widget
    }

    /// Tokens this option currently contributes to the argument vector.
    ///
    /// Positional options (no flag token) contribute their values only.
    /// Reading the widget never changes it, so repeated calls agree.
    #[must_use]
    pub fn extract(&self) -> Vec<String> {
        let flag = self.option.flag.as_ref();
        match &self.widget {
            FormWidget::Checkbox(checkbox) => {
                if checkbox.checked {
                    flag.into_iter().cloned().collect()
                } else {
                    self.option.secondary_flags.clone()
                }
            }
            FormWidget::Stepper(stepper) => flag
                .map(|flag| vec![flag.clone(); usize::try_from(stepper.value()).unwrap_or(0)])
                .unwrap_or_default(),
            FormWidget::Text(field) | FormWidget::Masked(field) => {
                with_flag(flag, [field.text().to_string()])
            }
            FormWidget::Dropdown(dropdown) => with_flag(flag, [dropdown.selected().to_string()]),
            FormWidget::List(list) => with_flag(flag, list.entries().iter().cloned()),
        }
    }
}

fn with_flag<I>(flag: Option<&String>, values: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    flag.cloned().into_iter().chain(values).collect()
}

/// Builds the widget for one option.
///
/// `Fixed(0)` and `Fixed(1)` only come from hand-built declarations that
/// skipped validation; both are mapped as a single value.
#[must_use]
pub fn map_option(option: &OptionSpec) -> WidgetBinding {
    let arity = match option.arity {
        Arity::Fixed(n) => Arity::exactly(n),
        other => other,
    };

    let widget = if arity.is_multi() {
        match arity {
            Arity::Fixed(n) => FormWidget::List(EditableList::fixed(n)),
            _ => FormWidget::List(EditableList::growable()),
        }
    } else if option.is_flag() {
        FormWidget::Checkbox(Checkbox {
            checked: option.default.as_ref().is_some_and(|d| d.is_truthy()),
        })
    } else if option.is_count() {
        FormWidget::Stepper(Stepper::new(
            option.default.as_ref().map_or(0, |d| d.as_count()),
        ))
    } else if let Some(choices) = option.choices() {
        let initial = option.default.as_ref().map(ToString::to_string);
        FormWidget::Dropdown(Dropdown::new(choices.to_vec(), initial.as_deref()))
    } else {
        let numeric = match option.value_type {
            ValueType::Integer => Some(NumericKind::Integer),
            ValueType::Float => Some(NumericKind::Float),
            _ => None,
        };
        let field = TextField::new(&option.default_text(), numeric, option.hide_input);
        if option.hide_input {
            FormWidget::Masked(field)
        } else {
            FormWidget::Text(field)
        }
    };

    WidgetBinding {
        option: option.clone(),
        widget,
    }
}
