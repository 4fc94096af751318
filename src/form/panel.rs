//! Panels built from a command declaration.
//!
//! A leaf command becomes a single panel. A group keeps its own options in a
//! root segment shown above the tabs, and gets one tab per leaf reachable
//! through its sub-commands. Intermediate groups are flattened: a tab for
//! `remote add` holds the `remote` options followed by the `add` options.

use crate::core::{ArgumentBuilder, CommandSpec};

use super::mapper::{WidgetBinding, map_option};

/// The bindings of one command in a command path.
#[derive(Debug, Clone)]
pub struct Segment {
    /// Command name, pushed before the bindings' tokens.
    pub name: String,
    /// One binding per declared option, in declaration order.
    pub bindings: Vec<WidgetBinding>,
}

impl Segment {
    /// Maps every option of `command`.
    #[must_use]
    pub fn from_command(command: &CommandSpec) -> Self {
        Self {
            name: command.name.clone(),
            bindings: command.options.iter().map(map_option).collect(),
        }
    }

    /// Appends the command name and every option's tokens.
    pub fn extend_args(&self, builder: &mut ArgumentBuilder) {
        builder.push_command(&self.name);
        for binding in &self.bindings {
            builder.extend(binding.extract());
        }
    }
}

/// A sub-command panel.
#[derive(Debug, Clone)]
pub struct Tab {
    /// Space-separated command path below the root, e.g. `remote add`.
    pub title: String,
    /// Description of the leaf command.
    pub about: Option<String>,
    /// Segments from the outermost intermediate group to the leaf.
    pub segments: Vec<Segment>,
}

impl Tab {
    /// Number of option rows in the tab.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.segments.iter().map(|s| s.bindings.len()).sum()
    }

    /// Returns the binding at `row`, counting across segments.
    #[must_use]
    pub fn binding(&self, row: usize) -> Option<&WidgetBinding> {
        self.bindings().nth(row)
    }

    /// Returns the binding at `row` for editing.
    pub fn binding_mut(&mut self, row: usize) -> Option<&mut WidgetBinding> {
        self.segments
            .iter_mut()
            .flat_map(|s| s.bindings.iter_mut())
            .nth(row)
    }

    /// Iterates over bindings in row order.
    pub fn bindings(&self) -> impl Iterator<Item = &WidgetBinding> {
        self.segments.iter().flat_map(|s| s.bindings.iter())
    }
}

/// Builds one tab per leaf under `group`, depth first.
#[must_use]
pub fn build_tabs(group: &CommandSpec) -> Vec<Tab> {
    let mut tabs = Vec::new();
    let mut path = Vec::new();
    collect_tabs(group, &mut path, &mut tabs);
    tabs
}

fn collect_tabs<'a>(
    group: &'a CommandSpec,
    path: &mut Vec<&'a CommandSpec>,
    tabs: &mut Vec<Tab>,
) {
    for subcommand in &group.subcommands {
        path.push(subcommand);
        if subcommand.is_group() {
            collect_tabs(subcommand, path, tabs);
        } else {
            tabs.push(Tab {
                title: path
                    .iter()
                    .map(|c| c.name.as_str())
                    .collect::<Vec<_>>()
                    .join(" "),
                about: subcommand.about.clone(),
                segments: path.iter().map(|c| Segment::from_command(c)).collect(),
            });
        }
        path.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{OptionSpec, ValueType};

    fn git() -> CommandSpec {
        CommandSpec::new("git")
            .with_option(OptionSpec::new("dir"))
            .with_subcommand(
                CommandSpec::new("status").with_option(
                    OptionSpec::new("short")
                        .with_flag("-s")
                        .with_type(ValueType::Flag),
                ),
            )
            .with_subcommand(
                CommandSpec::new("remote")
                    .with_option(
                        OptionSpec::new("verbose")
                            .with_flag("-v")
                            .with_type(ValueType::Flag)
                            .with_default(true),
                    )
                    .with_subcommand(
                        CommandSpec::new("add")
                            .with_about("Add a remote")
                            .with_option(OptionSpec::positional("name").with_default("origin")),
                    )
                    .with_subcommand(CommandSpec::new("remove")),
            )
    }

    #[test]
    fn tabs_follow_leaves_depth_first() {
        let titles: Vec<String> = build_tabs(&git()).into_iter().map(|t| t.title).collect();
        assert_eq!(titles, ["status", "remote add", "remote remove"]);
    }

    #[test]
    fn nested_tab_carries_intermediate_segment() {
        let tabs = build_tabs(&git());
        let add = &tabs[1];
        assert_eq!(add.about.as_deref(), Some("Add a remote"));
        let names: Vec<&str> = add.segments.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["remote", "add"]);
        assert_eq!(add.row_count(), 2);
        assert_eq!(add.binding(1).map(WidgetBinding::label), Some("name"));
    }

    #[test]
    fn segments_extend_in_path_order() {
        let tabs = build_tabs(&git());
        let mut builder = ArgumentBuilder::new();
        for segment in &tabs[1].segments {
            segment.extend_args(&mut builder);
        }
        assert_eq!(builder.finish().as_slice(), ["remote", "-v", "add", "origin"]);
    }

    #[test]
    fn leaf_has_no_tabs() {
        assert!(build_tabs(&CommandSpec::new("tool")).is_empty());
    }

    #[test]
    fn binding_mut_reaches_later_segments() {
        let mut tabs = build_tabs(&git());
        assert!(tabs[1].binding_mut(1).is_some());
        assert!(tabs[1].binding_mut(2).is_none());
    }
}
