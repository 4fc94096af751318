//! Argument vector assembly from widget state.

use ratatui::crossterm::event::KeyCode;

use super::helpers::{create_test_form, ctrl_key, git_command, greet_command, key, type_text};
use crate::core::{CommandSpec, OptionSpec};
use crate::form::map_option;

fn tokens(form: &crate::form::Form, option: &str) -> Vec<String> {
    form.binding_by_name(option).unwrap().extract()
}

#[test]
fn defaults_give_name_followed_by_each_expansion_in_order() {
    let command = greet_command();
    let form = create_test_form(&command);

    let mut expected = vec!["greet".to_string()];
    for option in &command.options {
        expected.extend(map_option(option).extract());
    }
    assert_eq!(form.argument_vector().as_slice(), expected.as_slice());
    assert_eq!(
        form.argument_vector().into_inner(),
        vec![
            "greet", "--name", "world", "--count", "1", "--no-shout", "--mode", "plain",
            "--points", "", "", "", "--tags", "", "--password", "",
        ]
    );
}

#[test]
fn command_without_options_yields_only_its_name() {
    let form = create_test_form(&CommandSpec::new("true"));
    assert_eq!(form.argument_vector().into_inner(), vec!["true"]);
}

#[test]
fn extraction_is_idempotent() {
    let mut form = create_test_form(&greet_command());
    assert!(form.focus_option("tags"));
    type_text(&mut form, "x");

    let first = form.argument_vector();
    let second = form.argument_vector();
    assert_eq!(first, second);
}

mod flags {
    use super::*;

    #[test]
    fn checked_flag_emits_primary_token() {
        let mut form = create_test_form(&greet_command());
        assert!(form.focus_option("shout"));
        form.handle_key(key(KeyCode::Char(' ')));

        assert_eq!(tokens(&form, "shout"), vec!["--shout"]);
        assert!(!form.argument_vector().as_slice().contains(&"--no-shout".to_string()));
    }

    #[test]
    fn unchecked_flag_emits_secondary_token() {
        let mut form = create_test_form(&greet_command());
        assert!(form.focus_option("shout"));
        form.handle_key(key(KeyCode::Enter));
        form.handle_key(key(KeyCode::Enter));

        assert_eq!(tokens(&form, "shout"), vec!["--no-shout"]);
    }

    #[test]
    fn unchecked_flag_without_secondary_emits_nothing() {
        let form = create_test_form(&git_command());
        assert_eq!(
            form.argument_vector().into_inner(),
            vec!["git", "--dir", ".", "status"]
        );
    }

    #[test]
    fn count_repeats_flag() {
        let mut form = create_test_form(&greet_command());
        assert!(form.focus_option("verbose"));
        for _ in 0..3 {
            form.handle_key(key(KeyCode::Right));
        }

        assert_eq!(tokens(&form, "verbose"), vec!["--verbose"; 3]);
    }

    #[test]
    fn count_typed_as_digit() {
        let mut form = create_test_form(&greet_command());
        assert!(form.focus_option("verbose"));
        type_text(&mut form, "2");

        assert_eq!(tokens(&form, "verbose"), vec!["--verbose"; 2]);
    }
}

mod values {
    use super::*;

    #[test]
    fn edited_text_replaces_default() {
        let mut form = create_test_form(&greet_command());
        assert!(form.focus_option("name"));
        for _ in 0.."world".len() {
            form.handle_key(key(KeyCode::Backspace));
        }
        type_text(&mut form, "Ada Lovelace");

        assert_eq!(tokens(&form, "name"), vec!["--name", "Ada Lovelace"]);
    }

    #[test]
    fn integer_field_drops_non_digits() {
        let mut form = create_test_form(&greet_command());
        assert!(form.focus_option("count"));
        type_text(&mut form, "x2.");

        assert_eq!(tokens(&form, "count"), vec!["--count", "12"]);
    }

    #[test]
    fn dropdown_emits_selected_choice() {
        let mut form = create_test_form(&greet_command());
        assert!(form.focus_option("mode"));
        form.handle_key(key(KeyCode::Left));

        assert_eq!(tokens(&form, "mode"), vec!["--mode", "loud"]);
    }

    #[test]
    fn masked_field_emits_real_text() {
        let mut form = create_test_form(&greet_command());
        assert!(form.focus_option("password"));
        type_text(&mut form, "s3cret");

        assert_eq!(tokens(&form, "password"), vec!["--password", "s3cret"]);
    }

    #[test]
    fn positional_emits_value_only() {
        let form = create_test_form(
            &CommandSpec::new("cat").with_option(OptionSpec::positional("file").with_default("a b")),
        );
        assert_eq!(form.argument_vector().into_inner(), vec!["cat", "a b"]);
    }
}

mod lists {
    use super::*;

    #[test]
    fn fixed_list_emits_entries_in_order() {
        let mut form = create_test_form(&greet_command());
        assert!(form.focus_option("points"));
        type_text(&mut form, "1");
        form.handle_key(key(KeyCode::Down));
        type_text(&mut form, "2");
        form.handle_key(key(KeyCode::Tab));
        type_text(&mut form, "3");

        assert_eq!(tokens(&form, "points"), vec!["--points", "1", "2", "3"]);
    }

    #[test]
    fn fixed_list_ignores_insert_and_delete() {
        let mut form = create_test_form(&greet_command());
        assert!(form.focus_option("points"));
        form.handle_key(key(KeyCode::Insert));
        form.handle_key(key(KeyCode::Delete));

        assert_eq!(tokens(&form, "points"), vec!["--points", "", "", ""]);
    }

    #[test]
    fn growable_list_keeps_order_through_insert_and_delete() {
        let mut form = create_test_form(&greet_command());
        assert!(form.focus_option("tags"));
        type_text(&mut form, "a");
        form.handle_key(key(KeyCode::Insert));
        type_text(&mut form, "b");
        form.handle_key(ctrl_key(KeyCode::Char('t')));
        type_text(&mut form, "c");
        assert_eq!(tokens(&form, "tags"), vec!["--tags", "a", "b", "c"]);

        form.handle_key(key(KeyCode::Up));
        form.handle_key(key(KeyCode::Delete));
        assert_eq!(tokens(&form, "tags"), vec!["--tags", "a", "c"]);

        form.handle_key(key(KeyCode::Up));
        form.handle_key(key(KeyCode::Insert));
        type_text(&mut form, "z");
        assert_eq!(tokens(&form, "tags"), vec!["--tags", "a", "z", "c"]);
    }

    #[test]
    fn emptied_growable_list_emits_flag_alone() {
        let mut form = create_test_form(&greet_command());
        assert!(form.focus_option("tags"));
        form.handle_key(ctrl_key(KeyCode::Char('d')));

        assert_eq!(tokens(&form, "tags"), vec!["--tags"]);
    }
}

mod groups {
    use super::*;

    #[test]
    fn vector_holds_root_intermediate_and_leaf_segments() {
        let mut form = create_test_form(&git_command());
        form.select_tab(1);

        assert_eq!(
            form.argument_vector().into_inner(),
            vec!["git", "--dir", ".", "remote", "-v", "add", "origin"]
        );
    }

    #[test]
    fn only_active_tab_contributes() {
        let mut form = create_test_form(&git_command());
        form.select_tab(1);
        assert!(form.focus_option("verbose"));
        form.handle_key(key(KeyCode::Char(' ')));
        form.select_tab(0);

        let argv = form.argument_vector().into_inner();
        assert_eq!(argv, vec!["git", "--dir", ".", "status"]);
    }

    #[test]
    fn root_edits_apply_to_every_tab() {
        let mut form = create_test_form(&git_command());
        assert!(form.focus_option("dir"));
        type_text(&mut form, "/repo");
        form.select_tab(1);

        assert_eq!(form.argument_vector().as_slice()[2], "./repo");
    }

    #[test]
    fn tab_edits_survive_switching_away() {
        let mut form = create_test_form(&git_command());
        form.select_tab(1);
        assert!(form.focus_option("name"));
        type_text(&mut form, "2");
        form.select_tab(0);
        form.select_tab(1);

        assert_eq!(form.argument_vector().as_slice().last().unwrap(), "origin2");
    }
}
