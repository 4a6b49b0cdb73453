//! Canonical text form of a command list
//!
//! `parse_structured(&serialize(list))` reproduces `list` for anything the
//! structured parser produced.

use std::fmt::Write;

use crate::command::model::{is_null_sentinel, ArgToken, Command, CommandList, NULL_TOKEN};

/// Render a command list as `[[index, effect, [args], color, [args], misc], ...]`
pub fn serialize(list: &CommandList) -> String {
    let mut out = String::from("[");
    for (i, command) in list.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_command(&mut out, command);
    }
    out.push(']');
    out
}

fn write_command(out: &mut String, command: &Command) {
    // Writing into a String cannot fail
    let _ = write!(
        out,
        "[{}, {}, {}, {}, {}, {}]",
        command.strip,
        name_text(command.effect.as_deref()),
        args_text(command.effect_args.as_deref()),
        name_text(command.color.as_deref()),
        args_text(command.color_args.as_deref()),
        command.misc.as_deref().unwrap_or(NULL_TOKEN),
    );
}

/// A name spelled like a null sentinel is quoted so it reads back as a name
fn name_text(name: Option<&str>) -> String {
    match name {
        None => NULL_TOKEN.to_string(),
        Some(name) if is_null_sentinel(name) => format!("'{}'", name),
        Some(name) => name.to_string(),
    }
}

fn args_text(args: Option<&[ArgToken]>) -> String {
    match args {
        None => NULL_TOKEN.to_string(),
        Some(tokens) => {
            let parts: Vec<&str> = tokens.iter().map(ArgToken::as_str).collect();
            format!("[{}]", parts.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::parser::parse_structured;
    use crate::namespace::Namespace;

    #[test]
    fn test_serialize_empty_list() {
        assert_eq!(serialize(&CommandList::new()), "[]");
    }

    #[test]
    fn test_serialize_emits_null_for_absent_fields() {
        let list = CommandList::from(vec![Command::new(4)]);
        assert_eq!(serialize(&list), "[[4, None, None, None, None, None]]");
    }

    #[test]
    fn test_serialize_full_command() {
        let list = CommandList::from(vec![
            Command::new(0)
                .with_effect("chase", ["60", "10", "0.3"])
                .with_color("solid", ["255", "0", "15"]),
            Command::new(1)
                .with_effect("sinWave", ["default_bpm * 2"])
                .with_misc("flash()"),
        ]);
        assert_eq!(
            serialize(&list),
            "[[0, chase, [60, 10, 0.3], solid, [255, 0, 15], None], \
             [1, sinWave, [default_bpm * 2], None, None, flash()]]"
        );
    }

    #[test]
    fn test_sentinel_names_quoted() {
        let ns = Namespace::builtin();
        let original = parse_structured("[[0, 'None', None, 'null', None]]", &ns)
            .unwrap()
            .commands;

        let text = serialize(&original);
        assert_eq!(text, "[[0, 'None', None, 'null', None, None]]");
        assert_eq!(parse_structured(&text, &ns).unwrap().commands, original);
    }

    #[test]
    fn test_round_trip_through_parser() {
        let ns = Namespace::builtin();
        let original = parse_structured(
            "[[0,rainbow,[],chase,[60,10,0.3],None],[2, strobe, [time() % 2], None, None, go(1, 2)]]",
            &ns,
        )
        .unwrap()
        .commands;

        let text = serialize(&original);
        let reparsed = parse_structured(&text, &ns).unwrap().commands;
        assert_eq!(reparsed, original);
    }
}
