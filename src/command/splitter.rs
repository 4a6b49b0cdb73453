//! Depth-aware field splitting for bracket bodies

use crate::command::CommandError;

/// Split the body of a bracketed list into its top-level fields
///
/// The body must not include the outer brackets. Commas only separate fields
/// at nesting depth zero, where `[` and `(` open a level and `]` and `)` close
/// one. Every field is trimmed. An empty (or all-whitespace) body yields no
/// fields. There is no quoting: a comma outside brackets always splits.
pub fn split_fields(body: &str) -> Result<Vec<&str>, CommandError> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut fields = Vec::new();
    let mut depth: usize = 0;
    let mut start = 0;

    for (pos, ch) in body.char_indices() {
        match ch {
            '[' | '(' => depth += 1,
            ']' | ')' => {
                depth = depth.checked_sub(1).ok_or_else(|| CommandError::Structural {
                    reason: format!("unexpected '{}' at byte {}", ch, pos),
                })?;
            }
            ',' if depth == 0 => {
                fields.push(body[start..pos].trim());
                start = pos + 1;
            }
            _ => {}
        }
    }

    if depth != 0 {
        return Err(CommandError::Structural {
            reason: format!("{} unclosed bracket(s)", depth),
        });
    }

    fields.push(body[start..].trim());
    Ok(fields)
}

/// Strip one pair of enclosing square brackets, returning the inner body
pub fn bracket_body(text: &str) -> Option<&str> {
    text.trim()
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
}
