// Console command parsing
use crate::domain::geometry::{Point, Viewport};
use crate::presentation::keyboard::{KeyEvent, KeyTarget, TOGGLE_PANEL};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Toggle,
    Show,
    Hide,
    Minimize,
    Refresh,
    SetInterval(i64),
    Move { left: f64, top: f64 },
    Drag { from: Point, to: Point },
    Resize(Viewport),
    Quit,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("unknown command: {0}")]
    Unknown(String),
    #[error("{command} expects {expected} argument(s)")]
    Arity {
        command: &'static str,
        expected: usize,
    },
    #[error("not a number: {0}")]
    InvalidNumber(String),
}

/// Parses one input line. Blank lines yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<Command>, InputError> {
    if let Some(command) = parse_key_bytes(line) {
        return Ok(command);
    }

    let mut words = line.split_whitespace();
    let Some(name) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();

    let command = match name.to_ascii_lowercase().as_str() {
        "g" | "toggle" => no_args("toggle", &args, Command::Toggle)?,
        "show" => no_args("show", &args, Command::Show)?,
        "hide" => no_args("hide", &args, Command::Hide)?,
        "m" | "minimize" => no_args("minimize", &args, Command::Minimize)?,
        "r" | "refresh" => no_args("refresh", &args, Command::Refresh)?,
        "q" | "quit" => no_args("quit", &args, Command::Quit)?,
        "f" | "freq" => {
            let [ms] = numbers::<1>("freq", &args)?;
            Command::SetInterval(ms.round() as i64)
        }
        "move" => {
            let [left, top] = numbers::<2>("move", &args)?;
            Command::Move { left, top }
        }
        "drag" => {
            let [x0, y0, x1, y1] = numbers::<4>("drag", &args)?;
            Command::Drag {
                from: Point::new(x0, y0),
                to: Point::new(x1, y1),
            }
        }
        "resize" => {
            let [width, height] = numbers::<2>("resize", &args)?;
            Command::Resize(Viewport::new(width, height))
        }
        other => return Err(InputError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

/// Raw control bytes (a terminal's Ctrl+G arrives as 0x07).
///
/// A line made only of control bytes is a bare key press; mixed with text the
/// bytes count as typed into text and never trigger shortcuts.
fn parse_key_bytes(line: &str) -> Option<Option<Command>> {
    let bytes = line.trim_matches(|c: char| c == ' ' || c == '\r').as_bytes();
    if !bytes.iter().any(u8::is_ascii_control) {
        return None;
    }
    let target = if bytes.iter().all(u8::is_ascii_control) {
        KeyTarget::Document
    } else {
        KeyTarget::TextInput
    };
    let toggled = bytes
        .iter()
        .filter_map(|b| KeyEvent::from_control_byte(*b, target))
        .any(|event| TOGGLE_PANEL.matches(&event));
    match target {
        KeyTarget::Document => Some(toggled.then_some(Command::Toggle)),
        // fall through to word parsing, which rejects the stray bytes
        KeyTarget::TextInput => None,
    }
}

fn no_args(command: &'static str, args: &[&str], parsed: Command) -> Result<Command, InputError> {
    if args.is_empty() {
        Ok(parsed)
    } else {
        Err(InputError::Arity {
            command,
            expected: 0,
        })
    }
}

fn numbers<const N: usize>(command: &'static str, args: &[&str]) -> Result<[f64; N], InputError> {
    if args.len() != N {
        return Err(InputError::Arity {
            command,
            expected: N,
        });
    }
    let mut values = [0.0; N];
    for (slot, raw) in values.iter_mut().zip(args) {
        *slot = raw
            .trim_end_matches("px")
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| InputError::InvalidNumber(raw.to_string()))?;
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_commands() {
        assert_eq!(parse_line("g"), Ok(Some(Command::Toggle)));
        assert_eq!(parse_line("  Toggle "), Ok(Some(Command::Toggle)));
        assert_eq!(parse_line("show"), Ok(Some(Command::Show)));
        assert_eq!(parse_line("hide"), Ok(Some(Command::Hide)));
        assert_eq!(parse_line("m"), Ok(Some(Command::Minimize)));
        assert_eq!(parse_line("refresh"), Ok(Some(Command::Refresh)));
        assert_eq!(parse_line("q"), Ok(Some(Command::Quit)));
        assert_eq!(parse_line(""), Ok(None));
        assert_eq!(parse_line("   "), Ok(None));
    }

    #[test]
    fn test_commands_with_arguments() {
        assert_eq!(parse_line("f 5000"), Ok(Some(Command::SetInterval(5000))));
        assert_eq!(
            parse_line("move 10px 20.5"),
            Ok(Some(Command::Move {
                left: 10.0,
                top: 20.5
            }))
        );
        assert_eq!(
            parse_line("drag 1 2 3 4"),
            Ok(Some(Command::Drag {
                from: Point::new(1.0, 2.0),
                to: Point::new(3.0, 4.0)
            }))
        );
        assert_eq!(
            parse_line("resize 800 600"),
            Ok(Some(Command::Resize(Viewport::new(800.0, 600.0))))
        );
    }

    #[test]
    fn test_invalid_input() {
        assert_eq!(parse_line("explode"), Err(InputError::Unknown("explode".into())));
        assert_eq!(
            parse_line("move 10"),
            Err(InputError::Arity {
                command: "move",
                expected: 2
            })
        );
        assert_eq!(parse_line("f fast"), Err(InputError::InvalidNumber("fast".into())));
        assert_eq!(parse_line("f NaN"), Err(InputError::InvalidNumber("NaN".into())));
        assert!(parse_line("hide now").is_err());
    }

    #[test]
    fn test_ctrl_g_byte() {
        assert_eq!(parse_line("\x07"), Ok(Some(Command::Toggle)));
        assert_eq!(parse_line("\x07\r"), Ok(Some(Command::Toggle)));
        // other control keys do nothing
        assert_eq!(parse_line("\x08"), Ok(None));
    }

    #[test]
    fn test_ctrl_g_inside_text_is_not_a_shortcut() {
        assert!(parse_line("move 1\x07 2").is_err());
        assert_eq!(parse_line("g\x07"), Err(InputError::Unknown("g\x07".into())));
    }
}
