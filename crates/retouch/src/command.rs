//! Parsing of shell command lines.
//!
//! One command per line, whitespace separated. Blank lines and lines
//! starting with `#` parse to `None`.

use std::path::PathBuf;
use std::str::FromStr;

use retouch_core::{DiscreteAction, DomainError, FlipAxis, Parameter, Rotation};

/// A parsed shell command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Load an image, replacing the session.
    Open(PathBuf),
    /// Write the committed image, to the given path or the last one used.
    Save(Option<PathBuf>),
    /// A one-shot edit (including `apply`).
    Action(DiscreteAction),
    /// Move a slider. `None` means the parameter's shell default.
    Adjust(Parameter, Option<i64>),
    /// Move a slider by name.
    Set(String, i64),
    /// Return every slider to its default.
    ResetAdjustments,
    /// Step back one snapshot.
    Undo,
    /// Step forward one snapshot.
    Redo,
    /// Commit a copy of the original image.
    Reset,
    /// Print the current image's shape.
    Info,
    /// Print history and slider state.
    Status,
    /// Print [`HELP`].
    Help,
    /// End the session.
    Quit,
}

/// A command line that could not be parsed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    /// The first word is not a command.
    #[error("unknown command {0:?} (try 'help')")]
    UnknownCommand(String),

    /// A required argument is absent.
    #[error("{command}: missing {argument}")]
    MissingArgument {
        command: String,
        argument: &'static str,
    },

    /// More arguments than the command takes.
    #[error("{command}: unexpected argument {argument:?}")]
    UnexpectedArgument { command: String, argument: String },

    /// An argument that should be numeric is not.
    #[error("{command}: {value:?} is not a number")]
    InvalidNumber { command: String, value: String },

    /// A rotation angle or flip axis outside its domain.
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Usage summary printed by `help`.
pub const HELP: &str = "\
commands:
  open PATH               load an image (clears history)
  save [PATH]             write the current image (png, jpg, bmp, webp)
  grayscale               convert to grayscale
  edges [LOW HIGH]        Canny edge map
  sharpen                 3x3 sharpen
  rotate 90|180|270       rotate clockwise
  flip horizontal|vertical
  resize PERCENT          scale by percent
  blur [N]                preview Gaussian blur with kernel N
  brightness N            preview brightness offset (-100..100)
  contrast N              preview contrast offset (-100..100)
  set NAME N              preview a parameter by name
  apply                   commit the previewed adjustments
  reset-adjustments       discard the previewed adjustments
  undo | redo             move through history
  reset                   return to the original image (undoable)
  info | status           describe the image or the session
  help | quit";

/// Parse one line. Returns `Ok(None)` for blank lines and comments.
///
/// # Errors
///
/// Returns a [`ParseError`] naming the command and the bad argument.
pub fn parse(line: &str) -> Result<Option<Command>, ParseError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let mut words = line.split_whitespace();
    let Some(name) = words.next() else {
        return Ok(None);
    };
    let words: Vec<&str> = words.collect();
    let mut args = Args {
        command: name,
        rest: &words,
    };

    let command = match name.to_ascii_lowercase().as_str() {
        "open" => Command::Open(PathBuf::from(args.word("PATH")?)),
        "save" => Command::Save(args.optional().map(PathBuf::from)),
        "grayscale" | "gray" => Command::Action(DiscreteAction::Grayscale),
        "edges" | "edge" => {
            let thresholds = match args.optional() {
                None => None,
                Some(low) => Some((args.parse_number::<f32>(low)?, args.number::<f32>("HIGH")?)),
            };
            Command::Action(DiscreteAction::EdgeDetect { thresholds })
        }
        "sharpen" => Command::Action(DiscreteAction::Sharpen),
        "rotate" => {
            let degrees = args.number::<i64>("DEGREES")?;
            Command::Action(DiscreteAction::Rotate(Rotation::try_from(degrees)?))
        }
        "flip" => Command::Action(DiscreteAction::Flip(args.word("AXIS")?.parse::<FlipAxis>()?)),
        "resize" => Command::Action(DiscreteAction::Resize {
            percent: args.number::<f64>("PERCENT")?,
        }),
        "apply" => Command::Action(DiscreteAction::ApplyAdjustments),
        "blur" => {
            let value = match args.optional() {
                None => None,
                Some(word) => Some(args.parse_number::<i64>(word)?),
            };
            Command::Adjust(Parameter::BlurRadius, value)
        }
        "brightness" => Command::Adjust(Parameter::Brightness, Some(args.number::<i64>("N")?)),
        "contrast" => Command::Adjust(Parameter::Contrast, Some(args.number::<i64>("N")?)),
        "set" => {
            let parameter = args.word("NAME")?.to_string();
            Command::Set(parameter, args.number::<i64>("N")?)
        }
        "reset-adjustments" => Command::ResetAdjustments,
        "undo" => Command::Undo,
        "redo" => Command::Redo,
        "reset" => Command::Reset,
        "info" => Command::Info,
        "status" => Command::Status,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        _ => return Err(ParseError::UnknownCommand(name.to_string())),
    };

    args.finish()?;
    Ok(Some(command))
}

/// Remaining words of a command line.
struct Args<'a> {
    command: &'a str,
    rest: &'a [&'a str],
}

impl<'a> Args<'a> {
    fn optional(&mut self) -> Option<&'a str> {
        let (first, rest) = self.rest.split_first()?;
        self.rest = rest;
        Some(first)
    }

    fn word(&mut self, argument: &'static str) -> Result<&'a str, ParseError> {
        self.optional().ok_or_else(|| ParseError::MissingArgument {
            command: self.command.to_string(),
            argument,
        })
    }

    fn number<T: FromStr>(&mut self, argument: &'static str) -> Result<T, ParseError> {
        let word = self.word(argument)?;
        self.parse_number(word)
    }

    fn parse_number<T: FromStr>(&self, word: &str) -> Result<T, ParseError> {
        word.parse().map_err(|_| ParseError::InvalidNumber {
            command: self.command.to_string(),
            value: word.to_string(),
        })
    }

    fn finish(&self) -> Result<(), ParseError> {
        match self.rest.first() {
            None => Ok(()),
            Some(extra) => Err(ParseError::UnexpectedArgument {
                command: self.command.to_string(),
                argument: (*extra).to_string(),
            }),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn cmd(line: &str) -> Command {
        parse(line).unwrap().unwrap()
    }

    #[test]
    fn blank_and_comment_lines_are_skipped() {
        assert_eq!(parse(""), Ok(None));
        assert_eq!(parse("   "), Ok(None));
        assert_eq!(parse("# rotate 90"), Ok(None));
    }

    #[test]
    fn simple_commands() {
        assert_eq!(cmd("undo"), Command::Undo);
        assert_eq!(cmd("REDO"), Command::Redo);
        assert_eq!(cmd("reset"), Command::Reset);
        assert_eq!(cmd("reset-adjustments"), Command::ResetAdjustments);
        assert_eq!(cmd("apply"), Command::Action(DiscreteAction::ApplyAdjustments));
        assert_eq!(cmd("  grayscale  "), Command::Action(DiscreteAction::Grayscale));
        assert_eq!(cmd("quit"), Command::Quit);
    }

    #[test]
    fn open_and_save() {
        assert_eq!(cmd("open in.png"), Command::Open(PathBuf::from("in.png")));
        assert_eq!(cmd("save"), Command::Save(None));
        assert_eq!(cmd("save out.jpg"), Command::Save(Some(PathBuf::from("out.jpg"))));
        assert_eq!(
            parse("open"),
            Err(ParseError::MissingArgument {
                command: "open".to_string(),
                argument: "PATH",
            }),
        );
    }

    #[test]
    fn edges_take_zero_or_two_thresholds() {
        assert_eq!(
            cmd("edges"),
            Command::Action(DiscreteAction::EdgeDetect { thresholds: None }),
        );
        assert_eq!(
            cmd("edges 50 150"),
            Command::Action(DiscreteAction::EdgeDetect {
                thresholds: Some((50.0, 150.0)),
            }),
        );
        assert!(matches!(parse("edges 50"), Err(ParseError::MissingArgument { .. })));
    }

    #[test]
    fn rotation_is_validated_at_parse_time() {
        assert_eq!(cmd("rotate 270"), Command::Action(DiscreteAction::Rotate(Rotation::Cw270)));
        assert_eq!(
            parse("rotate 45"),
            Err(ParseError::Domain(DomainError::InvalidRotation(45))),
        );
        assert!(matches!(parse("rotate left"), Err(ParseError::InvalidNumber { .. })));
    }

    #[test]
    fn flip_axis() {
        assert_eq!(
            cmd("flip vertical"),
            Command::Action(DiscreteAction::Flip(FlipAxis::Vertical)),
        );
        assert_eq!(
            parse("flip sideways"),
            Err(ParseError::Domain(DomainError::InvalidFlipAxis("sideways".to_string()))),
        );
    }

    #[test]
    fn resize_percent_is_passed_through() {
        assert_eq!(
            cmd("resize 0"),
            Command::Action(DiscreteAction::Resize { percent: 0.0 }),
        );
    }

    #[test]
    fn sliders() {
        assert_eq!(cmd("blur"), Command::Adjust(Parameter::BlurRadius, None));
        assert_eq!(cmd("blur 4"), Command::Adjust(Parameter::BlurRadius, Some(4)));
        assert_eq!(cmd("brightness -20"), Command::Adjust(Parameter::Brightness, Some(-20)));
        assert_eq!(cmd("contrast 15"), Command::Adjust(Parameter::Contrast, Some(15)));
        assert_eq!(cmd("set gamma 3"), Command::Set("gamma".to_string(), 3));
    }

    #[test]
    fn extra_arguments_are_rejected() {
        assert_eq!(
            parse("undo now"),
            Err(ParseError::UnexpectedArgument {
                command: "undo".to_string(),
                argument: "now".to_string(),
            }),
        );
        assert!(matches!(
            parse("brightness 10 20"),
            Err(ParseError::UnexpectedArgument { ref command, .. }) if command == "brightness"
        ));
    }

    #[test]
    fn unknown_command() {
        assert_eq!(parse("crop 10"), Err(ParseError::UnknownCommand("crop".to_string())));
    }
}
