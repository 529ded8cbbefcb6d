//! Command line parsing.
//!
//! Commands are whitespace-separated tokens; the verb and its arguments are
//! case-sensitive. A line with the wrong number of arguments, an argument
//! that is not a number where one is expected, or an unknown verb is
//! [`CommandError::Invalid`].

use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

/// One parsed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Load(PathBuf),
    Select { x1: i32, y1: i32, x2: i32, y2: i32 },
    SelectAll,
    Crop,
    /// Filter name, validated when the command runs.
    Apply(String),
    Rotate(i32),
    Histogram { width: u32, bins: u32 },
    Equalize,
    /// `ascii` is set when the line ends with the `ascii` keyword.
    Save { path: PathBuf, ascii: bool },
    Exit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// Nothing but whitespace.
    #[error("empty line")]
    Blank,

    #[error("Invalid command")]
    Invalid,
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let command = match tokens.as_slice() {
            [] => return Err(CommandError::Blank),
            ["LOAD", path] => Command::Load(PathBuf::from(path)),
            ["SELECT", "ALL"] => Command::SelectAll,
            ["SELECT", x1, y1, x2, y2] => Command::Select {
                x1: number(x1)?,
                y1: number(y1)?,
                x2: number(x2)?,
                y2: number(y2)?,
            },
            ["CROP"] => Command::Crop,
            ["APPLY", filter] => Command::Apply(filter.to_string()),
            ["ROTATE", angle] => Command::Rotate(number(angle)?),
            ["HISTOGRAM", width, bins] => Command::Histogram {
                width: number(width)?,
                bins: number(bins)?,
            },
            ["EQUALIZE"] => Command::Equalize,
            ["SAVE", path] => Command::Save {
                path: PathBuf::from(path),
                ascii: false,
            },
            ["SAVE", path, "ascii"] => Command::Save {
                path: PathBuf::from(path),
                ascii: true,
            },
            ["EXIT"] => Command::Exit,
            _ => return Err(CommandError::Invalid),
        };
        Ok(command)
    }
}

fn number<T: FromStr>(token: &str) -> Result<T, CommandError> {
    token.parse().map_err(|_| CommandError::Invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Result<Command, CommandError> {
        line.parse()
    }

    #[test]
    fn test_parse_every_verb() {
        assert_eq!(parse("LOAD in.ppm"), Ok(Command::Load("in.ppm".into())));
        assert_eq!(parse("SELECT ALL"), Ok(Command::SelectAll));
        assert_eq!(
            parse("SELECT 0 1 -2 3"),
            Ok(Command::Select { x1: 0, y1: 1, x2: -2, y2: 3 })
        );
        assert_eq!(parse("CROP"), Ok(Command::Crop));
        assert_eq!(parse("APPLY BLUR"), Ok(Command::Apply("BLUR".into())));
        assert_eq!(parse("ROTATE -90"), Ok(Command::Rotate(-90)));
        assert_eq!(
            parse("HISTOGRAM 10 4"),
            Ok(Command::Histogram { width: 10, bins: 4 })
        );
        assert_eq!(parse("EQUALIZE"), Ok(Command::Equalize));
        assert_eq!(
            parse("SAVE out.pgm"),
            Ok(Command::Save { path: "out.pgm".into(), ascii: false })
        );
        assert_eq!(
            parse("SAVE out.pgm ascii"),
            Ok(Command::Save { path: "out.pgm".into(), ascii: true })
        );
        assert_eq!(parse("EXIT"), Ok(Command::Exit));
    }

    #[test]
    fn test_extra_whitespace() {
        assert_eq!(parse("  ROTATE\t180  \r"), Ok(Command::Rotate(180)));
    }

    #[test]
    fn test_blank_lines() {
        assert_eq!(parse(""), Err(CommandError::Blank));
        assert_eq!(parse("   \t"), Err(CommandError::Blank));
    }

    #[test]
    fn test_invalid_lines() {
        for line in [
            "APPLY",
            "LOAD",
            "LOAD a b",
            "SELECT 1 2 3",
            "SELECT 1 2 3 abc",
            "SELECT all",
            "ROTATE ninety",
            "HISTOGRAM 10",
            "HISTOGRAM -1 4",
            "SAVE out.ppm binary",
            "CROP now",
            "load in.ppm",
            "RESIZE 2",
        ] {
            assert_eq!(parse(line), Err(CommandError::Invalid), "{line}");
        }
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
