//! Runs parsed commands against a session and renders their outcome.
//!
//! Every command prints exactly one line, except `HISTOGRAM`, which prints
//! one line per bin, and a successful `EXIT`, which prints nothing. Any
//! command other than `LOAD` reports `No image loaded` before anything else
//! when the session is empty, malformed lines included. A refused `EXIT`
//! is just another failed command: reading goes on.

use std::io::{self, BufRead, Write};

use rasterlab_core::{BinnedHistogram, EditError, Session};

use crate::command::{Command, CommandError};
use crate::config::CliConfig;

/// Whether to keep reading commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// What a successful command has to print.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Line(String),
    Histogram(BinnedHistogram),
    Silent,
}

/// A session plus the settings that shape its output.
#[derive(Debug, Default)]
pub struct Interpreter {
    session: Session,
    config: CliConfig,
}

impl Interpreter {
    pub fn new(config: CliConfig) -> Self {
        Self {
            session: Session::new(),
            config,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Run commands from `input` until a successful `EXIT` or end of input.
    ///
    /// Lines are split on `\n` and decoded lossily, so bytes that are not
    /// UTF-8 only spoil the line they appear on.
    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, out: &mut W) -> io::Result<()> {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            let line = String::from_utf8_lossy(&buf);
            let line = line.trim_end_matches('\n').trim_end_matches('\r');
            if self.handle_line(line, out)? == Flow::Exit {
                break;
            }
        }
        out.flush()
    }

    /// Parse and run one line, writing its outcome to `out`.
    pub fn handle_line<W: Write>(&mut self, line: &str, out: &mut W) -> io::Result<Flow> {
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(CommandError::Blank) => return Ok(Flow::Continue),
            Err(CommandError::Invalid) => {
                log::warn!("Rejected command line {line:?}");
                if self.session.is_loaded() {
                    writeln!(out, "{}", CommandError::Invalid)?;
                } else {
                    writeln!(out, "{}", EditError::NotLoaded)?;
                }
                return Ok(Flow::Continue);
            }
        };

        match self.execute(&command) {
            Ok(reply) => {
                match reply {
                    Reply::Line(line) => writeln!(out, "{line}")?,
                    Reply::Histogram(histogram) => {
                        histogram.write_rows(self.config.histogram.glyph, out)?
                    }
                    Reply::Silent => {}
                }
                // Only an EXIT that closed an image ends the loop
                if matches!(command, Command::Exit) {
                    return Ok(Flow::Exit);
                }
            }
            Err(err) => {
                log::warn!("{command:?} failed: {err}");
                writeln!(out, "{}", failure_message(&command, &err))?;
            }
        }
        Ok(Flow::Continue)
    }

    /// Run `command` and return what it has to print.
    pub fn execute(&mut self, command: &Command) -> Result<Reply, EditError> {
        let session = &mut self.session;
        let line = match command {
            Command::Load(path) => {
                session.load_path(path)?;
                format!("Loaded {}", path.display())
            }
            Command::Select { x1, y1, x2, y2 } => {
                let sel = session.select(*x1, *y1, *x2, *y2)?;
                format!("Selected {} {} {} {}", sel.x1, sel.y1, sel.x2, sel.y2)
            }
            Command::SelectAll => {
                session.select_all()?;
                "Selected ALL".to_string()
            }
            Command::Crop => {
                session.crop()?;
                "Image cropped".to_string()
            }
            Command::Apply(name) => {
                let kernel = session.apply_filter(name)?;
                format!("APPLY {kernel} done")
            }
            Command::Rotate(angle) => {
                session.rotate(*angle)?;
                format!("Rotated {angle}")
            }
            Command::Histogram { width, bins } => {
                return Ok(Reply::Histogram(session.histogram(*width, *bins)?));
            }
            Command::Equalize => {
                session.equalize()?;
                "Equalize done".to_string()
            }
            Command::Save { path, ascii } => {
                session.save(path, *ascii || self.config.save.default_ascii)?;
                format!("Saved {}", path.display())
            }
            Command::Exit => {
                if !session.is_loaded() {
                    return Err(EditError::NotLoaded);
                }
                session.close();
                return Ok(Reply::Silent);
            }
        };
        Ok(Reply::Line(line))
    }
}

/// The single line reported for a failed command.
fn failure_message(command: &Command, err: &EditError) -> String {
    let message = match (command, err) {
        (_, EditError::NotLoaded) => return err.to_string(),
        (Command::Load(path), _) => return format!("Failed to load {}", path.display()),
        (Command::Save { path, .. }, _) => return format!("Failed to save {}", path.display()),
        (Command::Apply(_), EditError::UnsupportedFormat { .. }) => "Easy, Charlie Chaplin",
        (Command::Apply(_), EditError::UnknownFilter(_)) => "APPLY parameter invalid",
        (_, EditError::InvalidRegion { .. }) => "Invalid set of coordinates",
        (_, EditError::UnsupportedAngle(_)) => "Unsupported rotation angle",
        (_, EditError::NonSquareSelection { .. }) => "The selection must be square",
        (_, EditError::UnsupportedFormat { .. }) => "Black and white image needed",
        (_, EditError::InvalidBinning(_)) => "Invalid set of parameters",
        _ => return err.to_string(),
    };
    message.to_string()
}
