//! Line-oriented editing session.
//!
//! Each command prints one status line to the output writer, the way a
//! status bar would report it. Errors are returned to the caller, which
//! decides whether the session continues.

use std::fmt::Display;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use retouch_core::{DiscreteAction, EditController, EditError, Parameter, Snapshot};
use retouch_io::IoError;
use tracing::{debug, warn};

use crate::command::{self, Command, HELP, ParseError};

/// Errors from a single shell command.
#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    /// The line is not a valid command.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The editor rejected the command.
    #[error(transparent)]
    Edit(#[from] EditError),

    /// Loading or saving an image failed.
    #[error(transparent)]
    Io(#[from] IoError),

    /// The command needs an open image.
    #[error("no image loaded")]
    NoImage,

    /// `save` without a path, and no image was opened from disk.
    #[error("no output path: use 'save PATH'")]
    NoPath,

    /// Reading commands or writing status lines failed.
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),

    /// A failing line in strict mode.
    #[error("line {line}: {source}")]
    Script {
        line: usize,
        #[source]
        source: Box<Self>,
    },
}

/// Whether the session should keep reading commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Read the next line.
    Continue,
    /// Stop the session.
    Quit,
}

/// An editing session bound to one controller.
#[derive(Debug)]
pub struct Shell {
    controller: EditController,
    path: Option<PathBuf>,
}

impl Shell {
    #[must_use]
    pub const fn new(controller: EditController) -> Self {
        Self {
            controller,
            path: None,
        }
    }

    #[must_use]
    pub const fn controller(&self) -> &EditController {
        &self.controller
    }

    /// Load `path` into the session and remember it as the save target.
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::Io`] if the image cannot be loaded; the
    /// session is unchanged in that case.
    pub fn open(&mut self, path: &Path) -> Result<&Snapshot, ShellError> {
        let snapshot = retouch_io::load(path)?;
        self.open_snapshot(snapshot, Some(path.to_path_buf()));
        self.controller.current().ok_or(ShellError::NoImage)
    }

    /// Start a session on an in-memory image.
    pub fn open_snapshot(&mut self, snapshot: Snapshot, path: Option<PathBuf>) {
        self.controller.open(snapshot);
        self.path = path;
    }

    /// Read and execute commands until end of input or `quit`.
    ///
    /// Errors are reported to stderr and the session continues, unless
    /// `strict` is set, in which case the first failing line ends the
    /// run with [`ShellError::Script`].
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::Output`] if reading input or writing
    /// output fails, and [`ShellError::Script`] in strict mode.
    pub fn run(
        &mut self,
        input: impl BufRead,
        out: &mut impl Write,
        strict: bool,
    ) -> Result<(), ShellError> {
        for (index, line) in input.lines().enumerate() {
            let line = line?;
            match self.execute_line(&line, out) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => break,
                Err(ShellError::Output(e)) => return Err(ShellError::Output(e)),
                Err(e) if strict => {
                    return Err(ShellError::Script {
                        line: index + 1,
                        source: Box::new(e),
                    });
                }
                Err(e) => {
                    warn!(line = index + 1, %e, "command failed");
                    eprintln!("line {}: error: {e}", index + 1);
                }
            }
        }
        Ok(())
    }

    /// Parse and execute one line.
    ///
    /// # Errors
    ///
    /// Returns the parse or execution error; state is unchanged.
    pub fn execute_line(&mut self, line: &str, out: &mut impl Write) -> Result<Flow, ShellError> {
        match command::parse(line)? {
            None => Ok(Flow::Continue),
            Some(command) => self.execute(command, out),
        }
    }

    /// Execute one command and print its status line.
    ///
    /// # Errors
    ///
    /// Returns the error that stopped the command; state is unchanged.
    pub fn execute(&mut self, command: Command, out: &mut impl Write) -> Result<Flow, ShellError> {
        debug!(?command, "executing");
        match command {
            Command::Open(path) => {
                let info = self.open(&path)?.info();
                writeln!(
                    out,
                    "opened {}: {}x{}, {} channels",
                    path.display(),
                    info.width,
                    info.height,
                    info.channels,
                )?;
            }
            Command::Save(path) => {
                let snapshot = self.controller.current().ok_or(ShellError::NoImage)?;
                let path = path.or_else(|| self.path.clone()).ok_or(ShellError::NoPath)?;
                retouch_io::save(&path, snapshot)?;
                writeln!(out, "saved {}", path.display())?;
                self.path = Some(path);
            }
            Command::Action(action) => self.apply(action, out)?,
            Command::Adjust(parameter, value) => {
                let value = value.unwrap_or_else(|| self.default_value(parameter));
                let effective = self.controller.set_adjustment(parameter, value);
                self.print_adjusted(parameter, effective, out)?;
            }
            Command::Set(name, value) => {
                let parameter = name.parse::<Parameter>().map_err(EditError::from)?;
                let effective = self.controller.set_adjustment(parameter, value);
                self.print_adjusted(parameter, effective, out)?;
            }
            Command::ResetAdjustments => {
                self.controller.reset_adjustments();
                writeln!(out, "adjustments reset")?;
            }
            Command::Undo => {
                if self.controller.undo().is_some() {
                    self.print_committed("undo", out)?;
                } else {
                    writeln!(out, "nothing to undo")?;
                }
            }
            Command::Redo => {
                if self.controller.redo().is_some() {
                    self.print_committed("redo", out)?;
                } else {
                    writeln!(out, "nothing to redo")?;
                }
            }
            Command::Reset => {
                if self.controller.reset_to_original().is_none() {
                    return Err(ShellError::NoImage);
                }
                self.print_committed("reset to original", out)?;
            }
            Command::Info => {
                let info = self.controller.info().ok_or(ShellError::NoImage)?;
                writeln!(
                    out,
                    "{}x{}, {} channels, {} values",
                    info.width, info.height, info.channels, info.size,
                )?;
            }
            Command::Status => self.print_status(out)?,
            Command::Help => writeln!(out, "{HELP}")?,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn apply(&mut self, action: DiscreteAction, out: &mut impl Write) -> Result<(), ShellError> {
        if !self.controller.is_loaded() {
            return Err(ShellError::NoImage);
        }
        if self.controller.apply(action)?.is_some() {
            self.print_committed(&action.to_string(), out)?;
        } else {
            writeln!(out, "no adjustments to apply")?;
        }
        Ok(())
    }

    fn default_value(&self, parameter: Parameter) -> i64 {
        match parameter {
            Parameter::BlurRadius => i64::from(self.controller.config().blur_kernel),
            Parameter::Brightness | Parameter::Contrast => 0,
        }
    }

    fn print_adjusted(
        &self,
        parameter: impl Display,
        value: i64,
        out: &mut impl Write,
    ) -> Result<(), ShellError> {
        if self.controller.is_loaded() {
            writeln!(out, "{parameter} = {value} (preview, 'apply' to commit)")?;
        } else {
            writeln!(out, "{parameter} = {value} (no image loaded)")?;
        }
        Ok(())
    }

    fn print_committed(&self, what: &str, out: &mut impl Write) -> Result<(), ShellError> {
        let history = self.controller.history();
        let dimensions = self
            .controller
            .current()
            .map_or_else(|| "-".to_string(), |s| s.dimensions().to_string());
        writeln!(
            out,
            "{what}: {dimensions} [history {}/{}]",
            history.cursor().map_or(0, |c| c + 1),
            history.len(),
        )?;
        Ok(())
    }

    fn print_status(&self, out: &mut impl Write) -> Result<(), ShellError> {
        let history = self.controller.history();
        let adjustments = self.controller.adjustments();
        let yes_no = |b: bool| if b { "yes" } else { "no" };
        writeln!(
            out,
            "history {}/{} (capacity {}), undo: {}, redo: {}, blur {}, brightness {}, contrast {}{}",
            history.cursor().map_or(0, |c| c + 1),
            history.len(),
            history.capacity(),
            yes_no(self.controller.can_undo()),
            yes_no(self.controller.can_redo()),
            adjustments.blur_radius,
            adjustments.brightness,
            adjustments.contrast,
            if self.controller.has_pending_adjustments() {
                " (pending)"
            } else {
                ""
            },
        )?;
        Ok(())
    }
}
