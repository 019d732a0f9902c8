//! Colored terminal output with GitHub Actions workflow commands.
//!
//! Besides colored status lines this writes the `::group::`, `::error::`
//! markers the Actions runner folds and annotates, and appends step
//! outputs to the `$GITHUB_OUTPUT` / `$GITHUB_ENV` files.

use std::{
    fs::OpenOptions,
    io::{self, Write},
    path::Path,
};
use termcolor::{BufferWriter, Color, ColorChoice, ColorSpec, WriteColor};

/// Output manager for consistent colored terminal output
#[derive(Debug)]
pub struct OutputManager {
    bufwtr: BufferWriter,
    quiet: bool,
}

impl Clone for OutputManager {
    fn clone(&self) -> Self {
        Self::new(self.quiet)
    }
}

impl OutputManager {
    /// Create a new output manager; `quiet` suppresses everything but errors
    pub fn new(quiet: bool) -> Self {
        Self {
            bufwtr: BufferWriter::stdout(ColorChoice::Auto),
            quiet,
        }
    }

    fn colored_line(
        &self,
        color: Color,
        bold: bool,
        marker: &str,
        message: &str,
    ) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }

        let mut buffer = self.bufwtr.buffer();
        let _ = buffer.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(bold));
        let _ = write!(&mut buffer, "{marker}");
        let _ = buffer.reset();
        let _ = writeln!(&mut buffer, " {message}");
        self.bufwtr.print(&buffer)
    }

    /// Print a success message
    pub fn success(&self, message: &str) -> io::Result<()> {
        self.colored_line(Color::Green, true, "✓", message)
    }

    /// Print a warning message
    pub fn warn(&self, message: &str) -> io::Result<()> {
        self.colored_line(Color::Yellow, true, "⚠", message)
    }

    /// Print a plain line (respects quiet mode)
    pub fn println(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }

        let mut buffer = self.bufwtr.buffer();
        let _ = writeln!(&mut buffer, "{message}");
        self.bufwtr.print(&buffer)
    }

    /// Open a collapsible log group
    pub fn start_group(&self, title: &str) -> io::Result<()> {
        self.println(&format!("::group::{title}"))
    }

    /// Close the current log group
    pub fn end_group(&self) -> io::Result<()> {
        self.println("::endgroup::")
    }

    /// Report a failure as a workflow error annotation (always shown)
    pub fn error(&self, message: &str) {
        // Annotations must be plain text on stdout for the runner to pick up.
        let mut stdout = io::stdout().lock();
        let _ = writeln!(stdout, "::error::{}", escape_data(message));

        let bufwtr = BufferWriter::stderr(ColorChoice::Auto);
        let mut buffer = bufwtr.buffer();
        let _ = buffer.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true));
        let _ = write!(&mut buffer, "✗");
        let _ = buffer.reset();
        let _ = writeln!(&mut buffer, " {message}");
        let _ = bufwtr.print(&buffer);
    }
}

/// Escapes a workflow command message (`%`, CR and LF).
pub fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Appends `name=value` to an Actions file command file, using the
/// heredoc form when the value spans lines.
pub fn append_key_value(file: &Path, name: &str, value: &str) -> io::Result<()> {
    let mut out = OpenOptions::new().create(true).append(true).open(file)?;
    if value.contains('\n') {
        let delimiter = format!("ghadelimiter_{}", std::process::id());
        writeln!(out, "{name}<<{delimiter}\n{value}\n{delimiter}")
    } else {
        writeln!(out, "{name}={value}")
    }
}
