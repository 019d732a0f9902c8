//! Ordered argument lists for external tool invocations.

use std::{
    fmt,
    path::{Path, PathBuf},
};

/// Accumulates command-line arguments in call order.
///
/// No validation is performed and duplicate flags are kept.
///
/// ```
/// use unity_build_action::build::ArgumentBuilder;
///
/// let args = ArgumentBuilder::new()
///     .append_value("--a", "1")
///     .append("--b")
///     .build();
/// assert_eq!(args, ["--a", "1", "--b"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgumentBuilder {
    args: Vec<String>,
}

impl ArgumentBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a bare flag or positional argument.
    pub fn append(mut self, flag: impl Into<String>) -> Self {
        self.args.push(flag.into());
        self
    }

    /// Appends a flag followed by its value.
    pub fn append_value(mut self, flag: impl Into<String>, value: impl Into<String>) -> Self {
        self.args.push(flag.into());
        self.args.push(value.into());
        self
    }

    /// Appends a flag whose value is a path.
    pub fn append_path(self, flag: impl Into<String>, path: &Path) -> Self {
        self.append_value(flag, path.display().to_string())
    }

    /// Appends every item of `args` in iteration order.
    pub fn extend<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Returns the accumulated arguments.
    pub fn build(self) -> Vec<String> {
        self.args
    }

    /// Pairs the arguments with the program that consumes them.
    pub fn into_command(self, program: impl Into<PathBuf>) -> CommandLine {
        CommandLine {
            program: program.into(),
            args: self.args,
        }
    }
}

/// A program plus its ordered arguments, executed once by a
/// [`CommandRunner`](crate::build::CommandRunner).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    /// Executable name or path.
    pub program: PathBuf,
    /// Arguments in invocation order.
    pub args: Vec<String>,
}

impl CommandLine {
    /// Short program name used in errors and log lines.
    pub fn name(&self) -> String {
        self.program
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.program.display().to_string())
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            if arg.contains(' ') {
                write!(f, " \"{arg}\"")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_append_order() {
        let args = ArgumentBuilder::new()
            .append_value("--a", "1")
            .append("--b")
            .build();
        assert_eq!(args, vec!["--a", "1", "--b"]);
    }

    #[test]
    fn keeps_duplicate_flags() {
        let args = ArgumentBuilder::new()
            .append_value("-logFile", "a.log")
            .append_value("-logFile", "b.log")
            .build();
        assert_eq!(args, vec!["-logFile", "a.log", "-logFile", "b.log"]);
    }

    #[test]
    fn extend_appends_after_existing_args() {
        let args = ArgumentBuilder::new()
            .append("-quit")
            .extend(["-stackTraceLogType", "Full"])
            .build();
        assert_eq!(args, vec!["-quit", "-stackTraceLogType", "Full"]);
    }

    #[test]
    fn display_quotes_arguments_with_spaces() {
        let command = ArgumentBuilder::new()
            .append_value("--root", "/tmp/My Game")
            .into_command("/usr/bin/pkgbuild");
        assert_eq!(command.name(), "pkgbuild");
        assert_eq!(command.to_string(), "/usr/bin/pkgbuild --root \"/tmp/My Game\"");
    }
}
