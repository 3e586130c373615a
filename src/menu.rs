//! External collaborators: the two menus and the browser.
//!
//! The launcher only sees the [`Prompt`] and [`Browser`] traits. The
//! process-backed implementations run a [`CommandLine`] directly (no shell),
//! feed menu items on stdin one per line, and read the answer from stdout.

use std::io::{ErrorKind, Write};
use std::process::Stdio;
use tracing::{debug, info};

use crate::config::CommandLine;
use crate::error::{Result, SrchError};
use crate::process_guard::{CommandLifetime, TrackedChild};

/// A blocking line-based prompt.
pub trait Prompt {
    /// Offer `items` (possibly none) and return the answer with its line
    /// ending removed. An empty answer means the user backed out.
    fn prompt(&self, items: &[String]) -> Result<String>;
}

/// Something that can show a URL to the user.
pub trait Browser {
    /// Hand `url` off. Does not wait for the browser.
    fn open(&self, url: &str) -> Result<()>;
}

/// A dmenu-style program: items on stdin, answer on stdout.
#[derive(Debug, Clone)]
pub struct CommandMenu {
    command: CommandLine,
}

impl CommandMenu {
    pub fn new(command: CommandLine) -> Self {
        Self { command }
    }
}

impl Prompt for CommandMenu {
    fn prompt(&self, items: &[String]) -> Result<String> {
        debug!("Running menu `{}` with {} item(s)", self.command, items.len());

        let mut child = self
            .command
            .to_command()
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .die_with_parent()
            .spawn()
            .map_err(|e| SrchError::process(format!("failed to run `{}`: {}", self.command, e)))?;
        let _tracked = TrackedChild::track(child.id());

        let stdin = child.stdin.take();
        let input: String = items.iter().map(|item| format!("{}\n", item)).collect();

        // Feed stdin from its own thread so a menu that echoes while it reads
        // cannot fill the stdout pipe and stall both sides.
        let (written, output) = std::thread::scope(|scope| {
            let writer = scope.spawn(move || match stdin {
                Some(mut stdin) => match stdin.write_all(input.as_bytes()) {
                    // The menu may exit before reading everything.
                    Err(e) if e.kind() == ErrorKind::BrokenPipe => Ok(()),
                    other => other,
                },
                None => Ok(()),
            });
            let output = child.wait_with_output();
            let written = writer
                .join()
                .unwrap_or_else(|_| Err(std::io::Error::other("menu input writer panicked")));
            (written, output)
        });
        let output = output?;
        written?;
        debug!("Menu `{}` exited with {}", self.command, output.status);

        let answer = String::from_utf8_lossy(&output.stdout);
        Ok(strip_line_ending(&answer).to_string())
    }
}

/// Browser launched as `program [args..] URL`.
#[derive(Debug, Clone)]
pub struct CommandBrowser {
    command: CommandLine,
}

impl CommandBrowser {
    pub fn new(command: CommandLine) -> Self {
        Self { command }
    }
}

impl Browser for CommandBrowser {
    fn open(&self, url: &str) -> Result<()> {
        info!("Opening {} with `{}`", url, self.command);
        // Not tracked and no death signal: the browser outlives srch.
        self.command
            .to_command()
            .arg(url)
            .stdin(Stdio::null())
            .spawn()
            .map_err(|e| SrchError::process(format!("failed to run `{}`: {}", self.command, e)))?;
        Ok(())
    }
}

/// Drop one trailing `\n` (and a `\r` before it).
pub fn strip_line_ending(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}
