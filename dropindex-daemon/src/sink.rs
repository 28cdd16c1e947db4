//! Notification sinks: where new-file alerts go.
//!
//! Every sink blocks the calling thread until the alert has been acknowledged.
//! The notifier runs sinks on the blocking pool and waits for them, so no
//! further polling happens while an alert is on screen.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Local};
use colored::Colorize;

use dropindex_core::NotifierSettings;

use crate::error::{io_err, DaemonError};

/// Payload of one alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub timestamp: DateTime<Local>,
    pub folder: PathBuf,
    pub heading: String,
    /// New names, sorted.
    pub files: Vec<String>,
}

impl Notification {
    /// Heading followed by one filename per line.
    pub fn message(&self) -> String {
        let mut out = self.heading.clone();
        for file in &self.files {
            out.push('\n');
            out.push_str(file);
        }
        out
    }
}

/// How an alert ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acknowledgement {
    /// Someone dismissed it.
    Dismissed,
    /// Nobody can acknowledge (no terminal attached); the alert was shown only.
    Unattended,
}

pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: &Notification) -> Result<Acknowledgement, DaemonError>;
}

/// Sink selected by the notifier settings: the external command when one is
/// configured, the console otherwise.
pub fn sink_for(settings: &NotifierSettings) -> Arc<dyn NotificationSink> {
    match settings.alert_command.as_deref() {
        Some([program, args @ ..]) => Arc::new(CommandSink::new(program.clone(), args.to_vec())),
        _ => Arc::new(ConsoleSink::stdio(settings.alert_title.clone())),
    }
}

// ---------------------------------------------------------------------------
// ConsoleSink
// ---------------------------------------------------------------------------

type SharedInput = Mutex<Box<dyn BufRead + Send>>;
type SharedOutput = Mutex<Box<dyn Write + Send>>;

/// Prints a highlighted banner and waits for Enter.
pub struct ConsoleSink {
    title: String,
    input: SharedInput,
    output: SharedOutput,
}

impl ConsoleSink {
    pub fn stdio(title: String) -> Self {
        Self::new(
            title,
            Box::new(std::io::BufReader::new(std::io::stdin())),
            Box::new(std::io::stdout()),
        )
    }

    pub fn new(title: String, input: Box<dyn BufRead + Send>, output: Box<dyn Write + Send>) -> Self {
        Self {
            title,
            input: Mutex::new(input),
            output: Mutex::new(output),
        }
    }
}

impl NotificationSink for ConsoleSink {
    fn notify(&self, notification: &Notification) -> Result<Acknowledgement, DaemonError> {
        {
            let mut out = self.output.lock().unwrap_or_else(|p| p.into_inner());
            let banner = format!(" {} ", self.title).bold().black().on_yellow();
            let stamp = notification.timestamp.format("%Y-%m-%d %H:%M:%S");
            writeln!(out)
                .and_then(|_| writeln!(out, "{banner}"))
                .and_then(|_| writeln!(out, "[{stamp}] {}", notification.heading.bold()))
                .and_then(|_| {
                    notification
                        .files
                        .iter()
                        .try_for_each(|f| writeln!(out, "  {}", f.yellow()))
                })
                .and_then(|_| write!(out, "Press Enter to acknowledge... "))
                .and_then(|_| out.flush())
                .map_err(|e| io_err("stdout", e))?;
        }

        let mut line = String::new();
        let read = self
            .input
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .read_line(&mut line)
            .map_err(|e| io_err("stdin", e))?;
        if read == 0 {
            tracing::warn!("no operator input available; alert shown without acknowledgement");
            return Ok(Acknowledgement::Unattended);
        }
        Ok(Acknowledgement::Dismissed)
    }
}

// ---------------------------------------------------------------------------
// CommandSink
// ---------------------------------------------------------------------------

/// Runs an external dialog program and waits for it to exit.
///
/// The message is appended as the last argument, e.g.
/// `zenity --warning --text <message>`.
#[derive(Debug, Clone)]
pub struct CommandSink {
    program: String,
    args: Vec<String>,
}

impl CommandSink {
    pub fn new(program: String, args: Vec<String>) -> Self {
        Self { program, args }
    }
}

impl NotificationSink for CommandSink {
    fn notify(&self, notification: &Notification) -> Result<Acknowledgement, DaemonError> {
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(notification.message())
            .stdin(Stdio::null())
            .status()
            .map_err(|e| io_err(&self.program, e))?;
        // Dialog tools use the exit code for which button was pressed; any exit
        // means the window is gone.
        tracing::debug!(program = %self.program, status = %status, "alert command exited");
        Ok(Acknowledgement::Dismissed)
    }
}
