// ABOUTME: Output formatting for CLI feedback.
// ABOUTME: Supports normal, quiet (CI), and JSON output modes.

use serde::Serialize;
use std::time::Instant;

/// Output mode for CLI feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-friendly output with progress messages
    Normal,
    /// Minimal output for CI (only final result)
    Quiet,
    /// JSON lines for scripting
    Json,
}

/// Handles CLI output based on the configured mode.
pub struct Output {
    mode: OutputMode,
    start_time: Option<Instant>,
}

impl Output {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            start_time: None,
        }
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    /// Start timing an operation.
    pub fn start_timer(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Get elapsed time since timer started.
    pub fn elapsed_secs(&self) -> f64 {
        self.start_time
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }

    fn duration(&self) -> Option<f64> {
        self.start_time.map(|_| self.elapsed_secs())
    }

    /// Print a progress message (suppressed in quiet/json mode).
    pub fn progress(&self, message: &str) {
        if self.mode == OutputMode::Normal {
            println!("{message}");
        }
    }

    /// Print captured command output or a rendered report.
    pub fn block(&self, text: &str) {
        if self.mode == OutputMode::Json || text.is_empty() {
            return;
        }
        if text.ends_with('\n') {
            print!("{text}");
        } else {
            println!("{text}");
        }
    }

    /// Print docker-compose output the executor has not already echoed.
    /// Only quiet mode needs this; normal mode echoes as commands finish.
    pub fn captured(&self, text: &str) {
        if self.mode == OutputMode::Quiet {
            self.block(text);
        }
    }

    /// Print a success message with optional timing.
    pub fn success(&self, message: &str) {
        match self.mode {
            OutputMode::Normal => {
                let elapsed = self.elapsed_secs();
                if elapsed > 0.0 {
                    println!("✅ {message} ({:.1}s)", elapsed);
                } else {
                    println!("✅ {message}");
                }
            }
            OutputMode::Quiet => {
                // Print only the essential result
                println!("{message}");
            }
            OutputMode::Json => self.event("success", message, false),
        }
    }

    /// Print a non-fatal warning.
    pub fn warning(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => eprintln!("⚠️  Warning: {message}"),
            OutputMode::Json => self.event("warning", message, true),
        }
    }

    /// Print an error message.
    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => {
                eprintln!("❌ Error: {message}");
            }
            OutputMode::Json => self.event("error", message, true),
        }
    }

    /// Emit structured data. JSON mode prints it as one line; other modes
    /// pretty-print it.
    pub fn data<T: Serialize>(&self, event: &str, data: &T) {
        match self.mode {
            OutputMode::Json => {
                let line = DataEvent { event, data };
                if let Ok(json) = serde_json::to_string(&line) {
                    println!("{json}");
                }
            }
            OutputMode::Normal | OutputMode::Quiet => {
                if let Ok(json) = serde_json::to_string_pretty(data) {
                    println!("{json}");
                }
            }
        }
    }

    fn event(&self, event: &str, message: &str, stderr: bool) {
        let event = JsonEvent {
            event,
            message,
            duration_secs: self.duration(),
        };
        if let Ok(json) = serde_json::to_string(&event) {
            if stderr {
                eprintln!("{json}");
            } else {
                println!("{json}");
            }
        }
    }
}

#[derive(Serialize)]
struct JsonEvent<'a> {
    event: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_secs: Option<f64>,
}

#[derive(Serialize)]
struct DataEvent<'a, T> {
    event: &'a str,
    data: &'a T,
}
