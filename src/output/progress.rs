//! User-visible progress notices

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A message for the person running the analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    /// Resume the notice is about, if any
    pub document: Option<String>,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            document: None,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, message)
    }

    pub fn for_document(mut self, document: impl Into<String>) -> Self {
        self.document = Some(document.into());
        self
    }
}

/// Sink for notices emitted while a run is in progress.
pub trait ProgressReporter: Send + Sync {
    fn notice(&self, notice: &Notice);

    fn document_started(&self, _index: usize, _total: usize, _name: &str) {}

    fn document_finished(&self) {}

    fn run_finished(&self) {}
}

/// Drops everything.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {
    fn notice(&self, _notice: &Notice) {}
}

/// Keeps every notice in memory.
#[derive(Default)]
pub struct CollectingReporter {
    notices: Mutex<Vec<Notice>>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .map(|notices| notices.clone())
            .unwrap_or_default()
    }
}

impl ProgressReporter for CollectingReporter {
    fn notice(&self, notice: &Notice) {
        if let Ok(mut notices) = self.notices.lock() {
            notices.push(notice.clone());
        }
    }
}

/// Terminal reporter: a progress bar over the resumes with notices
/// printed above it.
pub struct ConsoleReporter {
    bar: ProgressBar,
    use_colors: bool,
}

impl ConsoleReporter {
    pub fn new(total: usize, use_colors: bool) -> Self {
        let bar = ProgressBar::new(total as u64);
        if let Ok(style) = ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} {msg}") {
            bar.set_style(style.progress_chars("=> "));
        }
        Self { bar, use_colors }
    }

    pub fn render(&self, notice: &Notice) -> String {
        let (icon, text) = match notice.level {
            NoticeLevel::Info => ("ℹ️ ", notice.message.normal()),
            NoticeLevel::Success => ("✅", notice.message.green()),
            NoticeLevel::Warning => ("⚠️ ", notice.message.yellow()),
            NoticeLevel::Error => ("❌", notice.message.red()),
        };

        let prefix = notice
            .document
            .as_deref()
            .map(|document| format!("[{}] ", document))
            .unwrap_or_default();

        if self.use_colors {
            format!("{} {}{}", icon, prefix.bold(), text)
        } else {
            format!("{} {}{}", icon, prefix, notice.message)
        }
    }
}

impl ProgressReporter for ConsoleReporter {
    fn notice(&self, notice: &Notice) {
        self.bar.println(self.render(notice));
    }

    fn document_started(&self, index: usize, total: usize, name: &str) {
        let header = format!("### Resume {}/{}: {}", index, total, name);
        let header = if self.use_colors {
            header.bold().to_string()
        } else {
            header
        };
        self.bar.println(header);
        self.bar.set_message(name.to_string());
    }

    fn document_finished(&self) {
        self.bar.inc(1);
    }

    fn run_finished(&self) {
        self.bar.finish_and_clear();
    }
}
