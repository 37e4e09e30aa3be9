//! Progress reporting
//!
//! The seeder and replicator report through the [`Ui`] trait:
//! - Current phase (Seeding, Replicating)
//! - Per-table progress (current/total)
//! - One-line summaries

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

/// Application phases
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    Seeding,
    Replicating,
    Complete,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Seeding => write!(f, "Seeding source database"),
            Phase::Replicating => write!(f, "Replicating to SQLite"),
            Phase::Complete => write!(f, "Complete"),
        }
    }
}

/// Trait for UI implementations - allows both progress bars and silent/test modes
pub trait Ui {
    fn set_phase(&mut self, phase: Phase);
    fn set_progress(&mut self, current: u64, total: u64, label: impl Into<String>);
    fn clear_progress(&mut self);
    fn log(&mut self, message: impl Into<String>);
}

/// Terminal progress bars, one per table
pub struct ConsoleUi {
    multi: MultiProgress,
    style: ProgressStyle,
    bar: Option<(String, ProgressBar)>,
}

impl ConsoleUi {
    pub fn new() -> Self {
        let style = ProgressStyle::default_bar()
            .template("{msg:24} [{bar:40.cyan/blue}] {pos}/{len}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-");

        Self {
            multi: MultiProgress::new(),
            style,
            bar: None,
        }
    }

    fn finish_bar(&mut self) {
        if let Some((label, bar)) = self.bar.take() {
            bar.finish_with_message(label);
        }
    }
}

impl Default for ConsoleUi {
    fn default() -> Self {
        Self::new()
    }
}

impl Ui for ConsoleUi {
    fn set_phase(&mut self, phase: Phase) {
        self.finish_bar();
        self.multi.println(format!("==> {}", phase)).ok();
    }

    fn set_progress(&mut self, current: u64, total: u64, label: impl Into<String>) {
        let label = label.into();
        let same_table = matches!(&self.bar, Some((current_label, _)) if *current_label == label);

        if !same_table {
            self.finish_bar();
            let bar = self.multi.add(ProgressBar::new(total));
            bar.set_style(self.style.clone());
            bar.set_message(label.clone());
            self.bar = Some((label, bar));
        }

        if let Some((_, bar)) = &self.bar {
            bar.set_length(total);
            bar.set_position(current);
        }
    }

    fn clear_progress(&mut self) {
        self.finish_bar();
    }

    fn log(&mut self, message: impl Into<String>) {
        self.multi.println(message.into()).ok();
    }
}

/// Silent UI implementation for testing and non-interactive use
#[derive(Default)]
pub struct SilentUi;

impl SilentUi {
    pub fn new() -> Self {
        Self
    }
}

impl Ui for SilentUi {
    fn set_phase(&mut self, _phase: Phase) {}
    fn set_progress(&mut self, _current: u64, _total: u64, _label: impl Into<String>) {}
    fn clear_progress(&mut self) {}
    fn log(&mut self, _message: impl Into<String>) {}
}
