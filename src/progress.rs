//! Single-line download progress bar.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressState, ProgressStyle};

const BAR_TEMPLATE: &str = "{prefix} |{bar:50}| {percent_1}% {msg}";

/// Formats `current / total` as a percentage with one decimal place.
///
/// An empty batch (`total == 0`) is complete.
pub fn format_percent(current: u64, total: u64) -> String {
    if total == 0 {
        return "100.0".to_string();
    }
    format!("{:.1}", 100.0 * current as f64 / total as f64)
}

/// Progress of one batch, rendered to stderr.
///
/// Moves from idle (position 0) through running to done, at which point the
/// bar is finished and the line is terminated.
#[derive(Clone)]
pub struct ProgressReporter {
    bar: ProgressBar,
}

impl ProgressReporter {
    /// A bar drawn to stderr when it is a terminal, hidden otherwise.
    pub fn new(total: u64) -> Self {
        let target = if atty::is(atty::Stream::Stderr) {
            ProgressDrawTarget::stderr()
        } else {
            ProgressDrawTarget::hidden()
        };
        Self::with_draw_target(total, target)
    }

    /// A bar that never draws.
    pub fn hidden(total: u64) -> Self {
        Self::with_draw_target(total, ProgressDrawTarget::hidden())
    }

    fn with_draw_target(total: u64, target: ProgressDrawTarget) -> Self {
        let bar = ProgressBar::with_draw_target(Some(total), target);
        let style = ProgressStyle::with_template(BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .with_key(
                "percent_1",
                |state: &ProgressState, w: &mut dyn std::fmt::Write| {
                    let total = state.len().unwrap_or(0);
                    let _ = w.write_str(&format_percent(state.pos(), total));
                },
            )
            .progress_chars("█-");
        bar.set_style(style);
        bar.set_prefix("[~] Downloading");
        bar.set_message("Complete");
        Self { bar }
    }

    /// Advances by one item.
    pub fn tick(&self) {
        self.bar.inc(1);
        self.finish_if_complete();
    }

    /// Moves to an absolute position.
    pub fn set_progress(&self, value: u64) {
        self.bar.set_position(value);
        self.finish_if_complete();
    }

    /// Clears the rendered line, runs `f`, then redraws the bar.
    ///
    /// Diagnostics emitted inside `f` get a line of their own.
    pub fn suspend<F: FnOnce() -> R, R>(&self, f: F) -> R {
        self.bar.suspend(f)
    }

    /// Wipes the rendered line; the next tick draws it again.
    pub fn clear(&self) {
        self.suspend(|| ());
    }

    #[cfg(test)]
    fn position(&self) -> u64 {
        self.bar.position()
    }

    #[cfg(test)]
    fn percent(&self) -> String {
        format_percent(self.bar.position(), self.bar.length().unwrap_or(0))
    }

    #[cfg(test)]
    fn is_done(&self) -> bool {
        self.bar.is_finished()
    }

    fn finish_if_complete(&self) {
        let total = self.bar.length().unwrap_or(0);
        if self.bar.position() >= total && !self.bar.is_finished() {
            self.bar.finish();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indicatif::InMemoryTerm;

    #[test]
    fn test_percent_formatting() {
        assert_eq!(format_percent(0, 3), "0.0");
        assert_eq!(format_percent(1, 3), "33.3");
        assert_eq!(format_percent(2, 3), "66.7");
        assert_eq!(format_percent(3, 3), "100.0");
        assert_eq!(format_percent(0, 0), "100.0");
    }

    #[test]
    fn test_ticks_are_monotonic_and_reach_100() {
        let total = 7;
        let reporter = ProgressReporter::hidden(total);
        let mut seen = Vec::new();
        for _ in 0..total {
            reporter.tick();
            seen.push(reporter.percent().parse::<f64>().unwrap());
        }
        assert!(seen.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(*seen.last().unwrap(), 100.0);
        assert!(reporter.is_done());
    }

    #[test]
    fn test_not_done_before_last_tick() {
        let reporter = ProgressReporter::hidden(2);
        reporter.tick();
        assert!(!reporter.is_done());
        assert_eq!(reporter.percent(), "50.0");
    }

    fn in_memory(total: u64) -> (ProgressReporter, InMemoryTerm) {
        let term = InMemoryTerm::new(4, 120);
        let reporter = ProgressReporter::with_draw_target(
            total,
            ProgressDrawTarget::term_like(Box::new(term.clone())),
        );
        (reporter, term)
    }

    #[test]
    fn test_partial_bar_is_drawn_without_gaps() {
        let (reporter, term) = in_memory(4);
        reporter.set_progress(2);
        assert_eq!(reporter.position(), 2);
        assert_eq!(
            term.contents(),
            format!("[~] Downloading |{}{}| 50.0% Complete", "█".repeat(25), "-".repeat(25))
        );
    }

    #[test]
    fn test_completed_bar_shows_full_percentage() {
        let (reporter, term) = in_memory(3);
        for _ in 0..3 {
            reporter.tick();
        }
        assert!(reporter.is_done());
        assert_eq!(
            term.contents(),
            format!("[~] Downloading |{}| 100.0% Complete", "█".repeat(50))
        );
    }

    #[test]
    fn test_suspend_returns_closure_value() {
        let reporter = ProgressReporter::hidden(1);
        reporter.clear();
        assert_eq!(reporter.suspend(|| 42), 42);
    }
}
