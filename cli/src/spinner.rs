//! Loading spinner shown while an image converts.
//!
//! The spinner ticks on indicatif's own thread and only ever writes to the
//! terminal; it is finished once the conversion has returned.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const TICKS: &[&str] = &["|", "/", "-", "\\", " "];
const TICK_INTERVAL: Duration = Duration::from_millis(100);

pub struct Spinner {
    bar: Option<ProgressBar>,
    label: String,
}

impl Spinner {
    /// Start spinning; a disabled spinner does nothing
    pub fn start(label: impl Into<String>, enabled: bool) -> Self {
        let label = label.into();
        let bar = enabled.then(|| {
            let bar = ProgressBar::new_spinner();
            let style = ProgressStyle::with_template("{msg} {spinner}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(TICKS);
            bar.set_style(style);
            bar.set_message(format!("Loading {}", label));
            bar.enable_steady_tick(TICK_INTERVAL);
            bar
        });
        Self { bar, label }
    }

    pub fn is_enabled(&self) -> bool {
        self.bar.is_some()
    }

    /// Stop spinning and leave a final status line
    pub fn finish(self, ok: bool) {
        if let Some(bar) = self.bar {
            if ok {
                bar.finish_with_message(format!("Loading Done! {}", self.label));
            } else {
                bar.abandon_with_message(format!("Failed: {}", self.label));
            }
        }
    }
}

/// Run `f` with a spinner labelled `label`
pub fn with_spinner<T, E>(
    label: &str,
    enabled: bool,
    f: impl FnOnce() -> Result<T, E>,
) -> Result<T, E> {
    let spinner = Spinner::start(label, enabled);
    let result = f();
    spinner.finish(result.is_ok());
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_spinner_passes_result_through() {
        let ok: Result<u32, String> = with_spinner("cat", false, || Ok(7));
        assert_eq!(ok, Ok(7));

        let err: Result<u32, String> = with_spinner("cat", false, || Err("boom".into()));
        assert_eq!(err, Err("boom".to_string()));
    }

    #[test]
    fn test_disabled_spinner_has_no_bar() {
        let spinner = Spinner::start("x", false);
        assert!(!spinner.is_enabled());
        spinner.finish(true);
    }
}
