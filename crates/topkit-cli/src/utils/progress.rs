use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use topkit::parser::progress::{ParseEvent, ProgressCallback};
use tracing::warn;

const SPINNER_TICK_MS: u64 = 80;

struct SpinnerState {
    pb: ProgressBar,
    open_sources: usize,
    lines: usize,
}

/// Spinner on stderr showing which source the parser is reading.
#[derive(Clone)]
pub struct CliProgressHandler {
    state: Arc<Mutex<SpinnerState>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        Self::with_draw_target(ProgressDrawTarget::stderr())
    }

    /// A handler that draws nowhere, for quiet runs.
    pub fn hidden() -> Self {
        Self::with_draw_target(ProgressDrawTarget::hidden())
    }

    fn with_draw_target(target: ProgressDrawTarget) -> Self {
        let pb = ProgressBar::new_spinner()
            .with_style(Self::spinner_style())
            .with_message("Initializing...");
        pb.set_draw_target(target);
        pb.finish_and_clear();

        Self {
            state: Arc::new(Mutex::new(SpinnerState {
                pb,
                open_sources: 0,
                lines: 0,
            })),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let state = self.state.clone();

        Box::new(move |event: ParseEvent| {
            let Ok(mut guard) = state.lock() else {
                warn!("Progress spinner mutex was poisoned. Cannot update progress.");
                return;
            };

            match event {
                ParseEvent::SourceStart { name, depth } => {
                    if guard.open_sources == 0 {
                        guard.pb.reset();
                        guard.lines = 0;
                        guard
                            .pb
                            .enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
                    }
                    guard.open_sources += 1;
                    guard
                        .pb
                        .set_message(format!("Reading {} (depth {})", name, depth));
                }
                ParseEvent::SourceFinish { name, lines } => {
                    guard.open_sources = guard.open_sources.saturating_sub(1);
                    guard.lines += lines;
                    if guard.open_sources == 0 {
                        let total = guard.lines;
                        guard.pb.disable_steady_tick();
                        guard
                            .pb
                            .finish_with_message(format!("✓ Read {} ({} lines)", name, total));
                    }
                }
                ParseEvent::Message(msg) => {
                    if guard.pb.is_finished() {
                        guard.pb.set_message(msg);
                    } else {
                        guard.pb.println(format!("  {}", msg));
                    }
                }
            }
        })
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn start(name: &str, depth: usize) -> ParseEvent {
        ParseEvent::SourceStart {
            name: name.to_string(),
            depth,
        }
    }

    fn finish(name: &str, lines: usize) -> ParseEvent {
        ParseEvent::SourceFinish {
            name: name.to_string(),
            lines,
        }
    }

    #[test]
    fn handler_initializes_in_a_clean_state() {
        let handler = CliProgressHandler::hidden();
        let state = handler.state.lock().unwrap();
        assert!(state.pb.is_finished());
        assert_eq!(state.open_sources, 0);
    }

    #[test]
    fn nested_sources_finish_only_with_the_root() {
        let handler = CliProgressHandler::hidden();
        let callback = handler.get_callback();

        callback(start("topol.top", 0));
        callback(start("water.itp", 1));
        {
            let state = handler.state.lock().unwrap();
            assert_eq!(state.pb.message(), "Reading water.itp (depth 1)");
            assert!(!state.pb.is_finished());
        }

        callback(finish("water.itp", 12));
        assert!(!handler.state.lock().unwrap().pb.is_finished());

        callback(finish("topol.top", 30));
        let state = handler.state.lock().unwrap();
        assert!(state.pb.is_finished());
        assert_eq!(state.pb.message(), "✓ Read topol.top (42 lines)");
    }

    #[test]
    fn message_after_finish_replaces_status() {
        let handler = CliProgressHandler::hidden();
        let callback = handler.get_callback();
        callback(ParseEvent::Message("Loading topol.top".into()));
        assert_eq!(
            handler.state.lock().unwrap().pb.message(),
            "Loading topol.top"
        );
    }

    #[test]
    fn callback_is_thread_safe() {
        let handler = CliProgressHandler::hidden();
        let callback = handler.get_callback();

        thread::spawn(move || {
            callback(start("a.top", 0));
            callback(finish("a.top", 3));
        })
        .join()
        .unwrap();

        let state = handler.state.lock().unwrap();
        assert!(state.pb.is_finished());
        assert_eq!(state.open_sources, 0);
    }
}
