use cgmol::engine::progress::{Progress, ProgressCallback};
use cgmol::workflows::build::{CONSTRAINT_PHASE, CONTACT_PHASE, PARSE_PHASE};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

const SPINNER_TICK_MS: u64 = 80;
// Wide enough for the longest phase name, so bars line up across phases.
const PHASE_LABEL_WIDTH: usize = CONSTRAINT_PHASE.len();
const BAR_WIDTH: usize = 32;

/// What one task step stands for in each build phase.
fn step_unit(phase: &str) -> &'static str {
    match phase {
        CONTACT_PHASE => "atoms",
        CONSTRAINT_PHASE => "anchors",
        PARSE_PHASE => "records",
        _ => "steps",
    }
}

struct PhaseState {
    pb: ProgressBar,
    phase: &'static str,
    steps: u64,
}

/// Renders build phases as an `indicatif` spinner, switching to a bar sized to the
/// atom or anchor count while a task runs.
#[derive(Clone)]
pub struct CliProgressHandler {
    state: Arc<Mutex<PhaseState>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        Self::with_draw_target(ProgressDrawTarget::stderr())
    }

    /// A handler that tracks state without drawing anything.
    pub fn hidden() -> Self {
        Self::with_draw_target(ProgressDrawTarget::hidden())
    }

    fn with_draw_target(target: ProgressDrawTarget) -> Self {
        let pb = ProgressBar::new(0)
            .with_style(Self::spinner_style())
            .with_message("Reading input...");
        pb.set_draw_target(target);
        pb.finish_and_clear();

        Self {
            state: Arc::new(Mutex::new(PhaseState {
                pb,
                phase: "",
                steps: 0,
            })),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let state = self.state.clone();

        Box::new(move |progress: Progress| {
            let Ok(mut state) = state.lock() else {
                warn!("Progress state mutex was poisoned. Cannot update progress.");
                return;
            };

            match progress {
                Progress::PhaseStart { name } => {
                    state.phase = name;
                    state.steps = 0;
                    let pb = &state.pb;
                    pb.reset();
                    pb.set_length(0);
                    pb.set_style(Self::spinner_style());
                    pb.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
                    pb.set_message(name);
                }
                Progress::PhaseFinish => {
                    let message = match state.steps {
                        0 => format!("✓ {}", state.phase),
                        n => format!("✓ {} ({} {})", state.phase, n, step_unit(state.phase)),
                    };
                    state.pb.disable_steady_tick();
                    state.pb.finish_with_message(message);
                }
                Progress::TaskStart { total_steps } => {
                    state.steps = total_steps;
                    let pb = &state.pb;
                    pb.disable_steady_tick();
                    pb.reset();
                    pb.set_length(total_steps);
                    pb.set_position(0);
                    pb.set_style(Self::bar_style(step_unit(state.phase)));
                }
                Progress::TaskIncrement => {
                    state.pb.inc(1);
                }
                Progress::TaskFinish => {
                    let pb = &state.pb;
                    let length = pb.length().unwrap_or(0);
                    if pb.position() < length {
                        pb.set_position(length);
                    }
                    pb.finish();
                }
                Progress::Message(msg) => {
                    if !state.pb.is_finished() {
                        state.pb.println(format!("  ! {}", msg));
                    } else {
                        state.pb.set_message(format!("! {}", msg));
                    }
                }
            }
        })
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn bar_style(unit: &str) -> ProgressStyle {
        let template = format!(
            "{{msg:<{PHASE_LABEL_WIDTH}}} [{{bar:{BAR_WIDTH}.cyan/blue}}] {{pos}}/{{len}} {unit}"
        );
        ProgressStyle::with_template(&template)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-")
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

    #[test]
    fn handler_initializes_in_a_clean_state() {
        let handler = CliProgressHandler::hidden();
        let state = handler.state.lock().unwrap();
        assert_eq!(state.pb.length(), Some(0));
        assert!(state.pb.is_finished());
        assert_eq!(state.steps, 0);
    }

    #[test]
    fn contact_phase_finishes_with_its_atom_count() {
        let handler = CliProgressHandler::hidden();
        let callback = handler.get_callback();

        callback(Progress::PhaseStart {
            name: CONTACT_PHASE,
        });
        {
            let state = handler.state.lock().unwrap();
            assert_eq!(state.pb.message(), CONTACT_PHASE);
            assert!(!state.pb.is_finished());
        }

        callback(Progress::TaskStart { total_steps: 40 });
        {
            let state = handler.state.lock().unwrap();
            assert_eq!(state.pb.length(), Some(40));
            assert_eq!(state.pb.position(), 0);
        }

        callback(Progress::TaskIncrement);
        assert_eq!(handler.state.lock().unwrap().pb.position(), 1);

        callback(Progress::TaskFinish);
        {
            let state = handler.state.lock().unwrap();
            assert!(state.pb.is_finished());
            assert_eq!(state.pb.position(), 40);
        }

        callback(Progress::PhaseFinish);
        assert_eq!(
            handler.state.lock().unwrap().pb.message(),
            "✓ Inferring Contacts (40 atoms)"
        );
    }

    #[test]
    fn constraint_phase_counts_anchors() {
        let handler = CliProgressHandler::hidden();
        let callback = handler.get_callback();

        callback(Progress::PhaseStart {
            name: CONSTRAINT_PHASE,
        });
        callback(Progress::TaskStart { total_steps: 3 });
        callback(Progress::TaskFinish);
        callback(Progress::PhaseFinish);

        assert_eq!(
            handler.state.lock().unwrap().pb.message(),
            "✓ Building Constraint Graph (3 anchors)"
        );
    }

    #[test]
    fn phase_without_task_finishes_with_its_name() {
        let handler = CliProgressHandler::hidden();
        let callback = handler.get_callback();

        callback(Progress::PhaseStart { name: PARSE_PHASE });
        callback(Progress::PhaseFinish);
        callback(Progress::Message("Skipped 2 malformed ATOM record(s)".to_string()));

        assert_eq!(
            handler.state.lock().unwrap().pb.message(),
            "! Skipped 2 malformed ATOM record(s)"
        );
    }

    #[test]
    fn step_counts_reset_between_phases() {
        let handler = CliProgressHandler::hidden();
        let callback = handler.get_callback();

        callback(Progress::PhaseStart {
            name: CONTACT_PHASE,
        });
        callback(Progress::TaskStart { total_steps: 12 });
        callback(Progress::TaskFinish);
        callback(Progress::PhaseFinish);
        callback(Progress::PhaseStart { name: PARSE_PHASE });
        callback(Progress::PhaseFinish);

        assert_eq!(
            handler.state.lock().unwrap().pb.message(),
            "✓ Parsing Structure"
        );
    }

    #[test]
    fn callback_is_thread_safe() {
        let handler = CliProgressHandler::hidden();
        let callback = handler.get_callback();

        thread::spawn(move || {
            callback(Progress::PhaseStart { name: PARSE_PHASE });
            callback(Progress::TaskIncrement);
            callback(Progress::PhaseFinish);
        })
        .join()
        .unwrap();

        let state = handler.state.lock().unwrap();
        assert!(state.pb.is_finished());
        assert_eq!(state.pb.message(), "✓ Parsing Structure");
    }

    #[test]
    fn bar_labels_fit_every_phase_name() {
        for phase in [PARSE_PHASE, CONTACT_PHASE, CONSTRAINT_PHASE] {
            assert!(phase.len() <= PHASE_LABEL_WIDTH);
        }
        assert_eq!(step_unit("Unknown Phase"), "steps");
    }
}
