#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    PhaseStart { name: &'static str },
    PhaseFinish,

    TaskStart { total_steps: u64 },
    TaskIncrement,
    TaskFinish,

    Message(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

/// Forwards progress events to an optional callback; silent by default.
#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }

    /// Runs `task` bracketed by `PhaseStart`/`PhaseFinish` events.
    pub fn phase<T>(&self, name: &'static str, task: impl FnOnce() -> T) -> T {
        self.report(Progress::PhaseStart { name });
        let result = task();
        self.report(Progress::PhaseFinish);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn reporter_without_callback_is_silent() {
        let reporter = ProgressReporter::new();
        reporter.report(Progress::Message("ignored".to_string()));
        assert_eq!(reporter.phase("noop", || 7), 7);
    }

    #[test]
    fn phase_brackets_task_with_start_and_finish() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        let reporter = ProgressReporter::with_callback(Box::new(move |event| {
            sink.lock().unwrap().push(event);
        }));

        let value = reporter.phase("Counting", || {
            reporter.report(Progress::TaskIncrement);
            42
        });

        assert_eq!(value, 42);
        assert_eq!(
            *events.lock().unwrap(),
            vec![
                Progress::PhaseStart { name: "Counting" },
                Progress::TaskIncrement,
                Progress::PhaseFinish,
            ]
        );
    }
}
