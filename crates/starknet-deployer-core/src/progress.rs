use std::fmt::Display;

use crate::constants::DECLARING_STATUS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Declaring,
}

impl Progress {
    pub fn as_str(&self) -> &'static str {
        match self {
            Progress::Declaring => DECLARING_STATUS,
        }
    }
}

impl Display for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Receives status updates while an operation is running.
pub trait ProgressSink: Send + Sync {
    fn report(&self, progress: Progress);
}

impl<F> ProgressSink for F
where
    F: Fn(Progress) + Send + Sync,
{
    fn report(&self, progress: Progress) {
        self(progress)
    }
}
