//! Instance lifecycle state machine: `Running -> Draining -> Terminated`.

use std::{
    fmt,
    sync::atomic::{AtomicU8, Ordering},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Running,
    Draining,
    Terminated,
}

impl LifecycleState {
    fn as_u8(self) -> u8 {
        match self {
            LifecycleState::Running => 0,
            LifecycleState::Draining => 1,
            LifecycleState::Terminated => 2,
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            0 => LifecycleState::Running,
            1 => LifecycleState::Draining,
            _ => LifecycleState::Terminated,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleState::Running => "running",
            LifecycleState::Draining => "draining",
            LifecycleState::Terminated => "terminated",
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shared, lock-free view of the lifecycle state.
///
/// Transitions only move forward; a transition from the wrong state is
/// refused and reported as `false`.
#[derive(Debug)]
pub struct Lifecycle {
    state: AtomicU8,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            state: AtomicU8::new(LifecycleState::Running.as_u8()),
        }
    }

    pub fn state(&self) -> LifecycleState {
        LifecycleState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub fn is_accepting(&self) -> bool {
        self.state() == LifecycleState::Running
    }

    /// `Running -> Draining`. Returns `false` if draining already began.
    pub fn begin_draining(&self) -> bool {
        self.transition(LifecycleState::Running, LifecycleState::Draining)
    }

    /// `Draining -> Terminated`.
    pub fn terminate(&self) -> bool {
        self.transition(LifecycleState::Draining, LifecycleState::Terminated)
    }

    fn transition(&self, from: LifecycleState, to: LifecycleState) -> bool {
        self.state
            .compare_exchange(from.as_u8(), to.as_u8(), Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}
