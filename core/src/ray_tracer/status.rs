//! Render status and cancellation

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;

/// Life cycle of a `RayTracer`.
///
/// `Free -> Busy -> {Done | Interrupted} -> Free`
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum RenderStatus {
    /// Idle; the scene and image size may be changed.
    Free = 0,

    /// A render is in progress.
    Busy = 1,

    /// The render finished every tile and has not been collected yet.
    Done = 2,

    /// The render was stopped before finishing.
    Interrupted = 3,
}

impl From<u8> for RenderStatus {
    fn from(v: u8) -> Self {
        match v {
            1 => Self::Busy,
            2 => Self::Done,
            3 => Self::Interrupted,
            _ => Self::Free,
        }
    }
}

impl fmt::Display for RenderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Free => "free",
            Self::Busy => "busy",
            Self::Done => "done",
            Self::Interrupted => "interrupted",
        };
        write!(f, "{}", s)
    }
}

/// `RenderStatus` shared between the `RayTracer` and its render thread.
#[derive(Clone, Debug)]
pub struct SharedStatus(Arc<AtomicU8>);

impl SharedStatus {
    /// Create a new `SharedStatus` in the `Free` state.
    pub fn new() -> Self {
        Self(Arc::new(AtomicU8::new(RenderStatus::Free as u8)))
    }

    /// Returns the current status.
    pub fn get(&self) -> RenderStatus {
        RenderStatus::from(self.0.load(Ordering::Acquire))
    }

    /// Set the status unconditionally.
    ///
    /// * `status` - New status.
    pub fn set(&self, status: RenderStatus) {
        self.0.store(status as u8, Ordering::Release);
    }

    /// Move from `from` to `to`. Returns `false` and leaves the status
    /// unchanged if the current status is not `from`.
    ///
    /// * `from` - Expected current status.
    /// * `to`   - New status.
    pub fn transition(&self, from: RenderStatus, to: RenderStatus) -> bool {
        self.0
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

impl Default for SharedStatus {
    fn default() -> Self {
        Self::new()
    }
}

/// Cooperative cancellation flag handed to every render worker. Workers poll
/// it between tiles; a tile in flight always finishes.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    /// Create a new token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Returns true once cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transitions_only_from_expected_state() {
        let status = SharedStatus::new();
        assert_eq!(status.get(), RenderStatus::Free);
        assert!(!status.transition(RenderStatus::Busy, RenderStatus::Done));
        assert!(status.transition(RenderStatus::Free, RenderStatus::Busy));
        assert!(status.transition(RenderStatus::Busy, RenderStatus::Interrupted));
        assert!(!status.transition(RenderStatus::Busy, RenderStatus::Done));
        assert_eq!(status.get(), RenderStatus::Interrupted);
    }

    #[test]
    fn cancellation_is_shared_by_clones() {
        let token = CancellationToken::new();
        let worker = token.clone();
        assert!(!worker.is_cancelled());
        token.cancel();
        assert!(worker.is_cancelled());
    }

    #[test]
    fn status_round_trips_through_u8() {
        for s in [RenderStatus::Free, RenderStatus::Busy, RenderStatus::Done, RenderStatus::Interrupted] {
            assert_eq!(RenderStatus::from(s as u8), s);
        }
    }
}
