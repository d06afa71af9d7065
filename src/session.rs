use crate::error::PipelineError;
use std::sync::Mutex;

/// Whether a frame is currently flowing through the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Running,
}

/// Caller-owned Idle/Running state machine for one logical capture session.
///
/// The pipeline itself is stateless; what must not happen is two concurrent
/// runs over the same capture source. The canonical implementations guarded
/// that with a global mutable "processing" flag — this is the explicit
/// replacement. Call [`CaptureSession::try_begin`] before a run and drop the
/// returned guard when the result has been consumed.
pub struct CaptureSession {
    state: Mutex<SessionState>,
}

impl CaptureSession {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SessionState::Idle),
        }
    }

    pub fn state(&self) -> SessionState {
        *self.state.lock().expect("session state poisoned")
    }

    /// Transition Idle -> Running, or fail with `SessionBusy` if a frame is
    /// already in flight.
    pub fn try_begin(&self) -> Result<FrameGuard<'_>, PipelineError> {
        let mut state = self.state.lock().expect("session state poisoned");
        match *state {
            SessionState::Running => Err(PipelineError::SessionBusy),
            SessionState::Idle => {
                *state = SessionState::Running;
                Ok(FrameGuard { session: self })
            }
        }
    }
}

impl Default for CaptureSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Keeps the session Running until dropped.
pub struct FrameGuard<'a> {
    session: &'a CaptureSession,
}

impl Drop for FrameGuard<'_> {
    fn drop(&mut self) {
        *self
            .session
            .state
            .lock()
            .expect("session state poisoned") = SessionState::Idle;
    }
}
