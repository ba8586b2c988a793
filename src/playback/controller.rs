//! The playback controller.
//!
//! Owns zero-or-one active playback session and mediates between the two
//! imperative operations (`start`, `stop`) and the audio backend. The
//! completion callback re-enters the same stop sequence, guarded by a
//! session generation counter so an explicit stop racing a firing
//! completion never releases a session twice.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use crate::types::{PlaybackAttributes, PlaybackState};

use super::backend::{PlaybackBackend, SessionHandle};
use super::error::PlaybackError;

// ============================================================================
// PlaybackController
// ============================================================================

struct ActiveSession {
    id: u64,
    handle: Box<dyn SessionHandle>,
}

struct ControllerInner {
    backend: Box<dyn PlaybackBackend>,
    attributes: PlaybackAttributes,
    muted: AtomicBool,
    next_session_id: AtomicU64,
    active: Mutex<Option<ActiveSession>>,
}

/// Controller for the single adhan playback session.
///
/// Thread-safe; share across threads with `Arc`. Dropping the controller
/// stops and releases any active session.
pub struct PlaybackController {
    inner: Arc<ControllerInner>,
}

impl PlaybackController {
    /// Creates a controller with the fixed alarm routing attributes.
    #[must_use]
    pub fn new(backend: Box<dyn PlaybackBackend>) -> Self {
        Self::with_attributes(backend, PlaybackAttributes::alarm())
    }

    /// Creates a controller with explicit routing attributes.
    #[must_use]
    pub fn with_attributes(
        backend: Box<dyn PlaybackBackend>,
        attributes: PlaybackAttributes,
    ) -> Self {
        Self {
            inner: Arc::new(ControllerInner {
                backend,
                attributes,
                muted: AtomicBool::new(false),
                next_session_id: AtomicU64::new(1),
                active: Mutex::new(None),
            }),
        }
    }

    /// Starts playback of the bundled adhan recording.
    ///
    /// Any existing session is fully torn down first; two sessions never
    /// overlap. Returns immediately after construction is confirmed; audio
    /// proceeds on a backend thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend could not construct the session. The
    /// controller is idle afterwards either way; callers at the command
    /// boundary log and discard this error.
    pub fn start(&self) -> Result<(), PlaybackError> {
        let inner = &self.inner;
        let mut active = inner.lock_active();

        // Replace-before-create: never two live sessions.
        ControllerInner::halt_session(active.take());

        if inner.muted.load(Ordering::SeqCst) && !inner.attributes.bypasses_mute() {
            debug!("playback muted, skipping session");
            return Ok(());
        }

        let id = inner.next_session_id.fetch_add(1, Ordering::SeqCst);
        let weak = Arc::downgrade(inner);
        let on_complete = Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.clear_if_current(id);
            }
        });

        let handle = inner.backend.begin(inner.attributes, on_complete)?;
        *active = Some(ActiveSession { id, handle });
        debug!(session = id, "playback session started");
        Ok(())
    }

    /// Stops playback and releases the session.
    ///
    /// Idempotent; a no-op when idle. Halt failures are logged and
    /// swallowed, and the controller is idle afterwards regardless.
    pub fn stop(&self) {
        let mut active = self.inner.lock_active();
        ControllerInner::halt_session(active.take());
    }

    /// Returns the observable playback state.
    #[must_use]
    pub fn state(&self) -> PlaybackState {
        if self.inner.lock_active().is_some() {
            PlaybackState::Playing
        } else {
            PlaybackState::Idle
        }
    }

    /// Returns true if a session is active.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.state().is_playing()
    }

    /// Returns the routing attributes sessions are begun with.
    #[must_use]
    pub fn attributes(&self) -> PlaybackAttributes {
        self.inner.attributes
    }

    /// Sets the player-level mute toggle.
    ///
    /// Alarm-usage sessions bypass this toggle; it only suppresses sessions
    /// whose attributes do not claim alarm routing.
    pub fn set_muted(&self, muted: bool) {
        self.inner.muted.store(muted, Ordering::SeqCst);
        debug!(muted, "mute toggle updated");
    }

    /// Returns true if the mute toggle is set.
    #[must_use]
    pub fn is_muted(&self) -> bool {
        self.inner.muted.load(Ordering::SeqCst)
    }
}

impl Drop for PlaybackController {
    fn drop(&mut self) {
        // Teardown guarantee: no native audio resource outlives the
        // controller.
        self.stop();
    }
}

impl std::fmt::Debug for PlaybackController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackController")
            .field("state", &self.state())
            .field("muted", &self.is_muted())
            .finish_non_exhaustive()
    }
}

impl ControllerInner {
    fn lock_active(&self) -> MutexGuard<'_, Option<ActiveSession>> {
        // A panicking completion callback must not wedge stop(); recover the
        // guard from a poisoned lock.
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The shared stop sequence: halt, log failures, release.
    fn halt_session(session: Option<ActiveSession>) {
        if let Some(session) = session {
            if let Err(e) = session.handle.halt() {
                warn!(session = session.id, "failed to halt playback: {}", e);
            }
            debug!(session = session.id, "playback session released");
        }
    }

    /// Completion path: releases the session only if it is still current.
    fn clear_if_current(&self, id: u64) {
        let mut active = self.lock_active();
        match active.as_ref() {
            Some(session) if session.id == id => {
                debug!(session = id, "playback completed");
                Self::halt_session(active.take());
            }
            _ => debug!(session = id, "stale completion ignored"),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::MockBackend;
    use crate::types::{AudioContentType, AudioUsage};

    fn mock_controller() -> (PlaybackController, Arc<MockBackend>) {
        // The controller owns one boxed backend; tests keep a second Arc to
        // inspect and script it.
        let backend = Arc::new(MockBackend::new());
        let controller = PlaybackController::new(Box::new(Arc::clone(&backend)));
        (controller, backend)
    }

    #[test]
    fn test_start_then_stop_is_idle() {
        let (controller, backend) = mock_controller();

        controller.start().unwrap();
        assert!(controller.is_playing());

        controller.stop();
        assert_eq!(controller.state(), PlaybackState::Idle);
        assert!(backend.last_session().unwrap().is_halted());
        assert_eq!(backend.live_sessions(), 0);
    }

    #[test]
    fn test_start_replaces_previous_session() {
        let (controller, backend) = mock_controller();

        controller.start().unwrap();
        controller.start().unwrap();

        assert_eq!(backend.session_count(), 2);
        // The first session was torn down before the second was created.
        assert_eq!(backend.live_sessions(), 1);
        assert!(controller.is_playing());
    }

    #[test]
    fn test_stop_when_idle_is_noop() {
        let (controller, backend) = mock_controller();
        controller.stop();
        controller.stop();
        assert_eq!(controller.state(), PlaybackState::Idle);
        assert_eq!(backend.session_count(), 0);
    }

    #[test]
    fn test_construction_failure_leaves_idle() {
        let (controller, backend) = mock_controller();
        backend.set_fail_next(true);

        assert!(controller.start().is_err());
        assert_eq!(controller.state(), PlaybackState::Idle);
        assert_eq!(backend.live_sessions(), 0);
    }

    #[test]
    fn test_natural_completion_transitions_to_idle() {
        let (controller, backend) = mock_controller();

        controller.start().unwrap();
        assert!(backend.fire_completion());

        assert_eq!(controller.state(), PlaybackState::Idle);
        assert_eq!(backend.live_sessions(), 0);
    }

    #[test]
    fn test_stale_completion_does_not_kill_new_session() {
        let (controller, backend) = mock_controller();

        controller.start().unwrap();
        let first = backend.last_session().unwrap();

        // Second start replaces the first session while its completion is
        // still pending.
        controller.start().unwrap();
        assert!(backend
            .last_session()
            .map(|s| !Arc::ptr_eq(&s, &first))
            .unwrap());

        // The replaced session's handle was already released.
        assert!(first.is_released());

        // Its completion fires late; the current session must survive it.
        assert!(first.fire_completion());
        assert!(controller.is_playing());
        assert_eq!(backend.live_sessions(), 1);
    }

    #[test]
    fn test_completion_after_explicit_stop_is_noop() {
        let (controller, backend) = mock_controller();

        controller.start().unwrap();
        controller.stop();

        // The stop already released the session; the (late) completion must
        // not disturb anything.
        backend.fire_completion();
        assert_eq!(controller.state(), PlaybackState::Idle);
        assert_eq!(backend.live_sessions(), 0);
    }

    #[test]
    fn test_halt_failure_is_swallowed() {
        let (controller, backend) = mock_controller();
        backend.set_halt_fails(true);

        controller.start().unwrap();
        controller.stop();

        assert_eq!(controller.state(), PlaybackState::Idle);
        assert_eq!(backend.live_sessions(), 0);
    }

    #[test]
    fn test_drop_releases_session() {
        let (controller, backend) = mock_controller();
        controller.start().unwrap();
        assert_eq!(backend.live_sessions(), 1);

        drop(controller);
        assert_eq!(backend.live_sessions(), 0);
        assert!(backend.last_session().unwrap().is_halted());
    }

    #[test]
    fn test_alarm_sessions_bypass_mute() {
        let (controller, backend) = mock_controller();
        controller.set_muted(true);
        assert!(controller.is_muted());

        controller.start().unwrap();
        assert!(controller.is_playing());
        assert_eq!(backend.session_count(), 1);
    }

    #[test]
    fn test_non_alarm_sessions_respect_mute() {
        let backend = Arc::new(MockBackend::new());
        let controller = PlaybackController::with_attributes(
            Box::new(Arc::clone(&backend)),
            PlaybackAttributes {
                usage: AudioUsage::Notification,
                content_type: AudioContentType::Sonification,
            },
        );
        controller.set_muted(true);

        controller.start().unwrap();
        assert_eq!(controller.state(), PlaybackState::Idle);
        assert_eq!(backend.session_count(), 0);

        controller.set_muted(false);
        controller.start().unwrap();
        assert!(controller.is_playing());
    }

    #[test]
    fn test_session_attributes_forwarded() {
        let (controller, backend) = mock_controller();
        controller.start().unwrap();

        let attrs = backend.last_session().unwrap().attributes();
        assert_eq!(attrs.usage, AudioUsage::Alarm);
        assert_eq!(attrs.content_type, AudioContentType::Sonification);
    }

    #[test]
    fn test_debug_impl() {
        let (controller, _backend) = mock_controller();
        let debug_str = format!("{:?}", controller);
        assert!(debug_str.contains("PlaybackController"));
    }
}
