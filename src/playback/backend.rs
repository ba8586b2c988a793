//! Playback backends.
//!
//! The [`PlaybackBackend`] trait abstracts the OS audio primitive so the
//! controller can be tested without audio hardware. The production
//! implementation is [`RodioBackend`]; tests use [`MockBackend`].

use std::io::Cursor;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use crossbeam_channel::bounded;
use rodio::{Decoder, OutputStream, Sink};
use tracing::debug;

use crate::types::{AudioUsage, PlaybackAttributes};

use super::asset::adhan_sound;
use super::error::PlaybackError;

/// How long `begin` waits for the playback thread to confirm construction.
const CONSTRUCT_TIMEOUT_SECS: u64 = 5;

/// Sink volume for alarm-usage sessions (full alarm volume).
const ALARM_VOLUME: f32 = 1.0;

/// Sink volume for non-alarm sessions.
const DEFAULT_VOLUME: f32 = 0.7;

/// Callback invoked exactly once when a session's audio ends.
///
/// Fires both on natural completion and after an explicit halt; the
/// controller's generation guard makes the second case a no-op.
pub type CompletionCallback = Box<dyn FnOnce() + Send + 'static>;

// ============================================================================
// Traits
// ============================================================================

/// Handle to one in-progress playback session.
pub trait SessionHandle: Send {
    /// Best-effort halt of the underlying audio resource.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend could not halt cleanly; the session
    /// is considered released either way.
    fn halt(&self) -> Result<(), PlaybackError>;
}

/// Abstraction over the OS media-playback primitive.
pub trait PlaybackBackend: Send + Sync {
    /// Starts playing the bundled adhan recording.
    ///
    /// Returns after construction is confirmed; audio proceeds on a backend
    /// thread, and `on_complete` fires when it ends.
    ///
    /// # Errors
    ///
    /// Returns an error if the device, decoder, or stream could not be set
    /// up. On error no session exists and `on_complete` never fires.
    fn begin(
        &self,
        attributes: PlaybackAttributes,
        on_complete: CompletionCallback,
    ) -> Result<Box<dyn SessionHandle>, PlaybackError>;
}

impl<B: PlaybackBackend + ?Sized> PlaybackBackend for Arc<B> {
    fn begin(
        &self,
        attributes: PlaybackAttributes,
        on_complete: CompletionCallback,
    ) -> Result<Box<dyn SessionHandle>, PlaybackError> {
        (**self).begin(attributes, on_complete)
    }
}

fn session_volume(attributes: PlaybackAttributes) -> f32 {
    match attributes.usage {
        AudioUsage::Alarm => ALARM_VOLUME,
        _ => DEFAULT_VOLUME,
    }
}

// ============================================================================
// RodioBackend
// ============================================================================

/// Production backend on rodio.
///
/// Each session runs on a dedicated thread that owns the `OutputStream`
/// (which is not `Send`) for the whole session. Construction is confirmed
/// over a bounded channel before `begin` returns, so a failed device open or
/// decode never leaves a dangling session behind.
pub struct RodioBackend {
    construct_timeout: Duration,
}

impl RodioBackend {
    /// Creates a new rodio backend.
    #[must_use]
    pub fn new() -> Self {
        Self {
            construct_timeout: Duration::from_secs(CONSTRUCT_TIMEOUT_SECS),
        }
    }
}

impl Default for RodioBackend {
    fn default() -> Self {
        Self::new()
    }
}

struct RodioSessionHandle {
    sink: Arc<Sink>,
}

impl SessionHandle for RodioSessionHandle {
    fn halt(&self) -> Result<(), PlaybackError> {
        // Stopping the sink wakes the playback thread out of
        // `sleep_until_end`, which releases the stream and exits.
        self.sink.stop();
        Ok(())
    }
}

impl PlaybackBackend for RodioBackend {
    fn begin(
        &self,
        attributes: PlaybackAttributes,
        on_complete: CompletionCallback,
    ) -> Result<Box<dyn SessionHandle>, PlaybackError> {
        let (ready_tx, ready_rx) = bounded::<Result<Arc<Sink>, PlaybackError>>(1);

        let spawned = thread::Builder::new()
            .name("adhan-playback".to_string())
            .spawn(move || {
                let (stream, stream_handle) = match OutputStream::try_default() {
                    Ok(pair) => pair,
                    Err(e) => {
                        let _ = ready_tx
                            .send(Err(PlaybackError::DeviceNotAvailable(e.to_string())));
                        return;
                    }
                };
                // The stream must stay alive until the session ends; it is
                // dropped when this thread exits.
                let _stream = stream;

                let decoder = match Decoder::new(Cursor::new(adhan_sound())) {
                    Ok(d) => d,
                    Err(e) => {
                        let _ = ready_tx.send(Err(PlaybackError::DecodeError(e.to_string())));
                        return;
                    }
                };

                let sink = match Sink::try_new(&stream_handle) {
                    Ok(s) => s,
                    Err(e) => {
                        let _ = ready_tx.send(Err(PlaybackError::StreamError(e.to_string())));
                        return;
                    }
                };

                sink.set_volume(session_volume(attributes));
                sink.append(decoder);

                let sink = Arc::new(sink);
                if ready_tx.send(Ok(Arc::clone(&sink))).is_err() {
                    // Caller gave up waiting; tear down immediately.
                    sink.stop();
                    return;
                }

                debug!(
                    usage = attributes.usage.as_str(),
                    content_type = attributes.content_type.as_str(),
                    "adhan playback running"
                );
                sink.sleep_until_end();
                on_complete();
            });

        if let Err(e) = spawned {
            return Err(PlaybackError::Backend(format!(
                "failed to spawn playback thread: {}",
                e
            )));
        }

        match ready_rx.recv_timeout(self.construct_timeout) {
            Ok(Ok(sink)) => Ok(Box::new(RodioSessionHandle { sink })),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(PlaybackError::Backend(
                "playback thread did not confirm construction".to_string(),
            )),
        }
    }
}

// ============================================================================
// MockBackend
// ============================================================================

/// Scripted backend for tests.
///
/// Records every session, can force construction failures, and lets tests
/// fire a session's completion callback by hand to simulate the audio
/// running out.
#[derive(Default)]
pub struct MockBackend {
    sessions: Mutex<Vec<Arc<MockSessionState>>>,
    fail_next: AtomicBool,
    halt_fails: AtomicBool,
}

/// Recorded state of one mock session.
pub struct MockSessionState {
    attributes: PlaybackAttributes,
    halted: AtomicBool,
    released: AtomicBool,
    halt_fails: bool,
    completion: Mutex<Option<CompletionCallback>>,
}

impl MockSessionState {
    /// Returns the attributes the session was begun with.
    #[must_use]
    pub fn attributes(&self) -> PlaybackAttributes {
        self.attributes
    }

    /// Returns true if `halt` was called on the session's handle.
    #[must_use]
    pub fn is_halted(&self) -> bool {
        self.halted.load(Ordering::SeqCst)
    }

    /// Returns true if the session's handle has been dropped.
    #[must_use]
    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::SeqCst)
    }

    /// Fires this session's completion callback, if still pending.
    ///
    /// Simulates the audio running out naturally. Returns false if the
    /// callback already fired.
    pub fn fire_completion(&self) -> bool {
        let callback = self.completion.lock().unwrap().take();
        match callback {
            Some(callback) => {
                callback();
                true
            }
            None => false,
        }
    }
}

struct MockSessionHandle {
    state: Arc<MockSessionState>,
}

impl SessionHandle for MockSessionHandle {
    fn halt(&self) -> Result<(), PlaybackError> {
        self.state.halted.store(true, Ordering::SeqCst);
        if self.state.halt_fails {
            return Err(PlaybackError::Backend("simulated halt failure".to_string()));
        }
        Ok(())
    }
}

impl Drop for MockSessionHandle {
    fn drop(&mut self) {
        self.state.released.store(true, Ordering::SeqCst);
    }
}

impl MockBackend {
    /// Creates a new mock backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `begin` call fail with a construction error.
    pub fn set_fail_next(&self, fail: bool) {
        self.fail_next.store(fail, Ordering::SeqCst);
    }

    /// Makes handles from future sessions report halt failures.
    pub fn set_halt_fails(&self, fail: bool) {
        self.halt_fails.store(fail, Ordering::SeqCst);
    }

    /// Returns the total number of sessions begun.
    #[must_use]
    pub fn session_count(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }

    /// Returns the number of sessions whose handle has not been released.
    #[must_use]
    pub fn live_sessions(&self) -> usize {
        self.sessions
            .lock()
            .unwrap()
            .iter()
            .filter(|s| !s.is_released())
            .count()
    }

    /// Returns the most recently begun session, if any.
    #[must_use]
    pub fn last_session(&self) -> Option<Arc<MockSessionState>> {
        self.sessions.lock().unwrap().last().cloned()
    }

    /// Fires the most recent session's completion callback.
    ///
    /// Returns false if there is no pending callback (none begun, or
    /// already fired).
    pub fn fire_completion(&self) -> bool {
        match self.last_session() {
            Some(session) => session.fire_completion(),
            None => false,
        }
    }
}

impl PlaybackBackend for MockBackend {
    fn begin(
        &self,
        attributes: PlaybackAttributes,
        on_complete: CompletionCallback,
    ) -> Result<Box<dyn SessionHandle>, PlaybackError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(PlaybackError::Backend(
                "simulated construction failure".to_string(),
            ));
        }

        let state = Arc::new(MockSessionState {
            attributes,
            halted: AtomicBool::new(false),
            released: AtomicBool::new(false),
            halt_fails: self.halt_fails.load(Ordering::SeqCst),
            completion: Mutex::new(Some(on_complete)),
        });
        self.sessions.lock().unwrap().push(Arc::clone(&state));

        Ok(Box::new(MockSessionHandle { state }))
    }
}

// ============================================================================
// Tests
// ============================================================================
