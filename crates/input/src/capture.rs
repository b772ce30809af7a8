//! Input capture - the listener thread and its snapshot hand-off
//!
//! A dedicated thread owns the terminal event stream and folds key press
//! and release events into a snapshot of currently-down keys. Each change
//! is published into a [`SnapshotSlot`]: a single-slot, overwrite-on-send
//! hand-off with a wake signal. The producer never blocks and an unread
//! snapshot may be overwritten - the simulation tick only ever wants the
//! latest key state, not a history.
//!
//! Shutdown is cooperative: a polled flag checked before each poll wait.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};

/// How long the listener blocks waiting for events before rechecking the
/// shutdown flag.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// The set of keys currently held down, as seen by the listener.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeySnapshot {
    down: HashSet<KeyCode>,
}

impl KeySnapshot {
    pub fn is_down(&self, key: KeyCode) -> bool {
        self.down.contains(&key)
    }

    /// Record a key transition. Used by the listener and by tests driving
    /// the handling layer directly.
    pub fn set_down(&mut self, key: KeyCode, down: bool) {
        if down {
            self.down.insert(key);
        } else {
            self.down.remove(&key);
        }
    }
}

/// Single-slot snapshot hand-off: last writer wins, readers drain.
#[derive(Debug, Default)]
pub struct SnapshotSlot {
    slot: Mutex<Option<KeySnapshot>>,
    signal: Condvar,
}

impl SnapshotSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a snapshot, overwriting any unread one, and wake a waiter.
    pub fn publish(&self, snapshot: KeySnapshot) {
        let mut slot = self.slot.lock().unwrap();
        *slot = Some(snapshot);
        self.signal.notify_one();
    }

    /// Take the pending snapshot, if any, without blocking.
    pub fn take(&self) -> Option<KeySnapshot> {
        self.slot.lock().unwrap().take()
    }

    /// Block up to `timeout` for a snapshot.
    pub fn take_timeout(&self, timeout: Duration) -> Option<KeySnapshot> {
        let mut slot = self.slot.lock().unwrap();
        if slot.is_none() {
            let (guard, _timed_out) = self.signal.wait_timeout(slot, timeout).unwrap();
            slot = guard;
        }
        slot.take()
    }
}

/// The input listener thread handle.
pub struct InputCapture {
    slot: Arc<SnapshotSlot>,
    shutdown: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl InputCapture {
    /// Start the listener thread. The terminal should already be in raw
    /// mode so release events arrive where the backend supports them.
    pub fn spawn() -> Self {
        let slot = Arc::new(SnapshotSlot::new());
        let shutdown = Arc::new(AtomicBool::new(false));

        let thread_slot = Arc::clone(&slot);
        let thread_shutdown = Arc::clone(&shutdown);
        let thread = thread::Builder::new()
            .name("input-capture".into())
            .spawn(move || listen(thread_slot, thread_shutdown))
            .expect("failed to spawn input capture thread");

        Self {
            slot,
            shutdown,
            thread: Some(thread),
        }
    }

    /// The hand-off slot the simulation tick drains.
    pub fn slot(&self) -> Arc<SnapshotSlot> {
        Arc::clone(&self.slot)
    }

    /// Request shutdown and join the listener.
    pub fn shutdown(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for InputCapture {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn listen(slot: Arc<SnapshotSlot>, shutdown: Arc<AtomicBool>) {
    let mut snapshot = KeySnapshot::default();

    while !shutdown.load(Ordering::Relaxed) {
        match event::poll(POLL_INTERVAL) {
            Ok(false) => continue,
            Ok(true) => {}
            Err(err) => {
                log::error!("input capture poll failed: {}", err);
                break;
            }
        }

        match event::read() {
            Ok(Event::Key(key)) => {
                match key.kind {
                    KeyEventKind::Press => snapshot.set_down(key.code, true),
                    KeyEventKind::Release => snapshot.set_down(key.code, false),
                    // Terminal auto-repeat; the handling layer generates
                    // its own repeats from held state.
                    KeyEventKind::Repeat => continue,
                }
                slot.publish(snapshot.clone());
            }
            Ok(_) => {}
            Err(err) => {
                log::error!("input capture read failed: {}", err);
                break;
            }
        }
    }
}
