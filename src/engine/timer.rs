//! Real-time deferred actions.
//!
//! A scheduled timer sleeps on its own thread and posts [`Event::Timer`] into
//! the main event channel when it fires, independent of the frame clock. The
//! returned [`TimerHandle`] cancels it; a cancelled timer never posts.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::event::Event;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerId(pub u64);

#[derive(Debug)]
pub struct TimerHandle {
    id: TimerId,
    cancelled: Arc<AtomicBool>,
}

impl TimerHandle {
    pub fn id(&self) -> TimerId {
        self.id
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
pub struct TimerQueue {
    tx: Sender<Event>,
    next_id: AtomicU64,
}

impl TimerQueue {
    pub fn new(tx: Sender<Event>) -> Self {
        Self {
            tx,
            next_id: AtomicU64::new(1),
        }
    }

    pub fn schedule(&self, delay: Duration) -> TimerHandle {
        let id = TimerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);
        let tx = self.tx.clone();

        thread::spawn(move || {
            thread::sleep(delay);
            if !flag.load(Ordering::SeqCst) {
                // The receiver is gone when the app is shutting down.
                let _ = tx.send(Event::Timer(id));
            }
        });

        log::trace!("scheduled timer {} in {:?}", id.0, delay);
        TimerHandle { id, cancelled }
    }
}
