// Dispatch pool - Bounded fire-and-forget delivery of events to generators
//
// The scheduler must never wait on a generator, and dense patterns must not
// spawn one thread per event. A fixed set of workers drains a bounded queue;
// when the queue is full the dispatch is dropped.

use crate::generator::Generator;
use crate::sequencer::event::Event;
use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};

/// Default number of worker threads
pub const DEFAULT_WORKERS: usize = 4;

/// Default queue capacity
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

struct DispatchJob {
    generator: Arc<dyn Generator>,
    event: Event,
}

/// Fixed worker pool feeding generators
pub struct DispatchPool {
    sender: Option<SyncSender<DispatchJob>>,
    workers: Vec<JoinHandle<()>>,
}

impl DispatchPool {
    /// Create a pool with `workers` threads and room for `capacity` pending dispatches
    pub fn new(workers: usize, capacity: usize) -> Self {
        let (sender, receiver) = mpsc::sync_channel::<DispatchJob>(capacity.max(1));
        let receiver = Arc::new(Mutex::new(receiver));

        let workers = (0..workers.max(1))
            .map(|index| {
                let receiver = Arc::clone(&receiver);
                thread::Builder::new()
                    .name(format!("dispatch-{}", index))
                    .spawn(move || worker_loop(&receiver))
            })
            .filter_map(|spawned| match spawned {
                Ok(handle) => Some(handle),
                Err(e) => {
                    tracing::error!("failed to spawn dispatch worker: {}", e);
                    None
                }
            })
            .collect();

        Self {
            sender: Some(sender),
            workers,
        }
    }

    /// Queue an event for a generator
    ///
    /// Never blocks. Returns false if the dispatch was dropped.
    pub fn submit(&self, generator: Arc<dyn Generator>, event: Event) -> bool {
        let Some(sender) = &self.sender else {
            return false;
        };

        match sender.try_send(DispatchJob { generator, event }) {
            Ok(()) => true,
            Err(TrySendError::Full(job)) => {
                tracing::warn!(note = job.event.note_num, "dispatch queue full, event dropped");
                false
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }
}

impl Default for DispatchPool {
    fn default() -> Self {
        Self::new(DEFAULT_WORKERS, DEFAULT_QUEUE_CAPACITY)
    }
}

impl Drop for DispatchPool {
    fn drop(&mut self) {
        // Closing the queue lets workers finish what is pending and exit
        self.sender.take();
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}

fn worker_loop(receiver: &Mutex<Receiver<DispatchJob>>) {
    loop {
        let job = {
            let rx = receiver.lock().unwrap_or_else(PoisonError::into_inner);
            rx.recv()
        };

        match job {
            Ok(job) => job.generator.play(&job.event),
            Err(_) => break,
        }
    }
}
