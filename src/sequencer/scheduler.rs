// Scheduler - Plays a Player's pattern table line by line
//
// One traversal at a time walks every pattern in order, publishes the current
// line, hands the line's events to the dispatch pool and then waits for either
// the step delay or a stop request. Cancellation is only observed between steps.

use crate::generator::GeneratorRack;
use crate::sequencer::dispatch::DispatchPool;
use crate::sequencer::player::Player;
use std::sync::atomic::{AtomicBool, AtomicIsize, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};

/// Line offset reported while nothing is playing
pub const IDLE_LINE_OFFSET: isize = -1;

/// Notifications published by a traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackEvent {
    /// A new line is current; `line_offset()` already reflects it
    LineAdvanced { pattern: usize, line: usize },
    /// The whole table was played
    Finished,
    /// The traversal was cancelled
    Stopped,
}

/// Result of a toggle request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Started,
    StopRequested,
}

/// Scheduler error types
#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    #[error("Playback is already running")]
    AlreadyPlaying,

    #[error("Failed to spawn playback thread: {0}")]
    Spawn(#[from] std::io::Error),
}

/// What a traversal did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaybackSummary {
    /// Lines that were made current
    pub lines_played: usize,
    /// Events handed to the dispatch pool
    pub events_dispatched: usize,
    /// True if the traversal was cancelled
    pub stopped: bool,
}

/// Transport operations the grid editor needs
///
/// Implemented by [`Scheduler`]; kept as a trait so the editor state machine
/// can be driven without real playback.
pub trait PlaybackControl {
    fn is_playing(&self) -> bool;

    /// Request cancellation; false if nothing was playing
    fn stop(&self) -> bool;

    /// Stop if playing, otherwise start in the background
    fn toggle_playback(&self) -> Result<Toggle, SchedulerError>;
}

/// Callback receiving playback notifications
pub type PlaybackNotifier = Arc<dyn Fn(PlaybackEvent) + Send + Sync>;

/// Playback state shared between the traversal and its observers
#[derive(Debug)]
struct SharedPlaybackState {
    playing: AtomicBool,
    line_offset: AtomicIsize,
    stop_tx: Mutex<Option<Sender<()>>>,
}

impl Default for SharedPlaybackState {
    fn default() -> Self {
        Self {
            playing: AtomicBool::new(false),
            line_offset: AtomicIsize::new(IDLE_LINE_OFFSET),
            stop_tx: Mutex::new(None),
        }
    }
}

impl SharedPlaybackState {
    fn stop_slot(&self) -> std::sync::MutexGuard<'_, Option<Sender<()>>> {
        self.stop_tx.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

struct SchedulerInner {
    player: Player,
    rack: Arc<GeneratorRack>,
    pool: DispatchPool,
    state: SharedPlaybackState,
    notify: PlaybackNotifier,
}

/// Playback engine for a [`Player`]
pub struct Scheduler {
    inner: Arc<SchedulerInner>,
    handle: Mutex<Option<JoinHandle<PlaybackSummary>>>,
}

impl Scheduler {
    /// Create a scheduler
    ///
    /// `notify` is called from the playback thread for every line advance and
    /// once when the traversal ends.
    pub fn new(
        player: Player,
        rack: Arc<GeneratorRack>,
        pool: DispatchPool,
        notify: impl Fn(PlaybackEvent) + Send + Sync + 'static,
    ) -> Self {
        Self {
            inner: Arc::new(SchedulerInner {
                player,
                rack,
                pool,
                state: SharedPlaybackState::default(),
                notify: Arc::new(notify),
            }),
            handle: Mutex::new(None),
        }
    }

    /// Scheduler without an observer, using the default dispatch pool
    pub fn headless(player: Player, rack: Arc<GeneratorRack>) -> Self {
        Self::new(player, rack, DispatchPool::default(), |_| {})
    }

    pub fn player(&self) -> &Player {
        &self.inner.player
    }

    pub fn rack(&self) -> &Arc<GeneratorRack> {
        &self.inner.rack
    }

    /// Current line within the playing pattern, -1 when idle
    pub fn line_offset(&self) -> isize {
        self.inner.state.line_offset.load(Ordering::SeqCst)
    }

    /// Run a full traversal on the calling thread
    ///
    /// # Errors
    /// Returns [`SchedulerError::AlreadyPlaying`] if another traversal is active.
    pub fn play(&self) -> Result<PlaybackSummary, SchedulerError> {
        let stop_rx = self.inner.begin()?;
        Ok(self.inner.traverse(stop_rx))
    }

    /// Launch a traversal on its own thread and return immediately
    ///
    /// # Errors
    /// Returns [`SchedulerError::AlreadyPlaying`] if another traversal is active.
    pub fn start(&self) -> Result<(), SchedulerError> {
        let stop_rx = self.inner.begin()?;
        let inner = Arc::clone(&self.inner);

        let spawned = thread::Builder::new()
            .name("playback".to_string())
            .spawn(move || inner.traverse(stop_rx));

        match spawned {
            Ok(handle) => {
                *self.handle.lock().unwrap_or_else(PoisonError::into_inner) = Some(handle);
                Ok(())
            }
            Err(e) => {
                self.inner.finish();
                Err(SchedulerError::Spawn(e))
            }
        }
    }

    /// Wait for the background traversal started by [`start`](Self::start)
    pub fn join(&self) -> Option<PlaybackSummary> {
        let handle = self
            .handle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()?;
        handle.join().ok()
    }
}

impl PlaybackControl for Scheduler {
    fn is_playing(&self) -> bool {
        self.inner.state.playing.load(Ordering::SeqCst)
    }

    fn stop(&self) -> bool {
        // Taking the sender makes repeated or idle stops harmless
        let Some(tx) = self.inner.state.stop_slot().take() else {
            return false;
        };
        tx.send(()).is_ok()
    }

    fn toggle_playback(&self) -> Result<Toggle, SchedulerError> {
        // A traversal that ends on its own between the two checks leaves
        // nothing to stop, so it counts as idle
        if self.is_playing() && self.stop() {
            return Ok(Toggle::StopRequested);
        }

        // Reap the finished traversal before starting a new one
        self.join();
        self.start()?;
        Ok(Toggle::Started)
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.stop();
        self.join();
    }
}

impl SchedulerInner {
    /// Claim the single traversal slot and install a fresh stop channel
    fn begin(&self) -> Result<Receiver<()>, SchedulerError> {
        let mut stop_slot = self.state.stop_slot();

        if self
            .state
            .playing
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::debug!("ignoring start request, playback already running");
            return Err(SchedulerError::AlreadyPlaying);
        }

        let (tx, rx) = mpsc::channel();
        *stop_slot = Some(tx);
        Ok(rx)
    }

    fn traverse(&self, stop_rx: Receiver<()>) -> PlaybackSummary {
        let delay = self.player.step_delay();
        let mut summary = PlaybackSummary::default();

        tracing::info!(
            bpm = self.player.bpm(),
            patterns = self.player.table().len(),
            "playback started"
        );

        'table: for (pattern_index, pattern) in self.player.table().iter().enumerate() {
            let mut line_index = 0;

            loop {
                // Copy the line out so the lock is never held across the wait
                let line = {
                    let pattern = pattern.read();
                    if line_index >= pattern.line_count() {
                        break;
                    }
                    pattern.line(line_index)
                };

                self.state
                    .line_offset
                    .store(line_index as isize, Ordering::SeqCst);
                (self.notify)(PlaybackEvent::LineAdvanced {
                    pattern: pattern_index,
                    line: line_index,
                });

                for event in line.iter().filter(|e| !e.is_rest()) {
                    match self.rack.resolve(event.generator) {
                        Some(generator) => {
                            if self.pool.submit(generator, *event) {
                                summary.events_dispatched += 1;
                            }
                        }
                        None => {
                            tracing::debug!(generator = %event.generator, "no generator registered")
                        }
                    }
                }
                summary.lines_played += 1;

                match stop_rx.recv_timeout(delay) {
                    Err(RecvTimeoutError::Timeout) => {}
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                        summary.stopped = true;
                        break 'table;
                    }
                }

                line_index += 1;
            }
        }

        self.finish();
        (self.notify)(if summary.stopped {
            PlaybackEvent::Stopped
        } else {
            PlaybackEvent::Finished
        });

        tracing::info!(
            lines = summary.lines_played,
            events = summary.events_dispatched,
            stopped = summary.stopped,
            "playback ended"
        );

        summary
    }

    /// Return to idle
    fn finish(&self) {
        let mut stop_slot = self.state.stop_slot();
        stop_slot.take();
        self.state
            .line_offset
            .store(IDLE_LINE_OFFSET, Ordering::SeqCst);
        self.state.playing.store(false, Ordering::SeqCst);
    }
}
