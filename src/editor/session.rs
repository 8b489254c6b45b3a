// Session - Interactive control loop wiring input, editor, scheduler and grid
//
// Three activities run concurrently: the input thread blocking on keys, the
// playback traversal, and this control loop. Keys and playback notifications
// share one channel so the loop handles exactly one of them at a time.

use crate::editor::error::SessionError;
use crate::editor::state::{GridEditor, Outcome};
use crate::generator::GeneratorRack;
use crate::sequencer::dispatch::DispatchPool;
use crate::sequencer::player::Player;
use crate::sequencer::scheduler::{PlaybackControl, PlaybackEvent, Scheduler};
use crate::ui::backend::{GridBackend, Key, KeySource};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

/// Messages handled by the control loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Key(Key),
    Playback(PlaybackEvent),
    /// The key source failed or ran out
    InputClosed,
}

/// An interactive editing session
pub struct Session<B: GridBackend> {
    editor: GridEditor,
    scheduler: Scheduler,
    backend: B,
    events_tx: Sender<SessionEvent>,
    events_rx: Receiver<SessionEvent>,
}

impl<B: GridBackend> Session<B> {
    /// Build a session; playback notifications are routed to the control loop
    pub fn new(player: Player, rack: Arc<GeneratorRack>, pool: DispatchPool, backend: B) -> Self {
        let (events_tx, events_rx) = mpsc::channel();
        let editor = GridEditor::new(player.table().clone());

        let notify_tx = events_tx.clone();
        let scheduler = Scheduler::new(player, rack, pool, move |event| {
            // The loop may already be gone while a traversal unwinds
            let _ = notify_tx.send(SessionEvent::Playback(event));
        });

        Self {
            editor,
            scheduler,
            backend,
            events_tx,
            events_rx,
        }
    }

    pub fn editor(&self) -> &GridEditor {
        &self.editor
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Run until exit is requested or input ends
    ///
    /// Playback is stopped before returning.
    pub fn run(&mut self, keys: impl KeySource + 'static) -> Result<(), SessionError> {
        spawn_input_thread(keys, self.events_tx.clone()).map_err(SessionError::InputThread)?;
        tracing::info!("session started");

        let result = self.control_loop();

        if self.scheduler.stop() {
            tracing::info!("playback stopped on exit");
        }
        self.scheduler.join();
        tracing::info!("session ended");

        result
    }

    fn control_loop(&mut self) -> Result<(), SessionError> {
        self.editor.render(&mut self.backend)?;

        while let Ok(event) = self.events_rx.recv() {
            match event {
                SessionEvent::Key(key) => match self.editor.handle_key(key, &self.scheduler) {
                    Outcome::Exit => break,
                    Outcome::Ignored => continue,
                    Outcome::Redraw => {}
                },
                SessionEvent::Playback(playback) => {
                    tracing::debug!(?playback, "playback notification");
                    self.editor.on_playback(playback);
                }
                SessionEvent::InputClosed => break,
            }
            self.editor.render(&mut self.backend)?;
        }

        Ok(())
    }
}

fn spawn_input_thread(
    mut keys: impl KeySource + 'static,
    tx: Sender<SessionEvent>,
) -> std::io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("input".to_string())
        .spawn(move || {
            loop {
                let event = match keys.next_key() {
                    Ok(Some(key)) => SessionEvent::Key(key),
                    Ok(None) => continue,
                    Err(e) => {
                        tracing::debug!("key input closed: {}", e);
                        let _ = tx.send(SessionEvent::InputClosed);
                        break;
                    }
                };
                if tx.send(event).is_err() {
                    break;
                }
            }
        })
}
