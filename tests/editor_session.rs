// Integration test: interactive sessions driven by a key channel
//
// The session runs on its own thread; the test feeds keys one at a time and
// observes playback through the mock generator.

use std::io;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use steptracker::editor::{Mode, Session};
use steptracker::generator::{GeneratorRack, MockGenerator};
use steptracker::sequencer::scheduler::PlaybackControl;
use steptracker::sequencer::{
    DispatchPool, Event, GeneratorRef, Pattern, PatternTable, Player, Track,
};
use steptracker::ui::{Key, KeySource, MemoryGrid};

/// Keys sent by the test; input ends when the sender is dropped
struct ChannelKeys(Receiver<Key>);

impl KeySource for ChannelKeys {
    fn next_key(&mut self) -> io::Result<Option<Key>> {
        self.0
            .recv()
            .map(Some)
            .map_err(|_| io::Error::new(io::ErrorKind::UnexpectedEof, "test input closed"))
    }
}

struct Running {
    keys: Sender<Key>,
    mock: Arc<MockGenerator>,
    handle: JoinHandle<Session<MemoryGrid>>,
}

impl Running {
    fn start(bpm: u32, patterns: Vec<Pattern>) -> Self {
        let mock = Arc::new(MockGenerator::new());
        let rack = Arc::new(GeneratorRack::with_mock(mock.clone()));
        let player = Player::new(bpm, PatternTable::from_iter(patterns)).unwrap();
        let (keys, rx) = mpsc::channel();

        let handle = thread::spawn(move || {
            let pool = DispatchPool::new(2, 64);
            let mut session = Session::new(player, rack, pool, MemoryGrid::new());
            session.run(ChannelKeys(rx)).unwrap();
            session
        });

        Self { keys, mock, handle }
    }

    fn press(&self, keys: &[Key]) {
        for key in keys {
            self.keys.send(*key).unwrap();
        }
    }

    fn type_text(&self, text: &str) {
        for c in text.chars() {
            let key = if c == ' ' { Key::Space } else { Key::Char(c) };
            self.keys.send(key).unwrap();
        }
    }

    fn wait_for_plays(&self, count: usize) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while self.mock.play_count() < count {
            assert!(Instant::now() < deadline, "playback never dispatched");
            thread::sleep(Duration::from_millis(5));
        }
    }

    fn finish(self) -> Session<MemoryGrid> {
        self.press(&[Key::Esc]);
        self.handle.join().unwrap()
    }
}

fn two_track_pattern() -> Pattern {
    Pattern::new(vec![
        Track::from_notes(GeneratorRef::Mock, 100, &[60, 62, 64]),
        Track::from_notes(GeneratorRef::Mock, 90, &[36]),
    ])
}

#[test]
fn test_play_then_edit_stops_playback() {
    // One second per line keeps playback alive until edit mode is entered
    let running = Running::start(60, vec![two_track_pattern()]);

    running.press(&[Key::Char('p')]);
    running.wait_for_plays(2);

    running.press(&[Key::Char('e'), Key::Down, Key::Down, Key::Right, Key::Enter]);
    running.type_text("40 80");
    running.press(&[Key::Enter]);

    let session = running.finish();

    assert!(!session.scheduler().is_playing());
    assert_eq!(session.editor().mode(), Mode::Edit);
    let pattern = session.editor().current_pattern().unwrap().snapshot();
    let track = pattern.track(1).unwrap();
    assert_eq!(track.len(), 3);
    assert!(track.get(1).unwrap().is_rest());
    assert_eq!(track.get(2), Some(&Event::new(40, 80, GeneratorRef::Mock)));
    assert!(session.backend().contains("EDIT MODE"));
}

#[test]
fn test_edit_undo_redo() {
    let running = Running::start(120, vec![two_track_pattern()]);

    running.press(&[Key::Char('e'), Key::Enter]);
    running.type_text("72 127");
    running.press(&[Key::Enter, Key::Char('u')]);

    let session = running.finish();
    let pattern = session.editor().current_pattern().unwrap().snapshot();
    assert_eq!(
        pattern.track(0).unwrap().get(0),
        Some(&Event::new(60, 100, GeneratorRef::Mock))
    );
    assert!(session.editor().history().can_redo());
}

#[test]
fn test_malformed_input_keeps_pattern_and_reports() {
    let running = Running::start(120, vec![two_track_pattern()]);

    running.press(&[Key::Char('e'), Key::Enter]);
    running.type_text("60");
    running.press(&[Key::Enter]);

    let session = running.finish();

    assert_eq!(session.editor().current_pattern().unwrap().snapshot(), two_track_pattern());
    assert_eq!(session.editor().mode(), Mode::Edit);
    assert!(session.editor().status().is_some());
    assert_eq!(session.editor().history().undo_count(), 0);
}

#[test]
fn test_edit_on_pattern_without_tracks_reports_index_error() {
    let running = Running::start(120, vec![Pattern::new(Vec::new())]);

    running.press(&[Key::Char('e'), Key::Enter]);
    running.type_text("60 100");
    running.press(&[Key::Enter]);

    let session = running.finish();

    let status = session.editor().status().unwrap().to_string();
    assert!(status.contains("out of range"), "status: {}", status);
    assert!(session.backend().contains("out of range"));
    assert_eq!(session.editor().current_pattern().unwrap().snapshot().track_count(), 0);
}

#[test]
fn test_dropped_input_ends_session() {
    let running = Running::start(60, vec![two_track_pattern()]);
    running.press(&[Key::Char('p')]);
    running.wait_for_plays(1);

    drop(running.keys);
    let session = running.handle.join().unwrap();

    assert!(!session.scheduler().is_playing());
}
