// Steptracker - Terminal step sequencer

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use steptracker::config::TrackerConfig;
use steptracker::project::{
    demo_pattern, describe_pattern, load_pattern, save_pattern, test_pattern,
};
use steptracker::sequencer::{DispatchPool, PatternTable, Player, Scheduler};
use steptracker::ui::{CrosstermKeys, TerminalGrid};
use steptracker::{AudioEngine, AudioGenerator, GeneratorRack, Session};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = TrackerConfig::load(cli.config.as_deref()).context("Failed to load config")?;

    // The grid owns the terminal during a session, so logs go to a file
    let log_to_file = matches!(cli.command, Commands::Run { .. });
    init_tracing(log_to_file.then_some(config.log_file.as_path()))?;

    let result = match cli.command {
        Commands::Run { files, bpm, bank } => run(&config, files, bpm, bank),
        Commands::GenTestPattern { out } => gen_test_pattern(&out),
        Commands::Decode { input } => decode(&input),
        Commands::Demo { bpm, bank } => demo(&config, bpm, bank),
    };

    if let Err(e) = &result {
        tracing::error!("{:#}", e);
    }
    result
}

fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

/// Generator rack plus the audio engine keeping the output stream alive
struct Rack {
    generators: Arc<GeneratorRack>,
    audio: Option<(AudioEngine, Arc<AudioGenerator>)>,
}

impl Rack {
    /// Build the rack; with a bank every event of `player` is bound to the sampler
    fn build(player: &Player, bank: Option<&Path>) -> Result<Self> {
        let mut generators = GeneratorRack::new();

        let audio = match bank {
            Some(path) => {
                let (engine, producer) = AudioEngine::start(path).with_context(|| {
                    format!("Failed to start audio with bank {}", path.display())
                })?;
                let generator = Arc::new(AudioGenerator::new(
                    path.display().to_string(),
                    Arc::new(Mutex::new(producer)),
                ));
                let reference = generators.register_audio(generator.clone());
                player.apply_generator(reference);
                Some((engine, generator))
            }
            None => None,
        };

        for description in generators.describe() {
            tracing::info!(generator = %description, "generator registered");
        }

        Ok(Self {
            generators: Arc::new(generators),
            audio,
        })
    }

    fn silence(&self) {
        if let Some((_, generator)) = &self.audio {
            generator.silence();
        }
    }
}

fn run(
    config: &TrackerConfig,
    files: Vec<PathBuf>,
    bpm: Option<u32>,
    bank: Option<PathBuf>,
) -> Result<()> {
    let mut table = PatternTable::default();
    for path in &files {
        let pattern = load_pattern(path)
            .with_context(|| format!("Failed to load pattern {}", path.display()))?;
        table.push(pattern);
    }

    let player = Player::new(bpm.unwrap_or(config.default_bpm), table)?;
    let rack = Rack::build(&player, bank.as_deref().or(config.sample_bank.as_deref()))?;
    let pool = DispatchPool::new(config.dispatch_workers, config.dispatch_queue);

    let grid = TerminalGrid::init().context("Failed to initialize terminal")?;
    let mut session = Session::new(player, rack.generators.clone(), pool, grid);
    let result = session.run(CrosstermKeys::new());

    // Restores the terminal before anything else is printed
    drop(session);
    rack.silence();

    result.context("Interactive session failed")
}

fn gen_test_pattern(out: &Path) -> Result<()> {
    let pattern = test_pattern();
    save_pattern(out, &pattern)
        .with_context(|| format!("Failed to write test pattern to {}", out.display()))?;
    tracing::info!(path = %out.display(), "test pattern written");
    Ok(())
}

fn decode(input: &Path) -> Result<()> {
    let pattern = load_pattern(input)
        .with_context(|| format!("Failed to decode {}", input.display()))?;
    print!("{}", describe_pattern(&pattern));
    Ok(())
}

fn demo(config: &TrackerConfig, bpm: Option<u32>, bank: Option<PathBuf>) -> Result<()> {
    let table = PatternTable::new(vec![demo_pattern().into()]);
    let player = Player::new(bpm.unwrap_or(config.default_bpm), table)?;
    let rack = Rack::build(&player, bank.as_deref().or(config.sample_bank.as_deref()))?;
    let pool = DispatchPool::new(config.dispatch_workers, config.dispatch_queue);

    let scheduler = Scheduler::new(player, rack.generators.clone(), pool, |_| {});
    tracing::info!(
        bpm = scheduler.player().bpm(),
        lines = scheduler.player().total_lines(),
        "demo playback started"
    );

    let summary = scheduler.play()?;
    // Dropping the scheduler drains the dispatch queue
    drop(scheduler);
    tracing::info!(
        lines = summary.lines_played,
        events = summary.events_dispatched,
        mock_plays = rack.generators.mock().play_count(),
        "demo playback finished"
    );

    rack.silence();
    Ok(())
}
