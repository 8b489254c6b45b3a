// CLI command definitions using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use steptracker::project::DEFAULT_PATTERN_FILE;

#[derive(Parser)]
#[command(name = "steptracker")]
#[command(about = "Terminal step sequencer", version)]
pub struct Cli {
    /// Config file (defaults to <config dir>/steptracker/config.ron)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Edit and play pattern files in the terminal grid
    Run {
        /// Pattern files, played in order
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Tempo in beats per minute
        #[arg(long)]
        bpm: Option<u32>,

        /// Sample bank JSON; binds every event to the sampler
        #[arg(long)]
        bank: Option<PathBuf>,
    },

    /// Write the built-in test pattern
    GenTestPattern {
        #[arg(long, default_value = DEFAULT_PATTERN_FILE)]
        out: PathBuf,
    },

    /// Decode a pattern file and print it
    Decode {
        #[arg(long = "in", default_value = DEFAULT_PATTERN_FILE)]
        input: PathBuf,
    },

    /// Play a built-in pattern without the grid
    Demo {
        #[arg(long)]
        bpm: Option<u32>,

        #[arg(long)]
        bank: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run() {
        let cli = Cli::parse_from(["steptracker", "run", "a.trkr", "b.trkr", "--bpm", "90"]);
        match cli.command {
            Commands::Run { files, bpm, bank } => {
                assert_eq!(files.len(), 2);
                assert_eq!(bpm, Some(90));
                assert!(bank.is_none());
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_decode_defaults_to_test_pattern_file() {
        let cli = Cli::parse_from(["steptracker", "decode"]);
        match cli.command {
            Commands::Decode { input } => assert_eq!(input, PathBuf::from(DEFAULT_PATTERN_FILE)),
            _ => panic!("expected decode"),
        }
    }
}
