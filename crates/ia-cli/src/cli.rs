//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use ia_core::{Formula, GestureKind, Measurement};

/// Interaction analytics recorder.
///
/// Records gains, losses, keywords, gestures and gaze dwell times into a
/// local analytics database, one stat at a time or from a timed script.
#[derive(Debug, Parser)]
#[command(name = "ia", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Record a gain (count, total).
    Gain {
        identifier: String,
        #[arg(allow_negative_numbers = true)]
        value: f32,
    },

    /// Record a loss (count, total).
    Loss {
        identifier: String,
        #[arg(allow_negative_numbers = true)]
        value: f32,
    },

    /// Record a custom stat.
    Custom {
        identifier: String,
        #[arg(allow_negative_numbers = true)]
        value: f32,

        /// Unit of the value: count, second, feet or meter.
        #[arg(long, default_value = "count")]
        measurement: Measurement,

        /// Aggregation hint: total or average.
        #[arg(long, default_value = "total")]
        formula: Formula,

        /// Object the stat refers to.
        #[arg(long)]
        target: Option<String>,
    },

    /// Record a spoken keyword.
    Keyword {
        keyword: String,

        /// Object the keyword was spoken at.
        #[arg(long)]
        target: Option<String>,
    },

    /// Record a hand gesture.
    Gesture {
        identifier: String,

        /// Seconds the gesture was held.
        #[arg(long, default_value_t = 0.0)]
        hold_length: f32,

        /// Gesture kind: tap, double-tap or hold.
        #[arg(long, default_value = "tap")]
        kind: GestureKind,

        /// Object the gesture was aimed at.
        #[arg(long)]
        target: Option<String>,
    },

    /// Replay a JSON Lines interaction script (`-` reads stdin).
    Replay { script: PathBuf },

    /// Show reporting sessions and the last error.
    Status,

    /// Describe a backend status code.
    Error {
        #[arg(allow_negative_numbers = true)]
        code: i32,
    },

    /// Show the most recent backend error.
    LastError,
}
