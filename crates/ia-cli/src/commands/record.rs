//! Single-stat recording commands.

use std::io::Write;

use anyhow::{Result, bail};
use ia_core::{EventRecorder, Formula, GestureKind, Measurement, STATUS_OK, StatKind};

use super::{api_key, open_database};
use crate::Config;

/// One stat given on the command line.
#[derive(Debug, Clone, PartialEq)]
pub enum Stat {
    Gain {
        identifier: String,
        value: f32,
    },
    Loss {
        identifier: String,
        value: f32,
    },
    Custom {
        identifier: String,
        value: f32,
        measurement: Measurement,
        formula: Formula,
        target: Option<String>,
    },
    Keyword {
        keyword: String,
        target: Option<String>,
    },
    Gesture {
        identifier: String,
        hold_length: f32,
        kind: GestureKind,
        target: Option<String>,
    },
}

impl Stat {
    pub const fn kind(&self) -> StatKind {
        match self {
            Self::Gain { .. } => StatKind::Gain,
            Self::Loss { .. } => StatKind::Loss,
            Self::Custom { .. } => StatKind::CustomStat,
            Self::Keyword { .. } => StatKind::Keyword,
            Self::Gesture { .. } => StatKind::Gesture,
        }
    }

    pub fn identifier(&self) -> &str {
        match self {
            Self::Gain { identifier, .. }
            | Self::Loss { identifier, .. }
            | Self::Custom { identifier, .. }
            | Self::Gesture { identifier, .. } => identifier,
            Self::Keyword { keyword, .. } => keyword,
        }
    }
}

/// Records `stat` and fails with the backend's message if it was rejected.
pub fn run<W: Write>(writer: &mut W, config: &Config, stat: &Stat) -> Result<()> {
    let key = api_key(config)?;
    let db = open_database(config)?;
    let recorder = EventRecorder::new(db, &key, config.recorder_options());

    match stat {
        Stat::Gain { identifier, value } => recorder.record_gain(identifier, *value),
        Stat::Loss { identifier, value } => recorder.record_loss(identifier, *value),
        Stat::Custom {
            identifier,
            value,
            measurement,
            formula,
            target,
        } => recorder.record_custom_stat_with(
            identifier,
            *value,
            *measurement,
            *formula,
            target.as_deref().unwrap_or_default(),
        ),
        Stat::Keyword { keyword, target } => {
            recorder.record_keyword_with(keyword, target.as_deref().unwrap_or_default());
        }
        Stat::Gesture {
            identifier,
            hold_length,
            kind,
            target,
        } => recorder.record_gesture_with(
            identifier,
            *hold_length,
            *kind,
            target.as_deref().unwrap_or_default(),
        ),
    }

    let status = recorder.backend().last_status();
    if status != STATUS_OK {
        bail!(
            "{} stat rejected (code {status}): {}",
            stat.kind(),
            recorder.errors().last_message()
        );
    }

    writeln!(writer, "Recorded {} stat '{}'.", stat.kind(), stat.identifier())?;
    Ok(())
}
