//! Replays a timed interaction script through an [`EventRecorder`].
//!
//! Scripts are JSON Lines. Each line is one step, stamped with the second at
//! which it happens:
//!
//! ```text
//! {"at": 0.0, "op": "gaze_on", "target": "Cube"}
//! {"at": 0.5, "op": "hold_started"}
//! {"at": 1.7, "op": "hold_complete", "identifier": "Grab"}
//! {"at": 2.5, "op": "gaze_off"}
//! ```
//!
//! Step times drive a [`ManualClock`], so gaze and hold lengths come out
//! exactly as scripted.

use std::io::{Read, Write};
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use ia_core::{
    AnalyticsBackend, Clock, EventRecorder, FocusSlot, Formula, GestureKind, ManualClock,
    Measurement, STATUS_OK,
};
use ia_db::MIN_SESSION_STATS;
use serde::Deserialize;

use super::{api_key, open_database};
use crate::Config;

/// One scripted step.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Step {
    /// Seconds since the start of the script.
    pub at: f64,
    #[serde(flatten)]
    pub op: Op,
}

/// What happens at a step.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Op {
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
        #[serde(default)]
        measurement: Measurement,
        #[serde(default)]
        formula: Formula,
        #[serde(default)]
        target: String,
    },
    Keyword {
        keyword: String,
        #[serde(default)]
        target: String,
    },
    Gesture {
        identifier: String,
        #[serde(default)]
        hold_length: f32,
        #[serde(default)]
        kind: GestureKind,
        #[serde(default)]
        target: String,
    },
    HoldStarted,
    HoldComplete {
        identifier: String,
    },
    GazeOn {
        target: String,
    },
    GazeOff,
    /// Sets the object the user is looking at, or clears it when absent.
    Focus {
        #[serde(default)]
        target: Option<String>,
    },
}

impl Op {
    /// Whether the step submits a stat.
    pub const fn emits_stat(&self) -> bool {
        !matches!(
            self,
            Self::HoldStarted | Self::GazeOn { .. } | Self::Focus { .. }
        )
    }
}

/// Parses a script, checking that step times never go backwards.
pub fn parse_script(text: &str) -> Result<Vec<Step>> {
    let mut steps = Vec::new();
    let mut previous = 0.0_f64;

    for (index, line) in text.lines().enumerate() {
        let line_number = index + 1;
        if line.trim().is_empty() {
            continue;
        }
        let step: Step = serde_json::from_str(line)
            .with_context(|| format!("line {line_number}: invalid step"))?;
        if Duration::try_from_secs_f64(step.at).is_err() {
            bail!("line {line_number}: invalid time {}", step.at);
        }
        if step.at < previous {
            bail!(
                "line {line_number}: time {} is earlier than the previous step ({previous})",
                step.at
            );
        }
        previous = step.at;
        steps.push(step);
    }

    Ok(steps)
}

/// Stats submitted while replaying.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReplaySummary {
    pub steps: usize,
    pub accepted: usize,
    pub rejected: usize,
}

/// Runs every step against `recorder`, advancing `clock` to each step's time.
pub fn replay<B, C>(
    recorder: &mut EventRecorder<B, FocusSlot, C>,
    focus: &FocusSlot,
    clock: &ManualClock,
    steps: &[Step],
    last_status: impl Fn(&B) -> i32,
) -> ReplaySummary
where
    B: AnalyticsBackend,
    C: Clock,
{
    let mut summary = ReplaySummary::default();

    for step in steps {
        let Ok(at) = Duration::try_from_secs_f64(step.at) else {
            tracing::warn!(at = step.at, "step time out of range, skipped");
            continue;
        };
        clock.set(at);
        apply(recorder, focus, &step.op);
        summary.steps += 1;

        if step.op.emits_stat() {
            if last_status(recorder.backend()) == STATUS_OK {
                summary.accepted += 1;
            } else {
                summary.rejected += 1;
            }
        }
    }

    summary
}

fn apply<B, C>(recorder: &mut EventRecorder<B, FocusSlot, C>, focus: &FocusSlot, op: &Op)
where
    B: AnalyticsBackend,
    C: Clock,
{
    match op {
        Op::Gain { identifier, value } => recorder.record_gain(identifier, *value),
        Op::Loss { identifier, value } => recorder.record_loss(identifier, *value),
        Op::Custom {
            identifier,
            value,
            measurement,
            formula,
            target,
        } => recorder.record_custom_stat_with(identifier, *value, *measurement, *formula, target),
        Op::Keyword { keyword, target } => recorder.record_keyword_with(keyword, target),
        Op::Gesture {
            identifier,
            hold_length,
            kind,
            target,
        } => recorder.record_gesture_with(identifier, *hold_length, *kind, target),
        Op::HoldStarted => recorder.record_hold_started(),
        Op::HoldComplete { identifier } => recorder.record_hold_complete(identifier),
        Op::GazeOn { target } => recorder.record_gaze_on(target),
        Op::GazeOff => recorder.record_gaze_off(),
        Op::Focus { target: Some(target) } => focus.focus(target.as_str()),
        Op::Focus { target: None } => focus.clear(),
    }
}

pub fn run<W: Write>(writer: &mut W, config: &Config, script: &Path) -> Result<()> {
    let text = if script == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read script from stdin")?;
        text
    } else {
        std::fs::read_to_string(script)
            .with_context(|| format!("failed to read {}", script.display()))?
    };
    let steps = parse_script(&text)?;

    let key = api_key(config)?;
    let db = open_database(config)?;
    let focus = FocusSlot::new();
    let clock = ManualClock::new();
    let mut recorder = EventRecorder::new(db, &key, config.recorder_options())
        .with_target_resolver(focus.clone())
        .with_clock(clock.clone());

    let summary = replay(&mut recorder, &focus, &clock, &steps, ia_db::Database::last_status);
    let session = recorder.backend().current_session()?;

    writeln!(
        writer,
        "Replayed {} steps: {} stats accepted, {} rejected.",
        summary.steps, summary.accepted, summary.rejected
    )?;
    if session.accepted() {
        writeln!(
            writer,
            "Session accepted ({} distinct stats).",
            session.distinct_stats
        )?;
    } else {
        writeln!(
            writer,
            "Session pending ({} of {MIN_SESSION_STATS} distinct stats).",
            session.distinct_stats
        )?;
    }
    Ok(())
}
