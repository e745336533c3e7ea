//! # HPS Tuner - Terminal Front-End
//!
//! Wires the headless core to a terminal display. The CPAL callback
//! thread produces [`AudioEvent`]s over a bounded channel; this thread
//! owns the pipeline, consumes one event per cycle and rewrites a single
//! status line with the result.

use std::fs::File;
use std::io::{self, Write};

use anyhow::{Context, Result};
use hps_core::config::TunerConfig;
use hps_core::pipeline::Pipeline;
use hps_core::{Output, audio};

fn main() -> Result<()> {
    let config = load_config()?;

    // The channel holds a handful of steps; if the consumer ever falls
    // behind, the capture callback drops blocks instead of blocking.
    let (event_tx, event_rx) = crossbeam_channel::bounded(8);
    let _stream = audio::start_capture(&config, event_tx)?;

    let mut pipeline = Pipeline::new(config)?;
    eprintln!("[MAIN] Tuner running, play a note (Ctrl-C to quit)");

    for event in event_rx {
        render(&pipeline.handle_event(event));
    }

    Ok(())
}

/// Loads the configuration from the JSON file given as the first
/// argument, or falls back to the defaults.
fn load_config() -> Result<TunerConfig> {
    let config = match std::env::args().nth(1) {
        Some(path) => {
            let file = File::open(&path).with_context(|| format!("opening config {path}"))?;
            let config: TunerConfig =
                serde_json::from_reader(file).with_context(|| format!("parsing config {path}"))?;
            eprintln!("[MAIN] Loaded configuration from {path}");
            config
        }
        None => TunerConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

/// Rewrites the status line with this cycle's result. An unstable cycle
/// blanks the line; silence shows the prompt instead.
fn render(output: &Output) {
    let line = match output {
        Output::Note(reading) => format!(
            "{}{}  {:.1}/{:.1} Hz",
            reading.name, reading.octave, reading.measured_hz, reading.reference_hz
        ),
        Output::Silence => "play a note...".to_string(),
        Output::Unstable => String::new(),
        Output::Error(message) => {
            eprintln!("[AUDIO] Stream error: {message}");
            return;
        }
    };
    print!("\r{line:<40}");
    let _ = io::stdout().flush();
}
