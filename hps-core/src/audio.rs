//! # Audio Capture Module
//!
//! Real-time microphone capture using CPAL (Cross-Platform Audio Library).
//! The capture callback runs on the audio driver's own thread; it only
//! re-chunks device buffers into exact step-size blocks and forwards them
//! over a channel, so the callback stays bounded-time regardless of how
//! the pipeline is doing.
//!
//! ## Contract
//! - Mono f32 samples at the configured sample rate
//! - Every [`AudioEvent::Block`] holds exactly `step_size` samples
//! - Stream errors are forwarded as [`AudioEvent::DeviceError`]
//! - A full channel drops the block; there is no backpressure into the
//!   audio driver

use anyhow::{Result, anyhow};
use cpal::SupportedStreamConfigRange;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossbeam_channel::Sender;

use crate::AudioEvent;
use crate::config::TunerConfig;

/// Starts audio capture from the default input device.
///
/// Device buffers rarely align with the analysis step, so the callback
/// accumulates samples and emits one [`AudioEvent::Block`] per full step.
/// The returned stream must be kept alive for capture to continue.
pub fn start_capture(config: &TunerConfig, sender: Sender<AudioEvent>) -> Result<cpal::Stream> {
    let host = cpal::default_host();
    let device = host
        .default_input_device()
        .ok_or_else(|| anyhow!("No input device available"))?;

    eprintln!("[AUDIO] Using input device: {}", device.name()?);

    let supported_configs = device.supported_input_configs()?.collect::<Vec<_>>();
    let supported = find_supported_config(supported_configs, config.sample_rate)
        .ok_or_else(|| anyhow!("No mono f32 input format at {} Hz", config.sample_rate))?;
    let stream_config: cpal::StreamConfig = supported
        .with_sample_rate(cpal::SampleRate(config.sample_rate))
        .into();

    eprintln!("[AUDIO] Capturing at {} Hz", config.sample_rate);

    let error_sender = sender.clone();
    let err_fn = move |err: cpal::StreamError| {
        let _ = error_sender.try_send(AudioEvent::DeviceError(err.to_string()));
    };

    let step_size = config.step_size;
    let mut pending: Vec<f32> = Vec::with_capacity(step_size * 2);
    let stream = device.build_input_stream(
        &stream_config,
        move |data: &[f32], _: &cpal::InputCallbackInfo| {
            pending.extend_from_slice(data);
            while pending.len() >= step_size {
                let block: Vec<f32> = pending.drain(..step_size).collect();
                // Dropping the block on a full channel beats blocking the
                // audio driver.
                let _ = sender.try_send(AudioEvent::Block(block));
            }
        },
        err_fn,
        None,
    )?;

    stream.play()?;

    Ok(stream)
}

/// Picks a mono f32 input configuration whose sample-rate range covers
/// the requested rate.
fn find_supported_config(
    configs: Vec<SupportedStreamConfigRange>,
    target_rate: u32,
) -> Option<SupportedStreamConfigRange> {
    configs
        .into_iter()
        .filter(|c| c.channels() == 1 && c.sample_format() == cpal::SampleFormat::F32)
        .find(|c| c.min_sample_rate().0 <= target_rate && target_rate <= c.max_sample_rate().0)
}
