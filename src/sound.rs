use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use anyhow::Context;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SizedSample};

const TONE_HZ: f32 = 440.0;
const AMPLITUDE: f32 = 0.2;

/// Square-wave buzzer. The stream runs for the whole session and outputs
/// silence unless switched on.
pub struct Sound {
    _stream: cpal::Stream,
    active: Arc<AtomicBool>,
}

impl Sound {
    pub fn new() -> anyhow::Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .context("no output device available")?;
        let supported_config = device
            .default_output_config()
            .context("error while querying configs")?;
        let format = supported_config.sample_format();
        let config: cpal::StreamConfig = supported_config.into();
        let active = Arc::new(AtomicBool::new(false));

        let stream = match format {
            cpal::SampleFormat::I8 => Self::run::<i8>(&device, &config, &active),
            cpal::SampleFormat::I16 => Self::run::<i16>(&device, &config, &active),
            cpal::SampleFormat::I32 => Self::run::<i32>(&device, &config, &active),
            cpal::SampleFormat::I64 => Self::run::<i64>(&device, &config, &active),
            cpal::SampleFormat::U8 => Self::run::<u8>(&device, &config, &active),
            cpal::SampleFormat::U16 => Self::run::<u16>(&device, &config, &active),
            cpal::SampleFormat::U32 => Self::run::<u32>(&device, &config, &active),
            cpal::SampleFormat::U64 => Self::run::<u64>(&device, &config, &active),
            cpal::SampleFormat::F32 => Self::run::<f32>(&device, &config, &active),
            cpal::SampleFormat::F64 => Self::run::<f64>(&device, &config, &active),
            sample_format => anyhow::bail!("unsupported sample format '{sample_format}'"),
        }?;
        stream.play().context("failed to start audio stream")?;

        Ok(Self {
            _stream: stream,
            active,
        })
    }

    pub fn beep(&self, on: bool) {
        self.active.store(on, Ordering::Relaxed);
    }

    fn run<T>(
        device: &cpal::Device,
        config: &cpal::StreamConfig,
        active: &Arc<AtomicBool>,
    ) -> anyhow::Result<cpal::Stream>
    where
        T: SizedSample + FromSample<f32>,
    {
        let sample_rate = config.sample_rate.0 as f32;
        let channels = config.channels as usize;
        let active = Arc::clone(active);

        let mut sample_clock = 0f32;
        let mut next_value = move || {
            if !active.load(Ordering::Relaxed) {
                return 0.0;
            }
            sample_clock = (sample_clock + 1.0) % sample_rate;
            // flatten the sine into a square wave
            let sine = (sample_clock * TONE_HZ * 2.0 * std::f32::consts::PI / sample_rate).sin();
            AMPLITUDE * sine.signum()
        };

        let err_fn = |err| log::error!("an error occurred on stream: {err}");

        let stream = device.build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                Self::write_data(data, channels, &mut next_value)
            },
            err_fn,
            None,
        )?;
        Ok(stream)
    }

    fn write_data<T>(output: &mut [T], channels: usize, next_sample: &mut dyn FnMut() -> f32)
    where
        T: Sample + FromSample<f32>,
    {
        for frame in output.chunks_mut(channels) {
            let value: T = T::from_sample(next_sample());
            for sample in frame.iter_mut() {
                *sample = value;
            }
        }
    }
}
