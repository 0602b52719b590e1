use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Stream, StreamConfig};
use crossbeam_channel::{unbounded, Receiver, Sender};

use super::pattern::{schedule, PatternPlayer, PlaybackTiming, Segment};
use super::tone::ToneGenerator;
use super::Audio;
use crate::morse::MorseTable;

enum PatternCommand {
    Play { id: u64, segments: Vec<Segment> },
    Cancel,
}

/// State shared with the output callback
#[derive(Default)]
struct Shared {
    key_down: AtomicBool,
    /// Id of the most recently requested pattern
    requested: AtomicU64,
    /// Id of the last pattern the callback finished or dropped
    finished: AtomicU64,
    failed: AtomicBool,
}

/// Sidetone and pattern playback on the default output device.
///
/// Patterns are played sample by sample inside the cpal callback, so the
/// game loop never waits on them.
pub struct DeviceAudio {
    _stream: Stream,
    table: MorseTable,
    timing: PlaybackTiming,
    commands: Sender<PatternCommand>,
    shared: Arc<Shared>,
    tone_active: bool,
}

impl DeviceAudio {
    pub fn open(
        table: MorseTable,
        timing: PlaybackTiming,
        frequency: f32,
        volume: f32,
    ) -> Result<Self, String> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| "No default output device".to_string())?;
        let config = device
            .default_output_config()
            .map_err(|e| e.to_string())?;

        let sample_rate = config.sample_rate().0;
        let tone = ToneGenerator::new(frequency, volume, sample_rate as f32);
        let shared = Arc::new(Shared::default());
        let (commands, rx) = unbounded();

        let stream = match config.sample_format() {
            cpal::SampleFormat::F32 => {
                build_stream::<f32>(&device, &config.into(), tone, rx, Arc::clone(&shared))
            }
            cpal::SampleFormat::I16 => {
                build_stream::<i16>(&device, &config.into(), tone, rx, Arc::clone(&shared))
            }
            cpal::SampleFormat::U16 => {
                build_stream::<u16>(&device, &config.into(), tone, rx, Arc::clone(&shared))
            }
            _ => return Err("Unsupported output sample format".to_string()),
        }?;
        stream.play().map_err(|e| e.to_string())?;

        Ok(Self {
            _stream: stream,
            table,
            timing,
            commands,
            shared,
            tone_active: false,
        })
    }

    fn failed(&self) -> bool {
        self.shared.failed.load(Ordering::Acquire)
    }
}

fn build_stream<T: cpal::SizedSample + cpal::FromSample<f32>>(
    device: &Device,
    config: &StreamConfig,
    mut tone: ToneGenerator,
    commands: Receiver<PatternCommand>,
    shared: Arc<Shared>,
) -> Result<Stream, String> {
    let channels = config.channels as usize;
    let sample_rate = config.sample_rate.0;
    let mut player = PatternPlayer::new();
    let mut current_id = 0u64;
    let error_flag = Arc::clone(&shared);

    device
        .build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                while let Ok(command) = commands.try_recv() {
                    match command {
                        PatternCommand::Play { id, segments } => {
                            current_id = id;
                            player.load(segments);
                        }
                        PatternCommand::Cancel => player.cancel(),
                    }
                }

                let key_down = shared.key_down.load(Ordering::Acquire);
                for frame in data.chunks_mut(channels) {
                    let keyed = player.next_sample(sample_rate) || key_down;
                    let value = T::from_sample(tone.next_sample(keyed));
                    for sample in frame.iter_mut() {
                        *sample = value;
                    }
                }

                if !player.is_active() {
                    shared.finished.store(current_id, Ordering::Release);
                }
            },
            move |_err| {
                error_flag.failed.store(true, Ordering::Release);
            },
            None,
        )
        .map_err(|e| e.to_string())
}

impl Audio for DeviceAudio {
    fn start_tone(&mut self) {
        self.shared.key_down.store(true, Ordering::Release);
        self.tone_active = true;
    }

    fn stop_tone(&mut self) {
        self.shared.key_down.store(false, Ordering::Release);
        self.tone_active = false;
    }

    fn is_tone_active(&self) -> bool {
        self.tone_active && !self.failed()
    }

    fn play_character_pattern(&mut self, c: char) {
        let Some(symbols) = self.table.encode(c) else {
            return;
        };
        let segments = schedule(symbols, &self.timing);
        let id = self.shared.requested.fetch_add(1, Ordering::AcqRel) + 1;
        if self
            .commands
            .send(PatternCommand::Play { id, segments })
            .is_err()
        {
            self.shared.finished.store(id, Ordering::Release);
        }
    }

    fn is_pattern_playback_active(&self) -> bool {
        if self.failed() {
            return false;
        }
        self.shared.requested.load(Ordering::Acquire) != self.shared.finished.load(Ordering::Acquire)
    }

    fn cancel_pattern(&mut self) {
        let _ = self.commands.send(PatternCommand::Cancel);
        let latest = self.shared.requested.load(Ordering::Acquire);
        self.shared.finished.store(latest, Ordering::Release);
    }
}

impl Drop for DeviceAudio {
    fn drop(&mut self) {
        self.stop_tone();
        self.cancel_pattern();
    }
}
