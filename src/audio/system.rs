//! Audio system managing playback and spectrum analysis.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use tracing::{error, info, warn};

use super::analyser::{spawn_analysis_thread, ByteSpectrumAnalyser};
use super::source::{SampleSource, WavLoop};
use super::synthesis::SynthSource;
use super::{SharedGain, Transport};
use crate::error::AudioError;
use crate::params::{AnalyserConfig, AudioParams};
use crate::scheduler::{GainControl, PlaybackState};
use crate::spectrum::SharedSpectrum;

/// Analysis queue is capped at this many FFT windows
const MAX_PENDING_WINDOWS: usize = 4;

/// Audio system: source -> gain -> analyser -> output
pub struct AudioSystem {
    spectrum: SharedSpectrum,
    gain: SharedGain,
    transport: Transport,

    /// Audio output stream (kept alive)
    _stream: cpal::Stream,

    running: Arc<AtomicBool>,
    analysis_thread: Option<thread::JoinHandle<()>>,
}

impl AudioSystem {
    /// Open the default output device and start playback and analysis
    pub fn new(analyser: &AnalyserConfig, params: &AudioParams) -> Result<Self, AudioError> {
        params.validate()?;
        let byte_analyser = ByteSpectrumAnalyser::new(analyser.clone())?;

        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(AudioError::NoOutputDevice)?;
        let supported = device.default_output_config()?;
        let sample_rate = supported.sample_rate().0;
        let channels = supported.channels() as usize;

        info!(
            "Audio: {} @ {}Hz, {} ch",
            device.name().unwrap_or_else(|_| "Unknown".to_string()),
            sample_rate,
            channels
        );

        let source: Box<dyn SampleSource> = match &params.file {
            Some(path) => Box::new(WavLoop::open(path, sample_rate)?),
            None => {
                info!("Audio: built-in synth");
                Box::new(SynthSource::new(sample_rate)?)
            }
        };

        let spectrum = SharedSpectrum::new(byte_analyser.bin_count());
        let gain = SharedGain::new(params.gain);
        let transport = Transport::new(!params.start_paused);
        let pending = Arc::new(Mutex::new(Vec::<f32>::new()));

        let mut feed = OutputFeed {
            source,
            gain: gain.clone(),
            transport: transport.clone(),
            pending: Arc::clone(&pending),
            max_pending: analyser.fft_size * MAX_PENDING_WINDOWS,
        };

        let stream = device.build_output_stream(
            &supported.into(),
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| feed.fill(data, channels),
            |err| error!("Audio stream error: {}", err),
            None,
        )?;
        stream.play()?;

        let running = Arc::new(AtomicBool::new(true));
        let analysis_thread = spawn_analysis_thread(
            byte_analyser,
            Duration::from_millis(analyser.update_interval_ms),
            pending,
            spectrum.clone(),
            Arc::clone(&running),
        );

        Ok(Self {
            spectrum,
            gain,
            transport,
            _stream: stream,
            running,
            analysis_thread: Some(analysis_thread),
        })
    }

    /// Latest byte spectrum, updated by the analysis thread
    pub fn spectrum(&self) -> &SharedSpectrum {
        &self.spectrum
    }

    pub fn gain(&self) -> &SharedGain {
        &self.gain
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }
}

impl Drop for AudioSystem {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(handle) = self.analysis_thread.take() {
            if handle.join().is_err() {
                warn!("Analysis thread panicked");
            }
        }
    }
}

/// State owned by the output callback
struct OutputFeed {
    source: Box<dyn SampleSource>,
    gain: SharedGain,
    transport: Transport,
    pending: Arc<Mutex<Vec<f32>>>,
    max_pending: usize,
}

impl OutputFeed {
    /// Fill one interleaved device buffer
    fn fill(&mut self, data: &mut [f32], channels: usize) {
        // Paused: silence, and the analyser keeps its last frame
        if !self.transport.is_playing() {
            data.fill(0.0);
            return;
        }

        let gain = self.gain.gain();
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());

        for frame in data.chunks_mut(channels.max(1)) {
            let sample = (self.source.next_sample() * gain).clamp(-1.0, 1.0);
            frame.fill(sample);
            pending.push(sample);
        }

        if pending.len() > self.max_pending {
            let excess = pending.len() - self.max_pending;
            pending.drain(..excess);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Ramp(f32);

    impl SampleSource for Ramp {
        fn next_sample(&mut self) -> f32 {
            self.0 += 0.1;
            self.0
        }
    }

    fn feed(playing: bool, gain: f32, max_pending: usize) -> OutputFeed {
        OutputFeed {
            source: Box::new(Ramp(0.0)),
            gain: SharedGain::new(gain),
            transport: Transport::new(playing),
            pending: Arc::new(Mutex::new(Vec::new())),
            max_pending,
        }
    }

    #[test]
    fn test_fill_duplicates_mono_across_channels() {
        let mut feed = feed(true, 1.0, 64);
        let mut data = [9.0; 6];
        feed.fill(&mut data, 2);

        assert_eq!(data[0], data[1]);
        assert_eq!(data[2], data[3]);
        assert!((data[0] - 0.1).abs() < 1e-6);
        assert!((data[4] - 0.3).abs() < 1e-6);
        assert_eq!(feed.pending.lock().unwrap().len(), 3);
    }

    #[test]
    fn test_paused_outputs_silence_and_feeds_nothing() {
        let mut feed = feed(false, 1.0, 64);
        let mut data = [9.0; 8];
        feed.fill(&mut data, 2);

        assert!(data.iter().all(|&s| s == 0.0));
        assert!(feed.pending.lock().unwrap().is_empty());
    }

    #[test]
    fn test_gain_scales_and_limits_output() {
        let mut feed = feed(true, 2.0, 64);
        let mut data = [0.0; 8];
        feed.fill(&mut data, 1);

        assert!((data[0] - 0.2).abs() < 1e-6);
        // 0.6 * 2 = 1.2 is clipped
        assert_eq!(data[5], 1.0);

        feed.gain.set_gain(0.0);
        feed.fill(&mut data, 1);
        assert!(data.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_pending_queue_is_bounded() {
        let mut feed = feed(true, 1.0, 10);
        let mut data = [0.0; 32];
        feed.fill(&mut data, 1);

        let pending = feed.pending.lock().unwrap();
        assert_eq!(pending.len(), 10);
        // Newest samples are kept
        assert_eq!(pending[9], data[31]);
    }
}
