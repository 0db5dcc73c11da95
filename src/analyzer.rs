//! Frame-by-frame pitch tracking on top of the [`pitch`](crate::pitch)
//! pipeline.
//!
//! A [`PitchAnalyzer`] keeps `max_period` samples of history in front of each
//! incoming frame, whitens the whole buffer at half rate, runs the
//! coarse-to-fine search and then removes period doubling using the period
//! and gain it reported for the previous frame.

use tracing::{debug, trace};

use crate::arch::{select_arch, Arch};
use crate::error::{PitchError, Result};
use crate::pitch::doubling::remove_doubling;
use crate::pitch::downsample::pitch_downsample;
use crate::pitch::search::pitch_search;
use crate::pitch::{PITCH_BUF_SIZE, PITCH_FRAME_SIZE, PITCH_MAX_PERIOD, PITCH_MIN_PERIOD};

/// Analysis geometry, in full-rate samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PitchConfig {
    /// Shortest period reported.
    pub min_period: usize,
    /// Longest period considered; also the amount of history kept.
    pub max_period: usize,
    /// Samples per analyzed frame.
    pub frame_size: usize,
}

impl Default for PitchConfig {
    fn default() -> Self {
        Self {
            min_period: PITCH_MIN_PERIOD,
            max_period: PITCH_MAX_PERIOD,
            frame_size: PITCH_FRAME_SIZE,
        }
    }
}

impl PitchConfig {
    /// Creates a validated configuration.
    ///
    /// `min_period` must be at least 2, `max_period` even and at most
    /// [`PITCH_MAX_PERIOD`], and `max_period - 3 * min_period` at least 4 so
    /// the coarse search has lags to scan. `frame_size` must be a non-zero
    /// multiple of 4, at most [`PITCH_FRAME_SIZE`].
    pub fn new(min_period: usize, max_period: usize, frame_size: usize) -> Result<Self> {
        let config = Self {
            min_period,
            max_period,
            frame_size,
        };
        config.validate()?;
        Ok(config)
    }

    /// Preset geometry for a sample rate: the 48 kHz defaults scaled to
    /// 16 kHz and 24 kHz.
    pub fn for_sample_rate(sample_rate: u32) -> Result<Self> {
        let scale = match sample_rate {
            16000 => 3,
            24000 => 2,
            48000 => 1,
            _ => {
                debug!("no pitch geometry for {} Hz", sample_rate);
                return Err(PitchError::UnsupportedSampleRate(sample_rate));
            }
        };
        Ok(Self {
            min_period: PITCH_MIN_PERIOD / scale,
            max_period: PITCH_MAX_PERIOD / scale,
            frame_size: PITCH_FRAME_SIZE / scale,
        })
    }

    /// Checks the constraints documented on [`PitchConfig::new`].
    pub fn validate(&self) -> Result<()> {
        let Self {
            min_period: min,
            max_period: max,
            frame_size,
        } = *self;
        if min < 2 || max > PITCH_MAX_PERIOD || max % 2 != 0 || max < 3 * min + 4 {
            debug!("rejecting period range {}..{}", min, max);
            return Err(PitchError::BadPeriodRange { min, max });
        }
        if frame_size == 0 || frame_size % 4 != 0 || frame_size > PITCH_FRAME_SIZE {
            debug!("rejecting frame size {}", frame_size);
            return Err(PitchError::BadFrameSize(frame_size));
        }
        Ok(())
    }

    /// Lags scanned by the search, `max_period - 3 * min_period`.
    #[inline]
    pub fn search_span(&self) -> usize {
        self.max_period - 3 * self.min_period
    }

    /// History plus one frame.
    #[inline]
    pub fn buffer_len(&self) -> usize {
        self.max_period + self.frame_size
    }
}

/// Cross-frame memory of the doubling check.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PitchState {
    /// Period reported for the previous frame, 0 before the first one.
    pub last_period: usize,
    /// Gain reported for the previous frame.
    pub last_gain: f32,
}

/// Result of analyzing one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PitchEstimate {
    /// Pitch period in full-rate samples.
    pub period: usize,
    /// Normalized correlation at that period, in `[0, 1]`.
    pub gain: f32,
}

impl PitchEstimate {
    /// Fundamental frequency in Hz.
    #[inline]
    pub fn frequency(&self, sample_rate: u32) -> f32 {
        sample_rate as f32 / self.period as f32
    }
}

/// Streaming pitch tracker for mono or stereo audio.
///
/// Samples are expected in 16-bit PCM scale.
#[derive(Debug, Clone)]
pub struct PitchAnalyzer {
    config: PitchConfig,
    arch: Arch,
    state: PitchState,
    history: [[f32; PITCH_BUF_SIZE]; 2],
    x_lp: [f32; PITCH_BUF_SIZE >> 1],
}

impl PitchAnalyzer {
    /// Creates an analyzer, picking the kernel level with [`select_arch`].
    pub fn new(config: PitchConfig) -> Result<Self> {
        Self::with_arch(config, select_arch())
    }

    /// Creates an analyzer that uses the given kernel level.
    pub fn with_arch(config: PitchConfig, arch: Arch) -> Result<Self> {
        config.validate()?;
        debug!(
            "pitch analyzer: periods {}..{}, frame {}, {:?}",
            config.min_period, config.max_period, config.frame_size, arch
        );
        Ok(Self {
            config,
            arch,
            state: PitchState::default(),
            history: [[0.0; PITCH_BUF_SIZE]; 2],
            x_lp: [0.0; PITCH_BUF_SIZE >> 1],
        })
    }

    pub fn config(&self) -> &PitchConfig {
        &self.config
    }

    pub fn arch(&self) -> Arch {
        self.arch
    }

    pub fn state(&self) -> PitchState {
        self.state
    }

    /// Overrides the memory used for the next frame's doubling check.
    pub fn set_state(&mut self, state: PitchState) {
        self.state = state;
    }

    /// Clears the history and the cross-frame state.
    pub fn reset(&mut self) {
        debug!("pitch analyzer reset");
        self.state = PitchState::default();
        for h in self.history.iter_mut() {
            h.fill(0.0);
        }
    }

    /// Analyzes one mono frame of exactly `frame_size` samples.
    pub fn analyze(&mut self, frame: &[f32]) -> Result<PitchEstimate> {
        self.analyze_channels(&[frame])
    }

    /// Analyzes one frame given as 1 or 2 channel slices; stereo channels are
    /// summed.
    pub fn analyze_channels(&mut self, frames: &[&[f32]]) -> Result<PitchEstimate> {
        let channels = frames.len();
        if channels != 1 && channels != 2 {
            return Err(PitchError::BadChannelCount(channels));
        }
        let frame_size = self.config.frame_size;
        for frame in frames {
            if frame.len() != frame_size {
                return Err(PitchError::FrameLength {
                    expected: frame_size,
                    actual: frame.len(),
                });
            }
        }

        let total = self.config.buffer_len();
        let max_period = self.config.max_period;
        let min_period = self.config.min_period;
        for (c, h) in self.history.iter_mut().enumerate() {
            let h = &mut h[..total];
            h.copy_within(frame_size.., 0);
            match frames.get(c) {
                Some(frame) => h[max_period..].copy_from_slice(frame),
                None => h[max_period..].fill(0.0),
            }
        }

        let [left, right] = &self.history;
        let (mono, stereo);
        let input: &[&[f32]] = if channels == 2 {
            stereo = [&left[..total], &right[..total]];
            &stereo
        } else {
            mono = [&left[..total]];
            &mono
        };
        let x_lp = &mut self.x_lp[..total >> 1];
        pitch_downsample(input, x_lp, total);

        let index = pitch_search(
            &x_lp[max_period >> 1..],
            x_lp,
            frame_size,
            self.config.search_span(),
            self.arch,
        );
        let coarse = max_period - index;

        let (period, gain) = remove_doubling(
            x_lp,
            max_period,
            min_period,
            frame_size,
            coarse,
            self.state.last_period,
            self.state.last_gain,
            self.arch,
        );
        trace!(coarse, period, gain, "pitch frame");

        self.state = PitchState {
            last_period: period,
            last_gain: gain,
        };
        Ok(PitchEstimate { period, gain })
    }
}
