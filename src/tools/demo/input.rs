use std::str::FromStr;

/// Sample rates with a preset analysis geometry.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SampleRate {
    R16000,
    R24000,
    R48000,
}

impl From<SampleRate> for u32 {
    fn from(value: SampleRate) -> Self {
        match value {
            SampleRate::R16000 => 16000,
            SampleRate::R24000 => 24000,
            SampleRate::R48000 => 48000,
        }
    }
}

impl FromStr for SampleRate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "16000" => Ok(SampleRate::R16000),
            "24000" => Ok(SampleRate::R24000),
            "48000" => Ok(SampleRate::R48000),
            _ => Err(format!("unsupported sample rate {s}, expected 16000, 24000 or 48000")),
        }
    }
}

/// Channel layout of the PCM input.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Channels {
    Mono,
    /// Two channels, interleaved.
    Stereo,
}

impl From<Channels> for usize {
    fn from(value: Channels) -> Self {
        match value {
            Channels::Mono => 1,
            Channels::Stereo => 2,
        }
    }
}

impl FromStr for Channels {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1" => Ok(Channels::Mono),
            "2" => Ok(Channels::Stereo),
            _ => Err(format!("unsupported channel count {s}, expected 1 or 2")),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct DemoArgs {
    pub sample_rate: SampleRate,
    pub channels: Channels,
}
