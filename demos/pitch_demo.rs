#![forbid(unsafe_code)]

use clap::Parser;
use denoise_pitch::tools::demo::{pitch_demo_analyze, Channels, DemoArgs, SampleRate};

#[derive(Parser, Debug, Clone)]
#[command(about = "Pitch tracker demo: prints one estimate per frame")]
struct Cli {
    /// Sampling rate in Hz (16000, 24000 or 48000)
    sample_rate: SampleRate,

    /// Number of channels (1 or 2)
    channels: Channels,

    /// Raw s16le PCM input file
    input: std::path::PathBuf,
}

fn main() {
    let cli = Cli::parse();
    let args = DemoArgs {
        sample_rate: cli.sample_rate,
        channels: cli.channels,
    };
    let rate = u32::from(cli.sample_rate);
    let frame_size = denoise_pitch::PitchConfig::for_sample_rate(rate)
        .expect("preset sample rate")
        .frame_size;

    let fin = std::fs::read(&cli.input).expect("failed to read input file");
    let estimates = pitch_demo_analyze(&fin, args).expect("pitch analysis failed");

    println!("# time_s period_samples f0_hz gain");
    for (i, est) in estimates.iter().enumerate() {
        let time = (i * frame_size) as f64 / rate as f64;
        println!(
            "{:.3} {} {:.1} {:.3}",
            time,
            est.period,
            est.frequency(rate),
            est.gain
        );
    }
}
