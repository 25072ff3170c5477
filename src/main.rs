use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use hark::services::{
    Collaborators, ConsoleTextInput, ProgrammerJokes, SpeechOutput, SystemBrowser, SystemClock,
    WikipediaClient,
};
use hark::voice::{
    AudioCapture, MicrophoneInput, SpeechToText, VoiceOutput, WakeWordDetector, rms_energy,
};
use hark::{Config, Dispatcher, ListeningGate, Session};

/// Hark - wake-phrase voice command dispatcher
#[derive(Parser)]
#[command(name = "hark", version, about)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Test microphone input
    TestMic {
        /// Duration in seconds
        #[arg(short, long, default_value = "5")]
        duration: u64,
    },
    /// Speak text through the configured output
    TestTts {
        /// Text to speak
        #[arg(default_value = "Hello! This is a test of the text to speech system.")]
        text: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "info,hark=info",
        1 => "info,hark=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("fatal: failed to start runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    let result = runtime.block_on(run(cli));

    // An abandoned stdin read can't be cancelled; don't wait for it
    runtime.shutdown_background();

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!("fatal: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Returns whether the assistant ended gracefully
async fn run(cli: Cli) -> anyhow::Result<bool> {
    let config = Config::load()?;
    tracing::debug!(?config, "loaded configuration");

    if let Some(cmd) = cli.command {
        match cmd {
            Command::TestMic { duration } => test_mic(duration).await?,
            Command::TestTts { text } => VoiceOutput::from_config(&config).speak(&text).await,
        }
        return Ok(true);
    }

    let detector = WakeWordDetector::new(config.wake_phrases.clone())?;
    let stt = SpeechToText::from_config(&config.voice, &config.api_keys)?;

    let services = Collaborators {
        input: Box::new(MicrophoneInput::new(stt)?),
        speech: Box::new(VoiceOutput::from_config(&config)),
        encyclopedia: Box::new(WikipediaClient::new(&config.lookup.base_url)?),
        launcher: Box::new(SystemBrowser),
        jokes: Box::new(ProgrammerJokes),
        text_input: Box::new(ConsoleTextInput::new()),
        clock: Box::new(SystemClock),
    };

    let mut session = Session::new(
        ListeningGate::new(detector),
        Dispatcher::new(config.lookup.sentences),
        config.listen,
        services,
    );

    let (shutdown_tx, mut shutdown_rx) = mpsc::channel(1);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown_tx.send(()).await;
        }
    });

    tracing::info!(wake_phrases = ?config.wake_phrases, "hark ready");
    let reason = session.run(&mut shutdown_rx).await;

    Ok(reason.is_graceful())
}

/// Print an RMS meter of the microphone for `duration` seconds
async fn test_mic(duration: u64) -> anyhow::Result<()> {
    println!("Testing microphone for {duration} seconds...");
    println!("Speak into your microphone!\n");

    let mut capture = AudioCapture::new()?;
    capture.start()?;

    for i in 0..duration {
        tokio::time::sleep(Duration::from_secs(1)).await;

        let samples = capture.take_buffer();
        let energy = rms_energy(&samples);
        let peak = samples.iter().map(|s| s.abs()).fold(0.0f32, f32::max);

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let meter_len = (energy * 100.0).min(50.0) as usize;
        let meter = "#".repeat(meter_len) + &" ".repeat(50 - meter_len);

        println!("[{:2}s] RMS: {energy:.4} | Peak: {peak:.4} | [{meter}]", i + 1);
    }

    capture.stop();
    println!("\nIf the meter moved, the microphone is working.");
    Ok(())
}
