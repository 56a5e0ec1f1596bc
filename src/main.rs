mod cli;

use mltshm::capture::CaptureReader;
use mltshm::config;
use mltshm::sink::{Output, SinkStats};
use mltshm_proto::{caps_for, DemuxSettings, Demuxer, FlowPolicy, FlowStatus, Header};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::collections::BTreeMap;
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "mltshm=trace,mltshm_proto=trace".to_string()
        } else {
            "mltshm=info,mltshm_proto=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Demux {
            input,
            video,
            audio,
            legacy_flow,
        } => {
            let mut config = config::load_config_or_default(cli.config.as_deref())?;
            config.demux.verbose |= cli.verbose;
            if legacy_flow {
                config.demux.flow_policy = config::FlowPolicyConfig::Legacy;
            }
            if video.is_some() {
                config.output.video = video;
            }
            if audio.is_some() {
                config.output.audio = audio;
            }
            config::validate_config(&config)?;
            demux_file(&input, &config)
        }
        Commands::Probe { file, json } => probe_file(&file, json),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("mltshm {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn demux_file(input: &Path, config: &config::Config) -> Result<()> {
    if !input.exists() {
        anyhow::bail!("Input file does not exist: {:?}", input);
    }

    let settings = DemuxSettings::from(&config.demux);
    let demuxer = Demuxer::new(settings);
    let video_out = Output::from_path(config.output.video.as_deref())
        .with_context(|| format!("Failed to create video output {:?}", config.output.video))?;
    let audio_out = Output::from_path(config.output.audio.as_deref())
        .with_context(|| format!("Failed to create audio output {:?}", config.output.audio))?;

    tracing::info!("Demuxing {:?}", input);

    let mut statuses: BTreeMap<FlowStatus, u64> = BTreeMap::new();
    let mut dropped = 0u64;

    for buffer in CaptureReader::open(input)? {
        let buffer = buffer?;
        match demuxer.process(&buffer, &video_out, &audio_out) {
            Ok(status) => *statuses.entry(status).or_default() += 1,
            Err(e) if e.is_recoverable() => dropped += 1,
            Err(e) => return Err(e.into()),
        }
    }

    video_out.flush().context("Failed to flush video output")?;
    audio_out.flush().context("Failed to flush audio output")?;

    print_stream("Video", &video_out.stats(), config.output.video.as_deref());
    print_stream("Audio", &audio_out.stats(), config.output.audio.as_deref());

    let forwarded: u64 = statuses.values().sum();
    println!("\nBuffers forwarded: {}", forwarded);
    for (status, count) in &statuses {
        println!("  {}: {}", status, count);
    }
    println!("Buffers dropped: {}", dropped);
    if settings.flow_policy == FlowPolicy::Legacy {
        println!("(legacy flow policy: push failures reported as ok)");
    }

    if statuses.contains_key(&FlowStatus::Error) {
        anyhow::bail!("One or more pushes failed");
    }

    Ok(())
}

fn print_stream(name: &str, stats: &SinkStats, path: Option<&Path>) {
    match &stats.caps {
        Some(caps) => println!("{}: {}", name, caps),
        None => println!("{}: not negotiated", name),
    }
    match path {
        Some(path) => println!(
            "  {} units, {} bytes -> {}",
            stats.units,
            stats.bytes,
            path.display()
        ),
        None => println!("  not linked"),
    }
}

fn probe_file(file: &Path, json: bool) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {:?}", file);
    }

    let buffer = CaptureReader::open(file)?
        .next()
        .transpose()?
        .context("Capture is empty")?;
    let header = Header::parse(&buffer.data)?;
    let caps = caps_for(&header);

    if json {
        let (video, audio) = match &caps {
            Ok((video, audio)) => (serde_json::to_value(video)?, serde_json::to_value(audio)?),
            Err(_) => (serde_json::Value::Null, serde_json::Value::Null),
        };
        let value = serde_json::json!({
            "size": buffer.len(),
            "header": {
                "frame": header.frame,
                "frame_rate_num": header.frame_rate_num,
                "frame_rate_den": header.frame_rate_den,
                "image_size": header.image_size,
                "image_format": header.image_format.code(),
                "width": header.width,
                "height": header.height,
                "audio_size": header.audio_size,
                "audio_format": header.audio_format.code(),
                "frequency": header.frequency,
                "channels": header.channels,
                "samples": header.samples,
            },
            "video": video,
            "audio": audio,
            "error": caps.as_ref().err().map(|e| e.to_string()),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("File: {}", file.display());
        println!("Buffer size: {} bytes", buffer.len());
        println!("Frame: {}", header.frame);
        println!(
            "Video: {}x{} @ {}/{}, format code {}, {} bytes",
            header.width,
            header.height,
            header.frame_rate_num,
            header.frame_rate_den,
            header.image_format.code(),
            header.image_size
        );
        println!(
            "Audio: {} Hz, {} channels, format code {}, {} bytes ({} samples)",
            header.frequency,
            header.channels,
            header.audio_format.code(),
            header.audio_size,
            header.samples
        );
        match caps {
            Ok((video, audio)) => {
                println!("\nAnnounces:");
                println!("  {}", video);
                println!("  {}", audio);
            }
            Err(e) => println!("\nCannot negotiate: {}", e),
        }
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            print_config(&config);
        }
        None => {
            println!("No config file specified, using defaults");
            print_config(&config::Config::default());
        }
    }

    Ok(())
}

fn print_config(config: &config::Config) {
    println!("  Verbose: {}", config.demux.verbose);
    println!("  Flow policy: {:?}", config.demux.flow_policy);
    let show = |path: &Option<std::path::PathBuf>| {
        path.as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "not linked".to_string())
    };
    println!("  Video output: {}", show(&config.output.video));
    println!("  Audio output: {}", show(&config.output.audio));
}
