//! Audio Save Probe - 音频写入后端诊断工具
//!
//! 生成一秒立体声静音，依次用每个后端写入临时文件，
//! 最后绕过后端选择直接写一次，报告每一步成功与否

use std::io;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use audio_save_probe::backend::BackendRegistry;
use audio_save_probe::direct::HoundDirectWriter;
use audio_save_probe::probe::{self, ProbeConfig, ProbeStatus, DEFAULT_OUTPUT};

/// Audio Save Probe - check which audio backends can write a WAV file
#[derive(Parser)]
#[command(name = "audio-save-probe")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Sample rate of the probe buffer in Hz
    #[arg(long, default_value = "44100")]
    sample_rate: u32,

    /// Length of the probe buffer in seconds
    #[arg(long, default_value = "1.0")]
    duration: f64,

    /// Number of channels in the probe buffer
    #[arg(long, default_value = "2")]
    channels: usize,

    /// Temporary output file (removed after every attempt)
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Only probe these backends (repeatable; use 'list' to see names)
    #[arg(short, long = "backend", value_name = "NAME")]
    backends: Vec<String>,

    /// Bit depth used by the pcm backend (16, 24 or 32)
    #[arg(long, default_value = "16")]
    pcm_bits: u16,

    /// Decode every written file with symphonia before removing it
    #[arg(long)]
    verify: bool,

    /// Exit with status 1 if any attempt failed
    #[arg(long)]
    strict: bool,

    /// Show verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show available audio backends
    List,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 初始化日志
    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let mut registry = BackendRegistry::with_defaults(cli.pcm_bits);

    match cli.command {
        Some(Commands::List) => {
            show_backends(&registry);
        }
        None => {
            let config = create_probe_config(&cli);
            let stdout = io::stdout();
            let mut out = stdout.lock();
            let status =
                probe::probe_with_boundary(&mut registry, &HoundDirectWriter, &config, &mut out)?;

            let code = exit_code(&status, cli.strict);
            if code != 0 {
                std::process::exit(code);
            }
        }
    }

    Ok(())
}

/// 进程退出码：默认总是 0，`--strict` 时任何失败都返回 1
fn exit_code(status: &ProbeStatus, strict: bool) -> i32 {
    if strict && !status.is_clean() {
        1
    } else {
        0
    }
}

/// 显示后端信息
fn show_backends(registry: &BackendRegistry) {
    println!("=== Audio Backends ===\n");

    let current = registry.current();
    for name in registry.list() {
        let mark = if Some(name) == current { " *" } else { "" };
        println!("  {}{}", name, mark);
    }

    println!();
    println!("* = current backend");
    println!("Probe one backend: audio-save-probe -b <NAME>");
}

/// 创建探测配置
fn create_probe_config(cli: &Cli) -> ProbeConfig {
    let backends = if cli.backends.is_empty() {
        None
    } else {
        Some(cli.backends.clone())
    };

    ProbeConfig {
        sample_rate: cli.sample_rate,
        duration_secs: cli.duration,
        channels: cli.channels,
        output: cli.output.clone(),
        backends,
        verify: cli.verify,
    }
}
