//! 后端探测
//!
//! 流程（单线程、单次）：
//! 1. 生成静音缓冲区
//! 2. 列出可用后端和当前后端
//! 3. 逐个后端：选择 → 写入 →（可选）读回校验 → 删除，失败只记录不中断
//! 4. 绕过后端选择，用直接写入器再写一次
//! 5. 报告完成
//!
//! 两层错误隔离：单个后端的失败记录在 `BackendOutcome` 里；
//! 缓冲区构造和直接写入的失败作为 `ProbeError` 交给外层边界。

mod report;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::audio::{AudioBuffer, BufferError};
use crate::backend::{BackendError, BackendRegistry};
use crate::decode::{self, Expected};
use crate::direct::DirectWriter;

pub use report::Report;

/// 固定的临时输出文件名
pub const DEFAULT_OUTPUT: &str = "test_output.wav";

/// 探测配置
#[derive(Clone, Debug)]
pub struct ProbeConfig {
    /// 采样率
    pub sample_rate: u32,
    /// 时长（秒）
    pub duration_secs: f64,
    /// 声道数
    pub channels: usize,
    /// 临时输出文件
    pub output: PathBuf,
    /// 只探测这些后端（None 表示全部可用后端）
    pub backends: Option<Vec<String>>,
    /// 删除前用 symphonia 读回校验
    pub verify: bool,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            // 1 秒立体声静音
            duration_secs: 1.0,
            channels: 2,
            output: PathBuf::from(DEFAULT_OUTPUT),
            backends: None,
            verify: false,
        }
    }
}

/// 单个后端的探测结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendOutcome {
    pub backend: String,
    pub ok: bool,
    /// 失败时的错误信息
    pub message: Option<String>,
}

/// 完成的探测
#[derive(Debug, Clone)]
pub struct ProbeSummary {
    /// 注册表报告的可用后端
    pub available: Vec<&'static str>,
    /// 探测开始时的激活后端
    pub current: Option<&'static str>,
    /// 每个被探测后端一条结果，顺序与探测顺序一致
    pub outcomes: Vec<BackendOutcome>,
    /// 成功完成写入的直接写入器
    pub direct_writer: &'static str,
}

impl ProbeSummary {
    /// 失败的后端数
    pub fn failures(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.ok).count()
    }
}

/// 外层边界捕获的错误
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("{0}")]
    Buffer(#[from] BufferError),
    #[error("{writer} failed to save audio: {source}")]
    DirectWrite {
        writer: &'static str,
        source: BackendError,
    },
    #[error("could not remove {}: {source}", path.display())]
    Cleanup { path: PathBuf, source: io::Error },
    #[error("could not write report: {0}")]
    Report(#[from] io::Error),
}

/// 探测最终状态
#[derive(Debug)]
pub enum ProbeStatus {
    /// 跑完全部流程
    Completed(ProbeSummary),
    /// 外层边界捕获了错误
    Failed(String),
}

impl ProbeStatus {
    /// 所有后端和直接写入都成功
    pub fn is_clean(&self) -> bool {
        matches!(self, Self::Completed(summary) if summary.failures() == 0)
    }
}

/// 带外层错误边界的探测
///
/// 外层错误只输出一行 `Error: ...`，不向上传播；
/// 只有报告本身写不出去时才返回 `Err`
pub fn probe_with_boundary<W: Write>(
    registry: &mut BackendRegistry,
    direct: &dyn DirectWriter,
    config: &ProbeConfig,
    out: &mut W,
) -> io::Result<ProbeStatus> {
    let mut report = Report::new(out);
    report.header()?;

    match run_probe(registry, direct, config, &mut report) {
        Ok(summary) => Ok(ProbeStatus::Completed(summary)),
        Err(ProbeError::Report(e)) => Err(e),
        Err(e) => {
            log::error!("Probe aborted: {}", e);
            report.fatal(&e)?;
            Ok(ProbeStatus::Failed(e.to_string()))
        }
    }
}

/// 执行探测
pub fn run_probe<W: Write>(
    registry: &mut BackendRegistry,
    direct: &dyn DirectWriter,
    config: &ProbeConfig,
    report: &mut Report<W>,
) -> Result<ProbeSummary, ProbeError> {
    let buffer = AudioBuffer::silence_for(config.sample_rate, config.duration_secs, config.channels)?;
    log::info!(
        "Probe buffer: {} channels x {} frames @ {} Hz",
        buffer.channels(),
        buffer.frames(),
        config.sample_rate
    );

    if config.output.exists() {
        log::warn!(
            "{} already exists and will be overwritten",
            config.output.display()
        );
    }

    let available = registry.list();
    let current = registry.current();
    report.backends(&available, current)?;

    let targets: Vec<String> = match &config.backends {
        Some(names) => names.clone(),
        None => available.iter().map(|name| name.to_string()).collect(),
    };

    let mut outcomes = Vec::with_capacity(targets.len());
    for name in &targets {
        report.testing_backend(name)?;

        let outcome = match probe_backend(registry, name, &buffer, config) {
            Ok(()) => BackendOutcome {
                backend: name.clone(),
                ok: true,
                message: None,
            },
            Err(e) => {
                log::info!("Backend '{}' failed: {}", name, e);
                BackendOutcome {
                    backend: name.clone(),
                    ok: false,
                    message: Some(e.to_string()),
                }
            }
        };

        report.outcome(&outcome)?;
        outcomes.push(outcome);
    }

    // 直接写入：样本优先布局，不经过注册表
    report.testing_direct(direct.name())?;
    let frames = buffer.interleaved();
    let written = direct
        .write(&config.output, &frames, buffer.channels(), config.sample_rate)
        .and_then(|()| verify_output(&buffer, config));
    if let Err(source) = written {
        remove_partial(&config.output);
        return Err(ProbeError::DirectWrite {
            writer: direct.name(),
            source,
        });
    }
    report.direct_saved(direct.name())?;
    fs::remove_file(&config.output).map_err(|source| ProbeError::Cleanup {
        path: config.output.clone(),
        source,
    })?;

    report.completed()?;

    Ok(ProbeSummary {
        available,
        current,
        outcomes,
        direct_writer: direct.name(),
    })
}

/// 单个后端：选择 → 写入 → 校验 → 删除
fn probe_backend(
    registry: &mut BackendRegistry,
    name: &str,
    buffer: &AudioBuffer,
    config: &ProbeConfig,
) -> Result<(), BackendError> {
    registry.set_active(name)?;

    let saved = registry
        .save(&config.output, buffer, config.sample_rate)
        .and_then(|()| verify_output(buffer, config));
    if let Err(e) = saved {
        remove_partial(&config.output);
        return Err(e);
    }

    fs::remove_file(&config.output).map_err(BackendError::Cleanup)
}

fn verify_output(buffer: &AudioBuffer, config: &ProbeConfig) -> Result<(), BackendError> {
    if !config.verify {
        return Ok(());
    }
    let expected = Expected {
        sample_rate: config.sample_rate,
        channels: buffer.channels(),
        frames: buffer.frames(),
    };
    decode::verify_silence(&config.output, &expected)
        .map(|_| ())
        .map_err(|e| BackendError::Verify(e.to_string()))
}

/// 尽力删除失败写入留下的残缺文件
fn remove_partial(path: &Path) {
    if !path.exists() {
        return;
    }
    match fs::remove_file(path) {
        Ok(()) => log::info!("Removed partial output {}", path.display()),
        Err(e) => log::warn!("Could not remove partial output {}: {}", path.display(), e),
    }
}
