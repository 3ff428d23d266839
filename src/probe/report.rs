//! 控制台报告
//!
//! 每个方法输出固定格式的一行，供人阅读

use std::io::{self, Write};

use super::BackendOutcome;

/// 探测报告输出
pub struct Report<W: Write> {
    out: W,
}

impl<W: Write> Report<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn header(&mut self) -> io::Result<()> {
        writeln!(self.out, "Testing audio backend save capability...")
    }

    pub fn backends(&mut self, available: &[&str], current: Option<&str>) -> io::Result<()> {
        writeln!(self.out, "Available audio backends: [{}]", available.join(", "))?;
        writeln!(self.out, "Current backend: {}", current.unwrap_or("none"))
    }

    pub fn testing_backend(&mut self, name: &str) -> io::Result<()> {
        writeln!(self.out, "Testing backend: {}", name)
    }

    pub fn outcome(&mut self, outcome: &BackendOutcome) -> io::Result<()> {
        if outcome.ok {
            writeln!(
                self.out,
                "Successfully saved audio with backend: {}",
                outcome.backend
            )
        } else {
            writeln!(
                self.out,
                "Error with backend {}: {}",
                outcome.backend,
                outcome.message.as_deref().unwrap_or("unknown error")
            )
        }
    }

    pub fn testing_direct(&mut self, writer: &str) -> io::Result<()> {
        writeln!(self.out, "Testing with {} directly...", writer)
    }

    pub fn direct_saved(&mut self, writer: &str) -> io::Result<()> {
        writeln!(self.out, "Successfully saved audio with {}", writer)
    }

    pub fn completed(&mut self) -> io::Result<()> {
        writeln!(self.out, "Audio file saving test completed successfully")?;
        self.out.flush()
    }

    /// 外层边界：唯一的错误行
    pub fn fatal(&mut self, error: &dyn std::fmt::Display) -> io::Result<()> {
        writeln!(self.out, "Error: {}", error)?;
        self.out.flush()
    }
}
