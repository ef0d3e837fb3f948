// 该文件是 Shanan （山南西风） 项目的一部分。
// src/output.rs - 输出定义
//
// 本文件根据 Apache 许可证第 2.0 版（以下简称“许可证”）授权使用；
// 除非遵守该许可证条款，否则您不得使用本文件。
// 您可通过以下网址获取许可证副本：
// http://www.apache.org/licenses/LICENSE-2.0
// 除非适用法律要求或书面同意，根据本许可协议分发的软件均按“原样”提供，
// 不附带任何形式的明示或暗示的保证或条件。
// 有关许可权限与限制的具体条款，请参阅本许可协议。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, Wareless Group

use std::io::Write;

use thiserror::Error;
use url::Url;

use crate::{FromUrl, FromUrlWithScheme, tracker::TickReport};

pub trait Render<Report> {
  type Error;
  fn render_result(&self, report: &Report) -> Result<(), Self::Error>;

  /// 任务结束时调用，用于刷新缓冲
  fn finish(&self) -> Result<(), Self::Error> {
    Ok(())
  }
}

/// 以单行 JSON 写出一条报告
pub(crate) fn write_json_line<W: Write>(writer: &mut W, report: &TickReport) -> std::io::Result<()> {
  serde_json::to_writer(&mut *writer, report)?;
  writer.write_all(b"\n")
}

mod log_output;
pub use self::log_output::{LogOutput, LogOutputError};

#[cfg(feature = "file_output")]
mod file_output;
#[cfg(feature = "file_output")]
pub use self::file_output::{FileOutput, FileOutputError};

#[cfg(feature = "stdout_output")]
mod stdout_output;
#[cfg(feature = "stdout_output")]
pub use self::stdout_output::{StdoutOutput, StdoutOutputError};

#[derive(Error, Debug)]
pub enum OutputError {
  #[error("日志输出错误: {0}")]
  LogOutputError(#[from] LogOutputError),
  #[cfg(feature = "file_output")]
  #[error("报告文件输出错误: {0}")]
  FileOutputError(#[from] FileOutputError),
  #[cfg(feature = "stdout_output")]
  #[error("标准输出错误: {0}")]
  StdoutOutputError(#[from] StdoutOutputError),
  #[error("URI 方案不匹配")]
  SchemeMismatch,
}

pub enum OutputWrapper {
  LogOutput(LogOutput),
  #[cfg(feature = "file_output")]
  FileOutput(FileOutput),
  #[cfg(feature = "stdout_output")]
  StdoutOutput(StdoutOutput),
}

impl FromUrl for OutputWrapper {
  type Error = OutputError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    match url.scheme() {
      LogOutput::SCHEME => Ok(OutputWrapper::LogOutput(LogOutput::from_url(url)?)),
      #[cfg(feature = "file_output")]
      FileOutput::SCHEME => Ok(OutputWrapper::FileOutput(FileOutput::from_url(url)?)),
      #[cfg(feature = "stdout_output")]
      StdoutOutput::SCHEME => Ok(OutputWrapper::StdoutOutput(StdoutOutput::from_url(url)?)),
      _ => Err(OutputError::SchemeMismatch),
    }
  }
}

impl Render<TickReport> for OutputWrapper {
  type Error = OutputError;

  fn render_result(&self, report: &TickReport) -> Result<(), Self::Error> {
    match self {
      OutputWrapper::LogOutput(output) => output.render_result(report).map_err(OutputError::from),
      #[cfg(feature = "file_output")]
      OutputWrapper::FileOutput(output) => output.render_result(report).map_err(OutputError::from),
      #[cfg(feature = "stdout_output")]
      OutputWrapper::StdoutOutput(output) => {
        output.render_result(report).map_err(OutputError::from)
      }
    }
  }

  fn finish(&self) -> Result<(), Self::Error> {
    match self {
      OutputWrapper::LogOutput(output) => output.finish().map_err(OutputError::from),
      #[cfg(feature = "file_output")]
      OutputWrapper::FileOutput(output) => output.finish().map_err(OutputError::from),
      #[cfg(feature = "stdout_output")]
      OutputWrapper::StdoutOutput(output) => output.finish().map_err(OutputError::from),
    }
  }
}
