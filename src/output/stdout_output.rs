// 该文件是 Shanan （山南西风） 项目的一部分。
// src/output/stdout_output.rs - 标准输出
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

use crate::{
  FromUrl, FromUrlWithScheme,
  output::{Render, write_json_line},
  tracker::TickReport,
};

#[derive(Error, Debug)]
pub enum StdoutOutputError {
  #[error("URI 方案不匹配")]
  SchemeMismatch,
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
}

/// `stdout:`，每个周期一行 JSON，写完立即刷新，便于下游管道实时读取
#[derive(Debug, Default)]
pub struct StdoutOutput;

impl FromUrlWithScheme for StdoutOutput {
  const SCHEME: &'static str = "stdout";
}

impl FromUrl for StdoutOutput {
  type Error = StdoutOutputError;

  fn from_url(uri: &Url) -> Result<Self, Self::Error> {
    if uri.scheme() != Self::SCHEME {
      return Err(StdoutOutputError::SchemeMismatch);
    }
    Ok(StdoutOutput)
  }
}

impl Render<TickReport> for StdoutOutput {
  type Error = StdoutOutputError;

  fn render_result(&self, report: &TickReport) -> Result<(), Self::Error> {
    let mut stdout = std::io::stdout().lock();
    write_json_line(&mut stdout, report)?;
    stdout.flush()?;
    Ok(())
  }
}
