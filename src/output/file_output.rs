// 该文件是 Shanan （山南西风） 项目的一部分。
// src/output/file_output.rs - JSON Lines 报告文件输出
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

use std::{
  fs::File,
  io::{BufWriter, Write},
  path::Path,
  sync::Mutex,
};

use thiserror::Error;
use tracing::info;
use url::Url;

use crate::{
  FromUrl, FromUrlWithScheme,
  output::{Render, write_json_line},
  tracker::TickReport,
};

#[derive(Error, Debug)]
pub enum FileOutputError {
  #[error("URI 方案不匹配: {0}")]
  SchemeMismatch(String),
  #[error("报告文件路径为空")]
  EmptyPath,
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("写入锁已中毒")]
  Poisoned,
}

/// `jsonl:///path/to/reports.jsonl`
pub struct FileOutput {
  path: String,
  writer: Mutex<BufWriter<File>>,
}

impl FromUrlWithScheme for FileOutput {
  const SCHEME: &'static str = "jsonl";
}

impl FromUrl for FileOutput {
  type Error = FileOutputError;

  fn from_url(uri: &Url) -> Result<Self, Self::Error> {
    if uri.scheme() != Self::SCHEME {
      return Err(FileOutputError::SchemeMismatch(format!(
        "期望输出方式 '{}', 实际输出方式 '{}'",
        Self::SCHEME,
        uri.scheme()
      )));
    }

    let path = uri.path().to_string();
    if path.is_empty() || path == "/" {
      return Err(FileOutputError::EmptyPath);
    }
    if let Some(parent) = Path::new(&path).parent()
      && !parent.as_os_str().is_empty()
    {
      std::fs::create_dir_all(parent)?;
    }

    info!("报告写入文件: {}", path);
    let file = File::create(&path)?;
    Ok(FileOutput {
      path,
      writer: Mutex::new(BufWriter::new(file)),
    })
  }
}

impl FileOutput {
  pub fn path(&self) -> &str {
    &self.path
  }
}

impl Render<TickReport> for FileOutput {
  type Error = FileOutputError;

  fn render_result(&self, report: &TickReport) -> Result<(), Self::Error> {
    let mut writer = self.writer.lock().map_err(|_| FileOutputError::Poisoned)?;
    write_json_line(&mut *writer, report)?;
    Ok(())
  }

  fn finish(&self) -> Result<(), Self::Error> {
    let mut writer = self.writer.lock().map_err(|_| FileOutputError::Poisoned)?;
    writer.flush()?;
    Ok(())
  }
}
