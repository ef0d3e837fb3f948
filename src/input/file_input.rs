// 该文件是 Shanan （山南西风） 项目的一部分。
// src/input/file_input.rs - JSON Lines 事件文件输入
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

use std::{fs::File, io::BufReader};

use thiserror::Error;
use tracing::{error, info};
use url::Url;

use crate::{
  FromUrl, FromUrlWithScheme,
  input::{Event, JsonLines},
};

#[derive(Error, Debug)]
pub enum FileInputError {
  #[error("URI 方案不匹配")]
  SchemeMismatch,
  #[error("事件文件路径为空")]
  EmptyPath,
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
}

/// `jsonl:///path/to/events.jsonl`
pub struct FileInput {
  lines: JsonLines<BufReader<File>>,
}

impl FromUrlWithScheme for FileInput {
  const SCHEME: &'static str = "jsonl";
}

impl FromUrl for FileInput {
  type Error = FileInputError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      error!(
        "URI scheme mismatch: expected '{}', found '{}'",
        Self::SCHEME,
        url.scheme()
      );
      return Err(FileInputError::SchemeMismatch);
    }

    let path = url.path();
    if path.is_empty() || path == "/" {
      return Err(FileInputError::EmptyPath);
    }

    info!("打开事件文件: {}", path);
    let file = File::open(path)?;
    Ok(FileInput {
      lines: JsonLines::new(BufReader::new(file)),
    })
  }
}

impl Iterator for FileInput {
  type Item = Event;

  fn next(&mut self) -> Option<Self::Item> {
    self.lines.next()
  }
}
