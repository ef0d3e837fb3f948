// 该文件是 Shanan （山南西风） 项目的一部分。
// src/input.rs - 检测事件输入
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

use std::io::BufRead;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

use crate::{FromUrl, trajectory::Detection};

/// 上游推送的检测记录，时间戳可缺省（由驱动按到达时间补齐）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectionRecord {
  pub x: f64,
  pub y: f64,
  #[serde(default)]
  pub width: f64,
  #[serde(default)]
  pub height: f64,
  #[serde(default, alias = "t")]
  pub timestamp: Option<f64>,
}

impl DetectionRecord {
  pub fn stamp(&self, fallback_t: f64) -> Detection {
    Detection {
      x: self.x,
      y: self.y,
      width: self.width,
      height: self.height,
      t: self.timestamp.unwrap_or(fallback_t),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
  Detection(DetectionRecord),
  /// 明确的分辨率更新
  Resolution { width: f64, height: f64 },
  /// 系统状态上报，分辨率形如 `1920x1080`，缺失时使用回退分辨率
  Stats {
    #[serde(default)]
    resolution: Option<String>,
  },
  Reset,
}

impl Event {
  pub fn timestamp(&self) -> Option<f64> {
    match self {
      Event::Detection(record) => record.timestamp,
      _ => None,
    }
  }
}

/// JSON Lines 事件流：空行跳过，无法解析的行记录警告后跳过，读错误时结束
pub struct JsonLines<R> {
  reader: R,
  line_number: usize,
  buf: String,
}

impl<R: BufRead> JsonLines<R> {
  pub fn new(reader: R) -> Self {
    Self {
      reader,
      line_number: 0,
      buf: String::new(),
    }
  }
}

impl<R: BufRead> Iterator for JsonLines<R> {
  type Item = Event;

  fn next(&mut self) -> Option<Self::Item> {
    loop {
      self.buf.clear();
      match self.reader.read_line(&mut self.buf) {
        Ok(0) => return None,
        Ok(_) => {}
        Err(e) => {
          error!("读取事件流失败 (第 {} 行之后): {}", self.line_number, e);
          return None;
        }
      }
      self.line_number += 1;

      let line = self.buf.trim();
      if line.is_empty() {
        continue;
      }
      match serde_json::from_str::<Event>(line) {
        Ok(event) => return Some(event),
        Err(e) => warn!("跳过第 {} 行无法解析的事件: {}", self.line_number, e),
      }
    }
  }
}

#[cfg(feature = "file_input")]
mod file_input;
#[cfg(feature = "file_input")]
pub use self::file_input::{FileInput, FileInputError};

#[cfg(feature = "stdin_input")]
mod stdin_input;
#[cfg(feature = "stdin_input")]
pub use self::stdin_input::{StdinInput, StdinInputError};

#[derive(Error, Debug)]
pub enum InputError {
  #[cfg(feature = "file_input")]
  #[error("事件文件输入错误: {0}")]
  FileInputError(#[from] FileInputError),
  #[cfg(feature = "stdin_input")]
  #[error("标准输入错误: {0}")]
  StdinInputError(#[from] StdinInputError),
  #[error("URI 方案不匹配")]
  SchemeMismatch,
}

pub enum InputWrapper {
  #[cfg(feature = "file_input")]
  FileInput(FileInput),
  #[cfg(feature = "stdin_input")]
  StdinInput(StdinInput),
}

impl FromUrl for InputWrapper {
  type Error = InputError;

  fn from_url(url: &url::Url) -> Result<Self, Self::Error> {
    #[cfg(feature = "file_input")]
    {
      use crate::FromUrlWithScheme;

      if url.scheme() == FileInput::SCHEME {
        return Ok(InputWrapper::FileInput(FileInput::from_url(url)?));
      }
    }
    #[cfg(feature = "stdin_input")]
    {
      use crate::FromUrlWithScheme;

      if url.scheme() == StdinInput::SCHEME {
        return Ok(InputWrapper::StdinInput(StdinInput::from_url(url)?));
      }
    }
    Err(InputError::SchemeMismatch)
  }
}

impl Iterator for InputWrapper {
  type Item = Event;

  fn next(&mut self) -> Option<Self::Item> {
    match self {
      #[cfg(feature = "file_input")]
      InputWrapper::FileInput(input) => input.next(),
      #[cfg(feature = "stdin_input")]
      InputWrapper::StdinInput(input) => input.next(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::io::Cursor;

  #[test]
  fn decodes_all_event_kinds() {
    let text = r#"
{"type":"detection","x":600,"y":360,"width":50,"height":40,"t":0}
{"type":"detection","x":610,"y":362,"timestamp":100}
{"type":"detection","x":620,"y":364}
{"type":"resolution","width":1280,"height":720}
{"type":"stats","resolution":"1920x1080","fps":29.7}
{"type":"stats"}
{"type":"reset"}
"#;
    let events: Vec<Event> = JsonLines::new(Cursor::new(text)).collect();
    assert_eq!(events.len(), 7);
    assert_eq!(events[0].timestamp(), Some(0.0));
    assert_eq!(events[1].timestamp(), Some(100.0));
    assert_eq!(events[2].timestamp(), None);
    assert_eq!(
      events[3],
      Event::Resolution {
        width: 1280.0,
        height: 720.0
      }
    );
    assert_eq!(
      events[4],
      Event::Stats {
        resolution: Some("1920x1080".into())
      }
    );
    assert_eq!(events[5], Event::Stats { resolution: None });
    assert_eq!(events[6], Event::Reset);
  }

  #[test]
  fn skips_malformed_lines() {
    let text = "not json\n{\"type\":\"motor_update\"}\n{\"type\":\"reset\"}\n";
    let events: Vec<Event> = JsonLines::new(Cursor::new(text)).collect();
    assert_eq!(events, vec![Event::Reset]);
  }

  #[test]
  fn stamps_missing_timestamp() {
    let record = DetectionRecord {
      x: 1.0,
      y: 2.0,
      width: 3.0,
      height: 4.0,
      timestamp: None,
    };
    assert_eq!(record.stamp(42.0).t, 42.0);
    let record = DetectionRecord {
      timestamp: Some(7.0),
      ..record
    };
    assert_eq!(record.stamp(42.0).t, 7.0);
  }

  #[test]
  fn unknown_scheme_is_rejected() {
    let url = url::Url::parse("rtsp://camera/stream").unwrap();
    assert!(matches!(
      InputWrapper::from_url(&url),
      Err(InputError::SchemeMismatch)
    ));
  }
}
