// 该文件是 Shanan （山南西风） 项目的一部分。
// src/frame.rs - 画面上下文（分辨率与中心点）
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

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 相机默认分辨率
pub const DEFAULT_RESOLUTION: FrameContext = FrameContext::new(1920.0, 1080.0);

/// 上游未上报分辨率时使用的回退分辨率
pub const FALLBACK_RESOLUTION: FrameContext = FrameContext::new(1280.0, 720.0);

/// 当前画面分辨率，画面中心即为伺服目标点
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameContext {
  pub width: f64,
  pub height: f64,
}

impl FrameContext {
  pub const fn new(width: f64, height: f64) -> Self {
    Self { width, height }
  }

  pub fn center(&self) -> (f64, f64) {
    (self.width / 2.0, self.height / 2.0)
  }

  /// 宽高均为正数时才能给出有效估计（NaN 视为无效）
  pub fn is_valid(&self) -> bool {
    self.width > 0.0 && self.height > 0.0
  }
}

impl Default for FrameContext {
  fn default() -> Self {
    DEFAULT_RESOLUTION
  }
}

impl fmt::Display for FrameContext {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}x{}", self.width, self.height)
  }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ResolutionParseError {
  #[error("分辨率缺少分隔符 'x': {0}")]
  MissingSeparator(String),
  #[error("分辨率数值无效: {0}")]
  InvalidDimension(String),
}

/// 解析形如 `1920x1080` 的分辨率字符串
impl FromStr for FrameContext {
  type Err = ResolutionParseError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let (w, h) = s
      .split_once(|c: char| c == 'x' || c == 'X')
      .ok_or_else(|| ResolutionParseError::MissingSeparator(s.to_string()))?;

    let parse = |part: &str| {
      part
        .trim()
        .parse::<u32>()
        .map_err(|_| ResolutionParseError::InvalidDimension(s.to_string()))
    };

    Ok(FrameContext::new(parse(w)? as f64, parse(h)? as f64))
  }
}
