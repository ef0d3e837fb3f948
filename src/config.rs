// 该文件是 Shanan （山南西风） 项目的一部分。
// src/config.rs - 估计器参数配置
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

use std::{path::Path, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::frame::{DEFAULT_RESOLUTION, FALLBACK_RESOLUTION, FrameContext};

#[derive(Error, Debug)]
pub enum ConfigError {
  #[error("配置文件读取错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("配置文件解析错误: {0}")]
  ParseError(#[from] serde_json::Error),
  #[error("轨迹时间窗口必须为正数, 实际为 {0}")]
  InvalidWindow(f64),
  #[error("最少轨迹点数不能小于 2, 实际为 {0}")]
  InvalidMinPoints(usize),
  #[error("增益 {0} 必须为有限数值, 实际为 {1}")]
  InvalidGain(&'static str, f64),
  #[error("控制周期不能为 0")]
  InvalidTickPeriod,
  #[error("分辨率 {0} 无效: {1}")]
  InvalidResolution(&'static str, FrameContext),
}

/// 视觉伺服估计器的全部可调参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
  /// 轨迹时间窗口（毫秒）
  pub window_ms: f64,
  /// 拟合与估计所需的最少轨迹点数
  pub min_points: usize,
  /// 位置误差到速度指令的比例增益
  pub k_v: f64,
  /// 速度误差到加速度指令的比例增益
  pub k_a: f64,
  /// 控制周期（毫秒）
  pub tick_period_ms: u64,
  /// 启动时假定的画面分辨率
  pub default_resolution: FrameContext,
  /// 状态上报缺少分辨率字段时的回退分辨率
  pub fallback_resolution: FrameContext,
}

impl Default for EstimatorConfig {
  fn default() -> Self {
    Self {
      window_ms: 500.0,
      min_points: 4,
      k_v: 1.0,
      k_a: 0.5,
      tick_period_ms: 100,
      default_resolution: DEFAULT_RESOLUTION,
      fallback_resolution: FALLBACK_RESOLUTION,
    }
  }
}

impl EstimatorConfig {
  pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    info!("加载配置文件: {}", path.display());
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
  }

  pub fn with_window_ms(mut self, window_ms: f64) -> Self {
    self.window_ms = window_ms;
    self
  }

  pub fn with_min_points(mut self, min_points: usize) -> Self {
    self.min_points = min_points;
    self
  }

  pub fn with_gains(mut self, k_v: f64, k_a: f64) -> Self {
    self.k_v = k_v;
    self.k_a = k_a;
    self
  }

  pub fn with_tick_period_ms(mut self, tick_period_ms: u64) -> Self {
    self.tick_period_ms = tick_period_ms;
    self
  }

  pub fn with_default_resolution(mut self, resolution: FrameContext) -> Self {
    self.default_resolution = resolution;
    self
  }

  pub fn tick_period(&self) -> Duration {
    Duration::from_millis(self.tick_period_ms)
  }

  pub fn validate(&self) -> Result<(), ConfigError> {
    if !self.window_ms.is_finite() || self.window_ms <= 0.0 {
      return Err(ConfigError::InvalidWindow(self.window_ms));
    }
    if self.min_points < 2 {
      return Err(ConfigError::InvalidMinPoints(self.min_points));
    }
    if !self.k_v.is_finite() {
      return Err(ConfigError::InvalidGain("k_v", self.k_v));
    }
    if !self.k_a.is_finite() {
      return Err(ConfigError::InvalidGain("k_a", self.k_a));
    }
    if self.tick_period_ms == 0 {
      return Err(ConfigError::InvalidTickPeriod);
    }
    for (name, resolution) in [
      ("default_resolution", self.default_resolution),
      ("fallback_resolution", self.fallback_resolution),
    ] {
      if !resolution.width.is_finite() || !resolution.height.is_finite() || !resolution.is_valid() {
        return Err(ConfigError::InvalidResolution(name, resolution));
      }
    }
    Ok(())
  }
}
