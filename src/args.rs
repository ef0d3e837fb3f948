// 该文件是 Shanan （山南西风） 项目的一部分。
// src/args.rs - 估计器命令行参数
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

use std::path::PathBuf;

use clap::Args;

use crate::{
  config::{ConfigError, EstimatorConfig},
  frame::FrameContext,
};

/// 估计器参数；命令行参数覆盖配置文件，配置文件覆盖内置默认值
#[derive(Args, Debug, Clone, Default)]
pub struct EstimatorArgs {
  /// JSON 配置文件路径
  #[arg(long, value_name = "FILE")]
  pub config: Option<PathBuf>,

  /// 轨迹时间窗口（毫秒，默认 500）
  #[arg(long, value_name = "MS")]
  pub window_ms: Option<f64>,

  /// 拟合所需最少轨迹点数（默认 4）
  #[arg(long, value_name = "COUNT")]
  pub min_points: Option<usize>,

  /// 速度增益 k_v（默认 1.0）
  #[arg(long, value_name = "GAIN", allow_negative_numbers = true)]
  pub k_v: Option<f64>,

  /// 加速度增益 k_a（默认 0.5）
  #[arg(long, value_name = "GAIN", allow_negative_numbers = true)]
  pub k_a: Option<f64>,

  /// 控制周期（毫秒，默认 100）
  #[arg(long, value_name = "MS")]
  pub tick_ms: Option<u64>,

  /// 启动分辨率，例如 1920x1080
  #[arg(long, value_name = "WxH")]
  pub resolution: Option<FrameContext>,
}

impl EstimatorArgs {
  pub fn load(&self) -> Result<EstimatorConfig, ConfigError> {
    let mut config = match &self.config {
      Some(path) => EstimatorConfig::from_json_file(path)?,
      None => EstimatorConfig::default(),
    };

    if let Some(window_ms) = self.window_ms {
      config.window_ms = window_ms;
    }
    if let Some(min_points) = self.min_points {
      config.min_points = min_points;
    }
    if let Some(k_v) = self.k_v {
      config.k_v = k_v;
    }
    if let Some(k_a) = self.k_a {
      config.k_a = k_a;
    }
    if let Some(tick_ms) = self.tick_ms {
      config.tick_period_ms = tick_ms;
    }
    if let Some(resolution) = self.resolution {
      config.default_resolution = resolution;
    }

    config.validate()?;
    Ok(config)
  }
}
