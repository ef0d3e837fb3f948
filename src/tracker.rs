// 该文件是 Shanan （山南西风） 项目的一部分。
// src/tracker.rs - 伺服跟踪状态
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

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
  config::EstimatorConfig,
  frame::FrameContext,
  model::{DesiredMotion, MotionModel, RegressionLine, VisualServo},
  trajectory::{Detection, TrajectoryBuffer, TrajectoryPoint},
};

/// 每个控制周期输出的结果
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
  /// 本周期的时间（毫秒）
  pub t: f64,
  /// 时间窗口内保留的轨迹点数
  pub points: usize,
  pub motion: DesiredMotion,
  /// 拟合直线；仅当 `motion.has_data` 时存在
  pub line: Option<RegressionLine>,
}

/// 轨迹缓冲区、画面上下文与最近一次估计结果的唯一持有者
#[derive(Debug, Clone)]
pub struct ServoTracker<M = VisualServo> {
  buffer: TrajectoryBuffer,
  frame: FrameContext,
  fallback_resolution: FrameContext,
  model: M,
  last_motion: DesiredMotion,
}

impl ServoTracker<VisualServo> {
  pub fn from_config(config: &EstimatorConfig) -> Self {
    Self::with_model(config, VisualServo::from_config(config))
  }
}

impl<M: MotionModel> ServoTracker<M> {
  pub fn with_model(config: &EstimatorConfig, model: M) -> Self {
    Self {
      buffer: TrajectoryBuffer::new(config.window_ms),
      frame: config.default_resolution,
      fallback_resolution: config.fallback_resolution,
      model,
      last_motion: DesiredMotion::NONE,
    }
  }

  pub fn buffer(&self) -> &TrajectoryBuffer {
    &self.buffer
  }

  pub fn frame(&self) -> &FrameContext {
    &self.frame
  }

  pub fn last_motion(&self) -> &DesiredMotion {
    &self.last_motion
  }

  /// 追加检测点，并以该点时间为基准淘汰过期点
  pub fn push_detection(&mut self, detection: &Detection) {
    let point = TrajectoryPoint::from(detection);
    self.buffer.append(point);
    let removed = self.buffer.evict_stale(point.t);
    debug!(
      "新检测点 ({:.1}, {:.1}) @ {:.0}ms, 淘汰 {} 个, 剩余 {} 个",
      point.x,
      point.y,
      point.t,
      removed,
      self.buffer.len()
    );
  }

  pub fn update_frame(&mut self, frame: FrameContext) {
    if frame != self.frame {
      info!("画面分辨率更新: {} -> {}", self.frame, frame);
      if !frame.is_valid() {
        warn!("分辨率 {} 无效, 估计结果将为空", frame);
      }
      self.frame = frame;
    }
  }

  /// 状态上报：能解析的分辨率立即生效，无法解析的保持不变，缺失或为空时回退
  pub fn report_resolution(&mut self, resolution: Option<&str>) {
    match resolution.map(str::trim) {
      Some(text) if !text.is_empty() => match text.parse::<FrameContext>() {
        Ok(frame) => self.update_frame(frame),
        Err(e) => warn!("忽略无法解析的分辨率: {}", e),
      },
      _ => self.update_frame(self.fallback_resolution),
    }
  }

  pub fn reset(&mut self) {
    info!("清空轨迹 ({} 个点)", self.buffer.len());
    self.buffer.reset();
    self.last_motion = DesiredMotion::NONE;
  }

  /// 一个控制周期：淘汰过期点，拟合一次，再由同一拟合结果导出运动指令与显示线段
  pub fn tick(&mut self, now: f64) -> TickReport {
    self.buffer.evict_stale(now);

    let fit = self.model.fitter().fit(self.buffer.points());
    let motion = self
      .model
      .estimate_with_fit(&self.buffer, &self.frame, fit.as_ref());
    let line = match (motion.has_data, fit) {
      (true, Some(fit)) => Some(fit.line_across(&self.frame)),
      _ => None,
    };

    if motion.has_data {
      debug!(
        "v_des: vx={:.1}, vy={:.1} px/s, a_des: ax={:.1}, ay={:.1} px/s²",
        motion.vx, motion.vy, motion.ax, motion.ay
      );
    } else {
      debug!("暂无有效估计, 轨迹点数: {}", self.buffer.len());
    }

    self.last_motion = motion;
    TickReport {
      t: now,
      points: self.buffer.len(),
      motion,
      line,
    }
  }
}
