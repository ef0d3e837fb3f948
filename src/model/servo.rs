// 该文件是 Shanan （山南西风） 项目的一部分。
// src/model/servo.rs - 视觉伺服控制律
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

use tracing::debug;

use crate::{
  config::EstimatorConfig,
  frame::FrameContext,
  model::{DesiredMotion, LineFit, LinearFit, MotionModel},
  trajectory::TrajectoryBuffer,
};

/// 沿拟合轨迹把目标推回画面中心的比例控制律：
/// `k_v` 把位置误差换算为速度指令，`k_a` 把速度误差换算为加速度指令。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualServo {
  k_v: f64,
  k_a: f64,
  fitter: LinearFit,
}

impl VisualServo {
  pub fn new(k_v: f64, k_a: f64, min_points: usize) -> Self {
    Self {
      k_v,
      k_a,
      fitter: LinearFit::new(min_points),
    }
  }

  pub fn from_config(config: &EstimatorConfig) -> Self {
    Self::new(config.k_v, config.k_a, config.min_points)
  }

  pub fn gains(&self) -> (f64, f64) {
    (self.k_v, self.k_a)
  }
}

impl Default for VisualServo {
  fn default() -> Self {
    Self::from_config(&EstimatorConfig::default())
  }
}

impl MotionModel for VisualServo {
  fn fitter(&self) -> &LinearFit {
    &self.fitter
  }

  fn estimate_with_fit(
    &self,
    buffer: &TrajectoryBuffer,
    frame: &FrameContext,
    fit: Option<&LineFit>,
  ) -> DesiredMotion {
    if buffer.len() < self.fitter.min_points() || !frame.is_valid() {
      return DesiredMotion::NONE;
    }
    let (Some(first), Some((prev, last))) = (buffer.first(), buffer.last_pair()) else {
      return DesiredMotion::NONE;
    };

    let dt = (last.t - prev.t) / 1000.0;
    let (vx_meas, vy_meas) = if dt > 0.0 {
      ((last.x - prev.x) / dt, (last.y - prev.y) / dt)
    } else {
      (0.0, 0.0)
    };

    let (cx, cy) = frame.center();
    let (ex, ey) = (last.x - cx, last.y - cy);

    let Some(fit) = fit else {
      return DesiredMotion::NONE;
    };

    // 方向取与窗口内整体位移一致的一侧
    let (dir_x, dir_y) = fit.oriented_direction(last.x - first.x, last.y - first.y);

    let proj = ex * dir_x + ey * dir_y;

    let vx = -self.k_v * proj * dir_x;
    let vy = -self.k_v * proj * dir_y;
    let ax = self.k_a * (vx - vx_meas);
    let ay = self.k_a * (vy - vy_meas);

    debug!(
      "伺服估计: dir=({:.3}, {:.3}) proj={:.1} v_meas=({:.1}, {:.1})",
      dir_x, dir_y, proj, vx_meas, vy_meas
    );

    DesiredMotion {
      vx,
      vy,
      ax,
      ay,
      has_data: true,
    }
  }
}
