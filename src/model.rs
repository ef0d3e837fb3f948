// 该文件是 Shanan （山南西风） 项目的一部分。
// src/model.rs - 运动模型
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

use crate::{frame::FrameContext, trajectory::TrajectoryBuffer};

/// 期望运动指令（像素空间，px/s 与 px/s²）。
///
/// `has_data == false` 表示当前没有有效估计，此时四个分量恒为 0。
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DesiredMotion {
  pub vx: f64,
  pub vy: f64,
  pub ax: f64,
  pub ay: f64,
  pub has_data: bool,
}

impl DesiredMotion {
  pub const NONE: DesiredMotion = DesiredMotion {
    vx: 0.0,
    vy: 0.0,
    ax: 0.0,
    ay: 0.0,
    has_data: false,
  };

  pub fn velocity(&self) -> (f64, f64) {
    (self.vx, self.vy)
  }

  pub fn acceleration(&self) -> (f64, f64) {
    (self.ax, self.ay)
  }
}

pub trait MotionModel {
  /// 使用已经算好的拟合结果进行估计，同一控制周期内拟合只做一次
  fn estimate_with_fit(
    &self,
    buffer: &TrajectoryBuffer,
    frame: &FrameContext,
    fit: Option<&LineFit>,
  ) -> DesiredMotion;

  fn fitter(&self) -> &LinearFit;

  fn estimate(&self, buffer: &TrajectoryBuffer, frame: &FrameContext) -> DesiredMotion {
    let fit = self.fitter().fit(buffer.points());
    self.estimate_with_fit(buffer, frame, fit.as_ref())
  }
}

mod linear_fit;
pub use self::linear_fit::{LineFit, LinearFit, RegressionLine};

mod servo;
pub use self::servo::VisualServo;
