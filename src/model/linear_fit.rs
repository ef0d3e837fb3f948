// 该文件是 Shanan （山南西风） 项目的一部分。
// src/model/linear_fit.rs - 轨迹最小二乘直线拟合
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

use crate::{frame::FrameContext, trajectory::TrajectoryPoint};

/// 直线拟合结果。`slope == None` 表示竖直线 `x = mean_x`，此时 `intercept` 也为 `None`。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineFit {
  pub slope: Option<f64>,
  pub intercept: Option<f64>,
  pub mean_x: f64,
  pub mean_y: f64,
}

impl LineFit {
  pub fn is_vertical(&self) -> bool {
    self.slope.is_none()
  }

  /// 拟合直线方向（未校正符号）：竖直线为 (0, 1)，否则为 (1, slope) 的单位向量
  pub fn direction(&self) -> (f64, f64) {
    match self.slope {
      None => (0.0, 1.0),
      Some(slope) => {
        let mag = 1.0_f64.hypot(slope);
        if mag > 0.0 {
          (1.0 / mag, slope / mag)
        } else {
          (1.0, slope)
        }
      }
    }
  }

  /// 与净位移 `(dx, dy)` 同向的拟合方向；点积为 0 时保持原符号
  pub fn oriented_direction(&self, dx: f64, dy: f64) -> (f64, f64) {
    let (dir_x, dir_y) = self.direction();
    if dx * dir_x + dy * dir_y >= 0.0 {
      (dir_x, dir_y)
    } else {
      (-dir_x, -dir_y)
    }
  }

  /// 横跨整幅画面的两点表示，用于显示
  pub fn line_across(&self, frame: &FrameContext) -> RegressionLine {
    match (self.slope, self.intercept) {
      (Some(slope), Some(intercept)) => {
        let (x0, x1) = (0.0, frame.width);
        RegressionLine {
          x: [x0, x1],
          y: [slope * x0 + intercept, slope * x1 + intercept],
        }
      }
      _ => RegressionLine {
        x: [self.mean_x, self.mean_x],
        y: [0.0, frame.height],
      },
    }
  }
}

/// 拟合直线的显示线段 `[x0, x1]`, `[y0, y1]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionLine {
  pub x: [f64; 2],
  pub y: [f64; 2],
}

/// 普通最小二乘拟合器。点数不足 `min_points` 时不给出结果，
/// 这是抑制噪声的门限，而非数学上的最少点数。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
  min_points: usize,
}

impl LinearFit {
  pub fn new(min_points: usize) -> Self {
    Self { min_points }
  }

  pub fn min_points(&self) -> usize {
    self.min_points
  }

  pub fn fit(&self, points: &[TrajectoryPoint]) -> Option<LineFit> {
    let n = points.len();
    if n < self.min_points || n == 0 {
      return None;
    }

    let (sum_x, sum_y) = points
      .iter()
      .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    let mean_x = sum_x / n as f64;
    let mean_y = sum_y / n as f64;

    let (num, den) = points.iter().fold((0.0, 0.0), |(num, den), p| {
      let dx = p.x - mean_x;
      let dy = p.y - mean_y;
      (num + dx * dy, den + dx * dx)
    });

    if den == 0.0 {
      return Some(LineFit {
        slope: None,
        intercept: None,
        mean_x,
        mean_y,
      });
    }

    let slope = num / den;
    Some(LineFit {
      slope: Some(slope),
      intercept: Some(mean_y - slope * mean_x),
      mean_x,
      mean_y,
    })
  }
}
