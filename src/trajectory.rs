// 该文件是 Shanan （山南西风） 项目的一部分。
// src/trajectory.rs - 检测结果与轨迹时间窗口
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

/// 单次目标检测：像素坐标、框尺寸与时间戳（毫秒）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Detection {
  pub x: f64,
  pub y: f64,
  pub width: f64,
  pub height: f64,
  pub t: f64,
}

/// 时间窗口中保留的轨迹点
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryPoint {
  pub x: f64,
  pub y: f64,
  pub t: f64,
}

impl From<&Detection> for TrajectoryPoint {
  fn from(det: &Detection) -> Self {
    Self {
      x: det.x,
      y: det.y,
      t: det.t,
    }
  }
}

impl From<Detection> for TrajectoryPoint {
  fn from(det: Detection) -> Self {
    Self::from(&det)
  }
}

/// 按插入顺序保存最近轨迹点的缓冲区。
///
/// 数量不设上限，仅由时间窗口和到达速率约束；
/// 每次 `evict_stale` 之后所有点都满足 `now - t <= window_ms`。
#[derive(Debug, Clone)]
pub struct TrajectoryBuffer {
  points: Vec<TrajectoryPoint>,
  window_ms: f64,
}

impl TrajectoryBuffer {
  pub fn new(window_ms: f64) -> Self {
    Self {
      points: Vec::new(),
      window_ms,
    }
  }

  pub fn window_ms(&self) -> f64 {
    self.window_ms
  }

  /// 追加到末尾。时间戳允许重复，不做顺序检查。
  pub fn append(&mut self, point: TrajectoryPoint) {
    self.points.push(point);
  }

  /// 移除所有 `now - t > window_ms` 的点，恰好落在边界上的点保留
  pub fn evict_stale(&mut self, now: f64) -> usize {
    let before = self.points.len();
    let window_ms = self.window_ms;
    self.points.retain(|p| now - p.t <= window_ms);
    before - self.points.len()
  }

  pub fn reset(&mut self) {
    self.points.clear();
  }

  pub fn len(&self) -> usize {
    self.points.len()
  }

  pub fn is_empty(&self) -> bool {
    self.points.is_empty()
  }

  pub fn points(&self) -> &[TrajectoryPoint] {
    &self.points
  }

  pub fn first(&self) -> Option<&TrajectoryPoint> {
    self.points.first()
  }

  pub fn last(&self) -> Option<&TrajectoryPoint> {
    self.points.last()
  }

  /// 最近两个点 `(倒数第二, 最后)`
  pub fn last_pair(&self) -> Option<(&TrajectoryPoint, &TrajectoryPoint)> {
    match self.points.as_slice() {
      [.., prev, last] => Some((prev, last)),
      _ => None,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn point(x: f64, y: f64, t: f64) -> TrajectoryPoint {
    TrajectoryPoint { x, y, t }
  }

  #[test]
  fn evicts_strictly_older_than_window() {
    let mut buffer = TrajectoryBuffer::new(500.0);
    buffer.append(point(0.0, 0.0, 0.0));
    buffer.append(point(1.0, 0.0, 100.0));
    buffer.append(point(2.0, 0.0, 600.0));

    // 0 已超出窗口 (600 > 500)，100 正好在边界上 (500 == 500) 应保留
    let removed = buffer.evict_stale(600.0);
    assert_eq!(removed, 1);
    assert_eq!(buffer.len(), 2);
    assert_eq!(buffer.first().map(|p| p.t), Some(100.0));
    assert!(buffer.points().iter().all(|p| 600.0 - p.t <= 500.0));
  }

  #[test]
  fn duplicate_timestamps_are_kept() {
    let mut buffer = TrajectoryBuffer::new(500.0);
    buffer.append(point(0.0, 0.0, 200.0));
    buffer.append(point(1.0, 1.0, 200.0));
    buffer.evict_stale(200.0);
    assert_eq!(buffer.len(), 2);

    let (prev, last) = buffer.last_pair().unwrap();
    assert_eq!(prev.x, 0.0);
    assert_eq!(last.x, 1.0);
  }

  #[test]
  fn reset_clears_everything() {
    let mut buffer = TrajectoryBuffer::new(500.0);
    for i in 0..10 {
      buffer.append(point(i as f64, 0.0, i as f64 * 10.0));
    }
    buffer.reset();
    assert!(buffer.is_empty());
    assert!(buffer.last_pair().is_none());
  }

  #[test]
  fn detection_keeps_position_and_time() {
    let det = Detection {
      x: 10.0,
      y: 20.0,
      width: 30.0,
      height: 40.0,
      t: 50.0,
    };
    assert_eq!(TrajectoryPoint::from(det), point(10.0, 20.0, 50.0));
  }
}
