//! 视觉伺服估计器的端到端场景测试。

use approx::assert_relative_eq;
use rand::{Rng, SeedableRng, rngs::StdRng};

use shanan_servo::{
  config::EstimatorConfig,
  frame::FrameContext,
  model::{DesiredMotion, LinearFit, MotionModel, VisualServo},
  tracker::ServoTracker,
  trajectory::{Detection, TrajectoryBuffer, TrajectoryPoint},
};

fn detection(x: f64, y: f64, t: f64) -> Detection {
  Detection {
    x,
    y,
    width: 32.0,
    height: 32.0,
    t,
  }
}

fn tracker_with_frame(width: f64, height: f64) -> ServoTracker {
  let config = EstimatorConfig::default().with_default_resolution(FrameContext::new(width, height));
  ServoTracker::from_config(&config)
}

#[test]
fn fewer_than_four_points_never_estimate() {
  let mut tracker = tracker_with_frame(1280.0, 720.0);
  for i in 0..3 {
    tracker.push_detection(&detection(100.0 * i as f64, 50.0 * i as f64, 100.0 * i as f64));
    let report = tracker.tick(100.0 * i as f64);
    assert_eq!(report.motion, DesiredMotion::NONE);
    assert_eq!(report.motion.velocity(), (0.0, 0.0));
    assert_eq!(report.motion.acceleration(), (0.0, 0.0));
  }
}

#[test]
fn horizontal_track_fits_flat_line() {
  let mut tracker = tracker_with_frame(1280.0, 720.0);
  for (i, x) in [600.0, 620.0, 640.0, 660.0].into_iter().enumerate() {
    tracker.push_detection(&detection(x, 360.0, 100.0 * i as f64));
  }

  let fit = LinearFit::new(4).fit(tracker.buffer().points()).unwrap();
  assert_eq!(fit.slope, Some(0.0));
  assert_eq!(fit.intercept, Some(360.0));

  let report = tracker.tick(300.0);
  assert!(report.motion.has_data);
  // 最后一点 (660, 360) 在中心 (640, 360) 右侧 20 像素，沿 +x 方向拉回
  assert_relative_eq!(report.motion.vx, -20.0, epsilon = 1e-9);
  assert_relative_eq!(report.motion.vy, 0.0, epsilon = 1e-9);
}

#[test]
fn target_at_center_needs_no_velocity() {
  let mut tracker = tracker_with_frame(1280.0, 720.0);
  for (i, x) in [580.0, 600.0, 620.0, 640.0].into_iter().enumerate() {
    tracker.push_detection(&detection(x, 360.0, 100.0 * i as f64));
  }

  let report = tracker.tick(300.0);
  assert!(report.motion.has_data);
  assert_eq!(report.motion.vx, 0.0);
  assert_eq!(report.motion.vy, 0.0);
  // 测得速度 200 px/s，加速度指令使其减速
  assert_relative_eq!(report.motion.ax, -100.0, epsilon = 1e-9);
  assert_relative_eq!(report.motion.ay, 0.0, epsilon = 1e-9);
}

#[test]
fn shared_x_fits_vertical_line_oriented_by_travel() {
  let mut tracker = tracker_with_frame(1280.0, 720.0);
  // 竖直向上运动
  for (i, y) in [400.0, 380.0, 360.0, 340.0].into_iter().enumerate() {
    tracker.push_detection(&detection(500.0, y, 100.0 * i as f64));
  }

  let fit = LinearFit::new(4).fit(tracker.buffer().points()).unwrap();
  assert!(fit.slope.is_none());
  assert_eq!(fit.direction(), (0.0, 1.0));
  assert_eq!(fit.oriented_direction(0.0, -60.0), (-0.0, -1.0));

  let report = tracker.tick(300.0);
  assert!(report.motion.has_data);
  // e = (-140, -20)，沿 (0, -1) 投影为 20
  assert_relative_eq!(report.motion.vx, 0.0, epsilon = 1e-9);
  assert_relative_eq!(report.motion.vy, 20.0, epsilon = 1e-9);
  assert_relative_eq!(report.motion.ax, 0.0, epsilon = 1e-9);
  assert_relative_eq!(report.motion.ay, 110.0, epsilon = 1e-9);

  let line = report.line.unwrap();
  assert_eq!(line.x, [500.0, 500.0]);
  assert_eq!(line.y, [0.0, 720.0]);
}

#[test]
fn oriented_direction_never_points_backward() {
  let mut rng = StdRng::seed_from_u64(0x5eed);
  let fitter = LinearFit::new(4);

  for _ in 0..500 {
    let n = rng.gen_range(4..16);
    let points: Vec<TrajectoryPoint> = (0..n)
      .map(|i| TrajectoryPoint {
        x: rng.gen_range(0.0..1920.0),
        y: rng.gen_range(0.0..1080.0),
        t: i as f64 * 30.0,
      })
      .collect();

    let fit = fitter.fit(&points).unwrap();
    let first = points.first().unwrap();
    let last = points.last().unwrap();
    let (dx, dy) = (last.x - first.x, last.y - first.y);
    let (dir_x, dir_y) = fit.oriented_direction(dx, dy);

    assert!(dx * dir_x + dy * dir_y >= 0.0);
    assert_relative_eq!(dir_x.hypot(dir_y), 1.0, epsilon = 1e-9);
  }
}

#[test]
fn velocity_command_lies_on_fitted_line() {
  let mut rng = StdRng::seed_from_u64(42);
  let servo = VisualServo::default();
  let frame = FrameContext::new(1280.0, 720.0);

  for _ in 0..100 {
    let mut buffer = TrajectoryBuffer::new(500.0);
    for i in 0..6 {
      buffer.append(TrajectoryPoint {
        x: rng.gen_range(0.0..1280.0),
        y: rng.gen_range(0.0..720.0),
        t: i as f64 * 50.0,
      });
    }
    let fit = servo.fitter().fit(buffer.points()).unwrap();
    let (dir_x, dir_y) = fit.direction();
    let motion = servo.estimate(&buffer, &frame);
    assert!(motion.has_data);
    // 速度与拟合方向共线
    assert_relative_eq!(motion.vx * dir_y - motion.vy * dir_x, 0.0, epsilon = 1e-6);
  }
}

#[test]
fn estimate_is_idempotent() {
  let servo = VisualServo::default();
  let frame = FrameContext::new(1280.0, 720.0);
  let mut buffer = TrajectoryBuffer::new(500.0);
  for (i, (x, y)) in [(101.3, 220.7), (133.9, 241.1), (170.2, 260.4), (199.8, 283.6), (231.5, 300.0)]
    .into_iter()
    .enumerate()
  {
    buffer.append(TrajectoryPoint {
      x,
      y,
      t: 40.0 * i as f64,
    });
  }

  let a = servo.estimate(&buffer, &frame);
  let b = servo.estimate(&buffer, &frame);
  assert_eq!(a.vx.to_bits(), b.vx.to_bits());
  assert_eq!(a.vy.to_bits(), b.vy.to_bits());
  assert_eq!(a.ax.to_bits(), b.ax.to_bits());
  assert_eq!(a.ay.to_bits(), b.ay.to_bits());
  assert_eq!(a.has_data, b.has_data);

  let mut tracker = tracker_with_frame(1280.0, 720.0);
  for p in buffer.points() {
    tracker.push_detection(&detection(p.x, p.y, p.t));
  }
  assert_eq!(tracker.tick(200.0), tracker.tick(200.0));
}

#[test]
fn tick_evicts_with_inclusive_boundary() {
  let mut tracker = tracker_with_frame(1280.0, 720.0);
  for t in [0.0, 100.0, 200.0, 300.0, 400.0] {
    tracker.push_detection(&detection(t, t, t));
  }

  let report = tracker.tick(600.0);
  // 0 超出窗口，100 恰在边界上保留
  assert_eq!(report.points, 4);
  assert!(tracker.buffer().points().iter().all(|p| 600.0 - p.t <= 500.0));
  assert_eq!(tracker.buffer().first().map(|p| p.t), Some(100.0));

  let report = tracker.tick(2000.0);
  assert_eq!(report.points, 0);
  assert!(!report.motion.has_data);
}

#[test]
fn zero_frame_never_estimates() {
  let mut tracker = tracker_with_frame(1280.0, 720.0);
  for i in 0..8 {
    tracker.push_detection(&detection(10.0 * i as f64, 7.0 * i as f64, 50.0 * i as f64));
  }
  assert!(tracker.tick(350.0).motion.has_data);

  tracker.update_frame(FrameContext::new(0.0, 0.0));
  let report = tracker.tick(350.0);
  assert_eq!(report.motion, DesiredMotion::NONE);
  assert!(report.line.is_none());
}

#[test]
fn custom_window_and_threshold_are_honored() {
  let config = EstimatorConfig::default()
    .with_window_ms(1000.0)
    .with_min_points(6);
  let mut tracker = ServoTracker::from_config(&config);
  for i in 0..5 {
    tracker.push_detection(&detection(10.0 * i as f64, 0.0, 200.0 * i as f64));
  }
  // 5 个点都在 1000ms 窗口内，但不足 6 个
  let report = tracker.tick(800.0);
  assert_eq!(report.points, 5);
  assert!(!report.motion.has_data);

  tracker.push_detection(&detection(50.0, 0.0, 1000.0));
  assert!(tracker.tick(1000.0).motion.has_data);
}
