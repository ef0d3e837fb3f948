// 该文件是 Shanan （山南西风） 项目的一部分。
// src/task.rs - 控制周期驱动任务
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

use std::{
  sync::mpsc::{self, RecvTimeoutError},
  thread,
  time::{Duration, Instant},
};
use tracing::{debug, info, warn};

use crate::{
  frame::FrameContext,
  input::Event,
  model::MotionModel,
  output::Render,
  tracker::{ServoTracker, TickReport},
};

pub trait Task<I, M, O>: Sized {
  type Error;
  fn run_task(self, input: I, tracker: &mut ServoTracker<M>, output: O) -> Result<(), Self::Error>;
}

/// 当前墙钟时间（Unix 毫秒）
pub fn wall_clock_ms() -> f64 {
  chrono::Utc::now().timestamp_millis() as f64
}

/// 把一个输入事件作用到跟踪状态上，缺少时间戳的检测以 `arrival_t` 补齐
pub fn apply_event<M: MotionModel>(tracker: &mut ServoTracker<M>, event: Event, arrival_t: f64) {
  match event {
    Event::Detection(record) => tracker.push_detection(&record.stamp(arrival_t)),
    Event::Resolution { width, height } => tracker.update_frame(FrameContext::new(width, height)),
    Event::Stats { resolution } => tracker.report_resolution(resolution.as_deref()),
    Event::Reset => tracker.reset(),
  }
}

/// 按事件时间回放：周期从第一个事件的时间开始，
/// 每个事件到来前先执行所有早于它的周期，最后再补一个周期。
#[derive(Debug, Clone)]
pub struct ReplayTask {
  tick_period: Duration,
  tick_limit: Option<usize>,
}

impl ReplayTask {
  pub fn new(tick_period: Duration) -> Self {
    Self {
      tick_period,
      tick_limit: None,
    }
  }

  pub fn with_tick_limit(mut self, tick_limit: Option<usize>) -> Self {
    self.tick_limit = tick_limit;
    self
  }
}

impl Default for ReplayTask {
  fn default() -> Self {
    Self::new(Duration::from_millis(100))
  }
}

impl<I, M, O, RE> Task<I, M, O> for ReplayTask
where
  I: Iterator<Item = Event>,
  M: MotionModel,
  O: Render<TickReport, Error = RE>,
  RE: std::error::Error + Sync + Send + 'static,
{
  type Error = anyhow::Error;

  fn run_task(self, input: I, tracker: &mut ServoTracker<M>, output: O) -> Result<(), Self::Error> {
    info!("开始回放任务...");
    let period_ms = self.tick_period.as_micros() as f64 / 1000.0;
    if period_ms <= 0.0 {
      anyhow::bail!("控制周期必须大于 0");
    }
    let limit_reached = |ticks: usize| self.tick_limit.map(|n| ticks >= n).unwrap_or(false);

    let mut clock: Option<f64> = None;
    let mut next_tick: Option<f64> = None;
    let mut ticks = 0usize;
    let mut events = 0usize;

    for event in input {
      if let Some(t) = event.timestamp().or(clock) {
        let next = next_tick.get_or_insert(t);
        while *next < t {
          if limit_reached(ticks) {
            info!("达到指定周期数 {}, 退出任务循环", ticks);
            output.finish()?;
            return Ok(());
          }
          output.render_result(&tracker.tick(*next))?;
          *next += period_ms;
          ticks += 1;
        }
        clock = Some(clock.map_or(t, |c| c.max(t)));
      }
      apply_event(tracker, event, clock.unwrap_or(0.0));
      events += 1;
    }

    if let Some(next) = next_tick
      && !limit_reached(ticks)
    {
      output.render_result(&tracker.tick(next))?;
      ticks += 1;
    }

    output.finish()?;
    info!("回放完成: {} 个事件, {} 个周期", events, ticks);
    Ok(())
  }
}

/// 实时运行：读取线程通过通道把事件交给持有跟踪状态的线程，
/// 后者按墙钟固定周期执行估计。
///
/// 检测默认以到达时的墙钟时间打戳，上游自带的时间戳（可能是秒，也可能来自
/// 另一台时钟不同步的主机）只有在 `with_event_time(true)` 时才会保留。
#[derive(Debug, Clone)]
pub struct LiveTask {
  tick_period: Duration,
  tick_limit: Option<usize>,
  interrupt: bool,
  event_time: bool,
}

impl LiveTask {
  pub fn new(tick_period: Duration) -> Self {
    Self {
      tick_period,
      tick_limit: None,
      interrupt: true,
      event_time: false,
    }
  }

  pub fn with_tick_limit(mut self, tick_limit: Option<usize>) -> Self {
    self.tick_limit = tick_limit;
    self
  }

  /// 是否安装 Ctrl-C 处理器（每个进程只能安装一次）
  pub fn with_interrupt(mut self, interrupt: bool) -> Self {
    self.interrupt = interrupt;
    self
  }

  /// 保留检测记录自带的时间戳，要求其为与本机墙钟同步的 Unix 毫秒
  pub fn with_event_time(mut self, event_time: bool) -> Self {
    self.event_time = event_time;
    self
  }
}

impl Default for LiveTask {
  fn default() -> Self {
    Self::new(Duration::from_millis(100))
  }
}

impl<I, M, O, RE> Task<I, M, O> for LiveTask
where
  I: Iterator<Item = Event> + Send + 'static,
  M: MotionModel,
  O: Render<TickReport, Error = RE>,
  RE: std::error::Error + Sync + Send + 'static,
{
  type Error = anyhow::Error;

  fn run_task(self, input: I, tracker: &mut ServoTracker<M>, output: O) -> Result<(), Self::Error> {
    info!("开始实时任务, 控制周期 {:?}", self.tick_period);
    if self.tick_period.is_zero() {
      anyhow::bail!("控制周期必须大于 0");
    }

    let (event_tx, event_rx) = mpsc::channel();
    // 读取线程可能阻塞在标准输入上，不等待其结束
    thread::spawn(move || {
      for event in input {
        if event_tx.send(event).is_err() {
          break;
        }
      }
      debug!("输入读取线程结束");
    });

    let (stop_tx, stop_rx) = mpsc::channel();
    if self.interrupt {
      ctrlc::set_handler(move || {
        info!("收到中断信号，准备退出...");
        let _ = stop_tx.send(());
      })?;
    }

    let mut ticks = 0usize;
    let mut next_tick = Instant::now() + self.tick_period;
    loop {
      if Instant::now() >= next_tick {
        output.render_result(&tracker.tick(wall_clock_ms()))?;
        ticks += 1;
        next_tick += self.tick_period;
        let now = Instant::now();
        if next_tick <= now {
          debug!("控制周期落后，重新对齐调度");
          next_tick = now + self.tick_period;
        }

        if self.tick_limit.map(|n| ticks >= n).unwrap_or(false) {
          info!("达到指定周期数 {}, 退出任务循环", ticks);
          break;
        }
        if stop_rx.try_recv().is_ok() {
          warn!("中断信号接收，退出任务循环");
          break;
        }
        continue;
      }

      let timeout = next_tick.saturating_duration_since(Instant::now());
      match event_rx.recv_timeout(timeout) {
        Ok(mut event) => {
          if !self.event_time
            && let Event::Detection(record) = &mut event
          {
            record.timestamp = None;
          }
          apply_event(tracker, event, wall_clock_ms());
        }
        Err(RecvTimeoutError::Timeout) => {}
        Err(RecvTimeoutError::Disconnected) => {
          info!("输入已结束");
          output.render_result(&tracker.tick(wall_clock_ms()))?;
          ticks += 1;
          break;
        }
      }
    }

    output.finish()?;
    info!("任务完成，共 {} 个周期，退出", ticks);
    Ok(())
  }
}
