// 该文件是 Shanan （山南西风） 项目的一部分。
// src/bin/servo_replay.rs - 按事件时间回放检测记录
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

use anyhow::Result;
use clap::Parser;
use url::Url;

use shanan_servo::{
  FromUrl,
  args::EstimatorArgs,
  input::InputWrapper,
  output::OutputWrapper,
  task::{ReplayTask, Task},
  tracker::ServoTracker,
};
use tracing::info;

/// 回放检测事件并输出每个控制周期的期望运动
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
  /// 事件来源，例如 jsonl:///data/events.jsonl 或 stdin:
  #[arg(long, value_name = "SOURCE")]
  pub input: Url,
  /// 输出，例如 jsonl:///data/motion.jsonl、stdout: 或 log:
  #[arg(long, value_name = "OUTPUT", default_value = "log:")]
  pub output: Url,

  /// 最多执行的控制周期数
  #[arg(long, value_name = "TICKS")]
  pub tick_limit: Option<usize>,

  #[command(flatten)]
  pub estimator: EstimatorArgs,
}

fn main() -> Result<()> {
  tracing_subscriber::fmt().with_writer(std::io::stderr).init();

  let args = Args::parse();
  let config = args.estimator.load()?;

  info!("输入来源: {}", args.input);
  info!("输出路径: {}", args.output);
  info!("估计器参数: {:?}", config);

  let input = InputWrapper::from_url(&args.input)?;
  let output = OutputWrapper::from_url(&args.output)?;
  let mut tracker = ServoTracker::from_config(&config);

  ReplayTask::new(config.tick_period())
    .with_tick_limit(args.tick_limit)
    .run_task(input, &mut tracker, output)?;

  Ok(())
}
