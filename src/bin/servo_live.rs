// 该文件是 Shanan （山南西风） 项目的一部分。
// src/bin/servo_live.rs - 实时视觉伺服估计
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
  task::{LiveTask, Task},
  tracker::ServoTracker,
};
use tracing::info;

/// 实时接收检测事件，按固定周期输出期望运动
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
  /// 事件来源
  #[arg(long, value_name = "SOURCE", default_value = "stdin:")]
  pub input: Url,
  /// 输出
  #[arg(long, value_name = "OUTPUT", default_value = "stdout:")]
  pub output: Url,

  #[arg(long, value_name = "TICKS")]
  pub tick_limit: Option<usize>,

  /// 使用检测记录自带的时间戳（Unix 毫秒，须与本机时钟同步），默认按到达时间打戳
  #[arg(long)]
  pub event_time: bool,

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

  LiveTask::new(config.tick_period())
    .with_tick_limit(args.tick_limit)
    .with_event_time(args.event_time)
    .run_task(input, &mut tracker, output)?;

  Ok(())
}
