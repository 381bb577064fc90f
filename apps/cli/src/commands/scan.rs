//! 扫描命令
//!
//! 依次把每个通道从起点扫到终点再返回，结束后执行关闭序列。
//! Ctrl-C 会中止扫描，但关闭序列照常执行。

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::{Result, bail};
use bpc_sdk::ChannelController;
use bpc_sdk::serial::Transport;
use clap::{Args, ValueEnum};
use tracing::warn;

use super::r#move::ensure_zeroed;
use crate::validation::scan_points;

/// 扫描的物理量
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanQuantity {
    /// 闭环位置（nm，需要归零）
    Position,
    /// 开环电压（V）
    Voltage,
}

/// 扫描命令参数
#[derive(Args, Debug)]
pub struct ScanCommand {
    /// 参与扫描的通道（逗号分隔）
    #[arg(long, value_delimiter = ',', default_values_t = [1u8, 2], value_parser = super::channel_parser())]
    pub channels: Vec<u8>,

    /// 扫描的物理量
    #[arg(long, value_enum, default_value_t = ScanQuantity::Position)]
    pub quantity: ScanQuantity,

    /// 起点（nm 或 V）
    #[arg(long, default_value_t = 0.0)]
    pub from: f64,

    /// 终点（nm 或 V）
    #[arg(long, default_value_t = 30_000.0)]
    pub to: f64,

    /// 步长（nm 或 V）
    #[arg(long, default_value_t = 1_000.0)]
    pub step: f64,

    /// 每个设定点的停留时间（ms）
    #[arg(long, default_value_t = 100)]
    pub dwell_ms: u64,

    /// 跳过归零（控制器必须已处于闭环）
    #[arg(long)]
    pub skip_zero: bool,
}

impl ScanCommand {
    /// 执行扫描；`running` 被清除时提前停止
    pub fn execute<T: Transport>(
        &self,
        controller: &mut ChannelController<T>,
        running: &AtomicBool,
    ) -> Result<()> {
        let points = scan_points(self.from, self.to, self.step)?;
        self.check_calibration(controller)?;
        let result = self.run(controller, running, &points);

        println!("🛑 复位所有通道（开环，0 V）...");
        let shutdown = controller.shutdown();
        result?;
        shutdown?;
        println!("✅ 扫描完成，串口已关闭");
        Ok(())
    }

    /// 扫描终点不能超过任一通道的标定量程（在任何 I/O 之前检查）
    fn check_calibration<T: Transport>(&self, controller: &ChannelController<T>) -> Result<()> {
        for &ch in &self.channels {
            let calibration = controller.channel(ch)?.calibration();
            let (max, unit) = match self.quantity {
                ScanQuantity::Position => (calibration.max_position_nm, "nm"),
                ScanQuantity::Voltage => (calibration.max_voltage, "V"),
            };
            if self.to > max {
                bail!(
                    "通道 {} 的扫描终点 {} {} 超出量程 [0, {}]",
                    ch,
                    self.to,
                    unit,
                    max
                );
            }
        }
        Ok(())
    }

    fn run<T: Transport>(
        &self,
        controller: &mut ChannelController<T>,
        running: &AtomicBool,
        points: &[f64],
    ) -> Result<()> {
        if self.quantity == ScanQuantity::Position {
            self.prepare_closed_loop(controller)?;
        }

        let dwell = Duration::from_millis(self.dwell_ms);
        for &ch in &self.channels {
            println!(
                "⏳ 扫描通道 {}: {} → {} → {}",
                ch,
                self.from,
                self.to,
                self.from
            );
            for &value in points {
                if !running.load(Ordering::SeqCst) {
                    warn!("Scan interrupted on channel {}", ch);
                    println!("⚠️  扫描已中断");
                    return Ok(());
                }
                match self.quantity {
                    ScanQuantity::Position => controller.position(ch, value)?,
                    ScanQuantity::Voltage => controller.set_output_voltage(ch, value)?,
                }
                if !dwell.is_zero() {
                    std::thread::sleep(dwell);
                }
            }
        }
        Ok(())
    }

    fn prepare_closed_loop<T: Transport>(&self, controller: &mut ChannelController<T>) -> Result<()> {
        if self.skip_zero {
            for &ch in &self.channels {
                ensure_zeroed(controller, ch)?;
            }
            return Ok(());
        }

        for &ch in &self.channels {
            controller.zero(ch)?;
        }
        for &ch in &self.channels {
            controller.wait_zeroed(ch)?;
            println!("✅ 通道 {} 归零完成", ch);
        }
        Ok(())
    }
}
