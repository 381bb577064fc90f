//! 电压命令

use std::time::Duration;

use anyhow::Result;
use bpc_sdk::ChannelController;
use bpc_sdk::serial::Transport;
use clap::Subcommand;

/// 电压命令
#[derive(Subcommand, Debug)]
pub enum VoltageCommand {
    /// 读取输出电压
    Get {
        /// 通道号（1-3），省略时查询全部通道
        #[arg(value_parser = super::channel_parser())]
        channel: Option<u8>,
    },

    /// 设置输出电压（不要求归零）
    Set {
        /// 通道号（1-3）
        #[arg(value_parser = super::channel_parser())]
        channel: u8,

        /// 目标电压（V）
        #[arg(allow_negative_numbers = true)]
        volts: f64,
    },

    /// 从当前电压线性斜坡到目标电压
    Ramp {
        /// 通道号（1-3）
        #[arg(value_parser = super::channel_parser())]
        channel: u8,

        /// 目标电压（V）
        #[arg(allow_negative_numbers = true)]
        target: f64,

        /// 步数（默认取标定配置中的 ramp_steps）
        #[arg(long)]
        steps: Option<u32>,

        /// 每步间隔（ms，默认取标定配置中的 ramp_delay_ms）
        #[arg(long)]
        delay_ms: Option<u64>,
    },
}

impl VoltageCommand {
    pub fn execute<T: Transport>(&self, controller: &mut ChannelController<T>) -> Result<()> {
        match *self {
            VoltageCommand::Get { channel } => {
                let channels = channel.map_or_else(|| vec![1, 2, 3], |ch| vec![ch]);
                println!("📊 输出电压:");
                for ch in channels {
                    let volts = controller.get_voltage(ch)?;
                    println!("  CH{}: {:.3} V", ch, volts);
                }
            },

            VoltageCommand::Set { channel, volts } => {
                controller.set_output_voltage(channel, volts)?;
                println!("✅ 通道 {} → {} V", channel, volts);
            },

            VoltageCommand::Ramp {
                channel,
                target,
                steps,
                delay_ms,
            } => {
                let steps = steps.unwrap_or(controller.config().ramp_steps);
                let delay = delay_ms
                    .map(Duration::from_millis)
                    .unwrap_or_else(|| controller.config().ramp_delay());
                println!("⏳ 通道 {} 斜坡到 {} V（{} 步）", channel, target, steps);
                controller.ramp_voltage(channel, target, steps, delay)?;
                println!("✅ 完成");
            },
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::mock_controller;

    #[test]
    fn test_set_voltage() {
        let (mut controller, mock) = mock_controller();
        VoltageCommand::Set {
            channel: 1,
            volts: 75.0,
        }
        .execute(&mut controller)
        .unwrap();
        assert_eq!(
            mock.writes(),
            vec![vec![0x43, 0x06, 0x04, 0x00, 0xA1, 0x01, 0x01, 0x00, 0xFF, 0x7F]]
        );
    }

    #[test]
    fn test_set_voltage_out_of_range() {
        let (mut controller, mock) = mock_controller();
        let result = VoltageCommand::Set {
            channel: 1,
            volts: -3.0,
        }
        .execute(&mut controller);
        assert!(result.is_err());
        assert_eq!(mock.write_count(), 0);
    }

    #[test]
    fn test_ramp_with_explicit_steps() {
        let (mut controller, mock) = mock_controller();
        // 当前读数 0 V
        mock.push_reply(&[0x45, 0x06, 0x04, 0x00, 0x81, 0x50, 0x01, 0x00, 0x00, 0x00]);

        VoltageCommand::Ramp {
            channel: 2,
            target: 30.0,
            steps: Some(3),
            delay_ms: Some(0),
        }
        .execute(&mut controller)
        .unwrap();

        // 1 次查询 + 4 个设定点
        assert_eq!(mock.write_count(), 5);
    }
}
