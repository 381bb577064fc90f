//! 识别、使能和模式命令

use anyhow::Result;
use bpc_sdk::ChannelController;
use bpc_sdk::serial::Transport;
use clap::{Args, ValueEnum};

/// 单通道命令参数
#[derive(Args, Debug)]
pub struct ChannelCommand {
    /// 通道号（1-3）
    #[arg(value_parser = super::channel_parser())]
    pub channel: u8,
}

impl ChannelCommand {
    /// 让控制器闪烁该通道的显示
    pub fn identify<T: Transport>(&self, controller: &mut ChannelController<T>) -> Result<()> {
        controller.identify(self.channel)?;
        println!("💡 通道 {} 正在闪烁", self.channel);
        Ok(())
    }

    pub fn enable<T: Transport>(&self, controller: &mut ChannelController<T>) -> Result<()> {
        controller.enable(self.channel)?;
        println!("✅ 通道 {} 已使能", self.channel);
        Ok(())
    }

    pub fn disable<T: Transport>(&self, controller: &mut ChannelController<T>) -> Result<()> {
        controller.disable(self.channel)?;
        println!("✅ 通道 {} 已禁用", self.channel);
        Ok(())
    }
}

/// 控制模式
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopArg {
    /// 开环（平滑切换）
    Open,
    /// 闭环（平滑切换）
    Closed,
}

/// 模式命令参数
#[derive(Args, Debug)]
pub struct ModeCommand {
    /// 通道号（1-3）
    #[arg(value_parser = super::channel_parser())]
    pub channel: u8,

    /// 目标模式；省略时查询当前模式
    #[arg(value_enum)]
    pub mode: Option<LoopArg>,
}

impl ModeCommand {
    pub fn execute<T: Transport>(&self, controller: &mut ChannelController<T>) -> Result<()> {
        match self.mode {
            Some(mode) => {
                controller.set_mode(self.channel, mode == LoopArg::Closed)?;
                println!("✅ 通道 {} 切换到 {:?}", self.channel, mode);
            },
            None => {
                let mode = controller.get_mode(self.channel)?;
                println!("通道 {}: {:?}", self.channel, mode);
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
    fn test_enable_and_disable() {
        let (mut controller, mock) = mock_controller();
        let cmd = ChannelCommand { channel: 2 };
        cmd.enable(&mut controller).unwrap();
        cmd.disable(&mut controller).unwrap();
        assert_eq!(
            mock.writes(),
            vec![
                vec![0x10, 0x02, 0x01, 0x01, 0x22, 0x01],
                vec![0x10, 0x02, 0x01, 0x02, 0x22, 0x01],
            ]
        );
    }

    #[test]
    fn test_mode_query_without_argument() {
        let (mut controller, mock) = mock_controller();
        mock.push_reply(&[0x42, 0x06, 0x01, 0x01, 0x21, 0x01]);

        let cmd = ModeCommand {
            channel: 1,
            mode: None,
        };
        cmd.execute(&mut controller).unwrap();
        assert_eq!(mock.writes(), vec![vec![0x41, 0x06, 0x01, 0x00, 0x21, 0x01]]);
    }

    #[test]
    fn test_mode_set_closed() {
        let (mut controller, mock) = mock_controller();
        let cmd = ModeCommand {
            channel: 3,
            mode: Some(LoopArg::Closed),
        };
        cmd.execute(&mut controller).unwrap();
        assert_eq!(mock.writes(), vec![vec![0x40, 0x06, 0x01, 0x04, 0x23, 0x01]]);
    }
}
