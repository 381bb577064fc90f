//! 关闭命令
//!
//! 所有通道切到开环，电压斜坡到 0，然后关闭串口

use anyhow::{Context, Result};
use bpc_sdk::ChannelController;
use bpc_sdk::serial::Transport;
use clap::Args;

/// 关闭命令参数
#[derive(Args, Debug)]
pub struct ShutdownCommand {}

impl ShutdownCommand {
    pub fn execute<T: Transport>(&self, controller: &mut ChannelController<T>) -> Result<()> {
        println!("🛑 复位所有通道（开环，0 V）...");
        controller.shutdown().context("关闭序列未完全成功")?;
        println!("✅ 串口已关闭，电压已复位");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::mock_controller;

    #[test]
    fn test_shutdown_closes_port_even_on_error() {
        let (mut controller, mock) = mock_controller();
        assert!(ShutdownCommand {}.execute(&mut controller).is_err());
        assert_eq!(mock.close_count(), 1);
    }
}
