//! 位置查询命令

use anyhow::Result;
use bpc_sdk::ChannelController;
use bpc_sdk::serial::Transport;
use clap::Args;

/// 位置查询命令参数
#[derive(Args, Debug)]
pub struct PositionCommand {
    /// 通道号（1-3），省略时查询全部通道
    #[arg(value_parser = super::channel_parser())]
    pub channel: Option<u8>,
}

impl PositionCommand {
    pub fn execute<T: Transport>(&self, controller: &mut ChannelController<T>) -> Result<()> {
        let channels = match self.channel {
            Some(ch) => vec![ch],
            None => vec![1, 2, 3],
        };

        println!("📊 输出位置:");
        for ch in channels {
            let nm = controller.get_position(ch)?;
            println!("  CH{}: {} nm", ch, nm);
        }
        Ok(())
    }
}
