//! 归零命令

use anyhow::{Context, Result};
use bpc_sdk::ChannelController;
use bpc_sdk::serial::Transport;
use clap::Args;

/// 归零命令参数
#[derive(Args, Debug)]
pub struct ZeroCommand {
    /// 通道号（1-3），可指定多个
    #[arg(required = true, num_args = 1.., value_parser = super::channel_parser())]
    pub channels: Vec<u8>,

    /// 阻塞等待归零完成（间隔和超时取自标定配置）
    #[arg(short, long)]
    pub wait: bool,
}

impl ZeroCommand {
    pub fn execute<T: Transport>(&self, controller: &mut ChannelController<T>) -> Result<()> {
        // 先全部启动，再逐个等待，多个通道的归零可以并行进行
        for &ch in &self.channels {
            controller.zero(ch)?;
            println!("⏳ 通道 {} 开始归零", ch);
        }

        if !self.wait {
            println!("💡 使用 `mode <channel>` 查询：闭环即表示归零完成");
            return Ok(());
        }

        for &ch in &self.channels {
            controller
                .wait_zeroed(ch)
                .with_context(|| format!("等待通道 {} 归零失败", ch))?;
            println!("✅ 通道 {} 归零完成", ch);
        }
        Ok(())
    }
}
