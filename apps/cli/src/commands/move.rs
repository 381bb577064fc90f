//! 移动命令

use anyhow::{Result, bail};
use bpc_sdk::ChannelController;
use bpc_sdk::protocol::EnableState;
use bpc_sdk::serial::Transport;
use clap::Args;

/// 移动命令参数
#[derive(Args, Debug)]
pub struct MoveCommand {
    /// 通道号（1-3）
    #[arg(value_parser = super::channel_parser())]
    pub channel: u8,

    /// 目标位置（nm）
    pub position_nm: f64,
}

impl MoveCommand {
    pub fn execute<T: Transport>(&self, controller: &mut ChannelController<T>) -> Result<()> {
        ensure_zeroed(controller, self.channel)?;
        controller.position(self.channel, self.position_nm)?;
        println!("✅ 通道 {} → {} nm", self.channel, self.position_nm);
        Ok(())
    }
}

/// 向控制器确认通道已使能且归零已完成
///
/// 每次运行都是新的会话，本地状态从 `Disabled` 开始，需要先同步使能状态再查询模式。
pub fn ensure_zeroed<T: Transport>(
    controller: &mut ChannelController<T>,
    channel: u8,
) -> Result<()> {
    if controller.get_enable_state(channel)? != EnableState::Enabled {
        bail!(
            "通道 {} 未使能，请先运行 `bpc-cli zero {} --wait`",
            channel,
            channel
        );
    }
    if !controller.poll_zero_status(channel)? {
        bail!(
            "通道 {} 尚未完成归零，请先运行 `bpc-cli zero {} --wait`",
            channel,
            channel
        );
    }
    Ok(())
}
