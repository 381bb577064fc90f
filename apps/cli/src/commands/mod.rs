//! 命令定义和实现
//!
//! 除 `config` 外，每个命令都接收一个已打开的 [`ChannelController`]，
//! 对传输类型保持泛型，测试中使用 Mock 传输。

pub mod channel;
pub mod config;
pub mod r#move;
pub mod position;
pub mod scan;
pub mod shutdown;
pub mod voltage;
pub mod zero;

pub use channel::{ChannelCommand, ModeCommand};
pub use config::ConfigCommand;
pub use r#move::MoveCommand;
pub use position::PositionCommand;
pub use scan::ScanCommand;
pub use shutdown::ShutdownCommand;
pub use voltage::VoltageCommand;
pub use zero::ZeroCommand;

/// 通道号参数解析（1..=3）
pub(crate) fn channel_parser() -> clap::builder::RangedI64ValueParser<u8> {
    clap::value_parser!(u8).range(1..=3)
}

#[cfg(test)]
pub(crate) mod test_support {
    use bpc_sdk::ChannelController;
    use bpc_sdk::driver::Session;
    use bpc_sdk::serial::MockTransport;

    pub fn mock_controller() -> (ChannelController<MockTransport>, MockTransport) {
        let mock = MockTransport::new();
        let mut session = Session::new(mock.clone());
        session.open().unwrap();
        (ChannelController::new(session), mock)
    }

    pub fn closed_loop_reply(bay: u8) -> [u8; 6] {
        [0x41, 0x06, 0x01, 0x02, bay, 0x01]
    }

    pub fn enabled_reply(bay: u8) -> [u8; 6] {
        [0x12, 0x02, 0x01, 0x01, bay, 0x01]
    }
}
