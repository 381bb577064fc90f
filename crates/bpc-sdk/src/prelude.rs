//! Prelude - 常用类型的便捷导入
//!
//! ```rust
//! use bpc_sdk::prelude::*;
//! ```

// 客户端层（推荐使用）
pub use crate::client::{
    Calibration, Channel, ChannelController, ChannelId, ChannelState, ControllerConfig, LoopMode,
};

// 协议层常用类型
pub use crate::protocol::{EnableState, PositionControlMode};

// 驱动层 / 传输层
pub use crate::driver::Session;
#[cfg(feature = "serialport")]
pub use crate::driver::SessionBuilder;
pub use crate::serial::Transport;

// 错误类型
pub use crate::client::ClientError;
pub use crate::driver::DriverError;
pub use crate::protocol::ProtocolError;
pub use crate::serial::TransportError;
