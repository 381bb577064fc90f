//! 客户端接口模块
//!
//! 本模块提供 BPC203 压电控制器的用户友好接口，包括：
//! - 通道注册表（通道号 1..3 → bay 地址，唯一的校验入口）
//! - 每通道状态机：`Disabled → Enabled → ZeroRequested → ClosedLoopReady`
//! - 物理单位（nm、V）的读写与电压斜坡
//! - TOML 标定配置
//!
//! # 使用场景
//!
//! 这是大多数用户应该使用的模块。
//! 如果需要直接收发 APT 帧，可以使用 `bpc-driver` 的 [`Session`](bpc_driver::Session)。
//!
//! # 示例
//!
//! ```no_run
//! use bpc_client::ChannelController;
//! use bpc_driver::SessionBuilder;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let session = SessionBuilder::new().port("/dev/ttyUSB0").build()?;
//! let mut controller = ChannelController::new(session);
//!
//! controller.zero(1)?;
//! controller.wait_zeroed(1)?;
//! controller.position(1, 15_000.0)?;
//! println!("{} nm", controller.get_position(1)?);
//!
//! controller.shutdown()?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod controller;
pub mod error;
pub mod registry;
pub mod state;

// 重新导出常用类型
pub use config::{Calibration, ChannelOverride, ControllerConfig};
pub use controller::ChannelController;
pub use error::{ClientError, Quantity};
pub use registry::{CHANNEL_COUNT, ChannelId, bay_address};
pub use state::{Channel, ChannelState, LoopMode};

/// 客户端结果类型
pub type Result<T> = std::result::Result<T, ClientError>;
