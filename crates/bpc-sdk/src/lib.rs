//! BPC SDK - Thorlabs BPC203 压电控制器 Rust SDK
//!
//! 通过 APT 二进制协议（串口，115200 baud）驱动三通道压电控制器。
//!
//! # 架构设计
//!
//! 本 SDK 采用分层架构，从底层到高层：
//!
//! - **协议层** (`protocol`): APT 帧编码/解码、opcode 表、单位换算
//! - **传输层** (`serial`): 字节流传输抽象，支持串口和 Mock
//! - **驱动层** (`driver`): 会话管理、请求/应答、帧钩子
//! - **客户端层** (`client`): 通道状态机、归零、位置/电压控制
//!
//! # 快速开始
//!
//! ```no_run
//! use bpc_sdk::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! bpc_sdk::init_logger()?;
//!
//! let session = SessionBuilder::new().port("/dev/ttyUSB0").build()?;
//! let mut controller = ChannelController::new(session);
//!
//! controller.zero(1)?;
//! controller.wait_zeroed(1)?;
//! controller.position(1, 10_000.0)?;
//! controller.shutdown()?;
//! # Ok(())
//! # }
//! ```

pub use bpc_client as client;
pub use bpc_driver as driver;
pub use bpc_protocol as protocol;
pub use bpc_serial as serial;

mod logging;

// Prelude 模块
pub mod prelude;

pub use logging::{LoggerError, init_logger, init_logger_with};

// --- 用户以此为界 ---

pub use client::{
    Calibration, ChannelController, ChannelId, ChannelState, ClientError, ControllerConfig,
};
pub use driver::{DriverError, Session};
pub use protocol::{AptFrame, ProtocolError};
pub use serial::{Transport, TransportError};

#[cfg(feature = "serialport")]
pub use driver::SessionBuilder;
#[cfg(feature = "serialport")]
pub use serial::{SerialConfig, SerialTransport};

/// 串口控制器的类型别名
#[cfg(feature = "serialport")]
pub type SerialController = ChannelController<SerialTransport>;
