//! 驱动层模块
//!
//! 本模块提供 BPC203 控制器的会话管理，包括：
//! - 传输句柄与主机/控制器地址的所有权（[`Session`]）
//! - 帧的编码发送与定长应答的读取解码
//! - 钩子系统：每一帧收发时触发自定义回调（如十六进制转储）
//!
//! # 使用场景
//!
//! 适用于需要直接收发 APT 帧的场景。
//! 大多数用户应该使用 `bpc-client` 提供的通道控制器。

#[cfg(feature = "serialport")]
mod builder;
mod error;
pub mod hooks;
mod session;

#[cfg(feature = "serialport")]
pub use builder::SessionBuilder;
pub use error::DriverError;
pub use hooks::{FrameCallback, FrameDirection, HexDumpHook, HookManager};
pub use session::Session;
