//! 驱动层错误类型定义

use bpc_protocol::ProtocolError;
use bpc_serial::TransportError;
use thiserror::Error;

/// 驱动层错误类型
#[derive(Error, Debug)]
pub enum DriverError {
    /// 传输层错误（原样向上传递，不做解释或重试）
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// 协议编解码错误
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}
