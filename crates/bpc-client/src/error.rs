//! 客户端错误类型

use std::fmt;
use std::time::Duration;

use bpc_driver::DriverError;
use bpc_protocol::ProtocolError;
use bpc_serial::TransportError;
use thiserror::Error;

use crate::state::ChannelState;

/// 受范围约束的物理量
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantity {
    /// 位置（nm）
    Position,
    /// 输出电压（V）
    Voltage,
}

impl Quantity {
    pub fn unit(self) -> &'static str {
        match self {
            Quantity::Position => "nm",
            Quantity::Voltage => "V",
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::Position => write!(f, "position"),
            Quantity::Voltage => write!(f, "voltage"),
        }
    }
}

/// 客户端错误
///
/// 除 [`ClientError::Driver`] 外，所有错误都在写出任何字节之前产生。
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Invalid channel {0}: expected 1, 2 or 3")]
    InvalidChannel(u8),

    #[error("{quantity} {value} {unit} out of range [{min}, {max}]", unit = .quantity.unit())]
    OutOfRange {
        quantity: Quantity,
        value: f64,
        min: f64,
        max: f64,
    },

    /// 位置指令要求通道已完成归零
    #[error("Channel {channel} is {state}; zeroing must complete before position commands")]
    PreconditionNotMet { channel: u8, state: ChannelState },

    #[error("Zeroing of channel {channel} did not complete within {timeout:?}")]
    ZeroTimeout { channel: u8, timeout: Duration },

    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// 是否为传输层故障（原样透传，未经解释）
    pub fn is_transport_failure(&self) -> bool {
        matches!(self, ClientError::Driver(DriverError::Transport(_)))
    }
}

impl From<TransportError> for ClientError {
    fn from(err: TransportError) -> Self {
        ClientError::Driver(DriverError::Transport(err))
    }
}

impl From<ProtocolError> for ClientError {
    fn from(err: ProtocolError) -> Self {
        ClientError::Driver(DriverError::Protocol(err))
    }
}
