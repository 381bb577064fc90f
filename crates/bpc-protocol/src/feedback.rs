//! 应答帧解析
//!
//! 状态应答（6 字节）：状态字节位于偏移 3。
//! 数值应答（10 字节）：数值为最后 2 字节，小端。

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::constants::VALUE_REPLY_LEN;
use crate::{AptFrame, ProtocolError};

/// 位置控制模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum PositionControlMode {
    /// 开环
    OpenLoop = 0x01,
    /// 闭环（归零完成后控制器进入此模式）
    ClosedLoop = 0x02,
    /// 平滑切换到开环
    OpenLoopSmooth = 0x03,
    /// 平滑切换到闭环
    ClosedLoopSmooth = 0x04,
}

impl PositionControlMode {
    /// 解析状态字节
    pub fn from_status(status: u8) -> Result<Self, ProtocolError> {
        Self::try_from_primitive(status).map_err(|e| ProtocolError::InvalidValue {
            field: "PositionControlMode".to_string(),
            value: u16::from(e.number),
        })
    }

    /// 是否处于闭环
    pub fn is_closed_loop(self) -> bool {
        matches!(self, Self::ClosedLoop | Self::ClosedLoopSmooth)
    }
}

/// 通道使能状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum EnableState {
    Enabled = 0x01,
    Disabled = 0x02,
}

impl EnableState {
    /// 解析状态字节
    pub fn from_status(status: u8) -> Result<Self, ProtocolError> {
        Self::try_from_primitive(status).map_err(|e| ProtocolError::InvalidValue {
            field: "EnableState".to_string(),
            value: u16::from(e.number),
        })
    }
}

/// 状态应答（模式/使能查询）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusReply {
    pub message_id: u16,
    pub source: u8,
    /// 偏移 3 处的状态字节
    pub status: u8,
}

impl StatusReply {
    /// 解释为位置控制模式
    pub fn mode(&self) -> Result<PositionControlMode, ProtocolError> {
        PositionControlMode::from_status(self.status)
    }

    /// 解释为使能状态
    pub fn enable_state(&self) -> Result<EnableState, ProtocolError> {
        EnableState::from_status(self.status)
    }
}

impl From<&AptFrame> for StatusReply {
    fn from(frame: &AptFrame) -> Self {
        Self {
            message_id: frame.message_id,
            source: frame.source,
            status: frame.status_byte(),
        }
    }
}

/// 数值应答（位置/电压查询）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueReply {
    pub message_id: u16,
    pub source: u8,
    /// 应答最后 2 字节（小端）
    pub raw: [u8; 2],
}

impl ValueReply {
    /// 按无符号解析（位置）
    pub fn as_unsigned(&self) -> u16 {
        u16::from_le_bytes(self.raw)
    }

    /// 按有符号解析（电压）
    pub fn as_signed(&self) -> i16 {
        i16::from_le_bytes(self.raw)
    }
}

impl TryFrom<&AptFrame> for ValueReply {
    type Error = ProtocolError;

    fn try_from(frame: &AptFrame) -> Result<Self, Self::Error> {
        let n = frame.data.len();
        if n < 2 {
            return Err(ProtocolError::InvalidLength {
                expected: VALUE_REPLY_LEN,
                actual: frame.wire_len(),
            });
        }

        Ok(Self {
            message_id: frame.message_id,
            source: frame.source,
            raw: [frame.data[n - 2], frame.data[n - 1]],
        })
    }
}
