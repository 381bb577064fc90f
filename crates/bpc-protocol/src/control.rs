//! 控制帧构建
//!
//! 每种指令对应一个结构体，通过 [`Command::to_frame`] 生成 [`AptFrame`]。
//! 源地址由会话层在发送时传入。

use crate::codec::{build_frame, int_to_le_bytes};
use crate::constants::BAY_CHANNEL_IDENT;
use crate::feedback::{EnableState, PositionControlMode};
use crate::ids::MessageId;
use crate::scaling::ScaledValue;
use crate::{AptFrame, ProtocolError};

/// 可编码为 APT 帧的指令
pub trait Command {
    /// 消息 ID
    fn message_id(&self) -> MessageId;

    /// 构建帧
    fn to_frame(&self, source: u8) -> Result<AptFrame, ProtocolError>;
}

/// 识别指令 (0x0223)
///
/// 发往控制器整体地址，通道号以 2 字节有符号小端写入 param1/param2。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentifyCommand {
    pub dest: u8,
    pub channel: u8,
}

impl Command for IdentifyCommand {
    fn message_id(&self) -> MessageId {
        MessageId::Identify
    }

    fn to_frame(&self, source: u8) -> Result<AptFrame, ProtocolError> {
        let channel = int_to_le_bytes(i64::from(self.channel), 2)?;
        build_frame(self.message_id(), [channel[0], channel[1]], self.dest, source, &[])
    }
}

/// 通道使能指令 (0x0210)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelEnableCommand {
    pub bay: u8,
    pub state: EnableState,
}

impl ChannelEnableCommand {
    pub fn enable(bay: u8) -> Self {
        Self {
            bay,
            state: EnableState::Enabled,
        }
    }

    pub fn disable(bay: u8) -> Self {
        Self {
            bay,
            state: EnableState::Disabled,
        }
    }
}

impl Command for ChannelEnableCommand {
    fn message_id(&self) -> MessageId {
        MessageId::SetChannelEnableState
    }

    fn to_frame(&self, source: u8) -> Result<AptFrame, ProtocolError> {
        build_frame(
            self.message_id(),
            [BAY_CHANNEL_IDENT, self.state.into()],
            self.bay,
            source,
            &[],
        )
    }
}

/// 位置控制模式设置指令 (0x0640)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionControlModeCommand {
    pub bay: u8,
    pub mode: PositionControlMode,
}

impl Command for PositionControlModeCommand {
    fn message_id(&self) -> MessageId {
        MessageId::SetPosControlMode
    }

    fn to_frame(&self, source: u8) -> Result<AptFrame, ProtocolError> {
        build_frame(
            self.message_id(),
            [BAY_CHANNEL_IDENT, self.mode.into()],
            self.bay,
            source,
            &[],
        )
    }
}

/// 归零指令 (0x0658)
///
/// 归零完成后控制器自动切换到闭环模式。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZeroCommand {
    pub bay: u8,
}

impl Command for ZeroCommand {
    fn message_id(&self) -> MessageId {
        MessageId::SetZero
    }

    fn to_frame(&self, source: u8) -> Result<AptFrame, ProtocolError> {
        build_frame(self.message_id(), [BAY_CHANNEL_IDENT, 0x00], self.bay, source, &[])
    }
}

/// 查询指令（模式、使能状态、位置、电压）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestCommand {
    pub id: MessageId,
    pub bay: u8,
}

impl RequestCommand {
    pub fn mode(bay: u8) -> Self {
        Self {
            id: MessageId::ReqPosControlMode,
            bay,
        }
    }

    pub fn enable_state(bay: u8) -> Self {
        Self {
            id: MessageId::ReqChannelEnableState,
            bay,
        }
    }

    pub fn position(bay: u8) -> Self {
        Self {
            id: MessageId::ReqOutputPos,
            bay,
        }
    }

    pub fn voltage(bay: u8) -> Self {
        Self {
            id: MessageId::ReqOutputVolts,
            bay,
        }
    }

    /// 期望的应答长度
    pub fn reply_len(&self) -> Result<usize, ProtocolError> {
        self.id.reply_len().ok_or_else(|| ProtocolError::InvalidValue {
            field: "RequestCommand".to_string(),
            value: self.id.code(),
        })
    }
}

impl Command for RequestCommand {
    fn message_id(&self) -> MessageId {
        self.id
    }

    fn to_frame(&self, source: u8) -> Result<AptFrame, ProtocolError> {
        build_frame(self.id, [BAY_CHANNEL_IDENT, 0x00], self.bay, source, &[])
    }
}

/// 数值数据包：2 字节通道标识 + 2 字节定点值
fn value_data(value: ScaledValue) -> Result<Vec<u8>, ProtocolError> {
    let mut data = int_to_le_bytes(i64::from(BAY_CHANNEL_IDENT), 2)?;
    data.extend_from_slice(&value.to_le_bytes());
    Ok(data)
}

/// 输出位置设置指令 (0x0646，长帧)
///
/// 仅在闭环模式下生效。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputPositionCommand {
    pub bay: u8,
    pub value: ScaledValue,
}

impl Command for OutputPositionCommand {
    fn message_id(&self) -> MessageId {
        MessageId::SetOutputPos
    }

    fn to_frame(&self, source: u8) -> Result<AptFrame, ProtocolError> {
        build_frame(self.message_id(), [0x00, 0x00], self.bay, source, &value_data(self.value)?)
    }
}

/// 输出电压设置指令 (0x0643，长帧)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputVoltageCommand {
    pub bay: u8,
    pub value: ScaledValue,
}

impl Command for OutputVoltageCommand {
    fn message_id(&self) -> MessageId {
        MessageId::SetOutputVolts
    }

    fn to_frame(&self, source: u8) -> Result<AptFrame, ProtocolError> {
        build_frame(self.message_id(), [0x00, 0x00], self.bay, source, &value_data(self.value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{CONTROLLER_ADDRESS, HOST_ADDRESS};
    use crate::scaling::position_to_scaled;

    #[test]
    fn test_identify_frame() {
        let cmd = IdentifyCommand {
            dest: CONTROLLER_ADDRESS,
            channel: 2,
        };
        let frame = cmd.to_frame(HOST_ADDRESS).unwrap();
        assert_eq!(frame.to_bytes(), vec![0x23, 0x02, 0x02, 0x00, 0x50, 0x01]);
    }

    #[test]
    fn test_enable_disable_frames() {
        let enable = ChannelEnableCommand::enable(0x21).to_frame(HOST_ADDRESS).unwrap();
        assert_eq!(enable.to_bytes(), vec![0x10, 0x02, 0x01, 0x01, 0x21, 0x01]);

        let disable = ChannelEnableCommand::disable(0x22).to_frame(HOST_ADDRESS).unwrap();
        assert_eq!(disable.to_bytes(), vec![0x10, 0x02, 0x01, 0x02, 0x22, 0x01]);
    }

    #[test]
    fn test_mode_frame() {
        let cmd = PositionControlModeCommand {
            bay: 0x23,
            mode: PositionControlMode::ClosedLoopSmooth,
        };
        let frame = cmd.to_frame(HOST_ADDRESS).unwrap();
        assert_eq!(frame.to_bytes(), vec![0x40, 0x06, 0x01, 0x04, 0x23, 0x01]);
    }

    #[test]
    fn test_zero_frame() {
        let frame = ZeroCommand { bay: 0x21 }.to_frame(HOST_ADDRESS).unwrap();
        assert_eq!(frame.to_bytes(), vec![0x58, 0x06, 0x01, 0x00, 0x21, 0x01]);
    }

    #[test]
    fn test_request_frames() {
        let cases = [
            (RequestCommand::mode(0x21), [0x41, 0x06], 6),
            (RequestCommand::enable_state(0x21), [0x11, 0x02], 6),
            (RequestCommand::position(0x21), [0x47, 0x06], 10),
            (RequestCommand::voltage(0x21), [0x44, 0x06], 10),
        ];
        for (cmd, id, reply_len) in cases {
            let bytes = cmd.to_frame(HOST_ADDRESS).unwrap().to_bytes();
            assert_eq!(bytes, vec![id[0], id[1], 0x01, 0x00, 0x21, 0x01]);
            assert_eq!(cmd.reply_len().unwrap(), reply_len);
        }
    }

    #[test]
    fn test_request_reply_len_rejects_non_query() {
        let cmd = RequestCommand {
            id: MessageId::SetZero,
            bay: 0x21,
        };
        assert!(cmd.reply_len().is_err());
    }

    #[test]
    fn test_half_travel_position_frame() {
        let value = position_to_scaled(15_000.0, 30_000.0).unwrap();
        let cmd = OutputPositionCommand { bay: 0x21, value };
        let bytes = cmd.to_frame(HOST_ADDRESS).unwrap().to_bytes();

        assert_eq!(&bytes[..6], &[0x46, 0x06, 0x04, 0x00, 0xA1, 0x01]);
        assert_eq!(&bytes[6..8], &[0x01, 0x00]);
        assert_eq!(&bytes[8..], &value.to_le_bytes());
    }

    #[test]
    fn test_voltage_frame() {
        let cmd = OutputVoltageCommand {
            bay: 0x22,
            value: ScaledValue::new(0x1234),
        };
        let bytes = cmd.to_frame(HOST_ADDRESS).unwrap().to_bytes();
        assert_eq!(
            bytes,
            vec![0x43, 0x06, 0x04, 0x00, 0xA2, 0x01, 0x01, 0x00, 0x34, 0x12]
        );
    }
}
