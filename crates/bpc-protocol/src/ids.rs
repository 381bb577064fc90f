//! 消息 ID 常量定义和枚举
//!
//! 集中定义所有 opcode，并提供帧形态（短帧/长帧）与应答长度查询。

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::constants::{STATUS_REPLY_LEN, VALUE_REPLY_LEN};

// ============================================================================
// 通用模块指令
// ============================================================================

/// 闪烁前面板，用于识别控制器/通道
pub const ID_MOD_IDENTIFY: u16 = 0x0223;

/// 设置通道使能状态
pub const ID_MOD_SET_CHANENABLESTATE: u16 = 0x0210;

/// 查询通道使能状态
pub const ID_MOD_REQ_CHANENABLESTATE: u16 = 0x0211;

// ============================================================================
// 压电控制指令
// ============================================================================

/// 设置位置控制模式（开环/闭环）
pub const ID_PZ_SET_POSCONTROLMODE: u16 = 0x0640;

/// 查询位置控制模式
pub const ID_PZ_REQ_POSCONTROLMODE: u16 = 0x0641;

/// 设置输出电压（长帧）
pub const ID_PZ_SET_OUTPUTVOLTS: u16 = 0x0643;

/// 查询输出电压
pub const ID_PZ_REQ_OUTPUTVOLTS: u16 = 0x0644;

/// 设置输出位置（长帧）
pub const ID_PZ_SET_OUTPUTPOS: u16 = 0x0646;

/// 查询输出位置
pub const ID_PZ_REQ_OUTPUTPOS: u16 = 0x0647;

/// 启动归零流程
pub const ID_PZ_SET_ZERO: u16 = 0x0658;

/// 数值指令的数据包长度：2 字节通道标识 + 2 字节定点值
pub const VALUE_DATA_LEN: u16 = 4;

/// 帧形态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameShape {
    /// 仅 6 字节头部，参数内联在 param1/param2
    Short,
    /// 头部 + 定长数据包
    Long { data_len: u16 },
}

/// 消息 ID 枚举（逻辑名 → opcode）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u16)]
pub enum MessageId {
    Identify = 0x0223,
    SetChannelEnableState = 0x0210,
    ReqChannelEnableState = 0x0211,
    SetPosControlMode = 0x0640,
    ReqPosControlMode = 0x0641,
    SetOutputVolts = 0x0643,
    ReqOutputVolts = 0x0644,
    SetOutputPos = 0x0646,
    ReqOutputPos = 0x0647,
    SetZero = 0x0658,
}

impl MessageId {
    /// 线上 opcode
    pub fn code(self) -> u16 {
        self.into()
    }

    /// 帧形态
    pub fn frame_shape(self) -> FrameShape {
        match self {
            MessageId::SetOutputVolts | MessageId::SetOutputPos => FrameShape::Long {
                data_len: VALUE_DATA_LEN,
            },
            _ => FrameShape::Short,
        }
    }

    /// 查询指令期望的应答长度；非查询指令返回 `None`
    pub fn reply_len(self) -> Option<usize> {
        match self {
            MessageId::ReqPosControlMode | MessageId::ReqChannelEnableState => {
                Some(STATUS_REPLY_LEN)
            },
            MessageId::ReqOutputVolts | MessageId::ReqOutputPos => Some(VALUE_REPLY_LEN),
            _ => None,
        }
    }

    /// 协议手册中的消息名称（用于日志）
    pub fn name(self) -> &'static str {
        match self {
            MessageId::Identify => "MGMSG_MOD_IDENTIFY",
            MessageId::SetChannelEnableState => "MGMSG_MOD_SET_CHANENABLESTATE",
            MessageId::ReqChannelEnableState => "MGMSG_MOD_REQ_CHANENABLESTATE",
            MessageId::SetPosControlMode => "MGMSG_PZ_SET_POSCONTROLMODE",
            MessageId::ReqPosControlMode => "MGMSG_PZ_REQ_POSCONTROLMODE",
            MessageId::SetOutputVolts => "MGMSG_PZ_SET_OUTPUTVOLTS",
            MessageId::ReqOutputVolts => "MGMSG_PZ_REQ_OUTPUTVOLTS",
            MessageId::SetOutputPos => "MGMSG_PZ_SET_OUTPUTPOS",
            MessageId::ReqOutputPos => "MGMSG_PZ_REQ_OUTPUTPOS",
            MessageId::SetZero => "MGMSG_PZ_SET_ZERO",
        }
    }
}
