//! # BPC Protocol
//!
//! BPC203 压电控制器二进制 APT 协议定义（无硬件依赖）
//!
//! ## 模块
//!
//! - `ids`: 消息 ID（opcode）常量与帧形态表
//! - `constants`: 地址、帧长度、满量程等协议常量
//! - `codec`: 帧编码/解码与定宽整数转换
//! - `scaling`: 物理单位（nm、V）与 16 位定点值之间的换算
//! - `control`: 控制帧构建
//! - `feedback`: 应答帧解析
//!
//! ## 字节序
//!
//! 协议使用小端字节序（LSB 在前），包括 opcode、数据包长度和定点数值。

pub mod codec;
pub mod constants;
pub mod control;
pub mod feedback;
pub mod ids;
pub mod scaling;

// 重新导出常用类型
pub use codec::{build_frame, decode, encode_long, encode_short, int_to_le_bytes};
pub use constants::*;
pub use control::*;
pub use feedback::*;
pub use ids::*;
pub use scaling::*;

use thiserror::Error;

/// APT 协议帧的统一抽象
///
/// 6 字节头部 + 可选数据包：
///
/// ```text
/// 短帧: [id_lo, id_hi, param1, param2, dest,        source]
/// 长帧: [id_lo, id_hi, len_lo, len_hi, dest | 0x80, source, data...]
/// ```
///
/// 长帧中 `param1`/`param2` 保存数据包长度（小端），`dest` 的最高位为数据包标志位。
/// 字段保持线上的原始布局，`destination()` 返回去掉标志位后的地址。
///
/// # 示例
///
/// ```rust
/// use bpc_protocol::{AptFrame, ID_PZ_SET_ZERO};
///
/// let frame = AptFrame::short(ID_PZ_SET_ZERO, 0x01, 0x00, 0x21, 0x01);
/// assert_eq!(frame.to_bytes(), vec![0x58, 0x06, 0x01, 0x00, 0x21, 0x01]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AptFrame {
    /// 消息 ID（opcode）
    pub message_id: u16,
    /// 参数 1（长帧时为数据包长度低字节）
    pub param1: u8,
    /// 参数 2（长帧时为数据包长度高字节）
    pub param2: u8,
    /// 目的地址（长帧时带 0x80 标志位）
    pub dest: u8,
    /// 源地址
    pub source: u8,
    /// 数据包（短帧为空）
    pub data: Vec<u8>,
}

impl AptFrame {
    /// 创建短帧（仅头部）
    pub fn short(message_id: u16, param1: u8, param2: u8, dest: u8, source: u8) -> Self {
        Self {
            message_id,
            param1,
            param2,
            dest,
            source,
            data: Vec::new(),
        }
    }

    /// 创建长帧（头部 + 数据包）
    ///
    /// 自动设置 `dest` 的数据包标志位，并把数据包长度写入 `param1`/`param2`。
    ///
    /// # 错误
    ///
    /// 数据包超过 `u16::MAX` 字节时返回 [`ProtocolError::PayloadTooLong`]。
    pub fn long(message_id: u16, dest: u8, source: u8, data: &[u8]) -> Result<Self, ProtocolError> {
        let len = u16::try_from(data.len())
            .map_err(|_| ProtocolError::PayloadTooLong { len: data.len() })?;
        let [len_lo, len_hi] = len.to_le_bytes();

        Ok(Self {
            message_id,
            param1: len_lo,
            param2: len_hi,
            dest: dest | DATA_PACKET_FLAG,
            source,
            data: data.to_vec(),
        })
    }

    /// 是否带数据包
    pub fn has_data(&self) -> bool {
        self.dest & DATA_PACKET_FLAG != 0
    }

    /// 目的地址（去掉数据包标志位）
    pub fn destination(&self) -> u8 {
        self.dest & !DATA_PACKET_FLAG
    }

    /// 头部声明的数据包长度
    ///
    /// 仅对长帧有意义；短帧返回 `None`。
    pub fn declared_data_len(&self) -> Option<u16> {
        self.has_data()
            .then(|| u16::from_le_bytes([self.param1, self.param2]))
    }

    /// 状态字节（线上偏移 [`STATUS_BYTE_OFFSET`]）
    pub fn status_byte(&self) -> u8 {
        self.header()[STATUS_BYTE_OFFSET]
    }

    /// 线上 6 字节头部
    pub fn header(&self) -> [u8; HEADER_LEN] {
        encode_short(
            self.message_id,
            self.param1,
            self.param2,
            self.dest,
            self.source,
        )
    }

    /// 帧总长度（字节）
    pub fn wire_len(&self) -> usize {
        HEADER_LEN + self.data.len()
    }

    /// 编码为线上字节
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.wire_len());
        bytes.extend_from_slice(&self.header());
        bytes.extend_from_slice(&self.data);
        bytes
    }
}

/// 协议编解码错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProtocolError {
    #[error("Invalid frame length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("Value {value} does not fit in {width} signed byte(s) [{min}, {max}]")]
    ValueOutOfRange {
        value: i64,
        width: usize,
        min: i64,
        max: i64,
    },

    #[error("Unsupported integer width: {0} byte(s)")]
    UnsupportedWidth(usize),

    #[error("Invalid value for field {field}: {value}")]
    InvalidValue { field: String, value: u16 },

    #[error("Payload too long: {len} bytes")]
    PayloadTooLong { len: usize },

    #[error("Invalid scale maximum for {quantity}: {max}")]
    InvalidScale { quantity: &'static str, max: f64 },

    #[error("Value for {quantity} is not finite")]
    NotFinite { quantity: &'static str },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_frame_layout() {
        let frame = AptFrame::short(0x0641, 0x01, 0x00, 0x22, 0x01);
        assert!(!frame.has_data());
        assert_eq!(frame.destination(), 0x22);
        assert_eq!(frame.declared_data_len(), None);
        assert_eq!(frame.wire_len(), HEADER_LEN);
        assert_eq!(frame.to_bytes(), vec![0x41, 0x06, 0x01, 0x00, 0x22, 0x01]);
    }

    #[test]
    fn test_long_frame_sets_flag_and_length() {
        let frame = AptFrame::long(0x0646, 0x21, 0x01, &[0x01, 0x00, 0x00, 0x40]).unwrap();
        assert!(frame.has_data());
        assert_eq!(frame.dest, 0xA1);
        assert_eq!(frame.destination(), 0x21);
        assert_eq!(frame.declared_data_len(), Some(4));
        assert_eq!(
            frame.to_bytes(),
            vec![0x46, 0x06, 0x04, 0x00, 0xA1, 0x01, 0x01, 0x00, 0x00, 0x40]
        );
    }

    #[test]
    fn test_long_frame_rejects_oversized_payload() {
        let data = vec![0u8; u16::MAX as usize + 1];
        let err = AptFrame::long(0x0646, 0x21, 0x01, &data).unwrap_err();
        assert_eq!(err, ProtocolError::PayloadTooLong { len: data.len() });
    }

    #[test]
    fn test_status_byte_is_offset_three() {
        let frame = decode(&[0x41, 0x06, 0x01, 0x02, 0x21, 0x01]).unwrap();
        assert_eq!(frame.status_byte(), 0x02);
        assert_eq!(frame.to_bytes()[3], 0x02);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_frame_json_layout() {
        let frame = AptFrame::long(0x0643, 0x23, 0x01, &[0x01, 0x00, 0x6A, 0x03]).unwrap();
        let json = serde_json::to_value(&frame).unwrap();
        assert_eq!(json["message_id"], 0x0643);
        assert_eq!(json["dest"], 0xA3);
        assert_eq!(json["data"].as_array().map(Vec::len), Some(4));
    }
}
