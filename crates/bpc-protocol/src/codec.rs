//! 帧编码/解码
//!
//! ```text
//! +-------+-------+--------+--------+-------------+--------+-------------+
//! | id_lo | id_hi | p1/len | p2/len | dest [|0x80]| source | data[0..n]  |
//! +-------+-------+--------+--------+-------------+--------+-------------+
//! ```
//!
//! 无状态；短帧固定 6 字节，长帧为 6 + 数据包长度。

use bytes::BufMut;

use crate::constants::{DATA_PACKET_FLAG, HEADER_LEN};
use crate::ids::{FrameShape, MessageId};
use crate::{AptFrame, ProtocolError};

/// 按 opcode 表中的帧形态构建帧
///
/// 短帧把 `params` 内联到 param1/param2，不能携带数据包；
/// 长帧忽略 `params`，数据包长度必须与表中声明的一致。
pub fn build_frame(
    id: MessageId,
    params: [u8; 2],
    dest: u8,
    source: u8,
    data: &[u8],
) -> Result<AptFrame, ProtocolError> {
    match id.frame_shape() {
        FrameShape::Short if data.is_empty() => {
            Ok(AptFrame::short(id.code(), params[0], params[1], dest, source))
        },
        FrameShape::Short => Err(ProtocolError::InvalidLength {
            expected: HEADER_LEN,
            actual: HEADER_LEN + data.len(),
        }),
        FrameShape::Long { data_len } if data.len() == usize::from(data_len) => {
            AptFrame::long(id.code(), dest, source, data)
        },
        FrameShape::Long { data_len } => Err(ProtocolError::InvalidLength {
            expected: HEADER_LEN + usize::from(data_len),
            actual: HEADER_LEN + data.len(),
        }),
    }
}

/// 编码短帧（仅头部）
pub fn encode_short(message_id: u16, param1: u8, param2: u8, dest: u8, source: u8) -> [u8; HEADER_LEN] {
    let [id_lo, id_hi] = message_id.to_le_bytes();
    [id_lo, id_hi, param1, param2, dest, source]
}

/// 编码长帧
///
/// 在 `dest` 上置位 0x80，用小端数据包长度替代 param1/param2，并追加数据包。
pub fn encode_long(message_id: u16, dest: u8, source: u8, data: &[u8]) -> Result<Vec<u8>, ProtocolError> {
    let len = u16::try_from(data.len())
        .map_err(|_| ProtocolError::PayloadTooLong { len: data.len() })?;

    let mut buf = Vec::with_capacity(HEADER_LEN + data.len());
    buf.put_u16_le(message_id);
    buf.put_u16_le(len);
    buf.put_u8(dest | DATA_PACKET_FLAG);
    buf.put_u8(source);
    buf.put_slice(data);
    Ok(buf)
}

/// 解码原始应答字节
///
/// 前 6 字节按头部布局解析，其余字节均视为数据包。
/// 调用方负责按期望长度读取（状态应答 6 字节，数值应答 10 字节），
/// 这里只拒绝不足一个头部的输入。
pub fn decode(raw: &[u8]) -> Result<AptFrame, ProtocolError> {
    if raw.len() < HEADER_LEN {
        return Err(ProtocolError::InvalidLength {
            expected: HEADER_LEN,
            actual: raw.len(),
        });
    }

    Ok(AptFrame {
        message_id: u16::from_le_bytes([raw[0], raw[1]]),
        param1: raw[2],
        param2: raw[3],
        dest: raw[4],
        source: raw[5],
        data: raw[HEADER_LEN..].to_vec(),
    })
}

/// 有符号整数转定宽小端字节
///
/// 超出 `width` 字节可表示范围的值在编码前即返回错误，不会截断。
///
/// ```rust
/// use bpc_protocol::int_to_le_bytes;
///
/// assert_eq!(int_to_le_bytes(2, 2).unwrap(), vec![0x02, 0x00]);
/// assert_eq!(int_to_le_bytes(-1, 2).unwrap(), vec![0xFF, 0xFF]);
/// assert!(int_to_le_bytes(128, 1).is_err());
/// ```
pub fn int_to_le_bytes(value: i64, width: usize) -> Result<Vec<u8>, ProtocolError> {
    if width == 0 || width > 8 {
        return Err(ProtocolError::UnsupportedWidth(width));
    }

    let bits = (width * 8) as u32;
    let (min, max) = if width == 8 {
        (i64::MIN, i64::MAX)
    } else {
        (-(1i64 << (bits - 1)), (1i64 << (bits - 1)) - 1)
    };

    if value < min || value > max {
        return Err(ProtocolError::ValueOutOfRange {
            value,
            width,
            min,
            max,
        });
    }

    Ok(value.to_le_bytes()[..width].to_vec())
}
