//! 单位换算
//!
//! 物理量（位置 nm、电压 V）与协议 16 位定点值之间的线性映射：
//!
//! ```text
//! physical / max_physical == scaled / FULL_SCALE
//! ```
//!
//! **注意**：位置应答按**无符号**解析，电压应答按**有符号**解析，两者不可混用。

use std::fmt;

use crate::ProtocolError;
use crate::constants::FULL_SCALE;

/// 协议定点值（有符号 16 位）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScaledValue(i16);

impl ScaledValue {
    /// 零值
    pub const ZERO: Self = ScaledValue(0);

    /// 满量程
    pub const FULL: Self = ScaledValue(i16::MAX);

    /// 从原始定点值创建
    #[inline]
    pub const fn new(raw: i16) -> Self {
        ScaledValue(raw)
    }

    /// 原始定点值
    #[inline]
    pub const fn raw(self) -> i16 {
        self.0
    }

    /// 小端字节
    #[inline]
    pub fn to_le_bytes(self) -> [u8; 2] {
        self.0.to_le_bytes()
    }
}

impl fmt::Display for ScaledValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.0, FULL_SCALE)
    }
}

fn check_max(quantity: &'static str, max: f64) -> Result<(), ProtocolError> {
    if max.is_finite() && max > 0.0 {
        Ok(())
    } else {
        Err(ProtocolError::InvalidScale { quantity, max })
    }
}

fn to_scaled(quantity: &'static str, value: f64, max: f64) -> Result<ScaledValue, ProtocolError> {
    check_max(quantity, max)?;
    if !value.is_finite() {
        return Err(ProtocolError::NotFinite { quantity });
    }

    let scaled = (value / max * f64::from(FULL_SCALE)).round();
    if scaled < f64::from(i16::MIN) || scaled > f64::from(i16::MAX) {
        return Err(ProtocolError::ValueOutOfRange {
            value: scaled as i64,
            width: 2,
            min: i64::from(i16::MIN),
            max: i64::from(i16::MAX),
        });
    }

    Ok(ScaledValue(scaled as i16))
}

/// 位置（nm）→ 定点值：`round(pos_nm / max_pos_nm * 32767)`
pub fn position_to_scaled(pos_nm: f64, max_pos_nm: f64) -> Result<ScaledValue, ProtocolError> {
    to_scaled("position", pos_nm, max_pos_nm)
}

/// 定点值 → 位置（整数 nm）：`floor(raw / 32767 * max_pos_nm)`
///
/// `raw` 为应答末 2 字节按**无符号**小端重组的值。
pub fn scaled_to_position(raw: u16, max_pos_nm: f64) -> i64 {
    (f64::from(raw) / f64::from(FULL_SCALE) * max_pos_nm).floor() as i64
}

/// 电压（V）→ 定点值：`round(volts / max_volts * 32767)`
pub fn voltage_to_scaled(volts: f64, max_volts: f64) -> Result<ScaledValue, ProtocolError> {
    to_scaled("voltage", volts, max_volts)
}

/// 定点值 → 电压（V）：`raw / 32767 * max_volts`
///
/// `raw` 为应答末 2 字节按**有符号**小端重组的值。
pub fn scaled_to_voltage(raw: i16, max_volts: f64) -> f64 {
    f64::from(raw) / f64::from(FULL_SCALE) * max_volts
}

/// 一个定点单位对应的物理量（量化步长）
pub fn quantum(max: f64) -> f64 {
    max / f64::from(FULL_SCALE)
}
