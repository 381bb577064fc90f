//! 单位换算的属性测试
//!
//! 使用 proptest 验证量化误差与编码边界。

use bpc_protocol::{
    ScaledValue, decode, position_to_scaled, quantum, scaled_to_position, scaled_to_voltage,
    voltage_to_scaled, OutputPositionCommand, Command, HOST_ADDRESS,
};
use proptest::prelude::*;

proptest! {
    /// 位置往返误差：半个量化步长（四舍五入）加上向下取整到整数 nm
    #[test]
    fn position_roundtrip_within_resolution(pos in 0.0..=30_000.0f64) {
        let max = 30_000.0;
        let scaled = position_to_scaled(pos, max).unwrap();
        prop_assert!(scaled.raw() >= 0);

        let back = scaled_to_position(scaled.raw() as u16, max) as f64;
        prop_assert!((back - pos).abs() <= quantum(max) / 2.0 + 1.0 + 1e-9);
    }

    /// 任意标定下位置往返误差同样有界
    #[test]
    fn position_roundtrip_any_calibration(max in 1_000.0..200_000.0f64, frac in 0.0..=1.0f64) {
        let pos = max * frac;
        let scaled = position_to_scaled(pos, max).unwrap();
        let back = scaled_to_position(scaled.raw() as u16, max) as f64;
        prop_assert!((back - pos).abs() <= quantum(max) / 2.0 + 1.0 + 1e-9);
    }

    /// 电压往返误差不超过半个量化步长
    #[test]
    fn voltage_roundtrip_within_resolution(volts in -75.0..=75.0f64) {
        let max = 75.0;
        let scaled = voltage_to_scaled(volts, max).unwrap();
        let back = scaled_to_voltage(scaled.raw(), max);
        prop_assert!((back - volts).abs() <= quantum(max) / 2.0 + 1e-9);
    }

    /// 超出满量程的值在编码前被拒绝
    #[test]
    fn overrange_is_rejected(factor in 1.001..100.0f64) {
        prop_assert!(voltage_to_scaled(75.0 * factor, 75.0).is_err());
        prop_assert!(position_to_scaled(30_000.0 * factor, 30_000.0).is_err());
    }

    /// 位置帧：长帧头 + `01 00` + 小端定点值，解码后数据长度与头部声明一致
    #[test]
    fn position_frame_layout(raw in 0i16..=i16::MAX, bay in 0x21u8..=0x23) {
        let cmd = OutputPositionCommand { bay, value: ScaledValue::new(raw) };
        let bytes = cmd.to_frame(HOST_ADDRESS).unwrap().to_bytes();
        let [lo, hi] = raw.to_le_bytes();
        prop_assert_eq!(&bytes, &vec![0x46, 0x06, 0x04, 0x00, bay | 0x80, 0x01, 0x01, 0x00, lo, hi]);

        let frame = decode(&bytes).unwrap();
        prop_assert_eq!(frame.declared_data_len(), Some(frame.data.len() as u16));
    }
}

#[test]
fn half_travel_concrete_value() {
    // 15000 / 30000 * 32767 = 16383.5，四舍五入到 16384
    let scaled = position_to_scaled(15_000.0, 30_000.0).unwrap();
    assert_eq!(scaled.raw(), 16384);
    assert_eq!(scaled_to_position(16384, 30_000.0), 15_000);
}
