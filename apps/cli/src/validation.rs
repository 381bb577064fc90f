//! 输入验证模块

use anyhow::{Result, bail};

/// 生成往返扫描的设定点
///
/// 从 `from` 以 `step` 递增到 `to`（`to` 总是包含在内），再沿原路返回到 `from`。
///
/// # 错误
///
/// 如果：
/// - 任一参数为 NaN 或无穷大
/// - `step` 不是正数
/// - `from > to` 或 `from < 0`
pub fn scan_points(from: f64, to: f64, step: f64) -> Result<Vec<f64>> {
    if !(from.is_finite() && to.is_finite() && step.is_finite()) {
        bail!("扫描参数必须是有限数值");
    }
    if step <= 0.0 {
        bail!("扫描步长必须为正数，得到 {}", step);
    }
    if from < 0.0 || from > to {
        bail!("扫描范围无效: [{}, {}]", from, to);
    }

    let n = ((to - from) / step).floor() as usize;
    let mut forward: Vec<f64> = (0..=n).map(|i| from + step * i as f64).collect();
    if forward.last().is_some_and(|&last| to - last > f64::EPSILON * to.max(1.0)) {
        forward.push(to);
    }

    let back: Vec<f64> = forward.iter().rev().skip(1).copied().collect();
    forward.extend(back);
    Ok(forward)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_points_round_trip() {
        let points = scan_points(0.0, 3.0, 1.0).unwrap();
        assert_eq!(points, vec![0.0, 1.0, 2.0, 3.0, 2.0, 1.0, 0.0]);
    }

    #[test]
    fn test_scan_points_includes_end() {
        let points = scan_points(0.0, 2.5, 1.0).unwrap();
        assert_eq!(points, vec![0.0, 1.0, 2.0, 2.5, 2.0, 1.0, 0.0]);
    }

    #[test]
    fn test_scan_points_single() {
        assert_eq!(scan_points(5.0, 5.0, 1.0).unwrap(), vec![5.0]);
    }

    #[test]
    fn test_scan_points_invalid() {
        assert!(scan_points(0.0, 10.0, 0.0).is_err());
        assert!(scan_points(0.0, 10.0, -1.0).is_err());
        assert!(scan_points(10.0, 0.0, 1.0).is_err());
        assert!(scan_points(-1.0, 10.0, 1.0).is_err());
        assert!(scan_points(0.0, f64::NAN, 1.0).is_err());
    }
}
