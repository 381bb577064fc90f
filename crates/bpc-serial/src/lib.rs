//! # BPC Serial Transport Layer
//!
//! 字节流传输抽象层：会话层只依赖 [`Transport`] trait，
//! 串口（`serialport`）和测试用 Mock 实现都在这里。
//!
//! 协议是严格的半双工请求/应答，同一时刻只有一次交换在进行，
//! 因此 trait 方法都使用 `&mut self`，不做任何内部加锁。
//!
//! 超时由传输层负责：`read_exact` 在超时后返回 [`TransportError::Timeout`]，
//! 上层不做重试。

use thiserror::Error;

#[cfg(feature = "serialport")]
pub mod serial;

#[cfg(feature = "serialport")]
pub use serial::{DEFAULT_BAUD_RATE, SerialConfig, SerialTransport};

#[cfg(any(test, feature = "mock"))]
pub mod mock;

#[cfg(any(test, feature = "mock"))]
pub use mock::MockTransport;

/// 传输层统一错误类型
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "serialport")]
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),

    #[error("Read timeout: expected {expected} bytes, received {received}")]
    Timeout { expected: usize, received: usize },

    #[error("Transport not open")]
    NotOpen,
}

/// 字节流传输
///
/// `read_exact` 阻塞直到恰好读到 `n` 字节，或返回错误。
pub trait Transport {
    fn open(&mut self) -> Result<(), TransportError>;
    fn close(&mut self) -> Result<(), TransportError>;
    fn is_open(&self) -> bool;
    fn write(&mut self, bytes: &[u8]) -> Result<(), TransportError>;
    fn read_exact(&mut self, n: usize) -> Result<Vec<u8>, TransportError>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn open(&mut self) -> Result<(), TransportError> {
        (**self).open()
    }

    fn close(&mut self) -> Result<(), TransportError> {
        (**self).close()
    }

    fn is_open(&self) -> bool {
        (**self).is_open()
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        (**self).write(bytes)
    }

    fn read_exact(&mut self, n: usize) -> Result<Vec<u8>, TransportError> {
        (**self).read_exact(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boxed_transport_delegates() {
        let mock = MockTransport::new();
        let mut boxed: Box<dyn Transport> = Box::new(mock.clone());

        assert!(!boxed.is_open());
        boxed.open().unwrap();
        assert!(boxed.is_open());

        boxed.write(&[0x23, 0x02]).unwrap();
        assert_eq!(mock.writes(), vec![vec![0x23, 0x02]]);

        mock.push_reply(&[1, 2, 3]);
        assert_eq!(boxed.read_exact(3).unwrap(), vec![1, 2, 3]);

        boxed.close().unwrap();
        assert!(!mock.is_open());
    }

    #[test]
    fn test_timeout_display() {
        let err = TransportError::Timeout {
            expected: 10,
            received: 4,
        };
        assert_eq!(
            err.to_string(),
            "Read timeout: expected 10 bytes, received 4"
        );
    }
}
