//! Mock 传输
//!
//! 记录所有写入的字节，并按顺序吐出预先排队的应答字节。
//! 内部状态用 `Arc<Mutex<_>>` 共享，克隆出的句柄可在传输被会话持有后继续检查。

use std::collections::VecDeque;
use std::io;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::{Transport, TransportError};

#[derive(Debug, Default)]
struct MockState {
    open: bool,
    writes: Vec<Vec<u8>>,
    rx: VecDeque<u8>,
    fail_writes: bool,
    open_count: usize,
    close_count: usize,
}

/// Mock 传输
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    /// 创建关闭状态的 Mock
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加应答字节
    pub fn push_reply(&self, bytes: &[u8]) {
        self.state.lock().rx.extend(bytes.iter().copied());
    }

    /// 所有写入（每次 `write` 一条）
    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.state.lock().writes.clone()
    }

    /// 写入次数
    pub fn write_count(&self) -> usize {
        self.state.lock().writes.len()
    }

    /// 写入的总字节数
    pub fn bytes_written(&self) -> usize {
        self.state.lock().writes.iter().map(Vec::len).sum()
    }

    /// 尚未被读取的应答字节数
    pub fn pending_rx(&self) -> usize {
        self.state.lock().rx.len()
    }

    /// 清空写入记录
    pub fn clear_writes(&self) {
        self.state.lock().writes.clear();
    }

    /// 使后续写入失败（模拟链路断开）
    pub fn fail_writes(&self, fail: bool) {
        self.state.lock().fail_writes = fail;
    }

    pub fn open_count(&self) -> usize {
        self.state.lock().open_count
    }

    pub fn close_count(&self) -> usize {
        self.state.lock().close_count
    }
}

impl Transport for MockTransport {
    fn open(&mut self) -> Result<(), TransportError> {
        let mut state = self.state.lock();
        state.open = true;
        state.open_count += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<(), TransportError> {
        let mut state = self.state.lock();
        state.open = false;
        state.close_count += 1;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.state.lock().open
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        let mut state = self.state.lock();
        if !state.open {
            return Err(TransportError::NotOpen);
        }
        if state.fail_writes {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "mock link down").into());
        }
        state.writes.push(bytes.to_vec());
        Ok(())
    }

    fn read_exact(&mut self, n: usize) -> Result<Vec<u8>, TransportError> {
        let mut state = self.state.lock();
        if !state.open {
            return Err(TransportError::NotOpen);
        }
        if state.rx.len() < n {
            return Err(TransportError::Timeout {
                expected: n,
                received: state.rx.len(),
            });
        }
        Ok(state.rx.drain(..n).collect())
    }
}
