use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

/// 連番付きフレーム
#[derive(Debug, Clone, PartialEq)]
pub struct Sequenced<T> {
    /// 1 から始まる到着順の番号
    pub seq: u64,
    pub frame: T,
}

/// 最新フレームだけを保持するスロット (keep-latest-only)
///
/// プロデューサは `publish` で上書きし、コンシューマは `take` で取り出す。
/// 取り出される前に上書きされたフレームは捨てられ、キューには溜まらない。
/// 同じフレームが2回取り出されることはない。
#[derive(Debug)]
pub struct LatestFrame<T> {
    slot: Mutex<Option<Sequenced<T>>>,
    published: AtomicU64,
    dropped: AtomicU64,
}

impl<T> LatestFrame<T> {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
            published: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
        }
    }

    /// 新しいフレームを置く。未消費のフレームがあれば捨てる。連番を返す。
    pub fn publish(&self, frame: T) -> u64 {
        let seq = self.published.fetch_add(1, Ordering::AcqRel) + 1;
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.is_some() {
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
        *slot = Some(Sequenced { seq, frame });
        seq
    }

    /// 最新フレームを取り出す。前回から新しいフレームが無ければ None。
    pub fn take(&self) -> Option<Sequenced<T>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner).take()
    }

    /// これまでに置かれたフレーム数
    pub fn published(&self) -> u64 {
        self.published.load(Ordering::Acquire)
    }

    /// 消費される前に上書きされたフレーム数
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl<T> Default for LatestFrame<T> {
    fn default() -> Self {
        Self::new()
    }
}
