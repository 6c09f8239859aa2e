//! # 最新応答ガード
//!
//! ページ切り替えなどで同じ種類のリクエストが重なった場合、
//! 先に送ったリクエストの応答が後から届くことがある。
//! 送信済みのリクエストは取り消さず、応答の適用時に古いものを捨てる。
//!
//! 各リクエストには単調増加する番号と、送信時の選択値（ページ番号など）を
//! [`Ticket`] として割り当てる。応答は次の両方を満たすときだけ適用する。
//!
//! - 選択値が現在の選択と一致する
//! - 番号が最後に適用した応答の番号より大きい

use std::sync::Mutex;

/// リクエストに割り当てる整理券
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket<K> {
    seq: u64,
    key: K,
}

impl<K> Ticket<K> {
    pub fn key(&self) -> &K {
        &self.key
    }
}

#[derive(Debug)]
struct Inner<K, T> {
    next_seq: u64,
    current_key: Option<K>,
    applied_seq: Option<u64>,
    value: Option<T>,
}

/// 最新応答ガード
///
/// 複数タスクから共有できるよう内部状態は `Mutex` で保護する。
#[derive(Debug)]
pub struct LatestResponse<K, T> {
    inner: Mutex<Inner<K, T>>,
}

impl<K, T> Default for LatestResponse<K, T> {
    fn default() -> Self {
        Self {
            inner: Mutex::new(Inner {
                next_seq: 0,
                current_key: None,
                applied_seq: None,
                value: None,
            }),
        }
    }
}

impl<K, T> LatestResponse<K, T>
where
    K: Clone + PartialEq,
    T: Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner<K, T>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// 新しい選択値でリクエストを開始し、整理券を発行する
    ///
    /// 以後、この選択値以外の整理券を持つ応答は適用されない。
    pub fn begin(&self, key: K) -> Ticket<K> {
        let mut inner = self.lock();
        inner.next_seq += 1;
        inner.current_key = Some(key.clone());
        Ticket {
            seq: inner.next_seq,
            key,
        }
    }

    /// 応答を適用する
    ///
    /// 古い応答として破棄した場合は `false` を返す。
    pub fn apply(&self, ticket: &Ticket<K>, value: T) -> bool {
        let mut inner = self.lock();

        let key_matches = inner.current_key.as_ref() == Some(&ticket.key);
        let is_newer = inner.applied_seq.is_none_or(|applied| ticket.seq > applied);
        if !(key_matches && is_newer) {
            tracing::debug!(seq = ticket.seq, "古い応答を破棄しました");
            return false;
        }

        inner.applied_seq = Some(ticket.seq);
        inner.value = Some(value);
        true
    }

    /// 最後に適用した値
    pub fn current(&self) -> Option<T> {
        self.lock().value.clone()
    }
}
