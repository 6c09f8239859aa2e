//! # 件数集計
//!
//! 絞り込み済みのレコード集合から総数と条件別の件数を求める。
//! どのフィールドが存在するかは仮定せず、条件は呼び出し側が述語として渡す。

/// レコード集合に対する集計
#[derive(Debug, Clone, Copy)]
pub struct Aggregate<'a, R> {
    items: &'a [R],
}

/// レコード集合の集計を開始する
pub fn aggregate<R>(items: &[R]) -> Aggregate<'_, R> {
    Aggregate { items }
}

impl<R> Aggregate<'_, R> {
    /// 総数
    pub fn total(&self) -> usize {
        self.items.len()
    }

    /// 述語を満たすレコードの件数
    pub fn count_by<P>(&self, predicate: P) -> usize
    where
        P: Fn(&R) -> bool,
    {
        self.items.iter().filter(|item| predicate(item)).count()
    }
}
