//! # ユーザー統計
//!
//! `users/stats/` エンドポイントが返す集計値と、グループ別統計の単位。
//! 集計値はすべて任意で、欠損は 0 として表示する。

use serde::{Deserialize, Serialize};

use crate::record::lenient;

/// ユーザー統計
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStats {
    #[serde(default, deserialize_with = "lenient")]
    pub total_users: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub verified_users: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub unverified_users: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub admin_users: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub normal_users: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub care_users: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub technician_users: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub recent_signups: Option<u64>,
}

impl UserStats {
    pub fn total(&self) -> u64 {
        self.total_users.unwrap_or(0)
    }

    pub fn verified(&self) -> u64 {
        self.verified_users.unwrap_or(0)
    }

    pub fn unverified(&self) -> u64 {
        self.unverified_users.unwrap_or(0)
    }

    pub fn admins(&self) -> u64 {
        self.admin_users.unwrap_or(0)
    }

    pub fn normal(&self) -> u64 {
        self.normal_users.unwrap_or(0)
    }

    pub fn care(&self) -> u64 {
        self.care_users.unwrap_or(0)
    }

    pub fn technicians(&self) -> u64 {
        self.technician_users.unwrap_or(0)
    }

    pub fn recent_signups(&self) -> u64 {
        self.recent_signups.unwrap_or(0)
    }

    /// 認証済みユーザーの割合（%）
    ///
    /// 総数が 0 の場合は `None`。
    pub fn verification_rate(&self) -> Option<f64> {
        let total = self.total();
        (total > 0).then(|| self.verified() as f64 / total as f64 * 100.0)
    }
}

/// グループ別統計の集計単位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum StatType {
    Day,
    #[default]
    Month,
    Year,
    All,
}
