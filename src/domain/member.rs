use serde::{Deserialize, Serialize};

use super::MemberId;

/// 会員
///
/// 不変条件：`active_loans`はこの会員の未返却の貸出の件数と等しい。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    id: MemberId,
    name: String,
    active_loans: u32,
}

impl Member {
    pub fn new(id: MemberId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            active_loans: 0,
        }
    }

    pub fn id(&self) -> &MemberId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn active_loans(&self) -> u32 {
        self.active_loans
    }

    pub fn increment_loans(&mut self) {
        self.active_loans += 1;
    }

    /// 0未満にはならない（不変条件が守られていれば到達しない）
    pub fn decrement_loans(&mut self) {
        self.active_loans = self.active_loans.saturating_sub(1);
    }
}
