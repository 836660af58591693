use crate::domain::{Member, MemberId};
use crate::ports::member_repository::{MemberRepository as MemberRepositoryTrait, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// In-memory implementation of MemberRepository
///
/// Members are keyed by id. Seed with `with_members` or `save`.
pub struct MemberRepository {
    members: Mutex<HashMap<MemberId, Member>>,
}

impl MemberRepository {
    pub fn new() -> Self {
        Self {
            members: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_members(members: impl IntoIterator<Item = Member>) -> Self {
        let members = members
            .into_iter()
            .map(|member| (member.id().clone(), member))
            .collect();
        Self {
            members: Mutex::new(members),
        }
    }
}

impl Default for MemberRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MemberRepositoryTrait for MemberRepository {
    async fn find_by_id(&self, member_id: &MemberId) -> Result<Option<Member>> {
        let members = self
            .members
            .lock()
            .map_err(|_| "member store lock poisoned")?;
        Ok(members.get(member_id).cloned())
    }

    async fn save(&self, member: Member) -> Result<()> {
        let mut members = self
            .members
            .lock()
            .map_err(|_| "member store lock poisoned")?;
        members.insert(member.id().clone(), member);
        Ok(())
    }
}
