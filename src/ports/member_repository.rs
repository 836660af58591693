use crate::domain::{Member, MemberId};
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Member repository port
///
/// Keyed by member id. Saving an existing member overwrites it.
#[async_trait]
pub trait MemberRepository: Send + Sync {
    async fn find_by_id(&self, member_id: &MemberId) -> Result<Option<Member>>;

    async fn save(&self, member: Member) -> Result<()>;
}
