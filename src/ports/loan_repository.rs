use crate::domain::{Isbn, Loan, LoanId, MemberId};
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 貸出リポジトリポート
///
/// 「1冊につき貸出中は1件まで」はリポジトリでは強制しない。
/// LoanServiceが`find_active_by_isbn`で確認する。
#[async_trait]
pub trait LoanRepository: Send + Sync {
    /// IDで貸出を取得する
    async fn find_by_id(&self, loan_id: LoanId) -> Result<Option<Loan>>;

    /// 貸出を保存する
    ///
    /// 新規の場合は追加、既存の場合は上書き（upsert）。
    async fn save(&self, loan: Loan) -> Result<()>;

    /// 書籍の貸出中の貸出を取得する
    async fn find_active_by_isbn(&self, isbn: &Isbn) -> Result<Option<Loan>>;

    /// 会員の貸出中の貸出を取得する
    ///
    /// 貸出上限と延滞の確認に使用される。
    async fn find_active_by_member(&self, member_id: &MemberId) -> Result<Vec<Loan>>;

    /// 会員の全貸出を取得する（返却済みを含む）
    ///
    /// 会員の貸出履歴表示に使用される。
    async fn find_by_member(&self, member_id: &MemberId) -> Result<Vec<Loan>>;
}
