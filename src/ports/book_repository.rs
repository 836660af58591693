use crate::domain::{Book, Isbn};
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 蔵書リポジトリポート
///
/// ISBNをキーに蔵書を取得・保存する。
/// 貸出可否フラグの更新はLoanServiceが行い、ここでは保存のみ。
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// ISBNで蔵書を取得する
    async fn find_by_isbn(&self, isbn: &Isbn) -> Result<Option<Book>>;

    /// 蔵書を保存する（既存の場合は上書き）
    async fn save(&self, book: Book) -> Result<()>;
}
