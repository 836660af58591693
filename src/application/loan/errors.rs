use thiserror::Error;

use crate::domain::{Isbn, LoanBookError, LoanId, MemberId, ReturnBookError};

/// 貸出管理アプリケーション層のエラー
///
/// リポジトリ系以外のバリアントはビジネスルールによる貸出拒否。
#[derive(Debug, Error)]
pub enum LoanApplicationError {
    /// 書籍が存在しない
    #[error("Book not found: {0}")]
    BookNotFound(Isbn),

    /// 書籍が貸出不可
    #[error("Book is not available for loan: {0}")]
    BookUnavailable(Isbn),

    /// 書籍に貸出中の貸出が既に存在する
    #[error("Book is already on loan: {0}")]
    BookAlreadyOnLoan(Isbn),

    /// 会員が存在しない
    #[error("Member not found: {0}")]
    MemberNotFound(MemberId),

    /// 貸出上限を超えている
    #[error("Loan limit exceeded (max {max} books)")]
    LoanLimitExceeded { max: usize },

    /// 会員に延滞中の貸出がある
    #[error("Member has overdue loan: {0}")]
    MemberHasOverdueLoan(MemberId),

    /// 貸出が見つからない
    #[error("Loan not found: {0}")]
    LoanNotFound(LoanId),

    /// 既に返却済み
    #[error("Loan already returned: {0}")]
    LoanAlreadyReturned(LoanId),

    /// 返却期限が日付の範囲外（貸出期間の設定値が大きすぎる）
    #[error("Due date out of range")]
    DueDateOutOfRange,

    /// 不変条件上存在するはずのデータが存在しない
    #[error("Consistency broken: {0}")]
    ConsistencyBroken(String),

    /// BookRepositoryのエラー
    #[error("Book repository error")]
    BookRepositoryError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// MemberRepositoryのエラー
    #[error("Member repository error")]
    MemberRepositoryError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// LoanRepositoryのエラー
    #[error("Loan repository error")]
    LoanRepositoryError(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl LoanApplicationError {
    /// 拒否理由コード
    pub fn code(&self) -> &'static str {
        match self {
            LoanApplicationError::BookNotFound(_) => "BOOK_NOT_FOUND",
            LoanApplicationError::BookUnavailable(_) => "BOOK_UNAVAILABLE",
            LoanApplicationError::BookAlreadyOnLoan(_) => "BOOK_ALREADY_ON_LOAN",
            LoanApplicationError::MemberNotFound(_) => "MEMBER_NOT_FOUND",
            LoanApplicationError::LoanLimitExceeded { .. } => "LOAN_LIMIT_EXCEEDED",
            LoanApplicationError::MemberHasOverdueLoan(_) => "MEMBER_HAS_OVERDUE_LOAN",
            LoanApplicationError::LoanNotFound(_) => "LOAN_NOT_FOUND",
            LoanApplicationError::LoanAlreadyReturned(_) => "LOAN_ALREADY_RETURNED",
            LoanApplicationError::DueDateOutOfRange => "DUE_DATE_OUT_OF_RANGE",
            LoanApplicationError::ConsistencyBroken(_) => "CONSISTENCY_BROKEN",
            LoanApplicationError::BookRepositoryError(_) => "BOOK_REPOSITORY_ERROR",
            LoanApplicationError::MemberRepositoryError(_) => "MEMBER_REPOSITORY_ERROR",
            LoanApplicationError::LoanRepositoryError(_) => "LOAN_REPOSITORY_ERROR",
        }
    }

    /// ビジネスルールによる拒否か（インフラ障害ではない）
    pub fn is_rejection(&self) -> bool {
        !matches!(
            self,
            LoanApplicationError::BookRepositoryError(_)
                | LoanApplicationError::MemberRepositoryError(_)
                | LoanApplicationError::LoanRepositoryError(_)
        )
    }
}

impl From<LoanBookError> for LoanApplicationError {
    fn from(err: LoanBookError) -> Self {
        match err {
            LoanBookError::DueDateOutOfRange => LoanApplicationError::DueDateOutOfRange,
        }
    }
}

impl From<ReturnBookError> for LoanApplicationError {
    fn from(err: ReturnBookError) -> Self {
        match err {
            ReturnBookError::AlreadyReturned(loan_id) => {
                LoanApplicationError::LoanAlreadyReturned(loan_id)
            }
        }
    }
}

/// アプリケーション層の Result型
pub type Result<T> = std::result::Result<T, LoanApplicationError>;
