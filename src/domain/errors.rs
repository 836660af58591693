use super::LoanId;

/// 貸出のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoanBookError {
    /// 返却期限が日付の表現範囲を超える
    DueDateOutOfRange,
}

/// 返却のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnBookError {
    /// 既に返却済み
    AlreadyReturned(LoanId),
}
