use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Isbn, LoanBookError, LoanId, MemberId, ReturnBookError};

/// 貸出期間（日数）
pub const LOAN_PERIOD_DAYS: i64 = 14;

/// Loan集約 - 1冊の書籍の1回の貸出
///
/// 状態は Active（return_dateなし）→ Returned の2つのみ。
/// Returnedは終端状態。
/// 識別子・参照・日付は生成後に変更されないため、フィールドは非公開とし
/// 状態遷移は純粋関数`return_book`のみで行う。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    // 識別子
    id: LoanId,

    // 他の集約への参照（キーのみ）
    isbn: Isbn,
    member_id: MemberId,

    // 貸出管理の責務
    loan_date: NaiveDate,
    due_date: NaiveDate,
    return_date: Option<NaiveDate>,
}

impl Loan {
    pub fn id(&self) -> LoanId {
        self.id
    }

    pub fn isbn(&self) -> &Isbn {
        &self.isbn
    }

    pub fn member_id(&self) -> &MemberId {
        &self.member_id
    }

    pub fn loan_date(&self) -> NaiveDate {
        self.loan_date
    }

    pub fn due_date(&self) -> NaiveDate {
        self.due_date
    }

    pub fn return_date(&self) -> Option<NaiveDate> {
        self.return_date
    }

    /// 貸出中か（返却日が未設定）
    pub fn is_active(&self) -> bool {
        self.return_date.is_none()
    }

    /// 指定日時点で延滞しているか
    pub fn is_overdue(&self, as_of: NaiveDate) -> bool {
        is_overdue(self, as_of)
    }
}

/// 純粋関数：書籍を貸し出す
///
/// ビジネスルール：
/// - 返却期限は貸出日 + `period_days`日
/// - 状態はActive
///
/// 副作用なし。新しいLoanを返す。貸出可否の判定はアプリケーション層で行う。
///
/// # エラー
/// 返却期限が`NaiveDate`の範囲外になる場合は`LoanBookError::DueDateOutOfRange`
pub fn loan_book(
    isbn: Isbn,
    member_id: MemberId,
    loan_date: NaiveDate,
    period_days: i64,
) -> Result<Loan, LoanBookError> {
    let due_date = Duration::try_days(period_days)
        .and_then(|period| loan_date.checked_add_signed(period))
        .ok_or(LoanBookError::DueDateOutOfRange)?;

    Ok(Loan {
        id: LoanId::new(),
        isbn,
        member_id,
        loan_date,
        due_date,
        return_date: None,
    })
}

/// 純粋関数：書籍を返却する
///
/// ビジネスルール：
/// - 延滞していても返却は受け付ける
/// - 返却は1回のみ
///
/// 副作用なし。返却済みのLoanを返す。
pub fn return_book(loan: &Loan, returned_on: NaiveDate) -> Result<Loan, ReturnBookError> {
    if !loan.is_active() {
        return Err(ReturnBookError::AlreadyReturned(loan.id));
    }

    Ok(Loan {
        return_date: Some(returned_on),
        ..loan.clone()
    })
}

/// 純粋関数：延滞判定
///
/// 貸出中かつ`as_of`が返却期限より後（当日は延滞ではない）。
pub fn is_overdue(loan: &Loan, as_of: NaiveDate) -> bool {
    loan.is_active() && as_of > loan.due_date
}

/// 返却期限からの超過日数
///
/// 期限日は含まず、`as_of`当日を含む。期限内なら0。
pub fn days_late(due_date: NaiveDate, as_of: NaiveDate) -> i64 {
    if as_of > due_date {
        as_of.signed_duration_since(due_date).num_days()
    } else {
        0
    }
}

/// 純粋関数：延滞料金
///
/// 日額 × 超過日数。浮動小数点の誤差を避けるため`Decimal`で計算する。
pub fn late_fee(due_date: NaiveDate, returned_on: NaiveDate, daily_fee: Decimal) -> Decimal {
    match days_late(due_date, returned_on) {
        0 => Decimal::ZERO,
        days => daily_fee * Decimal::from(days),
    }
}
