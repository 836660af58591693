use crate::config::LoanPolicy;
use crate::domain::{self, Isbn, Loan, LoanId, MemberId};
use crate::ports::*;
use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::errors::{LoanApplicationError, Result};

/// サービスの依存関係
///
/// すべての外部協調者（リポジトリと時計）をデータ構造としてまとめ、
/// `LoanService`の生成時に明示的に渡す。
#[derive(Clone)]
pub struct ServiceDependencies {
    pub book_repository: Arc<dyn BookRepository>,
    pub member_repository: Arc<dyn MemberRepository>,
    pub loan_repository: Arc<dyn LoanRepository>,
    pub clock: Arc<dyn Clock>,
}

/// 貸出サービス
///
/// 貸出と返却のワークフローを実行する。
///
/// # 一貫性保証
///
/// - 各操作の開始時に「今日」を1回だけ取得し、操作中はその日付を使う
/// - 書き込み（蔵書・会員・貸出）はトランザクションではない。
///   途中で失敗しても先に行った書き込みはロールバックしない
/// - `loan_book`と`return_book`はサービス内の単一ロックで直列化される。
///   `Arc<LoanService>`を複数タスクで共有しても
///   「1冊につき貸出中は1件まで」と会員の貸出数の不変条件が保たれる
pub struct LoanService {
    deps: ServiceDependencies,
    policy: LoanPolicy,
    write_lock: Mutex<()>,
}

impl LoanService {
    pub fn new(deps: ServiceDependencies, policy: LoanPolicy) -> Self {
        Self {
            deps,
            policy,
            write_lock: Mutex::new(()),
        }
    }

    /// 書籍を貸し出す
    ///
    /// ビジネスルール（この順に検証する）：
    /// 1. 書籍が存在すること
    /// 2. 書籍が貸出可能であること
    /// 3. 書籍に貸出中の貸出がないこと（貸出可能フラグの二重確認）
    /// 4. 会員が存在すること
    /// 5. 会員の貸出中の冊数が上限未満であること
    /// 6. 会員の貸出中の貸出に延滞がないこと
    ///
    /// 成功時は蔵書を貸出中にし、会員の貸出数を増やし、
    /// 蔵書・会員・貸出の順に保存する。
    ///
    /// # 戻り値
    /// 作成された貸出（返却期限 = 今日 + 貸出期間）
    pub async fn loan_book(&self, isbn: &Isbn, member_id: &MemberId) -> Result<Loan> {
        let _guard = self.write_lock.lock().await;
        let today = self.deps.clock.today();

        self.execute_loan_book(isbn, member_id, today)
            .await
            .inspect_err(|e| log_failure("loan_book", e))
    }

    /// 書籍を返却する
    ///
    /// ビジネスルール：
    /// - 貸出が存在すること
    /// - 貸出中であること（返却は1回のみ）
    /// - 延滞していても返却は受け付け、延滞料金を計算する
    ///
    /// 貸出・蔵書・会員の順に保存する。蔵書や会員が見つからない場合は
    /// `ConsistencyBroken`（貸出の保存は取り消さない）。
    ///
    /// # 戻り値
    /// 延滞料金（期限内の返却なら0）
    pub async fn return_book(&self, loan_id: LoanId) -> Result<Decimal> {
        let _guard = self.write_lock.lock().await;
        let today = self.deps.clock.today();

        self.execute_return_book(loan_id, today)
            .await
            .inspect_err(|e| log_failure("return_book", e))
    }

    /// 会員の貸出履歴（返却済みを含む、貸出日順）
    pub async fn loan_history(&self, member_id: &MemberId) -> Result<Vec<Loan>> {
        self.require_member(member_id).await?;

        self.deps
            .loan_repository
            .find_by_member(member_id)
            .await
            .map_err(LoanApplicationError::LoanRepositoryError)
    }

    /// 会員の延滞中の貸出
    pub async fn overdue_loans(&self, member_id: &MemberId) -> Result<Vec<Loan>> {
        self.require_member(member_id).await?;
        let today = self.deps.clock.today();

        let active_loans = self
            .deps
            .loan_repository
            .find_active_by_member(member_id)
            .await
            .map_err(LoanApplicationError::LoanRepositoryError)?;

        Ok(active_loans
            .into_iter()
            .filter(|loan| loan.is_overdue(today))
            .collect())
    }

    async fn execute_loan_book(
        &self,
        isbn: &Isbn,
        member_id: &MemberId,
        today: chrono::NaiveDate,
    ) -> Result<Loan> {
        // 1. 書籍の存在確認
        let mut book = self
            .deps
            .book_repository
            .find_by_isbn(isbn)
            .await
            .map_err(LoanApplicationError::BookRepositoryError)?
            .ok_or_else(|| LoanApplicationError::BookNotFound(isbn.clone()))?;

        // 2. 書籍の貸出可能性確認
        if !book.is_available() {
            return Err(LoanApplicationError::BookUnavailable(isbn.clone()));
        }

        // 3. 貸出中の貸出がないことを確認
        let active_for_book = self
            .deps
            .loan_repository
            .find_active_by_isbn(isbn)
            .await
            .map_err(LoanApplicationError::LoanRepositoryError)?;

        if active_for_book.is_some() {
            return Err(LoanApplicationError::BookAlreadyOnLoan(isbn.clone()));
        }

        // 4. 会員の存在確認
        let mut member = self.require_member(member_id).await?;

        // 5. 貸出上限確認
        let active_loans = self
            .deps
            .loan_repository
            .find_active_by_member(member_id)
            .await
            .map_err(LoanApplicationError::LoanRepositoryError)?;

        if active_loans.len() >= self.policy.max_active_loans {
            return Err(LoanApplicationError::LoanLimitExceeded {
                max: self.policy.max_active_loans,
            });
        }

        // 6. 会員の延滞確認
        if active_loans.iter().any(|loan| loan.is_overdue(today)) {
            return Err(LoanApplicationError::MemberHasOverdueLoan(
                member_id.clone(),
            ));
        }

        // 7. ドメイン層の純粋関数を呼び出し
        let loan = domain::loan::loan_book(
            isbn.clone(),
            member_id.clone(),
            today,
            self.policy.loan_period_days,
        )?;

        // 8. 蔵書・会員・貸出を保存
        book.mark_borrowed();
        self.deps
            .book_repository
            .save(book)
            .await
            .map_err(LoanApplicationError::BookRepositoryError)?;

        member.increment_loans();
        self.deps
            .member_repository
            .save(member)
            .await
            .map_err(LoanApplicationError::MemberRepositoryError)?;

        self.deps
            .loan_repository
            .save(loan.clone())
            .await
            .map_err(LoanApplicationError::LoanRepositoryError)?;

        tracing::info!(
            loan_id = %loan.id(),
            isbn = %isbn,
            member_id = %member_id,
            due_date = %loan.due_date(),
            "Book loaned"
        );

        Ok(loan)
    }

    async fn execute_return_book(
        &self,
        loan_id: LoanId,
        today: chrono::NaiveDate,
    ) -> Result<Decimal> {
        // 1. 貸出の取得
        let loan = self
            .deps
            .loan_repository
            .find_by_id(loan_id)
            .await
            .map_err(LoanApplicationError::LoanRepositoryError)?
            .ok_or(LoanApplicationError::LoanNotFound(loan_id))?;

        // 2. ドメイン層の純粋関数を呼び出し（返却済みは拒否）
        let returned = domain::loan::return_book(&loan, today)?;

        // 3. 貸出を保存
        self.deps
            .loan_repository
            .save(returned.clone())
            .await
            .map_err(LoanApplicationError::LoanRepositoryError)?;

        // 4. 蔵書を貸出可能に戻す
        let mut book = self
            .deps
            .book_repository
            .find_by_isbn(returned.isbn())
            .await
            .map_err(LoanApplicationError::BookRepositoryError)?
            .ok_or_else(|| {
                LoanApplicationError::ConsistencyBroken(format!(
                    "book {} referenced by loan {} does not exist",
                    returned.isbn(),
                    loan_id
                ))
            })?;

        book.mark_returned();
        self.deps
            .book_repository
            .save(book)
            .await
            .map_err(LoanApplicationError::BookRepositoryError)?;

        // 5. 会員の貸出数を減らす
        let mut member = self
            .deps
            .member_repository
            .find_by_id(returned.member_id())
            .await
            .map_err(LoanApplicationError::MemberRepositoryError)?
            .ok_or_else(|| {
                LoanApplicationError::ConsistencyBroken(format!(
                    "member {} referenced by loan {} does not exist",
                    returned.member_id(),
                    loan_id
                ))
            })?;

        member.decrement_loans();
        self.deps
            .member_repository
            .save(member)
            .await
            .map_err(LoanApplicationError::MemberRepositoryError)?;

        // 6. 延滞料金の計算
        let fee = domain::loan::late_fee(returned.due_date(), today, self.policy.daily_late_fee);

        tracing::info!(
            loan_id = %loan_id,
            isbn = %returned.isbn(),
            member_id = %returned.member_id(),
            days_late = domain::loan::days_late(returned.due_date(), today),
            fee = %fee,
            "Book returned"
        );

        Ok(fee)
    }

    async fn require_member(&self, member_id: &MemberId) -> Result<domain::Member> {
        self.deps
            .member_repository
            .find_by_id(member_id)
            .await
            .map_err(LoanApplicationError::MemberRepositoryError)?
            .ok_or_else(|| LoanApplicationError::MemberNotFound(member_id.clone()))
    }
}

fn log_failure(operation: &str, err: &LoanApplicationError) {
    match err {
        LoanApplicationError::ConsistencyBroken(detail) => {
            tracing::error!(operation, detail = %detail, "Consistency broken");
        }
        e if e.is_rejection() => {
            tracing::warn!(operation, code = e.code(), "Loan rejected: {}", e);
        }
        e => {
            tracing::error!(operation, code = e.code(), error = ?e, "Repository failure");
        }
    }
}
