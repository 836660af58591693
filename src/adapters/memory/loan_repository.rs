use crate::domain::{Isbn, Loan, LoanId, MemberId};
use crate::ports::loan_repository::{LoanRepository as LoanRepositoryTrait, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// LoanRepositoryのインメモリ実装
///
/// 検索は全件走査。結果は貸出日順に並べて返す。
pub struct LoanRepository {
    loans: Mutex<HashMap<LoanId, Loan>>,
}

impl LoanRepository {
    pub fn new() -> Self {
        Self {
            loans: Mutex::new(HashMap::new()),
        }
    }

    fn filter_sorted(&self, predicate: impl Fn(&Loan) -> bool) -> Result<Vec<Loan>> {
        let loans = self.loans.lock().map_err(|_| "loan store lock poisoned")?;
        let mut matched: Vec<Loan> = loans.values().filter(|l| predicate(*l)).cloned().collect();
        matched.sort_by_key(|l| l.loan_date());
        Ok(matched)
    }
}

impl Default for LoanRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LoanRepositoryTrait for LoanRepository {
    async fn find_by_id(&self, loan_id: LoanId) -> Result<Option<Loan>> {
        let loans = self.loans.lock().map_err(|_| "loan store lock poisoned")?;
        Ok(loans.get(&loan_id).cloned())
    }

    async fn save(&self, loan: Loan) -> Result<()> {
        let mut loans = self.loans.lock().map_err(|_| "loan store lock poisoned")?;
        loans.insert(loan.id(), loan);
        Ok(())
    }

    async fn find_active_by_isbn(&self, isbn: &Isbn) -> Result<Option<Loan>> {
        let loans = self.loans.lock().map_err(|_| "loan store lock poisoned")?;
        Ok(loans
            .values()
            .find(|l| l.is_active() && l.isbn() == isbn)
            .cloned())
    }

    async fn find_active_by_member(&self, member_id: &MemberId) -> Result<Vec<Loan>> {
        self.filter_sorted(|l| l.is_active() && l.member_id() == member_id)
    }

    async fn find_by_member(&self, member_id: &MemberId) -> Result<Vec<Loan>> {
        self.filter_sorted(|l| l.member_id() == member_id)
    }
}
