use chrono::{Duration, NaiveDate};
use library_loans::{
    adapters::{
        FixedClock, InMemoryBookRepository, InMemoryLoanRepository, InMemoryMemberRepository,
        SystemClock,
    },
    application::loan::{LoanService, ServiceDependencies},
    config::LoanPolicy,
    domain::{Book, Isbn, Member, MemberId},
    ports::Clock,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "library_loans=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let policy = LoanPolicy::from_env()?;
    tracing::info!(
        loan_period_days = policy.loan_period_days,
        max_active_loans = policy.max_active_loans,
        daily_late_fee = %policy.daily_late_fee,
        "Loan policy loaded"
    );

    // LIBRARY_TODAY=YYYY-MM-DD pins the demo date; otherwise the system clock is used
    let start = match std::env::var("LIBRARY_TODAY") {
        Ok(raw) => raw.parse::<NaiveDate>()?,
        Err(_) => SystemClock.today(),
    };
    let clock = Arc::new(FixedClock::new(start));

    let service_deps = ServiceDependencies {
        book_repository: Arc::new(InMemoryBookRepository::with_books([
            Book::new(Isbn::new("ISBN-001"), "Clean Code"),
            Book::new(Isbn::new("ISBN-002"), "Domain-Driven Design"),
            Book::new(Isbn::new("ISBN-003"), "Refactoring"),
        ])),
        member_repository: Arc::new(InMemoryMemberRepository::with_members([
            Member::new(MemberId::new("M-01"), "Ana"),
            Member::new(MemberId::new("M-02"), "Luis"),
        ])),
        loan_repository: Arc::new(InMemoryLoanRepository::new()),
        clock: clock.clone(),
    };
    let service = LoanService::new(service_deps, policy);

    let loan = service
        .loan_book(&Isbn::new("ISBN-003"), &MemberId::new("M-01"))
        .await?;
    println!("{}", serde_json::to_string_pretty(&loan)?);

    // Return three days after the due date
    clock.set(loan.due_date() + Duration::days(3));

    let fee = service.return_book(loan.id()).await?;
    println!("late fee: {fee}");

    Ok(())
}
