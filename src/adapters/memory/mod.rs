pub mod book_repository;
pub mod loan_repository;
pub mod member_repository;

pub use book_repository::BookRepository as InMemoryBookRepository;
pub use loan_repository::LoanRepository as InMemoryLoanRepository;
pub use member_repository::MemberRepository as InMemoryMemberRepository;
