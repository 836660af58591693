use serde::{Deserialize, Serialize};

use super::Isbn;

/// 蔵書
///
/// 不変条件：`available`がtrueであることと、このISBNを参照する
/// 貸出中の貸出が存在しないことは同値（LoanServiceが維持する）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    isbn: Isbn,
    title: String,
    available: bool,
}

impl Book {
    /// カタログ登録時は貸出可能
    pub fn new(isbn: Isbn, title: impl Into<String>) -> Self {
        Self {
            isbn,
            title: title.into(),
            available: true,
        }
    }

    pub fn isbn(&self) -> &Isbn {
        &self.isbn
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    pub fn mark_borrowed(&mut self) {
        self.available = false;
    }

    pub fn mark_returned(&mut self) {
        self.available = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_book_is_available() {
        let book = Book::new(Isbn::new("ISBN-001"), "Clean Code");
        assert!(book.is_available());
        assert_eq!(book.title(), "Clean Code");
        assert_eq!(book.isbn().as_str(), "ISBN-001");
    }

    #[test]
    fn test_mark_borrowed_then_returned() {
        let mut book = Book::new(Isbn::new("ISBN-001"), "Clean Code");

        book.mark_borrowed();
        assert!(!book.is_available());

        book.mark_returned();
        assert!(book.is_available());
    }
}
