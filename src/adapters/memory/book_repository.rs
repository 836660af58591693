use crate::domain::{Book, Isbn};
use crate::ports::book_repository::{BookRepository as BookRepositoryTrait, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// BookRepositoryのインメモリ実装
///
/// ISBNをキーとしたHashMapで蔵書を保持する。
/// カタログの初期登録は`with_books`または`save`で行う。
pub struct BookRepository {
    books: Mutex<HashMap<Isbn, Book>>,
}

impl BookRepository {
    pub fn new() -> Self {
        Self {
            books: Mutex::new(HashMap::new()),
        }
    }

    /// 蔵書を登録済みの状態で作成
    pub fn with_books(books: impl IntoIterator<Item = Book>) -> Self {
        let books = books
            .into_iter()
            .map(|book| (book.isbn().clone(), book))
            .collect();
        Self {
            books: Mutex::new(books),
        }
    }
}

impl Default for BookRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookRepositoryTrait for BookRepository {
    async fn find_by_isbn(&self, isbn: &Isbn) -> Result<Option<Book>> {
        let books = self.books.lock().map_err(|_| "book store lock poisoned")?;
        Ok(books.get(isbn).cloned())
    }

    async fn save(&self, book: Book) -> Result<()> {
        let mut books = self.books.lock().map_err(|_| "book store lock poisoned")?;
        books.insert(book.isbn().clone(), book);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_overwrites_existing_book() {
        let repo = BookRepository::with_books([Book::new(Isbn::new("ISBN-001"), "Clean Code")]);

        let mut book = repo.find_by_isbn(&Isbn::new("ISBN-001")).await.unwrap().unwrap();
        book.mark_borrowed();
        repo.save(book).await.unwrap();

        let stored = repo.find_by_isbn(&Isbn::new("ISBN-001")).await.unwrap().unwrap();
        assert!(!stored.is_available());
    }

    #[tokio::test]
    async fn test_find_unknown_isbn_returns_none() {
        let repo = BookRepository::new();
        let found = repo.find_by_isbn(&Isbn::new("ISBN-404")).await.unwrap();
        assert!(found.is_none());
    }
}
