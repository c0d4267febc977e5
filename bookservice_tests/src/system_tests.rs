use bookservice_library::api::BookId;
use bookservice_library::client::BookServiceLibraryClient;
use reqwest::StatusCode;

fn bookservice_library_url() -> String {
    std::env::var("BOOKSERVICE_URL").unwrap_or("http://127.0.0.1:8080".to_string())
}

#[tokio::test]
/// Simple test for bookservice library
/// Creates a book
/// Gets the book
/// Adds comments to the book
/// Gets list of books and checks comment count
/// Deletes the book
async fn bookservice_library_e2e_test() {
    let client = BookServiceLibraryClient::new(&bookservice_library_url())
        .expect("Failed to create client");

    let created = client
        .add_book("<b>x</b>")
        .await
        .expect("Failed to add book");
    assert_eq!(created.title, "&lt;b&gt;x&lt;&#x2F;b&gt;");

    let book = client
        .get_book(created.book_id)
        .await
        .expect("Failed to get book")
        .expect("Book not found");
    assert_eq!(book.title, created.title);
    assert!(book.comments.is_empty());

    client
        .add_comment(created.book_id, "first")
        .await
        .expect("Failed to add comment")
        .expect("Book not found");
    let book = client
        .add_comment(created.book_id, "second")
        .await
        .expect("Failed to add comment")
        .expect("Book not found");
    assert_eq!(book.comments, vec!["first".to_string(), "second".to_string()]);

    let books = client.list_books().await.expect("Failed to list books");
    let summary = books
        .iter()
        .find(|summary| summary.book_id == created.book_id)
        .expect("Book missing from list");
    assert_eq!(summary.commentcount, 2);

    assert!(client
        .delete_book(created.book_id)
        .await
        .expect("Failed to delete book"));
    assert!(!client
        .delete_book(created.book_id)
        .await
        .expect("Failed to delete book"));
    assert_eq!(
        client
            .get_book(created.book_id)
            .await
            .expect("Failed to get book"),
        None
    );
}

#[tokio::test]
/// Checks plain text answers for invalid input and missing books
async fn bookservice_library_validation_test() {
    let url = bookservice_library_url();
    let http = reqwest::Client::new();

    let response = http
        .post(format!("{url}/api/books"))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response.text().await.unwrap(), "missing required field title");

    let response = http
        .get(format!("{url}/api/books/8faf84"))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response.text().await.unwrap(), "_id error");

    let response = http
        .get(format!("{url}/api/books/8faf84b9d50ae9233ea21a13"))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "no book exists");

    let client = BookServiceLibraryClient::new(&url).expect("Failed to create client");
    let missing: BookId = "8faf84b9d50ae9233ea21a13".parse().unwrap();
    assert_eq!(
        client
            .add_comment(missing, "lost")
            .await
            .expect("Failed to add comment"),
        None
    );
}

#[tokio::test]
#[ignore = "wipes every book in the target service"]
/// Deletes all books and checks that the list is empty afterwards
async fn bookservice_library_delete_all_test() {
    let client = BookServiceLibraryClient::new(&bookservice_library_url())
        .expect("Failed to create client");

    client.add_book("to be removed").await.expect("Failed to add book");
    client
        .delete_all_books()
        .await
        .expect("Failed to delete all books");
    assert_eq!(client.list_books().await.expect("Failed to list books"), vec![]);
}
