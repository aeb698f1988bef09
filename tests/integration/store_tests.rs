//! Store-level tests against the database at `DATABASE_URL`

use libris_server::{
    config::AuthConfig,
    error::{AppError, Missing},
    models::user::RegisterUser,
    repository::Repository,
    services::Services,
};
use sqlx::PgPool;

async fn setup() -> (PgPool, Services) {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = PgPool::connect(&url).await.expect("Failed to connect");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    let auth = AuthConfig {
        jwt_secret: "store-tests".to_string(),
        jwt_expiration_hours: 1,
        session_cookie: "libris_session".to_string(),
    };
    let services = Services::new(Repository::new(pool.clone()), auth);
    (pool, services)
}

fn unique_suffix() -> u128 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos()
}

fn unique_email(prefix: &str) -> String {
    format!("{}-{}@example.org", prefix, unique_suffix())
}

async fn new_user(services: &Services) -> i32 {
    services
        .auth
        .register_user(RegisterUser {
            name: "Store Reader".into(),
            email: unique_email("store"),
            password: "secret".into(),
        })
        .await
        .expect("Failed to register")
        .user_id
}

async fn new_book(pool: &PgPool, genre: &str) -> i32 {
    insert_book(pool, "Quiet river song", "Meera Iyer", genre).await
}

async fn insert_book(pool: &PgPool, title: &str, author: &str, genre: &str) -> i32 {
    sqlx::query_scalar(
        "INSERT INTO books (title, author, genre, year, available) VALUES ($1, $2, $3, $4, TRUE) RETURNING book_id",
    )
    .bind(title)
    .bind(author)
    .bind(genre)
    .bind(1987)
    .fetch_one(pool)
    .await
    .expect("Failed to insert book")
}

async fn is_available(pool: &PgPool, book_id: i32) -> bool {
    sqlx::query_scalar("SELECT available FROM books WHERE book_id = $1")
        .bind(book_id)
        .fetch_one(pool)
        .await
        .expect("Failed to read book")
}

async fn open_loans(pool: &PgPool, book_id: i32) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM transactions WHERE book_id = $1")
        .bind(book_id)
        .fetch_one(pool)
        .await
        .expect("Failed to count loans")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_register_then_login() {
    let (_pool, services) = setup().await;
    let email = unique_email("login");

    let user = services
        .auth
        .register_user(RegisterUser {
            name: "  Padded Name ".into(),
            email: email.clone(),
            password: "secret".into(),
        })
        .await
        .unwrap();
    assert_eq!(user.name, "Padded Name");

    let login = services.auth.login_user(&email, "secret").await.unwrap();
    assert_eq!(login.map(|l| l.user_id), Some(user.user_id));

    let upper = services.auth.login_user(&email.to_uppercase(), "secret").await.unwrap();
    assert_eq!(upper.map(|l| l.user_id), Some(user.user_id));

    assert!(services.auth.login_user(&email, "wrong").await.unwrap().is_none());
    assert!(services
        .auth
        .login_user(&unique_email("nobody"), "secret")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
#[ignore]
async fn test_duplicate_registration() {
    let (pool, services) = setup().await;
    let email = unique_email("dup");
    let request = RegisterUser {
        name: "Twice".into(),
        email: email.clone(),
        password: "secret".into(),
    };

    services.auth.register_user(request.clone()).await.unwrap();
    let err = services
        .auth
        .register_user(RegisterUser {
            email: email.to_uppercase(),
            ..request
        })
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Conflict(_)));

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE LOWER(email) = LOWER($1)")
        .bind(&email)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(rows, 1);
}

#[tokio::test]
#[ignore]
async fn test_admin_with_plaintext_password_cannot_log_in() {
    let (pool, services) = setup().await;
    let email = unique_email("legacy-admin");
    sqlx::query("INSERT INTO admin (email, password) VALUES ($1, $2)")
        .bind(&email)
        .bind("admin123")
        .execute(&pool)
        .await
        .unwrap();

    assert!(services.auth.login_admin(&email, "admin123").await.unwrap().is_none());
    assert!(services.auth.login_admin(&email, "wrong").await.unwrap().is_none());

    services.auth.ensure_admin(&email, "admin123").await.unwrap();
    let login = services.auth.login_admin(&email, "admin123").await.unwrap();
    assert!(login.is_some());
}

#[tokio::test]
#[ignore]
async fn test_borrow_then_return_restores_book() {
    let (pool, services) = setup().await;
    let user_id = new_user(&services).await;
    let book_id = new_book(&pool, "Mystery").await;

    let transaction = services.loans.borrow_book(user_id, book_id).await.unwrap();
    assert!(!is_available(&pool, book_id).await);
    assert_eq!(open_loans(&pool, book_id).await, 1);

    let history = services.loans.history(Some(user_id)).await.unwrap();
    assert_eq!(history.len(), 1);
    assert!(history[0].return_date.is_none());

    let receipt = services
        .loans
        .return_book(transaction.transaction_id, Some(book_id))
        .await
        .unwrap();
    assert_eq!(receipt.book_id, book_id);

    assert!(is_available(&pool, book_id).await);
    assert_eq!(open_loans(&pool, book_id).await, 0);

    let history = services.loans.history(Some(user_id)).await.unwrap();
    assert_eq!(history[0].return_date, Some(receipt.return_date));
}

#[tokio::test]
#[ignore]
async fn test_borrow_unavailable_book_changes_nothing() {
    let (pool, services) = setup().await;
    let first = new_user(&services).await;
    let second = new_user(&services).await;
    let book_id = new_book(&pool, "Horror").await;

    services.loans.borrow_book(first, book_id).await.unwrap();
    let err = services.loans.borrow_book(second, book_id).await.unwrap_err();

    assert!(matches!(err, AppError::Unavailable(_)));
    assert_eq!(open_loans(&pool, book_id).await, 1);
    assert!(services.loans.user_loans(second).await.unwrap().is_empty());
    assert!(services.loans.history(Some(second)).await.unwrap().is_empty());
}

#[tokio::test]
#[ignore]
async fn test_concurrent_borrows_have_one_winner() {
    let (pool, services) = setup().await;
    let first = new_user(&services).await;
    let second = new_user(&services).await;
    let book_id = new_book(&pool, "Romance").await;

    let (a, b) = tokio::join!(
        services.loans.borrow_book(first, book_id),
        services.loans.borrow_book(second, book_id)
    );

    assert_eq!(a.is_ok() as u8 + b.is_ok() as u8, 1);
    assert_eq!(open_loans(&pool, book_id).await, 1);
}

#[tokio::test]
#[ignore]
async fn test_return_unknown_transaction_writes_nothing() {
    let (pool, services) = setup().await;
    let user_id = new_user(&services).await;
    let book_id = new_book(&pool, "History").await;
    services.loans.borrow_book(user_id, book_id).await.unwrap();

    let err = services.loans.return_book(i32::MAX, None).await.unwrap_err();

    assert!(matches!(err, AppError::NotFound(Missing::Transaction, _)));
    assert!(!is_available(&pool, book_id).await);
    assert_eq!(open_loans(&pool, book_id).await, 1);
}

#[tokio::test]
#[ignore]
async fn test_return_with_mismatched_book_is_rejected() {
    let (pool, services) = setup().await;
    let user_id = new_user(&services).await;
    let book_id = new_book(&pool, "Biography").await;
    let transaction = services.loans.borrow_book(user_id, book_id).await.unwrap();

    let err = services
        .loans
        .return_book(transaction.transaction_id, Some(book_id + 1))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::BadRequest(_)));
    assert_eq!(open_loans(&pool, book_id).await, 1);
}

#[tokio::test]
#[ignore]
async fn test_search_ignores_case() {
    let (pool, services) = setup().await;
    let book_id = new_book(&pool, "Fantasy").await;

    for term in ["fantasy", "FANTASY", "  Fantasy "] {
        let found = services.catalog.search_books(term).await.unwrap();
        assert!(found.iter().any(|b| b.book_id == book_id), "term {:?}", term);
    }
}

#[tokio::test]
#[ignore]
async fn test_available_books_exclude_borrowed() {
    let (pool, services) = setup().await;
    let user_id = new_user(&services).await;
    let book_id = new_book(&pool, "Self-Help").await;

    services.loans.borrow_book(user_id, book_id).await.unwrap();
    let available = services.catalog.available_books().await.unwrap();

    assert!(available.iter().all(|b| b.book_id != book_id));
}

#[tokio::test]
#[ignore]
async fn test_search_matches_title_and_author() {
    let (pool, services) = setup().await;
    let marker = format!("Zq{}", unique_suffix());
    let by_title = insert_book(&pool, &format!("The {} Atlas", marker), "Rosa Chen", "History").await;
    let by_author = insert_book(&pool, "Paper lantern", &format!("Author {}", marker), "Fiction").await;

    let found = services.catalog.search_books(&marker.to_lowercase()).await.unwrap();
    let ids: Vec<i32> = found.iter().map(|b| b.book_id).collect();
    assert!(ids.contains(&by_title));
    assert!(ids.contains(&by_author));

    let found = services
        .catalog
        .search_books(&format!("author {}", marker.to_uppercase()))
        .await
        .unwrap();
    assert_eq!(found.iter().map(|b| b.book_id).collect::<Vec<_>>(), vec![by_author]);
}

#[tokio::test]
#[ignore]
async fn test_search_wildcards_match_literally() {
    let (pool, services) = setup().await;
    let marker = format!("Zq{}", unique_suffix());
    let book_id = insert_book(&pool, &format!("The {} 100% Book", marker), "Liam Clark", "Self-Help").await;

    let percent = services.catalog.search_books("100%").await.unwrap();
    assert!(percent.iter().any(|b| b.book_id == book_id));

    let underscore = services.catalog.search_books("1_0").await.unwrap();
    assert!(underscore.iter().all(|b| b.book_id != book_id));

    let pattern = services
        .catalog
        .search_books(&format!("{} 1%", marker))
        .await
        .unwrap();
    assert!(pattern.is_empty());
}
