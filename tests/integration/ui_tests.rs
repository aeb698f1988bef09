//! HTML interface flows against the database at `DATABASE_URL`
//!
//! Each request goes through the full router; the session cookie from
//! `Set-Cookie` is carried into the following requests.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use sqlx::PgPool;
use tower::ServiceExt;

use libris_server::{
    config::AppConfig, create_router, repository::Repository, services::Services, AppState,
};

struct TestApp {
    router: Router,
    pool: PgPool,
    services: Arc<Services>,
}

async fn setup() -> TestApp {
    let mut config = AppConfig::default();
    config.database.url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    config.auth.jwt_secret = "ui-tests".to_string();

    let pool = PgPool::connect(&config.database.url)
        .await
        .expect("Failed to connect");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    let services = Arc::new(Services::new(Repository::new(pool.clone()), config.auth.clone()));
    let router = create_router(AppState {
        config: Arc::new(config),
        services: services.clone(),
    });

    TestApp { router, pool, services }
}

fn unique_suffix() -> u128 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos()
}

struct Page {
    status: StatusCode,
    session: Option<String>,
    html: String,
}

impl TestApp {
    async fn send(&self, request: Request<Body>) -> Page {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let session = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(str::to_string);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();

        Page {
            status,
            session,
            html: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }

    async fn post(&self, path: &str, cookie: Option<&str>, form: &str) -> Page {
        let mut request = Request::post(path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        self.send(request.body(Body::from(form.to_string())).unwrap()).await
    }

    async fn get(&self, path: &str, cookie: &str) -> Page {
        let request = Request::get(path)
            .header(header::COOKIE, cookie)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    async fn new_book(&self, title: &str) -> i32 {
        sqlx::query_scalar(
            "INSERT INTO books (title, author, genre, year, available) VALUES ($1, 'Kavya Reddy', 'Fantasy', 2001, TRUE) RETURNING book_id",
        )
        .bind(title)
        .fetch_one(&self.pool)
        .await
        .unwrap()
    }

    async fn open_transaction(&self, book_id: i32) -> i32 {
        sqlx::query_scalar("SELECT transaction_id FROM transactions WHERE book_id = $1")
            .bind(book_id)
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }

    async fn is_available(&self, book_id: i32) -> bool {
        sqlx::query_scalar("SELECT available FROM books WHERE book_id = $1")
            .bind(book_id)
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_register_then_login_as_user() {
    let app = setup().await;
    let email = format!("ui-user-{}@example.org", unique_suffix());
    let form = format!("name=Asha+Verma&email={}&password=secret", email);

    let registered = app.post("/register", None, &form).await;
    assert_eq!(registered.status, StatusCode::OK);
    assert!(registered.html.contains("Registration successful! Please log in."));
    assert!(registered.session.is_none());

    let again = app.post("/register", None, &form).await;
    assert!(again.html.contains("User already exists! Try logging in."));

    let rejected = app
        .post("/login/user", None, &format!("email={}&password=wrong", email))
        .await;
    assert!(rejected.html.contains("Invalid email or password!"));
    assert!(rejected.session.is_none());

    let logged_in = app
        .post("/login/user", None, &format!("email={}&password=secret", email))
        .await;
    assert!(logged_in.html.contains(&format!("Logged in as User ({})", email)));
    assert!(logged_in.html.contains("Borrow a Book"));
    let cookie = logged_in.session.expect("session cookie");
    assert!(cookie.starts_with("libris_session="));

    let home = app.get("/", &cookie).await;
    assert!(home.html.contains("Search for a book"));
    assert!(!home.html.contains("Please log in to continue."));
}

#[tokio::test]
#[ignore]
async fn test_user_borrows_and_admin_returns() {
    let app = setup().await;
    let suffix = unique_suffix();
    let title = format!("Lantern Zq{}", suffix);
    let book_id = app.new_book(&title).await;

    let email = format!("ui-borrower-{}@example.org", suffix);
    app.post("/register", None, &format!("name=Borrower&email={}&password=secret", email))
        .await;
    let user_cookie = app
        .post("/login/user", None, &format!("email={}&password=secret", email))
        .await
        .session
        .expect("user session");

    let borrowed = app
        .post("/borrow", Some(&user_cookie), &format!("book_id={}", book_id))
        .await;
    assert_eq!(borrowed.status, StatusCode::OK);
    assert!(borrowed.html.contains("Book borrowed successfully!"));
    assert!(borrowed.html.contains("My Borrowed Books"));
    assert!(borrowed.html.contains(&title));
    assert!(!app.is_available(book_id).await);

    let again = app
        .post("/borrow", Some(&user_cookie), &format!("book_id={}", book_id))
        .await;
    assert!(again.html.contains("Book is already borrowed!"));

    let search = app
        .get(&format!("/?q=zq{}", suffix), &user_cookie)
        .await;
    assert!(search.html.contains(&title));
    assert!(search.html.contains("<td>No</td>"));

    // Users may not return books
    let transaction_id = app.open_transaction(book_id).await;
    let forbidden = app
        .post("/return", Some(&user_cookie), &format!("transaction_id={}", transaction_id))
        .await;
    assert_eq!(forbidden.status, StatusCode::FORBIDDEN);

    let admin_email = format!("ui-admin-{}@example.org", suffix);
    app.services.auth.ensure_admin(&admin_email, "letmein").await.unwrap();
    let admin = app
        .post("/login/admin", None, &format!("email={}&password=letmein", admin_email))
        .await;
    assert!(admin.html.contains(&format!("Logged in as Admin ({})", admin_email)));
    assert!(admin.html.contains("Admin Panel"));
    assert!(admin.html.contains(&format!(r#"name="transaction_id" value="{}""#, transaction_id)));
    let admin_cookie = admin.session.expect("admin session");

    let form = format!("transaction_id={}&book_id={}", transaction_id, book_id);
    let returned = app.post("/return", Some(&admin_cookie), &form).await;
    assert!(returned.html.contains("Book returned successfully!"));
    assert!(app.is_available(book_id).await);

    let twice = app.post("/return", Some(&admin_cookie), &form).await;
    assert_eq!(twice.status, StatusCode::OK);
    assert!(twice.html.contains("Transaction not found."));
}

#[tokio::test]
#[ignore]
async fn test_wrong_admin_password_stays_anonymous() {
    let app = setup().await;
    let admin_email = format!("ui-admin-{}@example.org", unique_suffix());
    app.services.auth.ensure_admin(&admin_email, "letmein").await.unwrap();

    let page = app
        .post("/login/admin", None, &format!("email={}&password=nope", admin_email))
        .await;

    assert!(page.session.is_none());
    assert!(page.html.contains("Invalid admin credentials!"));
    assert!(page.html.contains("Please log in to continue."));
}
