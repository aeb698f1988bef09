//! Form handlers. Each action calls one service and re-renders the page.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Form,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use maud::Markup;
use serde::Deserialize;
use serde_with::{serde_as, NoneAsEmptyString};

use crate::{
    error::{AppError, Missing},
    models::{
        book::Book,
        session::{Role, SessionClaims},
        user::RegisterUser,
    },
    AppState,
};

use super::{
    views::{self, PageContext, SearchView},
    MaybeSession, Notice, Panel,
};

#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct HomeQuery {
    #[serde(default)]
    pub panel: Panel,
    /// Search term; blank means no search
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct BorrowForm {
    pub book_id: i32,
}

#[derive(Debug, Deserialize)]
pub struct ReturnForm {
    pub transaction_id: i32,
    pub book_id: Option<i32>,
}

pub async fn home(
    State(state): State<AppState>,
    MaybeSession(session): MaybeSession,
    Query(query): Query<HomeQuery>,
) -> Markup {
    let search = query.q.as_deref().map(str::trim).filter(|q| !q.is_empty());
    render_home(&state, session.as_ref(), query.panel, Vec::new(), search).await
}

pub async fn register(
    State(state): State<AppState>,
    MaybeSession(session): MaybeSession,
    Form(form): Form<RegisterUser>,
) -> Markup {
    let notice = match state.services.auth.register_user(form).await {
        Ok(_) => Notice::success("Registration successful! Please log in."),
        Err(e) => Notice::error(describe(&e)),
    };

    render_home(&state, session.as_ref(), Panel::Register, vec![notice], None).await
}

pub async fn login_user(
    State(state): State<AppState>,
    MaybeSession(session): MaybeSession,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> (CookieJar, Markup) {
    let auth = &state.services.auth;

    let outcome = match auth.login_user(&form.email, &form.password).await {
        Ok(Some(login)) => auth
            .issue_session(&form.email, login.user_id, login.role)
            .map(Some),
        Ok(None) => Ok(None),
        Err(e) => Err(e),
    };

    finish_login(&state, jar, session, Panel::UserLogin, outcome, "Invalid email or password!").await
}

pub async fn login_admin(
    State(state): State<AppState>,
    MaybeSession(session): MaybeSession,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> (CookieJar, Markup) {
    let auth = &state.services.auth;

    let outcome = match auth.login_admin(&form.email, &form.password).await {
        Ok(Some(login)) => auth
            .issue_session(&form.email, login.admin_id, Role::Admin)
            .map(Some),
        Ok(None) => Ok(None),
        Err(e) => Err(e),
    };

    finish_login(&state, jar, session, Panel::AdminLogin, outcome, "Invalid admin credentials!").await
}

async fn finish_login(
    state: &AppState,
    jar: CookieJar,
    previous: Option<SessionClaims>,
    panel: Panel,
    outcome: Result<Option<(SessionClaims, String)>, AppError>,
    rejected: &str,
) -> (CookieJar, Markup) {
    match outcome {
        Ok(Some((claims, token))) => {
            let label = match claims.role {
                Role::User => "User",
                Role::Admin => "Admin",
            };
            let notice = Notice::success(format!("Logged in as {} ({})", label, claims.sub));
            let cookie = Cookie::build((state.config.auth.session_cookie.clone(), token))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax);
            let page = render_home(state, Some(&claims), panel, vec![notice], None).await;
            (jar.add(cookie), page)
        }
        Ok(None) => {
            let page =
                render_home(state, previous.as_ref(), panel, vec![Notice::error(rejected)], None).await;
            (jar, page)
        }
        Err(e) => {
            let notice = Notice::error(describe(&e));
            let page = render_home(state, previous.as_ref(), panel, vec![notice], None).await;
            (jar, page)
        }
    }
}

pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Markup) {
    let mut cookie = Cookie::build((state.config.auth.session_cookie.clone(), ""))
        .path("/")
        .build();
    cookie.make_removal();

    let page = render_home(&state, None, Panel::UserLogin, vec![Notice::info("Logged out.")], None).await;
    (jar.add(cookie), page)
}

pub async fn borrow(
    State(state): State<AppState>,
    MaybeSession(session): MaybeSession,
    Form(form): Form<BorrowForm>,
) -> (StatusCode, Markup) {
    let Some(claims) = session else {
        return denied(&state, None, AppError::Authentication("Please log in to borrow books.".into()));
    };
    let user_id = match claims.require_user() {
        Ok(id) => id,
        Err(e) => return denied(&state, Some(&claims), e),
    };

    let notice = match state.services.loans.borrow_book(user_id, form.book_id).await {
        Ok(_) => Notice::success("Book borrowed successfully!"),
        Err(AppError::Unavailable(_)) => Notice::error("Book is already borrowed!"),
        Err(e) => Notice::error(describe(&e)),
    };

    let page = render_home(&state, Some(&claims), Panel::default(), vec![notice], None).await;
    (StatusCode::OK, page)
}

pub async fn return_book(
    State(state): State<AppState>,
    MaybeSession(session): MaybeSession,
    Form(form): Form<ReturnForm>,
) -> (StatusCode, Markup) {
    let Some(claims) = session else {
        return denied(&state, None, AppError::Authentication("Please log in as an administrator.".into()));
    };
    if let Err(e) = claims.require_admin() {
        return denied(&state, Some(&claims), e);
    }

    let notice = match state
        .services
        .loans
        .return_book(form.transaction_id, form.book_id)
        .await
    {
        Ok(_) => Notice::success("Book returned successfully!"),
        Err(AppError::NotFound(Missing::Transaction, _)) => Notice::error("Transaction not found."),
        Err(e) => Notice::error(describe(&e)),
    };

    let page = render_home(&state, Some(&claims), Panel::AdminLogin, vec![notice], None).await;
    (StatusCode::OK, page)
}

/// Page for an action the session may not perform. Loads no data.
fn denied(state: &AppState, session: Option<&SessionClaims>, error: AppError) -> (StatusCode, Markup) {
    let status = error.status_code();
    let notices = [Notice::error(describe(&error))];
    let content = match session {
        Some(claims) => views::role_heading(claims.role),
        None => views::welcome(&state.config.library),
    };
    let ctx = PageContext {
        library: &state.config.library,
        session,
        panel: Panel::default(),
        notices: &notices,
    };
    (status, views::page(&ctx, content))
}

/// Load the main panel for the session and render the page
async fn render_home(
    state: &AppState,
    session: Option<&SessionClaims>,
    panel: Panel,
    mut notices: Vec<Notice>,
    search: Option<&str>,
) -> Markup {
    let services = &state.services;

    let content = match session {
        None => views::welcome(&state.config.library),
        Some(claims) if claims.is_admin() => {
            let users = or_notice(services.auth.list_users().await, &mut notices);
            let loans = or_notice(services.loans.outstanding_loans().await, &mut notices);
            views::admin_dashboard(&users, &loans)
        }
        Some(claims) => {
            let results: Option<Vec<Book>> = match search {
                Some(term) => Some(or_notice(services.catalog.search_books(term).await, &mut notices)),
                None => None,
            };
            let available = or_notice(services.catalog.available_books().await, &mut notices);
            let my_loans = or_notice(services.loans.user_loans(claims.principal_id).await, &mut notices);

            let search_view = match (search, results.as_deref()) {
                (Some(query), Some(results)) => Some(SearchView { query, results }),
                _ => None,
            };
            views::user_panel(search_view, &available, &my_loans)
        }
    };

    let ctx = PageContext {
        library: &state.config.library,
        session,
        panel,
        notices: &notices,
    };
    views::page(&ctx, content)
}

fn or_notice<T: Default>(result: Result<T, AppError>, notices: &mut Vec<Notice>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            notices.push(Notice::error(describe(&e)));
            T::default()
        }
    }
}

/// User-facing text for an error; store failures are not detailed
fn describe(error: &AppError) -> String {
    match error {
        AppError::Database(_) | AppError::Internal(_) => {
            tracing::error!("{}", error);
            "Something went wrong. Please try again.".to_string()
        }
        other => other.public_message(),
    }
}
