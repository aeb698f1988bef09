//! Page markup. Pure functions of already-loaded data.

use maud::{html, Markup, DOCTYPE};

use crate::{
    config::LibraryConfig,
    models::{
        book::{Book, BookListing},
        session::{Role, SessionClaims},
        transaction::OutstandingLoan,
        user::UserSummary,
    },
};

use super::{Notice, NoticeKind, Panel};

const STYLE: &str = r#"
body { margin: 0; font-family: sans-serif; display: flex; min-height: 100vh; color: #2e3b55; }
aside { width: 18rem; padding: 1.5rem; background: #f0f2f6; }
main { flex: 1; padding: 2rem 3rem; }
aside form.auth label { display: block; margin-top: .75rem; }
aside form.auth input { width: 100%; box-sizing: border-box; }
nav.panels a { display: block; padding: .2rem 0; color: inherit; text-decoration: none; }
nav.panels a.selected::before { content: "\25C9  "; }
nav.panels a:not(.selected)::before { content: "\25CB  "; }
.notice { padding: .75rem 1rem; border-radius: 6px; margin: .75rem 0; }
.notice.success { background: #e6f4ea; }
.notice.error { background: #fdecea; }
.notice.info { background: #e8f0fe; }
.columns { display: grid; grid-template-columns: 1fr 1fr; gap: 2rem; }
table { border-collapse: collapse; width: 100%; }
th, td { border-bottom: 1px solid #ddd; padding: .35rem .5rem; text-align: left; }
.entry { margin: .5rem 0 1rem; }
.entry form { display: inline; }
.welcome { text-align: center; padding: 50px; background: #f4f4f4; border-radius: 10px; }
.welcome h1 { font-size: 48px; }
"#;

/// Everything the page shell needs besides the main panel
pub struct PageContext<'a> {
    pub library: &'a LibraryConfig,
    pub session: Option<&'a SessionClaims>,
    pub panel: Panel,
    pub notices: &'a [Notice],
}

pub fn page(ctx: &PageContext<'_>, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (ctx.library.name) " | Library Management" }
                style { (maud::PreEscaped(STYLE)) }
            }
            body {
                (sidebar(ctx))
                main {
                    @for notice in ctx.notices {
                        (notice_banner(notice))
                    }
                    (content)
                }
            }
        }
    }
}

fn notice_banner(notice: &Notice) -> Markup {
    let class = match notice.kind {
        NoticeKind::Success => "notice success",
        NoticeKind::Error => "notice error",
        NoticeKind::Info => "notice info",
    };
    html! { div class=(class) { (notice.text) } }
}

fn sidebar(ctx: &PageContext<'_>) -> Markup {
    html! {
        aside {
            h2 { "Authentication" }
            nav.panels {
                @for panel in Panel::ALL {
                    a.selected[panel == ctx.panel] href={ "/?panel=" (panel.slug()) } {
                        (panel.label())
                    }
                }
            }
            (auth_form(ctx.panel))
            @if let Some(session) = ctx.session {
                hr;
                p {
                    "Signed in as " strong { (session.sub) }
                    " (" (session.role.as_str()) ")"
                }
                form method="post" action="/logout" {
                    button type="submit" { "Log out" }
                }
            }
        }
    }
}

fn auth_form(panel: Panel) -> Markup {
    match panel {
        Panel::Register => html! {
            h3 { "User Registration" }
            form.auth method="post" action="/register" {
                label { "Full Name" input type="text" name="name" required; }
                label { "Email" input type="email" name="email" required; }
                label { "Password" input type="password" name="password" required; }
                p { button type="submit" { "Register" } }
            }
        },
        Panel::UserLogin => html! {
            h3 { "User Login" }
            form.auth method="post" action="/login/user" {
                label { "Email" input type="email" name="email" required; }
                label { "Password" input type="password" name="password" required; }
                p { button type="submit" { "Login" } }
            }
        },
        Panel::AdminLogin => html! {
            h3 { "Admin Login" }
            form.auth method="post" action="/login/admin" {
                label { "Admin Email" input type="email" name="email" required; }
                label { "Admin Password" input type="password" name="password" required; }
                p { button type="submit" { "Login" } }
            }
        },
    }
}

pub fn welcome(library: &LibraryConfig) -> Markup {
    html! {
        div.welcome {
            h1 { (library.name) }
            h3 { "\"" (library.tagline) "\"" }
            p {
                "Welcome to " (library.name) ". Explore thousands of books, borrow and return with ease. "
                "Please log in to continue."
            }
        }
    }
}

pub fn admin_dashboard(users: &[UserSummary], loans: &[OutstandingLoan]) -> Markup {
    html! {
        h1 { "Library Management System" }
        h2 { "Admin Panel" }
        div.columns {
            section {
                h3 { "Registered Users" }
                @if users.is_empty() {
                    (notice_banner(&Notice::info("No users registered yet.")))
                } @else {
                    table {
                        thead { tr { th { "User ID" } th { "Name" } th { "Email" } } }
                        tbody {
                            @for user in users {
                                tr { td { (user.user_id) } td { (user.name) } td { (user.email) } }
                            }
                        }
                    }
                }
            }
            section {
                h3 { "Borrowed Books" }
                @if loans.is_empty() {
                    (notice_banner(&Notice::info("No books are currently borrowed.")))
                } @else {
                    @for loan in loans {
                        div.entry {
                            strong { (loan.book_title) } " borrowed by " strong { (loan.user_name) }
                            " on " (loan.borrow_date.format("%Y-%m-%d %H:%M").to_string())
                            br;
                            form method="post" action="/return" {
                                input type="hidden" name="transaction_id" value=(loan.transaction_id);
                                input type="hidden" name="book_id" value=(loan.book_id);
                                button type="submit" { "Return '" (loan.book_title) "'" }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Search outcome shown above the borrow list
pub struct SearchView<'a> {
    pub query: &'a str,
    pub results: &'a [Book],
}

pub fn user_panel(
    search: Option<SearchView<'_>>,
    available: &[BookListing],
    my_loans: &[OutstandingLoan],
) -> Markup {
    html! {
        h1 { "Library Management System" }
        form method="get" action="/" {
            label {
                "Search for a book by title, author, or genre: "
                input type="search" name="q" value=[search.as_ref().map(|s| s.query)];
            }
            " "
            button type="submit" { "Search" }
        }
        @if let Some(search) = &search {
            @if search.results.is_empty() {
                (notice_banner(&Notice::error("No books found!")))
            } @else {
                table {
                    thead {
                        tr {
                            th { "Book ID" } th { "Title" } th { "Author" }
                            th { "Genre" } th { "Year" } th { "Available" }
                        }
                    }
                    tbody {
                        @for book in search.results {
                            tr {
                                td { (book.book_id) } td { (book.title) } td { (book.author) }
                                td { (book.genre) } td { (book.year) }
                                td { @if book.available { "Yes" } @else { "No" } }
                            }
                        }
                    }
                }
            }
        }
        @if !my_loans.is_empty() {
            h2 { "My Borrowed Books" }
            ul {
                @for loan in my_loans {
                    li { strong { (loan.book_title) } " since " (loan.borrow_date.format("%Y-%m-%d").to_string()) }
                }
            }
        }
        h2 { "Borrow a Book" }
        @for book in available {
            div.entry {
                strong { (book.title) } " by " (book.author) " (" (book.year) ") - " em { (book.genre) }
                br;
                form method="post" action="/borrow" {
                    input type="hidden" name="book_id" value=(book.book_id);
                    button type="submit" { "Borrow '" (book.title) "'" }
                }
            }
        }
    }
}

/// Main panel for the given session, when no data needs loading
pub fn role_heading(role: Role) -> Markup {
    match role {
        Role::Admin => html! { h1 { "Library Management System" } h2 { "Admin Panel" } },
        Role::User => html! { h1 { "Library Management System" } },
    }
}
