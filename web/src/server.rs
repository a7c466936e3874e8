// src/server.rs
//! Frontend routes
//!
//! # Routes
//! - `GET /` - Landing page with backend status and the session or form
//! - `POST /sign-in` - Sign-in / sign-up form post (also handles the mode toggle)
//! - `POST /sign-out` - Ends the backend session
//! - `POST /theme` - Flips the theme cookie

use axum::{
    extract::{Extension, Form},
    http::{header, HeaderMap, HeaderValue},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::auth_client::{AuthClient, AuthClientError, SessionUser};
use crate::components::{landing_page, LandingPage, Theme};
use crate::health::HealthClient;
use crate::sign_in_form::{FormMode, SignInForm, Submission};

/// Shared by every handler
pub struct WebState {
    pub health: HealthClient,
    pub auth: AuthClient,
}

pub fn web_routes(state: Arc<WebState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/sign-in", post(sign_in))
        .route("/sign-out", post(sign_out))
        .route("/theme", post(toggle_theme))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
}

/// Fields of the sign-in form post
#[derive(Debug, Deserialize)]
pub struct SignInFormInput {
    #[serde(default)]
    pub mode: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub name: String,
    /// `toggle` switches mode; anything else submits
    #[serde(default)]
    pub action: String,
}

impl SignInFormInput {
    fn into_form(self) -> SignInForm {
        SignInForm {
            mode: FormMode::parse(&self.mode),
            email: self.email,
            password: self.password,
            name: self.name,
            ..SignInForm::new()
        }
    }
}

fn cookie_header(headers: &HeaderMap) -> Option<&str> {
    headers.get(header::COOKIE).and_then(|v| v.to_str().ok())
}

/// 303 to `/`, carrying the given `Set-Cookie` values
fn redirect_home(cookies: Vec<String>) -> Response {
    let mut response = Redirect::to("/").into_response();
    for cookie in cookies {
        match HeaderValue::from_str(&cookie) {
            Ok(value) => {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
            Err(e) => warn!(error = %e, "Dropping unrelayable Set-Cookie header"),
        }
    }
    response
}

async fn current_user(state: &WebState, cookie: Option<&str>) -> Option<SessionUser> {
    // Without a cookie there is nothing the backend could find
    if cookie.is_none() {
        return None;
    }
    match state.auth.get_session(cookie).await {
        Ok(relayed) => relayed.data.map(|session| session.user),
        Err(e) => {
            warn!(error = %e, "Session lookup failed");
            None
        }
    }
}

async fn render(state: &WebState, headers: &HeaderMap, form: &SignInForm) -> Html<String> {
    let cookie = cookie_header(headers);
    let (health, user) = tokio::join!(state.health.check(), current_user(state, cookie));

    Html(landing_page(&LandingPage {
        health: &health,
        user: user.as_ref(),
        form,
        theme: Theme::from_cookie_header(cookie),
    }))
}

/// GET /
async fn index(Extension(state): Extension<Arc<WebState>>, headers: HeaderMap) -> Html<String> {
    render(&state, &headers, &SignInForm::new()).await
}

/// POST /sign-in
async fn sign_in(
    Extension(state): Extension<Arc<WebState>>,
    headers: HeaderMap,
    Form(input): Form<SignInFormInput>,
) -> Response {
    let toggle = input.action == "toggle";
    let mut form = input.into_form();

    if toggle {
        form.toggle_mode();
        return render(&state, &headers, &form).await.into_response();
    }

    let cookie = cookie_header(&headers);
    let result: Result<Vec<String>, AuthClientError> = match form.begin_submit() {
        Submission::SignIn(body) => state
            .auth
            .sign_in_email(&body, cookie)
            .await
            .map(|relayed| relayed.set_cookies),
        Submission::SignUp(body) => state
            .auth
            .sign_up_email(&body, cookie)
            .await
            .map(|relayed| relayed.set_cookies),
    };

    match result {
        Ok(cookies) => {
            form.finish_submit::<AuthClientError>(Ok(()));
            info!(mode = form.mode.as_str(), "Authenticated");
            redirect_home(cookies)
        }
        Err(e) => {
            warn!(mode = form.mode.as_str(), error = %e, "Authentication failed");
            form.finish_submit(Err(e));
            render(&state, &headers, &form).await.into_response()
        }
    }
}

/// POST /sign-out
async fn sign_out(Extension(state): Extension<Arc<WebState>>, headers: HeaderMap) -> Response {
    match state.auth.sign_out(cookie_header(&headers)).await {
        Ok(relayed) => redirect_home(relayed.set_cookies),
        Err(e) => {
            warn!(error = %e, "Sign-out failed");
            redirect_home(Vec::new())
        }
    }
}

/// POST /theme
async fn toggle_theme(headers: HeaderMap) -> Response {
    let theme = Theme::from_cookie_header(cookie_header(&headers)).toggled();
    redirect_home(vec![theme.cookie()])
}
