// src/components.rs
//! HTML rendering
//!
//! Every component returns a plain `String`. Anything that did not come
//! from a literal in this file goes through [`escape_html`].

use cookie::time::Duration;
use cookie::{Cookie, SameSite};

use crate::auth_client::SessionUser;
use crate::health::ApiHealth;
use crate::sign_in_form::{FormMode, SignInForm};

/// Colour scheme, persisted in the `theme` cookie
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub const COOKIE: &'static str = "theme";

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Reads the theme from a `Cookie` header; anything unrecognised is light
    pub fn from_cookie_header(header: Option<&str>) -> Self {
        header
            .into_iter()
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == Self::COOKIE)
            .map(|(_, value)| match value {
                "dark" => Theme::Dark,
                _ => Theme::Light,
            })
            .unwrap_or_default()
    }

    /// `Set-Cookie` value persisting this theme for a year
    pub fn cookie(&self) -> String {
        Cookie::build((Self::COOKIE, self.as_str()))
            .path("/")
            .max_age(Duration::days(365))
            .same_site(SameSite::Lax)
            .build()
            .to_string()
    }
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

pub fn profile_avatar() -> String {
    r#"<img src="/author.png" alt="Author of The Perfect Boilerplate" width="64" height="64" class="rounded-full border border-zinc-800">"#
        .to_string()
}

/// Button that flips the theme; labelled with the mode it switches to
pub fn theme_toggle(theme: Theme) -> String {
    let icon = match theme {
        Theme::Light => "☀",
        Theme::Dark => "☾",
    };
    format!(
        r#"<form method="post" action="/theme"><button type="submit" class="theme-toggle" aria-label="Switch to {} mode">{}</button></form>"#,
        theme.toggled().as_str(),
        icon
    )
}

pub fn sign_in_form(form: &SignInForm) -> String {
    let mut html = String::new();
    html.push_str(r#"<div class="mx-auto w-full max-w-md rounded-lg border p-6">"#);
    html.push_str(&format!(
        r#"<h2 class="mb-6 text-2xl font-bold">{}</h2>"#,
        form.title()
    ));
    html.push_str(r#"<form method="post" action="/sign-in" class="space-y-4">"#);
    html.push_str(&format!(
        r#"<input type="hidden" name="mode" value="{}">"#,
        form.mode.as_str()
    ));

    if form.mode == FormMode::SignUp {
        html.push_str(&field("name", "Name", "text", &form.name));
    }
    html.push_str(&field("email", "Email", "email", &form.email));
    // The password is never echoed back into the page
    html.push_str(&field("password", "Password", "password", ""));

    if let Some(error) = form.error() {
        html.push_str(&format!(
            r#"<p class="text-sm text-red-600">{}</p>"#,
            escape_html(error)
        ));
    }

    html.push_str(&format!(
        r#"<button type="submit" name="action" value="submit" class="w-full"{}>{}</button>"#,
        if form.loading { " disabled" } else { "" },
        form.submit_label()
    ));
    html.push_str(&format!(
        r#"<button type="submit" name="action" value="toggle" formnovalidate class="mt-4 text-sm text-blue-600 hover:underline">{}</button>"#,
        escape_html(form.toggle_label())
    ));
    html.push_str("</form></div>");
    html
}

fn field(id: &str, label: &str, kind: &str, value: &str) -> String {
    format!(
        r#"<div><label for="{id}" class="mb-1 block text-sm font-medium">{label}</label><input id="{id}" name="{id}" type="{kind}" value="{value}" required class="w-full rounded-md border px-3 py-2"></div>"#,
        id = id,
        label = label,
        kind = kind,
        value = escape_html(value)
    )
}

/// Signed-in user's name and email with a sign-out button
pub fn user_session(user: &SessionUser) -> String {
    format!(
        r#"<div class="flex items-center gap-4"><div class="text-sm"><p class="font-medium">{}</p><p class="text-gray-600">{}</p></div><form method="post" action="/sign-out"><button type="submit">Sign Out</button></form></div>"#,
        escape_html(&user.name),
        escape_html(&user.email)
    )
}

pub struct LandingPage<'a> {
    pub health: &'a ApiHealth,
    pub user: Option<&'a SessionUser>,
    pub form: &'a SignInForm,
    pub theme: Theme,
}

pub fn landing_page(page: &LandingPage<'_>) -> String {
    let auth = match page.user {
        Some(user) => user_session(user),
        None => sign_in_form(page.form),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en" class="{theme}">
<head><meta charset="utf-8"><meta name="viewport" content="width=device-width, initial-scale=1"><title>The Perfect Boilerplate</title></head>
<body>
<header class="flex justify-end p-4">{toggle}</header>
<main class="flex min-h-screen flex-col">
<div class="flex flex-1 flex-col items-center justify-center gap-4">
{avatar}
<span class="text-2xl">The Perfect Boilerplate</span>
<span class="text-xl">Landing Page</span>
<span class="api-status" data-status="{status}">{message}</span>
{auth}
</div>
</main>
</body>
</html>"#,
        theme = page.theme.as_str(),
        toggle = theme_toggle(page.theme),
        avatar = profile_avatar(),
        status = page.health.status.as_str(),
        message = escape_html(&page.health.message),
        auth = auth,
    )
}
