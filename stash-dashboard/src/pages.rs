use stash_auth::IdentityBanner;

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{TITLE}</title>
    <style>
        body {
            margin: 0;
            padding: 0;
            font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, "Helvetica Neue", Arial, sans-serif;
            background: #F9FAFB;
            color: #1F2937;
        }
        .centered {
            display: flex;
            flex-direction: column;
            align-items: center;
            justify-content: center;
            min-height: 60vh;
            text-align: center;
        }
        .login-btn {
            background: linear-gradient(135deg, #4285f4 0%, #357abd 100%);
            color: white;
            padding: 15px 30px;
            border-radius: 10px;
            text-decoration: none;
            font-weight: bold;
            font-size: 1.1rem;
            display: inline-block;
            margin-top: 20px;
        }
        .notice {
            font-size: 1.2rem;
            color: #666;
        }
        .error {
            background: #FEE2E2;
            border-radius: 8px;
            padding: 16px;
            color: #991B1B;
        }
        .info {
            background: #DBEAFE;
            border-radius: 8px;
            padding: 16px;
            color: #1E40AF;
        }
        .layout {
            display: flex;
            min-height: 100vh;
        }
        .sidebar {
            width: 240px;
            padding: 24px;
            background: #F3F4F6;
        }
        .caption {
            color: #6B7280;
            font-size: 14px;
        }
        main {
            flex: 1;
            padding: 24px 48px;
        }
    </style>
</head>
<body>
{BODY}
</body>
</html>"#;

const SIGN_IN_BODY: &str = r#"<div class="centered">
    <h1>&#128274; Login Required</h1>
    <p class="notice">This dashboard is restricted to <strong>Peerplay employees</strong>.</p>
    <a href="{AUTH_URL}" class="login-btn">&#128272; Sign in with Google</a>
</div>"#;

const ACCESS_DENIED_BODY: &str = r#"<div class="centered">
    <p class="error">&#10060; Access Denied: {EMAIL}</p>
    <p class="info">This dashboard is restricted to Peerplay employees only.</p>
</div>"#;

const AUTH_ERROR_BODY: &str = r#"<div class="centered">
    <p class="error">Authentication error: {ERROR}</p>
    <p><a href="/">Try again</a></p>
</div>"#;

const BANNER: &str = r#"<aside class="sidebar">
    <p><strong>&#128100; {NAME}</strong></p>
    <p class="caption">{EMAIL}</p>
    <form method="post" action="/logout">
        <button type="submit">&#128682; Logout</button>
    </form>
    <hr>
</aside>"#;

const DASHBOARD_BODY: &str = r#"<div class="layout">
{BANNER}
<main>
    <h1>Stash Analytics Dashboard</h1>
    <p class="caption">Charts load here once the data sources are connected.</p>
</main>
</div>"#;

fn page(title: &str, body: &str) -> String {
    PAGE_TEMPLATE
        .replace("{TITLE}", title)
        .replace("{BODY}", body)
}

/// Minimal HTML escaping for values that come from users or providers
pub fn escape(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
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

pub fn sign_in(authorization_url: &str) -> String {
    page(
        "Login Required",
        &SIGN_IN_BODY.replace("{AUTH_URL}", &escape(authorization_url)),
    )
}

pub fn access_denied(email: &str) -> String {
    page(
        "Access Denied",
        &ACCESS_DENIED_BODY.replace("{EMAIL}", &escape(email)),
    )
}

pub fn authentication_error(message: &str) -> String {
    page(
        "Authentication Error",
        &AUTH_ERROR_BODY.replace("{ERROR}", &escape(message)),
    )
}

/// Page left blank because the gate could not offer a way to sign in
pub fn blank() -> String {
    page("Stash Analytics Dashboard", "")
}

pub fn dashboard(banner: Option<&IdentityBanner>) -> String {
    let banner = banner
        .map(|b| {
            BANNER
                .replace("{NAME}", &escape(&b.display_name))
                .replace("{EMAIL}", &escape(&b.email))
        })
        .unwrap_or_default();

    page(
        "Stash Analytics Dashboard",
        &DASHBOARD_BODY.replace("{BANNER}", &banner),
    )
}
