//! Verification email composition

use super::traits::EmailMessage;

/// Build the verification email for `code`
pub fn compose_message(to: &str, code: &str, app_name: &str, ttl_minutes: i64) -> EmailMessage {
    let ttl = format_ttl(ttl_minutes);
    EmailMessage {
        to: to.to_string(),
        subject: format!("Your {} verification code", app_name),
        text_body: format!("Your verification code is {}. It expires in {}.", code, ttl),
        html_body: format!(
            "<p>Your verification code is <strong>{}</strong>.</p><p>It expires in {}.</p>",
            code, ttl
        ),
    }
}

/// Human-readable duration: `1 minute`, `10 minutes`, `1 hour 30 minutes`
pub fn format_ttl(minutes: i64) -> String {
    let minutes = minutes.max(0);
    let hours = minutes / 60;
    let rest = minutes % 60;

    let mut parts = Vec::with_capacity(2);
    if hours > 0 {
        parts.push(plural(hours, "hour"));
    }
    if rest > 0 || hours == 0 {
        parts.push(plural(rest, "minute"));
    }
    parts.join(" ")
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {}", unit)
    } else {
        format!("{} {}s", n, unit)
    }
}
