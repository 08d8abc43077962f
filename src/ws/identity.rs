//! Identity sanitization for in-band authentication.
//!
//! Identity is opaque to the core: a user id plus a display name supplied
//! per connection. Invalid values are replaced with fallbacks rather than
//! rejected, so a sloppy client can still play.

use std::sync::LazyLock;

use regex::Regex;

fn user_id_pattern() -> &'static Regex {
    static USER_ID: LazyLock<Regex> = LazyLock::new(|| {
        #[allow(clippy::unwrap_used)]
        Regex::new(r"^[A-Za-z0-9_-]{3,32}$").unwrap()
    });
    &USER_ID
}

fn username_pattern() -> &'static Regex {
    static USERNAME: LazyLock<Regex> = LazyLock::new(|| {
        #[allow(clippy::unwrap_used)]
        Regex::new(r"^[A-Za-z0-9 _\-.]{2,24}$").unwrap()
    });
    &USERNAME
}

#[derive(Debug, Clone)]
pub struct PlayerIdentity {
    pub user_id: String,
    pub username: String,
}

/// Validate the supplied identity, substituting fallbacks derived from the
/// connection id for anything that fails the patterns.
pub fn sanitize_identity(user_id: &str, username: &str, conn_short: &str) -> PlayerIdentity {
    let user_id = if user_id_pattern().is_match(user_id) {
        user_id.to_string()
    } else {
        format!("guest-{conn_short}")
    };
    let username = if username_pattern().is_match(username) {
        username.to_string()
    } else {
        "Guest".to_string()
    };
    PlayerIdentity { user_id, username }
}
