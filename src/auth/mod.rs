//! Auth Module
//!
//! Password hashing, cookie sessions and the extractors handlers use to learn
//! who is calling.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

mod extract;
mod password;
mod session;

pub use extract::{CurrentUser, RequireUser};
pub use password::{hash_password, verify_password};
pub use session::SessionStore;

/// Where anonymous callers are sent.
pub const LOGIN_URL: &str = "/auth/login/";

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "sessionid";

/// Everything but unreserved characters and `/` is escaped in `next`.
const NEXT_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Login URL that returns the caller to `next` afterwards.
pub fn login_redirect_url(next: &str) -> String {
    format!("{}?next={}", LOGIN_URL, utf8_percent_encode(next, NEXT_SET))
}
