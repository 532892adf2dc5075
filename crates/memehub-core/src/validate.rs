//! Input validation predicates. Policy, not cryptography - pure functions
//! over strings, applied before any mutation.

/// Hosts memes may be served from.
const IMAGE_HOST_PREFIX: &str = "https://res.cloudinary.com/";

/// Accepted image extensions, matched anywhere in the URL to allow
/// transformation suffixes after the filename.
const IMAGE_EXTENSIONS: [&str; 4] = [".jpg", ".jpeg", ".png", ".gif"];

pub const MIN_USERNAME_LEN: usize = 3;
pub const MAX_USERNAME_LEN: usize = 20;
pub const MIN_PASSWORD_LEN: usize = 6;

/// 3-20 characters from `[A-Za-z0-9_]`.
pub fn is_valid_username(username: &str) -> bool {
    (MIN_USERNAME_LEN..=MAX_USERNAME_LEN).contains(&username.len())
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Deliberately permissive: an `@` and a `.` must both be present.
pub fn is_valid_email(email: &str) -> bool {
    email.contains('@') && email.contains('.')
}

pub fn is_valid_password(password: &str) -> bool {
    password.len() >= MIN_PASSWORD_LEN
}

/// Allow-list check: approved host prefix plus an approved extension.
pub fn is_valid_image_url(url: &str) -> bool {
    url.starts_with(IMAGE_HOST_PREFIX) && IMAGE_EXTENSIONS.iter().any(|ext| url.contains(ext))
}
