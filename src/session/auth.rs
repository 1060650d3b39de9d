use crate::catalog::{self, User};

// ============================================================================
// Mock Credential Check
// ============================================================================

const ADMIN_USERNAME: &str = "admin";
const ADMIN_PASSWORD: &str = "admin";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid username or password.")]
    InvalidCredentials,
}

/// Username is trimmed and compared case-insensitively; password is trimmed.
pub fn authenticate(username: &str, password: &str) -> Result<&'static User, AuthError> {
    let username = username.trim();
    if !username.eq_ignore_ascii_case(ADMIN_USERNAME) || password.trim() != ADMIN_PASSWORD {
        return Err(AuthError::InvalidCredentials);
    }

    catalog::find_user_by_username(ADMIN_USERNAME).ok_or(AuthError::InvalidCredentials)
}
