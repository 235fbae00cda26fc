use crate::errors::AppError;

pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 30;
pub const PASSWORD_MIN_LEN: usize = 6;

/// Lowercases and validates a username: 3–30 chars of `[a-z0-9_]`.
pub fn normalize_username(raw: &str) -> Result<String, AppError> {
    let username = raw.trim().to_lowercase();
    let len = username.chars().count();
    if !(USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&len) {
        return Err(AppError::Validation(format!(
            "username must be {USERNAME_MIN_LEN}-{USERNAME_MAX_LEN} characters"
        )));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
    {
        return Err(AppError::Validation(
            "username may only contain letters, digits and underscores".to_string(),
        ));
    }
    Ok(username)
}

pub fn normalize_email(raw: &str) -> Result<String, AppError> {
    let email = raw.trim().to_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        return Err(AppError::Validation("email is not valid".to_string()));
    }
    Ok(email)
}

pub fn check_password(password: &str) -> Result<(), AppError> {
    if password.chars().count() < PASSWORD_MIN_LEN {
        return Err(AppError::Validation(format!(
            "password must be at least {PASSWORD_MIN_LEN} characters"
        )));
    }
    Ok(())
}

pub fn require_field(field: &str, value: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}
