//! Field validation for registration and profile payloads.
//!
//! Rules are enforced here, before anything reaches the identity service or
//! the graph, so both stay free of half-valid records.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid email address")]
    Email,
    #[error("password must be 6-100 characters with no leading or trailing spaces")]
    Password,
    #[error("full name must be 2-100 characters and contain no digits")]
    FullName,
    #[error("phone must be + followed by 9-15 digits, not starting with 0")]
    Phone,
    #[error("business name must be at least 2 characters")]
    BusinessName,
    #[error("years of experience must be between 0 and 50")]
    YearsExperience,
    #[error("description must be at most 1000 characters")]
    Description,
}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();
    let Some((local, domain)) = email.split_once('@') else {
        return Err(ValidationError::Email);
    };
    if local.is_empty()
        || domain.is_empty()
        || !domain.contains('.')
        || domain.starts_with('.')
        || domain.ends_with('.')
        || email.contains(char::is_whitespace)
    {
        return Err(ValidationError::Email);
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.len() < 6 || password.len() > 100 || password.trim() != password {
        return Err(ValidationError::Password);
    }
    Ok(())
}

pub fn validate_full_name(name: &str) -> Result<(), ValidationError> {
    let name = name.trim();
    if name.chars().count() < 2
        || name.chars().count() > 100
        || name.chars().any(|c| c.is_ascii_digit())
    {
        return Err(ValidationError::FullName);
    }
    Ok(())
}

/// `+` followed by 9 to 15 digits, the first of which is nonzero.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let Some(digits) = phone.strip_prefix('+') else {
        return Err(ValidationError::Phone);
    };
    if digits.len() < 9
        || digits.len() > 15
        || !digits.chars().all(|c| c.is_ascii_digit())
        || digits.starts_with('0')
    {
        return Err(ValidationError::Phone);
    }
    Ok(())
}

pub fn validate_business_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().chars().count() < 2 {
        return Err(ValidationError::BusinessName);
    }
    Ok(())
}

pub fn validate_years_experience(years: i64) -> Result<(), ValidationError> {
    if !(0..=50).contains(&years) {
        return Err(ValidationError::YearsExperience);
    }
    Ok(())
}

pub fn validate_description(description: &str) -> Result<(), ValidationError> {
    if description.chars().count() > 1000 {
        return Err(ValidationError::Description);
    }
    Ok(())
}
