use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, AppResult};

use crate::model::id::UserId;

pub mod event;
pub mod names;

/// The canonical identity form used everywhere for comparison: first
/// character uppercased, the rest lowercased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct DisplayName(String);

impl DisplayName {
    pub fn normalize(raw: &str) -> Self {
        let mut chars = raw.trim().chars();
        match chars.next() {
            None => Self(String::new()),
            Some(first) => Self(
                first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
            ),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

// Stored values are already canonical.
impl From<String> for DisplayName {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for DisplayName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A registration phone number reduced to its digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub fn parse(raw: &str, expected_digits: usize) -> AppResult<Self> {
        let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
        if digits.is_empty() {
            return Err(AppError::InvalidPhoneNumber(
                "Please enter a phone number".into(),
            ));
        }
        if digits.len() != expected_digits {
            return Err(AppError::InvalidPhoneNumber(format!(
                "Phone number must be exactly {expected_digits} digits"
            )));
        }
        if digits.starts_with('0') || digits.starts_with('1') {
            return Err(AppError::InvalidPhoneNumber(
                "Phone number cannot start with 0 or 1".into(),
            ));
        }
        Ok(Self(digits))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for PhoneNumber {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// An ephemeral per-day identity: a phone number plus a pool-assigned
/// display name, valid until the end of the current day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub phone_number: PhoneNumber,
    pub display_name: DisplayName,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl User {
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

#[derive(Debug, Clone)]
pub struct RegisteredUser {
    pub user: User,
    pub is_existing: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_capitalizes_first_letter_only() {
        assert_eq!(DisplayName::normalize("ana").as_str(), "Ana");
        assert_eq!(DisplayName::normalize("BOB").as_str(), "Bob");
        assert_eq!(DisplayName::normalize("  cara ").as_str(), "Cara");
        assert_eq!(DisplayName::normalize("dAn").as_str(), "Dan");
    }

    #[test]
    fn normalization_of_blank_input_is_empty() {
        assert!(DisplayName::normalize("   ").is_empty());
    }

    #[test]
    fn phone_number_strips_formatting() {
        let phone = PhoneNumber::parse("(555) 123-4567", 10).unwrap();
        assert_eq!(phone.as_str(), "5551234567");
    }

    #[test]
    fn phone_number_rejects_wrong_length() {
        let err = PhoneNumber::parse("55512", 10).unwrap_err();
        assert!(err.to_string().contains("exactly 10 digits"));
    }

    #[test]
    fn phone_number_rejects_leading_zero_or_one() {
        assert!(PhoneNumber::parse("0551234567", 10).is_err());
        assert!(PhoneNumber::parse("1551234567", 10).is_err());
    }

    #[test]
    fn phone_number_rejects_input_without_digits() {
        assert!(PhoneNumber::parse("abc", 10).is_err());
    }

    #[test]
    fn user_is_active_until_expiry() {
        let now = Utc::now();
        let user = User {
            id: UserId::new(),
            phone_number: PhoneNumber::parse("5551234567", 10).unwrap(),
            display_name: DisplayName::normalize("panda"),
            created_at: now,
            expires_at: now + chrono::Duration::hours(3),
        };
        assert!(user.is_active(now));
        assert!(!user.is_active(now + chrono::Duration::hours(3)));
    }
}
