use serde::{Deserialize, Serialize};

/// Authorization status of a registered principal.
///
/// The only transitions are absent -> `Pending` (registration) and
/// `Pending` -> `Authorized` (admin approval). Nothing ever removes
/// authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    Pending,
    Authorized,
}

impl UserStatus {
    /// Stable string form used in the SQLite store.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Pending => "pending",
            UserStatus::Authorized => "authorized",
        }
    }

    /// Parse the stored form.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(UserStatus::Pending),
            "authorized" => Some(UserStatus::Authorized),
            _ => None,
        }
    }
}

/// A registered chat user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub user_id: i64,
    pub username: String,
    pub status: UserStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [UserStatus::Pending, UserStatus::Authorized] {
            assert_eq!(UserStatus::from_str(status.as_str()), Some(status));
        }
        assert_eq!(UserStatus::from_str("banned"), None);
    }
}
