use chrono::{DateTime, Utc};
use kernel::model::id::UserId;
use kernel::model::user::{DisplayName, PhoneNumber, User};

#[derive(sqlx::FromRow)]
pub struct UserRow {
    pub user_id: UserId,
    pub phone_number: String,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(value: UserRow) -> Self {
        let UserRow {
            user_id,
            phone_number,
            display_name,
            created_at,
            expires_at,
        } = value;
        User {
            id: user_id,
            phone_number: PhoneNumber::from(phone_number),
            display_name: DisplayName::from(display_name),
            created_at,
            expires_at,
        }
    }
}
