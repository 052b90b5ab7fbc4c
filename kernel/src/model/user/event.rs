use derive_new::new;

use crate::model::user::PhoneNumber;

#[derive(Debug, new)]
pub struct RegisterUser {
    pub phone_number: PhoneNumber,
}
