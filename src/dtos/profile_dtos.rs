use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::user::User;

#[derive(Deserialize)]
pub struct UpdateProfileIn {
    pub name: String,
    pub branch: String,
    pub year: i32,
}

#[derive(Debug, Serialize)]
pub struct ProfileOut {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub branch: Option<String>,
    pub year: Option<i32>,
    pub profile_pic: Option<String>,
}

impl From<User> for ProfileOut {
    fn from(user: User) -> Self {
        ProfileOut {
            id: user.id,
            email: user.email,
            name: user.name,
            branch: user.branch,
            year: user.year,
            profile_pic: user.profile_pic,
        }
    }
}
