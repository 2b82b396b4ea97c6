use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{User, UserCategory};
use crate::services::UserInput;
use crate::utils::validation::{validate_not_blank, CPF_REGEX};

// Request para crear un usuario
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(range(min = 1))]
    pub category_id: i32,
    #[validate(custom = "validate_not_blank", length(max = 50))]
    pub first_name: String,
    #[validate(custom = "validate_not_blank", length(max = 50))]
    pub last_name: String,
    pub birth_date: NaiveDate,
    #[validate(regex = "CPF_REGEX")]
    pub cpf: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6, max = 100))]
    pub password: String,
}

impl CreateUserRequest {
    pub fn into_input(self) -> UserInput {
        UserInput {
            category_id: self.category_id,
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            birth_date: self.birth_date,
            cpf: self.cpf,
            email: self.email,
            password: Some(self.password),
        }
    }
}

// Request para actualizar un usuario; sin password se conserva el actual
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    pub id: Option<i32>,
    #[validate(range(min = 1))]
    pub category_id: i32,
    #[validate(custom = "validate_not_blank", length(max = 50))]
    pub first_name: String,
    #[validate(custom = "validate_not_blank", length(max = 50))]
    pub last_name: String,
    pub birth_date: NaiveDate,
    #[validate(regex = "CPF_REGEX")]
    pub cpf: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6, max = 100))]
    pub password: Option<String>,
}

impl UpdateUserRequest {
    pub fn into_input(self) -> UserInput {
        UserInput {
            category_id: self.category_id,
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            birth_date: self.birth_date,
            cpf: self.cpf,
            email: self.email,
            password: self.password,
        }
    }
}

// Query de `GET /api/users/name?name=`
#[derive(Debug, Deserialize)]
pub struct UserNameQuery {
    pub name: String,
}

// Response de usuario (nunca incluye el hash)
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i32,
    pub category_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: NaiveDate,
    pub cpf: String,
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            category_id: user.category_id,
            first_name: user.first_name,
            last_name: user.last_name,
            birth_date: user.birth_date,
            cpf: user.cpf,
            email: user.email,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CategoryRequest {
    #[validate(custom = "validate_not_blank", length(max = 50))]
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    pub id: i32,
    pub name: String,
}

impl From<UserCategory> for CategoryResponse {
    fn from(category: UserCategory) -> Self {
        Self {
            id: category.id,
            name: category.name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_user_request_validation() {
        let req: CreateUserRequest = serde_json::from_str(
            r#"{
                "category_id": 1,
                "first_name": "Ana",
                "last_name": "Souza",
                "birth_date": "1995-03-14",
                "cpf": "123.456.789-09",
                "email": "ana@mottu.com",
                "password": "s3nh4-forte"
            }"#,
        )
        .unwrap();
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_bad_email_cpf_and_short_password() {
        let req = CreateUserRequest {
            category_id: 1,
            first_name: "Ana".to_string(),
            last_name: "Souza".to_string(),
            birth_date: NaiveDate::from_ymd_opt(1995, 3, 14).unwrap(),
            cpf: "12".to_string(),
            email: "not-an-email".to_string(),
            password: "123".to_string(),
        };
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("cpf"));
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }
}
