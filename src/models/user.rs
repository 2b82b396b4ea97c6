//! Modelo de User
//!
//! Este módulo contiene el struct User y su categoría.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// User - mapea exactamente a la tabla users
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i32,
    pub category_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: NaiveDate,
    pub cpf: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

/// Datos persistibles de un usuario (la contraseña ya viene hasheada)
#[derive(Debug, Clone, PartialEq)]
pub struct UserData {
    pub category_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: NaiveDate,
    pub cpf: String,
    pub email: String,
    pub password_hash: String,
}

/// Categoría de usuario (Administrador, Operador, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct UserCategory {
    pub id: i32,
    pub name: String,
}

impl User {
    pub fn from_data(id: i32, data: &UserData) -> Self {
        Self {
            id,
            category_id: data.category_id,
            first_name: data.first_name.clone(),
            last_name: data.last_name.clone(),
            birth_date: data.birth_date,
            cpf: data.cpf.clone(),
            email: data.email.clone(),
            password_hash: data.password_hash.clone(),
        }
    }
}
