//! Utilidades de validación
//!
//! Funciones helper usadas por los `#[derive(Validate)]` de los DTOs.

use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    /// Placa brasileña: formato antiguo (ABC1234) o Mercosul (ABC1D23)
    pub static ref PLATE_REGEX: Regex = Regex::new(r"^[A-Z]{3}[0-9][A-Z0-9][0-9]{2}$").unwrap();

    /// CPF con o sin puntuación (000.000.000-00)
    pub static ref CPF_REGEX: Regex = Regex::new(r"^\d{3}\.?\d{3}\.?\d{3}-?\d{2}$").unwrap();
}

/// Validar que un string no esté vacío ni sea sólo espacios
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_blank");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Normaliza el centinela histórico `0` ("sin moto") a `None`
pub fn normalize_reference(value: Option<i32>) -> Option<i32> {
    value.filter(|id| *id > 0)
}

/// Deja sólo los dígitos de un CPF
pub fn normalize_cpf(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_not_blank() {
        assert!(validate_not_blank("ZC1VG1").is_ok());
        assert!(validate_not_blank("").is_err());
        assert!(validate_not_blank("   ").is_err());
    }

    #[test]
    fn test_plate_regex() {
        assert!(PLATE_REGEX.is_match("ABC1234"));
        assert!(PLATE_REGEX.is_match("ABC1D23"));
        assert!(!PLATE_REGEX.is_match("AB12345"));
        assert!(!PLATE_REGEX.is_match("abc1234"));
    }

    #[test]
    fn test_cpf_helpers() {
        assert!(CPF_REGEX.is_match("123.456.789-09"));
        assert!(CPF_REGEX.is_match("12345678909"));
        assert!(!CPF_REGEX.is_match("1234"));
        assert_eq!(normalize_cpf("123.456.789-09"), "12345678909");
    }

    #[test]
    fn test_normalize_reference() {
        assert_eq!(normalize_reference(None), None);
        assert_eq!(normalize_reference(Some(0)), None);
        assert_eq!(normalize_reference(Some(7)), Some(7));
    }
}
