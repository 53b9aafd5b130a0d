use std::fmt;
use std::str::FromStr;
use validator::{ValidateEmail, ValidateLength};

pub const MIN_PASSWORD_LEN: u64 = 6;

/// Поля форм, которые проверяются на лету.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Email,
    Password,
    Name,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Email => write!(f, "email"),
            Field::Password => write!(f, "password"),
            Field::Name => write!(f, "name"),
        }
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "email" => Ok(Field::Email),
            "password" => Ok(Field::Password),
            "name" => Ok(Field::Name),
            other => Err(format!("unknown field: {}", other)),
        }
    }
}

/// Сообщение об ошибке для значения поля или `None`, если значение корректно.
pub fn validate_field(field: Field, value: &str) -> Option<&'static str> {
    if value.is_empty() {
        return Some("This field is required");
    }
    match field {
        Field::Email if !value.validate_email() => Some("Invalid email address"),
        Field::Password if !value.validate_length(Some(MIN_PASSWORD_LEN), None, None) => {
            Some("Password must be at least 6 characters long")
        }
        Field::Name if value.trim().is_empty() => Some("Name cannot be empty"),
        _ => None,
    }
}

/// Первая ошибка среди набора полей, в порядке перечисления.
pub fn first_error(fields: &[(Field, &str)]) -> Option<&'static str> {
    fields
        .iter()
        .find_map(|(field, value)| validate_field(*field, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_values_are_required() {
        for field in [Field::Email, Field::Password, Field::Name] {
            assert_eq!(validate_field(field, ""), Some("This field is required"));
        }
    }

    #[test]
    fn email_rules() {
        assert_eq!(validate_field(Field::Email, "ann@example.com"), None);
        assert_eq!(
            validate_field(Field::Email, "not-an-email"),
            Some("Invalid email address")
        );
    }

    #[test]
    fn password_needs_six_characters() {
        assert_eq!(
            validate_field(Field::Password, "12345"),
            Some("Password must be at least 6 characters long")
        );
        assert_eq!(validate_field(Field::Password, "123456"), None);
    }

    #[test]
    fn blank_name_is_rejected() {
        assert_eq!(validate_field(Field::Name, "   "), Some("Name cannot be empty"));
        assert_eq!(validate_field(Field::Name, "Ann"), None);
    }

    #[test]
    fn first_error_follows_field_order() {
        assert_eq!(
            first_error(&[(Field::Email, "bad"), (Field::Password, "1")]),
            Some("Invalid email address")
        );
        assert_eq!(
            first_error(&[(Field::Email, "ann@example.com"), (Field::Password, "123456")]),
            None
        );
    }

    #[test]
    fn field_names_round_trip_through_strings() {
        assert_eq!("email".parse::<Field>(), Ok(Field::Email));
        assert_eq!(Field::Name.to_string(), "name");
        assert!("phone".parse::<Field>().is_err());
    }
}
