//! Declarative payload schemas.
//!
//! A [`PayloadSchema`] lists the fields a JSON object may carry. Checking
//! stops at the first failing rule and never looks at anything outside the
//! payload itself.

use super::{ValidationError, ValidationResult};
use chrono::Datelike;
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{Map, Value};

lazy_static! {
    static ref EMAIL_REGEX: Regex =
        Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
            .expect("valid email regex");
}

pub const MIN_YEAR: i64 = 1900;

#[macro_export]
macro_rules! payload_field {
    ($name:expr, $field_type:expr $(, $field:ident = $value:expr)*) => {
        {
            #[allow(unused_mut)]
            let mut rule = FieldRule {
                name: $name,
                field_type: $field_type,
                required: true,
                allow_empty: false,
            };
            $(
                rule.$field = $value;
            )*
            rule
        }
    };
}

#[derive(Debug, PartialEq, Eq)]
pub enum FieldType {
    String,
    Integer,
    /// Integer between [`MIN_YEAR`] and the current year.
    Year,
    Email,
}

pub struct FieldRule {
    pub name: &'static str,
    pub field_type: FieldType,
    pub required: bool,
    pub allow_empty: bool,
}

pub struct PayloadSchema {
    pub fields: &'static [FieldRule],
}

fn current_year() -> i64 {
    chrono::Utc::now().year() as i64
}

impl FieldRule {
    fn check(&self, value: &Value) -> ValidationResult<()> {
        match self.field_type {
            FieldType::String | FieldType::Email => {
                let s = value
                    .as_str()
                    .ok_or(ValidationError::NotAString { field: self.name })?;
                if s.is_empty() && !self.allow_empty {
                    return Err(ValidationError::EmptyField { field: self.name });
                }
                if self.field_type == FieldType::Email && !EMAIL_REGEX.is_match(s) {
                    return Err(ValidationError::InvalidEmail { field: self.name });
                }
                Ok(())
            }
            FieldType::Integer | FieldType::Year => {
                let n = match value.as_i64() {
                    Some(n) => n,
                    None if value.is_number() => {
                        return Err(ValidationError::NotAnInteger { field: self.name })
                    }
                    None => return Err(ValidationError::NotANumber { field: self.name }),
                };
                if self.field_type == FieldType::Year {
                    if n < MIN_YEAR {
                        return Err(ValidationError::BelowMinimum {
                            field: self.name,
                            min: MIN_YEAR,
                        });
                    }
                    let max = current_year();
                    if n > max {
                        return Err(ValidationError::AboveMaximum {
                            field: self.name,
                            max,
                        });
                    }
                }
                Ok(())
            }
        }
    }
}

impl PayloadSchema {
    pub fn validate(&self, payload: &Value) -> ValidationResult<()> {
        let object: &Map<String, Value> =
            payload.as_object().ok_or(ValidationError::NotAnObject)?;

        for rule in self.fields {
            match object.get(rule.name) {
                None | Some(Value::Null) if rule.required => {
                    return Err(ValidationError::MissingField { field: rule.name })
                }
                None | Some(Value::Null) => {}
                Some(value) => rule.check(value)?,
            }
        }

        if let Some(unknown) = object
            .keys()
            .find(|key| !self.fields.iter().any(|rule| rule.name == key.as_str()))
        {
            return Err(ValidationError::UnknownField {
                field: unknown.clone(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload_field;
    use serde_json::json;

    const TEST_SCHEMA: PayloadSchema = PayloadSchema {
        fields: &[
            payload_field!("name", FieldType::String),
            payload_field!("year", FieldType::Year),
            payload_field!("note", FieldType::String, required = false, allow_empty = true),
            payload_field!("email", FieldType::Email, required = false),
        ],
    };

    #[test]
    fn accepts_valid_payload() {
        assert!(TEST_SCHEMA
            .validate(&json!({"name": "X", "year": 2020}))
            .is_ok());
        assert!(TEST_SCHEMA
            .validate(&json!({"name": "X", "year": 2020, "note": "", "email": "a@b.co"}))
            .is_ok());
    }

    #[test]
    fn reports_first_failing_rule() {
        let err = TEST_SCHEMA.validate(&json!({})).unwrap_err();
        assert_eq!(err.to_string(), "\"name\" is required");

        let err = TEST_SCHEMA
            .validate(&json!({"name": "X", "year": "2020"}))
            .unwrap_err();
        assert_eq!(err.to_string(), "\"year\" must be a number");

        let err = TEST_SCHEMA
            .validate(&json!({"name": 12, "year": "2020"}))
            .unwrap_err();
        assert_eq!(err.to_string(), "\"name\" must be a string");
    }

    #[test]
    fn rejects_null_for_required_field() {
        let err = TEST_SCHEMA
            .validate(&json!({"name": null, "year": 2020}))
            .unwrap_err();
        assert!(matches!(err, ValidationError::MissingField { field: "name" }));
    }

    #[test]
    fn rejects_empty_and_out_of_range() {
        let err = TEST_SCHEMA
            .validate(&json!({"name": "", "year": 2020}))
            .unwrap_err();
        assert_eq!(err.to_string(), "\"name\" is not allowed to be empty");

        let err = TEST_SCHEMA
            .validate(&json!({"name": "X", "year": 1800}))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "\"year\" must be greater than or equal to 1900"
        );

        let err = TEST_SCHEMA
            .validate(&json!({"name": "X", "year": current_year() + 1}))
            .unwrap_err();
        assert!(matches!(err, ValidationError::AboveMaximum { .. }));

        let err = TEST_SCHEMA
            .validate(&json!({"name": "X", "year": 2000.5}))
            .unwrap_err();
        assert_eq!(err.to_string(), "\"year\" must be an integer");
    }

    #[test]
    fn rejects_unknown_fields_and_non_objects() {
        let err = TEST_SCHEMA
            .validate(&json!({"name": "X", "year": 2020, "extra": true}))
            .unwrap_err();
        assert_eq!(err.to_string(), "\"extra\" is not allowed");

        let err = TEST_SCHEMA.validate(&json!([1, 2])).unwrap_err();
        assert_eq!(err.to_string(), "\"value\" must be of type object");
    }

    #[test]
    fn checks_email_format() {
        let err = TEST_SCHEMA
            .validate(&json!({"name": "X", "year": 2020, "email": "not-an-email"}))
            .unwrap_err();
        assert_eq!(err.to_string(), "\"email\" must be a valid email");
    }
}
