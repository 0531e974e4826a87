use bookshelf_http::AppError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use validator::Validate;

static DIGITS_ONLY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+$").expect("digits-only pattern is valid"));

/// A stored book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Book {
    /// Identifier assigned by the store on creation
    pub id: i64,
    pub title: String,
    pub author: String,
}

/// Request body for creating a book or replacing its fields.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct BookInput {
    #[validate(length(min = 1))]
    #[schema(min_length = 1, example = "The Left Hand of Darkness")]
    pub title: String,
    #[validate(length(min = 1))]
    #[schema(min_length = 1, example = "Ursula K. Le Guin")]
    pub author: String,
}

/// `{id}` path segment. Matched as a digit string, then converted with [`BookIdParam::id`].
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BookIdParam {
    #[validate(regex(path = *DIGITS_ONLY))]
    id: String,
}

impl BookIdParam {
    /// Numeric id; digit strings beyond `i64` are rejected as invalid input.
    pub fn id(&self) -> Result<i64, AppError> {
        self.id.parse::<i64>().map_err(|_| {
            AppError::validation(
                vec![json!({ "location": "path", "field": "id", "error": "range" })],
                "path parameters are invalid",
            )
        })
    }
}

/// Body of the 404 returned when a requested book does not exist.
#[derive(Debug, Serialize, ToSchema)]
pub struct NotFoundBody {
    pub error: String,
}

impl NotFoundBody {
    pub fn book() -> Self {
        Self {
            error: "Book not found".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param(id: &str) -> BookIdParam {
        BookIdParam { id: id.to_string() }
    }

    #[test]
    fn digit_ids_pass_validation() {
        let param = param("0042");
        assert!(param.validate().is_ok());
        assert_eq!(param.id().unwrap(), 42);
    }

    #[test]
    fn non_digit_ids_fail_validation() {
        for raw in ["abc", "-1", "1.5", "", " 7"] {
            assert!(param(raw).validate().is_err(), "{raw:?} should be rejected");
        }
    }

    #[test]
    fn overflowing_id_is_a_validation_error() {
        let param = param("99999999999999999999");
        assert!(param.validate().is_ok());
        assert!(matches!(param.id(), Err(AppError::Validation { .. })));
    }

    #[test]
    fn empty_fields_fail_validation() {
        let input = BookInput {
            title: String::new(),
            author: "B".to_string(),
        };
        let errors = input.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("title"));
    }

    #[test]
    fn not_found_body_serializes_with_error_key() {
        let body = serde_json::to_value(NotFoundBody::book()).unwrap();
        assert_eq!(body, json!({ "error": "Book not found" }));
    }
}
