use chrono::NaiveDate;
use serde_json::{Map, Value};

use crate::database::models::Periodo;
use crate::database::{Changeset, Field};
use crate::error::{ApiError, FieldErrors};

/// Whether a write must carry every writable field (POST, PUT) or only some (PATCH)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Full,
    Partial,
}

/// Reads writable fields out of a JSON object, collecting one error per field
pub struct FieldReader<'a> {
    payload: &'a Map<String, Value>,
    mode: WriteMode,
    changes: Changeset,
    errors: FieldErrors,
}

impl<'a> FieldReader<'a> {
    pub fn new(payload: &'a Map<String, Value>, mode: WriteMode) -> Self {
        Self {
            payload,
            mode,
            changes: Changeset::new(),
            errors: FieldErrors::new(),
        }
    }

    /// Non-blank string of at most `max_len` characters, surrounding
    /// whitespace trimmed. Numbers are accepted as their decimal text.
    pub fn text(&mut self, field: &str, column: &'static str, max_len: usize) -> &mut Self {
        let Some(value) = self.take(field) else {
            return self;
        };

        let text = match value {
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            _ => {
                self.reject(field, "Not a valid string.");
                return self;
            }
        };

        if text.is_empty() {
            self.reject(field, "This field may not be blank.");
        } else if text.contains('\0') {
            // PostgreSQL text cannot hold NUL
            self.reject(field, "Null characters are not allowed.");
        } else if text.chars().count() > max_len {
            self.reject(
                field,
                format!("Ensure this field has no more than {} characters.", max_len),
            );
        } else {
            self.changes.set(column, Field::Text(text));
        }
        self
    }

    /// ISO 8601 calendar date
    pub fn date(&mut self, field: &str, column: &'static str) -> &mut Self {
        let Some(value) = self.take(field) else {
            return self;
        };

        match value.as_str().map(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")) {
            Some(Ok(date)) => self.changes.set(column, Field::Date(date)),
            _ => self.reject(
                field,
                "Date has wrong format. Use one of these formats instead: YYYY-MM-DD.",
            ),
        }
        self
    }

    /// Primary key of a related record; accepts integers and numeric strings
    pub fn key(&mut self, field: &str, column: &'static str) -> &mut Self {
        let Some(value) = self.take(field) else {
            return self;
        };

        let parsed = match value {
            Value::Number(n) if n.is_f64() => Err(None),
            Value::Number(n) => n.as_i64().ok_or_else(|| Some(n.to_string())),
            Value::String(s) => match s.trim() {
                t if !t.is_empty() && t.chars().all(|c| c.is_ascii_digit()) => {
                    t.parse::<i64>().map_err(|_| Some(t.to_string()))
                }
                _ => Err(None),
            },
            _ => Err(None),
        };

        match parsed {
            Ok(id) => self.changes.set(column, Field::Key(id)),
            // Well-formed, but no row can carry this id
            Err(Some(raw)) => self.reject(
                field,
                format!("Invalid pk \"{}\" - object does not exist.", raw),
            ),
            Err(None) => self.reject(
                field,
                format!(
                    "Incorrect type. Expected pk value, received {}.",
                    json_type_name(value)
                ),
            ),
        }
        self
    }

    /// One of the enrollment period codes
    pub fn periodo(&mut self, field: &str, column: &'static str) -> &mut Self {
        let Some(value) = self.take(field) else {
            return self;
        };

        let raw = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        match raw.parse::<Periodo>() {
            Ok(periodo) => self.changes.set(column, Field::Periodo(periodo)),
            Err(e) => self.reject(field, e.to_string()),
        }
        self
    }

    pub fn finish(&mut self) -> Result<Changeset, ApiError> {
        if !self.errors.is_empty() {
            return Err(ApiError::validation_error(
                "Invalid input",
                Some(std::mem::take(&mut self.errors)),
            ));
        }
        Ok(std::mem::take(&mut self.changes))
    }

    /// Present, non-null value for `field`; records the error otherwise
    fn take(&mut self, field: &str) -> Option<&'a Value> {
        let payload: &'a Map<String, Value> = self.payload;
        match payload.get(field) {
            Some(Value::Null) => {
                self.reject(field, "This field may not be null.");
                None
            }
            Some(value) => Some(value),
            None => {
                if self.mode == WriteMode::Full {
                    self.reject(field, "This field is required.");
                }
                None
            }
        }
    }

    fn reject(&mut self, field: &str, message: impl Into<String>) {
        self.errors.insert(field.to_string(), message.into());
    }
}

/// Request bodies must be JSON objects
pub fn expect_object(payload: &Value) -> Result<&Map<String, Value>, ApiError> {
    payload.as_object().ok_or_else(|| {
        ApiError::field_error(
            "non_field_errors",
            format!(
                "Invalid data. Expected a dictionary, but got {}.",
                json_type_name(payload)
            ),
        )
    })
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn errors_of(result: Result<Changeset, ApiError>) -> FieldErrors {
        match result {
            Err(ApiError::ValidationError {
                field_errors: Some(errors),
                ..
            }) => errors,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn full_write_requires_every_field() {
        let payload = json!({"nome": "Ana"});
        let map = payload.as_object().unwrap();
        let errors = errors_of(
            FieldReader::new(map, WriteMode::Full)
                .text("nome", "nome", 30)
                .text("rg", "rg", 9)
                .date("data_nascimento", "data_nascimento")
                .finish(),
        );
        assert_eq!(errors.len(), 2);
        assert_eq!(errors["rg"], "This field is required.");
        assert_eq!(errors["data_nascimento"], "This field is required.");
    }

    #[test]
    fn partial_write_skips_missing_fields() {
        let payload = json!({"rg": "123"});
        let map = payload.as_object().unwrap();
        let changes = FieldReader::new(map, WriteMode::Partial)
            .text("nome", "nome", 30)
            .text("rg", "rg", 9)
            .finish()
            .unwrap();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes.get("rg"), Some(&Field::Text("123".into())));
    }

    #[test]
    fn text_rules() {
        let payload = json!({
            "a": "   ",
            "b": "x".repeat(31),
            "c": null,
            "d": ["x"],
            "e": 123,
            "f": true,
            "g": "a\u{0}b"
        });
        let map = payload.as_object().unwrap();
        let mut reader = FieldReader::new(map, WriteMode::Partial);
        reader
            .text("a", "a", 30)
            .text("b", "b", 30)
            .text("c", "c", 30)
            .text("d", "d", 30)
            .text("f", "f", 30)
            .text("g", "g", 30);
        let errors = errors_of(reader.finish());
        assert_eq!(errors["a"], "This field may not be blank.");
        assert_eq!(errors["b"], "Ensure this field has no more than 30 characters.");
        assert_eq!(errors["c"], "This field may not be null.");
        assert_eq!(errors["d"], "Not a valid string.");
        assert_eq!(errors["f"], "Not a valid string.");
        assert_eq!(errors["g"], "Null characters are not allowed.");

        let changes = FieldReader::new(map, WriteMode::Partial)
            .text("e", "e", 11)
            .finish()
            .unwrap();
        assert_eq!(changes.get("e"), Some(&Field::Text("123".into())));
    }

    #[test]
    fn numbers_obey_the_length_limit() {
        let payload = json!({"cpf": 123456789012_i64});
        let map = payload.as_object().unwrap();
        let errors = errors_of(FieldReader::new(map, WriteMode::Partial).text("cpf", "cpf", 11).finish());
        assert_eq!(errors["cpf"], "Ensure this field has no more than 11 characters.");
    }

    #[test]
    fn text_is_trimmed_before_length_check() {
        let payload = json!({"nome": "   Ana   ", "rg": " 123456789 "});
        let map = payload.as_object().unwrap();
        let changes = FieldReader::new(map, WriteMode::Partial)
            .text("nome", "nome", 30)
            .text("rg", "rg", 9)
            .finish()
            .unwrap();
        assert_eq!(changes.get("nome"), Some(&Field::Text("Ana".into())));
        assert_eq!(changes.get("rg"), Some(&Field::Text("123456789".into())));
    }

    #[test]
    fn dates_keys_and_periods() {
        let payload = json!({
            "data_nascimento": "2000-01-01",
            "aluno": 3,
            "curso": "4",
            "periodo": "M"
        });
        let map = payload.as_object().unwrap();
        let changes = FieldReader::new(map, WriteMode::Full)
            .date("data_nascimento", "data_nascimento")
            .key("aluno", "aluno_id")
            .key("curso", "curso_id")
            .periodo("periodo", "periodo")
            .finish()
            .unwrap();
        assert_eq!(
            changes.get("data_nascimento"),
            Some(&Field::Date(NaiveDate::from_ymd_opt(2000, 1, 1).unwrap()))
        );
        assert_eq!(changes.get("aluno_id"), Some(&Field::Key(3)));
        assert_eq!(changes.get("curso_id"), Some(&Field::Key(4)));
        assert_eq!(changes.get("periodo"), Some(&Field::Periodo(Periodo::Manha)));
    }

    #[test]
    fn rejects_bad_dates_keys_and_periods() {
        let payload = json!({
            "data_nascimento": "01/01/2000",
            "aluno": true,
            "curso": "abc",
            "periodo": "X"
        });
        let map = payload.as_object().unwrap();
        let errors = errors_of(
            FieldReader::new(map, WriteMode::Full)
                .date("data_nascimento", "data_nascimento")
                .key("aluno", "aluno_id")
                .key("curso", "curso_id")
                .periodo("periodo", "periodo")
                .finish(),
        );
        assert_eq!(
            errors["data_nascimento"],
            "Date has wrong format. Use one of these formats instead: YYYY-MM-DD."
        );
        assert_eq!(errors["aluno"], "Incorrect type. Expected pk value, received bool.");
        assert_eq!(errors["curso"], "Incorrect type. Expected pk value, received str.");
        assert_eq!(errors["periodo"], "\"X\" is not a valid choice.");
    }

    #[test]
    fn key_type_errors_and_unknowable_ids() {
        let payload = json!({"a": 1.5, "b": "", "c": "99999999999999999999", "d": {"id": 1}});
        let map = payload.as_object().unwrap();
        let errors = errors_of(
            FieldReader::new(map, WriteMode::Full)
                .key("a", "a_id")
                .key("b", "b_id")
                .key("c", "c_id")
                .key("d", "d_id")
                .finish(),
        );
        assert_eq!(errors["a"], "Incorrect type. Expected pk value, received float.");
        assert_eq!(errors["b"], "Incorrect type. Expected pk value, received str.");
        assert_eq!(
            errors["c"],
            "Invalid pk \"99999999999999999999\" - object does not exist."
        );
        assert_eq!(errors["d"], "Incorrect type. Expected pk value, received dict.");
    }

    #[test]
    fn bodies_must_be_objects() {
        let err = expect_object(&json!([1, 2])).unwrap_err();
        match err {
            ApiError::ValidationError {
                field_errors: Some(errors),
                ..
            } => assert_eq!(
                errors["non_field_errors"],
                "Invalid data. Expected a dictionary, but got list."
            ),
            other => panic!("unexpected {:?}", other),
        }
    }
}
