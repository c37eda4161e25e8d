use serde_json::{Map, Value};

use crate::database::models::{Aluno, Curso, Matricula};
use crate::database::Changeset;
use crate::error::ApiError;

use super::fields::{FieldReader, WriteMode};

/// Turns a write payload into validated column changes.
/// `id` and unknown keys are ignored.
pub trait Writable {
    fn changeset(payload: &Map<String, Value>, mode: WriteMode) -> Result<Changeset, ApiError>;
}

impl Writable for Aluno {
    fn changeset(payload: &Map<String, Value>, mode: WriteMode) -> Result<Changeset, ApiError> {
        FieldReader::new(payload, mode)
            .text("nome", "nome", 30)
            .text("rg", "rg", 9)
            .text("cpf", "cpf", 11)
            .date("data_nascimento", "data_nascimento")
            .finish()
    }
}

impl Writable for Curso {
    fn changeset(payload: &Map<String, Value>, mode: WriteMode) -> Result<Changeset, ApiError> {
        FieldReader::new(payload, mode)
            .text("codigo_curso", "codigo_curso", 10)
            .text("descricao", "descricao", 100)
            .finish()
    }
}

impl Writable for Matricula {
    fn changeset(payload: &Map<String, Value>, mode: WriteMode) -> Result<Changeset, ApiError> {
        FieldReader::new(payload, mode)
            .key("aluno", "aluno_id")
            .key("curso", "curso_id")
            .periodo("periodo", "periodo")
            .finish()
    }
}
