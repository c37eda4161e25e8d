pub mod account;
pub mod aluno;
pub mod curso;
pub mod matricula;

use serde::Serialize;
use sqlx::{postgres::PgRow, FromRow};

pub use account::Account;
pub use aluno::Aluno;
pub use curso::Curso;
pub use matricula::{AlunoMatriculado, CursoMatriculado, Matricula, Periodo};

/// Table metadata shared by the three CRUD resources
pub trait Model: for<'r> FromRow<'r, PgRow> + Serialize + Send + Unpin + 'static {
    /// Table name, also used in log and error messages
    const TABLE: &'static str;

    /// Column list selected and returned by every query
    const COLUMNS: &'static str;

    /// Column matched by `?search=`, if the resource supports it
    const SEARCH_COLUMN: Option<&'static str> = None;

    /// Maps a foreign key constraint name to `(payload field, column)`
    fn relation(_constraint: &str) -> Option<(&'static str, &'static str)> {
        None
    }
}
