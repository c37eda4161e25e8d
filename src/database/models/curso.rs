use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::Model;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Curso {
    pub id: i64,
    pub codigo_curso: String,
    pub descricao: String,
}

impl Model for Curso {
    const TABLE: &'static str = "cursos";
    const COLUMNS: &'static str = "id, codigo_curso, descricao";
    const SEARCH_COLUMN: Option<&'static str> = Some("codigo_curso");
}
