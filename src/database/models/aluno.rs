use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::Model;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Aluno {
    pub id: i64,
    pub nome: String,
    pub rg: String,
    pub cpf: String,
    pub data_nascimento: NaiveDate,
}

impl Model for Aluno {
    const TABLE: &'static str = "alunos";
    const COLUMNS: &'static str = "id, nome, rg, cpf, data_nascimento";
    const SEARCH_COLUMN: Option<&'static str> = Some("nome");
}
