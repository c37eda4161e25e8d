use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};
use sqlx::FromRow;

use super::Model;

/// Shift an enrollment is attended in. Serialized as its one-letter code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "periodo")]
pub enum Periodo {
    #[serde(rename = "M")]
    #[sqlx(rename = "M")]
    Manha,
    #[serde(rename = "T")]
    #[sqlx(rename = "T")]
    Tarde,
    #[serde(rename = "N")]
    #[sqlx(rename = "N")]
    Noite,
}

impl Periodo {
    pub const ALL: [Periodo; 3] = [Periodo::Manha, Periodo::Tarde, Periodo::Noite];

    pub fn code(self) -> &'static str {
        match self {
            Periodo::Manha => "M",
            Periodo::Tarde => "T",
            Periodo::Noite => "N",
        }
    }

    /// Human-readable label used by the joined list views
    pub fn label(self) -> &'static str {
        match self {
            Periodo::Manha => "Manhã",
            Periodo::Tarde => "Tarde",
            Periodo::Noite => "Noite",
        }
    }

    pub fn serialize_label<S: Serializer>(periodo: &Periodo, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(periodo.label())
    }
}

impl fmt::Display for Periodo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("\"{0}\" is not a valid choice.")]
pub struct InvalidPeriodo(pub String);

impl FromStr for Periodo {
    type Err = InvalidPeriodo;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Periodo::ALL
            .into_iter()
            .find(|p| p.code() == s)
            .ok_or_else(|| InvalidPeriodo(s.to_string()))
    }
}

/// Enrollment with raw foreign keys, as exposed by `/matriculas/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Matricula {
    pub id: i64,
    #[serde(rename = "aluno")]
    pub aluno_id: i64,
    #[serde(rename = "curso")]
    pub curso_id: i64,
    pub periodo: Periodo,
}

impl Model for Matricula {
    const TABLE: &'static str = "matriculas";
    const COLUMNS: &'static str = "id, aluno_id, curso_id, periodo";

    fn relation(constraint: &str) -> Option<(&'static str, &'static str)> {
        match constraint {
            "matriculas_aluno_id_fkey" => Some(("aluno", "aluno_id")),
            "matriculas_curso_id_fkey" => Some(("curso", "curso_id")),
            _ => None,
        }
    }
}

/// One row of `/alunos/{id}/matriculas/`
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct CursoMatriculado {
    pub curso: String,
    #[serde(serialize_with = "Periodo::serialize_label")]
    pub periodo: Periodo,
}

/// One row of `/cursos/{id}/alunos/`
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct AlunoMatriculado {
    pub aluno: String,
    #[serde(serialize_with = "Periodo::serialize_label")]
    pub periodo: Periodo,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_known_codes_only() {
        assert_eq!("M".parse::<Periodo>(), Ok(Periodo::Manha));
        assert_eq!("T".parse::<Periodo>(), Ok(Periodo::Tarde));
        assert_eq!("N".parse::<Periodo>(), Ok(Periodo::Noite));
        assert_eq!(
            "m".parse::<Periodo>().unwrap_err().to_string(),
            "\"m\" is not a valid choice."
        );
    }

    #[test]
    fn raw_matricula_exposes_codes_and_ids() {
        let m = Matricula {
            id: 7,
            aluno_id: 1,
            curso_id: 2,
            periodo: Periodo::Noite,
        };
        assert_eq!(
            serde_json::to_value(&m).unwrap(),
            json!({"id": 7, "aluno": 1, "curso": 2, "periodo": "N"})
        );
    }

    #[test]
    fn joined_views_expose_labels() {
        let row = CursoMatriculado {
            curso: "Rust básico".into(),
            periodo: Periodo::Manha,
        };
        assert_eq!(
            serde_json::to_value(&row).unwrap(),
            json!({"curso": "Rust básico", "periodo": "Manhã"})
        );

        let row = AlunoMatriculado {
            aluno: "Ana".into(),
            periodo: Periodo::Tarde,
        };
        assert_eq!(
            serde_json::to_value(&row).unwrap(),
            json!({"aluno": "Ana", "periodo": "Tarde"})
        );
    }
}
