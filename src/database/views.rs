use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::models::{AlunoMatriculado, CursoMatriculado};

/// Enrollments of one student, rendered with the course description
pub async fn matriculas_do_aluno(
    pool: &PgPool,
    aluno_id: i64,
) -> Result<Vec<CursoMatriculado>, DatabaseError> {
    let rows = sqlx::query_as::<_, CursoMatriculado>(
        "SELECT c.descricao AS curso, m.periodo
         FROM matriculas m
         JOIN cursos c ON c.id = m.curso_id
         WHERE m.aluno_id = $1
         ORDER BY m.id",
    )
    .bind(aluno_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Enrollments in one course, rendered with the student name
pub async fn alunos_do_curso(
    pool: &PgPool,
    curso_id: i64,
) -> Result<Vec<AlunoMatriculado>, DatabaseError> {
    let rows = sqlx::query_as::<_, AlunoMatriculado>(
        "SELECT a.nome AS aluno, m.periodo
         FROM matriculas m
         JOIN alunos a ON a.id = m.aluno_id
         WHERE m.curso_id = $1
         ORDER BY m.id",
    )
    .bind(curso_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
