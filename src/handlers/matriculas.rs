use axum::extract::{Path, State};

use crate::database::models::{AlunoMatriculado, CursoMatriculado};
use crate::database::views;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /alunos/{id}/matriculas/ - courses a student is enrolled in
pub async fn by_aluno(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Vec<CursoMatriculado>> {
    // An id that cannot exist simply has no enrollments
    let Ok(id) = id.parse::<i64>() else {
        return Ok(ApiResponse::success(Vec::new()));
    };
    let rows = views::matriculas_do_aluno(&state.pool, id).await?;
    Ok(ApiResponse::success(rows))
}

/// GET /cursos/{id}/alunos/ - students enrolled in a course
pub async fn by_curso(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Vec<AlunoMatriculado>> {
    let Ok(id) = id.parse::<i64>() else {
        return Ok(ApiResponse::success(Vec::new()));
    };
    let rows = views::alunos_do_curso(&state.pool, id).await?;
    Ok(ApiResponse::success(rows))
}
