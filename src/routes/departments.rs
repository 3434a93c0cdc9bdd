//! # 부서 API 라우트 핸들러
//!
//! | 메서드 | 경로 | 핸들러 |
//! |--------|------|--------|
//! | GET | /api/departments | `list_departments` |
//! | POST | /api/departments | `create_department` |
//! | DELETE | /api/departments/{id} | `delete_department` |

use crate::{db, error::AppError, models::*, routes::AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

pub async fn list_departments(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let departments = db::list_departments(&state.pool).await?;
    Ok(Json(json!({ "departments": departments })))
}

/// 부서를 추가합니다. 이름은 앞뒤 공백을 제거해 저장하며 중복될 수 없습니다.
pub async fn create_department(
    State(state): State<AppState>,
    Json(req): Json<CreateDepartmentRequest>,
) -> Result<(StatusCode, Json<Department>), AppError> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("Department name must not be empty".to_string()));
    }

    if db::find_department_by_name(&state.pool, name).await?.is_some() {
        return Err(AppError::Conflict(format!("Department '{}' already exists", name)));
    }

    let department = db::create_department(&state.pool, name, req.position).await?;
    Ok((StatusCode::CREATED, Json(department)))
}

pub async fn delete_department(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if !db::delete_department(&state.pool, &id).await? {
        return Err(AppError::NotFound);
    }
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_state;

    #[tokio::test]
    async fn create_trims_and_rejects_duplicates() {
        let state = test_state().await;

        let (status, Json(department)) = create_department(
            State(state.clone()),
            Json(CreateDepartmentRequest {
                name: "  Polishing ".to_string(),
                position: None,
            }),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(department.name, "Polishing");

        let duplicate = create_department(
            State(state.clone()),
            Json(CreateDepartmentRequest {
                name: "Polishing".to_string(),
                position: Some(3),
            }),
        )
        .await;
        assert!(matches!(duplicate, Err(AppError::Conflict(_))));

        let status = delete_department(State(state), Path(department.id))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);
    }
}
