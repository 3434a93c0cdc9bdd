//! # 작업(Job) 라우트 핸들러
//!
//! ## 엔드포인트
//! - `GET    /api/jobs`      → 작업 목록 (최신순, 이력 포함)
//! - `POST   /api/jobs`      → 새 작업 생성 (초기 이력 포함 가능)
//! - `GET    /api/jobs/{id}` → 단일 작업 조회
//! - `PUT    /api/jobs/{id}` → 공정 단계 등 수정 + 새 이력 추가
//! - `DELETE /api/jobs/{id}` → 작업 삭제 (이력도 함께 삭제)
//!
//! 작업 ID는 보통 공방에서 붙인 관리 번호를 클라이언트가 보내며,
//! 없으면 서버가 UUIDv7을 생성합니다.

use crate::{db, error::AppError, models::*, routes::AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

pub async fn list_jobs(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let jobs = db::list_jobs(&state.pool).await?;
    Ok(Json(json!({ "jobs": jobs })))
}

pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Job>, AppError> {
    let job = db::get_job(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(job))
}

/// 이력 항목의 필수 필드 검사
fn validate_history(history: &[JobLogInput]) -> Result<(), AppError> {
    for entry in history {
        if entry.stage_name.trim().is_empty() || entry.worker_name.trim().is_empty() {
            return Err(AppError::BadRequest(
                "History entries need stageName and workerName".to_string(),
            ));
        }
    }
    Ok(())
}

pub async fn create_job(
    State(state): State<AppState>,
    Json(req): Json<CreateJobRequest>,
) -> Result<(StatusCode, Json<Job>), AppError> {
    if req.current_stage.trim().is_empty() {
        return Err(AppError::BadRequest("currentStage must not be empty".to_string()));
    }
    validate_history(&req.history)?;

    let id = req.id.clone().unwrap_or_else(db::new_id);
    if db::get_job(&state.pool, &id).await?.is_some() {
        return Err(AppError::Conflict(format!("Job '{}' already exists", id)));
    }

    let job = db::create_job(&state.pool, &id, &req).await?;
    tracing::info!(job_id = %job.id, stage = %job.current_stage, "Created job");
    Ok((StatusCode::CREATED, Json(job)))
}

/// 작업을 수정합니다.
///
/// `PUT /api/jobs/{id}` + `{ "currentStage": "Casting", "history": [...] }`
///
/// 보낸 필드만 바뀌며, `history`에서 아직 저장되지 않은 항목만 추가됩니다.
/// 클라이언트가 전체 이력을 다시 보내도 중복 저장되지 않습니다.
pub async fn update_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateJobRequest>,
) -> Result<Json<Job>, AppError> {
    if req
        .current_stage
        .as_deref()
        .is_some_and(|stage| stage.trim().is_empty())
    {
        return Err(AppError::BadRequest("currentStage must not be empty".to_string()));
    }
    validate_history(&req.history)?;

    let job = db::update_job(&state.pool, &id, &req)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(job))
}

pub async fn delete_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if !db::delete_job(&state.pool, &id).await? {
        return Err(AppError::NotFound);
    }
    tracing::info!(job_id = %id, "Deleted job");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_state;

    fn create_request(id: &str) -> CreateJobRequest {
        CreateJobRequest {
            id: Some(id.to_string()),
            design_image_url: "/designs/pendant.png".to_string(),
            current_stage: "Design".to_string(),
            priority: "Normal".to_string(),
            created_at: None,
            history: Vec::new(),
        }
    }

    #[tokio::test]
    async fn create_then_advance_stage() {
        let state = test_state().await;

        let (status, Json(job)) = create_job(State(state.clone()), Json(create_request("J-7")))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert!(!job.created_at.is_empty());

        let Json(job) = update_job(
            State(state.clone()),
            Path("J-7".to_string()),
            Json(UpdateJobRequest {
                current_stage: Some("Casting".to_string()),
                history: vec![JobLogInput {
                    id: None,
                    stage_name: "Design".to_string(),
                    worker_name: "Ara".to_string(),
                    proof_photo_url: "/photos/j7.jpg".to_string(),
                    timestamp: None,
                }],
                ..Default::default()
            }),
        )
        .await
        .unwrap();

        assert_eq!(job.current_stage, "Casting");
        assert_eq!(job.history.len(), 1);

        let Json(fetched) = get_job(State(state), Path("J-7".to_string())).await.unwrap();
        assert_eq!(fetched.history[0].worker_name, "Ara");
    }

    #[tokio::test]
    async fn duplicate_job_id_conflicts() {
        let state = test_state().await;
        create_job(State(state.clone()), Json(create_request("J-1")))
            .await
            .unwrap();
        let result = create_job(State(state), Json(create_request("J-1"))).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn missing_job_is_not_found() {
        let state = test_state().await;
        let get = get_job(State(state.clone()), Path("nope".to_string())).await;
        assert!(matches!(get, Err(AppError::NotFound)));
        let delete = delete_job(State(state), Path("nope".to_string())).await;
        assert!(matches!(delete, Err(AppError::NotFound)));
    }
}
