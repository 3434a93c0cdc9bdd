//! # 작업(Job) 모델
//!
//! 주얼리 한 점이 공정 단계를 거쳐 가는 과정을 추적합니다.
//!
//! ## 구조체 역할
//! - `Job`: `jobs` 테이블 한 행 + 공정 이동 이력(`history`)
//! - `JobLog`: 공정 이동 한 건 (어느 단계에서, 누가, 어떤 사진으로 확인했는지)
//! - `CreateJobRequest` / `UpdateJobRequest`: 클라이언트 요청 본문

use serde::{Deserialize, Serialize};

/// 작업 엔티티
///
/// `history`는 `jobs` 테이블의 컬럼이 아니므로 `#[sqlx(skip)]`으로
/// 행 매핑에서 제외하고, 조회 후 `job_logs`에서 따로 채웁니다.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: String,
    pub design_image_url: String,
    pub current_stage: String,
    pub priority: String,
    pub created_at: String,
    #[sqlx(skip)]
    #[serde(default)]
    pub history: Vec<JobLog>,
}

/// 공정 이동 이력 — `job_logs` 테이블 한 행. 추가만 가능합니다.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct JobLog {
    pub id: String,
    pub job_id: String,
    pub stage_name: String,
    pub worker_name: String,
    pub proof_photo_url: String,
    pub timestamp: String,
}

/// 요청 본문 안의 이력 항목
///
/// 클라이언트가 `id`를 보내면 같은 항목을 여러 번 보내도 한 번만 저장됩니다.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobLogInput {
    pub id: Option<String>,
    pub stage_name: String,
    pub worker_name: String,
    #[serde(default)]
    pub proof_photo_url: String,
    pub timestamp: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobRequest {
    pub id: Option<String>,
    pub design_image_url: String,
    pub current_stage: String,
    pub priority: String,
    pub created_at: Option<String>,
    #[serde(default)]
    pub history: Vec<JobLogInput>,
}

/// 작업 수정 요청 — `PUT /api/jobs/{id}`
///
/// 보낸 필드만 바뀌고, `history`에서는 아직 저장되지 않은 항목만 추가됩니다.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateJobRequest {
    pub design_image_url: Option<String>,
    pub current_stage: Option<String>,
    pub priority: Option<String>,
    #[serde(default)]
    pub history: Vec<JobLogInput>,
}
