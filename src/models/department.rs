//! # 부서(공정 단계) 모델
//!
//! 관리자가 편집하는 부서 목록입니다. `position` 오름차순이 곧
//! 작업(job)이 거쳐 가는 공정 순서이며, 직원의 `assignedStage`와
//! 작업의 `currentStage`는 이 목록의 `name`을 가리킵니다.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Department {
    pub id: String,
    pub name: String,
    pub position: i64,
}

/// 부서 생성 요청 — `POST /api/departments`
///
/// `position`을 생략하면 목록의 맨 뒤에 추가됩니다.
#[derive(Debug, Deserialize)]
pub struct CreateDepartmentRequest {
    pub name: String,
    pub position: Option<i64>,
}
