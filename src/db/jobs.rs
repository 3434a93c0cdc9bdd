//! # 작업(Job) 데이터베이스 쿼리 모듈
//!
//! ## 테이블 구조
//! - `jobs`: 작업 엔티티 (현재 공정 단계, 우선순위, 디자인 이미지)
//! - `job_logs`: 공정 이동 이력. `ON DELETE CASCADE`로 작업과 함께 삭제됨
//!
//! 이력은 추가만 가능합니다. 이 작업에 이미 있는 이력 ID를 다시 보내면 건너뛰고,
//! 다른 작업의 이력 ID와 겹치면 409 Conflict입니다.

use crate::error::AppError;
use crate::models::*;
use sqlx::SqlitePool;
use std::collections::HashMap;

const JOB_COLUMNS: &str = "id, design_image_url, current_stage, priority, created_at";
const JOB_LOG_COLUMNS: &str =
    "id, job_id, stage_name, worker_name, proof_photo_url, timestamp";

/// 모든 작업을 최신순으로, 각 작업의 이력과 함께 조회합니다.
///
/// 작업마다 이력을 따로 조회하지 않고(N+1 방지) 이력 전체를 한 번에 읽어
/// `job_id`별로 나눠 붙입니다.
pub async fn list_jobs(pool: &SqlitePool) -> Result<Vec<Job>, AppError> {
    let mut jobs = sqlx::query_as::<_, Job>(&format!(
        "SELECT {JOB_COLUMNS} FROM jobs ORDER BY created_at DESC, id DESC"
    ))
    .fetch_all(pool)
    .await?;

    let logs = sqlx::query_as::<_, JobLog>(&format!(
        "SELECT {JOB_LOG_COLUMNS} FROM job_logs ORDER BY timestamp, id"
    ))
    .fetch_all(pool)
    .await?;

    let mut by_job: HashMap<String, Vec<JobLog>> = HashMap::new();
    for log in logs {
        by_job.entry(log.job_id.clone()).or_default().push(log);
    }
    for job in &mut jobs {
        job.history = by_job.remove(&job.id).unwrap_or_default();
    }

    Ok(jobs)
}

pub async fn get_job(pool: &SqlitePool, id: &str) -> Result<Option<Job>, AppError> {
    let job = sqlx::query_as::<_, Job>(&format!("SELECT {JOB_COLUMNS} FROM jobs WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    let Some(mut job) = job else {
        return Ok(None);
    };
    job.history = list_job_history(pool, id).await?;
    Ok(Some(job))
}

pub async fn list_job_history(pool: &SqlitePool, job_id: &str) -> Result<Vec<JobLog>, AppError> {
    let history = sqlx::query_as::<_, JobLog>(&format!(
        "SELECT {JOB_LOG_COLUMNS} FROM job_logs WHERE job_id = ? ORDER BY timestamp, id"
    ))
    .bind(job_id)
    .fetch_all(pool)
    .await?;

    Ok(history)
}

/// 작업과 초기 이력을 하나의 트랜잭션으로 생성합니다.
pub async fn create_job(
    pool: &SqlitePool,
    id: &str,
    req: &CreateJobRequest,
) -> Result<Job, AppError> {
    let created_at = req
        .created_at
        .clone()
        .unwrap_or_else(super::now_timestamp);

    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO jobs (id, design_image_url, current_stage, priority, created_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(&req.design_image_url)
    .bind(&req.current_stage)
    .bind(&req.priority)
    .bind(&created_at)
    .execute(&mut *tx)
    .await?;

    for entry in &req.history {
        insert_history_entry(&mut tx, id, entry).await?;
    }

    tx.commit().await?;

    get_job(pool, id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created job".to_string()))
}

/// 작업을 부분 수정하고 새 이력 항목을 추가합니다.
///
/// ## 반환값
/// - `Ok(Some(Job))`: 수정 성공, 이력이 포함된 최신 상태
/// - `Ok(None)`: 해당 ID의 작업이 없음
pub async fn update_job(
    pool: &SqlitePool,
    id: &str,
    req: &UpdateJobRequest,
) -> Result<Option<Job>, AppError> {
    let mut tx = pool.begin().await?;

    let exists: Option<String> = sqlx::query_scalar("SELECT id FROM jobs WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
    if exists.is_none() {
        return Ok(None);
    }

    // COALESCE: 요청에 없는 필드(NULL 바인딩)는 기존 값을 유지
    sqlx::query(
        r#"
        UPDATE jobs
        SET design_image_url = COALESCE(?, design_image_url),
            current_stage = COALESCE(?, current_stage),
            priority = COALESCE(?, priority)
        WHERE id = ?
        "#,
    )
    .bind(&req.design_image_url)
    .bind(&req.current_stage)
    .bind(&req.priority)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    let mut appended = 0;
    for entry in &req.history {
        if insert_history_entry(&mut tx, id, entry).await? {
            appended += 1;
        }
    }

    tx.commit().await?;
    tracing::debug!(job_id = %id, appended, "Updated job");

    get_job(pool, id).await
}

/// 이력 항목 하나를 추가합니다.
///
/// ## 반환값
/// - `Ok(true)`: 새로 추가됨
/// - `Ok(false)`: 이 작업에 이미 있는 ID라 건너뜀
/// - `Err(AppError::Conflict)`: 다른 작업이 이미 쓰는 ID
async fn insert_history_entry(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    job_id: &str,
    entry: &JobLogInput,
) -> Result<bool, AppError> {
    let id = entry.id.clone().unwrap_or_else(super::new_id);

    let owner: Option<String> = sqlx::query_scalar("SELECT job_id FROM job_logs WHERE id = ?")
        .bind(&id)
        .fetch_optional(&mut **tx)
        .await?;
    match owner {
        Some(owner) if owner == job_id => return Ok(false),
        Some(owner) => {
            return Err(AppError::Conflict(format!(
                "History entry '{}' already belongs to job '{}'",
                id, owner
            )));
        }
        None => {}
    }

    let timestamp = entry
        .timestamp
        .clone()
        .unwrap_or_else(super::now_timestamp);

    sqlx::query(
        r#"
        INSERT INTO job_logs
            (id, job_id, stage_name, worker_name, proof_photo_url, timestamp)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(job_id)
    .bind(&entry.stage_name)
    .bind(&entry.worker_name)
    .bind(&entry.proof_photo_url)
    .bind(&timestamp)
    .execute(&mut **tx)
    .await?;

    Ok(true)
}

/// 작업을 삭제합니다. 이력은 외래키 CASCADE로 함께 삭제됩니다.
pub async fn delete_job(pool: &SqlitePool, id: &str) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM jobs WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
