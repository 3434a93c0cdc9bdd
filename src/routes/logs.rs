//! # 작업자 이벤트 / 작업 세션 라우트 핸들러
//!
//! | 메서드 | 경로 | 핸들러 | 설명 |
//! |--------|------|--------|------|
//! | GET | /api/logs | `list_logs` | 이벤트 목록 (`?worker=`) |
//! | POST | /api/logs | `create_log` | 이벤트 기록 |
//! | GET | /api/logs/sessions | `list_work_sessions` | 작업자별 작업 세션 |
//!
//! ## 작업 세션 조회 흐름
//! ```text
//! 쿼리 파라미터 → SessionFilter (요청 단위 조건)
//!              → daily_logs 전체 조회
//!              → services::work_sessions::group_sessions (순수 함수)
//!              → { "workers": [{ "workerName", "sessions": [...] }] }
//! ```

use crate::{
    config::offset_from_minutes,
    db,
    error::AppError,
    models::*,
    routes::AppState,
    services::work_sessions::{group_sessions, parse_timestamp, SessionFilter},
};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};
use std::collections::HashSet;

/// 작업자 이름 필터. 저장할 때처럼 앞뒤 공백을 제거하고, 빈 값은 필터 없음으로 봅니다.
fn worker_filter(worker: Option<&str>) -> Option<&str> {
    worker.map(str::trim).filter(|name| !name.is_empty())
}

pub async fn list_logs(
    State(state): State<AppState>,
    Query(query): Query<DailyLogQuery>,
) -> Result<Json<Value>, AppError> {
    let logs = db::list_daily_logs(&state.pool, worker_filter(query.worker.as_deref())).await?;
    Ok(Json(json!({ "logs": logs })))
}

/// 이벤트를 기록합니다.
///
/// 검증 규칙:
/// - `type`은 네 가지 이벤트 종류 중 하나 (정규 문자열로 저장)
/// - `timestamp`는 해석 가능해야 하며 UTC RFC 3339로 정규화해 저장. 없으면 현재 시각
/// - `relatedEventId`가 있으면 같은 작업자의 기존 이벤트를 가리켜야 함
pub async fn create_log(
    State(state): State<AppState>,
    Json(req): Json<CreateDailyLogRequest>,
) -> Result<(StatusCode, Json<DailyLog>), AppError> {
    let worker_name = req.worker_name.trim();
    if worker_name.is_empty() {
        return Err(AppError::BadRequest("workerName must not be empty".to_string()));
    }

    let kind = req
        .kind
        .parse::<EventType>()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let timestamp = match req.timestamp.as_deref() {
        Some(raw) => parse_timestamp(raw, state.local_offset)
            .ok_or_else(|| AppError::BadRequest(format!("Invalid timestamp '{}'", raw)))?
            .with_timezone(&Utc)
            .to_rfc3339_opts(SecondsFormat::Millis, true),
        None => db::now_timestamp(),
    };

    if let Some(related_id) = req.related_event_id.as_deref() {
        let related = db::get_daily_log(&state.pool, related_id)
            .await?
            .ok_or_else(|| {
                AppError::BadRequest(format!("Related event '{}' does not exist", related_id))
            })?;
        if related.worker_name != worker_name {
            return Err(AppError::BadRequest(
                "Related event belongs to a different worker".to_string(),
            ));
        }
    }

    let id = req.id.clone().unwrap_or_else(db::new_id);
    if db::get_daily_log(&state.pool, &id).await?.is_some() {
        return Err(AppError::Conflict(format!("Event '{}' already exists", id)));
    }

    let log = db::insert_daily_log(
        &state.pool,
        &DailyLog {
            id,
            worker_name: worker_name.to_string(),
            kind: kind.as_str().to_string(),
            photo_url: req.photo_url.clone().unwrap_or_default(),
            timestamp,
            related_event_id: req.related_event_id.clone(),
        },
    )
    .await?;

    tracing::info!(event_id = %log.id, worker = %log.worker_name, kind = %kind, "Recorded event");
    Ok((StatusCode::CREATED, Json(log)))
}

/// 작업자별 작업 세션을 조회합니다.
///
/// `GET /api/logs/sessions?date=2026-10-19&department=Casting&utcOffsetMinutes=540`
///
/// - `date`: 이 날(로컬 기준)에 시작한 세션만
/// - `worker`: 한 작업자만
/// - `department`: `assignedStage`가 이 부서인 직원들만
/// - `utcOffsetMinutes`: "로컬 날짜"의 기준 시간대. 없으면 서버 설정값
pub async fn list_work_sessions(
    State(state): State<AppState>,
    Query(query): Query<SessionQuery>,
) -> Result<Json<Value>, AppError> {
    let offset = match query.utc_offset_minutes {
        Some(minutes) => offset_from_minutes(minutes).ok_or_else(|| {
            AppError::BadRequest(format!("Invalid utcOffsetMinutes '{}'", minutes))
        })?,
        None => state.local_offset,
    };

    let department_workers = match query.department.as_deref() {
        Some(department) => Some(
            db::list_worker_names_in_stage(&state.pool, department)
                .await?
                .into_iter()
                .collect::<HashSet<_>>(),
        ),
        None => None,
    };

    let worker = worker_filter(query.worker.as_deref()).map(str::to_string);
    let logs = db::list_daily_logs(&state.pool, worker.as_deref()).await?;

    let mut filter = SessionFilter::new(offset);
    filter.date = query.date;
    filter.worker = worker;
    filter.department_workers = department_workers;
    let workers = group_sessions(&logs, &filter);
    tracing::debug!(
        events = logs.len(),
        workers = workers.len(),
        "Reconstructed work sessions"
    );

    Ok(Json(json!({ "workers": workers })))
}
