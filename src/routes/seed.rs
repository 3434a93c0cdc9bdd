//! # 초기 데이터 입력 핸들러
//!
//! `POST /api/init` + `{ "users": [...] }`
//!
//! 대시보드가 처음 실행될 때 호출합니다. 직원 테이블이 비어 있을 때만
//! 요청의 직원 목록을 저장하고, 이미 직원이 있으면 아무것도 하지 않습니다.
//! 저장은 전부 아니면 전무입니다. 한 명이라도 잘못되면 아무도 저장되지 않으므로
//! 목록을 고쳐 다시 호출할 수 있습니다.

use crate::{
    db,
    error::AppError,
    models::SeedRequest,
    routes::{users::prepare_new_user, AppState},
};
use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::collections::HashSet;

pub async fn init_data(
    State(state): State<AppState>,
    Json(req): Json<SeedRequest>,
) -> Result<Json<Value>, AppError> {
    let already_initialized = || Json(json!({ "message": "Already initialized", "created": 0 }));

    if db::count_users(&state.pool).await? > 0 {
        tracing::debug!("Users already present, skipping seed");
        return Ok(already_initialized());
    }

    // 저장 전에 목록 전체를 검증 (빈 필드, 목록 안의 중복)
    let mut usernames = HashSet::new();
    let mut ids = HashSet::new();
    let mut users = Vec::with_capacity(req.users.len());
    for entry in req.users {
        let user = prepare_new_user(entry)?;
        if !usernames.insert(user.username.clone()) {
            return Err(AppError::Conflict(format!(
                "Username '{}' appears more than once",
                user.username
            )));
        }
        if !ids.insert(user.id.clone()) {
            return Err(AppError::Conflict(format!(
                "User id '{}' appears more than once",
                user.id
            )));
        }
        users.push(user);
    }

    match db::seed_users(&state.pool, &users).await? {
        Some(created) => {
            tracing::info!(created, "Seeded initial users");
            Ok(Json(json!({ "message": "Initialized", "created": created })))
        }
        None => Ok(already_initialized()),
    }
}
