//! # 직원(User) 라우트 핸들러
//!
//! | 메서드 | 경로 | 핸들러 | 설명 |
//! |--------|------|--------|------|
//! | GET | /api/users | `list_users` | 직원 목록 (이름순) |
//! | POST | /api/users | `create_user` | 직원 추가 |
//! | PUT | /api/users/{id} | `update_user` | 직원 정보 교체 |
//! | DELETE | /api/users/{id} | `delete_user` | 직원 삭제 |
//!
//! 비밀번호는 Argon2id 해시로만 저장되며 응답에는 포함되지 않습니다.

use crate::{
    db,
    error::AppError,
    models::*,
    routes::AppState,
    services::password::hash_password,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

pub async fn list_users(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let users = db::list_users(&state.pool).await?;
    Ok(Json(json!({ "users": users })))
}

/// 필수 문자열 필드가 비어 있지 않은지 확인합니다.
fn require(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::BadRequest(format!("{} must not be empty", field)));
    }
    Ok(())
}

/// 요청 필드를 검증하고 비밀번호를 해시해 저장할 행을 만듭니다.
/// 직원 추가와 초기 데이터 입력(`seed`)이 함께 씁니다. DB에는 접근하지 않습니다.
pub(crate) fn prepare_new_user(req: CreateUserRequest) -> Result<NewUser, AppError> {
    require("username", &req.username)?;
    require("name", &req.name)?;
    require("role", &req.role)?;

    let password_hash = hash_password(&req.password)?;
    Ok(NewUser {
        id: req.id.unwrap_or_else(db::new_id),
        username: req.username,
        password_hash,
        name: req.name,
        role: req.role,
        assigned_stage: req.assigned_stage,
    })
}

/// 직원을 추가합니다. 클라이언트가 `id`를 보내지 않으면 UUIDv7을 생성합니다.
///
/// 사용자명이나 ID가 이미 있으면 409 Conflict.
pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let new_user = prepare_new_user(req)?;

    if db::find_by_username(&state.pool, &new_user.username).await?.is_some() {
        return Err(AppError::Conflict("Username already exists".to_string()));
    }
    if db::get_user(&state.pool, &new_user.id).await?.is_some() {
        return Err(AppError::Conflict("User id already exists".to_string()));
    }

    let user = db::create_user(
        &state.pool,
        &new_user.id,
        &new_user.username,
        &new_user.password_hash,
        &new_user.name,
        &new_user.role,
        new_user.assigned_stage.as_deref(),
    )
    .await?;

    tracing::info!(user_id = %user.id, username = %user.username, "Created user");
    Ok((StatusCode::CREATED, Json(user)))
}

/// 직원 정보를 교체합니다.
///
/// `password`가 없거나 빈 문자열이면 기존 비밀번호를 유지합니다.
/// 다른 직원이 이미 쓰는 사용자명으로 바꾸려 하면 409 Conflict.
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<User>, AppError> {
    require("username", &req.username)?;
    require("name", &req.name)?;
    require("role", &req.role)?;

    if let Some(other) = db::find_by_username(&state.pool, &req.username).await? {
        if other.id != id {
            return Err(AppError::Conflict("Username already exists".to_string()));
        }
    }

    let password_hash = match req.password.as_deref() {
        Some(password) if !password.is_empty() => Some(hash_password(password)?),
        _ => None,
    };

    let user = db::update_user(
        &state.pool,
        &id,
        &req.username,
        password_hash.as_deref(),
        &req.name,
        &req.role,
        req.assigned_stage.as_deref(),
    )
    .await?
    .ok_or(AppError::NotFound)?;

    Ok(Json(user))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if !db::delete_user(&state.pool, &id).await? {
        return Err(AppError::NotFound);
    }
    Ok(StatusCode::NO_CONTENT)
}
