use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub role: String,
    /// 작업자가 속한 부서(공정 단계) 이름
    pub assigned_stage: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub id: Option<String>,
    pub username: String,
    pub password: String,
    pub name: String,
    pub role: String,
    pub assigned_stage: Option<String>,
}

/// 저장 직전의 직원 행. 비밀번호는 이미 해시된 상태입니다.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: String,
    pub username: String,
    pub password_hash: String,
    pub name: String,
    pub role: String,
    pub assigned_stage: Option<String>,
}

/// `PUT /api/users/{id}` — 전체 교체. `password`를 생략하면 기존 해시를 유지합니다.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub username: String,
    pub password: Option<String>,
    pub name: String,
    pub role: String,
    pub assigned_stage: Option<String>,
}

/// `POST /api/init` — DB가 비어 있을 때만 적용되는 초기 데이터
#[derive(Debug, Default, Deserialize)]
pub struct SeedRequest {
    #[serde(default)]
    pub users: Vec<CreateUserRequest>,
}
