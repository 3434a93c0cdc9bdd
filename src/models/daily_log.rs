//! # 작업자 이벤트(Daily Log) 모델
//!
//! 작업자가 출근/퇴근하거나 작업을 시작/완료할 때 사진과 함께 남기는 기록입니다.
//! 이벤트는 생성 후 수정되지 않으며 삭제되지도 않습니다 (추가 전용 로그).
//!
//! ## 이벤트 종류
//! | 저장 문자열 | variant | 의미 |
//! |------|------|------|
//! | `START` | `Start` | 출근 |
//! | `END` | `End` | 퇴근 |
//! | `START_WORK` | `StartWork` | 작업 시작 |
//! | `COMPLETE_WORK` | `CompleteWork` | 작업 완료 |

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// 이벤트 종류 — 문자열 대신 열거형으로 다뤄 `match`에서 빠짐없이 처리하게 합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    #[serde(alias = "Start")]
    Start,
    #[serde(alias = "End")]
    End,
    #[serde(alias = "StartWork")]
    StartWork,
    #[serde(alias = "CompleteWork")]
    CompleteWork,
}

impl EventType {
    /// DB에 저장되는 정규화된 문자열
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Start => "START",
            EventType::End => "END",
            EventType::StartWork => "START_WORK",
            EventType::CompleteWork => "COMPLETE_WORK",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 알 수 없는 이벤트 타입 문자열
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownEventType(pub String);

impl fmt::Display for UnknownEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown event type '{}'", self.0)
    }
}

impl FromStr for EventType {
    type Err = UnknownEventType;

    /// 정규 문자열(`START_WORK`)과 예전 클라이언트의 PascalCase(`StartWork`)를 모두 받습니다.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "START" | "Start" => Ok(EventType::Start),
            "END" | "End" => Ok(EventType::End),
            "START_WORK" | "StartWork" => Ok(EventType::StartWork),
            "COMPLETE_WORK" | "CompleteWork" => Ok(EventType::CompleteWork),
            other => Err(UnknownEventType(other.to_string())),
        }
    }
}

/// 이벤트 엔티티 — `daily_logs` 테이블 한 행에 대응합니다.
///
/// `kind`와 `timestamp`는 DB에 저장된 문자열 그대로입니다.
/// 예전 데이터에는 형식이 깨진 값이 남아 있을 수 있으므로,
/// 해석은 세션 재구성 단계(`services::work_sessions`)에서 관대하게 처리합니다.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DailyLog {
    pub id: String,
    pub worker_name: String,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: String,
    pub photo_url: String,
    pub timestamp: String,
    /// 이 이벤트가 닫는 이전 이벤트의 ID (작업 완료 → 작업 시작)
    pub related_event_id: Option<String>,
}

/// 이벤트 생성 요청 — `POST /api/logs`
///
/// `id`와 `timestamp`를 생략하면 서버가 채웁니다.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDailyLogRequest {
    pub id: Option<String>,
    pub worker_name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, alias = "photoRef")]
    pub photo_url: Option<String>,
    pub timestamp: Option<String>,
    pub related_event_id: Option<String>,
}

/// `GET /api/logs?worker=...` 쿼리 파라미터
#[derive(Debug, Default, Deserialize)]
pub struct DailyLogQuery {
    pub worker: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_canonical_and_legacy_spellings() {
        assert_eq!("START_WORK".parse::<EventType>(), Ok(EventType::StartWork));
        assert_eq!("StartWork".parse::<EventType>(), Ok(EventType::StartWork));
        assert_eq!("COMPLETE_WORK".parse::<EventType>(), Ok(EventType::CompleteWork));
        assert_eq!(" END ".parse::<EventType>(), Ok(EventType::End));
        assert_eq!(
            "lunch".parse::<EventType>(),
            Err(UnknownEventType("lunch".to_string()))
        );
    }

    #[test]
    fn serializes_with_screaming_snake_case() {
        let json = serde_json::to_string(&EventType::CompleteWork).unwrap();
        assert_eq!(json, "\"COMPLETE_WORK\"");
        let parsed: EventType = serde_json::from_str("\"Start\"").unwrap();
        assert_eq!(parsed, EventType::Start);
    }
}
