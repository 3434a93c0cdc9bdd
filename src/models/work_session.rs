//! # 작업 세션 모델
//!
//! 작업 세션은 DB에 저장되지 않는 **파생 데이터**입니다.
//! 조회할 때마다 `daily_logs`의 작업 시작/완료 이벤트를 짝지어 다시 만듭니다.
//!
//! ## 상태
//! - `Completed`: 시작과 완료가 짝지어짐. 완료 이벤트만 있는 고아(orphan) 세션도 포함
//! - `InProgress`: 시작만 있고 아직 완료되지 않음
//! - `Abandoned`: 완료 전에 같은 작업자의 다음 작업 시작으로 대체됨

use super::EventType;
use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

/// 타임스탬프가 해석된 작업자 이벤트
///
/// `DailyLog`에서 변환되며, 변환에 실패한 행은 세션 재구성에서 제외됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkEvent {
    pub id: String,
    pub worker_name: String,
    #[serde(rename = "type")]
    pub kind: EventType,
    /// 요청 시간대로 변환된 시각
    pub timestamp: DateTime<FixedOffset>,
    pub photo_url: String,
    pub related_event_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionStatus {
    Completed,
    InProgress,
    Abandoned,
}

/// 재구성된 작업 세션 한 건
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkSession {
    pub start_event: Option<WorkEvent>,
    pub end_event: Option<WorkEvent>,
    pub status: SessionStatus,
    pub duration_minutes: Option<i64>,
    /// 화면 표시용 소요 시간. 예: `"1h 5m"`, 계산할 수 없으면 `"--"`
    pub duration: String,
}

impl WorkSession {
    /// 시작과 완료가 직접 짝지어진 세션. 소요 시간은 분 단위로 내림합니다.
    pub fn completed(start: WorkEvent, end: WorkEvent) -> Self {
        let minutes = (end.timestamp - start.timestamp).num_minutes();
        Self {
            start_event: Some(start),
            end_event: Some(end),
            status: SessionStatus::Completed,
            duration_minutes: Some(minutes),
            duration: format_duration(Some(minutes)),
        }
    }

    /// 짝이 되는 시작 이벤트가 없는 완료 이벤트
    pub fn orphan(end: WorkEvent) -> Self {
        Self {
            start_event: None,
            end_event: Some(end),
            status: SessionStatus::Completed,
            duration_minutes: None,
            duration: format_duration(None),
        }
    }

    pub fn abandoned(start: WorkEvent) -> Self {
        Self::open(start, SessionStatus::Abandoned)
    }

    pub fn in_progress(start: WorkEvent) -> Self {
        Self::open(start, SessionStatus::InProgress)
    }

    fn open(start: WorkEvent, status: SessionStatus) -> Self {
        Self {
            start_event: Some(start),
            end_event: None,
            status,
            duration_minutes: None,
            duration: format_duration(None),
        }
    }

    /// 날짜 필터와 정렬의 기준이 되는 이벤트.
    /// 시작 이벤트가 있으면 시작, 고아 세션이면 완료 이벤트입니다.
    /// 생성자들은 항상 둘 중 하나를 채우므로 실제로 `None`이 되지는 않습니다.
    pub fn anchor(&self) -> Option<&WorkEvent> {
        self.start_event.as_ref().or(self.end_event.as_ref())
    }

    /// 기준 이벤트의 로컬 날짜 (이벤트 시각은 이미 요청 시간대로 변환되어 있음)
    pub fn local_date(&self) -> Option<NaiveDate> {
        self.anchor().map(|event| event.timestamp.date_naive())
    }
}

/// `Some(65)` → `"1h 5m"`, `None` → `"--"`
pub fn format_duration(minutes: Option<i64>) -> String {
    match minutes {
        Some(m) => format!("{}h {}m", m / 60, m % 60),
        None => "--".to_string(),
    }
}

/// 작업자 한 명의 세션 묶음 — 응답의 `workers` 배열 원소
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerSessions {
    pub worker_name: String,
    pub sessions: Vec<WorkSession>,
}

/// `GET /api/logs/sessions` 쿼리 파라미터
///
/// 화면마다 필요한 조건을 전역 상태 대신 요청마다 명시적으로 받습니다.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionQuery {
    /// `YYYY-MM-DD`. 생략하면 모든 날짜
    pub date: Option<NaiveDate>,
    pub worker: Option<String>,
    /// 직원의 `assignedStage`와 일치하는 작업자만 포함
    pub department: Option<String>,
    /// 로컬 날짜를 자를 기준 시간대. 생략하면 서버 설정값
    pub utc_offset_minutes: Option<i32>,
}
