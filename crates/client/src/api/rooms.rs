//! Rooms façade: shared study spaces with per-member progress tracking.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use studia_domain::{ApiResult, DomainError, MemberProgress, Room, RoomProgress};
use uuid::Uuid;

use super::parse_id;
use crate::http::RequestPipeline;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RoomDto {
    id: String,
    name: String,
    invite_code: String,
    course_id: String,
    member_count: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RoomProgressDto {
    room_id: String,
    #[serde(default)]
    members: Vec<MemberProgressDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MemberProgressDto {
    user_id: String,
    display_name: String,
    completed_lessons: u32,
    total_lessons: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct JoinRequest<'a> {
    invite_code: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProgressReport {
    completed_lessons: u32,
}

fn map_room(dto: RoomDto) -> Result<Room, DomainError> {
    Ok(Room {
        id: parse_id(&dto.id, "room.id")?,
        name: dto.name,
        invite_code: dto.invite_code,
        course_id: parse_id(&dto.course_id, "room.courseId")?,
        member_count: dto.member_count,
    })
}

fn map_progress(dto: RoomProgressDto) -> Result<RoomProgress, DomainError> {
    Ok(RoomProgress {
        room_id: parse_id(&dto.room_id, "progress.roomId")?,
        members: dto
            .members
            .into_iter()
            .map(|m| {
                Ok(MemberProgress {
                    user_id: parse_id(&m.user_id, "member.userId")?,
                    display_name: m.display_name,
                    completed_lessons: m.completed_lessons,
                    total_lessons: m.total_lessons,
                })
            })
            .collect::<Result<_, DomainError>>()?,
    })
}

/// Rooms feature façade. Read/write-through: no token side effects.
#[derive(Clone)]
pub struct RoomsApi {
    pipeline: Arc<RequestPipeline>,
}

impl RoomsApi {
    #[must_use]
    pub fn new(pipeline: Arc<RequestPipeline>) -> Self {
        Self { pipeline }
    }

    /// Rooms the current user belongs to.
    pub async fn list(&self) -> ApiResult<Vec<Room>> {
        match self.pipeline.get::<Vec<RoomDto>>("/rooms").await {
            Ok(dtos) => dtos.into_iter().map(map_room).collect::<Result<_, _>>().into(),
            Err(err) => ApiResult::Error(err),
        }
    }

    /// Join a room by invite code.
    pub async fn join(&self, invite_code: &str) -> ApiResult<Room> {
        let request = JoinRequest { invite_code };
        match self.pipeline.post::<_, RoomDto>("/rooms/join", &request).await {
            Ok(dto) => map_room(dto).into(),
            Err(err) => ApiResult::Error(err),
        }
    }

    /// Per-member progress inside a room.
    pub async fn progress(&self, room_id: Uuid) -> ApiResult<RoomProgress> {
        match self.pipeline.get::<RoomProgressDto>(&format!("/rooms/{room_id}/progress")).await {
            Ok(dto) => map_progress(dto).into(),
            Err(err) => ApiResult::Error(err),
        }
    }

    /// Report the current user's lesson count for a room.
    pub async fn report_progress(&self, room_id: Uuid, completed_lessons: u32) -> ApiResult<()> {
        let report = ProgressReport { completed_lessons };
        self.pipeline.post::<_, ()>(&format!("/rooms/{room_id}/progress"), &report).await.into()
    }
}
