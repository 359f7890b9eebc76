//! Plain domain records for the educational platform.
//!
//! These are the in-process representations handed to UI state stores. They
//! are deliberately decoupled from the wire DTOs in `studia-client`; the
//! façades own the one-way mapping into these types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Signed-in user's profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
}

/// Per-user preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSettings {
    pub locale: String,
    pub theme: Theme,
    pub notifications_enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    System,
}

/// Compact course representation for catalogue listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseSummary {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub author_name: String,
    pub module_count: u32,
    pub published: bool,
}

/// Full course with authored content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub author_id: Uuid,
    pub published: bool,
    pub modules: Vec<CourseModule>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseModule {
    pub id: Uuid,
    pub title: String,
    pub position: u32,
    pub lessons: Vec<Lesson>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: Uuid,
    pub title: String,
    pub position: u32,
    pub content: LessonContent,
}

/// Lesson body variants supported by the authoring tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum LessonContent {
    Article { body_markdown: String },
    Video { url: String, duration_seconds: u32 },
    Quiz { quiz_id: Uuid },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quiz {
    pub id: Uuid,
    pub title: String,
    pub pass_threshold_percent: u8,
    pub questions: Vec<QuizQuestion>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub id: Uuid,
    pub prompt: String,
    pub options: Vec<AnswerOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub id: Uuid,
    pub text: String,
}

/// Result of submitting quiz answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizOutcome {
    pub quiz_id: Uuid,
    pub score_percent: u8,
    pub passed: bool,
}

/// A course's technology tree: nodes form a dependency forest the learner
/// unlocks top-down. Rendering concerns (layout, virtualization) live in the
/// UI layer, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechTree {
    pub course_id: Uuid,
    pub roots: Vec<TreeNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub id: Uuid,
    pub title: String,
    pub status: NodeStatus,
    pub lesson_id: Option<Uuid>,
    pub children: Vec<TreeNode>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    Locked,
    Available,
    Completed,
}

/// Study room: a shared space where member progress is tracked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: Uuid,
    pub name: String,
    pub invite_code: String,
    pub course_id: Uuid,
    pub member_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomProgress {
    pub room_id: Uuid,
    pub members: Vec<MemberProgress>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberProgress {
    pub user_id: Uuid,
    pub display_name: String,
    pub completed_lessons: u32,
    pub total_lessons: u32,
}

impl MemberProgress {
    /// Completion ratio in percent, saturating at 100.
    #[must_use]
    pub fn percent_complete(&self) -> u8 {
        if self.total_lessons == 0 {
            return 0;
        }
        let pct = self.completed_lessons.saturating_mul(100) / self.total_lessons;
        pct.min(100) as u8
    }
}
