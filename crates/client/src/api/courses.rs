//! Courses façade: catalogue browsing, authoring, and quizzes.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use studia_domain::{
    AnswerOption, ApiResult, Course, CourseModule, CourseSummary, DomainError, Lesson,
    LessonContent, Quiz, QuizOutcome, QuizQuestion,
};
use uuid::Uuid;

use super::{parse_id, parse_timestamp};
use crate::http::RequestPipeline;

/// Catalogue listing filters, sent as query parameters.
#[derive(Debug, Clone, Default)]
pub struct CourseFilters {
    pub search: Option<String>,
    pub author_id: Option<Uuid>,
    pub published_only: bool,
}

impl CourseFilters {
    fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(search) = &self.search {
            query.push(("search", search.clone()));
        }
        if let Some(author_id) = &self.author_id {
            query.push(("authorId", author_id.to_string()));
        }
        if self.published_only {
            query.push(("published", "true".to_string()));
        }
        query
    }
}

/// Authoring payload for creating or updating a course.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDraft {
    pub title: String,
    pub description: String,
    pub published: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CourseSummaryDto {
    id: String,
    title: String,
    description: String,
    author_name: String,
    module_count: u32,
    published: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CourseDto {
    id: String,
    title: String,
    description: String,
    author_id: String,
    published: bool,
    #[serde(default)]
    modules: Vec<ModuleDto>,
    updated_at: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModuleDto {
    id: String,
    title: String,
    position: u32,
    #[serde(default)]
    lessons: Vec<LessonDto>,
}

/// Lesson wire shape: `kind` selects which optional fields are required.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LessonDto {
    id: String,
    title: String,
    position: u32,
    kind: String,
    body_markdown: Option<String>,
    url: Option<String>,
    duration_seconds: Option<u32>,
    quiz_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuizDto {
    id: String,
    title: String,
    pass_threshold_percent: u8,
    #[serde(default)]
    questions: Vec<QuestionDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuestionDto {
    id: String,
    prompt: String,
    #[serde(default)]
    options: Vec<OptionDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OptionDto {
    id: String,
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QuizSubmission {
    answers: Vec<QuizAnswer>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QuizAnswer {
    question_id: Uuid,
    option_id: Uuid,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuizOutcomeDto {
    quiz_id: String,
    score_percent: u8,
    passed: bool,
}

fn map_summary(dto: CourseSummaryDto) -> Result<CourseSummary, DomainError> {
    Ok(CourseSummary {
        id: parse_id(&dto.id, "course.id")?,
        title: dto.title,
        description: dto.description,
        author_name: dto.author_name,
        module_count: dto.module_count,
        published: dto.published,
    })
}

fn map_course(dto: CourseDto) -> Result<Course, DomainError> {
    Ok(Course {
        id: parse_id(&dto.id, "course.id")?,
        title: dto.title,
        description: dto.description,
        author_id: parse_id(&dto.author_id, "course.authorId")?,
        published: dto.published,
        modules: dto.modules.into_iter().map(map_module).collect::<Result<_, _>>()?,
        updated_at: parse_timestamp(&dto.updated_at, "course.updatedAt")?,
    })
}

fn map_module(dto: ModuleDto) -> Result<CourseModule, DomainError> {
    Ok(CourseModule {
        id: parse_id(&dto.id, "module.id")?,
        title: dto.title,
        position: dto.position,
        lessons: dto.lessons.into_iter().map(map_lesson).collect::<Result<_, _>>()?,
    })
}

fn map_lesson(dto: LessonDto) -> Result<Lesson, DomainError> {
    let content = match dto.kind.as_str() {
        "article" => LessonContent::Article {
            body_markdown: dto
                .body_markdown
                .ok_or_else(|| DomainError::mapping("article lesson missing bodyMarkdown"))?,
        },
        "video" => LessonContent::Video {
            url: dto.url.ok_or_else(|| DomainError::mapping("video lesson missing url"))?,
            duration_seconds: dto
                .duration_seconds
                .ok_or_else(|| DomainError::mapping("video lesson missing durationSeconds"))?,
        },
        "quiz" => LessonContent::Quiz {
            quiz_id: parse_id(
                dto.quiz_id
                    .as_deref()
                    .ok_or_else(|| DomainError::mapping("quiz lesson missing quizId"))?,
                "lesson.quizId",
            )?,
        },
        other => {
            return Err(DomainError::mapping(format!("unknown lesson kind '{other}'")));
        }
    };

    Ok(Lesson {
        id: parse_id(&dto.id, "lesson.id")?,
        title: dto.title,
        position: dto.position,
        content,
    })
}

fn map_quiz(dto: QuizDto) -> Result<Quiz, DomainError> {
    Ok(Quiz {
        id: parse_id(&dto.id, "quiz.id")?,
        title: dto.title,
        pass_threshold_percent: dto.pass_threshold_percent,
        questions: dto
            .questions
            .into_iter()
            .map(|q| {
                Ok(QuizQuestion {
                    id: parse_id(&q.id, "question.id")?,
                    prompt: q.prompt,
                    options: q
                        .options
                        .into_iter()
                        .map(|o| {
                            Ok(AnswerOption { id: parse_id(&o.id, "option.id")?, text: o.text })
                        })
                        .collect::<Result<_, DomainError>>()?,
                })
            })
            .collect::<Result<_, DomainError>>()?,
    })
}

fn map_outcome(dto: QuizOutcomeDto) -> Result<QuizOutcome, DomainError> {
    Ok(QuizOutcome {
        quiz_id: parse_id(&dto.quiz_id, "outcome.quizId")?,
        score_percent: dto.score_percent,
        passed: dto.passed,
    })
}

/// Courses feature façade. Read/write-through: no token side effects.
#[derive(Clone)]
pub struct CoursesApi {
    pipeline: Arc<RequestPipeline>,
}

impl CoursesApi {
    #[must_use]
    pub fn new(pipeline: Arc<RequestPipeline>) -> Self {
        Self { pipeline }
    }

    /// Browse the catalogue with optional filters.
    pub async fn list(&self, filters: &CourseFilters) -> ApiResult<Vec<CourseSummary>> {
        let query = filters.to_query();
        match self.pipeline.get_query::<Vec<CourseSummaryDto>>("/courses", &query).await {
            Ok(dtos) => dtos.into_iter().map(map_summary).collect::<Result<_, _>>().into(),
            Err(err) => ApiResult::Error(err),
        }
    }

    /// Fetch one course with its full module/lesson structure.
    pub async fn course(&self, id: Uuid) -> ApiResult<Course> {
        match self.pipeline.get::<CourseDto>(&format!("/courses/{id}")).await {
            Ok(dto) => map_course(dto).into(),
            Err(err) => ApiResult::Error(err),
        }
    }

    /// Create a course from an authoring draft.
    pub async fn create(&self, draft: &CourseDraft) -> ApiResult<Course> {
        match self.pipeline.post::<_, CourseDto>("/courses", draft).await {
            Ok(dto) => map_course(dto).into(),
            Err(err) => ApiResult::Error(err),
        }
    }

    /// Update a course's metadata.
    pub async fn update(&self, id: Uuid, draft: &CourseDraft) -> ApiResult<Course> {
        match self.pipeline.put::<_, CourseDto>(&format!("/courses/{id}"), draft).await {
            Ok(dto) => map_course(dto).into(),
            Err(err) => ApiResult::Error(err),
        }
    }

    /// Delete a course.
    pub async fn delete(&self, id: Uuid) -> ApiResult<()> {
        self.pipeline.delete::<()>(&format!("/courses/{id}")).await.into()
    }

    /// Fetch a quiz with its questions.
    pub async fn quiz(&self, quiz_id: Uuid) -> ApiResult<Quiz> {
        match self.pipeline.get::<QuizDto>(&format!("/quizzes/{quiz_id}")).await {
            Ok(dto) => map_quiz(dto).into(),
            Err(err) => ApiResult::Error(err),
        }
    }

    /// Submit quiz answers as (question, chosen option) pairs.
    pub async fn submit_quiz(
        &self,
        quiz_id: Uuid,
        answers: &[(Uuid, Uuid)],
    ) -> ApiResult<QuizOutcome> {
        let submission = QuizSubmission {
            answers: answers
                .iter()
                .map(|&(question_id, option_id)| QuizAnswer { question_id, option_id })
                .collect(),
        };
        match self
            .pipeline
            .post::<_, QuizOutcomeDto>(&format!("/quizzes/{quiz_id}/submissions"), &submission)
            .await
        {
            Ok(dto) => map_outcome(dto).into(),
            Err(err) => ApiResult::Error(err),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for the course mappers.
    use studia_domain::ErrorKind;

    use super::*;

    fn lesson_dto(kind: &str) -> LessonDto {
        LessonDto {
            id: "5b3e6a10-2222-4f4e-8a3e-0d1b2c3d4e5f".to_string(),
            title: "Intro".to_string(),
            position: 0,
            kind: kind.to_string(),
            body_markdown: None,
            url: None,
            duration_seconds: None,
            quiz_id: None,
        }
    }

    #[test]
    fn map_lesson_article() {
        let mut dto = lesson_dto("article");
        dto.body_markdown = Some("# Welcome".to_string());
        let lesson = map_lesson(dto).unwrap();
        assert!(matches!(lesson.content, LessonContent::Article { .. }));
    }

    #[test]
    fn map_lesson_video_missing_url_is_validation() {
        let mut dto = lesson_dto("video");
        dto.duration_seconds = Some(120);
        let err = map_lesson(dto).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert!(err.message.contains("url"));
    }

    #[test]
    fn map_lesson_unknown_kind_is_validation() {
        let err = map_lesson(lesson_dto("hologram")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert!(err.message.contains("hologram"));
    }

    #[test]
    fn filters_to_query_skips_unset_fields() {
        let empty = CourseFilters::default();
        assert!(empty.to_query().is_empty());

        let filters = CourseFilters {
            search: Some("rust".to_string()),
            author_id: None,
            published_only: true,
        };
        let query = filters.to_query();
        assert_eq!(query.len(), 2);
        assert!(query.contains(&("search", "rust".to_string())));
        assert!(query.contains(&("published", "true".to_string())));
    }

    #[test]
    fn map_course_propagates_nested_failures() {
        let dto = CourseDto {
            id: "5b3e6a10-2222-4f4e-8a3e-0d1b2c3d4e5f".to_string(),
            title: "Course".to_string(),
            description: String::new(),
            author_id: "not-an-id".to_string(),
            published: false,
            modules: Vec::new(),
            updated_at: "2025-06-01T08:00:00Z".to_string(),
        };
        let err = map_course(dto).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert!(err.message.contains("authorId"));
    }
}
