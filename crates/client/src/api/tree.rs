//! Technology-tree façade.
//!
//! The tree is a dependency forest the learner unlocks top-down. This layer
//! only moves the structure over the wire; drawing and virtualization are UI
//! concerns.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use studia_domain::{ApiResult, DomainError, NodeStatus, TechTree, TreeNode};
use uuid::Uuid;

use super::parse_id;
use crate::http::RequestPipeline;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TreeDto {
    course_id: String,
    #[serde(default)]
    roots: Vec<TreeNodeDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TreeNodeDto {
    id: String,
    title: String,
    status: String,
    lesson_id: Option<String>,
    #[serde(default)]
    children: Vec<TreeNodeDto>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SaveTreeRequest<'a> {
    roots: Vec<TreeNodeWrite<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TreeNodeWrite<'a> {
    id: Uuid,
    title: &'a str,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    lesson_id: Option<Uuid>,
    children: Vec<TreeNodeWrite<'a>>,
}

fn status_name(status: NodeStatus) -> &'static str {
    match status {
        NodeStatus::Locked => "locked",
        NodeStatus::Available => "available",
        NodeStatus::Completed => "completed",
    }
}

fn node_to_write(node: &TreeNode) -> TreeNodeWrite<'_> {
    TreeNodeWrite {
        id: node.id,
        title: &node.title,
        status: status_name(node.status),
        lesson_id: node.lesson_id,
        children: node.children.iter().map(node_to_write).collect(),
    }
}

fn map_status(raw: &str) -> Result<NodeStatus, DomainError> {
    match raw {
        "locked" => Ok(NodeStatus::Locked),
        "available" => Ok(NodeStatus::Available),
        "completed" => Ok(NodeStatus::Completed),
        other => Err(DomainError::mapping(format!("unknown node status '{other}'"))),
    }
}

fn map_node(dto: TreeNodeDto) -> Result<TreeNode, DomainError> {
    Ok(TreeNode {
        id: parse_id(&dto.id, "node.id")?,
        title: dto.title,
        status: map_status(&dto.status)?,
        lesson_id: dto
            .lesson_id
            .as_deref()
            .map(|raw| parse_id(raw, "node.lessonId"))
            .transpose()?,
        children: dto.children.into_iter().map(map_node).collect::<Result<_, _>>()?,
    })
}

fn map_tree(dto: TreeDto) -> Result<TechTree, DomainError> {
    Ok(TechTree {
        course_id: parse_id(&dto.course_id, "tree.courseId")?,
        roots: dto.roots.into_iter().map(map_node).collect::<Result<_, _>>()?,
    })
}

/// Technology-tree feature façade. Read/write-through: no token side
/// effects.
#[derive(Clone)]
pub struct TreeApi {
    pipeline: Arc<RequestPipeline>,
}

impl TreeApi {
    #[must_use]
    pub fn new(pipeline: Arc<RequestPipeline>) -> Self {
        Self { pipeline }
    }

    /// Fetch the technology tree of a course.
    pub async fn tree(&self, course_id: Uuid) -> ApiResult<TechTree> {
        match self.pipeline.get::<TreeDto>(&format!("/courses/{course_id}/tree")).await {
            Ok(dto) => map_tree(dto).into(),
            Err(err) => ApiResult::Error(err),
        }
    }

    /// Persist an authored tree structure.
    pub async fn save(&self, tree: &TechTree) -> ApiResult<()> {
        let request = SaveTreeRequest { roots: tree.roots.iter().map(node_to_write).collect() };
        self.pipeline
            .put::<_, ()>(&format!("/courses/{}/tree", tree.course_id), &request)
            .await
            .into()
    }
}
