use crate::api::{RelatedSense, SenseRecord};
use serde::{Deserialize, Serialize};

pub const ROOT_NAME: &str = "Word Senses";

/// Node of the relation tree: synthetic root, one node per sense, then
/// hypernym and hyponym leaves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationNode {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
    pub children: Vec<RelationNode>,
}

impl RelationNode {
    fn leaf(related: &RelatedSense) -> Self {
        Self {
            name: related.sense.clone(),
            definition: Some(related.definition.clone()),
            children: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of edges on the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        self.children
            .iter()
            .map(|child| child.depth() + 1)
            .max()
            .unwrap_or(0)
    }
}

/// Builds the two-level relation tree.
///
/// Related senses become leaves even when they carry relations of their own;
/// the tree is never expanded past one level below each sense.
pub fn build_tree(senses: &[SenseRecord]) -> RelationNode {
    let children = senses
        .iter()
        .map(|record| RelationNode {
            name: record.sense.clone(),
            definition: Some(record.definition.clone()),
            children: record
                .hypernyms
                .iter()
                .chain(record.hyponyms.iter())
                .map(RelationNode::leaf)
                .collect(),
        })
        .collect();

    RelationNode {
        name: ROOT_NAME.to_string(),
        definition: None,
        children,
    }
}
