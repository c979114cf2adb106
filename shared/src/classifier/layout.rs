//! Structural checks on a stored forest
//!
//! aprender walks its trees without bounds checks: a missing root, a split on
//! a column the row does not have, or a leaf outside the vote table would
//! panic in the middle of a request. The forest is read back through its
//! serialized form and every tree is walked once, before serving starts.

use aprender::tree::{RandomForestClassifier, TreeNode};
use serde::Deserialize;

use crate::error::{ArtifactError, ForestDefect};

/// serde_json refuses documents nested deeper than 128 levels and each tree
/// level costs two, so deeper trees could be saved but never loaded again.
pub const MAX_STORED_DEPTH: usize = 56;

#[derive(Debug, Deserialize)]
struct StoredForest {
    #[serde(default)]
    trees: Vec<StoredTree>,
    #[serde(default)]
    y_train: Option<Vec<usize>>,
}

#[derive(Debug, Deserialize)]
struct StoredTree {
    #[serde(default)]
    tree: Option<TreeNode>,
    #[serde(default)]
    n_features: Option<usize>,
}

/// Shape of a forest that passed the structural walk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForestLayout {
    /// Classes the forest votes over: one past its largest training label
    pub n_classes: usize,
    /// Depth of each tree, in forest order; a lone leaf has depth 0
    pub depths: Vec<usize>,
}

impl ForestLayout {
    /// Walk every tree of `forest`, which must split on rows of `n_features`
    pub fn inspect(
        forest: &RandomForestClassifier,
        n_features: usize,
    ) -> Result<Self, ArtifactError> {
        let stored: StoredForest = serde_json::from_value(serde_json::to_value(forest)?)?;

        if stored.trees.is_empty() {
            return Err(ForestDefect::NoTrees.into());
        }
        let n_classes = stored
            .y_train
            .as_ref()
            .and_then(|labels| labels.iter().max())
            .map(|&max| max + 1)
            .ok_or(ForestDefect::MissingLabels)?;

        let depths = stored
            .trees
            .iter()
            .enumerate()
            .map(|(idx, stored_tree)| check_tree(idx, stored_tree, n_features, n_classes))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { n_classes, depths })
    }

    pub fn n_trees(&self) -> usize {
        self.depths.len()
    }

    pub fn max_depth(&self) -> usize {
        self.depths.iter().copied().max().unwrap_or(0)
    }
}

fn check_tree(
    tree: usize,
    stored: &StoredTree,
    n_features: usize,
    n_classes: usize,
) -> Result<usize, ForestDefect> {
    if let Some(found) = stored.n_features.filter(|&found| found != n_features) {
        return Err(ForestDefect::TreeFeatureCount {
            tree,
            found,
            expected: n_features,
        });
    }
    let root = stored.tree.as_ref().ok_or(ForestDefect::EmptyTree { tree })?;

    let mut deepest = 0;
    let mut pending = vec![(root, 0usize)];
    while let Some((node, depth)) = pending.pop() {
        deepest = deepest.max(depth);
        match node {
            TreeNode::Leaf(leaf) => {
                if leaf.class_label >= n_classes {
                    return Err(ForestDefect::ClassOutOfRange {
                        tree,
                        class: leaf.class_label,
                        n_classes,
                    });
                }
            }
            TreeNode::Node(split) => {
                if split.feature_idx >= n_features {
                    return Err(ForestDefect::FeatureOutOfRange {
                        tree,
                        feature: split.feature_idx,
                        n_features,
                    });
                }
                pending.push((split.left.as_ref(), depth + 1));
                pending.push((split.right.as_ref(), depth + 1));
            }
        }
    }

    if deepest > MAX_STORED_DEPTH {
        return Err(ForestDefect::TooDeep {
            tree,
            depth: deepest,
            max: MAX_STORED_DEPTH,
        });
    }
    Ok(deepest)
}
