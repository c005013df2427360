//! Random forest inference over exported flat-array trees
//!
//! The classifier artifact stores each fitted tree the way the training
//! pipeline exports it: parallel `feature`/`threshold`/`left`/`right`
//! arrays plus a per-node class count matrix. Nodes are numbered in
//! depth-first preorder, so child indices always exceed the parent's and a
//! well-formed walk strictly advances. A leaf is marked by `left == -1`;
//! leaf `feature` entries carry the exporter's `-2` sentinel and are never
//! read.
//!
//! Prediction follows the usual forest recipe: route the row to one leaf
//! per tree, normalize that leaf's class counts to a distribution, and
//! average the distributions across trees. The predicted class is the
//! argmax of the average, first maximum winning ties.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Sentinel for "no child" in the exported child arrays.
const NO_CHILD: i32 = -1;

/// One fitted decision tree in exported flat-array form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tree {
    feature: Vec<i32>,
    threshold: Vec<f64>,
    left: Vec<i32>,
    right: Vec<i32>,
    value: Vec<Vec<f64>>,
}

impl Tree {
    pub fn new(
        feature: Vec<i32>,
        threshold: Vec<f64>,
        left: Vec<i32>,
        right: Vec<i32>,
        value: Vec<Vec<f64>>,
    ) -> Self {
        Self {
            feature,
            threshold,
            left,
            right,
            value,
        }
    }

    pub fn node_count(&self) -> usize {
        self.left.len()
    }

    /// Structural checks for one tree against the forest's declared shape.
    fn validate(&self, tree_idx: usize, n_features: usize, n_classes: usize) -> Result<()> {
        let nodes = self.left.len();
        if nodes == 0 {
            return Err(Error::ModelInvocation(format!(
                "tree {} has no nodes",
                tree_idx
            )));
        }
        if self.feature.len() != nodes
            || self.threshold.len() != nodes
            || self.right.len() != nodes
            || self.value.len() != nodes
        {
            return Err(Error::ModelInvocation(format!(
                "tree {} arrays disagree on node count",
                tree_idx
            )));
        }
        for node in 0..nodes {
            let (left, right) = (self.left[node], self.right[node]);
            let is_leaf = left == NO_CHILD;
            if is_leaf {
                if right != NO_CHILD {
                    return Err(Error::ModelInvocation(format!(
                        "tree {} node {} has one child",
                        tree_idx, node
                    )));
                }
                let total: f64 = self.value[node].iter().sum();
                if !(total > 0.0) || self.value[node].iter().any(|c| !c.is_finite() || *c < 0.0) {
                    return Err(Error::ModelInvocation(format!(
                        "tree {} leaf {} has unusable class counts",
                        tree_idx, node
                    )));
                }
            } else {
                // Preorder export: children sit strictly after the parent.
                for child in [left, right] {
                    if child <= node as i32 || child as usize >= nodes {
                        return Err(Error::ModelInvocation(format!(
                            "tree {} node {} child index {} out of order",
                            tree_idx, node, child
                        )));
                    }
                }
                let feature = self.feature[node];
                if feature < 0 || feature as usize >= n_features {
                    return Err(Error::ModelInvocation(format!(
                        "tree {} node {} splits on feature {} of {}",
                        tree_idx, node, feature, n_features
                    )));
                }
                if !self.threshold[node].is_finite() {
                    return Err(Error::ModelInvocation(format!(
                        "tree {} node {} has non-finite threshold",
                        tree_idx, node
                    )));
                }
            }
            if self.value[node].len() != n_classes {
                return Err(Error::ModelInvocation(format!(
                    "tree {} node {} has {} class counts, expected {}",
                    tree_idx,
                    node,
                    self.value[node].len(),
                    n_classes
                )));
            }
        }
        Ok(())
    }

    /// Route one row to a leaf and return the leaf's node index.
    ///
    /// Every array access is guarded, so a corrupt tree that never went
    /// through `validate` errors instead of panicking.
    fn route(&self, features: &[f64]) -> Result<usize> {
        let malformed = |node: usize| {
            Error::ModelInvocation(format!("tree walk reached malformed node {}", node))
        };
        let mut node = 0usize;
        loop {
            let left = *self.left.get(node).ok_or_else(|| malformed(node))?;
            if left == NO_CHILD {
                return Ok(node);
            }
            let feature = *self.feature.get(node).ok_or_else(|| malformed(node))?;
            let threshold = *self.threshold.get(node).ok_or_else(|| malformed(node))?;
            let right = *self.right.get(node).ok_or_else(|| malformed(node))?;
            let value = usize::try_from(feature)
                .ok()
                .and_then(|idx| features.get(idx))
                .ok_or_else(|| {
                    Error::ModelInvocation(format!(
                        "tree split references feature {} outside the row",
                        feature
                    ))
                })?;
            let next = if *value <= threshold { left } else { right };
            if next <= node as i32 {
                return Err(Error::ModelInvocation(format!(
                    "tree walk does not advance at node {}",
                    node
                )));
            }
            node = next as usize;
        }
    }

    /// Class distribution at the leaf this row lands in.
    fn distribution(&self, features: &[f64], n_classes: usize) -> Result<Vec<f64>> {
        let leaf = self.route(features)?;
        let counts = self.value.get(leaf).ok_or_else(|| {
            Error::ModelInvocation(format!("leaf {} has no class counts", leaf))
        })?;
        let total: f64 = counts.iter().sum();
        if !(total > 0.0) {
            return Err(Error::ModelInvocation(format!(
                "leaf {} has zero total class count",
                leaf
            )));
        }
        let mut dist = vec![0.0; n_classes];
        for (slot, count) in dist.iter_mut().zip(counts.iter()) {
            *slot = count / total;
        }
        Ok(dist)
    }
}

/// A fitted random forest classifier plus the metadata it was fitted under.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    /// Schema version the forest was fitted under.
    pub schema_version: u32,
    columns: Vec<String>,
    n_classes: usize,
    trees: Vec<Tree>,
}

impl RandomForest {
    pub fn new(
        schema_version: u32,
        columns: Vec<String>,
        n_classes: usize,
        trees: Vec<Tree>,
    ) -> Self {
        Self {
            schema_version,
            columns,
            n_classes,
            trees,
        }
    }

    /// The columns the forest was fitted on, in input order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn n_features(&self) -> usize {
        self.columns.len()
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    /// Structural checks on a freshly loaded forest.
    pub fn validate(&self) -> Result<()> {
        if self.trees.is_empty() {
            return Err(Error::ModelInvocation("forest has no trees".to_string()));
        }
        if self.n_classes < 2 {
            return Err(Error::ModelInvocation(format!(
                "forest declares {} classes",
                self.n_classes
            )));
        }
        if self.columns.is_empty() {
            return Err(Error::ModelInvocation("forest has no columns".to_string()));
        }
        for (idx, tree) in self.trees.iter().enumerate() {
            tree.validate(idx, self.columns.len(), self.n_classes)?;
        }
        Ok(())
    }

    /// Averaged class distribution for one feature row.
    pub fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>> {
        if features.len() != self.columns.len() {
            return Err(Error::FeatureShape(format!(
                "row has {} features, forest was fitted on {}",
                features.len(),
                self.columns.len()
            )));
        }
        if self.trees.is_empty() {
            return Err(Error::ModelInvocation("forest has no trees".to_string()));
        }
        let mut averaged = vec![0.0; self.n_classes];
        for tree in &self.trees {
            let dist = tree.distribution(features, self.n_classes)?;
            for (acc, p) in averaged.iter_mut().zip(dist.iter()) {
                *acc += p;
            }
        }
        let count = self.trees.len() as f64;
        for p in averaged.iter_mut() {
            *p /= count;
        }
        Ok(averaged)
    }

    /// Predicted class code plus the averaged distribution it came from.
    ///
    /// Ties resolve to the lowest class code.
    pub fn predict(&self, features: &[f64]) -> Result<(usize, Vec<f64>)> {
        let probs = self.predict_proba(features)?;
        let mut best = 0usize;
        for (code, p) in probs.iter().enumerate() {
            if *p > probs[best] {
                best = code;
            }
        }
        Ok((best, probs))
    }
}
