//! Resolved structure tree

use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::entities::part::{PartIteration, PartIterationKey, PartMaster};

/// One resolved node: a part reached through one path, with its iteration
#[derive(Debug, Clone, Serialize)]
pub struct Component {
    #[serde(rename = "part", serialize_with = "serialize_number")]
    pub part_master: Arc<PartMaster>,

    #[serde(rename = "iteration")]
    pub retained_iteration: PartIterationKey,

    /// Key of the path that reached this node; empty for the root
    #[serde(skip_serializing_if = "String::is_empty")]
    pub path: String,

    /// Amount of the link followed to this node; 1 for the root
    pub amount: f64,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Component>,
}

fn serialize_number<S: Serializer>(master: &Arc<PartMaster>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&master.number)
}

impl Component {
    pub fn number(&self) -> &str {
        &self.part_master.number
    }

    pub fn version(&self) -> &str {
        &self.retained_iteration.version
    }

    /// The retained iteration's content
    pub fn iteration(&self) -> Option<&PartIteration> {
        self.part_master
            .iteration(&self.retained_iteration)
            .map(|found| found.iteration)
    }

    /// Number of nodes in this subtree, this one included
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        self.walk(&mut |_, _| count += 1);
        count
    }

    /// Visit every node depth-first with its depth below this one
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Component, usize)) {
        let mut stack = vec![(self, 0)];
        while let Some((node, depth)) = stack.pop() {
            visit(node, depth);
            stack.extend(node.children.iter().rev().map(|child| (child, depth + 1)));
        }
    }

    /// Total quantity of every part used below this node
    ///
    /// Amounts multiply down each path and add up across paths.
    pub fn flatten(&self) -> BTreeMap<String, f64> {
        let mut totals = BTreeMap::new();
        let mut stack = vec![(self, 1.0)];
        while let Some((node, multiplier)) = stack.pop() {
            for child in &node.children {
                let quantity = multiplier * child.amount;
                *totals.entry(child.number().to_string()).or_insert(0.0) += quantity;
                stack.push((child, quantity));
            }
        }
        totals
    }
}

impl Drop for Component {
    // Deep trees are torn down without recursing once per level
    fn drop(&mut self) {
        let mut stack = std::mem::take(&mut self.children);
        while let Some(mut node) = stack.pop() {
            stack.append(&mut node.children);
        }
    }
}
