//! Depth-first traversal of archival trees.
//!
//! [`traverse`] yields nodes in pre-order: a node comes before its
//! descendants, siblings keep their stored order, and each subtree is
//! finished before the next sibling starts. Children are only loaded when
//! the iterator moves past their parent, so a consumer that stops early
//! never triggers further loads.
//!
//! There is no cycle detection. Walking a cyclic graph without a depth
//! bound does not terminate.

use std::vec;

use tracing::debug;

use crate::node::{ArchivalNode, is_resource};

/// Children of `node`, read through the tree for resources.
pub fn child_nodes<N: ArchivalNode>(node: &N) -> Result<Vec<N>, N::Error> {
    if is_resource(node) {
        node.tree()?.children()
    } else {
        node.children()
    }
}

/// Starts a depth-first walk at `top`.
///
/// `top` is depth 0. Children of a node at depth `d` are visited only when
/// `max_depth` is `None` or `d < max_depth`. `include_top` controls whether
/// `top` itself is yielded; descendants are always yielded.
///
/// Each call walks from scratch, so calling it again with the same root
/// produces the same sequence.
pub fn traverse<N>(top: N, include_top: bool, max_depth: Option<usize>) -> Traversal<N>
where
    N: ArchivalNode + Clone,
{
    let mut traversal = Traversal {
        stack: Vec::new(),
        pending: None,
        max_depth,
    };

    if include_top {
        traversal.stack.push((0, vec![top].into_iter()));
    } else {
        traversal.pending = Some((top, 0));
    }

    traversal
}

/// Lazy pre-order iterator returned by [`traverse`].
///
/// When a node's children cannot be loaded the error is yielded in place of
/// them and the walk moves on to the node's next sibling. A child that fails
/// to [`load`](ArchivalNode::load) is replaced by its error the same way.
pub struct Traversal<N: ArchivalNode> {
    /// Sibling lists still being walked, with the depth of their members.
    stack: Vec<(usize, vec::IntoIter<N>)>,
    /// Last yielded node, whose children are loaded on the next call.
    pending: Option<(N, usize)>,
    max_depth: Option<usize>,
}

impl<N: ArchivalNode> Traversal<N> {
    fn descends(&self, depth: usize) -> bool {
        self.max_depth.is_none_or(|max| depth < max)
    }
}

impl<N> Iterator for Traversal<N>
where
    N: ArchivalNode + Clone,
{
    type Item = Result<N, N::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some((node, depth)) = self.pending.take()
            && self.descends(depth)
        {
            debug!("Loading children of {} at depth {}", node.uri(), depth);
            match child_nodes(&node) {
                Ok(children) => self.stack.push((depth + 1, children.into_iter())),
                Err(e) => return Some(Err(e)),
            }
        }

        while let Some((depth, siblings)) = self.stack.last_mut() {
            if let Some(node) = siblings.next() {
                let depth = *depth;
                return Some(node.load().inspect(|node| {
                    self.pending = Some((node.clone(), depth));
                }));
            }
            self.stack.pop();
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::JsonNode;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::{Value, json};
    use std::cell::{Cell, RefCell};
    use std::convert::Infallible;

    /// R -> [C1 -> [G1], C2]
    fn sample_tree() -> JsonNode {
        JsonNode::new(json!({
            "uri": "R",
            "jsonmodel_type": "archival_object",
            "children": [
                {
                    "uri": "C1",
                    "jsonmodel_type": "archival_object",
                    "children": [{ "uri": "G1", "jsonmodel_type": "archival_object" }]
                },
                { "uri": "C2", "jsonmodel_type": "archival_object" }
            ]
        }))
    }

    fn uris(traversal: Traversal<JsonNode>) -> Vec<String> {
        traversal
            .map(|node| node.unwrap().uri().to_string())
            .collect()
    }

    #[rstest]
    #[case::unbounded(None, vec!["R", "C1", "G1", "C2"])]
    #[case::depth_zero(Some(0), vec!["R"])]
    #[case::depth_one(Some(1), vec!["R", "C1", "C2"])]
    #[case::depth_two(Some(2), vec!["R", "C1", "G1", "C2"])]
    #[case::depth_beyond_tree(Some(10), vec!["R", "C1", "G1", "C2"])]
    fn test_pre_order_with_depth_bound(
        #[case] max_depth: Option<usize>,
        #[case] expected: Vec<&str>,
    ) {
        assert_eq!(uris(traverse(sample_tree(), true, max_depth)), expected);
    }

    #[test]
    fn test_exclude_top_still_yields_descendants() {
        assert_eq!(
            uris(traverse(sample_tree(), false, None)),
            vec!["C1", "G1", "C2"]
        );
    }

    #[test]
    fn test_exclude_top_with_depth_zero_is_empty() {
        assert!(uris(traverse(sample_tree(), false, Some(0))).is_empty());
    }

    #[test]
    fn test_resource_children_come_from_tree() {
        let resource = JsonNode::new(json!({
            "uri": "R",
            "jsonmodel_type": "resource",
            "children": [],
            "tree": { "children": [{ "uri": "X", "jsonmodel_type": "archival_object" }] }
        }));

        assert_eq!(uris(traverse(resource, true, None)), vec!["R", "X"]);
    }

    #[test]
    fn test_restartable() {
        let root = sample_tree();
        let first = uris(traverse(root.clone(), true, None));
        let second = uris(traverse(root, true, None));
        assert_eq!(first, second);
    }

    #[test]
    fn test_children_error_skips_subtree_only() {
        let root = JsonNode::new(json!({
            "uri": "R",
            "children": [
                { "uri": "BAD", "jsonmodel_type": "resource" },
                { "uri": "C2" }
            ]
        }));

        let items: Vec<Result<String, String>> = traverse(root, true, None)
            .map(|item| item.map(|n| n.uri().to_string()).map_err(|e| e.to_string()))
            .collect();

        assert_eq!(
            items,
            vec![
                Ok("R".to_string()),
                Ok("BAD".to_string()),
                Err("resource BAD has no tree".to_string()),
                Ok("C2".to_string()),
            ]
        );
    }

    /// Counts child loads to check laziness.
    #[derive(Clone)]
    struct Counting<'a> {
        value: Value,
        loads: &'a Cell<usize>,
    }

    impl ArchivalNode for Counting<'_> {
        type Error = Infallible;

        fn json(&self) -> &Value {
            &self.value
        }

        fn children(&self) -> Result<Vec<Self>, Self::Error> {
            self.loads.set(self.loads.get() + 1);
            let uri = self.uri().to_string();
            Ok((0..2)
                .map(|i| Counting {
                    value: json!({ "uri": format!("{uri}.{i}") }),
                    loads: self.loads,
                })
                .collect())
        }

        fn tree(&self) -> Result<Self, Self::Error> {
            Ok(self.clone())
        }

        fn dereference(&self, _uri: &str) -> Result<Value, Self::Error> {
            Ok(Value::Null)
        }
    }

    #[test]
    fn test_children_are_loaded_on_demand() {
        let loads = Cell::new(0);
        let root = Counting {
            value: json!({ "uri": "0" }),
            loads: &loads,
        };

        let mut walk = traverse(root, true, None);
        assert_eq!(loads.get(), 0);

        assert_eq!(walk.next().unwrap().unwrap().uri(), "0");
        assert_eq!(loads.get(), 0);

        assert_eq!(walk.next().unwrap().unwrap().uri(), "0.0");
        assert_eq!(loads.get(), 1);

        // The generated tree is infinite; a bound makes it finite.
        let bounded: Vec<String> = traverse(walk_root(&loads), true, Some(2))
            .map(|n| n.unwrap().uri().to_string())
            .collect();
        assert_eq!(bounded, vec!["0", "0.0", "0.0.0", "0.0.1", "0.1", "0.1.0", "0.1.1"]);
    }

    /// Children are stubs holding only a `uri` until loaded.
    #[derive(Clone)]
    struct Lazy<'a> {
        value: Value,
        fetched: &'a RefCell<Vec<String>>,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("cannot load {0}")]
    struct LoadError(String);

    impl ArchivalNode for Lazy<'_> {
        type Error = LoadError;

        fn json(&self) -> &Value {
            &self.value
        }

        fn children(&self) -> Result<Vec<Self>, Self::Error> {
            let uri = self.uri().to_string();
            Ok((0..3)
                .map(|i| Lazy {
                    value: json!({ "uri": format!("{uri}.{i}"), "stub": true }),
                    fetched: self.fetched,
                })
                .collect())
        }

        fn tree(&self) -> Result<Self, Self::Error> {
            Ok(self.clone())
        }

        fn dereference(&self, _uri: &str) -> Result<Value, Self::Error> {
            Ok(Value::Null)
        }

        fn load(self) -> Result<Self, Self::Error> {
            let uri = self.uri().to_string();
            self.fetched.borrow_mut().push(uri.clone());
            if uri.ends_with(".1") {
                return Err(LoadError(uri));
            }
            Ok(Lazy {
                value: json!({ "uri": uri }),
                fetched: self.fetched,
            })
        }
    }

    #[test]
    fn test_siblings_are_loaded_when_reached() {
        let fetched = RefCell::new(Vec::new());
        let root = Lazy {
            value: json!({ "uri": "0" }),
            fetched: &fetched,
        };

        let mut walk = traverse(root, true, Some(1));
        walk.next().unwrap().unwrap();
        let first = walk.next().unwrap().unwrap();

        assert_eq!(first.json(), &json!({ "uri": "0.0" }));
        assert_eq!(*fetched.borrow(), vec!["0", "0.0"]);
    }

    #[test]
    fn test_load_error_is_yielded_in_place() {
        let fetched = RefCell::new(Vec::new());
        let root = Lazy {
            value: json!({ "uri": "0" }),
            fetched: &fetched,
        };

        let items: Vec<Result<String, String>> = traverse(root, false, Some(1))
            .map(|item| item.map(|n| n.uri().to_string()).map_err(|e| e.to_string()))
            .collect();

        assert_eq!(
            items,
            vec![
                Ok("0.0".to_string()),
                Err("cannot load 0.1".to_string()),
                Ok("0.2".to_string()),
            ]
        );
    }

    fn walk_root(loads: &Cell<usize>) -> Counting<'_> {
        Counting {
            value: json!({ "uri": "0" }),
            loads,
        }
    }
}
