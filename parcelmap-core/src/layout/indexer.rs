use crate::config::{IndexingConfig, NumberingMode};
use crate::types::LayoutNode;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Outcome of one assignment pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexSummary {
    pub roots: usize,
    pub assigned: usize,
    /// Nodes no root reaches (parent chains that loop). Left without an index.
    pub unreachable: Vec<String>,
}

/// Arena view of the layout forest: nodes are addressed by their position in
/// the input slice, children are kept in input order.
struct Forest<'a> {
    ids: Vec<&'a str>,
    space_types: Vec<&'a str>,
    roots: Vec<usize>,
    children: Vec<Vec<usize>>,
}

impl<'a> Forest<'a> {
    fn new(nodes: &'a [LayoutNode]) -> Self {
        let ids: Vec<&str> = nodes.iter().map(|n| n.local_id.as_str()).collect();
        let space_types: Vec<&str> = nodes.iter().map(|n| n.space_type()).collect();

        // First occurrence wins when local ids repeat.
        let mut lookup: HashMap<&str, usize> = HashMap::with_capacity(nodes.len());
        for (position, id) in ids.iter().enumerate() {
            lookup.entry(*id).or_insert(position);
        }

        let mut roots = Vec::new();
        let mut children = vec![Vec::new(); nodes.len()];
        for (position, node) in nodes.iter().enumerate() {
            match node.parent_local_id.as_deref() {
                None => roots.push(position),
                Some(parent) => match lookup.get(parent) {
                    Some(&parent_position) => children[parent_position].push(position),
                    None => {
                        warn!(
                            node = %node.local_id,
                            parent = parent,
                            "unresolved parent, treating node as root"
                        );
                        roots.push(position);
                    }
                },
            }
        }

        Self {
            ids,
            space_types,
            roots,
            children,
        }
    }
}

/// Assigns `record.space_type_index` to every node of a layout forest.
#[derive(Debug, Clone)]
pub struct SpaceIndexAssigner {
    building_space_type: String,
    priorities: HashMap<String, usize>,
    default_priority: usize,
    numbering: NumberingMode,
}

impl Default for SpaceIndexAssigner {
    fn default() -> Self {
        Self::new(&IndexingConfig::default())
    }
}

impl SpaceIndexAssigner {
    pub fn new(config: &IndexingConfig) -> Self {
        let mut priorities = HashMap::with_capacity(config.space_type_priorities.len());
        for (rank, space_type) in config.space_type_priorities.iter().enumerate() {
            priorities.entry(space_type.clone()).or_insert(rank);
        }

        Self {
            building_space_type: config.building_space_type.clone(),
            default_priority: config.space_type_priorities.len(),
            priorities,
            numbering: config.numbering,
        }
    }

    pub fn priority(&self, space_type: &str) -> usize {
        self.priorities
            .get(space_type)
            .copied()
            .unwrap_or(self.default_priority)
    }

    pub fn assign(&self, nodes: &mut [LayoutNode]) -> IndexSummary {
        let (paths, root_count) = {
            let forest = Forest::new(nodes);
            let mut paths: Vec<Option<String>> = vec![None; forest.ids.len()];

            let mut roots = forest.roots.clone();
            roots.sort_by(|&a, &b| {
                let a_building = forest.space_types[a] == self.building_space_type;
                let b_building = forest.space_types[b] == self.building_space_type;
                b_building
                    .cmp(&a_building)
                    .then_with(|| forest.ids[a].cmp(forest.ids[b]))
            });

            // Explicit work stack: depth is bounded by the input, not the call stack.
            let mut pending: Vec<(usize, String)> = roots
                .iter()
                .enumerate()
                .map(|(rank, &root)| (root, (rank + 1).to_string()))
                .collect();
            while let Some((node, path)) = pending.pop() {
                pending.extend(self.child_paths(&forest, node, &path));
                paths[node] = Some(path);
            }
            (paths, roots.len())
        };

        let mut summary = IndexSummary {
            roots: root_count,
            ..IndexSummary::default()
        };
        for (node, path) in nodes.iter_mut().zip(paths) {
            if path.is_some() {
                summary.assigned += 1;
            } else {
                summary.unreachable.push(node.local_id.clone());
            }
            node.record.space_type_index = path;
        }

        if !summary.unreachable.is_empty() {
            warn!(
                nodes = ?summary.unreachable,
                "layout nodes unreachable from any root (cyclic parents)"
            );
        }
        debug!(roots = summary.roots, assigned = summary.assigned, "space type indices assigned");
        summary
    }

    /// Index paths for the direct children of `node`, in numbering order.
    fn child_paths(
        &self,
        forest: &Forest<'_>,
        node: usize,
        parent_path: &str,
    ) -> Vec<(usize, String)> {
        let children = &forest.children[node];
        if children.is_empty() {
            return Vec::new();
        }

        let mut ordered = children.clone();
        ordered.sort_by(|&a, &b| {
            self.priority(forest.space_types[a])
                .cmp(&self.priority(forest.space_types[b]))
                .then_with(|| forest.ids[a].cmp(forest.ids[b]))
        });

        // Groups in order of their first member, members in sorted order.
        let mut groups: Vec<(&str, Vec<usize>)> = Vec::new();
        for child in ordered {
            let space_type = forest.space_types[child];
            match groups.iter_mut().find(|(t, _)| *t == space_type) {
                Some((_, members)) => members.push(child),
                None => groups.push((space_type, vec![child])),
            }
        }

        let mut numbered = Vec::with_capacity(children.len());
        let mut sibling_rank = 0;
        for (_, members) in &groups {
            for (group_rank, &child) in members.iter().enumerate() {
                sibling_rank += 1;
                let segment = match self.numbering {
                    NumberingMode::PerSpaceType => group_rank + 1,
                    NumberingMode::SiblingRank => sibling_rank,
                };
                numbered.push((child, format!("{parent_path}.{segment}")));
            }
        }
        numbered
    }
}

/// Assign indices with the default priority table and numbering.
pub fn assign_indices(nodes: &mut [LayoutNode]) -> IndexSummary {
    SpaceIndexAssigner::default().assign(nodes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LayoutRecord;

    fn node(id: &str, parent: Option<&str>, space_type: &str) -> LayoutNode {
        LayoutNode::new(id, parent, LayoutRecord::new(space_type))
    }

    fn index_of<'a>(nodes: &'a [LayoutNode], id: &str) -> Option<&'a str> {
        nodes
            .iter()
            .find(|n| n.local_id == id)
            .and_then(|n| n.record.space_type_index.as_deref())
    }

    fn bedroom_scenario() -> Vec<LayoutNode> {
        vec![
            node("b1", None, "Building"),
            node("r1", Some("b1"), "Primary Bedroom"),
            node("r2", Some("b1"), "Bedroom"),
            node("r3", Some("b1"), "Full Bathroom"),
        ]
    }

    #[test]
    fn test_each_space_type_numbers_from_one() {
        let mut nodes = bedroom_scenario();
        let summary = assign_indices(&mut nodes);

        assert_eq!(index_of(&nodes, "b1"), Some("1"));
        assert_eq!(index_of(&nodes, "r1"), Some("1.1"));
        assert_eq!(index_of(&nodes, "r2"), Some("1.1"));
        assert_eq!(index_of(&nodes, "r3"), Some("1.1"));
        assert_eq!(summary.assigned, 4);
        assert_eq!(summary.roots, 1);
    }

    #[test]
    fn test_sibling_rank_follows_group_priority() {
        let config = IndexingConfig {
            numbering: NumberingMode::SiblingRank,
            ..IndexingConfig::default()
        };
        let mut nodes = bedroom_scenario();
        nodes.reverse();
        SpaceIndexAssigner::new(&config).assign(&mut nodes);

        assert_eq!(index_of(&nodes, "b1"), Some("1"));
        assert_eq!(index_of(&nodes, "r1"), Some("1.1"));
        assert_eq!(index_of(&nodes, "r2"), Some("1.2"));
        assert_eq!(index_of(&nodes, "r3"), Some("1.3"));
    }

    #[test]
    fn test_same_type_siblings_are_consecutive() {
        let mut nodes = vec![
            node("b1", None, "Building"),
            node("room_a", Some("b1"), "Bedroom"),
            node("bath", Some("b1"), "Full Bathroom"),
            node("room_c", Some("b1"), "Bedroom"),
        ];
        assign_indices(&mut nodes);

        assert_eq!(index_of(&nodes, "room_a"), Some("1.1"));
        assert_eq!(index_of(&nodes, "room_c"), Some("1.2"));
        assert_eq!(index_of(&nodes, "bath"), Some("1.1"));
    }

    #[test]
    fn test_segment_count_equals_depth() {
        let mut nodes = vec![
            node("grandchild", Some("child"), "Walk-in Closet"),
            node("child", Some("root"), "Primary Bedroom"),
            node("root", None, "Building"),
        ];
        assign_indices(&mut nodes);

        let index = index_of(&nodes, "grandchild").unwrap();
        assert_eq!(index.split('.').count(), 3);
        assert_eq!(index, "1.1.1");
    }

    #[test]
    fn test_buildings_sort_before_other_roots() {
        let mut nodes = vec![
            node("b2", None, "Building"),
            node("a0", None, "Detached Garage"),
            node("b1", None, "Building"),
        ];
        assign_indices(&mut nodes);

        assert_eq!(index_of(&nodes, "b1"), Some("1"));
        assert_eq!(index_of(&nodes, "b2"), Some("2"));
        assert_eq!(index_of(&nodes, "a0"), Some("3"));
    }

    #[test]
    fn test_unknown_space_types_sort_last() {
        let config = IndexingConfig {
            numbering: NumberingMode::SiblingRank,
            ..IndexingConfig::default()
        };
        let mut nodes = vec![
            node("b1", None, "Building"),
            node("a", Some("b1"), "Observatory"),
            node("z", Some("b1"), "Kitchen"),
        ];
        SpaceIndexAssigner::new(&config).assign(&mut nodes);

        assert_eq!(index_of(&nodes, "z"), Some("1.1"));
        assert_eq!(index_of(&nodes, "a"), Some("1.2"));
    }

    #[test]
    fn test_unresolved_parent_becomes_root() {
        let mut nodes = vec![
            node("b1", None, "Building"),
            node("orphan", Some("missing"), "Shed"),
        ];
        let summary = assign_indices(&mut nodes);

        assert_eq!(index_of(&nodes, "orphan"), Some("2"));
        assert_eq!(summary.roots, 2);
        assert!(summary.unreachable.is_empty());
    }

    #[test]
    fn test_cycles_are_left_unindexed() {
        let mut nodes = vec![
            node("b1", None, "Building"),
            node("x", Some("y"), "Bedroom"),
            node("y", Some("x"), "Bedroom"),
            node("self", Some("self"), "Bedroom"),
        ];
        let summary = assign_indices(&mut nodes);

        assert_eq!(index_of(&nodes, "b1"), Some("1"));
        assert_eq!(index_of(&nodes, "x"), None);
        assert_eq!(index_of(&nodes, "y"), None);
        assert_eq!(summary.unreachable, vec!["x", "y", "self"]);
    }

    #[test]
    fn test_previous_indices_are_reset() {
        let mut nodes = vec![node("x", Some("y"), "Bedroom"), node("y", Some("x"), "Bedroom")];
        nodes[0].record.space_type_index = Some("9.9".to_string());
        assign_indices(&mut nodes);
        assert_eq!(nodes[0].record.space_type_index, None);
    }

    #[test]
    fn test_assignment_is_deterministic() {
        let mut first = bedroom_scenario();
        let mut second = bedroom_scenario();
        second.reverse();
        assign_indices(&mut first);
        assign_indices(&mut second);

        for node in &first {
            assert_eq!(
                index_of(&first, &node.local_id),
                index_of(&second, &node.local_id)
            );
        }
    }

    #[test]
    fn test_deep_chain_is_indexed_without_recursion() {
        let depth = 10_000;
        let mut nodes = vec![node("n0", None, "Building")];
        for level in 1..depth {
            let parent = format!("n{}", level - 1);
            nodes.push(node(&format!("n{level}"), Some(&parent), "Bedroom"));
        }
        let summary = assign_indices(&mut nodes);

        assert_eq!(summary.assigned, depth);
        assert!(summary.unreachable.is_empty());
        assert_eq!(index_of(&nodes, "n1"), Some("1.1"));
        let deepest = index_of(&nodes, &format!("n{}", depth - 1)).unwrap();
        assert_eq!(deepest.split('.').count(), depth);
        assert!(deepest.split('.').all(|segment| segment == "1"));
    }
}
