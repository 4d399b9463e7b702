use crate::types::*;
use anyhow::{Context, Result};

impl ParcelLayoutDocument {
    pub fn to_json_string(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }

    pub fn save_to_json(&self, path: &str, pretty: bool) -> Result<()> {
        let json = self.to_json_string(pretty)?;
        std::fs::write(path, json).with_context(|| format!("writing {path}"))?;
        Ok(())
    }

    /// Layout nodes ordered by their space type index, unindexed nodes last.
    pub fn sorted_layouts(&self) -> Vec<&LayoutNode> {
        let mut nodes: Vec<&LayoutNode> = self.layouts.iter().collect();
        nodes.sort_by(|a, b| {
            match (
                a.record.space_type_index.as_deref(),
                b.record.space_type_index.as_deref(),
            ) {
                (None, None) => a.local_id.cmp(&b.local_id),
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (Some(_), None) => std::cmp::Ordering::Less,
                (Some(a_index), Some(b_index)) => index_segments(a_index)
                    .cmp(&index_segments(b_index))
                    .then_with(|| a.space_type().cmp(b.space_type()))
                    .then_with(|| a.local_id.cmp(&b.local_id)),
            }
        });
        nodes
    }
}

/// Numeric segments of a dotted index, so "1.10" sorts after "1.9".
fn index_segments(index: &str) -> Vec<u32> {
    index
        .split('.')
        .map(|segment| segment.parse().unwrap_or(u32::MAX))
        .collect()
}
