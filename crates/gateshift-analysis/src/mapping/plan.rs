//! Concrete before/after field substitutions for one file.

use serde::{Deserialize, Serialize};

use gateshift_core::errors::MappingError;

/// Rename of one field occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSubstitution {
    pub line: u32,
    pub byte_offset: usize,
    pub source_field: String,
    pub target_field: String,
    /// The full source line before the change.
    pub before: String,
    /// The same line with this occurrence renamed.
    pub after: String,
}

impl FieldSubstitution {
    pub fn byte_end(&self) -> usize {
        self.byte_offset + self.source_field.len()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationPlan {
    pub file_path: String,
    /// Mapping generation the plan was resolved against.
    pub mapping_generation: u64,
    /// Sorted by offset, non-overlapping.
    pub substitutions: Vec<FieldSubstitution>,
    /// Fields with no mapping, in order of first appearance.
    pub unmapped_fields: Vec<String>,
}

impl MigrationPlan {
    pub fn is_empty(&self) -> bool {
        self.substitutions.is_empty()
    }

    /// Apply every substitution to `source`, back to front.
    ///
    /// Fails without partial output if `source` no longer holds the expected
    /// field text at any offset. Overlapping substitutions are skipped.
    pub fn apply(&self, source: &str) -> Result<String, MappingError> {
        let mut ordered: Vec<&FieldSubstitution> = self.substitutions.iter().collect();
        ordered.sort_by(|a, b| b.byte_offset.cmp(&a.byte_offset));

        let mut out = source.to_string();
        let mut floor = usize::MAX;
        for sub in ordered {
            let end = sub.byte_end();
            if end > floor {
                continue;
            }
            let found = source.get(sub.byte_offset..end).ok_or(MappingError::OutOfBounds {
                offset: sub.byte_offset,
                len: source.len(),
            })?;
            if found != sub.source_field {
                return Err(MappingError::SourceMismatch {
                    offset: sub.byte_offset,
                    expected: sub.source_field.clone(),
                    found: found.to_string(),
                });
            }
            out.replace_range(sub.byte_offset..end, &sub.target_field);
            floor = sub.byte_offset;
        }
        Ok(out)
    }
}
