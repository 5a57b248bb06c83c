//! Non-fatal review notes collected during ingestion
//!
//! Notes never stop a run. The caller owns the [`Diagnostics`] list, both
//! ingestion passes append to it, and the renderer prints it at the end.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    /// A geometry item was exported with type `None`
    NoneType {
        plan: String,
        type_name: String,
        count: String,
        name: String,
        description: String,
    },
    /// Same identity key and same raw name seen twice in the geometry file
    DuplicateEntry { key: String, raw_name: String },
    /// HSS beam or column that only exists in the cost report
    CostOnlyHss { name: String, type_name: String },
    /// Cost row naming a material the geometry file never produced
    CostOnlyMaterial { name: String, type_name: String },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::NoneType {
                plan,
                type_name,
                count,
                name,
                description,
            } => write!(
                f,
                "WARN: Type of 'None' encountered: {} | {} | {} | {} | {}",
                plan, type_name, count, name, description
            ),
            Notice::DuplicateEntry { key, raw_name } => write!(
                f,
                "WARN: Duplicate entry of {} in Takeoff Geometry Detail. Unedited Name is {}",
                key, raw_name
            ),
            Notice::CostOnlyHss { name, type_name } => write!(
                f,
                "{} ({}) was added in the cost report. This might be an item not found in the takeoff (eg. HSS 7x3x1/4 -> HSS 6x4x1/4), or a pipe column.",
                name, type_name
            ),
            Notice::CostOnlyMaterial { name, type_name } => write!(
                f,
                "{} ({}) was added to the material list from the cost report.",
                name, type_name
            ),
        }
    }
}

/// Ordered collection of notices
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Diagnostics {
    notices: Vec<Notice>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    pub fn len(&self) -> usize {
        self.notices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Notice> {
        self.notices.iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Notice;
    type IntoIter = std::slice::Iter<'a, Notice>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notices_keep_insertion_order() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.push(Notice::DuplicateEntry {
            key: "P1|Beam|W12x50".to_string(),
            raw_name: "W12x50".to_string(),
        });
        diagnostics.push(Notice::CostOnlyHss {
            name: "HSS 6x6x1/4".to_string(),
            type_name: "Beam".to_string(),
        });

        let kinds: Vec<_> = diagnostics
            .iter()
            .map(|n| matches!(n, Notice::DuplicateEntry { .. }))
            .collect();
        assert_eq!(kinds, vec![true, false]);
        assert_eq!(diagnostics.len(), 2);
    }

    #[test]
    fn test_notice_messages() {
        let none = Notice::NoneType {
            plan: "P1".to_string(),
            type_name: "None".to_string(),
            count: "2".to_string(),
            name: "W12x50".to_string(),
            description: "misc".to_string(),
        };
        assert_eq!(
            none.to_string(),
            "WARN: Type of 'None' encountered: P1 | None | 2 | W12x50 | misc"
        );

        let hss = Notice::CostOnlyHss {
            name: "HSS 6x6x1/4".to_string(),
            type_name: "Column".to_string(),
        };
        assert!(hss.to_string().starts_with("HSS 6x6x1/4 (Column) was added in the cost report"));
    }

    #[test]
    fn test_notice_json_is_tagged() {
        let dup = Notice::DuplicateEntry {
            key: "P1|Beam|W12x50".to_string(),
            raw_name: "W12x50".to_string(),
        };
        let json = serde_json::to_value(&dup).unwrap();
        assert_eq!(json["kind"], "duplicate_entry");
        assert_eq!(json["key"], "P1|Beam|W12x50");
    }
}
