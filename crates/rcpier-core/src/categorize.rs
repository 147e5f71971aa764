use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::{CaseTable, Table};

/// Load case bucket, keyed off the naming convention of the report's case ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    /// Dead load.
    Dc,
    /// Live load. Catch-all for names matching no other bucket.
    Ll,
    /// Braking force.
    Br,
    /// Wind on structure.
    Ws,
    /// Wind on live load.
    Wl,
}

impl Category {
    /// Sheet order of the exported workbook.
    pub const ALL: [Category; 5] = [
        Category::Dc,
        Category::Ll,
        Category::Br,
        Category::Ws,
        Category::Wl,
    ];

    /// Route a load case name to its bucket. First match wins, in the
    /// order DC, WS, BR, WL; anything else is LL.
    pub fn classify(name: &str) -> Category {
        if name.contains("DC") {
            Category::Dc
        } else if name.contains("WS") {
            Category::Ws
        } else if name.contains("BR") {
            Category::Br
        } else if name.contains("WL") {
            Category::Wl
        } else {
            Category::Ll
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Dc => "DC",
            Category::Ll => "LL",
            Category::Br => "BR",
            Category::Ws => "WS",
            Category::Wl => "WL",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Per-category tables, each the side-by-side concatenation of the accepted
/// case tables routed to it, in scan order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Buckets {
    pub dc: Table,
    pub ll: Table,
    pub br: Table,
    pub ws: Table,
    pub wl: Table,
    #[serde(skip)]
    counts: [usize; 5],
}

impl Buckets {
    /// Append one case to the right of its bucket.
    pub fn with_case(mut self, case: &CaseTable) -> Self {
        self.slot_mut(case.category).append_columns(&case.table);
        self.counts[index(case.category)] += 1;
        self
    }

    pub fn get(&self, category: Category) -> &Table {
        match category {
            Category::Dc => &self.dc,
            Category::Ll => &self.ll,
            Category::Br => &self.br,
            Category::Ws => &self.ws,
            Category::Wl => &self.wl,
        }
    }

    /// Buckets in sheet order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &Table)> {
        Category::ALL.into_iter().map(move |c| (c, self.get(c)))
    }

    /// Whether any bucket holds a table.
    pub fn has_data(&self) -> bool {
        self.iter().any(|(_, table)| !table.is_empty())
    }

    /// Number of accepted cases routed to `category`.
    pub fn case_count(&self, category: Category) -> usize {
        self.counts[index(category)]
    }

    /// Accepted case counts in sheet order.
    pub fn case_counts(&self) -> Vec<(Category, usize)> {
        Category::ALL
            .into_iter()
            .map(|c| (c, self.case_count(c)))
            .collect()
    }

    fn slot_mut(&mut self, category: Category) -> &mut Table {
        match category {
            Category::Dc => &mut self.dc,
            Category::Ll => &mut self.ll,
            Category::Br => &mut self.br,
            Category::Ws => &mut self.ws,
            Category::Wl => &mut self.wl,
        }
    }
}

fn index(category: Category) -> usize {
    match category {
        Category::Dc => 0,
        Category::Ll => 1,
        Category::Br => 2,
        Category::Ws => 3,
        Category::Wl => 4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanning::name::CaseName;
    use crate::table::RawGrid;

    fn case(name: &str, payload: &str) -> CaseTable {
        CaseTable {
            name: CaseName::ShortForm(name.into()),
            category: Category::classify(name),
            table: RawGrid::from_payload(payload)
                .and_then(|grid| grid.into_case_table(name))
                .unwrap(),
        }
    }

    #[test]
    fn classify_priority() {
        assert_eq!(Category::classify("DC1"), Category::Dc);
        assert_eq!(Category::classify("DCWS"), Category::Dc);
        assert_eq!(Category::classify("BRDC"), Category::Dc);
        assert_eq!(Category::classify("WSBR"), Category::Ws);
        assert_eq!(Category::classify("WLBR"), Category::Br);
        assert_eq!(Category::classify("WL2"), Category::Wl);
        assert_eq!(Category::classify("HL93"), Category::Ll);
        assert_eq!(Category::classify("dc"), Category::Ll);
    }

    #[test]
    fn buckets_grow_wider_not_taller() {
        let buckets = Buckets::default()
            .with_case(&case("DC1", "1  1  V  -1\n1  2  V  -2"))
            .with_case(&case("LL1", "1  1  V  3"))
            .with_case(&case("DC2", "1  1  V  -4\n1  2  V  -5\n1  3  V  -6"));

        assert_eq!(buckets.dc.shape(), (3, 10));
        assert_eq!(buckets.dc.headers[0], "DC1");
        assert_eq!(buckets.dc.headers[5], "DC2");
        // DC1 only had two rows
        assert_eq!(buckets.dc.rows[2][4], None);
        assert_eq!(buckets.dc.rows[2][9], Some("-6".into()));

        assert_eq!(buckets.ll.shape(), (1, 5));
        assert!(buckets.br.is_empty());
        assert_eq!(buckets.case_count(Category::Dc), 2);
        assert_eq!(buckets.case_count(Category::Wl), 0);
        assert!(buckets.has_data());
    }

    #[test]
    fn empty_buckets_have_no_data() {
        let buckets = Buckets::default();
        assert!(!buckets.has_data());
        assert_eq!(
            buckets.iter().map(|(c, _)| c.as_str()).collect::<Vec<_>>(),
            vec!["DC", "LL", "BR", "WS", "WL"]
        );
    }
}
