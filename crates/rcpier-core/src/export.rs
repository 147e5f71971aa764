use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::categorize::Buckets;
use crate::error::RcpierError;
use crate::model::Table;

/// One output sheet, named after its bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sheet {
    pub name: String,
    pub table: Table,
}

/// The exported workbook: one sheet per non-empty bucket, in the order
/// DC, LL, BR, WS, WL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    /// Returns `None` when every bucket is empty; nothing is written then.
    pub fn from_buckets(buckets: &Buckets) -> Option<Workbook> {
        let sheets: Vec<Sheet> = buckets
            .iter()
            .filter(|(_, table)| !table.is_empty())
            .map(|(category, table)| Sheet {
                name: category.to_string(),
                table: table.clone(),
            })
            .collect();

        if sheets.is_empty() {
            None
        } else {
            Some(Workbook { sheets })
        }
    }

    pub fn to_json(&self) -> Result<String, RcpierError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_json(&self, path: &Path) -> Result<(), RcpierError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
