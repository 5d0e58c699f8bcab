//! Records and tables.
//!
//! Scraped products produce sparse [`Record`]s with heterogeneous field
//! sets. At export time the records are coerced into a rectangular
//! [`Table`]: the union of all observed field names becomes the columns,
//! absent fields fill as empty strings, and a [`ColumnPlan`] reorders the
//! columns into a fixed preferred prefix followed by the rest in encounter
//! order.

use std::collections::{HashMap, HashSet};

use crate::app::{LugnutError, Result};

/// Ordered field-name → text mapping for one scraped product or fitment row.
///
/// Insertion order is preserved; inserting an existing field overwrites its
/// value in place. Values are stored whitespace-trimmed.
#[derive(Debug, Clone, Default)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into().trim().to_string();
        let value = value.into().trim().to_string();

        if let Some(entry) = self.fields.iter_mut().find(|(n, _)| *n == name) {
            entry.1 = value;
        } else {
            self.fields.push((name, value));
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// True if at least one field carries a non-empty value.
    pub fn has_content(&self) -> bool {
        self.fields.iter().any(|(_, v)| !v.is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

/// A rectangular table: one header row plus string cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Build a table from scraped records.
    ///
    /// Columns are the union of all observed field names in first-encounter
    /// order; missing cells fill as empty strings; every cell is trimmed.
    /// Zero records is an explicit error: there is nothing to export.
    pub fn from_records(records: &[Record]) -> Result<Self> {
        if records.is_empty() {
            return Err(LugnutError::NoRecords);
        }

        let mut columns: Vec<String> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        for record in records {
            for (name, _) in record.iter() {
                if seen.insert(name.to_string()) {
                    columns.push(name.to_string());
                }
            }
        }

        let rows = records
            .iter()
            .map(|record| {
                columns
                    .iter()
                    .map(|col| record.get(col).unwrap_or("").trim().to_string())
                    .collect()
            })
            .collect();

        Ok(Self { columns, rows })
    }

    /// Reorder (and drop) columns according to a plan.
    pub fn reorder(&mut self, plan: &ColumnPlan) {
        let order = plan.apply(&self.columns);

        let index: HashMap<&str, usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, c)| (c.as_str(), i))
            .collect();

        let picks: Vec<usize> = order.iter().map(|c| index[c.as_str()]).collect();

        self.rows = self
            .rows
            .iter()
            .map(|row| picks.iter().map(|&i| row[i].clone()).collect())
            .collect();
        self.columns = order;
    }

    /// Concatenate tables: columns are unioned in encounter order, missing
    /// cells fill as empty strings.
    pub fn concat(tables: &[Table]) -> Table {
        let mut columns: Vec<String> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        for table in tables {
            for col in &table.columns {
                if seen.insert(col.clone()) {
                    columns.push(col.clone());
                }
            }
        }

        let mut rows = Vec::new();
        for table in tables {
            let index: HashMap<&str, usize> = table
                .columns
                .iter()
                .enumerate()
                .map(|(i, c)| (c.as_str(), i))
                .collect();

            for row in &table.rows {
                rows.push(
                    columns
                        .iter()
                        .map(|col| {
                            index
                                .get(col.as_str())
                                .map(|&i| row[i].clone())
                                .unwrap_or_default()
                        })
                        .collect(),
                );
            }
        }

        Table { columns, rows }
    }

    /// Remove rows whose cells are all empty.
    pub fn drop_empty_rows(&mut self) {
        self.rows.retain(|row| row.iter().any(|c| !c.trim().is_empty()));
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// One position in a column plan.
#[derive(Debug, Clone)]
pub enum Slot {
    /// A column included at this position if it was observed.
    Named(String),
    /// All observed columns starting with this prefix and ending in a
    /// number, sorted numerically (so `Bullet 10` follows `Bullet 9`).
    Numbered(String),
}

/// Preferred-prefix column ordering: planned slots first, then the
/// remaining observed columns in encounter order, minus the drop list.
#[derive(Debug, Clone, Default)]
pub struct ColumnPlan {
    slots: Vec<Slot>,
    drop: Vec<String>,
}

impl ColumnPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(mut self, name: &str) -> Self {
        self.slots.push(Slot::Named(name.to_string()));
        self
    }

    pub fn numbered(mut self, prefix: &str) -> Self {
        self.slots.push(Slot::Numbered(prefix.to_string()));
        self
    }

    pub fn drop_column(mut self, name: &str) -> Self {
        self.drop.push(name.to_string());
        self
    }

    /// Compute the final column order for an observed column set.
    pub fn apply(&self, observed: &[String]) -> Vec<String> {
        let dropped: HashSet<&str> = self.drop.iter().map(String::as_str).collect();
        let mut used: HashSet<&str> = HashSet::new();
        let mut order: Vec<String> = Vec::new();

        for slot in &self.slots {
            match slot {
                Slot::Named(name) => {
                    if observed.iter().any(|c| c == name)
                        && !dropped.contains(name.as_str())
                        && used.insert(name.as_str())
                    {
                        order.push(name.clone());
                    }
                }
                Slot::Numbered(prefix) => {
                    let mut numbered: Vec<(u32, &String)> = observed
                        .iter()
                        .filter(|c| !dropped.contains(c.as_str()) && !used.contains(c.as_str()))
                        .filter_map(|c| {
                            c.strip_prefix(prefix.as_str())
                                .and_then(|rest| rest.trim().parse::<u32>().ok())
                                .map(|n| (n, c))
                        })
                        .collect();
                    numbered.sort_by_key(|(n, _)| *n);

                    for (_, col) in numbered {
                        used.insert(col.as_str());
                        order.push(col.clone());
                    }
                }
            }
        }

        for col in observed {
            if !dropped.contains(col.as_str()) && !used.contains(col.as_str()) {
                order.push(col.clone());
            }
        }

        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(fields: &[(&str, &str)]) -> Record {
        let mut r = Record::new();
        for (n, v) in fields {
            r.insert(*n, *v);
        }
        r
    }

    #[test]
    fn test_record_insert_trims_values() {
        let mut r = Record::new();
        r.insert("Detail", "  Torque: 50 ft-lb  ");
        assert_eq!(r.get("Detail"), Some("Torque: 50 ft-lb"));
    }

    #[test]
    fn test_record_insert_overwrites_in_place() {
        let mut r = Record::new();
        r.insert("A", "1");
        r.insert("B", "2");
        r.insert("A", "3");
        let fields: Vec<_> = r.iter().collect();
        assert_eq!(fields, vec![("A", "3"), ("B", "2")]);
    }

    #[test]
    fn test_record_has_content() {
        let mut r = Record::new();
        r.insert("Specs", "");
        r.insert("Description", "   ");
        assert!(!r.has_content());
        r.insert("Part Number", "K-1001");
        assert!(r.has_content());
    }

    #[test]
    fn test_table_from_records_unions_columns() {
        let records = vec![
            record(&[("Part Number", "A1"), ("Title", "Shock")]),
            record(&[("Part Number", "A2"), ("Finish", "Black")]),
        ];
        let table = Table::from_records(&records).unwrap();

        assert_eq!(table.columns, vec!["Part Number", "Title", "Finish"]);
        assert_eq!(table.rows[0], vec!["A1", "Shock", ""]);
        assert_eq!(table.rows[1], vec!["A2", "", "Black"]);
    }

    #[test]
    fn test_table_from_records_empty_is_error() {
        let result = Table::from_records(&[]);
        assert!(matches!(result, Err(LugnutError::NoRecords)));
    }

    #[test]
    fn test_column_plan_orders_bullets_numerically() {
        let observed: Vec<String> = ["Bullet 2", "Part Number", "Bullet 1", "X"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let plan = ColumnPlan::new().named("Part Number").numbered("Bullet ");

        assert_eq!(
            plan.apply(&observed),
            vec!["Part Number", "Bullet 1", "Bullet 2", "X"]
        );
    }

    #[test]
    fn test_column_plan_bullet_ten_after_nine() {
        let observed: Vec<String> = ["Bullet 10", "Bullet 9", "Bullet 1"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let plan = ColumnPlan::new().numbered("Bullet ");

        assert_eq!(plan.apply(&observed), vec!["Bullet 1", "Bullet 9", "Bullet 10"]);
    }

    #[test]
    fn test_column_plan_drops_columns() {
        let observed: Vec<String> = ["Vehicle", "Year", "Make", "Note"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let plan = ColumnPlan::new()
            .named("Year")
            .named("Make")
            .drop_column("Vehicle");

        assert_eq!(plan.apply(&observed), vec!["Year", "Make", "Note"]);
    }

    #[test]
    fn test_reorder_remaps_rows() {
        let records = vec![record(&[
            ("Bullet 2", "b2"),
            ("Part Number", "P1"),
            ("Bullet 1", "b1"),
        ])];
        let mut table = Table::from_records(&records).unwrap();
        table.reorder(&ColumnPlan::new().named("Part Number").numbered("Bullet "));

        assert_eq!(table.columns, vec!["Part Number", "Bullet 1", "Bullet 2"]);
        assert_eq!(table.rows[0], vec!["P1", "b1", "b2"]);
    }

    #[test]
    fn test_concat_unions_and_fills() {
        let a = Table {
            columns: vec!["X".into(), "Y".into()],
            rows: vec![vec!["1".into(), "2".into()]],
        };
        let b = Table {
            columns: vec!["Y".into(), "Z".into()],
            rows: vec![vec!["3".into(), "4".into()]],
        };
        let merged = Table::concat(&[a, b]);

        assert_eq!(merged.columns, vec!["X", "Y", "Z"]);
        assert_eq!(merged.rows[0], vec!["1", "2", ""]);
        assert_eq!(merged.rows[1], vec!["", "3", "4"]);
    }

    #[test]
    fn test_concat_with_self_doubles_rows() {
        let t = Table {
            columns: vec!["A".into()],
            rows: vec![vec!["1".into()], vec!["2".into()]],
        };
        let merged = Table::concat(&[t.clone(), t]);
        assert_eq!(merged.rows.len(), 4);
    }

    #[test]
    fn test_drop_empty_rows() {
        let mut t = Table {
            columns: vec!["A".into(), "B".into()],
            rows: vec![
                vec!["1".into(), "".into()],
                vec!["".into(), "  ".into()],
                vec!["".into(), "2".into()],
            ],
        };
        t.drop_empty_rows();
        assert_eq!(t.rows.len(), 2);
    }
}
