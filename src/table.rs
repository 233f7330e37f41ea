// ==============================================================================
// table.rs - Immutable Typed Tables
// ==============================================================================
// Description: Column schema, cell values and the read-only table container
// Author: Association Browser Maintainers
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Source relations known to the dataset store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableName {
    /// Variant-level GWAS results
    VariantAssociation,
    /// Gene-level TWAS results
    GeneAssociation,
    /// BioVU clinical phenotype associations
    ClinicalAssociation,
    /// JTI gene symbol / region / variant links
    VariantGeneMap,
    /// Gene symbol to Ensembl identifier
    GeneExternalIdMap,
}

impl TableName {
    pub const ALL: [TableName; 5] = [
        TableName::VariantAssociation,
        TableName::GeneAssociation,
        TableName::ClinicalAssociation,
        TableName::VariantGeneMap,
        TableName::GeneExternalIdMap,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TableName::VariantAssociation => "variant_association",
            TableName::GeneAssociation => "gene_association",
            TableName::ClinicalAssociation => "clinical_association",
            TableName::VariantGeneMap => "variant_gene_map",
            TableName::GeneExternalIdMap => "gene_external_id_map",
        }
    }

    /// File name of the source under the data directory
    pub fn default_file_name(&self) -> &'static str {
        match self {
            TableName::VariantAssociation => "gwas_ukb_volume.csv",
            TableName::GeneAssociation => "twas_ukb_volume.csv",
            TableName::ClinicalAssociation => "biovu_ukb_volume.csv",
            TableName::VariantGeneMap => "jti_gene2snp.csv",
            TableName::GeneExternalIdMap => "jti_ens2gene.csv",
        }
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scalar type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Text,
    Float,
    Integer,
}

impl ColumnType {
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Float | ColumnType::Integer)
    }
}

/// Column name and type as declared by a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: &'static str,
    pub kind: ColumnType,
}

impl ColumnDef {
    pub const fn text(name: &'static str) -> Self {
        Self {
            name,
            kind: ColumnType::Text,
        }
    }

    pub const fn float(name: &'static str) -> Self {
        Self {
            name,
            kind: ColumnType::Float,
        }
    }

    pub const fn integer(name: &'static str) -> Self {
        Self {
            name,
            kind: ColumnType::Integer,
        }
    }
}

/// Borrowed view of one cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'a> {
    Text(&'a str),
    Float(f64),
    Integer(i64),
    Null,
}

impl<'a> Value<'a> {
    pub fn from_optional_float(value: Option<f64>) -> Self {
        value.map_or(Value::Null, Value::Float)
    }

    /// NaN counts as missing, like an empty cell
    pub fn is_null(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Float(v) => v.is_nan(),
            _ => false,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) if !v.is_nan() => Some(*v),
            Value::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Orders two present cells of the same column.
    pub fn cmp_present(&self, other: &Value<'_>) -> Ordering {
        match (self, other) {
            (Value::Text(a), Value::Text(b)) => a.cmp(b),
            (Value::Integer(a), Value::Integer(b)) => a.cmp(b),
            _ => match (self.as_f64(), other.as_f64()) {
                (Some(a), Some(b)) => a.total_cmp(&b),
                _ => Ordering::Equal,
            },
        }
    }
}

/// Owned scalar used in membership filters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    /// Whether this scalar can be compared against cells of `kind`
    pub fn fits(&self, kind: ColumnType) -> bool {
        match self {
            Scalar::Text(_) => kind == ColumnType::Text,
            Scalar::Integer(_) | Scalar::Float(_) => kind.is_numeric(),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Integer(v) => Some(*v as f64),
            Scalar::Float(v) => Some(*v),
            Scalar::Text(_) => None,
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

impl From<&String> for Scalar {
    fn from(value: &String) -> Self {
        Scalar::Text(value.clone())
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Integer(value)
    }
}

/// Fixed-schema row type backing a [`Table`].
///
/// `COLUMNS` lists every column in declaration order; `cell(i)` returns the
/// value of `COLUMNS[i]`. Implementors deserialize from the source CSV by
/// header name, so column names double as serde field names.
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    const TABLE: TableName;
    const COLUMNS: &'static [ColumnDef];
    /// Columns accepted by the p-value threshold filter
    const THRESHOLD_COLUMNS: &'static [&'static str] = &[];

    fn cell(&self, column: usize) -> Value<'_>;

    /// Derives display fields from raw source fields. Must be idempotent:
    /// rows pass through it both when parsed and when a table is built.
    fn finalize(&mut self) {}

    fn column_index(name: &str) -> Option<usize> {
        Self::COLUMNS.iter().position(|c| c.name == name)
    }
}

/// Ordered, immutable sequence of rows sharing one schema.
///
/// There is no mutation API: a table is built once from its rows and only
/// borrowed afterwards. Row order is load order.
#[derive(Debug, Clone, PartialEq)]
pub struct Table<T> {
    rows: Vec<T>,
}

impl<T: Record> Table<T> {
    /// Build a table; every row goes through [`Record::finalize`].
    pub fn from_rows(mut rows: Vec<T>) -> Self {
        for row in &mut rows {
            row.finalize();
        }
        Self { rows }
    }

    pub fn empty() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn name(&self) -> TableName {
        T::TABLE
    }

    pub fn schema(&self) -> &'static [ColumnDef] {
        T::COLUMNS
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<'a, T: Record> IntoIterator for &'a Table<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_detection() {
        assert!(Value::Null.is_null());
        assert!(Value::Float(f64::NAN).is_null());
        assert!(!Value::Float(0.0).is_null());
        assert!(!Value::Text("").is_null());
        assert_eq!(Value::from_optional_float(None), Value::Null);
    }

    #[test]
    fn test_cmp_present_mixed_numeric() {
        assert_eq!(Value::Integer(2).cmp_present(&Value::Float(2.5)), Ordering::Less);
        assert_eq!(Value::Text("a").cmp_present(&Value::Text("b")), Ordering::Less);
        assert_eq!(Value::Float(1e-8).cmp_present(&Value::Float(1e-9)), Ordering::Greater);
    }

    #[test]
    fn test_scalar_fits_column_type() {
        assert!(Scalar::from("DLPFC").fits(ColumnType::Text));
        assert!(!Scalar::from("DLPFC").fits(ColumnType::Float));
        assert!(Scalar::from(3_i64).fits(ColumnType::Float));
        assert!(Scalar::from(0.5).fits(ColumnType::Integer));
    }

    #[test]
    fn test_scalar_untagged_json() {
        let values: Vec<Scalar> = serde_json::from_str(r#"["rs1", 2, 0.5]"#).unwrap();
        assert_eq!(
            values,
            vec![Scalar::from("rs1"), Scalar::Integer(2), Scalar::Float(0.5)]
        );
    }

    #[test]
    fn test_default_file_names_are_distinct() {
        let mut names: Vec<_> = TableName::ALL.iter().map(|t| t.default_file_name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), TableName::ALL.len());
    }
}
