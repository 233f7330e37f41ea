// ==============================================================================
// query.rs - Tabular Query Engine
// ==============================================================================
// Description: Filter, multi-key stable sort and page slicing over typed tables
// Author: Association Browser Maintainers
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================
// Evaluation order is fixed: filter (load order kept) -> stable sort ->
// count -> slice. Every column reference is resolved before any row is
// scanned, so a bad request never yields partial results.
// ==============================================================================

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::num::NonZeroUsize;

use crate::error::{QueryError, SchemaError};
use crate::table::{ColumnType, Record, Scalar, Table, Value};

/// Column-level constraint; a predicate list is combined with logical AND.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Predicate {
    /// `column ∈ values`
    In { column: String, values: Vec<Scalar> },
    /// `column < value`; missing cells never match
    LessThan { column: String, value: f64 },
}

impl Predicate {
    pub fn is_in<S: Into<Scalar>>(column: impl Into<String>, values: impl IntoIterator<Item = S>) -> Self {
        Predicate::In {
            column: column.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn equals(column: impl Into<String>, value: impl Into<Scalar>) -> Self {
        Predicate::In {
            column: column.into(),
            values: vec![value.into()],
        }
    }

    pub fn less_than(column: impl Into<String>, value: f64) -> Self {
        Predicate::LessThan {
            column: column.into(),
            value,
        }
    }

    pub fn column(&self) -> &str {
        match self {
            Predicate::In { column, .. } | Predicate::LessThan { column, .. } => column,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// One entry of a composite sort, shaped like the table widget's `sort_by`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub column_id: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortKey {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column_id: column.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column_id: column.into(),
            direction: SortDirection::Desc,
        }
    }
}

/// Zero-based page window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub index: usize,
    pub size: NonZeroUsize,
}

impl PageRequest {
    pub fn new(index: usize, size: usize) -> Result<Self, QueryError> {
        let size = NonZeroUsize::new(size)
            .ok_or_else(|| QueryError::InvalidRequest("page_size must be greater than zero".to_string()))?;
        Ok(Self { index, size })
    }

    /// Window `[index * size, (index + 1) * size)` clipped to `len`
    pub fn bounds(&self, len: usize) -> (usize, usize) {
        let start = self.index.saturating_mul(self.size.get()).min(len);
        let end = start.saturating_add(self.size.get()).min(len);
        (start, end)
    }

    pub fn page_count(&self, total_matching: usize) -> usize {
        page_count(total_matching, self.size)
    }
}

/// `floor(total / size) + 1`.
///
/// Reports one page for an empty result, and one trailing empty page when
/// `total` is an exact multiple of `size`. Callers depend on these counts.
pub fn page_count(total_matching: usize, page_size: NonZeroUsize) -> usize {
    total_matching / page_size.get() + 1
}

/// Page of matching rows, borrowed from the table
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult<'t, T> {
    pub rows: Vec<&'t T>,
    pub total_matching: usize,
}

/// Runs a paginated query: `(page of rows, number of rows matching overall)`.
pub fn execute<'t, T: Record>(
    table: &'t Table<T>,
    predicates: &[Predicate],
    sort_keys: &[SortKey],
    page: PageRequest,
) -> Result<QueryResult<'t, T>, SchemaError> {
    let mut matched = select(table, predicates, sort_keys)?;
    let total_matching = matched.len();
    let (start, end) = page.bounds(total_matching);
    matched.truncate(end);
    let rows = matched.split_off(start);

    Ok(QueryResult {
        rows,
        total_matching,
    })
}

/// Every matching row, sorted; the unpaginated form of [`execute`].
pub fn select<'t, T: Record>(
    table: &'t Table<T>,
    predicates: &[Predicate],
    sort_keys: &[SortKey],
) -> Result<Vec<&'t T>, SchemaError> {
    let filters = predicates
        .iter()
        .map(CompiledPredicate::compile::<T>)
        .collect::<Result<Vec<_>, _>>()?;
    let order = sort_keys
        .iter()
        .map(|key| {
            resolve_column::<T>(&key.column_id).map(|(index, _)| (index, key.direction))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut matched: Vec<&T> = table
        .iter()
        .filter(|row| filters.iter().all(|f| f.matches(*row)))
        .collect();

    // slice::sort_by is stable, so load order breaks remaining ties
    if !order.is_empty() {
        matched.sort_by(|a, b| compare_rows(*a, *b, &order));
    }

    Ok(matched)
}

/// Number of rows matching `predicates`, without sorting or slicing
pub fn count<T: Record>(table: &Table<T>, predicates: &[Predicate]) -> Result<usize, SchemaError> {
    let filters = predicates
        .iter()
        .map(CompiledPredicate::compile::<T>)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(table
        .iter()
        .filter(|row| filters.iter().all(|f| f.matches(*row)))
        .count())
}

fn resolve_column<T: Record>(name: &str) -> Result<(usize, ColumnType), SchemaError> {
    T::column_index(name)
        .map(|index| (index, T::COLUMNS[index].kind))
        .ok_or_else(|| SchemaError::UnknownColumn {
            table: T::TABLE,
            column: name.to_string(),
        })
}

/// Missing values sort last in either direction.
fn compare_rows<T: Record>(a: &T, b: &T, order: &[(usize, SortDirection)]) -> Ordering {
    for &(column, direction) in order {
        let (left, right) = (a.cell(column), b.cell(column));
        let ordering = match (left.is_null(), right.is_null()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => {
                let ordering = left.cmp_present(&right);
                match direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            }
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

struct CompiledPredicate<'p> {
    column: usize,
    test: Test<'p>,
}

enum Test<'p> {
    InText(HashSet<&'p str>),
    InNumber(Vec<f64>),
    LessThan(f64),
}

impl<'p> CompiledPredicate<'p> {
    fn compile<T: Record>(predicate: &'p Predicate) -> Result<Self, SchemaError> {
        let (column, kind) = resolve_column::<T>(predicate.column())?;
        let test = match predicate {
            Predicate::In { column: name, values } => {
                if values.iter().any(|v| !v.fits(kind)) {
                    return Err(SchemaError::TypeMismatch {
                        table: T::TABLE,
                        column: name.clone(),
                        expected: kind,
                    });
                }
                if kind == ColumnType::Text {
                    Test::InText(
                        values
                            .iter()
                            .filter_map(|v| match v {
                                Scalar::Text(s) => Some(s.as_str()),
                                _ => None,
                            })
                            .collect(),
                    )
                } else {
                    Test::InNumber(values.iter().filter_map(Scalar::as_f64).collect())
                }
            }
            Predicate::LessThan { column: name, value } => {
                if !kind.is_numeric() {
                    return Err(SchemaError::NotNumeric {
                        table: T::TABLE,
                        column: name.clone(),
                    });
                }
                Test::LessThan(*value)
            }
        };
        Ok(Self { column, test })
    }

    fn matches<T: Record>(&self, row: &T) -> bool {
        let cell = row.cell(self.column);
        match &self.test {
            Test::InText(values) => matches!(cell, Value::Text(s) if values.contains(s)),
            Test::InNumber(values) => cell
                .as_f64()
                .map_or(false, |v| values.iter().any(|candidate| *candidate == v)),
            Test::LessThan(threshold) => cell.as_f64().map_or(false, |v| v < *threshold),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VariantAssociation;
    use crate::table::{ColumnDef, TableName};

    fn gwas(snp: &str, beta: Option<f64>, pvalue: Option<f64>) -> VariantAssociation {
        VariantAssociation {
            snp: snp.to_string(),
            phenotype: "Hippocampus".to_string(),
            beta,
            pvalue,
            fdr: pvalue.map(|p| (p * 10.0).min(1.0)),
            bonferroni: pvalue.map(|p| (p * 100.0).min(1.0)),
        }
    }

    fn snps(rows: &[&VariantAssociation]) -> Vec<String> {
        rows.iter().map(|r| r.snp.clone()).collect()
    }

    /// Small record with an integer column
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Count {
        region: String,
        n: i64,
    }

    impl Record for Count {
        const TABLE: TableName = TableName::VariantGeneMap;
        const COLUMNS: &'static [ColumnDef] = &[ColumnDef::text("region"), ColumnDef::integer("n")];

        fn cell(&self, column: usize) -> Value<'_> {
            match column {
                0 => Value::Text(&self.region),
                1 => Value::Integer(self.n),
                _ => Value::Null,
            }
        }
    }

    #[test]
    fn test_empty_predicates_match_everything_in_order() {
        let table = Table::from_rows(vec![
            gwas("rs3", Some(0.1), Some(0.5)),
            gwas("rs1", Some(0.2), Some(0.01)),
            gwas("rs2", Some(0.3), Some(0.2)),
        ]);
        let rows = select(&table, &[], &[]).unwrap();
        assert_eq!(snps(&rows), vec!["rs3", "rs1", "rs2"]);
    }

    #[test]
    fn test_membership_and_threshold_are_anded() {
        let table = Table::from_rows(vec![
            gwas("rs1", Some(0.1), Some(0.01)),
            gwas("rs2", Some(0.1), Some(0.20)),
            gwas("rs3", Some(0.1), Some(0.03)),
        ]);
        let predicates = vec![
            Predicate::is_in("SNP", ["rs1", "rs2"]),
            Predicate::less_than("GWAS p", 0.05),
        ];
        let rows = select(&table, &predicates, &[]).unwrap();
        assert_eq!(snps(&rows), vec!["rs1"]);
    }

    #[test]
    fn test_threshold_is_strict_and_skips_missing() {
        let table = Table::from_rows(vec![
            gwas("rs1", Some(0.1), Some(0.05)),
            gwas("rs2", Some(0.1), None),
            gwas("rs3", Some(0.1), Some(0.049)),
        ]);
        let rows = select(&table, &[Predicate::less_than("GWAS p", 0.05)], &[]).unwrap();
        assert_eq!(snps(&rows), vec!["rs3"]);
    }

    #[test]
    fn test_empty_membership_set_matches_nothing() {
        let table = Table::from_rows(vec![gwas("rs1", None, None)]);
        let empty: Vec<String> = Vec::new();
        assert_eq!(count(&table, &[Predicate::is_in("SNP", empty)]).unwrap(), 0);
    }

    #[test]
    fn test_unknown_columns_are_rejected() {
        let table = Table::from_rows(vec![gwas("rs1", None, None)]);
        let err = select(&table, &[Predicate::less_than("TWAS p", 0.5)], &[]).unwrap_err();
        assert_eq!(
            err,
            SchemaError::UnknownColumn {
                table: TableName::VariantAssociation,
                column: "TWAS p".to_string(),
            }
        );

        let err = select(&table, &[], &[SortKey::asc("beta")]).unwrap_err();
        assert!(matches!(err, SchemaError::UnknownColumn { column, .. } if column == "beta"));
    }

    #[test]
    fn test_schema_errors_are_raised_on_empty_tables() {
        let table: Table<VariantAssociation> = Table::empty();
        assert!(select(&table, &[], &[SortKey::desc("nope")]).is_err());
    }

    #[test]
    fn test_threshold_on_text_column_is_rejected() {
        let table = Table::from_rows(vec![gwas("rs1", None, None)]);
        let err = select(&table, &[Predicate::less_than("SNP", 0.5)], &[]).unwrap_err();
        assert!(matches!(err, SchemaError::NotNumeric { .. }));
    }

    #[test]
    fn test_membership_type_mismatch_is_rejected() {
        let table = Table::from_rows(vec![gwas("rs1", None, None)]);
        let err = select(&table, &[Predicate::equals("GWAS beta", "big")], &[]).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::TypeMismatch { expected: ColumnType::Float, .. }
        ));
    }

    #[test]
    fn test_multi_key_sort_with_direction() {
        let table = Table::from_rows(vec![
            gwas("rs1", Some(0.5), Some(0.03)),
            gwas("rs2", Some(0.9), Some(0.50)),
            gwas("rs3", Some(0.5), Some(0.01)),
        ]);
        let keys = vec![SortKey::desc("GWAS beta"), SortKey::asc("GWAS p")];
        let rows = select(&table, &[], &keys).unwrap();
        assert_eq!(snps(&rows), vec!["rs2", "rs3", "rs1"]);
    }

    #[test]
    fn test_sort_is_stable_on_ties() {
        let table = Table::from_rows(vec![
            gwas("rs1", Some(0.5), None),
            gwas("rs2", Some(0.1), None),
            gwas("rs3", Some(0.5), None),
            gwas("rs4", Some(0.5), None),
        ]);
        let rows = select(&table, &[], &[SortKey::desc("GWAS beta")]).unwrap();
        assert_eq!(snps(&rows), vec!["rs1", "rs3", "rs4", "rs2"]);
    }

    #[test]
    fn test_missing_values_sort_last_both_directions() {
        let table = Table::from_rows(vec![
            gwas("rs1", None, None),
            gwas("rs2", Some(0.2), None),
            gwas("rs3", Some(-0.4), None),
        ]);
        let asc = select(&table, &[], &[SortKey::asc("GWAS beta")]).unwrap();
        assert_eq!(snps(&asc), vec!["rs3", "rs2", "rs1"]);
        let desc = select(&table, &[], &[SortKey::desc("GWAS beta")]).unwrap();
        assert_eq!(snps(&desc), vec!["rs2", "rs3", "rs1"]);
    }

    #[test]
    fn test_page_count_formula() {
        let ten = NonZeroUsize::new(10).unwrap();
        assert_eq!(page_count(0, ten), 1);
        assert_eq!(page_count(9, ten), 1);
        assert_eq!(page_count(12, ten), 2);
        assert_eq!(page_count(20, ten), 3);
    }

    #[test]
    fn test_page_request_rejects_zero_size() {
        assert!(matches!(PageRequest::new(0, 0), Err(QueryError::InvalidRequest(_))));
    }

    #[test]
    fn test_page_bounds_clip() {
        let page = PageRequest::new(1, 10).unwrap();
        assert_eq!(page.bounds(12), (10, 12));
        assert_eq!(page.bounds(5), (5, 5));
        let far = PageRequest::new(usize::MAX, 10).unwrap();
        assert_eq!(far.bounds(3), (3, 3));
    }

    #[test]
    fn test_execute_slices_after_sorting() {
        let rows: Vec<_> = (0..7)
            .map(|i| gwas(&format!("rs{}", i), Some(i as f64), Some(0.01)))
            .collect();
        let table = Table::from_rows(rows);
        let result = execute(
            &table,
            &[],
            &[SortKey::desc("GWAS beta")],
            PageRequest::new(1, 3).unwrap(),
        )
        .unwrap();
        assert_eq!(result.total_matching, 7);
        assert_eq!(snps(&result.rows), vec!["rs3", "rs2", "rs1"]);
    }

    #[test]
    fn test_integer_columns() {
        let table = Table::from_rows(vec![
            Count { region: "Caudate".to_string(), n: 4 },
            Count { region: "Putamen".to_string(), n: 2 },
            Count { region: "DLPFC".to_string(), n: 9 },
        ]);
        let rows = select(
            &table,
            &[Predicate::is_in("n", [Scalar::Integer(2), Scalar::Float(9.0)])],
            &[SortKey::asc("n")],
        )
        .unwrap();
        let regions: Vec<_> = rows.iter().map(|r| r.region.as_str()).collect();
        assert_eq!(regions, vec!["Putamen", "DLPFC"]);
        assert_eq!(count(&table, &[Predicate::less_than("n", 5.0)]).unwrap(), 2);
    }

    #[test]
    fn test_predicate_json_shape() {
        let predicate: Predicate =
            serde_json::from_str(r#"{"op":"less_than","column":"GWAS p","value":0.05}"#).unwrap();
        assert_eq!(predicate, Predicate::less_than("GWAS p", 0.05));
        let key: SortKey = serde_json::from_str(r#"{"column_id":"GWAS beta","direction":"desc"}"#).unwrap();
        assert_eq!(key, SortKey::desc("GWAS beta"));
    }
}
