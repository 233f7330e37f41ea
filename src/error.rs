// ==============================================================================
// error.rs - Error Types
// ==============================================================================
// Description: Load, schema, lookup and request errors for the query core
// Author: Association Browser Maintainers
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================

use std::path::PathBuf;
use thiserror::Error;

use crate::table::{ColumnType, TableName};

/// Errors raised while building the dataset store. Always fatal at startup.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error in {source_name}: {error}")]
    Csv {
        source_name: String,
        #[source]
        error: csv::Error,
    },

    #[error("{source_name} is missing required column '{column}'")]
    MissingColumn {
        source_name: String,
        column: &'static str,
    },

    #[error("Invalid row {row} in {source_name}: {details}")]
    Parse {
        source_name: String,
        row: usize,
        details: String,
    },
}

/// A request referenced a column the target table cannot serve.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Unknown column '{column}' in table {table}")]
    UnknownColumn { table: TableName, column: String },

    #[error("Column '{column}' in table {table} is not numeric")]
    NotNumeric { table: TableName, column: String },

    #[error("Value type does not match column '{column}' ({expected:?}) in table {table}")]
    TypeMismatch {
        table: TableName,
        column: String,
        expected: ColumnType,
    },

    #[error("Column '{column}' in table {table} does not accept a p-value threshold")]
    NotThresholdColumn { table: TableName, column: String },
}

/// Gene absent from the gene identifier map
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Gene '{gene}' not found in identifier map")]
pub struct NotFoundError {
    pub gene: String,
}

/// Per-request failure returned to the orchestration layer
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = SchemaError::UnknownColumn {
            table: TableName::GeneAssociation,
            column: "TWAS q".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown column 'TWAS q' in table gene_association");

        let err = LoadError::MissingColumn {
            source_name: "jti_ens2gene.csv".to_string(),
            column: "ens",
        };
        assert_eq!(err.to_string(), "jti_ens2gene.csv is missing required column 'ens'");
    }

    #[test]
    fn test_query_error_wraps_transparently() {
        let err: QueryError = NotFoundError {
            gene: "FAKE1".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "Gene 'FAKE1' not found in identifier map");
        assert!(matches!(err, QueryError::NotFound(_)));
    }
}
