// ==============================================================================
// config.rs - Source Configuration
// ==============================================================================
// Description: Locations of the association source files
// Author: Association Browser Maintainers
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::table::TableName;

/// Data directory used when none is configured
pub const DEFAULT_DATA_DIR: &str = "input_data";

/// One source path per table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcePaths {
    pub variant_associations: PathBuf,
    pub gene_associations: PathBuf,
    pub clinical_associations: PathBuf,
    pub variant_gene_map: PathBuf,
    pub gene_external_ids: PathBuf,
}

impl SourcePaths {
    /// Default file names under `dir`
    pub fn from_data_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        let path = |table: TableName| dir.join(table.default_file_name());
        Self {
            variant_associations: path(TableName::VariantAssociation),
            gene_associations: path(TableName::GeneAssociation),
            clinical_associations: path(TableName::ClinicalAssociation),
            variant_gene_map: path(TableName::VariantGeneMap),
            gene_external_ids: path(TableName::GeneExternalIdMap),
        }
    }

    pub fn path(&self, table: TableName) -> &Path {
        match table {
            TableName::VariantAssociation => &self.variant_associations,
            TableName::GeneAssociation => &self.gene_associations,
            TableName::ClinicalAssociation => &self.clinical_associations,
            TableName::VariantGeneMap => &self.variant_gene_map,
            TableName::GeneExternalIdMap => &self.gene_external_ids,
        }
    }
}

impl Default for SourcePaths {
    fn default() -> Self {
        Self::from_data_dir(DEFAULT_DATA_DIR)
    }
}
