// ==============================================================================
// store.rs - Dataset Store
// ==============================================================================
// Description: Loads every source relation once into immutable in-memory tables
// Author: Association Browser Maintainers
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::SourcePaths;
use crate::error::LoadError;
use crate::models::{
    ClinicalAssociation, GeneAssociation, GeneExternalId, VariantAssociation, VariantGeneLink,
};
use crate::parsers::AssociationCsvParser;
use crate::table::{ColumnDef, Record, Table, TableName};

/// Provenance of one loaded source
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceInfo {
    pub table: TableName,
    pub path: PathBuf,
    pub rows: usize,
    pub sha256: String,
    pub loaded_at: DateTime<Utc>,
}

/// Read-only handle to any table of the store
#[derive(Debug, Clone, Copy)]
pub enum TableRef<'a> {
    VariantAssociation(&'a Table<VariantAssociation>),
    GeneAssociation(&'a Table<GeneAssociation>),
    ClinicalAssociation(&'a Table<ClinicalAssociation>),
    VariantGeneMap(&'a Table<VariantGeneLink>),
    GeneExternalIdMap(&'a Table<GeneExternalId>),
}

impl TableRef<'_> {
    pub fn name(&self) -> TableName {
        match self {
            TableRef::VariantAssociation(t) => t.name(),
            TableRef::GeneAssociation(t) => t.name(),
            TableRef::ClinicalAssociation(t) => t.name(),
            TableRef::VariantGeneMap(t) => t.name(),
            TableRef::GeneExternalIdMap(t) => t.name(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            TableRef::VariantAssociation(t) => t.len(),
            TableRef::GeneAssociation(t) => t.len(),
            TableRef::ClinicalAssociation(t) => t.len(),
            TableRef::VariantGeneMap(t) => t.len(),
            TableRef::GeneExternalIdMap(t) => t.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn schema(&self) -> &'static [ColumnDef] {
        match self {
            TableRef::VariantAssociation(t) => t.schema(),
            TableRef::GeneAssociation(t) => t.schema(),
            TableRef::ClinicalAssociation(t) => t.schema(),
            TableRef::VariantGeneMap(t) => t.schema(),
            TableRef::GeneExternalIdMap(t) => t.schema(),
        }
    }
}

/// Every source relation, loaded once and never mutated.
///
/// Accessors hand out shared borrows only; wrap the store in an `Arc` to share
/// it between request workers.
#[derive(Debug, Clone)]
pub struct DatasetStore {
    variant_associations: Table<VariantAssociation>,
    gene_associations: Table<GeneAssociation>,
    clinical_associations: Table<ClinicalAssociation>,
    variant_gene_map: Table<VariantGeneLink>,
    gene_external_ids: Table<GeneExternalId>,
    sources: Vec<SourceInfo>,
}

impl DatasetStore {
    /// Load all five sources; any failure aborts the whole load.
    pub fn load(paths: &SourcePaths) -> Result<Self, LoadError> {
        info!("Loading association sources");

        let mut sources = Vec::with_capacity(TableName::ALL.len());
        let variant_associations = load_table(paths.path(TableName::VariantAssociation), &mut sources)?;
        let gene_associations = load_table(paths.path(TableName::GeneAssociation), &mut sources)?;
        let clinical_associations = load_table(paths.path(TableName::ClinicalAssociation), &mut sources)?;
        let variant_gene_map = load_table(paths.path(TableName::VariantGeneMap), &mut sources)?;
        let gene_external_ids = load_table(paths.path(TableName::GeneExternalIdMap), &mut sources)?;

        let total_rows: usize = sources.iter().map(|s| s.rows).sum();
        info!("Loaded {} sources ({} rows total)", sources.len(), total_rows);

        Ok(Self {
            variant_associations,
            gene_associations,
            clinical_associations,
            variant_gene_map,
            gene_external_ids,
            sources,
        })
    }

    /// Build a store from tables parsed elsewhere. Rows were finalized when
    /// their tables were built, so labels match those of [`DatasetStore::load`].
    pub fn from_tables(
        variant_associations: Table<VariantAssociation>,
        gene_associations: Table<GeneAssociation>,
        clinical_associations: Table<ClinicalAssociation>,
        variant_gene_map: Table<VariantGeneLink>,
        gene_external_ids: Table<GeneExternalId>,
    ) -> Self {
        Self {
            variant_associations,
            gene_associations,
            clinical_associations,
            variant_gene_map,
            gene_external_ids,
            sources: Vec::new(),
        }
    }

    pub fn table(&self, name: TableName) -> TableRef<'_> {
        match name {
            TableName::VariantAssociation => TableRef::VariantAssociation(&self.variant_associations),
            TableName::GeneAssociation => TableRef::GeneAssociation(&self.gene_associations),
            TableName::ClinicalAssociation => TableRef::ClinicalAssociation(&self.clinical_associations),
            TableName::VariantGeneMap => TableRef::VariantGeneMap(&self.variant_gene_map),
            TableName::GeneExternalIdMap => TableRef::GeneExternalIdMap(&self.gene_external_ids),
        }
    }

    pub fn variant_associations(&self) -> &Table<VariantAssociation> {
        &self.variant_associations
    }

    pub fn gene_associations(&self) -> &Table<GeneAssociation> {
        &self.gene_associations
    }

    pub fn clinical_associations(&self) -> &Table<ClinicalAssociation> {
        &self.clinical_associations
    }

    pub fn variant_gene_map(&self) -> &Table<VariantGeneLink> {
        &self.variant_gene_map
    }

    pub fn gene_external_ids(&self) -> &Table<GeneExternalId> {
        &self.gene_external_ids
    }

    /// Empty when the store was built with [`DatasetStore::from_tables`]
    pub fn sources(&self) -> &[SourceInfo] {
        &self.sources
    }

    /// Sorted, de-duplicated gene symbols of the TWAS table
    pub fn gene_symbols(&self) -> Vec<&str> {
        self.gene_associations
            .iter()
            .map(|row| row.gene.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

fn load_table<T: Record>(path: &Path, sources: &mut Vec<SourceInfo>) -> Result<Table<T>, LoadError> {
    let parsed = AssociationCsvParser::load_file::<T>(path)?;

    info!("Loaded {} rows into {} from {:?}", parsed.rows.len(), T::TABLE, path);

    sources.push(SourceInfo {
        table: T::TABLE,
        path: path.to_path_buf(),
        rows: parsed.rows.len(),
        sha256: parsed.sha256,
        loaded_at: Utc::now(),
    });

    Ok(Table::from_rows(parsed.rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn write_sources(dir: &Path) {
        fs::write(
            dir.join("gwas_ukb_volume.csv"),
            "SNP,Predicted Volume,GWAS beta,GWAS p,GWAS p(FDR),GWAS p(Bonf)\n\
             rs1,Hippocampus,0.2,0.001,0.01,0.1\n\
             rs2,Caudate,-0.1,0.3,0.6,1.0\n",
        )
        .unwrap();
        fs::write(
            dir.join("twas_ukb_volume.csv"),
            "Gene,gr-Expression Site,Predicted Volume,TWAS beta,TWAS p,TWAS p(FDR),TWAS p(Bonf)\n\
             NRGN,DLPFC,Hippocampus,0.3,1e-5,1e-3,0.02\n\
             GRIN2A,Caudate,Caudate,-0.2,0.04,0.2,1.0\n\
             NRGN,Putamen,Caudate,0.1,0.5,0.9,1.0\n",
        )
        .unwrap();
        fs::write(
            dir.join("biovu_ukb_volume.csv"),
            "sym,tissue,phecode,phename,FDR_PDX,volume,FDR_UKB\n\
             NRGN,DLPFC,295.1,Schizophrenia,0.01,Hippocampus,0.02\n",
        )
        .unwrap();
        fs::write(
            dir.join("jti_gene2snp.csv"),
            "symbol,region,snp\nNRGN,DLPFC,rs1\n",
        )
        .unwrap();
        fs::write(dir.join("jti_ens2gene.csv"), "sym,ens\nNRGN,ENSG00000154146\n").unwrap();
    }

    #[test]
    fn test_load_all_sources() {
        let dir = tempdir().unwrap();
        write_sources(dir.path());

        let store = DatasetStore::load(&SourcePaths::from_data_dir(dir.path())).unwrap();

        assert_eq!(store.variant_associations().len(), 2);
        assert_eq!(store.gene_associations().len(), 3);
        assert_eq!(store.clinical_associations().rows()[0].phename, "295.1: Schizophrenia");
        assert_eq!(store.table(TableName::VariantGeneMap).len(), 1);
        assert_eq!(store.sources().len(), 5);
        assert!(store.sources().iter().all(|s| s.sha256.len() == 64));
    }

    #[test]
    fn test_table_accessor_by_name() {
        let dir = tempdir().unwrap();
        write_sources(dir.path());
        let store = DatasetStore::load(&SourcePaths::from_data_dir(dir.path())).unwrap();

        for name in TableName::ALL {
            assert_eq!(store.table(name).name(), name);
        }
        assert_eq!(store.table(TableName::GeneExternalIdMap).schema().len(), 2);
    }

    #[test]
    fn test_missing_column_aborts_load() {
        let dir = tempdir().unwrap();
        write_sources(dir.path());
        fs::write(dir.path().join("jti_ens2gene.csv"), "sym,ensembl\nNRGN,ENSG1\n").unwrap();

        let err = DatasetStore::load(&SourcePaths::from_data_dir(dir.path())).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn { column: "ens", .. }));
    }

    #[test]
    fn test_missing_source_aborts_load() {
        let dir = tempdir().unwrap();
        write_sources(dir.path());
        fs::remove_file(dir.path().join("biovu_ukb_volume.csv")).unwrap();

        let err = DatasetStore::load(&SourcePaths::from_data_dir(dir.path())).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn test_source_digest_matches_file() {
        let dir = tempdir().unwrap();
        write_sources(dir.path());
        let store = DatasetStore::load(&SourcePaths::from_data_dir(dir.path())).unwrap();

        let ids = store
            .sources()
            .iter()
            .find(|s| s.table == TableName::GeneExternalIdMap)
            .unwrap();
        // sha256("sym,ens\nNRGN,ENSG00000154146\n")
        assert_eq!(
            ids.sha256,
            "be11cab8d90526f06ca704ded2e44c7943c089ad3151e31c5335d8752e78cec6"
        );
    }

    #[test]
    fn test_from_tables_matches_loaded_labels() {
        let dir = tempdir().unwrap();
        write_sources(dir.path());
        let loaded = DatasetStore::load(&SourcePaths::from_data_dir(dir.path())).unwrap();

        let raw = ClinicalAssociation {
            gene: "NRGN".to_string(),
            tissue: "DLPFC".to_string(),
            phecode: "295.1".to_string(),
            phename: "Schizophrenia".to_string(),
            fdr_pdx: Some(0.01),
            volume: "Hippocampus".to_string(),
            fdr_ukb: Some(0.02),
        };
        let built = DatasetStore::from_tables(
            Table::empty(),
            Table::empty(),
            Table::from_rows(vec![raw]),
            Table::empty(),
            Table::empty(),
        );
        assert_eq!(built.clinical_associations(), loaded.clinical_associations());

        // Already-labelled rows are left alone
        let rebuilt = DatasetStore::from_tables(
            Table::empty(),
            Table::empty(),
            Table::from_rows(loaded.clinical_associations().rows().to_vec()),
            Table::empty(),
            Table::empty(),
        );
        assert_eq!(rebuilt.clinical_associations().rows()[0].phename, "295.1: Schizophrenia");
    }

    #[test]
    fn test_gene_symbols_sorted_unique() {
        let dir = tempdir().unwrap();
        write_sources(dir.path());
        let store = DatasetStore::load(&SourcePaths::from_data_dir(dir.path())).unwrap();

        assert_eq!(store.gene_symbols(), vec!["GRIN2A", "NRGN"]);
    }

    #[test]
    fn test_from_tables_has_no_sources() {
        let store = DatasetStore::from_tables(
            Table::empty(),
            Table::empty(),
            Table::empty(),
            Table::empty(),
            Table::empty(),
        );
        assert!(store.sources().is_empty());
        assert!(store.table(TableName::GeneAssociation).is_empty());
    }
}
