// ==============================================================================
// models.rs - Association Data Models
// ==============================================================================
// Description: Fixed-schema records for GWAS, TWAS, BioVU and JTI map sources
// Author: Association Browser Maintainers
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================
// Field names follow the CSV headers of the source files, so each record
// deserializes straight from its source by header name.
// ==============================================================================

use serde::{Deserialize, Deserializer, Serialize};

use crate::table::{ColumnDef, Record, TableName, Value};

/// Canonical JTI expression regions, in display order
pub const REGIONS: [&str; 8] = [
    "DLPFC",
    "Ant. Cingulate",
    "Amygdala",
    "Hippocampus",
    "Caudate",
    "Putamen",
    "Nuc. Accumbens",
    "Cerebellum",
];

/// Variant-level GWAS result (one row per variant and volume phenotype)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantAssociation {
    /// Variant identifier (e.g., "rs12345")
    #[serde(rename = "SNP")]
    pub snp: String,

    /// Regional volume phenotype
    #[serde(rename = "Predicted Volume")]
    pub phenotype: String,

    #[serde(rename = "GWAS beta", deserialize_with = "optional_stat")]
    pub beta: Option<f64>,

    #[serde(rename = "GWAS p", deserialize_with = "optional_stat")]
    pub pvalue: Option<f64>,

    #[serde(rename = "GWAS p(FDR)", deserialize_with = "optional_stat")]
    pub fdr: Option<f64>,

    #[serde(rename = "GWAS p(Bonf)", deserialize_with = "optional_stat")]
    pub bonferroni: Option<f64>,
}

impl Record for VariantAssociation {
    const TABLE: TableName = TableName::VariantAssociation;
    const COLUMNS: &'static [ColumnDef] = &[
        ColumnDef::text("SNP"),
        ColumnDef::text("Predicted Volume"),
        ColumnDef::float("GWAS beta"),
        ColumnDef::float("GWAS p"),
        ColumnDef::float("GWAS p(FDR)"),
        ColumnDef::float("GWAS p(Bonf)"),
    ];
    const THRESHOLD_COLUMNS: &'static [&'static str] = &["GWAS p", "GWAS p(FDR)", "GWAS p(Bonf)"];

    fn cell(&self, column: usize) -> Value<'_> {
        match column {
            0 => Value::Text(&self.snp),
            1 => Value::Text(&self.phenotype),
            2 => Value::from_optional_float(self.beta),
            3 => Value::from_optional_float(self.pvalue),
            4 => Value::from_optional_float(self.fdr),
            5 => Value::from_optional_float(self.bonferroni),
            _ => Value::Null,
        }
    }
}

/// Gene-level TWAS result (one row per JTI gene model and phenotype)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneAssociation {
    /// Gene symbol
    #[serde(rename = "Gene")]
    pub gene: String,

    /// Brain region of the JTI expression model
    #[serde(rename = "gr-Expression Site")]
    pub region: String,

    #[serde(rename = "Predicted Volume")]
    pub phenotype: String,

    #[serde(rename = "TWAS beta", deserialize_with = "optional_stat")]
    pub beta: Option<f64>,

    #[serde(rename = "TWAS p", deserialize_with = "optional_stat")]
    pub pvalue: Option<f64>,

    #[serde(rename = "TWAS p(FDR)", deserialize_with = "optional_stat")]
    pub fdr: Option<f64>,

    #[serde(rename = "TWAS p(Bonf)", deserialize_with = "optional_stat")]
    pub bonferroni: Option<f64>,
}

impl Record for GeneAssociation {
    const TABLE: TableName = TableName::GeneAssociation;
    const COLUMNS: &'static [ColumnDef] = &[
        ColumnDef::text("Gene"),
        ColumnDef::text("gr-Expression Site"),
        ColumnDef::text("Predicted Volume"),
        ColumnDef::float("TWAS beta"),
        ColumnDef::float("TWAS p"),
        ColumnDef::float("TWAS p(FDR)"),
        ColumnDef::float("TWAS p(Bonf)"),
    ];
    const THRESHOLD_COLUMNS: &'static [&'static str] = &["TWAS p", "TWAS p(FDR)", "TWAS p(Bonf)"];

    fn cell(&self, column: usize) -> Value<'_> {
        match column {
            0 => Value::Text(&self.gene),
            1 => Value::Text(&self.region),
            2 => Value::Text(&self.phenotype),
            3 => Value::from_optional_float(self.beta),
            4 => Value::from_optional_float(self.pvalue),
            5 => Value::from_optional_float(self.fdr),
            6 => Value::from_optional_float(self.bonferroni),
            _ => Value::Null,
        }
    }
}

/// BioVU clinical association (one row per gene, tissue and phecode)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClinicalAssociation {
    #[serde(rename = "sym")]
    pub gene: String,

    /// JTI gene model tissue
    pub tissue: String,

    pub phecode: String,

    /// Phenotype label, "<phecode>: <name>" once loaded
    pub phename: String,

    /// TWAS FDR in the BioVU (PDX) cohort
    #[serde(rename = "FDR_PDX", deserialize_with = "optional_stat")]
    pub fdr_pdx: Option<f64>,

    /// Volume phenotype the association cross-validates
    pub volume: String,

    /// TWAS FDR in the UK Biobank cohort
    #[serde(rename = "FDR_UKB", deserialize_with = "optional_stat")]
    pub fdr_ukb: Option<f64>,
}

impl Record for ClinicalAssociation {
    const TABLE: TableName = TableName::ClinicalAssociation;
    const COLUMNS: &'static [ColumnDef] = &[
        ColumnDef::text("sym"),
        ColumnDef::text("tissue"),
        ColumnDef::text("phecode"),
        ColumnDef::text("phename"),
        ColumnDef::float("FDR_PDX"),
        ColumnDef::text("volume"),
        ColumnDef::float("FDR_UKB"),
    ];

    fn cell(&self, column: usize) -> Value<'_> {
        match column {
            0 => Value::Text(&self.gene),
            1 => Value::Text(&self.tissue),
            2 => Value::Text(&self.phecode),
            3 => Value::Text(&self.phename),
            4 => Value::from_optional_float(self.fdr_pdx),
            5 => Value::Text(&self.volume),
            6 => Value::from_optional_float(self.fdr_ukb),
            _ => Value::Null,
        }
    }

    fn finalize(&mut self) {
        let prefix = format!("{}: ", self.phecode);
        if !self.phename.starts_with(&prefix) {
            self.phename = phenotype_label(&self.phecode, &self.phename);
        }
    }
}

/// One JTI link between a gene, a region model and a variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantGeneLink {
    pub symbol: String,
    pub region: String,
    pub snp: String,
}

impl Record for VariantGeneLink {
    const TABLE: TableName = TableName::VariantGeneMap;
    const COLUMNS: &'static [ColumnDef] = &[
        ColumnDef::text("symbol"),
        ColumnDef::text("region"),
        ColumnDef::text("snp"),
    ];

    fn cell(&self, column: usize) -> Value<'_> {
        match column {
            0 => Value::Text(&self.symbol),
            1 => Value::Text(&self.region),
            2 => Value::Text(&self.snp),
            _ => Value::Null,
        }
    }
}

/// Gene symbol to Ensembl gene identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneExternalId {
    #[serde(rename = "sym")]
    pub symbol: String,

    #[serde(rename = "ens")]
    pub ensembl_id: String,
}

impl Record for GeneExternalId {
    const TABLE: TableName = TableName::GeneExternalIdMap;
    const COLUMNS: &'static [ColumnDef] = &[ColumnDef::text("sym"), ColumnDef::text("ens")];

    fn cell(&self, column: usize) -> Value<'_> {
        match column {
            0 => Value::Text(&self.symbol),
            1 => Value::Text(&self.ensembl_id),
            _ => Value::Null,
        }
    }
}

/// Display label for a BioVU phenotype
pub fn phenotype_label(phecode: &str, phename: &str) -> String {
    format!("{}: {}", phecode, phename)
}

/// Reads an optional statistic; blank, NA and NaN cells become `None`.
fn optional_stat<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    let Some(raw) = raw else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("na") {
        return Ok(None);
    }
    let value: f64 = trimmed
        .parse()
        .map_err(|_| serde::de::Error::custom(format!("invalid numeric value '{}'", trimmed)))?;
    Ok(if value.is_nan() { None } else { Some(value) })
}
