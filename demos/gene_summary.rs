// ==============================================================================
// gene_summary.rs - Example of a Gene Summary Query
// ==============================================================================
// Description: Loads a tiny association dataset and prints the NRGN gene page
// Author: Association Browser Maintainers
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================

use association_browser::config::SourcePaths;
use association_browser::limits::QueryLimits;
use association_browser::query::SortKey;
use association_browser::state::AssociationBrowser;
use association_browser::views::{GenePageRequest, TableRequest};
use std::fs;
use tempfile::tempdir;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Gene Summary Example ===\n");

    // Write sample sources into a temporary data directory
    let dir = tempdir()?;
    fs::write(
        dir.path().join("gwas_ukb_volume.csv"),
        "SNP,Predicted Volume,GWAS beta,GWAS p,GWAS p(FDR),GWAS p(Bonf)\n\
         rs12807809,Hippocampus,0.021,3.2e-6,4.1e-4,0.03\n\
         rs7113041,Putamen,-0.012,0.018,0.21,1.0\n\
         rs55661361,Caudate,0.004,0.62,0.91,1.0\n",
    )?;
    fs::write(
        dir.path().join("twas_ukb_volume.csv"),
        "Gene,gr-Expression Site,Predicted Volume,TWAS beta,TWAS p,TWAS p(FDR),TWAS p(Bonf)\n\
         NRGN,DLPFC,Hippocampus,0.034,1.1e-7,2.0e-5,0.001\n\
         NRGN,Caudate,Putamen,-0.019,0.004,0.08,0.9\n\
         NRGN,Cerebellum,Amygdala,0.002,0.71,0.95,1.0\n\
         GRIN2A,Hippocampus,Hippocampus,0.011,0.03,0.4,1.0\n",
    )?;
    fs::write(
        dir.path().join("biovu_ukb_volume.csv"),
        "sym,tissue,phecode,phename,FDR_PDX,volume,FDR_UKB\n\
         NRGN,DLPFC,295.1,Schizophrenia,0.004,Hippocampus,2.0e-5\n\
         NRGN,Caudate,296.22,Major depressive disorder,0.04,Putamen,0.08\n",
    )?;
    fs::write(
        dir.path().join("jti_gene2snp.csv"),
        "symbol,region,snp\n\
         NRGN,DLPFC,rs12807809\n\
         NRGN,DLPFC,rs7113041\n\
         NRGN,Caudate,rs12807809\n",
    )?;
    fs::write(
        dir.path().join("jti_ens2gene.csv"),
        "sym,ens\nNRGN,ENSG00000154146\nGRIN2A,ENSG00000183454\n",
    )?;

    let browser = AssociationBrowser::load(&SourcePaths::from_data_dir(dir.path()), QueryLimits::default())?;
    println!("Genes: {:?}\n", browser.gene_options());

    let request = GenePageRequest {
        gene: Some("NRGN".to_string()),
        gwas: TableRequest {
            sort_by: vec![SortKey::asc("GWAS p")],
            ..TableRequest::default()
        },
        twas: TableRequest {
            sort_by: vec![SortKey::asc("TWAS p")],
            pvalue_column: Some("TWAS p".to_string()),
            pvalue_threshold: Some(0.05),
            ..TableRequest::default()
        },
    };
    let page = browser.gene_page(&request)?;

    if let Some(header) = &page.header {
        println!("{} {}\n", header.symbol, header.label);
    }

    println!("--- JTI SNPs per region ---");
    for count in &page.jti_counts {
        println!("{:<16} {:>4}", count.region, count.num_snps);
    }

    println!("\n--- {} ---", page.gwas.headline);
    for row in &page.gwas.rows {
        println!("{:<12} {:<12} {:>10.3e}", row.snp, row.phenotype, row.pvalue.unwrap_or(f64::NAN));
    }

    println!("\n--- {} ---", page.twas.headline);
    for row in &page.twas.rows {
        println!("{:<12} {:<12} {:>10.3e}", row.region, row.phenotype, row.pvalue.unwrap_or(f64::NAN));
    }

    println!("\n--- {} ---", page.clinical.headline);
    for row in &page.clinical.rows {
        println!("{:<12} {:<36} {}", row.tissue, row.phename, row.volume);
    }

    Ok(())
}
