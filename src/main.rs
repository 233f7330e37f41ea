// ==============================================================================
// main.rs - Association Browser Entry Point
// ==============================================================================
// Description: Command line front end printing dashboard views as JSON
// Author: Association Browser Maintainers
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use association_browser::config::{SourcePaths, DEFAULT_DATA_DIR};
use association_browser::limits::QueryLimits;
use association_browser::query::SortKey;
use association_browser::state::AssociationBrowser;
use association_browser::views::{BrowseRequest, GenePageRequest, TableRequest};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding the five association CSV files
    #[arg(short, long, env = "ASSOCIATION_DATA_DIR", default_value = DEFAULT_DATA_DIR)]
    data_dir: PathBuf,

    /// Upper bound on requested page sizes
    #[arg(long, default_value_t = 500)]
    max_page_size: usize,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List gene symbols with TWAS results
    Genes,
    /// Full gene summary: header, JTI counts, GWAS, TWAS and clinical tables
    Gene {
        gene: String,
    },
    /// TWAS rows of one gene
    Twas {
        gene: String,
        #[command(flatten)]
        table: TableArgs,
    },
    /// GWAS rows of the variants mapped to one gene
    Gwas {
        gene: String,
        #[command(flatten)]
        table: TableArgs,
    },
    /// BioVU clinical rows of one gene
    Clinical {
        gene: String,
    },
    /// JTI SNP counts per region for one gene
    Jti {
        gene: String,
    },
    /// Whole TWAS table with optional selections
    Browse {
        /// Phenotype (predicted volume) to keep; repeatable
        #[arg(long = "phenotype")]
        phenotypes: Vec<String>,
        /// JTI gene model (expression site) to keep; repeatable
        #[arg(long = "gene-model")]
        gene_models: Vec<String>,
        /// Gene symbol to keep; repeatable
        #[arg(long = "gene")]
        genes: Vec<String>,
        #[command(flatten)]
        table: TableArgs,
    },
    /// Provenance of the loaded source files
    Sources,
}

#[derive(ClapArgs, Debug)]
struct TableArgs {
    /// Zero-based page index
    #[arg(long, default_value_t = 0)]
    page: usize,

    #[arg(long)]
    page_size: Option<usize>,

    /// Sort key as COLUMN or COLUMN:asc|desc; repeatable, applied in order
    #[arg(long = "sort", value_parser = parse_sort_key)]
    sort_by: Vec<SortKey>,

    /// p-value column for the threshold filter
    #[arg(long)]
    pvalue_column: Option<String>,

    /// Keep rows whose p-value column is below this value
    #[arg(long)]
    pvalue_threshold: Option<f64>,
}

impl From<TableArgs> for TableRequest {
    fn from(args: TableArgs) -> Self {
        TableRequest {
            page_current: args.page,
            page_size: args.page_size,
            sort_by: args.sort_by,
            pvalue_column: args.pvalue_column,
            pvalue_threshold: args.pvalue_threshold,
        }
    }
}

fn parse_sort_key(raw: &str) -> Result<SortKey, String> {
    match raw.rsplit_once(':') {
        Some((column, "asc")) => Ok(SortKey::asc(column)),
        Some((column, "desc")) => Ok(SortKey::desc(column)),
        _ if raw.trim().is_empty() => Err("sort column must not be empty".to_string()),
        _ => Ok(SortKey::asc(raw)),
    }
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing; logs go to stderr so stdout stays valid JSON
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "association_browser=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    info!("Association browser starting (data dir {:?})", args.data_dir);

    let limits = QueryLimits {
        max_page_size: args.max_page_size,
        ..QueryLimits::default()
    };
    let paths = SourcePaths::from_data_dir(&args.data_dir);
    let browser = AssociationBrowser::load(&paths, limits)
        .with_context(|| format!("Failed to load sources from {:?}", args.data_dir))?;

    let pretty = args.pretty;
    match args.command {
        Command::Genes => print_json(&browser.gene_options(), pretty)?,
        Command::Gene { gene } => {
            let request = GenePageRequest {
                gene: Some(gene),
                ..GenePageRequest::default()
            };
            print_json(&browser.gene_page(&request)?, pretty)?;
        }
        Command::Twas { gene, table } => {
            print_json(&browser.twas(Some(&gene), &table.into())?, pretty)?;
        }
        Command::Gwas { gene, table } => {
            print_json(&browser.gwas(Some(&gene), &table.into())?, pretty)?;
        }
        Command::Clinical { gene } => print_json(&browser.clinical(Some(&gene))?, pretty)?,
        Command::Jti { gene } => print_json(&browser.jti_counts(Some(&gene)), pretty)?,
        Command::Browse {
            phenotypes,
            gene_models,
            genes,
            table,
        } => {
            let request = BrowseRequest {
                phenotypes,
                gene_models,
                genes,
                table: table.into(),
            };
            print_json(&browser.browse(&request)?, pretty)?;
        }
        Command::Sources => print_json(&browser.store().sources(), pretty)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sort_key() {
        assert_eq!(parse_sort_key("TWAS p").unwrap(), SortKey::asc("TWAS p"));
        assert_eq!(parse_sort_key("TWAS beta:desc").unwrap(), SortKey::desc("TWAS beta"));
        assert_eq!(parse_sort_key("GWAS p(FDR):asc").unwrap(), SortKey::asc("GWAS p(FDR)"));
        assert!(parse_sort_key(" ").is_err());
    }

    #[test]
    fn test_cli_parses_browse() {
        let args = Args::try_parse_from([
            "association-browser",
            "--data-dir",
            "/tmp/data",
            "browse",
            "--phenotype",
            "Caudate",
            "--phenotype",
            "Putamen",
            "--sort",
            "TWAS p",
            "--pvalue-column",
            "TWAS p",
            "--pvalue-threshold",
            "0.05",
        ])
        .unwrap();
        assert_eq!(args.data_dir, PathBuf::from("/tmp/data"));
        match args.command {
            Command::Browse { phenotypes, table, .. } => {
                assert_eq!(phenotypes, vec!["Caudate", "Putamen"]);
                let request = TableRequest::from(table);
                assert_eq!(request.sort_by, vec![SortKey::asc("TWAS p")]);
                assert_eq!(request.pvalue_threshold, Some(0.05));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
