// ==============================================================================
// association_csv.rs - Association Table CSV Parser
// ==============================================================================
// Description: Reads GWAS/TWAS/BioVU/JTI map CSV sources into typed records
// Author: Association Browser Maintainers
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================
// Format: CSV file with header; columns are matched by name, extra columns
// are ignored. Sources ending in ".gz" are gzip-decompressed on the fly.
// Example (jti_gene2snp.csv):
//   symbol,region,snp
//   NRGN,DLPFC,rs12807809
//   NRGN,Caudate,rs12807809
// ==============================================================================

use csv::{ReaderBuilder, Trim};
use flate2::read::MultiGzDecoder;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use crate::error::LoadError;
use crate::table::Record;

/// CSV reader for the fixed-schema association records
pub struct AssociationCsvParser;

impl AssociationCsvParser {
    /// Parse every row of a CSV source file into `T`
    ///
    /// # Arguments
    /// * `path` - Source file (`.csv` or `.csv.gz`)
    ///
    /// # Returns
    /// * `Ok(Vec<T>)` - Rows in file order, each passed through `Record::finalize`
    /// * `Err(LoadError)` - Unreadable file, missing column or malformed row
    pub fn parse_file<T: Record>(path: impl AsRef<Path>) -> Result<Vec<T>, LoadError> {
        Self::load_file(path).map(|parsed| parsed.rows)
    }

    /// Parse a source file and fingerprint it in the same pass.
    ///
    /// The SHA-256 covers the raw file bytes (compressed bytes for `.gz`
    /// sources), hashed as the parser reads them.
    pub fn load_file<T: Record>(path: impl AsRef<Path>) -> Result<ParsedSource<T>, LoadError> {
        let path = path.as_ref();
        let source_name = source_name(path);
        let io_error = |source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        };

        let mut input = DigestReader::new(File::open(path).map_err(io_error)?);
        let rows = if is_gzipped(path) {
            Self::parse_reader(MultiGzDecoder::new(BufReader::new(&mut input)), &source_name)?
        } else {
            Self::parse_reader(BufReader::new(&mut input), &source_name)?
        };
        let sha256 = input.finish().map_err(io_error)?;

        Ok(ParsedSource { rows, sha256 })
    }

    /// Parse CSV text from any reader; `source_name` labels errors.
    pub fn parse_reader<T: Record, R: Read>(input: R, source_name: &str) -> Result<Vec<T>, LoadError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .from_reader(input);

        let headers = reader
            .headers()
            .map_err(|error| LoadError::Csv {
                source_name: source_name.to_string(),
                error,
            })?
            .clone();

        // Fail on the first declared column the header lacks
        for column in T::COLUMNS {
            if !headers.iter().any(|h| h == column.name) {
                return Err(LoadError::MissingColumn {
                    source_name: source_name.to_string(),
                    column: column.name,
                });
            }
        }

        let mut rows = Vec::new();
        for (idx, result) in reader.deserialize::<T>().enumerate() {
            let mut row = result.map_err(|e| LoadError::Parse {
                source_name: source_name.to_string(),
                row: idx + 1,
                details: e.to_string(),
            })?;
            row.finalize();
            rows.push(row);
        }

        Ok(rows)
    }
}

/// Rows of one source plus the SHA-256 of the bytes they were read from
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedSource<T> {
    pub rows: Vec<T>,
    pub sha256: String,
}

/// Passes bytes through unchanged while feeding them to SHA-256
struct DigestReader<R> {
    inner: R,
    hasher: Sha256,
}

impl<R: Read> DigestReader<R> {
    fn new(inner: R) -> Self {
        Self {
            inner,
            hasher: Sha256::new(),
        }
    }

    /// Hash whatever the consumer left unread and return the hex digest
    fn finish(mut self) -> io::Result<String> {
        io::copy(&mut self, &mut io::sink())?;
        Ok(format!("{:x}", self.hasher.finalize()))
    }
}

impl<R: Read> Read for DigestReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.hasher.update(&buf[..n]);
        Ok(n)
    }
}

fn is_gzipped(path: &Path) -> bool {
    path.extension().map_or(false, |ext| ext.eq_ignore_ascii_case("gz"))
}

fn source_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
