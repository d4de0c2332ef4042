//! Tabular I/O through polars: case manifests in, distance fields and
//! per-case metric rows out (CSV, or Parquet when the path says so).

use anyhow::{bail, Context, Result};
use polars::df;
use polars::prelude::*;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// One row of a batch manifest.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseEntry {
    pub case: String,
    pub reference: PathBuf,
    pub candidate: PathBuf,
}

/// Metric row for one analysed case.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseRow {
    pub case: String,
    pub reference_vertices: u64,
    pub candidate_vertices: u64,
    pub assd: f64,
    pub hd: f64,
    pub complete: bool,
}

/// Read a `case,reference,candidate` CSV. Relative mesh paths resolve against
/// the manifest's directory.
pub fn read_manifest(path: &Path) -> Result<Vec<CaseEntry>> {
    let df = LazyCsvReader::new(path)
        .with_has_header(true)
        .with_infer_schema_length(Some(100))
        .finish()
        .and_then(|lf| lf.collect())
        .with_context(|| format!("reading manifest {}", path.display()))?;
    for required in ["case", "reference", "candidate"] {
        if df.column(required).is_err() {
            bail!("manifest {} lacks a `{required}` column", path.display());
        }
    }
    let base = path.parent().unwrap_or_else(|| Path::new(""));
    let text = |name: &str| -> Result<Vec<Option<String>>> {
        let col = df.column(name)?.cast(&DataType::String)?;
        Ok(col.str()?.into_iter().map(|s| s.map(str::to_owned)).collect())
    };
    let (cases, refs, cands) = (text("case")?, text("reference")?, text("candidate")?);
    let mut out = Vec::with_capacity(df.height());
    for (row, ((case, reference), candidate)) in cases.into_iter().zip(refs).zip(cands).enumerate() {
        match (case, reference, candidate) {
            (Some(case), Some(reference), Some(candidate)) => out.push(CaseEntry {
                case,
                reference: base.join(reference),
                candidate: base.join(candidate),
            }),
            _ => tracing::warn!(row, "manifest row has empty fields; skipping"),
        }
    }
    Ok(out)
}

pub fn cases_frame(rows: &[CaseRow]) -> PolarsResult<DataFrame> {
    let case: Vec<&str> = rows.iter().map(|r| r.case.as_str()).collect();
    let reference_vertices: Vec<u64> = rows.iter().map(|r| r.reference_vertices).collect();
    let candidate_vertices: Vec<u64> = rows.iter().map(|r| r.candidate_vertices).collect();
    let assd: Vec<f64> = rows.iter().map(|r| r.assd).collect();
    let hd: Vec<f64> = rows.iter().map(|r| r.hd).collect();
    let complete: Vec<bool> = rows.iter().map(|r| r.complete).collect();
    df!(
        "case" => case,
        "reference_vertices" => reference_vertices,
        "candidate_vertices" => candidate_vertices,
        "assd" => assd,
        "hd" => hd,
        "complete" => complete
    )
}

pub fn distances_frame(distances: &[f64]) -> PolarsResult<DataFrame> {
    df!("distance" => distances)
}

/// Write `df` as Parquet if `path` ends in `.parquet`, CSV otherwise.
pub fn write_table(path: &Path, df: &mut DataFrame) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let is_parquet = path.extension().is_some_and(|e| e == "parquet");
    if is_parquet {
        ParquetWriter::new(&mut file).finish(df)?;
    } else {
        CsvWriter::new(&mut file).include_header(true).finish(df)?;
    }
    tracing::info!(path = %path.display(), rows = df.height(), "table written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn manifest_paths_resolve_against_manifest_dir() {
        let dir = tempdir().unwrap();
        let manifest = dir.path().join("cases.csv");
        fs::write(
            &manifest,
            "case,reference,candidate\ncase01,gt/01.json,r1/01.json\ncase02,gt/02.json,r1/02.json\n",
        )
        .unwrap();
        let entries = read_manifest(&manifest).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].case, "case02");
        assert_eq!(entries[0].reference, dir.path().join("gt/01.json"));
    }

    #[test]
    fn manifest_without_required_column_fails() {
        let dir = tempdir().unwrap();
        let manifest = dir.path().join("cases.csv");
        fs::write(&manifest, "case,reference\ncase01,a.json\n").unwrap();
        let err = read_manifest(&manifest).unwrap_err();
        assert!(err.to_string().contains("candidate"));
    }

    #[test]
    fn case_rows_round_trip_through_csv() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("results.csv");
        let rows = vec![CaseRow {
            case: "case01".into(),
            reference_vertices: 8,
            candidate_vertices: 8,
            assd: 2.0,
            hd: 2.5,
            complete: true,
        }];
        let mut df = cases_frame(&rows).unwrap();
        write_table(&out, &mut df).unwrap();
        let text = fs::read_to_string(&out).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("case,reference_vertices,candidate_vertices,assd,hd,complete")
        );
        let row = lines.next().unwrap();
        assert!(row.starts_with("case01,8,8,"));
        assert!(row.ends_with(",true"));
    }
}
