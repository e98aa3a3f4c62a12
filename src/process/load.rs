use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::LoadConfig;
use crate::error::Result;
use crate::process::reader::TweetCsvReader;
use crate::process::record::OutputRow;
use crate::store;

/// Totals for a successful run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
    pub records: u64,
    pub files: usize,
}

/// Rebuild the store at `output_path` from `input_files`, in order.
///
/// The table and indexes are created first, then every record goes into a
/// single transaction that is committed once at the end. Any error aborts the
/// run; the open transaction is rolled back on drop, so a failed run leaves the
/// store with its empty schema and no rows.
#[tracing::instrument(level = "info", skip_all, fields(output = %output_path.display(), schema = %cfg.schema))]
pub fn load<P: AsRef<Path>>(
    input_files: &[P],
    output_path: &Path,
    cfg: &LoadConfig,
) -> Result<LoadReport> {
    let mut conn = store::create_store(output_path, cfg.schema)?;
    let tx = conn.transaction()?;

    let mut records = 0u64;
    for path in input_files {
        let path = path.as_ref();
        info!(file = %path.display(), "loading");
        let mut reader = TweetCsvReader::open(path, cfg.schema)?;
        let mut in_file = 0u64;
        while let Some(rec) = reader.next_record()? {
            let row = OutputRow::from_input(rec, cfg)?;
            store::insert_row(&tx, cfg.schema, &row)?;
            in_file += 1;
        }
        records += in_file;
        info!(file = %path.display(), records = in_file, "file done");
    }

    tx.commit()?;
    let report = LoadReport {
        records,
        files: input_files.len(),
    };
    info!(
        "{} records from {} files copied to {}",
        report.records,
        report.files,
        output_path.display()
    );
    Ok(report)
}

/// Load-order list `<stem>_1.csv` ..= `<stem>_<count>.csv` under `dir`.
pub fn numbered_inputs(dir: &Path, stem: &str, count: usize) -> Vec<PathBuf> {
    (1..=count)
        .map(|k| dir.join(format!("{stem}_{k}.csv")))
        .collect()
}
