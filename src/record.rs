use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Columns every benchmark CSV must carry, in the order they are reported
/// when one is missing.
pub const REQUIRED_COLUMNS: [&str; 9] = [
    "array_size",
    "median_ms",
    "mean_ms",
    "stddev_ms",
    "min_ms",
    "max_ms",
    "p99_ms",
    "gflops",
    "simd_level",
];

/// One parsed benchmark CSV: per-array-size timing statistics plus the
/// SIMD level the benchmark binary was built for.
///
/// All numeric vectors are index-aligned with `array_sizes`: entry `i` of
/// every column belongs to the i-th array size, in file row order.
#[derive(Debug, Clone, Default)]
pub struct BenchmarkRecord {
    pub array_sizes: Vec<u64>,
    pub median_ms: Vec<f64>,
    pub mean_ms: Vec<f64>,
    pub stddev_ms: Vec<f64>,
    pub min_ms: Vec<f64>,
    pub max_ms: Vec<f64>,
    pub p99_ms: Vec<f64>,
    pub gflops: Vec<f64>,
    /// Taken from the first data row; assumed constant for the whole file.
    pub simd_level: String,
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    array_size: u64,
    median_ms: f64,
    mean_ms: f64,
    stddev_ms: f64,
    min_ms: f64,
    max_ms: f64,
    p99_ms: f64,
    gflops: f64,
    simd_level: String,
}

impl BenchmarkRecord {
    /// Number of data points (array sizes) in this record.
    pub fn len(&self) -> usize {
        self.array_sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.array_sizes.is_empty()
    }

    /// Median time (ms) at the last array size in the file. Records are
    /// guaranteed non-empty by `read_benchmark_csv`.
    pub fn last_median_ms(&self) -> f64 {
        self.median_ms.last().copied().unwrap_or(0.0)
    }

    /// GFLOP/s at the last array size in the file.
    pub fn last_gflops(&self) -> f64 {
        self.gflops.last().copied().unwrap_or(0.0)
    }

    fn push(&mut self, row: CsvRow) {
        self.array_sizes.push(row.array_size);
        self.median_ms.push(row.median_ms);
        self.mean_ms.push(row.mean_ms);
        self.stddev_ms.push(row.stddev_ms);
        self.min_ms.push(row.min_ms);
        self.max_ms.push(row.max_ms);
        self.p99_ms.push(row.p99_ms);
        self.gflops.push(row.gflops);
        if self.simd_level.is_empty() {
            self.simd_level = row.simd_level;
        }
    }
}

/// Read one benchmark result file into a [`BenchmarkRecord`].
///
/// Fails wholesale on a missing file, a missing required column, any
/// unparseable value, or a file with no data rows. There are no partial
/// records.
pub fn read_benchmark_csv(path: &Path) -> Result<BenchmarkRecord> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open '{}'", path.display()))?;

    let headers = reader
        .headers()
        .with_context(|| format!("failed to read CSV header in '{}'", path.display()))?
        .clone();

    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            bail!(
                "missing column '{}' in CSV file '{}' (expected columns: {})",
                column,
                path.display(),
                REQUIRED_COLUMNS.join(",")
            );
        }
    }

    let mut record = BenchmarkRecord::default();
    for row in reader.deserialize() {
        let row: CsvRow =
            row.with_context(|| format!("invalid data format in '{}'", path.display()))?;
        record.push(row);
    }

    if record.is_empty() {
        bail!("no data rows in '{}'", path.display());
    }

    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const GOOD_CSV: &str = "\
array_size,median_ms,mean_ms,stddev_ms,min_ms,max_ms,p99_ms,gflops,simd_level
1000,0.001,0.0012,0.0001,0.0009,0.0015,0.0014,1.0,avx2
10000,0.01,0.012,0.001,0.009,0.015,0.014,1.1,avx2
100000,0.1,0.12,0.01,0.09,0.15,0.14,1.2,avx2
";

    fn write_csv(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_well_formed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "results.csv", GOOD_CSV);

        let record = read_benchmark_csv(&path).unwrap();
        assert_eq!(record.len(), 3);
        assert_eq!(record.array_sizes, vec![1000, 10000, 100000]);
        assert_eq!(record.median_ms.len(), 3);
        assert_eq!(record.mean_ms.len(), 3);
        assert_eq!(record.stddev_ms.len(), 3);
        assert_eq!(record.min_ms.len(), 3);
        assert_eq!(record.max_ms.len(), 3);
        assert_eq!(record.p99_ms.len(), 3);
        assert_eq!(record.gflops.len(), 3);
        assert_eq!(record.simd_level, "avx2");
        assert_eq!(record.last_median_ms(), 0.1);
        assert_eq!(record.last_gflops(), 1.2);
    }

    #[test]
    fn test_simd_level_from_first_row() {
        let dir = tempfile::tempdir().unwrap();
        let csv = "\
array_size,median_ms,mean_ms,stddev_ms,min_ms,max_ms,p99_ms,gflops,simd_level
1000,0.1,0.1,0.01,0.09,0.11,0.11,1.0,sse2
2000,0.2,0.2,0.02,0.18,0.22,0.22,1.0,avx2
";
        let path = write_csv(&dir, "mixed.csv", csv);

        let record = read_benchmark_csv(&path).unwrap();
        assert_eq!(record.simd_level, "sse2");
    }

    #[test]
    fn test_missing_file() {
        let err = read_benchmark_csv(Path::new("/no/such/results.csv")).unwrap_err();
        assert!(err.to_string().contains("/no/such/results.csv"));
    }

    #[test]
    fn test_missing_column_names_the_column() {
        let dir = tempfile::tempdir().unwrap();
        // Header with p99_ms dropped.
        let csv = "\
array_size,median_ms,mean_ms,stddev_ms,min_ms,max_ms,gflops,simd_level
1000,0.1,0.1,0.01,0.09,0.11,1.0,avx2
";
        let path = write_csv(&dir, "short.csv", csv);

        let err = read_benchmark_csv(&path).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("p99_ms"), "unexpected error: {}", msg);
        assert!(msg.contains("expected columns"), "unexpected error: {}", msg);
    }

    #[test]
    fn test_unparseable_value_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let csv = "\
array_size,median_ms,mean_ms,stddev_ms,min_ms,max_ms,p99_ms,gflops,simd_level
1000,not-a-number,0.1,0.01,0.09,0.11,0.11,1.0,avx2
";
        let path = write_csv(&dir, "bad.csv", csv);

        let err = read_benchmark_csv(&path).unwrap_err();
        assert!(err.to_string().contains("bad.csv"));
    }

    #[test]
    fn test_header_only_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let csv = "array_size,median_ms,mean_ms,stddev_ms,min_ms,max_ms,p99_ms,gflops,simd_level\n";
        let path = write_csv(&dir, "empty.csv", csv);

        let err = read_benchmark_csv(&path).unwrap_err();
        assert!(err.to_string().contains("no data rows"));
    }
}
