use crate::label::infer_label;
use crate::record::{read_benchmark_csv, BenchmarkRecord};
use anyhow::Result;
use std::path::Path;

/// One input specification from the command line: a bare path, or a
/// `path:label` pair with an explicit display label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSpec {
    pub path: String,
    pub label: Option<String>,
}

impl InputSpec {
    /// Split a spec once on the first `:`; everything after it is the label.
    pub fn parse(spec: &str) -> Self {
        match spec.split_once(':') {
            Some((path, label)) => Self {
                path: path.to_string(),
                label: Some(label.to_string()),
            },
            None => Self {
                path: spec.to_string(),
                label: None,
            },
        }
    }

    /// Explicit label if one was given, otherwise inferred from the path.
    pub fn resolved_label(&self) -> String {
        self.label
            .clone()
            .unwrap_or_else(|| infer_label(&self.path))
    }
}

/// Ordered mapping from display label to parsed benchmark record.
///
/// Insertion order is preserved, but the chart renderer re-sorts by
/// performance before drawing, so only that final order is observable in
/// the output.
#[derive(Debug, Default)]
pub struct DatasetCollection {
    entries: Vec<(String, BenchmarkRecord)>,
}

impl DatasetCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record under `label`. A duplicate label replaces the
    /// earlier record in place (last-write-wins).
    pub fn insert(&mut self, label: String, record: BenchmarkRecord) {
        match self.entries.iter_mut().find(|(l, _)| *l == label) {
            Some(entry) => entry.1 = record,
            None => self.entries.push((label, record)),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, label: &str) -> Option<&BenchmarkRecord> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, r)| r)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BenchmarkRecord)> {
        self.entries.iter().map(|(l, r)| (l.as_str(), r))
    }
}

/// Resolve each input specification, parse its CSV file, and build the
/// ordered collection. Prints a progress line per file.
pub fn collect_datasets(specs: &[String]) -> Result<DatasetCollection> {
    let mut datasets = DatasetCollection::new();

    for raw in specs {
        let spec = InputSpec::parse(raw);
        let label = spec.resolved_label();

        println!("Reading {} (label: {})...", spec.path, label);
        let record = read_benchmark_csv(Path::new(&spec.path))?;
        println!("  - SIMD level: {}", record.simd_level);
        println!("  - Data points: {}", record.len());
        println!("  - Statistical trials per size (10 trials with median, stddev, p99)");

        datasets.insert(label, record);
    }

    Ok(datasets)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_with_median(median: f64) -> BenchmarkRecord {
        BenchmarkRecord {
            array_sizes: vec![1000],
            median_ms: vec![median],
            mean_ms: vec![median],
            stddev_ms: vec![0.0],
            min_ms: vec![median],
            max_ms: vec![median],
            p99_ms: vec![median],
            gflops: vec![1.0],
            simd_level: "avx2".to_string(),
        }
    }

    #[test]
    fn test_spec_without_label() {
        let spec = InputSpec::parse("results_box_avx2.csv");
        assert_eq!(spec.path, "results_box_avx2.csv");
        assert_eq!(spec.label, None);
        assert_eq!(spec.resolved_label(), "BOX (AVX2)");
    }

    #[test]
    fn test_explicit_label_overrides_inference() {
        // The path would infer to "BOX (AVX2)", but the explicit label wins.
        let spec = InputSpec::parse("results_box_avx2.csv:My Machine");
        assert_eq!(spec.path, "results_box_avx2.csv");
        assert_eq!(spec.resolved_label(), "My Machine");
    }

    #[test]
    fn test_split_on_first_separator_only() {
        let spec = InputSpec::parse("data.csv:Ryzen 9: tuned");
        assert_eq!(spec.path, "data.csv");
        assert_eq!(spec.resolved_label(), "Ryzen 9: tuned");
    }

    #[test]
    fn test_duplicate_label_last_write_wins() {
        let mut datasets = DatasetCollection::new();
        datasets.insert("A".to_string(), record_with_median(1.0));
        datasets.insert("B".to_string(), record_with_median(2.0));
        datasets.insert("A".to_string(), record_with_median(3.0));

        assert_eq!(datasets.len(), 2);
        assert_eq!(datasets.get("A").unwrap().median_ms[0], 3.0);
        assert_eq!(datasets.get("B").unwrap().median_ms[0], 2.0);
    }
}
