use std::path::Path;

/// Known SIMD-level filename suffixes, in priority order. Longer patterns
/// must come before shorter overlapping ones (`avx_512f` before `avx`,
/// `sse4_2` before `sse2`) or the shorter pattern would win incorrectly.
const SIMD_PATTERNS: [&str; 8] = [
    "avx_512f", "avx512f", "avx2", "avx", "sse4_2", "sse42", "sse2", "scalar",
];

fn simd_display(level: &str) -> String {
    match level {
        "avx_512f" | "avx512f" => "AVX-512F".to_string(),
        "avx2" => "AVX2".to_string(),
        "avx" => "AVX".to_string(),
        "sse4_2" | "sse42" => "SSE4.2".to_string(),
        "sse2" => "SSE2".to_string(),
        "scalar" => "Scalar".to_string(),
        other => other.to_uppercase(),
    }
}

fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Infer a human-readable "CPU (SIMD level)" label from a results filename.
///
/// `results_amd_ryzen_9_9950x3d_avx_512f.csv` becomes
/// `AMD RYZEN 9 9950X3D (AVX-512F)`. Filenames with no recognizable SIMD
/// suffix fall back to the title-cased stem, e.g. `custom_run.csv` becomes
/// `Custom Run`.
pub fn infer_label(filepath: &str) -> String {
    let stem = Path::new(filepath)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filepath);
    let stem = stem.strip_prefix("results_").unwrap_or(stem);

    let parts: Vec<&str> = stem.split('_').collect();

    // Scan for the position where the SIMD-level suffix starts.
    for i in 0..parts.len() {
        let remaining = parts[i..].join("_");
        if SIMD_PATTERNS.iter().any(|p| remaining.starts_with(p)) {
            let cpu_name = parts[..i].join(" ").to_uppercase();
            return format!("{} ({})", cpu_name, simd_display(&remaining));
        }
    }

    title_case(&stem.replace('_', " "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_simd_suffix_with_cpu_name() {
        assert_eq!(
            infer_label("results_amd_ryzen_9_9950x3d_avx_512f.csv"),
            "AMD RYZEN 9 9950X3D (AVX-512F)"
        );
        assert_eq!(
            infer_label("results_intel_xeon_e5_2680_v4_avx2.csv"),
            "INTEL XEON E5 2680 V4 (AVX2)"
        );
        assert_eq!(infer_label("results_m1_scalar.csv"), "M1 (Scalar)");
    }

    #[test]
    fn test_pattern_priority_order() {
        // avx_512f must not be misread as plain AVX.
        assert_eq!(infer_label("box_avx_512f.csv"), "BOX (AVX-512F)");
        // avx2 must not be misread as AVX either.
        assert_eq!(infer_label("box_avx2.csv"), "BOX (AVX2)");
        assert_eq!(infer_label("box_avx.csv"), "BOX (AVX)");
        assert_eq!(infer_label("box_sse4_2.csv"), "BOX (SSE4.2)");
        assert_eq!(infer_label("box_sse2.csv"), "BOX (SSE2)");
    }

    #[test]
    fn test_unrecognized_suffix_uppercased() {
        // Suffix starts with a known pattern but is not in the display
        // table, so it falls back to the upper-cased literal.
        assert_eq!(infer_label("box_avx2_run3.csv"), "BOX (AVX2_RUN3)");
    }

    #[test]
    fn test_no_simd_suffix_falls_back_to_title_case() {
        assert_eq!(infer_label("custom_run.csv"), "Custom Run");
        assert_eq!(infer_label("my_benchmark_data.csv"), "My Benchmark Data");
    }

    #[test]
    fn test_prefix_stripped_only_once() {
        assert_eq!(infer_label("results_custom_run.csv"), "Custom Run");
        // Directory components are ignored; only the stem matters.
        assert_eq!(
            infer_label("bench/data/results_custom_run.csv"),
            "Custom Run"
        );
    }

    proptest! {
        #[test]
        fn infer_label_is_total_and_deterministic(stem in "[a-z0-9_]{0,40}") {
            let path = format!("{}.csv", stem);
            let first = infer_label(&path);
            let second = infer_label(&path);
            prop_assert_eq!(first, second);
        }
    }
}
