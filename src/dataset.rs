//! Loading the "Clustering basic benchmark" data sets.
//!
//! Expected layout on disk:
//!
//! ```text
//! <root>/<category>/<set>.txt
//! <root>/<category>/ground_truth/<set>-gt.txt   (ground truth centers)
//! <root>/<category>/ground_truth/<set>-gt.pa    (ground truth partition)
//! ```
//!
//! Data files are whitespace-separated numeric matrices, one point per line.
//! Partition files carry four header lines followed by one 1-based label per
//! line.

use crate::error::{Error, Result};
use ndarray::Array2;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const GROUND_TRUTH_DIR: &str = "ground_truth";
const PARTITION_HEADER_LINES: usize = 4;

/// Read a whitespace-separated numeric matrix.
///
/// Blank lines are skipped; every other line must have the same number of
/// columns.
pub fn load_matrix(path: impl AsRef<Path>) -> Result<Array2<f64>> {
    let text = fs::read_to_string(path.as_ref())?;
    let matrix = parse_matrix(&text)?;
    debug!(
        path = %path.as_ref().display(),
        rows = matrix.nrows(),
        cols = matrix.ncols(),
        "loaded benchmark matrix"
    );
    Ok(matrix)
}

fn parse_matrix(text: &str) -> Result<Array2<f64>> {
    let mut flat = Vec::new();
    let mut cols = None;
    let mut rows = 0;

    for (idx, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let start = flat.len();
        for token in line.split_whitespace() {
            let value = token.parse::<f64>().map_err(|e| Error::Parse {
                line: idx + 1,
                message: format!("'{token}': {e}"),
            })?;
            flat.push(value);
        }
        let found = flat.len() - start;
        match cols {
            None => cols = Some(found),
            Some(expected) if expected != found => {
                return Err(Error::Parse {
                    line: idx + 1,
                    message: format!("expected {expected} columns, found {found}"),
                });
            }
            Some(_) => {}
        }
        rows += 1;
    }

    let cols = cols.ok_or(Error::EmptyInput)?;
    Array2::from_shape_vec((rows, cols), flat)
        .map_err(|e| Error::shape(format!("{rows} x {cols}"), e))
}

/// Scale the whole matrix into [0, 1]: `(X - min X) / (max X - min X)`.
///
/// A constant matrix becomes all zeros.
pub fn min_max_normalize(data: &mut Array2<f64>) {
    let min = data.iter().copied().fold(f64::INFINITY, f64::min);
    let max = data.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    if range > 0.0 {
        data.mapv_inplace(|x| (x - min) / range);
    } else {
        data.fill(0.0);
    }
}

/// Read a ground-truth partition file, returning 0-based labels.
pub fn load_partitions(path: impl AsRef<Path>) -> Result<Vec<usize>> {
    let text = fs::read_to_string(path.as_ref())?;
    parse_partitions(&text)
}

fn parse_partitions(text: &str) -> Result<Vec<usize>> {
    text.lines()
        .enumerate()
        .skip(PARTITION_HEADER_LINES)
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            let label = line.trim().parse::<usize>().map_err(|e| Error::Parse {
                line: idx + 1,
                message: e.to_string(),
            })?;
            label.checked_sub(1).ok_or_else(|| Error::Parse {
                line: idx + 1,
                message: "partition labels start at 1".to_string(),
            })
        })
        .collect()
}

/// Path conventions of a benchmark directory tree.
#[derive(Debug, Clone)]
pub struct BenchmarkLayout {
    root: PathBuf,
}

impl BenchmarkLayout {
    /// Layout rooted at the benchmark directory `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Benchmark root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the data sets of `category`.
    pub fn category_dir(&self, category: &str) -> PathBuf {
        self.root.join(category)
    }

    /// Data set files of `category`, sorted, excluding the ground truth.
    pub fn sets_in_category(&self, category: &str) -> Result<Vec<PathBuf>> {
        let mut sets = Vec::new();
        for entry in fs::read_dir(self.category_dir(category))? {
            let path = entry?.path();
            if path.file_name().is_some_and(|name| name == GROUND_TRUTH_DIR) {
                continue;
            }
            sets.push(path);
        }
        sets.sort();
        Ok(sets)
    }

    /// Ground truth centers file for the data set at `set_path`.
    pub fn ground_truth_path(&self, set_path: &Path) -> Result<PathBuf> {
        self.ground_truth_file(set_path, "-gt.txt")
    }

    /// Ground truth partition file for the data set at `set_path`.
    pub fn partitions_path(&self, set_path: &Path) -> Result<PathBuf> {
        self.ground_truth_file(set_path, "-gt.pa")
    }

    fn ground_truth_file(&self, set_path: &Path, suffix: &str) -> Result<PathBuf> {
        let category = set_path
            .parent()
            .and_then(Path::file_name)
            .ok_or_else(|| Error::Io(format!("{} has no category", set_path.display())))?;
        let stem = set_path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| Error::Io(format!("{} has no file name", set_path.display())))?;
        let stem = stem.split('.').next().unwrap_or(stem);

        Ok(self
            .root
            .join(category)
            .join(GROUND_TRUTH_DIR)
            .join(format!("{stem}{suffix}")))
    }

    /// Load the data set at `set_path`, optionally min-max normalized.
    pub fn load_data(&self, set_path: &Path, normalize: bool) -> Result<Array2<f64>> {
        let mut data = load_matrix(set_path)?;
        if normalize {
            min_max_normalize(&mut data);
        }
        Ok(data)
    }

    /// Load the ground truth centers of the data set at `set_path`.
    pub fn load_ground_truth(&self, set_path: &Path, normalize: bool) -> Result<Array2<f64>> {
        let mut centers = load_matrix(self.ground_truth_path(set_path)?)?;
        if normalize {
            min_max_normalize(&mut centers);
        }
        Ok(centers)
    }

    /// Load the ground truth partition of the data set at `set_path`.
    pub fn load_ground_truth_partitions(&self, set_path: &Path) -> Result<Vec<usize>> {
        load_partitions(self.partitions_path(set_path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use tempfile::tempdir;

    #[test]
    fn test_parse_matrix() {
        let m = parse_matrix("  1 2\n\n3   4.5\n-1e2 0\n").unwrap();
        assert_eq!(m, array![[1.0, 2.0], [3.0, 4.5], [-100.0, 0.0]]);
    }

    #[test]
    fn test_parse_matrix_ragged() {
        match parse_matrix("1 2\n3\n") {
            Err(Error::Parse { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_matrix_empty() {
        assert_eq!(parse_matrix("\n  \n"), Err(Error::EmptyInput));
    }

    #[test]
    fn test_min_max_normalize() {
        let mut m = array![[2.0, 4.0], [6.0, 10.0]];
        min_max_normalize(&mut m);
        assert_eq!(m, array![[0.0, 0.25], [0.5, 1.0]]);

        let mut flat = array![[3.0, 3.0]];
        min_max_normalize(&mut flat);
        assert_eq!(flat, array![[0.0, 0.0]]);
    }

    #[test]
    fn test_parse_partitions() {
        let text = "header\n--\nk 2\n----\n1\n2\n2\n";
        assert_eq!(parse_partitions(text).unwrap(), vec![0, 1, 1]);

        match parse_partitions("a\nb\nc\nd\n1\n0\n") {
            Err(Error::Parse { line, .. }) => assert_eq!(line, 6),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_layout_round_trip() {
        let dir = tempdir().unwrap();
        let category = dir.path().join("g2");
        fs::create_dir_all(category.join(GROUND_TRUTH_DIR)).unwrap();
        fs::write(category.join("g2-2-10.txt"), "0 10\n10 20\n20 30\n").unwrap();
        fs::write(
            category.join(GROUND_TRUTH_DIR).join("g2-2-10-gt.txt"),
            "0 10\n20 30\n",
        )
        .unwrap();
        fs::write(
            category.join(GROUND_TRUTH_DIR).join("g2-2-10-gt.pa"),
            "VQ\npartition\n\n-----\n1\n1\n2\n",
        )
        .unwrap();

        let layout = BenchmarkLayout::new(dir.path());
        let sets = layout.sets_in_category("g2").unwrap();
        assert_eq!(sets, vec![category.join("g2-2-10.txt")]);

        let data = layout.load_data(&sets[0], true).unwrap();
        assert_eq!(data.dim(), (3, 2));
        assert_eq!(data[[0, 0]], 0.0);
        assert_eq!(data[[2, 1]], 1.0);

        let centers = layout.load_ground_truth(&sets[0], false).unwrap();
        assert_eq!(centers, array![[0.0, 10.0], [20.0, 30.0]]);

        let labels = layout.load_ground_truth_partitions(&sets[0]).unwrap();
        assert_eq!(labels, vec![0, 0, 1]);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let result = load_matrix(dir.path().join("missing.txt"));
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
