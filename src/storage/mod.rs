//! Results file persistence
//!
//! A results file holds three rows, in this order:
//!
//! 1. the six column names (`Samples,Min,Max,Mean,Median,stdDev`)
//! 2. the six statistics, in the same order
//! 3. every measurement, in acquisition order
//!
//! The reader works by physical row position; header text is never checked
//! and rows after the third are ignored. The csv reader drops blank lines,
//! so they are put back as empty rows: a blank second line is a short
//! statistics row, not a signal to read the statistics from line three.
//! Files written measurements-first by older tools are not recognised.

use crate::error::{AppError, ErrorContext, Result};
use crate::models::{MeasurementSequence, Stats};
use std::path::{Path, PathBuf};

/// Reads and writes one results file
#[derive(Debug, Clone)]
pub struct ResultsRepository {
    path: PathBuf,
}

impl ResultsRepository {
    /// Repository for the file at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the results file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `measurements` and `stats`, replacing any existing file
    pub fn write(&self, measurements: &[f64], stats: &Stats) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_path(&self.path)
            .with_context(|| format!("Failed to create results file {}", self.path.display()))?;

        writer.write_record(Stats::COLUMNS)?;

        let mut stats_row = vec![stats.count.to_string()];
        stats_row.extend(stats.to_row()[1..].iter().map(f64::to_string));
        writer.write_record(&stats_row)?;

        writer.write_record(measurements.iter().map(f64::to_string))?;

        writer
            .flush()
            .with_context(|| format!("Failed to write results file {}", self.path.display()))?;
        Ok(())
    }

    /// Read measurements and statistics back.
    ///
    /// Statistics are returned as stored, not recomputed.
    pub fn read(&self) -> Result<(MeasurementSequence, Stats)> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(&self.path)
            .with_context(|| format!("Failed to open results file {}", self.path.display()))?;

        let mut rows: Vec<csv::StringRecord> = Vec::with_capacity(3);
        for record in reader.records() {
            let record = record.with_context(|| format!("Failed to read {}", self.path.display()))?;
            let line = record
                .position()
                .map_or(rows.len() as u64 + 1, |position| position.line());

            while rows.len() < 3 && (rows.len() as u64) + 1 < line {
                rows.push(csv::StringRecord::new());
            }
            if rows.len() == 3 {
                break;
            }
            rows.push(record);
        }

        if rows.len() < 3 {
            return Err(AppError::format(format!(
                "{} has {} row(s); expected header, statistics and measurements rows",
                self.path.display(),
                rows.len()
            )));
        }

        let stats = parse_stats_row(&rows[1])?;
        let measurements = rows[2]
            .iter()
            .enumerate()
            .map(|(column, token)| parse_value(token, 3, column + 1))
            .collect::<Result<MeasurementSequence>>()?;

        Ok((measurements, stats))
    }
}

fn parse_stats_row(record: &csv::StringRecord) -> Result<Stats> {
    if record.len() != Stats::COLUMNS.len() {
        return Err(AppError::format(format!(
            "Statistics row has {} field(s); expected {}",
            record.len(),
            Stats::COLUMNS.len()
        )));
    }

    let values = record
        .iter()
        .enumerate()
        .map(|(column, token)| parse_value(token, 2, column + 1))
        .collect::<Result<Vec<f64>>>()?;

    // Stored statistics are trusted; only a count no usize can hold is refused
    let count = values[0];
    if !(count.is_finite() && count >= 0.0) {
        return Err(AppError::parse(format!(
            "Sample count '{}' in row 2 is not a non-negative number",
            &record[0]
        )));
    }

    Ok(Stats {
        count: count.round() as usize,
        min: values[1],
        max: values[2],
        mean: values[3],
        median: values[4],
        std_dev: values[5],
    })
}

fn parse_value(token: &str, row: usize, column: usize) -> Result<f64> {
    token.parse::<f64>().map_err(|_| {
        AppError::parse(format!(
            "Value '{}' at row {}, column {} is not a number",
            token, row, column
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::StatisticsEngine;
    use proptest::prelude::*;
    use std::fs;
    use tempfile::TempDir;

    fn repo_in(dir: &TempDir, name: &str) -> ResultsRepository {
        ResultsRepository::new(dir.path().join(name))
    }

    #[test]
    fn test_layout_is_header_stats_measurements() {
        let dir = TempDir::new().unwrap();
        let repo = repo_in(&dir, "run.csv");
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        let stats = StatisticsEngine::compute(&values).unwrap();

        repo.write(&values, &stats).unwrap();

        let content = fs::read_to_string(repo.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Samples,Min,Max,Mean,Median,stdDev");
        assert!(lines[1].starts_with("5,1,5,3,3,1.414"));
        assert_eq!(lines[2], "1,2,3,4,5");
    }

    #[test]
    fn test_round_trip_is_exact() {
        let dir = TempDir::new().unwrap();
        let repo = repo_in(&dir, "run.csv");
        let values = vec![16.683, 33.3671, 0.1, 1e-7, 12345.678901234];
        let stats = StatisticsEngine::compute(&values).unwrap();

        repo.write(&values, &stats).unwrap();
        let (read_values, read_stats) = repo.read().unwrap();

        assert_eq!(read_values, values);
        assert_eq!(read_stats, stats);
    }

    #[test]
    fn test_write_overwrites_existing_file() {
        let dir = TempDir::new().unwrap();
        let repo = repo_in(&dir, "run.csv");
        fs::write(repo.path(), "old,content\n1,2\n3,4\n5,6\n7,8\n").unwrap();

        let stats = StatisticsEngine::compute(&[9.5]).unwrap();
        repo.write(&[9.5], &stats).unwrap();

        let (values, _) = repo.read().unwrap();
        assert_eq!(values, vec![9.5]);
        assert_eq!(fs::read_to_string(repo.path()).unwrap().lines().count(), 3);
    }

    #[test]
    fn test_reads_files_from_other_writers() {
        let dir = TempDir::new().unwrap();
        let repo = repo_in(&dir, "legacy.csv");
        fs::write(
            repo.path(),
            "Samples,Min,Max,Mean,Median,stdDev\r\n3,10.0,30.0,20.0,20.0,8.16496580927726\r\n10.0, 20.0 ,30.0\r\n",
        )
        .unwrap();

        let (values, stats) = repo.read().unwrap();
        assert_eq!(values, vec![10.0, 20.0, 30.0]);
        assert_eq!(stats.count, 3);
        assert_eq!(stats.median, 20.0);
    }

    #[test]
    fn test_float_sample_count_is_accepted() {
        let dir = TempDir::new().unwrap();
        let repo = repo_in(&dir, "run.csv");
        fs::write(repo.path(), "h,h,h,h,h,h\n2.0,1,2,1.5,1.5,0.5\n1,2\n").unwrap();

        let (_, stats) = repo.read().unwrap();
        assert_eq!(stats.count, 2);
    }

    #[test]
    fn test_extra_rows_are_ignored() {
        let dir = TempDir::new().unwrap();
        let repo = repo_in(&dir, "run.csv");
        fs::write(repo.path(), "h\n1,5,5,5,5,0\n5\nnot,numbers,at,all\n").unwrap();

        let (values, stats) = repo.read().unwrap();
        assert_eq!(values, vec![5.0]);
        assert_eq!(stats.count, 1);
    }

    #[test]
    fn test_too_few_rows_is_format_error() {
        let dir = TempDir::new().unwrap();
        let repo = repo_in(&dir, "short.csv");
        fs::write(repo.path(), "Samples,Min,Max,Mean,Median,stdDev\n1,5,5,5,5,0\n").unwrap();

        let error = repo.read().unwrap_err();
        assert!(matches!(error, AppError::Format(_)));
        assert_eq!(error.exit_code(), 3);
    }

    #[test]
    fn test_empty_file_is_format_error() {
        let dir = TempDir::new().unwrap();
        let repo = repo_in(&dir, "empty.csv");
        fs::write(repo.path(), "").unwrap();

        assert!(matches!(repo.read(), Err(AppError::Format(_))));
    }

    #[test]
    fn test_bad_token_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let repo = repo_in(&dir, "bad.csv");
        fs::write(repo.path(), "h\n2,1,2,1.5,1.5,0.5\n1.0,oops\n").unwrap();

        let error = repo.read().unwrap_err();
        assert!(matches!(error, AppError::Parse(_)));
        assert!(error.to_string().contains("'oops' at row 3, column 2"));
    }

    #[test]
    fn test_bad_stats_token_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let repo = repo_in(&dir, "bad.csv");
        fs::write(repo.path(), "h\n2,1,two,1.5,1.5,0.5\n1,2\n").unwrap();

        assert!(matches!(repo.read(), Err(AppError::Parse(_))));
    }

    #[test]
    fn test_short_stats_row_is_format_error() {
        let dir = TempDir::new().unwrap();
        let repo = repo_in(&dir, "bad.csv");
        fs::write(repo.path(), "h\n2,1,2\n1,2\n").unwrap();

        assert!(matches!(repo.read(), Err(AppError::Format(_))));
    }

    #[test]
    fn test_fractional_sample_count_is_rounded() {
        let dir = TempDir::new().unwrap();
        let repo = repo_in(&dir, "odd.csv");
        fs::write(repo.path(), "h\n2.5,1,2,1.5,1.5,0.5\n1,2\n").unwrap();

        let (values, stats) = repo.read().unwrap();
        assert_eq!(stats.count, 3);
        assert_eq!(stats.mean, 1.5);
        assert_eq!(values, vec![1.0, 2.0]);
    }

    #[test]
    fn test_negative_sample_count_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let repo = repo_in(&dir, "bad.csv");
        fs::write(repo.path(), "h\n-1,1,2,1.5,1.5,0.5\n1,2\n").unwrap();

        let error = repo.read().unwrap_err();
        assert!(matches!(error, AppError::Parse(_)));
        assert!(error.to_string().contains("'-1'"));
    }

    #[test]
    fn test_blank_statistics_line_does_not_shift_rows() {
        let dir = TempDir::new().unwrap();
        let repo = repo_in(&dir, "gap.csv");
        fs::write(repo.path(), "h\n\n1,5,5,5,5,0\n5\n").unwrap();

        let error = repo.read().unwrap_err();
        assert!(matches!(error, AppError::Format(_)));
        assert!(error.to_string().contains("0 field(s)"));
    }

    #[test]
    fn test_blank_measurement_line_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        let repo = repo_in(&dir, "gap.csv");
        fs::write(repo.path(), "h\n1,5,5,5,5,0\n\n5\n").unwrap();

        let (values, stats) = repo.read().unwrap();
        assert!(values.is_empty());
        assert_eq!(stats.count, 1);
    }

    #[test]
    fn test_trailing_blank_lines_are_harmless() {
        let dir = TempDir::new().unwrap();
        let repo = repo_in(&dir, "tail.csv");
        fs::write(repo.path(), "h\n1,5,5,5,5,0\n5\n\n\n").unwrap();

        let (values, _) = repo.read().unwrap();
        assert_eq!(values, vec![5.0]);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let repo = repo_in(&dir, "absent.csv");

        assert!(matches!(repo.read(), Err(AppError::Io(_))));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn round_trip_reproduces_sequence_and_stats(values in proptest::collection::vec(0.0f64..5000.0, 1..200)) {
            let dir = TempDir::new().unwrap();
            let repo = repo_in(&dir, "prop.csv");
            let stats = StatisticsEngine::compute(&values).unwrap();

            repo.write(&values, &stats).unwrap();
            let (read_values, read_stats) = repo.read().unwrap();

            prop_assert_eq!(read_values, values);
            prop_assert_eq!(read_stats, stats);
        }
    }
}
