use anyhow::{Context, Result};
use chrono::{Duration as ChronoDuration, Local, NaiveDate};
use glob::glob;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

use crate::dataset::Dataset;

/// List the part files the warehouse dropped for `dataset` on `date`:
/// everything under `<data_root>/<dataset>/` named `<YYYYMMDD>-part-*.csv`.
/// An empty result is not an error; it just means there is nothing to
/// import. Matches are sorted so repeated runs see the files in the same
/// order.
#[instrument(level = "debug", skip(data_root), fields(data_root = %data_root.display()))]
pub fn part_files(data_root: &Path, dataset: Dataset, date: NaiveDate) -> Result<Vec<PathBuf>> {
    let dir = dataset.source_dir(data_root);
    let pattern = format!("{}/{}-part-*.csv", dir.display(), date.format("%Y%m%d"));

    let mut files = Vec::new();
    for entry in glob(&pattern).context("invalid part-file glob pattern")? {
        let path = entry.context("cannot read directory entry")?;
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();

    debug!(matched = files.len(), pattern = %pattern, "part file scan");
    Ok(files)
}

/// The extract lands overnight, so a run without an explicit date targets
/// the previous day on the local clock.
pub fn yesterday() -> NaiveDate {
    Local::now().date_naive() - ChronoDuration::days(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), "id\n1\n").unwrap();
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn matches_only_the_requested_date() -> Result<()> {
        let root = TempDir::new()?;
        let users_dir = root.path().join("users");
        fs::create_dir_all(&users_dir)?;

        touch(&users_dir, "20240115-part-1.csv");
        touch(&users_dir, "20240115-part-0.csv");
        touch(&users_dir, "20240114-part-0.csv");
        touch(&users_dir, "20240115-part-0.tsv");
        touch(&users_dir, "notes.txt");

        let files = part_files(root.path(), Dataset::Users, date(2024, 1, 15))?;
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["20240115-part-0.csv", "20240115-part-1.csv"]);
        Ok(())
    }

    #[test]
    fn datasets_do_not_see_each_others_files() -> Result<()> {
        let root = TempDir::new()?;
        let courses_dir = root.path().join("courses");
        fs::create_dir_all(&courses_dir)?;
        touch(&courses_dir, "20240115-part-0.csv");

        let files = part_files(root.path(), Dataset::Users, date(2024, 1, 15))?;
        assert!(files.is_empty());
        Ok(())
    }

    #[test]
    fn missing_dataset_directory_is_an_empty_result() -> Result<()> {
        let root = TempDir::new()?;
        let files = part_files(root.path(), Dataset::Pseudonyms, date(2024, 1, 15))?;
        assert!(files.is_empty());
        Ok(())
    }

    #[test]
    fn yesterday_is_one_day_back() {
        let today = Local::now().date_naive();
        assert_eq!(today - yesterday(), ChronoDuration::days(1));
    }
}
