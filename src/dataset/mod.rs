use std::fmt;
use std::path::{Path, PathBuf};

/// The closed set of CanvasData 2 extracts this importer accepts. Each one
/// names both the source subdirectory the warehouse drops part files into
/// and the destination table (`canvasdata2_<name>`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dataset {
    Users,
    Courses,
    Enrollments,
    Pseudonyms,
    EnrollmentTerms,
    CourseSections,
}

/// Every importable dataset, in a fixed order for help text and tests.
pub const ALL: [Dataset; 6] = [
    Dataset::Users,
    Dataset::Courses,
    Dataset::Enrollments,
    Dataset::Pseudonyms,
    Dataset::EnrollmentTerms,
    Dataset::CourseSections,
];

impl Dataset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dataset::Users => "users",
            Dataset::Courses => "courses",
            Dataset::Enrollments => "enrollments",
            Dataset::Pseudonyms => "pseudonyms",
            Dataset::EnrollmentTerms => "enrollment_terms",
            Dataset::CourseSections => "course_sections",
        }
    }

    /// Parse a dataset identifier. Anything outside the allow-list is
    /// `None`; callers reject it before touching the filesystem or the
    /// database.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "users" => Some(Dataset::Users),
            "courses" => Some(Dataset::Courses),
            "enrollments" => Some(Dataset::Enrollments),
            "pseudonyms" => Some(Dataset::Pseudonyms),
            "enrollment_terms" => Some(Dataset::EnrollmentTerms),
            "course_sections" => Some(Dataset::CourseSections),
            _ => None,
        }
    }

    /// Destination table name.
    pub fn table_name(&self) -> String {
        format!("canvasdata2_{}", self.as_str())
    }

    /// Directory the warehouse extract writes this dataset's part files to.
    pub fn source_dir(&self, data_root: &Path) -> PathBuf {
        data_root.join(self.as_str())
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_identifier_round_trips() {
        for dataset in ALL {
            assert_eq!(Dataset::from_str(dataset.as_str()), Some(dataset));
        }
    }

    #[test]
    fn unknown_identifiers_are_rejected() {
        for name in ["bogus", "", "user", "canvasdata2_users", "accounts"] {
            assert_eq!(Dataset::from_str(name), None, "accepted {name:?}");
        }
    }

    #[test]
    fn parsing_is_case_and_whitespace_tolerant() {
        assert_eq!(Dataset::from_str(" Users "), Some(Dataset::Users));
        assert_eq!(
            Dataset::from_str("ENROLLMENT_TERMS"),
            Some(Dataset::EnrollmentTerms)
        );
    }

    #[test]
    fn table_names_carry_the_prefix() {
        assert_eq!(Dataset::Users.table_name(), "canvasdata2_users");
        assert_eq!(
            Dataset::CourseSections.table_name(),
            "canvasdata2_course_sections"
        );
    }

    #[test]
    fn source_dir_nests_under_the_root() {
        let dir = Dataset::Enrollments.source_dir(Path::new("/srv/canvasdata"));
        assert_eq!(dir, PathBuf::from("/srv/canvasdata/enrollments"));
    }
}
