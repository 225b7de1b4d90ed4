//! Validation stages and the text report printed by `validate_heritage`.

use std::path::{Path, PathBuf};

use log::{error, info, warn};
use serde_json::Value;

use crate::config::{Layout, CATEGORY_PATTERN, MAX_PRINTED_ERRORS};
use crate::discovery::{discover, file_name};
use crate::duplicates::{
    display_id, find_cross_file_duplicates, find_duplicates, ids_of, DuplicateId,
};
use crate::errors::HeritageError;
use crate::merge::load_category;
use crate::model::{families_of, read_json};
use crate::schema::check_record;

const RULE_WIDTH: usize = 70;

/// Every schema violation of one record.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordErrors {
    /// The record's id, or `index-<n>` when it has none.
    pub id: String,
    pub errors: Vec<String>,
}

impl RecordErrors {
    /// First few violations, then a count of the rest.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![format!("Family ID: {}", self.id)];
        for err in self.errors.iter().take(MAX_PRINTED_ERRORS) {
            lines.push(format!("  - {err}"));
        }
        if self.errors.len() > MAX_PRINTED_ERRORS {
            lines.push(format!(
                "  ... and {} more errors",
                self.errors.len() - MAX_PRINTED_ERRORS
            ));
        }
        lines
    }
}

/// Findings for one file: duplicate ids and schema violations.
#[derive(Debug, Clone, PartialEq)]
pub struct FileReport {
    pub path: PathBuf,
    pub family_count: usize,
    pub duplicates: Vec<DuplicateId>,
    pub schema_errors: Vec<RecordErrors>,
}

impl FileReport {
    pub fn passed(&self) -> bool {
        self.duplicates.is_empty() && self.schema_errors.is_empty()
    }

    pub fn lines(&self) -> Vec<String> {
        let mut lines = banner(&format!("Validating: {}", self.path.display()));
        lines.push(String::new());
        lines.push(format!("📊 Found {} families", self.family_count));

        lines.push(String::new());
        lines.push("🔍 Checking for duplicate IDs...".to_string());
        if self.duplicates.is_empty() {
            lines.push(format!("✅ All {} IDs are unique", self.family_count));
        } else {
            lines.push(format!("❌ Found {} duplicate IDs:", self.duplicates.len()));
            for dup in &self.duplicates {
                lines.push(format!(
                    "   - ID '{}' appears {} times",
                    display_id(&dup.id),
                    dup.count
                ));
            }
        }

        lines.push(String::new());
        lines.push("🔍 Validating schema for each family...".to_string());
        if self.schema_errors.is_empty() {
            lines.push("✅ All families have correct schema".to_string());
        } else {
            lines.push(String::new());
            lines.push(format!(
                "❌ Schema validation failed for {} families:",
                self.schema_errors.len()
            ));
            lines.push(String::new());
            for record in &self.schema_errors {
                lines.extend(record.lines());
                lines.push(String::new());
            }
        }
        lines
    }
}

/// Run both checks over the records of one file.
pub fn check_families(path: &Path, families: &[Value]) -> FileReport {
    let duplicates = find_duplicates(&ids_of(families));
    let schema_errors = families
        .iter()
        .enumerate()
        .filter_map(|(i, family)| {
            let errors = check_record(family);
            if errors.is_empty() {
                return None;
            }
            let id = match family.get("id") {
                Some(id) => display_id(id),
                None => format!("index-{i}"),
            };
            Some(RecordErrors { id, errors })
        })
        .collect();

    FileReport {
        path: path.to_path_buf(),
        family_count: families.len(),
        duplicates,
        schema_errors,
    }
}

/// Load a category or unified file and check it.
pub fn validate_file(path: &Path) -> Result<FileReport, HeritageError> {
    let mut doc = read_json(path)?;
    let families = families_of(&mut doc, path)?;
    let report = check_families(path, &families);

    if report.passed() {
        info!("{}: {} families OK", path.display(), report.family_count);
    } else {
        warn!(
            "{}: {} duplicate ids, {} families with schema errors",
            path.display(),
            report.duplicates.len(),
            report.schema_errors.len()
        );
    }
    Ok(report)
}

/// Outcome and printed output of one validation stage.
#[derive(Debug, Clone, PartialEq)]
pub struct StageResult {
    pub name: &'static str,
    pub passed: bool,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidationSummary {
    pub stages: Vec<StageResult>,
}

impl ValidationSummary {
    pub fn passed(&self) -> bool {
        self.stages.iter().all(|s| s.passed)
    }

    pub fn exit_code(&self) -> i32 {
        if self.passed() {
            0
        } else {
            1
        }
    }

    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec![String::new()];
        lines.extend(banner("VALIDATION SUMMARY"));
        for stage in &self.stages {
            let status = if stage.passed { "✅ PASSED" } else { "❌ FAILED" };
            lines.push(format!("{status:12} - {}", stage.name));
        }
        lines.push(rule());
        lines.push(String::new());
        if self.passed() {
            lines.push("🎉 All validations passed!".to_string());
        } else {
            lines.push("❌ Some validations failed. Please fix the errors above.".to_string());
        }
        lines
    }
}

/// Run every stage in order: category files, cross-file ids, unified file.
pub fn run_validation(layout: &Layout) -> ValidationSummary {
    run_validation_with(layout, |_| {})
}

/// Like `run_validation`, handing each stage to `on_stage` as soon as it
/// finishes so its report can be printed before the next stage starts.
pub fn run_validation_with(
    layout: &Layout,
    mut on_stage: impl FnMut(&StageResult),
) -> ValidationSummary {
    let discovered = discover(&layout.category_dir(), CATEGORY_PATTERN);

    let mut summary = ValidationSummary::default();
    let mut finish = |stage: StageResult| {
        info!("stage '{}': {}", stage.name, if stage.passed { "passed" } else { "failed" });
        on_stage(&stage);
        summary.stages.push(stage);
    };
    finish(ethnic_files_stage(&discovered));
    finish(cross_file_stage(&discovered));
    finish(unified_file_stage(&layout.unified_path()));

    summary
}

fn ethnic_files_stage(discovered: &Result<Vec<PathBuf>, HeritageError>) -> StageResult {
    let mut lines = vec![String::new()];
    lines.extend(banner("VALIDATING ETHNIC FILES"));

    let paths = match discovered {
        Ok(paths) => paths,
        Err(e) => {
            error!("{e}");
            lines.push(format!("❌ {e}"));
            return StageResult { name: "Ethnic files", passed: false, lines };
        }
    };

    let mut passed = true;
    for path in paths {
        match validate_file(path) {
            Ok(report) => {
                passed &= report.passed();
                lines.push(String::new());
                lines.extend(report.lines());
            }
            Err(e) => {
                error!("{e}");
                passed = false;
                lines.push(String::new());
                lines.extend(banner(&format!("Validating: {}", path.display())));
                lines.push(format!("❌ {e}"));
            }
        }
    }

    StageResult { name: "Ethnic files", passed, lines }
}

fn cross_file_stage(discovered: &Result<Vec<PathBuf>, HeritageError>) -> StageResult {
    let mut lines = vec![String::new()];
    lines.extend(banner("Checking for duplicate IDs across all ethnic files"));

    // Without category files there is nothing to collide; the ethnic-files
    // stage already reports the discovery failure.
    let paths: &[PathBuf] = match discovered {
        Ok(paths) => paths,
        Err(_) => &[],
    };
    let files = match collect_file_ids(paths) {
        Ok(files) => files,
        Err(msg) => {
            error!("{msg}");
            lines.push(format!("❌ {msg}"));
            return StageResult { name: "Cross-file duplicates", passed: false, lines };
        }
    };

    let duplicates = find_cross_file_duplicates(&files);
    let total: usize = files.iter().map(|(_, ids)| ids.len()).sum();
    lines.push(String::new());
    if duplicates.is_empty() {
        lines.push(format!("✅ All {total} IDs are unique across all files"));
    } else {
        warn!("{} ids duplicated across files", duplicates.len());
        lines.push(format!("❌ Found {} IDs duplicated across files:", duplicates.len()));
        for dup in &duplicates {
            lines.push(String::new());
            lines.push(format!(
                "   ID '{}' appears {} times in:",
                display_id(&dup.id),
                dup.count
            ));
            for name in &dup.files {
                lines.push(format!("      - {name}"));
            }
        }
    }

    StageResult {
        name: "Cross-file duplicates",
        passed: duplicates.is_empty(),
        lines,
    }
}

fn collect_file_ids(paths: &[PathBuf]) -> Result<Vec<(String, Vec<Value>)>, String> {
    paths
        .iter()
        .map(|path| -> Result<(String, Vec<Value>), String> {
            let category = load_category(path).map_err(|e| e.to_string())?;
            Ok((file_name(path), ids_of(&category.families)))
        })
        .collect()
}

fn unified_file_stage(path: &Path) -> StageResult {
    let mut lines = vec![String::new()];
    lines.extend(banner("VALIDATING UNIFIED FILE"));
    lines.push(String::new());

    let passed = match validate_file(path) {
        Ok(report) => {
            lines.extend(report.lines());
            report.passed()
        }
        Err(e) => {
            error!("{e}");
            lines.extend(banner(&format!("Validating: {}", path.display())));
            lines.push(format!("❌ {e}"));
            false
        }
    };

    StageResult { name: "Unified file", passed, lines }
}

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

fn banner(title: &str) -> Vec<String> {
    vec![rule(), title.to_string(), rule()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::minimal_record;
    use serde_json::json;

    #[test]
    fn long_error_lists_are_truncated_for_display_only() {
        let record = RecordErrors {
            id: "tat-001".to_string(),
            errors: (1..=8).map(|n| format!("Missing key: f{n}")).collect(),
        };
        let lines = record.lines();

        assert_eq!(record.errors.len(), 8);
        assert_eq!(lines.len(), 1 + MAX_PRINTED_ERRORS + 1);
        assert_eq!(lines[0], "Family ID: tat-001");
        assert_eq!(lines[5], "  - Missing key: f5");
        assert_eq!(lines[6], "  ... and 3 more errors");
    }

    #[test]
    fn exactly_five_errors_has_no_tail_line() {
        let record = RecordErrors {
            id: "x".to_string(),
            errors: vec!["e".to_string(); 5],
        };
        assert_eq!(record.lines().len(), 6);
    }

    #[test]
    fn records_without_id_are_named_by_index() {
        let mut broken = minimal_record("ignored", "2024-01-01");
        broken.as_object_mut().unwrap().remove("id");
        let families = vec![minimal_record("ok-1", "2024-01-01"), broken];

        let report = check_families(Path::new("f.json"), &families);
        assert_eq!(report.schema_errors.len(), 1);
        assert_eq!(report.schema_errors[0].id, "index-1");
        assert_eq!(report.schema_errors[0].errors, vec!["Missing key: id"]);
        assert!(report.duplicates.is_empty());
    }

    #[test]
    fn duplicates_and_schema_errors_are_both_reported() {
        let mut bad = minimal_record("dup", "2024-01-01");
        bad["gender"] = json!(1);
        let families = vec![minimal_record("dup", "2024-02-01"), bad];

        let report = check_families(Path::new("f.json"), &families);
        assert!(!report.passed());
        assert_eq!(report.duplicates.len(), 1);
        assert_eq!(report.schema_errors.len(), 1);

        let text = report.lines().join("\n");
        assert!(text.contains("   - ID 'dup' appears 2 times"));
        assert!(text.contains("Wrong type at gender: expected string, got number"));
    }

    #[test]
    fn stages_are_handed_over_in_order_as_they_finish() {
        let dir = tempfile::tempdir().unwrap();
        let layout = Layout::new(dir.path().join("data"));

        let mut seen = Vec::new();
        let summary = run_validation_with(&layout, |stage| seen.push((stage.name, stage.passed)));

        assert_eq!(
            seen,
            vec![
                ("Ethnic files", false),
                ("Cross-file duplicates", true),
                ("Unified file", false),
            ]
        );
        assert_eq!(summary.stages.len(), 3);
        assert!(summary.stages[1]
            .lines
            .contains(&"✅ All 0 IDs are unique across all files".to_string()));
    }

    #[test]
    fn summary_fails_if_any_stage_fails() {
        let stage = |name: &'static str, passed: bool| StageResult { name, passed, lines: vec![] };
        let summary = ValidationSummary {
            stages: vec![stage("Ethnic files", true), stage("Unified file", false)],
        };

        assert!(!summary.passed());
        assert_eq!(summary.exit_code(), 1);
        assert!(summary
            .summary_lines()
            .iter()
            .any(|l| l.starts_with("❌ FAILED") && l.ends_with("Unified file")));
    }
}
