use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use log::info;
use serde_json::Value;

use crate::config::{SCHEMA_VERSION, UNKNOWN_ETHNICITY};
use crate::discovery::file_name;
use crate::errors::HeritageError;
use crate::model::{
    families_of, read_json, write_json_pretty, CategoryFile, EthnicityTally, UnifiedFile,
    UnifiedMetadata,
};

/// Load one category file: its ethnicity label and its records.
pub fn load_category(path: &Path) -> Result<CategoryFile, HeritageError> {
    let mut doc = read_json(path)?;
    let ethnicity = doc
        .get("metadata")
        .and_then(|m| m.get("ethnicity"))
        .and_then(Value::as_str)
        .unwrap_or(UNKNOWN_ETHNICITY)
        .to_string();
    let families = families_of(&mut doc, path)?;

    Ok(CategoryFile {
        path: path.to_path_buf(),
        ethnicity,
        families,
    })
}

/// Sort key of a record; missing or non-string dates sort as "".
fn date_key(record: &Value) -> &str {
    record.get("date").and_then(Value::as_str).unwrap_or("")
}

/// Newest first. Stable, so equal dates keep their incoming order.
pub fn sort_by_date_desc(families: &mut [Value]) {
    families.sort_by(compare_dates_desc);
}

fn compare_dates_desc(a: &Value, b: &Value) -> Ordering {
    date_key(b).cmp(date_key(a))
}

/// Merge already-loaded category files, in the order given.
pub fn merge_loaded(categories: Vec<CategoryFile>, last_updated: NaiveDate) -> UnifiedFile {
    let mut families = Vec::new();
    let mut ethnicities = EthnicityTally::new();
    let mut generated_from = Vec::with_capacity(categories.len());

    for category in categories {
        // A label shared by two files keeps only the later file's count.
        ethnicities.insert(category.ethnicity, category.families.len());
        generated_from.push(file_name(&category.path));
        families.extend(category.families);
    }

    sort_by_date_desc(&mut families);
    generated_from.sort();

    UnifiedFile {
        metadata: UnifiedMetadata {
            version: SCHEMA_VERSION.to_string(),
            last_updated: last_updated.format("%Y-%m-%d").to_string(),
            total_families: families.len(),
            ethnicities,
            generated_from,
        },
        families,
    }
}

/// Load every file in `paths` and merge them.
///
/// Any unreadable file aborts the merge; nothing is written here.
pub fn merge(paths: &[PathBuf], last_updated: NaiveDate) -> Result<UnifiedFile, HeritageError> {
    let categories = load_all(paths)?;
    Ok(merge_loaded(categories, last_updated))
}

pub fn load_all(paths: &[PathBuf]) -> Result<Vec<CategoryFile>, HeritageError> {
    paths
        .iter()
        .map(|path| -> Result<CategoryFile, HeritageError> {
            let category = load_category(path)?;
            info!(
                "loaded {} ({} families, ethnicity {})",
                path.display(),
                category.families.len(),
                category.ethnicity
            );
            Ok(category)
        })
        .collect()
}

/// Overwrite the unified file.
pub fn write_unified(path: &Path, unified: &UnifiedFile) -> Result<(), HeritageError> {
    write_json_pretty(path, unified)?;
    info!(
        "wrote {} with {} families",
        path.display(),
        unified.metadata.total_families
    );
    Ok(())
}

/// Per-file counts for the merge report.
pub fn file_counts(categories: &[CategoryFile]) -> Vec<(String, usize)> {
    categories
        .iter()
        .map(|c| (file_name(&c.path), c.families.len()))
        .collect()
}

/// Largest count first; equal counts keep first-appearance order.
pub fn breakdown_by_count(tally: &EthnicityTally) -> Vec<(&str, usize)> {
    let mut sorted: Vec<(&str, usize)> = tally.iter().map(|(l, c)| (l.as_str(), *c)).collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1));
    sorted
}

/// Human-readable merge summary, one line per entry.
pub fn summary_lines(
    files: &[(String, usize)],
    output: &Path,
    unified: &UnifiedFile,
) -> Vec<String> {
    let mut lines = vec![format!("🔍 Found {} ethnicity files:", files.len()), String::new()];
    for (name, count) in files {
        lines.push(format!("   ✅ {name:35} {count:3} families"));
    }

    let meta = &unified.metadata;
    lines.push(String::new());
    lines.push(format!("✅ Created {}", output.display()));
    lines.push(String::new());
    lines.push("📊 Summary:".to_string());
    lines.push(format!("   Total ethnicities: {}", meta.ethnicities.len()));
    lines.push(format!("   Total families: {}", meta.total_families));
    lines.push(String::new());
    lines.push("📋 Breakdown by ethnicity:".to_string());
    for (label, count) in breakdown_by_count(&meta.ethnicities) {
        lines.push(format!("   {label:15} {count:3} families"));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;

    fn category(name: &str, ethnicity: &str, families: Vec<Value>) -> CategoryFile {
        CategoryFile {
            path: PathBuf::from(format!("data/ethnic/{name}")),
            ethnicity: ethnicity.to_string(),
            families,
        }
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
    }

    #[test]
    fn sort_is_descending_and_stable() {
        let mut families = vec![
            json!({"id": "a", "date": "2023-01-01"}),
            json!({"id": "b"}),
            json!({"id": "c", "date": "2024-06-30"}),
            json!({"id": "d", "date": "2023-01-01"}),
            json!({"id": "e", "date": 20240101}),
        ];
        sort_by_date_desc(&mut families);

        let ids: Vec<&str> = families.iter().map(|f| f["id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["c", "a", "d", "b", "e"]);
    }

    #[test]
    fn metadata_counts_and_sources() {
        let unified = merge_loaded(
            vec![
                category("heritage-data-bashkir.json", "Bashkir", vec![json!({"id": "b1"})]),
                category(
                    "heritage-data-tatar.json",
                    "Tatar",
                    vec![json!({"id": "t1"}), json!({"id": "t2"})],
                ),
            ],
            day(),
        );

        let meta = &unified.metadata;
        assert_eq!(meta.version, "2.0.0");
        assert_eq!(meta.last_updated, "2025-03-14");
        assert_eq!(meta.total_families, 3);
        assert_eq!(meta.ethnicities.get("Tatar"), Some(&2));
        assert_eq!(
            meta.generated_from,
            vec!["heritage-data-bashkir.json", "heritage-data-tatar.json"]
        );
    }

    #[test]
    fn shared_label_keeps_last_count() {
        let unified = merge_loaded(
            vec![
                category("heritage-data-a.json", "Tatar", vec![json!({"id": "1"}), json!({"id": "2"})]),
                category("heritage-data-b.json", "Tatar", vec![json!({"id": "3"})]),
            ],
            day(),
        );

        assert_eq!(unified.metadata.total_families, 3);
        assert_eq!(unified.metadata.ethnicities.len(), 1);
        assert_eq!(unified.metadata.ethnicities.get("Tatar"), Some(&1));
    }

    #[test]
    fn metadata_serialises_in_camel_case_order() {
        let unified = merge_loaded(vec![category("heritage-data-a.json", "Chuvash", vec![])], day());
        let value = serde_json::to_value(&unified).unwrap();
        let keys: Vec<&String> = value["metadata"].as_object().unwrap().keys().collect();

        assert_eq!(
            keys,
            vec!["version", "lastUpdated", "totalFamilies", "ethnicities", "generatedFrom"]
        );
        assert_eq!(value["metadata"]["ethnicities"], json!({"Chuvash": 0}));
        assert_eq!(value["families"], json!([]));
    }

    #[test]
    fn missing_or_non_string_ethnicity_is_unknown() {
        let dir = tempfile::tempdir().unwrap();
        let bare = dir.path().join("heritage-data-a.json");
        let numeric = dir.path().join("heritage-data-b.json");
        fs::write(&bare, r#"{"families": [{"id": "a1"}]}"#).unwrap();
        fs::write(
            &numeric,
            r#"{"metadata": {"ethnicity": 7}, "families": [{"id": "b1"}, {"id": "b2"}]}"#,
        )
        .unwrap();

        assert_eq!(load_category(&bare).unwrap().ethnicity, "Unknown");
        assert_eq!(load_category(&numeric).unwrap().ethnicity, "Unknown");

        let unified = merge(&[bare, numeric], day()).unwrap();
        let value = serde_json::to_value(&unified).unwrap();
        assert_eq!(value["metadata"]["ethnicities"], json!({"Unknown": 2}));
        assert_eq!(value["metadata"]["totalFamilies"], 3);
    }

    #[test]
    fn missing_families_loads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("heritage-data-komi.json");
        fs::write(&path, r#"{"metadata": {"ethnicity": "Komi"}}"#).unwrap();

        let category = load_category(&path).unwrap();
        assert_eq!(category.ethnicity, "Komi");
        assert!(category.families.is_empty());
    }

    #[test]
    fn summary_breakdown_is_largest_first() {
        let categories = vec![
            category("heritage-data-a.json", "Mari", vec![json!({"id": "1"})]),
            category("heritage-data-b.json", "Udmurt", vec![json!({"id": "2"}), json!({"id": "3"})]),
        ];
        let files = file_counts(&categories);
        let unified = merge_loaded(categories, day());
        let lines = summary_lines(&files, Path::new("data/heritage-data.json"), &unified);

        let udmurt = lines.iter().position(|l| l.contains("Udmurt")).unwrap();
        let mari = lines.iter().position(|l| l.contains("Mari ")).unwrap();
        assert!(udmurt < mari);
        assert!(lines.contains(&"   Total families: 3".to_string()));
    }
}
