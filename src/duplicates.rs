use indexmap::IndexMap;
use serde_json::Value;

/// An id seen more than once within one file.
#[derive(Debug, Clone, PartialEq)]
pub struct DuplicateId {
    pub id: Value,
    pub count: usize,
}

/// An id seen more than once across the category files.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossFileDuplicate {
    pub id: Value,
    pub count: usize,
    /// Files containing the id, in file order.
    pub files: Vec<String>,
}

/// The `id` of a record; a missing id counts as `null`.
pub fn record_id(record: &Value) -> Value {
    record.get("id").cloned().unwrap_or(Value::Null)
}

pub fn ids_of(records: &[Value]) -> Vec<Value> {
    records.iter().map(record_id).collect()
}

/// Id as shown to the user: strings bare, anything else as JSON.
pub fn display_id(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// `value` with object keys sorted at every level.
///
/// Values equal under `PartialEq` render to the same canonical text.
fn canonical(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.clone(), canonical(v)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(canonical).collect()),
        other => other.clone(),
    }
}

/// Occurrence count per distinct id, in first-occurrence order.
fn count_ids<'a>(
    ids: impl IntoIterator<Item = &'a Value>,
) -> IndexMap<String, (&'a Value, usize)> {
    let mut counts: IndexMap<String, (&Value, usize)> = IndexMap::new();
    for id in ids {
        counts.entry(canonical(id).to_string()).or_insert((id, 0)).1 += 1;
    }
    counts
}

pub fn find_duplicates(ids: &[Value]) -> Vec<DuplicateId> {
    count_ids(ids)
        .into_values()
        .filter(|(_, count)| *count > 1)
        .map(|(id, count)| DuplicateId {
            id: id.clone(),
            count,
        })
        .collect()
}

/// Duplicates over the union of every file's ids.
///
/// `files` pairs each file name with the ids it holds. Ids repeated inside
/// a single file count here too, matching `find_duplicates` over the union.
pub fn find_cross_file_duplicates(files: &[(String, Vec<Value>)]) -> Vec<CrossFileDuplicate> {
    let all = files.iter().flat_map(|(_, ids)| ids.iter());
    count_ids(all)
        .into_values()
        .filter(|(_, count)| *count > 1)
        .map(|(id, count)| CrossFileDuplicate {
            id: id.clone(),
            count,
            files: files
                .iter()
                .filter(|(_, ids)| ids.contains(id))
                .map(|(name, _)| name.clone())
                .collect(),
        })
        .collect()
}
