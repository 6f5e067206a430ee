use crate::error::{Result, ScaffoldError};
use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// A saved translator script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslatorRecord {
    pub id: String,
    #[serde(default)]
    pub label: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TranslatorRecord {
    /// New record with a random id.
    pub fn new(label: impl Into<String>, content: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            label: label.into(),
            content: content.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

pub trait ScriptStore {
    fn get(&self, id: &str) -> Result<Option<TranslatorRecord>>;
    fn put(&self, record: &TranslatorRecord) -> Result<()>;
    fn delete(&self, id: &str) -> Result<()>;
    /// Every record, most recently updated first.
    fn list_all(&self) -> Result<Vec<TranslatorRecord>>;

    /// Replace a record's content. Unchanged content leaves the record untouched.
    fn update_content(&self, id: &str, content: &str) -> Result<TranslatorRecord> {
        let mut record = self
            .get(id)?
            .ok_or_else(|| ScaffoldError::NotFound(format!("translator {id}")))?;
        if record.content == content {
            return Ok(record);
        }
        record.content = content.to_string();
        record.updated_at = Utc::now();
        self.put(&record)?;
        Ok(record)
    }
}

/// One JSON file per translator under the local data directory.
pub struct LocalFsStore {
    root: PathBuf,
}

impl LocalFsStore {
    pub fn new() -> Result<Self> {
        let proj = ProjectDirs::from("io", "scaffolded", "scaffolded").ok_or_else(|| {
            ScaffoldError::storage_error("initialization", "could not resolve data dir")
        })?;
        Self::at(&proj.data_local_dir().join("translators"))
    }

    pub fn at(root: &Path) -> Result<Self> {
        fs::create_dir_all(root)?;
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    fn path_for(&self, id: &str) -> Result<PathBuf> {
        validate_id(id)?;
        Ok(self.root.join(format!("{id}.json")))
    }
}

/// Ids become file names, so keep them to a safe alphabet.
fn validate_id(id: &str) -> Result<()> {
    let ok = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if ok {
        Ok(())
    } else {
        Err(ScaffoldError::InvalidInput(format!("invalid translator id {id:?}")))
    }
}

impl ScriptStore for LocalFsStore {
    fn get(&self, id: &str) -> Result<Option<TranslatorRecord>> {
        let p = self.path_for(id)?;
        if !p.exists() {
            return Ok(None);
        }
        let file = fs::File::open(&p)?;
        let record = serde_json::from_reader(file).map_err(|e| {
            ScaffoldError::storage_error("read", format!("{}: {e}", p.display()))
        })?;
        Ok(Some(record))
    }

    fn put(&self, record: &TranslatorRecord) -> Result<()> {
        let p = self.path_for(&record.id)?;
        let file = fs::File::create(&p)?;
        serde_json::to_writer_pretty(file, record)?;
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<()> {
        let p = self.path_for(id)?;
        if p.exists() {
            fs::remove_file(p)?;
        }
        Ok(())
    }

    fn list_all(&self) -> Result<Vec<TranslatorRecord>> {
        let mut out = Vec::new();
        if !self.root.exists() {
            return Ok(out);
        }
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            let file = match fs::File::open(&path) {
                Ok(f) => f,
                Err(_) => continue,
            };
            match serde_json::from_reader::<_, TranslatorRecord>(file) {
                Ok(record) => out.push(record),
                Err(_) => continue, // skip corrupt files
            }
        }
        out.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then_with(|| a.id.cmp(&b.id)));
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn store() -> (tempfile::TempDir, LocalFsStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalFsStore::at(dir.path()).unwrap();
        (dir, store)
    }

    #[test]
    fn put_get_delete() {
        let (_dir, store) = store();
        let record = TranslatorRecord::new("Example", "function doWeb() {}");

        store.put(&record).unwrap();
        assert_eq!(store.get(&record.id).unwrap(), Some(record.clone()));

        store.delete(&record.id).unwrap();
        assert_eq!(store.get(&record.id).unwrap(), None);
        // Deleting again is fine.
        store.delete(&record.id).unwrap();
    }

    #[test]
    fn list_all_is_newest_first_and_skips_corrupt_files() {
        let (dir, store) = store();
        let mut older = TranslatorRecord::new("Older", "a");
        older.updated_at = older.updated_at - Duration::hours(1);
        let newer = TranslatorRecord::new("Newer", "b");

        store.put(&older).unwrap();
        store.put(&newer).unwrap();
        fs::write(dir.path().join("broken.json"), "{not json").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let labels: Vec<String> = store.list_all().unwrap().into_iter().map(|r| r.label).collect();
        assert_eq!(labels, vec!["Newer", "Older"]);
    }

    #[test]
    fn update_content_touches_only_on_change() {
        let (_dir, store) = store();
        let mut record = TranslatorRecord::new("Example", "v1");
        record.updated_at = record.updated_at - Duration::hours(1);
        store.put(&record).unwrap();

        let same = store.update_content(&record.id, "v1").unwrap();
        assert_eq!(same.updated_at, record.updated_at);

        let changed = store.update_content(&record.id, "v2").unwrap();
        assert_eq!(changed.content, "v2");
        assert!(changed.updated_at > record.updated_at);
        assert_eq!(store.get(&record.id).unwrap().unwrap().content, "v2");
    }

    #[test]
    fn update_content_unknown_id_is_not_found() {
        let (_dir, store) = store();
        let err = store.update_content("missing", "x").unwrap_err();
        assert!(matches!(err, ScaffoldError::NotFound(_)));
    }

    #[test]
    fn path_like_ids_are_rejected() {
        let (_dir, store) = store();
        let err = store.get("../etc/passwd").unwrap_err();
        assert!(matches!(err, ScaffoldError::InvalidInput(_)));
    }
}
