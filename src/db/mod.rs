use std::path::{Path, PathBuf};
use serde::{de::DeserializeOwned, Serialize};
use crate::class_records::ClassRecord;
use crate::error::TutorError;
use crate::students::Student;
use crate::units::Unit;

const STUDENTS: &str = "students";
const UNITS: &str = "units";
const CLASS_RECORDS: &str = "class_records";

/// Random 128-bit identifier, hex encoded
pub fn generate_id() -> String {
    format!("{:032x}", rand::random::<u128>())
}

/// Local document store: one directory per collection, one JSON file per entity.
#[derive(Debug, Clone)]
pub struct Database {
    root: PathBuf,
}

impl Database {
    pub fn open<P: Into<PathBuf>>(root: P) -> Self {
        Database { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn collection(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    pub async fn put_student(&self, student: &Student) -> Result<(), TutorError> {
        write_entity(&self.collection(STUDENTS), &student.id, student).await
    }

    pub async fn get_student(&self, id: &str) -> Result<Option<Student>, TutorError> {
        read_entity(&self.collection(STUDENTS), id).await
    }

    pub async fn list_students(&self) -> Result<Vec<Student>, TutorError> {
        let mut students: Vec<Student> = read_collection(&self.collection(STUDENTS)).await?;
        students.sort_by(|a, b| a.student_id.cmp(&b.student_id));
        Ok(students)
    }

    pub async fn put_unit(&self, unit: &Unit) -> Result<(), TutorError> {
        write_entity(&self.collection(UNITS), &unit.id, unit).await
    }

    pub async fn get_unit(&self, id: &str) -> Result<Option<Unit>, TutorError> {
        read_entity(&self.collection(UNITS), id).await
    }

    /// Returns false when the unit did not exist
    pub async fn delete_unit(&self, id: &str) -> Result<bool, TutorError> {
        delete_entity(&self.collection(UNITS), id).await
    }

    pub async fn all_units(&self) -> Result<Vec<Unit>, TutorError> {
        read_collection(&self.collection(UNITS)).await
    }

    /// A student's curriculum in ascending `order`
    pub async fn units_for_student(&self, student_id: &str) -> Result<Vec<Unit>, TutorError> {
        let mut units: Vec<Unit> = self
            .all_units()
            .await?
            .into_iter()
            .filter(|u| u.student_id == student_id)
            .collect();
        units.sort_by_key(|u| u.order);
        Ok(units)
    }

    pub async fn put_class_record(&self, record: &ClassRecord) -> Result<(), TutorError> {
        write_entity(&self.collection(CLASS_RECORDS), &record.id, record).await
    }

    pub async fn all_class_records(&self) -> Result<Vec<ClassRecord>, TutorError> {
        read_collection(&self.collection(CLASS_RECORDS)).await
    }

    /// A student's lesson history, newest first
    pub async fn class_records_for_student(&self, student_id: &str) -> Result<Vec<ClassRecord>, TutorError> {
        let mut records: Vec<ClassRecord> = self
            .all_class_records()
            .await?
            .into_iter()
            .filter(|r| r.student_id == student_id)
            .collect();
        records.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(records)
    }

    pub async fn latest_class_record(&self, student_id: &str) -> Result<Option<ClassRecord>, TutorError> {
        Ok(self.class_records_for_student(student_id).await?.into_iter().next())
    }
}

/// Ids become file names; anything that could leave the collection directory is refused
fn entity_path(dir: &Path, id: &str) -> Result<PathBuf, TutorError> {
    let bad = id.is_empty()
        || id == "."
        || id == ".."
        || id.contains(['/', '\\', '\0']);
    if bad {
        return Err(TutorError::new("Invalid entity id", "validation").with_entity(id));
    }
    Ok(dir.join(format!("{}.json", id)))
}

async fn write_entity<T: Serialize>(dir: &Path, id: &str, entity: &T) -> Result<(), TutorError> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| TutorError::new(
            format!("Failed to create collection directory: {}", e),
            "io"
        ).with_context(format!("path: {:?}", dir)))?;

    let path = entity_path(dir, id)?;
    let json = serde_json::to_string_pretty(entity)
        .map_err(|e| TutorError::new(
            format!("Failed to serialize entity: {}", e),
            "json_serialize"
        ).with_entity(id))?;

    // readers never see a half-written file
    let tmp = dir.join(format!(".{}.json.tmp", id));
    tokio::fs::write(&tmp, json)
        .await
        .map_err(|e| TutorError::new(
            format!("Failed to write entity file: {}", e),
            "io"
        ).with_context(format!("path: {:?}", tmp)))?;

    tokio::fs::rename(&tmp, &path)
        .await
        .map_err(|e| TutorError::new(
            format!("Failed to replace entity file: {}", e),
            "io"
        ).with_context(format!("path: {:?}", path)))?;

    Ok(())
}

async fn read_entity<T: DeserializeOwned>(dir: &Path, id: &str) -> Result<Option<T>, TutorError> {
    let path = entity_path(dir, id)?;
    match tokio::fs::read_to_string(&path).await {
        Ok(content) => serde_json::from_str(&content)
            .map_err(|e| TutorError::new(
                format!("Failed to parse entity file: {}", e),
                "json_parse"
            ).with_context(format!("path: {:?}", path)))
            .map(Some),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(TutorError::new(
            format!("Failed to read entity file: {}", e),
            "io"
        ).with_context(format!("path: {:?}", path))),
    }
}

async fn delete_entity(dir: &Path, id: &str) -> Result<bool, TutorError> {
    let path = entity_path(dir, id)?;
    match tokio::fs::remove_file(&path).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(TutorError::new(
            format!("Failed to delete entity file: {}", e),
            "io"
        ).with_context(format!("path: {:?}", path))),
    }
}

/// Load every entity in a collection directory, in file-name order.
/// Files that fail to read or parse are skipped.
async fn read_collection<T: DeserializeOwned>(dir: &Path) -> Result<Vec<T>, TutorError> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(Vec::new());
        }
        Err(e) => {
            return Err(TutorError::new(
                format!("Failed to read collection directory: {}", e),
                "io"
            ).with_context(format!("path: {:?}", dir)));
        }
    };

    let mut paths = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("json") {
            paths.push(path);
        }
    }
    // directory iteration order is platform dependent
    paths.sort();

    let mut items = Vec::with_capacity(paths.len());
    for path in paths {
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => match serde_json::from_str::<T>(&text) {
                Ok(item) => items.push(item),
                Err(e) => {
                    tracing::warn!(
                        path = ?path,
                        error = %e,
                        "Failed to parse entity file"
                    );
                }
            },
            Err(e) => {
                tracing::warn!(
                    path = ?path,
                    error = %e,
                    "Failed to read entity file"
                );
            }
        }
    }

    Ok(items)
}
