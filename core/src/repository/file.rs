use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use crate::config::default_data_dir;
use crate::error::{Result, TaskflowError};
use crate::model::filter::TaskFilter;
use crate::model::task::{Task, TaskDraft};
use crate::repository::newest_first;
use crate::repository::record::TaskRecord;
use crate::repository::traits::TaskRepository;

const DEFAULT_FILE_NAME: &str = "tasks.json";

/// Keeps every task in one JSON file, re-read on each call and rewritten on
/// each mutation.
#[derive(Clone, Debug)]
pub struct FileTaskRepository {
    file_path: PathBuf,
}

impl FileTaskRepository {
    pub fn new(base_dir: Option<PathBuf>) -> Result<Self> {
        let mut path = match base_dir {
            Some(dir) => dir,
            None => default_data_dir()?,
        };
        fs::create_dir_all(&path)?;
        path.push(DEFAULT_FILE_NAME);

        if !path.exists() {
            write_records(&path, &[])?;
            debug!(path = %path.display(), "initialized empty task file");
        }

        Ok(FileTaskRepository { file_path: path })
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn read_tasks(&self) -> Result<Vec<Task>> {
        let file = File::open(&self.file_path)?;
        let reader = BufReader::new(file);
        let records: Vec<TaskRecord> = serde_json::from_reader(reader)?;
        Ok(records.into_iter().map(Task::from).collect())
    }

    fn write_tasks(&self, tasks: &[Task]) -> Result<()> {
        let records: Vec<TaskRecord> = tasks.iter().map(TaskRecord::from).collect();
        write_records(&self.file_path, &records)
    }
}

fn write_records(path: &Path, records: &[TaskRecord]) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, records)?;
    writer.flush()?;
    Ok(())
}

impl TaskRepository for FileTaskRepository {
    fn fetch(&self, filter: &TaskFilter) -> Result<Vec<Task>> {
        let tasks = self.read_tasks()?;
        Ok(newest_first(tasks, filter))
    }

    fn get(&self, id: &Uuid) -> Result<Task> {
        self.read_tasks()?
            .into_iter()
            .find(|t| t.id == *id)
            .ok_or(TaskflowError::NotFound(*id))
    }

    fn create(&self, draft: TaskDraft) -> Result<Task> {
        draft.validate()?;
        let mut tasks = self.read_tasks()?;
        let task = Task::from_draft(Uuid::new_v4(), Utc::now(), draft);
        tasks.push(task.clone());
        self.write_tasks(&tasks)?;
        debug!(id = %task.id, "task record created");
        Ok(task)
    }

    fn update(&self, id: &Uuid, draft: TaskDraft) -> Result<Task> {
        draft.validate()?;
        let mut tasks = self.read_tasks()?;
        let task = tasks
            .iter_mut()
            .find(|t| t.id == *id)
            .ok_or(TaskflowError::NotFound(*id))?;
        task.apply(draft);
        let updated = task.clone();
        self.write_tasks(&tasks)?;
        debug!(id = %id, "task record updated");
        Ok(updated)
    }

    fn delete(&self, id: &Uuid) -> Result<bool> {
        let mut tasks = self.read_tasks()?;
        let initial_len = tasks.len();
        tasks.retain(|t| t.id != *id);

        if tasks.len() == initial_len {
            return Err(TaskflowError::NotFound(*id));
        }

        self.write_tasks(&tasks)?;
        debug!(id = %id, "task record deleted");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::tags::Tags;
    use crate::model::task::{Priority, Status};
    use tempfile::TempDir;

    fn repo(dir: &TempDir) -> FileTaskRepository {
        FileTaskRepository::new(Some(dir.path().to_path_buf())).unwrap()
    }

    #[test]
    fn test_new_initializes_empty_file() {
        let dir = TempDir::new().unwrap();
        let repo = repo(&dir);
        assert!(repo.path().exists());
        assert!(repo.fetch(&TaskFilter::all()).unwrap().is_empty());
    }

    #[test]
    fn test_tasks_survive_reopening() {
        let dir = TempDir::new().unwrap();
        let created = repo(&dir)
            .create(TaskDraft::new("Write spec").with_tags(Tags::from_labels(["work", "urgent"])))
            .unwrap();

        let reopened = repo(&dir);
        let tasks = reopened.fetch(&TaskFilter::all()).unwrap();
        assert_eq!(tasks, vec![created.clone()]);

        let raw = fs::read_to_string(reopened.path()).unwrap();
        assert!(raw.contains("\"tags\": \"work,urgent\""));
    }

    #[test]
    fn test_list_shaped_tags_survive_a_rewrite() {
        let dir = TempDir::new().unwrap();
        let repo = repo(&dir);
        fs::write(
            repo.path(),
            r#"[{
                "id": "6f1c1b8e-6d2a-4a53-9a55-2f0f7f1f3c11",
                "title": "Budget review",
                "tags": ["q3,budget", "work"],
                "createdAt": "2023-07-01T09:00:00Z"
            }]"#,
        )
        .unwrap();

        let before = repo.fetch(&TaskFilter::all()).unwrap();
        repo.create(TaskDraft::new("trigger a write")).unwrap();
        let after = repo.get(&before[0].id).unwrap();

        assert_eq!(after.tags, before[0].tags);
        assert_eq!(after.tags.to_joined(), "q3,budget,work");
    }

    #[test]
    fn test_fetch_filters_and_orders_newest_first() {
        let dir = TempDir::new().unwrap();
        let repo = repo(&dir);
        let first = repo.create(TaskDraft::new("first").with_priority(Priority::High)).unwrap();
        let second = repo.create(TaskDraft::new("second")).unwrap();
        let third = repo.create(TaskDraft::new("third").with_priority(Priority::High)).unwrap();

        let ids: Vec<Uuid> = repo.fetch(&TaskFilter::all()).unwrap().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![third.id, second.id, first.id]);

        let high = repo.fetch(&TaskFilter::all().with_priority(Priority::High)).unwrap();
        assert_eq!(high.len(), 2);
        assert!(repo.fetch(&TaskFilter::all().with_search("nope")).unwrap().is_empty());
    }

    #[test]
    fn test_update_and_delete_unknown_id() {
        let dir = TempDir::new().unwrap();
        let repo = repo(&dir);
        let missing = Uuid::new_v4();
        assert!(matches!(
            repo.update(&missing, TaskDraft::new("x")),
            Err(TaskflowError::NotFound(id)) if id == missing
        ));
        assert!(matches!(repo.delete(&missing), Err(TaskflowError::NotFound(_))));
    }

    #[test]
    fn test_update_applies_fields_and_delete_removes() {
        let dir = TempDir::new().unwrap();
        let repo = repo(&dir);
        let task = repo.create(TaskDraft::new("draft")).unwrap();

        let updated = repo
            .update(&task.id, TaskDraft::from(&task).with_status(Status::InProgress))
            .unwrap();
        assert_eq!(updated.status, Status::InProgress);
        assert_eq!(repo.get(&task.id).unwrap(), updated);

        assert!(repo.delete(&task.id).unwrap());
        assert!(repo.fetch(&TaskFilter::all()).unwrap().is_empty());
    }

    #[test]
    fn test_create_rejects_missing_title() {
        let dir = TempDir::new().unwrap();
        let repo = repo(&dir);
        let err = repo.create(TaskDraft::new("")).unwrap_err();
        assert!(err.is_validation());
        assert!(repo.fetch(&TaskFilter::all()).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_file_is_a_service_error() {
        let dir = TempDir::new().unwrap();
        let repo = repo(&dir);
        fs::write(repo.path(), "{ not json").unwrap();
        assert!(matches!(
            repo.fetch(&TaskFilter::all()),
            Err(TaskflowError::Serialization(_))
        ));
    }
}
