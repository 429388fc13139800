use crate::api::FileRecord;

/// Local copy of the server's file list.
///
/// Only ever replaced as a whole with what the server returned. There is no
/// insert or remove, so the copy cannot drift from the server's view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileRegistry {
    files: Vec<FileRecord>,
}

impl FileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in a fresh server listing, keeping server order
    pub fn replace(&mut self, files: Vec<FileRecord>) {
        self.files = files;
    }

    pub fn files(&self) -> &[FileRecord] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn get(&self, filename: &str) -> Option<&FileRecord> {
        self.files.iter().find(|f| f.filename == filename)
    }

    pub fn contains(&self, filename: &str) -> bool {
        self.get(filename).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, size: u64) -> FileRecord {
        FileRecord {
            filename: name.to_string(),
            filesize: size,
            upload_time: "2024-05-01T10:00:00".to_string(),
        }
    }

    #[test]
    fn test_starts_empty() {
        let reg = FileRegistry::new();
        assert!(reg.is_empty());
        assert!(reg.files().is_empty());
    }

    #[test]
    fn test_replace_is_wholesale_and_keeps_order() {
        let mut reg = FileRegistry::new();
        reg.replace(vec![record("z.txt", 1), record("a.txt", 2), record("m.txt", 3)]);
        assert_eq!(reg.len(), 3);
        let names: Vec<_> = reg.files().iter().map(|f| f.filename.as_str()).collect();
        assert_eq!(names, ["z.txt", "a.txt", "m.txt"]);

        reg.replace(vec![record("b.csv", 7)]);
        assert_eq!(reg.len(), 1);
        assert!(!reg.contains("z.txt"));
        assert_eq!(reg.get("b.csv").map(|f| f.filesize), Some(7));

        reg.replace(Vec::new());
        assert!(reg.is_empty());
    }
}
