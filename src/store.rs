//! JSON persistence of extraction results.
//!
//! Each application gets a directory under the output root holding
//! `typeData.json` and `methodData.json`. The presence of both files is the
//! only signal that an application was already analyzed.

use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::model::{Executable, Type};

pub const TYPE_DATA_FILE: &str = "typeData.json";
pub const METHOD_DATA_FILE: &str = "methodData.json";
pub const LOG_FILE: &str = "logs.log";

/// Errors that can occur while reading or writing analysis output.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid entity data in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("no analysis output for application {0:?}")]
    NotFound(String),
}

/// Saves and loads entity collections as JSON files.
#[derive(Debug, Clone)]
pub struct JsonStore {
    output_root: PathBuf,
}

impl JsonStore {
    pub fn new<P: AsRef<Path>>(output_root: P) -> Self {
        Self {
            output_root: output_root.as_ref().to_path_buf(),
        }
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Directory holding one application's output.
    pub fn app_dir(&self, app_name: &str) -> PathBuf {
        self.output_root.join(app_name)
    }

    /// Log file location for one application.
    pub fn log_file(&self, app_name: &str) -> PathBuf {
        self.app_dir(app_name).join(LOG_FILE)
    }

    /// Whether both output files exist for `app_name`.
    pub fn exists(&self, app_name: &str) -> bool {
        let dir = self.app_dir(app_name);
        dir.join(TYPE_DATA_FILE).is_file() && dir.join(METHOD_DATA_FILE).is_file()
    }

    /// Write both collections, creating the application directory.
    pub fn save(
        &self,
        app_name: &str,
        types: &[Type],
        executables: &[Executable],
    ) -> Result<(), StoreError> {
        let dir = self.app_dir(app_name);
        fs::create_dir_all(&dir).map_err(|source| StoreError::Io {
            path: dir.clone(),
            source,
        })?;

        write_json(&dir.join(TYPE_DATA_FILE), types)?;
        write_json(&dir.join(METHOD_DATA_FILE), executables)?;
        info!(
            dir = %dir.display(),
            types = types.len(),
            executables = executables.len(),
            "saved analysis output"
        );
        Ok(())
    }

    pub fn load_types(&self, app_name: &str) -> Result<Vec<Type>, StoreError> {
        self.load(app_name, TYPE_DATA_FILE)
    }

    pub fn load_executables(&self, app_name: &str) -> Result<Vec<Executable>, StoreError> {
        self.load(app_name, METHOD_DATA_FILE)
    }

    fn load<T: DeserializeOwned>(&self, app_name: &str, file: &str) -> Result<Vec<T>, StoreError> {
        let path = self.app_dir(app_name).join(file);
        if !path.is_file() {
            return Err(StoreError::NotFound(app_name.to_string()));
        }
        debug!(path = %path.display(), "loading entities");
        read_json(&path)
    }
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StoreError> {
    let io_err = |source: std::io::Error| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = fs::File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    writer.write_all(b"\n").map_err(io_err)?;
    writer.flush().map_err(io_err)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    let file = fs::File::open(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> (Vec<Type>, Vec<Executable>) {
        let types = vec![Type {
            simple_name: "Cart".to_string(),
            full_name: "shop.Cart`1".to_string(),
            file_path: "src/Cart.java".to_string(),
            service_name: "orders".to_string(),
            content: "class Cart<T> {\n  void add(T t) {}\n}".to_string(),
            is_interface: false,
            is_annotation: false,
        }];
        let executables = vec![
            Executable {
                simple_name: "add".to_string(),
                full_name: "shop.Cart`1.add(T)".to_string(),
                parent_name: "shop.Cart`1".to_string(),
                service_name: "orders".to_string(),
                content: "void add(T t) {}".to_string(),
            },
            Executable {
                simple_name: "main".to_string(),
                full_name: "main()".to_string(),
                parent_name: String::new(),
                service_name: "orders".to_string(),
                content: "func main() {}".to_string(),
            },
        ];
        (types, executables)
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let temp = TempDir::new().unwrap();
        let store = JsonStore::new(temp.path());
        let (types, executables) = sample();

        assert!(!store.exists("shop"));
        store.save("shop", &types, &executables).unwrap();
        assert!(store.exists("shop"));

        assert_eq!(store.load_types("shop").unwrap(), types);
        assert_eq!(store.load_executables("shop").unwrap(), executables);
    }

    #[test]
    fn test_exists_requires_both_files() {
        let temp = TempDir::new().unwrap();
        let store = JsonStore::new(temp.path());
        fs::create_dir_all(store.app_dir("shop")).unwrap();
        fs::write(store.app_dir("shop").join(TYPE_DATA_FILE), "[]").unwrap();
        assert!(!store.exists("shop"));
    }

    #[test]
    fn test_load_missing_is_not_found() {
        let temp = TempDir::new().unwrap();
        let store = JsonStore::new(temp.path());
        assert!(matches!(store.load_types("nope"), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_load_corrupt_is_json_error() {
        let temp = TempDir::new().unwrap();
        let store = JsonStore::new(temp.path());
        fs::create_dir_all(store.app_dir("shop")).unwrap();
        fs::write(store.app_dir("shop").join(METHOD_DATA_FILE), "{not json").unwrap();
        assert!(matches!(
            store.load_executables("shop"),
            Err(StoreError::Json { .. })
        ));
    }

    #[test]
    fn test_save_into_file_path_fails() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("out");
        fs::write(&blocker, "").unwrap();
        let store = JsonStore::new(&blocker);
        let (types, executables) = sample();
        assert!(matches!(
            store.save("shop", &types, &executables),
            Err(StoreError::Io { .. })
        ));
    }
}
