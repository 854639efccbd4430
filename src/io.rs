//! JSON files for instances and assignments.
//!
//! Instances use the keys `Employees`, `Desks`, `Days`, `Desks_E`,
//! `Employees_G`, `Days_E` and `Desks_Z`; missing optional keys default to
//! empty. Assignments are `{day: {employee: desk | null}}` objects.

use crate::desk::{Instance, InstanceData, NamedAssignment};
use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| Error::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let io_err = |source| Error::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    let mut writer = BufWriter::new(File::create(path).map_err(io_err)?);
    serde_json::to_writer_pretty(&mut writer, value).map_err(|source| Error::Json {
        path: path.to_path_buf(),
        source,
    })?;
    writer.write_all(b"\n").map_err(io_err)?;
    writer.flush().map_err(io_err)
}

/// Reads raw instance data without validating it.
pub fn load_instance_data(path: impl AsRef<Path>) -> Result<InstanceData> {
    read_json(path.as_ref())
}

/// Reads and validates an instance.
pub fn load_instance(path: impl AsRef<Path>) -> Result<Instance> {
    let path = path.as_ref();
    let data = load_instance_data(path)?;
    let instance = Instance::new(&data)?;
    tracing::debug!(
        path = %path.display(),
        employees = instance.n_employees(),
        desks = instance.n_desks(),
        days = instance.n_days(),
        "instance loaded"
    );
    Ok(instance)
}

pub fn save_instance_data(path: impl AsRef<Path>, data: &InstanceData) -> Result<()> {
    write_json(path.as_ref(), data)
}

pub fn load_assignment(path: impl AsRef<Path>) -> Result<NamedAssignment> {
    read_json(path.as_ref())
}

/// Writes an assignment as pretty-printed JSON, creating parent
/// directories as needed.
pub fn save_assignment(path: impl AsRef<Path>, assignment: &NamedAssignment) -> Result<()> {
    write_json(path.as_ref(), assignment)
}
