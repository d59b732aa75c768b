use serde::de::DeserializeOwned;

use std::{ffi, fs, io, path};

use crate::{err_at, Result};

/// open file for reading, return None if file is not found.
pub fn open_file_r(file: &ffi::OsStr) -> Result<Option<fs::File>> {
    let os_file = path::Path::new(file);
    match fs::OpenOptions::new().read(true).open(os_file) {
        Ok(fd) => Ok(Some(fd)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => err_at!(IOError, msg: "{} {:?}", err, os_file),
    }
}

/// create a file for writing, truncate if it already exists. Parent
/// directories are created as needed.
pub fn create_file_w(file: &ffi::OsStr) -> Result<fs::File> {
    let os_file = path::Path::new(file);

    match os_file.parent() {
        Some(parent) if parent.as_os_str().is_empty() => (),
        Some(parent) => err_at!(IOError, fs::create_dir_all(parent))?,
        None => err_at!(InvalidFile, msg: "{:?}", file)?,
    };

    let mut opts = fs::OpenOptions::new();
    Ok(err_at!(
        IOError,
        opts.write(true).create(true).truncate(true).open(os_file),
        "{:?}",
        os_file
    )?)
}

/// Return the sibling temporary file used while rewriting `file`.
pub fn to_temp_file(file: &ffi::OsStr) -> ffi::OsString {
    let mut temp = file.to_os_string();
    temp.push(".tmp");
    temp
}

/// Remove `file`, a missing file is not an error.
pub fn remove_file(file: &ffi::OsStr) -> Result<()> {
    match fs::remove_file(file) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => err_at!(IOError, msg: "{} {:?}", err, file),
    }
}

/// Atomically move `from` over `to`.
pub fn rename_file(from: &ffi::OsStr, to: &ffi::OsStr) -> Result<()> {
    err_at!(IOError, fs::rename(from, to), "{:?} -> {:?}", from, to)
}

/// Locate configuration file, if `loc` is supplied use that, else
/// return the first of `candidates` that exists in the current directory.
pub fn find_config(loc: Option<ffi::OsString>, candidates: &[&str]) -> Option<ffi::OsString> {
    match loc {
        Some(loc) => Some(loc),
        None => candidates
            .iter()
            .map(path::Path::new)
            .find(|p| p.is_file())
            .map(|p| p.as_os_str().to_os_string()),
    }
}

/// Load toml file and parse it into type `T`.
pub fn load_toml<P, T>(loc: P) -> Result<T>
where
    P: AsRef<path::Path>,
    T: DeserializeOwned,
{
    let loc = loc.as_ref();
    let data = err_at!(IOError, fs::read(loc), "{:?}", loc)?;
    let s = err_at!(FailConvert, std::str::from_utf8(&data), "{:?}", loc)?;
    err_at!(FailConvert, toml::from_str(s), "{:?}", loc)
}

#[cfg(test)]
#[path = "files_test.rs"]
mod files_test;
