//! Module implement a persistent word dictionary on top of [rbt::Index].
//!
//! Dictionary file is a UTF-8 text file with one word per line. On load,
//! words are inserted in file order and duplicate lines are dropped. On
//! save, words are written in ascending order.
//!
//! [rbt::Index]: crate::rbt::Index

use log::{debug, info, warn};

use std::{
    ffi,
    io::{self, BufRead, Write},
    path,
};

use crate::{
    err_at,
    rbt::{Index, Insert},
    util::files,
    Result,
};

/// Counters gathered while loading a dictionary file.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LoadStats {
    pub n_lines: usize,
    pub n_inserted: usize,
    pub n_duplicates: usize,
}

/// Word dictionary, bound to a file location.
pub struct Dict {
    loc: path::PathBuf,
    index: Index<String>,
}

impl Dict {
    /// Create an empty dictionary, that shall be saved to `loc`.
    pub fn new<P>(loc: P) -> Dict
    where
        P: AsRef<path::Path>,
    {
        let loc = loc.as_ref().to_path_buf();
        let index = Index::new(&loc.to_string_lossy());
        Dict { loc, index }
    }

    /// Load dictionary from `loc`. A missing file is treated as an empty
    /// dictionary, any other failure is returned as error.
    pub fn load<P>(loc: P) -> Result<(Dict, LoadStats)>
    where
        P: AsRef<path::Path>,
    {
        let mut dict = Dict::new(loc);

        let fd = match files::open_file_r(dict.loc.as_os_str())? {
            Some(fd) => fd,
            None => {
                warn!(target: "dict", "{:?} not found, starting empty", dict.loc);
                return Ok((dict, LoadStats::default()));
            }
        };

        let stats = dict.load_from(io::BufReader::new(fd))?;
        info!(
            target: "dict",
            "{:?} loaded lines:{} words:{} duplicates:{}",
            dict.loc, stats.n_lines, stats.n_inserted, stats.n_duplicates
        );

        Ok((dict, stats))
    }

    fn load_from<R>(&mut self, r: R) -> Result<LoadStats>
    where
        R: BufRead,
    {
        let mut stats = LoadStats::default();
        for line in r.lines() {
            let word = err_at!(IOError, line, "reading {:?}", self.loc)?;
            stats.n_lines += 1;
            match self.index.insert(word) {
                Insert::Inserted => stats.n_inserted += 1,
                Insert::AlreadyExists => stats.n_duplicates += 1,
            }
        }
        Ok(stats)
    }
}

impl Dict {
    /// Return the file location this dictionary is bound to.
    pub fn to_location(&self) -> path::PathBuf {
        self.loc.clone()
    }

    /// Return number of words in the dictionary.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Return the underlying index, for structural queries.
    pub fn as_index(&self) -> &Index<String> {
        &self.index
    }

    /// Add `word`. An existing word is left as is and reported as
    /// [Insert::AlreadyExists]. Words holding a line break cannot be
    /// stored one per line, and are rejected as invalid input.
    pub fn insert(&mut self, word: &str) -> Result<Insert> {
        if word.contains(&['\n', '\r'][..]) {
            err_at!(InvalidInput, msg: "line break in word {:?}", word)?;
        }

        let res = self.index.insert(word.to_string());
        if let Insert::AlreadyExists = res {
            debug!(target: "dict", "{:?} already exists", word);
        }
        Ok(res)
    }

    pub fn search(&self, word: &str) -> Option<&str> {
        self.index.get(word).map(|w| w.as_str())
    }

    /// Iterate over words in ascending order.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.index.iter().map(|w| w.as_str())
    }

    /// Save the dictionary to its own location, return number of words
    /// written.
    pub fn save(&self) -> Result<usize> {
        self.save_to(&self.loc)
    }

    /// Save the dictionary to `loc`, words are written in ascending order.
    /// Content is first written to a sibling temporary file, which is then
    /// renamed over `loc`. On failure the temporary file is removed.
    pub fn save_to<P>(&self, loc: P) -> Result<usize>
    where
        P: AsRef<path::Path>,
    {
        let loc: &ffi::OsStr = loc.as_ref().as_os_str();
        let temp = files::to_temp_file(loc);

        let n = match self.write_temp(&temp, loc) {
            Ok(n) => n,
            Err(err) => {
                if let Err(e) = files::remove_file(&temp) {
                    warn!(target: "dict", "{:?} left behind: {}", temp, e);
                }
                return Err(err);
            }
        };

        info!(target: "dict", "{:?} saved {} words", loc, n);
        Ok(n)
    }

    fn write_temp(&self, temp: &ffi::OsStr, loc: &ffi::OsStr) -> Result<usize> {
        let n = {
            let fd = files::create_file_w(temp)?;
            let mut w = io::BufWriter::new(fd);
            let n = self.write_to(&mut w)?;
            let fd = err_at!(IOError, w.into_inner())?;
            err_at!(IOError, fd.sync_all())?;
            n
        };
        files::rename_file(temp, loc)?;
        Ok(n)
    }

    fn write_to<W>(&self, w: &mut W) -> Result<usize>
    where
        W: Write,
    {
        let mut n = 0;
        for word in self.words() {
            err_at!(IOError, writeln!(w, "{}", word))?;
            n += 1;
        }
        Ok(n)
    }
}

#[cfg(test)]
#[path = "dict_test.rs"]
mod dict_test;
