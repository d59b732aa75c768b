use log::debug;

use std::io::{BufRead, Write};

use rbdict::{dict::Dict, err_at, rbt::Insert, Result};

use crate::config::Config;

const MENU: &str = concat!(
    "\n====== Red-Black Tree Dictionary Menu ======\n",
    "1. Search for a word\n",
    "2. Insert a new word\n",
    "3. Print the tree\n",
    "4. Show tree info\n",
    "5. Save dictionary\n",
    "0. Exit\n",
    "Enter your choice: ",
);

/// Run the interactive menu until the user exits or input is exhausted.
pub fn handle<R, W>(dict: &mut Dict, cfg: &Config, r: &mut R, w: &mut W) -> Result<()>
where
    R: BufRead,
    W: Write,
{
    loop {
        emit(w, MENU)?;
        let choice = match read_line(r)? {
            Some(line) => line,
            None => break,
        };
        debug!(target: "menu", "choice {:?}", choice);

        match choice.as_str() {
            "1" => match prompt_word(r, w, "Enter word to search: ")? {
                Some(word) => search(dict, &word, w)?,
                None => break,
            },
            "2" => match prompt_word(r, w, "Enter word to insert: ")? {
                Some(word) => insert(dict, &word, w)?,
                None => break,
            },
            "3" => print(dict, w)?,
            "4" => info(dict, false /*validate*/, w)?,
            "5" => save(dict, w)?,
            "0" => {
                emit(w, "Exiting program. Goodbye!\n")?;
                break;
            }
            _ => emit(w, "Invalid choice. Please try again.\n")?,
        }
    }

    if cfg.autosave {
        save(dict, w)?;
    }
    Ok(())
}

pub fn search<W: Write>(dict: &Dict, word: &str, w: &mut W) -> Result<()> {
    match dict.search(word) {
        Some(word) => emit(w, &format!("Found : {}\n", word)),
        None => emit(w, "Item Not found\n"),
    }
}

pub fn insert<W: Write>(dict: &mut Dict, word: &str, w: &mut W) -> Result<()> {
    match dict.insert(word)? {
        Insert::Inserted => emit(w, &format!("Inserted : {}\n", word)),
        Insert::AlreadyExists => emit(w, "ERROR : item already exists !\n"),
    }
}

pub fn print<W: Write>(dict: &Dict, w: &mut W) -> Result<()> {
    emit(w, "Tree Structure:\n")?;
    dict.as_index().pretty_print(w)
}

pub fn info<W: Write>(dict: &Dict, validate: bool, w: &mut W) -> Result<()> {
    let index = dict.as_index();
    let stats = match validate {
        true => index.validate()?,
        false => index.to_stats(),
    };

    emit(w, &format!("Tree height     : {}\n", stats.height))?;
    emit(w, &format!("Black height    : {}\n", stats.blacks))?;
    emit(w, &format!("Number of nodes : {}\n", stats.n_count))?;
    if let Some(depths) = stats.depths.as_ref() {
        emit(w, &format!("Leaf depths     : {}\n", depths))?;
    }
    Ok(())
}

pub fn save<W: Write>(dict: &Dict, w: &mut W) -> Result<()> {
    dict.save()?;
    let loc = dict.to_location();
    emit(w, &format!("Dictionary saved to {}\n", loc.display()))
}

fn emit<W: Write>(w: &mut W, s: &str) -> Result<()> {
    err_at!(IOError, w.write_all(s.as_bytes()))?;
    err_at!(IOError, w.flush())
}

// Return None on end of input.
fn read_line<R: BufRead>(r: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    match err_at!(IOError, r.read_line(&mut line))? {
        0 => Ok(None),
        _ => Ok(Some(line.trim().to_string())),
    }
}

// Words are single tokens, anything after the first whitespace is ignored.
fn prompt_word<R, W>(r: &mut R, w: &mut W, prompt: &str) -> Result<Option<String>>
where
    R: BufRead,
    W: Write,
{
    loop {
        emit(w, prompt)?;
        match read_line(r)? {
            Some(line) => match line.split_whitespace().next() {
                Some(word) => break Ok(Some(word.to_string())),
                None => continue,
            },
            None => break Ok(None),
        }
    }
}

#[cfg(test)]
#[path = "cmd_menu_test.rs"]
mod cmd_menu_test;
