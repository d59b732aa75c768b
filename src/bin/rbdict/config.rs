use serde::Deserialize;

use std::path;

pub const DEFAULT_WORDS_FILE: &str = "words.txt";

#[derive(Clone)]
pub struct Config {
    pub words: path::PathBuf,
    pub autosave: bool,
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            words: DEFAULT_WORDS_FILE.into(),
            autosave: false,
            log_level: None,
        }
    }
}

#[derive(Clone, Deserialize)]
pub struct TomlConfig {
    words: Option<path::PathBuf>,
    autosave: Option<bool>,
    log_level: Option<String>, // env_logger filter, RUST_LOG wins.
}

impl From<TomlConfig> for Config {
    fn from(cfg: TomlConfig) -> Config {
        let def = Config::default();
        Config {
            words: cfg.words.unwrap_or(def.words),
            autosave: cfg.autosave.unwrap_or(def.autosave),
            log_level: cfg.log_level,
        }
    }
}
