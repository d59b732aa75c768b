use structopt::StructOpt;

use std::{ffi, io};

use rbdict::{dict::Dict, util::files, Result};

mod cmd_menu;
mod config;

use config::{Config, TomlConfig};

/// Options for cmd
#[derive(StructOpt)]
pub struct Opt {
    #[structopt(long = "toml", help = "Location to config file")]
    toml: Option<ffi::OsString>,

    #[structopt(
        long = "words",
        help = "Location to dictionary file, one word per line"
    )]
    words: Option<ffi::OsString>,

    #[structopt(subcommand)]
    subcmd: Option<SubCommand>,
}

#[derive(Clone, StructOpt)]
pub enum SubCommand {
    /// Menu subcommand, interactive search/insert/print/info/save loop.
    Menu,
    /// Search subcommand, look up a word in the dictionary.
    Search { word: String },
    /// Insert subcommand, add words and save the dictionary.
    Insert { words: Vec<String> },
    /// Print subcommand, dump the tree structure.
    Print,
    /// Info subcommand, show tree height, black height and node count.
    Info {
        #[structopt(long = "validate", help = "validate red-black invariants")]
        validate: bool,
    },
}

fn main() {
    let opts = Opt::from_iter(std::env::args_os());

    let res = handle(opts);
    res.map_err(|e| println!("Error: {}", e)).ok();
}

fn handle(opts: Opt) -> Result<()> {
    let mut cfg: Config = {
        let loc_toml = files::find_config(opts.toml.clone(), &["rbdict.toml", ".rbdict.toml"]);
        match loc_toml.as_ref() {
            Some(loc_toml) => files::load_toml::<_, TomlConfig>(loc_toml)?.into(),
            None => Config::default(),
        }
    };
    if let Some(words) = opts.words.clone() {
        cfg.words = words.into();
    }

    init_logger(&cfg);

    let (mut dict, _) = Dict::load(&cfg.words)?;

    let (stdin, stdout) = (io::stdin(), io::stdout());
    let mut w = stdout.lock();
    match opts.subcmd.unwrap_or(SubCommand::Menu) {
        SubCommand::Menu => {
            let mut r = stdin.lock();
            cmd_menu::handle(&mut dict, &cfg, &mut r, &mut w)
        }
        SubCommand::Search { word } => cmd_menu::search(&dict, &word, &mut w),
        SubCommand::Insert { words } => {
            for word in words.iter() {
                cmd_menu::insert(&mut dict, word, &mut w)?;
            }
            cmd_menu::save(&dict, &mut w)
        }
        SubCommand::Print => cmd_menu::print(&dict, &mut w),
        SubCommand::Info { validate } => cmd_menu::info(&dict, validate, &mut w),
    }
}

fn init_logger(cfg: &Config) {
    let level = cfg.log_level.clone().unwrap_or_else(|| "warn".to_string());
    let env = env_logger::Env::default().default_filter_or(level);
    env_logger::Builder::from_env(env).init();
}
