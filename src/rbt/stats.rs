use std::{fmt, result};

#[allow(unused_imports)]
use crate::rbt::Index;
use crate::rbt::Depth;

/// Statistic type, for [Index] type.
#[derive(Clone)]
pub struct Stats {
    pub name: String,
    pub node_size: usize,
    pub n_count: usize,
    pub height: usize,
    pub blacks: usize,
    pub depths: Option<Depth>,
}

impl Stats {
    pub(crate) fn new(name: &str) -> Stats {
        Stats {
            name: name.to_string(),
            node_size: Default::default(),
            n_count: Default::default(),
            height: Default::default(),
            blacks: Default::default(),
            depths: None,
        }
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter) -> result::Result<(), fmt::Error> {
        let none = "none".to_string();
        let d = self.depths.as_ref().map_or(none, |x| x.to_string());
        writeln!(f, "rbt.name = {}", self.name)?;
        writeln!(
            f,
            "rbt = {{ n_count={}, node_size={}, height={}, blacks={} }}",
            self.n_count, self.node_size, self.height, self.blacks,
        )?;
        writeln!(f, "rbt.depths = {}", d)
    }
}
