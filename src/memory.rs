use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

/// Number of 16-bit words addressable by a register.
pub const MEMORY_WORDS: usize = 1 << 16;

pub trait Bus {
    fn read_word(&mut self, addr: u16) -> Result<u16>;
    fn write_word(&mut self, addr: u16, val: u16) -> Result<()>;
    /// Zero every word.
    fn clear(&mut self);
}

/// Word-addressed RAM. Sizes below [`MEMORY_WORDS`] fault on out-of-range access.
#[derive(Clone, Serialize, Deserialize)]
pub struct LinearMemory {
    pub mem: Vec<u16>,
}

impl LinearMemory {
    pub fn new(size: usize) -> Self {
        Self {
            mem: vec![0; size.min(MEMORY_WORDS)],
        }
    }

    /// Non-zero words as `(address, value)`, ascending.
    pub fn nonzero(&self) -> impl Iterator<Item = (u16, u16)> + '_ {
        self.mem
            .iter()
            .enumerate()
            .filter(|(_, v)| **v != 0)
            .map(|(a, v)| (a as u16, *v))
    }
}

impl Default for LinearMemory {
    fn default() -> Self {
        Self::new(MEMORY_WORDS)
    }
}

impl std::fmt::Debug for LinearMemory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinearMemory")
            .field("words", &self.mem.len())
            .field("nonzero", &self.nonzero().count())
            .finish()
    }
}

impl Bus for LinearMemory {
    fn read_word(&mut self, addr: u16) -> Result<u16> {
        self.mem
            .get(addr as usize)
            .copied()
            .ok_or_else(|| anyhow!("read outside {} words of memory", self.mem.len()))
    }

    fn write_word(&mut self, addr: u16, val: u16) -> Result<()> {
        let len = self.mem.len();
        let slot = self
            .mem
            .get_mut(addr as usize)
            .ok_or_else(|| anyhow!("write outside {len} words of memory"))?;
        *slot = val;
        Ok(())
    }

    fn clear(&mut self) {
        self.mem.fill(0);
    }
}
