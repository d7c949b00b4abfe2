use std::collections::HashMap;

use tracing::debug;

use crate::error::{HuffmanError, Result};

/// Count of every distinct character of the input.
///
/// Entries keep the order in which their character first appeared, so
/// iteration is deterministic for any given input.
#[derive(Debug)]
pub struct FrequencyTable {
    entries: Vec<(char, u64)>,
    index: HashMap<char, usize>,
}

impl FrequencyTable {
    pub fn from_text(text: &str) -> Result<Self> {
        let mut counter = FrequencyCounter::empty();
        counter.count(text.chars()).finish()
    }

    pub fn get(&self, symbol: char) -> Option<u64> {
        self.index.get(&symbol).map(|&at| self.entries[at].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in first-occurrence order.
    pub fn iter(&self) -> impl Iterator<Item = (char, u64)> + '_ {
        self.entries.iter().copied()
    }

    /// Total number of counted characters, repeats included.
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, count)| count).sum()
    }
}

pub struct FrequencyCounter {
    entries: Vec<(char, u64)>,
    index: HashMap<char, usize>,
}

impl FrequencyCounter {
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn count_one(&mut self, symbol: char) {
        match self.index.get(&symbol) {
            Some(&at) => self.entries[at].1 += 1,
            None => {
                self.index.insert(symbol, self.entries.len());
                self.entries.push((symbol, 1));
            }
        }
    }

    pub fn count(&mut self, it: impl Iterator<Item = char>) -> &mut Self {
        it.for_each(|symbol| self.count_one(symbol));
        self
    }

    /// A counter that saw no characters at all cannot produce a table.
    pub fn finish(&self) -> Result<FrequencyTable> {
        if self.entries.is_empty() {
            return Err(HuffmanError::EmptyInput);
        }

        debug!(symbols = self.entries.len(), "finished character count");

        Ok(FrequencyTable {
            entries: self.entries.clone(),
            index: self.index.clone(),
        })
    }
}
