//! Synthetic name assignment.
//!
//! A name is the configured prefix plus a base-36 suffix (`a-z` then `0-9`)
//! of the configured length. The preferred suffix is derived from a SHA-256
//! of the normalized key, so a group keeps its name across builds as long as
//! nothing else claims the slot first. A taken slot moves on to the next in
//! sequence; once every suffix of the current length is taken, the length
//! grows by one.

use sha2::{Digest, Sha256};
use std::collections::HashSet;

use super::mapping::Candidate;

const ALPHABET: &[u8; 36] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Hands out collision-free synthetic names
#[derive(Debug, Clone)]
pub struct NameAssigner {
    prefix: String,
    length: usize,
    taken: HashSet<String>,
}

impl NameAssigner {
    /// Create an assigner for `prefix` with a `length`-character suffix
    pub fn new(prefix: impl Into<String>, length: usize) -> Self {
        Self {
            prefix: prefix.into(),
            length: length.max(1),
            taken: HashSet::new(),
        }
    }

    /// Mark names that already exist in the build
    pub fn reserve<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.taken.extend(names.into_iter().map(Into::into));
    }

    /// Whether a name is unavailable
    pub fn is_taken(&self, name: &str) -> bool {
        self.taken.contains(name)
    }

    /// Assign the next free name for a normalized key
    pub fn assign(&mut self, key: &str) -> String {
        let mut length = self.length;
        loop {
            let space = suffix_space(length);
            let preferred = preferred_slot(key) % space;
            for step in 0..space {
                let slot = (preferred + step) % space;
                let name = format!("{}{}", self.prefix, encode_suffix(slot, length));
                if self.taken.insert(name.clone()) {
                    return name;
                }
            }
            log::debug!("all {}-character suffixes are taken, growing", length);
            length += 1;
        }
    }

    /// Name every candidate in order; earlier candidates win contested slots
    pub fn assign_all(&mut self, candidates: &mut [Candidate]) {
        for candidate in candidates.iter_mut() {
            let name = self.assign(&candidate.key);
            candidate.name = Some(name);
        }
    }
}

fn suffix_space(length: usize) -> u64 {
    36u64.saturating_pow(length as u32)
}

fn preferred_slot(key: &str) -> u64 {
    let digest = Sha256::digest(key.as_bytes());
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(head)
}

/// Fixed-width base-36 rendering of `slot`
fn encode_suffix(mut slot: u64, length: usize) -> String {
    let mut digits = vec![ALPHABET[0]; length];
    for digit in digits.iter_mut().rev() {
        *digit = ALPHABET[(slot % 36) as usize];
        slot /= 36;
    }
    String::from_utf8_lossy(&digits).into_owned()
}
