//! Streaming contact lookup engine.
//!
//! Resolves an author identifier to a contact value by scanning an
//! operator-supplied mapping file: newline-delimited single-key JSON records
//! (`{"<identifier>": "<contact>"}`, optionally with a trailing comma),
//! potentially gigabytes in size. The file is read in fixed-size byte
//! windows and never loaded wholesale into memory.
//!
//! This is a best-effort engine, not a validating one: malformed lines are
//! skipped, and a read failure yields "unresolved". Every call scans from
//! the start of the file; for large files and many distinct authors this
//! linear rescan is the dominant cost of the system.

use std::collections::HashMap;
use std::path::Path;

use tokio::fs::File;
use tokio::io::AsyncReadExt;

/// Chunked lookup over a mapping file.
#[derive(Debug, Clone)]
pub struct ContactLookup {
    chunk_size: usize,
}

impl ContactLookup {
    /// Create a lookup engine reading the file in `chunk_size`-byte windows.
    pub fn new(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
        }
    }

    /// Resolve an identifier against the mapping file.
    ///
    /// Returns the contact value of the first record whose key equals the
    /// identifier, or `None` when the end of the file is reached without a
    /// match or any read fails.
    pub async fn resolve(&self, identifier: &str, path: &Path) -> Option<String> {
        let mut file = match File::open(path).await {
            Ok(file) => file,
            Err(error) => {
                log::warn!("Cannot open mapping file {}: {}", path.display(), error);
                return None;
            }
        };

        // Quoted form short-circuits most non-matching lines without a parse.
        let needle = format!("\"{identifier}\"");
        let mut window = vec![0u8; self.chunk_size];
        let mut carry: Vec<u8> = Vec::new();

        loop {
            let read = match file.read(&mut window).await {
                Ok(read) => read,
                Err(error) => {
                    log::warn!("Mapping file read failed: {error}");
                    return None;
                }
            };
            if read == 0 {
                break;
            }

            carry.extend_from_slice(&window[..read]);

            // Process complete lines; the final fragment stays carried over
            // so a record split at a window boundary is never lost.
            let mut start = 0;
            while let Some(offset) = carry[start..].iter().position(|&b| b == b'\n') {
                let line = &carry[start..start + offset];
                if let Some(contact) = match_record(line, identifier, &needle) {
                    return Some(contact);
                }
                start += offset + 1;
            }
            carry.drain(..start);
        }

        match_record(&carry, identifier, &needle)
    }
}

/// Test one line for a record keyed by the identifier. `None` means the
/// search continues; malformed lines are skipped silently.
fn match_record(line: &[u8], identifier: &str, needle: &str) -> Option<String> {
    let line = String::from_utf8_lossy(line);
    let line = line.trim();
    if line.is_empty() || !line.contains(needle) {
        return None;
    }

    let record = line.strip_suffix(',').unwrap_or(line);
    let parsed: HashMap<String, String> = serde_json::from_str(record).ok()?;
    parsed.get(identifier).cloned()
}
