use std::fs::File;
use std::io::Read;
use std::path::Path;

use memmap2::Mmap;

use super::error::Result;

/// Files at least this large are memory-mapped instead of read.
const MMAP_THRESHOLD: u64 = 1024 * 1024;

/// Raw bytes of a file, capped at a byte limit.
#[derive(Debug)]
pub struct FileBytes {
    pub bytes: Vec<u8>,
    /// Size of the file on disk
    pub total_len: u64,
}

impl FileBytes {
    pub fn truncated(&self) -> bool {
        (self.bytes.len() as u64) < self.total_len
    }
}

/// Read at most `max_bytes` from the start of `path`.
pub fn read_capped(path: &Path, max_bytes: u64) -> Result<FileBytes> {
    let file = File::open(path)?;
    let total_len = file.metadata()?.len();
    let wanted = total_len.min(max_bytes) as usize;

    let bytes = if total_len >= MMAP_THRESHOLD {
        log::debug!("Mapping {} ({} bytes)", path.display(), total_len);
        // SAFETY: the mapping is only read for the duration of this call and
        // copied out immediately. A concurrent truncation by another process
        // is the usual memmap2 caveat and would surface as a read fault.
        let map = unsafe { Mmap::map(&file)? };
        map[..wanted.min(map.len())].to_vec()
    } else {
        let mut buf = Vec::with_capacity(wanted);
        file.take(wanted as u64).read_to_end(&mut buf)?;
        buf
    };

    Ok(FileBytes { bytes, total_len })
}
