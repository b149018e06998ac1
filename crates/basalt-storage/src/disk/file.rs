//! File-backed disk manager.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use basalt_common::constants::PAGE_SIZE;
use basalt_common::types::PageId;
use parking_lot::Mutex;

use super::DiskManager;

/// Stores pages in a single database file.
///
/// Page `n` lives at byte offset `n * PAGE_SIZE`. The file grows on demand;
/// reading a page that was never written yields zeroed bytes, matching what
/// the buffer pool hands out for fresh pages.
pub struct FileDiskManager {
    /// The underlying file, wrapped in a mutex for thread-safe access.
    file: Mutex<File>,
    /// The file path.
    path: PathBuf,
}

impl FileDiskManager {
    /// Opens the database file at `path`, creating it if necessary.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)?;
        Ok(Self {
            file: Mutex::new(file),
            path,
        })
    }

    /// Returns the path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[inline]
    fn offset(page_id: PageId) -> u64 {
        u64::from(page_id.as_u32()) * PAGE_SIZE as u64
    }
}

impl DiskManager for FileDiskManager {
    fn read_page(&self, page_id: PageId, buf: &mut [u8]) {
        debug_assert_eq!(buf.len(), PAGE_SIZE);
        let mut file = self.file.lock();
        let result = file
            .seek(SeekFrom::Start(Self::offset(page_id)))
            .and_then(|_| read_full(&mut *file, buf));
        match result {
            // A read past the end of the file leaves the tail zeroed.
            Ok(n) => buf[n..].fill(0),
            Err(e) => {
                tracing::error!("failed to read page {}: {}", page_id, e);
                buf.fill(0);
            }
        }
    }

    fn write_page(&self, page_id: PageId, data: &[u8]) {
        debug_assert_eq!(data.len(), PAGE_SIZE);
        let mut file = self.file.lock();
        let result = file
            .seek(SeekFrom::Start(Self::offset(page_id)))
            .and_then(|_| file.write_all(data))
            .and_then(|_| file.flush());
        if let Err(e) = result {
            tracing::error!("failed to write page {}: {}", page_id, e);
        }
    }
}

/// Reads until `buf` is full or the file ends, returning the byte count.
fn read_full(file: &mut File, buf: &mut [u8]) -> io::Result<usize> {
    let mut total = 0;
    while total < buf.len() {
        match file.read(&mut buf[total..]) {
            Ok(0) => break,
            Ok(n) => total += n,
            Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(total)
}

impl std::fmt::Debug for FileDiskManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileDiskManager")
            .field("path", &self.path)
            .finish()
    }
}
