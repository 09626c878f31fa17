//! Directory-backed blob source.
//!
//! Feeds the patch engine from an `ACPI` subdirectory next to the
//! application image: the loaded-image protocol gives the volume and the
//! image's path on it, the file protocol enumerates the directory, and each
//! selected blob is loaded into pool memory typed `AcpiReclaimMemory`.
//! Loaded buffers are intentionally never freed: the patched tables point
//! into them for the rest of the boot session and beyond.

use amlpatch_acpi::{BlobInfo, BlobName, BlobSource, LoadedBlob, PatchError};
use amlpatch_uefi::api::{
    BootServices, File, FileSystem, LoadedImageId, SimpleFileSystemId, SystemTable,
};
use amlpatch_uefi::memory::EfiMemoryType;
use amlpatch_uefi::protocol::device_path::DevicePathProtocol;
use amlpatch_uefi::protocol::file::{FileAttributes, FileInfo, FileMode};
use amlpatch_uefi::EfiStatus;

/// Name of the blob directory, opened relative to the image's directory.
const BLOB_DIR: &str = "ACPI";

/// Directory-entry buffer: 1 KiB, 8-byte aligned for [`FileInfo`].
///
/// A record for a 255-character FAT long name needs 80 + 2 * 256 bytes;
/// anything smaller makes directory reads fail with `BUFFER_TOO_SMALL` and
/// would abort the whole run over a single long-named file.
const ENTRY_BUF_WORDS: usize = 128;

const _: () = assert!(ENTRY_BUF_WORDS * 8 >= 80 + 2 * 256);

/// Blob source enumerating the `ACPI` directory next to the image.
pub struct DirBlobSource<'st> {
    boot: BootServices<'st>,
    dir: File<'st>,
    entry_buf: [u64; ENTRY_BUF_WORDS],
}

impl<'st> DirBlobSource<'st> {
    /// Resolve the image's own directory and open the `ACPI` subdirectory
    /// inside it.
    ///
    /// # Errors
    ///
    /// Any failure along the protocol chain maps to
    /// [`PatchError::DirectoryResolution`]; nothing has been mutated yet at
    /// that point.
    pub fn open(st: &'st SystemTable) -> Result<Self, PatchError> {
        Self::open_inner(st).map_err(|status| {
            uprintln!("amlpatch: cannot open blob directory: {status}");
            PatchError::DirectoryResolution
        })
    }

    fn open_inner(st: &'st SystemTable) -> Result<Self, EfiStatus> {
        let boot = st.boot_services();
        let image = boot.handle_protocol::<LoadedImageId>(st.image_handle())?;
        let device_handle = image.device_handle;
        let file_path = image.file_path;

        let fs_proto = boot.handle_protocol::<SimpleFileSystemId>(device_handle)?;
        let root = FileSystem::new(fs_proto).open_volume()?;

        let image_dir = open_parent_directory(&root, file_path)?;
        let dir = image_dir.open(BLOB_DIR, FileMode::READ, FileAttributes::empty())?;

        Ok(Self {
            boot,
            dir,
            entry_buf: [0; ENTRY_BUF_WORDS],
        })
    }
}

impl BlobSource for DirBlobSource<'_> {
    fn next_entry(&mut self) -> Result<Option<BlobInfo>, PatchError> {
        let Self { dir, entry_buf, .. } = self;
        loop {
            let bytes = entry_buf_bytes(entry_buf);
            let Some(info) = dir.read_dir_entry(bytes).map_err(|_| PatchError::Io)? else {
                return Ok(None);
            };
            // Subdirectories are not candidates.
            if info.is_directory() {
                continue;
            }
            let name = decode_name(info)?;
            return Ok(Some(BlobInfo {
                name,
                size: info.file_size,
            }));
        }
    }

    fn load(&mut self, info: &BlobInfo) -> Result<LoadedBlob, PatchError> {
        let size = usize::try_from(info.size).map_err(|_| PatchError::Io)?;
        let file = self
            .dir
            .open(info.name(), FileMode::READ, FileAttributes::empty())
            .map_err(|_| PatchError::Io)?;

        // The referencing table entries must survive OS handoff, so the
        // buffer is typed like the firmware's own tables and never freed.
        let buffer = self
            .boot
            .allocate_pool(EfiMemoryType::AcpiReclaimMemory, size)
            .map_err(|_| PatchError::Io)?;
        let slice = unsafe { core::slice::from_raw_parts_mut(buffer, size) };

        let read = file.read(slice).map_err(|_| PatchError::Io)?;
        if read != size {
            return Err(PatchError::Io);
        }

        let addr = buffer as u64;
        uprintln!("amlpatch: loaded {} ({size} bytes) at {addr:#x}", info.name());
        Ok(LoadedBlob {
            addr,
            len: info.size,
        })
    }
}

/// Reinterpret the aligned entry buffer as bytes for directory reads.
fn entry_buf_bytes(words: &mut [u64; ENTRY_BUF_WORDS]) -> &mut [u8] {
    let ptr = words.as_mut_ptr().cast::<u8>();
    // SAFETY: u64 has no invalid byte patterns and the length matches the
    // backing array exactly.
    unsafe { core::slice::from_raw_parts_mut(ptr, ENTRY_BUF_WORDS * 8) }
}

/// Decode a directory entry's UCS-2 name into a [`BlobName`].
fn decode_name(info: &FileInfo) -> Result<BlobName, PatchError> {
    let mut name = BlobName::new();
    let units = info.file_name_ptr();
    // Bounded by the record size: everything after the 80-byte fixed part
    // is name units.
    let max_units = (info.size.saturating_sub(80) / 2) as usize;
    for i in 0..max_units {
        // SAFETY: i stays inside the record the firmware just wrote.
        let unit = unsafe { units.add(i).read_unaligned() };
        if unit == 0 {
            break;
        }
        let ch = char::from_u32(u32::from(unit)).unwrap_or('\u{FFFD}');
        name.try_push(ch).map_err(|_| PatchError::Io)?;
    }
    Ok(name)
}

/// Open the directory containing the image, derived from its device path.
///
/// The last media file-path node holds the image's path on the volume; the
/// parent directory is that path with the final component stripped. An
/// image sitting in the volume root resolves to the root itself.
fn open_parent_directory<'st>(
    root: &File<'st>,
    mut node: *const DevicePathProtocol,
) -> Result<File<'st>, EfiStatus> {
    if node.is_null() {
        return Err(EfiStatus::NOT_FOUND);
    }

    let mut path = [0u16; 256];
    let mut path_len = 0usize;

    // SAFETY: the firmware guarantees a well-formed, end-terminated path.
    unsafe {
        while !(*node).is_end() {
            let node_len = (*node).node_length() as usize;
            if node_len < 4 {
                return Err(EfiStatus::VOLUME_CORRUPTED);
            }
            if (*node).is_file_path() {
                let payload = node.cast::<u8>().add(4).cast::<u16>();
                let units = (node_len - 4) / 2;
                path_len = 0;
                for i in 0..units {
                    let unit = payload.add(i).read_unaligned();
                    if unit == 0 {
                        break;
                    }
                    if path_len >= path.len() - 1 {
                        return Err(EfiStatus::BUFFER_TOO_SMALL);
                    }
                    path[path_len] = unit;
                    path_len += 1;
                }
            }
            node = node.cast::<u8>().add(node_len).cast();
        }
    }

    // Strip the image file name; what remains is its directory.
    let cut = path[..path_len]
        .iter()
        .rposition(|&unit| unit == u16::from(b'\\'))
        .unwrap_or(0);
    if cut == 0 {
        return root.open("\\", FileMode::READ, FileAttributes::empty());
    }
    path[cut] = 0;
    root.open_ucs2(&path[..=cut], FileMode::READ, FileAttributes::empty())
}
