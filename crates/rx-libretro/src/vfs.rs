//! Virtual file system interface offered to cores
//!
//! Cores that negotiate `GET_VFS_INTERFACE` route their file access through
//! [`VFS_INTERFACE`], which forwards to the host's [`HostFileSystem`].
//! Errors are reported as `-1` (or null for pointer results).

use crate::callbacks::shield;
use crate::context;
use crate::state::Shared;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use rx_core::{FileAccess, FileStream, HostFileSystem, NativeFileSystem};
use rx_ffi::abi::{vfs_seek as seek_origin, RetroVfsFileHandle, RetroVfsInterface};
use rx_ffi::native::string_from_ptr;
use rx_ffi::EnvPayload;
use std::ffi::{c_char, c_uint, c_void, CStr, CString};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Highest VFS interface version implemented here
pub const SUPPORTED_VFS_VERSION: u32 = 2;

/// File system published by the most recent successful negotiation. Used
/// when a core calls into the VFS from a thread of its own.
static NEGOTIATED: Lazy<RwLock<Option<Arc<dyn HostFileSystem>>>> = Lazy::new(|| RwLock::new(None));

pub(crate) static VFS_INTERFACE: RetroVfsInterface = RetroVfsInterface {
    get_path: vfs_get_path,
    open: vfs_open,
    close: vfs_close,
    size: vfs_size,
    tell: vfs_tell,
    seek: vfs_seek,
    read: vfs_read,
    write: vfs_write,
    flush: vfs_flush,
    remove: vfs_remove,
    rename: vfs_rename,
    truncate: vfs_truncate,
};

/// Answer a `GET_VFS_INTERFACE` request. Requests for a newer version than
/// [`SUPPORTED_VFS_VERSION`] leave the payload untouched.
pub(crate) fn negotiate(shared: &Shared, payload: &mut EnvPayload) {
    let required = payload.vfs_required_version();
    if required > SUPPORTED_VFS_VERSION {
        warn!(
            "Core requires VFS version {}, only {} is available",
            required, SUPPORTED_VFS_VERSION
        );
        return;
    }

    *NEGOTIATED.write() = Some(shared.file_system());
    payload.write_vfs_interface(SUPPORTED_VFS_VERSION, &VFS_INTERFACE);
    debug!("VFS version {} negotiated (core asked for {})", SUPPORTED_VFS_VERSION, required);
}

fn resolve_file_system() -> Arc<dyn HostFileSystem> {
    context::active()
        .map(|shared| shared.file_system())
        .or_else(|| NEGOTIATED.read().clone())
        .unwrap_or_else(|| Arc::new(NativeFileSystem))
}

/// State behind a `retro_vfs_file_handle`
struct VfsFile {
    path: CString,
    stream: Box<dyn FileStream>,
    file_system: Arc<dyn HostFileSystem>,
}

unsafe fn file<'a>(handle: *mut RetroVfsFileHandle) -> Option<&'a mut VfsFile> {
    (handle as *mut VfsFile).as_mut()
}

unsafe fn path_arg(path: *const c_char) -> Option<PathBuf> {
    string_from_ptr(path).map(PathBuf::from)
}

fn status(result: io::Result<()>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            trace!("VFS operation failed: {}", err);
            -1
        }
    }
}

fn offset(result: io::Result<u64>) -> i64 {
    match result.map(i64::try_from) {
        Ok(Ok(value)) => value,
        Ok(Err(_)) => -1,
        Err(err) => {
            trace!("VFS operation failed: {}", err);
            -1
        }
    }
}

unsafe extern "C" fn vfs_get_path(handle: *mut RetroVfsFileHandle) -> *const c_char {
    match file(handle) {
        Some(file) => file.path.as_ptr(),
        None => std::ptr::null(),
    }
}

unsafe extern "C" fn vfs_open(path: *const c_char, mode: c_uint, _hints: c_uint) -> *mut RetroVfsFileHandle {
    let access = FileAccess::from_bits_truncate(mode);
    if path.is_null() || !access.intersects(FileAccess::READ_WRITE) {
        return std::ptr::null_mut();
    }
    let native_path = CStr::from_ptr(path).to_owned();

    shield("vfs_open", std::ptr::null_mut(), || {
        let path = PathBuf::from(native_path.to_string_lossy().into_owned());
        let file_system = resolve_file_system();
        match file_system.open(&path, access) {
            Ok(stream) => {
                trace!("VFS opened {:?} ({:?})", path, access);
                let file = Box::new(VfsFile {
                    path: native_path,
                    stream,
                    file_system,
                });
                Box::into_raw(file) as *mut RetroVfsFileHandle
            }
            Err(err) => {
                debug!("VFS cannot open {:?}: {}", path, err);
                std::ptr::null_mut()
            }
        }
    })
}

unsafe extern "C" fn vfs_close(handle: *mut RetroVfsFileHandle) -> i32 {
    if handle.is_null() {
        return -1;
    }
    let file = Box::from_raw(handle as *mut VfsFile);
    shield("vfs_close", -1, move || {
        let VfsFile {
            stream, file_system, ..
        } = *file;
        file_system.close(stream);
        0
    })
}

unsafe extern "C" fn vfs_size(handle: *mut RetroVfsFileHandle) -> i64 {
    match file(handle) {
        Some(file) => offset(file.stream.length()),
        None => -1,
    }
}

unsafe extern "C" fn vfs_tell(handle: *mut RetroVfsFileHandle) -> i64 {
    match file(handle) {
        Some(file) => offset(file.stream.stream_position()),
        None => -1,
    }
}

unsafe extern "C" fn vfs_seek(handle: *mut RetroVfsFileHandle, position: i64, origin: i32) -> i64 {
    let Some(file) = file(handle) else {
        return -1;
    };
    let target = match origin {
        seek_origin::START => match u64::try_from(position) {
            Ok(position) => SeekFrom::Start(position),
            Err(_) => return -1,
        },
        seek_origin::CURRENT => SeekFrom::Current(position),
        seek_origin::END => SeekFrom::End(position),
        _ => return -1,
    };
    offset(file.stream.seek(target))
}

unsafe extern "C" fn vfs_read(handle: *mut RetroVfsFileHandle, buffer: *mut c_void, len: u64) -> i64 {
    let (Some(file), Ok(len)) = (file(handle), usize::try_from(len)) else {
        return -1;
    };
    if len == 0 {
        return 0;
    }
    if buffer.is_null() {
        return -1;
    }
    let buffer = std::slice::from_raw_parts_mut(buffer as *mut u8, len);

    let mut total = 0;
    while total < buffer.len() {
        match file.stream.read(&mut buffer[total..]) {
            Ok(0) => break,
            Ok(n) => total += n,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => {
                trace!("VFS read failed: {}", err);
                return -1;
            }
        }
    }
    total as i64
}

unsafe extern "C" fn vfs_write(handle: *mut RetroVfsFileHandle, buffer: *const c_void, len: u64) -> i64 {
    let (Some(file), Ok(len)) = (file(handle), usize::try_from(len)) else {
        return -1;
    };
    if len == 0 {
        return 0;
    }
    if buffer.is_null() {
        return -1;
    }
    let buffer = std::slice::from_raw_parts(buffer as *const u8, len);
    match file.stream.write_all(buffer) {
        Ok(()) => len as i64,
        Err(err) => {
            trace!("VFS write failed: {}", err);
            -1
        }
    }
}

unsafe extern "C" fn vfs_flush(handle: *mut RetroVfsFileHandle) -> i32 {
    match file(handle) {
        Some(file) => status(file.stream.flush()),
        None => -1,
    }
}

unsafe extern "C" fn vfs_remove(path: *const c_char) -> i32 {
    let Some(path) = path_arg(path) else {
        return -1;
    };
    shield("vfs_remove", -1, || status(resolve_file_system().remove(&path)))
}

unsafe extern "C" fn vfs_rename(old_path: *const c_char, new_path: *const c_char) -> i32 {
    let (Some(from), Some(to)) = (path_arg(old_path), path_arg(new_path)) else {
        return -1;
    };
    shield("vfs_rename", -1, || status(resolve_file_system().rename(&from, &to)))
}

unsafe extern "C" fn vfs_truncate(handle: *mut RetroVfsFileHandle, length: i64) -> i64 {
    let (Some(file), Ok(length)) = (file(handle), u64::try_from(length)) else {
        return -1;
    };
    status(file.stream.set_length(length)) as i64
}
