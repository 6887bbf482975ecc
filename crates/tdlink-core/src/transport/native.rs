//! FFI transport over the native `libtdjson` client.
//!
//! Wraps the `td_json_client_*` C interface. The native client accepts
//! `send` and `execute` from any thread, but `receive` must not be called
//! concurrently and the string it returns is only valid until the next
//! `receive`, so receive calls are serialized and copied out under a lock.

use super::Transport;
use crate::error::{Result, TdError};
use bytes::Bytes;
use parking_lot::Mutex;
use std::ffi::{c_char, c_double, c_int, c_void, CStr, CString};
use std::path::Path;
use std::ptr::NonNull;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, info};

#[link(name = "tdjson")]
extern "C" {
    fn td_json_client_create() -> *mut c_void;
    fn td_json_client_send(client: *mut c_void, request: *const c_char);
    fn td_json_client_receive(client: *mut c_void, timeout: c_double) -> *const c_char;
    fn td_json_client_execute(client: *mut c_void, request: *const c_char) -> *const c_char;
    fn td_json_client_destroy(client: *mut c_void);
    fn td_set_log_file_path(file_path: *const c_char) -> c_int;
    fn td_set_log_verbosity_level(new_verbosity_level: c_int);
}

/// Handle to one native client instance.
pub struct NativeTransport {
    client: NonNull<c_void>,
    receive_lock: Mutex<()>,
    destroyed: AtomicBool,
}

// SAFETY: the tdjson client handle is documented as usable from multiple
// threads; the only non-reentrant entry point (`receive`) is guarded by
// `receive_lock`, and `destroy` is gated by `destroyed`.
unsafe impl Send for NativeTransport {}
// SAFETY: see the `Send` impl above.
unsafe impl Sync for NativeTransport {}

impl NativeTransport {
    /// Create a new native client instance.
    pub fn create() -> Result<Self> {
        // SAFETY: takes no arguments and returns either a valid handle or null.
        let raw = unsafe { td_json_client_create() };
        let client = NonNull::new(raw)
            .ok_or_else(|| TdError::transport("td_json_client_create returned null"))?;
        info!("Created native tdjson client");
        Ok(Self {
            client,
            receive_lock: Mutex::new(()),
            destroyed: AtomicBool::new(false),
        })
    }

    /// Redirect the native library's log to a file. Process-wide.
    pub fn set_log_file_path(path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let c_path = to_c_string(&path.to_string_lossy())?;
        // SAFETY: `c_path` is a valid NUL-terminated string that outlives the call.
        let ok = unsafe { td_set_log_file_path(c_path.as_ptr()) };
        if ok == 0 {
            return Err(TdError::transport(format!(
                "native client rejected log file path {}",
                path.display()
            )));
        }
        Ok(())
    }

    /// Set the native library's log verbosity. Process-wide.
    pub fn set_log_verbosity_level(level: i32) {
        // SAFETY: plain integer argument, no pointers involved.
        unsafe { td_set_log_verbosity_level(level) }
    }

    fn check_alive(&self) -> Result<()> {
        if self.destroyed.load(Ordering::SeqCst) {
            Err(TdError::transport("native client destroyed"))
        } else {
            Ok(())
        }
    }
}

fn to_c_string(text: &str) -> Result<CString> {
    CString::new(text).map_err(|_| TdError::transport("request contains an interior NUL byte"))
}

/// Copy a string returned by the native client before it is invalidated.
///
/// # Safety
///
/// `ptr` must be null or point to a NUL-terminated string that stays valid
/// for the duration of this call.
unsafe fn copy_reply(ptr: *const c_char) -> Option<Bytes> {
    if ptr.is_null() {
        return None;
    }
    // SAFETY: non-null and valid per this function's contract.
    let reply = unsafe { CStr::from_ptr(ptr) };
    Some(Bytes::copy_from_slice(reply.to_bytes()))
}

impl Transport for NativeTransport {
    fn send(&self, request: &str) -> Result<()> {
        self.check_alive()?;
        let request = to_c_string(request)?;
        // SAFETY: the handle is live (checked above) and `request` is a valid
        // NUL-terminated string for the duration of the call.
        unsafe { td_json_client_send(self.client.as_ptr(), request.as_ptr()) };
        Ok(())
    }

    fn receive(&self, timeout: Duration) -> Option<Bytes> {
        let _guard = self.receive_lock.lock();
        if self.destroyed.load(Ordering::SeqCst) {
            return None;
        }
        // SAFETY: the handle is live and receive calls are serialized by
        // `receive_lock`; the returned string is copied before the lock drops.
        unsafe {
            let reply = td_json_client_receive(self.client.as_ptr(), timeout.as_secs_f64());
            copy_reply(reply)
        }
    }

    fn execute(&self, request: &str) -> Result<Option<Bytes>> {
        self.check_alive()?;
        let request = to_c_string(request)?;
        // SAFETY: the handle is live and `request` outlives the call; the
        // reply is copied immediately.
        let reply = unsafe {
            let reply = td_json_client_execute(self.client.as_ptr(), request.as_ptr());
            copy_reply(reply)
        };
        Ok(reply)
    }

    fn destroy(&self) {
        let _guard = self.receive_lock.lock();
        if self.destroyed.swap(true, Ordering::SeqCst) {
            return;
        }
        debug!("Destroying native tdjson client");
        // SAFETY: the handle was created by `td_json_client_create`, is
        // destroyed exactly once thanks to the swap above, and no receive is
        // in flight while we hold `receive_lock`.
        unsafe { td_json_client_destroy(self.client.as_ptr()) };
    }
}

impl Drop for NativeTransport {
    fn drop(&mut self) {
        self.destroy();
    }
}
