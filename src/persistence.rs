// src/persistence.rs
//! Loading and saving the messaging core's state blob
//!
//! The blob is opaque here. Import is all-or-nothing as far as the core
//! defines it, and save overwrites in place without staging, so a crash during
//! the write can leave a truncated file behind.

use std::fs;
use std::io::Write;
use std::path::Path;

use log::{error, info};

use crate::messaging::{CoreHandle, MessagingCore};
use crate::error::{BridgeError, BridgeResult};

/// Read `path` and import it into the core
pub fn load<C: MessagingCore + ?Sized>(core: &mut C, path: &Path) -> BridgeResult<()> {
    if path.as_os_str().is_empty() {
        return Err(BridgeError::EmptyPath);
    }

    let data = fs::read(path)?;
    core.load_state(&data).map_err(|e| {
        error!("Core rejected state from {}: {}", path.display(), e);
        BridgeError::CoreImport(e)
    })?;

    info!("Loaded {} bytes of state from {}", data.len(), path.display());
    Ok(())
}

/// Export the core state and write it to `path`, readable by the owner only
pub fn save<C: MessagingCore + ?Sized>(core: &C, path: &Path) -> BridgeResult<()> {
    if path.as_os_str().is_empty() {
        return Err(BridgeError::EmptyPath);
    }

    let data = core.save_state().map_err(|e| {
        error!("Core could not export state: {}", e);
        BridgeError::CoreExport(e)
    })?;

    write_private(path, &data)?;
    info!("Saved {} bytes of state to {}", data.len(), path.display());
    Ok(())
}

/// Import state while holding the write side of a shared handle
pub fn load_shared<C: MessagingCore>(handle: &CoreHandle<C>, path: &Path) -> BridgeResult<()> {
    let mut core = handle.write()?;
    load(&mut *core, path)
}

/// Export state while holding the read side of a shared handle
pub fn save_shared<C: MessagingCore>(handle: &CoreHandle<C>, path: &Path) -> BridgeResult<()> {
    let core = handle.read()?;
    save(&*core, path)
}

/// Like `load_shared`, but a file that does not exist yet is not an error
///
/// Returns whether any state was loaded. An empty path is still `EmptyPath`.
pub fn load_existing_shared<C: MessagingCore>(handle: &CoreHandle<C>, path: &Path) -> BridgeResult<bool> {
    if path.as_os_str().is_empty() {
        return Err(BridgeError::EmptyPath);
    }
    if !path.exists() {
        info!("No state at {}, starting empty", path.display());
        return Ok(false);
    }
    load_shared(handle, path)?;
    Ok(true)
}

fn write_private(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut file = open_private(path)?;
    file.write_all(data)?;
    file.sync_all()?;
    Ok(())
}

/// Open `path` for writing, truncated and already owner-only
///
/// `mode()` only applies when the file is created, so an existing file is
/// tightened through the open handle before anything is written to it.
fn open_private(path: &Path) -> std::io::Result<fs::File> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let file = options.open(path)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }

    Ok(file)
}
