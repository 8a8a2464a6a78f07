//! # Key Files
//!
//! Validator secret seeds are stored as a single line of hex. On Unix the
//! file is created with mode 0600.

use std::fs;
use std::io::Write;
use std::path::Path;

use crate::signatures::PrivateKey;
use crate::CryptoError;

/// Write `key` to `path`, replacing any existing file.
pub fn save_private_key(path: &Path, key: &PrivateKey) -> Result<(), CryptoError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    writeln!(file, "{}", key.expose_hex())?;
    file.sync_all()?;
    Ok(())
}

/// Read a key previously written by [`save_private_key`].
pub fn load_private_key(path: &Path) -> Result<PrivateKey, CryptoError> {
    let contents = zeroize::Zeroizing::new(fs::read_to_string(path)?);
    PrivateKey::from_hex(contents.trim())
}
