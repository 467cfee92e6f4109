//! Fake command scripts for process-spawning tests.

use std::io::Write;
use std::os::unix::fs::PermissionsExt;

use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Held by every test that writes or runs a script, so no sibling test
/// forks while a script's write handle is still open (`ETXTBSY`).
pub(crate) static SCRIPT_LOCK: Lazy<tokio::sync::Mutex<()>> =
    Lazy::new(|| tokio::sync::Mutex::new(()));

/// Write an executable `/bin/sh` script named `name` into `dir`.
///
/// The file is written and closed under a temporary name, then renamed and
/// marked executable.
pub(crate) fn write_script(dir: &TempDir, name: &str, body: &str) -> String {
    let mut file = tempfile::NamedTempFile::new_in(dir.path()).unwrap();
    write!(file, "#!/bin/sh\n{body}\n").unwrap();
    file.as_file().sync_all().unwrap();

    let path = dir.path().join(name);
    drop(file.persist(&path).unwrap());
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path.to_string_lossy().into_owned()
}
