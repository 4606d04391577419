//! Shared test support
//!
//! Stand-in encoder binaries for subprocess tests: small shell scripts
//! written to the system temp directory so tests never need a real ffmpeg.

use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

static SCRIPT_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Write an executable shell script and return its path
fn write_script(body: &str) -> PathBuf {
    let n = SCRIPT_COUNTER.fetch_add(1, Ordering::Relaxed);
    let path = std::env::temp_dir().join(format!(
        "restream-test-encoder-{}-{}.sh",
        std::process::id(),
        n
    ));

    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "#!/bin/sh").unwrap();
    writeln!(file, "{}", body).unwrap();
    drop(file);

    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();

    path
}

/// Encoder stand-in that consumes stdin until EOF and exits cleanly
pub fn sink_encoder() -> String {
    write_script("exec cat > /dev/null").to_string_lossy().into_owned()
}

/// Encoder stand-in that exits immediately without reading stdin
pub fn failing_encoder() -> String {
    write_script("exit 1").to_string_lossy().into_owned()
}
