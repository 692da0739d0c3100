//! Platform subdir (`linux-64`, `osx-64`, `win-32`, ...) for the running process.

/// Architecture-independent subdir, emitted after the platform subdir.
pub const NOARCH: &str = "noarch";

/// Set to a non-zero integer to force 32-bit subdirs (cross-building only).
pub const FORCE_32BIT_ENV: &str = "CONDA_FORCE_32BIT";

/// Linux machines that get `linux-<machine>` instead of `linux-<bits>`.
const NON_X86_LINUX_MACHINES: &[&str] = &["armv6l", "armv7l", "ppc64le"];

/// Map a Rust `target_os` value to the package-manager OS name.
pub fn os_name(target_os: &str) -> &'static str {
    match target_os {
        "linux" => "linux",
        "macos" => "osx",
        "windows" => "win",
        "openbsd" => "openbsd",
        _ => "unknown",
    }
}

/// Compute the subdir for an OS name, machine and pointer width.
pub fn subdir_for(os: &str, machine: &str, bits: u32) -> String {
    if os == "linux" && NON_X86_LINUX_MACHINES.contains(&machine) {
        format!("linux-{machine}")
    } else {
        format!("{os}-{bits}")
    }
}

/// Machine name in the form `uname -m` reports it.
fn machine() -> &'static str {
    match std::env::consts::ARCH {
        "arm" => {
            if cfg!(target_feature = "v7") {
                "armv7l"
            } else {
                "armv6l"
            }
        }
        "powerpc64" if cfg!(target_endian = "little") => "ppc64le",
        other => other,
    }
}

fn force_32bit() -> bool {
    std::env::var(FORCE_32BIT_ENV)
        .ok()
        .and_then(|v| v.trim().parse::<i64>().ok())
        .is_some_and(|v| v != 0)
}

/// Subdir of the running process, honouring [`FORCE_32BIT_ENV`].
pub fn current_subdir() -> String {
    let bits = if force_32bit() {
        32
    } else {
        usize::BITS
    };
    subdir_for(os_name(std::env::consts::OS), machine(), bits)
}
