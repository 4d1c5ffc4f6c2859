use std::process::{Command, Stdio};

/// Human-readable name of the current platform.
pub fn platform_name() -> &'static str {
    if cfg!(target_os = "windows") {
        "windows"
    } else if cfg!(target_os = "macos") {
        "macos"
    } else if cfg!(target_os = "linux") {
        "linux"
    } else {
        std::env::consts::OS
    }
}

/// True if `program` resolves on `PATH`.
pub fn is_command_available(program: &str) -> bool {
    #[cfg(target_os = "windows")]
    let lookup = Command::new("where")
        .arg(program)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    #[cfg(not(target_os = "windows"))]
    let lookup = Command::new("sh")
        .arg("-c")
        .arg(format!("command -v {program}"))
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    lookup.map(|status| status.success()).unwrap_or(false)
}
