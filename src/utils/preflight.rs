//! Host checks run before a flow mutates anything

use crate::error::{HostprepError, Result};
use crate::runner::Privilege;
use crate::ui;
use std::path::Path;

const OS_RELEASE: &str = "/etc/os-release";

/// Tools the package flows shell out to
pub const PACKAGE_TOOLS: &[&str] = &["apt-get", "dpkg"];

/// Tools the account flows shell out to
pub const ACCOUNT_TOOLS: &[&str] = &[
    "id", "useradd", "userdel", "usermod", "chpasswd", "passwd", "pkill",
];

/// Whether an os-release document describes a Debian-family system
pub fn is_debian_family(os_release: &str) -> bool {
    os_release.lines().any(|line| {
        let Some((key, value)) = line.split_once('=') else {
            return false;
        };
        if key != "ID" && key != "ID_LIKE" {
            return false;
        }
        value
            .trim_matches('"')
            .split_whitespace()
            .any(|id| id == "debian" || id == "ubuntu")
    })
}

/// Warn when the host does not look like Debian; the commands may still work
pub fn check_distribution() {
    match std::fs::read_to_string(OS_RELEASE) {
        Ok(content) if is_debian_family(&content) => {}
        Ok(_) => ui::warning("This host does not look Debian-based; apt-get and dpkg may be missing"),
        Err(_) if Path::new("/usr/bin/dpkg").exists() => {}
        Err(_) => ui::warning("Could not identify the distribution (no /etc/os-release)"),
    }
}

/// Fail with `DependencyMissing` naming every tool not on `PATH`
pub fn require_tools(tools: &[&str], privilege: Privilege) -> Result<()> {
    let mut missing: Vec<&str> = tools
        .iter()
        .copied()
        .filter(|tool| which::which(tool).is_err())
        .collect();

    if privilege == Privilege::Sudo && which::which("sudo").is_err() {
        missing.push("sudo");
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(HostprepError::DependencyMissing(format!(
            "{} (install them or set `privilege \"direct\"` when running as root)",
            missing.join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debian_and_derivatives_detected() {
        assert!(is_debian_family("NAME=\"Debian GNU/Linux\"\nID=debian\n"));
        assert!(is_debian_family("ID=ubuntu\nID_LIKE=debian\n"));
        assert!(is_debian_family("ID=linuxmint\nID_LIKE=\"ubuntu debian\"\n"));
    }

    #[test]
    fn test_other_families_rejected() {
        assert!(!is_debian_family("ID=arch\n"));
        assert!(!is_debian_family("ID=fedora\nID_LIKE=\"rhel centos\"\n"));
        assert!(!is_debian_family(""));
    }

    #[test]
    fn test_missing_tool_is_reported() {
        let err = require_tools(&["hostprep-no-such-tool"], Privilege::Direct)
            .expect_err("tool must be missing");
        assert!(err.to_string().contains("hostprep-no-such-tool"));
    }

    #[test]
    fn test_present_tool_passes() {
        assert!(require_tools(&["sh"], Privilege::Direct).is_ok());
    }
}
