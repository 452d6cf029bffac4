//! Debian package-manager command surface
//!
//! These builders are the compatibility contract with the OS packaging stack.
//! Retargeting hostprep to another distribution means replacing this file.

use crate::runner::Invocation;
use std::path::Path;

/// Refresh the package index
pub fn refresh_index() -> Invocation {
    Invocation::new("apt-get").arg("update")
}

/// Upgrade every installed package
pub fn upgrade_all() -> Invocation {
    Invocation::new("apt-get").args(["upgrade", "-y"])
}

pub fn install(package: &str) -> Invocation {
    Invocation::new("apt-get").args(["install", "-y", package])
}

pub fn remove(package: &str) -> Invocation {
    Invocation::new("apt-get").args(["remove", "-y", package])
}

/// Drop dependencies nothing needs any more
pub fn autoremove() -> Invocation {
    Invocation::new("apt-get").args(["autoremove", "-y"])
}

/// Install a local archive file
pub fn install_archive(path: &Path) -> Invocation {
    Invocation::new("dpkg").args(["-i".to_string(), path.display().to_string()])
}
