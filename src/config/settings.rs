//! Settings Module
//!
//! Reads `hostprep.kdl`:
//!
//! ```kdl
//! privilege "sudo"
//! archive-dir "DEB"
//! color "auto"
//!
//! accounts {
//!     shell "/bin/bash"
//!     home-base "/home"
//!     admin-group "sudo"
//!     skeleton "/etc/skel"
//! }
//!
//! category "System Utilities" {
//!     htop
//!     curl
//! }
//! ```
//!
//! Every key is optional. Declaring any `category` replaces the built-in
//! catalog instead of extending it.

use crate::error::{HostprepError, Result};
use crate::runner::Privilege;
use crate::utils::{paths, sanitize};
use kdl::{KdlDocument, KdlNode};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

const VALID_COLORS: &[&str] = &["auto", "always", "never"];

/// Account defaults used when creating and renaming users
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountSettings {
    pub shell: String,
    pub home_base: PathBuf,
    pub admin_group: String,
    pub skeleton: PathBuf,
}

impl Default for AccountSettings {
    fn default() -> Self {
        Self {
            shell: "/bin/bash".to_string(),
            home_base: PathBuf::from("/home"),
            admin_group: "sudo".to_string(),
            skeleton: PathBuf::from("/etc/skel"),
        }
    }
}

/// Named group of packages installed or removed together
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub name: String,
    pub packages: Vec<String>,
}

impl Category {
    fn new(name: &str, packages: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            packages: packages.iter().map(|p| p.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    pub privilege: Privilege,
    pub archive_dir: PathBuf,
    pub color: String,
    pub accounts: AccountSettings,
    pub categories: Vec<Category>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            privilege: Privilege::Sudo,
            archive_dir: PathBuf::from("DEB"),
            color: "auto".to_string(),
            accounts: AccountSettings::default(),
            categories: default_categories(),
        }
    }
}

fn default_categories() -> Vec<Category> {
    vec![
        Category::new("Package Management", &["python3-pip", "virtualenv"]),
        Category::new("System Utilities", &["htop", "ncdu", "curl", "wget"]),
        Category::new("Development Tools", &["git", "docker.io", "code"]),
        Category::new("Automation", &["ansible", "cron"]),
        Category::new("Monitoring", &["netdata"]),
    ]
}

impl Settings {
    /// Load from `path`, or from the default location when `None`.
    ///
    /// A missing default file yields the built-in defaults; a missing
    /// explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (file, explicit) = match path {
            Some(p) => (paths::expand_home(p)?, true),
            None => (paths::config_file()?, false),
        };

        if !file.exists() {
            if explicit {
                return Err(HostprepError::ConfigError(format!(
                    "Config file not found: {}",
                    file.display()
                )));
            }
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&file).map_err(|source| HostprepError::IoError {
            path: file.clone(),
            source,
        })?;

        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let doc: KdlDocument = content.parse().map_err(|e: kdl::KdlError| {
            let err_msg = e.to_string();
            let hint = if err_msg.contains("unexpected end of file") {
                "\nHint: You might be missing a closing brace '}'."
            } else if err_msg.contains("expected") {
                "\nHint: Check that entries follow the format: key \"value\" or category \"Name\" { pkg }"
            } else {
                ""
            };
            HostprepError::ConfigError(format!("KDL parsing error: {}{}", err_msg, hint))
        })?;

        let mut settings = Self::default();
        let mut categories: Vec<Category> = Vec::new();

        for node in doc.nodes() {
            match node.name().value() {
                "privilege" => {
                    let value = single_string(node)?;
                    settings.privilege = Privilege::parse(&value).ok_or_else(|| {
                        HostprepError::ConfigError(format!(
                            "Invalid value for 'privilege': '{}'. Valid: sudo, direct",
                            value
                        ))
                    })?;
                }
                "archive-dir" => {
                    settings.archive_dir = paths::expand_home(Path::new(&single_string(node)?))?;
                }
                "color" => {
                    let value = single_string(node)?;
                    if !VALID_COLORS.contains(&value.as_str()) {
                        return Err(HostprepError::ConfigError(format!(
                            "Invalid value for 'color': '{}'. Valid: {}",
                            value,
                            VALID_COLORS.join(", ")
                        )));
                    }
                    settings.color = value;
                }
                "accounts" => parse_accounts(node, &mut settings.accounts)?,
                "category" => {
                    let category = parse_category(node)?;
                    if categories
                        .iter()
                        .any(|c| c.name.eq_ignore_ascii_case(&category.name))
                    {
                        return Err(HostprepError::ConfigError(format!(
                            "Category '{}' is declared twice",
                            category.name
                        )));
                    }
                    categories.push(category);
                }
                other => {
                    return Err(HostprepError::ConfigError(format!(
                        "Unknown setting: '{}'. Valid settings: privilege, archive-dir, color, accounts, category",
                        other
                    )));
                }
            }
        }

        if !categories.is_empty() {
            settings.categories = categories;
        }

        Ok(settings)
    }

    /// Category by name, ignoring ASCII case
    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// These settings as a KDL document that [`Settings::parse`] accepts
    pub fn render_kdl(&self) -> String {
        let mut content = String::from("// hostprep settings\n\n");

        content.push_str(&format!("privilege {}\n", quote(self.privilege.as_str())));
        content.push_str(&format!(
            "archive-dir {}\n",
            quote(&self.archive_dir.to_string_lossy())
        ));
        content.push_str(&format!("color {}\n\n", quote(&self.color)));

        content.push_str("accounts {\n");
        content.push_str(&format!("    shell {}\n", quote(&self.accounts.shell)));
        content.push_str(&format!(
            "    home-base {}\n",
            quote(&self.accounts.home_base.to_string_lossy())
        ));
        content.push_str(&format!(
            "    admin-group {}\n",
            quote(&self.accounts.admin_group)
        ));
        content.push_str(&format!(
            "    skeleton {}\n",
            quote(&self.accounts.skeleton.to_string_lossy())
        ));
        content.push_str("}\n");

        for category in &self.categories {
            content.push_str(&format!("\ncategory {} {{\n", quote(&category.name)));
            for package in &category.packages {
                content.push_str(&format!("    {}\n", quote(package)));
            }
            content.push_str("}\n");
        }

        content
    }

    /// Write [`Settings::render_kdl`] to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| HostprepError::IoError {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, self.render_kdl()).map_err(|source| HostprepError::IoError {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn parse_accounts(node: &KdlNode, accounts: &mut AccountSettings) -> Result<()> {
    let Some(children) = node.children() else {
        return Ok(());
    };

    for child in children.nodes() {
        match child.name().value() {
            "shell" => accounts.shell = single_string(child)?,
            "home-base" => accounts.home_base = PathBuf::from(single_string(child)?),
            "admin-group" => {
                let group = single_string(child)?;
                sanitize::validate_username(&group).map_err(|_| {
                    HostprepError::ConfigError(format!("Invalid admin group name: {}", group))
                })?;
                accounts.admin_group = group;
            }
            "skeleton" => accounts.skeleton = PathBuf::from(single_string(child)?),
            other => {
                return Err(HostprepError::ConfigError(format!(
                    "Unknown accounts setting: '{}'. Valid: shell, home-base, admin-group, skeleton",
                    other
                )));
            }
        }
    }

    if !accounts.home_base.is_absolute() || !accounts.skeleton.is_absolute() {
        return Err(HostprepError::ConfigError(
            "accounts: home-base and skeleton must be absolute paths".to_string(),
        ));
    }

    Ok(())
}

fn parse_category(node: &KdlNode) -> Result<Category> {
    let name = single_string(node)?;
    let mut packages: Vec<String> = Vec::new();

    if let Some(children) = node.children() {
        for child in children.nodes() {
            let package = child.name().value().to_string();
            sanitize::validate_package_name(&package).map_err(|e| {
                HostprepError::ConfigError(format!("Category '{}': {}", name, e))
            })?;
            if !packages.contains(&package) {
                packages.push(package);
            }
        }
    }

    if packages.is_empty() {
        return Err(HostprepError::ConfigError(format!(
            "Category '{}' lists no packages",
            name
        )));
    }

    Ok(Category { name, packages })
}

/// The first entry of `node` as a string
fn single_string(node: &KdlNode) -> Result<String> {
    node.entries()
        .first()
        .and_then(|entry| entry.value().as_string())
        .map(str::to_string)
        .ok_or_else(|| {
            HostprepError::ConfigError(format!(
                "'{}' expects a string value",
                node.name().value()
            ))
        })
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}
