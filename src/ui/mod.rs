use colored::Colorize;
use std::sync::atomic::{AtomicBool, Ordering};

pub mod progress;
pub mod prompt;

static QUIET: AtomicBool = AtomicBool::new(false);
static VERBOSE: AtomicBool = AtomicBool::new(false);
static INTERRUPTED: AtomicBool = AtomicBool::new(false);

/// Apply the colour preference ("auto", "always", "never").
///
/// `NO_COLOR` wins over "auto" and is already honoured by `colored` itself.
pub fn init_colors(mode: &str) {
    match mode {
        "always" => colored::control::set_override(true),
        "never" => colored::control::set_override(false),
        _ => colored::control::unset_override(),
    }
}

pub fn set_quiet(quiet: bool) {
    QUIET.store(quiet, Ordering::Relaxed);
}

pub fn set_verbose(verbose: bool) {
    VERBOSE.store(verbose, Ordering::Relaxed);
}

pub fn is_quiet() -> bool {
    QUIET.load(Ordering::Relaxed)
}

pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::Relaxed)
}

pub fn mark_interrupted() {
    INTERRUPTED.store(true, Ordering::SeqCst);
}

pub fn is_interrupted() -> bool {
    INTERRUPTED.load(Ordering::SeqCst)
}

pub fn header(title: &str) {
    if is_quiet() {
        return;
    }
    println!("\n{}", title.bold().underline());
}

pub fn success(msg: &str) {
    if is_quiet() {
        return;
    }
    println!("{} {}", "✓".green().bold(), msg);
}

pub fn info(msg: &str) {
    if is_quiet() {
        return;
    }
    println!("{} {}", "ℹ".blue().bold(), msg);
}

/// Detail line shown only with --verbose
pub fn verbose(msg: &str) {
    if !is_verbose() || is_quiet() {
        return;
    }
    eprintln!("{} {}", "·".bright_black(), msg.bright_black());
}

pub fn warning(msg: &str) {
    eprintln!("{} {}", "⚠".yellow().bold(), msg);
}

pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red().bold(), msg);
}

pub fn separator() {
    if is_quiet() {
        return;
    }
    println!("{}", "─".repeat(60).bright_black());
}

pub fn indent(msg: &str, level: usize) {
    if is_quiet() {
        return;
    }
    let spaces = " ".repeat(level * 2);
    println!("{}{}", spaces, msg);
}
