use crate::ui;
use colored::Colorize;

/// Per-item progress line for a batch of packages or archives.
///
/// Each item gets its own line so prompts and warnings raised while the item
/// is processed stay readable.
pub struct BatchProgress {
    total: usize,
    current: usize,
    width: usize,
}

impl BatchProgress {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            current: 0,
            width: 20,
        }
    }

    /// Announce the next item
    pub fn step(&mut self, message: &str) {
        if self.current < self.total {
            self.current += 1;
        }
        if !ui::is_quiet() {
            println!("{}", self.render(message));
        }
    }

    fn percent(&self) -> usize {
        if self.total > 0 {
            (self.current * 100) / self.total
        } else {
            100
        }
    }

    fn render(&self, message: &str) -> String {
        let filled = if self.total > 0 {
            (self.current * self.width) / self.total
        } else {
            self.width
        };

        let bar = "■".repeat(filled);
        let empty = "□".repeat(self.width.saturating_sub(filled));

        format!(
            "{} {} [{}{}] {}/{} {}%",
            "▸".dimmed(),
            message.cyan(),
            bar.green(),
            empty.dimmed(),
            self.current.to_string().bold(),
            self.total.to_string().dimmed(),
            self.percent().to_string().bold(),
        )
    }
}
