use dialoguer::Confirm;
use tracing::warn;

use crate::view::ListView;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Success(String),
    Error(String),
}

/// The side-effecting half of the client: whatever shows the list, the
/// notifications and the confirmation prompt.
pub trait Ui {
    fn show_loading(&mut self);

    fn render(&mut self, view: &ListView);

    fn notify(&mut self, notification: Notification);

    fn confirm(&mut self, prompt: &str) -> bool;

    fn reset_form(&mut self);
}

/// Plain-text front-end for the CLI.
#[derive(Debug, Default)]
pub struct TerminalUi {
    /// Answer yes to every confirmation without prompting.
    pub assume_yes: bool,
    /// Print markup instead of text lines.
    pub html: bool,
    /// Suppress list output (e.g. when only a notification matters).
    pub quiet: bool,
}

impl Ui for TerminalUi {
    fn show_loading(&mut self) {}

    fn render(&mut self, view: &ListView) {
        if self.quiet {
            return;
        }
        if self.html {
            println!("{}", view.to_html());
            return;
        }

        match view {
            ListView::Empty => println!("No suggestions yet. Be the first!"),
            ListView::Cards(cards) => {
                for card in cards {
                    println!("[{}] {} ({}, suggested by {})", card.id, card.title, card.date, card.suggested_by);
                    if let Some(link) = &card.link {
                        println!("      {}", link);
                    }
                }
            }
        }
    }

    fn notify(&mut self, notification: Notification) {
        match notification {
            Notification::Success(msg) => println!("{}", msg),
            Notification::Error(msg) => eprintln!("{}", msg),
        }
    }

    fn confirm(&mut self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }

        Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .unwrap_or_else(|e| {
                warn!("Confirmation prompt failed, treating as no: {}", e);
                false
            })
    }

    fn reset_form(&mut self) {}
}
