// Console seam. The search loop only talks to the user through `Console`,
// so the terminal implementation (dialoguer + println) can be swapped for a
// scripted one in tests.

use crate::error::Result;
use crossterm::style::Stylize;
use dialoguer::Input;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

pub trait Console {
    /// Show `prompt` and read one line. Empty answers are allowed.
    fn ask(&mut self, prompt: &str) -> Result<String>;

    /// Print a line of output.
    fn show(&mut self, line: &str);

    /// Print an error line.
    fn error(&mut self, line: &str) {
        self.show(line);
    }

    /// Print a confirmation line.
    fn success(&mut self, line: &str) {
        self.show(line);
    }

    /// Run `work` while indicating that something slow is happening.
    fn busy<T>(&mut self, _message: &str, work: impl FnOnce() -> T) -> T {
        work()
    }
}

impl<T: Console> Console for &mut T {
    fn ask(&mut self, prompt: &str) -> Result<String> {
        (**self).ask(prompt)
    }

    fn show(&mut self, line: &str) {
        (**self).show(line)
    }

    fn error(&mut self, line: &str) {
        (**self).error(line)
    }

    fn success(&mut self, line: &str) {
        (**self).success(line)
    }

    fn busy<R>(&mut self, message: &str, work: impl FnOnce() -> R) -> R {
        (**self).busy(message, work)
    }
}

/// "yes"/"Yes please"/"y" count as yes; everything else is no.
pub fn is_affirmative(answer: &str) -> bool {
    let answer = answer.trim().to_lowercase();
    answer.starts_with("yes") || answer == "y"
}

/// Interactive terminal console.
#[derive(Default)]
pub struct TerminalConsole;

impl Console for TerminalConsole {
    fn ask(&mut self, prompt: &str) -> Result<String> {
        // dialoguer appends its own ": " separator.
        let prompt = prompt.trim_end().trim_end_matches(':');
        let answer: String = Input::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?;
        Ok(answer)
    }

    fn show(&mut self, line: &str) {
        println!("{}", line);
    }

    fn error(&mut self, line: &str) {
        println!("{}", line.red());
    }

    fn success(&mut self, line: &str) {
        println!("{}", line.green());
    }

    fn busy<T>(&mut self, message: &str, work: impl FnOnce() -> T) -> T {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(100));
        let result = work();
        spinner.finish_and_clear();
        result
    }
}
