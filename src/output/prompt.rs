//! Interactive choice of the resume policy

use crate::state::Action;
use std::io::{BufRead, Write};

/// Asks the operator how to treat a previous crawl position
pub trait ActionPrompt {
    fn choose_action(&mut self, last_processed_page: u32) -> std::io::Result<Action>;
}

/// Yes/no prompt on a terminal (or any reader/writer pair)
///
/// `y` continues from the last processed page, `n` runs an update pass from
/// page 1. Anything else asks again.
pub struct TerminalPrompt<R, W> {
    input: R,
    output: W,
}

impl TerminalPrompt<std::io::StdinLock<'static>, std::io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalPrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> ActionPrompt for TerminalPrompt<R, W> {
    fn choose_action(&mut self, last_processed_page: u32) -> std::io::Result<Action> {
        writeln!(self.output, "Last processed page: {}", last_processed_page)?;
        writeln!(
            self.output,
            "(y) continues from the last processed page and scrapes everything from there to the end."
        )?;
        writeln!(
            self.output,
            "(n) starts again from page 1 and updates your data until it meets an already collected notice."
        )?;
        writeln!(
            self.output,
            "To scrape everything again from page 1, delete the records and state files first."
        )?;

        loop {
            write!(
                self.output,
                "Do you want to start from the last processed page? (y/n): "
            )?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    "no answer given",
                ));
            }

            match line.trim().to_ascii_lowercase().as_str() {
                "y" | "yes" => return Ok(Action::Continue),
                "n" | "no" => return Ok(Action::Update),
                _ => writeln!(self.output, "Please answer 'y' or 'n'.")?,
            }
        }
    }
}
