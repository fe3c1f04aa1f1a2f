//! Operator review between cut rounds.

use std::io::{self, BufRead, Stdout, Write};

use tally_core::{CutNotice, Reviewer};

/// Prints the cut list and waits for the operator to press Enter.
pub struct PromptReviewer<R, W> {
    input: R,
    output: W,
}

impl PromptReviewer<io::StdinLock<'static>, Stdout> {
    /// Prompt on the process terminal.
    pub fn stdin() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> PromptReviewer<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn prompt(&mut self, notice: &CutNotice) -> io::Result<()> {
        let cut: Vec<&str> = notice.cut_set.iter().map(String::as_str).collect();
        writeln!(
            self.output,
            "Iteration {}, Projects for cut: {}",
            notice.round,
            cut.join(", ")
        )?;
        write!(self.output, "Press Enter to continue...")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed before the cut round was acknowledged",
            ));
        }
        Ok(())
    }
}

impl<R: BufRead, W: Write> Reviewer for PromptReviewer<R, W> {
    fn review(&mut self, notice: &CutNotice) -> tally_core::Result<()> {
        self.prompt(notice)
            .map_err(|e| tally_core::Error::Review(e.to_string()))
    }
}
