//! Terminal fallback for the matcher's interactive tier.

use skhelper_core::{Chooser, SearchCandidate};
use std::cell::RefCell;
use std::io::{self, BufRead, Write};

/// Lists the candidates on `output` and reads a 1-based selection from
/// `input`. An empty, invalid or unreadable answer counts as a cancel.
pub struct TerminalChooser<R, W> {
    input: RefCell<R>,
    output: RefCell<W>,
}

impl TerminalChooser<io::StdinLock<'static>, io::Stderr> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> TerminalChooser<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input: RefCell::new(input),
            output: RefCell::new(output),
        }
    }

    fn prompt(&self, query: &str, candidates: &[SearchCandidate]) -> io::Result<Option<usize>> {
        let mut output = self.output.borrow_mut();
        writeln!(output, "No automatic match for \"{}\". Candidates:", query)?;
        for (index, candidate) in candidates.iter().enumerate() {
            writeln!(
                output,
                "  {}) {} [{}]",
                index + 1,
                candidate.raw_name,
                candidate.catalog_id
            )?;
        }
        write!(output, "Select 1-{} (empty to skip): ", candidates.len())?;
        output.flush()?;

        let mut line = String::new();
        self.input.borrow_mut().read_line(&mut line)?;
        Ok(line
            .trim()
            .parse::<usize>()
            .ok()
            .filter(|n| (1..=candidates.len()).contains(n)))
    }
}

impl<R: BufRead, W: Write> Chooser for TerminalChooser<R, W> {
    fn choose(&self, query: &str, candidates: &[SearchCandidate]) -> Option<String> {
        if candidates.is_empty() {
            return None;
        }

        match self.prompt(query, candidates) {
            Ok(Some(n)) => Some(candidates[n - 1].catalog_id.clone()),
            Ok(None) => None,
            Err(err) => {
                tracing::warn!(error = %err, "Chooser prompt failed");
                None
            }
        }
    }
}
