//! Interactive stat editor for unit rows.
//!
//! Runs between fetch and render so corrected values reach both the page and
//! the registry. Console I/O goes through [`Prompt`], which takes any reader
//! and writer so the dialogue can be scripted in tests.

use anyhow::Result;
use std::collections::BTreeSet;
use std::io::{self, BufRead, IsTerminal, Write};

use crate::log;
use crate::model::edit::{EditError, apply_stat_edit, canonical_column};
use crate::model::stats::{editable_columns, stat_long_name};
use crate::model::StatRow;

/// Line-based question/answer channel.
pub struct Prompt<R, W> {
    input: R,
    output: W,
}

impl Prompt<io::StdinLock<'static>, io::Stderr> {
    /// Console prompt, or `None` when stdin is not a terminal.
    pub fn console() -> Option<Self> {
        let stdin = io::stdin();
        stdin.is_terminal().then(|| Self::new(stdin.lock(), io::stderr()))
    }
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print a line of context.
    fn say(&mut self, line: &str) -> Result<()> {
        writeln!(self.output, "{line}")?;
        Ok(())
    }

    /// Ask a question. `None` once input is exhausted.
    fn ask(&mut self, question: &str) -> Result<Option<String>> {
        write!(self.output, "{question}")?;
        self.output.flush()?;

        let mut answer = String::new();
        if self.input.read_line(&mut answer)? == 0 {
            return Ok(None);
        }
        Ok(Some(answer.trim().to_owned()))
    }

    /// Yes/no question; anything but `y`/`yes` (or EOF) is no.
    fn confirm(&mut self, question: &str) -> Result<bool> {
        let answer = self.ask(question)?.unwrap_or_default().to_lowercase();
        Ok(answer == "y" || answer == "yes")
    }
}

// =============================================================================
// Dialogue
// =============================================================================

/// Offer to edit `rows`. Returns whether anything changed.
pub fn edit_rows<R: BufRead, W: Write>(prompt: &mut Prompt<R, W>, rows: &mut [StatRow]) -> Result<bool> {
    if rows.is_empty() {
        log!("edit"; "no unit profile found to edit");
        return Ok(false);
    }

    if !prompt.confirm("\nWould you like to edit unit stats? (y/n): ")? {
        log!("edit"; "skipping stat editing");
        return Ok(false);
    }

    for (index, row) in rows.iter().enumerate() {
        prompt.say(&format!("\n  [{}] {}", index + 1, row.label(index)))?;
        for column in editable_columns() {
            prompt.say(&format!(
                "      {:<3} ({:<15}): {}",
                column,
                stat_long_name(column),
                row.display(column)
            ))?;
        }
    }

    let mut edited = BTreeSet::new();
    loop {
        let Some(index) = choose_row(prompt, rows.len(), &edited)? else {
            break;
        };

        if edit_row(prompt, &mut rows[index], index)? {
            edited.insert(index);
        }

        if rows.len() == 1 || !prompt.confirm("\nEdit another unit? (y/n): ")? {
            break;
        }
    }

    if edited.is_empty() {
        log!("edit"; "no stat changes made");
        return Ok(false);
    }
    for &index in &edited {
        let row = &rows[index];
        let stats: Vec<String> = editable_columns()
            .iter()
            .map(|c| format!("{c}:{}", row.display(c)))
            .collect();
        log!("edit"; "final stats for {} = {}", row.label(index), stats.join(", "));
    }
    Ok(true)
}

/// Pick the row to edit. `None` means done.
fn choose_row<R: BufRead, W: Write>(
    prompt: &mut Prompt<R, W>,
    count: usize,
    edited: &BTreeSet<usize>,
) -> Result<Option<usize>> {
    if count == 1 {
        return Ok(Some(0));
    }

    loop {
        let available: Vec<String> = (1..=count).map(|i| i.to_string()).collect();
        prompt.say(&format!("\nAvailable units: {}", available.join(", ")))?;
        if !edited.is_empty() {
            let done: Vec<String> = edited.iter().map(|i| (i + 1).to_string()).collect();
            prompt.say(&format!("Already edited: {}", done.join(", ")))?;
        }

        let Some(choice) = prompt.ask(&format!("Which unit? (1-{count} or 'done'): "))? else {
            return Ok(None);
        };
        if choice.eq_ignore_ascii_case("done") {
            return Ok(None);
        }
        match choice.parse::<usize>() {
            Ok(n) if (1..=count).contains(&n) => return Ok(Some(n - 1)),
            Ok(_) => prompt.say(&format!("  Please enter a number between 1 and {count}."))?,
            Err(_) => prompt.say("  Invalid input.")?,
        }
    }
}

/// Edit stats of one row until `done`. Returns whether anything changed.
fn edit_row<R: BufRead, W: Write>(prompt: &mut Prompt<R, W>, row: &mut StatRow, index: usize) -> Result<bool> {
    let name = row.label(index);
    let columns = editable_columns().join(", ");
    log!("edit"; "editing stats for: {}", name);

    let mut changed = false;
    loop {
        let question = format!("\nEnter stat to edit ({columns} or 'done'): ");
        let Some(stat) = prompt.ask(&question)? else {
            break;
        };
        if stat.eq_ignore_ascii_case("done") {
            break;
        }
        let Some(column) = canonical_column(&stat) else {
            prompt.say(&format!("  Invalid stat. Choose from: {columns}"))?;
            continue;
        };

        prompt.say(&format!(
            "  Current {} ({}): {}",
            column,
            stat_long_name(column),
            row.display(column)
        ))?;
        let Some(value) = prompt.ask("  Enter new value (or press Enter to skip): ")? else {
            break;
        };

        match apply_stat_edit(row, column, &value) {
            Ok(previous) => {
                log!("edit"; "{}: {} {} -> {}", name, column, previous, row.display(column));
                changed = true;
            }
            Err(EditError::Empty) => {}
            Err(e) => prompt.say(&format!("  {e}"))?,
        }
    }
    Ok(changed)
}
