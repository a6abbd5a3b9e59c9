//! Interactive print-cost accounting.
//!
//! Lists the catalog, then repeatedly asks for a spool and the filament a
//! print used, books each answer against an [`InventorySession`] and finally
//! prints a usage summary.

use crate::catalog::CatalogSource;
use crate::report;
use anyhow::Result;
use rust_decimal::RoundingStrategy;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use spoolcost_core::{InventorySession, SessionSummary, Spool};
use std::io::Write;

const SELECT_PROMPT: &str = "\nSelect a spool by number: ";
const QUANTITY_PROMPT: &str = "Enter filament used for the print (e.g., '100g' or '1.34m'): ";
const ANOTHER_PROMPT: &str = "\nDo you want to add another spool? (y/n): ";

/// Source of interactive input lines.
pub trait LineReader {
    /// Show `prompt` and read one line.
    ///
    /// Returns `None` once the user ends input (EOF or Ctrl-C).
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;
}

/// Terminal line reader with editing and history.
pub struct RustylineReader {
    editor: DefaultEditor,
}

impl RustylineReader {
    /// Create a reader attached to the terminal.
    pub fn new() -> Result<Self> {
        Ok(Self {
            editor: DefaultEditor::new()?,
        })
    }
}

impl LineReader for RustylineReader {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = self.editor.add_history_entry(line.as_str());
                }
                Ok(Some(line))
            }
            Err(ReadlineError::Eof | ReadlineError::Interrupted) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// Drive one accounting session over `catalog`.
///
/// Invalid selections and rejected quantities are reported on `out` and
/// asked again. An empty quantity drops the selected spool. The session ends
/// when the user declines another spool or input ends.
pub fn run_session<R, W>(catalog: &[Spool], reader: &mut R, out: &mut W) -> Result<SessionSummary>
where
    R: LineReader + ?Sized,
    W: Write,
{
    let mut session = InventorySession::new(catalog);
    report::write_catalog(catalog, out)?;

    'spools: loop {
        out.flush()?;
        let Some(choice) = reader.read_line(SELECT_PROMPT)? else {
            break;
        };
        let spool = match session.select(&choice) {
            Ok(spool) => spool,
            Err(e) => {
                tracing::debug!("{e}");
                writeln!(out, "Invalid selection. Please try again.")?;
                continue;
            }
        };
        report::write_spool_details(spool, out)?;

        loop {
            out.flush()?;
            let Some(input) = reader.read_line(QUANTITY_PROMPT)? else {
                break 'spools;
            };
            if input.trim().is_empty() {
                session.abandon();
                continue 'spools;
            }

            match session.account(&input).map(|entry| entry.cost) {
                Ok(cost) => {
                    let cost = cost.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
                    writeln!(out, "Cost for this print: ${cost:.2}")?;
                    break;
                }
                Err(e) => {
                    writeln!(out, "Error: {e}")?;
                    if session.selected().is_none() {
                        continue 'spools;
                    }
                }
            }
        }

        out.flush()?;
        let Some(answer) = reader.read_line(ANOTHER_PROMPT)? else {
            break;
        };
        if !answer.trim().eq_ignore_ascii_case("y") {
            break;
        }
        session.resume();
    }

    Ok(session.finish()?)
}

/// Fetch the catalog from `source` and run an interactive session on the terminal.
pub fn run<S, W>(source: &S, out: &mut W) -> Result<()>
where
    S: CatalogSource + ?Sized,
    W: Write,
{
    let catalog = source.fetch_spools()?;
    tracing::debug!(source = source.name(), spools = catalog.len(), "catalog fetched");
    if catalog.is_empty() {
        writeln!(out, "No spools found.")?;
        return Ok(());
    }

    let mut reader = RustylineReader::new()?;
    let summary = run_session(&catalog, &mut reader, out)?;
    report::write_summary(&summary, out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use spoolcost_core::{Filament, SpoolId, Unit};
    use std::collections::VecDeque;

    /// Replays canned answers and records the prompts it was shown.
    struct ScriptedReader {
        lines: VecDeque<&'static str>,
        prompts: Vec<String>,
    }

    impl ScriptedReader {
        fn new(lines: &[&'static str]) -> Self {
            Self {
                lines: lines.iter().copied().collect(),
                prompts: Vec::new(),
            }
        }
    }

    impl LineReader for ScriptedReader {
        fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
            self.prompts.push(prompt.to_string());
            Ok(self.lines.pop_front().map(str::to_string))
        }
    }

    fn catalog() -> Vec<Spool> {
        vec![
            Spool::new(1, dec!(16.49), dec!(1000), dec!(912.13)).with_filament(
                Filament::new("PLA Red")
                    .with_material("PLA")
                    .with_color("ff0000"),
            ),
            Spool::new(2, dec!(20), dec!(1000), dec!(50))
                .with_filament(Filament::new("PETG Black").with_material("PETG")),
            Spool::new(3, dec!(25), dec!(0), dec!(0)).with_filament(Filament::new("Sample")),
        ]
    }

    fn drive(lines: &[&'static str]) -> (SessionSummary, String, ScriptedReader) {
        let catalog = catalog();
        let mut reader = ScriptedReader::new(lines);
        let mut out = Vec::new();
        let summary = run_session(&catalog, &mut reader, &mut out).unwrap();
        (summary, String::from_utf8(out).unwrap(), reader)
    }

    #[test]
    fn test_single_print() {
        let (summary, out, reader) = drive(&["1", "100g", "n"]);

        assert!(out.starts_with("Available Spools:\n1. PLA Red (ID: 1)"));
        assert!(out.contains("Selected Spool: PLA Red"));
        assert!(out.contains("Cost for this print: $1.65"));
        assert_eq!(summary.entries.len(), 1);
        assert_eq!(summary.total_cost, dec!(1.649));
        assert_eq!(
            reader.prompts,
            vec![SELECT_PROMPT, QUANTITY_PROMPT, ANOTHER_PROMPT]
        );
    }

    #[test]
    fn test_multiple_spools() {
        let (summary, _, _) = drive(&["1", "100g", "y", "2", "1m", "Y", "1", "10g", "n"]);

        let ids: Vec<_> = summary.entries.iter().map(|e| e.spool_id).collect();
        assert_eq!(ids, vec![SpoolId(1), SpoolId(2), SpoolId(1)]);
        assert_eq!(summary.entries[1].quantity.unit, Unit::Meters);
        let sum: rust_decimal::Decimal = summary.entries.iter().map(|e| e.cost).sum();
        assert_eq!(summary.total_cost, sum);
    }

    #[test]
    fn test_invalid_selection_is_asked_again() {
        let (summary, out, _) = drive(&["9", "abc", "2", "10g", "n"]);

        assert_eq!(out.matches("Invalid selection. Please try again.").count(), 2);
        assert_eq!(summary.entries[0].spool_id, SpoolId(2));
    }

    #[test]
    fn test_bad_quantity_keeps_spool_selected() {
        let (summary, out, reader) = drive(&["2", "5kg", "60g", "40g", "n"]);

        assert!(out.contains("Error: "), "format error reported");
        assert!(out.contains("exceeds remaining spool weight"));
        assert_eq!(summary.entries.len(), 1);
        assert_eq!(summary.entries[0].grams, dec!(40));
        assert_eq!(
            reader.prompts.iter().filter(|p| *p == QUANTITY_PROMPT).count(),
            3
        );
    }

    #[test]
    fn test_unpriceable_spool_returns_to_selection() {
        let (summary, out, reader) = drive(&["3", "0g", "1", "1g", "n"]);

        assert!(out.contains("cannot price spool 3"));
        assert_eq!(summary.entries.len(), 1);
        assert_eq!(summary.entries[0].spool_id, SpoolId(1));
        assert_eq!(reader.prompts[2], SELECT_PROMPT);
    }

    #[test]
    fn test_empty_quantity_abandons_spool() {
        let (summary, _, reader) = drive(&["1", "", "2", "5g", "n"]);

        assert_eq!(summary.entries.len(), 1);
        assert_eq!(summary.entries[0].spool_id, SpoolId(2));
        assert_eq!(reader.prompts[2], SELECT_PROMPT);
    }

    #[test]
    fn test_end_of_input_finishes_session() {
        let (summary, _, _) = drive(&["1", "100g", "y", "2"]);
        assert_eq!(summary.entries.len(), 1);

        let (summary, out, _) = drive(&[]);
        assert!(summary.entries.is_empty());
        assert_eq!(summary.total_cost, dec!(0));
        assert!(out.starts_with("Available Spools:"));
    }

    #[test]
    fn test_session_usage_is_cumulative() {
        let (summary, out, _) = drive(&["2", "30g", "y", "2", "30g", "20g", "n"]);

        assert!(out.contains("exceeds remaining spool weight (20.00 g)"));
        let grams: Vec<_> = summary.entries.iter().map(|e| e.grams).collect();
        assert_eq!(grams, vec![dec!(30), dec!(20)]);
    }

    struct FixedCatalog(Vec<Spool>);

    impl CatalogSource for FixedCatalog {
        fn fetch_spools(&self) -> Result<Vec<Spool>, crate::catalog::CatalogError> {
            Ok(self.0.clone())
        }

        fn name(&self) -> &'static str {
            "fixed"
        }
    }

    #[test]
    fn test_empty_catalog() {
        let mut out = Vec::new();
        run(&FixedCatalog(Vec::new()), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "No spools found.\n");
    }
}
