// UI layer: the go/no-go gate shown before any card is created, and the
// console report for an ambiguous deck search.

use std::io::{self, BufRead, IsTerminal, Write};

use console::{Key, Term};

use crate::api::Deck;

/// A synchronous yes/no decision taken before the import loop starts.
pub trait Confirm {
    fn confirm(&mut self) -> io::Result<bool>;
}

/// Waits for a single key press. Escape cancels; anything else proceeds.
/// Ctrl+C aborts the run.
///
/// When stdin is not a terminal (piped input, CI) one line is read from it
/// instead; end of input cancels.
pub struct KeypressGate;

impl Confirm for KeypressGate {
    fn confirm(&mut self) -> io::Result<bool> {
        let term = Term::stdout();
        if !io::stdin().is_terminal() {
            term.write_line("Press Enter to continue, or Ctrl+C to quit")?;
            return line_confirms(io::stdin().lock());
        }
        term.write_line("Press any key to continue, Esc to cancel, or Ctrl+C to quit")?;
        Ok(key_confirms(&term.read_key()?))
    }
}

fn line_confirms<R: BufRead>(mut input: R) -> io::Result<bool> {
    // End of input means nobody is there to say yes.
    let mut line = String::new();
    Ok(input.read_line(&mut line)? > 0)
}

fn key_confirms(key: &Key) -> bool {
    *key != Key::Escape
}

/// Always proceeds without asking. Used for `--yes`.
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&mut self) -> io::Result<bool> {
        Ok(true)
    }
}

/// Print every matching deck as `title id` so the user can pick a more
/// specific search term.
pub fn print_ambiguous<W: Write + ?Sized>(out: &mut W, term: &str, decks: &[Deck]) -> io::Result<()> {
    writeln!(out, "Found {} decks containing '{}'", decks.len(), term)?;
    writeln!(out, "Decks found:")?;
    for deck in decks {
        writeln!(out, "{} {}", deck.title, deck.id)?;
    }
    writeln!(
        out,
        "Be more specific to avoid adding cards to the wrong deck, or name the deck more uniquely in Codecks."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ambiguous_report_lists_title_and_id() {
        let decks = vec![
            Deck { id: "d1".into(), title: "Sprint 1".into() },
            Deck { id: "d2".into(), title: "Sprint 2".into() },
        ];
        let mut out = Vec::new();
        print_ambiguous(&mut out, "Sprint", &decks).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("Found 2 decks containing 'Sprint'\n"));
        assert!(text.contains("Sprint 1 d1\n"));
        assert!(text.contains("Sprint 2 d2\n"));
        assert!(text.contains("Be more specific"));
    }

    #[test]
    fn piped_confirmation_needs_a_line() {
        assert!(line_confirms(io::Cursor::new("\n")).unwrap());
        assert!(line_confirms(io::Cursor::new("y\n")).unwrap());
        assert!(!line_confirms(io::Cursor::new("")).unwrap());
    }

    #[test]
    fn escape_is_the_only_key_that_cancels() {
        assert!(!key_confirms(&Key::Escape));
        assert!(key_confirms(&Key::Enter));
        assert!(key_confirms(&Key::Char(' ')));
        assert!(key_confirms(&Key::Char('q')));
    }

    #[test]
    fn assume_yes_always_confirms() {
        assert!(AssumeYes.confirm().unwrap());
    }
}
