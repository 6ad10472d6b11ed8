// Row import: one card per CSV row, first column as content.
//
// The file is read once into memory. Its raw line count is shown for the
// confirmation message, so a header row (if the file has one) is included
// in it and is also sent as a card; there is no header handling at all.
//
// A blank line is a row with no content column. The csv reader skips those
// silently, so the row layout is scanned separately to find them and to
// give every record the line it starts on.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use csv::{ByteRecord, ReaderBuilder};
use tracing::{error, info};

use crate::api::{CreateCard, Deck, DeckApi};
use crate::error::ImportError;
use crate::throttle::Throttle;
use crate::ui::Confirm;

/// Counts for the closing summary line. Nothing per row is kept.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    /// Raw line count shown before confirmation.
    pub lines: usize,
    pub created: usize,
    pub failed: usize,
}

/// Import every row of `path` into `deck`.
///
/// A create request that fails is reported and the loop moves on. A row
/// whose content cannot be encoded, blank rows included, stops the whole
/// run before its request is sent, and later rows are not attempted.
pub fn import_rows<A, C, T, W>(
    api: &A,
    deck: &Deck,
    path: &Path,
    gate: &mut C,
    throttle: &mut T,
    out: &mut W,
) -> Result<ImportSummary, ImportError>
where
    A: DeckApi + ?Sized,
    C: Confirm + ?Sized,
    T: Throttle + ?Sized,
    W: Write + ?Sized,
{
    let mut bytes = Vec::new();
    File::open(path)
        .and_then(|mut file| file.read_to_end(&mut bytes))
        .map_err(|source| ImportError::Open {
            path: path.to_path_buf(),
            source,
        })?;
    let lines = count_lines(&bytes);

    writeln!(
        out,
        "About to create {} cards in deck '{}' with ID {}",
        lines, deck.title, deck.id
    )?;
    out.flush()?;
    info!(path = %path.display(), lines, deck = %deck.id, "awaiting confirmation");

    if !gate.confirm()? {
        info!("import cancelled at confirmation");
        return Err(ImportError::Cancelled);
    }

    let mut summary = ImportSummary {
        lines,
        ..ImportSummary::default()
    };
    let mut layout = row_starts(&bytes).into_iter();
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes.as_slice());
    let mut records = reader.byte_records();
    let mut next_line = 1;

    loop {
        let (line, record) = match layout.next() {
            Some(RowStart::Blank(line)) => (line, ByteRecord::new()),
            start => {
                let line = match start {
                    Some(RowStart::Record(line)) => line,
                    _ => next_line,
                };
                match records.next() {
                    Some(result) => {
                        let record =
                            result.map_err(|source| ImportError::Csv { line, source })?;
                        (line, record)
                    }
                    None => break,
                }
            }
        };
        next_line = line + 1;

        let card = match card_for_row(&record, &deck.id) {
            Ok(card) => card,
            Err(reason) => {
                error!(line, %reason, "invalid payload, aborting import");
                return Err(ImportError::Payload { line, reason });
            }
        };

        match api.create_card(&card) {
            Ok(()) => {
                summary.created += 1;
                info!(line, "card created");
                writeln!(out, "Card '{}' created successfully!", card.content)?;
            }
            Err(e) => {
                summary.failed += 1;
                error!(line, error = %e, "card creation failed");
                writeln!(out, "Error creating card '{}': {}", card.content, e)?;
            }
        }
        throttle.wait();
    }

    writeln!(
        out,
        "Done: {} created, {} failed",
        summary.created, summary.failed
    )?;
    info!(created = summary.created, failed = summary.failed, "import finished");
    Ok(summary)
}

/// Build the create payload from column 0 of a record.
///
/// The only encoding check needed is that the field is text: the JSON
/// encoder escapes everything else.
pub fn card_for_row(record: &ByteRecord, deck_id: &str) -> Result<CreateCard, String> {
    let field = record
        .get(0)
        .ok_or_else(|| "row has no content column".to_string())?;
    let content =
        std::str::from_utf8(field).map_err(|e| format!("content is not valid UTF-8: {e}"))?;
    Ok(CreateCard::new(content, deck_id))
}

/// Number of physical lines, as a text editor would count them. A final
/// line without a trailing newline still counts.
fn count_lines(bytes: &[u8]) -> usize {
    let newlines = bytes.iter().filter(|&&b| b == b'\n').count();
    match bytes.last() {
        Some(b'\n') | None => newlines,
        Some(_) => newlines + 1,
    }
}

/// Where a CSV row begins, by 1-based line number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowStart {
    Record(usize),
    Blank(usize),
}

/// Walk the file the way the csv reader splits it (default quoting, `,`
/// delimiter) and list every row in order, blank ones included. Newlines
/// inside quoted fields do not start a row but still advance the line.
fn row_starts(bytes: &[u8]) -> Vec<RowStart> {
    #[derive(Clone, Copy, PartialEq, Eq)]
    enum State {
        FieldStart,
        Unquoted,
        Quoted,
        QuoteInQuoted,
    }
    use State::*;

    let mut rows = Vec::new();
    let mut state = FieldStart;
    let mut line = 1;
    let mut row_line = 1;
    let mut row_empty = true;

    for &b in bytes {
        if b == b'\n' {
            line += 1;
            if state != Quoted {
                rows.push(if row_empty {
                    RowStart::Blank(row_line)
                } else {
                    RowStart::Record(row_line)
                });
                row_line = line;
                row_empty = true;
                state = FieldStart;
                continue;
            }
        }
        if b != b'\r' {
            row_empty = false;
        }
        state = match (state, b) {
            (FieldStart, b'"') => Quoted,
            (FieldStart | Unquoted | QuoteInQuoted, b',') => FieldStart,
            (FieldStart | Unquoted, _) => Unquoted,
            (Quoted, b'"') => QuoteInQuoted,
            (Quoted, _) => Quoted,
            (QuoteInQuoted, b'"') => Quoted,
            (QuoteInQuoted, _) => Unquoted,
        };
    }
    if !row_empty {
        rows.push(RowStart::Record(row_line));
    }
    rows
}
