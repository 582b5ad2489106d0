//! sheet-stream CLI - stream an XLSX workbook and print what the reader sees

use std::cell::Cell;
use std::fs::File;
use std::io::{self, Read};
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use sheet_stream_core::CellValue;
use sheet_stream_xlsx::{EventName, ReadEvent, ReadOptions, Row, WorkbookReader};

#[derive(Parser)]
#[command(name = "sheet-stream")]
#[command(
    author,
    version,
    about = "Stream an XLSX workbook in one pass and print its notifications"
)]
struct Cli {
    /// Input workbook, or `-` to read the archive from stdin
    input: PathBuf,

    /// Print an `entry` line for every archive entry
    #[arg(long)]
    entries: bool,

    /// Shared strings policy
    #[arg(long, value_name = "POLICY", value_parser = ["cache", "emit"])]
    shared_strings: Option<String>,

    /// Styles policy
    #[arg(long, value_name = "POLICY", value_parser = ["cache"])]
    styles: Option<String>,

    /// Hyperlinks policy
    #[arg(long, value_name = "POLICY", value_parser = ["cache", "emit"])]
    hyperlinks: Option<String>,

    /// Print a `worksheet` line whenever a worksheet part is dispatched
    #[arg(long)]
    worksheets: bool,

    /// Print every decoded row
    #[arg(long)]
    rows: bool,

    /// Stop reading at the first error and exit with a failure status
    #[arg(long)]
    strict: bool,
}

impl Cli {
    fn read_options(&self) -> Result<ReadOptions> {
        let mut pairs = Vec::new();
        if self.entries {
            pairs.push(("entries", "emit"));
        }
        if let Some(policy) = &self.shared_strings {
            pairs.push(("sharedStrings", policy.as_str()));
        }
        if let Some(policy) = &self.styles {
            pairs.push(("styles", policy.as_str()));
        }
        if let Some(policy) = &self.hyperlinks {
            pairs.push(("hyperlinks", policy.as_str()));
        }
        if self.worksheets {
            pairs.push(("worksheets", "emit"));
        }
        Ok(ReadOptions::from_pairs(pairs)?)
    }

    fn open_input(&self) -> Result<Box<dyn Read>> {
        if self.input.as_os_str() == "-" {
            return Ok(Box::new(io::stdin()));
        }
        let file = File::open(&self.input)
            .with_context(|| format!("Failed to open {}", self.input.display()))?;
        Ok(Box::new(file))
    }
}

/// Byte source that reports end of input once `closed` is set
struct Closable<R> {
    inner: R,
    closed: Rc<Cell<bool>>,
}

impl<R: Read> Read for Closable<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.closed.get() {
            return Ok(0);
        }
        self.inner.read(buf)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();
    let options = cli.read_options()?;

    let mut reader = WorkbookReader::new(options);
    let errors = Rc::new(Cell::new(0usize));
    let closed = Rc::new(Cell::new(false));

    let mut names = vec![
        EventName::Entry,
        EventName::SharedString,
        EventName::Worksheet,
        EventName::Hyperlinks,
        EventName::Hyperlink,
        EventName::Finished,
    ];
    // Rows are only decoded into cells when someone listens
    if cli.rows {
        names.push(EventName::Row);
    }
    for name in names {
        reader.on(name, print_event);
    }

    let seen = Rc::clone(&errors);
    let close = Rc::clone(&closed);
    let strict = cli.strict;
    reader.on(EventName::Error, move |event| {
        print_event(event);
        seen.set(seen.get() + 1);
        if strict {
            close.set(true);
        }
    });

    tracing::info!(input = %cli.input.display(), ?options, "streaming workbook");

    let input = cli.open_input()?;
    let result = reader.read_stream(Closable {
        inner: input,
        closed: Rc::clone(&closed),
    });

    if closed.get() {
        bail!("stopped after the first error");
    }
    result.with_context(|| format!("Failed to read {}", cli.input.display()))?;

    print_summary(&reader);

    if strict && errors.get() > 0 {
        bail!("{} error(s) reported", errors.get());
    }
    Ok(())
}

fn print_event(event: &ReadEvent<'_>) {
    match event {
        ReadEvent::Entry { path, kind } => println!("entry\t{}\t{}", path, kind),
        ReadEvent::SharedString { index, text } => {
            println!("shared-string\t{}\t{}", index, text.escape_debug())
        }
        ReadEvent::Worksheet(ws) => println!("worksheet\t{}", ws.sheet_number()),
        ReadEvent::Hyperlinks(links) => println!("hyperlinks\t{}", links.sheet_number()),
        ReadEvent::Hyperlink { sheet_number, link } => {
            println!("hyperlink\t{}\t{}\t{}", sheet_number, link.id, link.target)
        }
        ReadEvent::Row(row) => println!(
            "row\t{}\t{}\t{}",
            row.sheet_number,
            row.index + 1,
            format_cells(row)
        ),
        ReadEvent::Error(err) => println!("error\t{}", err),
        ReadEvent::Finished => println!("finished"),
    }
}

fn format_cells(row: &Row) -> String {
    row.cells
        .iter()
        .map(|cell| {
            let value = match cell.as_datetime() {
                Some(dt) => dt.to_string(),
                None => match &cell.value {
                    CellValue::Formula { text, cached_value } => match cached_value {
                        Some(v) => format!("{} [{}]", v, text),
                        None => text.clone(),
                    },
                    other => other.to_string(),
                },
            };
            format!("{}={}", cell.address, value.escape_debug())
        })
        .collect::<Vec<_>>()
        .join("\t")
}

fn print_summary(reader: &WorkbookReader) {
    if let Some(strings) = reader.shared_strings() {
        println!("summary\tshared strings\t{}", strings.len());
    }
    if let Some(table) = reader.styles().table() {
        println!("summary\tcell formats\t{}", table.len());
    }
    for sheet in reader.worksheets() {
        let dimension = sheet
            .dimension()
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "summary\tsheet {}\t{} rows\t{} hyperlinks\tdimension {}",
            sheet.sheet_number(),
            sheet.rows_read(),
            sheet.hyperlinks().len(),
            dimension
        );
    }
}
