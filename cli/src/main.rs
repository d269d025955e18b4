use std::error::Error;
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use clap::{ArgAction, Parser};
use jsontab::{
    CellParsing, CsvReadOptions, CsvWriteOptions, Delimiter, GapMode, LineEnding, ListStrategy,
    Table, UnflattenOptions,
};
use serde::Serialize;
use serde_json::Value;

#[derive(Parser, Debug)]
#[command(name = "jsontab", version, about = "JSON ⇄ CSV table converter")]
struct Args {
    /// Input file path (.json or .csv). Omit or use '-' to read from stdin.
    input: Option<String>,

    /// Output file path (prints to stdout if omitted).
    #[arg(short, long, value_name = "file")]
    output: Option<String>,

    /// Force encode mode, JSON → CSV (overrides auto-detection).
    #[arg(short = 'e', long)]
    encode: bool,

    /// Force decode mode, CSV → JSON (overrides auto-detection).
    #[arg(short = 'd', long)]
    decode: bool,

    /// Field separator: , (comma), \\t (tab), | (pipe).
    #[arg(long, value_name = "char", value_parser = parse_delimiter)]
    delimiter: Option<Delimiter>,

    /// Use \r\n line endings when encoding.
    #[arg(long)]
    crlf: bool,

    /// Prefix encoded output with a byte-order mark.
    #[arg(long)]
    bom: bool,

    /// Expand every list to exactly this many columns instead of the
    /// observed maximum.
    #[arg(long, value_name = "count")]
    fixed: Option<usize>,

    /// Keep null placeholders for empty cells at list positions when
    /// decoding.
    #[arg(long)]
    sparse: bool,

    /// Keep decoded cells as strings instead of re-typing them.
    #[arg(long)]
    verbatim: bool,

    /// Treat CSV input as headerless / omit the header line when encoding.
    #[arg(long = "no-header", action = ArgAction::SetFalse, default_value_t = true)]
    header: bool,

    /// Always decode to a JSON array, even for a single row.
    #[arg(long)]
    collection: bool,

    /// Indentation for decoded JSON output (0 for compact).
    #[arg(long, value_name = "number", default_value_t = 2)]
    indent: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    Encode,
    Decode,
}

#[derive(Debug)]
enum InputSource {
    Stdin,
    File(String),
}

fn main() {
    if let Err(err) = run() {
        eprintln!("ERROR  {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let (input_text, input_source) = read_input(args.input.as_deref())?;
    let mode = resolve_mode(&args, &input_source)?;

    match mode {
        Mode::Encode => run_encode(&args, &input_text, &input_source),
        Mode::Decode => run_decode(&args, &input_text, &input_source),
    }
}

fn run_encode(args: &Args, input: &str, input_source: &InputSource) -> Result<(), Box<dyn Error>> {
    let value: Value = serde_json::from_str(input)?;
    let strategy = match args.fixed {
        Some(count) => ListStrategy::Fixed(count),
        None => ListStrategy::Dynamic,
    };
    let mut table = jsontab::to_table_with_strategy(&value, strategy)?;
    if !args.header {
        table.header.clear();
    }

    let mut options = CsvWriteOptions::new().with_byte_order_mark(args.bom);
    if let Some(delimiter) = args.delimiter {
        options = options.with_delimiter(delimiter);
    }
    if args.crlf {
        options = options.with_line_ending(LineEnding::CrLf);
    }

    let csv = jsontab::to_csv_with_options(&table, &options);
    let output_target = OutputTarget::from_arg(args.output.as_deref());
    write_output(output_target.path(), csv.as_bytes())?;
    if let OutputTarget::File(path) = &output_target {
        report_status(Mode::Encode, input_source, path);
    }
    Ok(())
}

fn run_decode(args: &Args, input: &str, input_source: &InputSource) -> Result<(), Box<dyn Error>> {
    let mut read_options = CsvReadOptions::new().with_has_header(args.header);
    if let Some(delimiter) = args.delimiter {
        read_options = read_options.with_delimiter(delimiter);
    }
    let table = jsontab::from_csv_with_options(input, &read_options)?;

    let value = if args.header {
        let unflatten = UnflattenOptions::new()
            .with_gap_mode(if args.sparse {
                GapMode::Sparse
            } else {
                GapMode::Break
            })
            .with_cell_parsing(if args.verbatim {
                CellParsing::Verbatim
            } else {
                CellParsing::Typed
            });
        let mut records = jsontab::table_to_values(&table, &unflatten);
        if records.len() == 1 && !args.collection {
            records.remove(0)
        } else {
            Value::Array(records)
        }
    } else {
        headerless_value(&table)
    };

    let output_target = OutputTarget::from_arg(args.output.as_deref());
    with_output_writer(output_target.path(), |writer| {
        write_json(writer, &value, args.indent)
    })?;
    if let OutputTarget::File(path) = &output_target {
        report_status(Mode::Decode, input_source, path);
    }
    Ok(())
}

/// Without a header there is nothing to unflatten; emit the raw grid.
fn headerless_value(table: &Table) -> Value {
    Value::Array(
        table
            .rows
            .iter()
            .map(|row| Value::Array(row.iter().map(|cell| Value::String(cell.clone())).collect()))
            .collect(),
    )
}

fn resolve_mode(args: &Args, input_source: &InputSource) -> Result<Mode, Box<dyn Error>> {
    if args.encode {
        return Ok(Mode::Encode);
    }

    if args.decode {
        return Ok(Mode::Decode);
    }

    match input_source {
        InputSource::Stdin => Ok(Mode::Encode),
        InputSource::File(path) => match Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("json") => Ok(Mode::Encode),
            Some("csv") | Some("tsv") => Ok(Mode::Decode),
            _ => Err("unable to auto-detect mode; use --encode or --decode".into()),
        },
    }
}

fn read_input(input: Option<&str>) -> Result<(String, InputSource), Box<dyn Error>> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok((buf, InputSource::Stdin))
        }
        Some(path) => {
            let buf = fs::read_to_string(path)?;
            Ok((buf, InputSource::File(path.to_string())))
        }
    }
}

fn parse_delimiter(raw: &str) -> Result<Delimiter, String> {
    match raw {
        "," => Ok(Delimiter::Comma),
        "|" => Ok(Delimiter::Pipe),
        "\t" | "\\t" => Ok(Delimiter::Tab),
        _ => Err(format!(
            "Invalid delimiter \"{raw}\". Valid delimiters are: comma (,), tab (\\t), pipe (|)"
        )),
    }
}

#[derive(Clone, Debug)]
enum OutputTarget {
    Stdout,
    File(String),
}

impl OutputTarget {
    fn from_arg(output: Option<&str>) -> Self {
        match output {
            Some(path) if path != "-" => OutputTarget::File(path.to_string()),
            _ => OutputTarget::Stdout,
        }
    }

    fn path(&self) -> Option<&str> {
        match self {
            OutputTarget::Stdout => None,
            OutputTarget::File(path) => Some(path.as_str()),
        }
    }
}

fn with_output_writer<F>(path: Option<&str>, f: F) -> Result<(), Box<dyn Error>>
where
    F: FnOnce(&mut dyn Write) -> Result<(), Box<dyn Error>>,
{
    match path {
        Some(path) if path != "-" => {
            let mut file = fs::File::create(path)?;
            f(&mut file)
        }
        _ => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            f(&mut handle)
        }
    }
}

fn write_output(path: Option<&str>, data: &[u8]) -> Result<(), Box<dyn Error>> {
    with_output_writer(path, |writer| {
        writer.write_all(data)?;
        Ok(())
    })
}

fn write_json(writer: &mut dyn Write, value: &Value, indent: usize) -> Result<(), Box<dyn Error>> {
    if indent == 0 {
        serde_json::to_writer(writer, value)?;
        return Ok(());
    }

    let indent_bytes = vec![b' '; indent];
    let formatter = serde_json::ser::PrettyFormatter::with_indent(&indent_bytes);
    let mut serializer = serde_json::Serializer::with_formatter(writer, formatter);
    value.serialize(&mut serializer)?;
    Ok(())
}

fn report_status(mode: Mode, input_source: &InputSource, output_path: &str) {
    let input_label = match input_source {
        InputSource::Stdin => "stdin",
        InputSource::File(path) => path.as_str(),
    };
    let verb = match mode {
        Mode::Encode => "Encoded",
        Mode::Decode => "Decoded",
    };
    println!("✔ {verb} {input_label} → {output_path}");
}
