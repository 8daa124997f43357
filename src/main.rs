//! labelforge – command-line print job → PDF converter.
//!
//! Usage:
//!   labelforge <job.json> [output.pdf] [--mode letter|parcel] [--receipt]
//!              [--config cfg.json] [--layout-json layout.json] [--title "T"]
//!
//! If `output.pdf` is omitted the PDF is written next to the input file with
//! the same stem (e.g. `envio.json` → `envio.pdf`).

use std::{env, fs, path::PathBuf, process};

use label_forge::job::PrintJob;
use label_forge::pipeline::{generate_pdf, PipelineConfig};
use label_forge::settings::ShippingMode;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    let mut input_path: Option<PathBuf> = None;
    let mut output_path: Option<PathBuf> = None;
    let mut config_path: Option<PathBuf> = None;
    let mut layout_path: Option<PathBuf> = None;
    let mut mode: Option<ShippingMode> = None;
    let mut receipt = false;
    let mut title: Option<String> = None;
    let mut positional = 0usize;

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--receipt" | "-r" => receipt = true,
            "--mode" | "-m" => {
                mode = match iter.next().map(String::as_str) {
                    Some("letter") | Some("carta") => Some(ShippingMode::Letter),
                    Some("parcel") | Some("encomenda") => Some(ShippingMode::Parcel),
                    other => {
                        eprintln!("Unknown mode: {}", other.unwrap_or("<missing>"));
                        print_usage(&args[0]);
                        process::exit(1);
                    }
                }
            }
            "--title" | "-t" => title = iter.next().cloned(),
            "--config" | "-c" => config_path = iter.next().map(PathBuf::from),
            "--layout-json" => layout_path = iter.next().map(PathBuf::from),
            "--help" | "-h" => {
                print_usage(&args[0]);
                process::exit(0);
            }
            other if other.starts_with('-') => {
                eprintln!("Unknown flag: {other}");
                print_usage(&args[0]);
                process::exit(1);
            }
            path => {
                if positional == 0 {
                    input_path = Some(PathBuf::from(path));
                } else if positional == 1 {
                    output_path = Some(PathBuf::from(path));
                } else {
                    eprintln!("Unexpected argument: {path}");
                    print_usage(&args[0]);
                    process::exit(1);
                }
                positional += 1;
            }
        }
    }

    let input = match input_path {
        Some(p) => p,
        None => {
            eprintln!("Error: no print job specified.");
            print_usage(&args[0]);
            process::exit(1);
        }
    };

    // Default output: same directory + same stem as input, but with .pdf
    let output = output_path.unwrap_or_else(|| {
        let mut o = input.clone();
        o.set_extension("pdf");
        o
    });

    let mut job = match read(&input).and_then(|s| PrintJob::from_json(&s).map_err(|e| e.to_string())) {
        Ok(job) => job,
        Err(e) => {
            eprintln!("Error loading job '{}': {e}", input.display());
            process::exit(1);
        }
    };
    if let Some(mode) = mode {
        job.settings.mode = mode;
    }
    if receipt {
        job.settings.receipt_ack = true;
    }
    let today = chrono::Local::now().date_naive();
    let issued_on = *job.issued_on.get_or_insert(today);

    let mut config = match &config_path {
        Some(path) => match read(path).and_then(|s| PipelineConfig::from_json(&s).map_err(|e| e.to_string())) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config '{}': {e}", path.display());
                process::exit(1);
            }
        },
        None => PipelineConfig::default(),
    };
    config.title = title.unwrap_or_else(|| label_forge::job::job_title(issued_on));

    if job.recipients.is_empty() {
        log::warn!("Print job has no recipients; writing an empty sheet");
    }

    match generate_pdf(&job, &config) {
        Ok((bytes, layout)) => {
            write(&output, &bytes);
            if let Some(path) = &layout_path {
                match layout.to_json() {
                    Ok(json) => write(path, json.as_bytes()),
                    Err(e) => {
                        eprintln!("Error serialising layout: {e}");
                        process::exit(1);
                    }
                }
            }
            let pages = layout.pages.len();
            eprintln!(
                "Wrote '{}' ({} bytes, {} page{})",
                output.display(),
                bytes.len(),
                pages,
                if pages == 1 { "" } else { "s" }
            );
        }
        Err(e) => {
            eprintln!("Error generating PDF: {e}");
            process::exit(1);
        }
    }
}

fn read(path: &PathBuf) -> Result<String, String> {
    fs::read_to_string(path).map_err(|e| e.to_string())
}

/// Write `bytes`, creating the parent directory if necessary.
fn write(path: &PathBuf, bytes: &[u8]) {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            if let Err(e) = fs::create_dir_all(parent) {
                eprintln!("Error creating output directory: {e}");
                process::exit(1);
            }
        }
    }
    if let Err(e) = fs::write(path, bytes) {
        eprintln!("Error writing '{}': {e}", path.display());
        process::exit(1);
    }
}

fn print_usage(prog: &str) {
    eprintln!("labelforge – shipping labels and content declarations (label-forge)");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  {prog} <job.json> [output.pdf] [--mode letter|parcel] [--receipt]");
    eprintln!("          [--config cfg.json] [--layout-json layout.json] [--title \"T\"]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  <job.json>     Print job: sender, recipients, settings, issued_on");
    eprintln!("  [output.pdf]   Output path  (default: same stem as input with .pdf)");
    eprintln!();
    eprintln!("Flags:");
    eprintln!("  --mode, -m     Override the shipping mode (letter or parcel)");
    eprintln!("  --receipt, -r  Print receipt-acknowledgement (AR) copies");
    eprintln!("  --config, -c   Pipeline config JSON (page size, capacities)");
    eprintln!("  --layout-json  Also write the computed page layout as JSON");
    eprintln!("  --title, -t    Document title (default: Etiquetas-Correios-<date>)");
    eprintln!("  --help         Print this message");
}
