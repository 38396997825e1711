use anyhow::Context;
use bibl_convert::{Conversion, Converter, load_entries};
use clap::{Parser, Subcommand, ValueEnum};
use csl_data::{validate_records, CslRecord};
use schemars::schema_for;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a bibliography XML file to CSL citation records
    Convert {
        /// Source XML file
        source: PathBuf,
        /// Output file for the converted records
        #[arg(short, long, default_value = "bibliography.yaml")]
        output: PathBuf,
        /// Output serialization format
        #[arg(long, value_enum, default_value_t = Format::Yaml)]
        format: Format,
        /// Warning log file
        #[arg(long, default_value = "warnings.txt")]
        log: PathBuf,
        /// Optional output file for facsimile links
        #[arg(long)]
        links: Option<PathBuf>,
    },
    /// Generate JSON schema for the converted records
    Schema,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Yaml,
    Json,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            source,
            output,
            format,
            log,
            links,
        } => convert(source, output, format, log, links),
        Commands::Schema => {
            let schema = schema_for!(CslRecord);
            println!("{}", serde_json::to_string_pretty(&schema)?);
            Ok(())
        }
    }
}

fn convert(
    source: PathBuf,
    output: PathBuf,
    format: Format,
    log: PathBuf,
    links: Option<PathBuf>,
) -> anyhow::Result<()> {
    eprintln!("Reading source file `{}`...", source.display());
    let entries = load_entries(&source)
        .with_context(|| format!("failed to load `{}`", source.display()))?;
    eprintln!("Found {} items.", entries.len());

    let converter = Converter::new();
    let mut conversion = converter.convert_document(&entries);

    if let Err(error) = validate_records(&conversion.records) {
        conversion
            .report
            .set_validation_detail(error.to_string());
    }

    write_records(&conversion.records, &output, format)
        .with_context(|| format!("failed to write `{}`", output.display()))?;
    eprintln!(
        "Wrote {} records to `{}`.",
        conversion.records.len(),
        output.display()
    );

    if let Some(links_path) = links {
        write_links(&conversion, &links_path)
            .with_context(|| format!("failed to write `{}`", links_path.display()))?;
        eprintln!(
            "Wrote {} facsimile links to `{}`.",
            conversion.links.len(),
            links_path.display()
        );
    } else if !conversion.links.is_empty() {
        eprintln!(
            "Diverted {} facsimile links (pass --links to write them).",
            conversion.links.len()
        );
    }

    let summary = format!(
        "Conversion completed with {} warnings and {} unconverted cross-references.",
        conversion.report.len(),
        conversion.skipped_cross_refs
    );
    let log_file = File::create(&log)?;
    conversion
        .report
        .write_to(BufWriter::new(log_file), &summary)?;
    eprintln!("{summary}");

    Ok(())
}

fn write_records(records: &[CslRecord], path: &PathBuf, format: Format) -> anyhow::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    match format {
        Format::Yaml => out.write_all(serde_yaml::to_string(records)?.as_bytes())?,
        Format::Json => out.write_all(serde_json::to_string_pretty(records)?.as_bytes())?,
    }
    Ok(())
}

fn write_links(conversion: &Conversion, path: &PathBuf) -> anyhow::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    out.write_all(serde_yaml::to_string(&conversion.links)?.as_bytes())?;
    Ok(())
}
