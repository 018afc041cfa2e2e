//! ar2005 - Check, normalize and inspect AR2005 antenatal record documents.
//!
//! # Usage
//!
//! ```bash
//! ar2005 [-v...] <COMMAND>
//! ```
//!
//! # Examples
//!
//! ```bash
//! # Validate a full record set
//! ar2005 check --kind record-set records.xml
//!
//! # Re-emit a medical history section as normalized, indented XML
//! ar2005 format --kind medical-history history.xml > normalized.xml
//!
//! # Resolve a vocabulary entry by code or by integer tag
//! ar2005 lookup ethnic ANC005
//! ar2005 lookup rh-factor 3
//! ```
//!
//! # Exit Status
//!
//! - `0` on success
//! - `1` if the document does not conform to the schema, or a lookup misses
//! - `2` if the input could not be read
//!
//! Logging goes to stderr. `-v` raises the level to info, `-vv` to debug and
//! `-vvv` to trace; `RUST_LOG` overrides both.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use ar2005::objects::{
    AboResult, BloodGroup, CigsPerDay, EthnicValueType, Gbs, HivResult,
    ARRecord, ARRecordSet, InitialLaboratoryInvestigations, MedicalHistoryAndPhysicalExam,
    ObstetricalHistory, PregnancyHistory, RhFactor, ScreeningResult, Sex, SignatureType,
    TypeOfDelivery, Vocabulary, AR1, AR2,
};
use ar2005::reader::{self, XmlElement};
use ar2005::writer::{Ar2005Writer, WriterConfig};
use ar2005::{Error, XmlBinding};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Check, normalize and inspect AR2005 antenatal record documents.
#[derive(Parser, Debug)]
#[command(name = "ar2005")]
#[command(version = VERSION)]
#[command(about = "Check, normalize and inspect AR2005 antenatal record documents")]
struct Args {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a document and report whether it conforms to the schema
    Check {
        /// Document to check
        file: PathBuf,

        /// Schema type the document's root element is bound to
        #[arg(long, value_enum)]
        kind: DocumentKind,
    },

    /// Parse a document and write it back as normalized XML on stdout
    Format {
        /// Document to format
        file: PathBuf,

        /// Schema type the document's root element is bound to
        #[arg(long, value_enum)]
        kind: DocumentKind,

        /// Output compact XML (no indentation)
        #[arg(long)]
        compact: bool,
    },

    /// Resolve a vocabulary entry by code or integer tag
    Lookup {
        /// Vocabulary to search
        #[arg(value_enum)]
        vocabulary: VocabularyName,

        /// Code (e.g. ANC005) or integer tag (e.g. 3)
        value: String,
    },
}

/// Document types the tool can bind.
#[derive(ValueEnum, Clone, Copy, Debug)]
enum DocumentKind {
    RecordSet,
    Record,
    Ar1,
    Ar2,
    MedicalHistory,
    Signature,
    PregnancyHistory,
    ObstetricalHistory,
    InitialLabs,
    Ethnic,
}

/// Vocabularies available to `lookup`.
#[derive(ValueEnum, Clone, Copy, Debug)]
enum VocabularyName {
    Ethnic,
    CigsPerDay,
    BloodGroup,
    RhFactor,
    Gbs,
    HivResult,
    AboResult,
    ScreeningResult,
    Sex,
    TypeOfDelivery,
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Reads `path` and binds it as `T`, keeping the document's root name.
fn load<T: XmlBinding>(path: &Path) -> ar2005::Result<(T, String)> {
    let file = std::fs::File::open(path)?;
    let root = XmlElement::from_reader(std::io::BufReader::new(file))?;
    let value = reader::parse_element(&root)?;
    Ok((value, root.name))
}

fn reformat<T: XmlBinding>(path: &Path, config: WriterConfig) -> ar2005::Result<String> {
    let (value, root) = load::<T>(path)?;
    Ar2005Writer::with_config(config).write_to_string_as(&value, &root)
}

fn format_document(kind: DocumentKind, path: &Path, config: WriterConfig) -> ar2005::Result<String> {
    match kind {
        DocumentKind::RecordSet => reformat::<ARRecordSet>(path, config),
        DocumentKind::Record => reformat::<ARRecord>(path, config),
        DocumentKind::Ar1 => reformat::<AR1>(path, config),
        DocumentKind::Ar2 => reformat::<AR2>(path, config),
        DocumentKind::MedicalHistory => reformat::<MedicalHistoryAndPhysicalExam>(path, config),
        DocumentKind::Signature => reformat::<SignatureType>(path, config),
        DocumentKind::PregnancyHistory => reformat::<PregnancyHistory>(path, config),
        DocumentKind::ObstetricalHistory => reformat::<ObstetricalHistory>(path, config),
        DocumentKind::InitialLabs => reformat::<InitialLaboratoryInvestigations>(path, config),
        DocumentKind::Ethnic => reformat::<EthnicValueType>(path, config),
    }
}

fn lookup<T: Vocabulary>(value: &str) -> Option<(&'static str, i32)> {
    let found = match value.parse::<i32>() {
        Ok(tag) => T::for_int(tag),
        Err(_) => T::for_string(value),
    };
    found.map(|v| (v.as_str(), v.int_value()))
}

fn lookup_in(vocabulary: VocabularyName, value: &str) -> Option<(&'static str, i32)> {
    match vocabulary {
        VocabularyName::Ethnic => lookup::<EthnicValueType>(value),
        VocabularyName::CigsPerDay => lookup::<CigsPerDay>(value),
        VocabularyName::BloodGroup => lookup::<BloodGroup>(value),
        VocabularyName::RhFactor => lookup::<RhFactor>(value),
        VocabularyName::Gbs => lookup::<Gbs>(value),
        VocabularyName::HivResult => lookup::<HivResult>(value),
        VocabularyName::AboResult => lookup::<AboResult>(value),
        VocabularyName::ScreeningResult => lookup::<ScreeningResult>(value),
        VocabularyName::Sex => lookup::<Sex>(value),
        VocabularyName::TypeOfDelivery => lookup::<TypeOfDelivery>(value),
    }
}

/// 2 when the input could not be read, 1 when it does not conform.
fn exit_status(err: &Error) -> u8 {
    if err.is_transport() {
        2
    } else {
        1
    }
}

fn failure(path: &Path, err: &Error) -> ExitCode {
    eprintln!("{}: {}", path.display(), err);
    ExitCode::from(exit_status(err))
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);
    debug!(command = ?args.command, "starting");

    match args.command {
        Command::Check { file, kind } => {
            match format_document(kind, &file, WriterConfig::compact()) {
                Ok(_) => {
                    info!(path = %file.display(), ?kind, "document conforms");
                    println!("{}: ok", file.display());
                    ExitCode::SUCCESS
                }
                Err(e) => failure(&file, &e),
            }
        }
        Command::Format {
            file,
            kind,
            compact,
        } => {
            let config = if compact {
                WriterConfig::compact()
            } else {
                WriterConfig::default()
            };
            match format_document(kind, &file, config) {
                Ok(xml) => {
                    println!("{}", xml);
                    ExitCode::SUCCESS
                }
                Err(e) => failure(&file, &e),
            }
        }
        Command::Lookup { vocabulary, value } => match lookup_in(vocabulary, &value) {
            Some((code, tag)) => {
                println!("{:?}\t{}", code, tag);
                ExitCode::SUCCESS
            }
            None => {
                println!("absent");
                ExitCode::from(1)
            }
        },
    }
}
