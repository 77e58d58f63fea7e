// Tangle Bundle Library: ternary bundle construction & hashing
// Written in 2021 by
//     Tangle Bundle contributors
//
// To the extent possible under law, the author(s) have dedicated all
// copyright and related and neighboring rights to this software to
// the public domain worldwide. This software is distributed without
// any warranty.
//
// You should have received a copy of the MIT License
// along with this software.
// If not, see <https://opensource.org/licenses/MIT>.

#[macro_use]
extern crate amplify_derive;
#[macro_use]
extern crate log;
extern crate serde_crate as serde;

use std::fmt::{self, Debug, Display, Formatter};
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::{env, fs};

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tangle_bundle::ternary_encoding::{self as encoding, Trytes};
use tangle_bundle::ternary_sponge::SpongeKind;
use tangle_bundle::{
    is_secure, normalized_bundle, validate_bundle_with, Bundle, BundleError,
    FinalizeConfig, Transaction, ValidationError,
};

#[derive(Parser, Clone, Debug)]
#[clap(
    name = "bundle",
    bin_name = "bundle",
    author,
    version,
    about = "Command-line tool for building, normalizing and validating \
             ternary ledger bundles"
)]
pub struct Opts {
    /// Set verbosity level; can be used multiple times to increase
    /// verbosity
    #[clap(short, long, global = true, parse(from_occurrences))]
    pub verbose: u8,

    /// Configuration file with finalization parameters (TOML, YAML or JSON)
    #[clap(short, long, global = true, env = "BUNDLE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Command to execute
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Command {
    /// Build and finalize a bundle from a list of transfers
    Build {
        /// Formatting of the input transfer list
        #[clap(short = 'f', long, default_value = "yaml")]
        from: Format,

        /// Formatting for the resulting transactions
        #[clap(short = 't', long = "to", default_value = "yaml")]
        into: Format,

        /// Maximal number of bundle hash attempts
        #[clap(short, long)]
        max_attempts: Option<u64>,

        /// Sponge used for bundle hashing
        #[clap(short, long)]
        sponge: Option<SpongeKind>,

        /// File with the transfer list. Defaults to STDIN
        #[clap()]
        input_file: Option<PathBuf>,

        /// File to store the transactions in. Defaults to STDOUT
        #[clap()]
        output_file: Option<PathBuf>,
    },

    /// Print normalized form of a bundle hash
    Normalize {
        /// Bundle hash, 81 trytes
        #[clap()]
        hash: Trytes,
    },

    /// Validate a bundle given as transaction records, one per line
    Validate {
        /// Sponge the bundle was finalized with
        #[clap(short, long)]
        sponge: Option<SpongeKind>,

        /// File with transaction records. Defaults to STDIN
        #[clap()]
        input_file: Option<PathBuf>,
    },
}

/// Formatting of the data
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug, Display)]
pub enum Format {
    /// Format according to the rust debug rules
    #[display("debug")]
    Debug,

    /// Format as YAML
    #[display("yaml")]
    Yaml,

    /// Format as JSON
    #[display("json")]
    Json,

    /// Format as transaction records, one per line
    #[display("trytes")]
    Trytes,
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "debug" => Format::Debug,
            "yaml" | "yml" => Format::Yaml,
            "json" => Format::Json,
            "trytes" | "raw" => Format::Trytes,
            other => return Err(format!("Unknown format: {}", other)),
        })
    }
}

/// Single transfer of a bundle
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
#[serde(crate = "serde_crate", rename_all = "camelCase")]
pub struct Transfer {
    /// Number of transactions spanned by the transfer
    #[serde(default = "Transfer::default_length")]
    pub signature_message_length: usize,
    pub address: String,
    #[serde(default)]
    pub value: i64,
    #[serde(default)]
    pub tag: String,
    /// Defaults to the current time
    pub timestamp: Option<u64>,
}

impl Transfer {
    fn default_length() -> usize {
        1
    }
}

/// Input of the `build` command
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
#[serde(crate = "serde_crate", rename_all = "camelCase")]
pub struct BuildRequest {
    pub transfers: Vec<Transfer>,
    #[serde(default)]
    pub signature_fragments: Vec<String>,
}

#[derive(Display, Error, From)]
#[display(inner)]
pub enum Error {
    #[from]
    Io(io::Error),

    #[display("incorrect JSON encoding. Details: {0}")]
    #[from]
    Json(serde_json::Error),

    #[display("incorrect YAML encoding. Details: {0}")]
    #[from]
    Yaml(serde_yaml::Error),

    #[display("incorrect configuration. Details: {0}")]
    #[from]
    Config(settings::ConfigError),

    #[display("incorrect transaction record. Details: {0}")]
    #[from]
    Encoding(encoding::Error),

    #[from]
    Bundle(BundleError),

    #[display("invalid bundle: {0}")]
    #[from]
    Validation(ValidationError),

    #[display("can't read data from {0} format")]
    UnsupportedFormat(Format),
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

fn init_logging(verbosity: u8) {
    if env::var("RUST_LOG").is_err() {
        let level = match verbosity {
            0 => "error",
            1 => "warn",
            2 => "info",
            3 => "debug",
            _ => "trace",
        };
        env::set_var("RUST_LOG", level);
    }
    env_logger::init();
}

/// Reads finalization parameters from an optional configuration file and
/// `BUNDLE_*` environment variables
fn load_config(file: Option<&Path>) -> Result<FinalizeConfig, Error> {
    let mut conf = settings::Config::new();
    if let Some(path) = file {
        debug!("Reading configuration from {}", path.display());
        conf.merge(settings::File::from(path))?;
    }
    conf.merge(settings::Environment::with_prefix("BUNDLE"))?;
    Ok(conf.try_into()?)
}

fn file_or_stdin(file: Option<PathBuf>) -> Result<Box<dyn Read>, io::Error> {
    Ok(match file {
        Some(path) => Box::new(fs::File::open(path)?),
        None => Box::new(io::stdin()),
    })
}

fn file_or_stdout(file: Option<PathBuf>) -> Result<Box<dyn Write>, io::Error> {
    Ok(match file {
        Some(path) => Box::new(fs::File::create(path)?),
        None => Box::new(io::stdout()),
    })
}

fn input_read(
    mut input: impl Read,
    format: Format,
) -> Result<BuildRequest, Error> {
    let mut data = String::new();
    input.read_to_string(&mut data)?;
    Ok(match format {
        Format::Yaml => serde_yaml::from_str(&data)?,
        Format::Json => serde_json::from_str(&data)?,
        _ => return Err(Error::UnsupportedFormat(format)),
    })
}

fn output_write(
    mut f: impl Write,
    transactions: &[Transaction],
    format: Format,
) -> Result<(), Error> {
    match format {
        Format::Debug => writeln!(f, "{:#?}", transactions)?,
        Format::Yaml => {
            writeln!(f, "{}", serde_yaml::to_string(transactions)?)?
        }
        Format::Json => {
            writeln!(f, "{}", serde_json::to_string_pretty(transactions)?)?
        }
        Format::Trytes => {
            for tx in transactions {
                writeln!(f, "{}", tx.to_trytes()?)?;
            }
        }
    }
    Ok(())
}

fn build(
    request: BuildRequest,
    config: &FinalizeConfig,
) -> Result<Bundle, Error> {
    let now = chrono::Utc::now().timestamp() as u64;
    let mut bundle = Bundle::new();
    for transfer in request.transfers {
        bundle.add_entry(
            transfer.signature_message_length,
            &transfer.address,
            transfer.value,
            &transfer.tag,
            transfer.timestamp.unwrap_or(now),
        )?;
    }
    bundle.add_trytes(&request.signature_fragments)?;

    info!(
        "Finalizing bundle of {} transactions with {}",
        bundle.len(),
        config.sponge
    );
    let mut sponge = config.sponge.boxed();
    bundle.finalize_with(sponge.as_mut(), config)?;
    info!("Bundle hash found after {} attempt(s)", bundle.attempts());
    Ok(bundle)
}

fn main() -> Result<(), Error> {
    dotenv::dotenv().ok();
    let opts = Opts::parse();
    init_logging(opts.verbose);
    trace!("Command-line arguments: {:?}", opts);

    match opts.command {
        Command::Build {
            from,
            into,
            max_attempts,
            sponge,
            input_file,
            output_file,
        } => {
            let mut config = load_config(opts.config.as_deref())?;
            if max_attempts.is_some() {
                config.max_attempts = max_attempts;
            }
            if let Some(sponge) = sponge {
                config.sponge = sponge;
            }
            debug!("Using {:?}", config);

            let request = input_read(file_or_stdin(input_file)?, from)?;
            let bundle = build(request, &config)?;
            let transactions = bundle.transactions().unwrap_or_default();
            output_write(file_or_stdout(output_file)?, transactions, into)?;
        }
        Command::Normalize { hash } => {
            let normalized = normalized_bundle(&hash)?;
            let values = normalized
                .iter()
                .map(i8::to_string)
                .collect::<Vec<_>>()
                .join(" ");
            println!("{}", values);
            println!(
                "{}",
                if is_secure(&normalized) { "secure" } else { "insecure" }
            );
        }
        Command::Validate { sponge, input_file } => {
            let mut config = load_config(opts.config.as_deref())?;
            if let Some(sponge) = sponge {
                config.sponge = sponge;
            }
            debug!("Validating with {}", config.sponge);

            let input = BufReader::new(file_or_stdin(input_file)?);
            let mut transactions = vec![];
            for line in input.lines() {
                let line = line?;
                let record = line.trim();
                if record.is_empty() {
                    continue;
                }
                transactions.push(Transaction::from_trytes(record)?);
            }
            let mut sponge = config.sponge.boxed();
            validate_bundle_with(&transactions, sponge.as_mut())?;
            if let Some(tx) = transactions.first() {
                println!(
                    "Bundle {} of {} transactions is valid",
                    tx.bundle(),
                    transactions.len()
                );
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn format_names() {
        for format in
            [Format::Debug, Format::Yaml, Format::Json, Format::Trytes].iter()
        {
            assert_eq!(Format::from_str(&format.to_string()), Ok(*format));
        }
        assert_eq!(Format::from_str(" YML "), Ok(Format::Yaml));
        assert!(Format::from_str("hex").is_err());
    }

    #[test]
    fn validate_takes_sponge() {
        let opts =
            Opts::try_parse_from(&["bundle", "validate", "-s", "curl-p-81"])
                .unwrap();
        assert_eq!(
            opts.command,
            Command::Validate {
                sponge: Some(SpongeKind::CurlP81),
                input_file: None,
            }
        );
        assert!(
            Opts::try_parse_from(&["bundle", "validate", "-s", "md5"]).is_err()
        );
    }

    #[test]
    fn build_request_defaults() {
        let yaml = "transfers:\n  - address: ABC\n    value: 5\n";
        let request: BuildRequest = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(request.signature_fragments, Vec::<String>::new());
        assert_eq!(
            request.transfers,
            vec![Transfer {
                signature_message_length: 1,
                address: "ABC".to_owned(),
                value: 5,
                tag: String::new(),
                timestamp: None,
            }]
        );
    }

    #[test]
    fn build_from_json() {
        let json = format!(
            r#"{{"transfers": [
                {{"address": "{}", "value": 0, "tag": "CLI", "timestamp": 7,
                  "signatureMessageLength": 2}}
            ], "signatureFragments": ["HELLO"]}}"#,
            "9".repeat(81)
        );
        let request = input_read(json.as_bytes(), Format::Json).unwrap();
        let config = FinalizeConfig::default();
        let bundle = build(request, &config).unwrap();
        let transactions = bundle.transactions().unwrap();
        assert_eq!(transactions.len(), 2);
        assert_eq!(
            validate_bundle_with(transactions, config.sponge.boxed().as_mut()),
            Ok(())
        );

        let mut out = vec![];
        output_write(&mut out, transactions, Format::Trytes).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert_eq!(out.lines().count(), 2);
        assert!(out.lines().all(|line| line.len() == 2673));
    }

    #[test]
    fn unsupported_input() {
        match input_read("".as_bytes(), Format::Trytes) {
            Err(Error::UnsupportedFormat(Format::Trytes)) => {}
            other => panic!("unexpected result {:?}", other.map(|_| ())),
        }
    }
}
