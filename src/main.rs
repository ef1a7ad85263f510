use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use xmlrule::{DispatchConfig, Error, OutputFormat, commands};

/// Inspect and transform XML documents with template rules.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON file with dispatch settings (`max_depth`, `mode`).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the text content of a document.
    Text { file: PathBuf },

    /// Print the element structure of a document.
    Outline {
        file: PathBuf,

        /// List each element's attributes.
        #[arg(long, default_value_t = false)]
        attributes: bool,
    },

    /// Print every node a location path selects, one per line.
    Select { file: PathBuf, path: String },

    /// Re-serialize a document.
    Format {
        file: PathBuf,

        /// Spaces per nesting level; omit for single-line output.
        #[arg(long)]
        indent: Option<usize>,

        #[arg(long, default_value_t = false)]
        no_declaration: bool,

        /// Write `<a></a>` instead of `<a/>`.
        #[arg(long, default_value_t = false)]
        expand_empty: bool,
    },
}

fn main() -> Result<(), Error> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => commands::load_config(&fs::read_to_string(path)?)?,
        None => DispatchConfig::default(),
    };
    log::debug!("Using {:?}", config);

    let output = match args.command {
        Command::Text { file } => commands::text(&fs::read_to_string(file)?, config)?,
        Command::Outline { file, attributes } => {
            commands::outline(&fs::read_to_string(file)?, attributes, config)?
        }
        Command::Select { file, path } => commands::select(&fs::read_to_string(file)?, &path)?,
        Command::Format {
            file,
            indent,
            no_declaration,
            expand_empty,
        } => {
            let format = OutputFormat {
                indent,
                xml_declaration: !no_declaration,
                expand_empty_elements: expand_empty,
                trim_text: indent.is_some(),
                ..OutputFormat::compact()
            };
            commands::format(&fs::read_to_string(file)?, &format)?
        }
    };

    print!("{}", output);
    if !output.ends_with('\n') {
        println!();
    }
    Ok(())
}
