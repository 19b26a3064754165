mod check;
mod convert;
mod logging;
mod lookup;
mod schema;

pub use check::check;
pub use convert::render;
pub use lookup::find;
pub use schema::schema_json;

use clap::{Args, Parser, Subcommand};
use declscope_core::ConvertConfig;
use declscope_core::model::Project;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "declscope",
    version,
    about = "Turns TypeDoc JSON into a flat set of documentation entities",
    long_about = "Declscope reads the JSON document TypeDoc emits for a TypeScript project, \
                  computes a path for every declaration and converts classes, interfaces, \
                  functions and attributes into documentation entities that can be looked up \
                  by any unambiguous path suffix."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert a TypeDoc document into documentation entities
    #[command(
        long_about = "Parses the document, indexes every declaration and prints the converted \
                            entities as JSON. Module paths are made relative to --base-dir."
    )]
    Convert {
        /// Path to the TypeDoc JSON document
        #[arg(value_name = "TYPEDOC_JSON")]
        input: PathBuf,

        /// Directory module file names are relative to
        #[arg(long, value_name = "DIR", default_value = ".")]
        base_dir: PathBuf,

        /// Write the entities here instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[command(flatten)]
        args: ConvertArgs,
    },
    /// Look up one entity by a suffix of its path
    #[command(
        long_about = "Converts the document and resolves PATH, a dotted or slashed suffix such as \
                            `util.greet` or `Widget.render`, to the single entity it names."
    )]
    Lookup {
        /// Path to the TypeDoc JSON document
        #[arg(value_name = "TYPEDOC_JSON")]
        input: PathBuf,

        /// Path suffix to resolve
        #[arg(value_name = "PATH")]
        path: String,

        /// Directory module file names are relative to
        #[arg(long, value_name = "DIR", default_value = ".")]
        base_dir: PathBuf,

        #[command(flatten)]
        args: ConvertArgs,
    },
    /// Validate a document and report where it does not match
    #[command(
        long_about = "Parses the document without converting it. Every mismatch is reported at the \
                            innermost declaration, signature or type that fails to parse."
    )]
    Check {
        /// Path to the TypeDoc JSON document
        #[arg(value_name = "TYPEDOC_JSON")]
        input: PathBuf,
    },
    /// Print the JSON schema of the converted entities
    Schema,
}

/// Options shared by every command that converts.
#[derive(Args, Debug, Clone, Default)]
pub struct ConvertArgs {
    /// Fail on constructs that would otherwise be skipped with a warning
    #[arg(long)]
    pub strict: bool,

    /// Return type wrapper that marks a function as async (repeatable)
    #[arg(long = "async-wrapper", value_name = "NAME")]
    pub async_wrappers: Vec<String>,
}

impl ConvertArgs {
    /// Module file names are absolute, so the base directory is made absolute
    /// against the working directory before they are compared.
    pub fn config(&self, base_dir: &Path) -> std::io::Result<ConvertConfig> {
        Ok(ConvertConfig::new(std::path::absolute(base_dir)?)
            .with_strict(self.strict)
            .with_async_wrappers(self.async_wrappers.clone()))
    }
}

pub(crate) fn load(input: &Path) -> Result<Project, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(input)
        .map_err(|e| format!("cannot read {}: {e}", input.display()))?;
    Ok(declscope_core::parse_str(&text)?)
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // stdout carries the command output, so progress goes to stderr
    let _guard = logging::init_logging("cli", true);

    match cli.command {
        Commands::Convert {
            input,
            base_dir,
            output,
            args,
        } => convert::run(&input, output.as_deref(), &args.config(&base_dir)?),
        Commands::Lookup {
            input,
            path,
            base_dir,
            args,
        } => lookup::run(&input, &path, &args.config(&base_dir)?),
        Commands::Check { input } => check::run(&input),
        Commands::Schema => schema::run(),
    }
}
