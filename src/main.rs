use archdiagram::artifact::RunStamp;
use archdiagram::inspect::{self, InspectError};
use archdiagram::pipeline::{self, DocUpdate, Options};
use archdiagram::render::{self, Graphviz, OutputFormat, RenderError};
use archdiagram::topology::Preset;
use archdiagram::{Result, cache_buster};

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const DEFAULT_OUT_DIR: &str = "docs/architecture/diagrams";
const DEFAULT_README: &str = "README.md";
const DEFAULT_DOC_REF: &str = "docs/architecture/diagrams/latest.png";

#[derive(Parser)]
#[command(name = "archdiagram")]
#[command(about = "Architecture diagram generator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Args)]
struct PresetArg {
    /// Which built-in topology to use.
    #[arg(long, value_enum, default_value_t = Preset::Aws)]
    preset: Preset,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the diagram, refresh latest.<ext> and the README cache-buster.
    Generate {
        #[command(flatten)]
        preset: PresetArg,

        #[arg(long, default_value = DEFAULT_OUT_DIR)]
        out_dir: PathBuf,

        /// File name stem (defaults to the preset's name).
        #[arg(long)]
        name: Option<String>,

        /// Output format (defaults to the preset's format).
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,

        #[arg(long, default_value = DEFAULT_README)]
        readme: PathBuf,

        /// Do not touch the README.
        #[arg(long)]
        no_readme: bool,

        /// Image reference to look for in the README
        /// (defaults to <out-dir>/latest.<ext>).
        #[arg(long)]
        doc_ref: Option<String>,

        /// Graphviz executable (defaults to `dot` on PATH).
        #[arg(long)]
        engine: Option<String>,
    },

    /// Print the topology as Graphviz DOT.
    Dot {
        #[command(flatten)]
        preset: PresetArg,
    },

    /// Print the topology as JSON.
    Topology {
        #[command(flatten)]
        preset: PresetArg,
    },

    /// Only refresh the README cache-buster.
    Bust {
        #[arg(long, default_value = DEFAULT_README)]
        readme: PathBuf,

        #[arg(long, default_value = DEFAULT_DOC_REF)]
        doc_ref: String,
    },

    /// Report size, aspect ratio and resolution of an image.
    Inspect { path: PathBuf },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("ERROR: {:#}", err);
            if let Some(hint) = err
                .chain()
                .find_map(|e| e.downcast_ref::<RenderError>())
                .and_then(RenderError::remediation)
            {
                eprintln!("hint: {}", hint);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.cmd {
        Commands::Generate {
            preset: PresetArg { preset },
            out_dir,
            name,
            format,
            readme,
            no_readme,
            doc_ref,
            engine,
        } => {
            let format = format.unwrap_or_else(|| preset.default_format());
            let doc_ref = doc_ref.unwrap_or_else(|| Options::default_doc_ref(&out_dir, format));
            let options = Options {
                output_dir: out_dir,
                name: name.unwrap_or_else(|| preset.base_name().to_string()),
                format,
                doc_path: (!no_readme).then_some(readme),
                doc_ref,
            };

            let diagram = preset.diagram()?;
            println!("Generating \"{}\" diagram...", diagram.title);
            let report = pipeline::run(
                &diagram,
                &options,
                &engine.map(Graphviz::with_program).unwrap_or_default(),
                RunStamp::now(),
            )?;

            println!("Wrote {}", report.artifact.display());
            println!("Updated {}", report.latest.display());
            match report.doc_update {
                DocUpdate::Skipped => {}
                DocUpdate::Updated { path, replacements } => {
                    println!(
                        "Updated cache-buster in {} ({} reference(s))",
                        path.display(),
                        replacements
                    );
                }
                DocUpdate::NoReference { path, reference } => {
                    println!(
                        "WARN: {} does not reference {}; cache-buster not updated",
                        path.display(),
                        reference
                    );
                }
                DocUpdate::Failed { path, message } => {
                    println!("WARN: could not update {}: {}", path.display(), message);
                }
            }
        }
        Commands::Dot {
            preset: PresetArg { preset },
        } => {
            print!("{}", render::to_dot(&preset.diagram()?));
        }
        Commands::Topology {
            preset: PresetArg { preset },
        } => {
            println!("{}", serde_json::to_string_pretty(&preset.diagram()?)?);
        }
        Commands::Bust { readme, doc_ref } => {
            let token = RunStamp::now().cache_token();
            match cache_buster::update_file(&readme, &doc_ref, &token)? {
                0 => println!(
                    "WARN: {} does not reference {}; nothing updated",
                    readme.display(),
                    doc_ref
                ),
                n => println!("Updated {} reference(s) in {} to ?v={}", n, readme.display(), token),
            }
        }
        Commands::Inspect { path } => match inspect::inspect(&path) {
            Ok(report) => println!("{}", report),
            Err(err @ InspectError::NotFound(_)) => println!("{}", err),
            Err(err) => return Err(err.into()),
        },
    }

    Ok(())
}
