use clap::Parser;
use mixup::{MixupError, NamespacePolicy, RenderBuilder, RootKind};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(version, about = "Build XML from a declarative JSON markup spec")]
struct Args {
    /// Path to the JSON spec, or `-` to read standard input
    spec: PathBuf,

    /// Write the XML here instead of standard output
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Build into a document fragment instead of a document
    #[arg(long)]
    fragment: bool,

    /// Pretty-print with this many spaces per level
    #[arg(long)]
    indent: Option<usize>,

    /// Emit an XML declaration
    #[arg(long)]
    declaration: bool,

    /// Fail on prefixes with no namespace binding
    #[arg(long)]
    strict: bool,

    /// JSON file with render settings; flags take precedence
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn read_spec(path: &Path) -> Result<String, MixupError> {
    if path.as_os_str() == "-" {
        let mut source = String::new();
        io::stdin().read_to_string(&mut source)?;
        return Ok(source);
    }
    fs::read_to_string(path).map_err(|e| {
        MixupError::Io(io::Error::new(
            e.kind(),
            format!("Failed to read spec from '{}': {}", path.display(), e),
        ))
    })
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), MixupError> {
    let mut builder = match &args.config {
        Some(path) => RenderBuilder::from_config_file(path)?,
        None => RenderBuilder::new(),
    };
    if args.fragment {
        builder = builder.with_root(RootKind::Fragment);
    }
    if let Some(width) = args.indent {
        builder = builder.with_indent(width);
    }
    if args.declaration {
        builder = builder.with_xml_declaration(true);
    }
    if args.strict {
        builder = builder.with_namespace_policy(NamespacePolicy::Strict);
    }
    let renderer = builder.build();

    log::info!("Rendering {}", args.spec.display());
    let source = read_spec(&args.spec)?;
    let xml = renderer.render_str(&source)?;

    match &args.output {
        Some(path) => {
            fs::write(path, xml)?;
            log::info!("Wrote {}", path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", xml)?;
        }
    }
    Ok(())
}
