use anyhow::Result;
use clap::Parser;
use std::io;
use std::path::PathBuf;

use goname::core::{DeclarationScanner, Gorename, PackageLoader, RenameExecutor};

#[derive(Debug, Clone, Parser)]
#[command(
    name = "goname",
    version = "0.1.0",
    author = "goname developers",
    about = "Rename underscore_separated Go constants and variables to mixedCaps"
)]
struct Cli {
    /// List gorename targets instead of renaming
    #[arg(short = 'l', long)]
    list: bool,

    /// Verbose
    #[arg(short = 'v', long)]
    verbose: bool,

    /// gorename executable to invoke
    #[arg(
        long,
        value_name = "PROGRAM",
        env = "GONAME_GORENAME",
        default_value = "gorename"
    )]
    gorename: PathBuf,

    /// Comma-separated list of additional build tags
    #[arg(long, value_name = "TAGS", value_delimiter = ',')]
    tags: Vec<String>,

    /// Package to scan: an import path or a ./relative directory
    #[arg(value_name = "PACKAGE")]
    packages: Vec<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli)
}

fn run(cli: Cli) -> Result<()> {
    let Cli {
        list,
        verbose,
        gorename,
        tags,
        packages,
    } = cli;

    let package_spec = match packages.as_slice() {
        [] => anyhow::bail!("missing package argument"),
        [spec] => spec.as_str(),
        _ => anyhow::bail!("only one package argument allowed"),
    };

    let mut loader = PackageLoader::from_env()?;
    let tags: Vec<String> = tags
        .into_iter()
        .map(|tag| tag.trim().to_string())
        .filter(|tag| !tag.is_empty())
        .collect();
    if !tags.is_empty() {
        let build = loader.build_context().clone().with_tags(tags);
        loader = loader.with_build_context(build);
    }

    let package = loader.load(package_spec)?;
    if verbose {
        let build = loader.build_context();
        eprintln!("Target platform: {}/{}", build.goos(), build.goarch());
        eprintln!(
            "Loaded {} files from package {} ({})",
            package.file_count(),
            package.name,
            package.dir.display()
        );
        if package.external_test_files > 0 {
            eprintln!(
                "Skipped {} files of external test package {}_test",
                package.external_test_files, package.name
            );
        }
    }

    let targets = DeclarationScanner::new().scan_package(&package, package_spec);
    if verbose {
        eprintln!("Found {} rename targets", targets.len());
    }

    let executor = RenameExecutor::new().with_verbose(verbose);
    if list {
        executor.list(&targets, &mut io::stdout().lock())?;
        return Ok(());
    }

    let tool = Gorename::with_program(gorename).with_verbose(verbose);
    let applied = executor.apply(&tool, &targets)?;
    if verbose {
        eprintln!("Renamed {} targets", applied);
    }

    Ok(())
}
