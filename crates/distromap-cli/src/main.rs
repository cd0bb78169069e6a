//! distromap CLI: map package names between distributions and plan
//! per-package build environments from the result.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use distromap_core::buildenv::{
    append_env_entries, load_package_options, plan_env, write_compiler_profiles,
};
use distromap_core::catalog::loader::load_target_catalog;
use distromap_core::config::{default_output_path, MapConfig, Mapping, MappingReport};
use distromap_core::output::{mapping_to_json, read_mapping, write_mapping};
use distromap_core::pipeline;
use distromap_core::resolver::Resolver;
use distromap_core::rules::RuleSet;

#[derive(Parser)]
#[command(
    name = "distromap",
    about = "distromap - Map Clear Linux package names onto Gentoo packages"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Map every source package and write the mapping JSON
    Map {
        /// Source catalog (text, or JSON array)
        #[arg(short, long, default_value = "data/clearlinux_pkgs.txt")]
        source: String,

        /// Target catalog (category/name lines, or JSON object)
        #[arg(short, long, default_value = "data/gentoo_pkgs.txt")]
        target: String,

        /// Output JSON file path
        #[arg(short, long)]
        output: Option<String>,

        /// JSON rule tables replacing the built-in ones
        #[arg(long)]
        rules: Option<String>,

        /// Worker threads for resolution
        #[arg(long)]
        threads: Option<usize>,

        /// Show per-phase timing breakdown
        #[arg(long)]
        verbose: bool,

        /// Suppress all output except errors
        #[arg(long)]
        quiet: bool,
    },

    /// Resolve individual names and print their records
    Resolve {
        /// Source package names
        #[arg(required = true)]
        names: Vec<String>,

        /// Target catalog (category/name lines, or JSON object)
        #[arg(short, long, default_value = "data/gentoo_pkgs.txt")]
        target: String,

        /// JSON rule tables replacing the built-in ones
        #[arg(long)]
        rules: Option<String>,
    },

    /// Write compiler profiles and package.env entries from a mapping
    Env {
        /// Per-package build options (JSON array)
        options: PathBuf,

        /// Mapping written by `distromap map`
        #[arg(short, long, default_value = "data/pkg_mapping.json")]
        mapping: PathBuf,

        /// Directory receiving the compiler profiles
        #[arg(long, default_value = "etc/portage/env")]
        env_dir: PathBuf,

        /// Directory receiving the package.env entries
        #[arg(long, default_value = "etc/portage/package.env")]
        package_env_dir: PathBuf,

        /// Suppress all output except errors
        #[arg(long)]
        quiet: bool,
    },
}

fn init_logging(verbose: bool, quiet: bool) {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn fail(context: &str, err: impl std::fmt::Display) -> ! {
    eprintln!("{context}: {err}");
    std::process::exit(1);
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Map {
            source,
            target,
            output,
            rules,
            threads,
            verbose,
            quiet,
        } => {
            init_logging(verbose, quiet);
            let output_path = output.unwrap_or_else(default_output_path);
            let config = MapConfig {
                source_path: source,
                target_path: target,
                output_path: Some(output_path.clone()),
                rules_path: rules,
                threads,
            };

            if quiet {
                run_quiet(&config, &output_path);
            } else {
                run_with_progress(&config, &output_path, verbose);
            }
        }
        Commands::Resolve {
            names,
            target,
            rules,
        } => {
            init_logging(false, false);
            run_resolve(&names, &target, rules.as_deref());
        }
        Commands::Env {
            options,
            mapping,
            env_dir,
            package_env_dir,
            quiet,
        } => {
            init_logging(false, quiet);
            run_env(&options, &mapping, &env_dir, &package_env_dir, quiet);
        }
    }
}

fn run_quiet(config: &MapConfig, output_path: &str) {
    match pipeline::run_pipeline(config, None) {
        Ok(report) => {
            if let Err(e) = write_mapping(&report.mapping, Path::new(output_path)) {
                fail("Error writing output", e);
            }
        }
        Err(e) => fail("Mapping failed", e),
    }
}

fn run_with_progress(config: &MapConfig, output_path: &str, verbose: bool) {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message("Initialising...");
    pb.enable_steady_tick(std::time::Duration::from_millis(80));

    let progress: pipeline::ProgressCallback = {
        let pb = pb.clone();
        Box::new(move |_name, label| {
            pb.set_message(label.to_string());
        })
    };

    let start = Instant::now();
    let report = match pipeline::run_pipeline(config, Some(progress)) {
        Ok(r) => r,
        Err(e) => {
            pb.finish_and_clear();
            fail("Mapping failed", e);
        }
    };
    pb.finish_and_clear();

    print_summary(config, &report, start, verbose);

    if let Err(e) = write_mapping(&report.mapping, Path::new(output_path)) {
        fail("Error writing output", e);
    }

    println!(
        "\n  {} {}",
        style("Output written to:").green(),
        output_path
    );
}

fn print_summary(config: &MapConfig, report: &MappingReport, start: Instant, verbose: bool) {
    let s = &report.summary;
    println!(
        "\n{}  distromap: {} → {}",
        style("✓").green().bold(),
        style(&config.source_path).bold(),
        style(&config.target_path).bold()
    );
    println!("  {:<14} {}", "Packages:", s.total);
    println!(
        "  {:<14} {} ({} override, {} direct, {} transformed)",
        "Matched:", s.matched, s.overrides, s.direct, s.transformed
    );
    println!("  {:<14} {}", "Ambiguous:", s.ambiguous);
    println!("  {:<14} {}", "Unmatched:", style(s.unmatched).yellow());

    let duration = start.elapsed();
    println!(
        "  {:<14} {:.1}ms",
        "Duration:",
        duration.as_secs_f64() * 1000.0
    );

    if verbose {
        if let Some(serde_json::Value::Object(timings)) = report.metadata.get("phase_timings") {
            println!("\n  Phase Timings:");
            for (phase, secs) in timings {
                if let Some(val) = secs.as_f64() {
                    println!("    {:<14} {:.1}ms", phase, val * 1000.0);
                }
            }
        }
    }
}

fn run_resolve(names: &[String], target: &str, rules: Option<&str>) {
    let rules = match rules {
        Some(path) => RuleSet::load(Path::new(path)).unwrap_or_else(|e| fail("Bad rules", e)),
        None => RuleSet::default(),
    };
    let catalog =
        load_target_catalog(Path::new(target)).unwrap_or_else(|e| fail("Bad target catalog", e));
    let resolver = Resolver::from_catalog(&catalog, rules);

    let mapping: Mapping = resolver
        .resolve_batch(names)
        .into_iter()
        .map(|r| (r.name, r.result))
        .collect();
    match mapping_to_json(&mapping) {
        Ok(json) => print!("{json}"),
        Err(e) => fail("Error serialising mapping", e),
    }
}

fn run_env(options: &Path, mapping: &Path, env_dir: &Path, package_env_dir: &Path, quiet: bool) {
    let profiles =
        write_compiler_profiles(env_dir).unwrap_or_else(|e| fail("Error writing profiles", e));
    let mapping = read_mapping(mapping).unwrap_or_else(|e| fail("Error loading mapping", e));
    let packages =
        load_package_options(options).unwrap_or_else(|e| fail("Error loading options", e));

    let plan = plan_env(&packages, &mapping);
    let written = append_env_entries(package_env_dir, &plan.entries)
        .unwrap_or_else(|e| fail("Error writing package.env", e));

    if !quiet {
        println!(
            "\n{}  {} compiler profiles in {}",
            style("✓").green().bold(),
            profiles.len(),
            env_dir.display()
        );
        println!("  {:<14} {}", "Packages:", packages.len());
        println!("  {:<14} {}", "Planned:", plan.planned);
        println!("  {:<14} {}", "Skipped:", style(plan.skipped).yellow());
        println!("  {:<14} {}", "Entries:", written);
        println!(
            "\n  {} {}",
            style("Entries written to:").green(),
            package_env_dir.display()
        );
    }
}
