//! docfill CLI - Word template filling tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;

use docfill::{
    detect_format_from_path, fill_file_with_options, generate_file_name, DocxTemplate,
    FillOptions, FillReport, PlaceholderValues, TemplateLibrary,
};

#[derive(Parser)]
#[command(name = "docfill")]
#[command(version)]
#[command(about = "Fill {{placeholder}} templates in Word documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List template groups and their documents
    #[command(alias = "ls")]
    List {
        /// Library root: one subdirectory per group
        #[arg(value_name = "ROOT", env = "DOCFILL_ROOT")]
        root: PathBuf,
    },

    /// List the placeholders a template needs
    Placeholders {
        /// Template DOCX file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print a JSON array
        #[arg(long)]
        json: bool,
    },

    /// Generate a document from a template
    Fill {
        /// Template DOCX file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Placeholder value as NAME=VALUE (repeatable)
        #[arg(short, long = "set", value_name = "NAME=VALUE")]
        set: Vec<String>,

        /// JSON object file with placeholder values
        #[arg(long, value_name = "FILE")]
        values: Option<PathBuf>,

        /// Output file (a unique name in --out-dir if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Directory for generated documents
        #[arg(long, value_name = "DIR", default_value = "generated", env = "DOCFILL_OUT_DIR")]
        out_dir: PathBuf,

        /// Fail when a placeholder has no value
        #[arg(long)]
        strict: bool,

        /// Skip the literal residual pass
        #[arg(long)]
        no_residual: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show package information
    Info {
        /// DOCX file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Dump the parsed document model as JSON
    Inspect {
        /// DOCX file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::List { root } => cmd_list(&root),
        Commands::Placeholders { input, json } => cmd_placeholders(&input, json),
        Commands::Fill {
            input,
            set,
            values,
            output,
            out_dir,
            strict,
            no_residual,
            json,
        } => {
            let mut options = FillOptions::new().with_residual_pass(!no_residual);
            if strict {
                options = options.strict();
            }
            cmd_fill(
                &input,
                &set,
                values.as_deref(),
                output.as_deref(),
                &out_dir,
                &options,
                json,
            )
        }
        Commands::Info { input } => cmd_info(&input),
        Commands::Inspect { input, compact } => cmd_inspect(&input, compact),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_list(root: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let library = TemplateLibrary::scan(root)?;

    if library.groups.is_empty() {
        println!("{} {}", "No template groups in".yellow(), root.display());
        return Ok(());
    }

    for group in &library.groups {
        println!("{}", group.name.cyan().bold());
        if group.is_empty() {
            println!("  {}", "(no templates)".dimmed());
        }
        let last = group.templates.len().saturating_sub(1);
        for (i, template) in group.templates.iter().enumerate() {
            let branch = if i == last { "└─" } else { "├─" };
            println!("  {} {}", branch.dimmed(), template);
        }
    }

    println!(
        "\n{} template(s) in {} group(s)",
        library.template_count(),
        library.groups.len()
    );
    Ok(())
}

fn cmd_placeholders(input: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let names = docfill::extract_placeholders(input)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&names)?);
        return Ok(());
    }

    if names.is_empty() {
        println!("{}", "No placeholders found".yellow());
    }
    for name in &names {
        println!("{}", name);
    }
    Ok(())
}

fn load_values(
    assignments: &[String],
    values_file: Option<&Path>,
) -> Result<PlaceholderValues, Box<dyn std::error::Error>> {
    let mut values = match values_file {
        Some(path) => PlaceholderValues::from_json(&fs::read_to_string(path)?)?,
        None => PlaceholderValues::new(),
    };
    // --set wins over the values file
    for assignment in assignments {
        values.parse_assignment(assignment)?;
    }
    Ok(values)
}

fn cmd_fill(
    input: &Path,
    assignments: &[String],
    values_file: Option<&Path>,
    output: Option<&Path>,
    out_dir: &Path,
    options: &FillOptions,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let values = load_values(assignments, values_file)?;
    log::debug!("Loaded {} placeholder value(s)", values.len());

    let target = match output {
        Some(path) => path.to_path_buf(),
        None => {
            let file_name = input
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .ok_or("Input path has no file name")?;
            fs::create_dir_all(out_dir)?;
            out_dir.join(generate_file_name(&file_name))
        }
    };

    let report = fill_file_with_options(input, &target, &values, options)?;

    if json {
        let out = serde_json::json!({
            "output": target.display().to_string(),
            "report": report,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        print_report(&report);
        println!("{} {}", "Saved to".green(), target.display());
    }
    Ok(())
}

fn print_report(report: &FillReport) {
    println!("{}", "Fill Report".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Paragraphs".bold(), report.paragraphs_visited);
    println!("{}: {}", "Replaced".bold(), report.placeholders_replaced);
    if report.residual_replacements > 0 {
        println!("{}: {}", "Residual".bold(), report.residual_replacements);
    }
    if report.skipped_spans > 0 {
        println!("{}: {}", "Skipped".bold().yellow(), report.skipped_spans);
    }
    if !report.unknown_placeholders.is_empty() {
        let names: Vec<&str> = report
            .unknown_placeholders
            .iter()
            .map(String::as_str)
            .collect();
        println!("{}: {}", "Left unfilled".bold().yellow(), names.join(", "));
    }
    println!();
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let format = detect_format_from_path(input)?;
    let template = DocxTemplate::open(input)?;
    let doc = template.document();

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Format".bold(), format);
    println!("{}: {}", "Sections".bold(), doc.sections.len());
    println!(
        "{}: {}",
        "Headers / footers".bold(),
        match (format.has_headers, format.has_footers) {
            (true, true) => "both",
            (true, false) => "headers",
            (false, true) => "footers",
            (false, false) => "none",
        }
    );
    let parts: Vec<&str> = template.part_names().collect();
    println!("{}: {}", "Templated parts".bold(), parts.join(", "));

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    let text = doc.plain_text();
    println!("{}: {}", "Paragraphs".bold(), doc.paragraphs().count());
    println!("{}: {}", "Tables".bold(), doc.tables().count());
    println!("{}: {}", "Words".bold(), text.split_whitespace().count());
    println!("{}: {}", "Placeholders".bold(), template.placeholders().len());

    Ok(())
}

fn cmd_inspect(input: &Path, compact: bool) -> Result<(), Box<dyn std::error::Error>> {
    let template = DocxTemplate::open(input)?;
    let json = if compact {
        serde_json::to_string(template.document())?
    } else {
        serde_json::to_string_pretty(template.document())?
    };
    println!("{}", json);
    Ok(())
}

fn cmd_version() {
    println!("{} {}", "docfill".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Word template filling tool");
    println!();
    println!("License: MIT");
}
