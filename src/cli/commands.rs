use crate::archive::{pack_document, write_atomically, IconLibrary, NamedContainer, PackageBuilder};
use crate::cli::args::{Cli, Commands, InputArgs};
use crate::config::PipelineConfig;
use crate::error::{PipelineStage, ProcessingError, Result, StageContext};
use crate::models::{Layer, StyleId};
use crate::processors::{Pipeline, PipelineOutput, RunReport};
use crate::readers::{CsvSheet, SheetSource};
use crate::utils::constants::HEADER_ROWS;
use crate::utils::{generate_default_package_filename, slugify, ProgressReporter};
use crate::writers::{DescriptionFormat, KmlWriter};
use chrono::{Local, NaiveDate};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info, warn};
use validator::Validate;

/// What a successful `build` produced
#[derive(Debug)]
pub struct BuildSummary {
    pub report: RunReport,
    /// Archive paths of the containers, e.g. `navdata/mexican_airports.kmz`
    pub containers: Vec<String>,
    pub bytes_written: u64,
}

pub fn run(cli: Cli) -> Result<()> {
    setup_logging(&cli)?;
    let mut config = PipelineConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Build {
            input,
            output_file,
            icons_dir,
            extra_content,
            staging_dir,
            description_format,
            effective_date,
        } => {
            apply_input_overrides(&mut config, &input)?;
            if let Some(dir) = icons_dir {
                config.package.icons_dir = dir;
            }
            if extra_content.is_some() {
                config.package.extra_content = extra_content;
            }
            if let Some(format) = description_format {
                config.description_format = DescriptionFormat::parse(&format)?;
            }
            if effective_date.is_some() {
                config.package.effective_date = effective_date;
            }
            config.validate()?;

            let today = Local::now().date_naive();
            let output_file = output_file
                .unwrap_or_else(|| generate_default_package_filename(Path::new("."), today));
            let staging_dir = staging_dir.unwrap_or_else(|| output_file.with_extension("staging"));

            if !cli.quiet {
                println!("Building content pack...");
                println!("Input file: {}", input.input.display());
                println!("Output file: {}", output_file.display());
                println!("Icons: {}", config.package.icons_dir.display());
            }

            let sheet = CsvSheet::open(&input.input).stage(PipelineStage::Read)?;
            let progress = row_progress(&sheet, cli.quiet);
            let summary = build_pack(
                &sheet,
                &config,
                &output_file,
                &staging_dir,
                today,
                Some(&progress),
            )?;

            println!("\n{}", summary.report.summary());
            for container in &summary.containers {
                println!("  {}", container);
            }
            println!(
                "Wrote {} ({} bytes)",
                output_file.display(),
                summary.bytes_written
            );
        }

        Commands::Convert {
            input,
            output_dir,
            description_format,
        } => {
            apply_input_overrides(&mut config, &input)?;
            if let Some(format) = description_format {
                config.description_format = DescriptionFormat::parse(&format)?;
            }
            config.validate()?;

            if !cli.quiet {
                println!("Converting register to KML...");
                println!("Input file: {}", input.input.display());
                println!("Output directory: {}", output_dir.display());
            }

            let sheet = CsvSheet::open(&input.input).stage(PipelineStage::Read)?;
            let progress = row_progress(&sheet, cli.quiet);
            let (written, report) =
                convert_documents(&sheet, &config, &output_dir, Some(&progress))?;

            println!("\n{}", report.summary());
            for path in written {
                println!("Wrote {}", path.display());
            }
        }

        Commands::Validate { input } => {
            apply_input_overrides(&mut config, &input)?;
            config.validate()?;

            if !cli.quiet {
                println!("Validating register...");
                println!("Input file: {}", input.input.display());
            }

            let sheet = CsvSheet::open(&input.input).stage(PipelineStage::Read)?;
            let progress = row_progress(&sheet, cli.quiet);
            let output = pipeline_from(&config)?.run(&sheet, Some(&progress))?;
            println!("\n{}", output.report.summary());

            let missing = missing_icons(&output, &IconLibrary::new(&config.package.icons_dir));
            if missing.is_empty() {
                println!("All referenced icons found");
            } else {
                for style in &missing {
                    warn!("Icon missing for style '{}'", style);
                }
                println!(
                    "{} referenced icons missing from {}",
                    missing.len(),
                    config.package.icons_dir.display()
                );
            }
        }
    }

    Ok(())
}

/// Pipeline, containers, manifest and pack in one call
pub fn build_pack(
    source: &dyn SheetSource,
    config: &PipelineConfig,
    output_file: &Path,
    staging_dir: &Path,
    today: NaiveDate,
    progress: Option<&ProgressReporter>,
) -> Result<BuildSummary> {
    let PipelineOutput { documents, report } = pipeline_from(config)?.run(source, progress)?;

    let writer = KmlWriter::new().with_description_format(config.description_format);
    let icons = IconLibrary::new(&config.package.icons_dir);

    let mut containers = Vec::with_capacity(documents.len());
    for (layer, document) in &documents {
        let bytes = pack_document(document, &writer, &icons).stage(PipelineStage::Package)?;
        debug!("Layer '{}' packed into {} bytes", layer, bytes.len());
        containers.push(NamedContainer::new(slugify(document.name()), bytes));
    }

    let manifest = config.package.manifest(today);
    let bytes_written = PackageBuilder::new(staging_dir)
        .with_extra_content(config.package.extra_content.clone())
        .with_keep_staging(config.package.keep_staging)
        .write(&manifest, &containers, output_file)
        .stage(PipelineStage::Package)?;

    Ok(BuildSummary {
        report,
        containers: containers.iter().map(NamedContainer::entry_path).collect(),
        bytes_written,
    })
}

/// Write `{output_dir}/{document}.kml` per layer
pub fn convert_documents(
    source: &dyn SheetSource,
    config: &PipelineConfig,
    output_dir: &Path,
    progress: Option<&ProgressReporter>,
) -> Result<(Vec<PathBuf>, RunReport)> {
    let PipelineOutput { documents, report } = pipeline_from(config)?.run(source, progress)?;
    let writer = KmlWriter::new().with_description_format(config.description_format);

    let mut written = Vec::with_capacity(documents.len());
    for (_, document) in &documents {
        let bytes = writer.to_bytes(document).stage(PipelineStage::Assemble)?;
        let path = output_dir.join(format!("{}.kml", slugify(document.name())));
        write_atomically(&path, &bytes).stage(PipelineStage::Package)?;
        info!("Wrote {}", path.display());
        written.push(path);
    }

    Ok((written, report))
}

pub fn pipeline_from(config: &PipelineConfig) -> Result<Pipeline> {
    Ok(Pipeline::new()
        .with_max_workers(config.max_workers)
        .with_identifier_prefix(config.identifier_prefix.as_str())
        .with_schema(config.schema_selection()?)
        .with_layers(config.layers.iter().copied()))
}

fn apply_input_overrides(config: &mut PipelineConfig, input: &InputArgs) -> Result<()> {
    if let Some(schema) = &input.schema {
        config.schema = schema.clone();
    }
    if let Some(prefix) = &input.identifier_prefix {
        config.identifier_prefix = prefix.clone();
    }
    if !input.layers.is_empty() {
        config.layers = input
            .layers
            .iter()
            .map(|name| {
                Layer::parse(name)
                    .ok_or_else(|| ProcessingError::Config(format!("Unknown layer: {}", name)))
            })
            .collect::<Result<Vec<_>>>()?;
    }
    if let Some(workers) = input.max_workers {
        config.max_workers = workers;
    }
    Ok(())
}

fn row_progress(sheet: &dyn SheetSource, quiet: bool) -> ProgressReporter {
    let rows = sheet.row_count().saturating_sub(HEADER_ROWS) as u64;
    ProgressReporter::new(rows, "Reading register...", quiet)
}

fn missing_icons(output: &PipelineOutput, icons: &IconLibrary) -> Vec<StyleId> {
    let referenced: BTreeSet<StyleId> = output
        .documents
        .iter()
        .flat_map(|(_, doc)| doc.styles().copied())
        .collect();
    icons.missing(&referenced)
}

pub fn setup_logging(cli: &Cli) -> Result<()> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let log_level = cli.log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("mx_aero_pack={}", log_level)));

    let file_layer = match &cli.log_file {
        Some(path) => {
            let file = fs::File::create(path)?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .with(file_layer)
        .try_init()
        .map_err(|e| ProcessingError::Config(format!("Failed to initialise logging: {}", e)))?;

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}
