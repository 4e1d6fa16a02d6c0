use clap::{Parser, Subcommand};
use lean_core::config::{seed_from_value, window_from_values};
use lean_core::constants::{
    DEFAULT_CURRENCY, DEFAULT_ORGANISATION, DEFAULT_OUTPUT_DIR, DEFAULT_REFERENCE_DIR,
    DEFAULT_RESIDENTS_FILE, DEFAULT_STAFF_COUNT,
};
use lean_core::{CategorySet, GeneratorConfig, WriteSummary};
use lean_files::{hash_avatars, DEFAULT_AVATARS_DIR, DEFAULT_SECRET_FILE};
use lean_media::{bulk_upload, CloudinaryCredentials, CloudinaryUploader, UploadSummary};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "lean")]
#[command(about = "lean-ehr demo data toolkit")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate demo records for every resident
    Generate {
        /// Residents JSON array
        #[arg(long, env = "LEAN_RESIDENTS_FILE", default_value = DEFAULT_RESIDENTS_FILE)]
        residents_file: PathBuf,
        /// Root directory for the category files
        #[arg(long, env = "LEAN_OUTPUT_DIR", default_value = DEFAULT_OUTPUT_DIR)]
        output_dir: PathBuf,
        /// Directory of SNOMED term files
        #[arg(long, env = "LEAN_REFERENCE_DIR", default_value = DEFAULT_REFERENCE_DIR)]
        reference_dir: PathBuf,
        /// Directory overriding the embedded catalog files
        #[arg(long, env = "LEAN_CATALOG_DIR")]
        catalog_dir: Option<PathBuf>,
        /// Window start (YYYY-MM-DD or RFC 3339)
        #[arg(long, env = "LEAN_START_DATE")]
        start_date: Option<String>,
        /// Date splitting prescription start and end ranges
        #[arg(long, env = "LEAN_INTERMEDIARY_DATE")]
        intermediary_date: Option<String>,
        /// Window end (default: now)
        #[arg(long, env = "LEAN_END_DATE")]
        end_date: Option<String>,
        #[arg(long, env = "LEAN_STAFF_COUNT", default_value_t = DEFAULT_STAFF_COUNT)]
        staff_count: usize,
        #[arg(long, env = "LEAN_ORGANISATION", default_value = DEFAULT_ORGANISATION)]
        organisation: String,
        #[arg(long, env = "LEAN_CURRENCY", default_value = DEFAULT_CURRENCY)]
        currency: String,
        /// Only write these categories (comma-separated, e.g. observations,allergies)
        #[arg(long, env = "LEAN_CATEGORIES")]
        only: Option<String>,
        /// Seed for a reproducible run
        #[arg(long, env = "LEAN_SEED")]
        seed: Option<String>,
    },
    /// Rename avatar images to salted hashes and rewrite the residents file
    HashAvatars {
        #[arg(long, default_value = DEFAULT_RESIDENTS_FILE)]
        residents_file: PathBuf,
        #[arg(long, default_value = DEFAULT_AVATARS_DIR)]
        avatars_dir: PathBuf,
        /// Where the per-run secret is written
        #[arg(long, default_value = DEFAULT_SECRET_FILE)]
        secret_file: PathBuf,
    },
    /// Upload every file in a local folder to a Cloudinary folder
    Upload {
        /// Local folder to walk
        local_folder: PathBuf,
        /// Target Cloudinary folder
        cloudinary_folder: String,
        #[arg(long, env = "CLOUDINARY_CLOUD_NAME", hide_env_values = true)]
        cloud_name: Option<String>,
        #[arg(long, env = "CLOUDINARY_API_KEY", hide_env_values = true)]
        api_key: Option<String>,
        #[arg(long, env = "CLOUDINARY_API_SECRET", hide_env_values = true)]
        api_secret: Option<String>,
    },
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let filter = match "lean=info".parse::<tracing_subscriber::filter::Directive>() {
        Ok(directive) => tracing_subscriber::EnvFilter::from_default_env().add_directive(directive),
        Err(_) => tracing_subscriber::EnvFilter::from_default_env(),
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Some(Commands::Generate {
            residents_file,
            output_dir,
            reference_dir,
            catalog_dir,
            start_date,
            intermediary_date,
            end_date,
            staff_count,
            organisation,
            currency,
            only,
            seed,
        }) => {
            let window =
                window_from_values(start_date, intermediary_date, end_date, chrono::Utc::now())?;
            let categories = match only {
                Some(list) => CategorySet::parse_list(&list)?,
                None => CategorySet::all(),
            };
            let config = GeneratorConfig::new(
                residents_file,
                output_dir,
                reference_dir,
                window,
                staff_count,
                &organisation,
                &currency,
            )?
            .with_catalog_dir(catalog_dir)
            .with_categories(categories)
            .with_seed(seed_from_value(seed)?);

            let summary = lean_core::run(&config)?;
            log_write_summary(&summary, config.output_dir());
        }
        Some(Commands::HashAvatars {
            residents_file,
            avatars_dir,
            secret_file,
        }) => {
            let report = hash_avatars(
                &residents_file,
                &avatars_dir,
                &secret_file,
                &mut rand::thread_rng(),
            )?;
            println!(
                "Rewrote {} avatar URLs, renamed {} files",
                report.rewritten, report.renamed
            );
            for missing in &report.missing {
                println!("- not found: {}", missing);
            }
            println!("Secret written to {}", secret_file.display());
        }
        Some(Commands::Upload {
            local_folder,
            cloudinary_folder,
            cloud_name,
            api_key,
            api_secret,
        }) => {
            let credentials =
                CloudinaryCredentials::from_env_values(cloud_name, api_key, api_secret)?;
            let uploader = CloudinaryUploader::new(credentials)?;
            let summary = bulk_upload(&uploader, &local_folder, &cloudinary_folder)?;
            log_upload_summary(&summary);
        }
        None => {
            println!("Use 'lean --help' for commands");
        }
    }

    Ok(())
}

fn log_write_summary(summary: &WriteSummary, output_dir: &Path) {
    for (category, count) in &summary.counts {
        tracing::info!("{:>28}: {}", category, count);
    }
    tracing::info!(
        "Wrote {} records to {}",
        summary.total(),
        output_dir.display()
    );
}

fn log_upload_summary(summary: &UploadSummary) {
    tracing::info!("--- Upload Summary ---");
    tracing::info!("Total files processed: {}", summary.total());
    tracing::info!("Successfully uploaded: {}", summary.uploaded.len());
    if summary.all_succeeded() {
        tracing::info!("All files uploaded successfully!");
        return;
    }
    tracing::warn!("Failed uploads: {}", summary.failed.len());
    for failure in &summary.failed {
        tracing::warn!("- {}: {}", failure.path.display(), failure.error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use lean_core::Category;
    use lean_media::UploadFailure;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Log output of `f` under a plain-text INFO subscriber.
    fn logged(f: impl FnOnce()) -> String {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        let bytes = captured.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_generate_selection_and_seed() {
        let cli = Cli::try_parse_from([
            "lean",
            "generate",
            "--only",
            "observations",
            "--seed",
            "42",
            "--output-dir",
            "out",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Generate {
                only,
                seed,
                output_dir,
                ..
            }) => {
                assert_eq!(only.as_deref(), Some("observations"));
                assert_eq!(seed.as_deref(), Some("42"));
                assert_eq!(output_dir, PathBuf::from("out"));
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn upload_takes_two_positionals() {
        let cli =
            Cli::try_parse_from(["lean", "upload", "public/avatars", "lean/avatars"]).unwrap();
        match cli.command {
            Some(Commands::Upload {
                local_folder,
                cloudinary_folder,
                ..
            }) => {
                assert_eq!(local_folder, PathBuf::from("public/avatars"));
                assert_eq!(cloudinary_folder, "lean/avatars");
            }
            _ => panic!("expected upload"),
        }
        assert!(Cli::try_parse_from(["lean", "upload", "public/avatars"]).is_err());
    }

    #[test]
    fn write_summary_is_logged_per_category() {
        let mut summary = WriteSummary::default();
        summary.counts.insert(Category::Observations, 12);
        let out = logged(|| log_write_summary(&summary, Path::new("demo-data")));

        assert!(out.contains("observations: 12"));
        assert!(out.contains("Wrote 12 records to demo-data"));
    }

    #[test]
    fn upload_failures_are_logged_as_warnings() {
        let summary = UploadSummary {
            uploaded: vec![],
            failed: vec![UploadFailure {
                path: PathBuf::from("avatars/bad.png"),
                error: "Invalid image file".into(),
            }],
        };
        let out = logged(|| log_upload_summary(&summary));

        assert!(out.contains("Total files processed: 1"));
        assert!(out.contains("WARN"));
        assert!(out.contains("avatars/bad.png: Invalid image file"));
        assert!(!out.contains("All files uploaded successfully!"));
    }
}
