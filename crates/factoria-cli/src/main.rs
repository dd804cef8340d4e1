mod config;
mod error;
mod logging;
mod output;
mod pipeline;

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::{Args, Parser, Subcommand};
use factoria_core::redact_connection_string;
use factoria_introspect::{
    PostgresProvider, SchemaProvider, SnapshotProvider, TableRef, introspect_tables,
};
use sqlx::postgres::PgPoolOptions;

use config::{FactoriaConfig, load_config};
use error::CliError;
use logging::init_logging;
use output::{WriteOutcome, factory_path, render_factory, write_factory, write_json_atomic};
use pipeline::Pipeline;

const DATABASE_URL_ENV: &str = "DATABASE_URL";

#[derive(Parser, Debug)]
#[command(name = "factoria", version, about = "Model factory generator")]
struct Cli {
    /// Path to the model manifest.
    #[arg(long, global = true, default_value = "factoria.toml")]
    config: PathBuf,
    /// Append JSON log lines to this file instead of stderr.
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write factory files for the selected models (all when none given).
    Generate(GenerateArgs),
    /// Print the classification of one model as JSON.
    Classify(ClassifyArgs),
    /// Introspect the configured model tables into a schema snapshot.
    Snapshot(SnapshotArgs),
}

#[derive(Args, Debug)]
struct SourceArgs {
    /// Database connection string; defaults to $DATABASE_URL.
    #[arg(long, value_name = "CONNECTION_STRING", conflicts_with = "snapshot")]
    conn: Option<String>,
    /// Read tables from a schema.json snapshot instead of a database.
    #[arg(long, value_name = "PATH")]
    snapshot: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    #[arg(value_name = "MODEL")]
    models: Vec<String>,
    #[command(flatten)]
    source: SourceArgs,
    /// Output directory; overrides `factories_dir`.
    #[arg(long)]
    dir: Option<PathBuf>,
    /// Overwrite existing factory files.
    #[arg(long, short = 'F', default_value_t = false)]
    force: bool,
}

#[derive(Args, Debug)]
struct ClassifyArgs {
    #[arg(value_name = "MODEL")]
    model: String,
    #[command(flatten)]
    source: SourceArgs,
}

#[derive(Args, Debug)]
struct SnapshotArgs {
    /// Database connection string; defaults to $DATABASE_URL.
    #[arg(long, value_name = "CONNECTION_STRING")]
    conn: Option<String>,
    #[arg(long, default_value = "schema.json")]
    out: PathBuf,
}

enum Source {
    Postgres(PostgresProvider),
    Snapshot(SnapshotProvider),
}

impl Source {
    fn provider(&self) -> &dyn SchemaProvider {
        match self {
            Source::Postgres(provider) => provider,
            Source::Snapshot(provider) => provider,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;

    let config = load_config(&cli.config)?;
    tracing::debug!(
        event = "config_loaded",
        path = %cli.config.display(),
        models = config.models.len(),
    );

    match cli.command {
        Command::Generate(args) => run_generate(&config, args).await,
        Command::Classify(args) => run_classify(&config, args).await,
        Command::Snapshot(args) => run_snapshot(&config, args).await,
    }
}

async fn run_generate(config: &FactoriaConfig, args: GenerateArgs) -> Result<(), CliError> {
    let timer = Instant::now();
    let source = open_source(args.source).await?;
    let pipeline = Pipeline::new(config, source.provider())?;
    let dir = args.dir.unwrap_or_else(|| config.factories_dir.clone());

    let (models, unknown) = config.select_models(&args.models);
    let total = models.len();
    tracing::info!(
        event = "run_started",
        engine = source.provider().engine(),
        models = total,
        dir = %dir.display(),
    );
    for name in &unknown {
        tracing::warn!(event = "model_unknown", model = %name);
    }

    let mut written = 0usize;
    let mut skipped = 0usize;
    let mut failed = 0usize;

    for model in models {
        let result = match pipeline.classify(model).await {
            Ok(spec) => {
                let path = factory_path(&dir, &spec.model);
                write_factory(&path, &render_factory(&spec), args.force)
                    .map(|outcome| (outcome, path, spec.len()))
            }
            Err(err) => Err(err),
        };

        match result {
            Ok((WriteOutcome::Written, path, fields)) => {
                written += 1;
                tracing::info!(
                    event = "factory_written",
                    model = %model.name,
                    path = %path.display(),
                    fields = fields,
                );
            }
            Ok((WriteOutcome::Skipped, path, _)) => {
                skipped += 1;
                tracing::warn!(
                    event = "factory_exists",
                    model = %model.name,
                    path = %path.display(),
                );
            }
            Err(err) => {
                failed += 1;
                tracing::error!(event = "model_failed", model = %model.name, error = %err);
            }
        }
    }

    let duration_ms = timer.elapsed().as_millis();
    tracing::info!(
        event = "run_finished",
        written = written,
        skipped = skipped,
        failed = failed,
        unknown = unknown.len(),
        duration_ms = duration_ms,
    );

    if failed > 0 {
        return Err(CliError::ModelsFailed { failed, total });
    }
    Ok(())
}

async fn run_classify(config: &FactoriaConfig, args: ClassifyArgs) -> Result<(), CliError> {
    let (models, _) = config.select_models(std::slice::from_ref(&args.model));
    let model = models
        .first()
        .copied()
        .ok_or_else(|| CliError::InvalidConfig(format!("unknown model: {}", args.model)))?;

    let source = open_source(args.source).await?;
    let pipeline = Pipeline::new(config, source.provider())?;
    let spec = pipeline.classify(model).await?;

    println!("{}", serde_json::to_string_pretty(&spec)?);
    Ok(())
}

async fn run_snapshot(config: &FactoriaConfig, args: SnapshotArgs) -> Result<(), CliError> {
    let timer = Instant::now();
    let conn = resolve_conn(args.conn)?;
    let provider = connect_postgres(&conn).await?;

    let options = config.provider_options();
    let tables: Vec<TableRef> = config
        .models
        .iter()
        .map(|model| TableRef::parse(&model.table_name(), &options))
        .collect();

    tracing::info!(event = "introspection_started", tables = tables.len());
    let database = provider.database_name().await?;
    let snapshot = introspect_tables(&provider, Some(database), &tables).await?;
    tracing::info!(event = "introspection_finished");

    write_snapshot(&args.out, &snapshot)?;

    let duration_ms = timer.elapsed().as_millis();
    tracing::info!(event = "run_finished", status = "success", duration_ms = duration_ms);
    Ok(())
}

fn write_snapshot(path: &Path, snapshot: &factoria_core::DatabaseSchema) -> Result<(), CliError> {
    write_json_atomic(path, snapshot)?;
    tracing::info!(event = "snapshot_written", path = %path.display());
    Ok(())
}

async fn open_source(args: SourceArgs) -> Result<Source, CliError> {
    match args.snapshot {
        Some(path) => {
            let provider = SnapshotProvider::from_path(&path)?;
            tracing::info!(event = "snapshot_opened", path = %path.display());
            Ok(Source::Snapshot(provider))
        }
        None => {
            let conn = resolve_conn(args.conn)?;
            Ok(Source::Postgres(connect_postgres(&conn).await?))
        }
    }
}

fn resolve_conn(conn: Option<String>) -> Result<String, CliError> {
    conn.or_else(|| std::env::var(DATABASE_URL_ENV).ok())
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| {
            CliError::InvalidConfig(format!(
                "connection string is required (--conn, --snapshot or ${DATABASE_URL_ENV})"
            ))
        })
}

async fn connect_postgres(conn: &str) -> Result<PostgresProvider, CliError> {
    let engine = detect_engine(conn)?;
    tracing::info!(
        event = "engine_detected",
        engine = %engine,
        connection = %redact_connection_string(conn),
    );

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(10))
        .connect(conn)
        .await?;
    Ok(PostgresProvider::new(pool))
}

fn detect_engine(conn: &str) -> Result<&'static str, CliError> {
    if conn.starts_with("postgres://") || conn.starts_with("postgresql://") {
        Ok("postgres")
    } else {
        Err(CliError::UnsupportedEngine(redact_connection_string(conn)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn conn_and_snapshot_are_exclusive() {
        let parsed = Cli::try_parse_from([
            "factoria",
            "generate",
            "--conn",
            "postgres://localhost/app",
            "--snapshot",
            "schema.json",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn parses_generate_flags() {
        let cli = Cli::try_parse_from([
            "factoria",
            "generate",
            "User",
            "Post",
            "--snapshot",
            "schema.json",
            "-F",
            "--config",
            "custom.toml",
        ])
        .expect("parse");
        assert_eq!(cli.config, PathBuf::from("custom.toml"));
        match cli.command {
            Command::Generate(args) => {
                assert_eq!(args.models, vec!["User", "Post"]);
                assert!(args.force);
                assert_eq!(args.source.snapshot, Some(PathBuf::from("schema.json")));
                assert!(args.dir.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn detects_postgres_urls_only() {
        assert_eq!(detect_engine("postgres://u:p@db/app").expect("pg"), "postgres");
        assert_eq!(detect_engine("postgresql://db/app").expect("pg"), "postgres");
        assert!(matches!(
            detect_engine("mysql://db/app"),
            Err(CliError::UnsupportedEngine(_))
        ));
    }

    fn scratch_dir(label: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "factoria-main-{label}-{}-{nanos}",
            std::process::id()
        ))
    }

    fn write_members_snapshot(dir: &Path) -> PathBuf {
        let snapshot = serde_json::json!({
            "snapshot_version": factoria_core::SNAPSHOT_VERSION,
            "engine": "snapshot",
            "schemas": [{
                "name": "public",
                "tables": [{
                    "name": "members",
                    "columns": [{
                        "ordinal_position": 1,
                        "name": "email",
                        "column_type": {
                            "data_type": "character varying",
                            "udt_schema": "pg_catalog",
                            "udt_name": "varchar"
                        },
                        "is_nullable": false
                    }]
                }]
            }],
            "enums": []
        });
        let path = dir.join("schema.json");
        write_json_atomic(&path, &snapshot).expect("write snapshot");
        path
    }

    fn generate_args(dir: &Path, snapshot: PathBuf) -> GenerateArgs {
        GenerateArgs {
            models: Vec::new(),
            source: SourceArgs {
                conn: None,
                snapshot: Some(snapshot),
            },
            dir: Some(dir.join("factories")),
            force: false,
        }
    }

    #[tokio::test]
    async fn generate_writes_factories_for_known_tables() {
        let dir = scratch_dir("ok");
        let snapshot = write_members_snapshot(&dir);
        let config = FactoriaConfig::from_toml("[[models]]\nname = \"Member\"\n").expect("config");

        run_generate(&config, generate_args(&dir, snapshot))
            .await
            .expect("generate");
        let rendered = std::fs::read_to_string(dir.join("factories").join("MemberFactory.php"))
            .expect("factory file");
        assert!(rendered.contains("'email' => $faker->safeEmail,"));

        std::fs::remove_dir_all(&dir).expect("cleanup");
    }

    #[tokio::test]
    async fn generate_reports_failed_models() {
        let dir = scratch_dir("failed");
        let snapshot = write_members_snapshot(&dir);
        let config = FactoriaConfig::from_toml(
            "[[models]]\nname = \"Member\"\n\n[[models]]\nname = \"Invoice\"\n",
        )
        .expect("config");

        let err = run_generate(&config, generate_args(&dir, snapshot))
            .await
            .expect_err("missing table fails the run");
        assert!(matches!(err, CliError::ModelsFailed { failed: 1, total: 2 }));
        assert!(dir.join("factories").join("MemberFactory.php").exists());

        std::fs::remove_dir_all(&dir).expect("cleanup");
    }

    #[test]
    fn explicit_conn_wins_over_environment() {
        let conn = resolve_conn(Some("postgres://db/app".to_string())).expect("conn");
        assert_eq!(conn, "postgres://db/app");
    }
}
