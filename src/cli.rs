use crate::{
    config::Config,
    document::Document,
    engine::{NativeEngine, OfficeHost},
    extract::Extractor,
    nlu::{AnalysisResult, Credentials, FEATURES, NluClient, SERVICE_VERSION},
    prepare::prepare_for_analysis,
    report::{AnalysisReport, InputReport, RunReport, TextReport},
    util::{ensure_dir, hash_file, now_rfc3339},
};
use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "resume-nlu")]
#[command(about = "Extract resume text (PDF/DOC/DOCX) and analyze it with an NLU service")]
pub struct Args {
    #[command(subcommand)]
    pub cmd: Command,

    /// Path to config TOML. If omitted, uses ./resume-nlu.toml if present.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override log level (trace/debug/info/warn/error).
    #[arg(long)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the effective service settings and probe the office host.
    Doctor {},
    /// Print (or write) the plain text of a document.
    Extract {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Extract a document and submit its text for analysis.
    Analyze {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
    /// Ingest a saved response body and print the structured result.
    Parse {
        #[arg(long)]
        response: PathBuf,
    },
}

pub fn dispatch(args: Args) -> Result<()> {
    let cfg = match resolve_config_path(args.config.as_deref()) {
        Some(path) => Config::load(&path)?,
        None => Config::default(),
    };

    match &args.cmd {
        Command::Doctor {} => {
            let _guard = init_logging(&args, &cfg, resolve_log_path(&cfg, None).as_deref())?;
            doctor(&cfg)
        }
        Command::Extract { input, out } => {
            let _guard = init_logging(&args, &cfg, resolve_log_path(&cfg, None).as_deref())?;
            extract(&cfg, input, out.as_deref())
        }
        Command::Analyze { input, out_dir } => analyze(&args, &cfg, input, out_dir.as_deref()),
        Command::Parse { response } => {
            let _guard = init_logging(&args, &cfg, resolve_log_path(&cfg, None).as_deref())?;
            parse(response)
        }
    }
}

fn resolve_config_path(user: Option<&Path>) -> Option<PathBuf> {
    if let Some(p) = user {
        return Some(p.to_path_buf());
    }
    let default = PathBuf::from("resume-nlu.toml");
    default.exists().then_some(default)
}

fn init_logging(args: &Args, cfg: &Config, file_path: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = args
        .log_level
        .as_deref()
        .unwrap_or(cfg.logging.level.as_str());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // stdout carries command output; logs go to stderr.
    let stderr_layer = if cfg.logging.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed()
    };

    let (file_layer, guard) = if let Some(path) = file_path {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        ensure_dir(parent)?;
        let file = std::fs::File::create(path)
            .with_context(|| format!("create log file: {}", path.display()))?;
        let (non_blocking, guard) = tracing_appender::non_blocking(file);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .boxed();
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))?;

    Ok(guard)
}

fn resolve_log_path(cfg: &Config, job_dir: Option<&Path>) -> Option<PathBuf> {
    if !cfg.logging.write_to_file {
        return None;
    }

    if !cfg.logging.file_path.is_empty() {
        return Some(PathBuf::from(&cfg.logging.file_path));
    }

    if let Some(job_dir) = job_dir {
        return Some(job_dir.join("logs").join("resume-nlu.log"));
    }

    Some(PathBuf::from(&cfg.output.out_dir).join("resume-nlu.log"))
}

fn doctor(cfg: &Config) -> Result<()> {
    let host = OfficeHost::new(&cfg.legacy);
    let (host_ok, host_version) = match host.version() {
        Ok(v) => (true, v),
        Err(e) => {
            warn!("office host unavailable: {e:#}");
            (false, format!("{e:#}"))
        }
    };
    let credentials = Credentials::from_config(&cfg.service);

    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({
            "service": {
                "endpoint": cfg.service.endpoint,
                "version": SERVICE_VERSION,
                "features": FEATURES,
                "username": credentials.as_ref().ok().map(|c| c.username()),
                "credentials_ok": credentials.is_ok(),
            },
            "legacy_host": {
                "program": host.program(),
                "args": cfg.legacy.args,
                "ok": host_ok,
                "version": host_version,
            },
        }))?
    );
    Ok(())
}

fn extract(cfg: &Config, input: &Path, out: Option<&Path>) -> Result<()> {
    let doc = Document::new(input)?;
    let extractor = Extractor::new(NativeEngine::new(OfficeHost::new(&cfg.legacy)));
    let text = extractor.extract_document(&doc)?;

    match out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                ensure_dir(parent)?;
            }
            std::fs::write(path, &text).with_context(|| format!("write {}", path.display()))?;
            info!("wrote {}", path.display());
        }
        None => println!("{text}"),
    }
    Ok(())
}

fn analyze(args: &Args, cfg: &Config, input: &Path, out_override: Option<&Path>) -> Result<()> {
    let doc = Document::new(input)?;
    if !input.is_file() {
        return Err(anyhow!("input does not exist: {}", input.display()));
    }
    let credentials = Credentials::from_config(&cfg.service)?;
    let client = NluClient::new(&cfg.service, credentials)?;

    let file_bytes = std::fs::metadata(input)
        .with_context(|| format!("stat {}", input.display()))?
        .len();
    let sha256 = hash_file(input).with_context(|| format!("hashing input: {}", input.display()))?;

    let out_root = out_override
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(&cfg.output.out_dir));
    let job_dir = out_root.join(&sha256);
    ensure_dir(&job_dir)?;

    let log_path = resolve_log_path(cfg, Some(&job_dir));
    let _guard = init_logging(args, cfg, log_path.as_deref())?;
    info!("analyze {} ({}) out={}", input.display(), doc.format(), job_dir.display());

    let started = now_rfc3339();
    let extractor = Extractor::new(NativeEngine::new(OfficeHost::new(&cfg.legacy)));
    let text = extractor.extract_document(&doc)?;
    let submitted = prepare_for_analysis(&cfg.text, &text);
    if submitted.trim().is_empty() {
        warn!("no text to submit from {}", input.display());
    }

    if cfg.output.write_text {
        std::fs::write(job_dir.join(&cfg.output.text_filename), &text)?;
    }

    let mut result = AnalysisResult::new();
    let call = client.analyze_into(&submitted, &mut result);

    // Whatever came back is kept, even when the call itself failed.
    if cfg.output.write_raw_log && !result.raw_response_log().is_empty() {
        std::fs::write(
            job_dir.join(&cfg.output.raw_log_filename),
            result.raw_response_log(),
        )?;
    }
    let parsed = call?;

    if cfg.output.write_analysis_json {
        std::fs::write(
            job_dir.join(&cfg.output.analysis_filename),
            serde_json::to_string_pretty(&result)?,
        )?;
    }

    let report = RunReport {
        input: InputReport {
            path: input.display().to_string(),
            format: doc.format(),
            file_bytes,
            sha256: sha256.clone(),
        },
        text: TextReport {
            extracted_chars: text.chars().count(),
            submitted_chars: submitted.chars().count(),
        },
        analysis: AnalysisReport {
            endpoint: client.endpoint().to_string(),
            version: SERVICE_VERSION,
            parsed,
            language: result.language.clone(),
            keywords: result.keywords.as_ref().map(Vec::len),
            entities: result.entities.as_ref().map(Vec::len),
            concepts: result.concepts.as_ref().map(Vec::len),
            categories: result.categories.as_ref().map(Vec::len),
            diagnostics: result.diagnostics().to_vec(),
            out_of_range: result.out_of_range(),
        },
        started,
        finished: now_rfc3339(),
    };

    if cfg.output.write_report_json {
        std::fs::write(
            job_dir.join(&cfg.output.report_filename),
            serde_json::to_string_pretty(&report)?,
        )?;
    }

    if cfg.output.print_summary {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "sha256": sha256,
                "job_dir": job_dir,
                "language": result.language,
                "parsed": parsed,
                "status": "ok"
            }))?
        );
    }

    Ok(())
}

fn parse(response: &Path) -> Result<()> {
    let body = std::fs::read_to_string(response)
        .with_context(|| format!("reading response body: {}", response.display()))?;
    let mut result = AnalysisResult::new();
    let parsed = result.ingest(&body);
    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({
            "parsed": parsed,
            "result": result,
            "out_of_range": result.out_of_range(),
        }))?
    );
    Ok(())
}
