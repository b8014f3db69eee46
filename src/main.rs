#![allow(clippy::missing_errors_doc, clippy::needless_pass_by_value)]

use clap::Parser;

use canvas_sync::api::HttpCanvasApi;
use canvas_sync::cli::commands::{Cli, Command};
use canvas_sync::cli::{output, prompt};
use canvas_sync::config::Config;
use canvas_sync::db::Database;
use canvas_sync::download::HttpDownloader;
use canvas_sync::error::SyncError;
use canvas_sync::history::{reset_history, HistoryView};
use canvas_sync::logging::init_logging;
use canvas_sync::models::CourseId;
use canvas_sync::store::{load_records, save_records};
use canvas_sync::sync::{run_sync, SyncContext, SyncOptions};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{}", output::format_error(&e));
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), SyncError> {
    let config = get_config(&cli)?;
    match cli.command {
        Command::Sync { course } => cmd_sync(&config, &course),
        Command::History { course, filter } => cmd_history(&config, &course, filter.as_deref()),
        Command::Forget {
            course,
            ids,
            filter,
            all,
            yes,
        } => cmd_forget(&config, &course, &ids, filter.as_deref(), all, yes),
        Command::Reset { course, yes } => cmd_reset(&config, &course, yes),
        Command::Config { init } => cmd_config(&config, init),
    }
}

type CmdResult = Result<(), SyncError>;

/// Config from `--root` (or cwd), with flag and env overrides applied.
fn get_config(cli: &Cli) -> Result<Config, SyncError> {
    let mut config = match &cli.root {
        Some(root) => Config::new(root),
        None => Config::from_cwd()?,
    };
    if let Some(base_url) = &cli.base_url {
        config.settings.api.base_url.clone_from(base_url);
    }
    // clap already folded CANVAS_TOKEN into --token; it outranks the file.
    if let Some(token) = cli.token.as_ref().filter(|t| !t.is_empty()) {
        config.settings.api.token = Some(token.clone());
    }
    Ok(config)
}

fn get_db(config: &Config) -> Result<Database, SyncError> {
    config.ensure_state_dir()?;
    Database::open(&config.db_path)
}

fn confirm_or_prompt(yes: bool, question: &str) -> bool {
    yes || prompt::confirm(question)
}

fn cmd_sync(config: &Config, course: &str) -> CmdResult {
    let course: CourseId = course.parse()?;
    let mut db = get_db(config)?;
    let api = HttpCanvasApi::new(&config.settings.api)?;
    let downloader = HttpDownloader::new(&config.settings.api, &config.download_root)?;

    let report = run_sync(SyncContext {
        course,
        api: &api,
        downloader: &downloader,
        store: &mut db,
        options: SyncOptions {
            course_folder: config.course_folder(course.0),
            record_failed_downloads: config.settings.sync.record_failed_downloads,
        },
    })?;

    for failed in &report.failed {
        eprintln!("Failed to download {}: {}", failed.name, failed.error);
    }
    println!("{}", output::format_json(&report));
    Ok(())
}

fn cmd_history(config: &Config, course: &str, filter: Option<&str>) -> CmdResult {
    let course: CourseId = course.parse()?;
    let db = get_db(config)?;
    let store = load_records(&db, course)?;

    let mut view = HistoryView::with_filter(filter.unwrap_or_default());
    let page = view.render(&store);
    println!("{}", output::format_json(&page));
    Ok(())
}

fn cmd_forget(
    config: &Config,
    course: &str,
    ids: &[u64],
    filter: Option<&str>,
    all: bool,
    yes: bool,
) -> CmdResult {
    let course: CourseId = course.parse()?;
    if ids.is_empty() && !all {
        return Err(SyncError::Other(
            "nothing selected: pass file IDs or --all".into(),
        ));
    }
    let mut db = get_db(config)?;
    let mut store = load_records(&db, course)?;

    let mut view = HistoryView::with_filter(filter.unwrap_or_default());
    if all {
        view.toggle_all(&store);
    }
    for &id in ids {
        view.select(id);
    }

    let removed = view.delete_selected(&mut store, |n| {
        confirm_or_prompt(
            yes,
            &format!("Remove {n} record(s) from the download history of course {course}?"),
        )
    })?;
    if removed > 0 {
        save_records(&mut db, course, &store)?;
    }

    #[derive(serde::Serialize)]
    struct ForgetOutput {
        removed: usize,
        history: canvas_sync::history::HistoryPage,
    }
    let history = view.render(&store);
    println!("{}", output::format_json(&ForgetOutput { removed, history }));
    Ok(())
}

fn cmd_reset(config: &Config, course: &str, yes: bool) -> CmdResult {
    let course: CourseId = course.parse()?;
    let mut db = get_db(config)?;

    let removed = reset_history(&mut db, course, |n| {
        confirm_or_prompt(
            yes,
            &format!("Clear the download history of course {course} ({n} record(s))?"),
        )
    })?;
    println!(
        "{}",
        output::format_json(&serde_json::json!({ "course": course, "cleared": removed }))
    );
    Ok(())
}

fn cmd_config(config: &Config, init: bool) -> CmdResult {
    if init && !config.config_path.exists() {
        // Fresh load so flag and env overrides are not written to disk.
        Config::new(&config.download_root).save_settings()?;
    }

    #[derive(serde::Serialize)]
    struct ConfigOutput {
        download_root: String,
        db_path: String,
        config_path: String,
        settings: canvas_sync::config::UserSettings,
    }
    println!(
        "{}",
        output::format_json(&ConfigOutput {
            download_root: config.download_root.display().to_string(),
            db_path: config.db_path.display().to_string(),
            config_path: config.config_path.display().to_string(),
            settings: config.redacted_settings(),
        })
    );
    Ok(())
}
