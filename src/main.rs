//! gitstory
//!
//! Scroll through a repository's history one commit at a time.

use anyhow::Context;
use clap::Parser;
use eframe::egui;
use std::fs::File;
use std::io::BufWriter;
use std::sync::{Arc, Mutex};
use tokio::runtime::Runtime;

use gitstory::analysis::{
    aggregate_commits, generate_line_table_async, load_line_records_async, load_projects_async,
    write_line_records,
};
use gitstory::app::{App, AppWrapper, PreferenceStore};
use gitstory::cli::{Cli, Commands, ExportArgs, GenerateArgs, ViewArgs};
use gitstory::plotting::{export_snapshot, ChartTheme};
use gitstory::types::ColorScheme;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let rt = Runtime::new().context("failed to start the async runtime")?;

    match cli.command {
        Some(Commands::View(args)) => view(&rt, args),
        None => view(&rt, ViewArgs::default()),
        Some(Commands::Generate(args)) => rt.block_on(generate(args)),
        Some(Commands::Export(args)) => rt.block_on(export(args)),
    }
}

fn view(rt: &Runtime, args: ViewArgs) -> anyhow::Result<()> {
    let settings = args.settings();

    let (records, projects) = rt.block_on(async {
        let projects = async {
            match &settings.projects_path {
                Some(path) => Some(load_projects_async(path).await),
                None => None,
            }
        };
        tokio::join!(load_line_records_async(&settings.loc_path), projects)
    });

    // A source that fails to load disables its panel.
    let history = match records {
        Ok(records) => Some(aggregate_commits(records, &settings.repo_url)),
        Err(e) => {
            log::error!("Failed to load {}: {}", settings.loc_path.display(), e);
            None
        }
    };
    let projects = match projects {
        Some(Ok(projects)) => Some(projects),
        Some(Err(e)) => {
            log::error!("Failed to load projects: {}", e);
            None
        }
        None => None,
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("gitstory"),
        ..Default::default()
    };

    eframe::run_native(
        "gitstory",
        options,
        Box::new(move |cc| {
            let mut app = App::new(settings, history, projects, PreferenceStore::default_location());
            app.system_dark = cc.egui_ctx.style().visuals.dark_mode;
            app.start(cc.egui_ctx.input(|i| i.time) * 1000.0);

            let app: Arc<Mutex<App>> = Arc::new(Mutex::new(app));
            Ok(Box::new(AppWrapper { app }) as Box<dyn eframe::App>)
        }),
    )
    .map_err(|e| anyhow::anyhow!("error running application: {}", e))
}

async fn generate(args: GenerateArgs) -> anyhow::Result<()> {
    let records = generate_line_table_async(&args.repo)
        .await
        .with_context(|| format!("failed to read {}", args.repo.display()))?;

    let file = File::create(&args.out).with_context(|| format!("failed to create {}", args.out.display()))?;
    write_line_records(&records, BufWriter::new(file))?;
    log::info!("Wrote {} lines to {}", records.len(), args.out.display());
    Ok(())
}

async fn export(args: ExportArgs) -> anyhow::Result<()> {
    let settings = args.settings();
    let records = load_line_records_async(&settings.loc_path)
        .await
        .with_context(|| format!("failed to load {}", settings.loc_path.display()))?;
    let history = aggregate_commits(records, &settings.repo_url);

    let scheme = if args.light { ColorScheme::Light } else { ColorScheme::Dark };
    let theme = ChartTheme::for_scheme(scheme, false);
    let snapshot = export_snapshot(&history, args.step, &settings, &theme, &args.out_dir)?;
    println!("{}", snapshot.scatter.display());
    println!("{}", snapshot.pie.display());
    Ok(())
}
