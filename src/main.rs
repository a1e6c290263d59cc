use std::time::Duration;

use anyhow::{anyhow, Result};
use clap::Parser;
use tracing::info;

use davaria::api::PanelClient;
use davaria::cli::{Args, Command};
use davaria::feedback::{ConsoleFeedback, Feedback, ToastLevel};
use davaria::logging::init_logger;
use davaria::video::VideoFilterConfig;
use davaria::{render, shell, Panel, SubmitOutcome};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(&args.log_level);

    let client = PanelClient::new(
        &args.server,
        args.proxy.as_deref(),
        args.timeout.map(Duration::from_secs),
    )?;
    info!(server = %client.base(), "using panel backend");

    let feedback = ConsoleFeedback::new(args.yes);
    let mut filter = VideoFilterConfig {
        enabled: args.video_filter,
        ..VideoFilterConfig::default()
    };
    if let Some(warning) = filter.set_min_size_mb(args.min_size_mb).warning() {
        feedback.toast(ToastLevel::Warning, &warning);
    }

    let mut panel = Panel::new(client, filter, Box::new(feedback));

    match args.command.unwrap_or(Command::Shell) {
        Command::Shell => {
            shell::run_shell(&mut panel).await?;
        }
        Command::Status => {
            panel.check_status().await;
            println!("{}", render::status_bar(panel.state()));
        }
        Command::Connect(connect) => {
            if !panel.connect(connect.into()).await {
                return Err(anyhow!("Connection failed"));
            }
        }
        Command::Ls { path } => {
            panel.check_status().await;
            if !panel.state().connection.file_store {
                return Err(anyhow!("WebDAV is not connected"));
            }
            if !panel.load_directory(&path).await {
                return Err(anyhow!("Failed to list {}", path));
            }
            print!("{}", render::file_table(panel.state()));
        }
        Command::Get { paths } => {
            panel.check_status().await;
            let mut entries = Vec::with_capacity(paths.len());
            for result in panel.lookup_entries(&paths).await {
                match result {
                    Ok(entry) => entries.push(entry),
                    Err(e) => eprintln!("Skipping: {:#}", e),
                }
            }
            match panel.download_entries(entries).await {
                SubmitOutcome::Submitted { failed: 0, .. } => {}
                SubmitOutcome::Submitted { succeeded, failed } => {
                    println!("\nDone: {} success, {} failed", succeeded, failed);
                }
                outcome => return Err(anyhow!("Nothing queued ({:?})", outcome)),
            }
        }
        Command::Jobs { watch } => {
            panel.check_status().await;
            if !panel.state().connection.download_daemon {
                return Err(anyhow!("aria2 is not connected"));
            }
            print!("{}", render::job_table(panel.state()));
            if let Some(secs) = watch {
                let period = Duration::from_secs(secs.max(1));
                panel
                    .watch_jobs(period, tokio::signal::ctrl_c(), |state| {
                        println!();
                        print!("{}", render::job_table(state));
                    })
                    .await;
            }
        }
        Command::Pause { gid } => {
            panel.check_status().await;
            panel.pause_job(&gid).await;
        }
        Command::Resume { gid } => {
            panel.check_status().await;
            panel.resume_job(&gid).await;
        }
        Command::Remove { gid } => {
            panel.check_status().await;
            panel.remove_job(&gid).await;
        }
        Command::Version => match panel.daemon_version().await {
            Some(version) => println!("aria2 {}", version),
            None => return Err(anyhow!("aria2 version unavailable")),
        },
    }

    Ok(())
}
