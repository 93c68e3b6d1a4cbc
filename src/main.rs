use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::FmtSubscriber;

use crate::controller::Controller;
use crate::session::SessionState;

mod controller;
mod debounce;
mod envs;
mod languages;
mod session;
mod terminal;
mod translate;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // logs go to a file, stdout belongs to the screen
    let log_guard = init_logging()?;

    // create translator
    let translator = translate::MyMemoryTranslate::new(&envs::MYMEMORY_URL, envs::MYMEMORY_EMAIL.as_deref())
        .context("Failed to create MyMemory client")?;
    let initial = SessionState::new(&envs::SOURCE_LANG, &envs::TARGET_LANG);
    let (controller, handle) = Controller::new(Arc::new(translator), initial);
    let controller_task = tokio::spawn(controller.run());

    info!(
        "Translating {} -> {} via {}",
        *envs::SOURCE_LANG,
        *envs::TARGET_LANG,
        *envs::MYMEMORY_URL
    );

    // Run the screen until the user quits or interrupts
    let interrupted = tokio::select! {
        result = terminal::run(handle) => {
            result?;
            info!("Input closed");
            false
        }
        _ = tokio::signal::ctrl_c() => {
            info!("User pressed ctrl-c");
            true
        }
    };

    // Dropping the handle above stops the controller
    controller_task.await?;
    info!("Quick Translate stopped");

    if interrupted {
        // stdin is read on a blocking thread that would keep the runtime alive
        drop(log_guard);
        std::process::exit(0);
    }
    Ok(())
}

fn init_logging() -> anyhow::Result<WorkerGuard> {
    let appender = tracing_appender::rolling::never(envs::LOG_DIR.as_str(), "quick-translate.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let subscriber = FmtSubscriber::builder()
        .with_max_level(*envs::LOG_LEVEL)
        .with_writer(writer)
        .with_ansi(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("setting default subscriber failed")?;
    Ok(guard)
}
