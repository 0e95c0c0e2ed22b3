mod app;
mod cli;
mod input;

use std::path::PathBuf;

use fmcore::Browser;
use fmcore::config::{Config, Openers, SavedSettings};
use thiserror::Error;
use tracing::{debug, error, warn};

use app::{App, Console};

#[derive(Debug, Error)]
pub enum Error {
    #[error("Initialization error")]
    Initialization,
    #[error("Trash error: {0}")]
    Trash(#[from] fmcore::FsError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn main() -> Result<(), Error> {
    let args = cli::parse_args();

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to create tokio runtime");

    let (config, config_error) = match rt.block_on(Config::load()) {
        Ok(config) => (config, None),
        Err(e) => (Config::empty(), Some(e.to_string())),
    };
    let mut settings = rt.block_on(config.settings());
    args.apply_to(&mut settings);

    let logfile = tracing_appender::rolling::daily(get_logging_path()?, "log");
    tracing_subscriber::fmt()
        .compact()
        .with_max_level(settings.log_level)
        .with_writer(logfile)
        .init();

    debug!("starting application");
    if let Some(e) = config_error {
        warn!("failed to load config, using defaults: {}", e);
    }

    let trash = settings.trash_store()?;
    let start_path = args.path.clone().or_else(|| settings.start_dir());
    let browser = Browser::new(start_path, trash, settings.show_hidden);

    let mut app = App::new(
        browser,
        Box::new(Openers::load()),
        Console::stdio(),
        SavedSettings::config_path(),
    );

    match app.run() {
        Ok(()) => {
            debug!("closing application");
            Ok(())
        }
        Err(err) => {
            error!("closing application with error: {:?}", err);
            Err(err.into())
        }
    }
}

fn get_logging_path() -> Result<PathBuf, Error> {
    dirs::cache_dir()
        .map(|cache_dir| cache_dir.join("fmcore").join("logs"))
        .ok_or(Error::Initialization)
}
