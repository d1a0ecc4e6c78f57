use std::sync::Arc;

use log::{info, warn};
use tokio::sync::mpsc;

use level_effects::config::Config;
use level_effects::console::{self, Command, Console};
use level_effects::effects::LogSink;
use level_effects::server::{Server, ServerHandle};
use level_effects::skills::SkillCatalog;

fn setup_logger(log_level: log::LevelFilter) -> Result<(), fern::InitError> {
    if log_level == log::LevelFilter::Error || log_level == log::LevelFilter::Off {
        println!("\x1B[{}mWARNING: Important messages will be hidden. Please consider setting log_level to \"info\" or \"warn\" in the config file.\x1B[0m",
            fern::colors::Color::Yellow.to_fg_str(),
        );
    }

    if log_level == log::LevelFilter::Off {
        return Ok(());
    }

    // Colors for the different log levels
    let colors = fern::colors::ColoredLevelConfig::new()
        .error(fern::colors::Color::Red)
        .warn(fern::colors::Color::Yellow)
        .info(fern::colors::Color::White)
        .debug(fern::colors::Color::Blue)
        .trace(fern::colors::Color::Magenta);

    // Shared logger configuration
    let fmt_str = |message: &std::fmt::Arguments, record: &log::Record| -> String {
        format!(
            "[{}][{}] {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            record.level(),
            message
        )
    };

    // Log to file (without colors)
    let default = fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!("{}", fmt_str(message, record)))
        })
        .chain(fern::log_file(format!(
            "logs/{}.log",
            chrono::Local::now().format("%Y-%m-%d_%H-%M-%S")
        ))?);

    // Log to stdout (with colors)
    let color = fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "{}{}\x1B[0m",
                format_args!("\x1B[{}m", colors.get_color(&record.level()).to_fg_str()),
                fmt_str(message, record)
            ))
        })
        .chain(std::io::stdout());

    // Dispatch to both loggers
    fern::Dispatch::new()
        .chain(default)
        .chain(color)
        .level(log_level)
        .apply()?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), fern::InitError> {
    // Create 'logs' directory if it doesn't exist
    std::fs::create_dir_all("logs")?;

    // Written with defaults on first run
    let (config, problems) = Config::load("config.toml");

    setup_logger(config.general.log_level.into())?;

    for problem in problems {
        warn!("Error loading config! {}", problem);
    }

    let skills = Arc::new(SkillCatalog::default());
    let mut server = ServerHandle::start(Server::new(config.effects, skills.clone(), LogSink));

    info!(
        "{} version {} enabled!",
        level_effects::NAME,
        level_effects::VERSION
    );

    let (ctx, mut crx) = mpsc::channel(1);
    if let Err(e) = ctrlc::set_handler(move || {
        let _ = ctx.try_send(());
    }) {
        warn!("Could not install Ctrl-C handler: {}", e);
    }

    let mut console = Console::new(skills);
    let mut input = console::spawn_reader();
    info!("Type `help` for a list of commands");

    loop {
        tokio::select! {
            Some(()) = crx.recv() => {
                break;
            }
            line = input.recv() => {
                let Some(line) = line else {
                    break;
                };
                match console::parse(&line) {
                    Ok(Command::Stop) => break,
                    Ok(Command::Help) => info!("{}", console::USAGE),
                    Ok(command) => {
                        for event in console.execute(command) {
                            server.send(event).await;
                        }
                    }
                    Err(e) => warn!("{}", e),
                }
            }
        }
    }

    // Cleanup
    info!("Stopping...");
    server.stop().await;

    Ok(())
}
