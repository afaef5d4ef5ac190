use anyhow::Result;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use tokio::signal;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
mod config;
mod error;
mod events;
mod mappings;
mod services;
mod utils;

use config::Config;
use services::{
    create_keyboard_listener,
    create_navigator,
    create_window_detector,
    SequenceWatcher,
    WatcherSettings,
};

/// Ёмкость канала событий между источниками и SequenceWatcher
const EVENT_CHANNEL_CAPACITY: usize = 256;

#[derive(Parser, Debug)]
#[command(name = "keyseq-watch")]
#[command(about = "Отслеживает секретную последовательность клавиш и открывает случайный адрес")]
struct Args {
    /// Путь к файлу конфигурации
    #[arg(short, long, default_value = "keyseq.toml")]
    config: String,

    /// Режим сухого запуска: клавиши из stdin, переход только в лог
    #[arg(long)]
    dry_run: bool,

    /// Уровень логирования (по умолчанию из конфигурации)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = Arc::new(Config::load(&args.config)?);

    let level = args.log_level.as_deref().unwrap_or(&config.logging.level);
    init_tracing(level, &config.logging.format)?;

    info!("Запуск keyseq-watch v{}", env!("CARGO_PKG_VERSION"));
    info!("Конфигурация загружена из: {}", args.config);

    if args.dry_run {
        warn!("Режим сухого запуска - реальные действия отключены");
    } else {
        utils::permissions::check_permissions()?;
    }

    let (events_tx, events_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

    let watcher = SequenceWatcher::new(
        WatcherSettings::from_config(&config),
        create_navigator(args.dry_run),
        StdRng::from_entropy(),
    );
    let watcher_handle = watcher.start(events_rx);

    let keyboard_listener = create_keyboard_listener(config.clone(), events_tx.clone(), args.dry_run)?;
    let keyboard_handle = tokio::spawn(async move {
        if let Err(e) = keyboard_listener.run().await {
            error!("Ошибка в KeyboardListener: {}", e);
        }
    });

    let window_handle = if config.focus_tracking_enabled() {
        let window_detector = create_window_detector(config.clone(), events_tx.clone(), args.dry_run)?;
        Some(tokio::spawn(async move {
            if let Err(e) = window_detector.run().await {
                error!("Ошибка в WindowDetector: {}", e);
            }
        }))
    } else {
        info!("Отслеживание фокуса отключено");
        None
    };

    // Канал закрывается вместе с последним источником
    drop(events_tx);

    info!("Все сервисы запущены");

    match signal::ctrl_c().await {
        Ok(()) => info!("Получен сигнал завершения (Ctrl+C)"),
        Err(err) => error!("Ошибка при ожидании сигнала завершения: {}", err),
    }

    info!("Завершение работы...");

    match watcher_handle.stop().await {
        Ok(watcher) => {
            let stats = watcher.stats();
            info!(
                "Совпадений: {}, переходов: {}, сбросов по паузе: {}, потерь фокуса: {}",
                stats.matches, stats.navigations, stats.timeouts, stats.blurs
            );
        }
        Err(e) => error!("{}", e),
    }

    keyboard_handle.abort();
    if let Some(handle) = &window_handle {
        handle.abort();
    }

    let shutdown_timeout = tokio::time::Duration::from_secs(5);
    let shutdown_result = tokio::time::timeout(shutdown_timeout, async {
        let _ = keyboard_handle.await;
        if let Some(handle) = window_handle {
            let _ = handle.await;
        }
    })
    .await;

    match shutdown_result {
        Ok(_) => info!("Все сервисы завершили работу корректно"),
        Err(_) => warn!("Таймаут при завершении сервисов"),
    }

    info!("keyseq-watch завершил работу");
    Ok(())
}

fn init_tracing(level: &str, format: &str) -> Result<()> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))?;

    let compact = (format == "compact").then(|| fmt::layer().compact());
    let full = (format != "compact").then(|| fmt::layer());

    tracing_subscriber::registry()
        .with(filter)
        .with(compact)
        .with(full)
        .init();

    Ok(())
}
