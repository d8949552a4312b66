use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
mod config;
mod error;
mod events;
pub mod mappings;
mod services;
mod utils;

use config::Config;
use services::{create_event_source, create_window_placer, HotkeyMonitor};

#[derive(Parser, Debug)]
#[command(name = "qsnap-rust")]
#[command(about = "Раскладка активного окна по четвертям монитора горячими клавишами")]
struct Args {
    /// Путь к файлу конфигурации
    #[arg(short, long, default_value = "qsnap.toml")]
    config: String,

    /// Режим сухого запуска (без реальных действий)
    #[arg(long)]
    dry_run: bool,

    /// Уровень логирования
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Инициализация системы логирования
    init_tracing(&args.log_level)?;

    info!("Запуск Qsnap Rust v{}", env!("CARGO_PKG_VERSION"));

    // Загрузка конфигурации (отсутствующий файл - не ошибка, работают значения по умолчанию)
    let config = Arc::new(Config::load(&args.config)?);
    info!("Конфигурация загружена из: {}", args.config);
    info!(
        "Управляющие клавиши: {:?} - комбинация не должна пересекаться с горячими клавишами рабочего стола",
        config.hotkeys.control_keys
    );

    if args.dry_run {
        warn!("Режим сухого запуска - реальные действия отключены");
    } else {
        // Проверка прав доступа
        utils::permissions::check_permissions()?;
    }

    // Инициализация компонентов; рабочий метод размещения выбирается
    // один раз, до запуска цикла
    let event_source = create_event_source(config.clone(), args.dry_run)?;
    let mut window_placer = create_window_placer(config.clone(), args.dry_run)?;
    window_placer.probe().await?;

    info!("Все компоненты инициализированы");

    let monitor = HotkeyMonitor::new(config, event_source, window_placer);
    let mut monitor_handle = tokio::spawn(monitor.run());

    tokio::select! {
        result = &mut monitor_handle => {
            match result {
                Ok(Ok(())) => info!("Цикл завершён по аккорду выхода"),
                Ok(Err(e)) => {
                    error!("Ошибка в HotkeyMonitor: {}", e);
                    return Err(e.into());
                }
                Err(e) => {
                    error!("Задача HotkeyMonitor прервана: {}", e);
                    return Err(e.into());
                }
            }
        }
        _ = signal::ctrl_c() => {
            info!("Получен сигнал завершения (Ctrl+C)");

            // Прерываем задачу, чтобы гарантированно освободить устройство в Drop
            monitor_handle.abort();

            let shutdown_timeout = tokio::time::Duration::from_secs(5);
            match tokio::time::timeout(shutdown_timeout, monitor_handle).await {
                Ok(_) => info!("Сервисы завершили работу корректно"),
                Err(_) => warn!("Таймаут при завершении сервисов"),
            }
        }
    }

    info!("Qsnap Rust завершил работу");
    Ok(())
}

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().compact())
        .init();

    Ok(())
}
