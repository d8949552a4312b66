use std::sync::Arc;
use tokio::time::{sleep, Duration};
use tracing::info;

use crate::config::Config;
use crate::error::Result;
use crate::mappings::KeycodeMap;
use crate::services::chord::{ChordCommand, ChordTracker};
use crate::services::event_source::EventSourceTrait;
use crate::services::window_placer::WindowPlacerTrait;
use crate::{debug_if_enabled, trace_if_enabled};

/// Главный цикл: сон, опрос источника событий, прогон пачки через
/// ChordTracker, исполнение выданных команд. Строго последовательный -
/// единственный владелец состояния аккорда, никаких блокировок.
///
/// Любая ошибка опроса или размещения фатальна и завершает цикл;
/// повторных попыток нет.
pub struct HotkeyMonitor {
    config: Arc<Config>,
    event_source: Box<dyn EventSourceTrait + Send>,
    placer: Box<dyn WindowPlacerTrait + Send>,
    tracker: ChordTracker,
}

impl HotkeyMonitor {
    pub fn new(
        config: Arc<Config>,
        event_source: Box<dyn EventSourceTrait + Send>,
        placer: Box<dyn WindowPlacerTrait + Send>,
    ) -> Self {
        let tracker = ChordTracker::new(config.control_key_codes());
        Self {
            config,
            event_source,
            placer,
            tracker,
        }
    }

    pub async fn run(mut self) -> Result<()> {
        info!(
            "HotkeyMonitor запущен, интервал опроса {} мс",
            self.config.input.poll_interval_ms
        );

        let poll_interval = Duration::from_millis(self.config.input.poll_interval_ms);
        let max_events = self.config.input.event_buffer_size;

        loop {
            sleep(poll_interval).await;

            let batch = self.event_source.poll(max_events).await?;
            if !batch.is_empty() {
                debug_if_enabled!("Получено событий за опрос: {}", batch.len());
            }

            for event in &batch {
                trace_if_enabled!(
                    "Событие клавиши {}: {:?}",
                    KeycodeMap::describe(event.key_code.value()),
                    event.state
                );

                match self.tracker.apply(event) {
                    Some(ChordCommand::Place(quadrant)) => {
                        let applied = self.placer.place(quadrant).await?;
                        info!("Окно размещено в {} четверть: {}", quadrant, applied);
                    }
                    Some(ChordCommand::Terminate) => {
                        // Остаток пачки не обрабатывается
                        info!("Получен аккорд выхода, завершаем цикл");
                        return Ok(());
                    }
                    None => {}
                }
            }
        }
    }
}
