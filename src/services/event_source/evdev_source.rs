use evdev::{Device, EventType};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace, warn};

use crate::config::Config;
use crate::error::{QsnapError, Result};
use crate::events::{KeyCode, KeyState, RawKeyEvent};
use crate::utils::DeviceFinder;

use super::r#trait::EventSourceTrait;

/// Кольцевой буфер между задачей чтения и опросом.
/// При переполнении старейшие события вытесняются.
struct EventBuffer {
    events: VecDeque<RawKeyEvent>,
    capacity: usize,
    dropped: u64,
    failure: Option<QsnapError>,
}

impl EventBuffer {
    fn new(capacity: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(capacity),
            capacity,
            dropped: 0,
            failure: None,
        }
    }

    fn push(&mut self, event: RawKeyEvent) {
        if self.events.len() == self.capacity {
            self.events.pop_front();
            self.dropped += 1;
        }
        self.events.push_back(event);
    }

    fn drain(&mut self, max_events: usize) -> Vec<RawKeyEvent> {
        let take = max_events.min(self.events.len());
        self.events.drain(..take).collect()
    }
}

/// Источник событий поверх evdev устройства.
///
/// Устройство НЕ захватывается эксклюзивно: события нужны только для
/// наблюдения, рабочий стол продолжает получать их как обычно. Фоновая
/// задача читает поток событий и складывает их в буфер, откуда их
/// забирает периодический опрос.
pub struct EvdevEventSource {
    buffer: Arc<Mutex<EventBuffer>>,
    reader: JoinHandle<()>,
}

impl EvdevEventSource {
    pub fn new(config: Arc<Config>) -> Result<Self> {
        info!("Инициализация EvdevEventSource");

        let device_path = DeviceFinder::find_keyboard_device(&config.input.device_path)?;

        let device = Device::open(&device_path).map_err(|e| {
            QsnapError::DeviceNotFound(format!(
                "Не удалось открыть устройство {:?}: {}",
                device_path, e
            ))
        })?;

        info!("Устройство: {}", device.name().unwrap_or("Unknown"));
        info!("Физический путь: {:?}", device.physical_path());

        let stream = device.into_event_stream().map_err(|e| {
            QsnapError::Internal(format!("Не удалось создать поток событий: {}", e))
        })?;

        let buffer = Arc::new(Mutex::new(EventBuffer::new(config.input.event_buffer_size)));
        let reader_buffer = Arc::clone(&buffer);
        let reader_path = device_path.clone();

        let reader = tokio::spawn(async move {
            let mut stream = stream;
            loop {
                match stream.next_event().await {
                    Ok(event) => {
                        if event.event_type() != EventType::KEY {
                            continue;
                        }

                        let state = match event.value() {
                            0 => KeyState::Released,
                            1 => KeyState::Pressed,
                            // Автоповтор не участвует в аккорде
                            2 => continue,
                            other => {
                                debug!("Неизвестное значение события: {}", other);
                                continue;
                            }
                        };

                        let raw = RawKeyEvent::new(KeyCode::new(event.code()), state);
                        trace!("Событие клавиши: {}", raw);
                        reader_buffer.lock().push(raw);
                    }
                    Err(e) => {
                        error!(
                            "Чтение с устройства {} прервано: {}",
                            reader_path.display(),
                            e
                        );
                        reader_buffer.lock().failure = Some(QsnapError::DeviceLost(format!(
                            "Чтение с устройства {:?} прервано: {}",
                            reader_path, e
                        )));
                        break;
                    }
                }
            }
        });

        Ok(Self { buffer, reader })
    }
}

#[async_trait::async_trait]
impl EventSourceTrait for EvdevEventSource {
    async fn poll(&mut self, max_events: usize) -> Result<Vec<RawKeyEvent>> {
        let mut buffer = self.buffer.lock();

        if let Some(failure) = buffer.failure.take() {
            return Err(failure);
        }

        if buffer.dropped > 0 {
            warn!(
                "Буфер событий переполнялся, потеряно событий: {}",
                buffer.dropped
            );
            buffer.dropped = 0;
        }

        Ok(buffer.drain(max_events))
    }
}

impl Drop for EvdevEventSource {
    fn drop(&mut self) {
        info!("Остановка чтения устройства");
        self.reader.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(code: u16) -> RawKeyEvent {
        RawKeyEvent::press(KeyCode::new(code))
    }

    #[test]
    fn test_buffer_drops_oldest_on_overflow() {
        let mut buffer = EventBuffer::new(3);
        for code in [1, 2, 3, 4, 5] {
            buffer.push(event(code));
        }

        assert_eq!(buffer.dropped, 2);
        let drained = buffer.drain(10);
        let codes: Vec<u16> = drained.iter().map(|e| e.key_code.value()).collect();
        assert_eq!(codes, vec![3, 4, 5]);
    }

    #[test]
    fn test_buffer_drain_respects_limit() {
        let mut buffer = EventBuffer::new(8);
        for code in [1, 2, 3, 4] {
            buffer.push(event(code));
        }

        assert_eq!(buffer.drain(2).len(), 2);
        assert_eq!(buffer.drain(10).len(), 2);
        assert!(buffer.drain(10).is_empty());
    }
}
