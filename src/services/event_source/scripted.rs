use std::collections::VecDeque;
use tracing::info;

use crate::config::Config;
use crate::error::Result;
use crate::events::{KeyCode, RawKeyEvent};
use crate::services::chord::{KEY_DOWN, KEY_LEFT, KEY_RIGHT, KEY_UP};

use super::r#trait::EventSourceTrait;

/// Источник с заранее заданным сценарием событий.
///
/// В dry-run режиме бесконечно проигрывает демонстрационный цикл по всем
/// четырём четвертям, по одному событию за опрос. В тестах отдаёт заданные
/// пачки событий и затем молчит.
pub struct ScriptedEventSource {
    batches: VecDeque<Vec<RawKeyEvent>>,
    template: Option<Vec<Vec<RawKeyEvent>>>,
}

impl ScriptedEventSource {
    /// Демонстрационный цикл для dry-run: собрать аккорд, обойти все
    /// четверти, отпустить всё, и так по кругу
    pub fn demo(config: &Config) -> Self {
        info!("Dry-run режим - события клавиатуры эмулируются по сценарию");

        let controls = config.control_key_codes().to_vec();
        let mut script: Vec<Vec<RawKeyEvent>> = Vec::new();

        let press = |code: u16| vec![RawKeyEvent::press(KeyCode::new(code))];
        let release = |code: u16| vec![RawKeyEvent::release(KeyCode::new(code))];

        for &code in &controls {
            script.push(press(code));
        }

        let pairs = [
            (KEY_LEFT, KEY_UP),
            (KEY_RIGHT, KEY_UP),
            (KEY_LEFT, KEY_DOWN),
            (KEY_RIGHT, KEY_DOWN),
        ];
        for (horizontal, vertical) in pairs {
            script.push(press(horizontal));
            script.push(press(vertical));
            script.push(release(vertical));
            script.push(release(horizontal));
        }

        for &code in &controls {
            script.push(release(code));
        }

        Self {
            batches: script.iter().cloned().collect(),
            template: Some(script),
        }
    }

    /// Источник для тестов: каждая пачка возвращается одним опросом
    #[cfg(test)]
    pub fn from_batches(batches: Vec<Vec<RawKeyEvent>>) -> Self {
        Self {
            batches: batches.into(),
            template: None,
        }
    }
}

#[async_trait::async_trait]
impl EventSourceTrait for ScriptedEventSource {
    async fn poll(&mut self, max_events: usize) -> Result<Vec<RawKeyEvent>> {
        if self.batches.is_empty() {
            match &self.template {
                Some(template) => self.batches = template.iter().cloned().collect(),
                None => return Ok(Vec::new()),
            }
        }

        let mut batch = match self.batches.pop_front() {
            Some(batch) => batch,
            None => return Ok(Vec::new()),
        };

        if batch.len() > max_events {
            let rest = batch.split_off(max_events);
            self.batches.push_front(rest);
        }

        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: u16) -> RawKeyEvent {
        RawKeyEvent::press(KeyCode::new(code))
    }

    #[tokio::test]
    async fn test_batches_returned_in_order_then_silence() {
        let mut source = ScriptedEventSource::from_batches(vec![
            vec![press(29)],
            vec![press(125), press(105)],
        ]);

        assert_eq!(source.poll(32).await.unwrap().len(), 1);
        assert_eq!(source.poll(32).await.unwrap().len(), 2);
        assert!(source.poll(32).await.unwrap().is_empty());
        assert!(source.poll(32).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_oversized_batch_is_split_by_limit() {
        let mut source =
            ScriptedEventSource::from_batches(vec![vec![press(1), press(2), press(3)]]);

        let first = source.poll(2).await.unwrap();
        assert_eq!(first.len(), 2);
        let second = source.poll(2).await.unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].key_code.value(), 3);
    }

    #[tokio::test]
    async fn test_demo_script_loops() {
        let config = Config::default();
        let mut source = ScriptedEventSource::demo(&config);
        let cycle_len = source.batches.len();

        for _ in 0..cycle_len {
            assert!(!source.poll(32).await.unwrap().is_empty());
        }
        // Сценарий перезаряжается и продолжает отдавать события
        assert!(!source.poll(32).await.unwrap().is_empty());
    }
}
