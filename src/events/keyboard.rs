use serde::{Deserialize, Serialize};
use std::fmt;

/// Состояние клавиши. Аппаратные автоповторы (value == 2) не являются
/// переходами и отфильтровываются источником событий, поэтому варианта
/// Repeat здесь нет.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyState {
    Pressed,
    Released,
}

/// Код клавиши (evdev коды)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyCode(pub u16);

impl KeyCode {
    pub fn new(code: u16) -> Self {
        Self(code)
    }

    pub fn value(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KEY_{}", self.0)
    }
}

/// Одиночный переход клавиши (нажатие или отпускание), уже с меткой времени.
/// Источник событий отдаёт их пакетами в хронологическом порядке.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawKeyEvent {
    pub key_code: KeyCode,
    pub state: KeyState,
    pub timestamp: std::time::Instant,
}

impl RawKeyEvent {
    pub fn new(key_code: KeyCode, state: KeyState) -> Self {
        Self {
            key_code,
            state,
            timestamp: std::time::Instant::now(),
        }
    }

    pub fn press(key_code: KeyCode) -> Self {
        Self::new(key_code, KeyState::Pressed)
    }

    pub fn release(key_code: KeyCode) -> Self {
        Self::new(key_code, KeyState::Released)
    }

    pub fn pressed(&self) -> bool {
        self.state == KeyState::Pressed
    }
}

impl fmt::Display for RawKeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:?} ({}ms)",
            self.key_code,
            self.state,
            self.timestamp.elapsed().as_millis()
        )
    }
}
