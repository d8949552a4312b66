use std::collections::HashMap;

use crate::events::Quadrant;

// Коды из input-event-codes.h, жёстко закреплённые за ролями
pub const KEY_ESC: u16 = 1;
pub const KEY_UP: u16 = 103;
pub const KEY_LEFT: u16 = 105;
pub const KEY_RIGHT: u16 = 106;
pub const KEY_DOWN: u16 = 108;

/// Роль клавиши в аккорде
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyRole {
    /// Управляющая клавиша; индекс в списке из конфигурации
    Control(usize),
    Left,
    Right,
    Up,
    Down,
    Terminate,
}

/// Команда, выданная трекером после обработки одного события
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChordCommand {
    Place(Quadrant),
    Terminate,
}

/// Построить карту "код клавиши -> роль". Направления и выход закреплены
/// жёстко, управляющие клавиши берутся из конфигурации. При пересечении
/// кодов роль направления/выхода имеет приоритет.
pub fn build_role_map(control_codes: &[u16]) -> HashMap<u16, KeyRole> {
    let mut roles = HashMap::new();
    roles.insert(KEY_LEFT, KeyRole::Left);
    roles.insert(KEY_RIGHT, KeyRole::Right);
    roles.insert(KEY_UP, KeyRole::Up);
    roles.insert(KEY_DOWN, KeyRole::Down);
    roles.insert(KEY_ESC, KeyRole::Terminate);

    for (i, &code) in control_codes.iter().enumerate() {
        roles.entry(code).or_insert(KeyRole::Control(i));
    }

    roles
}
