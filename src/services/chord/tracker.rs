use smallvec::{smallvec, SmallVec};
use std::collections::HashMap;

use super::roles::{build_role_map, ChordCommand, KeyRole};
use crate::events::{Quadrant, RawKeyEvent};

/// Отслеживает состояние клавиш аккорда между опросами.
///
/// Логика уровневая, а не фронтовая: после каждого события по отслеживаемой
/// клавише состояние оценивается заново, и если аккорд собран, команда
/// выдаётся снова. Повторные срабатывания при удержании ожидаемы, само
/// размещение окна идемпотентно.
#[derive(Debug)]
pub struct ChordTracker {
    roles: HashMap<u16, KeyRole>,
    controls: SmallVec<[bool; 4]>,
    left: bool,
    right: bool,
    up: bool,
    down: bool,
    escape: bool,
}

impl ChordTracker {
    pub fn new(control_codes: &[u16]) -> Self {
        Self {
            roles: build_role_map(control_codes),
            controls: smallvec![false; control_codes.len()],
            left: false,
            right: false,
            up: false,
            down: false,
            escape: false,
        }
    }

    /// Обработать одно событие клавиатуры.
    ///
    /// События по клавишам вне аккорда не трогают состояние и не приводят
    /// к переоценке. Для отслеживаемой клавиши состояние обновляется и
    /// аккорд оценивается заново независимо от того, нажатие это или
    /// отпускание.
    pub fn apply(&mut self, event: &RawKeyEvent) -> Option<ChordCommand> {
        let role = *self.roles.get(&event.key_code.value())?;
        let pressed = event.pressed();

        match role {
            KeyRole::Control(i) => self.controls[i] = pressed,
            KeyRole::Left => self.left = pressed,
            KeyRole::Right => self.right = pressed,
            KeyRole::Up => self.up = pressed,
            KeyRole::Down => self.down = pressed,
            KeyRole::Terminate => self.escape = pressed,
        }

        self.evaluate()
    }

    /// Все управляющие клавиши зажаты; пустой список считается зажатым
    pub fn armed(&self) -> bool {
        self.controls.iter().all(|&pressed| pressed)
    }

    fn evaluate(&self) -> Option<ChordCommand> {
        if !self.armed() {
            return None;
        }

        // Выход имеет приоритет над направлениями
        if self.escape {
            return Some(ChordCommand::Terminate);
        }

        self.current_quadrant().map(ChordCommand::Place)
    }

    /// Ровно одна горизонтальная и ровно одна вертикальная стрелка зажаты
    fn current_quadrant(&self) -> Option<Quadrant> {
        match (self.left, self.right, self.up, self.down) {
            (true, false, true, false) => Some(Quadrant::TopLeft),
            (false, true, true, false) => Some(Quadrant::TopRight),
            (true, false, false, true) => Some(Quadrant::BottomLeft),
            (false, true, false, true) => Some(Quadrant::BottomRight),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::roles::{KEY_DOWN, KEY_ESC, KEY_LEFT, KEY_RIGHT, KEY_UP};
    use super::*;
    use crate::events::KeyCode;

    const LEFTCTRL: u16 = 29;
    const LEFTMETA: u16 = 125;
    const SPACE: u16 = 57;

    fn tracker() -> ChordTracker {
        ChordTracker::new(&[LEFTCTRL, LEFTMETA])
    }

    fn press(t: &mut ChordTracker, code: u16) -> Option<ChordCommand> {
        t.apply(&RawKeyEvent::press(KeyCode::new(code)))
    }

    fn release(t: &mut ChordTracker, code: u16) -> Option<ChordCommand> {
        t.apply(&RawKeyEvent::release(KeyCode::new(code)))
    }

    #[test]
    fn test_full_chord_fires_on_completing_event() {
        let mut t = tracker();
        assert_eq!(press(&mut t, LEFTCTRL), None);
        assert_eq!(press(&mut t, LEFTMETA), None);
        assert_eq!(press(&mut t, KEY_LEFT), None);
        assert_eq!(
            press(&mut t, KEY_UP),
            Some(ChordCommand::Place(Quadrant::TopLeft))
        );
    }

    #[test]
    fn test_all_four_quadrants() {
        let cases = [
            (KEY_LEFT, KEY_UP, Quadrant::TopLeft),
            (KEY_RIGHT, KEY_UP, Quadrant::TopRight),
            (KEY_LEFT, KEY_DOWN, Quadrant::BottomLeft),
            (KEY_RIGHT, KEY_DOWN, Quadrant::BottomRight),
        ];

        for (horizontal, vertical, expected) in cases {
            let mut t = tracker();
            press(&mut t, LEFTCTRL);
            press(&mut t, LEFTMETA);
            press(&mut t, horizontal);
            assert_eq!(
                press(&mut t, vertical),
                Some(ChordCommand::Place(expected)),
                "пара {}+{}",
                horizontal,
                vertical
            );
        }
    }

    #[test]
    fn test_chord_is_order_independent() {
        // Стрелки раньше управляющих: срабатывает последнее событие аккорда
        let mut t = tracker();
        assert_eq!(press(&mut t, KEY_UP), None);
        assert_eq!(press(&mut t, KEY_RIGHT), None);
        assert_eq!(press(&mut t, LEFTMETA), None);
        assert_eq!(
            press(&mut t, LEFTCTRL),
            Some(ChordCommand::Place(Quadrant::TopRight))
        );
    }

    #[test]
    fn test_release_and_repress_refires() {
        let mut t = tracker();
        press(&mut t, LEFTCTRL);
        press(&mut t, LEFTMETA);
        press(&mut t, KEY_LEFT);
        assert!(press(&mut t, KEY_UP).is_some());

        assert_eq!(release(&mut t, KEY_UP), None);
        assert_eq!(
            press(&mut t, KEY_UP),
            Some(ChordCommand::Place(Quadrant::TopLeft))
        );
    }

    #[test]
    fn test_control_release_disarms_and_repress_rearms() {
        let mut t = tracker();
        press(&mut t, LEFTCTRL);
        press(&mut t, LEFTMETA);
        press(&mut t, KEY_LEFT);
        assert!(press(&mut t, KEY_DOWN).is_some());

        assert_eq!(release(&mut t, LEFTCTRL), None);
        assert_eq!(
            press(&mut t, LEFTCTRL),
            Some(ChordCommand::Place(Quadrant::BottomLeft))
        );
    }

    #[test]
    fn test_second_horizontal_blocks_until_released() {
        let mut t = tracker();
        press(&mut t, LEFTCTRL);
        press(&mut t, LEFTMETA);
        press(&mut t, KEY_LEFT);
        assert!(press(&mut t, KEY_UP).is_some());

        // Обе горизонтали зажаты: пары больше нет
        assert_eq!(press(&mut t, KEY_RIGHT), None);
        // Отпускание лишней стрелки восстанавливает пару и срабатывает снова
        assert_eq!(
            release(&mut t, KEY_RIGHT),
            Some(ChordCommand::Place(Quadrant::TopLeft))
        );
    }

    #[test]
    fn test_pair_without_controls_is_silent() {
        let mut t = tracker();
        assert_eq!(press(&mut t, KEY_LEFT), None);
        assert_eq!(press(&mut t, KEY_UP), None);
    }

    #[test]
    fn test_terminate_requires_all_controls() {
        let mut t = tracker();
        assert_eq!(press(&mut t, KEY_ESC), None);
        assert_eq!(press(&mut t, LEFTCTRL), None);
        // Escape уже зажат: команда выходит на добирающем управляющем
        assert_eq!(press(&mut t, LEFTMETA), Some(ChordCommand::Terminate));
    }

    #[test]
    fn test_terminate_wins_over_directions() {
        let mut t = tracker();
        press(&mut t, LEFTCTRL);
        press(&mut t, LEFTMETA);
        press(&mut t, KEY_LEFT);
        assert!(press(&mut t, KEY_UP).is_some());

        assert_eq!(press(&mut t, KEY_ESC), Some(ChordCommand::Terminate));
    }

    #[test]
    fn test_untracked_key_does_not_reevaluate() {
        let mut t = tracker();
        press(&mut t, LEFTCTRL);
        press(&mut t, LEFTMETA);
        press(&mut t, KEY_LEFT);
        assert!(press(&mut t, KEY_UP).is_some());

        // Аккорд всё ещё собран, но чужая клавиша не должна его перезапускать
        assert_eq!(press(&mut t, SPACE), None);
        assert_eq!(release(&mut t, SPACE), None);
    }

    #[test]
    fn test_empty_control_list_is_vacuously_armed() {
        let mut t = ChordTracker::new(&[]);
        assert!(t.armed());
        assert_eq!(press(&mut t, KEY_RIGHT), None);
        assert_eq!(
            press(&mut t, KEY_DOWN),
            Some(ChordCommand::Place(Quadrant::BottomRight))
        );
    }
}
