use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Маппинг между именами клавиш и кодами evdev
pub struct KeycodeMap;

// Каноническая таблица: одно имя на код, используется в обе стороны
static KEY_TABLE: &[(&str, u16)] = &[
    // Модификаторы (левые и правые различаются)
    ("leftctrl", 29),    // KEY_LEFTCTRL
    ("rightctrl", 97),   // KEY_RIGHTCTRL
    ("leftshift", 42),   // KEY_LEFTSHIFT
    ("rightshift", 54),  // KEY_RIGHTSHIFT
    ("leftalt", 56),     // KEY_LEFTALT
    ("rightalt", 100),   // KEY_RIGHTALT
    ("leftmeta", 125),   // KEY_LEFTMETA
    ("rightmeta", 126),  // KEY_RIGHTMETA
    ("capslock", 58),    // KEY_CAPSLOCK
    // Стрелки
    ("up", 103),         // KEY_UP
    ("down", 108),       // KEY_DOWN
    ("left", 105),       // KEY_LEFT
    ("right", 106),      // KEY_RIGHT
    // Специальные клавиши
    ("escape", 1),       // KEY_ESC
    ("space", 57),       // KEY_SPACE
    ("enter", 28),       // KEY_ENTER
    ("backspace", 14),   // KEY_BACKSPACE
    ("tab", 15),         // KEY_TAB
    // Буквенные клавиши
    ("a", 30),  // KEY_A
    ("b", 48),  // KEY_B
    ("c", 46),  // KEY_C
    ("d", 32),  // KEY_D
    ("e", 18),  // KEY_E
    ("f", 33),  // KEY_F
    ("g", 34),  // KEY_G
    ("h", 35),  // KEY_H
    ("i", 23),  // KEY_I
    ("j", 36),  // KEY_J
    ("k", 37),  // KEY_K
    ("l", 38),  // KEY_L
    ("m", 50),  // KEY_M
    ("n", 49),  // KEY_N
    ("o", 24),  // KEY_O
    ("p", 25),  // KEY_P
    ("q", 16),  // KEY_Q
    ("r", 19),  // KEY_R
    ("s", 31),  // KEY_S
    ("t", 20),  // KEY_T
    ("u", 22),  // KEY_U
    ("v", 47),  // KEY_V
    ("w", 17),  // KEY_W
    ("x", 45),  // KEY_X
    ("y", 21),  // KEY_Y
    ("z", 44),  // KEY_Z
    // Цифровые клавиши (верхний ряд)
    ("1", 2),   // KEY_1
    ("2", 3),   // KEY_2
    ("3", 4),   // KEY_3
    ("4", 5),   // KEY_4
    ("5", 6),   // KEY_5
    ("6", 7),   // KEY_6
    ("7", 8),   // KEY_7
    ("8", 9),   // KEY_8
    ("9", 10),  // KEY_9
    ("0", 11),  // KEY_0
    // Функциональные клавиши
    ("f1", 59),   // KEY_F1
    ("f2", 60),   // KEY_F2
    ("f3", 61),   // KEY_F3
    ("f4", 62),   // KEY_F4
    ("f5", 63),   // KEY_F5
    ("f6", 64),   // KEY_F6
    ("f7", 65),   // KEY_F7
    ("f8", 66),   // KEY_F8
    ("f9", 67),   // KEY_F9
    ("f10", 68),  // KEY_F10
    ("f11", 87),  // KEY_F11
    ("f12", 88),  // KEY_F12
];

// Короткие алиасы указывают на левые модификаторы, только в прямой маппинг
static KEY_ALIASES: &[(&str, u16)] = &[
    ("ctrl", 29),    // KEY_LEFTCTRL
    ("shift", 42),   // KEY_LEFTSHIFT
    ("alt", 56),     // KEY_LEFTALT
    ("super", 125),  // KEY_LEFTMETA
    ("win", 125),    // KEY_LEFTMETA
    ("esc", 1),      // KEY_ESC
];

static KEY_NAME_TO_CODE: Lazy<HashMap<&'static str, u16>> = Lazy::new(|| {
    KEY_TABLE
        .iter()
        .chain(KEY_ALIASES.iter())
        .copied()
        .collect()
});

static CODE_TO_KEY_NAME: Lazy<HashMap<u16, &'static str>> =
    Lazy::new(|| KEY_TABLE.iter().map(|&(name, code)| (code, name)).collect());

impl KeycodeMap {
    /// Получить код клавиши по её имени
    pub fn get_keycode(key_name: &str) -> Result<u16, String> {
        let normalized = key_name.to_lowercase();
        KEY_NAME_TO_CODE
            .get(normalized.as_str())
            .copied()
            .ok_or_else(|| format!("Unknown key: {}", key_name))
    }

    /// Получить каноническое имя клавиши по её коду
    pub fn get_key_name(keycode: u16) -> Option<&'static str> {
        CODE_TO_KEY_NAME.get(&keycode).copied()
    }

    /// Имя клавиши для логов; для неизвестных кодов возвращает "KEY_<код>"
    pub fn describe(keycode: u16) -> String {
        match Self::get_key_name(keycode) {
            Some(name) => name.to_string(),
            None => format!("KEY_{}", keycode),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_key_mapping() {
        assert_eq!(KeycodeMap::get_keycode("leftctrl").unwrap(), 29);
        assert_eq!(KeycodeMap::get_keycode("leftmeta").unwrap(), 125);
        assert_eq!(KeycodeMap::get_keycode("escape").unwrap(), 1);
        assert_eq!(KeycodeMap::get_keycode("up").unwrap(), 103);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(KeycodeMap::get_keycode("LeftCtrl").unwrap(), 29);
        assert_eq!(KeycodeMap::get_keycode("ESCAPE").unwrap(), 1);
    }

    #[test]
    fn test_aliases_point_to_left_modifiers() {
        assert_eq!(KeycodeMap::get_keycode("ctrl").unwrap(), 29);
        assert_eq!(KeycodeMap::get_keycode("super").unwrap(), 125);
        assert_eq!(KeycodeMap::get_keycode("win").unwrap(), 125);
    }

    #[test]
    fn test_reverse_mapping_is_canonical() {
        // Обратный маппинг не должен выдавать алиасы
        assert_eq!(KeycodeMap::get_key_name(29), Some("leftctrl"));
        assert_eq!(KeycodeMap::get_key_name(125), Some("leftmeta"));
        assert_eq!(KeycodeMap::get_key_name(1), Some("escape"));
    }

    #[test]
    fn test_invalid_key() {
        assert!(KeycodeMap::get_keycode("invalid_key").is_err());
    }

    #[test]
    fn test_describe_unknown_code() {
        assert_eq!(KeycodeMap::describe(29), "leftctrl");
        assert_eq!(KeycodeMap::describe(9999), "KEY_9999");
    }

    #[test]
    fn test_table_has_no_duplicate_codes() {
        let mut seen = std::collections::HashSet::new();
        for &(name, code) in KEY_TABLE {
            assert!(seen.insert(code), "дубликат кода {} для {}", code, name);
        }
    }
}
