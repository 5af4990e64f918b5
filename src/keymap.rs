use std::collections::HashMap;
use std::path::Path;

use log::info;
use serde::Deserialize;
use winit::event::VirtualKeyCode;

use crate::config::ConfigError;
use crate::input::Button;

/// Mapping from host keys to logical button lines, plus the dedicated quit
/// key.
///
/// Quit is a host control event, not a button: the frontend handles it
/// directly and it never reaches the interrupt router. Keys with no binding
/// are ignored at lookup — host keyboards produce plenty of codes the
/// handheld has no line for.
#[derive(Clone, Debug)]
pub struct Keymap {
    buttons: HashMap<VirtualKeyCode, Button>,
    quit: VirtualKeyCode,
}

impl Default for Keymap {
    fn default() -> Self {
        Self::defaults()
    }
}

#[derive(Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
struct KeymapFile {
    up: Option<String>,
    down: Option<String>,
    left: Option<String>,
    right: Option<String>,
    a: Option<String>,
    b: Option<String>,
    quit: Option<String>,
}

impl Keymap {
    /// Arrow keys for the D-pad, Z/X for the action buttons, Q to quit.
    pub fn defaults() -> Self {
        let mut buttons = HashMap::new();
        buttons.insert(VirtualKeyCode::Up, Button::Up);
        buttons.insert(VirtualKeyCode::Down, Button::Down);
        buttons.insert(VirtualKeyCode::Left, Button::Left);
        buttons.insert(VirtualKeyCode::Right, Button::Right);
        buttons.insert(VirtualKeyCode::Z, Button::A);
        buttons.insert(VirtualKeyCode::X, Button::B);

        Self {
            buttons,
            quit: VirtualKeyCode::Q,
        }
    }

    /// Load overrides on top of the defaults. Unknown binding names and
    /// unknown key names are configuration errors, fatal to startup.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let file: KeymapFile =
            toml::from_str(&text).map_err(|e| ConfigError::Parse(e.to_string()))?;

        let mut map = Self::defaults();
        let overrides = [
            (Button::Up, file.up),
            (Button::Down, file.down),
            (Button::Left, file.left),
            (Button::Right, file.right),
            (Button::A, file.a),
            (Button::B, file.b),
        ];
        for (button, raw) in overrides {
            if let Some(raw) = raw {
                map.bind(button, parse_key(&raw)?);
            }
        }
        if let Some(raw) = file.quit {
            map.quit = parse_key(&raw)?;
        }

        info!("loaded keymap from {}", path.display());
        Ok(map)
    }

    fn bind(&mut self, button: Button, key: VirtualKeyCode) {
        self.buttons.retain(|_, &mut b| b != button);
        self.buttons.insert(key, button);
    }

    /// Button line bound to `key`, if any.
    pub fn button_for(&self, key: VirtualKeyCode) -> Option<Button> {
        self.buttons.get(&key).copied()
    }

    pub fn is_quit(&self, key: VirtualKeyCode) -> bool {
        key == self.quit
    }

    pub fn quit_key(&self) -> VirtualKeyCode {
        self.quit
    }
}

/// Fixed mapping from gamepad buttons to logical button lines. Face buttons
/// double up so either column of a pad works as A/B.
pub fn pad_button(button: gilrs::Button) -> Option<Button> {
    use gilrs::Button as Pad;
    match button {
        Pad::DPadUp => Some(Button::Up),
        Pad::DPadDown => Some(Button::Down),
        Pad::DPadLeft => Some(Button::Left),
        Pad::DPadRight => Some(Button::Right),
        Pad::South | Pad::West => Some(Button::A),
        Pad::East | Pad::North => Some(Button::B),
        _ => None,
    }
}

fn parse_key(raw: &str) -> Result<VirtualKeyCode, ConfigError> {
    let s = raw.trim();

    let key = match s {
        "Up" | "ArrowUp" => Some(VirtualKeyCode::Up),
        "Down" | "ArrowDown" => Some(VirtualKeyCode::Down),
        "Left" | "ArrowLeft" => Some(VirtualKeyCode::Left),
        "Right" | "ArrowRight" => Some(VirtualKeyCode::Right),
        "Enter" | "Return" => Some(VirtualKeyCode::Return),
        "Escape" => Some(VirtualKeyCode::Escape),
        "Space" => Some(VirtualKeyCode::Space),
        "Tab" => Some(VirtualKeyCode::Tab),
        "Backspace" => Some(VirtualKeyCode::Back),
        "LShift" => Some(VirtualKeyCode::LShift),
        "RShift" => Some(VirtualKeyCode::RShift),
        _ => {
            if s.len() == 1 {
                single_char_key(s.chars().next().unwrap_or_default())
            } else {
                None
            }
        }
    };

    key.ok_or_else(|| ConfigError::UnknownKey(raw.to_string()))
}

fn single_char_key(c: char) -> Option<VirtualKeyCode> {
    match c.to_ascii_uppercase() {
        'A' => Some(VirtualKeyCode::A),
        'B' => Some(VirtualKeyCode::B),
        'C' => Some(VirtualKeyCode::C),
        'D' => Some(VirtualKeyCode::D),
        'E' => Some(VirtualKeyCode::E),
        'F' => Some(VirtualKeyCode::F),
        'G' => Some(VirtualKeyCode::G),
        'H' => Some(VirtualKeyCode::H),
        'I' => Some(VirtualKeyCode::I),
        'J' => Some(VirtualKeyCode::J),
        'K' => Some(VirtualKeyCode::K),
        'L' => Some(VirtualKeyCode::L),
        'M' => Some(VirtualKeyCode::M),
        'N' => Some(VirtualKeyCode::N),
        'O' => Some(VirtualKeyCode::O),
        'P' => Some(VirtualKeyCode::P),
        'Q' => Some(VirtualKeyCode::Q),
        'R' => Some(VirtualKeyCode::R),
        'S' => Some(VirtualKeyCode::S),
        'T' => Some(VirtualKeyCode::T),
        'U' => Some(VirtualKeyCode::U),
        'V' => Some(VirtualKeyCode::V),
        'W' => Some(VirtualKeyCode::W),
        'X' => Some(VirtualKeyCode::X),
        'Y' => Some(VirtualKeyCode::Y),
        'Z' => Some(VirtualKeyCode::Z),
        '0' => Some(VirtualKeyCode::Key0),
        '1' => Some(VirtualKeyCode::Key1),
        '2' => Some(VirtualKeyCode::Key2),
        '3' => Some(VirtualKeyCode::Key3),
        '4' => Some(VirtualKeyCode::Key4),
        '5' => Some(VirtualKeyCode::Key5),
        '6' => Some(VirtualKeyCode::Key6),
        '7' => Some(VirtualKeyCode::Key7),
        '8' => Some(VirtualKeyCode::Key8),
        '9' => Some(VirtualKeyCode::Key9),
        _ => None,
    }
}
