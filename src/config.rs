use std::{collections::HashMap, path::PathBuf};

use color_eyre::eyre::{Result, WrapErr};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{
    de::{self, DeserializeOwned, Deserializer},
    Deserialize,
};

use crate::{
    action::{Action, GameAction},
    audio::BACKGROUND_TRACK,
    pages::PageId,
};

const CONFIG: &str = include_str!("../.config/config.yaml");

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub _data_dir: PathBuf,
    #[serde(default)]
    pub _config_dir: PathBuf,
    /// Directory whose images and music replace the built-in ones.
    #[serde(default)]
    pub assets_dir: Option<PathBuf>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AudioConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_track")]
    pub track: String,
}

fn default_enabled() -> bool {
    true
}

fn default_track() -> String {
    BACKGROUND_TRACK.to_string()
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self { enabled: default_enabled(), track: default_track() }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default, flatten)]
    pub config: AppConfig,
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub keybindings: KeyBindings,
}

impl Config {
    pub fn new() -> Result<Self> {
        let default_config = Self::builtin()?;
        let data_dir = crate::utils::get_data_dir();
        let config_dir = crate::utils::get_config_dir();
        let mut builder = config::Config::builder()
            .set_default("_data_dir", data_dir.to_string_lossy().to_string())?
            .set_default("_config_dir", config_dir.to_string_lossy().to_string())?;

        let config_files = [("config.yaml", config::FileFormat::Yaml)];
        let mut found_config = false;
        for (file, format) in &config_files {
            builder = builder.add_source(config::File::from(config_dir.join(file)).format(*format).required(false));
            if config_dir.join(file).exists() {
                found_config = true
            }
        }
        if !found_config {
            log::info!("No configuration file in {}, using defaults", config_dir.display());
        }

        let mut cfg: Self = builder
            .build()
            .and_then(|c| c.try_deserialize())
            .wrap_err_with(|| format!("invalid configuration in {}", config_dir.display()))?;
        cfg.keybindings.merge_defaults(&default_config.keybindings);

        Ok(cfg)
    }

    /// The configuration compiled into the binary.
    pub fn builtin() -> Result<Self> {
        serde_yaml::from_str(CONFIG).wrap_err("built-in configuration is invalid")
    }
}

#[derive(Clone, Debug, Default)]
pub struct PageKeyBindings(pub HashMap<KeyEvent, GameAction>);

impl PageKeyBindings {
    /// Keys bound to `action`, sorted so prompts are stable.
    pub fn keys_for(&self, action: GameAction) -> Vec<KeyEvent> {
        let mut keys: Vec<KeyEvent> =
            self.0.iter().filter(|(_, bound)| **bound == action).map(|(key, _)| *key).collect();
        keys.sort_by_key(key_event_to_string);
        keys
    }
}

#[derive(Clone, Debug, Default)]
pub struct KeyBindings {
    pub global: HashMap<KeyEvent, Action>,
    pub pages: HashMap<PageId, PageKeyBindings>,
}

impl KeyBindings {
    /// Maps a pressed key to an action for the given state. Global bindings
    /// take precedence over per-state ones.
    pub fn resolve(&self, page: PageId, key: &KeyEvent) -> Option<Action> {
        let key = KeyEvent::new(key.code, key.modifiers);
        if let Some(action) = self.global.get(&key) {
            return Some(action.clone());
        }
        self.pages.get(&page).and_then(|keymap| keymap.0.get(&key)).map(|action| Action::Game(*action))
    }

    pub fn page(&self, page: PageId) -> PageKeyBindings {
        self.pages.get(&page).cloned().unwrap_or_default()
    }

    fn merge_defaults(&mut self, defaults: &KeyBindings) {
        for (scope, default_bindings) in defaults.pages.iter() {
            let user_bindings = self.pages.entry(*scope).or_default();
            for (key, cmd) in default_bindings.0.iter() {
                user_bindings.0.entry(*key).or_insert(*cmd);
            }
        }
        for (key, cmd) in defaults.global.iter() {
            self.global.entry(*key).or_insert_with(|| cmd.clone());
        }
    }
}

impl<'de> Deserialize<'de> for KeyBindings {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = HashMap::<String, HashMap<String, String>>::deserialize(deserializer)?;

        let mut keybindings = KeyBindings::default();
        for (scope, bindings) in raw {
            if scope == "global" {
                keybindings.global = parse_bindings(&bindings).map_err(de::Error::custom)?;
            } else {
                let page: PageId = serde_plain::from_str(&scope)
                    .map_err(|_| de::Error::custom(format!("Unknown keybinding scope `{scope}`")))?;
                let bindings = parse_bindings(&bindings).map_err(de::Error::custom)?;
                keybindings.pages.insert(page, PageKeyBindings(bindings));
            }
        }

        Ok(keybindings)
    }
}

fn parse_bindings<T>(raw: &HashMap<String, String>) -> Result<HashMap<KeyEvent, T>, String>
where
    T: DeserializeOwned,
{
    raw.iter()
        .map(|(key_str, action_str)| {
            let event = parse_key_event(key_str)?;
            let action =
                serde_yaml::from_str(action_str).map_err(|_| format!("Unknown action `{action_str}` for `{key_str}`"))?;
            Ok((event, action))
        })
        .collect()
}

/// Names accepted for non-character keys, matched case-insensitively.
const NAMED_KEYS: &[(&str, KeyCode)] = &[
    ("esc", KeyCode::Esc),
    ("enter", KeyCode::Enter),
    ("space", KeyCode::Char(' ')),
    ("tab", KeyCode::Tab),
    ("backtab", KeyCode::BackTab),
    ("backspace", KeyCode::Backspace),
    ("delete", KeyCode::Delete),
    ("insert", KeyCode::Insert),
    ("left", KeyCode::Left),
    ("right", KeyCode::Right),
    ("up", KeyCode::Up),
    ("down", KeyCode::Down),
    ("home", KeyCode::Home),
    ("end", KeyCode::End),
    ("pageup", KeyCode::PageUp),
    ("pagedown", KeyCode::PageDown),
    ("minus", KeyCode::Char('-')),
];

/// Parses `<ctrl-alt-x>` style bindings. The brackets are optional.
fn parse_key_event(raw: &str) -> Result<KeyEvent, String> {
    let inner = match raw.strip_prefix('<') {
        Some(rest) => rest.strip_suffix('>'),
        None => Some(raw),
    };
    let inner = inner
        .filter(|inner| !inner.is_empty() && !inner.contains(['<', '>']))
        .ok_or_else(|| format!("Unable to parse `{raw}`"))?;

    let lower = inner.to_ascii_lowercase();
    let mut rest = lower.as_str();
    let mut modifiers = KeyModifiers::empty();
    while let Some((prefix, tail)) = rest.split_once('-') {
        let modifier = match prefix {
            "ctrl" => KeyModifiers::CONTROL,
            "alt" => KeyModifiers::ALT,
            "shift" => KeyModifiers::SHIFT,
            _ => break,
        };
        modifiers.insert(modifier);
        rest = tail;
    }

    let code = if let Some((_, code)) = NAMED_KEYS.iter().find(|(name, _)| *name == rest) {
        *code
    } else if let Some(n) = rest.strip_prefix('f').filter(|n| !n.is_empty()).and_then(|n| n.parse::<u8>().ok()) {
        KeyCode::F(n)
    } else {
        let mut chars = rest.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if modifiers.contains(KeyModifiers::SHIFT) => KeyCode::Char(c.to_ascii_uppercase()),
            (Some(c), None) => KeyCode::Char(c),
            _ => return Err(format!("Unknown key `{rest}` in `{raw}`")),
        }
    };
    let modifiers = if code == KeyCode::BackTab { modifiers | KeyModifiers::SHIFT } else { modifiers };
    Ok(KeyEvent::new(code, modifiers))
}

/// Human-readable form of a key, e.g. `Ctrl-Alt-a`, `Shift-R`, `Space`.
pub fn key_event_to_string(key_event: &KeyEvent) -> String {
    let code = match key_event.code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::F(n) => format!("F{n}"),
        code => format!("{code:?}"),
    };

    let mut parts = Vec::with_capacity(4);
    for (modifier, name) in
        [(KeyModifiers::CONTROL, "Ctrl"), (KeyModifiers::SHIFT, "Shift"), (KeyModifiers::ALT, "Alt")]
    {
        if key_event.modifiers.intersects(modifier) {
            parts.push(name.to_string());
        }
    }
    parts.push(code);
    parts.join("-")
}
