use std::{collections::HashMap, path::PathBuf};

use color_eyre::eyre::{bail, ensure, eyre, Result, WrapErr};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use derive_deref::{Deref, DerefMut};
use serde::{
    de::{self, Deserializer},
    Deserialize,
};
use strum::IntoEnumIterator;

use crate::{
    action::{Action, GameAction},
    constants::game,
    game::stage::StageId,
};

const CONFIG: &str = include_str!("../.config/config.yaml");

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub _data_dir: PathBuf,
    #[serde(default)]
    pub _config_dir: PathBuf,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default, flatten)]
    pub config: AppConfig,
    #[serde(default)]
    pub keybindings: KeyBindings,
    #[serde(default)]
    pub game: GameSettings,
}

impl Config {
    pub fn new() -> Result<Self> {
        let default_config: Config = serde_yaml::from_str(CONFIG).wrap_err("embedded default config is invalid")?;
        let data_dir = crate::utils::get_data_dir();
        let config_dir = crate::utils::get_config_dir();
        let mut builder = config::Config::builder()
            .set_default("_data_dir", data_dir.to_string_lossy().to_string())?
            .set_default("_config_dir", config_dir.to_string_lossy().to_string())?;

        let config_files = [("config.yaml", config::FileFormat::Yaml)];
        let mut found_config = false;
        for (file, format) in &config_files {
            let path = config_dir.join(file);
            builder = builder.add_source(config::File::from(path.clone()).format(*format).required(false));
            if path.exists() {
                log::info!("Loading configuration from {}", path.display());
                found_config = true
            }
        }
        if !found_config {
            log::info!("No configuration file found in {}, using defaults", config_dir.display());
        }

        let mut cfg: Self = builder
            .build()?
            .try_deserialize()
            .wrap_err_with(|| format!("invalid configuration in {}", config_dir.display()))?;
        cfg.keybindings.merge_defaults(default_config.keybindings);
        cfg.game.validate()?;

        Ok(cfg)
    }
}

/// Tunables of the simulation. Every field falls back to the built-in constant.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct GameSettings {
    pub window_width: i32,
    pub window_height: i32,
    pub ground_height: i32,
    pub acceleration: f64,
    pub jump_velocity: i32,
    pub scroll_speed: f64,
    pub pipe_gap: i32,
    pub pipe_phases: Vec<f64>,
    pub ground_phases: Vec<f64>,
    pub seed: u64,
    pub assets_dir: PathBuf,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            window_width: game::WINDOW_WIDTH,
            window_height: game::WINDOW_HEIGHT,
            ground_height: game::GROUND_HEIGHT,
            acceleration: game::ACCELERATION,
            jump_velocity: game::JUMP_VELOCITY,
            scroll_speed: game::SCROLL_SPEED,
            pipe_gap: game::PIPE_GAP,
            pipe_phases: game::PIPE_PHASES.to_vec(),
            ground_phases: game::GROUND_PHASES.to_vec(),
            seed: game::SEED,
            assets_dir: PathBuf::from("assets"),
        }
    }
}

impl GameSettings {
    /// Rejects settings the simulation cannot run with. The pipe gap is checked by the pipes themselves.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.window_width > game::PLAYER_WIDTH && self.window_height > 0,
            "window must be wider than the player and have a positive height, got {}x{}",
            self.window_width,
            self.window_height
        );
        ensure!(
            self.ground_height > 0 && self.ground_height < self.window_height,
            "ground height {} must lie inside the window height {}",
            self.ground_height,
            self.window_height
        );
        ensure!(self.scroll_speed >= 0.0, "scroll speed must not be negative, got {}", self.scroll_speed);
        ensure!(!self.pipe_phases.is_empty(), "at least one pipe phase is required");
        ensure!(!self.ground_phases.is_empty(), "at least one ground phase is required");
        Ok(())
    }
}

#[derive(Clone, Debug, Default, Deref, DerefMut)]
pub struct KeyMap(pub HashMap<KeyEvent, Action>);

#[derive(Clone, Debug, Default)]
pub struct KeyBindings {
    pub global: KeyMap,
    pub stages: HashMap<StageId, KeyMap>,
}

impl KeyBindings {
    /// Looks a key up in the active stage first, then in the global map.
    pub fn action_for(&self, stage: StageId, key: &KeyEvent) -> Option<&Action> {
        self.stages.get(&stage).and_then(|keymap| keymap.get(key)).or_else(|| self.global.get(key))
    }

    /// The key bound to `action` in `stage`. When several are bound the first in `<...>` order wins.
    pub fn key_for(&self, stage: StageId, action: GameAction) -> Option<KeyEvent> {
        let keymap = self.stages.get(&stage)?;
        keymap
            .iter()
            .filter(|(_, bound)| **bound == Action::Game(action))
            .map(|(key, _)| *key)
            .min_by_key(key_event_to_string)
    }

    /// Fills in every default binding the user did not override.
    fn merge_defaults(&mut self, defaults: KeyBindings) {
        for (stage, default_bindings) in defaults.stages {
            let user_bindings = self.stages.entry(stage).or_default();
            for (key, action) in default_bindings.0 {
                user_bindings.entry(key).or_insert(action);
            }
        }
        for (key, action) in defaults.global.0 {
            self.global.entry(key).or_insert(action);
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
struct RawKeyBindings {
    #[serde(default)]
    global: HashMap<String, String>,
    #[serde(default)]
    stages: HashMap<String, HashMap<String, String>>,
}

impl<'de> Deserialize<'de> for KeyBindings {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawKeyBindings::deserialize(deserializer)?;

        let global = raw
            .global
            .iter()
            .map(|(key, action)| {
                let action: Action = serde_yaml::from_str(action).map_err(de::Error::custom)?;
                Ok((parse_key_event(key).map_err(de::Error::custom)?, action))
            })
            .collect::<Result<HashMap<_, _>, D::Error>>()?;

        let stages = raw
            .stages
            .iter()
            .map(|(stage, bindings)| {
                let stage = parse_stage_id(stage).map_err(de::Error::custom)?;
                let keymap = bindings
                    .iter()
                    .map(|(key, action)| {
                        let action: GameAction = serde_yaml::from_str(action).map_err(de::Error::custom)?;
                        Ok((parse_key_event(key).map_err(de::Error::custom)?, Action::Game(action)))
                    })
                    .collect::<Result<HashMap<_, _>, D::Error>>()?;
                Ok((stage, KeyMap(keymap)))
            })
            .collect::<Result<HashMap<_, _>, D::Error>>()?;

        Ok(KeyBindings { global: KeyMap(global), stages })
    }
}

// Stage names are matched without regard to case since the config crate may lowercase keys.
fn parse_stage_id(raw: &str) -> Result<StageId> {
    StageId::iter()
        .find(|stage| stage.to_string().eq_ignore_ascii_case(raw))
        .ok_or_else(|| eyre!("unknown stage `{raw}` in key bindings"))
}

pub fn parse_key_event(raw: &str) -> Result<KeyEvent> {
    ensure!(
        raw.matches('<').count() == raw.matches('>').count(),
        "unbalanced brackets in key binding `{raw}`"
    );
    let raw = raw.trim_start_matches('<').trim_end_matches('>');
    let raw_lower = raw.to_ascii_lowercase();
    let (remaining, modifiers) = extract_modifiers(&raw_lower);
    parse_key_code_with_modifiers(remaining, modifiers)
}

fn extract_modifiers(raw: &str) -> (&str, KeyModifiers) {
    let mut modifiers = KeyModifiers::empty();
    let mut current = raw;

    loop {
        if let Some(rest) = current.strip_prefix("ctrl-") {
            modifiers.insert(KeyModifiers::CONTROL);
            current = rest;
        } else if let Some(rest) = current.strip_prefix("alt-") {
            modifiers.insert(KeyModifiers::ALT);
            current = rest;
        } else if let Some(rest) = current.strip_prefix("shift-") {
            modifiers.insert(KeyModifiers::SHIFT);
            current = rest;
        } else {
            break;
        }
    }

    (current, modifiers)
}

const NAMED_KEYS: [(&str, KeyCode); 14] = [
    ("esc", KeyCode::Esc),
    ("enter", KeyCode::Enter),
    ("left", KeyCode::Left),
    ("right", KeyCode::Right),
    ("up", KeyCode::Up),
    ("down", KeyCode::Down),
    ("home", KeyCode::Home),
    ("end", KeyCode::End),
    ("pageup", KeyCode::PageUp),
    ("pagedown", KeyCode::PageDown),
    ("backspace", KeyCode::Backspace),
    ("delete", KeyCode::Delete),
    ("tab", KeyCode::Tab),
    ("space", KeyCode::Char(' ')),
];

fn parse_key_code_with_modifiers(raw: &str, modifiers: KeyModifiers) -> Result<KeyEvent> {
    if let Some((_, code)) = NAMED_KEYS.iter().find(|(name, _)| *name == raw) {
        return Ok(KeyEvent::new(*code, modifiers));
    }
    if let Some(n) = raw.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
        if (1..=12).contains(&n) {
            return Ok(KeyEvent::new(KeyCode::F(n), modifiers));
        }
    }

    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => {
            let c = if modifiers.contains(KeyModifiers::SHIFT) { c.to_ascii_uppercase() } else { c };
            Ok(KeyEvent::new(KeyCode::Char(c), modifiers))
        },
        _ => bail!("unable to parse key `{raw}`"),
    }
}

/// Formats a key in the same `<ctrl-a>` notation the config file uses.
pub fn key_event_to_string(key_event: &KeyEvent) -> String {
    let code = match key_event.code {
        KeyCode::Char(' ') => "space".to_string(),
        KeyCode::Char(c) => c.to_ascii_lowercase().to_string(),
        KeyCode::F(n) => format!("f{n}"),
        code => NAMED_KEYS
            .iter()
            .find(|(_, named)| *named == code)
            .map(|(name, _)| name.to_string())
            .unwrap_or_else(|| format!("{code:?}").to_ascii_lowercase()),
    };

    let mut parts = Vec::with_capacity(4);
    if key_event.modifiers.intersects(KeyModifiers::CONTROL) {
        parts.push("ctrl".to_string());
    }
    if key_event.modifiers.intersects(KeyModifiers::ALT) {
        parts.push("alt".to_string());
    }
    if key_event.modifiers.intersects(KeyModifiers::SHIFT) {
        parts.push("shift".to_string());
    }
    parts.push(code);

    format!("<{}>", parts.join("-"))
}

/// Short form for on-screen prompts, e.g. `SPACE` or `CTRL-J`.
pub fn key_label(key_event: &KeyEvent) -> String {
    key_event_to_string(key_event).trim_start_matches('<').trim_end_matches('>').to_uppercase()
}

#[cfg(test)]
mod tests {
    use color_eyre::Result;
    use pretty_assertions::assert_eq;

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    #[test]
    fn test_default_config_parses() -> Result<()> {
        let c: Config = serde_yaml::from_str(CONFIG)?;
        assert_eq!(c.keybindings.global.get(&parse_key_event("<q>")?), Some(&Action::Quit));
        assert_eq!(c.keybindings.global.get(&parse_key_event("<ctrl-z>")?), Some(&Action::Suspend));
        assert_eq!(c.keybindings.stages.len(), 3);
        Ok(())
    }

    #[test]
    fn test_default_game_section_matches_constants() -> Result<()> {
        let c: Config = serde_yaml::from_str(CONFIG)?;
        assert_eq!(c.game, GameSettings::default());
        c.game.validate()?;
        Ok(())
    }

    #[test]
    fn test_stage_bindings_take_precedence() -> Result<()> {
        let c: Config = serde_yaml::from_str(CONFIG)?;
        let space = key(KeyCode::Char(' '));
        assert_eq!(c.keybindings.action_for(StageId::StartMenu, &space), Some(&Action::Game(GameAction::Begin)));
        assert_eq!(c.keybindings.action_for(StageId::Running, &space), Some(&Action::Game(GameAction::Jump)));
        assert_eq!(c.keybindings.action_for(StageId::Over, &space), None);
        assert_eq!(
            c.keybindings.action_for(StageId::Over, &key(KeyCode::Char('r'))),
            Some(&Action::Game(GameAction::Restart))
        );
        assert_eq!(c.keybindings.action_for(StageId::Running, &key(KeyCode::Char('q'))), Some(&Action::Quit));
        Ok(())
    }

    #[test]
    fn test_key_for_finds_the_bound_key() -> Result<()> {
        let c: Config = serde_yaml::from_str(CONFIG)?;
        let begin = c.keybindings.key_for(StageId::StartMenu, GameAction::Begin);
        assert_eq!(begin, Some(key(KeyCode::Char(' '))));
        assert_eq!(c.keybindings.key_for(StageId::Running, GameAction::Jump), Some(key(KeyCode::Char(' '))));
        assert_eq!(c.keybindings.key_for(StageId::Over, GameAction::Jump), None);
        assert_eq!(KeyBindings::default().key_for(StageId::Over, GameAction::Restart), None);
        Ok(())
    }

    #[test]
    fn test_key_label() -> Result<()> {
        assert_eq!(key_label(&parse_key_event("<space>")?), "SPACE");
        assert_eq!(key_label(&parse_key_event("<r>")?), "R");
        assert_eq!(key_label(&parse_key_event("<ctrl-j>")?), "CTRL-J");
        Ok(())
    }

    #[test]
    fn test_user_bindings_are_merged_over_defaults() -> Result<()> {
        let defaults: Config = serde_yaml::from_str(CONFIG)?;
        let mut user: Config = serde_yaml::from_str(
            r#"
keybindings:
  stages:
    running:
      "<k>": Jump
"#,
        )?;
        user.keybindings.merge_defaults(defaults.keybindings);

        let running = &user.keybindings.stages[&StageId::Running];
        assert_eq!(running.get(&key(KeyCode::Char('k'))), Some(&Action::Game(GameAction::Jump)));
        assert_eq!(running.get(&key(KeyCode::Char(' '))), Some(&Action::Game(GameAction::Jump)));
        assert!(user.keybindings.global.contains_key(&key(KeyCode::Char('q'))));
        Ok(())
    }

    #[test]
    fn test_partial_game_section_uses_defaults() -> Result<()> {
        let c: Config = serde_yaml::from_str("game:\n  jump_velocity: -300\n")?;
        assert_eq!(c.game.jump_velocity, -300);
        assert_eq!(c.game.pipe_gap, game::PIPE_GAP);
        Ok(())
    }

    #[test]
    fn test_unknown_stage_is_rejected() {
        let result: Result<Config, _> = serde_yaml::from_str("keybindings:\n  stages:\n    Paused:\n      \"<p>\": Jump\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_rejects_ground_outside_window() {
        let settings = GameSettings { ground_height: 600, ..GameSettings::default() };
        assert!(settings.validate().is_err());
        let settings = GameSettings { pipe_phases: vec![], ..GameSettings::default() };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_simple_keys() -> Result<()> {
        assert_eq!(parse_key_event("a")?, key(KeyCode::Char('a')));
        assert_eq!(parse_key_event("<enter>")?, key(KeyCode::Enter));
        assert_eq!(parse_key_event("<esc>")?, key(KeyCode::Esc));
        assert_eq!(parse_key_event("<space>")?, key(KeyCode::Char(' ')));
        assert_eq!(parse_key_event("<f5>")?, key(KeyCode::F(5)));
        Ok(())
    }

    #[test]
    fn test_with_modifiers() -> Result<()> {
        assert_eq!(parse_key_event("<ctrl-a>")?, KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL));
        assert_eq!(parse_key_event("<alt-enter>")?, KeyEvent::new(KeyCode::Enter, KeyModifiers::ALT));
        assert_eq!(
            parse_key_event("<ctrl-shift-enter>")?,
            KeyEvent::new(KeyCode::Enter, KeyModifiers::CONTROL | KeyModifiers::SHIFT)
        );
        assert_eq!(parse_key_event("<shift-r>")?, KeyEvent::new(KeyCode::Char('R'), KeyModifiers::SHIFT));
        Ok(())
    }

    #[test]
    fn test_case_insensitivity() -> Result<()> {
        assert_eq!(parse_key_event("<CTRL-a>")?, KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL));
        assert_eq!(parse_key_event("<AlT-eNtEr>")?, KeyEvent::new(KeyCode::Enter, KeyModifiers::ALT));
        Ok(())
    }

    #[test]
    fn test_invalid_keys() {
        assert!(parse_key_event("<invalid-key>").is_err());
        assert!(parse_key_event("<ctrl-invalid-key>").is_err());
        assert!(parse_key_event("<ctrl-a").is_err());
        assert!(parse_key_event("<f13>").is_err());
    }

    #[test]
    fn test_key_event_to_string_round_trips() -> Result<()> {
        for raw in ["<q>", "<ctrl-c>", "<space>", "<up>", "<ctrl-alt-a>", "<f1>"] {
            assert_eq!(key_event_to_string(&parse_key_event(raw)?), raw);
        }
        Ok(())
    }
}
