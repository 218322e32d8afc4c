/// Gamepad input using gilrs (feature `gamepad`).
///
/// Button mapping for meta actions is loaded from config.toml via
/// `load_button_config()`.
/// Default mapping:
///   D-pad / Left Stick    →  Movement (one command per press)
///   Start                 →  Restart
///   Select                →  Quit
///
/// Without the feature, `GamepadState` compiles to an inert stub that
/// never reports anything.

#[cfg(feature = "gamepad")]
use gilrs::{Axis, Button, EventType, Gilrs};

use crate::config::GamepadConfig;
use crate::domain::entity::MoveCommand;
use super::input::InputAction;

#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
const STICK_DEADZONE: f32 = 0.5;

/// Logical button identifiers (one per physical button).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Btn {
    A,       // South
    B,       // East
    X,       // West
    Y,       // North
    L1,      // LeftTrigger
    R1,      // RightTrigger
    Start,
    Select,
}

impl Btn {
    fn from_name(s: &str) -> Option<Btn> {
        match s.to_uppercase().as_str() {
            "A" | "SOUTH"  => Some(Btn::A),
            "B" | "EAST"   => Some(Btn::B),
            "X" | "WEST"   => Some(Btn::X),
            "Y" | "NORTH"  => Some(Btn::Y),
            "L1" | "LB" | "LEFTTRIGGER"  => Some(Btn::L1),
            "R1" | "RB" | "RIGHTTRIGGER" => Some(Btn::R1),
            "START" => Some(Btn::Start),
            "SELECT" | "BACK" => Some(Btn::Select),
            _ => None,
        }
    }

    #[cfg(feature = "gamepad")]
    fn from_gilrs(btn: Button) -> Option<Btn> {
        match btn {
            Button::South     => Some(Btn::A),
            Button::East      => Some(Btn::B),
            Button::West      => Some(Btn::X),
            Button::North     => Some(Btn::Y),
            Button::LeftTrigger  => Some(Btn::L1),
            Button::RightTrigger => Some(Btn::R1),
            Button::Start     => Some(Btn::Start),
            Button::Select    => Some(Btn::Select),
            _ => None,
        }
    }
}

/// Action-to-button mapping (loaded from config).
struct ActionMap {
    quit: Vec<Btn>,
    restart: Vec<Btn>,
}

impl Default for ActionMap {
    fn default() -> Self {
        ActionMap {
            quit:    vec![Btn::Select],
            restart: vec![Btn::Start],
        }
    }
}

pub struct GamepadState {
    #[cfg(feature = "gamepad")]
    gilrs: Option<Gilrs>,

    /// Actions produced since the last `update()`.
    actions: Vec<InputAction>,

    // Stick direction currently held, for edge detection.
    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    stick: Option<MoveCommand>,
    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    stick_x: f32,
    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    stick_y: f32,

    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    action_map: ActionMap,

    pub connected: bool,
}

impl GamepadState {
    pub fn new() -> Self {
        #[cfg(feature = "gamepad")]
        let (gilrs_opt, connected) = {
            match Gilrs::new() {
                Ok(g) => {
                    let has_pad = g.gamepads().next().is_some();
                    (Some(g), has_pad)
                }
                Err(_) => (None, false),
            }
        };
        #[cfg(not(feature = "gamepad"))]
        let connected = false;

        GamepadState {
            #[cfg(feature = "gamepad")]
            gilrs: gilrs_opt,
            actions: Vec::with_capacity(4),
            stick: None,
            stick_x: 0.0,
            stick_y: 0.0,
            action_map: ActionMap::default(),
            connected,
        }
    }

    /// Load button mapping from config. Unknown names are skipped; an
    /// entry that resolves to nothing keeps the default.
    pub fn load_button_config(&mut self, cfg: &GamepadConfig) {
        self.action_map = ActionMap::from_config(cfg);
    }

    /// Poll the pad and return the actions triggered since the last call.
    pub fn update(&mut self) -> &[InputAction] {
        self.actions.clear();

        #[cfg(feature = "gamepad")]
        self.poll_gilrs();

        &self.actions
    }

    #[cfg(feature = "gamepad")]
    fn poll_gilrs(&mut self) {
        let gilrs = match &mut self.gilrs {
            Some(g) => g,
            None => return,
        };

        let events: Vec<_> = std::iter::from_fn(|| gilrs.next_event()).collect();

        for event in events {
            match event.event {
                EventType::ButtonPressed(btn, _) => {
                    self.connected = true;
                    self.press_button(btn);
                }
                EventType::AxisChanged(axis, value, _) => {
                    self.connected = true;
                    match axis {
                        Axis::LeftStickX => self.stick_x = value,
                        Axis::LeftStickY => self.stick_y = value,
                        _ => {}
                    }
                }
                EventType::Connected => { self.connected = true; }
                EventType::Disconnected => {
                    self.connected = false;
                    self.stick = None;
                    self.stick_x = 0.0;
                    self.stick_y = 0.0;
                }
                _ => {}
            }
        }

        // Stick: one command when it leaves the deadzone, none while held.
        let now = stick_direction(self.stick_x, self.stick_y);
        if let Some(cmd) = now.filter(|_| now != self.stick) {
            self.actions.push(InputAction::Move(cmd));
        }
        self.stick = now;
    }

    #[cfg(feature = "gamepad")]
    fn press_button(&mut self, gilrs_btn: Button) {
        let dpad = match gilrs_btn {
            Button::DPadUp    => Some(MoveCommand::Up),
            Button::DPadDown  => Some(MoveCommand::Down),
            Button::DPadLeft  => Some(MoveCommand::Left),
            Button::DPadRight => Some(MoveCommand::Right),
            _ => None,
        };
        if let Some(cmd) = dpad {
            self.actions.push(InputAction::Move(cmd));
            return;
        }

        if let Some(btn) = Btn::from_gilrs(gilrs_btn) {
            if let Some(action) = self.action_map.action_for(btn) {
                self.actions.push(action);
            }
        }
    }
}

impl ActionMap {
    fn from_config(cfg: &GamepadConfig) -> Self {
        let mut map = ActionMap::default();
        let q = parse_button_list(&cfg.quit);
        if !q.is_empty() { map.quit = q; }
        let r = parse_button_list(&cfg.restart);
        if !r.is_empty() { map.restart = r; }
        map
    }

    /// Quit wins if a button is bound to both.
    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    fn action_for(&self, btn: Btn) -> Option<InputAction> {
        if self.quit.contains(&btn) {
            Some(InputAction::Quit)
        } else if self.restart.contains(&btn) {
            Some(InputAction::Restart)
        } else {
            None
        }
    }
}

fn parse_button_list(names: &[String]) -> Vec<Btn> {
    names.iter().filter_map(|s| Btn::from_name(s)).collect()
}

/// Dominant stick axis outside the deadzone. gilrs reports +Y as up.
#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
fn stick_direction(x: f32, y: f32) -> Option<MoveCommand> {
    if x.abs() < STICK_DEADZONE && y.abs() < STICK_DEADZONE {
        return None;
    }
    if x.abs() >= y.abs() {
        Some(if x < 0.0 { MoveCommand::Left } else { MoveCommand::Right })
    } else {
        Some(if y > 0.0 { MoveCommand::Up } else { MoveCommand::Down })
    }
}
