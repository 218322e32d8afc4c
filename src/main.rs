/// Entry point and game loop.

mod config;
mod domain;
mod sim;
mod ui;

use std::fs::File;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::GameConfig;
use domain::error::GameError;
use domain::rules::Outcome;
use sim::event::GameEvent;
use sim::level::{load_level, LevelDef};
use sim::queue::{command_queue, CommandReceiver, CommandSender};
use sim::step::Scheduler;
use sim::world::WorldState;
use ui::gamepad::GamepadState;
use ui::input::{InputAction, InputState};
use ui::renderer::{Hud, Renderer};

const FRAME_SLEEP: Duration = Duration::from_millis(5);

fn main() {
    let config = GameConfig::load();

    if let Err(e) = init_tracing(&config) {
        eprintln!("Log init failed: {e}");
    }
    for w in &config.warnings {
        warn!("{w}");
    }

    let level = match load_level(&config) {
        Ok(level) => level,
        Err(e) if e.is_invalid_map() => {
            error!(error = %e, "map file is malformed");
            eprintln!("Map file is malformed: {e}");
            return;
        }
        Err(e) => {
            error!(error = %e, "could not load map");
            eprintln!("Could not load map: {e}");
            return;
        }
    };

    let mut rng = match config.spawn.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };

    let mut session = match Session::start(&level, &config, &mut rng) {
        Ok(s) => s,
        Err(e) => {
            error!(error = %e, "could not start session");
            eprintln!("Could not start game: {e}");
            return;
        }
    };

    let mut renderer = Renderer::new();

    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let (tx, rx) = command_queue();
    let result = game_loop(&mut session, &level, &mut rng, &tx, &rx, &mut renderer, &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        error!(error = %e, "game loop aborted");
        eprintln!("Game error: {e}");
    }

    println!();
    match session.scheduler.outcome() {
        Outcome::PlayerWins => println!("You won!!"),
        Outcome::PursuerWins => println!("Bot won!!"),
        Outcome::InProgress => println!("Game abandoned."),
    }
}

/// Route tracing to `general.log_file` if set. The terminal is in raw
/// alternate-screen mode while playing, so nothing goes to stdout/stderr.
fn init_tracing(config: &GameConfig) -> std::io::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("diamondchase=info"));

    let file_layer = match &config.log_file {
        Some(path) => {
            let file = File::create(path)?;
            Some(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .init();
    Ok(())
}

// ── Session ──

/// One game from spawn to outcome.
struct Session {
    world: WorldState,
    scheduler: Scheduler,
    message: String,
}

impl Session {
    fn start(level: &LevelDef, config: &GameConfig, rng: &mut ChaCha8Rng) -> Result<Self, GameError> {
        let world = WorldState::spawn(level.map.clone(), rng, config.spawn.max_attempts)?;
        Ok(Session {
            world,
            scheduler: Scheduler::new(),
            message: String::new(),
        })
    }

    fn apply_events(&mut self, events: &[GameEvent]) {
        for event in events {
            match event {
                GameEvent::PlayerMoved { .. } => self.message.clear(),
                GameEvent::PlayerBumped { .. } => self.message = "Bump! A wall is in the way.".into(),
                GameEvent::PursuerStalled { .. } => self.message = "The bot cannot reach you.".into(),
                GameEvent::Collision { at } => debug!(%at, "tokens overlap"),
                _ => {}
            }
        }
    }
}

fn game_loop(
    session: &mut Session,
    level: &LevelDef,
    rng: &mut ChaCha8Rng,
    tx: &CommandSender,
    rx: &CommandReceiver,
    renderer: &mut Renderer,
    config: &GameConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);
    if gp.connected {
        info!("gamepad connected");
    }

    let mut last_tick = Instant::now();
    let tick_rate = Duration::from_millis(config.speed.tick_rate_ms);

    loop {
        let mut actions: Vec<InputAction> = kb.drain_events().to_vec();
        actions.extend_from_slice(gp.update());

        let mut quit = false;
        for action in actions {
            match action {
                InputAction::Quit => quit = true,
                InputAction::Move(cmd) if !session.scheduler.outcome().is_terminal() => {
                    if !tx.push(cmd) {
                        debug!(?cmd, "command queue closed, move dropped");
                    }
                }
                InputAction::Move(_) => {}
                InputAction::Restart if session.scheduler.outcome().is_terminal() => {
                    *session = Session::start(level, config, rng)?;
                    rx.clear();
                    renderer.invalidate();
                    info!("new session");
                }
                InputAction::Restart => {}
            }
        }
        if quit {
            info!(outcome = ?session.scheduler.outcome(), "quit");
            break;
        }

        if last_tick.elapsed() >= tick_rate {
            let report = session.scheduler.tick(&mut session.world, rx);
            if !report.idle {
                session.apply_events(&report.events);
            }
            last_tick = Instant::now();
        }

        let hud = Hud {
            level_name: &level.name,
            outcome: session.scheduler.outcome(),
            moves: session.scheduler.transitions(),
            message: &session.message,
        };
        renderer.render(&session.world, &hud)?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}
