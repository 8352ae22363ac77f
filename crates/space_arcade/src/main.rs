//! Space Arcade
//!
//! Usage: `space_arcade [config.toml]`

use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;

use arcade_engine::foundation::logging;
use arcade_engine::prelude::*;
use arcade_engine::render::{HeadlessRenderer, Window};
use space_arcade::app::SpaceArcade;
use space_arcade::config::GameConfig;
use space_arcade::error::GameError;

const DEFAULT_CONFIG_PATH: &str = "space_arcade.toml";

/// Frames a headless run lasts when the config sets no limit
const DEFAULT_HEADLESS_FRAMES: u64 = 600;

fn main() {
    if let Err(e) = run() {
        log::error!("Space Arcade stopped: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), GameError> {
    let config_path = std::env::args()
        .nth(1)
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    let config = GameConfig::load_or_default(&config_path);
    logging::init_with_level(&config.logging.level);

    let mut game = SpaceArcade::new(config.clone())?;
    game.load_campaign_level(config.campaign.start_level)?;
    let mut renderer = HeadlessRenderer::new();

    if config.window.headless {
        run_headless(&mut game, &mut renderer, &config);
    } else {
        let window = Window::new(config.window.width, config.window.height, &config.window.title)?;
        run_windowed(&mut game, &mut renderer, window, config.simulation.max_frames);
    }

    log::info!("Rendered {} frame(s), {} draw(s)", renderer.frames(), renderer.total_draws());
    game.shutdown();
    Ok(())
}

fn run_headless(game: &mut SpaceArcade, renderer: &mut HeadlessRenderer, config: &GameConfig) {
    let frames = match config.simulation.max_frames {
        0 => {
            log::warn!("Headless run without a frame limit, stopping after {} frames", DEFAULT_HEADLESS_FRAMES);
            DEFAULT_HEADLESS_FRAMES
        }
        limit => limit,
    };
    let camera = SpaceArcade::camera(1.0);
    for _ in 0..frames {
        game.step(config.simulation.fixed_timestep);
        game.render(Some(&camera), renderer);
    }
}

fn run_windowed(game: &mut SpaceArcade, renderer: &mut HeadlessRenderer, mut window: Window, max_frames: u64) {
    let escape = Rc::new(Cell::new(false));
    let pressed = Rc::clone(&escape);
    window.events_mut().key.subscribe(move |event| {
        if event.key == glfw::Key::Escape && event.action == glfw::Action::Press {
            pressed.set(true);
        }
    });

    let mut timer = Timer::new();
    let mut frames = 0_u64;
    while !window.should_close() {
        window.poll_events();
        if escape.get() {
            window.mark_for_close();
        }

        timer.update();
        game.step(timer.delta_time());
        game.render(Some(&SpaceArcade::camera(window.aspect())), renderer);
        window.swap_buffers();

        frames += 1;
        if max_frames != 0 && frames >= max_frames {
            window.mark_for_close();
        }
    }
    log::info!("Average {:.1} fps", timer.average_fps());
}
