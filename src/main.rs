use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use glam::Vec2;
use log::{debug, info};
use winit::keyboard::KeyCode;

use rusted_knight::engine::assets::AssetLoader;
use rusted_knight::engine::game_loop::GameLoop;
use rusted_knight::engine::input::{InputManager, InputSource};
use rusted_knight::engine::physics::DebugDraw;
use rusted_knight::game::arena::Arena;
use rusted_knight::game::characters::{
    HitData, KnightConfig, KnightController, KnightEvent, KnightSaveData, SceneTransition,
    SpawnPoint, StateId,
};

const FRAME_TIME: Duration = Duration::from_micros(16_667);

const ASSET_DIR: &str = "assets";
const CONFIG_NAME: &str = "knight.ron";
const SAVE_NAME: &str = "knight.ron";

/// Scripted key timeline: (frame, key, pressed)
const SCRIPT: &[(u64, KeyCode, bool)] = &[
    // Walk up to the dummy and run the ground combo
    (30, KeyCode::ArrowRight, true),
    (75, KeyCode::ArrowRight, false),
    (80, KeyCode::KeyX, true),
    (81, KeyCode::KeyX, false),
    (100, KeyCode::KeyX, true),
    (101, KeyCode::KeyX, false),
    // Jump into the aerial chain
    (150, KeyCode::Space, true),
    (160, KeyCode::Space, false),
    (168, KeyCode::KeyX, true),
    (169, KeyCode::KeyX, false),
    (192, KeyCode::KeyX, true),
    (193, KeyCode::KeyX, false),
    (216, KeyCode::KeyX, true),
    (217, KeyCode::KeyX, false),
    // Roll away, crouch and slide back
    (280, KeyCode::ArrowLeft, true),
    (282, KeyCode::ShiftLeft, true),
    (283, KeyCode::ShiftLeft, false),
    (300, KeyCode::ArrowLeft, false),
    (330, KeyCode::ArrowDown, true),
    (345, KeyCode::ShiftLeft, true),
    (346, KeyCode::ShiftLeft, false),
    (390, KeyCode::ArrowDown, false),
    // Directional dash and a thrust
    (420, KeyCode::ArrowRight, true),
    (422, KeyCode::ControlLeft, true),
    (423, KeyCode::ControlLeft, false),
    (440, KeyCode::ArrowRight, false),
    (460, KeyCode::KeyV, true),
    (461, KeyCode::KeyV, false),
];

const DEMO_FRAMES: u64 = 560;

/// Frame at which a dummy strikes back
const COUNTER_FRAME: u64 = 500;

const ENTRY_FRAMES: u64 = 60;

fn run_frames(
    frames: std::ops::Range<u64>,
    arena: &mut Arena,
    knight: &mut KnightController,
    input: &mut InputManager,
    game_loop: &mut GameLoop,
) {
    let mut last_state = knight.state();

    for frame in frames {
        for (_, key, pressed) in SCRIPT.iter().filter(|(at, ..)| *at == frame) {
            let source = InputSource::key(*key);
            if *pressed {
                input.press_source(source);
            } else {
                input.release_source(source);
            }
        }

        if frame == COUNTER_FRAME {
            let counter = HitData::new(25.0, Vec2::new(-4.0, 3.0));
            if !knight.take_hit(counter) {
                info!("Counter hit ignored at frame {frame}");
            }
        }

        let tick = game_loop.advance(FRAME_TIME);
        for _ in 0..tick.physics_steps {
            knight.physics_update(game_loop.fixed_timestep());
            arena.step(knight);
        }
        knight.update(tick.delta, input.player());
        input.update();

        let state = knight.state();
        if state != last_state {
            let from = last_state.unwrap_or(StateId::Validation);
            info!("[{frame:>4}] {from:?} -> {:?}", state.unwrap_or(StateId::Validation));
            last_state = state;
        }

        for event in knight.drain_events() {
            match event {
                KnightEvent::Hurt(hit) => info!("[{frame:>4}] Knight hurt for {}", hit.damage),
                KnightEvent::Died => info!("[{frame:>4}] Knight died"),
                other => debug!("[{frame:>4}] {other:?}"),
            }
        }
    }
}

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("Starting Rusted Knight...");

    let loader = AssetLoader::new(ASSET_DIR);
    let config = Arc::new(KnightConfig::load_or_default(&loader, CONFIG_NAME));

    let mut arena = Arena::training_ground(&config);
    let mut knight = arena.spawn_knight(Arc::clone(&config));
    let mut input = InputManager::new();
    let mut game_loop = GameLoop::new();

    run_frames(0..DEMO_FRAMES, &mut arena, &mut knight, &mut input, &mut game_loop);

    for dummy in arena.dummies() {
        info!(
            "Dummy {}: {}/{} life after {} hits",
            dummy.entity, dummy.life, dummy.max_life, dummy.hits_taken
        );
    }

    let mut gizmos = DebugDraw::new();
    knight.debug_gizmos(&mut gizmos);
    gizmos.draw_world(arena.physics().borrow().debug_data());
    debug!("Collected {} debug lines", gizmos.lines().len());

    // Carry the knight through a side door into a fresh arena
    let save = knight.before_unload();
    save.store(&loader, SAVE_NAME).context("Failed to write knight save")?;
    let save = KnightSaveData::load(&loader, SAVE_NAME).context("Failed to read knight save")?;

    let mut next_arena = Arena::training_ground(&config);
    let mut next_knight = next_arena.spawn_knight(Arc::clone(&config));
    next_knight.on_scene_transition(&SceneTransition {
        spawn: SpawnPoint {
            position: Vec2::new(-15.0, 1.0),
            facing_right: true,
            horizontal_door: true,
        },
        save,
    });
    next_arena.reset_contacts();

    let entry = DEMO_FRAMES + 1..DEMO_FRAMES + 1 + ENTRY_FRAMES;
    run_frames(entry, &mut next_arena, &mut next_knight, &mut input, &mut game_loop);

    info!(
        "Demo finished after {} frames / {} physics steps: {:?} with {} life",
        game_loop.frame_count(),
        game_loop.update_count(),
        next_knight.state(),
        next_knight.runtime().life().current_value()
    );
    Ok(())
}
