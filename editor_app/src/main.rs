//! Headless editing session
//!
//! Builds a small scene, runs the usual editing operations on it and prints
//! the draw calls of the resulting frame. Useful to watch the editor core
//! work without a window: `RUST_LOG=debug cargo run --bin vis_demo`.

use std::path::Path;

use serde::{Deserialize, Serialize};
use vis_editor::prelude::*;
use vis_runtime::foundation::logging;

const CONFIG_FILE: &str = "editor.toml";

/// Window state remembered between sessions
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SessionSettings {
    last_cursor: (f32, f32),
    runs: u32,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self { last_cursor: (0.0, 0.0), runs: 0 }
    }
}

fn load_assets(assets: &mut MemoryAssets) -> Vec<AssetDescriptor> {
    vec![
        assets.add_texture("gfx/tree", 128.0, 256.0),
        assets.add_texture("gfx/rock", 64.0, 64.0),
        assets.add_font(AssetDescriptor::BmpFont { path: "font/pixel.fnt".into() }, 16.0),
        assets.add_particle("particle/smoke.p", Rect::new(-32.0, 0.0, 64.0, 128.0)),
        AssetDescriptor::path("sound/wind.wav"),
        AssetDescriptor::path("music/theme.ogg"),
    ]
}

fn build_scene(scene: &mut SceneContext, cursor: (f32, f32)) -> EditorResult<Vec<Entity>> {
    let palette = load_assets(&mut scene.assets);
    let mut placed = Vec::new();
    for (index, asset) in palette.iter().enumerate() {
        #[allow(clippy::cast_precision_loss)]
        let x = cursor.0 + index as f32 * 2.0;
        if let Some(entity) = scene.process_drop(asset, x, cursor.1)? {
            placed.push(entity);
        }
    }
    log::info!("Placed {} entities", placed.len());
    Ok(placed)
}

fn edit(scene: &mut SceneContext, placed: &[Entity]) -> EditorResult<()> {
    let [tree, rock, label, ..] = placed else {
        log::warn!("Not enough entities to edit");
        return Ok(());
    };

    scene.select(EntityProxy::Single(*tree))?;
    scene.select_append(EntityProxy::Single(*rock))?;
    scene.group_selection()?;
    log::info!("Selection after grouping: {:?}", scene.selection.selection());

    scene.select_append(EntityProxy::Single(*label))?;
    scene.group_selection()?;
    scene.enter_group()?;
    log::info!("Entered group, breadcrumb {:?}", scene.selection.breadcrumb().hierarchy());

    scene.copy()?;
    scene.paste(10.0, 5.0)?;
    scene.move_selected(0.5, 0.0)?;
    scene.move_selected_z(true)?;

    scene.breadcrumb_root_clicked();
    scene.undo()?;
    scene.redo()?;
    if let Some(name) = scene.undo.undo_name() {
        log::info!("Next undo: {name}");
    }
    Ok(())
}

fn reload_in_background(scene: &mut SceneContext) -> EditorResult<()> {
    let task = AsyncTask::spawn("asset scan", |reporter: &TaskReporter| -> Result<(), String> {
        for step in 1..=4u8 {
            if reporter.is_cancelled() {
                return Err("cancelled".into());
            }
            reporter.progress(step * 25);
        }
        reporter.message("Textures changed");
        Ok(())
    });

    for update in task.wait() {
        match update {
            TaskUpdate::Progress(percent) => log::debug!("Asset scan {percent}%"),
            TaskUpdate::Message(text) => scene.status.set_text(&text),
            TaskUpdate::Finished => scene.send_event(EditorEvent::TexturesReloaded)?,
            TaskUpdate::Failed(error) => log::error!("Asset scan failed: {error}"),
        }
    }
    Ok(())
}

fn run(config: &EditorConfig) -> Result<(), Box<dyn std::error::Error>> {
    let settings = SettingsIo::new(&config.settings_dir);
    let mut session: SessionSettings = settings.load("session");
    session.runs += 1;

    let mut scene = SceneContext::new(config);
    let placed = build_scene(&mut scene, session.last_cursor)?;
    edit(&mut scene, &placed)?;
    reload_in_background(&mut scene)?;

    let mut batch = RecordingBatch::new();
    scene.render_frame(&mut batch)?;
    for call in batch.calls() {
        log::info!("{call:?}");
    }
    log::info!("Render stats: {:?}", scene.render.stats());

    session.last_cursor = (1.0, 1.0);
    if let Err(error) = settings.save("session", &session) {
        log::warn!("Could not save session settings: {error}");
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = EditorConfig::load_or_default(Path::new(CONFIG_FILE))?;

    if let Err(error) = logging::init_with_level(&config.log_level) {
        eprintln!("Logging already initialised: {error}");
    }

    log::info!("Starting Vis editor demo session");
    match run(&config) {
        Ok(()) => {
            log::info!("Demo session completed successfully");
            Ok(())
        }
        Err(e) => {
            log::error!("Demo session failed: {e}");
            Err(e)
        }
    }
}
