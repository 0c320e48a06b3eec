//! Data-driven tuning loaded from RON files under `assets/data/`.

pub mod loader;
pub mod validation;

use bevy::prelude::*;
use std::path::Path;

use crate::movement::resources::MovementTuning;

pub struct ContentPlugin;

impl Plugin for ContentPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, load_movement_tuning);
    }
}

/// Replaces the default tuning resource with `assets/data/movement.ron` when
/// that file exists. A missing file is fine (compiled-in defaults stay live);
/// a file that fails to parse or validate aborts startup, since silently
/// running with half-applied tuning is worse than not running.
fn load_movement_tuning(
    mut tuning: ResMut<MovementTuning>,
    mut exit: MessageWriter<AppExit>,
) {
    let base_path = Path::new("assets/data");

    let loaded = match loader::load_movement_tuning(base_path) {
        Ok(Some(loaded)) => loaded,
        Ok(None) => {
            warn!("No assets/data/movement.ron found, using default tuning");
            return;
        }
        Err(e) => {
            error!("{}", e);
            exit.write(AppExit::error());
            return;
        }
    };

    let errors = validation::validate_tuning(&loaded);
    if !errors.is_empty() {
        for e in &errors {
            error!("{}", e);
        }
        error!(
            "movement.ron failed validation with {} error(s)",
            errors.len()
        );
        exit.write(AppExit::error());
        return;
    }

    info!("Loaded movement tuning from assets/data/movement.ron");
    *tuning = loaded;
}
