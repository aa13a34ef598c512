// Demonstrates driving a spiral session headlessly from attribute edits:
// a click grows the spiral, a size edit rebuilds the template, a second
// click unwinds the spiral.

use std::time::Duration;

use bevy::{app::ScheduleRunnerPlugin, log::LogPlugin, prelude::*};
use bevy_spiral_cubes::prelude::*;

fn main() {
    App::new()
        .add_plugins((
            MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_millis(16))),
            LogPlugin::default(),
            SpiralPlugin::default(),
        ))
        .add_systems(Startup, setup)
        .add_systems(Update, script)
        .run();
}

fn setup(mut commands: Commands) {
    commands.spawn((DynamicAttributes::new(100.0), SpiralSession::new()));
}

// Plays a short interaction script against the one watched dictionary.
fn script(
    mut frame: Local<u32>,
    mut dictionaries: Query<&mut DynamicAttributes>,
    instances: Query<(), With<CubeInstance>>,
    mut exit: EventWriter<AppExit>,
) {
    *frame += 1;
    match *frame {
        2 | 90 => {
            for mut attrs in &mut dictionaries {
                attrs.interact();
            }
        }
        80 => {
            for mut attrs in &mut dictionaries {
                attrs.set("size", "40");
            }
        }
        170 => {
            info!("instances remaining: {}", instances.iter().count());
            exit.write(AppExit::Success);
        }
        _ => {}
    }
}
