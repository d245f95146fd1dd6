//! A guard patrols a small level, chases the player and replans after a
//! destructible block is removed.
//!
//! Run: cargo run --bin chase [-- config.json]
//! Set RUST_LOG=debug to watch the refresh protocol.

use tilenav_core::Point;
use tilenav_demos::AsciiMap;
use tilenav_world::{FollowerSettings, GridConfig, GridManager, Guard, GuardSettings, Obstacles};

const LEVEL: &str = "
##########
#1.....~2#
#.######.#
#G..+P.~.#
#...#....#
#4.....~3#
##########
";

const PATROL_TICKS: usize = 40;
const DT: f32 = 0.1;

fn main() {
    env_logger::init();

    let base = match std::env::args().nth(1) {
        Some(path) => match GridConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        },
        None => GridConfig::default(),
    };

    let map: AsciiMap = match LEVEL.parse() {
        Ok(map) => map,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    let (Some(guard_cell), Some(player_cell)) = (map.guard(), map.player()) else {
        eprintln!("Error: level needs a guard and a player");
        std::process::exit(1);
    };

    let config = map.config(base);
    if let Err(e) = config.validate() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
    let layout = config.layout();
    let (obstacles, blocks) = map.obstacles(&layout);
    let mut manager = GridManager::new(config, obstacles);

    let settings = GuardSettings::default();
    let follower = manager.follower(
        layout.cell_to_world_center(guard_cell),
        FollowerSettings::default(),
    );
    let mut guard = Guard::new(follower, map.waypoint_positions(&layout), settings);
    guard.start_patrol();

    println!("Patrolling for {PATROL_TICKS} ticks:");
    for _ in 0..PATROL_TICKS {
        guard.update(DT);
    }
    show(&manager, &guard, player_cell);

    let player = layout.cell_to_world_center(player_cell);
    guard.chase(player);
    println!(
        "Player spotted, chase path is {} cells:",
        guard.follower().remaining().len()
    );
    show(&manager, &guard, player_cell);

    log::info!("chase: destroying {} destructible blocks", blocks.len());
    for id in blocks {
        manager.destroy_obstacle(id);
    }
    guard.update(0.0);
    println!(
        "Block destroyed, replanned path is {} cells:",
        guard.follower().remaining().len()
    );
    show(&manager, &guard, player_cell);

    let mut ticks = 0;
    while !guard.follower().is_idle() {
        guard.update(DT);
        ticks += 1;
    }
    println!("Caught the player after {ticks} ticks.");
    guard.lose_target();
    show(&manager, &guard, player_cell);
}

fn show(manager: &GridManager<Obstacles>, guard: &Guard, player: Point) {
    let here = guard.follower().cell();
    let path: Vec<Point> = guard.follower().remaining().collect();
    let text = manager.last_scan().render_with(|p| {
        if p == here {
            Some('G')
        } else if p == player {
            Some('P')
        } else if path.contains(&p) {
            Some('*')
        } else {
            None
        }
    });
    println!("{text}");
}
