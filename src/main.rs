#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

use tracing_subscriber::EnvFilter;

use crate::dungeon::{Config, Dungeon, GenError};

mod dungeon;

fn main() -> Result<(), GenError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config {
        width: 50,
        height: 20,
        num_rooms: 10,
        max_room_size: 8,
    };
    let mut dungeon_generator = Dungeon::new(config)?;
    print!("{}", dungeon_generator.generate());
    Ok(())
}
