use clap::Parser;
use client::grid::TileMap;
use client::network::Connection;
use client::session::Session;
use log::info;
use macroquad::prelude::{next_frame, Conf};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// WebSocket URL of the game server
    #[arg(short = 's', long, default_value = "ws://127.0.0.1:3001")]
    server: String,

    /// Map width in tiles
    #[arg(long, default_value = "20")]
    map_width: i32,

    /// Map height in tiles
    #[arg(long, default_value = "15")]
    map_height: i32,

    /// Tile edge length in pixels
    #[arg(short = 't', long, default_value = "32")]
    tile_size: f32,
}

fn window_conf() -> Conf {
    Conf {
        window_title: "gridwalk".to_string(),
        window_width: 800,
        window_height: 600,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let args = Args::parse();

    info!("Starting client...");
    info!("Connecting to: {}", args.server);
    info!("Controls: arrow keys to move");

    let connection = Connection::open(&args.server);
    let map = TileMap::bordered(args.map_width, args.map_height);
    let mut session = Session::new(connection, map, args.tile_size);

    loop {
        session.tick();
        next_frame().await;
    }
}
