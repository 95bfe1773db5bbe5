//! Costume Lights CLI - Encode block patterns and sample timelines from JSON files.

use std::fs;
use std::path::Path;

use costume_lights::{
    animation::TimelinePlayer,
    compute::{ActionTable, BlockPattern, FramePayload},
    schema::{BodyPart, CellIndex, Color, EditorConfig, Grid, PartSlot, PartSlots},
};

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage(&args[0]);
        std::process::exit(1);
    }

    match args[1].as_str() {
        "--example" => print_example(),
        "encode" if args.len() >= 3 => encode(&args[2]),
        "decode" if args.len() >= 3 => decode(&args[2], args.get(3)),
        "sample" if args.len() >= 4 => {
            let player: usize = parse_or_exit(&args[3], "player index");
            let step_ms: u32 = args
                .get(4)
                .map(|s| parse_or_exit(s, "step"))
                .unwrap_or(50);
            sample(&args[2], player, step_ms, args.get(5));
        }
        _ => {
            print_usage(&args[0]);
            std::process::exit(1);
        }
    }
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} <command> [arguments]", program);
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  encode <pattern.json>                     Encode a block pattern to a payload");
    eprintln!("  decode <payload.json> [config.json]       Decode a payload to a block pattern");
    eprintln!("  sample <table.json> <player> [step_ms] [config.json]");
    eprintln!("                                            Sample a player's timeline (default step: 50)");
    eprintln!("  --example                                 Print example configuration and pattern");
}

fn parse_or_exit<T: std::str::FromStr>(value: &str, what: &str) -> T {
    value.parse().unwrap_or_else(|_| {
        eprintln!("Invalid {}: {}", what, value);
        std::process::exit(1);
    })
}

fn read_or_exit(path: &str, what: &str) -> String {
    fs::read_to_string(Path::new(path)).unwrap_or_else(|e| {
        eprintln!("Error reading {} file: {}", what, e);
        std::process::exit(1);
    })
}

fn load_config(path: Option<&String>) -> EditorConfig {
    let Some(path) = path else {
        return EditorConfig::default();
    };

    let config_str = read_or_exit(path, "config");
    let config: EditorConfig = serde_json::from_str(&config_str).unwrap_or_else(|e| {
        eprintln!("Error parsing config: {}", e);
        std::process::exit(1);
    });

    if let Err(e) = config.validate() {
        eprintln!("Invalid config: {}", e);
        std::process::exit(1);
    }
    config
}

fn encode(path: &str) {
    let pattern_str = read_or_exit(path, "pattern");
    let pattern: BlockPattern = serde_json::from_str(&pattern_str).unwrap_or_else(|e| {
        eprintln!("Error parsing pattern: {}", e);
        std::process::exit(1);
    });

    let payload = FramePayload::from_pattern(&pattern);
    log::info!("Encoded pattern into {} digits", payload.color.len());

    match payload.to_json() {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error writing payload: {}", e);
            std::process::exit(1);
        }
    }
}

fn decode(path: &str, config_path: Option<&String>) {
    let config = load_config(config_path);
    let payload_str = read_or_exit(path, "payload");

    let pattern = FramePayload::from_json(&payload_str)
        .and_then(|payload| payload.to_pattern(config.codec.default_alpha))
        .unwrap_or_else(|e| {
            eprintln!("Error decoding payload: {}", e);
            std::process::exit(1);
        });

    let lit = Grid::serpentine()
        .filter(|&cell| pattern.grid.get(cell).is_some_and(|c| !c.is_black()))
        .count();
    log::info!("Decoded pattern with {} lit cells", lit);

    match serde_json::to_string_pretty(&pattern) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error writing pattern: {}", e);
            std::process::exit(1);
        }
    }
}

fn sample(path: &str, player: usize, step_ms: u32, config_path: Option<&String>) {
    let config = load_config(config_path);
    let file = fs::File::open(path).unwrap_or_else(|e| {
        eprintln!("Error reading table file: {}", e);
        std::process::exit(1);
    });
    let table = ActionTable::read_from(std::io::BufReader::new(file)).unwrap_or_else(|e| {
        eprintln!("Error parsing table: {}", e);
        std::process::exit(1);
    });

    println!("Costume Lights Timeline");
    println!("=======================");
    println!("Players: {}", table.player_count());
    println!("Player: {}", player);
    println!("Duration: {}ms", config.timeline.duration);
    println!("Step: {}ms", step_ms);
    println!();

    for part in BodyPart::ALL {
        if let Some(track) = table.track(player, part) {
            println!("  {:<14} {} keyframes", part.name(), track.len());
        }
    }
    println!();

    let sampler = TimelinePlayer::new(&table, player, step_ms, config.timeline.duration)
        .unwrap_or_else(|e| {
            eprintln!("Error sampling timeline: {}", e);
            std::process::exit(1);
        });

    let list = sampler.to_light_list();
    match serde_json::to_string(&list) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error writing light list: {}", e);
            std::process::exit(1);
        }
    }
}

fn print_example() {
    let config = EditorConfig::default();

    let mut grid = Grid::new();
    for col in 0..16 {
        if let Ok(painted) = grid.painted(CellIndex::new(4, 8, col), Color::RED) {
            grid = painted;
        }
    }
    let slots = PartSlots::default()
        .with(PartSlot::Head, Color::WHITE)
        .with(PartSlot::Body, Color::BLUE);
    let pattern = BlockPattern::new(grid, slots);

    println!("Example configuration (config.json):");
    print_json(&config);
    println!();
    println!("Example payload (payload.json):");
    print_json(&FramePayload::from_pattern(&pattern));
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error writing example: {}", e),
    }
}
