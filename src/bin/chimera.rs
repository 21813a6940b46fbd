#[macro_use]
extern crate clap;

use std::fs;
use std::process;

use clap::{App, Arg};

use chimera::config::GameConfig;
use chimera::{notation, split_legs, Engine};

fn main() {
    env_logger::init();
    let matches = App::new("chimera")
        .version(crate_version!())
        .author(crate_authors!())
        .about("Fairy chess rule engine")
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .value_name("FILE")
                .help("Game configuration to load (JSON), defaults to the orthodox setup")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("replay")
                .short("r")
                .long("replay")
                .value_name("FILE")
                .help("Notation file to replay, one half-turn per block")
                .takes_value(true),
        )
        .get_matches();

    let config = match matches.value_of("config") {
        Some(path) => {
            let text = fs::read_to_string(path).unwrap_or_else(|err| {
                eprintln!("cannot read {}: {}", path, err);
                process::exit(1);
            });
            GameConfig::from_json(&text).unwrap_or_else(|err| {
                eprintln!("cannot parse {}: {}", path, err);
                process::exit(1);
            })
        }
        None => GameConfig::orthodox(),
    };

    let mut engine = Engine::new();
    if let Err(err) = engine.load(&config) {
        eprintln!("load failed: {}", err);
        process::exit(1);
    }

    if let Some(path) = matches.value_of("replay") {
        let text = fs::read_to_string(path).unwrap_or_else(|err| {
            eprintln!("cannot read {}: {}", path, err);
            process::exit(1);
        });
        let moves = notation::parse(engine.registry(), &text);
        for leg in split_legs(&moves) {
            if let Err(err) = engine.make_move(leg) {
                eprintln!("replay rejected: {}", err);
                process::exit(1);
            }
        }
    }

    print!("{}", engine.board());
    let log = notation::serialize(engine.moves());
    if !log.is_empty() {
        println!();
        println!("{}", log);
    }
}
