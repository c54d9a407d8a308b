use std::env;
use std::fs;
use std::io::{self, BufRead};
use std::process;
use std::sync::mpsc;
use std::thread;

use gauge::{Gauge, GaugeCommand, GaugeConfig, GaugeError};
use log::{debug, warn};

const USAGE: &str = "usage: gauge [--segments N] [--colors c1,c2,...] [--title T] [--value V] \
[--percent P] [--dark] [--width W] [--font PATH] [--svg]";

struct Options {
    config: GaugeConfig,
    svg: bool,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Options, String> {
    let mut config = GaugeConfig::default();
    let mut svg = false;

    fn value_of(flag: &str, value: Option<String>) -> Result<String, String> {
        value.ok_or_else(|| format!("{flag} needs a value"))
    }

    fn number_of<T: std::str::FromStr>(flag: &str, value: Option<String>) -> Result<T, String> {
        let raw = value_of(flag, value)?;
        raw.trim()
            .parse()
            .map_err(|_| format!("{flag}: '{raw}' is not a valid number"))
    }

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--segments" => config.number_of_segments = number_of(&arg, args.next())?,
            "--colors" => {
                config.colors = value_of(&arg, args.next())?
                    .split(',')
                    .map(|c| c.trim().to_string())
                    .filter(|c| !c.is_empty())
                    .collect();
            }
            "--title" => config.title = value_of(&arg, args.next())?,
            "--value" => config.display_value = value_of(&arg, args.next())?,
            "--percent" => config.percent = number_of(&arg, args.next())?,
            "--dark" => config.dark_mode = true,
            "--width" => config.window_width = number_of(&arg, args.next())?,
            "--font" => {
                let path = value_of(&arg, args.next())?;
                let data = fs::read(&path).map_err(|err| format!("--font {path}: {err}"))?;
                config.font_data = Some(data);
            }
            "--svg" => svg = true,
            "-h" | "--help" => return Err(USAGE.to_string()),
            other => return Err(format!("unknown argument '{other}'\n{USAGE}")),
        }
    }

    Ok(Options { config, svg })
}

fn print_svg(config: GaugeConfig) -> Result<(), GaugeError> {
    let width = f64::from(config.window_width);
    let mut gauge = Gauge::new(config)?;
    gauge.on_layout(width);
    gauge.settle();
    if let Some(scene) = gauge.render() {
        println!("{}", scene.to_svg());
    }
    Ok(())
}

fn run_window(config: GaugeConfig) -> Result<(), GaugeError> {
    let gauge = Gauge::new(config)?;
    let (sender, receiver) = mpsc::channel();

    // one percent per line; the thread ends when stdin closes or the window is gone
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else {
                break;
            };
            match line.trim().parse::<f64>() {
                Ok(percent) => {
                    debug!("stdin percent {percent}");
                    if sender.send(GaugeCommand::SetPercent(percent)).is_err() {
                        break;
                    }
                }
                Err(_) => warn!("ignoring non-numeric input line '{}'", line.trim()),
            }
        }
    });

    gauge.show_with_commands(receiver)
}

fn main() {
    env_logger::init();

    let options = match parse_args(env::args().skip(1)) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("{message}");
            process::exit(2);
        }
    };

    let result = if options.svg {
        print_svg(options.config)
    } else {
        run_window(options.config)
    };

    if let Err(err) = result {
        eprintln!("gauge: {err}");
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Options, String> {
        parse_args(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn parses_all_flags() {
        let options = parse(&[
            "--segments", "5", "--colors", "red, blue", "--title", "Load", "--value", "42",
            "--percent", "42", "--dark", "--width", "400", "--svg",
        ])
        .unwrap();
        assert!(options.svg);
        let config = options.config;
        assert_eq!(config.number_of_segments, 5);
        assert_eq!(config.colors, vec!["red", "blue"]);
        assert_eq!(config.title, "Load");
        assert_eq!(config.display_value, "42");
        assert_eq!(config.percent, 42.0);
        assert!(config.dark_mode);
        assert_eq!(config.window_width, 400);
    }

    #[test]
    fn defaults_without_flags() {
        let options = parse(&[]).unwrap();
        assert!(!options.svg);
        assert_eq!(options.config, GaugeConfig::default());
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse(&["--segments"]).is_err());
        assert!(parse(&["--segments", "many"]).is_err());
        assert!(parse(&["--bogus"]).is_err());
    }
}
