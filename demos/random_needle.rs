use gauge::{Gauge, GaugeCommand, GaugeConfig};
use rand::Rng;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = GaugeConfig::builder()
        .number_of_segments(5)
        .colors(vec!["#2ecc71".to_string(), "#e74c3c".to_string()])
        .title("Random load")
        .window_width(400)
        .build();

    let gauge = Gauge::new(config)?;

    let (sender, receiver) = mpsc::channel();

    thread::spawn(move || {
        let mut rng = rand::rng();
        loop {
            let percent: f64 = rng.random_range(0.0..100.0);
            let commands = [
                GaugeCommand::SetPercent(percent),
                GaugeCommand::SetDisplayValue(format!("{percent:.0}%")),
            ];

            // the window was closed
            if commands.into_iter().any(|cmd| sender.send(cmd).is_err()) {
                break;
            }

            thread::sleep(Duration::from_millis(1500));
        }
    });

    println!("Displaying a gauge with a randomly moving pointer");
    println!("Press Ctrl+C or close the window to exit");

    gauge.show_with_commands(receiver)?;
    Ok(())
}
