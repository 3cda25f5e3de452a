// Watch the primary display for test.png for five seconds, printing every event.
//
// cargo run --example observe_screen --features screen -- path/to/test.png
use screen_observer::{EventKind, Observer, ObserverConfig, ScreenSource, Template};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let path = std::env::args().nth(1).unwrap_or_else(|| "test.png".to_string());
    let template = Template::open(&path)?;

    let mut observer = Observer::new(template, ObserverConfig::new(0.95), ScreenSource::new());
    observer.subscribe(EventKind::Found, |location| println!("Found at {location}"));
    observer.subscribe(EventKind::Moved, |location| println!("Moved to {location}"));
    observer.subscribe(EventKind::Lost, |location| println!("Lost at {location}"));

    observer.start(Duration::from_secs(1))?;
    tokio::time::sleep(Duration::from_secs(5)).await;
    observer.stop().await?;

    Ok(())
}
