mod args;

use args::{Args, Mode};
use screen_observer::{
    EventKind, FrameSource, ImageFileSource, Observer, ObserverConfig, ObserverResult, Template,
    observer::strict_config,
};
use std::time::Duration;

fn main() {
    let Some(args) = Args::parse() else {
        return;
    };

    let default_level = if args.debug_mode { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    if let Err(e) = run(args) {
        eprintln!("❌ {e}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> ObserverResult<()> {
    let template = Template::open(&args.template)?;
    let mut config = args
        .threshold
        .map(ObserverConfig::new)
        .unwrap_or_else(strict_config);
    println!(
        "🖼️ Template {} loaded (threshold {:.2})",
        template.display_name(),
        config.threshold
    );

    if let Some(region) = args.region {
        config = config.with_region(region);
    }

    let Some(source) = frame_source(&args) else {
        eprintln!("❌ Screen capture not available in this build; use --frame=PATH or build with --features screen");
        std::process::exit(2);
    };
    let mut observer = Observer::new(template, config, source);

    observer.subscribe(EventKind::Found, |location| println!("Found at {location}"));
    observer.subscribe(EventKind::Moved, |location| println!("Moved to {location}"));
    observer.subscribe(EventKind::Lost, |location| println!("Lost at {location}"));

    match args.mode {
        Mode::Once => {
            let result = observer.check()?;
            println!("🔍 Best match {}", result.describe());
            if observer.tick()?.is_none() {
                println!("👀 Not found");
            }
            Ok(())
        }
        Mode::Watch => {
            let period = Duration::from_secs_f64(args.period_secs);
            let duration = args.duration_secs.map(Duration::from_secs_f64);

            let rt = match tokio::runtime::Runtime::new() {
                Ok(rt) => rt,
                Err(e) => {
                    eprintln!("❌ Failed to start tokio runtime: {e}");
                    std::process::exit(1);
                }
            };
            rt.block_on(async move {
                observer.start(period)?;
                match duration {
                    Some(duration) => tokio::time::sleep(duration).await,
                    None => std::future::pending::<()>().await,
                }
                observer.stop().await
            })
        }
    }
}

fn frame_source(args: &Args) -> Option<Box<dyn FrameSource>> {
    if let Some(path) = &args.frame {
        let source = ImageFileSource::new(path);
        println!("📂 Watching frames from {}", source.path().display());
        return Some(Box::new(source));
    }
    screen_source()
}

#[cfg(feature = "screen")]
fn screen_source() -> Option<Box<dyn FrameSource>> {
    println!("🖥️ Watching the primary display");
    Some(Box::new(screen_observer::ScreenSource::new()))
}

#[cfg(not(feature = "screen"))]
fn screen_source() -> Option<Box<dyn FrameSource>> {
    None
}
