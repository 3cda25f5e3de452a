use screen_observer::CaptureRegion;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    /// Poll until the duration elapses (or forever)
    Watch,
    /// Single synchronous check
    Once,
}

#[derive(Debug)]
pub struct Args {
    pub mode: Mode,
    pub template: PathBuf,
    pub frame: Option<PathBuf>,
    /// Overrides the strict preset's threshold
    pub threshold: Option<f64>,
    pub region: Option<CaptureRegion>,
    pub period_secs: f64,
    pub duration_secs: Option<f64>,
    pub debug_mode: bool,
}

impl Args {
    pub fn parse() -> Option<Self> {
        Self::parse_from(env::args().skip(1))
    }

    pub fn parse_from(args: impl IntoIterator<Item = String>) -> Option<Self> {
        let mut mode = Mode::Watch;
        let mut template: Option<PathBuf> = None;
        let mut frame: Option<PathBuf> = None;
        let mut threshold: Option<f64> = None;
        let mut region: Option<CaptureRegion> = None;
        let mut period_secs: f64 = 1.0;
        let mut duration_secs: Option<f64> = None;
        let mut debug_mode: bool = false;

        for arg in args {
            if arg == "--help" || arg == "-h" {
                print_help();
                return None;
            } else if arg == "--version" || arg == "-v" {
                println!("Screen Observer v{}", env!("CARGO_PKG_VERSION"));
                return None;
            } else if arg == "--debug" {
                debug_mode = true;
            } else if arg == "--once" {
                mode = Mode::Once;
            } else if let Some(val) = arg.strip_prefix("--template=") {
                template = Some(PathBuf::from(val));
            } else if let Some(val) = arg.strip_prefix("--frame=") {
                frame = Some(PathBuf::from(val));
            } else if let Some(val) = arg.strip_prefix("--threshold=") {
                match val.parse::<f64>() {
                    Ok(t) if (0.0..=1.0).contains(&t) => threshold = Some(t),
                    _ => {
                        eprintln!("❌ Invalid threshold '{}', expected a number in 0.0-1.0", val);
                        return None;
                    }
                }
            } else if let Some(val) = arg.strip_prefix("--region=") {
                match CaptureRegion::parse(val) {
                    Some(r) if r.has_area() => region = Some(r),
                    _ => {
                        eprintln!("❌ Invalid region '{}', expected x,y,width,height", val);
                        return None;
                    }
                }
            } else if let Some(val) = arg.strip_prefix("--period=") {
                match parse_seconds(val) {
                    Some(secs) => period_secs = secs,
                    None => {
                        eprintln!("❌ Invalid period value: {}", val);
                        return None;
                    }
                }
            } else if let Some(val) = arg.strip_prefix("--duration=") {
                match parse_seconds(val) {
                    Some(secs) => duration_secs = Some(secs),
                    None => {
                        eprintln!("❌ Invalid duration value: {}", val);
                        return None;
                    }
                }
            } else {
                eprintln!("❌ Unknown argument: {}", arg);
                print_help();
                return None;
            }
        }

        let Some(template) = template else {
            eprintln!("❌ Missing --template=PATH");
            print_help();
            return None;
        };

        Some(Args {
            mode,
            template,
            frame,
            threshold,
            region,
            period_secs,
            duration_secs,
            debug_mode,
        })
    }
}

/// Positive, finite number of seconds
fn parse_seconds(val: &str) -> Option<f64> {
    val.parse::<f64>()
        .ok()
        .filter(|secs| secs.is_finite() && *secs > 0.0)
}

fn print_help() {
    println!("👀 Screen Observer");
    println!();
    println!("USAGE:");
    println!("    screen-observer --template=PATH [FLAGS]");
    println!();
    println!("FLAGS:");
    println!("    --template=PATH     Template image (RGB, or RGBA with alpha used as weight mask)");
    println!("    --frame=PATH        Watch an image file instead of the screen");
    println!("    --threshold=F       Minimum similarity 0.0-1.0 (default: 0.95)");
    println!("    --region=x,y,w,h    Only search this area of the frame");
    println!("    --period=SECS       Time between checks (default: 1)");
    println!("    --duration=SECS     Stop after SECS (default: run until killed)");
    println!("    --once              Check once, print the match and exit");
    println!("    --debug             Enable debug logging");
    println!("    --help, -h          Show this help message");
    println!("    --version, -v       Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    screen-observer --template=button.png --period=0.5");
    println!("    screen-observer --template=icon.png --frame=shot.png --once");
    println!("    screen-observer --template=icon.png --region=0,0,800,600 --duration=5");
}
