use polykeys::{AppConfig, AudioContext, ControlPanel, KeyLayout, KeyboardEngine, Polysynth};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

struct Args {
    terminal: bool,
    config: Option<PathBuf>,
}

impl Args {
    fn parse() -> Self {
        let mut args = Args {
            terminal: false,
            config: None,
        };
        for arg in std::env::args().skip(1) {
            match arg.as_str() {
                "--terminal" | "-t" => args.terminal = true,
                _ => args.config = Some(PathBuf::from(arg)),
            }
        }
        args
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("polykeys=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> polykeys::Result<()> {
    let config = AppConfig::load_or_default(args.config.as_deref())?;
    let layout = KeyLayout::from_config(&config.keyboard)?;

    let context = AudioContext::new()?;
    let synth = Polysynth::new(&context, &config.synth)?;
    let keyboard = KeyboardEngine::new(layout, synth)?;

    if args.terminal {
        polykeys::terminal::run(keyboard)
    } else {
        let controls = ControlPanel::mirror(keyboard.engine());
        polykeys::ui::run(keyboard, controls)
    }
}
