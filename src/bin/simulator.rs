use clap::Parser;
use crossterm::{
    cursor::MoveTo,
    execute,
    style::Stylize,
    terminal::{Clear, ClearType},
};
use plate_core::controller::status_summary;
use plate_core::logging::{init_logging, LogConfig};
use plate_core::persistence::open_registry;
use plate_core::registry::VehicleRegistry;
use plate_core::{PlateConfig, PlateController, PlateField, UiEffect, UiEvent};
use std::collections::HashSet;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;

/// Interactive plate form in the terminal.
#[derive(Parser, Debug)]
#[command(name = "plate_simulator", version)]
struct Cli {
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    registry: Option<PathBuf>,
    /// Logs are kept off the screen; send them to a file.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

/// What the screen currently shows besides the fields.
#[derive(Default)]
struct Screen {
    message: Option<String>,
    marked: HashSet<PlateField>,
    result: Option<String>,
}

impl Screen {
    fn apply(&mut self, effect: UiEffect) {
        match effect {
            UiEffect::SetField { .. } => {}
            UiEffect::ShowMessage(text) => self.message = Some(text),
            UiEffect::ClearMessage => self.message = None,
            UiEffect::MarkError(field) => {
                self.marked.insert(field);
            }
            UiEffect::ClearErrorMarks => self.marked.clear(),
            UiEffect::ShowVehicle { display, report } => {
                self.result = Some(format!("{display}\n{}", status_summary(&report)));
            }
            UiEffect::NotFound { hint } => {
                self.result = Some(format!("لم يتم العثور على المركبة (جرب {hint})"));
            }
            UiEffect::ConnectivityAlert(text) => self.result = Some(text.to_string()),
        }
    }
}

fn main() -> plate_core::Result<()> {
    let cli = Cli::parse();
    if cli.log_file.is_some() {
        init_logging(&LogConfig::from_verbosity(2).with_log_file(cli.log_file.clone()))?;
    }

    let config = match &cli.config {
        Some(path) => PlateConfig::load(path)?,
        None => PlateConfig::default(),
    };
    let registry_path = cli.registry.as_deref().or(config.registry_path.as_deref());
    let mut controller = PlateController::new(&config, open_registry(registry_path)?);
    let mut screen = Screen::default();

    let stdin = io::stdin();
    print_ui(&controller, &screen)?;

    for line in stdin.lock().lines() {
        let input = line?;
        let (cmd, rest) = input.split_once(' ').unwrap_or((input.as_str(), ""));
        let event = match cmd {
            "exit" => break,
            ":s" => UiEvent::Submit,
            ":r" => {
                screen.result = None;
                UiEvent::Reset
            }
            "" => UiEvent::Tick,
            "na" | "ne" | "la" | "le" => UiEvent::Edit {
                field: field_for(cmd),
                raw: rest.to_string(),
            },
            _ => UiEvent::Tick,
        };
        for effect in controller.handle(event, Instant::now()) {
            screen.apply(effect);
        }
        print_ui(&controller, &screen)?;
    }
    Ok(())
}

fn field_for(cmd: &str) -> PlateField {
    match cmd {
        "na" => PlateField::NumbersArabic,
        "ne" => PlateField::NumbersLatin,
        "la" => PlateField::LettersArabic,
        _ => PlateField::LettersLatin,
    }
}

fn print_ui(controller: &PlateController<VehicleRegistry>, screen: &Screen) -> io::Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, Clear(ClearType::All), MoveTo(0, 0))?;
    writeln!(stdout, "{}", "Plate Search Simulator".bold())?;
    writeln!(stdout, "---------------------------------------------------------------")?;
    writeln!(stdout, "na/ne <digits>  la/le <letters>  :s search  :r reset  exit")?;
    writeln!(stdout)?;

    for (label, field) in [
        ("digits  (ar)", PlateField::NumbersArabic),
        ("digits  (en)", PlateField::NumbersLatin),
        ("letters (ar)", PlateField::LettersArabic),
        ("letters (en)", PlateField::LettersLatin),
    ] {
        let value = format!("[{}]", controller.fields().get(field));
        if screen.marked.contains(&field) {
            writeln!(stdout, "  {label}: {}", value.as_str().red())?;
        } else {
            writeln!(stdout, "  {label}: {}", value.as_str().cyan())?;
        }
    }

    if let Some(message) = &screen.message {
        writeln!(stdout, "\n{}", message.as_str().red().bold())?;
    }
    if let Some(result) = &screen.result {
        writeln!(stdout, "\n{}", result.as_str().green())?;
    }
    write!(stdout, "\n> ")?;
    stdout.flush()
}
