// File: src/bridge.rs
//! Line protocol spoken by `plate_bridge`.
//!
//! One command per input line; the reply is one line per [`UiEffect`]
//! followed by `DONE`, including error replies.

use crate::controller::{status_summary, PlateController, UiEffect, UiEvent};
use crate::core::types::PlateField;
use crate::registry::PlateDirectory;
use serde_json::json;
use std::time::Instant;
use tracing::{debug, warn};

pub const DONE: &str = "DONE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeCommand {
    Event(UiEvent),
    Exit,
    /// Blank line, nothing to answer.
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolError {
    UnknownField,
    UnknownCommand,
}

impl ProtocolError {
    pub fn reply(self) -> &'static str {
        match self {
            ProtocolError::UnknownField => "ERROR unknown field",
            ProtocolError::UnknownCommand => "ERROR unknown command",
        }
    }
}

/// Parses `EDIT <FIELD> <text>`, `SUBMIT`, `RESET`, `TICK` or `EXIT`.
/// Edit text keeps its inner spaces.
pub fn parse_command(line: &str) -> Result<BridgeCommand, ProtocolError> {
    let mut parts = line.splitn(3, ' ');
    let command = parts.next().unwrap_or("");
    let event = match command {
        "EDIT" => {
            let field = parts
                .next()
                .and_then(PlateField::from_wire_name)
                .ok_or(ProtocolError::UnknownField)?;
            UiEvent::Edit {
                field,
                raw: parts.next().unwrap_or("").to_string(),
            }
        }
        "SUBMIT" => UiEvent::Submit,
        "RESET" => UiEvent::Reset,
        "TICK" => UiEvent::Tick,
        "EXIT" => return Ok(BridgeCommand::Exit),
        "" => return Ok(BridgeCommand::Empty),
        _ => return Err(ProtocolError::UnknownCommand),
    };
    Ok(BridgeCommand::Event(event))
}

pub fn effect_line(effect: &UiEffect) -> String {
    match effect {
        UiEffect::SetField { field, value } => format!("SET_FIELD {field} {value}"),
        UiEffect::ShowMessage(text) => format!("SHOW_MESSAGE {text}"),
        UiEffect::ClearMessage => "CLEAR_MESSAGE".to_string(),
        UiEffect::MarkError(field) => format!("MARK_ERROR {field}"),
        UiEffect::ClearErrorMarks => "CLEAR_ERROR_MARKS".to_string(),
        UiEffect::ShowVehicle { display, report } => {
            let body = json!({
                "display": display,
                "summary": status_summary(report),
                "report": report,
            });
            format!("VEHICLE {body}")
        }
        UiEffect::NotFound { hint } => format!("NOT_FOUND {hint}"),
        UiEffect::ConnectivityAlert(text) => format!("CONNECTIVITY_ALERT {text}"),
    }
}

/// What the bridge writes back for one input line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Reply {
    pub lines: Vec<String>,
    pub exit: bool,
}

/// Runs one input line against the controller.
pub fn respond<D: PlateDirectory>(
    controller: &mut PlateController<D>,
    line: &str,
    now: Instant,
) -> Reply {
    debug!(command = line.split_whitespace().next().unwrap_or(""), "bridge <-");
    match parse_command(line) {
        Ok(BridgeCommand::Event(event)) => {
            let mut lines: Vec<String> = controller
                .handle(event, now)
                .iter()
                .map(effect_line)
                .collect();
            lines.push(DONE.to_string());
            Reply { lines, exit: false }
        }
        Ok(BridgeCommand::Exit) => Reply {
            lines: Vec::new(),
            exit: true,
        },
        Ok(BridgeCommand::Empty) => Reply::default(),
        Err(e) => {
            warn!(error = ?e, "rejected bridge command");
            Reply {
                lines: vec![e.reply().to_string(), DONE.to_string()],
                exit: false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlateConfig;
    use crate::registry::VehicleRegistry;

    fn controller() -> PlateController<VehicleRegistry> {
        PlateController::new(&PlateConfig::default(), VehicleRegistry::demo())
    }

    #[test]
    fn edit_replies_with_field_mirror_and_done() {
        let mut ctl = controller();
        let reply = respond(&mut ctl, "EDIT NUM_EN 1 2 3 4", Instant::now());
        assert_eq!(
            reply.lines,
            vec!["SET_FIELD NUM_EN 1 2 3 4", "SET_FIELD NUM_AR ١ ٢ ٣ ٤", "DONE"]
        );
        assert!(!reply.exit);
    }

    #[test]
    fn every_field_name_parses() {
        for (name, field) in [
            ("NUM_AR", PlateField::NumbersArabic),
            ("NUM_EN", PlateField::NumbersLatin),
            ("CHAR_AR", PlateField::LettersArabic),
            ("CHAR_EN", PlateField::LettersLatin),
        ] {
            assert_eq!(
                parse_command(&format!("EDIT {name} x")),
                Ok(BridgeCommand::Event(UiEvent::Edit {
                    field,
                    raw: "x".into()
                }))
            );
        }
    }

    #[test]
    fn found_vehicle_is_one_json_line() {
        let mut ctl = controller();
        let now = Instant::now();
        respond(&mut ctl, "EDIT NUM_EN 9090", now);
        respond(&mut ctl, "EDIT CHAR_EN rbx", now);
        let reply = respond(&mut ctl, "SUBMIT", now);

        assert_eq!(reply.lines.len(), 2);
        assert_eq!(reply.lines[1], DONE);
        let body = reply.lines[0].strip_prefix("VEHICLE ").unwrap();
        let value: serde_json::Value = serde_json::from_str(body).unwrap();
        assert_eq!(value["display"], "9090 RBX");
        assert_eq!(value["report"]["status"], "stolen");
        assert_eq!(value["report"]["path"].as_array().unwrap().len(), 3);
        assert!(value["summary"].as_str().unwrap().contains("Khalid Al-Otaibi"));
    }

    #[test]
    fn incomplete_submit_marks_arabic_fields() {
        let mut ctl = controller();
        let reply = respond(&mut ctl, "SUBMIT", Instant::now());
        assert_eq!(reply.lines.len(), 4);
        assert!(reply.lines[0].starts_with("SHOW_MESSAGE "));
        assert_eq!(reply.lines[1], "MARK_ERROR NUM_AR");
        assert_eq!(reply.lines[2], "MARK_ERROR CHAR_AR");
        assert_eq!(reply.lines[3], DONE);
    }

    #[test]
    fn errors_are_terminated_with_done() {
        let mut ctl = controller();
        let now = Instant::now();
        assert_eq!(
            respond(&mut ctl, "FLY away", now).lines,
            vec!["ERROR unknown command", "DONE"]
        );
        assert_eq!(
            respond(&mut ctl, "EDIT PLATE 12", now).lines,
            vec!["ERROR unknown field", "DONE"]
        );
        assert_eq!(
            respond(&mut ctl, "EDIT", now).lines,
            vec!["ERROR unknown field", "DONE"]
        );
    }

    #[test]
    fn exit_and_blank_lines_write_nothing() {
        let mut ctl = controller();
        let now = Instant::now();
        assert_eq!(
            respond(&mut ctl, "EXIT", now),
            Reply {
                lines: vec![],
                exit: true
            }
        );
        assert_eq!(respond(&mut ctl, "", now), Reply::default());
    }
}
