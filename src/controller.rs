// File: src/controller.rs
use crate::config::PlateConfig;
use crate::core::context::PlateFieldState;
use crate::core::engine::PlateTransliterationEngine;
use crate::core::types::{CompletenessPolicy, Plate, PlateField};
use crate::logging::redact_value;
use crate::registry::{PlateDirectory, VehicleReport};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

pub const MSG_INCOMPLETE_PLATE: &str = "الرجاء إدخال رقم اللوحة كاملاً (٤ أرقام و ٣ أحرف)";
pub const MSG_EMPTY_PLATE: &str = "الرجاء إدخال رقم اللوحة أو الأحرف";
pub const MSG_CONNECTIVITY: &str = "حدث خطأ في الاتصال بالنظام";
/// Plate suggested to the user when a search finds nothing.
pub const NOT_FOUND_HINT: &str = "9090 RBX";

/// Fields outlined in red while a validation notice is up.
pub const ERROR_MARKED_FIELDS: [PlateField; 2] =
    [PlateField::NumbersArabic, PlateField::LettersArabic];

/// Something the user did to the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    Edit { field: PlateField, raw: String },
    Submit,
    Reset,
    /// Lets time pass so a pending notice can expire.
    Tick,
}

/// Something the UI layer must render.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEffect {
    SetField { field: PlateField, value: String },
    ShowMessage(String),
    ClearMessage,
    MarkError(PlateField),
    ClearErrorMarks,
    ShowVehicle { display: String, report: VehicleReport },
    NotFound { hint: &'static str },
    ConnectivityAlert(&'static str),
}

#[derive(Debug, Clone)]
struct Notice {
    text: String,
    expires_at: Instant,
}

/// Owns the form state and turns [`UiEvent`]s into [`UiEffect`]s.
pub struct PlateController<D> {
    engine: PlateTransliterationEngine,
    fields: PlateFieldState,
    directory: D,
    notice: Option<Notice>,
    notice_timeout: Duration,
}

impl<D: PlateDirectory> PlateController<D> {
    pub fn new(config: &PlateConfig, directory: D) -> Self {
        Self {
            engine: PlateTransliterationEngine::from_config(config),
            fields: PlateFieldState::new(),
            directory,
            notice: None,
            notice_timeout: config.notice_timeout(),
        }
    }

    pub fn engine(&self) -> &PlateTransliterationEngine {
        &self.engine
    }

    pub fn fields(&self) -> &PlateFieldState {
        &self.fields
    }

    pub fn directory(&self) -> &D {
        &self.directory
    }

    /// The validation message currently displayed, if any.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_ref().map(|n| n.text.as_str())
    }

    pub fn handle(&mut self, event: UiEvent, now: Instant) -> Vec<UiEffect> {
        let mut effects = self.expire_notice(now);
        match event {
            UiEvent::Edit { field, raw } => self.edit(field, &raw, &mut effects),
            UiEvent::Submit => self.submit(now, &mut effects),
            UiEvent::Reset => self.reset(&mut effects),
            UiEvent::Tick => {}
        }
        effects
    }

    fn edit(&mut self, field: PlateField, raw: &str, effects: &mut Vec<UiEffect>) {
        let update = self.fields.apply_edit(&self.engine, field, raw);
        debug!(
            field = %field,
            value = redact_value(&update.source),
            mirror = redact_value(&update.target),
            "field updated"
        );
        effects.push(UiEffect::SetField {
            field,
            value: update.source,
        });
        effects.push(UiEffect::SetField {
            field: field.mirror(),
            value: update.target,
        });
    }

    fn submit(&mut self, now: Instant, effects: &mut Vec<UiEffect>) {
        let plate = self.fields.plate();
        let result = self.engine.validate_complete(&plate.digits, &plate.letters);

        if !result.is_pass() {
            let text = match self.engine.policy() {
                CompletenessPolicy::Strict => MSG_INCOMPLETE_PLATE,
                CompletenessPolicy::NonEmpty => MSG_EMPTY_PLATE,
            };
            warn!(
                digits = plate.digits.chars().count(),
                letters = plate.letters.chars().count(),
                "plate rejected on submit"
            );
            // A second failure before expiry only pushes the deadline back.
            self.notice = Some(Notice {
                text: text.to_string(),
                expires_at: now + self.notice_timeout,
            });
            effects.push(UiEffect::ShowMessage(text.to_string()));
            effects.extend(ERROR_MARKED_FIELDS.into_iter().map(UiEffect::MarkError));
            return;
        }

        if self.notice.take().is_some() {
            effects.push(UiEffect::ClearMessage);
            effects.push(UiEffect::ClearErrorMarks);
        }
        self.lookup(&plate, effects);
    }

    fn lookup(&self, plate: &Plate, effects: &mut Vec<UiEffect>) {
        let query = plate.query();
        info!(plate = redact_value(&query), "searching plate");
        match self.directory.check_plate(&query) {
            Ok(lookup) => match lookup.data {
                Some(report) if lookup.found => {
                    info!(sightings = report.path.len(), "vehicle found");
                    effects.push(UiEffect::ShowVehicle {
                        display: plate.display(),
                        report,
                    });
                }
                _ => {
                    info!("vehicle not found");
                    effects.push(UiEffect::NotFound {
                        hint: NOT_FOUND_HINT,
                    });
                }
            },
            Err(e) => {
                error!(error = %e, "plate lookup failed");
                effects.push(UiEffect::ConnectivityAlert(MSG_CONNECTIVITY));
            }
        }
    }

    fn reset(&mut self, effects: &mut Vec<UiEffect>) {
        self.fields.clear();
        if self.notice.take().is_some() {
            effects.push(UiEffect::ClearMessage);
            effects.push(UiEffect::ClearErrorMarks);
        }
        effects.extend(PlateField::ALL.into_iter().map(|field| UiEffect::SetField {
            field,
            value: String::new(),
        }));
    }

    fn expire_notice(&mut self, now: Instant) -> Vec<UiEffect> {
        match &self.notice {
            Some(notice) if notice.expires_at <= now => {
                self.notice = None;
                vec![UiEffect::ClearMessage, UiEffect::ClearErrorMarks]
            }
            _ => Vec::new(),
        }
    }
}

/// Status block shown beside the map for a found vehicle.
pub fn status_summary(report: &VehicleReport) -> String {
    format!(
        "المالك: {}\nالحالة: {}\nتم رصد المسار ({} نقاط)",
        report.owner,
        report.status.label(),
        report.path.len()
    )
}
