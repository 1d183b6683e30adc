// File: src/registry.rs
use crate::error::Result;
use crate::logging::redact_value;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// `[latitude, longitude]`.
pub type Coords = [f64; 2];

/// Case status as reported by the backend. Only `stolen` changes how a
/// result is shown; unknown values are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum VehicleStatus {
    Stolen,
    Suspect,
    Closed,
    Active,
    Other(String),
}

impl VehicleStatus {
    pub fn as_str(&self) -> &str {
        match self {
            VehicleStatus::Stolen => "stolen",
            VehicleStatus::Suspect => "suspect",
            VehicleStatus::Closed => "closed",
            VehicleStatus::Active => "active",
            VehicleStatus::Other(s) => s,
        }
    }

    pub fn is_stolen(&self) -> bool {
        matches!(self, VehicleStatus::Stolen)
    }

    /// Label shown next to the owner: only stolen vehicles are flagged.
    pub fn label(&self) -> &'static str {
        if self.is_stolen() {
            "مسروقة"
        } else {
            "نشطة"
        }
    }
}

impl From<String> for VehicleStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "stolen" => VehicleStatus::Stolen,
            "suspect" => VehicleStatus::Suspect,
            "closed" => VehicleStatus::Closed,
            "active" => VehicleStatus::Active,
            _ => VehicleStatus::Other(s),
        }
    }
}

impl From<VehicleStatus> for String {
    fn from(status: VehicleStatus) -> Self {
        match status {
            VehicleStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

/// A camera hit on the vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sighting {
    pub name: String,
    pub coords: Coords,
    pub time: String,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleRecord {
    pub plate_clean: String,
    pub plate_display: String,
    pub owner: String,
    pub status: VehicleStatus,
    /// Most recent sighting first.
    pub history: Vec<Sighting>,
}

/// The `data` object of a positive lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleReport {
    pub plate: String,
    pub owner: String,
    pub status: VehicleStatus,
    pub path: Vec<Coords>,
    pub history: Vec<Sighting>,
}

impl From<&VehicleRecord> for VehicleReport {
    fn from(record: &VehicleRecord) -> Self {
        Self {
            plate: record.plate_display.clone(),
            owner: record.owner.clone(),
            status: record.status.clone(),
            path: record.history.iter().map(|s| s.coords).collect(),
            history: record.history.clone(),
        }
    }
}

/// Response body of `check_plate`; `data` is omitted when nothing matched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlateLookup {
    pub found: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<VehicleReport>,
}

impl PlateLookup {
    pub fn not_found() -> Self {
        Self {
            found: false,
            data: None,
        }
    }
}

/// Anything able to answer a plate query. Lookups may fail (a remote
/// backend being unreachable, for example).
pub trait PlateDirectory {
    fn check_plate(&self, plate: &str) -> Result<PlateLookup>;
}

/// Lookup key form: no spaces, uppercase.
pub fn clean_plate(plate: &str) -> String {
    plate
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VehicleRegistry {
    records: Vec<VehicleRecord>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl VehicleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<VehicleRecord>) -> Self {
        let mut registry = Self::new();
        for record in records {
            registry.insert(record);
        }
        registry
    }

    /// Inserts or replaces the record with the same cleaned plate.
    pub fn insert(&mut self, mut record: VehicleRecord) {
        record.plate_clean = clean_plate(&record.plate_clean);
        match self.index.get(&record.plate_clean) {
            Some(&idx) => self.records[idx] = record,
            None => {
                self.index.insert(record.plate_clean.clone(), self.records.len());
                self.records.push(record);
            }
        }
    }

    pub fn get(&self, plate: &str) -> Option<&VehicleRecord> {
        self.index.get(&clean_plate(plate)).map(|&idx| &self.records[idx])
    }

    pub fn records(&self) -> &[VehicleRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rebuilds the lookup index after deserialization.
    pub(crate) fn reindex(&mut self) {
        self.index = self
            .records
            .iter()
            .enumerate()
            .map(|(idx, r)| (r.plate_clean.clone(), idx))
            .collect();
    }

    pub fn lookup(&self, plate: &str) -> PlateLookup {
        match self.get(plate) {
            Some(record) => PlateLookup {
                found: true,
                data: Some(VehicleReport::from(record)),
            },
            None => PlateLookup::not_found(),
        }
    }

    /// The vehicles of the Riyadh demo database.
    pub fn demo() -> Self {
        use VehicleStatus::*;
        let today = "اليوم";
        Self::from_records(vec![
            record("9090 RBX", "Khalid Al-Otaibi", Stolen, vec![
                sighting("حي العقيق", AQIQ, "11:30 ص", today),
                sighting("حي الصحافة", SAHAFA, "11:15 ص", today),
                sighting("حي الملقا", MALQA, "10:50 ص", today),
            ]),
            record("1234 ABD", "Mohammed Ahmed", Suspect, vec![
                sighting("حي الملز", MALAZ, "02:00 م", today),
                sighting("حي السليمانية", SULEIMANIYAH, "01:30 م", today),
                sighting("حي العليا", OLAYA, "01:00 م", today),
            ]),
            record("5561 KSA", "Sami Al-Jaber", Stolen, vec![
                sighting("حي الحمراء", HAMRA, "04:30 م", "أمس"),
                sighting("حي القدس", QUDS, "04:00 م", "أمس"),
                sighting("حي الروضة", RAWDAH, "03:45 م", "أمس"),
            ]),
            record("6600 LED", "Fahad Al-Dossari", Closed, vec![
                sighting("حي الشاطئ", QURTUBAH, "09:00 ص", "قبل يومين"),
                sighting("حي قرطبة", QURTUBAH, "08:45 ص", "قبل يومين"),
            ]),
            record("8888 HHH", "VIP Transport", Stolen, vec![
                sighting("حي الصحافة", SAHAFA, "07:15 م", "قبل 3 أيام"),
                sighting("حي النخيل", NAKHIL, "07:00 م", "قبل 3 أيام"),
                sighting("حي حطين", HITTIN, "06:30 م", "قبل 3 أيام"),
            ]),
            record("2020 NSS", "Rental Company", Closed, vec![
                sighting("حي العزيزية", AZIZIYAH, "10:30 ص", "قبل أسبوع"),
                sighting("حي السويدي", SUWAIDI, "10:00 ص", "قبل أسبوع"),
            ]),
            record("506 BUD", "Badr Alshaya", Active, vec![
                sighting("حي الربيع", RABIE, "09:45 م", today),
                sighting("حي الصحافة", SAHAFA, "09:30 م", today),
                sighting("حي الملقا", MALQA, "09:00 م", today),
            ]),
            record("5873 NER", "Hatiam alsheri", Active, vec![
                sighting("حي العزيزية", AZIZIYAH, "09:45 م", today),
                sighting("حي الصحافة", SAHAFA, "09:30 م", today),
                sighting("حي السليمانية", SULEIMANIYAH, "09:00 م", today),
            ]),
        ])
    }
}

impl PlateDirectory for VehicleRegistry {
    fn check_plate(&self, plate: &str) -> Result<PlateLookup> {
        let lookup = self.lookup(plate);
        debug!(plate = redact_value(plate), found = lookup.found, "registry lookup");
        Ok(lookup)
    }
}

// Camera positions (Riyadh districts).
const MALQA: Coords = [24.8105, 46.6112];
const SAHAFA: Coords = [24.7963, 46.6385];
const NAKHIL: Coords = [24.7681, 46.6318];
const HITTIN: Coords = [24.7648, 46.6045];
const AQIQ: Coords = [24.7785, 46.6231];
const RABIE: Coords = [24.7912, 46.6734];
const OLAYA: Coords = [24.6953, 46.6805];
const SULEIMANIYAH: Coords = [24.7011, 46.6978];
const MALAZ: Coords = [24.6632, 46.7382];
const RAWDAH: Coords = [24.7251, 46.7654];
const QUDS: Coords = [24.7432, 46.7541];
const HAMRA: Coords = [24.7689, 46.7582];
const QURTUBAH: Coords = [24.8021, 46.7456];
const SUWAIDI: Coords = [24.5985, 46.6578];
const AZIZIYAH: Coords = [24.5823, 46.7651];

fn record(display: &str, owner: &str, status: VehicleStatus, history: Vec<Sighting>) -> VehicleRecord {
    VehicleRecord {
        plate_clean: clean_plate(display),
        plate_display: display.to_string(),
        owner: owner.to_string(),
        status,
        history,
    }
}

fn sighting(name: &str, coords: Coords, time: &str, date: &str) -> Sighting {
    Sighting {
        name: name.to_string(),
        coords,
        time: time.to_string(),
        date: date.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_ignores_case_and_spaces() {
        let registry = VehicleRegistry::demo();
        assert_eq!(registry.len(), 8);
        let lookup = registry.check_plate("9090 rbx").unwrap();
        assert!(lookup.found);
        let data = lookup.data.unwrap();
        assert_eq!(data.plate, "9090 RBX");
        assert_eq!(data.status, VehicleStatus::Stolen);
        assert_eq!(data.path, vec![AQIQ, SAHAFA, MALQA]);
        assert_eq!(data.history.len(), 3);
    }

    #[test]
    fn three_digit_plates_are_found() {
        let registry = VehicleRegistry::demo();
        assert!(registry.lookup("506BUD").found);
    }

    #[test]
    fn miss_serializes_without_data() {
        let lookup = VehicleRegistry::demo().lookup("0000AAA");
        assert_eq!(serde_json::to_string(&lookup).unwrap(), r#"{"found":false}"#);
    }

    #[test]
    fn hit_serializes_backend_shape() {
        let lookup = VehicleRegistry::demo().lookup("1234ABD");
        let json = serde_json::to_value(&lookup).unwrap();
        assert_eq!(json["found"], true);
        assert_eq!(json["data"]["status"], "suspect");
        assert_eq!(json["data"]["owner"], "Mohammed Ahmed");
        assert_eq!(json["data"]["path"][0][0], 24.6632);
        assert_eq!(json["data"]["history"][0]["name"], "حي الملز");
    }

    #[test]
    fn insert_replaces_existing_plate() {
        let mut registry = VehicleRegistry::demo();
        let mut record = registry.get("8888HHH").unwrap().clone();
        record.status = VehicleStatus::Closed;
        record.plate_clean = "8888 hhh".to_string();
        registry.insert(record);
        assert_eq!(registry.len(), 8);
        assert_eq!(registry.get("8888HHH").unwrap().status, VehicleStatus::Closed);
    }

    #[test]
    fn unknown_status_survives_round_trip() {
        let body = r#"{"found":true,"data":{"plate":"7777 KLM","owner":"Fleet","status":"recovered","path":[[24.7,46.6]],"history":[]}}"#;
        let lookup: PlateLookup = serde_json::from_str(body).unwrap();
        let status = lookup.data.as_ref().unwrap().status.clone();
        assert_eq!(status, VehicleStatus::Other("recovered".into()));
        assert!(!status.is_stolen());
        assert_eq!(status.label(), "نشطة");

        let json = serde_json::to_value(&lookup).unwrap();
        assert_eq!(json["data"]["status"], "recovered");
    }

    #[test]
    fn unknown_status_in_records_still_loads() {
        let mut records = serde_json::to_value(VehicleRegistry::demo().records()).unwrap();
        records[0]["status"] = "impounded".into();
        let records: Vec<VehicleRecord> = serde_json::from_value(records).unwrap();
        let registry = VehicleRegistry::from_records(records);
        assert_eq!(registry.len(), 8);
        assert_eq!(
            registry.get("9090RBX").unwrap().status,
            VehicleStatus::Other("impounded".into())
        );
    }

    #[test]
    fn unknown_status_survives_snapshot_encoding() {
        let status = VehicleStatus::Other("recovered".into());
        let bytes = bincode::serialize(&status).unwrap();
        assert_eq!(bincode::deserialize::<VehicleStatus>(&bytes).unwrap(), status);
    }

    #[test]
    fn status_labels() {
        assert_eq!(VehicleStatus::Stolen.label(), "مسروقة");
        assert_eq!(VehicleStatus::Suspect.label(), "نشطة");
    }
}
