use std::fmt;

use serde::{Deserialize, Serialize};

/// Dwelling classification captured at intake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    Flat,
    House,
    Studio,
    Other,
}

impl PropertyType {
    pub const fn label(self) -> &'static str {
        match self {
            PropertyType::Flat => "flat",
            PropertyType::House => "house",
            PropertyType::Studio => "studio",
            PropertyType::Other => "other",
        }
    }
}

/// Occupancy scenario the certificate is requested for; selects the area threshold.
///
/// Unknown wire values are preserved as `Unrecognized` so the engine stays total; the intake
/// guard rejects them before a case is stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum UseCase {
    FirstOccupancy,
    SecondOccupancy,
    Renovation,
    Unrecognized(String),
}

impl UseCase {
    pub fn wire_value(&self) -> &str {
        match self {
            UseCase::FirstOccupancy => "primera-ocupacion",
            UseCase::SecondOccupancy => "segunda-ocupacion",
            UseCase::Renovation => "renovation",
            UseCase::Unrecognized(raw) => raw.as_str(),
        }
    }

    /// Catalan label used in rule messages and reports.
    pub fn label(&self) -> &'static str {
        match self {
            UseCase::FirstOccupancy => "primera ocupació",
            UseCase::SecondOccupancy | UseCase::Unrecognized(_) => "segona ocupació",
            UseCase::Renovation => "renovació",
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, UseCase::Unrecognized(_))
    }
}

impl From<String> for UseCase {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "primera-ocupacion" | "first-occupancy" => UseCase::FirstOccupancy,
            "segunda-ocupacion" | "second-occupancy" => UseCase::SecondOccupancy,
            "renovation" => UseCase::Renovation,
            _ => UseCase::Unrecognized(value),
        }
    }
}

impl From<UseCase> for String {
    fn from(value: UseCase) -> Self {
        match value {
            UseCase::Unrecognized(raw) => raw,
            other => other.wire_value().to_string(),
        }
    }
}

impl fmt::Display for UseCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_value())
    }
}

/// Structured description of one residential unit.
///
/// Every `Option` means "not evaluated": an absent value is never the same as `false` or zero,
/// and absent fields are omitted on serialization so the distinction survives persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub municipality: String,
    pub region: String,
    pub property_type: PropertyType,
    pub use_case: UseCase,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_built: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub useful_area: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_area: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ceiling_height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_rooms: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_bedrooms: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_bathrooms: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_floors: Option<u32>,

    pub has_kitchen: bool,
    pub has_bathroom: bool,
    pub has_natural_light: bool,
    pub has_ventilation: bool,
    pub has_heating: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_running_water: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_hot_water: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_drainage: Option<bool>,
    #[serde(rename = "hasWC", default, skip_serializing_if = "Option::is_none")]
    pub has_wc: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_shower_or_bath: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_cooking_appliance: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_electrical_installation: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_energy_certificate: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_gas: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_gas_installation: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intended_occupancy: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl PropertyInput {
    /// Minimal record with every optional field absent and every core facility flag `false`.
    pub fn new(
        municipality: impl Into<String>,
        region: impl Into<String>,
        property_type: PropertyType,
        use_case: UseCase,
    ) -> Self {
        Self {
            address: None,
            municipality: municipality.into(),
            region: region.into(),
            property_type,
            use_case,
            year_built: None,
            useful_area: None,
            total_area: None,
            ceiling_height: None,
            num_rooms: None,
            num_bedrooms: None,
            num_bathrooms: None,
            num_floors: None,
            has_kitchen: false,
            has_bathroom: false,
            has_natural_light: false,
            has_ventilation: false,
            has_heating: false,
            has_running_water: None,
            has_hot_water: None,
            has_drainage: None,
            has_wc: None,
            has_shower_or_bath: None,
            has_cooking_appliance: None,
            has_electrical_installation: None,
            has_energy_certificate: None,
            has_gas: None,
            has_gas_installation: None,
            intended_occupancy: None,
            notes: None,
        }
    }
}

/// Input field a rule reads, named exactly as on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EvidenceField {
    UsefulArea,
    UseCase,
    CeilingHeight,
    HasKitchen,
    HasBathroom,
    HasNaturalLight,
    HasVentilation,
    HasHeating,
    IntendedOccupancy,
    NumRooms,
    NumFloors,
    HasRunningWater,
    HasHotWater,
    HasDrainage,
    #[serde(rename = "hasWC")]
    HasWc,
    HasShowerOrBath,
    HasCookingAppliance,
    HasElectricalInstallation,
    HasEnergyCertificate,
    HasGas,
    HasGasInstallation,
}

impl EvidenceField {
    pub const fn name(self) -> &'static str {
        match self {
            EvidenceField::UsefulArea => "usefulArea",
            EvidenceField::UseCase => "useCase",
            EvidenceField::CeilingHeight => "ceilingHeight",
            EvidenceField::HasKitchen => "hasKitchen",
            EvidenceField::HasBathroom => "hasBathroom",
            EvidenceField::HasNaturalLight => "hasNaturalLight",
            EvidenceField::HasVentilation => "hasVentilation",
            EvidenceField::HasHeating => "hasHeating",
            EvidenceField::IntendedOccupancy => "intendedOccupancy",
            EvidenceField::NumRooms => "numRooms",
            EvidenceField::NumFloors => "numFloors",
            EvidenceField::HasRunningWater => "hasRunningWater",
            EvidenceField::HasHotWater => "hasHotWater",
            EvidenceField::HasDrainage => "hasDrainage",
            EvidenceField::HasWc => "hasWC",
            EvidenceField::HasShowerOrBath => "hasShowerOrBath",
            EvidenceField::HasCookingAppliance => "hasCookingAppliance",
            EvidenceField::HasElectricalInstallation => "hasElectricalInstallation",
            EvidenceField::HasEnergyCertificate => "hasEnergyCertificate",
            EvidenceField::HasGas => "hasGas",
            EvidenceField::HasGasInstallation => "hasGasInstallation",
        }
    }

    /// Whether the input carries a value for this field. Required fields are always present.
    pub fn is_present(self, input: &PropertyInput) -> bool {
        match self {
            EvidenceField::UseCase
            | EvidenceField::HasKitchen
            | EvidenceField::HasBathroom
            | EvidenceField::HasNaturalLight
            | EvidenceField::HasVentilation
            | EvidenceField::HasHeating => true,
            EvidenceField::UsefulArea => input.useful_area.is_some(),
            EvidenceField::CeilingHeight => input.ceiling_height.is_some(),
            EvidenceField::IntendedOccupancy => input.intended_occupancy.is_some(),
            EvidenceField::NumRooms => input.num_rooms.is_some(),
            EvidenceField::NumFloors => input.num_floors.is_some(),
            EvidenceField::HasRunningWater => input.has_running_water.is_some(),
            EvidenceField::HasHotWater => input.has_hot_water.is_some(),
            EvidenceField::HasDrainage => input.has_drainage.is_some(),
            EvidenceField::HasWc => input.has_wc.is_some(),
            EvidenceField::HasShowerOrBath => input.has_shower_or_bath.is_some(),
            EvidenceField::HasCookingAppliance => input.has_cooking_appliance.is_some(),
            EvidenceField::HasElectricalInstallation => {
                input.has_electrical_installation.is_some()
            }
            EvidenceField::HasEnergyCertificate => input.has_energy_certificate.is_some(),
            EvidenceField::HasGas => input.has_gas.is_some(),
            EvidenceField::HasGasInstallation => input.has_gas_installation.is_some(),
        }
    }
}

impl fmt::Display for EvidenceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
