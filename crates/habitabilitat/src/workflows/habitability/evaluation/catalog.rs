use serde::Serialize;

use super::rules::{dimensions, facilities, installations};
use super::RuleOutcome;
use crate::workflows::habitability::domain::{EvidenceField, PropertyInput};

/// Version tag of [`CATALOG`]. Any change to a threshold, a rule's membership, or the order of
/// the catalog must bump it: persisted results are only comparable within one version.
pub const RULESET_VERSION: &str = "2.0.0-catalonia";

/// Named unit of habitability logic. `id` is a stable join key across historical results and
/// is never reused for a different meaning.
#[derive(Debug)]
pub struct Rule {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub evidence_needed: &'static [EvidenceField],
    evaluate: fn(&PropertyInput) -> RuleOutcome,
}

impl Rule {
    pub const fn new(
        id: &'static str,
        name: &'static str,
        description: &'static str,
        evidence_needed: &'static [EvidenceField],
        evaluate: fn(&PropertyInput) -> RuleOutcome,
    ) -> Self {
        Self {
            id,
            name,
            description,
            evidence_needed,
            evaluate,
        }
    }

    pub fn evaluate(&self, input: &PropertyInput) -> RuleOutcome {
        (self.evaluate)(input)
    }

    /// Names of the needed fields that `input` actually carries, in declaration order.
    pub fn evidence_used(&self, input: &PropertyInput) -> Vec<String> {
        self.evidence_needed
            .iter()
            .filter(|field| field.is_present(input))
            .map(|field| field.name().to_string())
            .collect()
    }

    pub fn summary(&self) -> RuleSummary {
        RuleSummary {
            id: self.id,
            name: self.name,
            description: self.description,
            evidence_needed: self
                .evidence_needed
                .iter()
                .map(|field| field.name())
                .collect(),
        }
    }
}

/// Display view of a catalog entry.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSummary {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub evidence_needed: Vec<&'static str>,
}

static CATALOG: [Rule; 18] = [
    Rule::new(
        "min-useful-area",
        "Superfície útil mínima",
        "La superfície útil mínima varia segons el tipus d'ocupació",
        &[EvidenceField::UsefulArea, EvidenceField::UseCase],
        dimensions::min_useful_area,
    ),
    Rule::new(
        "min-ceiling-height",
        "Alçada mínima del sostre",
        "L'alçada mínima del sostre ha de ser de 2,5 metres",
        &[EvidenceField::CeilingHeight],
        dimensions::min_ceiling_height,
    ),
    Rule::new(
        "kitchen-required",
        "Cuina obligatòria",
        "L'habitatge ha de tenir una cuina",
        &[EvidenceField::HasKitchen],
        facilities::kitchen_required,
    ),
    Rule::new(
        "bathroom-required",
        "Bany obligatori",
        "L'habitatge ha de tenir un bany",
        &[EvidenceField::HasBathroom],
        facilities::bathroom_required,
    ),
    Rule::new(
        "natural-light",
        "Il·luminació natural",
        "L'habitatge ha de tenir il·luminació natural en les habitacions principals",
        &[EvidenceField::HasNaturalLight],
        facilities::natural_light,
    ),
    Rule::new(
        "ventilation",
        "Ventilació",
        "L'habitatge ha de tenir ventilació adequada",
        &[EvidenceField::HasVentilation],
        facilities::ventilation,
    ),
    Rule::new(
        "occupancy-density",
        "Densitat d'ocupació",
        "La superfície útil per persona ha de ser adequada",
        &[EvidenceField::UsefulArea, EvidenceField::IntendedOccupancy],
        dimensions::occupancy_density,
    ),
    Rule::new(
        "minimum-rooms",
        "Nombre mínim d'habitacions",
        "L'habitatge ha de tenir un nombre adequat d'habitacions",
        &[EvidenceField::NumRooms, EvidenceField::IntendedOccupancy],
        dimensions::minimum_rooms,
    ),
    Rule::new(
        "minimum-room-size",
        "Superfície mínima per habitació",
        "Cada peça habitable ha de tenir una superfície mínima",
        &[EvidenceField::UsefulArea, EvidenceField::NumRooms],
        dimensions::minimum_room_size,
    ),
    Rule::new(
        "heating",
        "Calefacció",
        "L'habitatge ha de tenir un sistema de calefacció adequat",
        &[EvidenceField::HasHeating],
        facilities::heating,
    ),
    Rule::new(
        "kitchen-details",
        "Equipament de la cuina",
        "La cuina ha de disposar d'aigua corrent, desguàs i aparell de cocció",
        &[
            EvidenceField::HasKitchen,
            EvidenceField::HasRunningWater,
            EvidenceField::HasDrainage,
            EvidenceField::HasCookingAppliance,
        ],
        facilities::kitchen_details,
    ),
    Rule::new(
        "bathroom-details",
        "Equipament del bany",
        "El bany ha de disposar de vàter, dutxa o banyera, aigua corrent i desguàs",
        &[
            EvidenceField::HasBathroom,
            EvidenceField::HasWc,
            EvidenceField::HasShowerOrBath,
            EvidenceField::HasRunningWater,
            EvidenceField::HasDrainage,
        ],
        facilities::bathroom_details,
    ),
    Rule::new(
        "water-supply",
        "Subministrament d'aigua",
        "L'habitatge ha de disposar d'aigua corrent i aigua calenta sanitària",
        &[EvidenceField::HasRunningWater, EvidenceField::HasHotWater],
        installations::water_supply,
    ),
    Rule::new(
        "drainage-system",
        "Sistema d'evacuació",
        "L'habitatge ha d'estar connectat a un sistema d'evacuació d'aigües residuals",
        &[EvidenceField::HasDrainage],
        installations::drainage_system,
    ),
    Rule::new(
        "electrical-installation",
        "Instal·lació elèctrica",
        "L'habitatge ha de disposar d'una instal·lació elèctrica",
        &[EvidenceField::HasElectricalInstallation],
        installations::electrical_installation,
    ),
    Rule::new(
        "energy-certificate",
        "Certificat d'eficiència energètica",
        "Es recomana disposar del certificat d'eficiència energètica",
        &[EvidenceField::HasEnergyCertificate],
        installations::energy_certificate,
    ),
    Rule::new(
        "access-circulation",
        "Accés i circulació",
        "Els accessos, escales i passadissos han de permetre una circulació adequada",
        &[EvidenceField::NumFloors],
        installations::access_circulation,
    ),
    Rule::new(
        "gas-installation",
        "Instal·lació de gas",
        "Si hi ha subministrament de gas, la instal·lació ha d'estar certificada",
        &[EvidenceField::HasGas, EvidenceField::HasGasInstallation],
        installations::gas_installation,
    ),
];

/// The ordered catalog. Order is part of the versioned contract.
pub fn catalog() -> &'static [Rule] {
    &CATALOG
}
