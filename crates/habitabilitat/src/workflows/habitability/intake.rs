use chrono::{Datelike, Utc};

use super::domain::PropertyInput;

pub const MAX_PLACE_NAME_CHARS: usize = 100;
pub const MIN_PLACE_NAME_CHARS: usize = 2;
pub const MAX_ADDRESS_CHARS: usize = 200;
pub const MAX_NOTES_CHARS: usize = 2000;

/// Validation errors raised before an input reaches the engine.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IntakeViolation {
    #[error("{field} must be between {min} and {max} characters")]
    TextLength {
        field: &'static str,
        min: usize,
        max: usize,
    },
    #[error("{field} must be a finite number")]
    NonFinite { field: &'static str },
    #[error("{field} must be between {min} and {max} (found {found})")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
        found: f64,
    },
    #[error("useCase '{0}' is not supported")]
    UnrecognizedUseCase(String),
}

/// Strips angle brackets, trims, and caps the result at `max_chars` characters.
pub fn sanitize_text(value: &str, max_chars: usize) -> String {
    let stripped: String = value.chars().filter(|c| *c != '<' && *c != '>').collect();
    stripped.trim().chars().take(max_chars).collect()
}

/// Guard responsible for turning HTTP/CSV-originated inputs into engine-ready ones.
#[derive(Debug, Clone)]
pub struct IntakeGuard {
    current_year: i32,
}

impl Default for IntakeGuard {
    fn default() -> Self {
        Self::with_current_year(Utc::now().year())
    }
}

impl IntakeGuard {
    /// Pins the upper bound for `yearBuilt`.
    pub fn with_current_year(current_year: i32) -> Self {
        Self { current_year }
    }

    pub fn current_year(&self) -> i32 {
        self.current_year
    }

    /// Sanitize free text and range-check every present measurement.
    pub fn admit(&self, mut input: PropertyInput) -> Result<PropertyInput, IntakeViolation> {
        input.municipality = place_name("municipality", &input.municipality)?;
        input.region = place_name("region", &input.region)?;

        if !input.use_case.is_recognized() {
            return Err(IntakeViolation::UnrecognizedUseCase(
                input.use_case.wire_value().to_string(),
            ));
        }

        input.address = input
            .address
            .as_deref()
            .map(|address| sanitize_text(address, MAX_ADDRESS_CHARS))
            .filter(|address| !address.is_empty());

        input.notes = match input.notes.as_deref() {
            Some(notes) if notes.chars().count() > MAX_NOTES_CHARS => {
                return Err(IntakeViolation::TextLength {
                    field: "notes",
                    min: 0,
                    max: MAX_NOTES_CHARS,
                });
            }
            Some(notes) => Some(sanitize_text(notes, MAX_NOTES_CHARS)).filter(|n| !n.is_empty()),
            None => None,
        };

        measurement("usefulArea", input.useful_area, 1.0, 10_000.0)?;
        measurement("ceilingHeight", input.ceiling_height, 0.5, 10.0)?;
        measurement("totalArea", input.total_area, 1.0, 100_000.0)?;
        count("intendedOccupancy", input.intended_occupancy, 1, 50)?;
        count("numRooms", input.num_rooms, 1, 100)?;
        count("numBedrooms", input.num_bedrooms, 0, 50)?;
        count("numBathrooms", input.num_bathrooms, 0, 20)?;
        count("numFloors", input.num_floors, 1, 50)?;

        if let Some(year) = input.year_built {
            let year = i32::from(year);
            if !(1000..=self.current_year).contains(&year) {
                return Err(IntakeViolation::OutOfRange {
                    field: "yearBuilt",
                    min: 1000.0,
                    max: f64::from(self.current_year),
                    found: f64::from(year),
                });
            }
        }

        Ok(input)
    }
}

fn place_name(field: &'static str, raw: &str) -> Result<String, IntakeViolation> {
    let sanitized = sanitize_text(raw, MAX_PLACE_NAME_CHARS);
    if sanitized.chars().count() < MIN_PLACE_NAME_CHARS {
        return Err(IntakeViolation::TextLength {
            field,
            min: MIN_PLACE_NAME_CHARS,
            max: MAX_PLACE_NAME_CHARS,
        });
    }
    Ok(sanitized)
}

fn measurement(
    field: &'static str,
    value: Option<f64>,
    min: f64,
    max: f64,
) -> Result<(), IntakeViolation> {
    let Some(value) = value else {
        return Ok(());
    };

    if !value.is_finite() {
        return Err(IntakeViolation::NonFinite { field });
    }

    if value < min || value > max {
        return Err(IntakeViolation::OutOfRange {
            field,
            min,
            max,
            found: value,
        });
    }

    Ok(())
}

fn count(field: &'static str, value: Option<u32>, min: u32, max: u32) -> Result<(), IntakeViolation> {
    match value {
        Some(found) if found < min || found > max => Err(IntakeViolation::OutOfRange {
            field,
            min: f64::from(min),
            max: f64::from(max),
            found: f64::from(found),
        }),
        _ => Ok(()),
    }
}
