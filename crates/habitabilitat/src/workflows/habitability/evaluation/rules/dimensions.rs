use super::{counted, measured};
use crate::workflows::habitability::domain::{PropertyInput, UseCase};
use crate::workflows::habitability::evaluation::RuleOutcome;

pub(crate) const FIRST_OCCUPANCY_MIN_AREA_M2: f64 = 30.0;
pub(crate) const DEFAULT_MIN_AREA_M2: f64 = 36.0;
pub(crate) const MIN_CEILING_HEIGHT_M: f64 = 2.5;
pub(crate) const MIN_AREA_PER_PERSON_M2: f64 = 9.0;
pub(crate) const MIN_ROOMS: u32 = 2;
pub(crate) const SINGLE_SPACE_MIN_AREA_M2: f64 = 8.0;
pub(crate) const MIN_AVERAGE_ROOM_AREA_M2: f64 = 6.0;

/// Renovations and unrecognized use cases take the stricter second-occupancy figure.
pub(crate) fn minimum_useful_area(use_case: &UseCase) -> f64 {
    match use_case {
        UseCase::FirstOccupancy => FIRST_OCCUPANCY_MIN_AREA_M2,
        UseCase::SecondOccupancy | UseCase::Renovation | UseCase::Unrecognized(_) => {
            DEFAULT_MIN_AREA_M2
        }
    }
}

pub(crate) fn min_useful_area(input: &PropertyInput) -> RuleOutcome {
    let Some(area) = measured(input.useful_area) else {
        return RuleOutcome::unknown(
            "Superfície útil no proporcionada",
            "Es necessita mesurar la superfície útil de l'habitatge per validar aquest requisit.",
        )
        .with_fix("Mesura la superfície útil (sense comptar parets, passadissos, etc.)");
    };

    let minimum = minimum_useful_area(&input.use_case);
    let use_label = input.use_case.label();

    if area >= minimum {
        return RuleOutcome::pass(
            100,
            format!("Superfície útil adequada: {area} m²"),
            format!(
                "La superfície útil de {area} m² compleix el mínim de {minimum} m² requerit per a {use_label}."
            ),
        );
    }

    RuleOutcome::fail(
        100,
        format!("Superfície útil insuficient: {area} m² (mínim: {minimum} m² per a {use_label})"),
        format!(
            "La superfície útil de {area} m² és inferior al mínim de {minimum} m² requerit per a {use_label}."
        ),
    )
    .with_fix(format!(
        "No es pot solucionar sense modificar l'habitatge. Es requereix una superfície mínima de {minimum} m² per a {use_label}."
    ))
}

pub(crate) fn min_ceiling_height(input: &PropertyInput) -> RuleOutcome {
    let Some(height) = measured(input.ceiling_height) else {
        return RuleOutcome::unknown(
            "Alçada del sostre no proporcionada",
            "Es necessita mesurar l'alçada del sostre per validar aquest requisit.",
        )
        .with_fix("Mesura l'alçada del sostre en el punt més baix de cada habitació.");
    };

    if height >= MIN_CEILING_HEIGHT_M {
        return RuleOutcome::pass(
            100,
            format!("Alçada adequada: {height} m"),
            format!("L'alçada de {height} m compleix el mínim de 2,5 m requerit."),
        );
    }

    RuleOutcome::fail(
        100,
        format!("Alçada insuficient: {height} m (mínim: 2,5 m)"),
        format!("L'alçada de {height} m és inferior al mínim de 2,5 m requerit."),
    )
    .with_fix("Pot ser necessari modificar el sostre o reduir l'alçada del terra si és possible.")
}

pub(crate) fn occupancy_density(input: &PropertyInput) -> RuleOutcome {
    let (Some(area), Some(occupants)) = (
        measured(input.useful_area),
        counted(input.intended_occupancy),
    ) else {
        return RuleOutcome::unknown(
            "Dades d'ocupació incompletes",
            "Es necessita la superfície útil i el nombre d'ocupants per validar aquest requisit.",
        )
        .with_fix("Proporciona la superfície útil i el nombre d'ocupants previstos.");
    };

    let area_per_person = area / f64::from(occupants);

    if area_per_person >= MIN_AREA_PER_PERSON_M2 {
        return RuleOutcome::pass(
            90,
            format!("Densitat adequada: {area_per_person:.1} m²/persona"),
            format!("Amb {area} m² per a {occupants} persones, la densitat és adequada."),
        );
    }

    let recommended = MIN_AREA_PER_PERSON_M2 * f64::from(occupants);
    RuleOutcome::risk(
        80,
        format!("Densitat alta: {area_per_person:.1} m²/persona"),
        format!("Amb {area} m² per a {occupants} persones, la densitat pot ser massa alta."),
    )
    .with_fix(format!(
        "Considera reduir el nombre d'ocupants o augmentar la superfície útil. Recomanació: mínim {recommended:.0} m²."
    ))
}

pub(crate) fn minimum_rooms(input: &PropertyInput) -> RuleOutcome {
    let (Some(rooms), Some(occupants)) =
        (counted(input.num_rooms), counted(input.intended_occupancy))
    else {
        return RuleOutcome::unknown(
            "Dades d'habitacions incompletes",
            "Es necessita el nombre d'habitacions i ocupants per validar aquest requisit.",
        );
    };

    // One bedroom per occupant plus a living area, never fewer than two rooms.
    let required = MIN_ROOMS.max(occupants);

    if rooms >= required {
        return RuleOutcome::pass(
            85,
            format!("Nombre d'habitacions adequat: {rooms}"),
            format!("Amb {rooms} habitacions per a {occupants} persones, el nombre és adequat."),
        );
    }

    RuleOutcome::risk(
        70,
        format!("Potser insuficient habitacions: {rooms} (recomanat: {required}+)"),
        format!("Amb {rooms} habitacions per a {occupants} persones, pot ser insuficient."),
    )
    .with_fix("Considera si l'habitatge té espai suficient per a tots els ocupants.")
}

pub(crate) fn minimum_room_size(input: &PropertyInput) -> RuleOutcome {
    let (Some(area), Some(rooms)) = (measured(input.useful_area), counted(input.num_rooms)) else {
        return RuleOutcome::unknown(
            "Dades de superfície per habitació incompletes",
            "Es necessita la superfície útil i el nombre d'habitacions per validar aquest requisit.",
        )
        .with_fix("Proporciona la superfície útil i el nombre d'habitacions.");
    };

    if rooms == 1 {
        if area >= SINGLE_SPACE_MIN_AREA_M2 {
            return RuleOutcome::pass(
                90,
                format!("Espai únic adequat: {area} m²"),
                format!(
                    "L'espai únic de {area} m² compleix el mínim de {SINGLE_SPACE_MIN_AREA_M2} m² per a una peça habitable."
                ),
            );
        }

        return RuleOutcome::fail(
            90,
            format!(
                "Espai únic insuficient: {area} m² (mínim: {SINGLE_SPACE_MIN_AREA_M2} m²)"
            ),
            format!(
                "Un habitatge d'una sola peça ha de tenir almenys {SINGLE_SPACE_MIN_AREA_M2} m² útils; en té {area} m²."
            ),
        )
        .with_fix(
            "No es pot solucionar sense ampliar l'espai habitable o unificar-lo amb peces annexes.",
        );
    }

    let average = area / f64::from(rooms);

    if average >= MIN_AVERAGE_ROOM_AREA_M2 {
        return RuleOutcome::pass(
            85,
            format!("Superfície mitjana per habitació adequada: {average:.1} m²"),
            format!("Amb {area} m² repartits en {rooms} habitacions, la mida mitjana és adequada."),
        );
    }

    RuleOutcome::risk(
        80,
        format!(
            "Habitacions petites: {average:.1} m² de mitjana (recomanat: {MIN_AVERAGE_ROOM_AREA_M2} m²)"
        ),
        format!(
            "Amb {area} m² repartits en {rooms} habitacions, algunes peces poden no arribar a la superfície mínima."
        ),
    )
    .with_fix("Comprova la superfície de cada habitació; pot caler redistribuir o unificar peces.")
}
