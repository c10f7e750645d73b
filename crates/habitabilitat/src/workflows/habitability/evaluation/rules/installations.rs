use super::{confirmed, counted, unconfirmed};
use crate::workflows::habitability::domain::PropertyInput;
use crate::workflows::habitability::evaluation::RuleOutcome;

pub(crate) fn water_supply(input: &PropertyInput) -> RuleOutcome {
    let missing = unconfirmed(&[
        (input.has_running_water, "aigua corrent"),
        (input.has_hot_water, "aigua calenta sanitària"),
    ]);

    if missing.is_empty() {
        return RuleOutcome::pass(
            95,
            "Subministrament d'aigua complet",
            "L'habitatge disposa d'aigua corrent i aigua calenta sanitària.",
        );
    }

    let listed = missing.join(", ");
    RuleOutcome::fail(
        90,
        format!("Subministrament d'aigua incomplet: falta {listed}"),
        format!("L'habitatge ha de disposar d'aigua corrent i aigua calenta; falta: {listed}."),
    )
    .with_fix(format!(
        "Connecta l'habitatge a la xarxa d'aigua i instal·la un sistema d'aigua calenta ({listed})."
    ))
}

pub(crate) fn drainage_system(input: &PropertyInput) -> RuleOutcome {
    if confirmed(input.has_drainage) {
        return RuleOutcome::pass(
            95,
            "Connectat al sistema d'evacuació",
            "L'habitatge està connectat a la xarxa d'evacuació d'aigües residuals.",
        );
    }

    RuleOutcome::fail(
        90,
        "Sense sistema d'evacuació confirmat",
        "No consta que l'habitatge estigui connectat a un sistema d'evacuació d'aigües residuals.",
    )
    .with_fix("Verifica i documenta la connexió a la xarxa de clavegueram o a una fossa sèptica.")
}

pub(crate) fn electrical_installation(input: &PropertyInput) -> RuleOutcome {
    if confirmed(input.has_electrical_installation) {
        return RuleOutcome::pass(
            90,
            "Té instal·lació elèctrica",
            "L'habitatge disposa d'instal·lació elèctrica.",
        );
    }

    RuleOutcome::fail(
        85,
        "Sense instal·lació elèctrica confirmada",
        "No consta que l'habitatge disposi d'una instal·lació elèctrica.",
    )
    .with_fix("Cal una instal·lació elèctrica amb el butlletí (certificat d'instal·lació) vigent.")
}

/// Advisory only: a missing certificate is a risk, never a failure.
pub(crate) fn energy_certificate(input: &PropertyInput) -> RuleOutcome {
    if confirmed(input.has_energy_certificate) {
        return RuleOutcome::pass(
            100,
            "Té certificat d'eficiència energètica",
            "L'habitatge disposa del certificat d'eficiència energètica.",
        );
    }

    RuleOutcome::risk(
        80,
        "Sense certificat d'eficiència energètica",
        "No consta el certificat d'eficiència energètica, necessari per a la venda o el lloguer.",
    )
    .with_fix("Sol·licita el certificat d'eficiència energètica a un tècnic habilitat.")
}

pub(crate) fn access_circulation(input: &PropertyInput) -> RuleOutcome {
    let Some(floors) = counted(input.num_floors) else {
        return RuleOutcome::unknown(
            "Nombre de plantes no proporcionat",
            "Es necessita el nombre de plantes per valorar els accessos i la circulació interior.",
        )
        .with_fix("Indica el nombre de plantes de l'habitatge.");
    };

    if floors <= 1 {
        return RuleOutcome::pass(
            90,
            "Habitatge en una sola planta",
            "Amb una sola planta no cal verificar escales interiors.",
        );
    }

    RuleOutcome::risk(
        70,
        format!("Habitatge de {floors} plantes: cal verificar accessos"),
        format!(
            "Amb {floors} plantes cal comprovar l'amplada de les escales, de les portes i dels passadissos."
        ),
    )
    .with_fix("Comprova l'amplada d'escales, portes i passadissos segons la normativa vigent.")
}

pub(crate) fn gas_installation(input: &PropertyInput) -> RuleOutcome {
    if !confirmed(input.has_gas) {
        return RuleOutcome::pass(
            100,
            "Sense subministrament de gas",
            "L'habitatge no declara subministrament de gas; no cal certificar cap instal·lació.",
        );
    }

    if confirmed(input.has_gas_installation) {
        return RuleOutcome::pass(
            90,
            "Instal·lació de gas certificada",
            "L'habitatge té gas i la instal·lació consta com a certificada.",
        );
    }

    RuleOutcome::fail(
        90,
        "Instal·lació de gas sense certificar",
        "L'habitatge té subministrament de gas però no consta el certificat de la instal·lació.",
    )
    .with_fix("Sol·licita la revisió i el certificat de la instal·lació de gas a una empresa autoritzada.")
}
