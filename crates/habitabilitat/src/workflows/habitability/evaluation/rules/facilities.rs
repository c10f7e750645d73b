use super::unconfirmed;
use crate::workflows::habitability::domain::PropertyInput;
use crate::workflows::habitability::evaluation::RuleOutcome;

pub(crate) fn kitchen_required(input: &PropertyInput) -> RuleOutcome {
    if input.has_kitchen {
        return RuleOutcome::pass(
            100,
            "Cuina present",
            "L'habitatge té una cuina, complint el requisit.",
        );
    }

    RuleOutcome::fail(
        100,
        "Cuina no present",
        "L'habitatge no té cuina, requisit obligatori per a la cédula de habitabilitat.",
    )
    .with_fix("S'ha d'instal·lar una cuina amb aigua corrent, llar de foc o fogó, i desguàs.")
}

pub(crate) fn bathroom_required(input: &PropertyInput) -> RuleOutcome {
    if input.has_bathroom {
        return RuleOutcome::pass(
            100,
            "Bany present",
            "L'habitatge té un bany, complint el requisit.",
        );
    }

    RuleOutcome::fail(
        100,
        "Bany no present",
        "L'habitatge no té bany, requisit obligatori per a la cédula de habitabilitat.",
    )
    .with_fix("S'ha d'instal·lar un bany amb dutxa o banyera, vàter, i aigua corrent.")
}

pub(crate) fn natural_light(input: &PropertyInput) -> RuleOutcome {
    if input.has_natural_light {
        return RuleOutcome::pass(
            80,
            "Il·luminació natural present",
            "L'habitatge té il·luminació natural, complint el requisit.",
        );
    }

    RuleOutcome::risk(
        50,
        "Il·luminació natural no confirmada",
        "No s'ha confirmat la presència d'il·luminació natural. Això pot ser un problema per a les habitacions principals.",
    )
    .with_fix(
        "Verifica que les habitacions principals (dormitori, sala d'estar) tinguin finestres amb accés a llum natural.",
    )
}

pub(crate) fn ventilation(input: &PropertyInput) -> RuleOutcome {
    if input.has_ventilation {
        return RuleOutcome::pass(
            80,
            "Ventilació adequada",
            "L'habitatge té ventilació adequada, complint el requisit.",
        );
    }

    RuleOutcome::risk(
        50,
        "Ventilació no confirmada",
        "No s'ha confirmat la presència de ventilació adequada. Això pot ser un problema per a la qualitat de l'aire.",
    )
    .with_fix(
        "Verifica que hi hagi ventilació natural (finestres) o mecànica (extractors) en cuina i bany.",
    )
}

pub(crate) fn heating(input: &PropertyInput) -> RuleOutcome {
    if input.has_heating {
        return RuleOutcome::pass(
            90,
            "Calefacció present",
            "L'habitatge té calefacció, complint el requisit.",
        );
    }

    RuleOutcome::risk(
        60,
        "Calefacció no confirmada",
        "No s'ha confirmat la presència de calefacció. Això pot ser un problema per al confort.",
    )
    .with_fix("Instal·la un sistema de calefacció adequat (elèctric, gas, o altres sistemes aprovats).")
}

pub(crate) fn kitchen_details(input: &PropertyInput) -> RuleOutcome {
    if !input.has_kitchen {
        return RuleOutcome::pass(
            100,
            "Sense cuina: equipament no avaluat",
            "Sense cuina declarada no hi ha equipament de cuina a verificar.",
        );
    }

    let missing = unconfirmed(&[
        (input.has_running_water, "aigua corrent"),
        (input.has_drainage, "desguàs"),
        (input.has_cooking_appliance, "aparell de cocció"),
    ]);

    if missing.is_empty() {
        return RuleOutcome::pass(
            90,
            "Cuina completament equipada",
            "La cuina disposa d'aigua corrent, desguàs i aparell de cocció.",
        );
    }

    let listed = missing.join(", ");
    RuleOutcome::fail(
        90,
        format!("Falta equipament a la cuina: {listed}"),
        format!("La cuina ha de disposar d'aigua corrent, desguàs i aparell de cocció; falta: {listed}."),
    )
    .with_fix(format!("Instal·la a la cuina: {listed}."))
}

pub(crate) fn bathroom_details(input: &PropertyInput) -> RuleOutcome {
    if !input.has_bathroom {
        return RuleOutcome::pass(
            100,
            "Sense bany: equipament no avaluat",
            "Sense bany declarat no hi ha equipament sanitari a verificar.",
        );
    }

    let missing = unconfirmed(&[
        (input.has_wc, "vàter"),
        (input.has_shower_or_bath, "dutxa o banyera"),
        (input.has_running_water, "aigua corrent"),
        (input.has_drainage, "desguàs"),
    ]);

    if missing.is_empty() {
        return RuleOutcome::pass(
            90,
            "Bany completament equipat",
            "El bany disposa de vàter, dutxa o banyera, aigua corrent i desguàs.",
        );
    }

    let listed = missing.join(", ");
    RuleOutcome::fail(
        90,
        format!("Falta equipament al bany: {listed}"),
        format!(
            "El bany ha de disposar de vàter, dutxa o banyera, aigua corrent i desguàs; falta: {listed}."
        ),
    )
    .with_fix(format!("Instal·la al bany: {listed}."))
}
