//! Demonstration cases written to an empty store on first load.

use chrono::{DateTime, Utc};

use crate::case_model::{Case, CaseStatus, CaseUpdate};

pub const SEED_CASE_COUNT: usize = 5;

fn at(rfc3339: &str) -> DateTime<Utc> {
    // Literals below are fixed and valid; the epoch fallback is unreachable.
    DateTime::parse_from_rfc3339(rfc3339)
        .map(|date| date.with_timezone(&Utc))
        .unwrap_or_default()
}

fn note(id: &str, text: &str, timestamp: &str) -> CaseUpdate {
    CaseUpdate {
        id: id.to_string(),
        text: text.to_string(),
        timestamp: at(timestamp),
    }
}

#[allow(clippy::too_many_arguments)]
fn seed_case(
    case_number: &str,
    license_plate: &str,
    description: &str,
    status: CaseStatus,
    date_created: &str,
    assigned_to: &str,
    possible_solution: &str,
    updates: Vec<CaseUpdate>,
) -> Case {
    Case {
        case_number: case_number.to_string(),
        license_plate: license_plate.to_string(),
        description: description.to_string(),
        status,
        date_created: at(date_created),
        assigned_to: crate::case_model::non_blank(assigned_to.to_string()),
        possible_solution: crate::case_model::non_blank(possible_solution.to_string()),
        updates,
    }
}

/// The fixed demonstration dataset, in stored order.
pub fn seed_cases() -> Vec<Case> {
    vec![
        seed_case(
            "SAK-123456",
            "AB12345",
            "Bilen starter ikke. Kunden rapporterer at det kommer klikkelyder når han vrir om nøkkelen.",
            CaseStatus::Open,
            "2023-05-15T08:30:00Z",
            "Ole Hansen",
            "Sjekk batteritilkobling og spenning. Mulig startmotor defekt.",
            vec![note(
                "1",
                "Batteriet målt til 10.5V. Lader nå batteriet for å se om det løser problemet.",
                "2023-05-15T10:15:00Z",
            )],
        ),
        seed_case(
            "SAK-123457",
            "CD67890",
            "Oljelampe lyser på dashbordet. Kunden har kjørt ca. 500 km siden sist service.",
            CaseStatus::InProgress,
            "2023-05-14T13:45:00Z",
            "Kari Olsen",
            "Sjekk oljenivå og kvalitet. Mulig lekkasje fra oljepanne.",
            vec![
                note(
                    "1",
                    "Oljenivå er lavt. Fant spor av olje under bilen som tyder på lekkasje.",
                    "2023-05-14T15:30:00Z",
                ),
                note(
                    "2",
                    "Identifisert lekkasje fra oljepannepakning. Bestilt deler.",
                    "2023-05-15T09:00:00Z",
                ),
            ],
        ),
        seed_case(
            "SAK-123458",
            "EF12345",
            "Bremser lager høy pipelyd ved lett bremsing. Kunden sier det startet for ca. 1 uke siden.",
            CaseStatus::Completed,
            "2023-05-10T09:15:00Z",
            "Per Johansen",
            "Sjekk bremseklosser for slitasje. Mulig fremmedlegeme mellom klosser og skive.",
            vec![
                note(
                    "1",
                    "Bremseklosser foran er nesten helt nedslitt. Anbefaler utskifting.",
                    "2023-05-10T11:00:00Z",
                ),
                note(
                    "2",
                    "Byttet bremseklosser foran og bak. Testkjørt uten problemer.",
                    "2023-05-11T14:30:00Z",
                ),
                note(
                    "3",
                    "Kunde hentet bil og bekreftet at problemet er løst.",
                    "2023-05-12T16:00:00Z",
                ),
            ],
        ),
        seed_case(
            "SAK-123459",
            "GH67890",
            "AC fungerer ikke. Blåser kun varm luft selv når satt til laveste temperatur.",
            CaseStatus::Open,
            "2023-05-16T10:00:00Z",
            "",
            "Sjekk kjølemiddelnivå. Mulig lekkasje i AC-system eller defekt kompressor.",
            Vec::new(),
        ),
        seed_case(
            "SAK-123460",
            "IJ12345",
            "Servostyring føles tung. Kunden rapporterer at det gradvis har blitt verre de siste ukene.",
            CaseStatus::InProgress,
            "2023-05-15T14:30:00Z",
            "Lisa Andersen",
            "Sjekk servovæskenivå og tilstand. Mulig lekkasje eller slitt servopumpe.",
            vec![note(
                "1",
                "Servovæskenivå er lavt. Etterfylt og sjekker for lekkasjer.",
                "2023-05-15T16:00:00Z",
            )],
        ),
    ]
}
