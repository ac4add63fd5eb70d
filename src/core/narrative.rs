// Rootline - core/narrative.rs
//
// Human-readable rendering of timelines for display layers: one sentence
// per event, a date/place subtitle, and chronological ordering.

use crate::core::date::{comparable_date, format_full_date};
use crate::core::model::{EventKind, LifeEvent};
use crate::util::constants;

/// One-line description of an event from the perspective of `person_name`.
pub fn event_sentence(event: &LifeEvent, person_name: &str) -> String {
    let place = (!event.place.is_empty()).then_some(event.place.as_str());
    let in_place = place.map(|p| format!(" in {p}")).unwrap_or_default();

    match event.kind() {
        EventKind::Birth => format!("{person_name} was born{in_place}"),
        EventKind::Death => format!("{person_name} died{in_place}"),
        EventKind::Burial => format!("{person_name} was buried{in_place}"),
        EventKind::Residence => match place {
            Some(p) => format!("{person_name} lived in {p}"),
            None => format!("{person_name} recorded a residence"),
        },
        EventKind::Emigration => match place {
            Some(p) => format!("{person_name} emigrated from {p}"),
            None => format!("{person_name} emigrated"),
        },
        EventKind::Immigration => match place {
            Some(p) => format!("{person_name} arrived in {p}"),
            None => format!("{person_name} immigrated"),
        },
        EventKind::Census => format!("{person_name} was recorded in the census{in_place}"),
        EventKind::Marriage => match event.spouse_name.as_deref() {
            Some(spouse) if spouse != constants::UNKNOWN_NAME => {
                format!("{person_name} married {spouse}{in_place}")
            }
            _ => format!("{person_name} was married{in_place}"),
        },
        EventKind::Graduation => format!("{person_name} graduated{in_place}"),
        EventKind::BarMitzvah => format!("{person_name} celebrated a bar mitzvah{in_place}"),
        EventKind::BatMitzvah => format!("{person_name} celebrated a bat mitzvah{in_place}"),
        EventKind::Confirmation => format!("{person_name} was confirmed{in_place}"),
        EventKind::Event => format!("Life event for {person_name}{in_place}"),
    }
}

/// Subtitle line: display date (or "Date unknown") and place.
pub fn date_line(event: &LifeEvent) -> String {
    let date = if event.date.is_empty() {
        constants::DATE_UNKNOWN_LABEL.to_string()
    } else {
        format_full_date(Some(&event.date))
    };
    if event.place.is_empty() {
        date
    } else {
        format!("{date} \u{2022} {}", event.place)
    }
}

/// Timeline in chronological order. Undated events keep their relative
/// order and sort after every dated one.
pub fn sorted_timeline(timeline: &[LifeEvent]) -> Vec<&LifeEvent> {
    let mut events: Vec<&LifeEvent> = timeline.iter().collect();
    events.sort_by(|a, b| {
        comparable_date(Some(&a.date)).total_cmp(&comparable_date(Some(&b.date)))
    });
    events
}
