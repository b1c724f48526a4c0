use chrono::{NaiveDate, NaiveTime};
use shared::calendar::{CalendarGrid, DayCell, SlotCell};
use shared::{Appointment, CalendarView};
use yew::prelude::*;

use crate::components::appointment_card::AppointmentCard;

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

#[derive(Properties, PartialEq)]
pub struct CalendarGridProps {
    pub grid: CalendarGrid,
    pub today: NaiveDate,
    /// Day or slot clicked: opens a pre-filled new-appointment dialog
    pub on_pick: Callback<(NaiveDate, Option<NaiveTime>)>,
    pub on_select: Callback<Appointment>,
}

#[function_component(CalendarGridView)]
pub fn calendar_grid(props: &CalendarGridProps) -> Html {
    match props.grid.view {
        CalendarView::Month => month_view(props),
        CalendarView::Week => week_view(props),
        CalendarView::Day => day_view(props),
    }
}

fn slot_label(time: NaiveTime) -> String {
    time.format("%-I:%M %p").to_string()
}

fn pick(props: &CalendarGridProps, date: NaiveDate, time: Option<NaiveTime>) -> Callback<MouseEvent> {
    let on_pick = props.on_pick.clone();
    Callback::from(move |_| on_pick.emit((date, time)))
}

fn cards(props: &CalendarGridProps, appointments: &[Appointment]) -> Html {
    html! {
        <>
            { for appointments.iter().map(|appointment| html! {
                <AppointmentCard
                    key={appointment.id.clone()}
                    appointment={appointment.clone()}
                    on_select={props.on_select.clone()}
                />
            })}
        </>
    }
}

fn day_class(base: &str, cell: &DayCell, today: NaiveDate) -> Classes {
    classes!(
        base.to_string(),
        (!cell.in_period).then_some("empty"),
        (cell.date == today).then_some("today"),
    )
}

fn month_view(props: &CalendarGridProps) -> Html {
    html! {
        <div class="calendar-month">
            { for WEEKDAYS.iter().map(|day| html! {
                <div class="calendar-day-header">{ *day }</div>
            })}
            { for props.grid.days.iter().map(|cell| {
                if !cell.in_period {
                    return html! { <div class={day_class("calendar-day", cell, props.today)}></div> };
                }
                html! {
                    <div
                        class={day_class("calendar-day", cell, props.today)}
                        onclick={pick(props, cell.date, None)}
                    >
                        <div class="day-number">{ cell.date.format("%-d").to_string() }</div>
                        <div class="day-appointments">{ cards(props, &cell.appointments) }</div>
                    </div>
                }
            })}
        </div>
    }
}

fn slot_view(props: &CalendarGridProps, date: NaiveDate, slot: &SlotCell, detailed: bool) -> Html {
    html! {
        <div
            class={classes!("time-slot", detailed.then_some("detailed"))}
            onclick={pick(props, date, Some(slot.time))}
        >
            if detailed {
                <div class="time-label">{ slot_label(slot.time) }</div>
            }
            <div class="appointment-slot">{ cards(props, &slot.appointments) }</div>
        </div>
    }
}

fn week_view(props: &CalendarGridProps) -> Html {
    let labels: Vec<NaiveTime> = props
        .grid
        .days
        .first()
        .map(|cell| cell.slots.iter().map(|slot| slot.time).collect())
        .unwrap_or_default();

    html! {
        <div class="calendar-week">
            <div class="time-column">
                <div class="day-header"></div>
                { for labels.iter().map(|time| html! {
                    <div class="time-slot-label">{ slot_label(*time) }</div>
                })}
            </div>
            { for props.grid.days.iter().map(|cell| html! {
                <div class="day-column">
                    <div class={day_class("day-header", cell, props.today)}>
                        <div class="day-name">{ cell.date.format("%a").to_string() }</div>
                        <div class="day-number">{ cell.date.format("%-d").to_string() }</div>
                    </div>
                    { for cell.slots.iter().map(|slot| slot_view(props, cell.date, slot, false)) }
                </div>
            })}
        </div>
    }
}

fn day_view(props: &CalendarGridProps) -> Html {
    let Some(cell) = props.grid.days.first() else {
        return html! {};
    };

    html! {
        <div class="calendar-day-view">
            <div class="time-slots-container">
                { for cell.slots.iter().map(|slot| slot_view(props, cell.date, slot, true)) }
            </div>
        </div>
    }
}
