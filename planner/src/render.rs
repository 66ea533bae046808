use planner::PlannerState;
use shared::calendar::DAYS_OF_WEEK;
use shared::Event;

pub fn event(event: &Event) {
    let mark = if event.is_done() { "x" } else { " " };
    println!(
        "[{}] {:>13}  {} {}  {}-{}  {}",
        mark,
        event.id,
        event.date.day(),
        event.date.month_name(),
        event.start_time,
        event.effective_end(),
        event.title
    );
    if !event.description.is_empty() {
        println!("{:22}{}", "", event.description);
    }
}

pub fn upcoming(state: &PlannerState) {
    let today = state.today();
    println!("Today: {} {}", today.day(), today.month_name());

    let events = state.upcoming();
    if events.is_empty() {
        println!("No upcoming events.");
        return;
    }
    for e in events {
        event(e);
    }
}

pub fn month(state: &PlannerState) {
    let viewing = state.viewing_date();
    println!("{} ({})", viewing.month_name(), viewing.year());
    println!("{}", DAYS_OF_WEEK.map(|d| format!("{:>5}", d)).join(""));

    for week in state.month_grid().chunks(DAYS_OF_WEEK.len()) {
        let line: String = week
            .iter()
            .map(|cell| {
                let marker = match (cell.is_today, cell.has_events) {
                    (true, _) => '*',
                    (false, true) => '•',
                    (false, false) => ' ',
                };
                format!("{:>4}{}", cell.day, marker)
            })
            .collect();
        println!("{}", line);
    }
}

pub fn day(state: &PlannerState) {
    let Some(selected) = state.selected_day() else {
        return;
    };
    println!("Plan for {} {}", selected.day(), selected.month_name());

    for slot in state.hourly_schedule() {
        if slot.events.is_empty() {
            println!("{:02}:00", slot.hour);
            continue;
        }
        for (i, e) in slot.events.iter().enumerate() {
            let label = if i == 0 {
                format!("{:02}:00", slot.hour)
            } else {
                String::new()
            };
            let mark = if e.is_done() { "x" } else { " " };
            println!(
                "{:5}  [{}] {}-{} {}",
                label,
                mark,
                e.start_time,
                e.effective_end(),
                e.title
            );
        }
    }
}
