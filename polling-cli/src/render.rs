use polling_app::domain::{OptionId, Poll, PollResults, Role, Session, UserWithRole};
use serde::Serialize;

pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<(), String> {
    let text = serde_json::to_string_pretty(value).map_err(|e| e.to_string())?;
    println!("{text}");
    Ok(())
}

pub fn session(session: &Session) {
    println!(
        "{} <{}> (user {}, {})",
        session.display_name(),
        session.email,
        session.user_id,
        if session.is_admin() { "admin" } else { "user" }
    );
}

pub fn roles(roles: &[Role]) {
    for role in roles {
        println!("{:>4}  {}", role.id.0, role.name);
    }
}

pub fn poll_line(poll: &Poll, voted: Option<OptionId>) -> String {
    let marker = if voted.is_some() { " (voted)" } else { "" };
    format!("{:>4}  {}{}", poll.id.0, poll.title, marker)
}

/// Option rows with their position, which `edit-poll` uses as the index.
pub fn poll_details(poll: &Poll, voted: Option<OptionId>) {
    println!("{}", poll_line(poll, voted));
    for (index, option) in poll.option_list.iter().enumerate() {
        let mark = if voted == Some(option.id) { "*" } else { " " };
        println!(
            "  {mark} [{index}] {}  (option {}, {} votes)",
            option.option_title,
            option.id,
            option.votes()
        );
    }
}

pub fn results(results: &PollResults) {
    let total = results.total_votes();
    println!("{}  ({} votes)", results.title, total);
    for option in &results.options {
        let share = if total == 0 {
            0.0
        } else {
            option.votes as f64 * 100.0 / total as f64
        };
        println!("  {:<30} {:>5}  {:>5.1}%", option.title, option.votes, share);
    }
}

pub fn users(rows: &[UserWithRole]) {
    for row in rows {
        println!(
            "{:>4}  {} {}  <{}>  {}",
            row.user.id.0,
            row.user.first_name,
            row.user.last_name,
            row.user.email,
            row.role_name.as_deref().unwrap_or("-")
        );
    }
}
