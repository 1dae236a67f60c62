/// Bounded reminders for proposals stuck awaiting state review
pub mod reminder;
