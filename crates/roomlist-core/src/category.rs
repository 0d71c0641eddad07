use crate::{
    types::{Category, Room},
    unread::UnreadPolicy,
};

/// Urgency category of `room`. First matching rule wins: highlights, then
/// notifications, then unread messages.
pub fn room_category(room: &Room, unread: &dyn UnreadPolicy) -> Category {
    if room.highlight_count > 0 {
        Category::Red
    } else if room.unread_notifications > 0 {
        Category::Grey
    } else if unread.room_has_unread_messages(room) {
        Category::Bold
    } else {
        Category::Idle
    }
}
