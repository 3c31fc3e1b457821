//! Room membership as announced by the server.
//!
//! The roster is ordered by join time and never holds duplicates. It only
//! changes in response to join and leave announcements, and is cleared when
//! the session disconnects.

use roomline_proto::ParticipantId;

/// Label for a roster with at most one member.
pub const SINGULAR_LABEL: &str = "Member:";

/// Label for a roster with two or more members.
pub const PLURAL_LABEL: &str = "Members:";

/// Ordered set of participants currently in the room.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    members: Vec<ParticipantId>,
}

impl Roster {
    /// Create an empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `id` unless it is already present.
    ///
    /// Returns `true` if the roster changed.
    pub fn apply_join(&mut self, id: ParticipantId) -> bool {
        if self.contains(&id) {
            return false;
        }
        self.members.push(id);
        true
    }

    /// Remove the first occurrence of `id`. Unknown ids are ignored.
    ///
    /// Returns `true` if the roster changed.
    pub fn apply_leave(&mut self, id: &ParticipantId) -> bool {
        match self.members.iter().position(|member| member == id) {
            Some(index) => {
                self.members.remove(index);
                true
            },
            None => false,
        }
    }

    /// Members in join order.
    pub fn current(&self) -> &[ParticipantId] {
        &self.members
    }

    /// Remove every member.
    pub fn reset(&mut self) {
        self.members.clear();
    }

    /// True if `id` is in the room.
    pub fn contains(&self, id: &ParticipantId) -> bool {
        self.members.contains(id)
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// True if nobody is in the room.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Heading for the member list.
    pub fn label(&self) -> &'static str {
        label_for(self.members.len())
    }
}

/// Heading for a member list of `count` entries.
pub fn label_for(count: usize) -> &'static str {
    if count <= 1 { SINGULAR_LABEL } else { PLURAL_LABEL }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> ParticipantId {
        ParticipantId::new(s)
    }

    #[test]
    fn join_is_idempotent() {
        let mut roster = Roster::new();
        assert!(roster.apply_join(id("7")));
        assert!(!roster.apply_join(id("7")));
        assert_eq!(roster.current(), &[id("7")]);
    }

    #[test]
    fn leave_of_unknown_id_is_noop() {
        let mut roster = Roster::new();
        assert!(!roster.apply_leave(&id("99")));
        assert!(roster.is_empty());
    }

    #[test]
    fn join_order_is_preserved() {
        let mut roster = Roster::new();
        roster.apply_join(id("3"));
        roster.apply_join(id("1"));
        roster.apply_join(id("2"));
        roster.apply_leave(&id("1"));
        assert_eq!(roster.current(), &[id("3"), id("2")]);
    }

    #[test]
    fn reset_clears_members() {
        let mut roster = Roster::new();
        roster.apply_join(id("1"));
        roster.apply_join(id("2"));
        roster.reset();
        assert!(roster.is_empty());
    }

    #[test]
    fn label_switches_at_two_members() {
        let mut roster = Roster::new();
        assert_eq!(roster.label(), "Member:");
        roster.apply_join(id("1"));
        assert_eq!(roster.label(), "Member:");
        roster.apply_join(id("2"));
        assert_eq!(roster.label(), "Members:");
    }
}
