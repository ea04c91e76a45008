//! Static team rosters. Each board shows the tasks whose assignee is one of
//! its members; the roster itself is never persisted or edited at runtime.

/// A board and the ordered list of people on its team.
#[derive(Debug, PartialEq, Eq)]
pub struct Team {
    pub id: &'static str,
    pub name: &'static str,
    pub members: &'static [&'static str],
}

impl Team {
    pub fn has_member(&self, name: &str) -> bool {
        self.members.contains(&name)
    }
}

pub const TEAMS: &[Team] = &[
    Team {
        id: "mav-cds",
        name: "Mav-CDS",
        members: &["Manoj Naidu", "Sravani", "Kiran"],
    },
    Team {
        id: "mavcvs",
        name: "MAVCVS",
        members: &["Ravi", "Priya", "Suresh"],
    },
];

/// Look up a board by its identifier.
pub fn find_team(board_id: &str) -> Option<&'static Team> {
    TEAMS.iter().find(|t| t.id == board_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_and_membership() {
        let team = find_team("mav-cds").unwrap();
        assert_eq!(team.name, "Mav-CDS");
        assert!(team.has_member("Sravani"));
        assert!(!team.has_member("sravani"));
        assert!(find_team("unknown").is_none());
    }

    #[test]
    fn rosters_do_not_overlap() {
        for a in TEAMS {
            for b in TEAMS.iter().filter(|b| b.id != a.id) {
                assert!(a.members.iter().all(|m| !b.has_member(m)));
            }
        }
    }
}
