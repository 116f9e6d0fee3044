use crate::domain::model::{Couple, Participant};
use crate::utils::error::DrawError;
use std::collections::{HashMap, HashSet};

/// Index-based view of one draw's input: participant positions plus the
/// forbidden unordered pairs. Building it performs every precondition check,
/// so holding one means the input is well-formed.
#[derive(Debug, Clone)]
pub struct Constraints {
    size: usize,
    forbidden: HashSet<(usize, usize)>,
}

fn unordered(a: usize, b: usize) -> (usize, usize) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

impl Constraints {
    pub fn build(participants: &[Participant], couples: &[Couple]) -> Result<Self, DrawError> {
        if participants.len() < 2 {
            return Err(DrawError::InsufficientParticipants {
                count: participants.len(),
            });
        }

        let mut by_name: HashMap<&str, usize> = HashMap::with_capacity(participants.len());
        for (index, participant) in participants.iter().enumerate() {
            if by_name.insert(participant.name.as_str(), index).is_some() {
                return Err(DrawError::DuplicateParticipant {
                    name: participant.name.clone(),
                });
            }
        }

        let lookup = |name: &str| {
            by_name
                .get(name)
                .copied()
                .ok_or_else(|| DrawError::UnknownExclusionMember {
                    name: name.to_string(),
                })
        };

        let mut forbidden = HashSet::with_capacity(couples.len());
        for couple in couples {
            let first = lookup(&couple.person1)?;
            let second = lookup(&couple.person2)?;
            // A person paired with themself adds nothing: self-gifting is always illegal.
            if first != second {
                forbidden.insert(unordered(first, second));
            }
        }

        let constraints = Self {
            size: participants.len(),
            forbidden,
        };

        if constraints.size == 2 && !constraints.is_legal(0, 1) {
            return Err(DrawError::ImpossibleDraw {
                reason: format!(
                    "only 2 participants ({} and {}) and they are a couple",
                    participants[0].name, participants[1].name
                ),
            });
        }

        Ok(constraints)
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn is_legal(&self, giver: usize, receiver: usize) -> bool {
        giver != receiver && !self.forbidden.contains(&unordered(giver, receiver))
    }

    /// Whether any complete assignment exists, via augmenting paths on the
    /// giver/receiver bipartite graph. Exact, unlike the randomized search.
    pub fn has_complete_assignment(&self) -> bool {
        let mut receiver_taken_by: Vec<Option<usize>> = vec![None; self.size];

        for giver in 0..self.size {
            let mut visited = vec![false; self.size];
            if !self.augment(giver, &mut visited, &mut receiver_taken_by) {
                return false;
            }
        }
        true
    }

    fn augment(
        &self,
        giver: usize,
        visited: &mut [bool],
        receiver_taken_by: &mut [Option<usize>],
    ) -> bool {
        for receiver in 0..self.size {
            if visited[receiver] || !self.is_legal(giver, receiver) {
                continue;
            }
            visited[receiver] = true;

            let free = match receiver_taken_by[receiver] {
                None => true,
                Some(holder) => self.augment(holder, visited, receiver_taken_by),
            };
            if free {
                receiver_taken_by[receiver] = Some(giver);
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn people(names: &[&str]) -> Vec<Participant> {
        names.iter().map(|name| Participant::new(*name)).collect()
    }

    #[test]
    fn test_requires_two_participants() {
        assert_eq!(
            Constraints::build(&[], &[]).unwrap_err(),
            DrawError::InsufficientParticipants { count: 0 }
        );
        assert_eq!(
            Constraints::build(&people(&["Alice"]), &[]).unwrap_err(),
            DrawError::InsufficientParticipants { count: 1 }
        );
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let participants = vec![
            Participant::new("Alice"),
            Participant::new("Bob"),
            Participant::new("Alice").with_email("alice@example.com"),
        ];
        assert_eq!(
            Constraints::build(&participants, &[]).unwrap_err(),
            DrawError::DuplicateParticipant {
                name: "Alice".to_string()
            }
        );
    }

    #[test]
    fn test_names_unknown_couple_member() {
        let err = Constraints::build(
            &people(&["Alice", "Bob", "Carol"]),
            &[Couple::new("Alice", "Zed")],
        )
        .unwrap_err();
        assert_eq!(
            err,
            DrawError::UnknownExclusionMember {
                name: "Zed".to_string()
            }
        );
    }

    #[test]
    fn test_two_person_couple_is_impossible() {
        let err =
            Constraints::build(&people(&["Alice", "Bob"]), &[Couple::new("Bob", "Alice")])
                .unwrap_err();
        assert!(matches!(err, DrawError::ImpossibleDraw { .. }));
    }

    #[test]
    fn test_two_strangers_are_fine() {
        let constraints = Constraints::build(&people(&["Alice", "Bob"]), &[]).unwrap();
        assert!(constraints.is_legal(0, 1));
        assert!(constraints.is_legal(1, 0));
        assert!(!constraints.is_legal(0, 0));
    }

    #[test]
    fn test_couples_forbid_both_directions() {
        let constraints = Constraints::build(
            &people(&["Alice", "Bob", "Carol"]),
            &[Couple::new("Alice", "Bob")],
        )
        .unwrap();
        assert!(!constraints.is_legal(0, 1));
        assert!(!constraints.is_legal(1, 0));
        assert!(constraints.is_legal(0, 2));
    }

    #[test]
    fn test_complete_assignment_detection() {
        let two_couples = Constraints::build(
            &people(&["Alice", "Bob", "Carol", "Dave"]),
            &[Couple::new("Alice", "Bob"), Couple::new("Carol", "Dave")],
        )
        .unwrap();
        assert!(two_couples.has_complete_assignment());

        let alice_blocked = Constraints::build(
            &people(&["Alice", "Bob", "Carol"]),
            &[Couple::new("Alice", "Bob"), Couple::new("Alice", "Carol")],
        )
        .unwrap();
        assert!(!alice_blocked.has_complete_assignment());
    }
}
