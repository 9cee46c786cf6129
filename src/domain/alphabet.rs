/// The character wheel: the fixed, ordered set of faces a roller cell can
/// show. Ordering is significant. Stepping always moves forward through
/// the sequence and wraps from the last face back to the first, exactly
/// like the printed drum of a mechanical split-flap unit.

use std::collections::VecDeque;

/// Faces of the standard board wheel. The leading blank doubles as the
/// fallback face for input the wheel cannot display.
pub const WHEEL: &str = " ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789.:/-";

#[derive(Clone, Debug)]
pub struct Alphabet {
    faces: Vec<char>,
}

impl Alphabet {
    /// Build a wheel from an ordered run of faces. The first face is the
    /// blank. Faces must be unique; a duplicate would make the forward
    /// path between two faces ambiguous.
    pub fn new(faces: &str) -> Self {
        let faces: Vec<char> = faces.chars().collect();
        debug_assert!(!faces.is_empty(), "a wheel needs at least one face");
        debug_assert!(
            faces
                .iter()
                .collect::<std::collections::HashSet<_>>()
                .len()
                == faces.len(),
            "wheel faces must be unique"
        );
        Alphabet { faces }
    }

    pub fn len(&self) -> usize {
        self.faces.len()
    }

    /// The face shown for input the wheel cannot display.
    pub fn blank(&self) -> char {
        self.faces[0]
    }

    /// Position of a face on the wheel, if it is on the wheel.
    pub fn index_of(&self, c: char) -> Option<usize> {
        self.faces.iter().position(|&f| f == c)
    }

    /// Map arbitrary input onto the wheel: members pass through, anything
    /// else becomes the blank face.
    pub fn coerce(&self, c: char) -> char {
        if self.index_of(c).is_some() {
            c
        } else {
            self.blank()
        }
    }

    /// Every face visited when rolling forward from `from` to `to`,
    /// excluding `from`, including `to`. Empty when the two coincide.
    /// The walk never reverses, so a target one position "behind" the
    /// displayed face costs a full revolution minus one step.
    pub fn steps_between(&self, from: char, to: char) -> VecDeque<char> {
        let from = self.coerce(from);
        let to = self.coerce(to);
        let mut path = VecDeque::new();
        if from == to {
            return path;
        }
        // coerce() has already pinned both faces onto the wheel
        let mut i = self.index_of(from).unwrap_or(0);
        let goal = self.index_of(to).unwrap_or(0);
        while i != goal {
            i = (i + 1) % self.faces.len();
            path.push_back(self.faces[i]);
        }
        path
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Alphabet::new(WHEEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_wheel_shape() {
        let wheel = Alphabet::default();
        assert_eq!(wheel.len(), 41); // blank + 26 letters + 10 digits + ".:/-"
        assert_eq!(wheel.blank(), ' ');
        for (i, face) in WHEEL.chars().enumerate() {
            assert_eq!(wheel.index_of(face), Some(i));
        }
    }

    #[test]
    fn coerce_passes_members_through() {
        let wheel = Alphabet::default();
        assert_eq!(wheel.coerce(' '), ' ');
        assert_eq!(wheel.coerce('A'), 'A');
        assert_eq!(wheel.coerce('0'), '0');
        assert_eq!(wheel.coerce(':'), ':');
        assert_eq!(wheel.coerce('-'), '-');
    }

    #[test]
    fn coerce_maps_unknown_input_to_blank() {
        let wheel = Alphabet::default();
        assert_eq!(wheel.coerce('a'), ' '); // lowercase is not on the wheel
        assert_eq!(wheel.coerce('?'), ' ');
        assert_eq!(wheel.coerce('é'), ' ');
    }

    #[test]
    fn path_is_forward_and_contiguous() {
        let wheel = Alphabet::default();
        let path = wheel.steps_between('A', 'E');
        assert_eq!(path, ['B', 'C', 'D', 'E']);

        // every hop is exactly one position forward
        let mut prev = wheel.index_of('A').unwrap();
        for &face in &path {
            let i = wheel.index_of(face).unwrap();
            assert_eq!(i, (prev + 1) % wheel.len());
            prev = i;
        }
    }

    #[test]
    fn path_between_equal_faces_is_empty() {
        let wheel = Alphabet::default();
        assert!(wheel.steps_between('K', 'K').is_empty());
        assert!(wheel.steps_between('?', ' ').is_empty()); // both coerce to blank
    }

    #[test]
    fn path_wraps_from_last_face_to_first() {
        let wheel = Alphabet::default();
        assert_eq!(wheel.steps_between('-', ' '), [' ']); // one step, not a revolution
    }

    #[test]
    fn backward_target_takes_the_long_way_round() {
        let tiny = Alphabet::new(" AB");
        assert_eq!(tiny.steps_between('B', 'A'), [' ', 'A']);

        let wheel = Alphabet::default();
        assert_eq!(wheel.steps_between('B', 'A').len(), wheel.len() - 1);
    }

    #[test]
    fn path_length_matches_circular_distance() {
        let wheel = Alphabet::default();
        let n = wheel.len();
        for (i, from) in WHEEL.chars().enumerate() {
            for (j, to) in WHEEL.chars().enumerate() {
                let want = (j + n - i) % n;
                assert_eq!(wheel.steps_between(from, to).len(), want);
            }
        }
    }
}
