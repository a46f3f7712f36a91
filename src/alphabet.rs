//! Minimal alphabet surface: just enough to pick a packing mode and validate
//! the index header's alphabet field. Not a general digital-alphabet library.

use crate::error::{Error, FormatError};

/// The sentinel residue code, shared by both packings. Reserved; never a real residue.
pub const SENTINEL: u8 = 31;

/// One of the three alphabets this format understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlphabetKind {
    Protein,
    Dna,
    Rna,
}

impl AlphabetKind {
    /// Decode the numeric encoding stored in the index header's alphabet field.
    pub fn from_u32(value: u32) -> Result<Self, Error> {
        match value {
            0 => Ok(Self::Protein),
            1 => Ok(Self::Dna),
            2 => Ok(Self::Rna),
            other => Err(FormatError::UnknownAlphabet(other).into()),
        }
    }

    /// The numeric encoding written into the index header's alphabet field.
    pub fn as_u32(self) -> u32 {
        match self {
            Self::Protein => 0,
            Self::Dna => 1,
            Self::Rna => 2,
        }
    }

    pub fn is_protein(self) -> bool {
        matches!(self, Self::Protein)
    }

    /// Residues packed per full packet under this alphabet's chosen encoding:
    /// 6 for protein (always 5-bit), 15 for nucleotide (2-bit when canonical).
    pub fn residues_per_packet(self) -> usize {
        if self.is_protein() {
            6
        } else {
            15
        }
    }
}

/// Canonical nucleotide codes are 0..3 (A/C/G/T or A/C/G/U); anything above is
/// degenerate (ambiguity codes) and forces a 5-bit packet. Meaningless for protein,
/// which is always 5-bit regardless of this check.
pub fn is_canonical(code: u8) -> bool {
    code <= 3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_numeric_encoding() {
        for kind in [AlphabetKind::Protein, AlphabetKind::Dna, AlphabetKind::Rna] {
            assert_eq!(AlphabetKind::from_u32(kind.as_u32()).unwrap(), kind);
        }
    }

    #[test]
    fn rejects_unknown_alphabet() {
        assert!(AlphabetKind::from_u32(7).is_err());
    }

    #[test]
    fn residues_per_packet_matches_packing_choice() {
        assert_eq!(AlphabetKind::Protein.residues_per_packet(), 6);
        assert_eq!(AlphabetKind::Dna.residues_per_packet(), 15);
        assert_eq!(AlphabetKind::Rna.residues_per_packet(), 15);
    }

    #[test]
    fn canonical_boundary() {
        assert!(is_canonical(0));
        assert!(is_canonical(3));
        assert!(!is_canonical(4));
        assert!(!is_canonical(SENTINEL));
    }
}
