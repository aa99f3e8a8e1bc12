//! The twenty standard amino acids.

use serde::Serialize;

/// Side-chain functional group (Gutteridge classification).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FunctionalGroup {
    /// No reactive group.
    None,
    /// Arginine.
    Guanidinium,
    /// Asparagine, glutamine.
    Amide,
    /// Aspartate, glutamate.
    Carboxylate,
    /// Cysteine, methionine.
    Thiol,
    /// Histidine.
    Imidazole,
    /// Lysine.
    Amino,
    /// Serine, threonine, tyrosine.
    Hydroxyl,
}

/// Static description of one residue type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AminoAcid {
    /// One-letter code.
    pub one_letter: char,
    /// Three-letter code.
    pub three_letter: &'static str,
    /// Full name.
    pub name: &'static str,
    /// Side-chain functional group.
    pub group: FunctionalGroup,
}

const fn aa(
    one_letter: char,
    three_letter: &'static str,
    name: &'static str,
    group: FunctionalGroup,
) -> AminoAcid {
    AminoAcid {
        one_letter,
        three_letter,
        name,
        group,
    }
}

/// All standard amino acids, alphabetical by name.
pub const AMINO_ACIDS: [AminoAcid; 20] = [
    aa('A', "Ala", "alanine", FunctionalGroup::None),
    aa('R', "Arg", "arginine", FunctionalGroup::Guanidinium),
    aa('N', "Asn", "asparagine", FunctionalGroup::Amide),
    aa('D', "Asp", "aspartic acid", FunctionalGroup::Carboxylate),
    aa('C', "Cys", "cysteine", FunctionalGroup::Thiol),
    aa('Q', "Gln", "glutamine", FunctionalGroup::Amide),
    aa('E', "Glu", "glutamic acid", FunctionalGroup::Carboxylate),
    aa('G', "Gly", "glycine", FunctionalGroup::None),
    aa('H', "His", "histidine", FunctionalGroup::Imidazole),
    aa('I', "Ile", "isoleucine", FunctionalGroup::None),
    aa('L', "Leu", "leucine", FunctionalGroup::None),
    aa('K', "Lys", "lysine", FunctionalGroup::Amino),
    aa('M', "Met", "methionine", FunctionalGroup::Thiol),
    aa('F', "Phe", "phenylalanine", FunctionalGroup::None),
    aa('P', "Pro", "proline", FunctionalGroup::None),
    aa('S', "Ser", "serine", FunctionalGroup::Hydroxyl),
    aa('T', "Thr", "threonine", FunctionalGroup::Hydroxyl),
    aa('W', "Trp", "tryptophan", FunctionalGroup::None),
    aa('Y', "Tyr", "tyrosine", FunctionalGroup::Hydroxyl),
    aa('V', "Val", "valine", FunctionalGroup::None),
];

impl AminoAcid {
    /// Look up by one-letter code (case-insensitive).
    #[must_use]
    pub fn from_one_letter(code: char) -> Option<&'static Self> {
        let code = code.to_ascii_uppercase();
        AMINO_ACIDS.iter().find(|a| a.one_letter == code)
    }

    /// Look up by alignment symbol. Gaps and unknown codes yield `None`.
    #[must_use]
    pub fn from_symbol(symbol: u8) -> Option<&'static Self> {
        Self::from_one_letter(char::from(symbol))
    }

    /// Look up by three-letter code (case-insensitive).
    #[must_use]
    pub fn from_three_letter(code: &str) -> Option<&'static Self> {
        AMINO_ACIDS
            .iter()
            .find(|a| a.three_letter.eq_ignore_ascii_case(code))
    }
}
