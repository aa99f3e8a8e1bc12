//! Multiple-sequence alignment model and variant-column derivation.
//!
//! An [`AlignmentModel`] holds gap-padded sequences of equal length in
//! display order, one of which is the reference. Variant columns are derived
//! lazily by comparing every sequence against the reference symbol.

use crate::error::MsalinkError;
use crate::source::AlignmentPayload;

/// One-letter residue code (`-` or `.` for gaps).
pub type ResidueSymbol = u8;

/// One aligned sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    /// Display identifier.
    pub id: String,
    /// Gap-padded residue symbols.
    pub residues: Vec<ResidueSymbol>,
    /// Chain the sequence was extracted from.
    pub source_chain_id: String,
}

impl Sequence {
    /// Build a sequence from its one-letter string.
    pub fn new(
        id: impl Into<String>,
        residues: &str,
        source_chain_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            residues: residues.bytes().collect(),
            source_chain_id: source_chain_id.into(),
        }
    }

    /// Number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.residues.len()
    }

    /// Whether the sequence has no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    /// Symbol at `column`.
    #[must_use]
    pub fn symbol(&self, column: usize) -> Option<ResidueSymbol> {
        self.residues.get(column).copied()
    }
}

/// A column and whether it is variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantPosition {
    /// Alignment column.
    pub column: usize,
    /// At least one sequence differs from the reference here.
    pub is_variant: bool,
}

/// Aligned sequences plus the index of the reference sequence.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AlignmentModel {
    sequences: Vec<Sequence>,
    reference_index: usize,
}

impl AlignmentModel {
    /// Empty model; [`load`](Self::load) populates it.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the model with `sequences`, using the first as reference.
    ///
    /// # Errors
    ///
    /// [`MsalinkError::InvalidAlignment`] when `sequences` is empty or the
    /// lengths differ. The previous state is kept on error.
    pub fn load(&mut self, sequences: Vec<Sequence>) -> Result<(), MsalinkError> {
        self.load_with_reference(sequences, 0)
    }

    /// Replace the model, nominating `reference_index` as reference.
    ///
    /// # Errors
    ///
    /// [`MsalinkError::InvalidAlignment`] when `sequences` is empty, the
    /// lengths differ, or `reference_index` is out of bounds.
    pub fn load_with_reference(
        &mut self,
        sequences: Vec<Sequence>,
        reference_index: usize,
    ) -> Result<(), MsalinkError> {
        let Some(first) = sequences.first() else {
            return Err(MsalinkError::InvalidAlignment(
                "alignment contains no sequences".to_owned(),
            ));
        };
        let len = first.len();
        if let Some(bad) = sequences.iter().find(|s| s.len() != len) {
            return Err(MsalinkError::InvalidAlignment(format!(
                "sequence {} has {} columns, expected {len}",
                bad.id,
                bad.len()
            )));
        }
        if reference_index >= sequences.len() {
            return Err(MsalinkError::InvalidAlignment(format!(
                "reference index {reference_index} out of bounds for {} \
                 sequences",
                sequences.len()
            )));
        }

        log::debug!(
            "alignment loaded: {} sequences x {len} columns, reference {}",
            sequences.len(),
            sequences[reference_index].id
        );
        self.sequences = sequences;
        self.reference_index = reference_index;
        Ok(())
    }

    /// Build a model from a server payload. The chain whose id equals
    /// `reference_chain_id` becomes the reference, or the first chain if
    /// none matches.
    ///
    /// # Errors
    ///
    /// Same as [`load_with_reference`](Self::load_with_reference).
    pub fn from_payload(
        payload: &AlignmentPayload,
        reference_chain_id: &str,
    ) -> Result<Self, MsalinkError> {
        let sequences = payload
            .chains
            .iter()
            .map(|c| Sequence::new(c.id.clone(), &c.sequence, c.id.clone()))
            .collect();
        let reference = payload
            .chains
            .iter()
            .position(|c| c.id == reference_chain_id)
            .unwrap_or(0);
        let mut model = Self::new();
        model.load_with_reference(sequences, reference)?;
        Ok(model)
    }

    /// Sequences in display order.
    #[must_use]
    pub fn sequences(&self) -> &[Sequence] {
        &self.sequences
    }

    /// Number of sequences.
    #[must_use]
    pub fn sequence_count(&self) -> usize {
        self.sequences.len()
    }

    /// Number of columns shared by all sequences.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.sequences.first().map_or(0, Sequence::len)
    }

    /// Whether nothing has been loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    /// Index of the reference sequence.
    #[must_use]
    pub fn reference_index(&self) -> usize {
        self.reference_index
    }

    /// The reference sequence, if loaded.
    #[must_use]
    pub fn reference(&self) -> Option<&Sequence> {
        self.sequences.get(self.reference_index)
    }

    /// Symbols of every sequence at `column`, in display order.
    #[must_use]
    pub fn column(&self, column: usize) -> Option<Vec<ResidueSymbol>> {
        if column >= self.column_count() {
            return None;
        }
        Some(
            self.sequences
                .iter()
                .map(|s| s.residues[column])
                .collect(),
        )
    }

    /// Whether any sequence differs from the reference at `column`.
    ///
    /// Stops at the first mismatch.
    #[must_use]
    pub fn is_variant(&self, column: usize) -> bool {
        let Some(reference) =
            self.reference().and_then(|r| r.symbol(column))
        else {
            return false;
        };
        self.sequences
            .iter()
            .any(|s| s.residues[column] != reference)
    }

    /// Lazily yields every column where some sequence differs from the
    /// reference.
    #[must_use]
    pub fn variant_columns(&self) -> VariantColumns<'_> {
        VariantColumns {
            model: self,
            next: 0,
        }
    }

    /// Every column paired with its variant flag.
    pub fn variant_positions(
        &self,
    ) -> impl Iterator<Item = VariantPosition> + '_ {
        (0..self.column_count()).map(|column| VariantPosition {
            column,
            is_variant: self.is_variant(column),
        })
    }

    /// Columns where every sequence carries the reference symbol.
    pub fn conserved_columns(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.column_count()).filter(|&c| !self.is_variant(c))
    }
}

/// Iterator returned by [`AlignmentModel::variant_columns`].
pub struct VariantColumns<'a> {
    model: &'a AlignmentModel,
    next: usize,
}

impl Iterator for VariantColumns<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let len = self.model.column_count();
        while self.next < len {
            let column = self.next;
            self.next += 1;
            if self.model.is_variant(column) {
                return Some(column);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.model.column_count().saturating_sub(self.next)))
    }
}
