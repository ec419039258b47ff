//! Compressed row storage for incidence relations.
//!
//! Row `i`'s entries live in `indices[offsets[i]..offsets[i + 1]]`, the same
//! offset/flat-list layout used for every adjacency in the grid.

/// Unsigned incidence (e.g. face -> nodes, cell -> nodes).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Incidence {
    offsets: Vec<usize>,
    indices: Vec<usize>,
}

impl Default for Incidence {
    fn default() -> Self {
        Self {
            offsets: vec![0],
            indices: Vec::new(),
        }
    }
}

impl Incidence {
    /// Build from one slice of column indices per row. Row order is kept.
    pub fn from_rows<R: AsRef<[usize]>>(rows: &[R]) -> Self {
        let mut offsets = Vec::with_capacity(rows.len() + 1);
        let mut indices = Vec::new();
        offsets.push(0);
        for row in rows {
            indices.extend_from_slice(row.as_ref());
            offsets.push(indices.len());
        }
        Self { offsets, indices }
    }

    pub fn num_rows(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Number of stored entries.
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    /// Column indices of row `i` (empty if `i` is out of range).
    pub fn row(&self, i: usize) -> &[usize] {
        if i >= self.num_rows() {
            return &[];
        }
        &self.indices[self.offsets[i]..self.offsets[i + 1]]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[usize]> + '_ {
        (0..self.num_rows()).map(move |i| self.row(i))
    }

    /// Transpose into `num_cols` rows. Entries of each transposed row are
    /// ordered by the source row index.
    pub fn transpose(&self, num_cols: usize) -> Incidence {
        self.transpose_with_permutation(num_cols).0
    }

    /// Transpose and also return, for every new entry, the position of the
    /// entry it came from.
    fn transpose_with_permutation(&self, num_cols: usize) -> (Incidence, Vec<usize>) {
        let mut offsets = vec![0usize; num_cols + 1];
        for &c in &self.indices {
            offsets[c + 1] += 1;
        }
        for i in 0..num_cols {
            offsets[i + 1] += offsets[i];
        }

        let mut next = offsets.clone();
        let mut indices = vec![0usize; self.indices.len()];
        let mut source = vec![0usize; self.indices.len()];
        for r in 0..self.num_rows() {
            for k in self.offsets[r]..self.offsets[r + 1] {
                let c = self.indices[k];
                indices[next[c]] = r;
                source[next[c]] = k;
                next[c] += 1;
            }
        }

        (Incidence { offsets, indices }, source)
    }
}

/// Incidence with an orientation sign (+1/-1) attached to every entry
/// (e.g. cell -> faces, face -> cells).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SignedIncidence {
    pattern: Incidence,
    signs: Vec<i8>,
}

impl SignedIncidence {
    /// Build from `(index, sign)` pairs per row.
    pub fn from_rows<R: AsRef<[(usize, i8)]>>(rows: &[R]) -> Self {
        let mut offsets = Vec::with_capacity(rows.len() + 1);
        let mut indices = Vec::new();
        let mut signs = Vec::new();
        offsets.push(0);
        for row in rows {
            for &(index, sign) in row.as_ref() {
                indices.push(index);
                signs.push(sign);
            }
            offsets.push(indices.len());
        }
        Self {
            pattern: Incidence { offsets, indices },
            signs,
        }
    }

    pub fn num_rows(&self) -> usize {
        self.pattern.num_rows()
    }

    pub fn nnz(&self) -> usize {
        self.pattern.nnz()
    }

    pub fn row_indices(&self, i: usize) -> &[usize] {
        self.pattern.row(i)
    }

    pub fn row_signs(&self, i: usize) -> &[i8] {
        if i >= self.num_rows() {
            return &[];
        }
        &self.signs[self.pattern.offsets[i]..self.pattern.offsets[i + 1]]
    }

    /// `(index, sign)` pairs of row `i`.
    pub fn row(&self, i: usize) -> impl Iterator<Item = (usize, i8)> + '_ {
        self.row_indices(i)
            .iter()
            .copied()
            .zip(self.row_signs(i).iter().copied())
    }

    /// Sign of entry `(i, j)`, if stored.
    pub fn sign(&self, i: usize, j: usize) -> Option<i8> {
        self.row(i).find(|&(index, _)| index == j).map(|(_, s)| s)
    }

    pub fn transpose(&self, num_cols: usize) -> SignedIncidence {
        let (pattern, source) = self.pattern.transpose_with_permutation(num_cols);
        let signs = source.iter().map(|&k| self.signs[k]).collect();
        SignedIncidence { pattern, signs }
    }
}
