//! Nearest-neighbor station rankings used for sparse-station pooling.

use ndarray::ArrayView2;

/// For each station, the other stations ordered from nearest to farthest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NeighborRanking {
    ranks: Vec<Vec<usize>>,
}

impl NeighborRanking {
    /// Creates a ranking from one ordered neighbor list per station.
    pub fn new(ranks: Vec<Vec<usize>>) -> Self {
        Self { ranks }
    }

    /// Creates a ranking from an `(n_stations, k)` index table.
    ///
    /// Negative entries mark missing neighbors and are dropped.
    pub fn from_index_table(table: ArrayView2<'_, i64>) -> Self {
        let ranks = table
            .outer_iter()
            .map(|row| {
                row.iter()
                    .filter_map(|&i| usize::try_from(i).ok())
                    .collect()
            })
            .collect();
        Self { ranks }
    }

    /// Ordered neighbors of `station`; empty if the station is unknown.
    pub fn neighbors(&self, station: usize) -> &[usize] {
        match self.ranks.get(station) {
            Some(ranked) => ranked,
            None => &[],
        }
    }

    /// Number of stations with a neighbor list.
    pub fn n_stations(&self) -> usize {
        self.ranks.len()
    }
}
