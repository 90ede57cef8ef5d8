//! Monthly table sets, pooled or per station.

use crate::error::EcdfError;
use crate::table::EmpiricalCdf;

/// One [`EmpiricalCdf`] per calendar month.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthlyCdfs {
    months: [EmpiricalCdf; 12],
}

impl MonthlyCdfs {
    /// Wraps twelve tables, January first.
    pub fn new(months: [EmpiricalCdf; 12]) -> Self {
        Self { months }
    }

    /// Returns the table for a 1-indexed calendar month.
    ///
    /// # Panics
    ///
    /// Panics if `month` is 0 or greater than 12.
    pub fn month(&self, month: u8) -> &EmpiricalCdf {
        assert!(
            (1..=12).contains(&month),
            "month must be in 1..=12, got {month}"
        );
        &self.months[(month - 1) as usize]
    }

    /// Iterates over `(month, table)` pairs in calendar order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &EmpiricalCdf)> {
        self.months
            .iter()
            .enumerate()
            .map(|(i, cdf)| ((i + 1) as u8, cdf))
    }

    /// Returns the 1-indexed months whose table is empty.
    pub fn empty_months(&self) -> Vec<u8> {
        self.iter()
            .filter(|(_, cdf)| cdf.is_empty())
            .map(|(m, _)| m)
            .collect()
    }
}

/// A station-month stratum left below the pooling threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Underfilled {
    /// Station index.
    pub station: usize,
    /// 1-indexed calendar month.
    pub month: u8,
    /// Number of observations in the accepted table.
    pub n_obs: usize,
}

#[derive(Debug, Clone, PartialEq)]
enum Layout {
    Pooled(MonthlyCdfs),
    PerStation(Vec<MonthlyCdfs>),
}

/// The full set of monthly tables used by one processing run.
///
/// Built once by [`build_monthly_cdfs`](crate::build_monthly_cdfs) or
/// assembled from external tables, then shared read-only by the forward
/// and inverse transforms.
#[derive(Debug, Clone, PartialEq)]
pub struct CdfTables {
    layout: Layout,
    underfilled: Vec<Underfilled>,
    missing_stations: Vec<usize>,
}

impl CdfTables {
    /// One set of monthly tables shared by every station.
    pub fn pooled(months: MonthlyCdfs) -> Self {
        Self {
            layout: Layout::Pooled(months),
            underfilled: Vec::new(),
            missing_stations: Vec::new(),
        }
    }

    /// One set of monthly tables per station, indexed by station.
    pub fn per_station(stations: Vec<MonthlyCdfs>) -> Self {
        Self {
            layout: Layout::PerStation(stations),
            underfilled: Vec::new(),
            missing_stations: Vec::new(),
        }
    }

    pub(crate) fn with_diagnostics(
        mut self,
        underfilled: Vec<Underfilled>,
        missing_stations: Vec<usize>,
    ) -> Self {
        self.underfilled = underfilled;
        self.missing_stations = missing_stations;
        self
    }

    /// Returns `true` if all stations share one set of tables.
    pub fn is_pooled(&self) -> bool {
        matches!(self.layout, Layout::Pooled(_))
    }

    /// Number of stations covered, or `None` for pooled tables.
    pub fn n_stations(&self) -> Option<usize> {
        match &self.layout {
            Layout::Pooled(_) => None,
            Layout::PerStation(stations) => Some(stations.len()),
        }
    }

    /// Returns the monthly tables that apply to `station`.
    ///
    /// # Panics
    ///
    /// Panics if the tables are per station and `station` is out of range.
    pub fn station(&self, station: usize) -> &MonthlyCdfs {
        match &self.layout {
            Layout::Pooled(months) => months,
            Layout::PerStation(stations) => &stations[station],
        }
    }

    /// Returns the table for `station` and a 1-indexed `month`.
    ///
    /// # Panics
    ///
    /// Panics if `station` is out of range for per-station tables or
    /// `month` is outside 1..=12.
    pub fn get(&self, station: usize, month: u8) -> &EmpiricalCdf {
        self.station(station).month(month)
    }

    /// Station-month strata still below `min_num_obs` after pooling.
    pub fn underfilled(&self) -> &[Underfilled] {
        &self.underfilled
    }

    /// Stations whose historical record was entirely missing.
    pub fn missing_stations(&self) -> &[usize] {
        &self.missing_stations
    }

    /// Checks that the tables cover `n_units` stations or cells.
    pub(crate) fn check_units(&self, n_units: usize) -> Result<(), EcdfError> {
        match self.n_stations() {
            Some(n) if n != n_units => Err(EcdfError::StationCountMismatch {
                tables: n,
                data: n_units,
            }),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monthly(values: &[f64]) -> MonthlyCdfs {
        MonthlyCdfs::new(std::array::from_fn(|_| {
            EmpiricalCdf::from_observations(values)
        }))
    }

    #[test]
    fn pooled_serves_every_station() {
        let tables = CdfTables::pooled(monthly(&[1.0, 2.0]));
        assert!(tables.is_pooled());
        assert_eq!(tables.n_stations(), None);
        assert_eq!(tables.get(0, 1).len(), 2);
        assert_eq!(tables.get(999, 12).len(), 2);
        assert!(tables.check_units(17).is_ok());
    }

    #[test]
    fn per_station_indexes_by_station() {
        let tables = CdfTables::per_station(vec![monthly(&[1.0]), monthly(&[1.0, 2.0, 3.0])]);
        assert!(!tables.is_pooled());
        assert_eq!(tables.n_stations(), Some(2));
        assert_eq!(tables.get(0, 5).len(), 1);
        assert_eq!(tables.get(1, 5).len(), 3);
    }

    #[test]
    fn per_station_unit_check() {
        let tables = CdfTables::per_station(vec![monthly(&[1.0]); 3]);
        assert!(tables.check_units(3).is_ok());
        assert_eq!(
            tables.check_units(4),
            Err(EcdfError::StationCountMismatch { tables: 3, data: 4 })
        );
    }

    #[test]
    fn empty_months_listed() {
        let mut months: [EmpiricalCdf; 12] = Default::default();
        months[2] = EmpiricalCdf::from_observations(&[1.0]);
        let m = MonthlyCdfs::new(months);
        let empty = m.empty_months();
        assert_eq!(empty.len(), 11);
        assert!(!empty.contains(&3));
    }

    #[test]
    #[should_panic(expected = "month must be in 1..=12")]
    fn month_zero_panics() {
        let _ = monthly(&[1.0]).month(0);
    }
}
