//! Cold-spot tables shared by the PTC and GNC files.

use crate::record::{ColumnDef, RecordBuilder};
use crate::types::TypeDescriptor;

pub const COLD_SPOT_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("AmpNum", TypeDescriptor::Int16, "Amplifier number, 1-based"),
    ColumnDef::new("PixCount", TypeDescriptor::Int16, "Number of cold pixels"),
    ColumnDef::new("SpotX", TypeDescriptor::Int16, "The X-pixel nearest to the spot center"),
    ColumnDef::new("SpotY", TypeDescriptor::Int16, "The Y-pixel nearest to the spot center"),
];

/// Cold spots found on one amplifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColdSpotGroup {
    /// 1-based amplifier number
    pub amp: i16,
    /// Cold pixels across all of this amplifier's spots
    pub pixel_count: i16,
    /// Spot centers
    pub spots: Vec<(i16, i16)>,
}

/// The four parallel cold-spot columns, one row per spot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColdSpotColumns {
    pub amp_num: Vec<i16>,
    pub pix_count: Vec<i16>,
    pub spot_x: Vec<i16>,
    pub spot_y: Vec<i16>,
}

impl ColdSpotColumns {
    pub fn len(&self) -> usize {
        self.amp_num.len()
    }

    pub fn is_empty(&self) -> bool {
        self.amp_num.is_empty()
    }

    /// Sets the four cold-spot columns on a record builder.
    pub fn fill(self, builder: RecordBuilder) -> RecordBuilder {
        builder
            .column("AmpNum", self.amp_num)
            .column("PixCount", self.pix_count)
            .column("SpotX", self.spot_x)
            .column("SpotY", self.spot_y)
    }
}

/// Expands per-amplifier groups into one row per spot.
///
/// Each row gets the group's pixel count divided evenly (truncating)
/// among its spots. Groups without spots produce no rows.
pub fn flatten(groups: &[ColdSpotGroup]) -> ColdSpotColumns {
    let mut columns = ColdSpotColumns::default();
    for group in groups {
        if group.spots.is_empty() {
            continue;
        }
        let per_spot = i16::try_from(group.spots.len()).map_or(0, |n| group.pixel_count / n);
        for &(x, y) in &group.spots {
            columns.amp_num.push(group.amp);
            columns.pix_count.push(per_spot);
            columns.spot_x.push(x);
            columns.spot_y.push(y);
        }
    }
    columns
}
