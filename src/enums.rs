/// Anatomical plane, used to select the axis an operation works along.
///
/// Volumes are indexed `(axial, coronal, sagittal)`: slicing, projecting or
/// holding fixed along `Axial` means axis 0, `Coronal` axis 1 and
/// `Sagittal` axis 2.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    Axial,
    Coronal,
    Sagittal,
}

impl Orientation {
    /// Index of the array axis this orientation selects.
    pub fn axis(self) -> usize {
        match self {
            Orientation::Axial => 0,
            Orientation::Coronal => 1,
            Orientation::Sagittal => 2,
        }
    }

    /// The two remaining axes, in increasing order.
    pub fn plane_axes(self) -> (usize, usize) {
        match self {
            Orientation::Axial => (1, 2),
            Orientation::Coronal => (0, 2),
            Orientation::Sagittal => (0, 1),
        }
    }
}

/// How samples along the projection axis are collapsed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Reduction {
    /// MIP
    #[default]
    Maximum,
    /// AIP
    Average,
    /// MinIP
    Minimum,
}

/// Destination coordinates fed into the rotation transform.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SamplingGrid {
    /// Integer voxel indices `0, 1, .., dim - 1`.
    #[default]
    Unit,
    /// `dim` points spread evenly over `[0, dim]`, both ends included.
    EndpointInclusive,
}

/// Which coordinates decide that a destination gets the background value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BoundsMask {
    /// Both masks test the first plane coordinate; the second mask uses it
    /// after clamping, against the second axis' extent.
    #[default]
    Legacy,
    /// Each coordinate is tested against its own axis.
    PerAxis,
}

#[derive(Default)]
pub enum SortBy {
    #[default]
    ImagePositionPatient,
    TablePosition,
    InstanceNumber,
    None,
}
