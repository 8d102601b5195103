// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Morphology data model: locations, points, cable branches and unit branches.

Cable branches are the user-level branches, in submission order. Unit branches
split cable branches wherever the label set changes and form the tree that
parameters are resolved on. Both live in arenas owned by the
[`Schematic`](crate::Schematic) and refer to each other by id.
*/

use std::fmt;
use std::ops::Range;

use arbora_definitions::CableType;

/// A point on a cable branch: `(branch, point)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Location {
    pub branch: usize,
    pub point: usize,
}

impl Location {
    pub fn new(branch: usize, point: usize) -> Self {
        Self { branch, point }
    }
}

impl From<(usize, usize)> for Location {
    fn from((branch, point): (usize, usize)) -> Self {
        Self { branch, point }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}.{})", self.branch, self.point)
    }
}

/// Index of a cable branch in its schematic
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CableBranchId(pub usize);

/// Index of a unit branch in its schematic
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnitBranchId(pub usize);

impl fmt::Display for CableBranchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cable {}", self.0)
    }
}

impl fmt::Display for UnitBranchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unit {}", self.0)
    }
}

/// A 3D sample of the morphology. Immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    location: Location,
    coords: [f64; 3],
    radius: f64,
    unit: UnitBranchId,
}

impl Point {
    pub(crate) fn new(location: Location, coords: [f64; 3], radius: f64, unit: UnitBranchId) -> Self {
        Self {
            location,
            coords,
            radius,
            unit,
        }
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn coords(&self) -> [f64; 3] {
        self.coords
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Unit branch owning this point
    pub fn unit(&self) -> UnitBranchId {
        self.unit
    }

    pub(crate) fn distance(&self, other: &Point) -> f64 {
        self.coords
            .iter()
            .zip(other.coords.iter())
            .map(|(a, b)| (a - b).powi(2))
            .sum::<f64>()
            .sqrt()
    }
}

/// User-level branch: points in submission order.
#[derive(Debug, Clone, PartialEq)]
pub struct CableBranch {
    pub(crate) id: CableBranchId,
    pub(crate) points: Vec<Point>,
    pub(crate) parent: Option<CableBranchId>,
    pub(crate) children: Vec<CableBranchId>,
    pub(crate) units: Vec<UnitBranchId>,
}

impl CableBranch {
    pub(crate) fn new(id: CableBranchId) -> Self {
        Self {
            id,
            points: Vec::new(),
            parent: None,
            children: Vec::new(),
            units: Vec::new(),
        }
    }

    pub fn id(&self) -> CableBranchId {
        self.id
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn parent(&self) -> Option<CableBranchId> {
        self.parent
    }

    pub fn children(&self) -> &[CableBranchId] {
        &self.children
    }

    /// Unit branches this cable is split into, in point order
    pub fn units(&self) -> &[UnitBranchId] {
        &self.units
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Maximal run of consecutive points on one cable branch sharing a label set.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitBranch<V = f64> {
    pub(crate) id: UnitBranchId,
    pub(crate) cable: CableBranchId,
    pub(crate) points: Range<usize>,
    pub(crate) labels: Vec<String>,
    pub(crate) parent: Option<UnitBranchId>,
    pub(crate) children: Vec<UnitBranchId>,
    pub(crate) definition: Option<CableType<V>>,
}

impl<V> UnitBranch<V> {
    pub fn id(&self) -> UnitBranchId {
        self.id
    }

    pub fn cable(&self) -> CableBranchId {
        self.cable
    }

    /// Index range of this unit's points on its cable branch
    pub fn point_range(&self) -> Range<usize> {
        self.points.clone()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Label set, sorted and deduplicated
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn parent(&self) -> Option<UnitBranchId> {
        self.parent
    }

    pub fn children(&self) -> &[UnitBranchId] {
        &self.children
    }

    /// Resolved cable type; `None` until the schematic is frozen.
    pub fn definition(&self) -> Option<&CableType<V>> {
        self.definition.as_ref()
    }
}

/// Sorted, deduplicated copy of `labels`.
pub fn label_set<S: AsRef<str>>(labels: &[S]) -> Vec<String> {
    let mut set: Vec<String> = labels.iter().map(|label| label.as_ref().to_string()).collect();
    set.sort();
    set.dedup();
    set
}

/// `location (b.p)` for a single point, `interval (b.p1-p2)` otherwise.
pub fn location_name(points: &[Point]) -> String {
    match points {
        [] => "empty interval".to_string(),
        [point] => format!("location {}", point.location),
        [first, .., last] => format!(
            "interval ({}.{}-{})",
            first.location.branch, first.location.point, last.location.point
        ),
    }
}

/// Normalized cumulative arc length at each point, from 0 to 1.
///
/// All zeros when the points span no distance.
pub fn arc_lengths(points: &[Point]) -> Vec<f64> {
    let mut total = 0.0;
    let mut cumulative = Vec::with_capacity(points.len());
    let mut previous: Option<&Point> = None;
    for point in points {
        if let Some(previous) = previous {
            total += previous.distance(point);
        }
        cumulative.push(total);
        previous = Some(point);
    }
    if total > 0.0 {
        for value in &mut cumulative {
            *value /= total;
        }
    }
    cumulative
}
