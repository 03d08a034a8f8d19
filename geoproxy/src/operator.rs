//! Operators of the geometry service with their parameters, arity and result shape.

use geoproxy_proto::{geometry_request, OperatorType};
use geoproxy_types::algorithm::GeneralizeParams;
use geoproxy_types::SpatialReference;

/// Number of geometry operands an operator takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Single (left) operand.
    Unary,
    /// Left and right operands.
    Binary,
}

impl Arity {
    /// Arity of a wire operator. `None` for an unknown operator.
    pub fn of(operator: OperatorType) -> Option<Self> {
        use OperatorType::*;

        match operator {
            UnknownOperator => None,
            Project | Buffer | GeodesicBuffer | Simplify | ConvexHull | GeneralizeByArea
            | DensifyByLength | GeodeticDensifyByLength | RandomPoints | GeodeticArea
            | GeodeticLength | AffineTransform => Some(Arity::Unary),
            Union | Intersection | Difference | SymmetricDifference | Distance | Equals
            | Contains | Within | Touches | Overlaps | Crosses | Disjoint | Intersects | Relate
            | GeodeticInverse => Some(Arity::Binary),
        }
    }
}

/// Kind of value an operator produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultShape {
    /// A geometry.
    Geometry,
    /// A number: length, area or distance.
    Measure,
    /// A boolean spatial relationship.
    Relationship,
    /// A DE-9IM matrix string.
    RelateMatrix,
    /// Azimuths and distance between two points.
    GeodeticInverse,
}

impl ResultShape {
    /// Result shape of a wire operator. RELATE produces a boolean when a pattern is given.
    pub fn of(operator: OperatorType, has_pattern: bool) -> Option<Self> {
        use OperatorType::*;

        match operator {
            UnknownOperator => None,
            Project | Buffer | GeodesicBuffer | Simplify | ConvexHull | GeneralizeByArea
            | DensifyByLength | GeodeticDensifyByLength | RandomPoints | AffineTransform
            | Union | Intersection | Difference | SymmetricDifference => {
                Some(ResultShape::Geometry)
            }
            GeodeticArea | GeodeticLength | Distance => Some(ResultShape::Measure),
            Equals | Contains | Within | Touches | Overlaps | Crosses | Disjoint | Intersects => {
                Some(ResultShape::Relationship)
            }
            Relate if has_pattern => Some(ResultShape::Relationship),
            Relate => Some(ResultShape::RelateMatrix),
            GeodeticInverse => Some(ResultShape::GeodeticInverse),
        }
    }
}

/// Operation to run on the geometry service, with its parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum Operator {
    /// Reprojects the geometry.
    Project {
        /// Target spatial reference.
        to: SpatialReference,
    },
    /// Planar buffer in the units of the operation spatial reference.
    Buffer {
        #[allow(missing_docs)]
        distance: f64,
    },
    /// Buffer on the ellipsoid.
    GeodesicBuffer {
        /// Distance in meters.
        distance_m: f64,
    },
    /// Douglas-Peucker simplification.
    Simplify {
        #[allow(missing_docs)]
        tolerance: f64,
        /// Keep rings valid.
        preserve_topology: bool,
    },
    #[allow(missing_docs)]
    ConvexHull,
    /// Removes vertices that contribute the least area.
    GeneralizeByArea(GeneralizeParams),
    /// Inserts vertices so no segment is longer than the limit.
    DensifyByLength {
        #[allow(missing_docs)]
        max_length: f64,
    },
    /// Inserts points along geodesics so no segment is longer than the limit.
    GeodeticDensifyByLength {
        /// Maximum segment length in meters.
        max_length_m: f64,
    },
    /// Random points inside a polygon.
    RandomPoints {
        /// Density of the points.
        points_per_square_km: f64,
        /// Seed of the generator. Random when not set.
        seed: Option<u64>,
    },
    /// Area on the ellipsoid, square meters.
    GeodeticArea,
    /// Length on the ellipsoid, meters.
    GeodeticLength,
    #[allow(missing_docs)]
    Union,
    #[allow(missing_docs)]
    Intersection,
    #[allow(missing_docs)]
    Difference,
    #[allow(missing_docs)]
    SymmetricDifference,
    /// Planar distance in the operation spatial reference.
    Distance,
    #[allow(missing_docs)]
    Equals,
    #[allow(missing_docs)]
    Contains,
    #[allow(missing_docs)]
    Within,
    #[allow(missing_docs)]
    Touches,
    #[allow(missing_docs)]
    Overlaps,
    #[allow(missing_docs)]
    Crosses,
    #[allow(missing_docs)]
    Disjoint,
    #[allow(missing_docs)]
    Intersects,
    /// DE-9IM matrix, or a match against the pattern if given.
    Relate {
        #[allow(missing_docs)]
        pattern: Option<String>,
    },
    /// Azimuths and distance between two points on the ellipsoid.
    GeodeticInverse,
    /// Shifts the geometry.
    AffineTransform {
        #[allow(missing_docs)]
        x_offset: f64,
        #[allow(missing_docs)]
        y_offset: f64,
    },
}

impl Operator {
    /// Wire operator type.
    pub fn operator_type(&self) -> OperatorType {
        match self {
            Operator::Project { .. } => OperatorType::Project,
            Operator::Buffer { .. } => OperatorType::Buffer,
            Operator::GeodesicBuffer { .. } => OperatorType::GeodesicBuffer,
            Operator::Simplify { .. } => OperatorType::Simplify,
            Operator::ConvexHull => OperatorType::ConvexHull,
            Operator::GeneralizeByArea(_) => OperatorType::GeneralizeByArea,
            Operator::DensifyByLength { .. } => OperatorType::DensifyByLength,
            Operator::GeodeticDensifyByLength { .. } => OperatorType::GeodeticDensifyByLength,
            Operator::RandomPoints { .. } => OperatorType::RandomPoints,
            Operator::GeodeticArea => OperatorType::GeodeticArea,
            Operator::GeodeticLength => OperatorType::GeodeticLength,
            Operator::Union => OperatorType::Union,
            Operator::Intersection => OperatorType::Intersection,
            Operator::Difference => OperatorType::Difference,
            Operator::SymmetricDifference => OperatorType::SymmetricDifference,
            Operator::Distance => OperatorType::Distance,
            Operator::Equals => OperatorType::Equals,
            Operator::Contains => OperatorType::Contains,
            Operator::Within => OperatorType::Within,
            Operator::Touches => OperatorType::Touches,
            Operator::Overlaps => OperatorType::Overlaps,
            Operator::Crosses => OperatorType::Crosses,
            Operator::Disjoint => OperatorType::Disjoint,
            Operator::Intersects => OperatorType::Intersects,
            Operator::Relate { .. } => OperatorType::Relate,
            Operator::GeodeticInverse => OperatorType::GeodeticInverse,
            Operator::AffineTransform { .. } => OperatorType::AffineTransform,
        }
    }

    /// Wire name, e.g. `GEODESIC_BUFFER`.
    pub fn name(&self) -> &'static str {
        self.operator_type().as_str_name()
    }

    #[allow(missing_docs)]
    pub fn arity(&self) -> Arity {
        Arity::of(self.operator_type()).unwrap_or(Arity::Unary)
    }

    #[allow(missing_docs)]
    pub fn result_shape(&self) -> ResultShape {
        ResultShape::of(self.operator_type(), self.relate_pattern().is_some())
            .unwrap_or(ResultShape::Geometry)
    }

    /// DE-9IM pattern of a RELATE operator. An empty pattern is the same as none, matching
    /// the wire where an empty `de9im` asks for the matrix.
    pub fn relate_pattern(&self) -> Option<&str> {
        match self {
            Operator::Relate {
                pattern: Some(pattern),
            } if !pattern.is_empty() => Some(pattern),
            _ => None,
        }
    }

    /// Name of the local kernel entry computing the same planar result, if there is one.
    /// Operators without an entry always need a service round trip.
    pub fn kernel_name(&self) -> Option<&'static str> {
        Some(match self {
            Operator::Buffer { .. } => "buffer",
            Operator::Simplify {
                preserve_topology: true,
                ..
            } => "topology_preserve_simplify",
            Operator::Simplify { .. } => "simplify",
            Operator::ConvexHull => "convex_hull",
            Operator::Union => "union",
            Operator::Intersection => "intersection",
            Operator::Difference => "difference",
            Operator::SymmetricDifference => "symmetric_difference",
            Operator::Distance => "distance",
            Operator::Equals => "equals",
            Operator::Contains => "contains",
            Operator::Within => "within",
            Operator::Touches => "touches",
            Operator::Overlaps => "overlaps",
            Operator::Crosses => "crosses",
            Operator::Disjoint => "disjoint",
            Operator::Intersects => "intersects",
            Operator::Relate { .. } if self.relate_pattern().is_some() => "relate_pattern",
            Operator::Relate { .. } => "relate",
            _ => return None,
        })
    }

    /// Returns true if only the geometry service can compute this operator.
    pub fn requires_service(&self) -> bool {
        self.kernel_name().is_none()
    }

    /// Parameter block sent with the request.
    pub fn params(&self) -> Option<geometry_request::Params> {
        use geometry_request::Params;
        use geoproxy_proto::{
            AffineTransformParams, BufferParams, DensifyParams, GeneralizeByAreaParams,
            RandomPointsParams, RelateParams, SimplifyParams,
        };

        match self {
            Operator::Buffer { distance }
            | Operator::GeodesicBuffer {
                distance_m: distance,
            } => Some(Params::BufferParams(BufferParams {
                distance: *distance,
            })),
            Operator::Simplify {
                tolerance,
                preserve_topology,
            } => Some(Params::SimplifyParams(SimplifyParams {
                tolerance: *tolerance,
                preserve_topology: *preserve_topology,
            })),
            Operator::GeneralizeByArea(params) => {
                Some(Params::GeneralizeByAreaParams(GeneralizeByAreaParams {
                    percent_reduction: params.percent_reduction,
                    max_point_count: params
                        .max_point_count
                        .map(|count| u32::try_from(count).unwrap_or(u32::MAX))
                        .unwrap_or(0),
                    remove_degenerates: params.remove_degenerates,
                }))
            }
            Operator::DensifyByLength { max_length }
            | Operator::GeodeticDensifyByLength {
                max_length_m: max_length,
            } => Some(Params::DensifyParams(DensifyParams {
                max_length: *max_length,
            })),
            Operator::RandomPoints {
                points_per_square_km,
                seed,
            } => Some(Params::RandomPointsParams(RandomPointsParams {
                points_per_square_km: *points_per_square_km,
                seed: *seed,
            })),
            Operator::AffineTransform { x_offset, y_offset } => {
                Some(Params::AffineTransformParams(AffineTransformParams {
                    x_offset: *x_offset,
                    y_offset: *y_offset,
                }))
            }
            Operator::Relate { .. } => self.relate_pattern().map(|pattern| {
                Params::RelateParams(RelateParams {
                    de9im: pattern.to_string(),
                })
            }),
            _ => None,
        }
    }
}
