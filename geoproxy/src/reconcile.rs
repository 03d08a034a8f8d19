//! Choice of the spatial reference an operation runs in.

use geoproxy_types::SpatialReference;

use crate::error::GeoProxyError;

/// Spatial references a request runs in and produces.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    /// Spatial reference both operands are brought into.
    pub operation: SpatialReference,
    /// Spatial reference of the result.
    pub result: SpatialReference,
    /// True if the operands disagreed and the left spatial reference was taken.
    pub defaulted: bool,
    /// True if the operation spatial reference was given by the caller.
    pub explicit_operation: bool,
}

impl Reconciliation {
    /// Returns true if the operation spatial reference must be sent with the request.
    pub fn sends_operation(&self) -> bool {
        self.explicit_operation || self.defaulted
    }
}

/// Decides the operation and result spatial references of a request.
///
/// An explicit operation spatial reference always wins. Without it, equal operands run in their
/// shared spatial reference. Differing operands fail if exactly one of them is local, otherwise
/// the left one is taken and a warning is logged.
pub fn reconcile(
    left: &SpatialReference,
    right: Option<&SpatialReference>,
    operation: Option<&SpatialReference>,
    result: Option<&SpatialReference>,
) -> Result<Reconciliation, GeoProxyError> {
    let (operation_sr, defaulted, explicit) = match (operation, right) {
        (Some(operation), _) => (operation.clone(), false, true),
        (None, None) => (left.clone(), false, false),
        (None, Some(right)) if right == left => (left.clone(), false, false),
        (None, Some(right)) if left.is_local() != right.is_local() => {
            return Err(GeoProxyError::MixedLocality {
                left: left.clone(),
                right: right.clone(),
            });
        }
        (None, Some(right)) => {
            log::warn!(
                "Operands have different spatial references ({left} and {right}), defaulting the operation spatial reference to {left}"
            );
            (left.clone(), true, false)
        }
    };

    let result_sr = match result {
        Some(result) => result.clone(),
        None => match right {
            None => left.clone(),
            Some(right) if right == left => left.clone(),
            Some(_) => operation_sr.clone(),
        },
    };

    Ok(Reconciliation {
        operation: operation_sr,
        result: result_sr,
        defaulted,
        explicit_operation: explicit,
    })
}
