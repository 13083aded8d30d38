//! 3D UI Interaction System
//!
//! Controller rays are cast against the interactive registry, hits are mapped
//! to their logical target, and the per-controller trigger state decides
//! whether the target fires, stays latched, or is re-armed.

pub mod pointer;
pub mod raycaster;

pub use pointer::{
    apply_hover, clear_hover, dispatch, next_outcome, ControllerState, PointerOutcome,
    PointerPhase,
};
pub use raycaster::{
    cast_ray, controller_ray, intersect_shape, ray_length, Ray, RayHit, UIAABB,
    DEFAULT_RAY_LENGTH,
};
