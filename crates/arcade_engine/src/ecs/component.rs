//! Component trait

/// Marker trait for components
///
/// Components live on the frame thread only, so no `Send`/`Sync` bound.
pub trait Component: 'static {}

impl Component for crate::foundation::math::Transform {}
