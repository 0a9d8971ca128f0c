//! Collaborators injected into the render pipeline.

pub mod font;
pub mod logo;
