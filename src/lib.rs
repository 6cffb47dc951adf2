//! boxbonk: axis-aligned box physics for 2D platformers (quad tree broad phase,
//! edge-correction resolution, rigid bodies with step-up and floor events)

pub mod rect;
pub mod collision;
pub mod types;
pub mod error;
pub mod config;
pub mod api;
pub mod quadtree;
pub mod linear;
pub mod correction;
pub mod body;
pub mod world;

pub use crate::api::*;
pub use crate::body::{BodyDesc, CONTACT_EPSILON, RigidBody, StepContext};
pub use crate::collision::Collision2D;
pub use crate::config::{CandidateSource, METERS_TO_PIXELS, WorldConfig};
pub use crate::correction::EdgeCorrection;
pub use crate::error::PhysicsError;
pub use crate::linear::LinearIndex;
pub use crate::quadtree::QuadTree;
pub use crate::rect::Rect;
pub use crate::types::*;
pub use crate::world::PhysicsWorld;
