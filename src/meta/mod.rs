//! In-memory metadata model for store classes

mod action_meta;
mod life_cycle;
mod store_meta;

pub use action_meta::{ActionMeta, DecoratorMeta, ParamMeta};
pub use life_cycle::LifeCycleEvent;
pub use store_meta::{extract_stores, GetterSetterInfo, StoreMeta};
