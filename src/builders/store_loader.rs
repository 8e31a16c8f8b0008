//! Generated store loader module
//!
//! ```text
//! import { StoreManager, StoreMetaData, ... } from "<runtime package>";
//! export const stores = [
//!     new StoreMetaData({ ... })
//! ];
//! ```

use super::imports::named_import;
use super::value::MetaValue;
use crate::meta::StoreMeta;

const RUNTIME_IMPORTS: [&str; 4] = [
    "StoreManager",
    "StoreMetaData",
    "StoreMetaActionData",
    "StoreMetaGetterSetterData",
];

/// Render the loader for `stores`, in the given order
pub fn render_loader(stores: &[StoreMeta], runtime_package: &str) -> String {
    let entries = stores
        .iter()
        .filter(|store| store.is_valid())
        .map(|store| MetaValue::new_instance("StoreMetaData", vec![store.to_meta_object()]))
        .collect();

    format!(
        "{}\nexport const stores = {};\n",
        named_import(&RUNTIME_IMPORTS, runtime_package),
        MetaValue::Array(entries).render()
    )
}
