//! Generated component type declarations
//!
//! Augments `ComponentCustomProperties` so templates see every store binding with the type
//! of its exported instance. Carries no runtime code.

use super::imports::relative_import;
use crate::meta::StoreMeta;

const INDENT: &str = "    ";

pub fn render_declarations(stores: &[StoreMeta]) -> String {
    let mut imports = String::new();
    let mut properties = String::new();

    for store in stores.iter().filter(|store| store.is_valid()) {
        let (Some(export_name), Some(binding)) =
            (store.export_name.as_deref(), store.vue_binding.as_deref())
        else {
            continue;
        };

        imports.push_str(INDENT);
        imports.push_str(&relative_import(&[export_name], &store.loader_import_path));
        imports.push('\n');

        properties.push_str(&format!(
            "{INDENT}{INDENT}{}: typeof {};\n",
            binding, export_name
        ));
    }

    format!(
        "declare module \"@vue/runtime-core\" {{\n{imports}{INDENT}interface ComponentCustomProperties {{\n{properties}{INDENT}}}\n}}\nexport {{}};\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};

    fn store(file: &str, class: &str, export: &str, binding: Option<&str>) -> StoreMeta {
        use crate::extractors::base::SourceModule;
        use crate::meta::extract_stores;
        use crate::source_index::DecoratorIndex;

        let binding_field = binding
            .map(|b| format!("  static vueBinding = '{}';\n", b))
            .unwrap_or_default();
        let source = format!(
            "export class {class} extends Store() {{\n{binding_field}  get state() {{ return {{}}; }}\n}}\nexport const {export} = new {class}();\n"
        );
        let module = SourceModule::from_source(
            &PathBuf::from(format!("/app/src/Stores/{}", file)),
            source,
        )
        .unwrap();
        let (mut stores, _) = extract_stores(
            &module,
            &DecoratorIndex::default(),
            Path::new("/app/src/Stores"),
            Path::new("/app/src/Stores/Generated"),
        );
        let mut store = stores.remove(0);
        store.finalize();
        store
    }

    #[test]
    fn test_render_declarations() {
        let stores = vec![
            store("TestingStore.ts", "MyTestStore", "myTestStore", None),
            store("YeetStore.ts", "NewYeetStore", "yeetStore", None),
            store("CartStore.ts", "CartStore", "cartStore", Some("basket")),
        ];

        assert_eq!(
            render_declarations(&stores),
            concat!(
                "declare module \"@vue/runtime-core\" {\n",
                "    import { myTestStore } from \"./../TestingStore\";\n",
                "    import { yeetStore } from \"./../YeetStore\";\n",
                "    import { cartStore } from \"./../CartStore\";\n",
                "    interface ComponentCustomProperties {\n",
                "        $myTest: typeof myTestStore;\n",
                "        $newYeet: typeof yeetStore;\n",
                "        $basket: typeof cartStore;\n",
                "    }\n",
                "}\n",
                "export {};\n"
            )
        );
    }
}
