//! Metadata for one store class, and the per-module extraction pass that produces it

use super::{ActionMeta, LifeCycleEvent};
use crate::builders::value::MetaValue;
use crate::extractors::base::{AccessorKind, Field, SourceModule, Span, SyntaxKind, SyntaxNode};
use crate::extractors::typescript::{
    extends_store_factory, extract_decorators_from_signature, extract_signature_meta,
    has_decorator, is_binding_declaration, is_export_const, is_state_getter_node, member_name,
    short_decorator_name, state_keys, top_level_declarations, ExportConst, StateGetterMatch,
};
use crate::linting::messages::{lifecycle, setter, state_getter};
use crate::linting::Diagnostics;
use crate::processing::ProcessingContext;
use crate::source_index::DecoratorIndex;
use crate::utils::{format_vue_binding_name, relative_path};
use indexmap::IndexMap;
use std::path::{Path, PathBuf};

const COMPUTED_DECORATOR: &str = "Computed";

/// A getter or setter and whether it is backed by a computed property
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetterSetterInfo {
    pub name: String,
    pub computed: bool,
}

impl GetterSetterInfo {
    /// `{ n, c }`
    pub fn to_meta_object(&self) -> MetaValue {
        MetaValue::object([
            ("n", MetaValue::from(self.name.as_str())),
            ("c", MetaValue::Bool(self.computed)),
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreMeta {
    pub abs_file_path: PathBuf,
    /// Path of the store file relative to the stores directory
    pub relative_path: String,
    /// Path of the store file relative to the generated directory
    pub loader_import_path: String,
    pub class_name: Option<String>,
    pub export_name: Option<String>,
    pub vue_binding: Option<String>,
    pub state_keys: Vec<String>,
    pub getters: IndexMap<String, GetterSetterInfo>,
    pub setters: IndexMap<String, GetterSetterInfo>,
    pub actions: IndexMap<String, ActionMeta>,
    /// Method name to the event it handles
    pub life_cycle_handlers: IndexMap<String, LifeCycleEvent>,
    state_getter: Option<Span>,
    state_getter_rejected: bool,
    class_span: Option<Span>,
    finalized: bool,
}

impl StoreMeta {
    pub fn new(abs_file_path: PathBuf, stores_dir: &Path, generated_dir: &Path) -> Self {
        Self {
            relative_path: relative_path(stores_dir, &abs_file_path),
            loader_import_path: relative_path(generated_dir, &abs_file_path),
            abs_file_path,
            class_name: None,
            export_name: None,
            vue_binding: None,
            state_keys: Vec::new(),
            getters: IndexMap::new(),
            setters: IndexMap::new(),
            actions: IndexMap::new(),
            life_cycle_handlers: IndexMap::new(),
            state_getter: None,
            state_getter_rejected: false,
            class_span: None,
            finalized: false,
        }
    }

    pub fn begin_class(&mut self, name: &str, span: Span) {
        self.class_name = Some(name.to_string());
        self.class_span = Some(span);
    }

    pub fn class_span(&self) -> Option<Span> {
        self.class_span
    }

    pub fn has_state_getter(&self) -> bool {
        self.state_getter.is_some()
    }

    /// A member named `state` was found but rejected as malformed
    pub fn state_getter_rejected(&self) -> bool {
        self.state_getter_rejected
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    pub fn is_valid(&self) -> bool {
        self.class_name.is_some() && self.export_name.is_some() && self.has_state_getter()
    }

    /// Default the binding name from the class name; an explicit binding gets the `$` sigil
    ///
    /// Running it again changes nothing.
    pub fn finalize(&mut self) {
        self.vue_binding = match self.vue_binding.take() {
            Some(binding) if binding.starts_with('$') => Some(binding),
            Some(binding) => Some(format!("${}", binding)),
            None => self.class_name.as_deref().map(format_vue_binding_name),
        };
        self.finalized = true;
    }

    /// Claim `event` for `method`; false when another method already handles it
    pub fn add_life_cycle_handler(&mut self, method: &str, event: LifeCycleEvent) -> bool {
        if self.handler_for(event).is_some() {
            return false;
        }
        self.life_cycle_handlers.insert(method.to_string(), event);
        true
    }

    pub fn handler_for(&self, event: LifeCycleEvent) -> Option<&str> {
        self.life_cycle_handlers
            .iter()
            .find(|(_, bound)| **bound == event)
            .map(|(method, _)| method.as_str())
    }

    /// Pick the `export const x = new <Class>()` for this store's class
    pub fn resolve_export(&mut self, exports: &[ExportConst]) {
        let Some(class_name) = self.class_name.as_deref() else {
            return;
        };
        self.export_name = exports
            .iter()
            .find(|export| export.constructed.as_deref() == Some(class_name))
            .map(|export| export.name.clone());
    }

    /// Walk a store class declaration, filling in members in declaration order
    pub fn process<'a, N: SyntaxNode<'a>>(&mut self, class: N, ctx: &mut ProcessingContext) {
        let Some(name) = member_name(class) else {
            return;
        };
        let span = class.span();
        self.begin_class(name, span);

        let members: Vec<N> = class
            .field(Field::Body)
            .map(|body| body.named_children())
            .unwrap_or_default()
            .into_iter()
            .filter(|member| member.kind() != SyntaxKind::Decorator)
            .collect();

        ctx.processing_store_class(name, span, |ctx| {
            for member in &members {
                self.process_member(*member, &members, ctx);
            }
        });
    }

    fn process_member<'a, N: SyntaxNode<'a>>(
        &mut self,
        member: N,
        members: &[N],
        ctx: &mut ProcessingContext,
    ) {
        if let Some(binding) = is_binding_declaration(member) {
            self.vue_binding = Some(binding);
            return;
        }

        if is_action_method(member) {
            self.add_action(member, ctx);
            return;
        }

        match is_state_getter_node(member, ctx) {
            StateGetterMatch::Accepted(object) => {
                if self.state_getter.is_some() {
                    ctx.warn(state_getter::duplicate(ctx.class_name()), member.span());
                } else {
                    self.state_keys = state_keys(object);
                    self.state_getter = Some(member.span());
                }
                return;
            }
            StateGetterMatch::Rejected => {
                self.state_getter_rejected = true;
                return;
            }
            StateGetterMatch::NotState => {}
        }

        match member.accessor() {
            Some(AccessorKind::Get) => self.add_getter(member),
            Some(AccessorKind::Set) => self.add_setter(member, members, ctx),
            None => {}
        }
    }

    fn add_action<'a, N: SyntaxNode<'a>>(&mut self, method: N, ctx: &mut ProcessingContext) {
        let Some(signature) = extract_signature_meta(method) else {
            return;
        };
        let name = signature.name.clone();
        let span = method.span();

        ctx.processing_action(&name, span, |ctx| {
            let decorators = extract_decorators_from_signature(
                method,
                ctx.decorators(),
                ctx.module().path(),
                None,
            );
            let mut action = ActionMeta::new(signature.name, signature.parameters, span)
                .with_decorators(decorators.clone());

            for decorator in &decorators {
                let Some(event) =
                    LifeCycleEvent::from_decorator_name(short_decorator_name(&decorator.name))
                else {
                    continue;
                };

                if let Some(existing) = action.life_cycle_event_handler() {
                    let parts = lifecycle::multiple_handlers_on_method(
                        ctx.action_name(),
                        ctx.class_name(),
                        existing,
                    );
                    ctx.action_error(parts);
                    continue;
                }

                if let Some(handler) = self.handler_for(event) {
                    // The method stays a regular action
                    let parts = lifecycle::event_already_handled(ctx.action_name(), event, handler);
                    ctx.action_error(parts);
                    continue;
                }

                if action.set_life_cycle_event_handler(event).is_ok() {
                    self.add_life_cycle_handler(&name, event);
                }
            }

            if action.is_valid() {
                self.actions.insert(name.clone(), action);
            }
        });
    }

    fn add_getter<'a, N: SyntaxNode<'a>>(&mut self, member: N) {
        let Some(name) = member_name(member) else {
            return;
        };
        if name == "state" {
            return;
        }

        self.getters.insert(
            name.to_string(),
            GetterSetterInfo {
                name: name.to_string(),
                computed: has_decorator(member, COMPUTED_DECORATOR),
            },
        );
    }

    /// Setters take their computed flag from the getter of the same name
    fn add_setter<'a, N: SyntaxNode<'a>>(
        &mut self,
        member: N,
        members: &[N],
        ctx: &mut ProcessingContext,
    ) {
        let name_node = member.field(Field::Name);
        let name = name_node
            .filter(|node| node.kind() == SyntaxKind::PropertyIdentifier)
            .map(|node| node.text());

        let Some(name) = name else {
            let text = name_node.map(|node| node.text()).unwrap_or("");
            ctx.error(
                setter::unresolved_accessor(text, ctx.class_name()),
                member.span(),
            );
            if !text.is_empty() {
                self.setters.insert(
                    text.to_string(),
                    GetterSetterInfo {
                        name: text.to_string(),
                        computed: false,
                    },
                );
            }
            return;
        };

        let computed = members
            .iter()
            .find(|candidate| {
                candidate.accessor() == Some(AccessorKind::Get)
                    && member_name(**candidate) == Some(name)
            })
            .map(|getter| has_decorator(*getter, COMPUTED_DECORATOR))
            .unwrap_or(false);

        self.setters.insert(
            name.to_string(),
            GetterSetterInfo {
                name: name.to_string(),
                computed,
            },
        );
    }

    /// The object passed to `new StoreMetaData(...)` in the generated loader
    pub fn to_meta_object(&self) -> MetaValue {
        let store = MetaValue::object([
            ("className", MetaValue::from(self.class_name.clone())),
            ("exportName", MetaValue::from(self.export_name.clone())),
            ("vueBinding", MetaValue::from(self.vue_binding.clone())),
            (
                "module",
                MetaValue::lazy_import(self.loader_import_path.as_str()),
            ),
        ]);

        let actions = self.actions.iter().map(|(name, action)| {
            (
                name.clone(),
                MetaValue::new_instance("StoreMetaActionData", vec![action.to_meta_object()]),
            )
        });

        let life_cycle_handlers = self
            .life_cycle_handlers
            .iter()
            .map(|(method, event)| (method.clone(), MetaValue::from(event.as_str())));

        let state_keys = self
            .state_keys
            .iter()
            .map(|key| MetaValue::from(key.as_str()))
            .collect();

        MetaValue::object([
            ("store", store),
            ("actions", MetaValue::object(actions)),
            ("lifeCycleHandlers", MetaValue::object(life_cycle_handlers)),
            ("stateKeys", MetaValue::Array(state_keys)),
            ("getters", accessor_objects("getter", &self.getters)),
            ("setters", accessor_objects("setter", &self.setters)),
        ])
    }
}

fn accessor_objects(kind: &str, accessors: &IndexMap<String, GetterSetterInfo>) -> MetaValue {
    MetaValue::object(accessors.iter().map(|(name, info)| {
        (
            name.clone(),
            MetaValue::new_instance(
                "StoreMetaGetterSetterData",
                vec![MetaValue::from(kind), info.to_meta_object()],
            ),
        )
    }))
}

/// Plain methods with an identifier name, excluding accessors and the constructor
fn is_action_method<'a, N: SyntaxNode<'a>>(member: N) -> bool {
    if member.kind() != SyntaxKind::MethodDefinition || member.accessor().is_some() {
        return false;
    }
    match member.field(Field::Name) {
        Some(name) => name.kind() == SyntaxKind::PropertyIdentifier && name.text() != "constructor",
        None => false,
    }
}

/// Every store class declared in `module`, valid or not, with the diagnostics raised
pub fn extract_stores(
    module: &SourceModule,
    decorators: &DecoratorIndex,
    stores_dir: &Path,
    generated_dir: &Path,
) -> (Vec<StoreMeta>, Diagnostics) {
    let mut ctx = ProcessingContext::new(module, decorators);
    let declarations = top_level_declarations(module.root());

    let exports: Vec<ExportConst> = declarations
        .iter()
        .filter(|(_, exported)| *exported)
        .filter_map(|(declaration, _)| is_export_const(*declaration))
        .collect();

    let mut stores = Vec::new();
    for (declaration, _) in declarations {
        if !extends_store_factory(declaration) {
            continue;
        }

        let mut store = StoreMeta::new(module.path().to_path_buf(), stores_dir, generated_dir);
        store.process(declaration, &mut ctx);
        store.resolve_export(&exports);
        ctx.validate(&store);
        stores.push(store);
    }

    (stores, ctx.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linting::Severity;

    const STORES_DIR: &str = "/app/src/Stores";
    const GENERATED_DIR: &str = "/app/src/Stores/Generated";

    fn extract(source: &str) -> (Vec<StoreMeta>, Diagnostics) {
        let module = SourceModule::from_source(
            Path::new("/app/src/Stores/TestingStore.ts"),
            source.to_string(),
        )
        .unwrap();
        let mut index = DecoratorIndex::default();
        index.collect_from_module(&module);
        extract_stores(
            &module,
            &index,
            Path::new(STORES_DIR),
            Path::new(GENERATED_DIR),
        )
    }

    fn first_lines(diagnostics: &Diagnostics) -> Vec<String> {
        diagnostics
            .messages()
            .iter()
            .map(|m| m.text_lines()[0].to_string())
            .collect()
    }

    const MY_TEST_STORE: &str = r#"
import { Store, OnInit, Computed } from "@idevelopthings/vue-class-stores/vue";

interface IMyTestStore {
    someValue: string;
    counter: number;
    nested: { thing: boolean };
}

export class MyTestStore extends Store<MyTestStore, IMyTestStore>() {
    get state(): IMyTestStore {
        return { someValue: '', counter: 0, nested: { thing: false } };
    }

    get counter() {
        return this.$counter;
    }

    increment() {
        this.$counter++;
    }
}

export const myTestStore = new MyTestStore();
"#;

    #[test]
    fn test_end_to_end_store() {
        let (stores, diagnostics) = extract(MY_TEST_STORE);
        assert!(diagnostics.is_empty(), "{}", diagnostics.render_to_string());
        assert_eq!(stores.len(), 1);

        let mut store = stores.into_iter().next().unwrap();
        assert!(store.is_valid());
        store.finalize();

        assert_eq!(store.class_name.as_deref(), Some("MyTestStore"));
        assert_eq!(store.export_name.as_deref(), Some("myTestStore"));
        assert_eq!(store.vue_binding.as_deref(), Some("$myTest"));
        assert_eq!(store.state_keys, vec!["someValue", "counter", "nested"]);
        assert_eq!(
            store.getters.get("counter"),
            Some(&GetterSetterInfo {
                name: "counter".into(),
                computed: false
            })
        );
        let increment = store.actions.get("increment").unwrap();
        assert!(increment.params.is_empty());
        assert_eq!(store.relative_path, "TestingStore.ts");
        assert_eq!(store.loader_import_path, "../TestingStore.ts");
    }

    #[test]
    fn test_explicit_binding_and_idempotent_finalize() {
        let (stores, _) = extract(
            "export class CartStore extends Store() {\n  public static vueBinding = 'basket';\n  get state() { return { items: [] }; }\n}\nexport const cartStore = new CartStore();",
        );
        let mut store = stores.into_iter().next().unwrap();
        store.finalize();
        assert_eq!(store.vue_binding.as_deref(), Some("$basket"));
        store.finalize();
        assert_eq!(store.vue_binding.as_deref(), Some("$basket"));
        assert!(store.is_finalized());

        let mut explicit = StoreMeta::new(
            PathBuf::from("/app/src/Stores/UserStore.ts"),
            Path::new(STORES_DIR),
            Path::new(GENERATED_DIR),
        );
        explicit.begin_class("UserStore", Span::new(0, 1));
        explicit.vue_binding = Some("$people".into());
        explicit.finalize();
        explicit.finalize();
        assert_eq!(explicit.vue_binding.as_deref(), Some("$people"));
    }

    #[test]
    fn test_computed_setter_mirrors_getter() {
        let (stores, diagnostics) = extract(
            "export class CounterStore extends Store() {\n  get state() { return { count: 0 }; }\n  @Computed\n  get counter() { return this.count; }\n  set counter(v) { this.count = v; }\n  set plain(v) {}\n}\nexport const counterStore = new CounterStore();",
        );
        assert!(diagnostics.is_empty());
        let store = &stores[0];

        assert!(store.getters["counter"].computed);
        assert!(store.setters["counter"].computed);
        assert!(!store.setters["plain"].computed);
    }

    #[test]
    fn test_namespaced_decorators() {
        let (stores, diagnostics) = extract(
            "export class CartStore extends Store() {\n  get state() { return { items: [] }; }\n  @Lib.Computed\n  get total() { return 0; }\n  set total(v) {}\n  @Lib.OnInit\n  boot() {}\n}\nexport const cartStore = new CartStore();",
        );
        assert!(diagnostics.is_empty());
        let store = &stores[0];

        assert!(store.getters["total"].computed);
        assert!(store.setters["total"].computed);
        assert_eq!(store.handler_for(LifeCycleEvent::OnInit), Some("boot"));
    }

    #[test]
    fn test_unresolved_setter_name() {
        let (stores, diagnostics) = extract(
            "export class VaultStore extends Store() {\n  get state() { return {}; }\n  get #secret() { return 1; }\n  set #secret(v) {}\n}\nexport const vaultStore = new VaultStore();",
        );
        let store = &stores[0];

        assert_eq!(diagnostics.count(Severity::Error), 1);
        assert_eq!(
            first_lines(&diagnostics),
            vec!["Could not resolve the accessor name for setter '#secret' in VaultStore."]
        );
        assert_eq!(
            store.setters.get("#secret"),
            Some(&GetterSetterInfo {
                name: "#secret".to_string(),
                computed: false,
            })
        );
        assert!(store.is_valid());
    }

    #[test]
    fn test_lifecycle_handlers_leave_actions() {
        let (stores, diagnostics) = extract(
            "export class UserStore extends Store() {\n  get state() { return {}; }\n  @OnInit\n  boot() {}\n  @OnDispose()\n  teardown() {}\n  load(id: number) {}\n}\nexport const userStore = new UserStore();",
        );
        assert!(diagnostics.is_empty());
        let store = &stores[0];

        let handlers: Vec<(&str, LifeCycleEvent)> = store
            .life_cycle_handlers
            .iter()
            .map(|(m, e)| (m.as_str(), *e))
            .collect();
        assert_eq!(
            handlers,
            vec![
                ("boot", LifeCycleEvent::OnInit),
                ("teardown", LifeCycleEvent::OnDispose)
            ]
        );
        let actions: Vec<&str> = store.actions.keys().map(|k| k.as_str()).collect();
        assert_eq!(actions, vec!["load"]);
    }

    #[test]
    fn test_second_lifecycle_claimant_becomes_action() {
        let (stores, diagnostics) = extract(
            "export class UserStore extends Store() {\n  get state() { return {}; }\n  @OnInit\n  first() {}\n  @OnInit\n  second() {}\n}\nexport const userStore = new UserStore();",
        );
        let store = &stores[0];

        assert_eq!(store.life_cycle_handlers.len(), 1);
        assert_eq!(store.handler_for(LifeCycleEvent::OnInit), Some("first"));
        assert!(!store.actions.contains_key("first"));
        assert!(store.actions.contains_key("second"));
        assert!(store.actions["second"].life_cycle_event_handler().is_none());
        // The decorator is still recorded on the action
        assert!(store.actions["second"].decorators.contains_key("OnInit"));

        assert_eq!(diagnostics.count(Severity::Error), 1);
        assert_eq!(
            first_lines(&diagnostics),
            vec!["Cannot register 'second' as the OnInit handler, 'first' already handles this event."]
        );
    }

    #[test]
    fn test_two_lifecycle_decorators_on_one_method() {
        let (stores, diagnostics) = extract(
            "export class UserStore extends Store() {\n  get state() { return {}; }\n  @OnInit\n  @AfterAll\n  boot() {}\n}\nexport const userStore = new UserStore();",
        );
        let store = &stores[0];

        assert_eq!(store.handler_for(LifeCycleEvent::OnInit), Some("boot"));
        assert_eq!(store.handler_for(LifeCycleEvent::AfterAll), None);
        assert!(store.actions.is_empty());
        assert_eq!(
            first_lines(&diagnostics),
            vec!["Method 'boot' on store UserStore is already the OnInit handler."]
        );
    }

    #[test]
    fn test_first_state_getter_wins() {
        let (stores, diagnostics) = extract(
            "export class UserStore extends Store() {\n  get state() { return { first: 1 }; }\n  get state() { return { second: 2 }; }\n}\nexport const userStore = new UserStore();",
        );
        assert_eq!(stores[0].state_keys, vec!["first"]);
        assert_eq!(diagnostics.count(Severity::Warning), 1);
        assert!(!diagnostics.has_errors());
    }

    #[test]
    fn test_missing_state_and_export_are_invalid() {
        let (stores, diagnostics) = extract(
            "export class UserStore extends Store() {\n  load() {}\n}\n",
        );
        assert!(!stores[0].is_valid());
        assert_eq!(
            first_lines(&diagnostics),
            vec![
                "Could not find export for your store: UserStore",
                "Could not find state getter object for store: UserStore",
            ]
        );
    }

    #[test]
    fn test_rejected_state_getter_reports_once() {
        let (stores, diagnostics) = extract(
            "export class UserStore extends Store() {\n  static get state() { return {}; }\n}\nexport const userStore = new UserStore();",
        );
        assert!(!stores[0].is_valid());
        assert_eq!(
            first_lines(&diagnostics),
            vec!["The 'state' property must not be static."]
        );
    }

    #[test]
    fn test_export_must_construct_the_class() {
        let (stores, _) = extract(
            "export class UserStore extends Store() {\n  get state() { return {}; }\n}\nexport const other = new Other();\nexport const userStore = new UserStore();",
        );
        assert_eq!(stores[0].export_name.as_deref(), Some("userStore"));
    }

    #[test]
    fn test_non_store_classes_are_skipped() {
        let (stores, diagnostics) = extract("export class Helper {\n  get state() { return {}; }\n}");
        assert!(stores.is_empty());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_meta_object_shape() {
        let (stores, _) = extract(
            "export class TodoStore extends Store() {\n  get state() { return { todos: [] }; }\n  @Computed\n  get count() { return 0; }\n  @OnInit\n  boot() {}\n}\nexport const todoStore = new TodoStore();",
        );
        let mut store = stores.into_iter().next().unwrap();
        store.finalize();

        assert_eq!(
            store.to_meta_object().render(),
            concat!(
                "{\n",
                "    store: {\n",
                "        className: \"TodoStore\",\n",
                "        exportName: \"todoStore\",\n",
                "        vueBinding: \"$todo\",\n",
                "        module: () => import.meta.glob(\"../TestingStore.ts\", { eager: true })\n",
                "    },\n",
                "    actions: {},\n",
                "    lifeCycleHandlers: {\n",
                "        boot: \"OnInit\"\n",
                "    },\n",
                "    stateKeys: [\"todos\"],\n",
                "    getters: {\n",
                "        count: new StoreMetaGetterSetterData(\"getter\", {\n",
                "            n: \"count\",\n",
                "            c: true\n",
                "        })\n",
                "    },\n",
                "    setters: {}\n",
                "}"
            )
        );
    }
}
