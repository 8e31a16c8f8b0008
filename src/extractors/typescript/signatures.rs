//! Method signature and decorator extraction
//!
//! Parameter types come from the annotation text when present. Without an annotation a
//! literal default value is enough to infer `number`, `string`, `boolean` or `bigint`;
//! anything else is `any`.

use super::helpers::{decorator_name, member_name, short_decorator_name};
use crate::extractors::base::{Field, SyntaxKind, SyntaxNode};
use crate::meta::{DecoratorMeta, ParamMeta};
use crate::source_index::DecoratorIndex;
use indexmap::IndexMap;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureMeta {
    pub name: String,
    pub parameters: Vec<ParamMeta>,
}

/// Name and parameter list of a method declaration
pub fn extract_signature_meta<'a, N: SyntaxNode<'a>>(method: N) -> Option<SignatureMeta> {
    let name = member_name(method)?.to_string();
    let parameters = method
        .field(Field::Parameters)
        .map(|params| {
            parameter_nodes(params)
                .into_iter()
                .enumerate()
                .map(|(index, param)| param_meta(param, index))
                .collect()
        })
        .unwrap_or_default();

    Some(SignatureMeta { name, parameters })
}

/// Decorators of a method, with call arguments keyed by the decorator's declared parameter names
///
/// Arguments are matched positionally against the parameter list found in `index`
/// (preferring a declaration in `module`); unmatched positions fall back to `"0"`, `"1"`, ...
pub fn extract_decorators_from_signature<'a, N: SyntaxNode<'a>>(
    method: N,
    index: &DecoratorIndex,
    module: &Path,
    filter: Option<&dyn Fn(&DecoratorMeta) -> bool>,
) -> Vec<DecoratorMeta> {
    let mut found = Vec::new();

    for decorator in method.decorators() {
        let Some(name) = decorator_name(decorator) else {
            continue;
        };

        let mut parameters = IndexMap::new();
        let call = decorator
            .first_named_child()
            .filter(|expr| expr.kind() == SyntaxKind::CallExpression);

        if let Some(call) = call {
            let lookup_name = short_decorator_name(name);
            let declared = index.lookup(lookup_name, module).unwrap_or(&[]);
            let arguments = call
                .field(Field::Arguments)
                .map(|args| args.named_children())
                .unwrap_or_default();

            for (position, argument) in arguments.into_iter().enumerate() {
                let key = declared
                    .get(position)
                    .cloned()
                    .unwrap_or_else(|| position.to_string());
                parameters.insert(key, argument.text().to_string());
            }
        }

        let meta = DecoratorMeta {
            name: name.to_string(),
            parameters,
        };

        if let Some(filter) = filter {
            if !filter(&meta) {
                continue;
            }
        }
        found.push(meta);
    }

    found
}

/// Parameter names of a function-like node, for the decorator index
pub fn parameter_names<'a, N: SyntaxNode<'a>>(function: N) -> Vec<String> {
    if let Some(single) = function.field(Field::Parameter) {
        return vec![single.text().to_string()];
    }

    function
        .field(Field::Parameters)
        .map(|params| {
            parameter_nodes(params)
                .into_iter()
                .enumerate()
                .map(|(index, param)| parameter_name(param, index))
                .collect()
        })
        .unwrap_or_default()
}

fn parameter_nodes<'a, N: SyntaxNode<'a>>(params: N) -> Vec<N> {
    params
        .named_children()
        .into_iter()
        .filter(|param| {
            matches!(
                param.kind(),
                SyntaxKind::RequiredParameter | SyntaxKind::OptionalParameter
            )
        })
        .filter(|param| param.field_text(Field::Pattern) != Some("this"))
        .collect()
}

fn parameter_name<'a, N: SyntaxNode<'a>>(param: N, index: usize) -> String {
    let Some(pattern) = param.field(Field::Pattern) else {
        return format!("__{}", index);
    };

    match pattern.kind() {
        SyntaxKind::Identifier => pattern.text().to_string(),
        // `...rest` keeps its identifier
        _ if pattern.text().starts_with("...") => {
            pattern.text().trim_start_matches("...").trim().to_string()
        }
        // Destructured parameters have no single name
        _ => format!("__{}", index),
    }
}

fn param_meta<'a, N: SyntaxNode<'a>>(param: N, index: usize) -> ParamMeta {
    let name = parameter_name(param, index);
    let default_value = param.field(Field::Value);
    let is_rest = param
        .field(Field::Pattern)
        .map(|p| p.text().starts_with("..."))
        .unwrap_or(false);

    let type_name = param
        .field(Field::Type)
        .and_then(|annotation| annotation.first_named_child())
        .map(|ty| ty.text().to_string())
        .or_else(|| default_value.and_then(infer_literal_type))
        .unwrap_or_else(|| if is_rest { "any[]" } else { "any" }.to_string());

    ParamMeta {
        name,
        type_name,
        default_value: default_value.map(|value| value.text().to_string()),
    }
}

/// Widened type of a literal default value
fn infer_literal_type<'a, N: SyntaxNode<'a>>(value: N) -> Option<String> {
    let inferred = match value.kind() {
        SyntaxKind::Number if value.text().ends_with('n') => "bigint",
        SyntaxKind::Number => "number",
        SyntaxKind::String | SyntaxKind::TemplateString => "string",
        SyntaxKind::True | SyntaxKind::False => "boolean",
        // Negative numbers parse as unary expressions
        _ if value.text().trim().parse::<f64>().is_ok() => "number",
        _ => return None,
    };
    Some(inferred.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::base::{SourceModule, TsNode};
    use std::path::PathBuf;

    fn parse(source: &str) -> SourceModule {
        SourceModule::from_source(Path::new("/app/stores/TestStore.ts"), source.to_string())
            .unwrap()
    }

    fn methods<'t>(module: &'t SourceModule) -> Vec<TsNode<'t>> {
        let mut found: Vec<TsNode<'t>> = Vec::new();
        module.root().walk(&mut |node: TsNode<'t>| {
            if node.kind() == SyntaxKind::MethodDefinition {
                found.push(node);
            }
        });
        found
    }

    #[test]
    fn test_signature_types_and_defaults() {
        let module = parse(
            "class A {\n  storeFunctionWithArgs(x: number, y: number = 10, z = 20, label = 'a', flag = false, big = 10n, neg = -1, other?) {}\n}",
        );
        let meta = extract_signature_meta(methods(&module)[0]).unwrap();

        assert_eq!(meta.name, "storeFunctionWithArgs");
        let summary: Vec<(&str, &str, Option<&str>)> = meta
            .parameters
            .iter()
            .map(|p| (p.name.as_str(), p.type_name.as_str(), p.default_value.as_deref()))
            .collect();

        assert_eq!(
            summary,
            vec![
                ("x", "number", None),
                ("y", "number", Some("10")),
                ("z", "number", Some("20")),
                ("label", "string", Some("'a'")),
                ("flag", "boolean", Some("false")),
                ("big", "bigint", Some("10n")),
                ("neg", "number", Some("-1")),
                ("other", "any", None),
            ]
        );
    }

    #[test]
    fn test_destructured_and_rest_parameters() {
        let module = parse("class A {\n  onInit({ store }, ...rest: string[]) {}\n}");
        let meta = extract_signature_meta(methods(&module)[0]).unwrap();

        assert_eq!(meta.parameters[0].name, "__0");
        assert_eq!(meta.parameters[0].type_name, "any");
        assert_eq!(meta.parameters[1].name, "rest");
        assert_eq!(meta.parameters[1].type_name, "string[]");
    }

    #[test]
    fn test_no_parameters() {
        let module = parse("class A {\n  increment() { this.count++; }\n}");
        let meta = extract_signature_meta(methods(&module)[0]).unwrap();
        assert_eq!(meta.name, "increment");
        assert!(meta.parameters.is_empty());
    }

    #[test]
    fn test_decorator_arguments_use_declared_names() {
        let module = parse(
            "function On(event: string, once = false) { return () => {}; }\nclass A {\n  @On('saved', true)\n  @Computed\n  @Mystery(1, 2)\n  handle() {}\n}",
        );

        let mut index = DecoratorIndex::default();
        index.collect_from_module(&module);

        let decorators = extract_decorators_from_signature(
            methods(&module)[0],
            &index,
            module.path(),
            None,
        );

        let names: Vec<&str> = decorators.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["On", "Computed", "Mystery"]);

        let on: Vec<(&str, &str)> = decorators[0]
            .parameters
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        assert_eq!(on, vec![("event", "'saved'"), ("once", "true")]);

        assert!(decorators[1].parameters.is_empty());

        let keys: Vec<&str> = decorators[2].parameters.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["0", "1"]);
    }

    #[test]
    fn test_decorator_filter() {
        let module = parse("class A {\n  @OnInit\n  @Computed\n  handle() {}\n}");
        let index = DecoratorIndex::default();
        let only_lifecycle = |d: &DecoratorMeta| d.name != "Computed";

        let decorators = extract_decorators_from_signature(
            methods(&module)[0],
            &index,
            &PathBuf::from("/app/stores/TestStore.ts"),
            Some(&only_lifecycle),
        );
        assert_eq!(decorators.len(), 1);
        assert_eq!(decorators[0].name, "OnInit");
    }
}
