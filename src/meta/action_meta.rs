//! Metadata for a single store method

use super::LifeCycleEvent;
use crate::builders::value::MetaValue;
use crate::extractors::base::Span;
use indexmap::IndexMap;

/// One method parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamMeta {
    pub name: String,
    pub type_name: String,
    /// Source text of the default value, if any
    pub default_value: Option<String>,
}

/// A decorator and its arguments, keyed by the decorator function's parameter names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoratorMeta {
    pub name: String,
    pub parameters: IndexMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionMeta {
    pub name: String,
    pub params: Vec<ParamMeta>,
    /// Every decorator on the method, including lifecycle ones
    pub decorators: IndexMap<String, DecoratorMeta>,
    pub span: Span,
    life_cycle_event_handler: Option<LifeCycleEvent>,
}

impl ActionMeta {
    pub fn new(name: impl Into<String>, params: Vec<ParamMeta>, span: Span) -> Self {
        Self {
            name: name.into(),
            params,
            decorators: IndexMap::new(),
            span,
            life_cycle_event_handler: None,
        }
    }

    pub fn with_decorators(mut self, decorators: Vec<DecoratorMeta>) -> Self {
        for decorator in decorators {
            self.decorators.insert(decorator.name.clone(), decorator);
        }
        self
    }

    pub fn life_cycle_event_handler(&self) -> Option<LifeCycleEvent> {
        self.life_cycle_event_handler
    }

    /// Bind this method to a lifecycle event. Only the first binding sticks;
    /// a second attempt returns the event already held.
    pub fn set_life_cycle_event_handler(
        &mut self,
        event: LifeCycleEvent,
    ) -> Result<(), LifeCycleEvent> {
        match self.life_cycle_event_handler {
            Some(existing) => Err(existing),
            None => {
                self.life_cycle_event_handler = Some(event);
                Ok(())
            }
        }
    }

    /// Lifecycle hooks are not callable actions
    pub fn is_valid(&self) -> bool {
        self.life_cycle_event_handler.is_none()
    }

    /// `{ n, p: [{ n, t, dv }], d: { name: { n, p } }, h }`
    pub fn to_meta_object(&self) -> MetaValue {
        let params = self
            .params
            .iter()
            .map(|param| {
                MetaValue::object([
                    ("n", MetaValue::from(param.name.as_str())),
                    ("t", MetaValue::from(param.type_name.as_str())),
                    ("dv", MetaValue::from(param.default_value.clone())),
                ])
            })
            .collect();

        let decorators = self.decorators.iter().map(|(name, decorator)| {
            let parameters = decorator
                .parameters
                .iter()
                .map(|(key, value)| (key.clone(), MetaValue::from(value.as_str())));

            (
                name.clone(),
                MetaValue::object([
                    ("n", MetaValue::from(decorator.name.as_str())),
                    ("p", MetaValue::object(parameters)),
                ]),
            )
        });

        MetaValue::object([
            ("n", MetaValue::from(self.name.as_str())),
            ("p", MetaValue::Array(params)),
            ("d", MetaValue::object(decorators)),
            (
                "h",
                MetaValue::from(self.life_cycle_event_handler.map(|e| e.to_string())),
            ),
        ])
    }
}
