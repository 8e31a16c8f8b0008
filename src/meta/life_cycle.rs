//! Lifecycle events a store method can be bound to

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifeCycleEvent {
    BeforeAll,
    OnInit,
    OnDispose,
    AfterAll,
}

impl LifeCycleEvent {
    pub const ALL: [LifeCycleEvent; 4] = [
        LifeCycleEvent::BeforeAll,
        LifeCycleEvent::OnInit,
        LifeCycleEvent::OnDispose,
        LifeCycleEvent::AfterAll,
    ];

    /// Name as written in decorators and generated metadata
    pub fn as_str(&self) -> &'static str {
        match self {
            LifeCycleEvent::BeforeAll => "BeforeAll",
            LifeCycleEvent::OnInit => "OnInit",
            LifeCycleEvent::OnDispose => "OnDispose",
            LifeCycleEvent::AfterAll => "AfterAll",
        }
    }

    /// Match a decorator name, case-insensitively
    pub fn from_decorator_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|event| event.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for LifeCycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
