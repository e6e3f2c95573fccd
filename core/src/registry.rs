//! Read-only metadata about the component types that may appear in a mounted tree.

use std::collections::HashMap;

/// Describes how nodes of a single component type may be animated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComponentDescriptor {
    name: &'static str,
    interpolates_props: bool,
}

impl ComponentDescriptor {
    /// Creates a descriptor whose layout, appearance and props are all animatable.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            interpolates_props: true,
        }
    }

    /// Configures whether component props are interpolated. When `false`, intermediate frames use
    /// the destination props and only layout and appearance move.
    pub fn with_interpolated_props(mut self, interpolates_props: bool) -> Self {
        self.interpolates_props = interpolates_props;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn interpolates_props(&self) -> bool {
        self.interpolates_props
    }
}

/// Lookup from component name to [`ComponentDescriptor`].
///
/// Nodes whose component has no descriptor are never animated; their mutations are always
/// applied immediately.
#[derive(Clone, Debug, Default)]
pub struct ComponentRegistry {
    descriptors: HashMap<&'static str, ComponentDescriptor>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry from a set of descriptors. Later descriptors replace earlier ones with
    /// the same name.
    pub fn of(descriptors: impl IntoIterator<Item = ComponentDescriptor>) -> Self {
        let mut registry = Self::new();
        for descriptor in descriptors {
            registry.register(descriptor);
        }
        registry
    }

    pub fn register(&mut self, descriptor: ComponentDescriptor) {
        self.descriptors.insert(descriptor.name, descriptor);
    }

    pub fn get(&self, component_name: &str) -> Option<&ComponentDescriptor> {
        self.descriptors.get(component_name)
    }

    pub fn contains(&self, component_name: &str) -> bool {
        self.descriptors.contains_key(component_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_registration_replaces_earlier() {
        let registry = ComponentRegistry::of([
            ComponentDescriptor::new("Text"),
            ComponentDescriptor::new("Text").with_interpolated_props(false),
        ]);

        assert!(!registry.get("Text").unwrap().interpolates_props());
        assert!(registry.contains("Text"));
        assert!(!registry.contains("Image"));
    }
}
