use serde_json::{Map, Value};

use super::description::SchemaDescription;
use super::metadata::{MetadataBag, Transform};

/// The sanitisers attached to one node, applied in attachment order.
#[derive(Debug, Clone)]
pub enum Composed {
    Identity,
    Single(Transform),
    Chain(Vec<Transform>),
}

impl Composed {
    pub fn from_bag(bag: &MetadataBag) -> Self {
        let mut transforms: Vec<Transform> = bag.sanitisers().cloned().collect();
        match transforms.len() {
            0 => Composed::Identity,
            1 => Composed::Single(transforms.remove(0)),
            _ => Composed::Chain(transforms),
        }
    }

    pub fn apply(&self, value: Value) -> Value {
        match self {
            Composed::Identity => value,
            Composed::Single(transform) => transform.apply(value),
            Composed::Chain(transforms) => transforms
                .iter()
                .fold(value, |value, transform| transform.apply(value)),
        }
    }
}

/// Deep sanitiser compiled from a schema description.
///
/// Children are sanitised before their parent's own transforms run. Objects
/// keep only declared keys; null objects and arrays pass through untouched.
#[derive(Debug, Clone)]
pub enum Sanitiser {
    Primitive(Composed),
    Object {
        keys: Vec<(String, Sanitiser)>,
        own: Composed,
    },
    Array {
        item: Box<Sanitiser>,
        own: Composed,
    },
}

impl Sanitiser {
    pub fn identity() -> Self {
        Sanitiser::Primitive(Composed::Identity)
    }

    /// Conditionals are sanitised as their first `then` branch regardless
    /// of which branch validation later selects.
    pub fn build(description: &SchemaDescription) -> Self {
        match description {
            SchemaDescription::Primitive { meta } => Sanitiser::Primitive(Composed::from_bag(meta)),
            SchemaDescription::Object { keys, meta } => Sanitiser::Object {
                keys: keys
                    .iter()
                    .map(|(name, child)| (name.clone(), Sanitiser::build(child)))
                    .collect(),
                own: Composed::from_bag(meta),
            },
            SchemaDescription::Array { items, meta } => Sanitiser::Array {
                item: Box::new(items.first().map_or_else(Sanitiser::identity, Sanitiser::build)),
                own: Composed::from_bag(meta),
            },
            SchemaDescription::Conditional { whens, .. } => whens
                .first()
                .and_then(|when| when.then.as_deref())
                .map_or_else(Sanitiser::identity, Sanitiser::build),
        }
    }

    pub fn sanitise(&self, value: Value) -> Value {
        match self {
            Sanitiser::Primitive(own) => own.apply(value),
            Sanitiser::Object { keys, own } => match value {
                Value::Object(mut input) => {
                    let mut output = Map::new();
                    for (name, sanitiser) in keys {
                        if let Some(child) = input.remove(name) {
                            output.insert(name.clone(), sanitiser.sanitise(child));
                        }
                    }
                    own.apply(Value::Object(output))
                }
                other => other,
            },
            Sanitiser::Array { item, own } => match value {
                Value::Array(items) => {
                    let items = items.into_iter().map(|child| item.sanitise(child)).collect();
                    own.apply(Value::Array(items))
                }
                other => other,
            },
        }
    }
}
