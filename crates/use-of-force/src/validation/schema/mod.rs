//! In-memory schema builder and validator.
//!
//! Schemas describe a submitted form section: the shape of every field, the
//! constraints it must meet, which fields only apply when a sibling holds a
//! given answer, and the metadata the pipeline reads back through
//! [`Schema::describe`].

mod messages;
mod validate;

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::description::{SchemaDescription, WhenDescription};
use super::metadata::{FieldType, Metadata, MetadataBag, Transform};
use messages::Messages;

pub use validate::{ErrorDetail, RuleContext, Validated, ValidationPolicy, Violation};

/// Decides whether two projected array item keys collide.
pub type Comparator = Arc<dyn Fn(&Value, &Value) -> bool + Send + Sync>;

/// Cross-field rule run once a node and its children validated cleanly.
/// `Ok(Some(_))` replaces the validated value.
pub type CustomRule =
    Arc<dyn Fn(&Value, &RuleContext<'_>) -> Result<Option<Value>, Vec<Violation>> + Send + Sync>;

pub type PatternTest = Arc<dyn Fn(&str) -> bool + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Presence {
    #[default]
    Optional,
    Required,
    Forbidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum UnknownKeys {
    /// Defer to [`ValidationPolicy::allow_unknown`].
    #[default]
    Policy,
    Allow,
    Strip,
}

#[derive(Debug, Clone)]
struct ObjectKeys {
    keys: Vec<(String, Schema)>,
    /// Declaration order, except conditionals follow the siblings they read.
    order: Vec<usize>,
    unknown: UnknownKeys,
}

impl ObjectKeys {
    fn new(keys: Vec<(String, Schema)>) -> Self {
        let order = dependency_order(&keys);
        Self {
            keys,
            order,
            unknown: UnknownKeys::default(),
        }
    }

    fn contains(&self, name: &str) -> bool {
        self.keys.iter().any(|(key, _)| key == name)
    }
}

#[derive(Debug, Clone)]
enum Kind {
    Any,
    String,
    Number,
    Boolean,
    Object(ObjectKeys),
    Array {
        item: Option<Box<Schema>>,
        single: bool,
    },
    Conditional(Vec<When>),
}

/// Value a sibling must hold for a conditional branch to apply.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Equals(Value),
    OneOf(Vec<Value>),
}

impl Condition {
    pub fn equals(value: impl Into<Value>) -> Self {
        Condition::Equals(value.into())
    }

    pub fn one_of<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Condition::OneOf(values.into_iter().map(Into::into).collect())
    }

    fn matches(&self, sibling: Option<&Value>) -> bool {
        let Some(sibling) = sibling else {
            return false;
        };
        match self {
            Condition::Equals(expected) => expected == sibling,
            Condition::OneOf(expected) => expected.contains(sibling),
        }
    }
}

#[derive(Debug, Clone)]
struct When {
    reference: String,
    is: Condition,
    then: Option<Box<Schema>>,
    otherwise: Option<Box<Schema>>,
}

#[derive(Clone)]
enum Rule {
    Min(i64),
    Max(i64),
    Integer,
    MaxDigits(usize),
    Pattern {
        name: &'static str,
        test: PatternTest,
    },
    Unique {
        key: String,
        comparator: Comparator,
    },
    Custom {
        name: &'static str,
        check: CustomRule,
    },
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Min(limit) => write!(f, "Min({limit})"),
            Rule::Max(limit) => write!(f, "Max({limit})"),
            Rule::Integer => f.write_str("Integer"),
            Rule::MaxDigits(limit) => write!(f, "MaxDigits({limit})"),
            Rule::Pattern { name, .. } => write!(f, "Pattern({name})"),
            Rule::Unique { key, .. } => write!(f, "Unique({key})"),
            Rule::Custom { name, .. } => write!(f, "Custom({name})"),
        }
    }
}

/// A validator for one node of a submitted form value.
#[derive(Debug, Clone)]
pub struct Schema {
    kind: Kind,
    presence: Presence,
    strip: bool,
    valid: Vec<Value>,
    rules: Vec<Rule>,
    messages: Messages,
    meta: MetadataBag,
}

impl Schema {
    fn of(kind: Kind) -> Self {
        Self {
            kind,
            presence: Presence::default(),
            strip: false,
            valid: Vec::new(),
            rules: Vec::new(),
            messages: Messages::default(),
            meta: MetadataBag::default(),
        }
    }

    pub fn any() -> Self {
        Self::of(Kind::Any)
    }

    pub fn string() -> Self {
        Self::of(Kind::String)
    }

    pub fn number() -> Self {
        Self::of(Kind::Number)
    }

    pub fn boolean() -> Self {
        Self::of(Kind::Boolean)
    }

    pub fn object<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = (K, Schema)>,
        K: Into<String>,
    {
        let keys = keys
            .into_iter()
            .map(|(name, schema)| (name.into(), schema))
            .collect();
        Self::of(Kind::Object(ObjectKeys::new(keys)))
    }

    pub fn array(item: Schema) -> Self {
        Self::of(Kind::Array {
            item: Some(Box::new(item)),
            single: false,
        })
    }

    /// Applies `then` while the sibling `reference` satisfies `is`.
    /// Without an `otherwise`, other answers leave the value unchecked.
    pub fn when(reference: impl Into<String>, is: Condition, then: Schema) -> Self {
        Self::of(Kind::Conditional(vec![When {
            reference: reference.into(),
            is,
            then: Some(Box::new(then)),
            otherwise: None,
        }]))
    }

    /// Adds a further condition, consulted when earlier ones yield no branch.
    pub fn or_when(mut self, reference: impl Into<String>, is: Condition, then: Schema) -> Self {
        if let Kind::Conditional(whens) = &mut self.kind {
            whens.push(When {
                reference: reference.into(),
                is,
                then: Some(Box::new(then)),
                otherwise: None,
            });
        }
        self
    }

    /// Schema for the most recent condition when its sibling does not match.
    pub fn otherwise(mut self, schema: Schema) -> Self {
        if let Kind::Conditional(whens) = &mut self.kind {
            if let Some(last) = whens.last_mut() {
                last.otherwise = Some(Box::new(schema));
            }
        }
        self
    }

    pub fn required(mut self) -> Self {
        self.presence = Presence::Required;
        self
    }

    pub fn optional(mut self) -> Self {
        self.presence = Presence::Optional;
        self
    }

    pub fn forbidden(mut self) -> Self {
        self.presence = Presence::Forbidden;
        self
    }

    /// Validates the value, then drops it from the output.
    pub fn strip(mut self) -> Self {
        self.strip = true;
        self
    }

    pub fn valid<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.valid.extend(values.into_iter().map(Into::into));
        self
    }

    /// Lower bound: string length, number value or array length.
    pub fn min(mut self, limit: i64) -> Self {
        self.rules.push(Rule::Min(limit));
        self
    }

    /// Upper bound: string length, number value or array length.
    pub fn max(mut self, limit: i64) -> Self {
        self.rules.push(Rule::Max(limit));
        self
    }

    pub fn integer(mut self) -> Self {
        self.rules.push(Rule::Integer);
        self
    }

    /// Caps how many digits a submitted number may be written with.
    pub fn max_digits(mut self, limit: usize) -> Self {
        self.rules.push(Rule::MaxDigits(limit));
        self
    }

    pub fn pattern<F>(mut self, name: &'static str, test: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.rules.push(Rule::Pattern {
            name,
            test: Arc::new(test),
        });
        self
    }

    /// Rejects array items whose `key` collides with an earlier item's.
    pub fn unique_by(mut self, key: impl Into<String>, comparator: Comparator) -> Self {
        self.rules.push(Rule::Unique {
            key: key.into(),
            comparator,
        });
        self
    }

    /// Accepts a lone value where an array is expected.
    pub fn single(mut self) -> Self {
        if let Kind::Array { single, .. } = &mut self.kind {
            *single = true;
        }
        self
    }

    pub fn allow_unknown(mut self) -> Self {
        if let Kind::Object(keys) = &mut self.kind {
            keys.unknown = UnknownKeys::Allow;
        }
        self
    }

    pub fn strip_unknown(mut self) -> Self {
        if let Kind::Object(keys) = &mut self.kind {
            keys.unknown = UnknownKeys::Strip;
        }
        self
    }

    pub fn custom<F>(mut self, name: &'static str, check: F) -> Self
    where
        F: Fn(&Value, &RuleContext<'_>) -> Result<Option<Value>, Vec<Violation>>
            + Send
            + Sync
            + 'static,
    {
        self.rules.push(Rule::Custom {
            name,
            check: Arc::new(check),
        });
        self
    }

    /// Replaces the message of every error this node reports.
    pub fn message(mut self, text: impl Into<String>) -> Self {
        self.messages.set_all(text.into());
        self
    }

    pub fn messages<I, C, T>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (C, T)>,
        C: Into<String>,
        T: Into<String>,
    {
        for (code, text) in overrides {
            self.messages.set(code.into(), text.into());
        }
        self
    }

    pub fn meta(mut self, entry: Metadata) -> Self {
        self.meta.push(entry);
        self
    }

    pub fn sanitise(self, transform: Transform) -> Self {
        self.meta(Metadata::sanitiser(transform))
    }

    pub fn field_type(self, field_type: FieldType) -> Self {
        self.meta(Metadata::field_type(field_type))
    }

    pub fn first_field_name(self, name: impl Into<String>) -> Self {
        self.meta(Metadata::first_field_name(name))
    }

    pub fn describe(&self) -> SchemaDescription {
        let meta = self.meta.clone();
        match &self.kind {
            Kind::Object(object) => SchemaDescription::Object {
                keys: object
                    .keys
                    .iter()
                    .map(|(name, schema)| (name.clone(), schema.describe()))
                    .collect(),
                meta,
            },
            Kind::Array { item, .. } => SchemaDescription::Array {
                items: item.iter().map(|schema| schema.describe()).collect(),
                meta,
            },
            Kind::Conditional(whens) => SchemaDescription::Conditional {
                whens: whens
                    .iter()
                    .map(|when| WhenDescription {
                        then: when.then.as_ref().map(|schema| Box::new(schema.describe())),
                        otherwise: when
                            .otherwise
                            .as_ref()
                            .map(|schema| Box::new(schema.describe())),
                    })
                    .collect(),
                meta,
            },
            Kind::Any | Kind::String | Kind::Number | Kind::Boolean => {
                SchemaDescription::Primitive { meta }
            }
        }
    }

    pub fn validate(&self, value: &Value, policy: &ValidationPolicy) -> Validated {
        validate::run(self, value, policy)
    }

    fn references(&self) -> Vec<&str> {
        match &self.kind {
            Kind::Conditional(whens) => whens.iter().map(|when| when.reference.as_str()).collect(),
            _ => Vec::new(),
        }
    }

    fn max_digits_limit(&self) -> Option<usize> {
        self.rules.iter().find_map(|rule| match rule {
            Rule::MaxDigits(limit) => Some(*limit),
            _ => None,
        })
    }
}

fn dependency_order(keys: &[(String, Schema)]) -> Vec<usize> {
    let mut placed = vec![false; keys.len()];
    let mut order = Vec::with_capacity(keys.len());

    while order.len() < keys.len() {
        let ready = (0..keys.len()).filter(|&index| !placed[index]).find(|&index| {
            keys[index].1.references().iter().all(|reference| {
                keys.iter()
                    .position(|(name, _)| name == reference)
                    .map_or(true, |dependency| dependency == index || placed[dependency])
            })
        });

        // A reference cycle falls back to declaration order.
        let Some(next) = ready.or_else(|| placed.iter().position(|done| !done)) else {
            break;
        };
        placed[next] = true;
        order.push(next);
    }

    order
}
